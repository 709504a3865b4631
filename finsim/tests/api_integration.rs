//! REST API integration tests, driven in-process through the router

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use finsim::{FinsimConfig, FinsimServer};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use tower::ServiceExt;

fn server() -> FinsimServer {
    let mut config = FinsimConfig::default();
    config.game.seed = Some(42);
    config.shards.num_shards = 2;
    FinsimServer::from_config(config).unwrap()
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

async fn create_room(router: &Router, code: &str, rounds: u32) -> (StatusCode, Value) {
    send(
        router,
        "POST",
        "/api/rooms",
        Some("dev:alice"),
        Some(json!({ "code": code, "rounds": rounds, "secondsPerRound": 60 })),
    )
    .await
}

#[tokio::test]
async fn test_ping() {
    let router = server().router();
    let (status, body) = send(&router, "GET", "/api/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({}));
}

#[tokio::test]
async fn test_top_stocks() {
    let router = server().router();

    let (status, body) = send(&router, "GET", "/api/stocks/top?n=3", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let stocks = body.as_array().unwrap();
    assert_eq!(stocks.len(), 3);
    assert_eq!(stocks[0]["ticker"], "AAPL");
    assert_eq!(decimal(&stocks[0]["price"]), dec!(189.84));

    let (status, body) = send(&router, "GET", "/api/stocks/top", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 10);

    let (status, body) = send(&router, "GET", "/api/stocks/top?n=0", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["category"], "VALIDATION");

    let (status, _) = send(&router, "GET", "/api/stocks/top?n=abc", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_requires_token() {
    let router = server().router();

    let (status, body) = send(
        &router,
        "POST",
        "/api/rooms",
        None,
        Some(json!({ "code": "R1", "rounds": 2, "secondsPerRound": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "INVALID_TOKEN");

    let (status, _) = send(
        &router,
        "POST",
        "/api/rooms",
        Some("not-a-token"),
        Some(json!({ "code": "R1", "rounds": 2, "secondsPerRound": 60 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_validation() {
    let router = server().router();

    let (status, body) = create_room(&router, "bad code", 2).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["category"], "VALIDATION");

    let (status, _) = create_room(&router, "R1", 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &router,
        "POST",
        "/api/rooms",
        Some("dev:alice"),
        Some(json!({ "code": "R1" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_then_get_room() {
    let router = server().router();

    let (status, body) = create_room(&router, "LOBBY1", 3).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], "LOBBY1");

    let (status, body) = create_room(&router, "LOBBY1", 3).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["category"], "CONFLICT");

    let (status, body) = send(&router, "POST", "/api/rooms/LOBBY1/join", Some("dev:bob"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["joined"], true);

    let (status, body) = send(&router, "POST", "/api/rooms/LOBBY1/join", Some("dev:bob"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["joined"], false);

    let (status, body) = send(&router, "GET", "/api/rooms/LOBBY1", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["createdBy"], "alice");
    assert_eq!(body["players"], json!(["alice", "bob"]));
    assert_eq!(body["started"], false);
    assert_eq!(body["config"]["rounds"], 3);

    let (status, body) = send(&router, "GET", "/api/rooms/MISSING", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["category"], "NOT_FOUND");
}

#[tokio::test]
async fn test_only_owner_starts() {
    let router = server().router();
    create_room(&router, "OWNED", 2).await;
    send(&router, "POST", "/api/rooms/OWNED/join", Some("dev:bob"), None).await;

    let (status, body) = send(&router, "POST", "/api/rooms/OWNED/start", Some("dev:bob"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");

    let (status, body) = send(&router, "GET", "/api/rooms/OWNED/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["started"], false);
    assert!(body.get("roundId").is_none());
}

#[tokio::test]
async fn test_full_game_over_http() {
    let router = server().router();
    create_room(&router, "ABC123", 2).await;
    send(&router, "POST", "/api/rooms/ABC123/join", Some("dev:bob"), None).await;

    let trade = json!({
        "ticker": "AAPL",
        "direction": "BUY",
        "amount": 10,
        "roundIndex": 0,
        "roundId": "AAAAAA"
    });
    let (status, _) = send(&router, "POST", "/api/rooms/ABC123/trades", Some("dev:alice"), Some(trade)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(&router, "POST", "/api/rooms/ABC123/start", Some("dev:alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    let first = body["firstRoundId"].as_str().unwrap().to_string();

    let (status, body) = send(&router, "GET", "/api/rooms/ABC123/status", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["started"], true);
    assert_eq!(body["roundId"], first.as_str());

    let (status, _) = send(&router, "POST", "/api/rooms/ABC123/join", Some("dev:carol"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Round 0 quotes the feed prices
    let uri = format!("/api/rooms/ABC123/rounds/{}", first);
    let (status, view) = send(&router, "GET", &uri, Some("dev:alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["roundIndex"], 0);
    assert_eq!(view["totalRounds"], 2);
    let aapl = view["round"]["stocks"]
        .as_array()
        .unwrap()
        .iter()
        .find(|s| s["ticker"] == "AAPL")
        .unwrap();
    assert_eq!(decimal(&aapl["price"]), dec!(189.84));
    assert_eq!(decimal(&view["portfolio"]["cash"]), dec!(100000));

    let (status, _) = send(&router, "GET", &uri, Some("dev:carol"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let trade = json!({
        "ticker": "AAPL",
        "direction": "BUY",
        "amount": 10,
        "roundIndex": 0,
        "roundId": first
    });
    let (status, body) = send(&router, "POST", "/api/rooms/ABC123/trades", Some("dev:alice"), Some(trade)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&body["portfolio"]["cash"]), dec!(98101.60));
    let positions = body["portfolio"]["positions"].as_array().unwrap();
    assert_eq!(positions.len(), 1);
    assert_eq!(positions[0]["shares"], 10);

    let too_big = json!({
        "ticker": "AAPL",
        "direction": "BUY",
        "amount": 1_000_000,
        "roundIndex": 0,
        "roundId": first
    });
    let (status, body) = send(&router, "POST", "/api/rooms/ABC123/trades", Some("dev:bob"), Some(too_big)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "INSUFFICIENT_FUNDS");

    let stale = json!({
        "ticker": "AAPL",
        "direction": "BUY",
        "amount": 1,
        "roundIndex": 1,
        "roundId": first
    });
    let (status, _) = send(&router, "POST", "/api/rooms/ABC123/trades", Some("dev:bob"), Some(stale)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Barrier holds until both players complete round 0
    let complete = format!("/api/rooms/ABC123/rounds/{}/complete", first);
    let completion = format!("/api/rooms/ABC123/rounds/{}/completion", first);

    let (status, body) = send(&router, "POST", &complete, Some("dev:alice"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ack"], true);
    assert_eq!(body["firstCompletion"], true);

    let (_, body) = send(&router, "POST", &complete, Some("dev:alice"), None).await;
    assert_eq!(body["firstCompletion"], false);

    let (status, body) = send(&router, "GET", &completion, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["released"], false);
    assert_eq!(body["remaining"], 1);

    send(&router, "POST", &complete, Some("dev:bob"), None).await;
    let (_, body) = send(&router, "GET", &completion, None, None).await;
    assert_eq!(body["released"], true);
    assert_eq!(body["terminal"], false);
    let second = body["nextRoundId"].as_str().unwrap().to_string();
    assert_ne!(second, first);

    // Close the position in round 1
    let position_id = positions[0]["id"].as_str().unwrap();
    let close = format!("/api/rooms/ABC123/positions/{}/close", position_id);
    let (status, body) = send(
        &router,
        "POST",
        &close,
        Some("dev:alice"),
        Some(json!({ "roundId": second })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["portfolio"]["positions"].as_array().unwrap().is_empty());

    let (status, body) = send(
        &router,
        "POST",
        &close,
        Some("dev:alice"),
        Some(json!({ "roundId": second })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["category"], "NOT_FOUND");

    let complete = format!("/api/rooms/ABC123/rounds/{}/complete", second);
    send(&router, "POST", &complete, Some("dev:alice"), None).await;
    send(&router, "POST", &complete, Some("dev:bob"), None).await;

    let completion = format!("/api/rooms/ABC123/rounds/{}/completion", second);
    let (_, body) = send(&router, "GET", &completion, None, None).await;
    assert_eq!(body["released"], true);
    assert_eq!(body["terminal"], true);
    assert!(body.get("nextRoundId").is_none());

    let (status, body) = send(&router, "GET", "/api/rooms/ABC123/leaderboard", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body["leaderboard"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    let mut names: Vec<&str> = entries.iter().map(|e| e["name"].as_str().unwrap()).collect();
    names.sort();
    assert_eq!(names, vec!["alice", "bob"]);
    assert_eq!(body["history"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_unknown_round() {
    let router = server().router();
    create_room(&router, "ROUNDS", 1).await;
    send(&router, "POST", "/api/rooms/ROUNDS/start", Some("dev:alice"), None).await;

    let (status, _) = send(&router, "GET", "/api/rooms/ROUNDS/rounds/ZZZZZZ", Some("dev:alice"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "GET", "/api/rooms/ROUNDS/rounds/nope", Some("dev:alice"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
