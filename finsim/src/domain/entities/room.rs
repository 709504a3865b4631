//! Room aggregate: one game session's authoritative state.
//!
//! Lifecycle is `Created -> Started -> Concluded`. Starting is split in two
//! steps so round generation can run outside the room's serialization
//! boundary: [`Room::begin_start`] reserves the transition and
//! [`Room::commit_start`] / [`Room::abort_start`] finish it.

use super::barrier::{CompletionBarrier, Release};
use super::ledger::Ledger;
use super::portfolio::{LedgerError, Portfolio};
use super::round::{HeadlineEffect, MacroIndicators, Round};
use crate::domain::value_objects::{
    Direction, GameCode, PlayerId, PositionId, RoundId, Ticker, Timestamp,
};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoomError {
    #[error("Invalid room configuration: {0}")]
    InvalidConfig(String),

    #[error("Player {0} is not part of this room")]
    NotAuthorized(PlayerId),

    #[error("Only the room owner can {0}")]
    Forbidden(&'static str),

    #[error("Game already started")]
    AlreadyStarted,

    #[error("Game start already in progress")]
    StartInProgress,

    #[error("Game has not started")]
    NotStarted,

    #[error("Round not found: {0}")]
    RoundNotFound(RoundId),

    #[error("Stale round reference: index {index} is not round {round_id}")]
    StaleRound { index: usize, round_id: RoundId },

    #[error("Ticker not traded in this round: {0}")]
    TickerNotFound(Ticker),

    #[error("Generated {actual} rounds, room expects {expected}")]
    RoundCountMismatch { expected: usize, actual: usize },

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => write!(f, "easy"),
            Difficulty::Medium => write!(f, "medium"),
            Difficulty::Hard => write!(f, "hard"),
        }
    }
}

impl TryFrom<&str> for Difficulty {
    type Error = &'static str;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" | "normal" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err("Invalid difficulty: must be easy, medium or hard"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomConfig {
    pub rounds: u32,
    pub seconds_per_round: u32,
    pub difficulty: Difficulty,
}

impl RoomConfig {
    pub fn validate(&self, max_rounds: u32) -> Result<(), RoomError> {
        if self.rounds == 0 || self.rounds > max_rounds {
            return Err(RoomError::InvalidConfig(format!(
                "rounds must be between 1 and {}",
                max_rounds
            )));
        }
        if self.seconds_per_round == 0 {
            return Err(RoomError::InvalidConfig(
                "secondsPerRound must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomPhase {
    Created,
    Started,
    Concluded,
}

/// What round generation needs to know, handed out by [`Room::begin_start`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTicket {
    pub round_count: usize,
    pub players: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeOrder {
    pub ticker: Ticker,
    pub direction: Direction,
    pub shares: i64,
    pub round_index: usize,
    pub round_id: RoundId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockView {
    pub ticker: Ticker,
    pub price: Decimal,
    pub previous_price: Decimal,
    pub headlines: Vec<String>,
    pub effects: Vec<HeadlineEffect>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundSnapshot {
    pub id: RoundId,
    pub stocks: Vec<StockView>,
    pub indicators: MacroIndicators,
    pub global_news: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundView {
    pub round: RoundSnapshot,
    pub round_index: usize,
    pub total_rounds: usize,
    pub portfolio: Portfolio,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player: PlayerId,
    pub name: String,
    pub value: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub round: usize,
    /// Player -> total value after that round
    pub values: IndexMap<PlayerId, Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub leaderboard: Vec<LeaderboardEntry>,
    pub history: Vec<HistoryPoint>,
}

/// Lobby and status view of a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub code: GameCode,
    pub owner: PlayerId,
    pub created_by: String,
    pub players: Vec<String>,
    pub started: bool,
    pub phase: RoomPhase,
    pub first_round_id: Option<RoundId>,
    pub config: RoomConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub code: GameCode,
    pub config: RoomConfig,
    pub owner: PlayerId,
    /// Authorized players with their display names, in join order
    players: IndexMap<PlayerId, String>,
    started: bool,
    /// Set while rounds are being generated outside the room
    #[serde(skip)]
    starting: bool,
    rounds: Vec<Round>,
    ledger: Ledger,
    barrier: CompletionBarrier,
    pub created_at: Timestamp,
}

impl Room {
    /// New room in `Created` phase with the owner as first player
    pub fn new(
        code: GameCode,
        config: RoomConfig,
        owner: PlayerId,
        owner_name: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        let mut players = IndexMap::new();
        players.insert(owner.clone(), owner_name.into());
        Self {
            code,
            config,
            owner,
            players,
            started: false,
            starting: false,
            rounds: Vec::new(),
            ledger: Ledger::new(),
            barrier: CompletionBarrier::new(),
            created_at: now,
        }
    }

    pub fn phase(&self) -> RoomPhase {
        if !self.started {
            return RoomPhase::Created;
        }
        let concluded = self.rounds.last().is_some_and(|last| {
            self.barrier
                .check_release(&last.id, self.players.len(), None)
                .is_released()
        });
        if concluded {
            RoomPhase::Concluded
        } else {
            RoomPhase::Started
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn is_starting(&self) -> bool {
        self.starting
    }

    pub fn players(&self) -> &IndexMap<PlayerId, String> {
        &self.players
    }

    pub fn is_player(&self, player: &PlayerId) -> bool {
        self.players.contains_key(player)
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn first_round_id(&self) -> Option<&RoundId> {
        self.rounds.first().map(|r| &r.id)
    }

    pub fn round_index(&self, round_id: &RoundId) -> Option<usize> {
        self.rounds.iter().position(|r| &r.id == round_id)
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn barrier(&self) -> &CompletionBarrier {
        &self.barrier
    }

    /// Add a player. Returns false if the player was already present.
    ///
    /// New players cannot join once the game has started: they would have
    /// no portfolio and would block the completion barrier.
    pub fn join(&mut self, player: PlayerId, name: impl Into<String>) -> Result<bool, RoomError> {
        if self.players.contains_key(&player) {
            return Ok(false);
        }
        if self.started || self.starting {
            return Err(RoomError::AlreadyStarted);
        }
        self.players.insert(player, name.into());
        Ok(true)
    }

    /// Reserve the `Created -> Started` transition for the owner
    pub fn begin_start(&mut self, requester: &PlayerId) -> Result<StartTicket, RoomError> {
        if requester != &self.owner {
            return Err(RoomError::Forbidden("start the game"));
        }
        if self.started {
            return Err(RoomError::AlreadyStarted);
        }
        if self.starting {
            return Err(RoomError::StartInProgress);
        }
        self.starting = true;
        Ok(StartTicket {
            round_count: self.config.rounds as usize,
            players: self.players.len(),
        })
    }

    /// Install generated rounds, open one portfolio per player and flip to
    /// `Started`. Returns the first round id.
    pub fn commit_start(
        &mut self,
        rounds: Vec<Round>,
        starting_cash: Decimal,
    ) -> Result<RoundId, RoomError> {
        if self.started {
            return Err(RoomError::AlreadyStarted);
        }
        let expected = self.config.rounds as usize;
        if rounds.len() != expected {
            self.starting = false;
            return Err(RoomError::RoundCountMismatch {
                expected,
                actual: rounds.len(),
            });
        }

        let first = rounds[0].id.clone();
        self.rounds = rounds;
        self.ledger.initialize(self.players.keys(), starting_cash);
        self.barrier = CompletionBarrier::new();
        self.started = true;
        self.starting = false;
        Ok(first)
    }

    /// Give up a reserved start; the room stays `Created`
    pub fn abort_start(&mut self) {
        self.starting = false;
    }

    fn authorize(&self, player: &PlayerId) -> Result<(), RoomError> {
        if self.is_player(player) {
            Ok(())
        } else {
            Err(RoomError::NotAuthorized(player.clone()))
        }
    }

    fn authorize_started(&self, player: &PlayerId) -> Result<(), RoomError> {
        self.authorize(player)?;
        if !self.started {
            return Err(RoomError::NotStarted);
        }
        Ok(())
    }

    fn round(&self, round_id: &RoundId) -> Result<(usize, &Round), RoomError> {
        self.rounds
            .iter()
            .enumerate()
            .find(|(_, r)| &r.id == round_id)
            .ok_or_else(|| RoomError::RoundNotFound(round_id.clone()))
    }

    /// Round data for `player`, each stock carrying its previous-round price
    pub fn round_view(&self, round_id: &RoundId, player: &PlayerId) -> Result<RoundView, RoomError> {
        self.authorize_started(player)?;
        let (index, round) = self.round(round_id)?;
        let previous = index.checked_sub(1).map(|i| &self.rounds[i]);

        let stocks = round
            .stocks
            .iter()
            .map(|s| StockView {
                ticker: s.ticker.clone(),
                price: s.price,
                previous_price: previous
                    .and_then(|p| p.price_of(&s.ticker))
                    .unwrap_or(s.price),
                headlines: s.headlines.clone(),
                effects: s.effects.clone(),
            })
            .collect();

        Ok(RoundView {
            round: RoundSnapshot {
                id: round.id.clone(),
                stocks,
                indicators: round.indicators,
                global_news: round.global_news.clone(),
            },
            round_index: index,
            total_rounds: self.rounds.len(),
            portfolio: self.ledger.portfolio(player)?.clone(),
        })
    }

    /// Open a position at the price of the referenced round
    pub fn trade(&mut self, player: &PlayerId, order: TradeOrder) -> Result<Portfolio, RoomError> {
        self.authorize_started(player)?;

        let round = self
            .rounds
            .get(order.round_index)
            .filter(|r| r.id == order.round_id)
            .ok_or_else(|| RoomError::StaleRound {
                index: order.round_index,
                round_id: order.round_id.clone(),
            })?;
        let price = round
            .price_of(&order.ticker)
            .ok_or_else(|| RoomError::TickerNotFound(order.ticker.clone()))?;

        self.ledger
            .open(player, order.ticker, order.direction, order.shares, price)?;
        Ok(self.ledger.portfolio(player)?.clone())
    }

    /// Close a position at its ticker's price in `round_id`
    pub fn close_position(
        &mut self,
        player: &PlayerId,
        position_id: PositionId,
        round_id: &RoundId,
    ) -> Result<Portfolio, RoomError> {
        self.authorize_started(player)?;
        let (_, round) = self.round(round_id)?;

        let ticker = self
            .ledger
            .portfolio(player)?
            .position(position_id)
            .map(|p| p.ticker.clone())
            .ok_or(LedgerError::PositionNotFound(position_id))?;
        let price = round
            .price_of(&ticker)
            .ok_or_else(|| RoomError::TickerNotFound(ticker.clone()))?;

        self.ledger.close(player, position_id, price)?;
        Ok(self.ledger.portfolio(player)?.clone())
    }

    /// Mark `player` done with `round_id`.
    ///
    /// The first completion per round also records the portfolio's value,
    /// priced with the final round of the sequence whichever round is being
    /// completed. Returns false for a repeated completion.
    pub fn complete_round(&mut self, player: &PlayerId, round_id: &RoundId) -> Result<bool, RoomError> {
        self.authorize_started(player)?;
        self.round(round_id)?;

        if !self.barrier.mark_complete(round_id, player) {
            return Ok(false);
        }
        let prices = self
            .rounds
            .last()
            .map(Round::prices)
            .unwrap_or_default();
        self.ledger.mark_to_market(player, &prices)?;
        Ok(true)
    }

    pub fn check_release(&self, round_id: &RoundId) -> Result<Release, RoomError> {
        if !self.started {
            return Err(RoomError::NotStarted);
        }
        let (index, _) = self.round(round_id)?;
        let next = self.rounds.get(index + 1).map(|r| &r.id);
        Ok(self
            .barrier
            .check_release(round_id, self.players.len(), next))
    }

    /// Players ranked by their latest recorded value, with per-round history
    pub fn leaderboard(&self) -> Leaderboard {
        let name_of = |p: &PlayerId| self.players.get(p).cloned().unwrap_or_else(|| p.to_string());

        let mut leaderboard: Vec<LeaderboardEntry> = self
            .ledger
            .portfolios()
            .map(|pf| LeaderboardEntry {
                player: pf.owner.clone(),
                name: name_of(&pf.owner),
                value: pf.latest_value(),
            })
            .collect();
        leaderboard.sort_by(|a, b| b.value.cmp(&a.value));

        let depth = self
            .ledger
            .portfolios()
            .map(|pf| pf.value_history.len())
            .max()
            .unwrap_or(0);
        let history = (0..depth)
            .map(|round| HistoryPoint {
                round,
                values: self
                    .ledger
                    .portfolios()
                    .filter_map(|pf| {
                        pf.value_history
                            .get(round)
                            .map(|v| (pf.owner.clone(), *v))
                    })
                    .collect(),
            })
            .collect();

        Leaderboard {
            leaderboard,
            history,
        }
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            code: self.code.clone(),
            owner: self.owner.clone(),
            created_by: self
                .players
                .get(&self.owner)
                .cloned()
                .unwrap_or_else(|| self.owner.to_string()),
            players: self.players.values().cloned().collect(),
            started: self.started,
            phase: self.phase(),
            first_round_id: self.first_round_id().cloned(),
            config: self.config.clone(),
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::StockSnapshot;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn pid(s: &str) -> PlayerId {
        PlayerId::new(s)
    }

    fn ticker(s: &str) -> Ticker {
        Ticker::new(s).unwrap()
    }

    fn round(id: &str, aapl: Decimal) -> Round {
        Round {
            id: RoundId::new(id).unwrap(),
            stocks: vec![StockSnapshot {
                ticker: ticker("AAPL"),
                price: aapl,
                headlines: vec!["Apple ships a toaster".to_string()],
                effects: Vec::new(),
            }],
            indicators: MacroIndicators {
                interest_rate: dec!(2.5),
                inflation_rate: dec!(3.1),
                gdp_growth_rate: dec!(1.2),
            },
            global_news: vec!["Markets calm".to_string()],
        }
    }

    fn config(rounds: u32) -> RoomConfig {
        RoomConfig {
            rounds,
            seconds_per_round: 60,
            difficulty: Difficulty::Medium,
        }
    }

    fn started_room() -> Room {
        let mut room = Room::new(
            GameCode::new("ABC123").unwrap(),
            config(2),
            pid("owner"),
            "Owner",
            Utc::now(),
        );
        room.join(pid("guest"), "Guest").unwrap();
        room.begin_start(&pid("owner")).unwrap();
        room.commit_start(
            vec![round("ROUND0", dec!(100)), round("ROUND1", dec!(110))],
            dec!(100000),
        )
        .unwrap();
        room
    }

    #[test]
    fn test_config_validation() {
        assert!(config(3).validate(20).is_ok());
        assert!(config(0).validate(20).is_err());
        assert!(config(21).validate(20).is_err());
        let mut no_time = config(3);
        no_time.seconds_per_round = 0;
        assert!(no_time.validate(20).is_err());
    }

    #[test]
    fn test_join_is_idempotent() {
        let mut room = Room::new(
            GameCode::new("ROOM").unwrap(),
            config(1),
            pid("owner"),
            "Owner",
            Utc::now(),
        );
        assert!(room.join(pid("p2"), "Two").unwrap());
        assert!(!room.join(pid("p2"), "Two again").unwrap());
        assert!(!room.join(pid("owner"), "Owner").unwrap());

        assert_eq!(room.players().len(), 2);
        assert_eq!(room.players()[&pid("p2")], "Two");
    }

    #[test]
    fn test_join_after_start_is_rejected_for_newcomers() {
        let mut room = started_room();
        assert_eq!(
            room.join(pid("late"), "Late"),
            Err(RoomError::AlreadyStarted)
        );
        assert_eq!(room.join(pid("guest"), "Guest"), Ok(false));
    }

    #[test]
    fn test_only_owner_can_start() {
        let mut room = Room::new(
            GameCode::new("ROOM").unwrap(),
            config(1),
            pid("owner"),
            "Owner",
            Utc::now(),
        );
        room.join(pid("guest"), "Guest").unwrap();
        assert_eq!(
            room.begin_start(&pid("guest")),
            Err(RoomError::Forbidden("start the game"))
        );
        assert!(!room.is_starting());
    }

    #[test]
    fn test_start_reservation_blocks_second_start() {
        let mut room = Room::new(
            GameCode::new("ROOM").unwrap(),
            config(1),
            pid("owner"),
            "Owner",
            Utc::now(),
        );
        room.begin_start(&pid("owner")).unwrap();
        assert_eq!(
            room.begin_start(&pid("owner")),
            Err(RoomError::StartInProgress)
        );

        room.abort_start();
        assert_eq!(room.phase(), RoomPhase::Created);
        assert!(room.begin_start(&pid("owner")).is_ok());
    }

    #[test]
    fn test_commit_rejects_wrong_round_count() {
        let mut room = Room::new(
            GameCode::new("ROOM").unwrap(),
            config(2),
            pid("owner"),
            "Owner",
            Utc::now(),
        );
        room.begin_start(&pid("owner")).unwrap();
        let err = room
            .commit_start(vec![round("ROUND0", dec!(1))], dec!(100000))
            .unwrap_err();
        assert_eq!(
            err,
            RoomError::RoundCountMismatch {
                expected: 2,
                actual: 1
            }
        );
        assert!(!room.is_started());
        assert!(!room.is_starting());
    }

    #[test]
    fn test_start_initializes_portfolios_and_rejects_restart() {
        let mut room = started_room();
        assert_eq!(room.phase(), RoomPhase::Started);
        assert_eq!(room.ledger().len(), 2);
        assert_eq!(room.first_round_id().unwrap().as_str(), "ROUND0");
        assert_eq!(
            room.begin_start(&pid("owner")),
            Err(RoomError::AlreadyStarted)
        );
    }

    #[test]
    fn test_round_view_attaches_previous_prices() {
        let room = started_room();
        let r0 = RoundId::new("ROUND0").unwrap();
        let r1 = RoundId::new("ROUND1").unwrap();

        let view0 = room.round_view(&r0, &pid("guest")).unwrap();
        assert_eq!(view0.round_index, 0);
        assert_eq!(view0.round.stocks[0].previous_price, dec!(100));

        let view1 = room.round_view(&r1, &pid("guest")).unwrap();
        assert_eq!(view1.round_index, 1);
        assert_eq!(view1.round.stocks[0].price, dec!(110));
        assert_eq!(view1.round.stocks[0].previous_price, dec!(100));
    }

    #[test]
    fn test_round_view_errors() {
        let room = started_room();
        let r0 = RoundId::new("ROUND0").unwrap();
        assert_eq!(
            room.round_view(&r0, &pid("stranger")),
            Err(RoomError::NotAuthorized(pid("stranger")))
        );
        let missing = RoundId::new("NOPE00").unwrap();
        assert_eq!(
            room.round_view(&missing, &pid("guest")),
            Err(RoomError::RoundNotFound(missing))
        );
    }

    #[test]
    fn test_trade_requires_matching_round_reference() {
        let mut room = started_room();
        let order = TradeOrder {
            ticker: ticker("AAPL"),
            direction: Direction::Buy,
            shares: 3,
            round_index: 1,
            round_id: RoundId::new("ROUND0").unwrap(),
        };
        assert!(matches!(
            room.trade(&pid("guest"), order),
            Err(RoomError::StaleRound { index: 1, .. })
        ));
        assert_eq!(
            room.ledger().portfolio(&pid("guest")).unwrap().cash,
            dec!(100000)
        );
    }

    #[test]
    fn test_trade_before_start_is_rejected() {
        let mut room = Room::new(
            GameCode::new("ROOM").unwrap(),
            config(1),
            pid("owner"),
            "Owner",
            Utc::now(),
        );
        let order = TradeOrder {
            ticker: ticker("AAPL"),
            direction: Direction::Buy,
            shares: 1,
            round_index: 0,
            round_id: RoundId::new("ROUND0").unwrap(),
        };
        assert_eq!(room.trade(&pid("owner"), order), Err(RoomError::NotStarted));
    }

    #[test]
    fn test_trade_and_close_use_round_prices() {
        let mut room = started_room();
        let portfolio = room
            .trade(
                &pid("owner"),
                TradeOrder {
                    ticker: ticker("AAPL"),
                    direction: Direction::Buy,
                    shares: 3,
                    round_index: 0,
                    round_id: RoundId::new("ROUND0").unwrap(),
                },
            )
            .unwrap();
        assert_eq!(portfolio.cash, dec!(99700));

        let position_id = portfolio.positions[0].id;
        let after = room
            .close_position(&pid("owner"), position_id, &RoundId::new("ROUND1").unwrap())
            .unwrap();
        assert_eq!(after.cash, dec!(100030));
        assert!(after.positions.is_empty());
    }

    #[test]
    fn test_unknown_ticker_is_rejected() {
        let mut room = started_room();
        let err = room
            .trade(
                &pid("owner"),
                TradeOrder {
                    ticker: ticker("ZZZZ"),
                    direction: Direction::Buy,
                    shares: 1,
                    round_index: 0,
                    round_id: RoundId::new("ROUND0").unwrap(),
                },
            )
            .unwrap_err();
        assert_eq!(err, RoomError::TickerNotFound(ticker("ZZZZ")));
    }

    #[test]
    fn test_completion_marks_to_market_with_final_round_prices() {
        let mut room = started_room();
        room.trade(
            &pid("owner"),
            TradeOrder {
                ticker: ticker("AAPL"),
                direction: Direction::Buy,
                shares: 10,
                round_index: 0,
                round_id: RoundId::new("ROUND0").unwrap(),
            },
        )
        .unwrap();

        let r0 = RoundId::new("ROUND0").unwrap();
        assert!(room.complete_round(&pid("owner"), &r0).unwrap());
        assert!(!room.complete_round(&pid("owner"), &r0).unwrap());

        // 99000 cash + 10 * 110 (final round), not 10 * 100 (round 0)
        let history = &room.ledger().portfolio(&pid("owner")).unwrap().value_history;
        assert_eq!(history, &vec![dec!(100000), dec!(100100)]);
    }

    #[test]
    fn test_release_and_conclusion() {
        let mut room = started_room();
        let r0 = RoundId::new("ROUND0").unwrap();
        let r1 = RoundId::new("ROUND1").unwrap();

        room.complete_round(&pid("owner"), &r0).unwrap();
        room.complete_round(&pid("owner"), &r0).unwrap();
        assert!(!room.check_release(&r0).unwrap().is_released());

        room.complete_round(&pid("guest"), &r0).unwrap();
        assert_eq!(room.check_release(&r0).unwrap(), Release::Next(r1.clone()));
        assert_eq!(room.phase(), RoomPhase::Started);

        room.complete_round(&pid("owner"), &r1).unwrap();
        room.complete_round(&pid("guest"), &r1).unwrap();
        assert_eq!(room.check_release(&r1).unwrap(), Release::Terminal);
        assert_eq!(room.phase(), RoomPhase::Concluded);
    }

    #[test]
    fn test_leaderboard_ranks_by_latest_value() {
        let mut room = started_room();
        let r0 = RoundId::new("ROUND0").unwrap();
        room.trade(
            &pid("guest"),
            TradeOrder {
                ticker: ticker("AAPL"),
                direction: Direction::Buy,
                shares: 100,
                round_index: 0,
                round_id: r0.clone(),
            },
        )
        .unwrap();
        room.complete_round(&pid("owner"), &r0).unwrap();
        room.complete_round(&pid("guest"), &r0).unwrap();

        let board = room.leaderboard();
        assert_eq!(board.leaderboard[0].name, "Guest");
        assert_eq!(board.leaderboard[0].value, dec!(101000));
        assert_eq!(board.leaderboard[1].value, dec!(100000));
        assert_eq!(board.history.len(), 2);
        assert_eq!(board.history[1].values[&pid("guest")], dec!(101000));
    }

    #[test]
    fn test_history_keeps_players_with_the_same_name_apart() {
        let mut room = Room::new(
            GameCode::new("TWINS").unwrap(),
            config(1),
            pid("owner"),
            "Sam",
            Utc::now(),
        );
        room.join(pid("other"), "Sam").unwrap();
        room.begin_start(&pid("owner")).unwrap();
        room.commit_start(vec![round("ROUND0", dec!(100))], dec!(1000))
            .unwrap();

        let r0 = RoundId::new("ROUND0").unwrap();
        room.complete_round(&pid("owner"), &r0).unwrap();
        room.complete_round(&pid("other"), &r0).unwrap();

        let board = room.leaderboard();
        assert_eq!(board.leaderboard.len(), 2);
        assert!(board.leaderboard.iter().all(|e| e.name == "Sam"));
        let last = &board.history[1];
        assert_eq!(last.values.len(), 2);
        assert_eq!(last.values[&pid("owner")], dec!(1000));
        assert_eq!(last.values[&pid("other")], dec!(1000));
    }

    #[test]
    fn test_reservation_window_blocks_lobby_and_play() {
        let mut room = Room::new(
            GameCode::new("WINDOW").unwrap(),
            config(1),
            pid("owner"),
            "Owner",
            Utc::now(),
        );
        room.join(pid("guest"), "Guest").unwrap();
        room.begin_start(&pid("owner")).unwrap();

        assert_eq!(room.join(pid("late"), "Late"), Err(RoomError::AlreadyStarted));
        assert_eq!(room.join(pid("guest"), "Guest"), Ok(false));
        assert_eq!(room.phase(), RoomPhase::Created);

        let r0 = RoundId::new("ROUND0").unwrap();
        assert_eq!(room.check_release(&r0), Err(RoomError::NotStarted));
        assert_eq!(
            room.trade(
                &pid("guest"),
                TradeOrder {
                    ticker: ticker("AAPL"),
                    direction: Direction::Buy,
                    shares: 1,
                    round_index: 0,
                    round_id: r0,
                },
            ),
            Err(RoomError::NotStarted)
        );

        // Aborting reopens the lobby
        room.abort_start();
        assert_eq!(room.join(pid("late"), "Late"), Ok(true));
    }

    #[test]
    fn test_summary_lists_owner_and_players() {
        let room = started_room();
        let summary = room.summary();
        assert_eq!(summary.created_by, "Owner");
        assert_eq!(summary.players, vec!["Owner".to_string(), "Guest".to_string()]);
        assert!(summary.started);
        assert_eq!(summary.first_round_id.unwrap().as_str(), "ROUND0");
    }

    #[test]
    fn test_room_document_roundtrips_through_json() {
        let room = started_room();
        let json = serde_json::to_string(&room).unwrap();
        let back: Room = serde_json::from_str(&json).unwrap();
        assert_eq!(back, room);
    }
}
