//! Round completion barrier.
//!
//! Players signal that they finished a round; the next round id is only
//! disclosed once every authorized player has done so. Clients poll.

use crate::domain::value_objects::{PlayerId, RoundId};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Outcome of polling the barrier for one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Release {
    /// Still waiting on `remaining` players
    Pending { completed: usize, remaining: usize },
    /// Everyone finished; play continues with this round
    Next(RoundId),
    /// Everyone finished the last round
    Terminal,
}

impl Release {
    pub fn is_released(&self) -> bool {
        !matches!(self, Release::Pending { .. })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionBarrier {
    completed: HashMap<RoundId, IndexSet<PlayerId>>,
}

impl CompletionBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the player was not yet marked for this round
    pub fn mark_complete(&mut self, round_id: &RoundId, player: &PlayerId) -> bool {
        self.completed
            .entry(round_id.clone())
            .or_default()
            .insert(player.clone())
    }

    pub fn completed_count(&self, round_id: &RoundId) -> usize {
        self.completed.get(round_id).map_or(0, |s| s.len())
    }

    /// Released iff the completed set has reached `authorized`.
    /// `next` is the id of the following round, `None` for the last one.
    pub fn check_release(
        &self,
        round_id: &RoundId,
        authorized: usize,
        next: Option<&RoundId>,
    ) -> Release {
        let completed = self.completed_count(round_id);
        if completed < authorized {
            return Release::Pending {
                completed,
                remaining: authorized - completed,
            };
        }
        match next {
            Some(id) => Release::Next(id.clone()),
            None => Release::Terminal,
        }
    }
}
