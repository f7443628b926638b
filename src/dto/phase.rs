use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::{GamePhase, GameRunningPhase};

/// Publicly visible game phase exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleGamePhase {
    /// Nothing loaded yet.
    Idle,
    /// Country dataset is being fetched.
    Loading,
    /// Country dataset could not be loaded.
    Error,
    /// A question awaits an answer.
    Playing,
    /// The last answer was correct.
    Win,
    /// The last answer was wrong.
    Lose,
    /// Final tally of the round.
    Score,
}

impl From<GamePhase> for VisibleGamePhase {
    fn from(value: GamePhase) -> Self {
        match value {
            GamePhase::Idle => VisibleGamePhase::Idle,
            GamePhase::Loading => VisibleGamePhase::Loading,
            GamePhase::Error => VisibleGamePhase::Error,
            GamePhase::Game(GameRunningPhase::Playing) => VisibleGamePhase::Playing,
            GamePhase::Game(GameRunningPhase::Win) => VisibleGamePhase::Win,
            GamePhase::Game(GameRunningPhase::Lose) => VisibleGamePhase::Lose,
            GamePhase::Score => VisibleGamePhase::Score,
        }
    }
}
