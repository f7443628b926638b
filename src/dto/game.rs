use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::phase::VisibleGamePhase,
    state::state_machine::{GamePhase, GameRunningPhase, Snapshot},
};

/// Answer submitted by the player for the current question.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PlayRequest {
    /// Slot of the chosen answer (0 to 3).
    #[validate(range(max = 3))]
    pub index: usize,
}

/// View of the game state sent to front-ends.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct GameSnapshot {
    pub phase: VisibleGamePhase,
    /// Increments on every applied transition; stale SSE frames carry a lower value.
    pub version: usize,
    /// Correct answers in the current round.
    pub points: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub round_id: Option<Uuid>,
    /// 1-based position of the current question, 0 before the first question.
    pub question_number: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    /// Flag image to display with flag questions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flag: Option<String>,
    /// Answer choices in display order; empty outside a round.
    pub answers: Vec<String>,
    /// Correct slot, only revealed once the player has answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_answer: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index_responded: Option<usize>,
    /// Number of countries loaded.
    pub countries: usize,
}

impl From<Snapshot> for GameSnapshot {
    fn from(value: Snapshot) -> Self {
        let reveal = matches!(
            value.phase,
            GamePhase::Game(GameRunningPhase::Win | GameRunningPhase::Lose)
        );
        let (question, flag, answers, index_answer) = match value.question {
            Some(question) => (
                Some(question.text),
                question.flag,
                question.answers.to_vec(),
                reveal.then_some(question.index_answer),
            ),
            None => (None, None, Vec::new(), None),
        };

        Self {
            phase: value.phase.into(),
            version: value.version,
            points: value.points,
            round_id: value.round_id,
            question_number: value.question_number,
            question,
            flag,
            answers,
            index_answer,
            index_responded: value.index_responded,
            countries: value.countries,
        }
    }
}
