use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::dao::models::CountryRecord;

/// Number of answer choices offered for every question.
pub const ANSWER_COUNT: usize = 4;

/// Minimal number of countries needed to build a question with distinct distractors.
pub const MIN_COUNTRIES: usize = ANSWER_COUNT;

/// Country as used by the game, independent of the upstream wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    /// Common (short) name, used as the answer text.
    pub name: String,
    /// URI of the flag image.
    pub flag: String,
    /// Capital cities, empty when the dataset has none for this country.
    pub capitals: Vec<String>,
}

impl Country {
    /// First listed capital, if any.
    pub fn capital(&self) -> Option<&str> {
        self.capitals.first().map(String::as_str)
    }
}

impl From<CountryRecord> for Country {
    fn from(value: CountryRecord) -> Self {
        Self {
            name: value.name.common,
            flag: value.flags.svg,
            capitals: value
                .capital
                .unwrap_or_default()
                .into_iter()
                .filter(|capital| !capital.trim().is_empty())
                .collect(),
        }
    }
}

/// Raised when a dataset is too small to play with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("at least {MIN_COUNTRIES} countries are required, got {count}")]
pub struct TooFewCountries {
    /// Number of countries actually provided.
    pub count: usize,
}

/// Immutable, shared list of countries guaranteed to hold at least [`MIN_COUNTRIES`] entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountryPool {
    countries: Arc<[Country]>,
}

impl CountryPool {
    /// Wrap a loaded dataset, rejecting it when it cannot serve a full question.
    pub fn new(countries: Vec<Country>) -> Result<Self, TooFewCountries> {
        if countries.len() < MIN_COUNTRIES {
            return Err(TooFewCountries {
                count: countries.len(),
            });
        }
        Ok(Self {
            countries: countries.into(),
        })
    }

    /// Number of countries in the pool.
    pub fn len(&self) -> usize {
        self.countries.len()
    }

    /// Whether the pool is empty; never true once constructed.
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Country at `index`, if in range.
    pub fn get(&self, index: usize) -> Option<&Country> {
        self.countries.get(index)
    }
}

impl AsRef<[Country]> for CountryPool {
    fn as_ref(&self) -> &[Country] {
        &self.countries
    }
}

/// Question currently displayed to the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    /// Text shown above the answers.
    pub text: String,
    /// Flag image to display, only set for flag questions.
    pub flag: Option<String>,
    /// Answer choices in display order.
    pub answers: [String; ANSWER_COUNT],
    /// Slot of the correct answer in [`Question::answers`].
    pub index_answer: usize,
}

/// Data owned by the state machine and mutated only through its transitions.
#[derive(Debug, Clone, Default)]
pub struct GameContext {
    /// Dataset loaded once; never cleared afterwards.
    pub all_countries: Option<CountryPool>,
    /// Correct answers given in the current round.
    pub points: u32,
    /// Identifier of the current round, regenerated each time a round starts.
    pub round_id: Option<Uuid>,
    /// 1-based position of the current question in the round.
    pub question_number: u32,
    /// Current question, absent outside active play.
    pub question: Option<Question>,
    /// Answer slot picked by the player for the current question.
    pub index_responded: Option<usize>,
}

impl GameContext {
    /// Reset the round-scoped fields when the game composite is (re)entered.
    pub(crate) fn start_round(&mut self) {
        self.points = 0;
        self.round_id = Some(Uuid::new_v4());
        self.question_number = 0;
    }

    /// Install a freshly generated question, clearing the previous answer.
    pub(crate) fn set_question(&mut self, question: Question) {
        self.question = Some(question);
        self.index_responded = None;
        self.question_number += 1;
    }
}
