use rand::{SeedableRng, rngs::StdRng};
use thiserror::Error;
use tracing::error;
use uuid::Uuid;

use crate::state::{
    game::{ANSWER_COUNT, CountryPool, GameContext, Question},
    question::generate_question,
};

/// High-level phases the game can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Nothing loaded yet; waiting for the first load command.
    Idle,
    /// The country dataset is being fetched.
    Loading,
    /// The last load failed; another load command retries it.
    Error,
    /// A round is in progress and can be in one of the gameplay sub-phases.
    Game(GameRunningPhase),
    /// Final tally of the round that just ended.
    Score,
}

/// Fine-grained phase while a round is running.
///
/// Answer checking happens synchronously inside the play transition, so it never shows up here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameRunningPhase {
    /// A question is displayed and awaits an answer.
    Playing,
    /// The last answer was correct.
    Win,
    /// The last answer was wrong; the round is over.
    Lose,
}

/// Events that can be applied to the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// Fetch the country dataset (first load or retry after an error).
    Load,
    /// The fetch completed with a usable dataset.
    CountriesLoaded(CountryPool),
    /// The fetch failed for any reason.
    LoadFailed,
    /// The player picked the answer at the given slot.
    Play(usize),
    /// Move on from a win (next question) or a loss (score screen).
    Next,
    /// Start a new round from the score screen.
    TryAgain,
}

/// Payload-free discriminant of [`GameEvent`], used in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEventKind {
    /// See [`GameEvent::Load`].
    Load,
    /// See [`GameEvent::CountriesLoaded`].
    CountriesLoaded,
    /// See [`GameEvent::LoadFailed`].
    LoadFailed,
    /// See [`GameEvent::Play`].
    Play,
    /// See [`GameEvent::Next`].
    Next,
    /// See [`GameEvent::TryAgain`].
    TryAgain,
}

impl GameEvent {
    /// Discriminant of this event without its payload.
    pub fn kind(&self) -> GameEventKind {
        match self {
            GameEvent::Load => GameEventKind::Load,
            GameEvent::CountriesLoaded(_) => GameEventKind::CountriesLoaded,
            GameEvent::LoadFailed => GameEventKind::LoadFailed,
            GameEvent::Play(_) => GameEventKind::Play,
            GameEvent::Next => GameEventKind::Next,
            GameEvent::TryAgain => GameEventKind::TryAgain,
        }
    }
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The phase the state machine was in when the invalid event was received.
    pub from: GamePhase,
    /// The event that cannot be applied from this phase.
    pub event: GameEventKind,
}

/// Errors that leave the state machine untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// No transition is bound to the event in the current phase.
    #[error(transparent)]
    Invalid(#[from] InvalidTransition),
    /// A play command carried an answer slot that does not exist.
    #[error("answer index {index} is out of range (expected 0..{ANSWER_COUNT})")]
    AnswerOutOfRange {
        /// Rejected answer slot.
        index: usize,
    },
}

/// Snapshot of the current state machine state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Current phase of the state machine.
    pub phase: GamePhase,
    /// Version number of the state machine (increments on each transition).
    pub version: usize,
    /// Correct answers in the current round.
    pub points: u32,
    /// Identifier of the current round, once a round has started.
    pub round_id: Option<Uuid>,
    /// 1-based position of the current question in the round.
    pub question_number: u32,
    /// Current question, if any.
    pub question: Option<Question>,
    /// Answer slot picked for the current question, if any.
    pub index_responded: Option<usize>,
    /// Number of countries loaded.
    pub countries: usize,
}

/// Phase reached by a transition, before entry actions run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Loading,
    Error,
    /// Enter the game composite: fresh round, then playing.
    Game,
    /// Stay in the round and draw the next question.
    Playing,
    /// Compare the answer and resolve to win or lose.
    Checking,
    Score,
}

/// State machine driving the quiz: loading, questions, answer checking and scoring.
#[derive(Debug, Clone)]
pub struct GameStateMachine {
    phase: GamePhase,
    version: usize,
    context: GameContext,
    rng: StdRng,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }
}

impl GameStateMachine {
    /// Create a new state machine initialised in the idle state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a state machine whose question sequence is reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            phase: GamePhase::Idle,
            version: 0,
            context: GameContext::default(),
            rng,
        }
    }

    /// Inspect the current phase.
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    /// Borrow the game data.
    pub fn context(&self) -> &GameContext {
        &self.context
    }

    /// Create a snapshot of the current state machine state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            version: self.version,
            points: self.context.points,
            round_id: self.context.round_id,
            question_number: self.context.question_number,
            question: self.context.question.clone(),
            index_responded: self.context.index_responded,
            countries: self
                .context
                .all_countries
                .as_ref()
                .map_or(0, CountryPool::len),
        }
    }

    /// Apply an event, run the entry actions of the reached phase and return it.
    ///
    /// Rejected events leave phase, context and version unchanged.
    pub fn send(&mut self, event: GameEvent) -> Result<GamePhase, TransitionError> {
        let target = compute_transition(self.phase, &event)?;

        match event {
            GameEvent::CountriesLoaded(pool) => self.context.all_countries = Some(pool),
            GameEvent::Play(index) => self.context.index_responded = Some(index),
            _ => {}
        }

        self.phase = self.enter(target);
        self.version += 1;
        Ok(self.phase)
    }

    /// Run the entry actions for `target`, resolving transient phases.
    fn enter(&mut self, target: Target) -> GamePhase {
        match target {
            Target::Loading => GamePhase::Loading,
            Target::Error => GamePhase::Error,
            Target::Game => {
                self.context.start_round();
                self.enter(Target::Playing)
            }
            Target::Playing => {
                let Some(pool) = &self.context.all_countries else {
                    error!("entered playing without a loaded country pool");
                    return GamePhase::Error;
                };
                let question = generate_question(pool, &mut self.rng);
                self.context.set_question(question);
                GamePhase::Game(GameRunningPhase::Playing)
            }
            Target::Checking => {
                let expected = self.context.question.as_ref().map(|q| q.index_answer);
                if self.context.index_responded.is_some() && self.context.index_responded == expected
                {
                    self.context.points += 1;
                    GamePhase::Game(GameRunningPhase::Win)
                } else {
                    GamePhase::Game(GameRunningPhase::Lose)
                }
            }
            Target::Score => {
                self.context.question = None;
                self.context.index_responded = None;
                GamePhase::Score
            }
        }
    }
}

/// Compute the target of an event from a phase if the transition is valid.
fn compute_transition(phase: GamePhase, event: &GameEvent) -> Result<Target, TransitionError> {
    let target = match (phase, event) {
        (GamePhase::Idle | GamePhase::Error, GameEvent::Load) => Target::Loading,
        (GamePhase::Loading, GameEvent::CountriesLoaded(_)) => Target::Game,
        (GamePhase::Loading, GameEvent::LoadFailed) => Target::Error,
        (GamePhase::Game(GameRunningPhase::Playing), GameEvent::Play(index)) => {
            if *index >= ANSWER_COUNT {
                return Err(TransitionError::AnswerOutOfRange { index: *index });
            }
            Target::Checking
        }
        (GamePhase::Game(GameRunningPhase::Win), GameEvent::Next) => Target::Playing,
        (GamePhase::Game(GameRunningPhase::Lose), GameEvent::Next) => Target::Score,
        (GamePhase::Score, GameEvent::TryAgain) => Target::Game,
        (from, event) => {
            return Err(InvalidTransition {
                from,
                event: event.kind(),
            }
            .into());
        }
    };

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::game::Country;

    fn country(name: &str, capital: &str) -> Country {
        Country {
            name: name.into(),
            flag: format!("https://flagcdn.com/{}.svg", name.to_lowercase()),
            capitals: vec![capital.into()],
        }
    }

    fn pool() -> CountryPool {
        CountryPool::new(vec![
            country("France", "Paris"),
            country("Germany", "Berlin"),
            country("Italy", "Rome"),
            country("Spain", "Madrid"),
        ])
        .unwrap()
    }

    fn apply(sm: &mut GameStateMachine, event: GameEvent) -> GamePhase {
        sm.send(event).unwrap()
    }

    fn loaded() -> GameStateMachine {
        let mut sm = GameStateMachine::with_seed(42);
        apply(&mut sm, GameEvent::Load);
        apply(&mut sm, GameEvent::CountriesLoaded(pool()));
        sm
    }

    fn correct_index(sm: &GameStateMachine) -> usize {
        sm.context().question.as_ref().unwrap().index_answer
    }

    fn wrong_index(sm: &GameStateMachine) -> usize {
        (correct_index(sm) + 1) % ANSWER_COUNT
    }

    #[test]
    fn initial_state_is_idle() {
        let sm = GameStateMachine::new();
        assert_eq!(sm.phase(), GamePhase::Idle);
        assert_eq!(sm.snapshot().version, 0);
        assert!(sm.context().all_countries.is_none());
    }

    #[test]
    fn successful_load_starts_a_round() {
        let sm = loaded();
        assert_eq!(sm.phase(), GamePhase::Game(GameRunningPhase::Playing));

        let snapshot = sm.snapshot();
        assert_eq!(snapshot.points, 0);
        assert_eq!(snapshot.question_number, 1);
        assert_eq!(snapshot.countries, 4);
        assert!(snapshot.round_id.is_some());

        let question = snapshot.question.unwrap();
        assert!(question.index_answer < ANSWER_COUNT);
        assert_eq!(snapshot.index_responded, None);
    }

    #[test]
    fn failed_load_enters_error_and_can_retry() {
        let mut sm = GameStateMachine::with_seed(1);
        assert_eq!(apply(&mut sm, GameEvent::Load), GamePhase::Loading);
        assert_eq!(apply(&mut sm, GameEvent::LoadFailed), GamePhase::Error);
        assert!(sm.context().all_countries.is_none());
        assert!(sm.context().question.is_none());

        assert_eq!(apply(&mut sm, GameEvent::Load), GamePhase::Loading);
        assert_eq!(
            apply(&mut sm, GameEvent::CountriesLoaded(pool())),
            GamePhase::Game(GameRunningPhase::Playing)
        );
    }

    #[test]
    fn correct_answer_wins_and_scores() {
        let mut sm = loaded();
        let index = correct_index(&sm);

        assert_eq!(
            apply(&mut sm, GameEvent::Play(index)),
            GamePhase::Game(GameRunningPhase::Win)
        );
        assert_eq!(sm.context().points, 1);
        assert_eq!(sm.context().index_responded, Some(index));
    }

    #[test]
    fn wrong_answer_loses_without_scoring() {
        let mut sm = loaded();
        let index = wrong_index(&sm);

        assert_eq!(
            apply(&mut sm, GameEvent::Play(index)),
            GamePhase::Game(GameRunningPhase::Lose)
        );
        assert_eq!(sm.context().points, 0);
    }

    #[test]
    fn next_after_win_keeps_points_and_draws_a_question() {
        let mut sm = loaded();
        let round = sm.context().round_id;

        for expected_points in 1..=5 {
            let index = correct_index(&sm);
            apply(&mut sm, GameEvent::Play(index));
            assert_eq!(sm.context().points, expected_points);
            assert_eq!(
                apply(&mut sm, GameEvent::Next),
                GamePhase::Game(GameRunningPhase::Playing)
            );
            assert_eq!(sm.context().points, expected_points);
            assert_eq!(sm.context().index_responded, None);
            assert_eq!(sm.context().question_number, expected_points + 1);
        }
        assert_eq!(sm.context().round_id, round);
    }

    #[test]
    fn full_round_through_score_and_try_again() {
        let mut sm = loaded();
        let first_round = sm.context().round_id;

        let index = correct_index(&sm);
        apply(&mut sm, GameEvent::Play(index));
        apply(&mut sm, GameEvent::Next);

        let index = wrong_index(&sm);
        apply(&mut sm, GameEvent::Play(index));
        assert_eq!(apply(&mut sm, GameEvent::Next), GamePhase::Score);
        assert_eq!(sm.context().points, 1);
        assert!(sm.context().question.is_none());

        assert_eq!(
            apply(&mut sm, GameEvent::TryAgain),
            GamePhase::Game(GameRunningPhase::Playing)
        );
        assert_eq!(sm.context().points, 0);
        assert_eq!(sm.context().question_number, 1);
        assert!(sm.context().question.is_some());
        assert_ne!(sm.context().round_id, first_round);
        assert_eq!(sm.snapshot().countries, 4);
    }

    #[test]
    fn invalid_transition_returns_error() {
        let mut sm = GameStateMachine::new();
        let err = sm.send(GameEvent::Next).unwrap_err();
        assert_eq!(
            err,
            TransitionError::Invalid(InvalidTransition {
                from: GamePhase::Idle,
                event: GameEventKind::Next,
            })
        );
        assert_eq!(sm.phase(), GamePhase::Idle);
        assert_eq!(sm.snapshot().version, 0);
    }

    #[test]
    fn commands_are_rejected_while_loading() {
        let mut sm = GameStateMachine::new();
        apply(&mut sm, GameEvent::Load);
        let version = sm.snapshot().version;

        for event in [GameEvent::Load, GameEvent::Play(0), GameEvent::Next, GameEvent::TryAgain] {
            assert!(sm.send(event).is_err());
        }
        assert_eq!(sm.phase(), GamePhase::Loading);
        assert_eq!(sm.snapshot().version, version);
    }

    #[test]
    fn load_outcome_outside_loading_is_rejected() {
        let mut sm = loaded();
        let err = sm.send(GameEvent::LoadFailed).unwrap_err();
        assert!(matches!(
            err,
            TransitionError::Invalid(InvalidTransition {
                event: GameEventKind::LoadFailed,
                ..
            })
        ));
        assert_eq!(sm.phase(), GamePhase::Game(GameRunningPhase::Playing));
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let mut sm = loaded();
        let before = sm.snapshot();

        let err = sm.send(GameEvent::Play(4)).unwrap_err();
        assert_eq!(err, TransitionError::AnswerOutOfRange { index: 4 });
        assert_eq!(sm.snapshot(), before);
    }

    #[test]
    fn play_is_only_accepted_once_per_question() {
        let mut sm = loaded();
        let index = correct_index(&sm);
        apply(&mut sm, GameEvent::Play(index));

        let err = sm.send(GameEvent::Play(index)).unwrap_err();
        assert!(matches!(err, TransitionError::Invalid(_)));
        assert_eq!(sm.context().points, 1);
    }

    #[test]
    fn same_seed_yields_same_questions() {
        let first = loaded();
        let second = loaded();
        assert_eq!(first.context().question, second.context().question);
    }
}
