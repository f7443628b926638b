pub mod game;
pub mod question;
mod sse;
pub mod state_machine;
pub mod transitions;

use std::{sync::Arc, time::Duration};

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{config::AppConfig, dao::country_source::CountrySource};

pub use self::sse::SseHub;
pub use self::state_machine::{GameEvent, GamePhase, Snapshot, TransitionError};
use self::state_machine::GameStateMachine;

/// Cheaply clonable handle on the application state.
pub type SharedState = Arc<AppState>;

/// Capacity of the phase-change broadcast channel.
const SSE_CAPACITY: usize = 16;

/// Central application state: the single game, its data source and the SSE hub.
pub struct AppState {
    game: RwLock<GameStateMachine>,
    countries: Arc<dyn CountrySource>,
    sse: SseHub,
    load_timeout: Duration,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    pub fn new(config: &AppConfig, countries: Arc<dyn CountrySource>) -> SharedState {
        let machine = match config.seed {
            Some(seed) => GameStateMachine::with_seed(seed),
            None => GameStateMachine::new(),
        };

        Arc::new(Self {
            game: RwLock::new(machine),
            countries,
            sse: SseHub::new(SSE_CAPACITY),
            load_timeout: config.load_timeout,
        })
    }

    /// Source used by load commands.
    pub fn country_source(&self) -> Arc<dyn CountrySource> {
        self.countries.clone()
    }

    /// Upper bound on a single dataset load.
    pub fn load_timeout(&self) -> Duration {
        self.load_timeout
    }

    /// Broadcast hub used for the SSE stream.
    pub fn sse(&self) -> &SseHub {
        &self.sse
    }

    /// Snapshot the current phase of the game state machine.
    pub async fn phase(&self) -> GamePhase {
        self.game.read().await.phase()
    }

    /// Snapshot phase and game data.
    pub async fn snapshot(&self) -> Snapshot {
        self.game.read().await.snapshot()
    }

    /// Apply an event under the write lock, returning the resulting snapshot.
    ///
    /// Events are applied one at a time in lock acquisition order.
    pub async fn apply(&self, event: GameEvent) -> Result<Snapshot, TransitionError> {
        let mut sm = self.game.write().await;
        let from = sm.phase();
        let kind = event.kind();

        match sm.send(event) {
            Ok(next) => {
                info!(?from, event = ?kind, ?next, "game transition applied");
                Ok(sm.snapshot())
            }
            Err(err) => {
                debug!(?from, event = ?kind, error = %err, "game transition rejected");
                Err(err)
            }
        }
    }
}
