use std::time::Duration;

use thiserror::Error;
use tokio::{task::JoinHandle, time::timeout};
use tracing::{info, warn};

use crate::{
    dao::country_source::CountriesError,
    dto::game::GameSnapshot,
    error::ServiceError,
    state::{
        GameEvent, SharedState,
        game::{CountryPool, TooFewCountries},
        transitions::apply_with_broadcast,
    },
};

/// Reasons a dataset load fails. The game collapses all of them into one outcome.
#[derive(Debug, Error)]
enum LoadError {
    #[error(transparent)]
    Source(#[from] CountriesError),
    #[error(transparent)]
    Dataset(#[from] TooFewCountries),
    #[error("country load timed out after {0:?}")]
    Timeout(Duration),
}

/// Current game view.
pub async fn snapshot(state: &SharedState) -> GameSnapshot {
    state.snapshot().await.into()
}

/// Enter the loading phase and fetch the dataset in the background.
pub async fn load(state: &SharedState) -> Result<GameSnapshot, ServiceError> {
    let (snapshot, _task) = start_load(state).await?;
    Ok(snapshot)
}

/// Submit the player's answer for the current question.
pub async fn play(state: &SharedState, index: usize) -> Result<GameSnapshot, ServiceError> {
    let snapshot = apply_with_broadcast(state, GameEvent::Play(index)).await?;
    Ok(snapshot.into())
}

/// Move on after an answer: next question after a win, score screen after a loss.
pub async fn next(state: &SharedState) -> Result<GameSnapshot, ServiceError> {
    let snapshot = apply_with_broadcast(state, GameEvent::Next).await?;
    Ok(snapshot.into())
}

/// Start a new round from the score screen.
pub async fn try_again(state: &SharedState) -> Result<GameSnapshot, ServiceError> {
    let snapshot = apply_with_broadcast(state, GameEvent::TryAgain).await?;
    Ok(snapshot.into())
}

/// Apply the load command, then spawn the fetch whose outcome is fed back as an event.
async fn start_load(
    state: &SharedState,
) -> Result<(GameSnapshot, JoinHandle<()>), ServiceError> {
    let snapshot = apply_with_broadcast(state, GameEvent::Load).await?;
    let task = tokio::spawn(complete_load(state.clone()));
    Ok((snapshot.into(), task))
}

async fn complete_load(state: SharedState) {
    let event = match fetch_pool(&state).await {
        Ok(pool) => {
            info!(count = pool.len(), "country dataset loaded");
            GameEvent::CountriesLoaded(pool)
        }
        Err(err) => {
            warn!(error = %err, "country dataset load failed");
            GameEvent::LoadFailed
        }
    };

    if let Err(err) = apply_with_broadcast(&state, event).await {
        warn!(error = %err, "failed to deliver load outcome");
    }
}

async fn fetch_pool(state: &SharedState) -> Result<CountryPool, LoadError> {
    let limit = state.load_timeout();
    let countries = timeout(limit, state.country_source().fetch_countries())
        .await
        .map_err(|_| LoadError::Timeout(limit))??;
    Ok(CountryPool::new(countries)?)
}
