use crate::{
    error::ServiceError,
    services::sse_events::broadcast_phase_changed,
    state::{GameEvent, SharedState, Snapshot},
};

/// Apply an event to the game, then broadcast the resulting snapshot.
pub async fn apply_with_broadcast(
    state: &SharedState,
    event: GameEvent,
) -> Result<Snapshot, ServiceError> {
    let snapshot = state.apply(event).await?;
    broadcast_phase_changed(state, &snapshot);
    Ok(snapshot)
}
