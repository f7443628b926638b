use serde::Serialize;
use tracing::warn;

use crate::{
    dto::sse::{PhaseChangedEvent, ServerEvent},
    state::{SharedState, Snapshot},
};

const EVENT_PHASE_CHANGED: &str = "phase_changed";

/// Broadcast a game phase change notification.
pub fn broadcast_phase_changed(state: &SharedState, snapshot: &Snapshot) {
    let payload = PhaseChangedEvent(snapshot.clone().into());
    send_event(state, EVENT_PHASE_CHANGED, &payload);
}

fn send_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize SSE payload"),
    }
}
