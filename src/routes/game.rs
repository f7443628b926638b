use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::game::{GameSnapshot, PlayRequest},
    error::AppError,
    services::game_service,
    state::SharedState,
};

/// Routes driving the game state machine.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game", get(get_game))
        .route("/game/load", post(load))
        .route("/game/play", post(play))
        .route("/game/next", post(next))
        .route("/game/try-again", post(try_again))
}

/// Return the current game phase and data.
#[utoipa::path(
    get,
    path = "/game",
    tag = "game",
    responses((status = 200, description = "Current game", body = GameSnapshot))
)]
pub async fn get_game(State(state): State<SharedState>) -> Json<GameSnapshot> {
    Json(game_service::snapshot(&state).await)
}

/// Start loading the country dataset (first load or retry after an error).
#[utoipa::path(
    post,
    path = "/game/load",
    tag = "game",
    responses(
        (status = 200, description = "Loading started", body = GameSnapshot),
        (status = 409, description = "Not idle or in error")
    )
)]
pub async fn load(State(state): State<SharedState>) -> Result<Json<GameSnapshot>, AppError> {
    Ok(Json(game_service::load(&state).await?))
}

/// Answer the current question.
#[utoipa::path(
    post,
    path = "/game/play",
    tag = "game",
    request_body = PlayRequest,
    responses(
        (status = 200, description = "Answer checked", body = GameSnapshot),
        (status = 400, description = "Answer index out of range"),
        (status = 409, description = "No question awaiting an answer")
    )
)]
pub async fn play(
    State(state): State<SharedState>,
    Json(payload): Json<PlayRequest>,
) -> Result<Json<GameSnapshot>, AppError> {
    payload.validate()?;
    Ok(Json(game_service::play(&state, payload.index).await?))
}

/// Continue after an answer.
#[utoipa::path(
    post,
    path = "/game/next",
    tag = "game",
    responses(
        (status = 200, description = "Next question or score", body = GameSnapshot),
        (status = 409, description = "No answer to move on from")
    )
)]
pub async fn next(State(state): State<SharedState>) -> Result<Json<GameSnapshot>, AppError> {
    Ok(Json(game_service::next(&state).await?))
}

/// Start a new round from the score screen.
#[utoipa::path(
    post,
    path = "/game/try-again",
    tag = "game",
    responses(
        (status = 200, description = "New round started", body = GameSnapshot),
        (status = 409, description = "Not on the score screen")
    )
)]
pub async fn try_again(
    State(state): State<SharedState>,
) -> Result<Json<GameSnapshot>, AppError> {
    Ok(Json(game_service::try_again(&state).await?))
}
