use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Country Quiz Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::stream,
        crate::routes::game::get_game,
        crate::routes::game::load,
        crate::routes::game::play,
        crate::routes::game::next,
        crate::routes::game::try_again,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::game::GameSnapshot,
            crate::dto::game::PlayRequest,
            crate::dto::phase::VisibleGamePhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "game", description = "Game commands and state"),
        (name = "sse", description = "Server-sent events stream"),
    )
)]
pub struct ApiDoc;
