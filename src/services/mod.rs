/// OpenAPI documentation generation.
pub mod documentation;
/// Game commands and dataset loading.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Server-Sent Events message generation.
pub mod sse_events;
/// Server-Sent Events broadcasting service.
pub mod sse_service;
