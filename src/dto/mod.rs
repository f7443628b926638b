pub mod game;
pub mod health;
pub mod phase;
pub mod sse;
