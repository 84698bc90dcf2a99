//! HTTP request API (axum)

pub mod routes;
pub mod server;
pub mod state;

pub use routes::create_router;
pub use server::{serve, ServerError};
pub use state::AppState;
