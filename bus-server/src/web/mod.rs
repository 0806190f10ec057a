//! Web layer for bus route lookup.
//!
//! Exposes the lookup over HTTP as JSON and as plain text.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
