pub mod codec;
pub mod dto;
pub mod handlers;
pub mod id;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::read_router())
        .merge(handlers::write_router())
        // Anything outside the five known routes, unknown paths included.
        .fallback(handlers::method_not_allowed)
}
