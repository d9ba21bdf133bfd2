pub mod admin;
pub mod assets;
pub mod dispatch;
pub mod pages;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Static assets get their own route; every other request goes through
/// the dispatch table.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/data/{*path}", get(assets::serve))
        .fallback(dispatch::dispatch)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
