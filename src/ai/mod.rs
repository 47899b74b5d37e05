pub mod client;
pub mod handlers;
pub mod prompts;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::ai_routes())
}
