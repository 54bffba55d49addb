use crate::middleware::{auth::require_auth, status::check_account_status};
use crate::modules::home::controller::dashboard;
use crate::state::AppState;
use axum::{Router, middleware, routing::get};

pub fn init_home_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route_layer(middleware::from_fn(require_auth))
        .route_layer(middleware::from_fn(check_account_status))
}
