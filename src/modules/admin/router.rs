use crate::middleware::{
    csrf::require_csrf_header, role::require_admin, status::check_account_status,
};
use crate::modules::admin::controller::{activate_user, admin_home, list_users, suspend_user};
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{get, post},
};

/// Administrator routes. The status gate runs first, then the role gate,
/// then the anti-forgery check.
pub fn init_admin_router() -> Router<AppState> {
    Router::new()
        .route("/", get(admin_home))
        .route("/users", get(list_users))
        .route("/users/{id}/suspend", post(suspend_user))
        .route("/users/{id}/activate", post(activate_user))
        .route_layer(middleware::from_fn(require_csrf_header))
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn(check_account_status))
}
