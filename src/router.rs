use crate::logging::logging_middleware;
use crate::middleware::auth::authenticate;
use crate::modules::admin::router::init_admin_router;
use crate::modules::auth::router::init_auth_router;
use crate::modules::home::router::init_home_router;
use crate::state::AppState;
use axum::http::{HeaderValue, header};
use axum::{Json, Router, middleware, routing::get};
use gerbang_session::session_middleware;
use serde_json::{Value, json};
use tower_http::set_header::SetResponseHeaderLayer;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn init_router(state: AppState) -> Router {
    let web = Router::new()
        .merge(init_auth_router())
        .merge(init_home_router())
        .nest("/admin", init_admin_router())
        .layer(middleware::from_fn_with_state(state.clone(), authenticate))
        .layer(middleware::from_fn_with_state(
            state.sessions.clone(),
            session_middleware,
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ));

    Router::new()
        .route("/health", get(health))
        .merge(web)
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
}
