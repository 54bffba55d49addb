//! Administrator-only access.
//!
//! Two ways to guard a route:
//! 1. Layer-based middleware using [`require_admin`]
//! 2. Extractor-based, using [`RequireAdmin`] in the handler signature
//!
//! Both defer to [`authorize_admin`], which only looks at the principal's
//! role. Every role other than [`UserRole::Admin`] is refused the same way.

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use gerbang_core::{AppError, prefers_html};
use gerbang_models::{Principal, UserRole};
use tracing::warn;

use crate::middleware::auth::AuthUser;

/// Message shown when a non-administrator reaches an admin page.
pub const ADMIN_ONLY_MESSAGE: &str = "Akses ditolak. Hanya admin yang bisa mengakses halaman ini.";

/// Decide whether `principal` may enter an admin-only area.
///
/// A missing principal is refused like any other non-administrator.
pub fn authorize_admin(principal: Option<&Principal>) -> Result<(), AppError> {
    match principal.map(|p| p.role) {
        Some(UserRole::Admin) => Ok(()),
        Some(UserRole::User) | None => Err(AppError::forbidden(anyhow!(ADMIN_ONLY_MESSAGE))),
    }
}

/// Middleware that forwards administrators and answers everyone else with
/// 403.
///
/// The body is an HTML page for browsers and `{"error": ...}` otherwise;
/// both carry [`ADMIN_ONLY_MESSAGE`].
///
/// # Example
///
/// ```rust,ignore
/// let admin_routes = Router::new()
///     .route("/admin", get(admin_home))
///     .route_layer(middleware::from_fn(require_admin));
/// ```
pub async fn require_admin(req: Request, next: Next) -> Response {
    let principal = req.extensions().get::<AuthUser>().map(AuthUser::principal);

    match authorize_admin(principal) {
        Ok(()) => next.run(req).await,
        Err(err) => {
            warn!(
                user.id = ?principal.map(|p| p.id),
                path = %req.uri().path(),
                "Non-admin refused"
            );
            if prefers_html(req.headers()) {
                err.into_html_response()
            } else {
                err.into_response()
            }
        }
    }
}

/// Extractor for administrator-only handlers. Yields the administrator.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn handler(RequireAdmin(admin): RequireAdmin) -> Result<Json<T>, AppError> {
///     // Only administrators get here
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AuthUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthUser>() {
            Some(user) => {
                authorize_admin(Some(user.principal()))?;
                Ok(RequireAdmin(user.clone()))
            }
            None => Err(AppError::forbidden(anyhow!(ADMIN_ONLY_MESSAGE))),
        }
    }
}
