use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use gerbang_core::{AppError, prefers_html};
use gerbang_models::{Principal, UserRole};
use gerbang_session::Session;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::state::AppState;

/// The authenticated principal of the current request.
///
/// Inserted into request extensions by [`authenticate`]. Extracting
/// `AuthUser` rejects guests with 401; extract `Option<AuthUser>` to accept
/// both.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn role(&self) -> UserRole {
        self.0.role
    }

    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| AppError::unauthorized(anyhow!("Silakan masuk terlebih dahulu.")))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<AuthUser>().cloned())
    }
}

/// Resolve the session's account through the user directory and attach it
/// to the request as an [`AuthUser`].
///
/// Guests pass through untouched. A session that points at an account that
/// no longer exists is logged out.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = req
        .extensions()
        .get::<Session>()
        .cloned()
        .ok_or_else(|| AppError::internal(anyhow!("Session middleware is not installed")))?;

    if let Some(user_id) = session.user_id() {
        match state.users.find_by_id(user_id).await? {
            Some(user) => {
                debug!(user.id = %user.id, user.role = %user.role, "Authenticated request");
                req.extensions_mut().insert(AuthUser(user.principal()));
            }
            None => {
                warn!(user.id = %user_id, "Session refers to a missing account, logging out");
                session.logout();
            }
        }
    }

    Ok(next.run(req).await)
}

/// Only let authenticated principals through.
///
/// Browsers are redirected to the login page; other clients get 401.
pub async fn require_auth(req: Request, next: Next) -> Response {
    if req.extensions().get::<AuthUser>().is_some() {
        return next.run(req).await;
    }

    if prefers_html(req.headers()) {
        Redirect::to("/login").into_response()
    } else {
        AppError::unauthorized(anyhow!("Silakan masuk terlebih dahulu.")).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gerbang_models::AccountStatus;

    fn principal(role: UserRole) -> Principal {
        Principal {
            id: Uuid::new_v4(),
            name: "Tester".to_string(),
            email: "tester@example.com".to_string(),
            role,
            status: AccountStatus::Active,
        }
    }

    #[test]
    fn test_accessors() {
        let p = principal(UserRole::Admin);
        let auth_user = AuthUser(p.clone());

        assert_eq!(auth_user.id(), p.id);
        assert_eq!(auth_user.email(), "tester@example.com");
        assert_eq!(auth_user.role(), UserRole::Admin);
        assert_eq!(auth_user.principal(), &p);
    }
}
