//! Suspended-account logout.
//!
//! When the current principal's account is suspended, the session is ended
//! and the client is sent back to the login page with an explanation flashed
//! on the `email` field. Everyone else passes through unchanged.

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use gerbang_core::AppError;
use gerbang_models::Principal;
use gerbang_session::{Session, SessionError};
use tracing::{error, info};

use crate::middleware::auth::AuthUser;

/// Message flashed on the `email` field after a forced logout.
pub const SUSPENDED_MESSAGE: &str = "Akun Anda telah dibekukan. Hubungi administrator.";

/// Where suspended principals are sent.
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusDecision {
    /// Let the request continue.
    Forward,
    /// End the session and redirect to the login page.
    Suspend,
}

/// Decide what to do with a request from `principal`. Only the account
/// status matters; the role is never consulted.
pub fn evaluate(principal: Option<&Principal>) -> StatusDecision {
    match principal {
        Some(p) if p.is_suspended() => StatusDecision::Suspend,
        _ => StatusDecision::Forward,
    }
}

/// End `session` for a suspended account.
///
/// In order: forget the authenticated account, destroy the stored session,
/// issue a fresh anti-forgery token for the now anonymous session, and flash
/// [`SUSPENDED_MESSAGE`] for the login page.
pub async fn terminate(session: &Session) -> Result<(), SessionError> {
    session.logout();
    session.invalidate().await?;
    session.regenerate_token();
    session.flash_error("email", SUSPENDED_MESSAGE);
    Ok(())
}

/// Middleware that logs out suspended accounts.
///
/// Must run after `authenticate` and before any role check.
pub async fn check_account_status(req: Request, next: Next) -> Response {
    let principal = req.extensions().get::<AuthUser>().map(AuthUser::principal);

    if evaluate(principal) == StatusDecision::Forward {
        return next.run(req).await;
    }

    let user_id = principal.map(|p| p.id);
    let Some(session) = req.extensions().get::<Session>().cloned() else {
        error!("Session middleware is not installed");
        return AppError::internal(anyhow::anyhow!("Session middleware is not installed"))
            .into_response();
    };

    if let Err(e) = terminate(&session).await {
        error!(user.id = ?user_id, error = %e, "Failed to end suspended session");
        return AppError::internal(e).into_response();
    }

    info!(user.id = ?user_id, "Suspended account logged out");
    Redirect::to(LOGIN_PATH).into_response()
}
