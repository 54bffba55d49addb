//! Anti-forgery token checks.
//!
//! Forms post the token as `_token` and handlers call [`ensure_token`].
//! Script clients send it in the `x-csrf-token` header, which
//! [`require_csrf_header`] checks on every state-changing request.

use anyhow::anyhow;
use axum::{
    extract::Request,
    http::{HeaderName, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use gerbang_core::AppError;
use gerbang_session::Session;
use tracing::warn;

pub const CSRF_HEADER: HeaderName = HeaderName::from_static("x-csrf-token");

const MISMATCH_MESSAGE: &str = "Halaman kedaluwarsa. Muat ulang lalu coba lagi.";

/// Fail with 419 unless `candidate` matches the session's token.
pub fn ensure_token(session: &Session, candidate: &str) -> Result<(), AppError> {
    if session.verify_token(candidate) {
        Ok(())
    } else {
        Err(AppError::token_mismatch(anyhow!(MISMATCH_MESSAGE)))
    }
}

/// Middleware checking the `x-csrf-token` header on unsafe methods.
pub async fn require_csrf_header(req: Request, next: Next) -> Response {
    if matches!(*req.method(), Method::GET | Method::HEAD | Method::OPTIONS) {
        return next.run(req).await;
    }

    let Some(session) = req.extensions().get::<Session>().cloned() else {
        return AppError::internal(anyhow!("Session middleware is not installed")).into_response();
    };

    let candidate = req
        .headers()
        .get(&CSRF_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    match ensure_token(&session, candidate) {
        Ok(()) => next.run(req).await,
        Err(err) => {
            warn!(path = %req.uri().path(), "Anti-forgery token mismatch");
            err.into_response()
        }
    }
}
