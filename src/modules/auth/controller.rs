use axum::{
    Form,
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
};
use gerbang_core::{AppError, verify_password};
use gerbang_models::UserRole;
use gerbang_session::Session;
use tracing::{info, instrument, warn};
use validator::Validate;

use super::model::{LoginForm, TokenForm};
use crate::middleware::auth::AuthUser;
use crate::middleware::csrf::ensure_token;
use crate::middleware::status::{LOGIN_PATH, SUSPENDED_MESSAGE};
use crate::state::AppState;
use crate::validator::field_messages;
use crate::views;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Email atau kata sandi salah.";

/// Landing page for a freshly signed-in account.
pub fn home_path(role: UserRole) -> &'static str {
    match role {
        UserRole::Admin => "/admin",
        UserRole::User => "/dashboard",
    }
}

/// Show the login form, with any errors flashed by the previous request.
#[instrument(skip_all)]
pub async fn show_login(session: Session, auth_user: Option<AuthUser>) -> Response {
    if let Some(user) = auth_user {
        return Redirect::to(home_path(user.role())).into_response();
    }

    Html(views::login_page(
        &session.token(),
        &session.errors(),
        session.old("email").as_deref(),
    ))
    .into_response()
}

/// Check credentials and start an authenticated session.
///
/// Every failure redirects back to the login form with a message flashed on
/// the offending field. Suspended accounts are refused with the same message
/// the status gate uses.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Redirect, AppError> {
    ensure_token(&session, &form.token)?;

    let back = |field: &str, message: &str| {
        session.flash_error(field, message);
        session.flash_old("email", form.email.clone());
        Redirect::to(LOGIN_PATH)
    };

    if let Err(errors) = form.validate() {
        session.flash_errors(field_messages(&errors));
        session.flash_old("email", form.email.clone());
        return Ok(Redirect::to(LOGIN_PATH));
    }

    let user = match state.users.find_by_email(form.email.trim()).await? {
        Some(user) if verify_password(&form.password, &user.password_hash)? => user,
        _ => {
            warn!(user.email = %form.email, "Login failed");
            return Ok(back("email", INVALID_CREDENTIALS_MESSAGE));
        }
    };

    if user.status.is_suspended() {
        warn!(user.id = %user.id, "Login refused for suspended account");
        return Ok(back("email", SUSPENDED_MESSAGE));
    }

    session.login(user.id).await?;
    info!(user.id = %user.id, user.role = %user.role, "Logged in");

    Ok(Redirect::to(home_path(user.role)))
}

/// End the authenticated session.
#[instrument(skip_all)]
pub async fn logout(
    session: Session,
    auth_user: Option<AuthUser>,
    Form(form): Form<TokenForm>,
) -> Result<Redirect, AppError> {
    ensure_token(&session, &form.token)?;

    session.logout();
    session.invalidate().await?;
    session.regenerate_token();
    info!(user.id = ?auth_user.map(|u| u.id()), "Logged out");

    Ok(Redirect::to(LOGIN_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_path() {
        assert_eq!(home_path(UserRole::Admin), "/admin");
        assert_eq!(home_path(UserRole::User), "/dashboard");
    }
}
