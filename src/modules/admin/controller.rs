use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, State},
    response::Html,
};
use gerbang_core::AppError;
use gerbang_models::{AccountStatus, Principal};
use gerbang_session::Session;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::middleware::role::RequireAdmin;
use crate::state::AppState;
use crate::views;

/// Administrator landing page listing every account.
#[instrument(skip_all, fields(user.id = %admin.id()))]
pub async fn admin_home(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
) -> Result<Html<String>, AppError> {
    let users: Vec<Principal> = state
        .users
        .list()
        .await?
        .iter()
        .map(|u| u.principal())
        .collect();

    Ok(Html(views::admin_page(
        admin.principal(),
        &users,
        &session.token(),
    )))
}

/// Every account as JSON.
#[instrument(skip_all)]
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<Principal>>, AppError> {
    let users = state.users.list().await?;
    Ok(Json(users.iter().map(|u| u.principal()).collect()))
}

/// Suspend an account. The owner is logged out on their next request.
#[instrument(skip_all, fields(target.id = %id))]
pub async fn suspend_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<Principal>, AppError> {
    if id == admin.id() {
        return Err(AppError::bad_request(anyhow!(
            "Anda tidak dapat membekukan akun sendiri."
        )));
    }

    let user = change_status(&state, id, AccountStatus::Suspended).await?;
    info!(admin.id = %admin.id(), user.id = %id, "Account suspended");
    Ok(Json(user))
}

/// Lift a suspension.
#[instrument(skip_all, fields(target.id = %id))]
pub async fn activate_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<Principal>, AppError> {
    let user = change_status(&state, id, AccountStatus::Active).await?;
    info!(admin.id = %admin.id(), user.id = %id, "Account activated");
    Ok(Json(user))
}

async fn change_status(
    state: &AppState,
    id: Uuid,
    status: AccountStatus,
) -> Result<Principal, AppError> {
    state
        .users
        .set_status(id, status)
        .await?
        .map(|u| u.principal())
        .ok_or_else(|| AppError::not_found(anyhow!("Pengguna {} tidak ditemukan.", id)))
}
