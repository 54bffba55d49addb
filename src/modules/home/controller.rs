use axum::response::Html;
use gerbang_session::Session;
use tracing::instrument;

use crate::middleware::auth::AuthUser;
use crate::views;

/// Landing page for any signed-in, active account.
#[instrument(skip_all, fields(user.id = %auth_user.id()))]
pub async fn dashboard(auth_user: AuthUser, session: Session) -> Html<String> {
    Html(views::dashboard_page(auth_user.principal(), &session.token()))
}
