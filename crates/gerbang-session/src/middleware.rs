//! Session middleware.
//!
//! [`session_middleware`] resolves the session cookie to a [`Session`] before
//! the handler runs and persists it afterwards. Handlers and other middleware
//! get the handle through the [`Session`] extractor.

use std::sync::Arc;

use anyhow::anyhow;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use gerbang_config::SessionConfig;
use gerbang_core::AppError;
use tracing::{debug, error};

use crate::id::SessionId;
use crate::memory::MemorySessionStore;
use crate::redis::RedisSessionStore;
use crate::session::Session;
use crate::store::{SessionError, SessionStore};

/// Store plus cookie settings, shared by every request.
#[derive(Debug, Clone)]
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(store: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self { store, config }
    }

    /// Manager backed by a fresh in-process store.
    pub fn memory(config: SessionConfig) -> Self {
        Self::new(Arc::new(MemorySessionStore::new()), config)
    }

    /// Manager backed by Redis at `config.redis_url`.
    pub async fn redis(config: SessionConfig) -> Result<Self, SessionError> {
        let store = RedisSessionStore::new(&config.redis_url, config.key_prefix.clone()).await?;
        Ok(Self::new(Arc::new(store), config))
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Resume the session named by `cookie`, or start a new one when the
    /// cookie is missing, malformed, unknown or expired.
    pub async fn load_or_start(&self, cookie: Option<&str>) -> Result<Session, SessionError> {
        if let Some(id) = cookie.and_then(SessionId::parse) {
            if let Some(record) = self.store.load(&id).await? {
                return Ok(Session::resume(self.store.clone(), id, record));
            }
            debug!(session.id = %id, "Unknown session cookie, starting a new session");
        }

        Ok(Session::start(self.store.clone()))
    }

    /// The cookie that points the client at `session`.
    pub fn cookie(&self, session: &Session) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), session.id().to_string()))
            .path("/")
            .http_only(true)
            .secure(self.config.secure_cookie)
            .same_site(SameSite::Lax)
            .build()
    }
}

/// Load the session, run the rest of the stack, then persist the session and
/// refresh the cookie.
///
/// # Usage with axum::middleware::from_fn_with_state
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/login", get(show_login))
///     .layer(middleware::from_fn_with_state(manager.clone(), session_middleware));
/// ```
pub async fn session_middleware(
    State(manager): State<SessionManager>,
    mut req: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(req.headers());
    let cookie = jar
        .get(&manager.config.cookie_name)
        .map(|c| c.value().to_string());

    let session = match manager.load_or_start(cookie.as_deref()).await {
        Ok(session) => session,
        Err(e) => {
            error!(error = %e, "Failed to load session");
            return AppError::internal(e).into_response();
        }
    };

    req.extensions_mut().insert(session.clone());
    let response = next.run(req).await;

    if let Err(e) = session.save(manager.config.lifetime()).await {
        error!(session.id = %session.id(), error = %e, "Failed to save session");
        return AppError::internal(e).into_response();
    }

    (jar.add(manager.cookie(&session)), response).into_response()
}

impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::internal(anyhow!("Session middleware is not installed")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request as HttpRequest, StatusCode, header},
        middleware,
        routing::get,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn app(manager: SessionManager) -> Router {
        Router::new()
            .route(
                "/flash",
                get(|session: Session| async move {
                    session.flash_error("email", "Akun tidak ditemukan");
                    "flashed"
                }),
            )
            .route(
                "/read",
                get(|session: Session| async move { session.error("email").unwrap_or_default() }),
            )
            .layer(middleware::from_fn_with_state(manager, session_middleware))
    }

    fn session_cookie(response: &Response) -> String {
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_sets_http_only_cookie() {
        let manager = SessionManager::memory(SessionConfig::default());
        let response = app(manager)
            .oneshot(HttpRequest::get("/read").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(set_cookie.starts_with("gerbang_session="));
        assert!(set_cookie.contains("HttpOnly"));
        assert!(set_cookie.contains("SameSite=Lax"));
    }

    #[tokio::test]
    async fn test_flash_reaches_next_request_only() {
        let manager = SessionManager::memory(SessionConfig::default());
        let app = app(manager);

        let first = app
            .clone()
            .oneshot(HttpRequest::get("/flash").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let cookie = session_cookie(&first);

        let second = app
            .clone()
            .oneshot(
                HttpRequest::get("/read")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(session_cookie(&second), cookie);
        assert_eq!(body(second).await, "Akun tidak ditemukan");

        let third = app
            .oneshot(
                HttpRequest::get("/read")
                    .header(header::COOKIE, &cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(body(third).await, "");
    }

    #[tokio::test]
    async fn test_unknown_cookie_starts_new_session() {
        let manager = SessionManager::memory(SessionConfig::default());
        let bogus = format!("gerbang_session={}", "x".repeat(40));

        let response = app(manager)
            .oneshot(
                HttpRequest::get("/read")
                    .header(header::COOKIE, &bogus)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_ne!(session_cookie(&response), bogus);
    }

    #[tokio::test]
    async fn test_extractor_without_layer_is_internal_error() {
        let app = Router::new().route("/", get(|_session: Session| async { "unreachable" }));

        let response = app
            .oneshot(HttpRequest::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
