//! Test bootstrap.
//!
//! [`TestApp`] builds the full router over in-memory stores, so integration
//! tests exercise the real middleware stack without Redis or PostgreSQL.
//! Sessions are planted straight into the store, which lets a test act as
//! any principal without going through the login form.
//!
//! ```ignore
//! let app = TestApp::new();
//! let admin = app.create_user(UserRole::Admin, AccountStatus::Active);
//! let session = app.login_as(&admin).await;
//!
//! let response = app.send(browser_get("/admin", Some(&session))).await;
//! assert_eq!(response.status(), StatusCode::OK);
//! ```

use std::sync::{Arc, OnceLock};

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use chrono::Utc;
use gerbang_config::SessionConfig;
use gerbang_core::hash_password_with_cost;
use gerbang_models::{AccountStatus, User, UserRole};
use gerbang_session::{MemorySessionStore, SessionId, SessionManager, SessionRecord, SessionStore};
use http_body_util::BodyExt;
use tower::ServiceExt;
use url::form_urlencoded;
use uuid::Uuid;

use crate::middleware::csrf::CSRF_HEADER;
use crate::modules::users::MemoryUserDirectory;
use crate::router::init_router;
use crate::state::AppState;

/// Password of every account created by [`TestApp::create_user`].
pub const TEST_PASSWORD: &str = "password";

fn test_password_hash() -> String {
    static HASH: OnceLock<String> = OnceLock::new();
    HASH.get_or_init(|| {
        hash_password_with_cost(TEST_PASSWORD, 4).expect("bcrypt accepts cost 4")
    })
    .clone()
}

/// A session planted in the store, plus what a client needs to use it.
#[derive(Debug, Clone)]
pub struct TestSession {
    pub id: SessionId,
    pub csrf_token: String,
    pub cookie: String,
}

/// The application wired to in-memory stores.
#[derive(Debug, Clone)]
pub struct TestApp {
    pub state: AppState,
    pub users: MemoryUserDirectory,
    pub sessions: MemorySessionStore,
    pub session_config: SessionConfig,
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

impl TestApp {
    pub fn new() -> Self {
        let users = MemoryUserDirectory::new();
        let sessions = MemorySessionStore::new();
        let session_config = SessionConfig::default();
        let manager = SessionManager::new(Arc::new(sessions.clone()), session_config.clone());
        let state = AppState::new(Arc::new(users.clone()), manager);

        Self {
            state,
            users,
            sessions,
            session_config,
        }
    }

    pub fn router(&self) -> Router {
        init_router(self.state.clone())
    }

    /// Send one request through a fresh router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        match self.router().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        }
    }

    /// Store an account with a unique email and [`TEST_PASSWORD`].
    pub fn create_user(&self, role: UserRole, status: AccountStatus) -> User {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let user = User {
            id,
            name: format!("Test {}", role),
            email: format!("test-{}@test.com", id),
            password_hash: test_password_hash(),
            role,
            status,
            created_at: now,
            updated_at: now,
        };
        self.users.insert(user.clone());
        user
    }

    /// A session authenticated as `user`.
    pub async fn login_as(&self, user: &User) -> TestSession {
        let mut record = SessionRecord::new();
        record.user_id = Some(user.id);
        self.plant(record).await
    }

    /// An anonymous session, e.g. to obtain a token for the login form.
    pub async fn guest_session(&self) -> TestSession {
        self.plant(SessionRecord::new()).await
    }

    async fn plant(&self, record: SessionRecord) -> TestSession {
        let id = SessionId::generate();
        self.sessions
            .save(&id, &record, self.session_config.lifetime())
            .await
            .expect("memory store never fails");

        TestSession {
            cookie: format!("{}={}", self.session_config.cookie_name, id),
            csrf_token: record.csrf_token,
            id,
        }
    }

    /// Read back a stored session.
    pub async fn session_record(&self, id: &SessionId) -> Option<SessionRecord> {
        self.sessions
            .load(id)
            .await
            .expect("memory store never fails")
    }

    /// Follow the `Set-Cookie` of `response` to the session it points at, as
    /// a browser would on its next request.
    pub async fn session_after(&self, response: &Response) -> Option<(TestSession, SessionRecord)> {
        let id = session_cookie_value(response, &self.session_config.cookie_name)
            .and_then(|value| SessionId::parse(&value))?;
        let record = self.session_record(&id).await?;
        let session = TestSession {
            cookie: format!("{}={}", self.session_config.cookie_name, id),
            csrf_token: record.csrf_token.clone(),
            id,
        };
        Some((session, record))
    }
}

/// Value of the cookie `name` set by `response`.
pub fn session_cookie_value(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

fn with_session(
    builder: axum::http::request::Builder,
    session: Option<&TestSession>,
) -> axum::http::request::Builder {
    match session {
        Some(session) => builder.header(header::COOKIE, &session.cookie),
        None => builder,
    }
}

/// A GET as a browser sends it.
pub fn browser_get(uri: &str, session: Option<&TestSession>) -> Request<Body> {
    with_session(Request::get(uri), session)
        .header(header::ACCEPT, "text/html,application/xhtml+xml")
        .body(Body::empty())
        .expect("valid request")
}

/// A GET from a script client.
pub fn json_get(uri: &str, session: Option<&TestSession>) -> Request<Body> {
    with_session(Request::get(uri), session)
        .header(header::ACCEPT, "application/json")
        .body(Body::empty())
        .expect("valid request")
}

/// A POST from a script client, sending the session token in the header.
pub fn json_post(uri: &str, session: Option<&TestSession>) -> Request<Body> {
    let mut builder = with_session(Request::post(uri), session)
        .header(header::ACCEPT, "application/json");
    if let Some(session) = session {
        builder = builder.header(CSRF_HEADER, &session.csrf_token);
    }
    builder.body(Body::empty()).expect("valid request")
}

/// A url-encoded form POST as a browser sends it.
pub fn form_post(uri: &str, session: Option<&TestSession>, fields: &[(&str, &str)]) -> Request<Body> {
    with_session(Request::post(uri), session)
        .header(header::ACCEPT, "text/html")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form_encode(fields)))
        .expect("valid request")
}

fn form_encode(fields: &[(&str, &str)]) -> String {
    form_urlencoded::Serializer::new(String::new())
        .extend_pairs(fields)
        .finish()
}

/// Collect a response body as text.
pub async fn body_string(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("in-memory body")
        .to_bytes();
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_encode() {
        let fields = [("email", "a+b@test.com"), ("name", "Budi S"), ("_token", "")];
        let encoded = form_encode(&fields);

        assert!(!encoded.contains(' '));
        let decoded: Vec<(String, String)> = form_urlencoded::parse(encoded.as_bytes())
            .into_owned()
            .collect();
        let expected: Vec<(String, String)> = fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert_eq!(decoded, expected);
    }
}
