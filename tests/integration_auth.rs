use axum::http::{StatusCode, header};
use gerbang::middleware::status::SUSPENDED_MESSAGE;
use gerbang::modules::auth::controller::INVALID_CREDENTIALS_MESSAGE;
use gerbang::testing::{TEST_PASSWORD, TestApp, body_string, browser_get, form_post};
use gerbang_models::{AccountStatus, UserRole};

fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

#[tokio::test]
async fn test_login_page_renders_token() {
    let app = TestApp::new();

    let response = app.send(browser_get("/login", None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (session, _) = app.session_after(&response).await.unwrap();
    let body = body_string(response).await;
    assert!(body.contains("name=\"_token\""));
    assert!(body.contains(&session.csrf_token));
}

#[tokio::test]
async fn test_login_success_rotates_session() {
    let app = TestApp::new();
    let admin = app.create_user(UserRole::Admin, AccountStatus::Active);
    let guest = app.guest_session().await;

    let request = form_post(
        "/login",
        Some(&guest),
        &[
            ("_token", guest.csrf_token.as_str()),
            ("email", admin.email.as_str()),
            ("password", TEST_PASSWORD),
        ],
    );
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");

    assert!(app.session_record(&guest.id).await.is_none());
    let (session, record) = app.session_after(&response).await.unwrap();
    assert_ne!(session.id, guest.id);
    assert_ne!(record.csrf_token, guest.csrf_token);
    assert_eq!(record.user_id, Some(admin.id));
}

#[tokio::test]
async fn test_user_login_lands_on_dashboard() {
    let app = TestApp::new();
    let user = app.create_user(UserRole::User, AccountStatus::Active);
    let guest = app.guest_session().await;

    let request = form_post(
        "/login",
        Some(&guest),
        &[
            ("_token", guest.csrf_token.as_str()),
            ("email", user.email.to_uppercase().as_str()),
            ("password", TEST_PASSWORD),
        ],
    );
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let (session, _) = app.session_after(&response).await.unwrap();
    let response = app.send(browser_get("/dashboard", Some(&session))).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_wrong_password_flashes_error() {
    let app = TestApp::new();
    let user = app.create_user(UserRole::User, AccountStatus::Active);
    let guest = app.guest_session().await;

    let request = form_post(
        "/login",
        Some(&guest),
        &[
            ("_token", guest.csrf_token.as_str()),
            ("email", user.email.as_str()),
            ("password", "wrong-password"),
        ],
    );
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");

    let record = app.session_record(&guest.id).await.unwrap();
    assert_eq!(record.user_id, None);
    assert_eq!(record.flash.errors["email"], vec![INVALID_CREDENTIALS_MESSAGE]);
    assert_eq!(record.flash.old["email"], user.email);

    let page = app.send(browser_get("/login", Some(&guest))).await;
    let body = body_string(page).await;
    assert!(body.contains(INVALID_CREDENTIALS_MESSAGE));
    assert!(body.contains(&user.email));
}

#[tokio::test]
async fn test_login_validation_errors() {
    let app = TestApp::new();
    let guest = app.guest_session().await;

    let request = form_post(
        "/login",
        Some(&guest),
        &[
            ("_token", guest.csrf_token.as_str()),
            ("email", "not-an-email"),
            ("password", ""),
        ],
    );
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let record = app.session_record(&guest.id).await.unwrap();
    assert!(record.flash.errors.contains_key("email"));
    assert!(record.flash.errors.contains_key("password"));
}

#[tokio::test]
async fn test_login_rejects_bad_token() {
    let app = TestApp::new();
    let user = app.create_user(UserRole::User, AccountStatus::Active);
    let guest = app.guest_session().await;

    let request = form_post(
        "/login",
        Some(&guest),
        &[
            ("_token", "forged"),
            ("email", user.email.as_str()),
            ("password", TEST_PASSWORD),
        ],
    );
    let response = app.send(request).await;

    assert_eq!(response.status().as_u16(), 419);
    let record = app.session_record(&guest.id).await.unwrap();
    assert_eq!(record.user_id, None);
}

#[tokio::test]
async fn test_suspended_account_cannot_log_in() {
    let app = TestApp::new();
    let user = app.create_user(UserRole::Admin, AccountStatus::Suspended);
    let guest = app.guest_session().await;

    let request = form_post(
        "/login",
        Some(&guest),
        &[
            ("_token", guest.csrf_token.as_str()),
            ("email", user.email.as_str()),
            ("password", TEST_PASSWORD),
        ],
    );
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    let record = app.session_record(&guest.id).await.unwrap();
    assert_eq!(record.user_id, None);
    assert_eq!(record.flash.errors["email"], vec![SUSPENDED_MESSAGE]);
}

#[tokio::test]
async fn test_signed_in_user_skips_login_page() {
    let app = TestApp::new();
    let admin = app.create_user(UserRole::Admin, AccountStatus::Active);
    let session = app.login_as(&admin).await;

    let response = app.send(browser_get("/login", Some(&session))).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/admin");
}

#[tokio::test]
async fn test_logout_destroys_session() {
    let app = TestApp::new();
    let user = app.create_user(UserRole::User, AccountStatus::Active);
    let session = app.login_as(&user).await;

    let request = form_post("/logout", Some(&session), &[("_token", session.csrf_token.as_str())]);
    let response = app.send(request).await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login");
    assert!(app.session_record(&session.id).await.is_none());

    let (next, record) = app.session_after(&response).await.unwrap();
    assert_eq!(record.user_id, None);
    assert_ne!(next.csrf_token, session.csrf_token);

    let response = app.send(browser_get("/dashboard", Some(&session))).await;
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_logout_requires_token() {
    let app = TestApp::new();
    let user = app.create_user(UserRole::User, AccountStatus::Active);
    let session = app.login_as(&user).await;

    let response = app.send(form_post("/logout", Some(&session), &[])).await;

    assert_eq!(response.status().as_u16(), 419);
    let record = app.session_record(&session.id).await.unwrap();
    assert_eq!(record.user_id, Some(user.id));
}
