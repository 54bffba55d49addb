//! Application error type.
//!
//! [`AppError`] pairs an HTTP status with an [`anyhow::Error`]. Handlers and
//! middleware return it directly; axum turns it into a JSON body of the form
//! `{"error": "<message>"}`. Browser-facing code can call
//! [`AppError::into_html_response`] instead.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn unprocessable<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::FORBIDDEN, err)
    }

    /// Status 419, returned when a form's anti-forgery token does not match
    /// the session's.
    pub fn token_mismatch<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        // from_u16 accepts any code in 100..=999.
        let status = StatusCode::from_u16(419).unwrap_or(StatusCode::FORBIDDEN);
        Self::new(status, err)
    }

    /// The message that is shown to the client.
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    /// Render the error as a small HTML page instead of JSON.
    pub fn into_html_response(self) -> Response {
        let title = self
            .status
            .canonical_reason()
            .unwrap_or("Error")
            .to_string();
        let page = format!(
            "<!doctype html>\n<html lang=\"id\">\n<head><meta charset=\"utf-8\"><title>{code} {title}</title></head>\n<body>\n<h1>{code}</h1>\n<p>{message}</p>\n</body>\n</html>\n",
            code = self.status.as_u16(),
            title = escape_html(&title),
            message = escape_html(&self.message()),
        );

        (self.status, Html(page)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.error.to_string()
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

/// Escape the five characters that matter inside HTML text and attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use http_body_util::BodyExt;

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_constructors_set_status() {
        assert_eq!(AppError::forbidden(anyhow!("x")).status, StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::unauthorized(anyhow!("x")).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::not_found(anyhow!("x")).status, StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::bad_request(anyhow!("x")).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::token_mismatch(anyhow!("x")).status.as_u16(), 419);
    }

    #[test]
    fn test_from_io_error_is_internal() {
        let err: AppError = std::io::Error::other("disk").into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "disk");
    }

    #[tokio::test]
    async fn test_json_response_body() {
        let response = AppError::forbidden(anyhow!("Nope")).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["error"], "Nope");
    }

    #[tokio::test]
    async fn test_html_response_escapes_message() {
        let response = AppError::forbidden(anyhow!("<b>Nope</b>")).into_html_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = body_string(response).await;
        assert!(body.contains("<h1>403</h1>"));
        assert!(body.contains("&lt;b&gt;Nope&lt;/b&gt;"));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"'"), "&quot;&#39;");
        assert_eq!(escape_html("plain"), "plain");
    }
}
