use serde::Deserialize;
use validator::Validate;

/// Body of `POST /login`.
#[derive(Deserialize, Validate)]
pub struct LoginForm {
    #[serde(rename = "_token", default)]
    pub token: String,
    #[serde(default)]
    #[validate(email(message = "Format email tidak valid."))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Kata sandi wajib diisi."))]
    pub password: String,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Body of forms that only carry the anti-forgery token.
#[derive(Debug, Deserialize)]
pub struct TokenForm {
    #[serde(rename = "_token", default)]
    pub token: String,
}
