//! Server-rendered pages.
//!
//! Deliberately plain HTML built with `format!`. Every dynamic value goes
//! through [`escape_html`].

use std::collections::BTreeMap;

use gerbang_core::errors::escape_html;
use gerbang_models::Principal;

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html lang=\"id\">\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n</head>\n<body>\n{body}\n</body>\n</html>\n",
        title = escape_html(title),
    )
}

fn field_errors(errors: &BTreeMap<String, Vec<String>>, field: &str) -> String {
    errors
        .get(field)
        .map(|messages| {
            messages
                .iter()
                .map(|m| format!("<p class=\"error\" data-field=\"{field}\">{}</p>\n", escape_html(m)))
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn logout_form(csrf_token: &str) -> String {
    format!(
        "<form method=\"post\" action=\"/logout\">\n<input type=\"hidden\" name=\"_token\" value=\"{}\">\n<button type=\"submit\">Keluar</button>\n</form>",
        escape_html(csrf_token)
    )
}

pub fn login_page(
    csrf_token: &str,
    errors: &BTreeMap<String, Vec<String>>,
    old_email: Option<&str>,
) -> String {
    let body = format!(
        "<h1>Masuk</h1>\n<form method=\"post\" action=\"/login\">\n<input type=\"hidden\" name=\"_token\" value=\"{token}\">\n<label>Email <input type=\"email\" name=\"email\" value=\"{email}\"></label>\n{email_errors}<label>Kata sandi <input type=\"password\" name=\"password\"></label>\n{password_errors}<button type=\"submit\">Masuk</button>\n</form>",
        token = escape_html(csrf_token),
        email = escape_html(old_email.unwrap_or("")),
        email_errors = field_errors(errors, "email"),
        password_errors = field_errors(errors, "password"),
    );
    layout("Masuk", &body)
}

pub fn dashboard_page(principal: &Principal, csrf_token: &str) -> String {
    let body = format!(
        "<h1>Dasbor</h1>\n<p>Selamat datang, {name}.</p>\n{logout}",
        name = escape_html(&principal.name),
        logout = logout_form(csrf_token),
    );
    layout("Dasbor", &body)
}

pub fn admin_page(admin: &Principal, users: &[Principal], csrf_token: &str) -> String {
    let rows: String = users
        .iter()
        .map(|u| {
            format!(
                "<tr data-user-id=\"{id}\"><td>{name}</td><td>{email}</td><td>{role}</td><td>{status}</td></tr>\n",
                id = u.id,
                name = escape_html(&u.name),
                email = escape_html(&u.email),
                role = u.role,
                status = u.status,
            )
        })
        .collect();

    let body = format!(
        "<h1>Panel Admin</h1>\n<p>Masuk sebagai {name}.</p>\n<meta name=\"csrf-token\" content=\"{token}\">\n<table>\n<tr><th>Nama</th><th>Email</th><th>Peran</th><th>Status</th></tr>\n{rows}</table>\n{logout}",
        name = escape_html(&admin.name),
        token = escape_html(csrf_token),
        logout = logout_form(csrf_token),
    );
    layout("Panel Admin", &body)
}
