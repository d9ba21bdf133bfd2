use askama::Template;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::db::models::Page;
use crate::error::{AppError, AppResult};
use crate::form;
use crate::routes::dispatch::is_reserved;
use crate::routes::pages::Html;
use crate::state::AppState;

/// Characters left as-is when a slug becomes a redirect target.
const SLUG_SAFE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Template)]
#[template(path = "admin.html")]
pub struct AdminTemplate {
    pub page: Page,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: Page,
}

/// Chrome for the admin and login screens; nothing is read from the store.
fn shell_page(state: &AppState, short_title: &str) -> Page {
    Page {
        short_title: short_title.to_string(),
        full_title: state.site.full_name.clone(),
        subtitle: "Admin Panel".to_string(),
        footer: state.site.footer.clone(),
        ..Page::default()
    }
}

pub fn admin_shell(state: &AppState) -> Response {
    Html(AdminTemplate {
        page: shell_page(state, "Admin"),
    })
    .into_response()
}

pub fn login_shell(state: &AppState) -> Response {
    Html(LoginTemplate {
        page: shell_page(state, "Login"),
    })
    .into_response()
}

/// Store the submitted page and send the browser to it.
pub async fn save(state: &AppState, pairs: &[(String, String)]) -> AppResult<Response> {
    let (page, failures) = form::decode_page(pairs);
    for failure in &failures {
        tracing::warn!(url = %page.url, "Form decode failure: {}", failure);
    }

    if is_reserved(&page.url) {
        return Err(AppError::ReservedSlug(page.url));
    }

    state.pages.upsert(&page).await?;
    tracing::info!(url = %page.url, visible = page.visible, "Saved page");

    let location = format!("/{}", utf8_percent_encode(&page.url, SLUG_SAFE));
    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}

pub async fn delete(state: &AppState, url: &str) -> AppResult<Response> {
    state.pages.remove(url).await?;
    tracing::info!(url = %url, "Deleted page");
    Ok(StatusCode::NO_CONTENT.into_response())
}

/// Verify the submitted credentials. No session is issued.
pub async fn authenticate(state: &AppState, pairs: &[(String, String)]) -> AppResult<Response> {
    let username = form::field(pairs, "username").unwrap_or_default().to_string();
    let password = form::field(pairs, "password").unwrap_or_default().to_string();
    let auth = state.auth.clone();

    // bcrypt verify blocks the calling thread.
    tokio::task::spawn_blocking(move || auth.authenticate(&username, &password))
        .await
        .map_err(|e| AppError::Internal(format!("Authentication task failed: {e}")))??;
    Ok((StatusCode::OK, "Authenticated").into_response())
}
