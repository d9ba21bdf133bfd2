use askama::Template;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::db::models::{Page, INDEX_URL};
use crate::error::{AppError, AppResult};
use crate::page::{load_page, visibility_gate};
use crate::state::AppState;

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page: Page,
}

#[derive(Template)]
#[template(path = "view.html")]
pub struct ViewTemplate {
    pub page: Page,
}

#[derive(Template)]
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub page: Page,
}

/// Wrapper to render askama templates as axum responses
pub struct Html<T: Template>(pub T);

impl<T: Template> IntoResponse for Html<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                body,
            )
                .into_response(),
            Err(e) => AppError::Render(e).into_response(),
        }
    }
}

pub async fn home(state: &AppState) -> AppResult<Response> {
    let page = load_page(state.pages.as_ref(), &state.site, INDEX_URL).await?;
    Ok(Html(IndexTemplate { page }).into_response())
}

/// Public page view; hidden pages render as "Coming soon.".
pub async fn view(state: &AppState, url: &str) -> AppResult<Response> {
    let page = load_page(state.pages.as_ref(), &state.site, url).await?;
    Ok(Html(ViewTemplate {
        page: visibility_gate(page),
    })
    .into_response())
}

pub async fn edit(state: &AppState, url: &str) -> AppResult<Response> {
    let page = load_page(state.pages.as_ref(), &state.site, url).await?;
    Ok(Html(EditTemplate { page }).into_response())
}

pub fn new_page() -> Response {
    Html(EditTemplate {
        page: Page {
            short_title: "New Page".to_string(),
            ..Page::default()
        },
    })
    .into_response()
}
