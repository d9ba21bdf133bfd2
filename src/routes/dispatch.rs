//! Method + path dispatch.
//!
//! Every request outside `/data/` lands here. The slug is the request path
//! without its leading `/`; the first row of [`ROUTES`] matching the
//! method and slug decides what happens.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use percent_encoding::percent_decode_str;

use crate::db::models::INDEX_URL;
use crate::error::AppResult;
use crate::form;
use crate::routes::{admin, assets, pages};
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::GET => Some(Verb::Get),
            Method::POST => Some(Verb::Post),
            Method::PUT => Some(Verb::Put),
            Method::DELETE => Some(Verb::Delete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum PathRule {
    Any,
    Exact(&'static str),
}

impl PathRule {
    fn matches(self, slug: &str) -> bool {
        match self {
            PathRule::Any => true,
            PathRule::Exact(expected) => slug == expected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Delete,
    Home,
    AdminShell,
    LoginShell,
    Edit,
    New,
    View,
    Authenticate,
    Save,
    Ignore,
}

const ROUTES: &[(Verb, PathRule, Action)] = &[
    (Verb::Delete, PathRule::Any, Action::Delete),
    (Verb::Get, PathRule::Exact(""), Action::Home),
    (Verb::Get, PathRule::Exact(INDEX_URL), Action::Home),
    (Verb::Get, PathRule::Exact("admin"), Action::AdminShell),
    (Verb::Get, PathRule::Exact("login"), Action::LoginShell),
    (Verb::Get, PathRule::Exact("edit"), Action::Edit),
    (Verb::Get, PathRule::Exact("new"), Action::New),
    (Verb::Get, PathRule::Any, Action::View),
    (Verb::Post, PathRule::Exact("auth"), Action::Authenticate),
    (Verb::Post, PathRule::Any, Action::Save),
    (Verb::Put, PathRule::Any, Action::Save),
];

pub fn resolve(method: &Method, slug: &str) -> Action {
    let Some(verb) = Verb::from_method(method) else {
        return Action::Ignore;
    };

    ROUTES
        .iter()
        .find(|(v, rule, _)| *v == verb && rule.matches(slug))
        .map(|(_, _, action)| *action)
        .unwrap_or(Action::Ignore)
}

/// Slugs a saved page may not use because a built-in route answers them
/// first. `index` is the home page's own slug and stays saveable.
pub fn is_reserved(slug: &str) -> bool {
    let under_assets = slug
        .strip_prefix(assets::PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));
    if slug.is_empty() || under_assets {
        return true;
    }

    ROUTES.iter().any(|(_, rule, action)| {
        *action != Action::Home && matches!(rule, PathRule::Exact(s) if *s == slug)
    })
}

pub fn slug(path: &str) -> String {
    let raw = path.strip_prefix('/').unwrap_or(path);
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> AppResult<Response> {
    let slug = slug(uri.path());
    let action = resolve(&method, &slug);
    tracing::debug!(%method, slug = %slug, ?action, "Dispatching request");

    let (pairs, failures) = form::form_pairs(uri.query(), &body);
    for failure in &failures {
        tracing::warn!("Form decode failure: {}", failure);
    }
    let target = form::field(&pairs, "p").unwrap_or_default();

    match action {
        Action::Delete => admin::delete(&state, target).await,
        Action::Home => pages::home(&state).await,
        Action::AdminShell => Ok(admin::admin_shell(&state)),
        Action::LoginShell => Ok(admin::login_shell(&state)),
        Action::Edit => pages::edit(&state, target).await,
        Action::New => Ok(pages::new_page()),
        Action::View => pages::view(&state, &slug).await,
        Action::Authenticate => admin::authenticate(&state, &pairs).await,
        Action::Save => admin::save(&state, &pairs).await,
        Action::Ignore => Ok(StatusCode::NO_CONTENT.into_response()),
    }
}
