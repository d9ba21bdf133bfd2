//! End-to-end tests driving the full router against a temporary database.
//!
//! Tests cover:
//! - Public viewing, the home page and the visibility gate
//! - Saving, replacing and deleting pages over POST/PUT/DELETE
//! - Reserved slugs
//! - Administrator authentication
//! - Static assets under /data/
//! - Store failures surfacing as internal errors

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use osma::auth::Authenticator;
use osma::config::Config;
use osma::db;
use osma::db::models::{IndexTitles, NavEntry, Page, SiteConfig};
use osma::state::AppState;
use osma::store::admin::AdminStore;
use osma::store::pages::{PageStore, SqlitePageStore};
use osma::store::StoreError;

struct Site {
    _tmp: TempDir,
    app: Router,
    pages: Arc<SqlitePageStore>,
}

async fn setup() -> Site {
    let tmp = TempDir::new().unwrap();
    let assets_dir = tmp.path().join("data");
    std::fs::create_dir_all(&assets_dir).unwrap();
    std::fs::write(assets_dir.join("site.css"), "body { color: red; }").unwrap();

    let mut config = Config::default();
    config.admin.bcrypt_cost = 4;

    let pool = db::create_pool(&tmp.path().join("osma.db")).unwrap();
    let pages = Arc::new(SqlitePageStore::new(pool.clone()));
    let site = osma::bootstrap::run(&pool, pages.as_ref(), &config)
        .await
        .unwrap();

    let state = AppState {
        pages: pages.clone(),
        auth: Arc::new(Authenticator::new(AdminStore::new(pool), 4).unwrap()),
        site: Arc::new(site),
        assets_dir,
    };

    Site {
        _tmp: tmp,
        app: osma::routes::app(state),
        pages,
    }
}

async fn send(app: &Router, method: &str, uri: &str, form: Option<&str>) -> Response {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match form {
        Some(form) => {
            request = request.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(form.to_string())
        }
        None => Body::empty(),
    };
    app.clone().oneshot(request.body(body).unwrap()).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
}

// ============================================================================
// VIEWING
// ============================================================================

#[tokio::test]
async fn home_page_renders_seeded_content() {
    let site = setup().await;

    for uri in ["/", "/index"] {
        let response = send(&site.app, "GET", uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("Default Full Website Name"));
        assert!(html.contains("Default Subtitle"));
        assert!(html.contains("Default Footer"));
    }
}

#[tokio::test]
async fn saved_page_is_viewable_until_hidden() {
    let site = setup().await;

    let response = send(
        &site.app,
        "POST",
        "/about",
        Some("url=about&short_title=About&full_title=About+Us&body=Hello+there&visible=true"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/about");

    let html = body_text(send(&site.app, "GET", "/about", None).await).await;
    assert!(html.contains("About Us"));
    assert!(html.contains("Hello there"));
    assert!(html.contains("Default Footer"));

    let response = send(&site.app, "POST", "/about", Some("url=about&visible=false")).await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let response = send(&site.app, "GET", "/about", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Coming soon."));
    assert!(!html.contains("Hello there"));
    // navigation still lists the visible seeded pages
    assert!(html.contains("href=\"/index\""));
}

#[tokio::test]
async fn editing_bypasses_visibility() {
    let site = setup().await;
    send(
        &site.app,
        "POST",
        "/",
        Some("url=draft&short_title=Draft&full_title=Secret+Draft"),
    )
    .await;

    let html = body_text(send(&site.app, "GET", "/edit?p=draft", None).await).await;
    assert!(html.contains("Secret Draft"));
    assert!(html.contains("name=\"short_title\" value=\"Draft\""));
}

#[tokio::test]
async fn blank_form_and_shells_render() {
    let site = setup().await;

    let html = body_text(send(&site.app, "GET", "/new", None).await).await;
    assert!(html.contains("New Page"));

    let response = send(&site.app, "GET", "/admin", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Admin Panel"));

    let response = send(&site.app, "GET", "/login", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("name=\"password\""));
}

#[tokio::test]
async fn missing_page_is_not_found() {
    let site = setup().await;

    let response = send(&site.app, "GET", "/nowhere", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_text(response).await.contains("nowhere"));

    let response = send(&site.app, "GET", "/edit?p=nowhere", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// SAVING AND DELETING
// ============================================================================

#[tokio::test]
async fn put_replaces_page_entirely() {
    let site = setup().await;

    send(
        &site.app,
        "PUT",
        "/awards",
        Some("url=awards&short_title=Awards&subtitle=2023&items.0.category=Best+Game&items.0.title=Hades&visible=on"),
    )
    .await;
    let first = site.pages.find("awards").await.unwrap().unwrap();
    assert_eq!(first.items.len(), 1);
    assert_eq!(first.items[0].title, "Hades");
    assert!(first.visible);

    let response = send(
        &site.app,
        "PUT",
        "/awards",
        Some("url=awards&short_title=Awards+2024&visible=true"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let second = site.pages.find("awards").await.unwrap().unwrap();
    assert_eq!(second.short_title, "Awards 2024");
    assert!(second.subtitle.is_empty());
    assert!(second.items.is_empty());
}

#[tokio::test]
async fn edit_form_spare_item_row_is_not_stored() {
    let site = setup().await;

    let response = send(
        &site.app,
        "POST",
        "/",
        Some("url=about&short_title=About&visible=on&items.0.category=&items.0.title=&items.0.description=&items.0.runners_up=&items.0.image="),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(site.pages.find("about").await.unwrap().unwrap().items.is_empty());

    // Saving again with one filled row and the spare row keeps only the filled one.
    send(
        &site.app,
        "POST",
        "/",
        Some("url=about&items.0.category=Best+Game&items.0.title=Hades&items.1.category=&items.1.title=&items.1.description=&items.1.runners_up=&items.1.image="),
    )
    .await;
    let page = site.pages.find("about").await.unwrap().unwrap();
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].title, "Hades");

    let html = body_text(send(&site.app, "GET", "/edit?p=about", None).await).await;
    assert_eq!(html.matches("name=\"items.1.title\"").count(), 1);
}

#[tokio::test]
async fn saving_index_updates_index_titles() {
    let site = setup().await;

    let response = send(
        &site.app,
        "POST",
        "/index",
        Some("url=index&short_title=Home&full_title=Welcome+Home&visible=true"),
    )
    .await;
    assert_eq!(location(&response), "/index");

    assert_eq!(
        site.pages.index_titles().await.unwrap(),
        Some(IndexTitles {
            short_title: "Home".into(),
            full_title: "Welcome Home".into(),
        })
    );
    let html = body_text(send(&site.app, "GET", "/", None).await).await;
    assert!(html.contains("Welcome Home"));
}

#[tokio::test]
async fn lenient_decode_still_saves() {
    let site = setup().await;

    let response = send(
        &site.app,
        "POST",
        "/",
        Some("url=odd&short_title=Odd&visible=perhaps&colour=blue"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FOUND);

    let page = site.pages.find("odd").await.unwrap().unwrap();
    assert_eq!(page.short_title, "Odd");
    assert!(!page.visible);
}

#[tokio::test]
async fn reserved_slugs_are_rejected() {
    let site = setup().await;

    for slug in ["edit", "login", "auth", "new", "admin", "data", ""] {
        let form = format!("url={slug}&short_title=Shadow");
        let response = send(&site.app, "POST", "/", Some(form.as_str())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "slug {slug:?}");
        assert!(response.headers().get(header::LOCATION).is_none());
    }

    let admin_page = site.pages.find("admin").await.unwrap().unwrap();
    assert_eq!(admin_page.short_title, "Short Name");
}

#[tokio::test]
async fn delete_removes_page_and_tolerates_missing() {
    let site = setup().await;
    send(&site.app, "POST", "/", Some("url=about&visible=true")).await;

    let response = send(&site.app, "DELETE", "/?p=about", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(site.pages.find("about").await.unwrap().is_none());

    let response = send(&site.app, "DELETE", "/?p=about", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = send(&site.app, "DELETE", "/?p=never-was", None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn unsupported_methods_do_nothing() {
    let site = setup().await;
    let response = send(&site.app, "PATCH", "/index", Some("url=index&short_title=X")).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        site.pages.find("index").await.unwrap().unwrap().short_title,
        "Short Name"
    );
}

// ============================================================================
// AUTHENTICATION
// ============================================================================

#[tokio::test]
async fn authentication_accepts_seeded_admin() {
    let site = setup().await;
    let response = send(
        &site.app,
        "POST",
        "/auth",
        Some("username=admin&password=password"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn authentication_failures_are_indistinguishable() {
    let site = setup().await;

    let wrong_password = send(
        &site.app,
        "POST",
        "/auth",
        Some("username=admin&password=letmein"),
    )
    .await;
    let unknown_user = send(
        &site.app,
        "POST",
        "/auth",
        Some("username=mallory&password=password"),
    )
    .await;

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_text(wrong_password).await, body_text(unknown_user).await);
}

// ============================================================================
// STATIC ASSETS
// ============================================================================

#[tokio::test]
async fn assets_are_served_verbatim() {
    let site = setup().await;

    let response = send(&site.app, "GET", "/data/site.css", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/css"
    );
    assert_eq!(body_text(response).await, "body { color: red; }");

    let response = send(&site.app, "GET", "/data/missing.css", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = send(&site.app, "GET", "/data/../osma.db", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ============================================================================
// STORE FAILURES
// ============================================================================

/// Finds every page but cannot list navigation or write.
struct BrokenStore;

fn broken() -> StoreError {
    StoreError::Sql(rusqlite::Error::QueryReturnedNoRows)
}

#[async_trait]
impl PageStore for BrokenStore {
    async fn find(&self, url: &str) -> Result<Option<Page>, StoreError> {
        Ok(Some(Page {
            url: url.to_string(),
            visible: true,
            ..Page::default()
        }))
    }

    async fn list_nav(&self) -> Result<Vec<NavEntry>, StoreError> {
        Err(broken())
    }

    async fn upsert(&self, _page: &Page) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn insert_if_absent(&self, _page: &Page) -> Result<bool, StoreError> {
        Err(broken())
    }

    async fn remove(&self, _url: &str) -> Result<(), StoreError> {
        Err(broken())
    }

    async fn index_titles(&self) -> Result<Option<IndexTitles>, StoreError> {
        Err(broken())
    }
}

fn broken_app(tmp: &TempDir) -> Router {
    let pool = db::create_pool(&tmp.path().join("osma.db")).unwrap();
    db::ensure_schema(&pool).unwrap();
    osma::routes::app(AppState {
        pages: Arc::new(BrokenStore),
        auth: Arc::new(Authenticator::new(AdminStore::new(pool), 4).unwrap()),
        site: Arc::new(SiteConfig {
            full_name: "Full".into(),
            short_name: "Short".into(),
            footer: "Footer".into(),
        }),
        assets_dir: PathBuf::from("data"),
    })
}

#[tokio::test]
async fn store_errors_become_internal_errors() {
    let tmp = TempDir::new().unwrap();
    let app = broken_app(&tmp);

    let response = send(&app, "GET", "/about", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response)
        .await
        .starts_with("Navigation listing failed"));

    let response = send(&app, "POST", "/", Some("url=about&visible=true")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get(header::LOCATION).is_none());

    let response = send(&app, "DELETE", "/?p=about", None).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn bootstrap_survives_failing_page_seeds() {
    let tmp = TempDir::new().unwrap();
    let pool = db::create_pool(&tmp.path().join("osma.db")).unwrap();
    let mut config = Config::default();
    config.admin.bcrypt_cost = 4;

    let site = osma::bootstrap::run(&pool, &BrokenStore, &config)
        .await
        .unwrap();
    assert_eq!(site.footer, "Default Footer");
    assert!(AdminStore::new(pool).find("admin").unwrap().is_some());
}
