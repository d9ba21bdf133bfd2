use std::path::{Component, Path, PathBuf};

use axum::extract::{Path as UrlPath, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::state::AppState;

/// First path segment of every static asset URL.
pub const PREFIX: &str = "data";

/// Map a request path onto the assets directory, refusing anything that
/// could step outside it.
fn asset_path(root: &Path, path: &str) -> Option<PathBuf> {
    let relative = Path::new(path);
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }
    Some(root.join(relative))
}

pub async fn serve(State(state): State<AppState>, UrlPath(path): UrlPath<String>) -> Response {
    let Some(file) = asset_path(&state.assets_dir, &path) else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::metadata(&file).await {
        Ok(meta) if meta.is_file() => {}
        _ => return StatusCode::NOT_FOUND.into_response(),
    }

    match tokio::fs::read(&file).await {
        Ok(data) => {
            let mime = mime_guess::from_path(&file).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                data,
            )
                .into_response()
        }
        Err(e) => AppError::Internal(format!("reading {}: {}", file.display(), e)).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_paths_stay_under_root() {
        assert_eq!(
            asset_path(Path::new("/srv/data"), "css/site.css"),
            Some(PathBuf::from("/srv/data/css/site.css"))
        );
    }

    #[test]
    fn escaping_paths_are_refused() {
        let root = Path::new("/srv/data");
        assert_eq!(asset_path(root, "../secret"), None);
        assert_eq!(asset_path(root, "css/../../secret"), None);
        assert_eq!(asset_path(root, "/etc/passwd"), None);
    }
}
