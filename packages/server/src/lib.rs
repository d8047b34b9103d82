//! # Beacon Dev Server
//!
//! Serves a static site for local editing and lets the author publish it.
//!
//! ```text
//! GET  /, /dir/, *.html ──▶ read page ──▶ inject publish widget
//! GET  anything else    ──▶ ServeDir (static assets)
//! POST /publish         ──▶ git status / add / commit / push ──▶ JSON reply
//! ```

mod publish;
mod widget;

pub use publish::{commit_message, publish, GitError, GitRunner, PublishReply, SystemGit};
pub use widget::{inject_publish_widget, PUBLISH_WIDGET, PUBLISH_WIDGET_ID};

use axum::{
    body::Body,
    extract::{Request, State},
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::post,
    Json, Router,
};
use percent_encoding::percent_decode_str;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub const DEFAULT_PORT: u16 = 8080;

pub struct ServerState {
    pub root: PathBuf,
    pub git: Arc<dyn GitRunner>,
}

impl ServerState {
    /// State that publishes with the system `git` inside `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let git = Arc::new(SystemGit::new(root.clone()));
        Self { root, git }
    }

    pub fn with_git(root: impl Into<PathBuf>, git: Arc<dyn GitRunner>) -> Self {
        Self { root: root.into(), git }
    }
}

pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .route("/publish", post(publish_handler))
        .fallback(page_or_asset)
        .with_state(state)
        .layer(CorsLayer::permissive())
}

pub async fn serve(state: ServerState, addr: &str) -> anyhow::Result<()> {
    let root = state.root.clone();
    let app = router(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("serving {} on http://{}", root.display(), listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn publish_handler(State(state): State<Arc<ServerState>>) -> Json<PublishReply> {
    let now = chrono::Local::now().naive_local();
    Json(publish(state.git.as_ref(), now).await)
}

async fn page_or_asset(State(state): State<Arc<ServerState>>, request: Request) -> Response {
    if request.method() != Method::GET && request.method() != Method::HEAD {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let Some(relative) = page_path(request.uri().path()) else {
        return serve_asset(&state.root, request).await;
    };
    let Some(relative) = relative else {
        return StatusCode::NOT_FOUND.into_response();
    };

    let file = state.root.join(&relative);
    match tokio::fs::read_to_string(&file).await {
        Ok(html) => {
            tracing::debug!("serving page {}", relative.display());
            Html(inject_publish_widget(&html)).into_response()
        }
        Err(e) => {
            tracing::debug!("page {} not served: {}", file.display(), e);
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

async fn serve_asset(root: &Path, request: Request) -> Response {
    match ServeDir::new(root).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

/// Map a request path onto a page file below the root.
///
/// `None` means the path is not a page and goes to the static handler;
/// `Some(None)` means it is a page path that escapes the root.
fn page_path(uri_path: &str) -> Option<Option<PathBuf>> {
    let decoded = percent_decode_str(uri_path).decode_utf8_lossy();
    let trimmed = decoded.trim_start_matches('/');

    let relative = if trimmed.is_empty() || trimmed.ends_with('/') {
        format!("{}index.html", trimmed)
    } else if trimmed.ends_with(".html") {
        trimmed.to_string()
    } else {
        return None;
    };

    let path = PathBuf::from(relative);
    let contained = path
        .components()
        .all(|component| matches!(component, Component::Normal(_)));
    Some(contained.then_some(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_path_mapping() {
        assert_eq!(page_path("/"), Some(Some(PathBuf::from("index.html"))));
        assert_eq!(page_path("/docs/"), Some(Some(PathBuf::from("docs/index.html"))));
        assert_eq!(page_path("/about.html"), Some(Some(PathBuf::from("about.html"))));
        assert_eq!(page_path("/my%20page.html"), Some(Some(PathBuf::from("my page.html"))));
        assert_eq!(page_path("/style.css"), None);
    }

    #[test]
    fn test_page_path_rejects_escape() {
        assert_eq!(page_path("/../secret.html"), Some(None));
        assert_eq!(page_path("/docs/%2e%2e/%2e%2e/secret.html"), Some(None));
    }
}
