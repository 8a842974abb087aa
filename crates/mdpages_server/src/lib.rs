use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::{routing::get, Router};
use mdpages_core::{resolve, PageRenderer, Resolved};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::{DefaultMakeSpan, TraceLayer};

type Error = Box<dyn std::error::Error + Send + Sync>;

/// Everything a request needs to turn a path into a page.
#[derive(Debug)]
pub struct AppState {
    /// Root of the markdown tree.
    pub root: PathBuf,
    /// Files tried, in order, when a directory is requested.
    pub index_files: Vec<String>,
    pub renderer: PageRenderer,
}

async fn page_handler(State(state): State<Arc<AppState>>, uri: Uri) -> Response {
    let url_path = uri.path();

    let (file, url_base) = match resolve(&state.root, url_path, &state.index_files).await {
        Resolved::Page { file, url_base } => (file, url_base),
        Resolved::NotFound => {
            tracing::debug!(url_path, "No page for path");
            return StatusCode::NOT_FOUND.into_response();
        }
    };

    match state.renderer.render_file(&file, &url_base).await {
        Ok(page) => Html(page.into_html()).into_response(),
        Err(err) => {
            tracing::error!(?err, url_path, "Failed to render page");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
        }
    }
}

/// Builds the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(page_handler))
        .route("/*path", get(page_handler))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
}

/// Serves the markdown tree on `listener` until the server fails.
pub async fn serve(listener: tokio::net::TcpListener, state: Arc<AppState>) -> Result<(), Error> {
    tracing::info!(
        addr = %listener.local_addr()?,
        root = %state.root.display(),
        "Serving markdown tree"
    );

    axum::serve(listener, router(state)).await?;

    Ok(())
}
