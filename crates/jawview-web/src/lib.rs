//! # Jawview Web
//!
//! Browser front end: one page with Previous/Next buttons, a jump field and
//! a status line, backed by a small JSON API and a PNG view of the current
//! pair.
//!
//! ## Routes
//! - `GET /` - the page
//! - `GET /api/state` - current status
//! - `POST /api/next`, `POST /api/prev` - step and re-render
//! - `POST /api/jump` - `{"index": "<text>"}`, non-numeric text is ignored
//! - `GET /view.png` - current pair, 404 when there are no pairs

pub mod page;
pub mod session;

pub use session::{Session, StatusView};

use std::sync::Arc;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jawview_renderer::RendererError;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Web errors
#[derive(Error, Debug)]
pub enum WebError {
    #[error("Render failed: {0}")]
    Render(#[from] RendererError),

    #[error("No pair to show")]
    NoFrame,

    #[error("Request task failed: {0}")]
    Task(String),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for web operations
pub type WebResult<T> = Result<T, WebError>;

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        let status = match self {
            Self::NoFrame => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log::error!("{}", self);
        }
        (status, self.to_string()).into_response()
    }
}

/// Listen address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 8080,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Shared handle to the session
#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<Session>>,
}

impl AppState {
    pub fn new(session: Session) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    /// Run `action` on the session off the async workers. The lock is held
    /// for the whole action, so requests are applied one at a time and no
    /// runtime worker ever waits on it.
    async fn with_session<T, F>(&self, action: F) -> WebResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Session) -> WebResult<T> + Send + 'static,
    {
        let session = Arc::clone(&self.session);
        tokio::task::spawn_blocking(move || action(&mut session.lock()))
            .await
            .map_err(|e| WebError::Task(e.to_string()))?
    }
}

/// Jump request body. The index is taken as typed, so both `"3"` and `3`
/// are accepted.
#[derive(Debug, Deserialize)]
pub struct JumpRequest {
    pub index: serde_json::Value,
}

impl JumpRequest {
    fn text(&self) -> String {
        match &self.index {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

async fn index_page() -> Html<&'static str> {
    Html(page::INDEX_HTML)
}

async fn state(State(app): State<AppState>) -> WebResult<Json<StatusView>> {
    app.with_session(|session| Ok(session.status())).await.map(Json)
}

async fn next(State(app): State<AppState>) -> WebResult<Json<StatusView>> {
    app.with_session(Session::next).await.map(Json)
}

async fn prev(State(app): State<AppState>) -> WebResult<Json<StatusView>> {
    app.with_session(Session::prev).await.map(Json)
}

async fn jump(State(app): State<AppState>, Json(request): Json<JumpRequest>) -> WebResult<Json<StatusView>> {
    let text = request.text();
    app.with_session(move |session| session.jump(&text)).await.map(Json)
}

async fn view(State(app): State<AppState>) -> WebResult<Response> {
    let frame = app
        .with_session(|session| session.frame().map(<[u8]>::to_vec).ok_or(WebError::NoFrame))
        .await?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        frame,
    )
        .into_response())
}

/// Build the application router
pub fn router(app: AppState) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/api/state", get(state))
        .route("/api/next", post(next))
        .route("/api/prev", post(prev))
        .route("/api/jump", post(jump))
        .route("/view.png", get(view))
        .with_state(app)
}

/// Serve the session until the process is stopped
pub async fn serve(config: &ServerConfig, session: Session) -> WebResult<()> {
    let listener = tokio::net::TcpListener::bind(config.address()).await?;
    log::info!("Serving jaw viewer on http://{}", listener.local_addr()?);
    axum::serve(listener, router(AppState::new(session))).await?;
    Ok(())
}
