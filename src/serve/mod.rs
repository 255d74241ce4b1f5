//! Local HTTP server for the rendered treemap.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::error::{ModtreeError, Result};
use crate::util::output;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListenAddr {
    pub bind: String,
    pub browse_url: String,
}

/// `:18888` binds every interface and browses loopback; `host:port` is
/// used as given.
pub fn parse_listen_addr(addr: &str) -> Result<ListenAddr> {
    let invalid = || ModtreeError::InvalidAddress(addr.to_string());
    let (host, port) = addr.trim().rsplit_once(':').ok_or_else(invalid)?;
    let port: u16 = port.parse().map_err(|_| invalid())?;

    let (bind_host, browse_host) = match host {
        "" => ("0.0.0.0", "127.0.0.1"),
        "0.0.0.0" => ("0.0.0.0", "127.0.0.1"),
        other => (other, other),
    };
    Ok(ListenAddr {
        bind: format!("{bind_host}:{port}"),
        browse_url: format!("http://{browse_host}:{port}"),
    })
}

#[derive(Debug, Clone)]
pub struct AppState {
    pub page: Arc<String>,
    pub tree_json: Arc<String>,
}

impl AppState {
    pub fn new(page: String, tree_json: String) -> Self {
        Self {
            page: Arc::new(page),
            tree_json: Arc::new(tree_json),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/tree", get(tree_handler))
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.page.as_ref().clone())
}

async fn tree_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/json")],
        state.tree_json.as_ref().clone(),
    )
}

pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Binds `addr`, optionally opens the browser, and serves until killed.
pub fn run(state: AppState, addr: &str, open_browser: bool) -> Result<()> {
    let listen = parse_listen_addr(addr)?;
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let listener = TcpListener::bind(listen.bind.as_str()).await?;
        info!(bind = %listen.bind, url = %listen.browse_url, "server started");
        output::info(&format!("Listening on Addr {addr}"));
        if open_browser {
            if let Err(err) = open::that(&listen.browse_url) {
                output::warn(&format!(
                    "could not open browser at {}: {}",
                    listen.browse_url, err
                ));
            }
        }
        serve(listener, state).await
    })
}
