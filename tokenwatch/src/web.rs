use std::net::SocketAddr;

use axum::{http::StatusCode, routing::get, Router};
use tokio::net::TcpListener;

pub(crate) const HEALTH_TEXT: &str = "El bot está activo y funcionando.";

async fn root() -> &'static str {
    HEALTH_TEXT
}

async fn fallback() -> (StatusCode, &'static str) {
    (StatusCode::NOT_FOUND, "Not found")
}

pub(crate) fn router() -> Router {
    Router::new().route("/", get(root)).fallback(fallback)
}

pub(crate) async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr).await?;
    tracing::info!("Servidor web escuchando en el puerto {}", listener.local_addr()?.port());
    Ok(listener)
}

/// Serves the health check until the listener fails.
pub(crate) async fn serve(listener: TcpListener) {
    if let Err(e) = axum::serve(listener, router()).await {
        tracing::error!("web server stopped {e:?}");
    }
}
