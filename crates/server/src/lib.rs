pub mod bootstrap;
pub mod health;
pub mod products;
pub mod storefront;

use std::future::Future;

use axum::{body::Body, http::Request, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub use bootstrap::{bootstrap, bootstrap_with_config, Application, BootstrapError};

/// Full HTTP surface: product API, storefront page and health probe.
pub fn app(application: &Application) -> Router {
    Router::new()
        .merge(products::router(application.store.clone()))
        .merge(storefront::router(application.store.clone(), application.templates.clone()))
        .merge(health::router(application.db_pool.clone()))
        .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %req.method(),
                uri = %req.uri().path(),
                version = ?req.version(),
            )
        }))
}

pub async fn serve<F>(listener: TcpListener, router: Router, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router).with_graceful_shutdown(shutdown).await
}
