//! HTTP transport for the request handler.
//!
//! Routes:
//! - `GET  /ping`
//! - `POST /api/v1/prediction` with `{"features": [...]}`
//! - `GET  /api/v1/prediction?features=1.5,2.3,-0.5,1.0`
//! - `GET  /api/v1/model_info`
mod error;
mod query;
mod routes;

use std::{future::Future, io};

use axum::{routing::get, Router};
use log::info;
use tokio::net::TcpListener;

pub use error::{ApiError, ErrorBody};
pub use query::parse_features;
pub use routes::{PredictionRequest, StatusResponse};

use crate::handler::RequestHandler;

/// Builds the application router around a shared handler.
pub fn router(handler: RequestHandler) -> Router {
    Router::new()
        .route("/ping", get(routes::ping))
        .route(
            "/api/v1/prediction",
            get(routes::predict_query).post(routes::predict_body),
        )
        .route("/api/v1/model_info", get(routes::model_info))
        .with_state(handler)
}

/// Serves requests on `listener` until `shutdown` resolves.
///
/// # Errors
/// Returns the I/O error that stopped the accept loop.
pub async fn serve<F>(listener: TcpListener, handler: RequestHandler, shutdown: F) -> io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!("listening at {addr}");
    }

    axum::serve(listener, router(handler))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("server stopped");
    Ok(())
}
