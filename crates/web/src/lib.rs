pub use crate::common::RouteResult;

use std::{env, net::SocketAddr, time::Duration};

use axum::{extract::Request, response::Response, Router};
use territory::{client::Client, database::Database};
use tokio::net::TcpListener;
use tower_http::{classify::ServerErrorsFailureClass, trace::TraceLayer};
use tracing::Span;

pub mod api;
pub mod common;
pub mod hateoas;
pub mod middleware;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug, Clone)]
pub struct WebState<D: Database> {
    pub territory_client: Client<D>,
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_address: SocketAddr,
}

impl WebConfig {
    /// Reads `WEB_BIND_ADDRESS`, falling back to [`DEFAULT_BIND_ADDRESS`].
    pub fn from_env() -> Result<Self, std::net::AddrParseError> {
        let bind_address = env::var("WEB_BIND_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string())
            .parse()?;
        Ok(Self { bind_address })
    }
}

pub fn router<D: Database>(state: WebState<D>) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .layer(
            TraceLayer::new_for_http()
                .on_request(|request: &Request, _span: &Span| {
                    log::info!("{} {}", request.method(), request.uri().path())
                })
                .on_response(|response: &Response, latency: Duration, _span: &Span| {
                    log::info!("-> {} in {} ms", response.status(), latency.as_millis())
                })
                .on_failure(
                    |class: ServerErrorsFailureClass, latency: Duration, _span: &Span| {
                        log::warn!("request failed: {} after {} ms", class, latency.as_millis())
                    },
                ),
        )
}

pub async fn start_web_server<D: Database>(
    config: WebConfig,
    state: WebState<D>,
) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_address).await?;
    log::info!("listening on {}", config.bind_address);
    axum::serve(listener, router(state).into_make_service()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bind_address_parses() {
        let address: SocketAddr = DEFAULT_BIND_ADDRESS.parse().unwrap();
        assert_eq!(address.port(), 8080);
    }
}
