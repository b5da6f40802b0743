//! HTTP gateway to the lookup service and the route store, built on `reqwest`.
//!
//! One `HttpRouteGateway` serves both seams: `GET` for the two lookups and a
//! single JSON `POST` per submission. No request is ever retried here.

use async_trait::async_trait;
use route_entry_core::messages::{BusTypesResponse, DepotsResponse};
use route_entry_core::{
    BusTypeRef, DepotRef, LookupError, LookupSource, RouteRecord, RouteSink, SinkError,
    SinkResponse,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::GatewayConfig;

/// `reqwest`-backed implementation of [`LookupSource`] and [`RouteSink`].
#[derive(Debug, Clone)]
pub struct HttpRouteGateway {
    client: reqwest::Client,
    config: GatewayConfig,
}

impl HttpRouteGateway {
    /// Builds the HTTP client with the configured timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: GatewayConfig) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, LookupError> {
        let url = self.config.url(path);
        debug!(%url, "fetching lookup");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LookupError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| LookupError::Transport(e.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|e| LookupError::Decode(e.to_string()))
    }
}

#[async_trait]
impl LookupSource for HttpRouteGateway {
    async fn fetch_depots(&self) -> Result<Vec<DepotRef>, LookupError> {
        let body: DepotsResponse = self.get_json(&self.config.depots_path).await?;
        Ok(body.into_refs())
    }

    async fn fetch_bus_types(&self) -> Result<Vec<BusTypeRef>, LookupError> {
        let body: BusTypesResponse = self.get_json(&self.config.bus_types_path).await?;
        Ok(body.into_refs())
    }
}

#[async_trait]
impl RouteSink for HttpRouteGateway {
    async fn send(&self, record: &RouteRecord) -> Result<SinkResponse, SinkError> {
        let url = self.config.url(&self.config.submit_path);
        debug!(%url, pk = %record.pk, "posting route record");

        let response = self
            .client
            .post(&url)
            .json(record)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    SinkError::Encode(e.to_string())
                } else {
                    SinkError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        // The send has completed at this point; a body that fails to stream
        // is reported as absent rather than as a transport failure.
        let body = response.text().await.ok().filter(|text| !text.is_empty());

        Ok(SinkResponse {
            status: Some(status),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_builds_client_from_config() {
        let gateway = HttpRouteGateway::new(GatewayConfig::new("http://127.0.0.1:9"))
            .expect("client should build");
        assert_eq!(gateway.config().submit_path, "/AddRouteWeb");
    }
}
