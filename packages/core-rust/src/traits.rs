use async_trait::async_trait;

use crate::messages::RouteRecord;
use crate::reference::{BusTypeRef, DepotRef};

/// Errors from a reference-data fetch.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("lookup request failed: {0}")]
    Transport(String),
    #[error("lookup service returned status {status}")]
    Status { status: u16 },
    #[error("lookup response could not be decoded: {0}")]
    Decode(String),
}

/// Errors from sending a route record.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The request never completed (unreachable host, reset connection, timeout).
    #[error("route store unreachable: {0}")]
    Transport(String),
    #[error("route record could not be encoded: {0}")]
    Encode(String),
}

/// What came back from the route store once a send completed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkResponse {
    /// HTTP status, or `None` when the sink does not read it back.
    pub status: Option<u16>,
    /// Raw response body, if any.
    pub body: Option<String>,
}

/// Read side of the lookup service. Each call is made at most once per session.
#[async_trait]
pub trait LookupSource: Send + Sync {
    async fn fetch_depots(&self) -> Result<Vec<DepotRef>, LookupError>;

    async fn fetch_bus_types(&self) -> Result<Vec<BusTypeRef>, LookupError>;
}

/// Write side: the remote route store.
///
/// Implementations send exactly one request per call and never retry.
#[async_trait]
pub trait RouteSink: Send + Sync {
    async fn send(&self, record: &RouteRecord) -> Result<SinkResponse, SinkError>;
}
