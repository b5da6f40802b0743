//! Configuration for the lookup/route-store gateway and the submission pipeline.

use std::time::Duration;

/// Endpoint layout of the lookup service and route store.
///
/// No `Default` impl because the base URL has no sensible default.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Scheme, host and stage prefix, e.g. `https://api.example.com/Dev`.
    pub base_url: String,
    /// Path of the depot lookup, relative to `base_url`.
    pub depots_path: String,
    /// Path of the bus type lookup, relative to `base_url`.
    pub bus_types_path: String,
    /// Path the route record is posted to.
    pub submit_path: String,
    /// Upper bound on a whole request, connect included.
    pub request_timeout: Duration,
    pub connect_timeout: Duration,
}

impl GatewayConfig {
    /// Creates a config for `base_url` with the standard endpoint paths.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            depots_path: "/get/MSRTC-Lookup/Depots".to_string(),
            bus_types_path: "/get/MSRTC-Lookup/BusTypes".to_string(),
            submit_path: "/AddRouteWeb".to_string(),
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }

    /// Joins `base_url` and `path`, tolerating a trailing `/` on the base.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }
}

/// How the pipeline interprets the HTTP status of a completed send.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusMode {
    /// Non-2xx statuses settle as `Rejected`.
    #[default]
    Checked,
    /// The status is not inspected; every completed send settles as
    /// `StatusUnknown`.
    Opaque,
}

/// When the form is cleared after a submission settles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetPolicy {
    /// Clear the form on every settlement, failed or not.
    #[default]
    Always,
    /// Clear only after `Accepted` or `StatusUnknown`; keep the operator's
    /// input after `Rejected` or `Failed`.
    OnSuccess,
}

/// Submission pipeline behaviour.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionConfig {
    pub status_mode: StatusMode,
    pub reset_policy: ResetPolicy,
}

/// Everything needed to bootstrap a [`RouteWorkflow`](crate::RouteWorkflow)
/// against the HTTP gateway.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    pub gateway: GatewayConfig,
    pub submission: SubmissionConfig,
}

impl WorkflowConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            gateway: GatewayConfig::new(base_url),
            submission: SubmissionConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gateway_config_defaults() {
        let config = GatewayConfig::new("https://api.example.com/Dev");
        assert_eq!(config.depots_path, "/get/MSRTC-Lookup/Depots");
        assert_eq!(config.bus_types_path, "/get/MSRTC-Lookup/BusTypes");
        assert_eq!(config.submit_path, "/AddRouteWeb");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
    }

    #[test]
    fn url_joins_without_double_slash() {
        let config = GatewayConfig::new("http://localhost:8080/Dev/");
        assert_eq!(
            config.url("/AddRouteWeb"),
            "http://localhost:8080/Dev/AddRouteWeb"
        );
        assert_eq!(
            config.url("get/MSRTC-Lookup/Depots"),
            "http://localhost:8080/Dev/get/MSRTC-Lookup/Depots"
        );
    }

    #[test]
    fn submission_config_defaults() {
        let config = SubmissionConfig::default();
        assert_eq!(config.status_mode, StatusMode::Checked);
        assert_eq!(config.reset_policy, ResetPolicy::Always);
    }

    #[test]
    fn workflow_config_uses_defaults() {
        let config = WorkflowConfig::new("http://localhost");
        assert_eq!(config.gateway.base_url, "http://localhost");
        assert_eq!(config.submission.reset_policy, ResetPolicy::Always);
    }
}
