//! Route entry client: reference-data loading, the `reqwest` gateway to the
//! lookup service and route store, and the submission pipeline.

pub mod config;
pub mod gateway;
pub mod lookup;
pub mod pipeline;
pub mod workflow;

pub use config::{GatewayConfig, ResetPolicy, StatusMode, SubmissionConfig, WorkflowConfig};
pub use gateway::HttpRouteGateway;
pub use lookup::load_reference_data;
pub use pipeline::{
    PendingSubmission, SentSubmission, SubmissionOutcome, SubmissionPhase, SubmissionPipeline,
};
pub use workflow::RouteWorkflow;
