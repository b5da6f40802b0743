//! The route entry workflow: reference data, the form being edited, and the
//! submission pipeline, driven from a single timeline.

use std::sync::Arc;

use anyhow::Context as _;
use route_entry_core::{LookupSource, ReferenceDataCache, RouteFormState, RouteSink};
use tracing::info;

use crate::config::{SubmissionConfig, WorkflowConfig};
use crate::gateway::HttpRouteGateway;
use crate::lookup::load_reference_data;
use crate::pipeline::{PendingSubmission, SentSubmission, SubmissionOutcome, SubmissionPipeline};

/// One operator session.
///
/// Edits are accepted only while the pipeline is idle; while a submission is
/// outstanding [`RouteWorkflow::form_mut`] returns `None`.
#[derive(Debug)]
pub struct RouteWorkflow {
    reference: Arc<ReferenceDataCache>,
    form: RouteFormState,
    pipeline: SubmissionPipeline,
}

impl RouteWorkflow {
    /// Creates a session over already-loaded reference data.
    #[must_use]
    pub fn new(
        reference: Arc<ReferenceDataCache>,
        sink: Arc<dyn RouteSink>,
        config: SubmissionConfig,
    ) -> Self {
        Self {
            form: RouteFormState::new(Arc::clone(&reference)),
            reference,
            pipeline: SubmissionPipeline::new(sink, config),
        }
    }

    /// Loads reference data from `lookup` (once) and creates the session.
    pub async fn start(
        lookup: &dyn LookupSource,
        sink: Arc<dyn RouteSink>,
        config: SubmissionConfig,
    ) -> Self {
        let reference = Arc::new(load_reference_data(lookup).await);
        Self::new(reference, sink, config)
    }

    /// Builds the HTTP gateway from `config` and starts a session against it.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built. Lookup failures
    /// are not errors; they leave the affected option set empty.
    pub async fn bootstrap(config: WorkflowConfig) -> anyhow::Result<Self> {
        let gateway = Arc::new(
            HttpRouteGateway::new(config.gateway.clone())
                .context("failed to build HTTP client for route gateway")?,
        );
        info!(base_url = %config.gateway.base_url, "starting route entry session");
        Ok(Self::start(gateway.as_ref(), gateway.clone(), config.submission).await)
    }

    #[must_use]
    pub fn reference(&self) -> &ReferenceDataCache {
        &self.reference
    }

    #[must_use]
    pub fn form(&self) -> &RouteFormState {
        &self.form
    }

    /// Mutable access to the form, or `None` while a submission is in flight.
    pub fn form_mut(&mut self) -> Option<&mut RouteFormState> {
        if self.pipeline.is_loading() {
            None
        } else {
            Some(&mut self.form)
        }
    }

    #[must_use]
    pub fn pipeline(&self) -> &SubmissionPipeline {
        &self.pipeline
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pipeline.is_loading()
    }

    /// Starts a submission of the current form. `None` if one is already outstanding.
    pub fn begin_submit(&mut self) -> Option<PendingSubmission> {
        self.pipeline.begin(&self.form)
    }

    /// Settles a submission started by [`RouteWorkflow::begin_submit`] once its
    /// send has completed.
    pub fn complete_submit(&mut self, sent: SentSubmission) -> SubmissionOutcome {
        self.pipeline.settle(sent, &mut self.form)
    }

    /// Submits the current form: snapshot, one send, settle.
    ///
    /// Returns `None` if a submission is already outstanding. If the returned
    /// future is dropped before it completes, the form is left as it was and
    /// the workflow accepts the next submit.
    pub async fn submit(&mut self) -> Option<SubmissionOutcome> {
        let sent = self.begin_submit()?.send().await;
        Some(self.complete_submit(sent))
    }

    /// The last settled outcome, until acknowledged.
    #[must_use]
    pub fn notice(&self) -> Option<&SubmissionOutcome> {
        self.pipeline.notice()
    }

    pub fn acknowledge(&mut self) -> Option<SubmissionOutcome> {
        self.pipeline.acknowledge()
    }
}
