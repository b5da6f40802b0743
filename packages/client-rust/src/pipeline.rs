//! Submission pipeline: snapshot, send once, settle, reset.
//!
//! State machine: `Idle -> Submitting -> Settled(outcome) -> Idle`.
//!
//! The settled state is transient. [`SubmissionPipeline::settle`] applies the
//! reset policy, returns to `Idle` in the same step, and keeps the outcome as a
//! notice until the caller acknowledges it.
//!
//! Submitting is split into three steps so the send itself never borrows the
//! pipeline:
//! 1. [`SubmissionPipeline::begin`] takes the guard and snapshots the form
//! 2. [`PendingSubmission::send`] consumes the pending submission, performs the
//!    single network send, and yields a [`SentSubmission`]
//! 3. [`SubmissionPipeline::settle`] records that outcome and resets the form
//!
//! A `begin` while a submission is outstanding returns `None` and changes
//! nothing. That guard is the only concurrency control in the workflow.
//!
//! The outstanding submission lives in state shared with its in-flight guard,
//! so dropping a pending or sent submission (a cancelled `submit` future, for
//! instance) returns the pipeline to `Idle` without settling it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use route_entry_core::{RouteFormState, RouteRecord, RouteSink};
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::config::{ResetPolicy, StatusMode, SubmissionConfig};

/// Loading state of the pipeline. The loading indicator is `Submitting`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

/// How a submission settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The store answered with a 2xx status.
    Accepted { status: u16 },
    /// The send completed but its status was not inspected.
    StatusUnknown,
    /// The store answered with a non-2xx status.
    Rejected { status: u16 },
    /// The request never completed.
    Failed { message: String },
}

impl SubmissionOutcome {
    /// `true` for outcomes that count as a completed submission.
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted { .. } | Self::StatusUnknown)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accepted { .. } => "accepted",
            Self::StatusUnknown => "status_unknown",
            Self::Rejected { .. } => "rejected",
            Self::Failed { .. } => "failed",
        }
    }

    /// Operator-facing message for the settled notice.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Accepted { .. } => "Data submitted successfully.".to_string(),
            Self::StatusUnknown => {
                "Data sent. The route store did not confirm the result.".to_string()
            }
            Self::Rejected { status } => {
                format!("The route store rejected the data (HTTP {status}).")
            }
            Self::Failed { message } => {
                format!("Failed to post data due to a network error: {message}")
            }
        }
    }
}

/// A submission that has left `Idle` but not yet settled.
///
/// Holds the immutable wire snapshot and an in-flight guard. Dropping it
/// without sending releases the pipeline.
pub struct PendingSubmission {
    id: u64,
    record: RouteRecord,
    sink: Arc<dyn RouteSink>,
    status_mode: StatusMode,
    started: Instant,
    guard: InFlightGuard,
}

impl PendingSubmission {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The record captured when the submission began.
    #[must_use]
    pub fn record(&self) -> &RouteRecord {
        &self.record
    }

    /// Performs the single network send and classifies the result.
    ///
    /// Consumes the submission; the only way to settle it is through the
    /// returned [`SentSubmission`].
    pub async fn send(self) -> SentSubmission {
        let span = info_span!(
            "route_submission",
            id = self.id,
            pk = %self.record.pk,
            stages = self.record.stages.len(),
        );

        let outcome = async {
            match self.sink.send(&self.record).await {
                Ok(response) => {
                    log_response_body(response.body.as_deref());
                    classify_status(response.status, self.status_mode)
                }
                Err(e) => SubmissionOutcome::Failed {
                    message: e.to_string(),
                },
            }
        }
        .instrument(span)
        .await;

        SentSubmission {
            id: self.id,
            started: self.started,
            outcome,
            guard: self.guard,
        }
    }
}

/// A submission whose send has completed, waiting to be settled.
#[derive(Debug)]
pub struct SentSubmission {
    id: u64,
    started: Instant,
    outcome: SubmissionOutcome,
    guard: InFlightGuard,
}

impl SentSubmission {
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn outcome(&self) -> &SubmissionOutcome {
        &self.outcome
    }
}

impl std::fmt::Debug for PendingSubmission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingSubmission")
            .field("id", &self.id)
            .field("record", &self.record)
            .field("status_mode", &self.status_mode)
            .finish_non_exhaustive()
    }
}

fn classify_status(status: Option<u16>, mode: StatusMode) -> SubmissionOutcome {
    match (mode, status) {
        (StatusMode::Opaque, _) | (StatusMode::Checked, None) => SubmissionOutcome::StatusUnknown,
        (StatusMode::Checked, Some(status)) if (200..300).contains(&status) => {
            SubmissionOutcome::Accepted { status }
        }
        (StatusMode::Checked, Some(status)) => SubmissionOutcome::Rejected { status },
    }
}

/// Logs the store's reply. The body never affects the outcome.
fn log_response_body(body: Option<&str>) {
    match body {
        None => debug!("route store returned no content"),
        Some(text) => match serde_json::from_str::<serde_json::Value>(text) {
            Ok(value) => info!(response = %value, "route store response"),
            Err(e) => warn!(error = %e, "route store response is not valid JSON"),
        },
    }
}

/// Drives submissions of a [`RouteFormState`] to a [`RouteSink`].
pub struct SubmissionPipeline {
    sink: Arc<dyn RouteSink>,
    config: SubmissionConfig,
    slot: Arc<SubmissionSlot>,
    next_id: u64,
    notice: Option<SubmissionOutcome>,
}

impl SubmissionPipeline {
    #[must_use]
    pub fn new(sink: Arc<dyn RouteSink>, config: SubmissionConfig) -> Self {
        Self {
            sink,
            config,
            slot: Arc::new(SubmissionSlot::default()),
            next_id: 1,
            notice: None,
        }
    }

    #[must_use]
    pub fn phase(&self) -> SubmissionPhase {
        if self.slot.outstanding() == 0 {
            SubmissionPhase::Idle
        } else {
            SubmissionPhase::Submitting
        }
    }

    /// Loading indicator: `true` while a submission is outstanding.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.phase() == SubmissionPhase::Submitting
    }

    /// Number of submissions that have begun and are still alive, sent or not.
    #[must_use]
    pub fn in_flight_count(&self) -> u64 {
        self.slot.in_flight.load(Ordering::Acquire)
    }

    #[must_use]
    pub fn config(&self) -> SubmissionConfig {
        self.config
    }

    /// Moves `Idle -> Submitting` and snapshots `form` into a wire record.
    ///
    /// Returns `None`, with no other effect, if a submission is already outstanding.
    pub fn begin(&mut self, form: &RouteFormState) -> Option<PendingSubmission> {
        let id = self.next_id;
        if !self.slot.claim(id) {
            debug!("submit ignored: a submission is already in flight");
            return None;
        }
        self.next_id += 1;
        self.slot.in_flight.fetch_add(1, Ordering::AcqRel);

        let record = RouteRecord::from(form);
        debug!(id, pk = %record.pk, "submission started");

        Some(PendingSubmission {
            id,
            record,
            sink: Arc::clone(&self.sink),
            status_mode: self.config.status_mode,
            started: Instant::now(),
            guard: InFlightGuard {
                slot: Arc::clone(&self.slot),
                id,
            },
        })
    }

    /// Records the outcome of `sent`, applies the reset policy to `form`, and
    /// returns to `Idle`.
    ///
    /// A submission this pipeline is not waiting on (one begun by another
    /// pipeline) is ignored: its outcome is returned, but neither the form nor
    /// this pipeline's state changes.
    pub fn settle(
        &mut self,
        sent: SentSubmission,
        form: &mut RouteFormState,
    ) -> SubmissionOutcome {
        let SentSubmission {
            id,
            started,
            outcome,
            guard,
        } = sent;

        if !Arc::ptr_eq(&guard.slot, &self.slot) || self.slot.outstanding() != id {
            warn!(id, "ignoring a submission this pipeline did not begin");
            return outcome;
        }

        #[allow(clippy::cast_possible_truncation)]
        let duration_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            SubmissionOutcome::Failed { message } => {
                error!(id, duration_ms, error = %message, "route submission failed");
            }
            SubmissionOutcome::Rejected { status } => {
                warn!(id, duration_ms, status, "route submission rejected");
            }
            _ => info!(
                id,
                duration_ms,
                outcome = outcome.as_str(),
                "route submission settled"
            ),
        }
        metrics::counter!("route_submissions_total", "outcome" => outcome.as_str()).increment(1);

        let reset = match self.config.reset_policy {
            ResetPolicy::Always => true,
            ResetPolicy::OnSuccess => outcome.is_success(),
        };
        if reset {
            form.reset();
        }

        self.slot.release(id);
        drop(guard);
        self.notice = Some(outcome.clone());
        outcome
    }

    /// Runs a full submission: begin, send once, settle.
    ///
    /// Returns `None` if a submission was already outstanding.
    pub async fn submit(&mut self, form: &mut RouteFormState) -> Option<SubmissionOutcome> {
        let sent = self.begin(form)?.send().await;
        Some(self.settle(sent, form))
    }

    /// The last settled outcome, until acknowledged.
    #[must_use]
    pub fn notice(&self) -> Option<&SubmissionOutcome> {
        self.notice.as_ref()
    }

    /// Dismisses the settled notice.
    pub fn acknowledge(&mut self) -> Option<SubmissionOutcome> {
        self.notice.take()
    }
}

impl std::fmt::Debug for SubmissionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubmissionPipeline")
            .field("config", &self.config)
            .field("phase", &self.phase())
            .field("in_flight", &self.in_flight_count())
            .field("notice", &self.notice)
            .finish_non_exhaustive()
    }
}

/// State shared between a pipeline and the guards of its submissions.
#[derive(Debug, Default)]
struct SubmissionSlot {
    /// Id of the unsettled submission, `0` when idle.
    outstanding: AtomicU64,
    in_flight: AtomicU64,
}

impl SubmissionSlot {
    fn outstanding(&self) -> u64 {
        self.outstanding.load(Ordering::Acquire)
    }

    /// Marks `id` outstanding if nothing else is.
    fn claim(&self, id: u64) -> bool {
        self.outstanding
            .compare_exchange(0, id, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Clears the outstanding id if it is still `id`.
    fn release(&self, id: u64) -> bool {
        self.outstanding
            .compare_exchange(id, 0, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

/// RAII guard for one submission. Dropping it decrements the in-flight count
/// and, if the submission was never settled, returns the pipeline to `Idle`.
#[derive(Debug)]
struct InFlightGuard {
    slot: Arc<SubmissionSlot>,
    id: u64,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.slot.in_flight.fetch_sub(1, Ordering::AcqRel);
        if self.slot.release(self.id) {
            warn!(id = self.id, "submission dropped before settling; pipeline is idle again");
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use route_entry_core::{
        BusTypeRef, DepotRef, ReferenceDataCache, RouteField, SinkError, SinkResponse,
        StageField, Weekday,
    };

    use super::*;

    /// Sink that records every record it is given and replies with a canned result.
    struct RecordingSink {
        sent: Mutex<Vec<RouteRecord>>,
        reply: Result<SinkResponse, String>,
    }

    impl RecordingSink {
        fn replying(status: Option<u16>, body: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                reply: Ok(SinkResponse {
                    status,
                    body: body.map(str::to_string),
                }),
            })
        }

        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                sent: Mutex::new(Vec::new()),
                reply: Err("connection refused".to_string()),
            })
        }

        fn sent(&self) -> Vec<RouteRecord> {
            self.sent.lock().clone()
        }
    }

    #[async_trait]
    impl RouteSink for RecordingSink {
        async fn send(&self, record: &RouteRecord) -> Result<SinkResponse, SinkError> {
            self.sent.lock().push(record.clone());
            self.reply.clone().map_err(SinkError::Transport)
        }
    }

    fn reference() -> Arc<ReferenceDataCache> {
        Arc::new(ReferenceDataCache::new(
            vec![DepotRef::new("PNQ", "Pune")],
            vec![BusTypeRef::new("Semi-Luxury", 45)],
        ))
    }

    fn filled_form() -> RouteFormState {
        let mut form = RouteFormState::new(reference());
        form.set_field(RouteField::RouteNo, "101");
        form.set_field(RouteField::RouteName, "Pune - Nashik");
        form.set_field(RouteField::SourceEn, "Pune");
        form.set_field(RouteField::DestinationEn, "Nashik");
        form.set_field(RouteField::ScheduledTime, "07:15");
        form.select_depot(Some("PNQ")).unwrap();
        form.select_bus_type(Some("Semi-Luxury")).unwrap();
        form.operating_days_mut().toggle(Weekday::Monday);
        form.stages_mut().append();
        form.stages_mut().update_field(1, StageField::StopNameEn, "Sangamner");
        form
    }

    fn pipeline(sink: Arc<RecordingSink>, config: SubmissionConfig) -> SubmissionPipeline {
        SubmissionPipeline::new(sink, config)
    }

    #[test]
    fn new_pipeline_is_idle() {
        let p = pipeline(RecordingSink::replying(Some(200), None), SubmissionConfig::default());
        assert_eq!(p.phase(), SubmissionPhase::Idle);
        assert!(!p.is_loading());
        assert_eq!(p.in_flight_count(), 0);
        assert!(p.notice().is_none());
    }

    #[test]
    fn begin_snapshots_form_and_enters_submitting() {
        let mut p =
            pipeline(RecordingSink::replying(Some(200), None), SubmissionConfig::default());
        let form = filled_form();

        let pending = p.begin(&form).expect("idle pipeline should begin");

        assert!(p.is_loading());
        assert_eq!(p.in_flight_count(), 1);
        assert_eq!(pending.record(), &RouteRecord::from(&form));
    }

    #[test]
    fn begin_while_submitting_is_noop() {
        let sink = RecordingSink::replying(Some(200), None);
        let mut p = pipeline(Arc::clone(&sink), SubmissionConfig::default());
        let form = filled_form();
        let before = form.clone();

        let _pending = p.begin(&form).unwrap();
        assert!(p.begin(&form).is_none());
        assert!(p.begin(&form).is_none());

        assert_eq!(p.in_flight_count(), 1);
        assert_eq!(p.phase(), SubmissionPhase::Submitting);
        assert_eq!(form, before);
        assert!(sink.sent().is_empty());
    }

    #[test]
    fn dropping_pending_returns_pipeline_to_idle() {
        let mut p =
            pipeline(RecordingSink::replying(Some(200), None), SubmissionConfig::default());
        let form = filled_form();
        let pending = p.begin(&form).unwrap();
        assert_eq!(p.in_flight_count(), 1);

        drop(pending);

        assert_eq!(p.in_flight_count(), 0);
        assert_eq!(p.phase(), SubmissionPhase::Idle);
        assert!(p.notice().is_none());
        assert!(p.begin(&form).is_some());
    }

    #[tokio::test]
    async fn dropping_sent_submission_returns_pipeline_to_idle() {
        let sink = RecordingSink::replying(Some(200), None);
        let mut p = pipeline(Arc::clone(&sink), SubmissionConfig::default());
        let form = filled_form();

        let sent = p.begin(&form).unwrap().send().await;
        assert!(p.is_loading());
        drop(sent);

        assert!(!p.is_loading());
        assert_eq!(p.in_flight_count(), 0);
        assert_eq!(sink.sent().len(), 1);
    }

    #[tokio::test]
    async fn send_consumes_pending_and_posts_once() {
        let sink = RecordingSink::replying(Some(200), None);
        let mut p = pipeline(Arc::clone(&sink), SubmissionConfig::default());
        let mut form = filled_form();

        let pending = p.begin(&form).unwrap();
        let id = pending.id();
        let sent = pending.send().await;

        assert_eq!(sent.id(), id);
        assert_eq!(sent.outcome(), &SubmissionOutcome::Accepted { status: 200 });
        assert_eq!(sink.sent().len(), 1);
        assert!(p.is_loading(), "a sent submission is outstanding until settled");

        let outcome = p.settle(sent, &mut form);
        assert_eq!(outcome, SubmissionOutcome::Accepted { status: 200 });
        assert_eq!(sink.sent().len(), 1);
        assert_eq!(p.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn settle_ignores_submission_from_another_pipeline() {
        let mut first =
            pipeline(RecordingSink::replying(Some(200), None), SubmissionConfig::default());
        let mut second =
            pipeline(RecordingSink::replying(Some(200), None), SubmissionConfig::default());
        let mut form = filled_form();
        let before = form.clone();

        let _ours = first.begin(&form).unwrap();
        let theirs = second.begin(&form).unwrap().send().await;

        let outcome = first.settle(theirs, &mut form);

        assert_eq!(outcome, SubmissionOutcome::Accepted { status: 200 });
        assert_eq!(form, before);
        assert_eq!(first.phase(), SubmissionPhase::Submitting);
        assert_eq!(first.in_flight_count(), 1);
        assert!(first.notice().is_none());
        assert_eq!(second.in_flight_count(), 0);
    }

    #[tokio::test]
    async fn accepted_submission_resets_form() {
        let sink = RecordingSink::replying(Some(200), Some(r#"{"message":"ok"}"#));
        let mut p = pipeline(Arc::clone(&sink), SubmissionConfig::default());
        let mut form = filled_form();

        let outcome = p.submit(&mut form).await;

        assert_eq!(outcome, Some(SubmissionOutcome::Accepted { status: 200 }));
        assert!(form.is_pristine());
        assert_eq!(p.phase(), SubmissionPhase::Idle);
        assert_eq!(p.in_flight_count(), 0);
        assert_eq!(sink.sent().len(), 1);
        assert_eq!(sink.sent()[0].pk, "Depot-PNQ-101-Metadata");
    }

    #[tokio::test]
    async fn unparseable_body_does_not_change_outcome() {
        let sink = RecordingSink::replying(Some(201), Some("<html>created</html>"));
        let mut p = pipeline(sink, SubmissionConfig::default());
        let mut form = filled_form();

        let outcome = p.submit(&mut form).await;
        assert_eq!(outcome, Some(SubmissionOutcome::Accepted { status: 201 }));
    }

    #[tokio::test]
    async fn non_success_status_is_rejected_when_checked() {
        let sink = RecordingSink::replying(Some(500), Some(r#"{"error":"boom"}"#));
        let mut p = pipeline(sink, SubmissionConfig::default());
        let mut form = filled_form();

        let outcome = p.submit(&mut form).await;

        assert_eq!(outcome, Some(SubmissionOutcome::Rejected { status: 500 }));
        assert!(form.is_pristine(), "default policy resets on every settlement");
    }

    #[tokio::test]
    async fn opaque_mode_reports_status_unknown() {
        let config = SubmissionConfig {
            status_mode: StatusMode::Opaque,
            ..SubmissionConfig::default()
        };
        let mut p = pipeline(RecordingSink::replying(Some(500), None), config);
        let mut form = filled_form();

        let outcome = p.submit(&mut form).await;
        assert_eq!(outcome, Some(SubmissionOutcome::StatusUnknown));
        assert!(outcome.is_some_and(|o| o.is_success()));
    }

    #[tokio::test]
    async fn missing_status_is_unknown_even_when_checked() {
        let mut p = pipeline(RecordingSink::replying(None, None), SubmissionConfig::default());
        let mut form = filled_form();
        assert_eq!(
            p.submit(&mut form).await,
            Some(SubmissionOutcome::StatusUnknown)
        );
    }

    #[tokio::test]
    async fn transport_failure_resets_under_default_policy() {
        let mut p = pipeline(RecordingSink::unreachable(), SubmissionConfig::default());
        let mut form = filled_form();

        let outcome = p.submit(&mut form).await.unwrap();

        assert!(matches!(outcome, SubmissionOutcome::Failed { .. }));
        assert!(outcome.message().contains("connection refused"));
        assert!(form.is_pristine());
        assert!(!p.is_loading());
    }

    #[tokio::test]
    async fn on_success_policy_preserves_input_after_failure() {
        let config = SubmissionConfig {
            reset_policy: ResetPolicy::OnSuccess,
            ..SubmissionConfig::default()
        };
        let mut p = pipeline(RecordingSink::unreachable(), config);
        let mut form = filled_form();
        let before = form.clone();

        let outcome = p.submit(&mut form).await.unwrap();

        assert!(!outcome.is_success());
        assert_eq!(form, before);
        assert_eq!(p.phase(), SubmissionPhase::Idle);
    }

    #[tokio::test]
    async fn on_success_policy_still_resets_after_acceptance() {
        let config = SubmissionConfig {
            reset_policy: ResetPolicy::OnSuccess,
            ..SubmissionConfig::default()
        };
        let mut p = pipeline(RecordingSink::replying(Some(204), None), config);
        let mut form = filled_form();

        p.submit(&mut form).await;
        assert!(form.is_pristine());
    }

    #[tokio::test]
    async fn notice_is_kept_until_acknowledged() {
        let mut p =
            pipeline(RecordingSink::replying(Some(200), None), SubmissionConfig::default());
        let mut form = filled_form();

        p.submit(&mut form).await;
        assert_eq!(
            p.notice(),
            Some(&SubmissionOutcome::Accepted { status: 200 })
        );
        assert_eq!(
            p.acknowledge(),
            Some(SubmissionOutcome::Accepted { status: 200 })
        );
        assert!(p.notice().is_none());
    }

    #[tokio::test]
    async fn pipeline_accepts_next_submit_after_settling() {
        let sink = RecordingSink::replying(Some(200), None);
        let mut p = pipeline(Arc::clone(&sink), SubmissionConfig::default());

        let mut form = filled_form();
        p.submit(&mut form).await;
        let mut form = filled_form();
        p.submit(&mut form).await;

        assert_eq!(sink.sent().len(), 2);
    }

    #[test]
    fn classify_status_covers_modes() {
        assert_eq!(
            classify_status(Some(299), StatusMode::Checked),
            SubmissionOutcome::Accepted { status: 299 }
        );
        assert_eq!(
            classify_status(Some(302), StatusMode::Checked),
            SubmissionOutcome::Rejected { status: 302 }
        );
        assert_eq!(
            classify_status(Some(200), StatusMode::Opaque),
            SubmissionOutcome::StatusUnknown
        );
    }
}
