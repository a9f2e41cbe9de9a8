//! Analysis request dispatch.

use std::sync::{PoisonError, RwLock};

use misland_analysis_models::{AnalysisRecord, QueuedResult};
use misland_indicator_models::{AnalysisEndpoint, IndicatorKind};
use serde_json::Value;

use crate::notify::{LogNotifier, Notifier};
use crate::pending::PendingRequests;
use crate::response::{ResponseOutcome, classify_response};
use crate::selection::SelectionContext;
use crate::store::ResultStore;
use crate::transport::AnalysisTransport;
use crate::years::{CatalogKind, YearCatalog};

/// Notice shown when the backend could not be reached.
pub const ANALYSIS_REQUEST_FAILED: &str = "There was an error while making analysis request";

/// One analysis submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitRequest {
    /// Analysis parameters (years, sources, ...).
    pub payload: Value,
    /// Backend analysis to run.
    pub endpoint: AnalysisEndpoint,
    /// Indicator recorded with the result.
    pub indicator: Option<IndicatorKind>,
    /// Tag identifying the caller in logs.
    pub caller: String,
    /// Suppresses the loading indicator for this request.
    pub hide_loading_progress: bool,
}

impl SubmitRequest {
    /// Creates a request for `endpoint` recording its default indicator.
    #[must_use]
    pub fn new(endpoint: AnalysisEndpoint, payload: Value) -> Self {
        Self {
            payload,
            endpoint,
            indicator: Some(endpoint.default_indicator()),
            caller: endpoint.to_string(),
            hide_loading_progress: false,
        }
    }

    /// Overrides the recorded indicator.
    #[must_use]
    pub fn indicator(mut self, indicator: Option<IndicatorKind>) -> Self {
        self.indicator = indicator;
        self
    }

    /// Sets the caller tag.
    #[must_use]
    pub fn caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = caller.into();
        self
    }

    /// Runs the request without showing the loading indicator.
    #[must_use]
    pub const fn hide_loading_progress(mut self) -> Self {
        self.hide_loading_progress = true;
        self
    }
}

/// Submits analyses and keeps the shared request state.
pub struct Orchestrator {
    transport: Box<dyn AnalysisTransport>,
    notifier: Box<dyn Notifier>,
    pending: PendingRequests,
    store: ResultStore,
    selection: RwLock<SelectionContext>,
    years: YearCatalog,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("pending", &self.pending)
            .field("store", &self.store)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Creates an orchestrator that logs notifications and has no
    /// loading indicator.
    #[must_use]
    pub fn new(transport: Box<dyn AnalysisTransport>) -> Self {
        Self::with_parts(
            transport,
            Box::new(LogNotifier),
            PendingRequests::default(),
        )
    }

    /// Creates an orchestrator with explicit notification and progress
    /// sinks.
    #[must_use]
    pub fn with_parts(
        transport: Box<dyn AnalysisTransport>,
        notifier: Box<dyn Notifier>,
        pending: PendingRequests,
    ) -> Self {
        Self {
            transport,
            notifier,
            pending,
            store: ResultStore::new(),
            selection: RwLock::new(SelectionContext::default()),
            years: YearCatalog::new(),
        }
    }

    /// Replaces the active selection.
    pub fn set_selection(&self, selection: SelectionContext) {
        *self
            .selection
            .write()
            .unwrap_or_else(PoisonError::into_inner) = selection;
    }

    /// The active selection.
    #[must_use]
    pub fn selection(&self) -> SelectionContext {
        self.selection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// In-flight request counter.
    #[must_use]
    pub const fn pending(&self) -> &PendingRequests {
        &self.pending
    }

    /// Shared result state.
    #[must_use]
    pub const fn store(&self) -> &ResultStore {
        &self.store
    }

    /// Runs an analysis.
    ///
    /// Returns the result on success. Failures and informational notices
    /// are reported through the notifier and yield `None`. A result that
    /// arrives after a newer request's result is still returned, but is
    /// not stored.
    pub async fn submit_analysis(&self, request: SubmitRequest) -> Option<AnalysisRecord> {
        let SubmitRequest {
            payload,
            endpoint,
            indicator,
            caller,
            hide_loading_progress,
        } = request;

        let body = self.selection().merge_payload(payload);
        let seq = self.store.next_sequence();
        let _pending = self.pending.begin(hide_loading_progress);

        log::info!("[{caller}] Requesting {endpoint} analysis (request {seq})");

        let response = match self.transport.post_json(&endpoint.path(), &body).await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("[{caller}] Analysis request error: {e}");
                self.notifier.negative(ANALYSIS_REQUEST_FAILED);
                return None;
            }
        };

        match classify_response(response) {
            ResponseOutcome::Failed(message) => {
                log::debug!("[{caller}] Backend reported failure: {message}");
                self.notifier.negative(&message);
                None
            }
            ResponseOutcome::Message(message) => {
                self.notifier.positive(&message);
                None
            }
            ResponseOutcome::Data(body) => {
                let record = AnalysisRecord::new(indicator, body);
                self.store.store(seq, record.clone());
                Some(record)
            }
        }
    }

    /// Stores the result of a completed scheduled task.
    pub fn store_queued_result(&self, queued: QueuedResult) {
        self.store.store_queued(queued);
    }

    /// Published years for a computation type, newest first.
    pub async fn computation_years(
        &self,
        kind: CatalogKind,
        computation_type: &str,
    ) -> Option<Vec<i64>> {
        self.years
            .years_for(self.transport.as_ref(), kind, computation_type)
            .await
    }
}
