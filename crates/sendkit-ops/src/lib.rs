//! Transfer submission engine.
//!
//! Coordinates the form store, the recipient resolver and the transfer
//! backend behind one submission state machine:
//!
//! `idle → loading → {success, error} → idle`
//!
//! The draft is cleared as soon as an attempt terminates, whatever the
//! outcome; the status returns to idle after a fixed delay.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use sendkit_catalog::{CatalogSource, StaticCatalog};
use sendkit_form::{FormStore, TransferSummary};
use sendkit_resolver::{MockDirectory, NameDirectory, RecipientResolver};
use sendkit_tx::{SimulatedBackend, TransferBackend};
use sendkit_types::{
    DraftField, Hex, Receipt, Result, SendkitError, TransferDraft, TransferRequest,
    TransferResponse, TransferStatus, DEFAULT_TRANSFER_ERROR,
};
use tokio::sync::watch;
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info, warn};

pub mod attempt;

pub use attempt::{
    button_label, submit_button, EngineEvent, EngineEventHandler, SubmissionAttempt, SubmitButton,
};

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Delay between a terminal status and the return to idle.
    pub reset_delay_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { reset_delay_ms: 2_000 }
    }
}

struct EngineState {
    form: FormStore,
    attempt: SubmissionAttempt,
}

#[derive(Default)]
struct EngineTasks {
    submission: Option<JoinHandle<()>>,
    reset_timer: Option<JoinHandle<()>>,
    closed: bool,
}

struct Inner {
    config: EngineConfig,
    state: Mutex<EngineState>,
    attempt_tx: watch::Sender<SubmissionAttempt>,
    resolver: RecipientResolver,
    backend: Arc<dyn TransferBackend>,
    // Lock order: tasks before state.
    tasks: Mutex<EngineTasks>,
    on_event: Option<EngineEventHandler>,
}

/// The transfer engine owns one form and at most one in-flight attempt.
///
/// Every mutating call must happen inside a tokio runtime: lookups, the
/// transfer request and the reset timer run as spawned tasks. Dropping the
/// engine aborts all of them.
pub struct TransferEngine {
    inner: Arc<Inner>,
}

impl TransferEngine {
    pub fn new(
        config: EngineConfig,
        catalog: Arc<dyn CatalogSource>,
        directory: Arc<dyn NameDirectory>,
        backend: Arc<dyn TransferBackend>,
        on_event: Option<EngineEventHandler>,
    ) -> Self {
        let attempt = SubmissionAttempt::default();
        let (attempt_tx, _) = watch::channel(attempt.clone());
        Self {
            inner: Arc::new(Inner {
                config,
                state: Mutex::new(EngineState {
                    form: FormStore::new(catalog),
                    attempt,
                }),
                attempt_tx,
                resolver: RecipientResolver::new(directory),
                backend,
                tasks: Mutex::new(EngineTasks::default()),
                on_event,
            }),
        }
    }

    /// Default catalog, mock name directory and simulated backend.
    pub fn with_defaults() -> Self {
        Self::new(
            EngineConfig::default(),
            Arc::new(StaticCatalog::default()),
            Arc::new(MockDirectory::default()),
            Arc::new(SimulatedBackend::default()),
            None,
        )
    }

    // --- Form ---

    /// Replace one draft field. Rejected with `FormLocked` unless idle.
    pub fn set_field(&self, field: DraftField, value: impl Into<String>) -> Result<()> {
        let mut state = self.inner.state.lock().unwrap();
        if state.attempt.status != TransferStatus::Idle {
            return Err(SendkitError::FormLocked);
        }
        state.form.set_field(field, value);
        if field == DraftField::Recipient {
            self.inner.resolver.on_recipient_change(&state.form.draft().recipient);
        }
        Ok(())
    }

    /// Fill the amount with the selected asset's balance.
    ///
    /// `Ok(false)` when no asset is selected.
    pub fn set_max_amount(&self) -> Result<bool> {
        let mut state = self.inner.state.lock().unwrap();
        if state.attempt.status != TransferStatus::Idle {
            return Err(SendkitError::FormLocked);
        }
        Ok(state.form.set_max_amount())
    }

    pub fn draft(&self) -> TransferDraft {
        self.inner.state.lock().unwrap().form.draft().clone()
    }

    pub fn can_submit(&self) -> bool {
        self.inner.state.lock().unwrap().form.can_submit()
    }

    pub fn amount_number(&self) -> f64 {
        self.inner.state.lock().unwrap().form.amount_number()
    }

    pub fn estimated_fee(&self) -> f64 {
        self.inner.state.lock().unwrap().form.estimated_fee()
    }

    /// Resolved address for the current recipient, display only.
    pub fn resolved_recipient(&self) -> Option<Hex> {
        self.inner.resolver.resolved()
    }

    pub fn resolver(&self) -> &RecipientResolver {
        &self.inner.resolver
    }

    pub fn summary(&self) -> TransferSummary {
        let resolved = self.inner.resolver.resolved();
        let state = self.inner.state.lock().unwrap();
        state
            .form
            .summary(resolved.as_deref(), state.attempt.receipt.as_ref())
    }

    // --- Submission ---

    /// Start a transfer from the current draft.
    ///
    /// Returns `false` without changing anything unless the engine is idle
    /// and the draft can be submitted.
    pub fn submit(&self) -> bool {
        let request = {
            let mut tasks = self.inner.tasks.lock().unwrap();
            if tasks.closed {
                return false;
            }
            let mut state = self.inner.state.lock().unwrap();
            if state.attempt.status != TransferStatus::Idle || !state.form.can_submit() {
                debug!(status = ?state.attempt.status, "submit ignored");
                return false;
            }
            state.attempt = SubmissionAttempt::loading();
            self.inner.attempt_tx.send_replace(state.attempt.clone());
            if let Some(timer) = tasks.reset_timer.take() {
                timer.abort();
            }
            state.form.to_request()
        };

        info!(
            asset = %request.asset,
            amount = %request.amount,
            paymaster = %request.paymaster,
            network = %request.network,
            "transfer submitted"
        );
        // No lock is held here; the handler may call back into the engine.
        self.inner.emit(EngineEvent::Submitted { request: request.clone() });

        let mut tasks = self.inner.tasks.lock().unwrap();
        if tasks.closed {
            return true;
        }
        let inner = Arc::clone(&self.inner);
        tasks.submission = Some(tokio::spawn(async move {
            let outcome = inner.send(request).await;
            inner.finish(outcome);
        }));
        true
    }

    pub fn attempt(&self) -> SubmissionAttempt {
        self.inner.attempt_tx.borrow().clone()
    }

    pub fn status(&self) -> TransferStatus {
        self.inner.attempt_tx.borrow().status
    }

    pub fn receipt(&self) -> Option<Receipt> {
        self.inner.attempt_tx.borrow().receipt.clone()
    }

    /// Fields are read-only whenever an attempt is live.
    pub fn is_locked(&self) -> bool {
        self.status() != TransferStatus::Idle
    }

    pub fn button(&self) -> SubmitButton {
        let state = self.inner.state.lock().unwrap();
        submit_button(state.attempt.status, state.form.can_submit())
    }

    /// Watch attempt transitions.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionAttempt> {
        self.inner.attempt_tx.subscribe()
    }

    /// Abort the in-flight request, the reset timer and pending lookups.
    ///
    /// State is left as it was; later submits are ignored.
    pub fn shutdown(&self) {
        {
            let mut tasks = self.inner.tasks.lock().unwrap();
            tasks.closed = true;
            if let Some(handle) = tasks.submission.take() {
                handle.abort();
            }
            if let Some(handle) = tasks.reset_timer.take() {
                handle.abort();
            }
        }
        self.inner.resolver.shutdown();
        debug!("transfer engine shut down");
    }
}

impl Drop for TransferEngine {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    fn emit(&self, event: EngineEvent) {
        if let Some(ref handler) = self.on_event {
            handler(event);
        }
    }

    /// Run the backend call in its own task so a panic still yields an outcome.
    ///
    /// Dropping the returned future (engine shutdown) aborts the call.
    async fn send(&self, request: TransferRequest) -> Result<TransferResponse> {
        let backend = Arc::clone(&self.backend);
        let mut call = JoinSet::new();
        call.spawn(async move { backend.send_transfer(&request).await });

        match call.join_next().await {
            Some(Ok(outcome)) => outcome,
            Some(Err(e)) => {
                warn!(error = %e, panic = e.is_panic(), "transfer backend task failed");
                Err(SendkitError::Other(DEFAULT_TRANSFER_ERROR.to_string()))
            }
            None => Err(SendkitError::Other(DEFAULT_TRANSFER_ERROR.to_string())),
        }
    }

    /// Terminal transition: record the outcome, clear the draft, arm the reset timer.
    fn finish(self: &Arc<Self>, outcome: Result<TransferResponse>) {
        let attempt = match outcome.and_then(|response| Receipt::new(response.hash)) {
            Ok(receipt) => {
                info!(hash = %receipt.hash, "transfer sent");
                SubmissionAttempt::succeeded(receipt)
            }
            Err(e) => {
                let message = match e.to_string() {
                    m if m.trim().is_empty() => DEFAULT_TRANSFER_ERROR.to_string(),
                    m => m,
                };
                warn!(error = %message, "transfer failed");
                SubmissionAttempt::failed(message)
            }
        };

        {
            let mut state = self.state.lock().unwrap();
            state.form.reset();
            self.resolver.on_recipient_change("");
            state.attempt = attempt.clone();
            self.attempt_tx.send_replace(attempt.clone());
        }

        self.emit(match attempt.receipt {
            Some(receipt) => EngineEvent::Succeeded { receipt },
            None => EngineEvent::Failed {
                message: attempt.error.unwrap_or_else(|| DEFAULT_TRANSFER_ERROR.to_string()),
            },
        });

        let mut tasks = self.tasks.lock().unwrap();
        if tasks.closed {
            return;
        }
        let inner = Arc::clone(self);
        let delay = Duration::from_millis(self.config.reset_delay_ms);
        tasks.reset_timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.return_to_idle();
        }));
    }

    fn return_to_idle(&self) {
        {
            let mut state = self.state.lock().unwrap();
            if !state.attempt.status.is_terminal() {
                return;
            }
            state.attempt = SubmissionAttempt::default();
            self.attempt_tx.send_replace(state.attempt.clone());
        }
        debug!("submission reset to idle");
        self.emit(EngineEvent::Reset);
    }
}
