//! Submission attempt state and the affordances derived from it.

use serde::{Deserialize, Serialize};
use sendkit_types::{Receipt, TransferRequest, TransferStatus};

/// The single live submission attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionAttempt {
    pub status: TransferStatus,
    /// Set only while `status == Success`.
    pub receipt: Option<Receipt>,
    /// Set only while `status == Error`.
    pub error: Option<String>,
}

impl SubmissionAttempt {
    pub(crate) fn loading() -> Self {
        Self {
            status: TransferStatus::Loading,
            ..Self::default()
        }
    }

    pub(crate) fn succeeded(receipt: Receipt) -> Self {
        Self {
            status: TransferStatus::Success,
            receipt: Some(receipt),
            error: None,
        }
    }

    pub(crate) fn failed(message: String) -> Self {
        Self {
            status: TransferStatus::Error,
            receipt: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitButton {
    pub label: &'static str,
    pub disabled: bool,
}

pub fn button_label(status: TransferStatus) -> &'static str {
    match status {
        TransferStatus::Idle => "Send",
        TransferStatus::Loading => "Sending transfer…",
        TransferStatus::Success => "Transfer sent",
        TransferStatus::Error => "Transfer failed",
    }
}

/// Disabled unless idle with a submittable draft.
pub fn submit_button(status: TransferStatus, can_submit: bool) -> SubmitButton {
    SubmitButton {
        label: button_label(status),
        disabled: status != TransferStatus::Idle || !can_submit,
    }
}

/// Engine event for progress reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Submitted { request: TransferRequest },
    Succeeded { receipt: Receipt },
    Failed { message: String },
    Reset,
}

/// Callback type for engine events.
pub type EngineEventHandler = Box<dyn Fn(EngineEvent) + Send + Sync>;
