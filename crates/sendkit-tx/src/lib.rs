//! Transfer submission boundary.
//!
//! - `TransferBackend`: accepts a transfer request, returns a receipt hash
//! - `SimulatedBackend`: fixed latency, random rejection
//! - Receipt hash generation

use async_trait::async_trait;
use sendkit_types::Result;

pub use sendkit_types::{TransferRequest, TransferResponse};

pub mod receipt;
pub mod simulated;

pub use simulated::{SimulatedBackend, SimulationConfig};

/// Backend that queues a transfer.
///
/// A rejection is returned as `Err`, usually `SendkitError::TransferRejected`.
#[async_trait]
pub trait TransferBackend: Send + Sync {
    async fn send_transfer(&self, request: &TransferRequest) -> Result<TransferResponse>;
}
