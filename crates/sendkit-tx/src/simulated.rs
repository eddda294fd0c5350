//! Simulated transfer backend.
//!
//! Every request waits `latency_ms`, then is rejected with probability
//! `failure_rate` (one independent uniform draw per attempt) or accepted with
//! a fresh receipt hash.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sendkit_types::{Result, SendkitError, TransferRequest, TransferResponse};
use tracing::{info, warn};

use crate::receipt::generate_receipt_hash;
use crate::TransferBackend;

/// Simulation parameters. Not user-configurable at runtime.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub latency_ms: u64,
    pub failure_rate: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            latency_ms: 3_000,
            failure_rate: 0.25,
        }
    }
}

/// In-process stand-in for the paymaster relay.
pub struct SimulatedBackend {
    config: SimulationConfig,
    rng: Mutex<StdRng>,
}

impl SimulatedBackend {
    pub const REJECTION_MESSAGE: &'static str = "Paymaster rejected this transfer.";

    pub fn new(config: SimulationConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Deterministic outcomes for tests.
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(mut config: SimulationConfig, rng: StdRng) -> Self {
        config.failure_rate = config.failure_rate.clamp(0.0, 1.0);
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(SimulationConfig::default())
    }
}

#[async_trait]
impl TransferBackend for SimulatedBackend {
    async fn send_transfer(&self, request: &TransferRequest) -> Result<TransferResponse> {
        info!(
            asset = %request.asset,
            amount = %request.amount,
            recipient = %request.recipient,
            paymaster = %request.paymaster,
            network = %request.network,
            "submitting transfer"
        );

        tokio::time::sleep(Duration::from_millis(self.config.latency_ms)).await;

        let hash = {
            let mut rng = self.rng.lock().unwrap();
            if rng.gen::<f64>() < self.config.failure_rate {
                None
            } else {
                Some(generate_receipt_hash(&mut *rng, request))
            }
        };

        match hash {
            Some(hash) => {
                info!(hash = %hash, "transfer accepted");
                Ok(TransferResponse { hash })
            }
            None => {
                warn!(reason = Self::REJECTION_MESSAGE, "transfer rejected");
                Err(SendkitError::TransferRejected(Self::REJECTION_MESSAGE.into()))
            }
        }
    }
}
