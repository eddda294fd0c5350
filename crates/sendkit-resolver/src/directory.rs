//! Name directory boundary.
//!
//! Lookup: `{name}` → `{address}` or absent.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use sendkit_types::{Hex, Result};

/// Maps a human-readable name to a canonical address.
#[async_trait]
pub trait NameDirectory: Send + Sync {
    async fn lookup(&self, name: &str) -> Result<Option<Hex>>;
}

/// In-memory directory with simulated network latency.
pub struct MockDirectory {
    entries: HashMap<String, Hex>,
    latency: Duration,
}

impl MockDirectory {
    pub const DEFAULT_LATENCY_MS: u64 = 600;

    /// Empty directory.
    pub fn new(latency: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            latency,
        }
    }

    /// Register `name` (case-insensitive) → `address`.
    pub fn with_entry(mut self, name: &str, address: &str) -> Self {
        self.entries.insert(name.to_lowercase(), address.to_string());
        self
    }

    pub fn latency(&self) -> Duration {
        self.latency
    }
}

impl Default for MockDirectory {
    fn default() -> Self {
        Self::new(Duration::from_millis(Self::DEFAULT_LATENCY_MS))
            .with_entry("vitalik.eth", "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045")
    }
}

#[async_trait]
impl NameDirectory for MockDirectory {
    async fn lookup(&self, name: &str) -> Result<Option<Hex>> {
        tokio::time::sleep(self.latency).await;
        Ok(self.entries.get(&name.to_lowercase()).cloned())
    }
}
