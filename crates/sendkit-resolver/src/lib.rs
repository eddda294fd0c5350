//! Recipient name resolution for display.
//!
//! - Only names matching `<label>.eth` are looked up
//! - Every change of the trimmed recipient bumps a generation token
//! - A lookup writes its result only if its token is still the latest

pub mod directory;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use regex::Regex;
use sendkit_types::Hex;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tracing::{debug, warn};

pub use directory::{MockDirectory, NameDirectory};

static NAME_PATTERN: OnceLock<Regex> = OnceLock::new();

fn name_pattern() -> &'static Regex {
    NAME_PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^[a-z0-9](?:[a-z0-9-]{0,61}[a-z0-9])?\.eth$").unwrap()
    })
}

/// Whether `value` (trimmed) looks like a resolvable name such as `vitalik.eth`.
pub fn is_resolvable_name(value: &str) -> bool {
    name_pattern().is_match(value.trim())
}

#[derive(Debug, Default)]
struct ResolverState {
    generation: u64,
    current: String,
}

/// Resolves the recipient field into an address, discarding stale lookups.
///
/// Must be driven from inside a tokio runtime: lookups run as spawned tasks.
/// Dropping the resolver aborts any lookup still in flight.
pub struct RecipientResolver {
    directory: Arc<dyn NameDirectory>,
    state: Arc<Mutex<ResolverState>>,
    resolved: Arc<watch::Sender<Option<Hex>>>,
    lookups: Mutex<JoinSet<()>>,
    started: AtomicU64,
}

impl RecipientResolver {
    pub fn new(directory: Arc<dyn NameDirectory>) -> Self {
        let (resolved, _) = watch::channel(None);
        Self {
            directory,
            state: Arc::new(Mutex::new(ResolverState::default())),
            resolved: Arc::new(resolved),
            lookups: Mutex::new(JoinSet::new()),
            started: AtomicU64::new(0),
        }
    }

    /// Feed the raw recipient field.
    ///
    /// Returns the generation token of the lookup started, if any. A value
    /// whose trimmed form equals the previous one is ignored.
    pub fn on_recipient_change(&self, raw: &str) -> Option<u64> {
        let value = raw.trim();
        let token = {
            let mut state = self.state.lock().unwrap();
            if state.current == value {
                return None;
            }
            state.generation += 1;
            state.current = value.to_string();

            if value.is_empty() || !is_resolvable_name(value) {
                self.resolved.send_replace(None);
                return None;
            }
            state.generation
        };

        self.started.fetch_add(1, Ordering::SeqCst);
        debug!(name = %value, token, "starting name lookup");

        let directory = Arc::clone(&self.directory);
        let state = Arc::clone(&self.state);
        let resolved = Arc::clone(&self.resolved);
        let name = value.to_string();

        let mut lookups = self.lookups.lock().unwrap();
        // Reap finished lookups so the set only holds live tasks.
        while lookups.try_join_next().is_some() {}
        lookups.spawn(async move {
            let address = match directory.lookup(&name).await {
                Ok(address) => address,
                Err(e) => {
                    warn!(name = %name, error = %e, "name lookup failed");
                    None
                }
            };

            let state = state.lock().unwrap();
            if state.generation != token {
                debug!(name = %name, token, latest = state.generation, "discarding stale lookup");
                return;
            }
            debug!(name = %name, token, found = address.is_some(), "applying lookup");
            resolved.send_replace(address);
        });

        Some(token)
    }

    /// Address for the current recipient, if resolved.
    pub fn resolved(&self) -> Option<Hex> {
        self.resolved.borrow().clone()
    }

    /// Watch the resolved value.
    pub fn subscribe(&self) -> watch::Receiver<Option<Hex>> {
        self.resolved.subscribe()
    }

    /// Latest generation token.
    pub fn generation(&self) -> u64 {
        self.state.lock().unwrap().generation
    }

    /// Number of directory lookups started so far.
    pub fn lookups_started(&self) -> u64 {
        self.started.load(Ordering::SeqCst)
    }

    /// Abort lookups still in flight.
    pub fn shutdown(&self) {
        self.lookups.lock().unwrap().abort_all();
    }
}
