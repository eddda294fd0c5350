//! Catalog trait and implementations for the Sendkit engine.
//!
//! Defines the `CatalogSource` trait that supplies the selectable assets,
//! paymaster fee tokens and networks. Provides a `StaticCatalog` with the
//! default reference data.

use sendkit_types::{AssetOption, NetworkOption, PaymasterToken};

pub mod static_catalog;

pub use static_catalog::StaticCatalog;

/// Read-only source of selectable options.
///
/// Entries are never mutated; the engine only looks them up.
pub trait CatalogSource: Send + Sync {
    fn assets(&self) -> &[AssetOption];
    fn paymaster_tokens(&self) -> &[PaymasterToken];
    fn networks(&self) -> &[NetworkOption];

    // --- Lookups (empty key never matches) ---
    fn find_asset(&self, symbol: &str) -> Option<&AssetOption> {
        if symbol.is_empty() {
            return None;
        }
        self.assets().iter().find(|a| a.symbol == symbol)
    }

    fn find_paymaster_token(&self, symbol: &str) -> Option<&PaymasterToken> {
        if symbol.is_empty() {
            return None;
        }
        self.paymaster_tokens().iter().find(|t| t.symbol == symbol)
    }

    fn find_network(&self, value: &str) -> Option<&NetworkOption> {
        if value.is_empty() {
            return None;
        }
        self.networks().iter().find(|n| n.value == value)
    }
}
