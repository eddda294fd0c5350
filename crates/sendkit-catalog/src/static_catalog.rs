//! In-memory catalog with the default reference data.

use serde::{Deserialize, Serialize};
use sendkit_types::{AssetOption, NetworkOption, PaymasterToken, Result, SendkitError};

use crate::CatalogSource;

/// Static catalog (default data, or an alternate set for tests and other deployments).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StaticCatalog {
    assets: Vec<AssetOption>,
    paymaster_tokens: Vec<PaymasterToken>,
    networks: Vec<NetworkOption>,
}

impl StaticCatalog {
    pub fn new(
        assets: Vec<AssetOption>,
        paymaster_tokens: Vec<PaymasterToken>,
        networks: Vec<NetworkOption>,
    ) -> Self {
        Self { assets, paymaster_tokens, networks }
    }

    /// Load a catalog from JSON:
    /// `{"assets": [...], "paymaster_tokens": [...], "networks": [...]}`.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| SendkitError::Catalog(format!("failed to parse catalog: {}", e)))
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        let mainnet = "Ethereum Mainnet";
        let asset = |symbol: &str, name: &str, balance: f64| AssetOption {
            symbol: symbol.into(),
            name: name.into(),
            network: mainnet.into(),
            balance,
        };
        let token = |symbol: &str, name: &str, fee_rate: f64| PaymasterToken {
            symbol: symbol.into(),
            name: name.into(),
            network: mainnet.into(),
            fee_rate,
        };

        Self {
            assets: vec![
                asset("USDC", "USD Coin", 180.78),
                asset("WETH", "Wrapped Ether", 12.045),
                asset("DAI", "MakerDAO DAI", 170.13),
            ],
            paymaster_tokens: vec![
                token("DAI", "MakerDAO DAI", 0.0015),
                token("USDC", "USD Coin", 0.0015),
                token("OP", "Optimism", 0.0035),
            ],
            networks: vec![NetworkOption {
                value: "ethereum-mainnet".into(),
                label: mainnet.into(),
            }],
        }
    }
}

impl CatalogSource for StaticCatalog {
    fn assets(&self) -> &[AssetOption] {
        &self.assets
    }

    fn paymaster_tokens(&self) -> &[PaymasterToken] {
        &self.paymaster_tokens
    }

    fn networks(&self) -> &[NetworkOption] {
        &self.networks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_catalog_lookups() {
        let catalog = StaticCatalog::default();
        assert_eq!(catalog.assets().len(), 3);
        assert_eq!(catalog.find_asset("WETH").unwrap().balance, 12.045);
        assert_eq!(catalog.find_paymaster_token("OP").unwrap().fee_rate, 0.0035);
        assert_eq!(
            catalog.find_network("ethereum-mainnet").unwrap().label,
            "Ethereum Mainnet"
        );
        assert!(catalog.find_asset("").is_none());
        assert!(catalog.find_asset("usdc").is_none());
        assert!(catalog.find_network("Ethereum Mainnet").is_none());
    }

    #[test]
    fn test_from_json() {
        let json = r#"{
            "assets": [{"symbol": "ARB", "name": "Arbitrum", "network": "Arbitrum One", "balance": 5.5}],
            "paymaster_tokens": [{"symbol": "ARB", "name": "Arbitrum", "network": "Arbitrum One", "fee_rate": 0.002}],
            "networks": [{"value": "arbitrum-one", "label": "Arbitrum One"}]
        }"#;
        let catalog = StaticCatalog::from_json(json).unwrap();
        assert_eq!(catalog.find_asset("ARB").unwrap().balance, 5.5);
        assert!(catalog.find_asset("USDC").is_none());

        let err = StaticCatalog::from_json("{\"assets\": 1}").unwrap_err();
        assert!(matches!(err, SendkitError::Catalog(_)));
    }
}
