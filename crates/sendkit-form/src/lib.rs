//! Form state and derived values for a paymaster transfer.
//!
//! - Draft: five free-text fields, written without validation
//! - Derived: catalog selections, parsed amount, fee estimate, submit gate
//! - Summary: display strings for the review panel

use std::sync::Arc;

use sendkit_catalog::CatalogSource;
use sendkit_types::{
    AssetOption, DraftField, NetworkOption, PaymasterToken, Receipt, TransferDraft,
    TransferRequest,
};

pub mod summary;

pub use summary::{TransferSummary, PLACEHOLDER};

/// Notional gas quantity priced by the paymaster fee rate.
pub const NOTIONAL_FEE_UNITS: f64 = 12.0;

/// Parse a typed amount. Empty, non-numeric and non-finite input yields 0.
pub fn parse_amount(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Fee charged in the paymaster token; 0 when no token is selected.
pub fn estimated_fee(paymaster: Option<&PaymasterToken>) -> f64 {
    paymaster.map_or(0.0, |token| NOTIONAL_FEE_UNITS * token.fee_rate)
}

/// Whether the draft may be submitted.
///
/// Requires a non-blank recipient, a positive amount, an asset and paymaster
/// token that exist in the catalog, and a non-empty network. The network is
/// passed through as typed.
pub fn can_submit(draft: &TransferDraft, catalog: &dyn CatalogSource) -> bool {
    !draft.recipient.trim().is_empty()
        && parse_amount(&draft.amount) > 0.0
        && catalog.find_asset(&draft.asset_symbol).is_some()
        && catalog.find_paymaster_token(&draft.paymaster_symbol).is_some()
        && !draft.network.is_empty()
}

/// Build the backend request. Asset and paymaster fall back to the raw field
/// when the catalog has no match.
pub fn build_request(draft: &TransferDraft, catalog: &dyn CatalogSource) -> TransferRequest {
    let asset = catalog
        .find_asset(&draft.asset_symbol)
        .map_or_else(|| draft.asset_symbol.clone(), |a| a.symbol.clone());
    let paymaster = catalog
        .find_paymaster_token(&draft.paymaster_symbol)
        .map_or_else(|| draft.paymaster_symbol.clone(), |t| t.symbol.clone());

    TransferRequest {
        asset,
        amount: draft.amount.clone(),
        recipient: draft.recipient.clone(),
        paymaster,
        network: draft.network.clone(),
    }
}

/// Owns the draft and reads derived values against the injected catalog.
pub struct FormStore {
    draft: TransferDraft,
    catalog: Arc<dyn CatalogSource>,
}

impl FormStore {
    pub fn new(catalog: Arc<dyn CatalogSource>) -> Self {
        Self {
            draft: TransferDraft::default(),
            catalog,
        }
    }

    pub fn draft(&self) -> &TransferDraft {
        &self.draft
    }

    pub fn catalog(&self) -> &dyn CatalogSource {
        self.catalog.as_ref()
    }

    /// Replace one field, leaving the others untouched.
    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        *field.slot(&mut self.draft) = value.into();
    }

    /// Fill the amount with the selected asset's full balance.
    ///
    /// Returns `false` (and changes nothing) when no asset is selected.
    pub fn set_max_amount(&mut self) -> bool {
        let Some(balance) = self.selected_asset().map(|a| a.balance) else {
            return false;
        };
        self.draft.amount = balance.to_string();
        true
    }

    /// Replace the draft with the empty draft.
    pub fn reset(&mut self) {
        self.draft = TransferDraft::default();
    }

    pub fn selected_asset(&self) -> Option<&AssetOption> {
        self.catalog.find_asset(&self.draft.asset_symbol)
    }

    pub fn selected_paymaster(&self) -> Option<&PaymasterToken> {
        self.catalog.find_paymaster_token(&self.draft.paymaster_symbol)
    }

    pub fn selected_network(&self) -> Option<&NetworkOption> {
        self.catalog.find_network(&self.draft.network)
    }

    pub fn amount_number(&self) -> f64 {
        parse_amount(&self.draft.amount)
    }

    pub fn estimated_fee(&self) -> f64 {
        estimated_fee(self.selected_paymaster())
    }

    pub fn can_submit(&self) -> bool {
        can_submit(&self.draft, self.catalog.as_ref())
    }

    pub fn to_request(&self) -> TransferRequest {
        build_request(&self.draft, self.catalog.as_ref())
    }

    pub fn summary(&self, resolved: Option<&str>, receipt: Option<&Receipt>) -> TransferSummary {
        TransferSummary::build(self, resolved, receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sendkit_catalog::StaticCatalog;

    fn store() -> FormStore {
        FormStore::new(Arc::new(StaticCatalog::default()))
    }

    fn complete_draft() -> TransferDraft {
        TransferDraft {
            asset_symbol: "USDC".into(),
            amount: "10".into(),
            recipient: "vitalik.eth".into(),
            paymaster_symbol: "DAI".into(),
            network: "ethereum-mainnet".into(),
        }
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("   "), 0.0);
        assert_eq!(parse_amount("abc"), 0.0);
        assert_eq!(parse_amount("1.5"), 1.5);
        assert_eq!(parse_amount(" 2 "), 2.0);
        assert_eq!(parse_amount("-3"), -3.0);
        assert_eq!(parse_amount("inf"), 0.0);
        assert_eq!(parse_amount("NaN"), 0.0);
    }

    #[test]
    fn test_can_submit_requires_every_condition() {
        let catalog = StaticCatalog::default();
        assert!(can_submit(&complete_draft(), &catalog));

        let breakers: [fn(&mut TransferDraft); 7] = [
            |d| d.recipient = "   ".into(),
            |d| d.amount = "0".into(),
            |d| d.amount = "not a number".into(),
            |d| d.asset_symbol = "".into(),
            |d| d.asset_symbol = "BTC".into(),
            |d| d.paymaster_symbol = "WETH".into(),
            |d| d.network = "".into(),
        ];
        for breaker in breakers {
            let mut draft = complete_draft();
            breaker(&mut draft);
            assert!(!can_submit(&draft, &catalog), "draft should be rejected: {:?}", draft);
        }
    }

    #[test]
    fn test_network_outside_catalog_is_accepted() {
        let catalog = StaticCatalog::default();
        let mut draft = complete_draft();
        draft.network = "polygon".into();
        assert!(can_submit(&draft, &catalog));
        assert_eq!(build_request(&draft, &catalog).network, "polygon");
    }

    #[test]
    fn test_can_submit_does_not_require_resolvable_recipient() {
        let catalog = StaticCatalog::default();
        let mut draft = complete_draft();
        draft.recipient = "0xAbC123".into();
        assert!(can_submit(&draft, &catalog));
    }

    #[test]
    fn test_set_field_leaves_other_fields() {
        let mut form = store();
        form.set_field(DraftField::AssetSymbol, "WETH");
        form.set_field(DraftField::Amount, "1");
        form.set_field(DraftField::Amount, "2");
        assert_eq!(form.draft().asset_symbol, "WETH");
        assert_eq!(form.draft().amount, "2");
        assert_eq!(form.draft().recipient, "");
    }

    #[test]
    fn test_estimated_fee() {
        let mut form = store();
        assert_eq!(form.estimated_fee(), 0.0);
        form.set_field(DraftField::PaymasterSymbol, "OP");
        assert!((form.estimated_fee() - 0.042).abs() < 1e-12);
        // Independent of the amount.
        form.set_field(DraftField::Amount, "1000");
        assert!((form.estimated_fee() - 0.042).abs() < 1e-12);
    }

    #[test]
    fn test_set_max_amount() {
        let mut form = store();
        assert!(!form.set_max_amount());
        assert_eq!(form.draft().amount, "");

        form.set_field(DraftField::AssetSymbol, "WETH");
        assert!(form.set_max_amount());
        assert_eq!(form.draft().amount, "12.045");
        assert_eq!(form.amount_number(), 12.045);
    }

    #[test]
    fn test_request_falls_back_to_raw_fields() {
        let catalog = StaticCatalog::default();
        let mut draft = complete_draft();
        draft.asset_symbol = "BTC".into();
        draft.paymaster_symbol = "GAS".into();
        let request = build_request(&draft, &catalog);
        assert_eq!(request.asset, "BTC");
        assert_eq!(request.paymaster, "GAS");
        assert_eq!(request.amount, "10");
        assert_eq!(request.recipient, "vitalik.eth");
        assert_eq!(request.network, "ethereum-mainnet");
    }

    #[test]
    fn test_reset() {
        let mut form = store();
        form.set_field(DraftField::Recipient, "vitalik.eth");
        form.reset();
        assert!(form.draft().is_empty());
    }
}
