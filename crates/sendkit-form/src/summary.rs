//! Review-panel view of the draft.

use serde::{Deserialize, Serialize};
use sendkit_types::Receipt;

use crate::FormStore;

/// Shown for any value that is not available yet.
pub const PLACEHOLDER: &str = "—";

pub const EXPLORER_BASE_URL: &str = "https://etherscan.io/tx/";

const COMPACT_UNITS: [(f64, &str); 4] = [(1e3, "K"), (1e6, "M"), (1e9, "B"), (1e12, "T")];

/// Receipt hash rendered as an explorer link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReceiptLink {
    pub label: String,
    pub url: String,
}

/// Display strings for every row of the review panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSummary {
    pub asset: String,
    pub available: String,
    pub network: String,
    pub amount: String,
    pub recipient: String,
    /// Raw recipient input, present when a resolved address is displayed instead.
    pub recipient_input: Option<String>,
    pub paymaster: String,
    pub estimated_fee: String,
    pub receipt: Option<ReceiptLink>,
}

impl TransferSummary {
    pub(crate) fn build(
        form: &FormStore,
        resolved: Option<&str>,
        receipt: Option<&Receipt>,
    ) -> Self {
        let draft = form.draft();
        let asset = form.selected_asset();
        let paymaster = form.selected_paymaster();

        let amount = if draft.amount.is_empty() {
            PLACEHOLDER.to_string()
        } else {
            match asset {
                Some(a) => format!("{} {}", draft.amount, a.symbol),
                None => draft.amount.clone(),
            }
        };

        let (recipient, recipient_input) = if draft.recipient.is_empty() {
            (PLACEHOLDER.to_string(), None)
        } else {
            let shown = truncate_middle(resolved.unwrap_or(&draft.recipient));
            let input = resolved
                .filter(|r| *r != draft.recipient)
                .map(|_| draft.recipient.clone());
            (shown, input)
        };

        let fee = form.estimated_fee();
        let estimated_fee = match paymaster {
            Some(token) if fee > 0.0 => format!("{} {}", format_amount(fee), token.symbol),
            _ => PLACEHOLDER.to_string(),
        };

        Self {
            asset: asset.map_or_else(|| PLACEHOLDER.to_string(), |a| a.symbol.clone()),
            available: asset.map_or_else(
                || PLACEHOLDER.to_string(),
                |a| format!("{} {}", format_balance(a.balance), a.symbol),
            ),
            network: form
                .selected_network()
                .map_or_else(|| PLACEHOLDER.to_string(), |n| n.label.clone()),
            amount,
            recipient,
            recipient_input,
            paymaster: paymaster.map_or_else(|| PLACEHOLDER.to_string(), |t| t.symbol.clone()),
            estimated_fee,
            receipt: receipt.map(|r| ReceiptLink {
                label: truncate_middle(&r.hash),
                url: explorer_url(&r.hash),
            }),
        }
    }
}

pub fn explorer_url(hash: &str) -> String {
    format!("{}{}", EXPLORER_BASE_URL, hash)
}

/// Keep the first 6 and last 4 characters of anything longer than 12.
pub fn truncate_middle(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 12 {
        return value.to_string();
    }
    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}…{}", head, tail)
}

/// en-US number with thousands separators and 2 to 4 fraction digits.
///
/// Ties round away from zero (`0.03125` → `0.0313`).
pub fn format_amount(value: f64) -> String {
    let rounded = (value.abs() * 10_000.0).round() / 10_000.0;
    let fixed = format!("{:.4}", rounded);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let mut frac = frac_part.trim_end_matches('0').to_string();
    while frac.len() < 2 {
        frac.push('0');
    }
    let negative = value < 0.0 && fixed.bytes().any(|b| matches!(b, b'1'..=b'9'));
    format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        group_thousands(int_part),
        frac
    )
}

/// Compact notation (`1.5K`, `2M`) from 1000 upward, [`format_amount`] below.
pub fn format_balance(value: f64) -> String {
    if value < COMPACT_UNITS[0].0 {
        return format_amount(value);
    }
    let mut idx = COMPACT_UNITS
        .iter()
        .rposition(|(scale, _)| value >= *scale)
        .unwrap_or(0);
    let mut scaled = round_to_hundredths(value / COMPACT_UNITS[idx].0);
    // 999_999 rounds to 1000K; promote it to 1M.
    if scaled >= 1000.0 && idx + 1 < COMPACT_UNITS.len() {
        idx += 1;
        scaled = round_to_hundredths(value / COMPACT_UNITS[idx].0);
    }
    let text = format!("{:.2}", scaled);
    let text = text.trim_end_matches('0').trim_end_matches('.');
    format!("{}{}", text, COMPACT_UNITS[idx].1)
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use sendkit_catalog::StaticCatalog;
    use sendkit_types::DraftField;

    #[test]
    fn test_truncate_middle() {
        assert_eq!(truncate_middle("vitalik.eth"), "vitalik.eth");
        assert_eq!(truncate_middle("123456789012"), "123456789012");
        assert_eq!(
            truncate_middle("0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045"),
            "0xd8dA…6045"
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.018), "0.018");
        assert_eq!(format_amount(0.042), "0.042");
        assert_eq!(format_amount(1.0), "1.00");
        assert_eq!(format_amount(12.045), "12.045");
        assert_eq!(format_amount(0.123456), "0.1235");
        assert_eq!(format_amount(1234567.5), "1,234,567.50");
        assert_eq!(format_amount(-2.5), "-2.50");
    }

    #[test]
    fn test_format_amount_rounds_ties_away_from_zero() {
        assert_eq!(format_amount(0.03125), "0.0313");
        assert_eq!(format_amount(-0.03125), "-0.0313");
        assert_eq!(format_amount(0.00004), "0.00");
    }

    #[test]
    fn test_format_balance() {
        assert_eq!(format_balance(180.78), "180.78");
        assert_eq!(format_balance(1000.0), "1K");
        assert_eq!(format_balance(1234.0), "1.23K");
        assert_eq!(format_balance(1_500_000.0), "1.5M");
        assert_eq!(format_balance(999_999.0), "1M");
        assert_eq!(format_balance(2e12), "2T");
    }

    #[test]
    fn test_empty_summary_is_all_placeholders() {
        let form = FormStore::new(Arc::new(StaticCatalog::default()));
        let summary = form.summary(None, None);
        assert_eq!(summary.asset, PLACEHOLDER);
        assert_eq!(summary.available, PLACEHOLDER);
        assert_eq!(summary.network, PLACEHOLDER);
        assert_eq!(summary.amount, PLACEHOLDER);
        assert_eq!(summary.recipient, PLACEHOLDER);
        assert_eq!(summary.recipient_input, None);
        assert_eq!(summary.paymaster, PLACEHOLDER);
        assert_eq!(summary.estimated_fee, PLACEHOLDER);
        assert!(summary.receipt.is_none());
    }

    #[test]
    fn test_filled_summary() {
        let mut form = FormStore::new(Arc::new(StaticCatalog::default()));
        form.set_field(DraftField::AssetSymbol, "USDC");
        form.set_field(DraftField::Amount, "25");
        form.set_field(DraftField::Recipient, "vitalik.eth");
        form.set_field(DraftField::PaymasterSymbol, "DAI");
        form.set_field(DraftField::Network, "ethereum-mainnet");

        let resolved = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";
        let receipt = Receipt::new(format!("0x{}", "0f".repeat(32))).unwrap();
        let summary = form.summary(Some(resolved), Some(&receipt));

        assert_eq!(summary.asset, "USDC");
        assert_eq!(summary.available, "180.78 USDC");
        assert_eq!(summary.network, "Ethereum Mainnet");
        assert_eq!(summary.amount, "25 USDC");
        assert_eq!(summary.recipient, "0xd8dA…6045");
        assert_eq!(summary.recipient_input.as_deref(), Some("vitalik.eth"));
        assert_eq!(summary.paymaster, "DAI");
        assert_eq!(summary.estimated_fee, "0.018 DAI");

        let link = summary.receipt.unwrap();
        assert_eq!(link.label, "0x0f0f…0f0f");
        assert_eq!(link.url, format!("{}{}", EXPLORER_BASE_URL, receipt.hash));
    }

    #[test]
    fn test_unresolved_recipient_shows_raw_input() {
        let mut form = FormStore::new(Arc::new(StaticCatalog::default()));
        form.set_field(DraftField::Recipient, "nobody.eth");
        let summary = form.summary(None, None);
        assert_eq!(summary.recipient, "nobody.eth");
        assert_eq!(summary.recipient_input, None);
    }
}
