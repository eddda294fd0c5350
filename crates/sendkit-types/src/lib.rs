use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 0x-prefixed hex string (e.g. "0x1234...").
pub type Hex = String;

/// Reason recorded when a transfer fails without a specific message.
pub const DEFAULT_TRANSFER_ERROR: &str = "Unable to queue transfer right now.";

/// Number of hex digits in a receipt hash (32 bytes).
pub const RECEIPT_HASH_HEX_LEN: usize = 64;

/// Sendkit error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendkitError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    TransferRejected(String),

    #[error("name resolution failed: {0}")]
    Resolution(String),

    #[error("auth error: {0}")]
    Auth(String),

    #[error("catalog error: {0}")]
    Catalog(String),

    #[error("form is locked while a transfer is in progress")]
    FormLocked,

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SendkitError>;

/// A transferable asset with the user's available balance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetOption {
    pub symbol: String,
    pub name: String,
    pub network: String,
    pub balance: f64,
}

/// A token the paymaster accepts as gas payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymasterToken {
    pub symbol: String,
    pub name: String,
    pub network: String,
    pub fee_rate: f64,
}

/// A destination network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkOption {
    pub value: String,
    pub label: String,
}

/// The user's current, unsubmitted transfer input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferDraft {
    pub asset_symbol: String,
    pub amount: String, // decimal string as typed
    pub recipient: String,
    pub paymaster_symbol: String,
    pub network: String,
}

impl TransferDraft {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Names one field of a [`TransferDraft`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    AssetSymbol,
    Amount,
    Recipient,
    PaymasterSymbol,
    Network,
}

impl DraftField {
    pub const ALL: [DraftField; 5] = [
        DraftField::AssetSymbol,
        DraftField::Amount,
        DraftField::Recipient,
        DraftField::PaymasterSymbol,
        DraftField::Network,
    ];

    pub fn get<'a>(&self, draft: &'a TransferDraft) -> &'a str {
        match self {
            DraftField::AssetSymbol => &draft.asset_symbol,
            DraftField::Amount => &draft.amount,
            DraftField::Recipient => &draft.recipient,
            DraftField::PaymasterSymbol => &draft.paymaster_symbol,
            DraftField::Network => &draft.network,
        }
    }

    pub fn slot<'a>(&self, draft: &'a mut TransferDraft) -> &'a mut String {
        match self {
            DraftField::AssetSymbol => &mut draft.asset_symbol,
            DraftField::Amount => &mut draft.amount,
            DraftField::Recipient => &mut draft.recipient,
            DraftField::PaymasterSymbol => &mut draft.paymaster_symbol,
            DraftField::Network => &mut draft.network,
        }
    }
}

/// Payload sent to the transfer backend. All fields are plain strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub asset: String,
    pub amount: String,
    pub recipient: String,
    pub paymaster: String,
    pub network: String,
}

/// Backend response for an accepted transfer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResponse {
    pub hash: Hex,
}

/// Status of the single live submission attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransferStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

impl TransferStatus {
    /// `success` or `error`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferStatus::Success | TransferStatus::Error)
    }
}

/// Proof that a transfer was accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub hash: Hex,
}

impl Receipt {
    /// Wrap a hash, rejecting anything that is not `0x` + 64 lowercase hex digits.
    pub fn new(hash: impl Into<Hex>) -> Result<Self> {
        let hash = hash.into();
        if !is_receipt_hash(&hash) {
            return Err(SendkitError::InvalidHex(hash));
        }
        Ok(Self { hash })
    }
}

/// Whether `value` is `0x` followed by exactly 64 lowercase hex digits.
pub fn is_receipt_hash(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(digits) => {
            digits.len() == RECEIPT_HASH_HEX_LEN
                && digits.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        }
        None => false,
    }
}

/// Convert bytes to a 0x-prefixed hex string.
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_hash_shape() {
        let good = format!("0x{}", "ab".repeat(32));
        assert!(is_receipt_hash(&good));
        assert!(Receipt::new(good).is_ok());

        assert!(!is_receipt_hash(&"ab".repeat(32)));
        assert!(!is_receipt_hash(&format!("0x{}", "AB".repeat(32))));
        assert!(!is_receipt_hash(&format!("0x{}", "ab".repeat(31))));
        assert!(matches!(Receipt::new("0x12"), Err(SendkitError::InvalidHex(_))));
    }

    #[test]
    fn test_bytes_to_hex() {
        assert_eq!(bytes_to_hex(&[0x00, 0xff, 0x10]), "0x00ff10");
        assert!(is_receipt_hash(&bytes_to_hex(&[0xab; 32])));
    }

    #[test]
    fn test_draft_field_access() {
        let mut draft = TransferDraft::default();
        assert!(draft.is_empty());
        *DraftField::Recipient.slot(&mut draft) = "vitalik.eth".into();
        assert_eq!(DraftField::Recipient.get(&draft), "vitalik.eth");
        assert!(!draft.is_empty());
        for field in DraftField::ALL {
            if field != DraftField::Recipient {
                assert_eq!(field.get(&draft), "");
            }
        }
    }

    #[test]
    fn test_status_terminal() {
        assert!(!TransferStatus::Idle.is_terminal());
        assert!(!TransferStatus::Loading.is_terminal());
        assert!(TransferStatus::Success.is_terminal());
        assert!(TransferStatus::Error.is_terminal());
        assert_eq!(TransferStatus::default(), TransferStatus::Idle);
    }
}
