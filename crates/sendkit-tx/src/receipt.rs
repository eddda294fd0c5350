//! Receipt hash generation.
//!
//! hash = sha256(json(request) || nonce), nonce = 32 random bytes.
//!
//! The digest is always 32 bytes, so the hex form is exactly 64 digits no
//! matter what the randomness source produces.

use rand::RngCore;
use sha2::{Digest, Sha256};
use sendkit_types::{bytes_to_hex, Hex, TransferRequest};

/// Derive a fresh `0x`-prefixed 64-hex-digit receipt hash.
pub fn generate_receipt_hash<R: RngCore + ?Sized>(rng: &mut R, request: &TransferRequest) -> Hex {
    let mut nonce = [0u8; 32];
    rng.fill_bytes(&mut nonce);

    let mut hasher = Sha256::new();
    // Plain-string struct; serialization does not fail.
    hasher.update(serde_json::to_vec(request).unwrap_or_default());
    hasher.update(nonce);
    bytes_to_hex(&hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use sendkit_types::is_receipt_hash;

    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }
        fn next_u64(&mut self) -> u64 {
            0
        }
        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> std::result::Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    #[test]
    fn test_hash_shape() {
        let mut rng = StdRng::seed_from_u64(7);
        let request = TransferRequest::default();
        for _ in 0..100 {
            let hash = generate_receipt_hash(&mut rng, &request);
            assert!(is_receipt_hash(&hash), "bad hash {}", hash);
        }
    }

    #[test]
    fn test_degenerate_rng_still_yields_full_hash() {
        let request = TransferRequest {
            asset: "USDC".into(),
            amount: "1".into(),
            recipient: "vitalik.eth".into(),
            paymaster: "DAI".into(),
            network: "ethereum-mainnet".into(),
        };
        let hash = generate_receipt_hash(&mut ZeroRng, &request);
        assert!(is_receipt_hash(&hash));
        assert_ne!(hash, format!("0x{}", "0".repeat(64)));
    }

    #[test]
    fn test_hashes_are_unique() {
        let mut rng = StdRng::seed_from_u64(42);
        let request = TransferRequest::default();
        let a = generate_receipt_hash(&mut rng, &request);
        let b = generate_receipt_hash(&mut rng, &request);
        assert_ne!(a, b);
    }
}
