//! Self-checking signature vectors.
//!
//! Each vector is a deterministic (seed, network, message) triple. The
//! signature scheme is deterministic end to end (RFC 6979 nonces), so
//! every implementation must resolve a vector to the same address and the
//! same base64 signature, and that signature must verify under the
//! vector's network and fail under the other.

use serde::{Deserialize, Serialize};

use tipfeed_core::{verify_signed_message, Address, Network};

use crate::fixtures::Wallet;

/// A single signature vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignatureVector {
    pub name: String,
    pub description: String,
    /// 32-byte wallet seed, hex.
    pub seed: String,
    pub network: Network,
    pub message: String,
}

/// A vector resolved into concrete material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedVector {
    pub name: String,
    pub address: Address,
    pub signature: String,
}

fn vector(name: &str, description: &str, seed: [u8; 32], network: Network, message: &str) -> SignatureVector {
    SignatureVector {
        name: name.to_string(),
        description: description.to_string(),
        seed: hex::encode(seed),
        network,
        message: message.to_string(),
    }
}

/// All signature vectors.
pub fn all_vectors() -> Vec<SignatureVector> {
    vec![
        vector(
            "simple-main",
            "Plain ASCII message on mainnet",
            [0x42; 32],
            Network::Main,
            "hello",
        ),
        vector(
            "simple-test",
            "Plain ASCII message on testnet",
            [0x42; 32],
            Network::Test,
            "hello",
        ),
        vector(
            "empty-message",
            "Zero-length message still signs and verifies",
            [0x43; 32],
            Network::Main,
            "",
        ),
        vector(
            "unicode",
            "Multi-byte UTF-8 body",
            [0x44; 32],
            Network::Main,
            "tips gratefully received \u{26a1} danke sch\u{f6}n",
        ),
        vector(
            "long-message",
            "Body longer than one digest block",
            [0x45; 32],
            Network::Main,
            "All work and no pay makes the commons a dull place. \
             All work and no pay makes the commons a dull place. \
             All work and no pay makes the commons a dull place.",
        ),
    ]
}

/// Resolve a vector: derive the wallet, the address, and the signature.
pub fn resolve_vector(v: &SignatureVector) -> ResolvedVector {
    let seed_bytes = hex::decode(&v.seed).expect("vector seed is hex");
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&seed_bytes);

    let wallet = Wallet::from_seed(&seed, v.network);
    ResolvedVector {
        name: v.name.clone(),
        address: wallet.address(),
        signature: wallet.sign_message(&v.message),
    }
}

/// Resolve and verify every vector. Returns false if any fails.
pub fn verify_all_vectors() -> bool {
    all_vectors().iter().all(|v| {
        let resolved = resolve_vector(v);
        verify_signed_message(&resolved.address, &resolved.signature, &v.message, v.network)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_vectors_verify() {
        assert!(verify_all_vectors());
    }

    #[test]
    fn test_vectors_fail_on_the_other_network() {
        for v in all_vectors() {
            let resolved = resolve_vector(&v);
            let other = match v.network {
                Network::Main => Network::Test,
                Network::Test => Network::Main,
            };
            assert!(
                !verify_signed_message(&resolved.address, &resolved.signature, &v.message, other),
                "vector {} verified across networks",
                v.name
            );
        }
    }

    #[test]
    fn test_resolution_is_deterministic() {
        for v in all_vectors() {
            let a = resolve_vector(&v);
            let b = resolve_vector(&v);
            assert_eq!(a.address, b.address, "vector {}", v.name);
            assert_eq!(a.signature, b.signature, "vector {}", v.name);
        }
    }

    #[test]
    fn test_vectors_serialize() {
        let json = serde_json::to_string_pretty(&all_vectors()).unwrap();
        let back: Vec<SignatureVector> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), all_vectors().len());
    }
}
