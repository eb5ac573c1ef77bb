//! Signed-message verification.
//!
//! Implements the Bitcoin signed-message scheme: a base64 compact
//! recoverable ECDSA signature over the canonical message digest, checked
//! against the claimed P2PKH address for the requested network.
//!
//! Verification is fail-closed. Malformed addresses, malformed signatures,
//! recovery failures and network mismatches are all a non-match (`false`),
//! never a panic or an error.

use bitcoin::address::NetworkUnchecked;
use bitcoin::secp256k1::Secp256k1;
use bitcoin::sign_message::{signed_msg_hash, MessageSignature};
use bitcoin::{Address as BtcAddress, Network as BtcNetwork};

use crate::types::{Address, Network};

/// Map the request network onto concrete signature/address parameters.
fn params(network: Network) -> BtcNetwork {
    match network {
        Network::Main => BtcNetwork::Bitcoin,
        Network::Test => BtcNetwork::Testnet,
    }
}

/// Verify that `signature` was produced by `address` over `message`.
///
/// The network is an explicit argument, never inferred from the address
/// string, so the same address cannot be replayed across networks: an
/// address that does not belong to `network` is a non-match.
///
/// Deterministic and side-effect-free.
pub fn verify_signed_message(
    address: &Address,
    signature: &str,
    message: &str,
    network: Network,
) -> bool {
    let claimed = match address.as_str().parse::<BtcAddress<NetworkUnchecked>>() {
        Ok(a) => a,
        Err(_) => return false,
    };
    let claimed = match claimed.require_network(params(network)) {
        Ok(a) => a,
        Err(_) => return false,
    };
    let sig = match MessageSignature::from_base64(signature) {
        Ok(s) => s,
        Err(_) => return false,
    };

    let secp = Secp256k1::verification_only();
    let digest = signed_msg_hash(message);
    sig.is_signed_by_address(&secp, &claimed, digest)
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Valid mainnet P2PKH address, used only as a parse target.
    const MAIN_ADDR: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

    #[test]
    fn test_malformed_address_is_non_match() {
        let addr = Address::from("not an address");
        assert!(!verify_signed_message(&addr, "sig", "msg", Network::Main));
    }

    #[test]
    fn test_malformed_signature_is_non_match() {
        let addr = Address::from(MAIN_ADDR);
        assert!(!verify_signed_message(
            &addr,
            "!!! not base64 !!!",
            "msg",
            Network::Main
        ));
    }

    #[test]
    fn test_wrong_length_signature_is_non_match() {
        let addr = Address::from(MAIN_ADDR);
        // Valid base64, wrong payload length for a compact recoverable sig.
        assert!(!verify_signed_message(&addr, "aGVsbG8=", "msg", Network::Main));
    }

    #[test]
    fn test_network_mismatch_is_non_match() {
        // A mainnet address presented against testnet parameters fails
        // before any signature work happens.
        let addr = Address::from(MAIN_ADDR);
        assert!(!verify_signed_message(&addr, "aGVsbG8=", "msg", Network::Test));
    }

    proptest! {
        #[test]
        fn test_never_panics_on_garbage(
            addr in ".*",
            sig in ".*",
            msg in ".*",
        ) {
            // A signature prefixed with '!' can never be valid base64, so
            // the result is a guaranteed non-match; the point is that no
            // input combination panics.
            let address = Address::new(addr);
            let garbled = format!("!{}", sig);
            prop_assert!(!verify_signed_message(&address, &garbled, &msg, Network::Main));
            prop_assert!(!verify_signed_message(&address, &garbled, &msg, Network::Test));
        }
    }
}
