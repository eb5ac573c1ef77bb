//! Proptest generators for property-based testing.

use proptest::prelude::*;

use bitcoin::secp256k1::SecretKey;
use tipfeed_core::{Address, Comment, DocumentId, DocumentTips, Network, Tip};

/// Generate a random DocumentId.
pub fn document_id() -> impl Strategy<Value = DocumentId> {
    any::<[u8; 20]>().prop_map(DocumentId::from_bytes)
}

/// Generate a network.
pub fn network() -> impl Strategy<Value = Network> {
    prop_oneof![Just(Network::Main), Just(Network::Test)]
}

/// Generate an opaque address string.
///
/// These are shaped like base58 identities but carry no checksum; the
/// gate compares addresses by string equality, so that is all it needs.
pub fn address() -> impl Strategy<Value = Address> {
    "[13][1-9A-HJ-NP-Za-km-z]{25,34}".prop_map(Address::new)
}

/// Generate a printable, non-empty comment body.
pub fn comment_body() -> impl Strategy<Value = String> {
    "[ -~]{1,200}".prop_map(String::from)
}

/// Generate a comment.
pub fn comment() -> impl Strategy<Value = Comment> {
    (comment_body(), address()).prop_map(|(body, author)| Comment { body, author })
}

/// Generate a tip with one to three source addresses.
pub fn tip() -> impl Strategy<Value = Tip> {
    prop::collection::vec(address(), 1..=3).prop_map(Tip::new)
}

/// Generate a document's tip record.
pub fn document_tips() -> impl Strategy<Value = DocumentTips> {
    (
        prop::collection::vec(address(), 0..=2),
        prop::collection::vec(tip(), 0..=4),
    )
        .prop_map(|(source_addresses, tips)| DocumentTips {
            source_addresses,
            tips,
        })
}

/// Generate a seed that is a valid secp256k1 secret key.
pub fn wallet_seed() -> impl Strategy<Value = [u8; 32]> {
    any::<[u8; 32]>().prop_filter("valid secret key", |seed| SecretKey::from_slice(seed).is_ok())
}
