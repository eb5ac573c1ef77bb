//! Strong type definitions for tipfeed.
//!
//! All identifiers are newtypes to prevent misuse at compile time.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// A 20-byte document fingerprint, carried on the wire as a 40-char hex string.
///
/// This is the natural key for tips and comments. It is assigned outside
/// this core (the fingerprint of the document's content) and never mutated.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentId(pub [u8; 20]);

impl DocumentId {
    /// Create a new DocumentId from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Convert to hex string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 40-char hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s).map_err(|e| CoreError::InvalidDocumentId(e.to_string()))?;
        if bytes.len() != 20 {
            return Err(CoreError::InvalidDocumentId(format!(
                "expected 20 bytes, got {}",
                bytes.len()
            )));
        }
        let mut arr = [0u8; 20];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Debug for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DocumentId({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl AsRef<[u8]> for DocumentId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for DocumentId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl FromStr for DocumentId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// A network-specific identity string proving a holder's signing key.
///
/// Addresses are never minted by this core; they arrive from the address
/// oracle or inside a document's tip records, and compare by string equality.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The address as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.0)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// The signature/address-format variant governing verification.
///
/// Carried per request. Ownership proofs, tip lookups and signature checks
/// for a single request must all use the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    #[serde(rename = "mainnet")]
    Main,
    #[serde(rename = "testnet")]
    Test,
}

impl Network {
    /// The wire name of this network.
    pub fn as_str(&self) -> &'static str {
        match self {
            Network::Main => "mainnet",
            Network::Test => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Network {
    type Err = CoreError;

    /// Strict parse over the wire names. Anything else is an error; callers
    /// treat an unparseable network as absent and fail closed.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mainnet" => Ok(Network::Main),
            "testnet" => Ok(Network::Test),
            other => Err(CoreError::UnknownNetwork(other.to_string())),
        }
    }
}

/// A single comment in a document's feed.
///
/// Created on a successful post, immutable thereafter. There is no
/// delete or edit lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// The comment text.
    pub body: String,
    /// The verified address that posted it.
    pub author: Address,
}

impl Comment {
    /// Create a new comment.
    pub fn new(body: impl Into<String>, author: Address) -> Self {
        Self {
            body: body.into(),
            author,
        }
    }
}

/// An on-ledger tip record associated with a document.
///
/// Owned by the tip oracle, read-only here. Only the first-listed source
/// address identifies the tipper; co-signers beyond index 0 do not count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tip {
    /// Ordered source addresses, at least one.
    pub source_addresses: Vec<Address>,
}

impl Tip {
    /// Create a tip from its source addresses.
    pub fn new(source_addresses: Vec<Address>) -> Self {
        Self { source_addresses }
    }

    /// The tipper of record: the first-listed source address.
    pub fn tipper(&self) -> Option<&Address> {
        self.source_addresses.first()
    }
}

/// A document's declared source addresses and its tip set, as returned by
/// the tip oracle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentTips {
    /// The document's own declared source addresses.
    pub source_addresses: Vec<Address>,
    /// Qualifying tips placed against the document.
    pub tips: Vec<Tip>,
}

impl DocumentTips {
    /// The document's primary source address, if declared.
    pub fn primary_source(&self) -> Option<&Address> {
        self.source_addresses.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_id_hex_roundtrip() {
        let id = DocumentId::from_bytes([0x42; 20]);
        let hex = id.to_hex();
        let recovered = DocumentId::from_hex(&hex).unwrap();
        assert_eq!(id, recovered);
    }

    #[test]
    fn test_document_id_rejects_wrong_length() {
        assert!(DocumentId::from_hex("abcd").is_err());
        assert!(DocumentId::from_hex(&"00".repeat(32)).is_err());
    }

    #[test]
    fn test_document_id_rejects_non_hex() {
        assert!(DocumentId::from_hex(&"zz".repeat(20)).is_err());
    }

    #[test]
    fn test_document_id_display() {
        let id = DocumentId::from_bytes([0xab; 20]);
        assert_eq!(format!("{}", id), "ab".repeat(20));
        assert!(format!("{:?}", id).starts_with("DocumentId("));
    }

    #[test]
    fn test_network_parse() {
        assert_eq!("mainnet".parse::<Network>().unwrap(), Network::Main);
        assert_eq!("testnet".parse::<Network>().unwrap(), Network::Test);
        assert!("bitcoin".parse::<Network>().is_err());
        assert!("".parse::<Network>().is_err());
    }

    #[test]
    fn test_comment_serde_roundtrip() {
        let comment = Comment::new("hello", Address::from("addrA"));
        let json = serde_json::to_string(&comment).unwrap();
        let back: Comment = serde_json::from_str(&json).unwrap();
        assert_eq!(comment, back);
    }

    #[test]
    fn test_tipper_is_first_source() {
        let tip = Tip::new(vec![Address::from("a0"), Address::from("a1")]);
        assert_eq!(tip.tipper(), Some(&Address::from("a0")));
    }
}
