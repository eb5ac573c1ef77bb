//! Test fixtures and helpers.
//!
//! Common setup code for integration tests: wallets that sign like real
//! wallets, oracles with canned answers, and a memory-backed store.

use std::collections::HashMap;

use async_trait::async_trait;
use bitcoin::hashes::Hash as _;
use bitcoin::secp256k1::{Message, Secp256k1, SecretKey};
use bitcoin::sign_message::{signed_msg_hash, MessageSignature};
use bitcoin::{Address as BtcAddress, Network as BtcNetwork, PublicKey};
use rand::RngCore;

use tipfeed_auth::{AddressOracle, OracleError, RequestContext, TipOracle};
use tipfeed_core::{Address, DocumentId, DocumentTips, Network, Tip};
use tipfeed_store::MemoryStore;

fn btc_network(network: Network) -> BtcNetwork {
    match network {
        Network::Main => BtcNetwork::Bitcoin,
        Network::Test => BtcNetwork::Testnet,
    }
}

/// A deterministic wallet that produces real signed messages.
///
/// Wraps a secp256k1 secret key; the address is the wallet's P2PKH
/// address for its network.
#[derive(Clone)]
pub struct Wallet {
    secret: SecretKey,
    network: Network,
}

impl Wallet {
    /// Generate a new random wallet.
    pub fn generate(network: Network) -> Self {
        let mut rng = rand::thread_rng();
        loop {
            let mut seed = [0u8; 32];
            rng.fill_bytes(&mut seed);
            if let Ok(secret) = SecretKey::from_slice(&seed) {
                return Self { secret, network };
            }
        }
    }

    /// Create from a 32-byte seed. The seed must be a valid secret key
    /// (not zero and below the curve order); fixed test seeds like
    /// `[0x42; 32]` are fine.
    pub fn from_seed(seed: &[u8; 32], network: Network) -> Self {
        let secret = SecretKey::from_slice(seed).expect("seed is a valid secret key");
        Self { secret, network }
    }

    /// The wallet's network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// The wallet's address string.
    pub fn address(&self) -> Address {
        let secp = Secp256k1::new();
        let pk = PublicKey::new(self.secret.public_key(&secp));
        Address::new(BtcAddress::p2pkh(&pk, btc_network(self.network)).to_string())
    }

    /// Produce a detached signed-message signature over `message`.
    pub fn sign_message(&self, message: &str) -> String {
        let secp = Secp256k1::new();
        let digest = signed_msg_hash(message);
        let msg = Message::from_digest(digest.to_byte_array());
        let sig = secp.sign_ecdsa_recoverable(&msg, &self.secret);
        MessageSignature::new(sig, true).to_base64()
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Wallet({})", self.address())
    }
}

/// An address oracle with a canned answer.
pub struct StaticAddressOracle(Option<Address>);

impl StaticAddressOracle {
    /// Always yield the given verified address.
    pub fn verified(address: Address) -> Self {
        Self(Some(address))
    }

    /// Never yield an address.
    pub fn anonymous() -> Self {
        Self(None)
    }
}

#[async_trait]
impl AddressOracle for StaticAddressOracle {
    async fn verified_address(
        &self,
        _ctx: &RequestContext,
    ) -> Result<Option<Address>, OracleError> {
        Ok(self.0.clone())
    }
}

/// A tip oracle backed by a fixed map of documents.
///
/// Unknown documents look up as untipped, not as failures; use
/// [`FailingTipOracle`] to exercise the fail-closed path.
#[derive(Default)]
pub struct StaticTipOracle {
    records: HashMap<DocumentId, DocumentTips>,
}

impl StaticTipOracle {
    /// An oracle that knows no documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document with a full tip record.
    pub fn with_document(mut self, document: DocumentId, record: DocumentTips) -> Self {
        self.records.insert(document, record);
        self
    }

    /// Add a document tipped by a single address.
    pub fn with_tipper(self, document: DocumentId, tipper: Address) -> Self {
        self.with_document(
            document,
            DocumentTips {
                source_addresses: vec![],
                tips: vec![Tip::new(vec![tipper])],
            },
        )
    }
}

#[async_trait]
impl TipOracle for StaticTipOracle {
    async fn lookup(
        &self,
        document: &DocumentId,
        _network: Network,
    ) -> Result<DocumentTips, OracleError> {
        Ok(self.records.get(document).cloned().unwrap_or(DocumentTips {
            source_addresses: vec![],
            tips: vec![],
        }))
    }
}

/// A tip oracle whose every lookup fails.
pub struct FailingTipOracle;

#[async_trait]
impl TipOracle for FailingTipOracle {
    async fn lookup(
        &self,
        _document: &DocumentId,
        _network: Network,
    ) -> Result<DocumentTips, OracleError> {
        Err(OracleError::Lookup("ledger unavailable".into()))
    }
}

/// A test fixture with a wallet and a memory store.
pub struct TestFixture {
    pub wallet: Wallet,
    pub store: MemoryStore,
}

impl TestFixture {
    /// Create a new fixture with a random mainnet wallet.
    pub fn new() -> Self {
        Self {
            wallet: Wallet::generate(Network::Main),
            store: MemoryStore::new(),
        }
    }

    /// Create with a deterministic wallet from seed.
    pub fn with_seed(seed: [u8; 32]) -> Self {
        Self {
            wallet: Wallet::from_seed(&seed, Network::Main),
            store: MemoryStore::new(),
        }
    }

    /// A document id derived from a single byte, for readable tests.
    pub fn document(&self, byte: u8) -> DocumentId {
        DocumentId::from_bytes([byte; 20])
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create distinct deterministic wallets for multi-party tests.
pub fn multi_party_wallets(count: usize) -> Vec<Wallet> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[0] = (i + 1) as u8;
            Wallet::from_seed(&seed, Network::Main)
        })
        .collect()
}
