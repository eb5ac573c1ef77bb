//! External collaborator contracts consumed by the gate.
//!
//! Both oracles are out-of-process lookups and the suspension points of
//! the verification pipeline. They are awaited per request without any
//! lock held; neither result is cached across requests.

use std::fmt;

use async_trait::async_trait;
use tipfeed_core::{Address, DocumentId, DocumentTips, Network};

use crate::error::Result;

/// Client identity used for rate limiting.
///
/// This is a network-layer origin, not a wallet address: throttling runs
/// independently of who the requester proves to be.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(String);

impl ClientId {
    /// Wrap a client identity string.
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// The identity as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ClientId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Per-request context threaded through the verification pipeline.
///
/// Carries the rate-limiting identity and the declared network. The
/// network is per-request, never global configuration; stages that need
/// one and find `None` fail closed.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Network-layer origin of the request.
    pub client: ClientId,
    /// The network declared for this request, if any.
    pub network: Option<Network>,
}

impl RequestContext {
    /// Build a context for a request.
    pub fn new(client: ClientId, network: Option<Network>) -> Self {
        Self { client, network }
    }
}

/// Address-ownership oracle.
///
/// Implemented by an external nonce-challenge subsystem: given a request,
/// it yields the address the requester has cryptographically proven
/// control over, scoped to the request's declared network, or `None`.
#[async_trait]
pub trait AddressOracle: Send + Sync {
    /// The verified address for this request, if ownership was proven.
    async fn verified_address(&self, ctx: &RequestContext) -> Result<Option<Address>>;
}

/// Per-document tip oracle.
///
/// Implemented by an external ledger/state lookup: given a document
/// identifier, it yields the document's declared source addresses plus
/// the set of qualifying tips placed against it.
#[async_trait]
pub trait TipOracle: Send + Sync {
    /// Look up a document's sources and tip set.
    async fn lookup(&self, document: &DocumentId, network: Network) -> Result<DocumentTips>;
}
