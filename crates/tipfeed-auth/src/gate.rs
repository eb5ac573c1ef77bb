//! The tip gate: the authorization core.
//!
//! Decides whether a verified address is entitled to a document's comment
//! feed by cross-referencing the address oracle with the tip oracle. The
//! original middleware chain is expressed here as explicit calls returning
//! tagged results; nothing accumulates in hidden request state.

use std::sync::Arc;

use tipfeed_core::{Address, DocumentId, Network};
use tracing::debug;

use crate::error::Result;
use crate::oracle::{AddressOracle, RequestContext, TipOracle};

/// Outcome of the composed address-plus-tip check.
///
/// Ephemeral and per-request: recomputed on every call, never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Authorization {
    /// Ownership proven and a qualifying tip found.
    Granted(Address),
    /// No proven address for this request.
    NoAddress,
    /// Ownership proven, but no qualifying tip on the document.
    NoTip(Address),
}

impl Authorization {
    /// Whether access was granted.
    pub fn is_granted(&self) -> bool {
        matches!(self, Authorization::Granted(_))
    }

    /// The verified address, if ownership was proven.
    pub fn address(&self) -> Option<&Address> {
        match self {
            Authorization::Granted(a) | Authorization::NoTip(a) => Some(a),
            Authorization::NoAddress => None,
        }
    }
}

/// The authorization gate used by every read/write operation that
/// requires proof of tipping.
pub struct TipGate<A, T> {
    addresses: Arc<A>,
    tips: Arc<T>,
}

impl<A: AddressOracle, T: TipOracle> TipGate<A, T> {
    /// Build a gate over the two oracles.
    pub fn new(addresses: Arc<A>, tips: Arc<T>) -> Self {
        Self { addresses, tips }
    }

    /// Whether `verified` satisfies "has tipped this document".
    ///
    /// With no verified address this is `false` without consulting the
    /// tip oracle. Otherwise the address qualifies when it equals the
    /// document's primary source address, or the first-listed source
    /// address of any tip. Co-signers beyond index 0 never count; the
    /// asymmetry is preserved for compatibility with existing tip records.
    ///
    /// An oracle failure propagates as an error: the gate fails closed
    /// and the fault is surfaced to the caller.
    pub async fn check_tip(
        &self,
        document: &DocumentId,
        verified: Option<&Address>,
        network: Network,
    ) -> Result<bool> {
        let Some(address) = verified else {
            return Ok(false);
        };

        let record = self.tips.lookup(document, network).await?;

        if record.primary_source() == Some(address) {
            return Ok(true);
        }
        Ok(record.tips.iter().any(|tip| tip.tipper() == Some(address)))
    }

    /// The composed check: address ownership, then tip existence.
    ///
    /// Short-circuits to [`Authorization::NoAddress`] when the request
    /// carries no network (ownership proofs are network-scoped) or the
    /// address oracle yields nothing, and to [`Authorization::NoTip`]
    /// when the tip check fails.
    pub async fn authorize(
        &self,
        ctx: &RequestContext,
        document: &DocumentId,
    ) -> Result<Authorization> {
        let Some(network) = ctx.network else {
            return Ok(Authorization::NoAddress);
        };

        let Some(address) = self.addresses.verified_address(ctx).await? else {
            return Ok(Authorization::NoAddress);
        };

        if self.check_tip(document, Some(&address), network).await? {
            Ok(Authorization::Granted(address))
        } else {
            debug!(%document, %address, "no qualifying tip");
            Ok(Authorization::NoTip(address))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tipfeed_core::{DocumentTips, Tip};

    use crate::error::OracleError;

    struct FixedAddress(Option<Address>);

    #[async_trait]
    impl AddressOracle for FixedAddress {
        async fn verified_address(&self, _ctx: &RequestContext) -> Result<Option<Address>> {
            Ok(self.0.clone())
        }
    }

    struct FixedTips {
        record: DocumentTips,
        calls: AtomicUsize,
    }

    impl FixedTips {
        fn new(record: DocumentTips) -> Self {
            Self {
                record,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TipOracle for FixedTips {
        async fn lookup(&self, _document: &DocumentId, _network: Network) -> Result<DocumentTips> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.record.clone())
        }
    }

    struct FailingTips;

    #[async_trait]
    impl TipOracle for FailingTips {
        async fn lookup(&self, _document: &DocumentId, _network: Network) -> Result<DocumentTips> {
            Err(OracleError::Lookup("ledger unavailable".into()))
        }
    }

    fn doc() -> DocumentId {
        DocumentId::from_bytes([0x11; 20])
    }

    fn ctx(network: Option<Network>) -> RequestContext {
        RequestContext::new(crate::oracle::ClientId::from("127.0.0.1"), network)
    }

    fn record(sources: &[&str], tips: Vec<Vec<&str>>) -> DocumentTips {
        DocumentTips {
            source_addresses: sources.iter().map(|s| Address::from(*s)).collect(),
            tips: tips
                .into_iter()
                .map(|t| Tip::new(t.into_iter().map(Address::from).collect()))
                .collect(),
        }
    }

    #[tokio::test]
    async fn test_no_address_skips_tip_oracle() {
        let tips = Arc::new(FixedTips::new(record(&["addrA"], vec![])));
        let gate = TipGate::new(Arc::new(FixedAddress(None)), tips.clone());

        let auth = gate.authorize(&ctx(Some(Network::Main)), &doc()).await.unwrap();
        assert_eq!(auth, Authorization::NoAddress);
        assert_eq!(tips.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_network_denies_closed() {
        let tips = Arc::new(FixedTips::new(record(&["addrA"], vec![])));
        let gate = TipGate::new(
            Arc::new(FixedAddress(Some(Address::from("addrA")))),
            tips.clone(),
        );

        let auth = gate.authorize(&ctx(None), &doc()).await.unwrap();
        assert_eq!(auth, Authorization::NoAddress);
        assert_eq!(tips.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_primary_source_passes_with_empty_tip_list() {
        let gate = TipGate::new(
            Arc::new(FixedAddress(Some(Address::from("addrA")))),
            Arc::new(FixedTips::new(record(&["addrA"], vec![]))),
        );

        let addr = Address::from("addrA");
        assert!(gate
            .check_tip(&doc(), Some(&addr), Network::Main)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_only_first_tip_source_counts() {
        let gate = TipGate::new(
            Arc::new(FixedAddress(None)),
            Arc::new(FixedTips::new(record(&["owner"], vec![vec!["a0", "a1"]]))),
        );

        let a0 = Address::from("a0");
        let a1 = Address::from("a1");
        assert!(gate
            .check_tip(&doc(), Some(&a0), Network::Main)
            .await
            .unwrap());
        // Co-signer at index 1 never qualifies.
        assert!(!gate
            .check_tip(&doc(), Some(&a1), Network::Main)
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_tipper_grants_authorization() {
        let gate = TipGate::new(
            Arc::new(FixedAddress(Some(Address::from("a0")))),
            Arc::new(FixedTips::new(record(&["owner"], vec![vec!["a0"]]))),
        );

        let auth = gate.authorize(&ctx(Some(Network::Main)), &doc()).await.unwrap();
        assert_eq!(auth, Authorization::Granted(Address::from("a0")));
    }

    #[tokio::test]
    async fn test_non_tipper_denied_with_address() {
        let gate = TipGate::new(
            Arc::new(FixedAddress(Some(Address::from("addrB")))),
            Arc::new(FixedTips::new(record(&["addrA"], vec![]))),
        );

        let auth = gate.authorize(&ctx(Some(Network::Main)), &doc()).await.unwrap();
        assert_eq!(auth, Authorization::NoTip(Address::from("addrB")));
        assert!(!auth.is_granted());
        assert_eq!(auth.address(), Some(&Address::from("addrB")));
    }

    #[tokio::test]
    async fn test_oracle_failure_fails_closed() {
        let gate = TipGate::new(
            Arc::new(FixedAddress(Some(Address::from("addrA")))),
            Arc::new(FailingTips),
        );

        let addr = Address::from("addrA");
        assert!(gate
            .check_tip(&doc(), Some(&addr), Network::Main)
            .await
            .is_err());
        assert!(gate.authorize(&ctx(Some(Network::Main)), &doc()).await.is_err());
    }
}
