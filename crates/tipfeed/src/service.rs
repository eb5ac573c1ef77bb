//! The comment service: the ordered verification-and-gating pipeline.
//!
//! Each operation runs its checks as an explicit pipeline - precondition,
//! authorization, rate limit, signature, persistence - with every stage
//! returning a tagged value consumed by the next. Nothing accumulates in
//! hidden request state, and nothing verified here is cached across
//! requests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tipfeed_auth::{
    AddressOracle, Authorization, CommentPolicy, OracleError, RequestContext, TipGate, TipOracle,
    WriteLimiter, WriteLimiterConfig,
};
use tipfeed_core::{verify_signed_message, Address, Comment, DocumentId};
use tipfeed_store::CommentStore;
use tracing::{debug, warn};

use crate::error::Result;

/// Configuration for the comment service.
///
/// Injected at construction and read-only at request time.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Which operations require the tip gate.
    pub policy: CommentPolicy,
    /// Write rate-limiting parameters.
    pub limiter: WriteLimiterConfig,
    /// Upper bound on the oracle phase of a request. `None` disables the
    /// bound; elapsing fails closed as an oracle error.
    pub oracle_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            policy: CommentPolicy::default(),
            limiter: WriteLimiterConfig::default(),
            oracle_timeout: Some(Duration::from_secs(10)),
        }
    }
}

/// Terminal denial reasons.
///
/// All are final for the request and never retried by the core. A
/// rate-limited caller recovers on its own once the window elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// The comment body was empty.
    EmptyBody,
    /// No proven address for this request.
    NoAddress,
    /// Proven address, but no qualifying tip on the document.
    NoTip,
    /// The detached signature could not be attributed to the author.
    SignatureInvalid,
    /// The client's write budget for the current window is spent.
    RateLimited,
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DenyReason::EmptyBody => "empty body",
            DenyReason::NoAddress => "unauthorized",
            DenyReason::NoTip => "no qualifying tip",
            DenyReason::SignatureInvalid => "signature invalid",
            DenyReason::RateLimited => "rate limited",
        })
    }
}

/// Outcome of the standalone authorization check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Ownership proven and a qualifying tip found.
    Verified(Address),
    /// Terminal denial.
    Denied(DenyReason),
}

/// Outcome of listing a document's comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListOutcome {
    /// The ordered comment feed.
    Comments(Vec<Comment>),
    /// Terminal denial (only under a tip-to-read policy).
    Denied(DenyReason),
}

/// Outcome of posting a comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostOutcome {
    /// The comment was appended, authored by the verified address.
    Posted(Address),
    /// Terminal denial; the store was not touched.
    Denied(DenyReason),
}

/// The comment service.
///
/// Orchestrates the tip gate, the write limiter, the signed-message
/// verifier and the comment store. Generic over the oracle and store
/// implementations; all collaborators are shared, so the service itself
/// is cheap to share across request tasks.
pub struct CommentService<A, T, S> {
    addresses: Arc<A>,
    gate: TipGate<A, T>,
    limiter: WriteLimiter,
    store: Arc<S>,
    config: ServiceConfig,
}

impl<A, T, S> CommentService<A, T, S>
where
    A: AddressOracle,
    T: TipOracle,
    S: CommentStore,
{
    /// Create a new service over the given collaborators.
    pub fn new(addresses: Arc<A>, tips: Arc<T>, store: Arc<S>, config: ServiceConfig) -> Self {
        Self {
            gate: TipGate::new(Arc::clone(&addresses), tips),
            limiter: WriteLimiter::new(config.limiter.clone()),
            addresses,
            store,
            config,
        }
    }

    /// The service's gating policy.
    pub fn policy(&self) -> CommentPolicy {
        self.config.policy
    }

    /// Bound an oracle-phase future by the configured timeout.
    async fn bounded<V>(
        &self,
        fut: impl Future<Output = std::result::Result<V, OracleError>>,
    ) -> std::result::Result<V, OracleError> {
        match self.config.oracle_timeout {
            Some(limit) => match tokio::time::timeout(limit, fut).await {
                Ok(result) => result,
                Err(_) => {
                    warn!(?limit, "oracle phase timed out");
                    Err(OracleError::Timeout(limit))
                }
            },
            None => fut.await,
        }
    }

    /// Run the composed address-plus-tip check under the oracle bound.
    async fn authorize(
        &self,
        ctx: &RequestContext,
        document: &DocumentId,
    ) -> Result<Authorization> {
        Ok(self.bounded(self.gate.authorize(ctx, document)).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Read Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Check that the requester has proven ownership of a tipping address.
    ///
    /// The single authorization gate behind `verify`, gated `list`, and
    /// gated `post`.
    pub async fn verify(&self, ctx: &RequestContext, document: &DocumentId) -> Result<VerifyOutcome> {
        match self.authorize(ctx, document).await? {
            Authorization::Granted(address) => Ok(VerifyOutcome::Verified(address)),
            Authorization::NoAddress => Ok(VerifyOutcome::Denied(DenyReason::NoAddress)),
            Authorization::NoTip(_) => Ok(VerifyOutcome::Denied(DenyReason::NoTip)),
        }
    }

    /// Number of comments on a document. Requires no authorization.
    pub async fn count(&self, document: &DocumentId) -> Result<u64> {
        Ok(self.store.count(document).await?)
    }

    /// Comment counts for a batch of documents. Requires no authorization.
    pub async fn batch_count(
        &self,
        documents: &[DocumentId],
    ) -> Result<HashMap<DocumentId, u64>> {
        Ok(self.store.batch_count(documents).await?)
    }

    /// The ordered comment feed for a document.
    ///
    /// Under a tip-to-read policy the gate runs first; otherwise this is
    /// an ungated pure read.
    pub async fn list(&self, ctx: &RequestContext, document: &DocumentId) -> Result<ListOutcome> {
        if self.config.policy.tip_to_read {
            match self.authorize(ctx, document).await? {
                Authorization::Granted(_) => {}
                Authorization::NoAddress => {
                    return Ok(ListOutcome::Denied(DenyReason::NoAddress))
                }
                Authorization::NoTip(_) => return Ok(ListOutcome::Denied(DenyReason::NoTip)),
            }
        }
        Ok(ListOutcome::Comments(self.store.get(document).await?))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Write Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Post a comment: precondition, authorization, rate limit, signature,
    /// append - in that order.
    ///
    /// `signed_body` is a detached signature over exactly `body`, checked
    /// against the request's declared network. The store is touched only
    /// after every preceding stage has passed.
    pub async fn post(
        &self,
        ctx: &RequestContext,
        document: &DocumentId,
        body: &str,
        signed_body: &str,
    ) -> Result<PostOutcome> {
        // Cheap precondition first: an empty body is rejected before any
        // oracle, limiter or store interaction.
        if body.is_empty() {
            return Ok(PostOutcome::Denied(DenyReason::EmptyBody));
        }

        // A request without a declared network cannot prove ownership and
        // cannot be signature-verified. Gated posts read as unauthorized,
        // ungated posts as unverifiable.
        let Some(network) = ctx.network else {
            let reason = if self.config.policy.tip_to_comment {
                DenyReason::NoAddress
            } else {
                DenyReason::SignatureInvalid
            };
            return Ok(PostOutcome::Denied(reason));
        };

        // Authorization. Under tip-to-comment the full gate runs; otherwise
        // only the ownership proof, since the signature still has to be
        // attributed to a proven address.
        let author = if self.config.policy.tip_to_comment {
            match self.authorize(ctx, document).await? {
                Authorization::Granted(address) => address,
                Authorization::NoAddress => {
                    return Ok(PostOutcome::Denied(DenyReason::NoAddress))
                }
                Authorization::NoTip(_) => {
                    debug!(%document, "post denied: no qualifying tip");
                    return Ok(PostOutcome::Denied(DenyReason::NoTip));
                }
            }
        } else {
            match self.bounded(self.addresses.verified_address(ctx)).await? {
                Some(address) => address,
                None => return Ok(PostOutcome::Denied(DenyReason::SignatureInvalid)),
            }
        };

        // Rate limit after authorization, so denied requests never consume
        // write budget.
        if !self.limiter.try_acquire(&ctx.client) {
            return Ok(PostOutcome::Denied(DenyReason::RateLimited));
        }

        // The signature must cover exactly the posted body, under the
        // request's declared network.
        if !verify_signed_message(&author, signed_body, body, network) {
            return Ok(PostOutcome::Denied(DenyReason::SignatureInvalid));
        }

        self.store
            .append(document, Comment::new(body, author.clone()))
            .await?;
        Ok(PostOutcome::Posted(author))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tipfeed_auth::ClientId;
    use tipfeed_core::{DocumentTips, Network, Tip};
    use tipfeed_store::MemoryStore;

    struct FixedAddress(Option<Address>);

    #[async_trait]
    impl AddressOracle for FixedAddress {
        async fn verified_address(
            &self,
            _ctx: &RequestContext,
        ) -> std::result::Result<Option<Address>, OracleError> {
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
        async fn lookup(
            &self,
            _document: &DocumentId,
            _network: Network,
        ) -> std::result::Result<DocumentTips, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.record.clone())
        }
    }

    struct SlowTips;

    #[async_trait]
    impl TipOracle for SlowTips {
        async fn lookup(
            &self,
            _document: &DocumentId,
            _network: Network,
        ) -> std::result::Result<DocumentTips, OracleError> {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok(DocumentTips {
                source_addresses: vec![],
                tips: vec![],
            })
        }
    }

    fn doc() -> DocumentId {
        DocumentId::from_bytes([0x22; 20])
    }

    fn ctx() -> RequestContext {
        RequestContext::new(ClientId::from("127.0.0.1"), Some(Network::Main))
    }

    fn tipped_by(addr: &str) -> DocumentTips {
        DocumentTips {
            source_addresses: vec![Address::from("owner")],
            tips: vec![Tip::new(vec![Address::from(addr)])],
        }
    }

    fn service_with(
        address: Option<&str>,
        tips: Arc<FixedTips>,
        config: ServiceConfig,
    ) -> CommentService<FixedAddress, FixedTips, MemoryStore> {
        CommentService::new(
            Arc::new(FixedAddress(address.map(Address::from))),
            tips,
            Arc::new(MemoryStore::new()),
            config,
        )
    }

    fn service(
        address: Option<&str>,
        record: DocumentTips,
        config: ServiceConfig,
    ) -> CommentService<FixedAddress, FixedTips, MemoryStore> {
        service_with(address, Arc::new(FixedTips::new(record)), config)
    }

    #[tokio::test]
    async fn test_empty_body_rejected_before_anything_else() {
        // Even a fully unauthorized caller sees EmptyBody, and no oracle
        // or store call happens.
        let tips = Arc::new(FixedTips::new(tipped_by("a0")));
        let svc = service_with(None, tips.clone(), ServiceConfig::default());

        let outcome = svc.post(&ctx(), &doc(), "", "sig").await.unwrap();
        assert_eq!(outcome, PostOutcome::Denied(DenyReason::EmptyBody));
        assert_eq!(tips.calls.load(Ordering::SeqCst), 0);
        assert_eq!(svc.count(&doc()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_verify_granted_for_tipper() {
        let svc = service(Some("a0"), tipped_by("a0"), ServiceConfig::default());
        let outcome = svc.verify(&ctx(), &doc()).await.unwrap();
        assert_eq!(outcome, VerifyOutcome::Verified(Address::from("a0")));
    }

    #[tokio::test]
    async fn test_verify_denied_without_address() {
        let svc = service(None, tipped_by("a0"), ServiceConfig::default());
        let outcome = svc.verify(&ctx(), &doc()).await.unwrap();
        assert_eq!(outcome, VerifyOutcome::Denied(DenyReason::NoAddress));
    }

    #[tokio::test]
    async fn test_post_denied_for_non_tipper_leaves_store_untouched() {
        let svc = service(Some("addrB"), tipped_by("a0"), ServiceConfig::default());

        let outcome = svc.post(&ctx(), &doc(), "hello", "sig").await.unwrap();
        assert_eq!(outcome, PostOutcome::Denied(DenyReason::NoTip));
        assert_eq!(svc.count(&doc()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_posts_never_consume_write_budget() {
        let config = ServiceConfig {
            limiter: WriteLimiterConfig {
                window: Duration::from_secs(300),
                max_writes: 1,
            },
            ..ServiceConfig::default()
        };
        let svc = service(Some("addrB"), tipped_by("a0"), config);

        // Far more denied posts than the write budget allows; every one is
        // still reported as NoTip, not RateLimited.
        for _ in 0..5 {
            let outcome = svc.post(&ctx(), &doc(), "hello", "sig").await.unwrap();
            assert_eq!(outcome, PostOutcome::Denied(DenyReason::NoTip));
        }
    }

    #[tokio::test]
    async fn test_rate_limit_applies_after_authorization() {
        // An authorized caller with bad signatures: the limiter stage runs
        // before the signature stage, so the budget drains and the 4th
        // attempt is rate limited.
        let svc = service(Some("a0"), tipped_by("a0"), ServiceConfig::default());

        for _ in 0..3 {
            let outcome = svc.post(&ctx(), &doc(), "hello", "bad sig").await.unwrap();
            assert_eq!(outcome, PostOutcome::Denied(DenyReason::SignatureInvalid));
        }
        let outcome = svc.post(&ctx(), &doc(), "hello", "bad sig").await.unwrap();
        assert_eq!(outcome, PostOutcome::Denied(DenyReason::RateLimited));
        assert_eq!(svc.count(&doc()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_network_fails_closed() {
        let no_network = RequestContext::new(ClientId::from("127.0.0.1"), None);

        let gated = service(Some("a0"), tipped_by("a0"), ServiceConfig::default());
        let outcome = gated.post(&no_network, &doc(), "hello", "sig").await.unwrap();
        assert_eq!(outcome, PostOutcome::Denied(DenyReason::NoAddress));

        let ungated = service(
            Some("a0"),
            tipped_by("a0"),
            ServiceConfig {
                policy: CommentPolicy::open(),
                ..ServiceConfig::default()
            },
        );
        let outcome = ungated
            .post(&no_network, &doc(), "hello", "sig")
            .await
            .unwrap();
        assert_eq!(outcome, PostOutcome::Denied(DenyReason::SignatureInvalid));
    }

    #[tokio::test]
    async fn test_list_is_ungated_by_default() {
        let tips = Arc::new(FixedTips::new(tipped_by("a0")));
        let svc = service_with(None, tips.clone(), ServiceConfig::default());

        let outcome = svc.list(&ctx(), &doc()).await.unwrap();
        assert_eq!(outcome, ListOutcome::Comments(vec![]));
        assert_eq!(tips.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_list_gated_under_tip_to_read() {
        let config = ServiceConfig {
            policy: CommentPolicy {
                tip_to_comment: true,
                tip_to_read: true,
            },
            ..ServiceConfig::default()
        };

        let svc = service(None, tipped_by("a0"), config);
        let outcome = svc.list(&ctx(), &doc()).await.unwrap();
        assert_eq!(outcome, ListOutcome::Denied(DenyReason::NoAddress));
    }

    #[tokio::test]
    async fn test_ungated_post_without_address_reads_as_bad_signature() {
        let svc = service(
            None,
            tipped_by("a0"),
            ServiceConfig {
                policy: CommentPolicy::open(),
                ..ServiceConfig::default()
            },
        );

        let outcome = svc.post(&ctx(), &doc(), "hello", "sig").await.unwrap();
        assert_eq!(outcome, PostOutcome::Denied(DenyReason::SignatureInvalid));
    }

    #[tokio::test]
    async fn test_oracle_timeout_fails_closed_as_error() {
        let svc = CommentService::new(
            Arc::new(FixedAddress(Some(Address::from("a0")))),
            Arc::new(SlowTips),
            Arc::new(MemoryStore::new()),
            ServiceConfig {
                oracle_timeout: Some(Duration::from_millis(10)),
                ..ServiceConfig::default()
            },
        );

        let err = svc.verify(&ctx(), &doc()).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::ServiceError::Oracle(OracleError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn test_counts_are_pure_reads() {
        let svc = service(None, tipped_by("a0"), ServiceConfig::default());

        assert_eq!(svc.count(&doc()).await.unwrap(), 0);
        assert_eq!(svc.count(&doc()).await.unwrap(), 0);

        let counts = svc.batch_count(&[doc()]).await.unwrap();
        assert_eq!(counts[&doc()], 0);
    }
}
