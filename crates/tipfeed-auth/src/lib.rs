//! # Tipfeed Auth
//!
//! The authorization layer for tipfeed: decides whether a requester may
//! read or write a document's comment feed.
//!
//! ## Overview
//!
//! Two external oracles feed the decision:
//!
//! - [`AddressOracle`] - yields the address a requester has proven
//!   ownership of for this request, or none
//! - [`TipOracle`] - yields a document's declared source addresses and
//!   its qualifying tip set
//!
//! [`TipGate`] cross-references the two and produces a tagged
//! [`Authorization`]. [`WriteLimiter`] bounds write rates per client,
//! independent of identity. [`CommentPolicy`] selects which operations
//! require the gate at all.
//!
//! Everything here is fail-closed: an oracle failure or a missing network
//! context resolves to "not authorized", never to an implicit grant.

pub mod error;
pub mod gate;
pub mod limiter;
pub mod oracle;
pub mod policy;

pub use error::{OracleError, Result};
pub use gate::{Authorization, TipGate};
pub use limiter::{WriteLimiter, WriteLimiterConfig};
pub use oracle::{AddressOracle, ClientId, RequestContext, TipOracle};
pub use policy::CommentPolicy;
