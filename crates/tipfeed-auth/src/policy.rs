//! Static read/write gating policy.

use serde::{Deserialize, Serialize};

/// Which operations require the tip gate.
///
/// One policy per service instance, injected at construction and read-only
/// at request time. It is not per-document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentPolicy {
    /// Posting a comment requires a qualifying tip.
    pub tip_to_comment: bool,
    /// Listing comments requires a qualifying tip.
    pub tip_to_read: bool,
}

impl Default for CommentPolicy {
    fn default() -> Self {
        Self {
            tip_to_comment: true,
            tip_to_read: false,
        }
    }
}

impl CommentPolicy {
    /// A policy with no gating on either operation.
    pub fn open() -> Self {
        Self {
            tip_to_comment: false,
            tip_to_read: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_gates_writes_only() {
        let policy = CommentPolicy::default();
        assert!(policy.tip_to_comment);
        assert!(!policy.tip_to_read);
    }
}
