//! Error types for structural mutations.

use thiserror::Error;

use crate::graph_node::NodeId;

/// Errors raised when a mutation would break a structural invariant.
///
/// Lookups that find nothing are not errors; they return `None` or `false`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Connecting `from` to `to` would let `to` reach itself again.
    #[error("connecting node {from} to node {to} would create a cycle")]
    CycleDetected {
        /// Source of the rejected edge.
        from: NodeId,
        /// Target of the rejected edge.
        to: NodeId,
    },
}

/// Result type alias for structural mutations.
pub type Result<T> = std::result::Result<T, Error>;
