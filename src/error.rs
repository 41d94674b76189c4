//! Error types for titan-layout.
//!
//! Only malformed tree edits and invalid style combinations are reported.
//! Degenerate numeric input is sanitized instead of rejected.

use thiserror::Error;

use crate::engine::NodeId;

/// Result type alias for tree and style operations.
pub type Result<T> = std::result::Result<T, LayoutError>;

/// Everything a caller can get wrong when editing a layout tree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    /// The handle does not refer to a live node.
    #[error("node {0:?} does not exist")]
    NodeNotFound(NodeId),

    /// The child is still attached elsewhere and must be removed first.
    #[error("node {child:?} already has parent {parent:?}; remove it first")]
    ChildAlreadyParented { child: NodeId, parent: NodeId },

    /// The insertion would make a node its own ancestor.
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },

    /// Nodes with a measure function are leaves.
    #[error("node {0:?} has a measure function and cannot have children")]
    ChildOfMeasuredNode(NodeId),

    /// Nodes with children are sized by their children.
    #[error("node {0:?} has children and cannot have a measure function")]
    MeasureOnNodeWithChildren(NodeId),

    /// Only measured leaves may be dirtied by hand.
    #[error("node {0:?} has no measure function; only measured leaves can be marked dirty")]
    MarkDirtyWithoutMeasure(NodeId),

    /// A node with a parent or children cannot be reset.
    #[error("node {0:?} must be detached and childless to be reset")]
    ResetAttachedNode(NodeId),

    /// Child index past the end of the child list.
    #[error("index {index} out of bounds for node {parent:?} with {len} children")]
    IndexOutOfBounds { parent: NodeId, index: usize, len: usize },

    /// The node to replace is not a child of the parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    ChildNotFound { parent: NodeId, child: NodeId },

    /// A binding layer passed an unknown enumeration discriminant.
    #[error("invalid {kind} value {value}")]
    InvalidEnumValue { kind: &'static str, value: u8 },
}
