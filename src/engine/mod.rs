//! Layout Engine - Node arena, styles and tree editing.
//!
//! The engine manages the core data structures:
//! - Config: tunables shared by every node of a tree
//! - Style: plain-data flexbox properties of one node
//! - Node: style, computed layout, child handles and callbacks
//! - LayoutTree: the arena owning every node, with tree edits and dirty tracking
//!
//! # Architecture
//!
//! Nodes are NOT objects holding pointers. They live in a generational arena
//! and refer to each other by [`NodeId`]:
//!
//! ```text
//! NodeId(1): root  (parent=None,    children=[2, 3], dirty=false)
//! NodeId(2): text  (parent=Some(1), children=[],     measure=Some(..))
//! NodeId(3): box   (parent=Some(1), children=[],     width=40)
//! ```
//!
//! A freed node's handle is rejected instead of dangling, and parent links
//! never keep a node alive.

mod config;
mod node;
mod properties;
mod style;
mod tree;

pub use config::*;
pub use node::*;
pub use style::*;
pub use tree::*;
