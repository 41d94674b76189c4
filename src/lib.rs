//! # titan-layout
//!
//! Flexbox layout engine for Rust.
//!
//! Hosts build a tree of nodes, set flexbox styles on them, attach measure
//! functions to content leaves such as text, and ask for the geometry of
//! every box within some available space.
//!
//! ## Architecture
//!
//! titan-layout keeps every node in one arena owned by a [`LayoutTree`].
//! Nodes are addressed by generational [`NodeId`] handles rather than
//! pointers, so parent links and shared child lists never create ownership
//! cycles.
//!
//! The layout pipeline is dirty-driven:
//! ```text
//! style edit → mark dirty up to the root → compute_layout → cache-aware visits → pixel-grid rounding
//! ```
//!
//! Re-running `compute_layout` on an unchanged tree is a cache hit. Only
//! nodes whose geometry changed get `has_new_layout` set.
//!
//! ## Modules
//!
//! - [`types`] - Style values and closed enumerations (Value, FlexDirection, Align, etc.)
//! - [`engine`] - Config, Style, Node and the LayoutTree arena
//! - [`layout`] - The flex algorithm, measurement cache, rounding and debug output
//! - [`error`] - LayoutError and the Result alias

pub mod engine;
pub mod error;
pub mod layout;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use types::*;

pub use engine::{
    BaselineFunc, Config, Context, Edges, ExperimentalFeatures, LayoutTree, MeasureFunc, Node,
    NodeClonedFunc, NodeId, PrintFunc, Style,
};

pub use error::{LayoutError, Result};

pub use layout::{
    measure_text, round_value_to_pixel_grid, string_width, text_measure_func, wrap_text,
    CachedMeasurement, Layout, PrintOptions, MAX_CACHED_RESULT_COUNT,
};
