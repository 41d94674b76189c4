//! Layout Module
//!
//! Flexbox computation over a [`LayoutTree`](crate::engine::LayoutTree).
//!
//! # Architecture
//!
//! 1. `compute_layout` sizes the root and starts the recursion
//! 2. Every visit goes through the measurement cache first
//! 3. Containers run the flex algorithm, leaves ask their measure function
//! 4. Output geometry is snapped to the pixel grid
//!
//! Unrounded geometry stays on each node so the next pass starts from
//! exact values; [`Layout`] getters return the rounded output.
//!
//! # Example
//!
//! ```
//! use titan_layout::{Direction, FlexDirection, LayoutTree, Value};
//!
//! let mut tree = LayoutTree::new();
//! let root = tree.new_node();
//! let child = tree.new_node();
//! tree.add_child(root, child).unwrap();
//! tree.set_flex_direction(root, FlexDirection::Row).unwrap();
//! tree.set_flex_grow(child, Some(1.0)).unwrap();
//!
//! tree.compute_layout(root, Some(80.0), Some(24.0), Direction::Ltr).unwrap();
//! assert_eq!(tree.layout(child).unwrap().width(), Some(80.0));
//! ```

mod absolute;
mod cache;
mod compute;
mod flexbox;
mod leaf;
mod print;
mod rounding;
mod text_measure;
mod types;

pub use print::PrintOptions;
pub use rounding::round_value_to_pixel_grid;
pub use text_measure::*;
pub use types::*;
