//! Style - Plain-data flexbox properties of one node.
//!
//! A `Style` has no reference to any node. Replacing a node's style copies
//! the value; per-property setters on the tree mutate it in place and dirty
//! the node only when the value actually changes.

use crate::types::{
    Align, Dimension, Direction, Display, Edge, FlexDirection, Justify, Overflow, PositionType,
    Size, Value, Wrap,
};

use super::Config;

// =============================================================================
// EDGES
// =============================================================================

/// Nine edge slots: four physical, start/end, the two axis shorthands and all.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edges([Value; 9]);

impl Edges {
    /// Raw value stored for an edge, without shorthand fallback.
    #[inline]
    pub fn get(&self, edge: Edge) -> Value {
        self.0[edge.index()]
    }

    /// Store a value; returns whether anything changed.
    #[inline]
    pub fn set(&mut self, edge: Edge, value: Value) -> bool {
        let slot = &mut self.0[edge.index()];
        if *slot == value {
            false
        } else {
            *slot = value;
            true
        }
    }

    /// Effective value for an edge after shorthand fallback.
    ///
    /// Vertical covers top/bottom, horizontal covers left/right/start/end,
    /// all covers everything. Start and end never fall back to `default`
    /// so callers can tell whether they were set.
    pub fn computed(&self, edge: Edge, default: Value) -> Value {
        let own = self.get(edge);
        if own.is_defined() {
            return own;
        }

        let vertical = self.get(Edge::Vertical);
        if matches!(edge, Edge::Top | Edge::Bottom) && vertical.is_defined() {
            return vertical;
        }

        let horizontal = self.get(Edge::Horizontal);
        if matches!(edge, Edge::Left | Edge::Right | Edge::Start | Edge::End) && horizontal.is_defined() {
            return horizontal;
        }

        let all = self.get(Edge::All);
        if all.is_defined() {
            return all;
        }

        if matches!(edge, Edge::Start | Edge::End) {
            return Value::Undefined;
        }

        default
    }

    /// Iterate `(edge, value)` over defined slots.
    pub fn defined(&self) -> impl Iterator<Item = (Edge, Value)> + '_ {
        self.0.iter().enumerate().filter(|(_, v)| v.is_defined()).filter_map(|(i, v)| {
            u8::try_from(i).ok().and_then(|i| Edge::try_from(i).ok()).map(|edge| (edge, *v))
        })
    }
}

// =============================================================================
// STYLE
// =============================================================================

/// All layout properties of a node.
///
/// # Property Categories
///
/// - **Container**: direction, flex_direction, justify_content, align_content,
///   align_items, flex_wrap, overflow
/// - **Item**: align_self, position_type, flex, flex_grow, flex_shrink,
///   flex_basis, display
/// - **Box**: margin, position, padding, border (nine edges each)
/// - **Dimensions**: dimensions, min_dimensions, max_dimensions, aspect_ratio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    // =========================================================================
    // CONTAINER PROPERTIES
    // =========================================================================
    pub direction: Direction,
    pub flex_direction: FlexDirection,
    pub justify_content: Justify,
    pub align_content: Align,
    pub align_items: Align,
    pub flex_wrap: Wrap,
    pub overflow: Overflow,

    // =========================================================================
    // ITEM PROPERTIES
    // =========================================================================
    pub align_self: Align,
    pub position_type: PositionType,
    pub display: Display,
    /// `flex` shorthand; feeds grow, shrink and basis when those are unset.
    pub flex: Option<f32>,
    pub flex_grow: Option<f32>,
    pub flex_shrink: Option<f32>,
    pub flex_basis: Value,

    // =========================================================================
    // BOX EDGES
    // =========================================================================
    pub margin: Edges,
    /// Offsets for relative and absolute positioning.
    pub position: Edges,
    pub padding: Edges,
    /// Border widths; only points are meaningful.
    pub border: Edges,

    // =========================================================================
    // DIMENSIONS
    // =========================================================================
    pub dimensions: Size<Value>,
    pub min_dimensions: Size<Value>,
    pub max_dimensions: Size<Value>,
    /// Width divided by height.
    pub aspect_ratio: Option<f32>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            justify_content: Justify::FlexStart,
            align_content: Align::FlexStart,
            align_items: Align::Stretch,
            flex_wrap: Wrap::NoWrap,
            overflow: Overflow::Visible,

            align_self: Align::Auto,
            position_type: PositionType::Relative,
            display: Display::Flex,
            flex: None,
            flex_grow: None,
            flex_shrink: None,
            flex_basis: Value::Auto,

            margin: Edges::default(),
            position: Edges::default(),
            padding: Edges::default(),
            border: Edges::default(),

            dimensions: Size::new(Value::Auto, Value::Auto),
            min_dimensions: Size::new(Value::Undefined, Value::Undefined),
            max_dimensions: Size::new(Value::Undefined, Value::Undefined),
            aspect_ratio: None,
        }
    }
}

impl Style {
    /// Defaults for a node created under `config`.
    pub fn for_config(config: &Config) -> Self {
        if config.use_web_defaults {
            Self {
                flex_direction: FlexDirection::Row,
                align_content: Align::Stretch,
                ..Self::default()
            }
        } else {
            Self::default()
        }
    }

    /// Min size along an axis dimension.
    #[inline]
    pub fn min(&self, dimension: Dimension) -> Value {
        self.min_dimensions.get(dimension)
    }

    /// Max size along an axis dimension.
    #[inline]
    pub fn max(&self, dimension: Dimension) -> Value {
        self.max_dimensions.get(dimension)
    }
}
