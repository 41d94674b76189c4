//! Layout Types
//!
//! Output record for the layout computation plus the per-node measurement
//! cache the algorithm keeps between passes.

use crate::types::{Direction, Edge, MeasureMode, Size};

/// Measurement slots kept per node besides the final layout slot.
pub const MAX_CACHED_RESULT_COUNT: usize = 16;

/// One cached `(available space, mode, parent size) -> measured size` result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CachedMeasurement {
    pub available_width: Option<f32>,
    pub available_height: Option<f32>,
    /// `None` marks an empty slot.
    pub width_mode: Option<MeasureMode>,
    pub height_mode: Option<MeasureMode>,
    pub computed_width: Option<f32>,
    pub computed_height: Option<f32>,
    /// Percentage reference sizes the result was computed against.
    pub parent_width: Option<f32>,
    pub parent_height: Option<f32>,
}

/// Computed layout of one node.
///
/// Geometry is kept twice: the unrounded values the algorithm works with
/// and the pixel-snapped values handed to the host. Only the latter are
/// exposed through the getters.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    /// Offsets from the parent's border box, indexed by physical edge.
    pub(crate) position: [f32; 4],
    pub(crate) dimensions: Size<Option<f32>>,
    pub(crate) measured_dimensions: Size<Option<f32>>,
    pub(crate) margin: [f32; 4],
    pub(crate) border: [f32; 4],
    pub(crate) padding: [f32; 4],
    pub(crate) direction: Direction,

    pub(crate) computed_flex_basis: Option<f32>,
    pub(crate) computed_flex_basis_generation: u32,
    pub(crate) generation_count: u32,
    pub(crate) last_parent_direction: Option<Direction>,
    pub(crate) next_cached_measurements_index: usize,
    pub(crate) cached_measurements: [CachedMeasurement; MAX_CACHED_RESULT_COUNT],
    pub(crate) cached_layout: CachedMeasurement,
    pub(crate) had_overflow: bool,

    /// Pixel-snapped output.
    pub(crate) final_position: [f32; 4],
    pub(crate) final_dimensions: Size<Option<f32>>,
}

impl Layout {
    /// Offset of the left edge from the parent's left edge.
    pub fn left(&self) -> f32 {
        self.final_position[Edge::Left.index()]
    }

    /// Offset of the top edge from the parent's top edge.
    pub fn top(&self) -> f32 {
        self.final_position[Edge::Top.index()]
    }

    /// Trailing offset used by reversed containers.
    pub fn right(&self) -> f32 {
        self.final_position[Edge::Right.index()]
    }

    /// Trailing offset used by reversed containers.
    pub fn bottom(&self) -> f32 {
        self.final_position[Edge::Bottom.index()]
    }

    /// Width, or `None` before the node was ever laid out.
    pub fn width(&self) -> Option<f32> {
        self.final_dimensions.width
    }

    /// Height, or `None` before the node was ever laid out.
    pub fn height(&self) -> Option<f32> {
        self.final_dimensions.height
    }

    /// Direction the node was laid out in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether content overflowed the node's main axis.
    pub fn had_overflow(&self) -> bool {
        self.had_overflow
    }

    /// Flex basis computed for the node in its last flex pass.
    pub fn computed_flex_basis(&self) -> Option<f32> {
        self.computed_flex_basis
    }

    /// Resolved margin for a physical or logical edge.
    pub fn margin(&self, edge: Edge) -> f32 {
        self.resolve_edge(&self.margin, edge)
    }

    /// Resolved border for a physical or logical edge.
    pub fn border(&self, edge: Edge) -> f32 {
        self.resolve_edge(&self.border, edge)
    }

    /// Resolved padding for a physical or logical edge.
    pub fn padding(&self, edge: Edge) -> f32 {
        self.resolve_edge(&self.padding, edge)
    }

    /// Start and end follow the layout direction; shorthands read as 0.
    fn resolve_edge(&self, values: &[f32; 4], edge: Edge) -> f32 {
        let rtl = self.direction == Direction::Rtl;
        match edge {
            Edge::Left | Edge::Top | Edge::Right | Edge::Bottom => values[edge.index()],
            Edge::Start if rtl => values[Edge::Right.index()],
            Edge::Start => values[Edge::Left.index()],
            Edge::End if rtl => values[Edge::Left.index()],
            Edge::End => values[Edge::Right.index()],
            Edge::Horizontal | Edge::Vertical | Edge::All => 0.0,
        }
    }

    /// Drop every cached measurement and the layout slot.
    pub(crate) fn invalidate_cache(&mut self) {
        self.next_cached_measurements_index = 0;
        self.cached_layout = CachedMeasurement::default();
    }

    /// Geometry of a `display: none` node.
    pub(crate) fn zeroed() -> Self {
        let zero = Size::new(Some(0.0), Some(0.0));
        Self {
            dimensions: zero,
            measured_dimensions: zero,
            final_dimensions: zero,
            ..Self::default()
        }
    }
}
