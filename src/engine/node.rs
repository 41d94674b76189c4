//! Node - One box in the layout tree.
//!
//! A node owns its style, its computed layout and an ordered list of child
//! handles. The parent handle is a non-owning back reference used for dirty
//! propagation and lookups only.
//!
//! The resolution helpers below read nothing but the node itself: they turn
//! style values into points for a given axis and reference size, honouring
//! start/end edges and right-to-left flips.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::layout::Layout;
use crate::types::{
    Dimension, Edge, FlexDirection, MeasureMode, NodeType, PositionType, Size, Value,
};
use crate::utils::MaybeMath;

use super::{Config, NodeId, Style};

/// Measures a leaf: `(node, width, width_mode, height, height_mode) -> size`.
///
/// Sizes are content-box sizes; `None` accompanies `MeasureMode::Undefined`.
pub type MeasureFunc =
    Arc<dyn Fn(NodeId, Option<f32>, MeasureMode, Option<f32>, MeasureMode) -> Size<f32> + Send + Sync>;

/// Reports a leaf's baseline offset from its top edge given `(node, width, height)`.
pub type BaselineFunc = Arc<dyn Fn(NodeId, f32, f32) -> f32 + Send + Sync>;

/// Extra text for a node's entry in [`LayoutTree::print_tree`](super::LayoutTree::print_tree).
pub type PrintFunc = Arc<dyn Fn(NodeId) -> String + Send + Sync>;

/// Host data attached to a node; the engine never inspects it.
pub type Context = Arc<dyn Any + Send + Sync>;

/// Flex grow applied when neither `flex_grow` nor a positive `flex` is set.
pub const DEFAULT_FLEX_GROW: f32 = 0.0;
/// Flex shrink applied when nothing is set.
pub const DEFAULT_FLEX_SHRINK: f32 = 0.0;
/// Flex shrink applied when nothing is set under web defaults.
pub const WEB_DEFAULT_FLEX_SHRINK: f32 = 1.0;

/// A node record stored in the [`LayoutTree`](super::LayoutTree) arena.
#[derive(Clone)]
pub struct Node {
    pub(crate) style: Style,
    pub(crate) layout: Layout,
    /// Shared between snapshots until the first structural edit.
    pub(crate) children: Arc<Vec<NodeId>>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) config: Arc<Config>,
    pub(crate) context: Option<Context>,
    pub(crate) measure: Option<MeasureFunc>,
    pub(crate) baseline: Option<BaselineFunc>,
    pub(crate) print: Option<PrintFunc>,
    pub(crate) node_type: NodeType,
    pub(crate) has_new_layout: bool,
    pub(crate) is_dirty: bool,
    /// Flex line the node was placed on by its parent's last layout.
    pub(crate) line_index: usize,
    /// Width/height after collapsing equal min and max.
    pub(crate) resolved_dimensions: Size<Value>,
}

impl Node {
    /// Create an empty, dirty node bound to `config`.
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            style: Style::for_config(&config),
            layout: Layout::default(),
            children: Arc::new(Vec::new()),
            parent: None,
            config,
            context: None,
            measure: None,
            baseline: None,
            print: None,
            node_type: NodeType::Default,
            has_new_layout: true,
            is_dirty: true,
            line_index: 0,
            resolved_dimensions: Size::new(Value::Undefined, Value::Undefined),
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn has_new_layout(&self) -> bool {
        self.has_new_layout
    }

    pub fn line_index(&self) -> usize {
        self.line_index
    }

    pub fn has_measure_func(&self) -> bool {
        self.measure.is_some()
    }

    pub fn has_baseline_func(&self) -> bool {
        self.baseline.is_some()
    }

    // =========================================================================
    // FLEX FACTORS
    // =========================================================================

    /// Flex-basis value in effect: explicit basis, else `flex > 0` implies 0.
    pub fn resolve_flex_basis(&self) -> Value {
        let basis = self.style.flex_basis;
        if basis.is_defined() && !basis.is_auto() {
            return basis;
        }
        match self.style.flex {
            Some(flex) if flex > 0.0 => {
                if self.config.use_web_defaults {
                    Value::Auto
                } else {
                    Value::ZERO
                }
            }
            _ => Value::Auto,
        }
    }

    /// Grow factor; roots never grow.
    pub fn resolve_flex_grow(&self) -> f32 {
        if self.parent.is_none() {
            return 0.0;
        }
        if let Some(grow) = self.style.flex_grow {
            return grow;
        }
        match self.style.flex {
            Some(flex) if flex > 0.0 => flex,
            _ => DEFAULT_FLEX_GROW,
        }
    }

    /// Shrink factor; roots never shrink.
    pub fn resolve_flex_shrink(&self) -> f32 {
        if self.parent.is_none() {
            return 0.0;
        }
        if let Some(shrink) = self.style.flex_shrink {
            return shrink;
        }
        if !self.config.use_web_defaults {
            if let Some(flex) = self.style.flex {
                if flex < 0.0 {
                    return -flex;
                }
            }
        }
        if self.config.use_web_defaults {
            WEB_DEFAULT_FLEX_SHRINK
        } else {
            DEFAULT_FLEX_SHRINK
        }
    }

    /// In-flow and able to grow or shrink.
    pub fn is_flexible(&self) -> bool {
        self.style.position_type == PositionType::Relative
            && (self.resolve_flex_grow() != 0.0 || self.resolve_flex_shrink() != 0.0)
    }

    // =========================================================================
    // DIMENSIONS
    // =========================================================================

    /// Collapse `min == max` into a fixed dimension, else take the style's.
    pub fn resolve_dimension(&mut self) {
        for dimension in [Dimension::Width, Dimension::Height] {
            let max = self.style.max(dimension);
            let resolved = if max.is_defined() && max == self.style.min(dimension) {
                max
            } else {
                self.style.dimensions.get(dimension)
            };
            self.resolved_dimensions.set(dimension, resolved);
        }
    }

    /// Resolved style dimension for an axis, before percent resolution.
    #[inline]
    pub fn resolved_dimension(&self, dimension: Dimension) -> Value {
        self.resolved_dimensions.get(dimension)
    }

    /// The style fixes this axis to a non-negative, resolvable size.
    pub fn is_style_dim_defined(&self, axis: FlexDirection, parent_size: Option<f32>) -> bool {
        match self.resolved_dimension(axis.dimension()) {
            Value::Undefined | Value::Auto => false,
            Value::Point(v) => v >= 0.0,
            Value::Percent(v) => v >= 0.0 && parent_size.is_some(),
        }
    }

    /// Measured size along an axis from the latest pass.
    #[inline]
    pub fn measured(&self, dimension: Dimension) -> Option<f32> {
        self.layout.measured_dimensions.get(dimension)
    }

    /// A pass has produced a usable size along this axis.
    pub fn is_layout_dim_defined(&self, axis: FlexDirection) -> bool {
        matches!(self.measured(axis.dimension()), Some(v) if v >= 0.0)
    }

    /// Clamp `value` to the style's min/max along `axis`.
    pub fn bound_axis_within_min_and_max(
        &self,
        axis: FlexDirection,
        value: Option<f32>,
        axis_size: Option<f32>,
    ) -> Option<f32> {
        let dimension = axis.dimension();
        let min = self.style.min(dimension).resolve(axis_size);
        let max = self.style.max(dimension).resolve(axis_size);

        let mut bound = value;
        if let (Some(max), Some(v)) = (max, bound) {
            if max >= 0.0 && v > max {
                bound = Some(max);
            }
        }
        if let (Some(min), Some(v)) = (min, bound) {
            if min >= 0.0 && v < min {
                bound = Some(min);
            }
        }
        bound
    }

    /// Clamp to min/max and never below padding plus border.
    pub fn bound_axis(
        &self,
        axis: FlexDirection,
        value: Option<f32>,
        axis_size: Option<f32>,
        width_size: Option<f32>,
    ) -> f32 {
        let floor = self.padding_and_border_for_axis(axis, width_size);
        self.bound_axis_within_min_and_max(axis, value, axis_size)
            .maybe_max(Some(floor))
            .unwrap_or(floor)
    }

    /// Measured size plus margins along an axis.
    pub fn dim_with_margin(&self, axis: FlexDirection, width_size: Option<f32>) -> f32 {
        self.measured(axis.dimension()).unwrap_or(0.0) + self.margin_for_axis(axis, width_size)
    }

    // =========================================================================
    // MARGIN
    // =========================================================================

    /// Raw leading margin value; start wins on row axes.
    pub fn margin_leading_value(&self, axis: FlexDirection) -> Value {
        let start = self.style.margin.get(Edge::Start);
        if axis.is_row() && start.is_defined() {
            start
        } else {
            self.style.margin.get(axis.leading_edge())
        }
    }

    /// Raw trailing margin value; end wins on row axes.
    pub fn margin_trailing_value(&self, axis: FlexDirection) -> Value {
        let end = self.style.margin.get(Edge::End);
        if axis.is_row() && end.is_defined() {
            end
        } else {
            self.style.margin.get(axis.trailing_edge())
        }
    }

    pub fn leading_margin(&self, axis: FlexDirection, width_size: Option<f32>) -> f32 {
        let start = self.style.margin.get(Edge::Start);
        let value = if axis.is_row() && start.is_defined() {
            start
        } else {
            self.style.margin.computed(axis.leading_edge(), Value::ZERO)
        };
        value.resolve_margin(width_size).unwrap_or(0.0)
    }

    pub fn trailing_margin(&self, axis: FlexDirection, width_size: Option<f32>) -> f32 {
        let end = self.style.margin.get(Edge::End);
        let value = if axis.is_row() && end.is_defined() {
            end
        } else {
            self.style.margin.computed(axis.trailing_edge(), Value::ZERO)
        };
        value.resolve_margin(width_size).unwrap_or(0.0)
    }

    pub fn margin_for_axis(&self, axis: FlexDirection, width_size: Option<f32>) -> f32 {
        self.leading_margin(axis, width_size) + self.trailing_margin(axis, width_size)
    }

    // =========================================================================
    // PADDING AND BORDER
    // =========================================================================

    pub fn leading_padding(&self, axis: FlexDirection, width_size: Option<f32>) -> f32 {
        if axis.is_row() {
            if let Some(start) = self.style.padding.get(Edge::Start).resolve(width_size) {
                if start >= 0.0 {
                    return start;
                }
            }
        }
        self.style
            .padding
            .computed(axis.leading_edge(), Value::ZERO)
            .resolve(width_size)
            .unwrap_or(0.0)
            .max(0.0)
    }

    pub fn trailing_padding(&self, axis: FlexDirection, width_size: Option<f32>) -> f32 {
        if axis.is_row() {
            if let Some(end) = self.style.padding.get(Edge::End).resolve(width_size) {
                if end >= 0.0 {
                    return end;
                }
            }
        }
        self.style
            .padding
            .computed(axis.trailing_edge(), Value::ZERO)
            .resolve(width_size)
            .unwrap_or(0.0)
            .max(0.0)
    }

    pub fn leading_border(&self, axis: FlexDirection) -> f32 {
        if axis.is_row() {
            if let Value::Point(start) = self.style.border.get(Edge::Start) {
                if start >= 0.0 {
                    return start;
                }
            }
        }
        match self.style.border.computed(axis.leading_edge(), Value::ZERO) {
            Value::Point(v) => v.max(0.0),
            _ => 0.0,
        }
    }

    pub fn trailing_border(&self, axis: FlexDirection) -> f32 {
        if axis.is_row() {
            if let Value::Point(end) = self.style.border.get(Edge::End) {
                if end >= 0.0 {
                    return end;
                }
            }
        }
        match self.style.border.computed(axis.trailing_edge(), Value::ZERO) {
            Value::Point(v) => v.max(0.0),
            _ => 0.0,
        }
    }

    pub fn leading_padding_and_border(&self, axis: FlexDirection, width_size: Option<f32>) -> f32 {
        self.leading_padding(axis, width_size) + self.leading_border(axis)
    }

    pub fn trailing_padding_and_border(&self, axis: FlexDirection, width_size: Option<f32>) -> f32 {
        self.trailing_padding(axis, width_size) + self.trailing_border(axis)
    }

    pub fn padding_and_border_for_axis(&self, axis: FlexDirection, width_size: Option<f32>) -> f32 {
        self.leading_padding_and_border(axis, width_size)
            + self.trailing_padding_and_border(axis, width_size)
    }

    // =========================================================================
    // POSITION OFFSETS
    // =========================================================================

    fn leading_position_value(&self, axis: FlexDirection) -> Value {
        if axis.is_row() {
            let start = self.style.position.computed(Edge::Start, Value::Undefined);
            if start.is_defined() {
                return start;
            }
        }
        self.style.position.computed(axis.leading_edge(), Value::Undefined)
    }

    fn trailing_position_value(&self, axis: FlexDirection) -> Value {
        if axis.is_row() {
            let end = self.style.position.computed(Edge::End, Value::Undefined);
            if end.is_defined() {
                return end;
            }
        }
        self.style.position.computed(axis.trailing_edge(), Value::Undefined)
    }

    pub fn is_leading_pos_defined(&self, axis: FlexDirection) -> bool {
        self.leading_position_value(axis).is_defined()
    }

    pub fn is_trailing_pos_defined(&self, axis: FlexDirection) -> bool {
        self.trailing_position_value(axis).is_defined()
    }

    pub fn leading_position(&self, axis: FlexDirection, axis_size: Option<f32>) -> f32 {
        self.leading_position_value(axis).resolve(axis_size).unwrap_or(0.0)
    }

    pub fn trailing_position(&self, axis: FlexDirection, axis_size: Option<f32>) -> f32 {
        self.trailing_position_value(axis).resolve(axis_size).unwrap_or(0.0)
    }

    /// Offset applied by `position: relative`; leading wins over trailing.
    pub fn relative_position(&self, axis: FlexDirection, axis_size: Option<f32>) -> f32 {
        if self.is_leading_pos_defined(axis) {
            self.leading_position(axis, axis_size)
        } else {
            -self.trailing_position(axis, axis_size)
        }
    }

    // =========================================================================
    // CONTEXT
    // =========================================================================

    /// Host context downcast to `T`.
    pub fn context<T: Any>(&self) -> Option<&T> {
        self.context.as_deref().and_then(|context| context.downcast_ref::<T>())
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("style", &self.style)
            .field("layout", &self.layout)
            .field("children", &self.children)
            .field("parent", &self.parent)
            .field("node_type", &self.node_type)
            .field("has_measure", &self.measure.is_some())
            .field("has_baseline", &self.baseline.is_some())
            .field("has_print", &self.print.is_some())
            .field("has_context", &self.context.is_some())
            .field("has_new_layout", &self.has_new_layout)
            .field("is_dirty", &self.is_dirty)
            .field("line_index", &self.line_index)
            .finish()
    }
}
