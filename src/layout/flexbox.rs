//! Flexbox - Layout of a container and its in-flow children.
//!
//! # Steps
//!
//! 1. Resolve axes, direction and the node's own edges
//! 2. Derive the available inner space from the outer space and min/max
//! 3. Compute each child's flex basis
//! 4. Break children into lines
//! 5. Resolve flexible lengths per line (freeze loop, then distribution)
//! 6. Justify along the main axis and size the line's cross axis
//! 7. Align items along the cross axis, relaying out stretched items
//! 8. Align lines (multi-line or baseline containers)
//! 9. Compute the node's own size; flip lines for wrap-reverse
//! 10. Lay out absolutely positioned children
//! 11. Set trailing positions for reversed axes
//!
//! Measurement-only visits stop after the sizes are known and skip the
//! positioning work.

use std::sync::Arc;

use crate::engine::{LayoutTree, Node, NodeId};
use crate::types::{Align, Dimension, Direction, Display, Edge, FlexDirection, Justify, MeasureMode, Overflow, PositionType, Value, Wrap};
use crate::utils::{floats_equal, MaybeMath};

use super::compute::LayoutInput;
use super::types::Layout;

// =============================================================================
// PER-CONTAINER STATE
// =============================================================================

/// Values fixed for one container visit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct FlexContext {
    pub direction: Direction,
    pub main_axis: FlexDirection,
    pub cross_axis: FlexDirection,
    pub is_main_axis_row: bool,
    pub is_node_flex_wrap: bool,
    pub perform_layout: bool,

    pub parent_width: Option<f32>,
    pub main_axis_parent_size: Option<f32>,
    pub cross_axis_parent_size: Option<f32>,

    pub leading_padding_and_border_main: f32,
    pub trailing_padding_and_border_main: f32,
    pub leading_padding_and_border_cross: f32,
    pub padding_and_border_axis_main: f32,
    pub padding_and_border_axis_cross: f32,

    pub measure_mode_main_dim: MeasureMode,
    pub measure_mode_cross_dim: MeasureMode,

    pub available_inner_width: Option<f32>,
    pub available_inner_height: Option<f32>,
    /// Narrowed per line when the container sizes to its content.
    pub available_inner_main_dim: Option<f32>,
    pub available_inner_cross_dim: Option<f32>,
    pub min_inner_main_dim: Option<f32>,
    pub max_inner_main_dim: Option<f32>,

    pub flex_basis_overflows: bool,
}

impl FlexContext {
    /// `(main, cross)` reordered as `(width, height)`.
    fn to_physical<T>(&self, main: T, cross: T) -> (T, T) {
        if self.is_main_axis_row { (main, cross) } else { (cross, main) }
    }
}

/// One flex line.
#[derive(Debug, Default)]
struct FlexLine {
    /// Range of child positions covered by the line, absolute children included.
    start: usize,
    end: usize,
    /// In-flow children placed on the line.
    items: Vec<NodeId>,
    size_consumed: f32,
    total_flex_grow_factors: f32,
    total_flex_shrink_scaled_factors: f32,
    remaining_free_space: f32,
    main_dim: f32,
    cross_dim: f32,
}

/// Cap `size` by the node's max size along `axis`, turning an unconstrained
/// request into an at-most one.
fn constrain_max_size_for_mode(
    node: &Node,
    axis: FlexDirection,
    parent_axis_size: Option<f32>,
    parent_width: Option<f32>,
    mode: &mut MeasureMode,
    size: &mut Option<f32>,
) {
    let Some(max_size) = node
        .style
        .max(axis.dimension())
        .resolve(parent_axis_size)
        .map(|max| max + node.margin_for_axis(axis, parent_width))
    else {
        return;
    };
    match *mode {
        MeasureMode::Exactly | MeasureMode::AtMost => {
            if !size.is_some_and(|s| s < max_size) {
                *size = Some(max_size);
            }
        }
        MeasureMode::Undefined => {
            *mode = MeasureMode::AtMost;
            *size = Some(max_size);
        }
    }
}

/// Auto margins take part in alignment instead of stretching.
fn has_auto_margin(node: &Node, axis: FlexDirection) -> bool {
    node.margin_leading_value(axis).is_auto() || node.margin_trailing_value(axis).is_auto()
}

impl LayoutTree {
    // =========================================================================
    // ALIGNMENT HELPERS
    // =========================================================================

    /// Cross-axis alignment of `child` inside `parent`.
    ///
    /// Baseline alignment is meaningless in a column and falls back to
    /// flex-start.
    pub(crate) fn align_item(&self, parent: NodeId, child: NodeId) -> Align {
        let parent_style = &self.nodes[parent].style;
        let align = match self.nodes[child].style.align_self {
            Align::Auto => parent_style.align_items,
            align => align,
        };
        if align == Align::Baseline && parent_style.flex_direction.is_column() {
            Align::FlexStart
        } else {
            align
        }
    }

    /// Whether any in-flow child of a row container aligns to the baseline.
    pub(crate) fn is_baseline_layout(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        if node.style.flex_direction.is_column() {
            return false;
        }
        if node.style.align_items == Align::Baseline {
            return true;
        }
        node.children.iter().any(|&child| {
            let style = &self.nodes[child].style;
            style.position_type == PositionType::Relative && style.align_self == Align::Baseline
        })
    }

    /// Distance from a node's top edge to its first baseline.
    ///
    /// Uses the baseline function when present, otherwise descends into the
    /// first baseline-aligned (or first in-flow) child of the first line.
    pub(crate) fn baseline(&self, id: NodeId) -> f32 {
        let mut offset = 0.0;
        let mut current = id;
        loop {
            let node = &self.nodes[current];
            let height = node.measured(Dimension::Height).unwrap_or(0.0);
            if let Some(baseline) = &node.baseline {
                let width = node.measured(Dimension::Width).unwrap_or(0.0);
                let value = baseline(current, width, height);
                return offset + if value.is_finite() { value } else { height };
            }

            let mut baseline_child = None;
            for &child in node.children.iter() {
                let child_node = &self.nodes[child];
                if child_node.line_index > 0 {
                    break;
                }
                if child_node.style.position_type == PositionType::Absolute {
                    continue;
                }
                if self.align_item(current, child) == Align::Baseline {
                    baseline_child = Some(child);
                    break;
                }
                baseline_child.get_or_insert(child);
            }

            match baseline_child {
                Some(child) => {
                    offset += self.position_at(child, Edge::Top);
                    current = child;
                }
                None => return offset + height,
            }
        }
    }

    /// Zero the geometry of a `display: none` subtree.
    fn zero_out_layout_recursively(&mut self, root: NodeId) {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            self.clone_shared_children(id);
            let node = &mut self.nodes[id];
            node.layout = Layout::zeroed();
            node.has_new_layout = true;
            node.is_dirty = false;
            stack.extend(node.children.iter().copied());
        }
    }

    // =========================================================================
    // ENTRY
    // =========================================================================

    /// Compute the size of `id`, and when `input.perform_layout` is set the
    /// positions and sizes of its whole subtree.
    pub(crate) fn layout_impl(&mut self, id: NodeId, input: &LayoutInput) {
        let direction = self.resolve_direction(id, input.parent_direction);
        self.write_resolved_edges(id, direction, input.parent_width);

        if self.nodes[id].measure.is_some() {
            self.measure_leaf(id, input);
            return;
        }
        if self.nodes[id].children.is_empty() {
            self.measure_empty_container(id, input);
            return;
        }
        if !input.perform_layout && self.measure_fixed_size(id, input) {
            return;
        }

        self.clone_shared_children(id);
        self.nodes[id].layout.had_overflow = false;
        let children = Arc::clone(&self.nodes[id].children);

        // STEP 1-2: axes and available inner space
        let mut ctx = self.flex_context(id, input, direction);

        // STEP 3: flex basis of every child
        let mut absolute_children = Vec::new();
        let single_flex_child = if ctx.measure_mode_main_dim == MeasureMode::Exactly {
            self.find_single_flex_child(&children)
        } else {
            None
        };
        let generation = self.generation;
        let mut total_outer_flex_basis = 0.0;

        for &child in children.iter() {
            if self.nodes[child].style.display == Display::None {
                self.zero_out_layout_recursively(child);
                continue;
            }
            self.nodes[child].resolve_dimension();

            if ctx.perform_layout {
                let (main_size, cross_size) = if ctx.is_main_axis_row {
                    (ctx.available_inner_width, ctx.available_inner_height)
                } else {
                    (ctx.available_inner_height, ctx.available_inner_width)
                };
                self.seed_position(child, ctx.main_axis, ctx.cross_axis, main_size, cross_size, ctx.available_inner_width);
            }

            if self.nodes[child].style.position_type == PositionType::Absolute {
                absolute_children.push(child);
                continue;
            }

            if Some(child) == single_flex_child {
                let layout = &mut self.nodes[child].layout;
                layout.computed_flex_basis_generation = generation;
                layout.computed_flex_basis = Some(0.0);
            } else {
                self.compute_flex_basis_for_child(id, child, &ctx, input.width_mode, input.height_mode);
            }

            let node = &self.nodes[child];
            total_outer_flex_basis += node.layout.computed_flex_basis.unwrap_or(0.0)
                + node.margin_for_axis(ctx.main_axis, ctx.available_inner_width);
        }

        ctx.flex_basis_overflows = ctx.measure_mode_main_dim != MeasureMode::Undefined
            && ctx.available_inner_main_dim.is_some_and(|available| total_outer_flex_basis > available);
        if ctx.is_node_flex_wrap && ctx.flex_basis_overflows && ctx.measure_mode_main_dim == MeasureMode::AtMost {
            ctx.measure_mode_main_dim = MeasureMode::Exactly;
        }

        // STEP 4-7: lines
        let mut start = 0;
        let mut line_count = 0;
        let mut total_line_cross_dim = 0.0_f32;
        let mut max_line_main_dim = 0.0_f32;

        while start < children.len() {
            let mut line = self.collect_flex_line(&ctx, &children, start, line_count);

            // Measuring with an exact cross size needs no flexing.
            let can_skip_flex = !ctx.perform_layout && ctx.measure_mode_cross_dim == MeasureMode::Exactly;

            self.resolve_flexible_lengths(id, &mut ctx, &mut line, can_skip_flex);
            self.justify_main_axis(id, &ctx, &mut line, &children, can_skip_flex);

            let node = &self.nodes[id];
            let mut container_cross_axis = ctx.available_inner_cross_dim;
            if matches!(ctx.measure_mode_cross_dim, MeasureMode::Undefined | MeasureMode::AtMost) {
                container_cross_axis = Some(
                    node.bound_axis(
                        ctx.cross_axis,
                        Some(line.cross_dim + ctx.padding_and_border_axis_cross),
                        ctx.cross_axis_parent_size,
                        ctx.parent_width,
                    ) - ctx.padding_and_border_axis_cross,
                );
            }
            if !ctx.is_node_flex_wrap && ctx.measure_mode_cross_dim == MeasureMode::Exactly {
                if let Some(available) = ctx.available_inner_cross_dim {
                    line.cross_dim = available;
                }
            }
            line.cross_dim = node.bound_axis(
                ctx.cross_axis,
                Some(line.cross_dim + ctx.padding_and_border_axis_cross),
                ctx.cross_axis_parent_size,
                ctx.parent_width,
            ) - ctx.padding_and_border_axis_cross;

            if ctx.perform_layout {
                self.align_items_in_line(id, &ctx, &line, &children, container_cross_axis, total_line_cross_dim);
            }

            total_line_cross_dim += line.cross_dim;
            max_line_main_dim = max_line_main_dim.max(line.main_dim);
            start = line.end;
            line_count += 1;
        }

        // STEP 8: line alignment
        if ctx.perform_layout && (line_count > 1 || self.is_baseline_layout(id)) {
            if let Some(available_cross) = ctx.available_inner_cross_dim {
                self.align_lines(id, &ctx, &children, line_count, total_line_cross_dim, available_cross);
            }
        }

        // STEP 9: own size
        self.set_final_dimensions(id, &ctx, input, max_line_main_dim, total_line_cross_dim);

        if ctx.perform_layout {
            if self.nodes[id].style.flex_wrap == Wrap::WrapReverse {
                let container_cross = self.measured(id, ctx.cross_axis.dimension());
                let leading = ctx.cross_axis.leading_edge();
                for &child in children.iter() {
                    let style = &self.nodes[child].style;
                    if style.display == Display::None || style.position_type != PositionType::Relative {
                        continue;
                    }
                    let flipped = container_cross
                        - self.position_at(child, leading)
                        - self.measured(child, ctx.cross_axis.dimension());
                    self.set_position_at(child, leading, flipped);
                }
            }

            // STEP 10: absolute children
            let width_mode = if ctx.is_main_axis_row { ctx.measure_mode_main_dim } else { ctx.measure_mode_cross_dim };
            for child in absolute_children {
                self.layout_absolute_child(id, child, ctx.available_inner_width, width_mode, ctx.available_inner_height, direction);
            }

            // STEP 11: trailing positions
            let needs_main_trailing = ctx.main_axis.is_reverse();
            let needs_cross_trailing = ctx.cross_axis.is_reverse();
            if needs_main_trailing || needs_cross_trailing {
                for &child in children.iter() {
                    if self.nodes[child].style.display == Display::None {
                        continue;
                    }
                    if needs_main_trailing {
                        self.set_child_trailing_position(id, child, ctx.main_axis);
                    }
                    if needs_cross_trailing {
                        self.set_child_trailing_position(id, child, ctx.cross_axis);
                    }
                }
            }
        }
    }

    /// Store the node's direction and resolved margin, border and padding.
    fn write_resolved_edges(&mut self, id: NodeId, direction: Direction, parent_width: Option<f32>) {
        let node = &mut self.nodes[id];
        node.layout.direction = direction;
        for axis in [FlexDirection::Row.resolve(direction), FlexDirection::Column.resolve(direction)] {
            let leading = axis.leading_edge().index();
            let trailing = axis.trailing_edge().index();
            let edges = [
                (node.leading_margin(axis, parent_width), node.trailing_margin(axis, parent_width)),
                (node.leading_border(axis), node.trailing_border(axis)),
                (node.leading_padding(axis, parent_width), node.trailing_padding(axis, parent_width)),
            ];
            let layout = &mut node.layout;
            for (target, (lead, trail)) in [&mut layout.margin, &mut layout.border, &mut layout.padding]
                .into_iter()
                .zip(edges)
            {
                target[leading] = lead;
                target[trailing] = trail;
            }
        }
    }

    /// STEP 1-2: axes, paddings and the space available to children.
    fn flex_context(&self, id: NodeId, input: &LayoutInput, direction: Direction) -> FlexContext {
        let node = &self.nodes[id];
        let style = &node.style;
        let parent_width = input.parent_width;

        let main_axis = style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_axis_row = main_axis.is_row();

        let (main_axis_parent_size, cross_axis_parent_size) = if is_main_axis_row {
            (input.parent_width, input.parent_height)
        } else {
            (input.parent_height, input.parent_width)
        };
        let (measure_mode_main_dim, measure_mode_cross_dim) = if is_main_axis_row {
            (input.width_mode, input.height_mode)
        } else {
            (input.height_mode, input.width_mode)
        };

        let padding_and_border_axis_main = node.padding_and_border_for_axis(main_axis, parent_width);
        let padding_and_border_axis_cross = node.padding_and_border_for_axis(cross_axis, parent_width);
        let (padding_and_border_axis_row, padding_and_border_axis_column) = if is_main_axis_row {
            (padding_and_border_axis_main, padding_and_border_axis_cross)
        } else {
            (padding_and_border_axis_cross, padding_and_border_axis_main)
        };
        let margin_axis_row = node.margin_for_axis(FlexDirection::Row, parent_width);
        let margin_axis_column = node.margin_for_axis(FlexDirection::Column, parent_width);

        let inner = |value: Value, parent_size: Option<f32>, margin: f32, padding_and_border: f32| {
            value.resolve(parent_size).map(|v| v - margin - padding_and_border)
        };
        let min_inner_width = inner(style.min(Dimension::Width), input.parent_width, margin_axis_row, padding_and_border_axis_row);
        let max_inner_width = inner(style.max(Dimension::Width), input.parent_width, margin_axis_row, padding_and_border_axis_row);
        let min_inner_height =
            inner(style.min(Dimension::Height), input.parent_height, margin_axis_column, padding_and_border_axis_column);
        let max_inner_height =
            inner(style.max(Dimension::Height), input.parent_height, margin_axis_column, padding_and_border_axis_column);

        // Max overrides the available size and min overrides both.
        let available_inner_width = input
            .available_width
            .map(|w| w - margin_axis_row - padding_and_border_axis_row)
            .map(|w| Some(w).maybe_min(max_inner_width).maybe_max(min_inner_width).unwrap_or(w));
        let available_inner_height = input
            .available_height
            .map(|h| h - margin_axis_column - padding_and_border_axis_column)
            .map(|h| Some(h).maybe_min(max_inner_height).maybe_max(min_inner_height).unwrap_or(h));

        let (available_inner_main_dim, available_inner_cross_dim) = if is_main_axis_row {
            (available_inner_width, available_inner_height)
        } else {
            (available_inner_height, available_inner_width)
        };
        let (min_inner_main_dim, max_inner_main_dim) = if is_main_axis_row {
            (min_inner_width, max_inner_width)
        } else {
            (min_inner_height, max_inner_height)
        };

        FlexContext {
            direction,
            main_axis,
            cross_axis,
            is_main_axis_row,
            is_node_flex_wrap: style.flex_wrap != Wrap::NoWrap,
            perform_layout: input.perform_layout,
            parent_width,
            main_axis_parent_size,
            cross_axis_parent_size,
            leading_padding_and_border_main: node.leading_padding_and_border(main_axis, parent_width),
            trailing_padding_and_border_main: node.trailing_padding_and_border(main_axis, parent_width),
            leading_padding_and_border_cross: node.leading_padding_and_border(cross_axis, parent_width),
            padding_and_border_axis_main,
            padding_and_border_axis_cross,
            measure_mode_main_dim,
            measure_mode_cross_dim,
            available_inner_width,
            available_inner_height,
            available_inner_main_dim,
            available_inner_cross_dim,
            min_inner_main_dim,
            max_inner_main_dim,
            flex_basis_overflows: false,
        }
    }

    /// The only child able to both grow and shrink, if exactly one is flexible.
    fn find_single_flex_child(&self, children: &[NodeId]) -> Option<NodeId> {
        let mut single = None;
        for &child in children {
            let node = &self.nodes[child];
            if single.is_some() {
                if node.is_flexible() {
                    return None;
                }
            } else if node.resolve_flex_grow() > 0.0 && node.resolve_flex_shrink() > 0.0 {
                single = Some(child);
            }
        }
        single
    }

    // =========================================================================
    // STEP 3: FLEX BASIS
    // =========================================================================

    /// Flex basis of `child`: explicit basis, explicit main size, or the
    /// size of a measuring layout.
    fn compute_flex_basis_for_child(
        &mut self,
        id: NodeId,
        child: NodeId,
        ctx: &FlexContext,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
    ) {
        let generation = self.generation;
        let width = ctx.available_inner_width;
        let height = ctx.available_inner_height;
        let parent_width = ctx.available_inner_width;
        let parent_height = ctx.available_inner_height;
        let main_axis = ctx.main_axis;
        let is_main_axis_row = ctx.is_main_axis_row;
        let main_axis_size = if is_main_axis_row { width } else { height };
        let main_axis_parent_size = if is_main_axis_row { parent_width } else { parent_height };
        let align = self.align_item(id, child);
        let parent_overflow = self.nodes[id].style.overflow;

        let node = &mut self.nodes[child];
        let resolved_flex_basis = node.resolve_flex_basis().resolve(main_axis_parent_size);
        let is_row_style_dim_defined = node.is_style_dim_defined(FlexDirection::Row, parent_width);
        let is_column_style_dim_defined = node.is_style_dim_defined(FlexDirection::Column, parent_height);

        if let (Some(basis), Some(_)) = (resolved_flex_basis, main_axis_size) {
            let web_flex_basis = node
                .config
                .is_experimental_feature_enabled(crate::engine::ExperimentalFeatures::WEB_FLEX_BASIS);
            if node.layout.computed_flex_basis.is_none()
                || (web_flex_basis && node.layout.computed_flex_basis_generation != generation)
            {
                let floor = node.padding_and_border_for_axis(main_axis, parent_width);
                node.layout.computed_flex_basis = Some(basis.max(floor));
            }
        } else if is_main_axis_row && is_row_style_dim_defined {
            let width = node.resolved_dimension(Dimension::Width).resolve(parent_width).unwrap_or(0.0);
            let floor = node.padding_and_border_for_axis(FlexDirection::Row, parent_width);
            node.layout.computed_flex_basis = Some(width.max(floor));
        } else if !is_main_axis_row && is_column_style_dim_defined {
            let height = node.resolved_dimension(Dimension::Height).resolve(parent_height).unwrap_or(0.0);
            let floor = node.padding_and_border_for_axis(FlexDirection::Column, parent_width);
            node.layout.computed_flex_basis = Some(height.max(floor));
        } else {
            let mut child_width = None;
            let mut child_height = None;
            let mut child_width_mode = MeasureMode::Undefined;
            let mut child_height_mode = MeasureMode::Undefined;

            let margin_row = node.margin_for_axis(FlexDirection::Row, parent_width);
            let margin_column = node.margin_for_axis(FlexDirection::Column, parent_width);

            if is_row_style_dim_defined {
                child_width = node.resolved_dimension(Dimension::Width).resolve(parent_width).map(|w| w + margin_row);
                child_width_mode = MeasureMode::Exactly;
            }
            if is_column_style_dim_defined {
                child_height =
                    node.resolved_dimension(Dimension::Height).resolve(parent_height).map(|h| h + margin_column);
                child_height_mode = MeasureMode::Exactly;
            }

            // A scrolling container does not bound its children along the
            // scrolled axis.
            let scroll = parent_overflow == Overflow::Scroll;
            if (!is_main_axis_row && scroll) || !scroll {
                if child_width.is_none() && width.is_some() {
                    child_width = width;
                    child_width_mode = MeasureMode::AtMost;
                }
            }
            if (is_main_axis_row && scroll) || !scroll {
                if child_height.is_none() && height.is_some() {
                    child_height = height;
                    child_height_mode = MeasureMode::AtMost;
                }
            }

            if let Some(ratio) = node.style.aspect_ratio {
                if !is_main_axis_row && child_width_mode == MeasureMode::Exactly {
                    child_height = child_width.map(|w| (w - margin_row) / ratio);
                    child_height_mode = MeasureMode::Exactly;
                } else if is_main_axis_row && child_height_mode == MeasureMode::Exactly {
                    child_width = child_height.map(|h| (h - margin_column) * ratio);
                    child_width_mode = MeasureMode::Exactly;
                }
            }

            // Stretched children are measured at the container's exact cross size.
            let has_exact_width = width.is_some() && width_mode == MeasureMode::Exactly;
            let child_width_stretch = align == Align::Stretch && child_width_mode != MeasureMode::Exactly;
            if !is_main_axis_row && !is_row_style_dim_defined && has_exact_width && child_width_stretch {
                child_width = width;
                child_width_mode = MeasureMode::Exactly;
                if let Some(ratio) = node.style.aspect_ratio {
                    child_height = child_width.map(|w| (w - margin_row) / ratio);
                    child_height_mode = MeasureMode::Exactly;
                }
            }

            let has_exact_height = height.is_some() && height_mode == MeasureMode::Exactly;
            let child_height_stretch = align == Align::Stretch && child_height_mode != MeasureMode::Exactly;
            if is_main_axis_row && !is_column_style_dim_defined && has_exact_height && child_height_stretch {
                child_height = height;
                child_height_mode = MeasureMode::Exactly;
                if let Some(ratio) = node.style.aspect_ratio {
                    child_width = child_height.map(|h| (h - margin_column) * ratio);
                    child_width_mode = MeasureMode::Exactly;
                }
            }

            constrain_max_size_for_mode(
                node,
                FlexDirection::Row,
                parent_width,
                parent_width,
                &mut child_width_mode,
                &mut child_width,
            );
            constrain_max_size_for_mode(
                node,
                FlexDirection::Column,
                parent_height,
                parent_width,
                &mut child_height_mode,
                &mut child_height,
            );

            let input = LayoutInput {
                available_width: child_width,
                available_height: child_height,
                width_mode: child_width_mode,
                height_mode: child_height_mode,
                parent_width,
                parent_height,
                parent_direction: ctx.direction,
                perform_layout: false,
            };
            self.layout_node_internal(child, &input, "measure");

            let node = &mut self.nodes[child];
            let measured = node.measured(main_axis.dimension()).unwrap_or(0.0);
            let floor = node.padding_and_border_for_axis(main_axis, parent_width);
            node.layout.computed_flex_basis = Some(measured.max(floor));
        }

        self.nodes[child].layout.computed_flex_basis_generation = generation;
    }

    // =========================================================================
    // STEP 4: LINE BREAKING
    // =========================================================================

    /// Gather the children of one line, starting at child position `start`.
    fn collect_flex_line(&mut self, ctx: &FlexContext, children: &[NodeId], start: usize, line_index: usize) -> FlexLine {
        let mut line = FlexLine {
            start,
            ..FlexLine::default()
        };
        let mut size_consumed_including_min = 0.0;
        let dimension = ctx.main_axis.dimension();

        let mut end = start;
        while end < children.len() {
            let child = children[end];
            let node = &mut self.nodes[child];
            if node.style.display == Display::None {
                end += 1;
                continue;
            }
            node.line_index = line_index;

            if node.style.position_type != PositionType::Absolute {
                let margin_main = node.margin_for_axis(ctx.main_axis, ctx.available_inner_width);
                let basis = node.layout.computed_flex_basis;
                let with_max = node.style.max(dimension).resolve(ctx.main_axis_parent_size).maybe_min(basis);
                let bounded_basis = node
                    .style
                    .min(dimension)
                    .resolve(ctx.main_axis_parent_size)
                    .maybe_max(with_max)
                    .unwrap_or(0.0);

                // In a wrapping container an item that overflows the line
                // starts the next one, unless it is alone on the line.
                let overflows = ctx
                    .available_inner_main_dim
                    .is_some_and(|available| size_consumed_including_min + bounded_basis + margin_main > available);
                if overflows && ctx.is_node_flex_wrap && !line.items.is_empty() {
                    break;
                }

                size_consumed_including_min += bounded_basis + margin_main;
                line.size_consumed += bounded_basis + margin_main;

                if node.is_flexible() {
                    line.total_flex_grow_factors += node.resolve_flex_grow();
                    // The shrink factor is scaled by the child's basis.
                    line.total_flex_shrink_scaled_factors += -node.resolve_flex_shrink() * basis.unwrap_or(0.0);
                }
                line.items.push(child);
            }
            end += 1;
        }
        line.end = end;

        // Factors summing below 1 distribute only part of the free space.
        if line.total_flex_grow_factors > 0.0 && line.total_flex_grow_factors < 1.0 {
            line.total_flex_grow_factors = 1.0;
        }
        if line.total_flex_shrink_scaled_factors > 0.0 && line.total_flex_shrink_scaled_factors < 1.0 {
            line.total_flex_shrink_scaled_factors = 1.0;
        }
        line
    }

    // =========================================================================
    // STEP 5: FLEXIBLE LENGTHS
    // =========================================================================

    fn resolve_flexible_lengths(&mut self, id: NodeId, ctx: &mut FlexContext, line: &mut FlexLine, can_skip_flex: bool) {
        let node = &self.nodes[id];
        let legacy_stretch = node.config.use_legacy_stretch_behaviour;

        // Without an exact main size the line must still respect min/max.
        let mut size_based_on_content = false;
        if ctx.measure_mode_main_dim != MeasureMode::Exactly {
            if let Some(min) = ctx.min_inner_main_dim.filter(|&min| line.size_consumed < min) {
                ctx.available_inner_main_dim = Some(min);
            } else if let Some(max) = ctx.max_inner_main_dim.filter(|&max| line.size_consumed > max) {
                ctx.available_inner_main_dim = Some(max);
            } else {
                // Nothing to flex into: the consumed size is all the node needs.
                if !legacy_stretch && (line.total_flex_grow_factors == 0.0 || node.resolve_flex_grow() == 0.0) {
                    ctx.available_inner_main_dim = Some(line.size_consumed);
                }
                size_based_on_content = !legacy_stretch;
            }
        }

        let remaining_free_space = match ctx.available_inner_main_dim {
            Some(available) if !size_based_on_content => available - line.size_consumed,
            // Content-sized with a negative line: allocate nothing.
            _ if line.size_consumed < 0.0 => -line.size_consumed,
            _ => 0.0,
        };

        let delta_free_space = if can_skip_flex {
            0.0
        } else {
            self.distribute_free_space(id, ctx, line, remaining_free_space)
        };

        line.remaining_free_space = remaining_free_space + delta_free_space;
        let layout = &mut self.nodes[id].layout;
        layout.had_overflow |= line.remaining_free_space < 0.0;
    }

    /// Freeze items clamped by their min/max, then size every item of the
    /// line and lay it out. Returns the change in free space.
    fn distribute_free_space(&mut self, id: NodeId, ctx: &FlexContext, line: &FlexLine, initial_free_space: f32) -> f32 {
        let main_axis = ctx.main_axis;
        let mut remaining_free_space = initial_free_space;
        let mut total_grow = line.total_flex_grow_factors;
        let mut total_shrink_scaled = line.total_flex_shrink_scaled_factors;
        let mut frozen: Vec<Option<f32>> = vec![None; line.items.len()];

        // Each pass freezes the items its distribution would push past a
        // bound and takes their space and factors out of the pool. Stops once
        // a pass freezes nothing; every pass but the last freezes at least
        // one item.
        for _ in 0..=line.items.len() {
            let mut delta_free_space = 0.0;
            let mut delta_grow = 0.0;
            let mut delta_shrink_scaled = 0.0;
            let mut froze_any = false;

            for (index, &child) in line.items.iter().enumerate() {
                if frozen[index].is_some() {
                    continue;
                }
                let node = &self.nodes[child];
                let basis = node
                    .bound_axis_within_min_and_max(main_axis, node.layout.computed_flex_basis, ctx.main_axis_parent_size)
                    .unwrap_or(0.0);

                let (factor, share) = if remaining_free_space < 0.0 {
                    let scaled = -node.resolve_flex_shrink() * basis;
                    (scaled, remaining_free_space / total_shrink_scaled * scaled)
                } else if remaining_free_space > 0.0 {
                    let grow = node.resolve_flex_grow();
                    (grow, remaining_free_space / total_grow * grow)
                } else {
                    continue;
                };
                if factor == 0.0 {
                    continue;
                }

                let base_main_size = basis + share;
                let bound_main_size =
                    node.bound_axis(main_axis, Some(base_main_size), ctx.available_inner_main_dim, ctx.available_inner_width);
                if base_main_size != bound_main_size {
                    delta_free_space -= bound_main_size - basis;
                    if remaining_free_space < 0.0 {
                        delta_shrink_scaled -= factor;
                    } else {
                        delta_grow -= factor;
                    }
                    frozen[index] = Some(bound_main_size);
                    froze_any = true;
                }
            }

            total_shrink_scaled += delta_shrink_scaled;
            total_grow += delta_grow;
            remaining_free_space += delta_free_space;
            if !froze_any {
                break;
            }
        }

        let mut delta_free_space = 0.0;
        for (index, &child) in line.items.iter().enumerate() {
            let node = &self.nodes[child];
            let basis = node
                .bound_axis_within_min_and_max(main_axis, node.layout.computed_flex_basis, ctx.main_axis_parent_size)
                .unwrap_or(0.0);

            let updated_main_size = if let Some(size) = frozen[index] {
                size
            } else if remaining_free_space < 0.0 {
                let scaled = -node.resolve_flex_shrink() * basis;
                if scaled != 0.0 {
                    let child_size = if total_shrink_scaled == 0.0 {
                        basis + scaled
                    } else {
                        basis + remaining_free_space / total_shrink_scaled * scaled
                    };
                    node.bound_axis(main_axis, Some(child_size), ctx.available_inner_main_dim, ctx.available_inner_width)
                } else {
                    basis
                }
            } else if remaining_free_space > 0.0 {
                let grow = node.resolve_flex_grow();
                if grow != 0.0 {
                    node.bound_axis(
                        main_axis,
                        Some(basis + remaining_free_space / total_grow * grow),
                        ctx.available_inner_main_dim,
                        ctx.available_inner_width,
                    )
                } else {
                    basis
                }
            } else {
                basis
            };

            delta_free_space -= updated_main_size - basis;
            self.layout_flex_item(id, child, ctx, updated_main_size);
        }
        delta_free_space
    }

    /// Lay out one item at its resolved main size.
    fn layout_flex_item(&mut self, id: NodeId, child: NodeId, ctx: &FlexContext, main_size: f32) {
        let align = self.align_item(id, child);
        let node = &self.nodes[child];
        let cross_axis = ctx.cross_axis;
        let margin_main = node.margin_for_axis(ctx.main_axis, ctx.available_inner_width);
        let margin_cross = node.margin_for_axis(cross_axis, ctx.available_inner_width);
        let cross_defined = node.is_style_dim_defined(cross_axis, ctx.available_inner_cross_dim);
        let stretches = align == Align::Stretch && !has_auto_margin(node, cross_axis);

        let mut child_main_size = Some(main_size + margin_main);
        let mut child_main_mode = MeasureMode::Exactly;

        let (mut child_cross_size, mut child_cross_mode) = if let Some(ratio) = node.style.aspect_ratio {
            let cross = if ctx.is_main_axis_row { main_size / ratio } else { main_size * ratio };
            (Some(cross + margin_cross), MeasureMode::Exactly)
        } else if ctx.available_inner_cross_dim.is_some()
            && !cross_defined
            && ctx.measure_mode_cross_dim == MeasureMode::Exactly
            && !(ctx.is_node_flex_wrap && ctx.flex_basis_overflows)
            && stretches
        {
            (ctx.available_inner_cross_dim, MeasureMode::Exactly)
        } else if !cross_defined {
            let mode = if ctx.available_inner_cross_dim.is_some() {
                MeasureMode::AtMost
            } else {
                MeasureMode::Undefined
            };
            (ctx.available_inner_cross_dim, mode)
        } else {
            let resolved = node.resolved_dimension(cross_axis.dimension());
            let size = resolved.resolve(ctx.available_inner_cross_dim).map(|s| s + margin_cross);
            let loose_percent =
                matches!(resolved, Value::Percent(_)) && ctx.measure_mode_cross_dim != MeasureMode::Exactly;
            let mode = if size.is_none() || loose_percent {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };
            (size, mode)
        };

        constrain_max_size_for_mode(
            node,
            ctx.main_axis,
            ctx.available_inner_main_dim,
            ctx.available_inner_width,
            &mut child_main_mode,
            &mut child_main_size,
        );
        constrain_max_size_for_mode(
            node,
            cross_axis,
            ctx.available_inner_cross_dim,
            ctx.available_inner_width,
            &mut child_cross_mode,
            &mut child_cross_size,
        );

        // Stretched items get their final cross size once the line is sized.
        let requires_stretch_layout = !cross_defined && stretches;

        let (available_width, available_height) = ctx.to_physical(child_main_size, child_cross_size);
        let (width_mode, height_mode) = ctx.to_physical(child_main_mode, child_cross_mode);
        let input = LayoutInput {
            available_width,
            available_height,
            width_mode,
            height_mode,
            parent_width: ctx.available_inner_width,
            parent_height: ctx.available_inner_height,
            parent_direction: ctx.direction,
            perform_layout: ctx.perform_layout && !requires_stretch_layout,
        };
        self.layout_node_internal(child, &input, "flex");

        let child_overflow = self.nodes[child].layout.had_overflow;
        self.nodes[id].layout.had_overflow |= child_overflow;
    }

    // =========================================================================
    // STEP 6: MAIN-AXIS JUSTIFICATION
    // =========================================================================

    fn justify_main_axis(
        &mut self,
        id: NodeId,
        ctx: &FlexContext,
        line: &mut FlexLine,
        children: &[NodeId],
        can_skip_flex: bool,
    ) {
        let main_axis = ctx.main_axis;
        let node = &self.nodes[id];
        let leading_border_main = node.leading_border(main_axis);
        let justify_content = node.style.justify_content;

        // An at-most container only spreads items up to its min size.
        let mut remaining_free_space = line.remaining_free_space;
        if ctx.measure_mode_main_dim == MeasureMode::AtMost && remaining_free_space > 0.0 {
            let min = node.style.min(main_axis.dimension()).resolve(ctx.main_axis_parent_size);
            remaining_free_space = match (min, ctx.available_inner_main_dim) {
                (Some(min), Some(available)) if min >= 0.0 => (min - (available - remaining_free_space)).max(0.0),
                _ => 0.0,
            };
        }

        let line_children = &children[line.start..line.end];
        let auto_margin_count: usize = line_children
            .iter()
            .map(|&child| &self.nodes[child])
            .filter(|c| c.style.position_type == PositionType::Relative && c.style.display != Display::None)
            .map(|c| {
                usize::from(c.margin_leading_value(main_axis).is_auto())
                    + usize::from(c.margin_trailing_value(main_axis).is_auto())
            })
            .sum();

        let item_count = line.items.len();
        let mut leading_main_dim = 0.0;
        let mut between_main_dim = 0.0;
        if auto_margin_count == 0 {
            match justify_content {
                Justify::FlexStart => {}
                Justify::Center => leading_main_dim = remaining_free_space / 2.0,
                Justify::FlexEnd => leading_main_dim = remaining_free_space,
                Justify::SpaceBetween => {
                    if item_count > 1 {
                        between_main_dim = remaining_free_space.max(0.0) / (item_count - 1) as f32;
                    }
                }
                Justify::SpaceEvenly => {
                    between_main_dim = remaining_free_space / (item_count + 1) as f32;
                    leading_main_dim = between_main_dim;
                }
                Justify::SpaceAround => {
                    if item_count > 0 {
                        between_main_dim = remaining_free_space / item_count as f32;
                        leading_main_dim = between_main_dim / 2.0;
                    }
                }
            }
        }
        let auto_margin_share = if auto_margin_count > 0 {
            remaining_free_space / auto_margin_count as f32
        } else {
            0.0
        };

        let leading_edge = main_axis.leading_edge();
        let mut main_dim = ctx.leading_padding_and_border_main + leading_main_dim;
        let mut cross_dim = 0.0_f32;

        for &child in line_children {
            let node = &self.nodes[child];
            if node.style.display == Display::None {
                continue;
            }

            if node.style.position_type == PositionType::Absolute && node.is_leading_pos_defined(main_axis) {
                if ctx.perform_layout {
                    // Explicit offsets override the flow position.
                    let position = node.leading_position(main_axis, ctx.available_inner_main_dim)
                        + leading_border_main
                        + node.leading_margin(main_axis, ctx.available_inner_width);
                    self.set_position_at(child, leading_edge, position);
                }
            } else if node.style.position_type == PositionType::Relative {
                let leading_auto = node.margin_leading_value(main_axis).is_auto();
                let trailing_auto = node.margin_trailing_value(main_axis).is_auto();

                if leading_auto {
                    main_dim += auto_margin_share;
                }
                if ctx.perform_layout {
                    let position = self.position_at(child, leading_edge) + main_dim;
                    self.set_position_at(child, leading_edge, position);
                }
                if trailing_auto {
                    main_dim += auto_margin_share;
                }

                let node = &self.nodes[child];
                if can_skip_flex {
                    // Measured sizes were not computed; use the basis.
                    main_dim += between_main_dim
                        + node.margin_for_axis(main_axis, ctx.available_inner_width)
                        + node.layout.computed_flex_basis.unwrap_or(0.0);
                    cross_dim = ctx.available_inner_cross_dim.unwrap_or(0.0);
                } else {
                    main_dim += between_main_dim + node.dim_with_margin(main_axis, ctx.available_inner_width);
                    cross_dim = cross_dim.max(node.dim_with_margin(ctx.cross_axis, ctx.available_inner_width));
                }
            } else if ctx.perform_layout {
                let position = self.position_at(child, leading_edge) + leading_border_main + leading_main_dim;
                self.set_position_at(child, leading_edge, position);
            }
        }

        line.main_dim = main_dim + ctx.trailing_padding_and_border_main;
        line.cross_dim = cross_dim;
    }

    // =========================================================================
    // STEP 7: CROSS-AXIS ALIGNMENT
    // =========================================================================

    fn align_items_in_line(
        &mut self,
        id: NodeId,
        ctx: &FlexContext,
        line: &FlexLine,
        children: &[NodeId],
        container_cross_axis: Option<f32>,
        total_line_cross_dim: f32,
    ) {
        let cross_axis = ctx.cross_axis;
        let leading_edge = cross_axis.leading_edge();
        let leading_border_cross = self.nodes[id].leading_border(cross_axis);

        for &child in &children[line.start..line.end] {
            let node = &self.nodes[child];
            if node.style.display == Display::None {
                continue;
            }

            if node.style.position_type == PositionType::Absolute {
                let margin = node.leading_margin(cross_axis, ctx.available_inner_width);
                let position = if node.is_leading_pos_defined(cross_axis) {
                    node.leading_position(cross_axis, ctx.available_inner_cross_dim) + leading_border_cross + margin
                } else {
                    leading_border_cross + margin
                };
                self.set_position_at(child, leading_edge, position);
                continue;
            }

            let mut leading_cross_dim = ctx.leading_padding_and_border_cross;
            let align = self.align_item(id, child);
            let leading_auto = node.margin_leading_value(cross_axis).is_auto();
            let trailing_auto = node.margin_trailing_value(cross_axis).is_auto();

            if align == Align::Stretch && !leading_auto && !trailing_auto {
                // A definite cross size is never stretched.
                if !node.is_style_dim_defined(cross_axis, ctx.available_inner_cross_dim) {
                    let main_size = node.measured(ctx.main_axis.dimension());
                    let mut child_cross_size = match node.style.aspect_ratio {
                        Some(ratio) => main_size.map(|main| {
                            node.margin_for_axis(cross_axis, ctx.available_inner_width)
                                + if ctx.is_main_axis_row { main / ratio } else { main * ratio }
                        }),
                        None => Some(line.cross_dim),
                    };
                    let mut child_main_size =
                        main_size.map(|main| main + node.margin_for_axis(ctx.main_axis, ctx.available_inner_width));

                    let mut main_mode = MeasureMode::Exactly;
                    let mut cross_mode = MeasureMode::Exactly;
                    constrain_max_size_for_mode(
                        node,
                        ctx.main_axis,
                        ctx.available_inner_main_dim,
                        ctx.available_inner_width,
                        &mut main_mode,
                        &mut child_main_size,
                    );
                    constrain_max_size_for_mode(
                        node,
                        cross_axis,
                        ctx.available_inner_cross_dim,
                        ctx.available_inner_width,
                        &mut cross_mode,
                        &mut child_cross_size,
                    );

                    let (available_width, available_height) = ctx.to_physical(child_main_size, child_cross_size);
                    let mode = |size: Option<f32>| {
                        if size.is_some() { MeasureMode::Exactly } else { MeasureMode::Undefined }
                    };
                    let input = LayoutInput {
                        available_width,
                        available_height,
                        width_mode: mode(available_width),
                        height_mode: mode(available_height),
                        parent_width: ctx.available_inner_width,
                        parent_height: ctx.available_inner_height,
                        parent_direction: ctx.direction,
                        perform_layout: true,
                    };
                    self.layout_node_internal(child, &input, "stretch");
                }
            } else {
                let remaining_cross_dim = container_cross_axis.unwrap_or(0.0)
                    - node.dim_with_margin(cross_axis, ctx.available_inner_width);

                if leading_auto && trailing_auto {
                    leading_cross_dim += (remaining_cross_dim / 2.0).max(0.0);
                } else if trailing_auto {
                    // Pushed to the start by its trailing margin.
                } else if leading_auto {
                    leading_cross_dim += remaining_cross_dim.max(0.0);
                } else if align == Align::FlexStart {
                    // Already at the start.
                } else if align == Align::Center {
                    leading_cross_dim += remaining_cross_dim / 2.0;
                } else {
                    leading_cross_dim += remaining_cross_dim;
                }
            }

            let position = self.position_at(child, leading_edge) + total_line_cross_dim + leading_cross_dim;
            self.set_position_at(child, leading_edge, position);
        }
    }

    // =========================================================================
    // STEP 8: LINE ALIGNMENT
    // =========================================================================

    fn align_lines(
        &mut self,
        id: NodeId,
        ctx: &FlexContext,
        children: &[NodeId],
        line_count: usize,
        total_line_cross_dim: f32,
        available_cross: f32,
    ) {
        let cross_axis = ctx.cross_axis;
        let cross_dimension = cross_axis.dimension();
        let leading_edge = cross_axis.leading_edge();
        let remaining = available_cross - total_line_cross_dim;
        let lines = line_count as f32;

        let mut cross_dim_lead = 0.0;
        let mut current_lead = ctx.leading_padding_and_border_cross;
        match self.nodes[id].style.align_content {
            Align::FlexEnd => current_lead += remaining,
            Align::Center => current_lead += remaining / 2.0,
            Align::Stretch => {
                if available_cross > total_line_cross_dim {
                    cross_dim_lead = remaining / lines;
                }
            }
            Align::SpaceAround => {
                if available_cross > total_line_cross_dim {
                    current_lead += remaining / (2.0 * lines);
                    if line_count > 1 {
                        cross_dim_lead = remaining / lines;
                    }
                } else {
                    current_lead += remaining / 2.0;
                }
            }
            Align::SpaceBetween => {
                if available_cross > total_line_cross_dim && line_count > 1 {
                    cross_dim_lead = remaining / (lines - 1.0);
                }
            }
            Align::Auto | Align::FlexStart | Align::Baseline => {}
        }

        let mut end_index = 0;
        for line in 0..line_count {
            let start_index = end_index;

            // Height of the line and its baseline extents.
            let mut line_height = 0.0_f32;
            let mut max_ascent = 0.0_f32;
            let mut max_descent = 0.0_f32;
            let mut index = start_index;
            while index < children.len() {
                let child = children[index];
                let node = &self.nodes[child];
                if node.style.display == Display::None || node.style.position_type != PositionType::Relative {
                    index += 1;
                    continue;
                }
                if node.line_index != line {
                    break;
                }
                if node.is_layout_dim_defined(cross_axis) {
                    line_height = line_height.max(
                        node.measured(cross_dimension).unwrap_or(0.0)
                            + node.margin_for_axis(cross_axis, ctx.available_inner_width),
                    );
                }
                if self.align_item(id, child) == Align::Baseline {
                    let ascent =
                        self.baseline(child) + node.leading_margin(FlexDirection::Column, ctx.available_inner_width);
                    let descent = node.measured(Dimension::Height).unwrap_or(0.0)
                        + node.margin_for_axis(FlexDirection::Column, ctx.available_inner_width)
                        - ascent;
                    max_ascent = max_ascent.max(ascent);
                    max_descent = max_descent.max(descent);
                    line_height = line_height.max(max_ascent + max_descent);
                }
                index += 1;
            }
            end_index = index;
            line_height += cross_dim_lead;

            for &child in &children[start_index..end_index] {
                let node = &self.nodes[child];
                if node.style.display == Display::None || node.style.position_type != PositionType::Relative {
                    continue;
                }
                match self.align_item(id, child) {
                    Align::FlexStart => {
                        let position = current_lead + node.leading_margin(cross_axis, ctx.available_inner_width);
                        self.set_position_at(child, leading_edge, position);
                    }
                    Align::FlexEnd => {
                        let position = current_lead + line_height
                            - node.trailing_margin(cross_axis, ctx.available_inner_width)
                            - node.measured(cross_dimension).unwrap_or(0.0);
                        self.set_position_at(child, leading_edge, position);
                    }
                    Align::Center => {
                        let child_size = node.measured(cross_dimension).unwrap_or(0.0);
                        self.set_position_at(child, leading_edge, current_lead + (line_height - child_size) / 2.0);
                    }
                    Align::Stretch => {
                        let position = current_lead + node.leading_margin(cross_axis, ctx.available_inner_width);
                        self.set_position_at(child, leading_edge, position);

                        // Relayout at the line's size instead of the container's.
                        let node = &self.nodes[child];
                        if !node.is_style_dim_defined(cross_axis, ctx.available_inner_cross_dim) {
                            let measured_width = node.measured(Dimension::Width);
                            let measured_height = node.measured(Dimension::Height);
                            let margin_main = node.margin_for_axis(ctx.main_axis, ctx.available_inner_width);
                            let (width, height) = if ctx.is_main_axis_row {
                                (measured_width.map(|w| w + margin_main), Some(line_height))
                            } else {
                                (Some(line_height), measured_height.map(|h| h + margin_main))
                            };
                            if !(floats_equal(width, measured_width) && floats_equal(height, measured_height)) {
                                let input = LayoutInput {
                                    available_width: width,
                                    available_height: height,
                                    width_mode: MeasureMode::Exactly,
                                    height_mode: MeasureMode::Exactly,
                                    parent_width: ctx.available_inner_width,
                                    parent_height: ctx.available_inner_height,
                                    parent_direction: ctx.direction,
                                    perform_layout: true,
                                };
                                self.layout_node_internal(child, &input, "multiline-stretch");
                            }
                        }
                    }
                    Align::Baseline => {
                        let position = current_lead + max_ascent - self.baseline(child)
                            + node.leading_position(FlexDirection::Column, ctx.available_inner_cross_dim);
                        self.set_position_at(child, Edge::Top, position);
                    }
                    Align::Auto | Align::SpaceBetween | Align::SpaceAround => {}
                }
            }

            current_lead += line_height;
        }
    }

    // =========================================================================
    // STEP 9-11: OWN SIZE AND TRAILING POSITIONS
    // =========================================================================

    fn set_final_dimensions(
        &mut self,
        id: NodeId,
        ctx: &FlexContext,
        input: &LayoutInput,
        max_line_main_dim: f32,
        total_line_cross_dim: f32,
    ) {
        let node = &mut self.nodes[id];
        let parent_width = input.parent_width;
        let margin_row = node.margin_for_axis(FlexDirection::Row, parent_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, parent_width);

        let mut width = node.bound_axis(
            FlexDirection::Row,
            input.available_width.map(|w| w - margin_row),
            parent_width,
            parent_width,
        );
        let mut height = node.bound_axis(
            FlexDirection::Column,
            input.available_height.map(|h| h - margin_column),
            input.parent_height,
            parent_width,
        );

        let scroll = node.style.overflow == Overflow::Scroll;
        let size_from_content = |mode: MeasureMode| {
            mode == MeasureMode::Undefined || (!scroll && mode == MeasureMode::AtMost)
        };
        let size_scrolled = |mode: MeasureMode| mode == MeasureMode::AtMost && scroll;

        let main_size = if size_from_content(ctx.measure_mode_main_dim) {
            Some(node.bound_axis(ctx.main_axis, Some(max_line_main_dim), ctx.main_axis_parent_size, parent_width))
        } else if size_scrolled(ctx.measure_mode_main_dim) {
            let padding_and_border = ctx.padding_and_border_axis_main;
            let content =
                node.bound_axis_within_min_and_max(ctx.main_axis, Some(max_line_main_dim), ctx.main_axis_parent_size);
            Some(
                ctx.available_inner_main_dim
                    .map(|available| available + padding_and_border)
                    .maybe_min(content)
                    .maybe_max(Some(padding_and_border))
                    .unwrap_or(padding_and_border),
            )
        } else {
            None
        };

        let cross_content = total_line_cross_dim + ctx.padding_and_border_axis_cross;
        let cross_size = if size_from_content(ctx.measure_mode_cross_dim) {
            Some(node.bound_axis(ctx.cross_axis, Some(cross_content), ctx.cross_axis_parent_size, parent_width))
        } else if size_scrolled(ctx.measure_mode_cross_dim) {
            let padding_and_border = ctx.padding_and_border_axis_cross;
            let content =
                node.bound_axis_within_min_and_max(ctx.cross_axis, Some(cross_content), ctx.cross_axis_parent_size);
            Some(
                ctx.available_inner_cross_dim
                    .map(|available| available + padding_and_border)
                    .maybe_min(content)
                    .maybe_max(Some(padding_and_border))
                    .unwrap_or(padding_and_border),
            )
        } else {
            None
        };

        let (main_target, cross_target) = if ctx.is_main_axis_row {
            (&mut width, &mut height)
        } else {
            (&mut height, &mut width)
        };
        if let Some(size) = main_size {
            *main_target = size;
        }
        if let Some(size) = cross_size {
            *cross_target = size;
        }

        node.layout.measured_dimensions.width = Some(width);
        node.layout.measured_dimensions.height = Some(height);
    }

    /// Mirror a child's leading offset into its trailing slot along `axis`.
    fn set_child_trailing_position(&mut self, id: NodeId, child: NodeId, axis: FlexDirection) {
        let dimension = axis.dimension();
        let size = self.measured(child, dimension);
        let position = self.measured(id, dimension) - size - self.position_at(child, axis.leading_edge());
        self.set_position_at(child, axis.trailing_edge(), position);
    }
}
