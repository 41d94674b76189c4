//! Layout entry point and the cache-aware recursion step.
//!
//! `compute_layout` sizes the root from its style and the available space,
//! runs the recursion, and writes output geometry when anything changed.
//! Every node visit goes through [`LayoutTree::layout_node_internal`], which
//! answers from the measurement cache when it can.

use log::{debug, log_enabled, trace, Level};

use crate::engine::{LayoutTree, NodeId};
use crate::error::Result;
use crate::types::{Dimension, Direction, Edge, FlexDirection, MeasureMode};
use crate::utils::finite;

use super::cache::MeasureRequest;

/// Everything one node visit is given by its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct LayoutInput {
    /// Outer size offered to the node (margins included).
    pub available_width: Option<f32>,
    pub available_height: Option<f32>,
    pub width_mode: MeasureMode,
    pub height_mode: MeasureMode,
    /// Reference sizes for percentages.
    pub parent_width: Option<f32>,
    pub parent_height: Option<f32>,
    pub parent_direction: Direction,
    /// Position children too, instead of only measuring.
    pub perform_layout: bool,
}

impl LayoutInput {
    pub(crate) fn request(&self) -> MeasureRequest {
        MeasureRequest {
            available_width: self.available_width,
            width_mode: self.width_mode,
            available_height: self.available_height,
            height_mode: self.height_mode,
            parent_width: self.parent_width,
            parent_height: self.parent_height,
        }
    }
}

/// Clamp degenerate root input: NaN and infinities are unknown, negatives are 0.
fn sanitize_available(value: Option<f32>) -> Option<f32> {
    value.and_then(finite).map(|v| v.max(0.0))
}

impl LayoutTree {
    /// Lay out the tree under `root` within the given space.
    ///
    /// `None` leaves an axis unconstrained. Calling again on an unchanged
    /// tree with the same arguments is a cache hit that changes nothing.
    pub fn compute_layout(
        &mut self,
        root: NodeId,
        available_width: Option<f32>,
        available_height: Option<f32>,
        direction: Direction,
    ) -> Result<()> {
        self.check_reachable(root)?;
        let parent_width = sanitize_available(available_width);
        let parent_height = sanitize_available(available_height);

        self.generation = self.generation.wrapping_add(1);
        self.nodes[root].resolve_dimension();

        let node = &self.nodes[root];
        let root_size = |axis: FlexDirection, parent_size: Option<f32>| -> (Option<f32>, MeasureMode) {
            let dimension = axis.dimension();
            if node.is_style_dim_defined(axis, parent_size) {
                let size = node
                    .resolved_dimension(dimension)
                    .resolve(parent_size)
                    .map(|size| size + node.margin_for_axis(axis, parent_width));
                (size, MeasureMode::Exactly)
            } else if let Some(max) = node.style.max(dimension).resolve(parent_size) {
                (Some(max), MeasureMode::AtMost)
            } else {
                let mode = if parent_size.is_some() { MeasureMode::Exactly } else { MeasureMode::Undefined };
                (parent_size, mode)
            }
        };
        let (width, width_mode) = root_size(FlexDirection::Row, parent_width);
        let (height, height_mode) = root_size(FlexDirection::Column, parent_height);

        let input = LayoutInput {
            available_width: width,
            available_height: height,
            width_mode,
            height_mode,
            parent_width,
            parent_height,
            parent_direction: direction,
            perform_layout: true,
        };

        if self.layout_node_internal(root, &input, "initial") {
            let main_axis = self.nodes[root].style.flex_direction.resolve(Direction::Ltr);
            let cross_axis = main_axis.cross(Direction::Ltr);
            let (main_size, cross_size) = if main_axis.is_row() {
                (parent_width, parent_height)
            } else {
                (parent_height, parent_width)
            };
            self.seed_position(root, main_axis, cross_axis, main_size, cross_size, parent_width);
            self.round_to_pixel_grid(root);
            if log_enabled!(Level::Debug) {
                debug!("layout of {root:?}:\n{}", self.print_tree(root, super::PrintOptions::all())?);
            }
        }
        Ok(())
    }

    /// Every handle reachable from `root` must be live.
    fn check_reachable(&self, root: NodeId) -> Result<()> {
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            stack.extend(self.node(id)?.children.iter().copied());
        }
        Ok(())
    }

    /// Visit one node, reusing a cached result when the request allows it.
    ///
    /// Returns whether the node's layout was recomputed.
    pub(crate) fn layout_node_internal(&mut self, id: NodeId, input: &LayoutInput, reason: &'static str) -> bool {
        let generation = self.generation;
        let request = input.request();
        let node = &mut self.nodes[id];

        let need_to_visit = (node.is_dirty && node.layout.generation_count != generation)
            || node.layout.last_parent_direction != Some(input.parent_direction);
        if need_to_visit {
            node.layout.invalidate_cache();
        }

        let margins = (
            node.margin_for_axis(FlexDirection::Row, input.parent_width),
            node.margin_for_axis(FlexDirection::Column, input.parent_width),
        );
        let cached = node.layout.find_cached(
            &request,
            node.measure.is_some(),
            input.perform_layout,
            margins,
            &node.config,
        );

        let recomputed = match cached {
            Some(entry) if !need_to_visit => {
                node.layout.measured_dimensions.width = entry.computed_width;
                node.layout.measured_dimensions.height = entry.computed_height;
                trace!("{reason} {id:?}: cached {:?}x{:?}", entry.computed_width, entry.computed_height);
                false
            }
            _ => {
                trace!(
                    "{reason} {id:?}: wm={} w={:?} hm={} h={:?} layout={}",
                    input.width_mode,
                    input.available_width,
                    input.height_mode,
                    input.available_height,
                    input.perform_layout
                );
                self.layout_impl(id, input);

                let node = &mut self.nodes[id];
                node.layout.last_parent_direction = Some(input.parent_direction);
                if cached.is_none() {
                    node.layout.store_cached(request, input.perform_layout);
                }
                true
            }
        };

        let node = &mut self.nodes[id];
        if input.perform_layout {
            if recomputed || node.layout.dimensions != node.layout.measured_dimensions {
                node.has_new_layout = true;
            }
            node.layout.dimensions = node.layout.measured_dimensions;
            node.is_dirty = false;
        }
        node.layout.generation_count = generation;
        recomputed
    }

    /// Effective direction of a node laid out under `parent_direction`.
    pub(crate) fn resolve_direction(&self, id: NodeId, parent_direction: Direction) -> Direction {
        match self.nodes[id].style.direction {
            Direction::Inherit if parent_direction != Direction::Inherit => parent_direction,
            Direction::Inherit => Direction::Ltr,
            direction => direction,
        }
    }

    /// Seed a node's position with its margins and relative offsets along
    /// the parent's axes.
    pub(crate) fn seed_position(
        &mut self,
        id: NodeId,
        main_axis: FlexDirection,
        cross_axis: FlexDirection,
        main_size: Option<f32>,
        cross_size: Option<f32>,
        parent_width: Option<f32>,
    ) {
        let node = &mut self.nodes[id];
        let relative_main = node.relative_position(main_axis, main_size);
        let relative_cross = node.relative_position(cross_axis, cross_size);

        let leading_main = node.leading_margin(main_axis, parent_width) + relative_main;
        let trailing_main = node.trailing_margin(main_axis, parent_width) + relative_main;
        let leading_cross = node.leading_margin(cross_axis, parent_width) + relative_cross;
        let trailing_cross = node.trailing_margin(cross_axis, parent_width) + relative_cross;

        let position = &mut node.layout.position;
        position[main_axis.leading_edge().index()] = leading_main;
        position[main_axis.trailing_edge().index()] = trailing_main;
        position[cross_axis.leading_edge().index()] = leading_cross;
        position[cross_axis.trailing_edge().index()] = trailing_cross;
    }

    /// Measured size along `dimension`, 0 when never measured.
    #[inline]
    pub(crate) fn measured(&self, id: NodeId, dimension: Dimension) -> f32 {
        self.nodes[id].measured(dimension).unwrap_or(0.0)
    }

    /// Position stored for `edge`.
    #[inline]
    pub(crate) fn position_at(&self, id: NodeId, edge: Edge) -> f32 {
        self.nodes[id].layout.position[edge.index()]
    }

    #[inline]
    pub(crate) fn set_position_at(&mut self, id: NodeId, edge: Edge, value: f32) {
        self.nodes[id].layout.position[edge.index()] = value;
    }
}
