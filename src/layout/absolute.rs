//! Absolutely positioned children.
//!
//! An absolute child is sized from its own style, or from opposing offsets
//! inside its parent's border box, and measured only for the axes that
//! remain unknown. It is then placed by its offsets, or by the parent's
//! justify and align values when an axis has no leading offset.

use crate::engine::{LayoutTree, NodeId};
use crate::types::{Align, Dimension, Direction, FlexDirection, Justify, MeasureMode, Wrap};

use super::compute::LayoutInput;

impl LayoutTree {
    /// Size `child` of `id` and place it along both axes.
    ///
    /// `width` and `height` are the parent's inner sizes; `width_mode` is the
    /// mode the parent itself was measured with horizontally.
    pub(crate) fn layout_absolute_child(
        &mut self,
        id: NodeId,
        child: NodeId,
        width: Option<f32>,
        width_mode: MeasureMode,
        height: Option<f32>,
        direction: Direction,
    ) {
        let parent = &self.nodes[id];
        let main_axis = parent.style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_axis_row = main_axis.is_row();
        let parent_width = parent.measured(Dimension::Width).unwrap_or(0.0);
        let parent_height = parent.measured(Dimension::Height).unwrap_or(0.0);
        let border_row = parent.leading_border(FlexDirection::Row) + parent.trailing_border(FlexDirection::Row);
        let border_column = parent.leading_border(FlexDirection::Column) + parent.trailing_border(FlexDirection::Column);

        let node = &self.nodes[child];
        let margin_row = node.margin_for_axis(FlexDirection::Row, width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, width);

        let mut child_width = if node.is_style_dim_defined(FlexDirection::Row, width) {
            node.resolved_dimension(Dimension::Width).resolve(width).map(|w| w + margin_row)
        } else if node.is_leading_pos_defined(FlexDirection::Row) && node.is_trailing_pos_defined(FlexDirection::Row) {
            let offsets = node.leading_position(FlexDirection::Row, width) + node.trailing_position(FlexDirection::Row, width);
            Some(node.bound_axis(FlexDirection::Row, Some(parent_width - border_row - offsets), width, width))
        } else {
            None
        };

        let mut child_height = if node.is_style_dim_defined(FlexDirection::Column, height) {
            node.resolved_dimension(Dimension::Height).resolve(height).map(|h| h + margin_column)
        } else if node.is_leading_pos_defined(FlexDirection::Column) && node.is_trailing_pos_defined(FlexDirection::Column) {
            let offsets =
                node.leading_position(FlexDirection::Column, height) + node.trailing_position(FlexDirection::Column, height);
            Some(node.bound_axis(FlexDirection::Column, Some(parent_height - border_column - offsets), height, width))
        } else {
            None
        };

        // Aspect ratio fills in the other axis when exactly one is known.
        if let Some(ratio) = node.style.aspect_ratio {
            match (child_width, child_height) {
                (None, Some(h)) => child_width = Some(margin_row + (h - margin_column) * ratio),
                (Some(w), None) => child_height = Some(margin_column + (w - margin_row) / ratio),
                _ => {}
            }
        }

        if child_width.is_none() || child_height.is_none() {
            let mode = |size: Option<f32>| {
                if size.is_some() { MeasureMode::Exactly } else { MeasureMode::Undefined }
            };
            let mut child_width_mode = mode(child_width);
            let child_height_mode = mode(child_height);

            // Let content wrap at the parent's width, as browsers do.
            if !is_main_axis_row && child_width.is_none() && width_mode != MeasureMode::Undefined {
                if let Some(w) = width.filter(|&w| w > 0.0) {
                    child_width = Some(w);
                    child_width_mode = MeasureMode::AtMost;
                }
            }

            let input = LayoutInput {
                available_width: child_width,
                available_height: child_height,
                width_mode: child_width_mode,
                height_mode: child_height_mode,
                parent_width: child_width,
                parent_height: child_height,
                parent_direction: direction,
                perform_layout: false,
            };
            self.layout_node_internal(child, &input, "abs-measure");

            let node = &self.nodes[child];
            child_width = Some(node.measured(Dimension::Width).unwrap_or(0.0) + margin_row);
            child_height = Some(node.measured(Dimension::Height).unwrap_or(0.0) + margin_column);
        }

        let input = LayoutInput {
            available_width: child_width,
            available_height: child_height,
            width_mode: MeasureMode::Exactly,
            height_mode: MeasureMode::Exactly,
            parent_width: child_width,
            parent_height: child_height,
            parent_direction: direction,
            perform_layout: true,
        };
        self.layout_node_internal(child, &input, "abs-layout");

        let (main_size, cross_size) = if is_main_axis_row { (width, height) } else { (height, width) };
        let justify = self.nodes[id].style.justify_content;
        let align = self.align_item(id, child);
        let wrap_reverse = self.nodes[id].style.flex_wrap == Wrap::WrapReverse;

        self.place_absolute_child(id, child, main_axis, main_size, width, |free| match justify {
            Justify::Center => Some(free / 2.0),
            Justify::FlexEnd => Some(free),
            _ => None,
        });
        self.place_absolute_child(id, child, cross_axis, cross_size, width, |free| {
            if align == Align::Center {
                Some(free / 2.0)
            } else if (align == Align::FlexEnd) ^ wrap_reverse {
                Some(free)
            } else {
                None
            }
        });
    }

    /// Place an absolute child along one axis.
    ///
    /// A lone trailing offset pins the child to the trailing edge. Without a
    /// leading offset `aligned` maps the free space to a leading position, or
    /// keeps the flow position when it returns `None`.
    fn place_absolute_child(
        &mut self,
        id: NodeId,
        child: NodeId,
        axis: FlexDirection,
        axis_size: Option<f32>,
        width: Option<f32>,
        aligned: impl Fn(f32) -> Option<f32>,
    ) {
        let dimension = axis.dimension();
        let parent = &self.nodes[id];
        let node = &self.nodes[child];
        if node.is_leading_pos_defined(axis) {
            return;
        }

        let free = parent.measured(dimension).unwrap_or(0.0) - node.measured(dimension).unwrap_or(0.0);
        let position = if node.is_trailing_pos_defined(axis) {
            Some(
                free - parent.trailing_border(axis)
                    - node.trailing_margin(axis, width)
                    - node.trailing_position(axis, axis_size),
            )
        } else {
            aligned(free)
        };

        if let Some(position) = position {
            self.set_position_at(child, axis.leading_edge(), position);
        }
    }
}
