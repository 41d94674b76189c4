//! Leaf sizing - Nodes sized without running the flex algorithm.
//!
//! - measured leaves ask their measure function
//! - empty containers collapse to padding plus border
//! - exactly-sized or zero-bounded nodes take the given size

use log::warn;

use crate::engine::{LayoutTree, NodeId};
use crate::types::{FlexDirection, MeasureMode, Size};
use crate::utils::finite;

use super::compute::LayoutInput;

/// Sanitize one component of a measure function result.
fn measured_component(node: NodeId, axis: &str, value: f32) -> f32 {
    finite(value).unwrap_or_else(|| {
        warn!("measure function of {node:?} returned non-finite {axis} {value}; using 0");
        0.0
    })
}

impl LayoutTree {
    /// Size a leaf through its measure function.
    pub(crate) fn measure_leaf(&mut self, id: NodeId, input: &LayoutInput) {
        let node = &self.nodes[id];
        let Some(measure) = node.measure.clone() else {
            return;
        };

        let available_width = input.available_width;
        let available_height = input.available_height;
        let padding_and_border_row = node.padding_and_border_for_axis(FlexDirection::Row, available_width);
        let padding_and_border_column = node.padding_and_border_for_axis(FlexDirection::Column, available_width);
        let margin_row = node.margin_for_axis(FlexDirection::Row, available_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, available_width);

        // The measure function never sees a negative size.
        let inner_width = available_width.map(|w| (w - margin_row - padding_and_border_row).max(0.0));
        let inner_height = available_height.map(|h| (h - margin_column - padding_and_border_column).max(0.0));

        let (width, height) = if input.width_mode == MeasureMode::Exactly && input.height_mode == MeasureMode::Exactly {
            (
                available_width.map(|w| w - margin_row),
                available_height.map(|h| h - margin_column),
            )
        } else {
            let measured: Size<f32> = measure(id, inner_width, input.width_mode, inner_height, input.height_mode);
            let measured_width = measured_component(id, "width", measured.width);
            let measured_height = measured_component(id, "height", measured.height);
            (
                if input.width_mode == MeasureMode::Exactly {
                    available_width.map(|w| w - margin_row)
                } else {
                    Some(measured_width + padding_and_border_row)
                },
                if input.height_mode == MeasureMode::Exactly {
                    available_height.map(|h| h - margin_column)
                } else {
                    Some(measured_height + padding_and_border_column)
                },
            )
        };

        let node = &mut self.nodes[id];
        let bounded = Size::new(
            node.bound_axis(FlexDirection::Row, width, input.parent_width, input.parent_width),
            node.bound_axis(FlexDirection::Column, height, input.parent_height, input.parent_width),
        );
        node.layout.measured_dimensions = Size::new(Some(bounded.width), Some(bounded.height));
    }

    /// Size a container without children: padding and border unless exact.
    pub(crate) fn measure_empty_container(&mut self, id: NodeId, input: &LayoutInput) {
        let node = &mut self.nodes[id];
        let parent_width = input.parent_width;
        let margin_row = node.margin_for_axis(FlexDirection::Row, parent_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, parent_width);

        let width = match input.width_mode {
            MeasureMode::Exactly => input.available_width.map(|w| w - margin_row),
            _ => Some(node.padding_and_border_for_axis(FlexDirection::Row, parent_width)),
        };
        let height = match input.height_mode {
            MeasureMode::Exactly => input.available_height.map(|h| h - margin_column),
            _ => Some(node.padding_and_border_for_axis(FlexDirection::Column, parent_width)),
        };

        let width = node.bound_axis(FlexDirection::Row, width, parent_width, parent_width);
        let height = node.bound_axis(FlexDirection::Column, height, input.parent_height, parent_width);
        node.layout.measured_dimensions = Size::new(Some(width), Some(height));
    }

    /// Take the given size when measuring cannot change it.
    ///
    /// Applies when both axes are exact or either axis is bounded by zero.
    /// Returns whether the node was sized.
    pub(crate) fn measure_fixed_size(&mut self, id: NodeId, input: &LayoutInput) -> bool {
        let zero_bounded = |size: Option<f32>, mode: MeasureMode| {
            mode == MeasureMode::AtMost && size.is_some_and(|size| size <= 0.0)
        };
        let applies = zero_bounded(input.available_width, input.width_mode)
            || zero_bounded(input.available_height, input.height_mode)
            || (input.width_mode == MeasureMode::Exactly && input.height_mode == MeasureMode::Exactly);
        if !applies {
            return false;
        }

        let node = &mut self.nodes[id];
        let parent_width = input.parent_width;
        let margin_row = node.margin_for_axis(FlexDirection::Row, parent_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, parent_width);

        let given = |size: Option<f32>, mode: MeasureMode, margin: f32| match size {
            Some(size) if mode == MeasureMode::AtMost && size < 0.0 => 0.0,
            Some(size) => size - margin,
            None => 0.0,
        };
        let width = given(input.available_width, input.width_mode, margin_row);
        let height = given(input.available_height, input.height_mode, margin_column);

        let width = node.bound_axis(FlexDirection::Row, Some(width), parent_width, parent_width);
        let height = node.bound_axis(FlexDirection::Column, Some(height), input.parent_height, parent_width);
        node.layout.measured_dimensions = Size::new(Some(width), Some(height));
        true
    }
}
