//! Pixel-grid rounding of computed geometry.
//!
//! Edges are snapped in absolute coordinates and sizes are derived from the
//! snapped edges, so siblings that touch before rounding still touch after.
//! The unrounded geometry is left in place for the next layout pass.

use crate::engine::{LayoutTree, NodeId};
use crate::types::{Edge, NodeType, Size};
use crate::utils::approx_eq;

/// Snap `value` to the grid of `1 / point_scale_factor`.
///
/// Values already on the grid (within tolerance) are kept; otherwise
/// `force_ceil` / `force_floor` pick a direction and plain rounding applies
/// when neither is set.
pub fn round_value_to_pixel_grid(value: f32, point_scale_factor: f32, force_ceil: bool, force_floor: bool) -> f32 {
    let scaled = value * point_scale_factor;
    if !scaled.is_finite() {
        return value;
    }
    let fraction = scaled - scaled.floor();
    let snapped = if approx_eq(fraction, 0.0) {
        scaled - fraction
    } else if approx_eq(fraction, 1.0) {
        scaled - fraction + 1.0
    } else if force_ceil {
        scaled - fraction + 1.0
    } else if force_floor {
        scaled - fraction
    } else {
        scaled - fraction + if fraction >= 0.5 || approx_eq(fraction, 0.5) { 1.0 } else { 0.0 }
    };
    snapped / point_scale_factor
}

/// Whether `size` falls between two grid lines.
fn has_fraction(size: f32, point_scale_factor: f32) -> bool {
    let scaled = size * point_scale_factor;
    let fraction = scaled - scaled.floor();
    !approx_eq(fraction, 0.0) && !approx_eq(fraction, 1.0)
}

impl LayoutTree {
    /// Write the output geometry of `root`'s subtree.
    ///
    /// With a zero scale factor the unrounded geometry is copied as is. A node
    /// whose output moved or resized is flagged with `has_new_layout`.
    pub(crate) fn round_to_pixel_grid(&mut self, root: NodeId) {
        let scale = self.nodes[root].config.point_scale_factor;
        let mut stack = vec![(root, 0.0_f32, 0.0_f32)];

        while let Some((id, parent_left, parent_top)) = stack.pop() {
            let node = &mut self.nodes[id];
            let layout = &mut node.layout;
            let left = layout.position[Edge::Left.index()];
            let top = layout.position[Edge::Top.index()];
            let previous = (layout.final_position, layout.final_dimensions);

            if scale == 0.0 {
                layout.final_position = layout.position;
                layout.final_dimensions = layout.dimensions;
            } else {
                let width = layout.dimensions.width.unwrap_or(0.0);
                let height = layout.dimensions.height.unwrap_or(0.0);
                let absolute_left = parent_left + left;
                let absolute_top = parent_top + top;
                let absolute_right = absolute_left + width;
                let absolute_bottom = absolute_top + height;

                // Measured text is never rounded down, which would truncate it.
                let text = node.node_type == NodeType::Text;
                let fractional_width = has_fraction(width, scale);
                let fractional_height = has_fraction(height, scale);

                let mut position = layout.position;
                position[Edge::Left.index()] = round_value_to_pixel_grid(left, scale, false, text);
                position[Edge::Top.index()] = round_value_to_pixel_grid(top, scale, false, text);
                layout.final_position = position;

                layout.final_dimensions = Size::new(
                    Some(
                        round_value_to_pixel_grid(absolute_right, scale, text && fractional_width, text && !fractional_width)
                            - round_value_to_pixel_grid(absolute_left, scale, false, text),
                    ),
                    Some(
                        round_value_to_pixel_grid(absolute_bottom, scale, text && fractional_height, text && !fractional_height)
                            - round_value_to_pixel_grid(absolute_top, scale, false, text),
                    ),
                );
            }
            if (layout.final_position, layout.final_dimensions) != previous {
                node.has_new_layout = true;
            }

            let absolute_left = parent_left + left;
            let absolute_top = parent_top + top;
            for &child in node.children.iter().rev() {
                stack.push((child, absolute_left, absolute_top));
            }
        }
    }
}
