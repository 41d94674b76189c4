//! Style properties - Per-property setters and getters on the tree.
//!
//! Every setter follows the same contract:
//!
//! 1. NaN and infinite payloads are stored as undefined
//! 2. Setting the current value is a no-op and leaves the dirty flag alone
//! 3. Any real change dirties the node and its ancestors

use crate::error::Result;
use crate::types::{
    Align, Direction, Display, Edge, FlexDirection, Justify, Overflow, PositionType, Value, Wrap,
};
use crate::utils::finite;

use super::{LayoutTree, NodeId, Style};

/// Normalisation applied to a value before it is stored.
trait Sanitize {
    fn sanitize(self) -> Self;
}

impl Sanitize for Value {
    fn sanitize(self) -> Self {
        self.sanitized()
    }
}

impl Sanitize for Option<f32> {
    fn sanitize(self) -> Self {
        self.and_then(finite)
    }
}

macro_rules! plain_sanitize {
    ($($ty:ty),+) => {
        $( impl Sanitize for $ty {
            #[inline]
            fn sanitize(self) -> Self {
                self
            }
        } )+
    };
}

plain_sanitize!(Direction, FlexDirection, Justify, Align, Wrap, Overflow, PositionType, Display);

/// Generates a setter/getter pair per style field.
macro_rules! style_properties {
    ($( $(#[$meta:meta])* $getter:ident, $setter:ident: $ty:ty => $($field:ident).+; )+) => {
        impl LayoutTree {
            $(
                $(#[$meta])*
                pub fn $setter(&mut self, node: NodeId, value: $ty) -> Result<()> {
                    let value = value.sanitize();
                    self.update_style(node, |style| {
                        if style.$($field).+ == value {
                            false
                        } else {
                            style.$($field).+ = value;
                            true
                        }
                    })
                }

                $(#[$meta])*
                pub fn $getter(&self, node: NodeId) -> Result<$ty> {
                    Ok(self.node(node)?.style.$($field).+)
                }
            )+
        }
    };
}

style_properties! {
    /// Layout direction; `Inherit` takes the parent's.
    direction, set_direction: Direction => direction;
    flex_direction, set_flex_direction: FlexDirection => flex_direction;
    justify_content, set_justify_content: Justify => justify_content;
    /// Distribution of lines in a multi-line container.
    align_content, set_align_content: Align => align_content;
    align_items, set_align_items: Align => align_items;
    /// Overrides the parent's `align_items` unless `Auto`.
    align_self, set_align_self: Align => align_self;
    position_type, set_position_type: PositionType => position_type;
    flex_wrap, set_flex_wrap: Wrap => flex_wrap;
    overflow, set_overflow: Overflow => overflow;
    display, set_display: Display => display;
    /// `flex` shorthand.
    flex, set_flex: Option<f32> => flex;
    flex_grow, set_flex_grow: Option<f32> => flex_grow;
    flex_shrink, set_flex_shrink: Option<f32> => flex_shrink;
    flex_basis, set_flex_basis: Value => flex_basis;
    width, set_width: Value => dimensions.width;
    height, set_height: Value => dimensions.height;
    min_width, set_min_width: Value => min_dimensions.width;
    min_height, set_min_height: Value => min_dimensions.height;
    max_width, set_max_width: Value => max_dimensions.width;
    max_height, set_max_height: Value => max_dimensions.height;
    /// Width over height.
    aspect_ratio, set_aspect_ratio: Option<f32> => aspect_ratio;
}

impl LayoutTree {
    /// Apply `update` to a node's style; dirty the node if it reports a change.
    fn update_style(&mut self, node: NodeId, update: impl FnOnce(&mut Style) -> bool) -> Result<()> {
        if update(&mut self.node_mut(node)?.style) {
            self.mark_dirty_and_propagate(node);
        }
        Ok(())
    }

    pub fn style(&self, node: NodeId) -> Result<&Style> {
        Ok(&self.node(node)?.style)
    }

    /// Replace a node's whole style. Dirties only when something differs.
    pub fn set_style(&mut self, node: NodeId, style: Style) -> Result<()> {
        self.update_style(node, |current| {
            if *current == style {
                false
            } else {
                *current = style;
                true
            }
        })
    }

    /// Copy `source`'s style onto `target`.
    pub fn copy_style(&mut self, target: NodeId, source: NodeId) -> Result<()> {
        let style = *self.style(source)?;
        self.set_style(target, style)
    }

    // =========================================================================
    // EDGES
    // =========================================================================

    pub fn set_margin(&mut self, node: NodeId, edge: Edge, value: Value) -> Result<()> {
        let value = value.sanitize();
        self.update_style(node, |style| style.margin.set(edge, value))
    }

    pub fn margin(&self, node: NodeId, edge: Edge) -> Result<Value> {
        Ok(self.node(node)?.style.margin.get(edge))
    }

    /// Auto-size offsets are not meaningful; `Auto` is stored as undefined.
    pub fn set_position(&mut self, node: NodeId, edge: Edge, value: Value) -> Result<()> {
        let value = match value.sanitize() {
            Value::Auto => Value::Undefined,
            other => other,
        };
        self.update_style(node, |style| style.position.set(edge, value))
    }

    pub fn position(&self, node: NodeId, edge: Edge) -> Result<Value> {
        Ok(self.node(node)?.style.position.get(edge))
    }

    pub fn set_padding(&mut self, node: NodeId, edge: Edge, value: Value) -> Result<()> {
        let value = match value.sanitize() {
            Value::Auto => Value::Undefined,
            other => other,
        };
        self.update_style(node, |style| style.padding.set(edge, value))
    }

    pub fn padding(&self, node: NodeId, edge: Edge) -> Result<Value> {
        Ok(self.node(node)?.style.padding.get(edge))
    }

    /// Border widths are points; NaN or infinity clears the edge.
    pub fn set_border(&mut self, node: NodeId, edge: Edge, width: f32) -> Result<()> {
        let value = Value::from(width);
        self.update_style(node, |style| style.border.set(edge, value))
    }

    pub fn border(&self, node: NodeId, edge: Edge) -> Result<Option<f32>> {
        Ok(match self.node(node)?.style.border.get(edge) {
            Value::Point(width) => Some(width),
            _ => None,
        })
    }
}
