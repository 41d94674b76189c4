//! Debug dump of a laid-out tree as nested `<div>` elements.
//!
//! ```text
//! <div layout="width: 100; height: 50; top: 0; left: 0;" style="flex-direction: row; width: 100px; " >
//!   <div layout="width: 50; height: 50; top: 0; left: 0;" style="flex-grow: 1; " ></div>
//! </div>
//! ```
//!
//! Only style properties that differ from the node's config defaults are
//! listed.

use bitflags::bitflags;

use crate::engine::{Edges, LayoutTree, Node, NodeId, Style};
use crate::error::Result;
use crate::types::Value;

bitflags! {
    /// What [`LayoutTree::print_tree`] includes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PrintOptions: u8 {
        /// Output geometry.
        const LAYOUT = 1 << 0;
        /// Non-default style properties.
        const STYLE = 1 << 1;
        /// Descend into children.
        const CHILDREN = 1 << 2;
    }
}

fn format_value(value: Value) -> String {
    match value {
        Value::Undefined => "undefined".to_owned(),
        Value::Point(v) => format!("{v}px"),
        Value::Percent(v) => format!("{v}%"),
        Value::Auto => "auto".to_owned(),
    }
}

fn push_value(out: &mut String, name: &str, value: Value, default: Value) {
    if value != default {
        out.push_str(&format!("{name}: {}; ", format_value(value)));
    }
}

fn push_number(out: &mut String, name: &str, value: Option<f32>) {
    if let Some(value) = value {
        out.push_str(&format!("{name}: {value}; "));
    }
}

fn push_edges(out: &mut String, prefix: &str, edges: &Edges) {
    for (edge, value) in edges.defined() {
        let name = if prefix.is_empty() {
            edge.as_str().to_owned()
        } else {
            format!("{prefix}-{edge}")
        };
        out.push_str(&format!("{name}: {}; ", format_value(value)));
    }
}

fn push_style(out: &mut String, node: &Node) {
    let style = &node.style;
    let default = Style::for_config(&node.config);

    macro_rules! enum_property {
        ($name:literal, $field:ident) => {
            if style.$field != default.$field {
                out.push_str(&format!(concat!($name, ": {}; "), style.$field));
            }
        };
    }

    enum_property!("direction", direction);
    enum_property!("flex-direction", flex_direction);
    enum_property!("justify-content", justify_content);
    enum_property!("align-items", align_items);
    enum_property!("align-content", align_content);
    enum_property!("align-self", align_self);
    push_number(out, "flex", style.flex);
    push_number(out, "flex-grow", style.flex_grow);
    push_number(out, "flex-shrink", style.flex_shrink);
    push_value(out, "flex-basis", style.flex_basis, default.flex_basis);
    enum_property!("flex-wrap", flex_wrap);
    enum_property!("overflow", overflow);
    enum_property!("display", display);
    enum_property!("position", position_type);
    push_edges(out, "margin", &style.margin);
    push_edges(out, "padding", &style.padding);
    push_edges(out, "border", &style.border);
    push_edges(out, "", &style.position);
    push_value(out, "width", style.dimensions.width, default.dimensions.width);
    push_value(out, "height", style.dimensions.height, default.dimensions.height);
    push_value(out, "min-width", style.min_dimensions.width, default.min_dimensions.width);
    push_value(out, "min-height", style.min_dimensions.height, default.min_dimensions.height);
    push_value(out, "max-width", style.max_dimensions.width, default.max_dimensions.width);
    push_value(out, "max-height", style.max_dimensions.height, default.max_dimensions.height);
    push_number(out, "aspect-ratio", style.aspect_ratio);
}

impl LayoutTree {
    /// Render the subtree under `root` for debugging.
    pub fn print_tree(&self, root: NodeId, options: PrintOptions) -> Result<String> {
        self.node(root)?;
        let mut out = String::new();
        self.print_node(root, options, 0, &mut out);
        Ok(out)
    }

    fn print_node(&self, id: NodeId, options: PrintOptions, level: usize, out: &mut String) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };
        let indent = "  ".repeat(level);
        out.push_str(&indent);
        out.push_str("<div ");

        if options.contains(PrintOptions::LAYOUT) {
            let layout = &node.layout;
            out.push_str(&format!(
                "layout=\"width: {}; height: {}; top: {}; left: {};\" ",
                layout.width().unwrap_or(0.0),
                layout.height().unwrap_or(0.0),
                layout.top(),
                layout.left(),
            ));
        }

        if options.contains(PrintOptions::STYLE) {
            out.push_str("style=\"");
            push_style(out, node);
            out.push_str("\" ");
            if node.measure.is_some() {
                out.push_str("has-custom-measure=\"true\" ");
            }
        }
        out.push('>');
        if let Some(print) = &node.print {
            out.push_str(&print(id));
        }

        if options.contains(PrintOptions::CHILDREN) && !node.children.is_empty() {
            for &child in node.children.iter() {
                out.push('\n');
                self.print_node(child, options, level + 1, out);
            }
            out.push('\n');
            out.push_str(&indent);
        }
        out.push_str("</div>");
    }
}
