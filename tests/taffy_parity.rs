//! Parity with taffy on layouts where both engines follow the CSS rules.
//!
//! Each case is built twice from one description and every node's rounded
//! frame is compared.

use taffy::prelude as tf;
use titan_layout::{Direction, Edge, FlexDirection, Justify, LayoutTree, NodeId, Value, Wrap};

#[derive(Clone, Copy, Default)]
struct Item {
    width: Option<f32>,
    height: Option<f32>,
    width_percent: Option<f32>,
    height_percent: Option<f32>,
    grow: f32,
    margin: f32,
}

#[derive(Clone, Copy)]
struct Container {
    row: bool,
    width: f32,
    height: f32,
    padding: f32,
    wrap: bool,
    justify: Justify,
}

impl Default for Container {
    fn default() -> Self {
        Self {
            row: true,
            width: 100.0,
            height: 100.0,
            padding: 0.0,
            wrap: false,
            justify: Justify::FlexStart,
        }
    }
}

fn build_ours(container: Container, items: &[Item]) -> (LayoutTree, Vec<NodeId>) {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let direction = if container.row { FlexDirection::Row } else { FlexDirection::Column };
    tree.set_flex_direction(root, direction).unwrap();
    tree.set_width(root, Value::Point(container.width)).unwrap();
    tree.set_height(root, Value::Point(container.height)).unwrap();
    tree.set_padding(root, Edge::All, Value::Point(container.padding)).unwrap();
    tree.set_justify_content(root, container.justify).unwrap();
    if container.wrap {
        tree.set_flex_wrap(root, Wrap::Wrap).unwrap();
    }

    let mut nodes = vec![root];
    for item in items {
        let node = tree.new_node();
        if let Some(width) = item.width {
            tree.set_width(node, Value::Point(width)).unwrap();
        }
        if let Some(height) = item.height {
            tree.set_height(node, Value::Point(height)).unwrap();
        }
        if let Some(fraction) = item.width_percent {
            tree.set_width(node, Value::Percent(fraction * 100.0)).unwrap();
        }
        if let Some(fraction) = item.height_percent {
            tree.set_height(node, Value::Percent(fraction * 100.0)).unwrap();
        }
        tree.set_flex_grow(node, Some(item.grow)).unwrap();
        tree.set_margin(node, Edge::All, Value::Point(item.margin)).unwrap();
        tree.add_child(root, node).unwrap();
        nodes.push(node);
    }

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();
    (tree, nodes)
}

fn build_taffy(container: Container, items: &[Item]) -> (tf::TaffyTree<()>, Vec<tf::NodeId>) {
    let mut tree: tf::TaffyTree<()> = tf::TaffyTree::new();

    let mut children = Vec::new();
    for item in items {
        let dimension = |points: Option<f32>, fraction: Option<f32>| -> tf::Dimension {
            match (points, fraction) {
                (Some(points), _) => tf::length(points),
                (None, Some(fraction)) => tf::percent(fraction),
                (None, None) => tf::auto(),
            }
        };
        let style = tf::Style {
            size: tf::Size {
                width: dimension(item.width, item.width_percent),
                height: dimension(item.height, item.height_percent),
            },
            flex_grow: item.grow,
            flex_shrink: 0.0,
            margin: tf::Rect {
                left: tf::length(item.margin),
                right: tf::length(item.margin),
                top: tf::length(item.margin),
                bottom: tf::length(item.margin),
            },
            ..Default::default()
        };
        children.push(tree.new_leaf(style).unwrap());
    }

    let justify = match container.justify {
        Justify::FlexStart => tf::JustifyContent::FlexStart,
        Justify::Center => tf::JustifyContent::Center,
        Justify::FlexEnd => tf::JustifyContent::FlexEnd,
        Justify::SpaceBetween => tf::JustifyContent::SpaceBetween,
        Justify::SpaceAround => tf::JustifyContent::SpaceAround,
        Justify::SpaceEvenly => tf::JustifyContent::SpaceEvenly,
    };
    let style = tf::Style {
        flex_direction: if container.row {
            tf::FlexDirection::Row
        } else {
            tf::FlexDirection::Column
        },
        flex_wrap: if container.wrap { tf::FlexWrap::Wrap } else { tf::FlexWrap::NoWrap },
        justify_content: Some(justify),
        align_content: Some(tf::AlignContent::FlexStart),
        size: tf::Size {
            width: tf::length(container.width),
            height: tf::length(container.height),
        },
        padding: tf::Rect {
            left: tf::length(container.padding),
            right: tf::length(container.padding),
            top: tf::length(container.padding),
            bottom: tf::length(container.padding),
        },
        ..Default::default()
    };
    let root = tree.new_with_children(style, &children).unwrap();
    let available = tf::Size {
        width: tf::AvailableSpace::MaxContent,
        height: tf::AvailableSpace::MaxContent,
    };
    tree.compute_layout(root, available).unwrap();

    let mut nodes = vec![root];
    nodes.extend(children);
    (tree, nodes)
}

fn assert_parity(container: Container, items: &[Item]) {
    let (ours, our_nodes) = build_ours(container, items);
    let (theirs, their_nodes) = build_taffy(container, items);

    for (index, (&our_node, &their_node)) in our_nodes.iter().zip(&their_nodes).enumerate() {
        let our = ours.layout(our_node).unwrap();
        let their = theirs.layout(their_node).unwrap();
        let our_frame = (our.left(), our.top(), our.width().unwrap(), our.height().unwrap());
        let their_frame = (their.location.x, their.location.y, their.size.width, their.size.height);
        assert_eq!(our_frame, their_frame, "node {index} differs");
    }
}

#[test]
fn test_parity_grow_ratios() {
    let items = [1.0, 1.0, 2.0].map(|grow| Item { grow, ..Item::default() });
    assert_parity(
        Container {
            width: 400.0,
            ..Container::default()
        },
        &items,
    );
}

#[test]
fn test_parity_column_with_padding() {
    let items = [
        Item {
            height: Some(50.0),
            ..Item::default()
        },
        Item {
            grow: 1.0,
            ..Item::default()
        },
    ];
    assert_parity(
        Container {
            row: false,
            width: 200.0,
            height: 300.0,
            padding: 10.0,
            ..Container::default()
        },
        &items,
    );
}

#[test]
fn test_parity_wrap() {
    let item = Item {
        width: Some(40.0),
        height: Some(20.0),
        ..Item::default()
    };
    assert_parity(
        Container {
            wrap: true,
            ..Container::default()
        },
        &[item; 3],
    );
}

#[test]
fn test_parity_justify() {
    let item = Item {
        width: Some(20.0),
        height: Some(20.0),
        ..Item::default()
    };
    for justify in [Justify::Center, Justify::FlexEnd, Justify::SpaceBetween, Justify::SpaceAround, Justify::SpaceEvenly] {
        assert_parity(
            Container {
                justify,
                ..Container::default()
            },
            &[item; 3],
        );
    }
}

#[test]
fn test_parity_percent_sizes() {
    let items = [Item {
        width_percent: Some(0.5),
        height_percent: Some(0.25),
        ..Item::default()
    }];
    assert_parity(
        Container {
            width: 200.0,
            height: 100.0,
            ..Container::default()
        },
        &items,
    );
}

#[test]
fn test_parity_margins() {
    let item = Item {
        width: Some(20.0),
        height: Some(20.0),
        margin: 5.0,
        ..Item::default()
    };
    assert_parity(Container::default(), &[item; 2]);
}
