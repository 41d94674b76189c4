//! End-to-end layout tests: build a tree, compute, read the rounded output.

use std::sync::Arc;

use titan_layout::{
    Align, Config, Direction, Display, Edge, FlexDirection, Justify, LayoutTree, MeasureMode, NodeId,
    NodeType, PositionType, Size, Value, Wrap,
};

fn frame(tree: &LayoutTree, node: NodeId) -> (f32, f32, f32, f32) {
    let layout = tree.layout(node).unwrap();
    (
        layout.left(),
        layout.top(),
        layout.width().unwrap(),
        layout.height().unwrap(),
    )
}

fn sized(tree: &mut LayoutTree, width: f32, height: f32) -> NodeId {
    let node = tree.new_node();
    tree.set_width(node, Value::Point(width)).unwrap();
    tree.set_height(node, Value::Point(height)).unwrap();
    node
}

fn row(tree: &mut LayoutTree, width: f32, height: f32, children: &[NodeId]) -> NodeId {
    let root = sized(tree, width, height);
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    for &child in children {
        tree.add_child(root, child).unwrap();
    }
    root
}

// =============================================================================
// FLEXIBLE LENGTHS
// =============================================================================

#[test]
fn test_grow_distributes_by_factor() {
    let mut tree = LayoutTree::new();
    let children: Vec<NodeId> = [1.0, 1.0, 2.0]
        .into_iter()
        .map(|grow| {
            let child = tree.new_node();
            tree.set_flex_grow(child, Some(grow)).unwrap();
            child
        })
        .collect();
    let root = row(&mut tree, 400.0, 100.0, &children);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, root), (0.0, 0.0, 400.0, 100.0));
    assert_eq!(frame(&tree, children[0]), (0.0, 0.0, 100.0, 100.0));
    assert_eq!(frame(&tree, children[1]), (100.0, 0.0, 100.0, 100.0));
    assert_eq!(frame(&tree, children[2]), (200.0, 0.0, 200.0, 100.0));
}

#[test]
fn test_max_size_freezes_item() {
    let mut tree = LayoutTree::new();
    let capped = tree.new_node();
    tree.set_flex_grow(capped, Some(1.0)).unwrap();
    tree.set_max_width(capped, Value::Point(30.0)).unwrap();
    let free = tree.new_node();
    tree.set_flex_grow(free, Some(1.0)).unwrap();
    let root = row(&mut tree, 100.0, 10.0, &[capped, free]);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, capped), (0.0, 0.0, 30.0, 10.0));
    assert_eq!(frame(&tree, free), (30.0, 0.0, 70.0, 10.0));
}

#[test]
fn test_shrink_scaled_by_basis() {
    let mut tree = LayoutTree::new();
    let small = sized(&mut tree, 50.0, 10.0);
    let large = sized(&mut tree, 150.0, 10.0);
    tree.set_flex_shrink(small, Some(1.0)).unwrap();
    tree.set_flex_shrink(large, Some(1.0)).unwrap();
    let root = row(&mut tree, 100.0, 10.0, &[small, large]);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    // 100 points of overflow split 1:3 by basis.
    assert_eq!(frame(&tree, small), (0.0, 0.0, 25.0, 10.0));
    assert_eq!(frame(&tree, large), (25.0, 0.0, 75.0, 10.0));
}

#[test]
fn test_padding_and_border_offset_children() {
    let mut tree = LayoutTree::new();
    let child = tree.new_node();
    tree.set_flex_grow(child, Some(1.0)).unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.set_padding(root, Edge::All, Value::Point(10.0)).unwrap();
    tree.set_border(root, Edge::All, 5.0).unwrap();
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, child), (15.0, 15.0, 70.0, 70.0));
}

// =============================================================================
// LINES
// =============================================================================

#[test]
fn test_wrap_breaks_lines() {
    let mut tree = LayoutTree::new();
    let children: Vec<NodeId> = (0..3).map(|_| sized(&mut tree, 40.0, 20.0)).collect();
    let root = row(&mut tree, 100.0, 100.0, &children);
    tree.set_flex_wrap(root, Wrap::Wrap).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, children[0]), (0.0, 0.0, 40.0, 20.0));
    assert_eq!(frame(&tree, children[1]), (40.0, 0.0, 40.0, 20.0));
    assert_eq!(frame(&tree, children[2]), (0.0, 20.0, 40.0, 20.0));
    assert_eq!(tree.line_index(children[1]).unwrap(), 0);
    assert_eq!(tree.line_index(children[2]).unwrap(), 1);
}

#[test]
fn test_wrap_reverse_flips_lines() {
    let mut tree = LayoutTree::new();
    let children: Vec<NodeId> = (0..3).map(|_| sized(&mut tree, 40.0, 20.0)).collect();
    let root = row(&mut tree, 100.0, 100.0, &children);
    tree.set_flex_wrap(root, Wrap::WrapReverse).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, children[0]), (0.0, 80.0, 40.0, 20.0));
    assert_eq!(frame(&tree, children[2]), (0.0, 60.0, 40.0, 20.0));
}

// =============================================================================
// ALIGNMENT
// =============================================================================

fn justified(justify: Justify) -> Vec<f32> {
    let mut tree = LayoutTree::new();
    let children: Vec<NodeId> = (0..2).map(|_| sized(&mut tree, 20.0, 20.0)).collect();
    let root = row(&mut tree, 100.0, 20.0, &children);
    tree.set_justify_content(root, justify).unwrap();
    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();
    children.iter().map(|&child| frame(&tree, child).0).collect()
}

#[test]
fn test_justify_content() {
    assert_eq!(justified(Justify::FlexStart), vec![0.0, 20.0]);
    assert_eq!(justified(Justify::Center), vec![30.0, 50.0]);
    assert_eq!(justified(Justify::FlexEnd), vec![60.0, 80.0]);
    assert_eq!(justified(Justify::SpaceBetween), vec![0.0, 80.0]);
    assert_eq!(justified(Justify::SpaceAround), vec![15.0, 65.0]);
    assert_eq!(justified(Justify::SpaceEvenly), vec![20.0, 60.0]);
}

#[test]
fn test_align_items_on_cross_axis() {
    for (align, left) in [(Align::FlexStart, 0.0), (Align::Center, 25.0), (Align::FlexEnd, 50.0)] {
        let mut tree = LayoutTree::new();
        let child = sized(&mut tree, 50.0, 20.0);
        let root = sized(&mut tree, 100.0, 100.0);
        tree.add_child(root, child).unwrap();
        tree.set_align_items(root, align).unwrap();

        tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

        assert_eq!(frame(&tree, child), (left, 0.0, 50.0, 20.0), "{align}");
    }
}

#[test]
fn test_stretch_fills_cross_axis() {
    let mut tree = LayoutTree::new();
    let child = tree.new_node();
    tree.set_height(child, Value::Point(10.0)).unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, child), (0.0, 0.0, 100.0, 10.0));
}

#[test]
fn test_auto_margin_pushes_item() {
    let mut tree = LayoutTree::new();
    let child = sized(&mut tree, 20.0, 20.0);
    tree.set_margin(child, Edge::Left, Value::Auto).unwrap();
    let root = row(&mut tree, 100.0, 20.0, &[child]);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, child).0, 80.0);
}

#[test]
fn test_baseline_alignment() {
    let mut tree = LayoutTree::new();
    let short = sized(&mut tree, 10.0, 20.0);
    let tall = sized(&mut tree, 10.0, 40.0);
    tree.set_baseline_func(short, Some(Arc::new(|_: NodeId, _: f32, _: f32| 15.0))).unwrap();
    tree.set_baseline_func(tall, Some(Arc::new(|_: NodeId, _: f32, _: f32| 10.0))).unwrap();
    let root = row(&mut tree, 100.0, 100.0, &[short, tall]);
    tree.set_align_items(root, Align::Baseline).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, short).1, 0.0);
    assert_eq!(frame(&tree, tall).1, 5.0);
}

// =============================================================================
// DIRECTION
// =============================================================================

#[test]
fn test_rtl_mirrors_row() {
    let mut tree = LayoutTree::new();
    let first = sized(&mut tree, 20.0, 20.0);
    let second = sized(&mut tree, 30.0, 20.0);
    let root = row(&mut tree, 100.0, 20.0, &[first, second]);

    tree.compute_layout(root, None, None, Direction::Rtl).unwrap();

    assert_eq!(frame(&tree, first).0, 80.0);
    assert_eq!(frame(&tree, second).0, 50.0);
    assert_eq!(tree.layout(first).unwrap().direction(), Direction::Rtl);
}

#[test]
fn test_start_margin_follows_direction() {
    let mut tree = LayoutTree::new();
    let child = sized(&mut tree, 20.0, 20.0);
    tree.set_margin(child, Edge::Start, Value::Point(10.0)).unwrap();
    let root = row(&mut tree, 100.0, 20.0, &[child]);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();
    assert_eq!(frame(&tree, child).0, 10.0);

    tree.compute_layout(root, None, None, Direction::Rtl).unwrap();
    assert_eq!(frame(&tree, child).0, 70.0);
    assert_eq!(tree.layout(child).unwrap().margin(Edge::Right), 10.0);
}

#[test]
fn test_row_reverse() {
    let mut tree = LayoutTree::new();
    let first = sized(&mut tree, 20.0, 20.0);
    let second = sized(&mut tree, 20.0, 20.0);
    let root = row(&mut tree, 100.0, 20.0, &[first, second]);
    tree.set_flex_direction(root, FlexDirection::RowReverse).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, first).0, 80.0);
    assert_eq!(frame(&tree, second).0, 60.0);
}

// =============================================================================
// PERCENTAGES
// =============================================================================

#[test]
fn test_percent_of_defined_parent() {
    let mut tree = LayoutTree::new();
    let child = tree.new_node();
    tree.set_width(child, Value::Percent(50.0)).unwrap();
    tree.set_height(child, Value::Percent(50.0)).unwrap();
    let root = sized(&mut tree, 200.0, 100.0);
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, child), (0.0, 0.0, 100.0, 50.0));
}

#[test]
fn test_percent_of_undefined_parent_is_unknown() {
    assert_eq!(Value::Percent(50.0).resolve(None), None);

    // An unresolvable percentage falls back to content size, not to zero.
    let mut tree = LayoutTree::new();
    let child = tree.new_node();
    tree.set_width(child, Value::Percent(50.0)).unwrap();
    tree.set_measure_func(
        child,
        Some(Arc::new(|_: NodeId, _: Option<f32>, _: MeasureMode, _: Option<f32>, _: MeasureMode| {
            Size::new(30.0, 10.0)
        })),
    )
    .unwrap();
    let root = tree.new_node();
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, child), (0.0, 0.0, 30.0, 10.0));
    assert_eq!(frame(&tree, root), (0.0, 0.0, 30.0, 10.0));
}

#[test]
fn test_infinite_style_values_never_reach_output() {
    let mut tree = LayoutTree::new();
    let child = tree.new_node();
    tree.set_width(child, Value::Point(f32::INFINITY)).unwrap();
    tree.set_height(child, Value::Point(20.0)).unwrap();
    tree.set_margin(child, Edge::Left, Value::Point(f32::NEG_INFINITY)).unwrap();
    tree.set_flex_grow(child, Some(f32::INFINITY)).unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    let (left, top, width, height) = frame(&tree, child);
    for value in [left, top, width, height] {
        assert!(value.is_finite());
    }
    assert_eq!(frame(&tree, child), (0.0, 0.0, 100.0, 20.0));
}

#[test]
fn test_root_percent_of_available_space() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_width(root, Value::Percent(50.0)).unwrap();
    tree.set_height(root, Value::Percent(25.0)).unwrap();

    tree.compute_layout(root, Some(200.0), Some(400.0), Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, root), (0.0, 0.0, 100.0, 100.0));
}

// =============================================================================
// POSITIONING
// =============================================================================

#[test]
fn test_absolute_leading_offsets() {
    let mut tree = LayoutTree::new();
    let child = sized(&mut tree, 30.0, 40.0);
    tree.set_position_type(child, PositionType::Absolute).unwrap();
    tree.set_position(child, Edge::Left, Value::Point(10.0)).unwrap();
    tree.set_position(child, Edge::Top, Value::Point(20.0)).unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, child), (10.0, 20.0, 30.0, 40.0));
}

#[test]
fn test_absolute_trailing_offsets() {
    let mut tree = LayoutTree::new();
    let child = sized(&mut tree, 30.0, 40.0);
    tree.set_position_type(child, PositionType::Absolute).unwrap();
    tree.set_position(child, Edge::Right, Value::Point(10.0)).unwrap();
    tree.set_position(child, Edge::Bottom, Value::Point(10.0)).unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, child), (60.0, 50.0, 30.0, 40.0));
}

#[test]
fn test_absolute_sized_by_insets() {
    let mut tree = LayoutTree::new();
    let child = tree.new_node();
    tree.set_position_type(child, PositionType::Absolute).unwrap();
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        tree.set_position(child, edge, Value::Point(10.0)).unwrap();
    }
    let root = sized(&mut tree, 100.0, 50.0);
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, child), (10.0, 10.0, 80.0, 30.0));
}

#[test]
fn test_absolute_falls_back_to_justify_and_align() {
    let mut tree = LayoutTree::new();
    let child = sized(&mut tree, 20.0, 20.0);
    tree.set_position_type(child, PositionType::Absolute).unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.set_justify_content(root, Justify::Center).unwrap();
    tree.set_align_items(root, Align::Center).unwrap();
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, child), (40.0, 40.0, 20.0, 20.0));
}

#[test]
fn test_relative_offset_shifts_item() {
    let mut tree = LayoutTree::new();
    let child = sized(&mut tree, 20.0, 20.0);
    tree.set_position(child, Edge::Left, Value::Point(5.0)).unwrap();
    tree.set_position(child, Edge::Top, Value::Point(7.0)).unwrap();
    let root = sized(&mut tree, 100.0, 100.0);
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, child), (5.0, 7.0, 20.0, 20.0));
}

#[test]
fn test_display_none_is_skipped() {
    let mut tree = LayoutTree::new();
    let hidden = sized(&mut tree, 50.0, 20.0);
    tree.set_display(hidden, Display::None).unwrap();
    let shown = sized(&mut tree, 30.0, 20.0);
    let root = row(&mut tree, 100.0, 20.0, &[hidden, shown]);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, hidden), (0.0, 0.0, 0.0, 0.0));
    assert_eq!(frame(&tree, shown), (0.0, 0.0, 30.0, 20.0));
}

// =============================================================================
// MEASURED LEAVES
// =============================================================================

#[test]
fn test_measure_func_sizes_leaf() {
    let mut tree = LayoutTree::new();
    let leaf = tree.new_node();
    tree.set_measure_func(
        leaf,
        Some(Arc::new(|_: NodeId, _: Option<f32>, _: MeasureMode, _: Option<f32>, _: MeasureMode| {
            Size::new(30.0, 10.0)
        })),
    )
    .unwrap();
    let root = tree.new_node();
    tree.set_width(root, Value::Point(100.0)).unwrap();
    tree.set_align_items(root, Align::FlexStart).unwrap();
    tree.add_child(root, leaf).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, leaf), (0.0, 0.0, 30.0, 10.0));
    assert_eq!(frame(&tree, root), (0.0, 0.0, 100.0, 10.0));
}

#[test]
fn test_non_finite_measurement_becomes_zero() {
    let mut tree = LayoutTree::new();
    let leaf = tree.new_node();
    tree.set_measure_func(
        leaf,
        Some(Arc::new(|_: NodeId, _: Option<f32>, _: MeasureMode, _: Option<f32>, _: MeasureMode| {
            Size::new(f32::NAN, f32::INFINITY)
        })),
    )
    .unwrap();
    let root = tree.new_node();
    tree.set_align_items(root, Align::FlexStart).unwrap();
    tree.add_child(root, leaf).unwrap();

    tree.compute_layout(root, Some(100.0), None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, leaf), (0.0, 0.0, 0.0, 0.0));
}

#[test]
fn test_text_leaf_wraps_to_width() {
    let mut tree = LayoutTree::new();
    let text = tree.new_node();
    tree.set_measure_func(text, Some(titan_layout::text_measure_func("hello brave new world"))).unwrap();
    let root = tree.new_node();
    tree.set_width(root, Value::Point(11.0)).unwrap();
    tree.add_child(root, text).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    // "hello brave" / "new world"
    assert_eq!(frame(&tree, text), (0.0, 0.0, 11.0, 2.0));
}

#[test]
fn test_measured_leaf_dirtied_by_hand() {
    let mut tree = LayoutTree::new();
    let leaf = tree.new_node();
    tree.set_measure_func(
        leaf,
        Some(Arc::new(|_: NodeId, _: Option<f32>, _: MeasureMode, _: Option<f32>, _: MeasureMode| {
            Size::new(10.0, 10.0)
        })),
    )
    .unwrap();
    let root = tree.new_node();
    tree.add_child(root, leaf).unwrap();
    tree.compute_layout(root, Some(100.0), Some(100.0), Direction::Ltr).unwrap();
    assert!(!tree.is_dirty(root).unwrap());

    tree.mark_dirty(leaf).unwrap();
    assert!(tree.is_dirty(leaf).unwrap());
    assert!(tree.is_dirty(root).unwrap());
    assert!(tree.mark_dirty(root).is_err());
}

// =============================================================================
// ROUNDING
// =============================================================================

#[test]
fn test_rounding_keeps_edges_touching() {
    let mut tree = LayoutTree::new();
    let children: Vec<NodeId> = (0..3)
        .map(|_| {
            let child = tree.new_node();
            tree.set_flex_grow(child, Some(1.0)).unwrap();
            child
        })
        .collect();
    let root = row(&mut tree, 100.0, 10.0, &children);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(frame(&tree, children[0]), (0.0, 0.0, 33.0, 10.0));
    assert_eq!(frame(&tree, children[1]), (33.0, 0.0, 34.0, 10.0));
    assert_eq!(frame(&tree, children[2]), (67.0, 0.0, 33.0, 10.0));
}

#[test]
fn test_zero_scale_factor_disables_rounding() {
    let mut tree = LayoutTree::with_config(Config::default().with_point_scale_factor(0.0));
    let children: Vec<NodeId> = (0..3)
        .map(|_| {
            let child = tree.new_node();
            tree.set_flex_grow(child, Some(1.0)).unwrap();
            child
        })
        .collect();
    let root = row(&mut tree, 100.0, 10.0, &children);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    let (left, _, width, _) = frame(&tree, children[1]);
    assert!((left - 100.0 / 3.0).abs() < 1e-3);
    assert!((width - 100.0 / 3.0).abs() < 1e-3);
}

#[test]
fn test_text_nodes_never_round_down() {
    let mut tree = LayoutTree::new();
    let measure = |width: f32| {
        Arc::new(move |_: NodeId, _: Option<f32>, _: MeasureMode, _: Option<f32>, _: MeasureMode| {
            Size::new(width, 5.0)
        })
    };
    let text = tree.new_node();
    tree.set_measure_func(text, Some(measure(10.2))).unwrap();
    let plain = tree.new_node();
    tree.set_measure_func(plain, Some(measure(10.2))).unwrap();
    tree.set_node_type(plain, NodeType::Default).unwrap();
    let root = row(&mut tree, 100.0, 10.0, &[]);
    tree.set_align_items(root, Align::FlexStart).unwrap();
    tree.set_flex_direction(root, FlexDirection::Column).unwrap();
    tree.add_child(root, text).unwrap();
    tree.add_child(root, plain).unwrap();

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert_eq!(tree.layout(text).unwrap().width(), Some(11.0));
    assert_eq!(tree.layout(plain).unwrap().width(), Some(10.0));
}
