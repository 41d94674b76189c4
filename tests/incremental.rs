//! Dirty tracking, caching and tree edits across layout passes.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use titan_layout::{
    Config, Direction, Edge, FlexDirection, LayoutError, LayoutTree, MeasureMode, NodeId, Size, Value,
};

fn clear_new_layout(tree: &mut LayoutTree, nodes: &[NodeId]) {
    for &node in nodes {
        tree.set_has_new_layout(node, false).unwrap();
    }
}

fn two_column_tree(tree: &mut LayoutTree) -> (NodeId, NodeId, NodeId) {
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    tree.set_width(root, Value::Point(200.0)).unwrap();
    tree.set_height(root, Value::Point(100.0)).unwrap();
    let left = tree.new_node();
    tree.set_width(left, Value::Point(50.0)).unwrap();
    let right = tree.new_node();
    tree.set_flex_grow(right, Some(1.0)).unwrap();
    tree.add_child(root, left).unwrap();
    tree.add_child(root, right).unwrap();
    (root, left, right)
}

#[test]
fn test_second_identical_pass_is_a_cache_hit() {
    let mut tree = LayoutTree::new();
    let (root, left, right) = two_column_tree(&mut tree);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();
    for node in [root, left, right] {
        assert!(tree.has_new_layout(node).unwrap());
        assert!(!tree.is_dirty(node).unwrap());
    }
    clear_new_layout(&mut tree, &[root, left, right]);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();
    for node in [root, left, right] {
        assert!(!tree.has_new_layout(node).unwrap());
    }
    assert_eq!(tree.layout(right).unwrap().width(), Some(150.0));
}

#[test]
fn test_style_change_relayouts_affected_nodes() {
    let mut tree = LayoutTree::new();
    let (root, left, right) = two_column_tree(&mut tree);
    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();
    clear_new_layout(&mut tree, &[root, left, right]);

    tree.set_width(left, Value::Point(80.0)).unwrap();
    assert!(tree.is_dirty(left).unwrap());
    assert!(tree.is_dirty(root).unwrap());
    assert!(!tree.is_dirty(right).unwrap());

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();
    assert!(tree.has_new_layout(left).unwrap());
    assert!(tree.has_new_layout(right).unwrap());
    assert_eq!(tree.layout(right).unwrap().left(), 80.0);
    assert_eq!(tree.layout(right).unwrap().width(), Some(120.0));
}

#[test]
fn test_unmoved_sibling_keeps_its_layout() {
    let mut tree = LayoutTree::new();
    let (root, left, right) = two_column_tree(&mut tree);
    tree.set_flex_grow(right, None).unwrap();
    tree.set_width(right, Value::Point(50.0)).unwrap();
    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();
    clear_new_layout(&mut tree, &[root, left, right]);

    tree.set_width(right, Value::Point(80.0)).unwrap();
    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    assert!(tree.has_new_layout(right).unwrap());
    assert!(!tree.has_new_layout(left).unwrap());
    assert_eq!(tree.layout(right).unwrap().left(), 50.0);
    assert_eq!(tree.layout(right).unwrap().width(), Some(80.0));
}

#[test]
fn test_setting_same_value_does_not_dirty() {
    let mut tree = LayoutTree::new();
    let (root, left, _) = two_column_tree(&mut tree);
    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    tree.set_width(left, Value::Point(50.0)).unwrap();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    assert!(!tree.is_dirty(left).unwrap());
    assert!(!tree.is_dirty(root).unwrap());

    // NaN is stored as undefined, which equals the unset default.
    tree.set_flex_grow(left, Some(f32::NAN)).unwrap();
    assert!(!tree.is_dirty(left).unwrap());
    assert_eq!(tree.flex_grow(left).unwrap(), None);
}

#[test]
fn test_measure_results_are_cached() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut tree = LayoutTree::new();
    let leaf = tree.new_node();
    tree.set_measure_func(
        leaf,
        Some(Arc::new(
            move |_: NodeId, _: Option<f32>, _: MeasureMode, _: Option<f32>, _: MeasureMode| {
                counter.fetch_add(1, Ordering::SeqCst);
                Size::new(20.0, 10.0)
            },
        )),
    )
    .unwrap();
    let root = tree.new_node();
    tree.add_child(root, leaf).unwrap();

    tree.compute_layout(root, Some(100.0), Some(100.0), Direction::Ltr).unwrap();
    let first_pass = calls.load(Ordering::SeqCst);
    assert!(first_pass >= 1);

    tree.compute_layout(root, Some(100.0), Some(100.0), Direction::Ltr).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), first_pass);

    tree.mark_dirty(leaf).unwrap();
    tree.compute_layout(root, Some(100.0), Some(100.0), Direction::Ltr).unwrap();
    assert!(calls.load(Ordering::SeqCst) > first_pass);
}

#[test]
fn test_available_space_change_relayouts() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    let child = tree.new_node();
    tree.set_flex_grow(child, Some(1.0)).unwrap();
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, Some(100.0), Some(100.0), Direction::Ltr).unwrap();
    assert_eq!(tree.layout(child).unwrap().height(), Some(100.0));

    tree.compute_layout(root, Some(100.0), Some(60.0), Direction::Ltr).unwrap();
    assert_eq!(tree.layout(child).unwrap().height(), Some(60.0));
}

#[test]
fn test_parent_resize_reresolves_percent_edges() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();
    tree.set_flex_direction(root, FlexDirection::Row).unwrap();
    let child = tree.new_node();
    tree.set_width(child, Value::Point(50.0)).unwrap();
    tree.set_height(child, Value::Point(50.0)).unwrap();
    tree.set_padding(child, Edge::Left, Value::Percent(10.0)).unwrap();
    let grandchild = tree.new_node();
    tree.set_width(grandchild, Value::Point(10.0)).unwrap();
    tree.set_height(grandchild, Value::Point(10.0)).unwrap();
    tree.add_child(child, grandchild).unwrap();
    tree.add_child(root, child).unwrap();

    tree.compute_layout(root, Some(200.0), Some(100.0), Direction::Ltr).unwrap();
    assert_eq!(tree.layout(grandchild).unwrap().left(), 20.0);

    // The child itself is clean; only its percentage reference changed.
    tree.compute_layout(root, Some(400.0), Some(100.0), Direction::Ltr).unwrap();
    assert!(!tree.is_dirty(child).unwrap());
    assert_eq!(tree.layout(grandchild).unwrap().left(), 40.0);
    assert_eq!(tree.layout(child).unwrap().padding(Edge::Left), 40.0);
}

#[test]
fn test_degenerate_available_space_is_sanitized() {
    let mut tree = LayoutTree::new();
    let root = tree.new_node();

    tree.compute_layout(root, Some(-10.0), Some(f32::NAN), Direction::Ltr).unwrap();

    let layout = tree.layout(root).unwrap();
    assert_eq!(layout.width(), Some(0.0));
    assert_eq!(layout.height(), Some(0.0));
}

// =============================================================================
// TREE EDITS
// =============================================================================

#[test]
fn test_removing_child_dirties_parent() {
    let mut tree = LayoutTree::new();
    let (root, left, right) = two_column_tree(&mut tree);
    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    tree.remove_child(root, left).unwrap();
    assert!(tree.is_dirty(root).unwrap());
    assert_eq!(tree.parent(left).unwrap(), None);

    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();
    assert_eq!(tree.layout(right).unwrap().left(), 0.0);
    assert_eq!(tree.layout(right).unwrap().width(), Some(200.0));
}

#[test]
fn test_rejected_edits_leave_tree_unchanged() {
    let mut tree = LayoutTree::new();
    let (root, left, _) = two_column_tree(&mut tree);

    assert!(matches!(
        tree.add_child(left, root),
        Err(LayoutError::CycleDetected { .. })
    ));
    let other = tree.new_node();
    assert!(matches!(
        tree.add_child(other, left),
        Err(LayoutError::ChildAlreadyParented { .. })
    ));
    assert!(matches!(
        tree.insert_child(root, other, 5),
        Err(LayoutError::IndexOutOfBounds { .. })
    ));
    assert_eq!(tree.child_count(root).unwrap(), 2);
    assert_eq!(tree.child_count(other).unwrap(), 0);
}

#[test]
fn test_freed_handles_are_rejected() {
    let mut tree = LayoutTree::new();
    let (root, left, right) = two_column_tree(&mut tree);

    tree.free_recursive(root).unwrap();
    assert_eq!(tree.node_count(), 0);
    for node in [root, left, right] {
        assert!(matches!(tree.layout(node), Err(LayoutError::NodeNotFound(_))));
    }
    assert!(tree.compute_layout(root, None, None, Direction::Ltr).is_err());
}

#[test]
fn test_clone_shares_children_until_edited() {
    let cloned = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&cloned);
    let config = Config::default().with_node_cloned_func(Arc::new(move |_: NodeId, _: NodeId, _: NodeId, _: usize| {
        counter.fetch_add(1, Ordering::SeqCst);
    }));
    let mut tree = LayoutTree::with_config(config);
    let (root, left, right) = two_column_tree(&mut tree);
    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    let snapshot = tree.clone_node(root).unwrap();
    assert_eq!(tree.children(snapshot).unwrap(), &[left, right]);

    // Laying out the clone copies the children it does not own.
    tree.set_width(snapshot, Value::Point(300.0)).unwrap();
    tree.compute_layout(snapshot, None, None, Direction::Ltr).unwrap();
    assert_eq!(cloned.load(Ordering::SeqCst), 2);

    let copied_right = tree.child(snapshot, 1).unwrap();
    assert_ne!(copied_right, right);
    assert_eq!(tree.layout(copied_right).unwrap().width(), Some(250.0));
    assert_eq!(tree.layout(right).unwrap().width(), Some(150.0));
    assert_eq!(tree.parent(right).unwrap(), Some(root));
}

#[test]
fn test_freeing_original_keeps_snapshot_children() {
    let mut tree = LayoutTree::new();
    let (root, left, right) = two_column_tree(&mut tree);
    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();

    let snapshot = tree.clone_node(root).unwrap();
    tree.free_recursive(root).unwrap();

    assert!(!tree.contains(root));
    assert_eq!(tree.node_count(), 3);
    assert_eq!(tree.children(snapshot).unwrap(), &[left, right]);
    assert_eq!(tree.parent(left).unwrap(), Some(snapshot));

    tree.set_width(snapshot, Value::Point(300.0)).unwrap();
    tree.compute_layout(snapshot, None, None, Direction::Ltr).unwrap();
    assert_eq!(tree.layout(right).unwrap().width(), Some(250.0));
}

#[test]
fn test_dangling_child_is_an_error() {
    let mut tree = LayoutTree::new();
    let (root, left, _) = two_column_tree(&mut tree);
    let snapshot = tree.clone_node(root).unwrap();

    // The original stops sharing its list, so the snapshot keeps `left`.
    tree.free(left).unwrap();

    assert_eq!(tree.children(snapshot).unwrap()[0], left);
    assert!(matches!(
        tree.compute_layout(snapshot, None, None, Direction::Ltr),
        Err(LayoutError::NodeNotFound(node)) if node == left
    ));
    tree.compute_layout(root, None, None, Direction::Ltr).unwrap();
}
