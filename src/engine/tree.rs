//! LayoutTree - Arena of nodes addressed by generational handles.
//!
//! The tree owns every node. Parent/child links are handles into the arena,
//! so a parent link never keeps a node alive and a stale handle is detected
//! instead of dereferenced.
//!
//! # Ownership
//!
//! A node owns the children whose `parent` is that node. A child list may
//! also be shared with a cloned snapshot (see [`LayoutTree::clone_node`]);
//! the first structural edit on a shared list clones its children so the
//! snapshot is never mutated in place.

use std::any::Any;
use std::sync::Arc;

use log::trace;
use slotmap::{new_key_type, SlotMap};

use crate::error::{LayoutError, Result};
use crate::layout::Layout;
use crate::types::NodeType;

use super::{BaselineFunc, Config, Context, MeasureFunc, Node, PrintFunc};

new_key_type! {
    /// Handle to a node in a [`LayoutTree`].
    pub struct NodeId;
}

/// Owner of all nodes of one or more layout trees.
#[derive(Debug)]
pub struct LayoutTree {
    pub(crate) nodes: SlotMap<NodeId, Node>,
    /// Config bound to nodes created without an explicit one.
    config: Arc<Config>,
    /// Bumped by every `compute_layout`.
    pub(crate) generation: u32,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    /// Create an empty tree with the default config.
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Create an empty tree whose new nodes share `config`.
    pub fn with_config(config: Config) -> Self {
        Self {
            nodes: SlotMap::with_key(),
            config: Arc::new(config),
            generation: 0,
        }
    }

    /// Config given to nodes created by [`new_node`](Self::new_node).
    pub fn default_config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the handle refers to a live node.
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(node)
    }

    pub fn node(&self, node: NodeId) -> Result<&Node> {
        self.nodes.get(node).ok_or(LayoutError::NodeNotFound(node))
    }

    pub(crate) fn node_mut(&mut self, node: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(node).ok_or(LayoutError::NodeNotFound(node))
    }

    // =========================================================================
    // CONSTRUCT / DESTROY
    // =========================================================================

    /// Create an empty, dirty node bound to the tree's config.
    pub fn new_node(&mut self) -> NodeId {
        let config = Arc::clone(&self.config);
        self.new_node_with_config(config)
    }

    /// Create an empty, dirty node bound to `config`.
    pub fn new_node_with_config(&mut self, config: Arc<Config>) -> NodeId {
        self.nodes.insert(Node::new(config))
    }

    /// Create a node and append `children` to it in order.
    pub fn new_node_with_children(&mut self, children: &[NodeId]) -> Result<NodeId> {
        for &child in children {
            self.node(child)?;
        }
        let parent = self.new_node();
        for (index, &child) in children.iter().enumerate() {
            if let Err(err) = self.insert_child(parent, child, index) {
                // Roll back so a rejected child leaves no half-built node.
                self.remove_all_children(parent)?;
                self.nodes.remove(parent);
                return Err(err);
            }
        }
        Ok(parent)
    }

    /// Destroy one node.
    ///
    /// The node is detached from its parent first. Children it owns become
    /// detached roots and stay valid, unless a clone shares them, in which
    /// case the clone takes them over.
    pub fn free(&mut self, node: NodeId) -> Result<()> {
        let parent = self.node(node)?.parent;
        if let Some(parent) = parent {
            self.remove_child(parent, node)?;
        }

        if !self.hand_off_shared_children(node) {
            let children = Arc::clone(&self.nodes[node].children);
            for &child in children.iter() {
                if let Some(owned) = self.nodes.get_mut(child) {
                    if owned.parent == Some(node) {
                        owned.parent = None;
                    }
                }
            }
        }

        self.nodes.remove(node);
        trace!("free {node:?}");
        Ok(())
    }

    /// Destroy a node and every descendant it owns.
    ///
    /// Children owned elsewhere are left alone, and a child list shared with
    /// a clone is handed to that clone instead of being freed. Walks the
    /// subtree with an explicit stack.
    pub fn free_recursive(&mut self, root: NodeId) -> Result<()> {
        let parent = self.node(root)?.parent;
        if let Some(parent) = parent {
            self.remove_child(parent, root)?;
        }

        let mut stack = vec![root];
        let mut freed = 0usize;
        while let Some(current) = stack.pop() {
            let handed_off = self.hand_off_shared_children(current);
            let Some(node) = self.nodes.remove(current) else {
                continue;
            };
            freed += 1;
            if handed_off {
                continue;
            }
            for &child in node.children.iter() {
                if self.nodes.get(child).is_some_and(|c| c.parent == Some(current)) {
                    stack.push(child);
                }
            }
        }
        trace!("free_recursive {root:?}: {freed} nodes");
        Ok(())
    }

    /// Return a detached, childless node to its freshly created state.
    ///
    /// The node keeps its config.
    pub fn reset(&mut self, node: NodeId) -> Result<()> {
        let entry = self.node_mut(node)?;
        if entry.parent.is_some() || !entry.children.is_empty() {
            return Err(LayoutError::ResetAttachedNode(node));
        }
        let config = Arc::clone(&entry.config);
        *entry = Node::new(config);
        Ok(())
    }

    /// Shallow clone: copies style, layout and callbacks and shares the
    /// child list. The clone has no parent.
    pub fn clone_node(&mut self, node: NodeId) -> Result<NodeId> {
        let mut clone = self.node(node)?.clone();
        clone.parent = None;
        Ok(self.nodes.insert(clone))
    }

    /// Deep clone: copies the whole owned subtree into new nodes.
    ///
    /// Configs, callbacks and contexts are shared with the originals.
    pub fn clone_node_deep(&mut self, node: NodeId) -> Result<NodeId> {
        let mut root = self.node(node)?.clone();
        root.parent = None;
        root.children = Arc::new(Vec::new());
        let root = self.nodes.insert(root);

        let mut stack = vec![(node, root)];
        while let Some((source, target)) = stack.pop() {
            let children = Arc::clone(&self.nodes[source].children);
            let mut cloned = Vec::with_capacity(children.len());
            for &child in children.iter() {
                let Some(original) = self.nodes.get(child) else {
                    continue;
                };
                let mut copy = original.clone();
                copy.parent = Some(target);
                copy.children = Arc::new(Vec::new());
                let copy = self.nodes.insert(copy);
                cloned.push(copy);
                stack.push((child, copy));
            }
            self.nodes[target].children = Arc::new(cloned);
        }
        Ok(root)
    }

    // =========================================================================
    // TREE EDITS
    // =========================================================================

    /// Whether `node` owns its current child list.
    fn owns_children(&self, node: NodeId) -> bool {
        let Some(entry) = self.nodes.get(node) else {
            return true;
        };
        entry
            .children
            .first()
            .is_none_or(|&first| self.nodes.get(first).is_some_and(|child| child.parent == Some(node)))
    }

    /// Give the children `node` owns to another node sharing the same list.
    ///
    /// Returns whether an heir was found. The heir becomes the owner, so
    /// freeing `node` afterwards leaves its clones with valid children.
    fn hand_off_shared_children(&mut self, node: NodeId) -> bool {
        let Some(entry) = self.nodes.get(node) else {
            return false;
        };
        let children = &entry.children;
        if children.is_empty() || Arc::strong_count(children) == 1 || !self.owns_children(node) {
            return false;
        }
        let Some(heir) = self
            .nodes
            .iter()
            .find(|&(id, other)| id != node && Arc::ptr_eq(&other.children, children))
            .map(|(id, _)| id)
        else {
            return false;
        };

        let children = Arc::clone(children);
        for &child in children.iter() {
            if let Some(owned) = self.nodes.get_mut(child) {
                if owned.parent == Some(node) {
                    owned.parent = Some(heir);
                }
            }
        }
        trace!("hand off {} children of {node:?} to {heir:?}", children.len());
        true
    }

    /// Make a shared child list private by cloning every child into it.
    ///
    /// Each clone is reported through the config's `on_node_cloned` hook.
    pub fn clone_children_if_needed(&mut self, node: NodeId) -> Result<()> {
        self.node(node)?;
        self.clone_shared_children(node);
        Ok(())
    }

    pub(crate) fn clone_shared_children(&mut self, node: NodeId) {
        if self.owns_children(node) {
            return;
        }

        let hook = self.nodes[node].config.on_node_cloned.clone();
        let old = Arc::clone(&self.nodes[node].children);
        let mut cloned = Vec::with_capacity(old.len());
        for &child in old.iter() {
            let Some(original) = self.nodes.get(child) else {
                continue;
            };
            let mut copy = original.clone();
            copy.parent = Some(node);
            let copy = self.nodes.insert(copy);
            if let Some(hook) = &hook {
                hook(child, copy, node, cloned.len());
            }
            cloned.push(copy);
        }
        trace!("clone_children_if_needed {node:?}: {} children", cloned.len());
        self.nodes[node].children = Arc::new(cloned);
    }

    /// Reject edits that would give `child` a second parent or a cycle.
    fn check_attachable(&self, parent: NodeId, child: NodeId) -> Result<()> {
        let parent_node = self.node(parent)?;
        let child_node = self.node(child)?;
        if let Some(existing) = child_node.parent {
            return Err(LayoutError::ChildAlreadyParented { child, parent: existing });
        }
        if parent_node.measure.is_some() {
            return Err(LayoutError::ChildOfMeasuredNode(parent));
        }

        let mut ancestor = Some(parent);
        while let Some(current) = ancestor {
            if current == child {
                return Err(LayoutError::CycleDetected { parent, child });
            }
            ancestor = self.nodes[current].parent;
        }
        Ok(())
    }

    /// Insert `child` at `index` in `parent`'s children.
    pub fn insert_child(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        self.check_attachable(parent, child)?;
        let len = self.nodes[parent].children.len();
        if index > len {
            return Err(LayoutError::IndexOutOfBounds { parent, index, len });
        }

        self.clone_shared_children(parent);
        Arc::make_mut(&mut self.nodes[parent].children).insert(index, child);
        self.nodes[child].parent = Some(parent);
        self.mark_dirty_and_propagate(parent);
        Ok(())
    }

    /// Append `child` to `parent`'s children.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self.node(parent)?.children.len();
        self.insert_child(parent, child, index)
    }

    /// Remove `child` from `parent`.
    ///
    /// On a shared child list the remaining children are cloned into a new
    /// private list and the snapshot keeps the original.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let index = self
            .node(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(LayoutError::ChildNotFound { parent, child })?;
        self.detach_at(parent, index, None);
        Ok(())
    }

    /// Remove and return the child at `index`.
    pub fn remove_child_at_index(&mut self, parent: NodeId, index: usize) -> Result<NodeId> {
        let child = self.child(parent, index)?;
        self.detach_at(parent, index, None);
        Ok(child)
    }

    /// Put `new_child` where `old_child` was. `old_child` becomes a detached root.
    pub fn replace_child(&mut self, parent: NodeId, old_child: NodeId, new_child: NodeId) -> Result<()> {
        let index = self
            .node(parent)?
            .children
            .iter()
            .position(|&c| c == old_child)
            .ok_or(LayoutError::ChildNotFound { parent, child: old_child })?;
        if old_child == new_child {
            return Ok(());
        }
        self.check_attachable(parent, new_child)?;
        self.detach_at(parent, index, Some(new_child));
        Ok(())
    }

    /// Take the child at `index` out of `parent`, optionally putting
    /// `replacement` in its slot.
    fn detach_at(&mut self, parent: NodeId, index: usize, replacement: Option<NodeId>) {
        let removed = self.nodes[parent].children[index];

        if self.owns_children(parent) {
            let children = Arc::make_mut(&mut self.nodes[parent].children);
            match replacement {
                Some(new_child) => children[index] = new_child,
                None => {
                    children.remove(index);
                }
            }
            if let Some(removed) = self.nodes.get_mut(removed) {
                removed.parent = None;
            }
        } else {
            let hook = self.nodes[parent].config.on_node_cloned.clone();
            let old = Arc::clone(&self.nodes[parent].children);
            let mut rebuilt = Vec::with_capacity(old.len());
            for (position, &child) in old.iter().enumerate() {
                if position == index {
                    rebuilt.extend(replacement);
                    continue;
                }
                let Some(original) = self.nodes.get(child) else {
                    continue;
                };
                let mut copy = original.clone();
                copy.parent = Some(parent);
                let copy = self.nodes.insert(copy);
                if let Some(hook) = &hook {
                    hook(child, copy, parent, rebuilt.len());
                }
                rebuilt.push(copy);
            }
            self.nodes[parent].children = Arc::new(rebuilt);
        }

        if let Some(new_child) = replacement {
            self.nodes[new_child].parent = Some(parent);
        }
        self.mark_dirty_and_propagate(parent);
    }

    /// Detach every child of `node`.
    ///
    /// Owned children become detached roots; a shared list is simply dropped
    /// from this node.
    pub fn remove_all_children(&mut self, node: NodeId) -> Result<()> {
        if self.node(node)?.children.is_empty() {
            return Ok(());
        }
        if self.owns_children(node) {
            let children = Arc::clone(&self.nodes[node].children);
            for &child in children.iter() {
                if let Some(owned) = self.nodes.get_mut(child) {
                    owned.parent = None;
                }
            }
        }
        self.nodes[node].children = Arc::new(Vec::new());
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    // =========================================================================
    // TREE QUERIES
    // =========================================================================

    pub fn child_count(&self, node: NodeId) -> Result<usize> {
        Ok(self.node(node)?.children.len())
    }

    pub fn child(&self, parent: NodeId, index: usize) -> Result<NodeId> {
        let children = &self.node(parent)?.children;
        children.get(index).copied().ok_or(LayoutError::IndexOutOfBounds {
            parent,
            index,
            len: children.len(),
        })
    }

    pub fn children(&self, node: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(node)?.children)
    }

    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>> {
        Ok(self.node(node)?.parent)
    }

    // =========================================================================
    // DIRTY TRACKING
    // =========================================================================

    /// Dirty `node` and its ancestors, stopping at the first already-dirty one.
    pub(crate) fn mark_dirty_and_propagate(&mut self, node: NodeId) {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(entry) = self.nodes.get_mut(id) else {
                break;
            };
            if entry.is_dirty {
                break;
            }
            entry.is_dirty = true;
            entry.layout.computed_flex_basis = None;
            current = entry.parent;
        }
    }

    /// Dirty a measured leaf whose content changed outside the engine.
    pub fn mark_dirty(&mut self, node: NodeId) -> Result<()> {
        if self.node(node)?.measure.is_none() {
            return Err(LayoutError::MarkDirtyWithoutMeasure(node));
        }
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    pub fn is_dirty(&self, node: NodeId) -> Result<bool> {
        Ok(self.node(node)?.is_dirty)
    }

    pub fn has_new_layout(&self, node: NodeId) -> Result<bool> {
        Ok(self.node(node)?.has_new_layout)
    }

    /// Consumers clear the flag after reading a node's layout.
    pub fn set_has_new_layout(&mut self, node: NodeId, has_new_layout: bool) -> Result<()> {
        self.node_mut(node)?.has_new_layout = has_new_layout;
        Ok(())
    }

    // =========================================================================
    // CALLBACKS AND HOST DATA
    // =========================================================================

    /// Install or clear the measure function of a leaf.
    ///
    /// Installing one makes the node a text node; clearing it makes it a
    /// default node again.
    pub fn set_measure_func(&mut self, node: NodeId, measure: Option<MeasureFunc>) -> Result<()> {
        let entry = self.node_mut(node)?;
        match measure {
            Some(measure) => {
                if !entry.children.is_empty() {
                    return Err(LayoutError::MeasureOnNodeWithChildren(node));
                }
                entry.measure = Some(measure);
                entry.node_type = NodeType::Text;
            }
            None => {
                if entry.measure.is_none() {
                    return Ok(());
                }
                entry.measure = None;
                entry.node_type = NodeType::Default;
            }
        }
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    pub fn has_measure_func(&self, node: NodeId) -> Result<bool> {
        Ok(self.node(node)?.measure.is_some())
    }

    pub fn set_baseline_func(&mut self, node: NodeId, baseline: Option<BaselineFunc>) -> Result<()> {
        self.node_mut(node)?.baseline = baseline;
        Ok(())
    }

    /// Install or clear the hook whose output `print_tree` adds to the node.
    pub fn set_print_func(&mut self, node: NodeId, print: Option<PrintFunc>) -> Result<()> {
        self.node_mut(node)?.print = print;
        Ok(())
    }

    /// Attach host data to a node.
    pub fn set_context(&mut self, node: NodeId, context: Option<Context>) -> Result<()> {
        self.node_mut(node)?.context = context;
        Ok(())
    }

    /// Host data downcast to `T`, or `None` when absent or of another type.
    pub fn context<T: Any>(&self, node: NodeId) -> Result<Option<&T>> {
        Ok(self.node(node)?.context::<T>())
    }

    pub fn node_type(&self, node: NodeId) -> Result<NodeType> {
        Ok(self.node(node)?.node_type)
    }

    pub fn set_node_type(&mut self, node: NodeId, node_type: NodeType) -> Result<()> {
        self.node_mut(node)?.node_type = node_type;
        Ok(())
    }

    pub fn config(&self, node: NodeId) -> Result<&Arc<Config>> {
        Ok(&self.node(node)?.config)
    }

    /// Bind a node to another config. Dirties the node.
    pub fn set_config(&mut self, node: NodeId, config: Arc<Config>) -> Result<()> {
        self.node_mut(node)?.config = config;
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    // =========================================================================
    // RESULTS
    // =========================================================================

    pub fn layout(&self, node: NodeId) -> Result<&Layout> {
        Ok(&self.node(node)?.layout)
    }

    /// Flex line the node was placed on by its parent's last layout.
    pub fn line_index(&self, node: NodeId) -> Result<usize> {
        Ok(self.node(node)?.line_index)
    }
}
