// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Child list management for containers.

use tracing::trace;
use understory_event::{EventPayload, EventType};

use crate::error::{DisplayError, Result};
use crate::stage::Stage;
use crate::types::{NodeFlags, NodeId, NodeKind};

impl Stage {
    /// Append `child` to `parent`'s child list, on top of its siblings.
    ///
    /// See [`add_child_at`](Self::add_child_at).
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        self.add_child_at(parent, child, usize::MAX)
    }

    /// Insert `child` at `index` in `parent`'s child list.
    ///
    /// An index past the end appends. A child that already has a parent is
    /// removed from it first. If `child` ends up on stage, it and its
    /// descendants receive `addedToStage`.
    ///
    /// Fails when `parent` is not a container or is a loader, when `child` is
    /// the root, and when `child` is `parent` or one of its ancestors.
    pub fn add_child_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<NodeId> {
        self.check_mutable_container(parent)?;
        self.check_alive(child)?;
        if child == self.root {
            return Err(DisplayError::StageAsChild);
        }
        if self.tree.is_ancestor_or_self(child, parent) {
            return Err(DisplayError::CyclicParent { parent, child });
        }
        self.attach(parent, child, index);
        Ok(child)
    }

    /// Remove `child` from `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<NodeId> {
        let index = self.get_child_index(parent, child)?;
        self.remove_child_at(parent, index)
    }

    /// Remove and return the child at `index`.
    ///
    /// If the child was on stage, it and its descendants receive
    /// `removedFromStage` once it is detached.
    pub fn remove_child_at(&mut self, parent: NodeId, index: usize) -> Result<NodeId> {
        self.check_mutable_container(parent)?;
        let child = self.get_child_at(parent, index)?;
        self.detach(parent, child);
        Ok(child)
    }

    /// The child at `index`.
    pub fn get_child_at(&self, parent: NodeId, index: usize) -> Result<NodeId> {
        let children = self.child_list(parent)?;
        children
            .get(index)
            .copied()
            .ok_or(DisplayError::IndexOutOfRange {
                index,
                len: children.len(),
            })
    }

    /// The first child whose name is `name`.
    pub fn get_child_by_name(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.tree.children_of(parent).iter().copied().find(|&c| {
            self.tree
                .get(c)
                .is_some_and(|n| n.name.as_deref() == Some(name))
        })
    }

    /// Position of `child` in `parent`'s child list.
    pub fn get_child_index(&self, parent: NodeId, child: NodeId) -> Result<usize> {
        self.child_list(parent)?
            .iter()
            .position(|&c| c == child)
            .ok_or(DisplayError::NotAChild { parent, child })
    }

    /// Move `child` to `index` within `parent`. No stage notifications fire.
    pub fn set_child_index(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<()> {
        self.check_mutable_container(parent)?;
        let current = self.get_child_index(parent, child)?;
        trace!(?parent, ?child, from = current, to = index, "reordering child");
        self.suppress_notifications += 1;
        self.detach(parent, child);
        self.attach(parent, child, index);
        self.suppress_notifications -= 1;
        Ok(())
    }

    /// Swap the positions of two children.
    pub fn swap_children(&mut self, parent: NodeId, a: NodeId, b: NodeId) -> Result<()> {
        let i = self.get_child_index(parent, a)?;
        let j = self.get_child_index(parent, b)?;
        self.swap_children_at(parent, i, j)
    }

    /// Swap the children at two positions. No stage notifications fire.
    pub fn swap_children_at(&mut self, parent: NodeId, i: usize, j: usize) -> Result<()> {
        self.check_mutable_container(parent)?;
        self.get_child_at(parent, i)?;
        self.get_child_at(parent, j)?;
        self.node_mut(parent)?.children.swap(i, j);
        Ok(())
    }

    /// Whether `id` is one of `parent`'s descendants.
    pub fn contains(&self, parent: NodeId, id: NodeId) -> bool {
        parent != id && self.tree.is_alive(parent) && self.tree.is_ancestor_or_self(parent, id)
    }

    /// Number of children; `0` for leaves and stale ids.
    pub fn num_children(&self, id: NodeId) -> usize {
        self.tree.children_of(id).len()
    }

    /// Children in paint order, back to front.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.tree.children_of(id)
    }

    /// The parent of `id`.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.tree.parent_of(id)
    }

    /// The root if `id` is attached to it, directly or through ancestors.
    pub fn stage_of(&self, id: NodeId) -> Option<NodeId> {
        self.tree
            .ancestors_inclusive(id)
            .last()
            .filter(|&top| top == self.root)
    }

    /// Whether `id` is reachable from the root.
    pub fn is_on_stage(&self, id: NodeId) -> bool {
        self.stage_of(id).is_some()
    }

    /// Whether pointer events reach the children of `id`.
    pub fn mouse_children(&self, id: NodeId) -> Option<bool> {
        self.tree
            .get(id)
            .filter(|n| n.kind().is_container())
            .map(|n| n.flags.contains(NodeFlags::MOUSE_CHILDREN))
    }

    /// Enable or disable pointer events for the children of a container.
    pub fn set_mouse_children(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        if !node.kind().is_container() {
            return Err(DisplayError::NotAContainer(id));
        }
        node.flags.set(NodeFlags::MOUSE_CHILDREN, enabled);
        Ok(())
    }

    // --- internals ---

    fn child_list(&self, parent: NodeId) -> Result<&[NodeId]> {
        Ok(&self.node(parent)?.children)
    }

    /// Containers other than loaders accept child mutations.
    fn check_mutable_container(&self, parent: NodeId) -> Result<()> {
        match self.node(parent)?.kind() {
            NodeKind::Loader => Err(DisplayError::LoaderChild),
            kind if kind.is_container() => Ok(()),
            _ => Err(DisplayError::NotAContainer(parent)),
        }
    }

    /// Link without validation, detaching from any previous parent first.
    pub(crate) fn attach(&mut self, parent: NodeId, child: NodeId, index: usize) {
        if let Some(old) = self.tree.parent_of(child) {
            self.detach(old, child);
        }
        // A removal listener may have re-parented it.
        if let Some(moved) = self.tree.parent_of(child) {
            self.detach(moved, child);
            self.tree.unlink(child);
        }
        let linkable = self.tree.is_alive(parent) && self.tree.is_alive(child);
        if !linkable || self.tree.is_ancestor_or_self(child, parent) {
            return;
        }
        self.tree.link(child, parent, index);
        if self.is_on_stage(child) {
            self.notify_subtree(child, EventType::ADDED_TO_STAGE);
        }
    }

    /// Unlink `child` from `parent`, notifying the subtree if it left the stage.
    pub(crate) fn detach(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_eq!(self.tree.parent_of(child), Some(parent));
        let was_on_stage = self.is_on_stage(parent);
        self.tree.unlink(child);
        if was_on_stage {
            self.notify_subtree(child, EventType::REMOVED_FROM_STAGE);
        }
    }

    fn notify_subtree(&mut self, id: NodeId, kind: EventType) {
        if self.suppress_notifications > 0 {
            return;
        }
        for node in self.tree.subtree(id) {
            self.notify(node, kind.clone(), EventPayload::None);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use understory_event::Outcome;

    use super::*;
    use crate::error::ErrorKind;
    use crate::stage::tests::stage;

    fn record(stage: &mut Stage, id: NodeId, log: &Rc<RefCell<Vec<(NodeId, &'static str)>>>) {
        for (kind, label) in [
            (EventType::ADDED_TO_STAGE, "added"),
            (EventType::REMOVED_FROM_STAGE, "removed"),
        ] {
            let log = log.clone();
            stage
                .add_event_listener(id, kind, move |_, e| {
                    log.borrow_mut().push((e.target, label));
                    Outcome::Continue
                })
                .unwrap();
        }
    }

    #[test]
    fn insertion_order_and_index_shifts() {
        let mut stage = stage();
        let root = stage.root();
        let a = stage.create_shape();
        let b = stage.create_shape();
        let c = stage.create_shape();
        stage.add_child(root, a).unwrap();
        stage.add_child(root, b).unwrap();
        stage.add_child_at(root, c, 0).unwrap();

        assert_eq!(stage.children(root), [c, a, b]);
        assert_eq!(stage.get_child_index(root, a), Ok(1));
        assert_eq!(stage.num_children(root), 3);

        stage.remove_child_at(root, 0).unwrap();
        assert_eq!(stage.get_child_index(root, b), Ok(1));
        assert_eq!(stage.num_children(root), 2);
        assert_eq!(stage.parent(c), None);
    }

    #[test]
    fn reparenting_moves_the_child_once() {
        let mut stage = stage();
        let first = stage.create_sprite();
        let second = stage.create_sprite();
        let child = stage.create_shape();
        stage.add_child(first, child).unwrap();
        stage.add_child(second, child).unwrap();
        stage.add_child(second, child).unwrap();

        assert_eq!(stage.num_children(first), 0);
        assert_eq!(stage.children(second), [child]);
        assert_eq!(stage.parent(child), Some(second));
    }

    #[test]
    fn reparenting_survives_a_removal_listener_that_moves_the_child() {
        let mut stage = stage();
        let root = stage.root();
        let [a, b, c] = [
            stage.create_sprite(),
            stage.create_sprite(),
            stage.create_sprite(),
        ];
        for s in [a, b, c] {
            stage.add_child(root, s).unwrap();
        }
        let child = stage.create_shape();
        stage.add_child(a, child).unwrap();

        let moved = Rc::new(Cell::new(false));
        let flag = moved.clone();
        stage
            .add_event_listener(child, EventType::REMOVED_FROM_STAGE, move |stage, e| {
                if !flag.replace(true) {
                    stage.add_child(c, e.target).unwrap();
                }
                Outcome::Continue
            })
            .unwrap();
        stage.add_child(b, child).unwrap();

        assert!(moved.get());
        assert_eq!(stage.num_children(a), 0);
        assert_eq!(stage.children(b), [child]);
        assert_eq!(stage.num_children(c), 0);
        assert_eq!(stage.parent(child), Some(b));
        assert!(stage.is_on_stage(child));
    }

    #[test]
    fn rejected_insertions() {
        let mut stage = stage();
        let root = stage.root();
        let outer = stage.create_sprite();
        let inner = stage.create_sprite();
        let shape = stage.create_shape();
        stage.add_child(outer, inner).unwrap();

        assert_eq!(
            stage.add_child(outer, root),
            Err(DisplayError::StageAsChild)
        );
        assert_eq!(
            stage.add_child(outer, outer),
            Err(DisplayError::CyclicParent {
                parent: outer,
                child: outer
            })
        );
        assert_eq!(
            stage.add_child(inner, outer).map_err(|e| e.kind()),
            Err(ErrorKind::InvalidOperation)
        );
        assert_eq!(
            stage.add_child(shape, outer),
            Err(DisplayError::NotAContainer(shape))
        );
    }

    #[test]
    fn loaders_reject_generic_mutation() {
        let mut stage = stage();
        let loader = stage.create_loader();
        let shape = stage.create_shape();
        assert_eq!(
            stage.add_child(loader, shape),
            Err(DisplayError::LoaderChild)
        );
        assert_eq!(
            stage.add_child_at(loader, shape, 0),
            Err(DisplayError::LoaderChild)
        );
        assert_eq!(
            stage.remove_child_at(loader, 0),
            Err(DisplayError::LoaderChild)
        );
        assert_eq!(
            stage.swap_children_at(loader, 0, 0),
            Err(DisplayError::LoaderChild)
        );
        assert_eq!(stage.parent(shape), None);
    }

    #[test]
    fn lookup_errors() {
        let mut stage = stage();
        let root = stage.root();
        let stray = stage.create_shape();
        assert_eq!(
            stage.get_child_index(root, stray),
            Err(DisplayError::NotAChild {
                parent: root,
                child: stray
            })
        );
        assert_eq!(
            stage.remove_child_at(root, 3).map_err(|e| e.kind()),
            Err(ErrorKind::OutOfRange)
        );
        assert_eq!(
            stage.get_child_at(root, 0),
            Err(DisplayError::IndexOutOfRange { index: 0, len: 0 })
        );
    }

    #[test]
    fn stage_notifications_reach_the_subtree() {
        let mut stage = stage();
        let root = stage.root();
        let parent = stage.create_sprite();
        let child = stage.create_shape();
        stage.add_child(parent, child).unwrap();

        let log = Rc::new(RefCell::new(Vec::new()));
        record(&mut stage, parent, &log);
        record(&mut stage, child, &log);

        stage.add_child(root, parent).unwrap();
        assert_eq!(*log.borrow(), [(parent, "added"), (child, "added")]);
        log.borrow_mut().clear();

        stage.remove_child(root, parent).unwrap();
        assert_eq!(*log.borrow(), [(parent, "removed"), (child, "removed")]);
        log.borrow_mut().clear();

        // Off-stage moves are silent.
        let other = stage.create_sprite();
        stage.add_child(other, child).unwrap();
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn reordering_is_silent() {
        let mut stage = stage();
        let root = stage.root();
        let log = Rc::new(RefCell::new(Vec::new()));
        let ids: Vec<_> = (0..3).map(|_| stage.create_shape()).collect();
        for &id in &ids {
            stage.add_child(root, id).unwrap();
            record(&mut stage, id, &log);
        }

        stage.set_child_index(root, ids[0], 2).unwrap();
        assert_eq!(stage.children(root), [ids[1], ids[2], ids[0]]);

        stage.swap_children_at(root, 0, 2).unwrap();
        assert_eq!(stage.children(root), [ids[0], ids[2], ids[1]]);
        stage.swap_children_at(root, 0, 2).unwrap();
        assert_eq!(stage.children(root), [ids[1], ids[2], ids[0]]);

        stage.swap_children(root, ids[1], ids[0]).unwrap();
        assert_eq!(stage.children(root), [ids[0], ids[2], ids[1]]);

        assert!(log.borrow().is_empty());
    }

    #[test]
    fn contains_and_names() {
        let mut stage = stage();
        let root = stage.root();
        let sprite = stage.create_sprite();
        let shape = stage.create_shape();
        stage.add_child(root, sprite).unwrap();
        stage.add_child(sprite, shape).unwrap();
        stage.set_name(shape, "hero").unwrap();

        assert!(stage.contains(root, shape));
        assert!(!stage.contains(sprite, sprite));
        assert!(!stage.contains(root, root));
        assert!(!stage.contains(shape, sprite));
        assert_eq!(stage.get_child_by_name(sprite, "hero"), Some(shape));
        assert_eq!(stage.get_child_by_name(root, "hero"), None);
        assert_eq!(stage.stage_of(shape), Some(root));

        stage.remove_child(root, sprite).unwrap();
        assert_eq!(stage.stage_of(shape), None);
    }
}
