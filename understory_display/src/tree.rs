// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Generational node arena and raw parent/child links.
//!
//! This layer enforces no policy: checks such as cycle prevention and stage
//! notifications live in the container operations on [`Stage`](crate::Stage).

use crate::node::{Content, Node};
use crate::types::NodeId;

#[derive(Debug, Default)]
pub(crate) struct Tree {
    /// slots
    nodes: Vec<Option<Node>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
}

impl Tree {
    #[allow(
        clippy::cast_possible_truncation,
        reason = "NodeId uses 32-bit indices by design."
    )]
    pub(crate) fn insert(&mut self, content: Content) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, content));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(Node::new(generation, content)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        NodeId::new(idx as u32, generation)
    }

    /// Free `id` and its whole subtree. Links to the parent must already be cut.
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> usize {
        let Some(node) = self.get(id) else {
            return 0;
        };
        let children = node.children.clone();
        let mut removed = 1;
        for child in children {
            removed += self.remove_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
        removed
    }

    /// Returns true if `id` refers to a live node.
    pub(crate) fn is_alive(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    pub(crate) fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    pub(crate) fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| &n.children)
    }

    /// Insert `id` into `parent`'s child list; indices past the end append.
    pub(crate) fn link(&mut self, id: NodeId, parent: NodeId, index: usize) {
        let Some(p) = self.get_mut(parent) else {
            return;
        };
        if index < p.children.len() {
            p.children.insert(index, id);
        } else {
            p.children.push(id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = Some(parent);
        }
    }

    pub(crate) fn unlink(&mut self, id: NodeId) {
        let Some(parent) = self.parent_of(id) else {
            return;
        };
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|c| *c != id);
        }
        if let Some(n) = self.get_mut(id) {
            n.parent = None;
        }
    }

    /// `id` followed by its ancestors, nearest first.
    pub(crate) fn ancestors_inclusive(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        core::iter::successors(self.is_alive(id).then_some(id), |&n| self.parent_of(n))
    }

    /// Whether `ancestor` is `id` or one of its ancestors.
    pub(crate) fn is_ancestor_or_self(&self, ancestor: NodeId, id: NodeId) -> bool {
        self.ancestors_inclusive(id).any(|n| n == ancestor)
    }

    /// `id` and all its descendants in pre-order.
    pub(crate) fn subtree(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            if !self.is_alive(n) {
                continue;
            }
            out.push(n);
            stack.extend(self.children_of(n).iter().rev().copied());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use understory_graphics::Graphics;

    fn sprite(tree: &mut Tree) -> NodeId {
        tree.insert(Content::Sprite(Graphics::new()))
    }

    #[test]
    fn liveness_insert_remove_reuse() {
        let mut tree = Tree::default();
        let root = sprite(&mut tree);
        let a = sprite(&mut tree);
        tree.link(a, root, usize::MAX);
        assert!(tree.is_alive(a));

        tree.unlink(a);
        assert_eq!(tree.remove_subtree(a), 1);
        assert!(!tree.is_alive(a));

        let b = sprite(&mut tree);
        assert!(tree.is_alive(b));
        assert!(!tree.is_alive(a));
        if a.0 == b.0 {
            assert!(b.1 > a.1, "generation must increase on reuse");
        }
    }

    #[test]
    fn link_inserts_at_index_or_appends() {
        let mut tree = Tree::default();
        let root = sprite(&mut tree);
        let [a, b, c] = [sprite(&mut tree), sprite(&mut tree), sprite(&mut tree)];
        tree.link(a, root, 0);
        tree.link(b, root, 9);
        tree.link(c, root, 1);
        assert_eq!(tree.children_of(root), &[a, c, b]);
        assert_eq!(tree.parent_of(c), Some(root));
    }

    #[test]
    fn subtree_is_preorder_and_removal_is_recursive() {
        let mut tree = Tree::default();
        let root = sprite(&mut tree);
        let a = sprite(&mut tree);
        let a1 = sprite(&mut tree);
        let b = sprite(&mut tree);
        tree.link(a, root, usize::MAX);
        tree.link(a1, a, usize::MAX);
        tree.link(b, root, usize::MAX);

        assert_eq!(tree.subtree(root), vec![root, a, a1, b]);
        assert!(tree.is_ancestor_or_self(root, a1));
        assert!(!tree.is_ancestor_or_self(b, a1));

        tree.unlink(a);
        assert_eq!(tree.remove_subtree(a), 2);
        assert!(!tree.is_alive(a1));
        assert_eq!(tree.children_of(root), &[b]);
    }
}
