// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bounds, coordinate conversion and hit testing.
//!
//! Only positions are composed across the tree. Rotation and scale of
//! ancestors are not applied to bounds or to converted points, so results
//! are exact only for unrotated, unscaled chains.

use kurbo::{Point, Rect, Vec2};

use crate::error::Result;
use crate::stage::Stage;
use crate::types::NodeId;

impl Stage {
    /// Union of the node's own content and its descendants, in its own space.
    ///
    /// `visual` includes half the stroke width of unfilled geometry.
    /// [`Rect::ZERO`] when nothing in the subtree has an extent.
    pub(crate) fn local_extent(&self, id: NodeId, visual: bool) -> Rect {
        self.subtree_extent(id, visual).unwrap_or(Rect::ZERO)
    }

    fn subtree_extent(&self, id: NodeId, visual: bool) -> Option<Rect> {
        let node = self.tree.get(id)?;
        let mut extent = node.content.extent(visual);
        for &child in &node.children {
            let (Some(child_node), Some(child_extent)) =
                (self.tree.get(child), self.subtree_extent(child, visual))
            else {
                continue;
            };
            let offset = Vec2::new(child_node.transform.x, child_node.transform.y);
            let placed = child_extent + offset;
            extent = Some(extent.map_or(placed, |e| e.union(placed)));
        }
        extent
    }

    fn position(&self, id: NodeId) -> Vec2 {
        self.tree
            .get(id)
            .map_or(Vec2::ZERO, |n| Vec2::new(n.transform.x, n.transform.y))
    }

    /// Area covered by `id` and its descendants, strokes included, expressed
    /// in the space of `target`.
    pub fn get_bounds(&self, id: NodeId, target: NodeId) -> Result<Rect> {
        self.extent_in(id, target, true)
    }

    /// Like [`get_bounds`](Self::get_bounds) but excluding strokes.
    pub fn get_rect(&self, id: NodeId, target: NodeId) -> Result<Rect> {
        self.extent_in(id, target, false)
    }

    fn extent_in(&self, id: NodeId, target: NodeId, visual: bool) -> Result<Rect> {
        let local = self.local_extent(id, visual);
        let global = self.local_to_global(id, local.origin())?;
        let origin = self.global_to_local(target, global)?;
        Ok(Rect::from_origin_size(origin, local.size()))
    }

    /// Convert a point in the space of `id` to stage coordinates.
    pub fn local_to_global(&self, id: NodeId, point: Point) -> Result<Point> {
        self.check_alive(id)?;
        Ok(self
            .tree
            .ancestors_inclusive(id)
            .fold(point, |p, n| p + self.position(n)))
    }

    /// Convert a point in stage coordinates to the space of `id`.
    pub fn global_to_local(&self, id: NodeId, point: Point) -> Result<Point> {
        self.check_alive(id)?;
        Ok(self
            .tree
            .ancestors_inclusive(id)
            .fold(point, |p, n| p - self.position(n)))
    }

    /// Whether the bounding boxes of `id` and `other` touch or overlap.
    pub fn hit_test_object(&self, id: NodeId, other: NodeId) -> Result<bool> {
        let a = self.get_bounds(id, id)?;
        let b = self.get_bounds(other, id)?;
        Ok(a.x0 <= b.x1 && b.x0 <= a.x1 && a.y0 <= b.y1 && b.y0 <= a.y1)
    }

    /// Whether the stage point `point` lies within the bounding box of `id`,
    /// edges included.
    pub fn hit_test_point(&self, id: NodeId, point: Point) -> Result<bool> {
        let local = self.global_to_local(id, point)?;
        let r = self.local_extent(id, true);
        Ok(r.x0 <= local.x && local.x <= r.x1 && r.y0 <= local.y && local.y <= r.y1)
    }
}
