// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node attributes: transform, visibility, masking and content access.
//!
//! Getters return `None` for stale ids. Setters of transform and visual
//! attributes refuse the root with [`DisplayError::StageOperation`].

use kurbo::Rect;
use understory_graphics::{Graphics, clamp_alpha};

use crate::bitmap::BitmapData;
use crate::error::{DisplayError, Result};
use crate::node::{Content, Node, Transform};
use crate::stage::Stage;
use crate::types::{NodeFlags, NodeId};

impl Stage {
    fn transform(&self, id: NodeId) -> Option<&Transform> {
        self.tree.get(id).map(|n| &n.transform)
    }

    /// A non-root node, for attributes the stage does not have.
    fn attributes_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        if id == self.root {
            return Err(DisplayError::StageOperation);
        }
        self.node_mut(id)
    }

    /// Horizontal position in the parent's space.
    pub fn x(&self, id: NodeId) -> Option<f64> {
        self.transform(id).map(|t| t.x)
    }

    /// Set the horizontal position.
    pub fn set_x(&mut self, id: NodeId, x: f64) -> Result<()> {
        self.attributes_mut(id)?.transform.x = x;
        Ok(())
    }

    /// Vertical position in the parent's space.
    pub fn y(&self, id: NodeId) -> Option<f64> {
        self.transform(id).map(|t| t.y)
    }

    /// Set the vertical position.
    pub fn set_y(&mut self, id: NodeId, y: f64) -> Result<()> {
        self.attributes_mut(id)?.transform.y = y;
        Ok(())
    }

    /// Horizontal scale factor.
    pub fn scale_x(&self, id: NodeId) -> Option<f64> {
        self.transform(id).map(|t| t.scale_x)
    }

    /// Set the horizontal scale; negative values become `0`.
    pub fn set_scale_x(&mut self, id: NodeId, scale: f64) -> Result<()> {
        self.attributes_mut(id)?.transform.scale_x = non_negative(scale);
        Ok(())
    }

    /// Vertical scale factor.
    pub fn scale_y(&self, id: NodeId) -> Option<f64> {
        self.transform(id).map(|t| t.scale_y)
    }

    /// Set the vertical scale; negative values become `0`.
    pub fn set_scale_y(&mut self, id: NodeId, scale: f64) -> Result<()> {
        self.attributes_mut(id)?.transform.scale_y = non_negative(scale);
        Ok(())
    }

    /// Rotation in degrees.
    pub fn rotation(&self, id: NodeId) -> Option<f64> {
        self.transform(id).map(|t| t.rotation)
    }

    /// Set the rotation in degrees.
    pub fn set_rotation(&mut self, id: NodeId, degrees: f64) -> Result<()> {
        self.attributes_mut(id)?.transform.rotation = degrees;
        Ok(())
    }

    /// Opacity in `0.0..=1.0`.
    pub fn alpha(&self, id: NodeId) -> Option<f64> {
        self.transform(id).map(|t| t.alpha)
    }

    /// Set the opacity, clamped to `0.0..=1.0`.
    pub fn set_alpha(&mut self, id: NodeId, alpha: f64) -> Result<()> {
        self.attributes_mut(id)?.transform.alpha = clamp_alpha(alpha);
        Ok(())
    }

    /// Whether the node and its subtree are painted.
    pub fn visible(&self, id: NodeId) -> Option<bool> {
        self.tree.get(id).map(Node::is_visible)
    }

    /// Show or hide the node and its subtree.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        self.attributes_mut(id)?
            .flags
            .set(NodeFlags::VISIBLE, visible);
        Ok(())
    }

    /// Scaled width of the node's geometric extent.
    pub fn width(&self, id: NodeId) -> Option<f64> {
        let scale = self.scale_x(id)?;
        Some(self.local_extent(id, false).width() * scale)
    }

    /// Scale the node so its width becomes `width`.
    ///
    /// Negative widths become `0`. A node without extent gets a scale of `1`.
    pub fn set_width(&mut self, id: NodeId, width: f64) -> Result<()> {
        let unscaled = self.local_extent(id, false).width();
        self.attributes_mut(id)?.transform.scale_x = fit_scale(width, unscaled);
        Ok(())
    }

    /// Scaled height of the node's geometric extent.
    pub fn height(&self, id: NodeId) -> Option<f64> {
        let scale = self.scale_y(id)?;
        Some(self.local_extent(id, false).height() * scale)
    }

    /// Scale the node so its height becomes `height`.
    ///
    /// Negative heights become `0`. A node without extent gets a scale of `1`.
    pub fn set_height(&mut self, id: NodeId, height: f64) -> Result<()> {
        let unscaled = self.local_extent(id, false).height();
        self.attributes_mut(id)?.transform.scale_y = fit_scale(height, unscaled);
        Ok(())
    }

    /// The node masking `id`.
    pub fn mask(&self, id: NodeId) -> Option<NodeId> {
        self.tree.get(id).and_then(|n| n.mask)
    }

    /// Clip `id` to the painted shape of `mask`, or remove the mask with `None`.
    ///
    /// Neither `id` nor `mask` may be the root, and a node cannot mask itself.
    pub fn set_mask(&mut self, id: NodeId, mask: Option<NodeId>) -> Result<()> {
        if let Some(mask) = mask {
            if mask == id {
                return Err(DisplayError::SelfMask(id));
            }
            if mask == self.root {
                return Err(DisplayError::StageOperation);
            }
            self.check_alive(mask)?;
        }
        self.attributes_mut(id)?.mask = mask;
        Ok(())
    }

    /// The node's scroll window in local coordinates.
    pub fn scroll_rect(&self, id: NodeId) -> Option<Rect> {
        self.tree.get(id).and_then(|n| n.scroll_rect)
    }

    /// Clip the node to `rect` and shift its content by `-rect.origin()`.
    pub fn set_scroll_rect(&mut self, id: NodeId, rect: Option<Rect>) -> Result<()> {
        self.attributes_mut(id)?.scroll_rect = rect;
        Ok(())
    }

    /// The instance name.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.tree.get(id).and_then(|n| n.name.as_deref())
    }

    /// Set the instance name used by [`get_child_by_name`](Self::get_child_by_name).
    pub fn set_name(&mut self, id: NodeId, name: impl Into<String>) -> Result<()> {
        self.node_mut(id)?.name = Some(name.into());
        Ok(())
    }

    /// Whether the node's own content is rasterized once and reused.
    pub fn cache_as_bitmap(&self, id: NodeId) -> Option<bool> {
        self.tree
            .get(id)
            .map(|n| n.flags.contains(NodeFlags::CACHE_AS_BITMAP))
    }

    /// Enable or disable content caching. Disabling drops the cache.
    pub fn set_cache_as_bitmap(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        let node = self.node_mut(id)?;
        node.flags.set(NodeFlags::CACHE_AS_BITMAP, enabled);
        if !enabled {
            node.invalidate_cache();
        }
        Ok(())
    }

    /// Whether a cache is currently held for the node.
    pub fn is_cached(&self, id: NodeId) -> bool {
        self.tree.get(id).is_some_and(|n| n.cache.is_some())
    }

    /// Whether the node would receive pointer events right now.
    ///
    /// That needs the node's own flag, visibility, and no ancestor with
    /// [`mouse_children`](Self::mouse_children) turned off.
    pub fn mouse_enabled(&self, id: NodeId) -> bool {
        let Some(node) = self.tree.get(id) else {
            return false;
        };
        node.is_visible()
            && node.flags.contains(NodeFlags::MOUSE_ENABLED)
            && self
                .tree
                .ancestors_inclusive(id)
                .skip(1)
                .all(|a| self.mouse_children(a).unwrap_or(true))
    }

    /// Set the node's own pointer flag.
    pub fn set_mouse_enabled(&mut self, id: NodeId, enabled: bool) -> Result<()> {
        self.node_mut(id)?
            .flags
            .set(NodeFlags::MOUSE_ENABLED, enabled);
        Ok(())
    }

    /// Vector content of a sprite or shape.
    pub fn graphics(&self, id: NodeId) -> Option<&Graphics> {
        self.tree.get(id)?.content.graphics()
    }

    /// Vector content for drawing. Drops the node's cache.
    pub fn graphics_mut(&mut self, id: NodeId) -> Option<&mut Graphics> {
        let node = self.tree.get_mut(id)?;
        node.invalidate_cache();
        node.content.graphics_mut()
    }

    /// Pixel content of a bitmap node.
    pub fn bitmap_data(&self, id: NodeId) -> Option<&BitmapData> {
        match &self.tree.get(id)?.content {
            Content::Bitmap(data) => data.as_ref(),
            _ => None,
        }
    }

    /// Pixel content for editing. Drops the node's cache.
    pub fn bitmap_data_mut(&mut self, id: NodeId) -> Option<&mut BitmapData> {
        let node = self.tree.get_mut(id)?;
        node.invalidate_cache();
        match &mut node.content {
            Content::Bitmap(data) => data.as_mut(),
            _ => None,
        }
    }

    /// Replace the pixel content of a bitmap node. Drops the node's cache.
    pub fn set_bitmap_data(&mut self, id: NodeId, data: Option<BitmapData>) -> Result<()> {
        let node = self.node_mut(id)?;
        let Content::Bitmap(slot) = &mut node.content else {
            return Err(DisplayError::NotABitmap(id));
        };
        *slot = data;
        node.invalidate_cache();
        Ok(())
    }
}

fn non_negative(value: f64) -> f64 {
    if value < 0.0 { 0.0 } else { value }
}

fn fit_scale(target: f64, unscaled: f64) -> f64 {
    if unscaled == 0.0 {
        1.0
    } else {
        non_negative(target) / unscaled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::stage::tests::stage;

    #[test]
    fn root_attributes_are_fixed() {
        let mut stage = stage();
        let root = stage.root();
        for result in [
            stage.set_x(root, 1.0),
            stage.set_alpha(root, 0.5),
            stage.set_visible(root, false),
            stage.set_scale_y(root, 2.0),
            stage.set_scroll_rect(root, Some(Rect::ZERO)),
        ] {
            assert_eq!(result, Err(DisplayError::StageOperation));
        }
        assert_eq!(stage.x(root), Some(0.0));
        assert_eq!(stage.visible(root), Some(true));
    }

    #[test]
    fn self_mask_fails_without_mutation() {
        let mut stage = stage();
        let shape = stage.create_shape();
        let other = stage.create_shape();
        stage.set_mask(shape, Some(other)).unwrap();

        let err = stage.set_mask(shape, Some(shape)).unwrap_err();
        assert_eq!(err, DisplayError::SelfMask(shape));
        assert_eq!(err.kind(), ErrorKind::InvalidOperation);
        assert_eq!(stage.mask(shape), Some(other));

        let root = stage.root();
        assert_eq!(
            stage.set_mask(shape, Some(root)),
            Err(DisplayError::StageOperation)
        );
        stage.set_mask(shape, None).unwrap();
        assert_eq!(stage.mask(shape), None);
    }

    #[test]
    fn values_are_clamped() {
        let mut stage = stage();
        let s = stage.create_sprite();
        stage.set_alpha(s, 3.0).unwrap();
        stage.set_scale_x(s, -2.0).unwrap();
        assert_eq!(stage.alpha(s), Some(1.0));
        assert_eq!(stage.scale_x(s), Some(0.0));
    }

    #[test]
    fn width_and_height_set_scale() {
        let mut stage = stage();
        let shape = stage.create_shape();

        // No extent yet.
        stage.set_width(shape, 50.0).unwrap();
        assert_eq!(stage.scale_x(shape), Some(1.0));

        stage
            .graphics_mut(shape)
            .unwrap()
            .draw_rect(0.0, 0.0, 20.0, 10.0);
        stage.set_width(shape, 50.0).unwrap();
        stage.set_height(shape, -4.0).unwrap();
        assert_eq!(stage.scale_x(shape), Some(2.5));
        assert_eq!(stage.width(shape), Some(50.0));
        assert_eq!(stage.scale_y(shape), Some(0.0));
        assert_eq!(stage.height(shape), Some(0.0));
    }

    #[test]
    fn mouse_enabled_respects_ancestors() {
        let mut stage = stage();
        let parent = stage.create_sprite();
        let child = stage.create_shape();
        stage.add_child(parent, child).unwrap();
        assert!(stage.mouse_enabled(child));

        stage.set_mouse_children(parent, false).unwrap();
        assert!(!stage.mouse_enabled(child));
        assert!(stage.mouse_enabled(parent));

        stage.set_mouse_children(parent, true).unwrap();
        stage.set_visible(child, false).unwrap();
        assert!(!stage.mouse_enabled(child));
        assert_eq!(
            stage.set_mouse_children(child, false),
            Err(DisplayError::NotAContainer(child))
        );
    }

    #[test]
    fn bitmap_data_is_only_for_bitmaps() {
        let mut stage = stage();
        let bitmap = stage.create_bitmap(None);
        let shape = stage.create_shape();
        assert!(stage.bitmap_data(bitmap).is_none());
        stage
            .set_bitmap_data(bitmap, Some(BitmapData::new(2, 2, true, 0)))
            .unwrap();
        assert_eq!(stage.bitmap_data(bitmap).map(BitmapData::width), Some(2));
        assert_eq!(
            stage.set_bitmap_data(shape, None),
            Err(DisplayError::NotABitmap(shape))
        );
    }
}
