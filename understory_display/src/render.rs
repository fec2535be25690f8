// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The render cycle.
//!
//! A cycle walks the tree from the root. Each node is bracketed by a
//! `save`/`restore` pair on the surface. Inside the bracket the node gets its
//! `enterFrame` event, establishes its transform, scroll window and mask clip,
//! lets its children do the same, and finally paints its own content on top
//! of that environment.

use kurbo::{Point, Rect};
use smallvec::SmallVec;
use tracing::{debug, trace};
use understory_event::{EventPayload, EventType};

use crate::node::{Cache, Content, Node};
use crate::stage::Stage;
use crate::surface::{Surface, replay};
use crate::tree::Tree;
use crate::types::{NodeFlags, NodeId};

/// Nodes whose mask clip is being built, innermost last.
type MaskChain = SmallVec<[NodeId; 4]>;

impl Stage {
    /// Run one full cycle: clear, walk and paint the tree, then `render`.
    pub(crate) fn render_frame(&mut self) {
        self.frame_count += 1;
        let frame = self.frame_count;
        trace!(frame, "frame start");

        let area = Rect::new(
            0.0,
            0.0,
            f64::from(self.stage_width()),
            f64::from(self.stage_height()),
        );
        self.surface.clear_rect(area);
        self.visit(self.root, true, 1.0);
        self.notify(self.root, EventType::RENDER, EventPayload::None);

        trace!(frame, "frame end");
    }

    /// `alpha` is the opacity composed from the ancestors of `id`.
    fn visit(&mut self, id: NodeId, paint: bool, alpha: f64) {
        self.surface.save();
        self.notify(id, EventType::ENTER_FRAME, EventPayload::None);

        let Some(node) = self.tree.get(id) else {
            trace!(?id, "node destroyed by its enterFrame listener");
            self.surface.restore();
            return;
        };
        let paint = paint && node.is_visible();
        let own = paint && id != self.root;

        let alpha = if own {
            let Self { tree, surface, .. } = self;
            establish(tree, &mut **surface, id, alpha, false, &mut MaskChain::new())
        } else {
            alpha
        };

        // Listeners may reshape the child list while we walk it.
        let children = self.tree.children_of(id).to_vec();
        for child in children {
            if self.tree.parent_of(child) == Some(id) {
                self.visit(child, paint, alpha);
            }
        }

        if own {
            let Self { tree, surface, .. } = self;
            if let Some(node) = tree.get_mut(id) {
                paint_node(node, &mut **surface);
            }
        }
        self.surface.restore();
    }
}

/// Apply the transform, alpha, scroll window and mask clip of `id`, and
/// return the alpha its children inherit.
///
/// The node's alpha is multiplied into `inherited`. In `hidden` mode it is
/// forced to zero; that mode only builds the path a mask clips to. `chain`
/// holds the nodes whose masks are being built so that mask cycles end.
fn establish(
    tree: &Tree,
    surface: &mut dyn Surface,
    id: NodeId,
    inherited: f64,
    hidden: bool,
    chain: &mut MaskChain,
) -> f64 {
    let Some(node) = tree.get(id) else {
        return inherited;
    };
    let t = node.transform;
    surface.scale(t.scale_x, t.scale_y);
    surface.translate(t.x, t.y);
    surface.rotate(t.rotation.to_radians());
    let alpha = if hidden { 0.0 } else { inherited * t.alpha };
    surface.set_global_alpha(alpha);

    let mask = node
        .mask
        .filter(|m| tree.is_alive(*m) && *m != id && !chain.contains(m));

    if let Some(window) = node.scroll_rect {
        surface.save();
        surface.set_global_alpha(0.0);
        surface.begin_path();
        surface.rect(Rect::from_origin_size(Point::ORIGIN, window.size()));
        surface.restore();
        // A mask clip replaces the window clip.
        if mask.is_none() {
            surface.clip();
        }
        surface.translate(-window.x0, -window.y0);
    }

    if let Some(mask) = mask {
        chain.push(id);
        surface.save();
        establish(tree, surface, mask, 0.0, true, chain);
        surface.begin_path();
        if let Some(mask_node) = tree.get(mask) {
            mask_path(&mask_node.content, surface);
        }
        surface.restore();
        surface.clip();
        chain.pop();
    }
    alpha
}

/// Lay down the path of a mask's content without visible output.
fn mask_path(content: &Content, surface: &mut dyn Surface) {
    match content {
        Content::Bitmap(Some(data)) if !data.is_empty() => surface.rect(data.rect()),
        _ => paint_content(content, surface),
    }
}

fn paint_node(node: &mut Node, surface: &mut dyn Surface) {
    if node.flags.contains(NodeFlags::CACHE_AS_BITMAP) {
        paint_cached(node, surface);
    } else {
        paint_content(&node.content, surface);
    }
}

fn paint_content(content: &Content, surface: &mut dyn Surface) {
    match content {
        Content::Sprite(g) | Content::Shape(g) => replay(g.commands(), surface),
        Content::Bitmap(Some(data)) if data.is_empty() => trace!("skipping zero-sized image"),
        Content::Bitmap(Some(data)) => surface.draw_image(data, Point::ORIGIN),
        Content::Bitmap(None) | Content::Stage | Content::Loader(_) => {}
    }
}

/// Blit the node's cache, building it first if needed.
fn paint_cached(node: &mut Node, surface: &mut dyn Surface) {
    if node.cache.is_none() {
        let Some(bounds) = node.content.extent(true) else {
            return;
        };
        let size = bounds.size().ceil();
        if size.width < 1.0 || size.height < 1.0 {
            trace!(?bounds, "skipping zero-sized cache");
            return;
        }
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "Sizes are positive and rounded up to whole pixels."
        )]
        let (width, height) = (size.width as u32, size.height as u32);
        let mut offscreen = surface.create_offscreen(width, height);
        offscreen.translate(-bounds.x0, -bounds.y0);
        paint_content(&node.content, &mut *offscreen);
        debug!(width, height, "built bitmap cache");
        node.cache = Some(Cache {
            surface: offscreen,
            origin: bounds.origin(),
        });
    }
    if let Some(cache) = &node.cache {
        surface.draw_surface(&*cache.surface, cache.origin);
    }
}
