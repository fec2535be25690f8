// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Stage`]: display tree owner, event host and frame driver.

use std::fmt;
use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, trace};
use understory_event::{Event, EventPayload, EventType, ListenerId, Outcome, dispatcher};
use understory_graphics::Graphics;

use crate::bitmap::BitmapData;
use crate::clock::FrameClock;
use crate::error::{DisplayError, Result};
use crate::loader::LoaderInfo;
use crate::node::{Content, Node};
use crate::surface::Surface;
use crate::tree::Tree;
use crate::types::{NodeId, NodeKind, StageConfig};

/// Root of a display tree and driver of its render loop.
///
/// The stage owns every node. Nodes are addressed by [`NodeId`], created
/// detached with the `create_*` methods and attached with
/// [`add_child`](Self::add_child). Only nodes reachable from
/// [`root`](Self::root) are painted.
///
/// Listeners receive `&mut Stage`, so they may restructure the tree, change
/// properties, or even force a nested [`invalidate`](Self::invalidate).
///
/// ## Example
///
/// ```rust
/// use understory_display::{RecordingSurface, Stage, StageConfig};
/// use understory_graphics::Paint;
///
/// let mut stage = Stage::new(StageConfig::default(), RecordingSurface::new(550, 400));
/// let shape = stage.create_shape();
/// let g = stage.graphics_mut(shape).unwrap();
/// g.begin_fill(0xFF0000, 1.0);
/// g.draw_rect(0.0, 0.0, 10.0, 10.0);
/// g.end_fill();
/// stage.add_child(stage.root(), shape).unwrap();
///
/// stage.invalidate();
///
/// let surface = stage.surface_as::<RecordingSurface>().unwrap();
/// let fill = surface.fills().next().unwrap();
/// let Paint::Color(color) = &fill.paint else {
///     panic!("expected a solid fill");
/// };
/// assert_eq!(color.to_string(), "rgba(255,0,0,1)");
/// ```
pub struct Stage {
    pub(crate) tree: Tree,
    pub(crate) root: NodeId,
    width: u32,
    height: u32,
    clock: FrameClock,
    pub(crate) surface: Box<dyn Surface>,
    /// Non-zero while children are being reshuffled.
    pub(crate) suppress_notifications: u32,
    pub(crate) frame_count: u64,
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("root", &self.root)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("clock", &self.clock)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Create a stage painting onto `surface`.
    pub fn new(config: StageConfig, surface: impl Surface) -> Self {
        let mut tree = Tree::default();
        let root = tree.insert(Content::Stage);
        let clock = FrameClock::new(config.frame_rate);
        debug!(
            width = config.width,
            height = config.height,
            frame_rate = clock.rate(),
            "stage created"
        );
        Self {
            tree,
            root,
            width: config.width,
            height: config.height,
            clock,
            surface: Box::new(surface),
            suppress_notifications: 0,
            frame_count: 0,
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Drawing area width.
    pub fn stage_width(&self) -> u32 {
        self.width
    }

    /// Drawing area height.
    pub fn stage_height(&self) -> u32 {
        self.height
    }

    /// Frames per second.
    pub fn frame_rate(&self) -> f64 {
        self.clock.rate()
    }

    /// Change the frame rate; it is clamped to `0.01..=1000.0` and the pending
    /// frame deadline is rescheduled. Returns the rate actually applied.
    pub fn set_frame_rate(&mut self, rate: f64) -> f64 {
        let applied = self.clock.set_rate(rate);
        debug!(requested = rate, applied, "frame rate changed");
        applied
    }

    /// Frame pacing state.
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Number of completed render cycles.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// The drawing surface.
    pub fn surface(&self) -> &dyn Surface {
        &*self.surface
    }

    /// The drawing surface as its concrete type.
    pub fn surface_as<T: Surface>(&self) -> Option<&T> {
        self.surface.as_any().downcast_ref()
    }

    /// Swap in another drawing surface, returning the previous one.
    pub fn replace_surface(&mut self, surface: impl Surface) -> Box<dyn Surface> {
        core::mem::replace(&mut self.surface, Box::new(surface))
    }

    /// Run a render cycle if one is due at `now`. Returns whether a frame ran.
    pub fn advance(&mut self, now: Instant) -> bool {
        if self.clock.poll(now) {
            self.render_frame();
            true
        } else {
            false
        }
    }

    /// Run a full render cycle right away, outside the frame schedule.
    ///
    /// The root receives `invalidate` before the cycle starts. Safe to call
    /// from a listener during a cycle; the nested cycle completes before the
    /// outer one resumes.
    pub fn invalidate(&mut self) {
        self.notify(self.root, EventType::INVALIDATE, EventPayload::None);
        self.render_frame();
    }

    // --- nodes ---

    /// Create a detached sprite: a container with its own graphics.
    pub fn create_sprite(&mut self) -> NodeId {
        self.tree.insert(Content::Sprite(Graphics::new()))
    }

    /// Create a detached shape: a leaf with graphics.
    pub fn create_shape(&mut self) -> NodeId {
        self.tree.insert(Content::Shape(Graphics::new()))
    }

    /// Create a detached bitmap node.
    pub fn create_bitmap(&mut self, data: Option<BitmapData>) -> NodeId {
        self.tree.insert(Content::Bitmap(data))
    }

    /// Create a detached loader.
    pub fn create_loader(&mut self) -> NodeId {
        self.tree.insert(Content::Loader(LoaderInfo::default()))
    }

    /// Detach `id` from its parent and free it with its whole subtree.
    ///
    /// Ids of destroyed nodes become stale; masks that referred to them are
    /// ignored from then on.
    pub fn destroy(&mut self, id: NodeId) -> Result<()> {
        if id == self.root {
            return Err(DisplayError::StageOperation);
        }
        self.check_alive(id)?;
        if let Some(parent) = self.tree.parent_of(id) {
            self.detach(parent, id);
        }
        // A removal listener may have re-parented it.
        self.tree.unlink(id);
        let removed = self.tree.remove_subtree(id);
        trace!(?id, removed, "destroyed subtree");
        Ok(())
    }

    /// Whether `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.tree.is_alive(id)
    }

    /// What kind of node `id` is.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.tree.get(id).map(Node::kind)
    }

    // --- events ---

    /// Register a listener on `id` for events named `kind`.
    pub fn add_event_listener(
        &mut self,
        id: NodeId,
        kind: EventType,
        listener: impl Fn(&mut Self, &Event<NodeId>) -> Outcome + 'static,
    ) -> Result<ListenerId> {
        let node = self.node_mut(id)?;
        Ok(node.listeners.add_listener(kind, Rc::new(listener)))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn remove_event_listener(&mut self, id: NodeId, kind: &EventType, listener: ListenerId) -> bool {
        self.tree
            .get_mut(id)
            .is_some_and(|n| n.listeners.remove_listener(kind, listener))
    }

    /// Whether `id` itself listens for `kind`.
    pub fn has_event_listener(&self, id: NodeId, kind: &EventType) -> bool {
        self.tree.get(id).is_some_and(|n| n.listeners.has_listener(kind))
    }

    /// Whether `id` or any of its ancestors listens for `kind`.
    pub fn will_trigger(&self, id: NodeId, kind: &EventType) -> bool {
        self.tree
            .ancestors_inclusive(id)
            .any(|n| self.has_event_listener(n, kind))
    }

    /// Deliver `event` to the listeners of `event.target`, in registration order.
    ///
    /// Returns the index of the listener that stopped delivery, if any.
    pub fn dispatch_event(&mut self, event: Event<NodeId>) -> Result<Option<usize>> {
        self.check_alive(event.target)?;
        Ok(self.deliver(&event))
    }

    pub(crate) fn notify(&mut self, target: NodeId, kind: EventType, payload: EventPayload) {
        if self.has_event_listener(target, &kind) {
            self.deliver(&Event::new(kind, target).with_payload(payload));
        }
    }

    fn deliver(&mut self, event: &Event<NodeId>) -> Option<usize> {
        let listeners = self.tree.get(event.target)?.listeners.snapshot(&event.kind);
        if listeners.is_empty() {
            return None;
        }
        let stopped = dispatcher::run(&listeners, self, event);
        if let Some(index) = stopped {
            trace!(target = ?event.target, kind = %event.kind, index, "listener stopped delivery");
        }
        stopped
    }

    // --- internals ---

    pub(crate) fn check_alive(&self, id: NodeId) -> Result<()> {
        if self.tree.is_alive(id) {
            Ok(())
        } else {
            Err(DisplayError::StaleNode(id))
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> Result<&Node> {
        self.tree.get(id).ok_or(DisplayError::StaleNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.tree.get_mut(id).ok_or(DisplayError::StaleNode(id))
    }
}
