// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-node state stored in the arena.

use kurbo::{Point, Rect};
use understory_event::EventDispatcher;
use understory_graphics::Graphics;

use crate::bitmap::BitmapData;
use crate::loader::LoaderInfo;
use crate::stage::Stage;
use crate::surface::Surface;
use crate::types::{NodeFlags, NodeId, NodeKind};

/// Position, scale, rotation and opacity of a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Transform {
    pub(crate) x: f64,
    pub(crate) y: f64,
    pub(crate) scale_x: f64,
    pub(crate) scale_y: f64,
    /// Degrees.
    pub(crate) rotation: f64,
    pub(crate) alpha: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
            alpha: 1.0,
        }
    }
}

/// What a node paints.
#[derive(Debug)]
pub(crate) enum Content {
    Stage,
    Sprite(Graphics),
    Shape(Graphics),
    Bitmap(Option<BitmapData>),
    Loader(LoaderInfo),
}

impl Content {
    pub(crate) fn kind(&self) -> NodeKind {
        match self {
            Self::Stage => NodeKind::Stage,
            Self::Sprite(_) => NodeKind::Sprite,
            Self::Shape(_) => NodeKind::Shape,
            Self::Bitmap(_) => NodeKind::Bitmap,
            Self::Loader(_) => NodeKind::Loader,
        }
    }

    pub(crate) fn graphics(&self) -> Option<&Graphics> {
        match self {
            Self::Sprite(g) | Self::Shape(g) => Some(g),
            _ => None,
        }
    }

    pub(crate) fn graphics_mut(&mut self) -> Option<&mut Graphics> {
        match self {
            Self::Sprite(g) | Self::Shape(g) => Some(g),
            _ => None,
        }
    }

    /// Extent of the node's own content, ignoring children.
    ///
    /// `visual` selects stroke-inclusive bounds over the geometric rectangle.
    pub(crate) fn extent(&self, visual: bool) -> Option<Rect> {
        match self {
            Self::Sprite(g) | Self::Shape(g) if g.has_geometry() => {
                Some(if visual { g.bounds() } else { g.rect() })
            }
            Self::Bitmap(Some(data)) => Some(data.rect()),
            _ => None,
        }
    }
}

/// Rasterized content and where it sits in local space.
#[derive(Debug)]
pub(crate) struct Cache {
    pub(crate) surface: Box<dyn Surface>,
    pub(crate) origin: Point,
}

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) generation: u32,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) name: Option<String>,
    pub(crate) transform: Transform,
    pub(crate) flags: NodeFlags,
    pub(crate) mask: Option<NodeId>,
    pub(crate) scroll_rect: Option<Rect>,
    pub(crate) content: Content,
    pub(crate) cache: Option<Cache>,
    pub(crate) listeners: EventDispatcher<Stage, NodeId>,
}

impl Node {
    pub(crate) fn new(generation: u32, content: Content) -> Self {
        Self {
            generation,
            parent: None,
            children: Vec::new(),
            name: None,
            transform: Transform::default(),
            flags: NodeFlags::default(),
            mask: None,
            scroll_rect: None,
            content,
            cache: None,
            listeners: EventDispatcher::new(),
        }
    }

    pub(crate) fn kind(&self) -> NodeKind {
        self.content.kind()
    }

    pub(crate) fn is_visible(&self) -> bool {
        self.flags.contains(NodeFlags::VISIBLE)
    }

    /// Drop the rasterized content so it is rebuilt on the next paint.
    pub(crate) fn invalidate_cache(&mut self) {
        self.cache = None;
    }
}
