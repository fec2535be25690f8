// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the display tree: node identifiers, flags, kinds, and stage configuration.

/// Identifier for a node in the display tree (generational).
///
/// Ids of destroyed nodes stay distinguishable from ids handed out later for
/// the same slot, so a stale id is reported instead of silently aliasing.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

bitflags::bitflags! {
    /// Per-node boolean state.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Node and its subtree are painted.
        const VISIBLE         = 0b0000_0001;
        /// Own content is rasterized once and reused.
        const CACHE_AS_BITMAP = 0b0000_0010;
        /// Node receives pointer events.
        const MOUSE_ENABLED   = 0b0000_0100;
        /// Descendants may receive pointer events.
        const MOUSE_CHILDREN  = 0b0000_1000;
        /// The pointer was inside the node at the last move.
        const POINTER_INSIDE  = 0b0001_0000;
    }
}

impl Default for NodeFlags {
    fn default() -> Self {
        Self::VISIBLE | Self::MOUSE_ENABLED | Self::MOUSE_CHILDREN
    }
}

/// What a node is.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The tree root.
    Stage,
    /// Container with its own vector graphics.
    Sprite,
    /// Leaf with vector graphics.
    Shape,
    /// Leaf showing pixel data.
    Bitmap,
    /// Container holding at most the content it loaded.
    Loader,
}

impl NodeKind {
    /// Whether nodes of this kind hold an ordered child list.
    pub const fn is_container(self) -> bool {
        matches!(self, Self::Stage | Self::Sprite | Self::Loader)
    }

    /// Whether nodes of this kind take part in pointer routing.
    pub const fn is_interactive(self) -> bool {
        self.is_container()
    }
}

/// Stage construction parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StageConfig {
    /// Drawing area width in pixels.
    pub width: u32,
    /// Drawing area height in pixels.
    pub height: u32,
    /// Frames per second, clamped to `0.01..=1000.0`.
    pub frame_rate: f64,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            width: 550,
            height: 400,
            frame_rate: 24.0,
        }
    }
}
