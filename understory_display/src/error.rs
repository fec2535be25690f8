// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

use crate::types::NodeId;

/// Coarse classification of a [`DisplayError`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// An argument does not have the capability the operation needs.
    InvalidArgument,
    /// The operation is not allowed on this node or in this configuration.
    InvalidOperation,
    /// A looked-up node is not where it was expected.
    NotFound,
    /// An index is outside the valid range.
    OutOfRange,
}

/// Errors raised by display tree operations.
///
/// Every error aborts the operation that raised it before any state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DisplayError {
    /// The id does not refer to a live node.
    #[error("node {0:?} has been destroyed")]
    StaleNode(NodeId),

    /// Transform and visual attributes of the stage are fixed.
    #[error("the requested operation cannot be performed on the stage")]
    StageOperation,

    /// The stage is always the root and never a child.
    #[error("the stage cannot be added as a child")]
    StageAsChild,

    /// Only containers have children.
    #[error("node {0:?} is not a container")]
    NotAContainer(NodeId),

    /// Parenting would create a cycle.
    #[error("node {child:?} cannot be added to itself or to one of its descendants ({parent:?})")]
    CyclicParent {
        /// Container that was asked to adopt.
        parent: NodeId,
        /// Node that would have been adopted.
        child: NodeId,
    },

    /// A node cannot mask itself.
    #[error("node {0:?} cannot be its own mask")]
    SelfMask(NodeId),

    /// The generic child API is closed on loaders.
    #[error("a loader can only have one child, the content it loads")]
    LoaderChild,

    /// The node is not a direct child of the container.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild {
        /// Container that was searched.
        parent: NodeId,
        /// Node that was looked for.
        child: NodeId,
    },

    /// Child index out of bounds.
    #[error("child index {index} is out of range for {len} children")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of children.
        len: usize,
    },

    /// The operation needs a loader node.
    #[error("node {0:?} is not a loader")]
    NotALoader(NodeId),

    /// The operation needs a bitmap node.
    #[error("node {0:?} is not a bitmap")]
    NotABitmap(NodeId),
}

impl DisplayError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::StaleNode(_)
            | Self::StageAsChild
            | Self::NotAContainer(_)
            | Self::NotALoader(_)
            | Self::NotABitmap(_) => ErrorKind::InvalidArgument,
            Self::StageOperation
            | Self::CyclicParent { .. }
            | Self::SelfMask(_)
            | Self::LoaderChild => ErrorKind::InvalidOperation,
            Self::NotAChild { .. } => ErrorKind::NotFound,
            Self::IndexOutOfRange { .. } => ErrorKind::OutOfRange,
        }
    }
}

/// Result alias for display tree operations.
pub type Result<T, E = DisplayError> = core::result::Result<T, E>;
