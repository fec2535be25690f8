// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;

/// Name of an event, such as `"enterFrame"`.
///
/// Well-known names are provided as associated constants; any other name can
/// be built with [`EventType::new`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventType(Cow<'static, str>);

impl EventType {
    /// Dispatched to every node at the start of each frame, before painting.
    pub const ENTER_FRAME: Self = Self::from_static("enterFrame");
    /// Dispatched to the stage once per frame after painting.
    pub const RENDER: Self = Self::from_static("render");
    /// A node (or an ancestor) became attached to the stage.
    pub const ADDED_TO_STAGE: Self = Self::from_static("addedToStage");
    /// A node (or an ancestor) was detached from the stage.
    pub const REMOVED_FROM_STAGE: Self = Self::from_static("removedFromStage");
    /// A load finished.
    pub const COMPLETE: Self = Self::from_static("complete");
    /// A load started.
    pub const OPEN: Self = Self::from_static("open");
    /// A load made progress.
    pub const PROGRESS: Self = Self::from_static("progress");
    /// A load failed.
    pub const IO_ERROR: Self = Self::from_static("ioError");
    /// A forced redraw was requested.
    pub const INVALIDATE: Self = Self::from_static("invalidate");
    /// The pointer moved over a node.
    pub const MOUSE_MOVE: Self = Self::from_static("mouseMove");
    /// The pointer entered a node.
    pub const MOUSE_OVER: Self = Self::from_static("mouseOver");
    /// The pointer left a node.
    pub const MOUSE_OUT: Self = Self::from_static("mouseOut");
    /// Primary button click.
    pub const CLICK: Self = Self::from_static("click");
    /// Primary button double click.
    pub const DOUBLE_CLICK: Self = Self::from_static("doubleClick");

    const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// An event type with a custom name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The event name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Extra data carried by an [`Event`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EventPayload {
    /// No extra data.
    #[default]
    None,
    /// Load progress in bytes.
    Progress {
        /// Bytes received so far.
        loaded: u64,
        /// Expected total, `0` if unknown.
        total: u64,
    },
    /// Human-readable failure description.
    Error(String),
    /// Pointer position in stage and target-local coordinates.
    Pointer {
        /// Stage x.
        stage_x: f64,
        /// Stage y.
        stage_y: f64,
        /// Target-local x.
        local_x: f64,
        /// Target-local y.
        local_y: f64,
    },
}

/// An event delivered to the listeners of one target.
#[derive(Clone, Debug, PartialEq)]
pub struct Event<K> {
    /// Event name.
    pub kind: EventType,
    /// Node the event is delivered to.
    pub target: K,
    /// Extra data.
    pub payload: EventPayload,
}

impl<K> Event<K> {
    /// An event without payload.
    pub fn new(kind: EventType, target: K) -> Self {
        Self {
            kind,
            target,
            payload: EventPayload::None,
        }
    }

    /// Attach a payload.
    #[must_use]
    pub fn with_payload(mut self, payload: EventPayload) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn custom_types_compare_with_constants() {
        assert_eq!(EventType::new("enterFrame"), EventType::ENTER_FRAME);
        assert_eq!(
            EventType::new(String::from("ioError")),
            EventType::IO_ERROR
        );
        assert_eq!(EventType::DOUBLE_CLICK.to_string(), "doubleClick");
    }

    #[test]
    fn payload_defaults_to_none() {
        let ev = Event::new(EventType::PROGRESS, 3_u32);
        assert_eq!(ev.payload, EventPayload::None);
        let ev = ev.with_payload(EventPayload::Progress {
            loaded: 5,
            total: 10,
        });
        assert!(matches!(ev.payload, EventPayload::Progress { loaded: 5, .. }));
    }
}
