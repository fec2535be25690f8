// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Event: named events, listener registries, and stop-aware dispatch.
//!
//! ## Overview
//!
//! An [`EventDispatcher`] stores listeners keyed by [`EventType`], in
//! registration order. Listeners receive a mutable host (whatever owns the
//! registry, for example a display tree) and the [`Event`] being delivered,
//! and return an [`Outcome`] to keep going or stop propagation.
//!
//! Because a listener gets `&mut` access to the host, and the host usually
//! owns the registry, delivery happens in two steps:
//!
//! 1) Take a [`snapshot`](EventDispatcher::snapshot) of the listeners for
//!    the event type. The snapshot holds cheap clones, so listeners added or
//!    removed during delivery do not disturb the walk.
//! 2) Hand the snapshot to [`dispatcher::run`] together with the host.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use understory_event::{Event, EventDispatcher, EventType, Outcome, dispatcher};
//!
//! #[derive(Default)]
//! struct Host {
//!     frames: u32,
//!     listeners: EventDispatcher<Host, u32>,
//! }
//!
//! let mut host = Host::default();
//! host.listeners.add_listener(
//!     EventType::ENTER_FRAME,
//!     Rc::new(|h: &mut Host, _: &Event<u32>| {
//!         h.frames += 1;
//!         Outcome::Continue
//!     }),
//! );
//!
//! let event = Event::new(EventType::ENTER_FRAME, 7);
//! let listeners = host.listeners.snapshot(&event.kind);
//! assert!(dispatcher::run(&listeners, &mut host, &event).is_none());
//! assert_eq!(host.frames, 1);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod dispatcher;
mod event;
mod registry;

pub use dispatcher::{Listener, Outcome};
pub use event::{Event, EventPayload, EventType};
pub use registry::{EventDispatcher, ListenerId, Snapshot};
