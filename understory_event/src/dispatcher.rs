// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatcher helper: call listeners in order and honor stop outcomes.
//!
//! The dispatcher is deliberately minimal:
//!
//! - [`Outcome`] only controls propagation (`Continue` vs `Stop`).
//! - The return value from [`run`] reports which listener stopped delivery (if any).
//! - Anything richer, such as a "default prevented" flag, belongs on the host
//!   or in the listener's captured state, not in [`Outcome`].
//!
//! ## Semantics
//!
//! - Listeners run in the order given, which is registration order for a
//!   [`snapshot`](crate::EventDispatcher::snapshot).
//! - [`Outcome::Stop`] aborts delivery immediately; later listeners are skipped.
//! - The listener slice is owned by the caller, so listeners may freely
//!   register or remove listeners on the host while delivery is in progress.
//!
//! ## Example
//!
//! ```
//! use std::rc::Rc;
//! use understory_event::{Event, EventType, Listener, Outcome, dispatcher};
//!
//! let seen: Vec<Listener<Vec<u32>, ()>> = vec![
//!     Rc::new(|log: &mut Vec<u32>, _: &Event<()>| { log.push(1); Outcome::Continue }),
//!     Rc::new(|log: &mut Vec<u32>, _: &Event<()>| { log.push(2); Outcome::Stop }),
//!     Rc::new(|log: &mut Vec<u32>, _: &Event<()>| { log.push(3); Outcome::Continue }),
//! ];
//!
//! let mut log = Vec::new();
//! let stopped = dispatcher::run(&seen, &mut log, &Event::new(EventType::CLICK, ()));
//! assert_eq!(stopped, Some(1));
//! assert_eq!(log, vec![1, 2]);
//! ```

use alloc::rc::Rc;

use crate::event::Event;

/// Result of a listener call that controls propagation.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Outcome {
    /// Keep delivering to the remaining listeners.
    #[default]
    Continue,
    /// Stop delivery; remaining listeners are skipped.
    Stop,
}

/// A shared listener callback.
///
/// `H` is the host handed to the listener mutably, `K` the event target key.
pub type Listener<H, K> = Rc<dyn Fn(&mut H, &Event<K>) -> Outcome>;

/// Call `listeners` in order with `host` and `event`.
///
/// Returns `None` if every listener ran, or `Some(i)` with the index of the
/// listener that returned [`Outcome::Stop`].
pub fn run<H, K>(listeners: &[Listener<H, K>], host: &mut H, event: &Event<K>) -> Option<usize> {
    for (i, listener) in listeners.iter().enumerate() {
        match listener(host, event) {
            Outcome::Continue => {}
            Outcome::Stop => return Some(i),
        }
    }
    None
}
