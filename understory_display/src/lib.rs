// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Display: a retained display tree painted frame by frame onto an
//! immediate-mode 2D surface.
//!
//! ## Overview
//!
//! A [`Stage`] owns an arena of nodes addressed by [`NodeId`]. Nodes come in
//! a few [kinds](NodeKind):
//!
//! - sprites are containers with their own vector [`Graphics`](understory_graphics::Graphics),
//! - shapes are leaves with vector graphics,
//! - bitmaps show a [`BitmapData`] pixel buffer,
//! - loaders hold the content a host fetched for them (see [`LoaderInfo`]),
//! - and the stage root itself.
//!
//! Each node carries a position, scale, rotation and alpha relative to its
//! parent, plus visibility, an optional mask node, an optional scroll window
//! and a cache-as-bitmap switch.
//!
//! A render cycle ([`Stage::invalidate`], or [`Stage::advance`] when the
//! [`FrameClock`] says a frame is due) walks the tree from the root. Every
//! node first receives `enterFrame`, then its children are visited back to
//! front, then its own content is replayed onto the [`Surface`]. The stage
//! root receives `render` once the tree is painted.
//!
//! Listeners are plain closures receiving `&mut Stage`; they may restructure
//! the tree or trigger a nested cycle while a cycle is running.
//!
//! [`RecordingSurface`] is a headless surface that records every call. It is
//! what the tests and examples paint into.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_display::{RecordingSurface, Stage, StageConfig};
//! use understory_event::{EventType, Outcome};
//!
//! let mut stage = Stage::new(StageConfig::default(), RecordingSurface::new(550, 400));
//! let ball = stage.create_sprite();
//! let g = stage.graphics_mut(ball).unwrap();
//! g.begin_fill(0x3366CC, 1.0);
//! g.draw_circle(0.0, 0.0, 10.0);
//! g.end_fill();
//! stage.add_child(stage.root(), ball).unwrap();
//!
//! // Move right by one pixel per frame.
//! stage
//!     .add_event_listener(ball, EventType::ENTER_FRAME, |stage, e| {
//!         let x = stage.x(e.target).unwrap_or_default();
//!         stage.set_x(e.target, x + 1.0).ok();
//!         Outcome::Continue
//!     })
//!     .unwrap();
//!
//! stage.invalidate();
//! stage.invalidate();
//! assert_eq!(stage.x(ball), Some(2.0));
//! assert_eq!(
//!     stage.local_to_global(ball, Point::ORIGIN).unwrap(),
//!     Point::new(2.0, 0.0)
//! );
//! ```

mod bitmap;
mod clock;
mod container;
mod error;
mod geometry;
mod loader;
mod node;
mod pointer;
mod properties;
mod recording;
mod render;
mod stage;
mod surface;
mod tree;
mod types;

pub use bitmap::BitmapData;
pub use clock::{FrameClock, MAX_FRAME_RATE, MIN_FRAME_RATE};
pub use error::{DisplayError, ErrorKind, Result};
pub use loader::{LoadStatus, LoaderInfo};
pub use recording::{DrawState, PaintCall, RecordingSurface, SurfaceOp};
pub use stage::Stage;
pub use surface::Surface;
pub use types::{NodeFlags, NodeId, NodeKind, StageConfig};
