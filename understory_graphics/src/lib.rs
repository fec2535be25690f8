// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Graphics: a deferred vector drawing command buffer.
//!
//! [`Graphics`] records a replayable description of vector drawing (path
//! construction, fill and stroke styles, gradients) without touching any
//! drawing surface at call time. A renderer later walks
//! [`Graphics::commands`] and interprets each [`Command`] against an
//! immediate-mode 2D surface.
//!
//! While commands are appended, two rectangles are tracked incrementally:
//!
//! - [`Graphics::rect`]: the geometric extent of the path (control points
//!   included, strokes excluded).
//! - [`Graphics::bounds`]: the visual extent, which grows by half the current
//!   line width for geometry recorded while no fill is active.
//!
//! Both are reset only by [`Graphics::clear`].
//!
//! ## Numeric policy
//!
//! None of the drawing methods fail. Colors are clamped to `0x000000..=0xFFFFFF`,
//! alphas to `0.0..=1.0`, and NaN inputs fall back to the lower bound of their
//! range (see [`check_numeric`]).
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_graphics::{Command, Graphics, Paint, StyleValue};
//!
//! let mut g = Graphics::new();
//! g.begin_fill(0xFF0000, 1.0);
//! g.draw_rect(0.0, 0.0, 10.0, 10.0);
//! g.end_fill();
//!
//! assert_eq!(g.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
//! let Command::Set(StyleValue::FillStyle(Paint::Color(color))) = &g.commands()[0] else {
//!     panic!("fill style is recorded first");
//! };
//! assert_eq!(color.to_string(), "rgba(255,0,0,1)");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod color;
mod command;
mod gradient;
mod graphics;
mod numeric;
mod style;

pub use color::Rgba;
pub use command::{Command, CommandKind, PaintTarget, PathOp};
pub use gradient::{ColorStop, GRADIENT_BOX_UNIT, Gradient, GradientShape, GradientType, gradient_box};
pub use graphics::{Graphics, LineStyle};
pub use numeric::{check_numeric, clamp_alpha, clamp_color};
pub use style::{CapsStyle, JointStyle, LineCap, LineJoin, Paint, StyleProperty, StyleValue};
