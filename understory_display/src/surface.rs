// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The immediate-mode drawing surface the renderer paints onto.

use core::any::Any;
use core::fmt;

use kurbo::{Point, Rect};
use understory_graphics::{
    Command, Gradient, Paint, PaintTarget, PathOp, StyleProperty, StyleValue,
};

use crate::bitmap::BitmapData;

/// A canvas-like 2D drawing surface.
///
/// The renderer only ever talks to this trait, so any backend that offers a
/// transform stack, path construction, fill/stroke with style properties and
/// clipping can be plugged in. Transforms compose the way canvas transforms
/// do: each call post-multiplies the current matrix.
pub trait Surface: Any + fmt::Debug {
    /// Width in pixels.
    fn width(&self) -> u32;
    /// Height in pixels.
    fn height(&self) -> u32;

    /// Push the drawing state (transform, alpha, styles, clip).
    fn save(&mut self);
    /// Pop the drawing state. Unbalanced calls are ignored.
    fn restore(&mut self);
    /// Scale the current transform.
    fn scale(&mut self, sx: f64, sy: f64);
    /// Translate the current transform.
    fn translate(&mut self, tx: f64, ty: f64);
    /// Rotate the current transform by `radians`.
    fn rotate(&mut self, radians: f64);
    /// Set the alpha applied to everything painted.
    fn set_global_alpha(&mut self, alpha: f64);

    /// Start a new path.
    fn begin_path(&mut self);
    /// Close the current subpath.
    fn close_path(&mut self);
    /// Move the pen.
    fn move_to(&mut self, p: Point);
    /// Straight segment.
    fn line_to(&mut self, p: Point);
    /// Quadratic segment.
    fn quadratic_curve_to(&mut self, control: Point, end: Point);
    /// Cubic segment.
    fn bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point);
    /// Circular arc.
    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64, anticlockwise: bool);
    /// Rectangle subpath.
    fn rect(&mut self, rect: Rect);
    /// Fill the current path.
    fn fill(&mut self);
    /// Stroke the current path.
    fn stroke(&mut self);
    /// Intersect the clip region with the current path.
    fn clip(&mut self);
    /// Clear pixels to transparent.
    fn clear_rect(&mut self, rect: Rect);

    /// Assign a style property.
    fn set_style(&mut self, value: StyleValue);
    /// Read a style property.
    fn style(&self, property: StyleProperty) -> StyleValue;

    /// Draw pixel data with its top-left corner at `origin`.
    fn draw_image(&mut self, image: &BitmapData, origin: Point);
    /// Draw another surface with its top-left corner at `origin`.
    fn draw_surface(&mut self, source: &dyn Surface, origin: Point);
    /// Create a blank surface compatible with this one.
    fn create_offscreen(&self, width: u32, height: u32) -> Box<dyn Surface>;

    /// Downcasting support.
    fn as_any(&self) -> &dyn Any;
}

/// Replay recorded drawing commands onto `surface`.
///
/// Gradient commands operate on a single current gradient that lives only for
/// this replay. A saved style value is restored by the matching
/// [`Command::RestoreValue`].
pub(crate) fn replay(commands: &[Command], surface: &mut dyn Surface) {
    let mut gradient: Option<Gradient> = None;
    let mut held: Option<StyleValue> = None;

    for command in commands {
        match command {
            Command::Call(op) => call(*op, surface),
            Command::Set(value) => surface.set_style(value.clone()),
            Command::CreateGradient(shape) => gradient = Some(Gradient::new(*shape)),
            Command::AddColorStop(stop) => {
                if let Some(g) = gradient.as_mut() {
                    g.add_color_stop(*stop);
                }
            }
            Command::AssignGradient(target) => {
                if let Some(g) = gradient.as_ref() {
                    let paint = Paint::Gradient(g.clone());
                    surface.set_style(match target {
                        PaintTarget::Fill => StyleValue::FillStyle(paint),
                        PaintTarget::Stroke => StyleValue::StrokeStyle(paint),
                    });
                }
            }
            Command::SaveValue(property) => held = Some(surface.style(*property)),
            Command::RestoreValue(property) => {
                if let Some(value) = held.take_if(|v| v.property() == *property) {
                    surface.set_style(value);
                }
            }
        }
    }
}

fn call(op: PathOp, surface: &mut dyn Surface) {
    match op {
        PathOp::BeginPath => surface.begin_path(),
        PathOp::ClosePath => surface.close_path(),
        PathOp::MoveTo(p) => surface.move_to(p),
        PathOp::LineTo(p) => surface.line_to(p),
        PathOp::QuadTo(c, p) => surface.quadratic_curve_to(c, p),
        PathOp::CurveTo(c1, c2, p) => surface.bezier_curve_to(c1, c2, p),
        PathOp::Arc {
            center,
            radius,
            start_angle,
            end_angle,
            anticlockwise,
        } => surface.arc(center, radius, start_angle, end_angle, anticlockwise),
        PathOp::Fill => surface.fill(),
        PathOp::Stroke => surface.stroke(),
    }
}
