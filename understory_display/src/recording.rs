// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless [`Surface`] that records every call.

use core::any::Any;

use kurbo::{Affine, Point, Rect};
use understory_graphics::{LineCap, LineJoin, Paint, StyleProperty, StyleValue};

use crate::bitmap::BitmapData;
use crate::surface::Surface;

/// State at the time of a fill or stroke.
#[derive(Clone, Debug, PartialEq)]
pub struct PaintCall {
    /// Paint used.
    pub paint: Paint,
    /// Current transform.
    pub transform: Affine,
    /// Current global alpha.
    pub alpha: f64,
}

/// One recorded surface call.
#[derive(Clone, Debug, PartialEq)]
pub enum SurfaceOp {
    /// `save()`.
    Save,
    /// `restore()`.
    Restore,
    /// `scale(sx, sy)`.
    Scale(f64, f64),
    /// `translate(tx, ty)`.
    Translate(f64, f64),
    /// `rotate(radians)`.
    Rotate(f64),
    /// `globalAlpha = a`.
    GlobalAlpha(f64),
    /// `beginPath()`.
    BeginPath,
    /// `closePath()`.
    ClosePath,
    /// `moveTo(p)`.
    MoveTo(Point),
    /// `lineTo(p)`.
    LineTo(Point),
    /// `quadraticCurveTo(c, p)`.
    QuadTo(Point, Point),
    /// `bezierCurveTo(c1, c2, p)`.
    CurveTo(Point, Point, Point),
    /// `arc(..)`.
    Arc {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// `rect(r)`.
    Rect(Rect),
    /// `fill()`, with the state it used.
    Fill(PaintCall),
    /// `stroke()`, with the state it used.
    Stroke(PaintCall),
    /// `clip()`.
    Clip,
    /// `clearRect(r)`.
    ClearRect(Rect),
    /// Style assignment.
    SetStyle(StyleValue),
    /// Pixel data drawn.
    DrawImage {
        /// Top-left corner in local space.
        origin: Point,
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// Another surface drawn.
    DrawSurface {
        /// Top-left corner in local space.
        origin: Point,
        /// Source width.
        width: u32,
        /// Source height.
        height: u32,
    },
}

/// Drawing state tracked by [`RecordingSurface`].
#[derive(Clone, Debug, PartialEq)]
pub struct DrawState {
    /// Current transform.
    pub transform: Affine,
    /// Global alpha.
    pub alpha: f64,
    /// Fill paint.
    pub fill_style: Paint,
    /// Stroke paint.
    pub stroke_style: Paint,
    /// Stroke width.
    pub line_width: f64,
    /// Stroke cap.
    pub line_cap: LineCap,
    /// Stroke join.
    pub line_join: LineJoin,
    /// Miter limit.
    pub miter_limit: f64,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            alpha: 1.0,
            fill_style: Paint::default(),
            stroke_style: Paint::default(),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: 10.0,
        }
    }
}

/// A surface that draws nothing and remembers everything.
///
/// Useful for tests and for inspecting what a frame would paint. Offscreen
/// surfaces it creates are recording surfaces too.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    ops: Vec<SurfaceOp>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl RecordingSurface {
    /// Create a surface of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Recorded calls, oldest first.
    pub fn ops(&self) -> &[SurfaceOp] {
        &self.ops
    }

    /// Forget recorded calls; drawing state is kept.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Current drawing state.
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Number of unmatched `save` calls.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Every fill, in order.
    pub fn fills(&self) -> impl Iterator<Item = &PaintCall> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Fill(call) => Some(call),
            _ => None,
        })
    }

    /// Every stroke, in order.
    pub fn strokes(&self) -> impl Iterator<Item = &PaintCall> {
        self.ops.iter().filter_map(|op| match op {
            SurfaceOp::Stroke(call) => Some(call),
            _ => None,
        })
    }

    fn paint_call(&self, paint: &Paint) -> PaintCall {
        PaintCall {
            paint: paint.clone(),
            transform: self.state.transform,
            alpha: self.state.alpha,
        }
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.ops.push(SurfaceOp::Save);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
        self.ops.push(SurfaceOp::Restore);
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform *= Affine::scale_non_uniform(sx, sy);
        self.ops.push(SurfaceOp::Scale(sx, sy));
    }

    fn translate(&mut self, tx: f64, ty: f64) {
        self.state.transform *= Affine::translate((tx, ty));
        self.ops.push(SurfaceOp::Translate(tx, ty));
    }

    fn rotate(&mut self, radians: f64) {
        self.state.transform *= Affine::rotate(radians);
        self.ops.push(SurfaceOp::Rotate(radians));
    }

    fn set_global_alpha(&mut self, alpha: f64) {
        self.state.alpha = alpha;
        self.ops.push(SurfaceOp::GlobalAlpha(alpha));
    }

    fn begin_path(&mut self) {
        self.ops.push(SurfaceOp::BeginPath);
    }

    fn close_path(&mut self) {
        self.ops.push(SurfaceOp::ClosePath);
    }

    fn move_to(&mut self, p: Point) {
        self.ops.push(SurfaceOp::MoveTo(p));
    }

    fn line_to(&mut self, p: Point) {
        self.ops.push(SurfaceOp::LineTo(p));
    }

    fn quadratic_curve_to(&mut self, control: Point, end: Point) {
        self.ops.push(SurfaceOp::QuadTo(control, end));
    }

    fn bezier_curve_to(&mut self, c1: Point, c2: Point, end: Point) {
        self.ops.push(SurfaceOp::CurveTo(c1, c2, end));
    }

    fn arc(&mut self, center: Point, radius: f64, _start: f64, _end: f64, _anticlockwise: bool) {
        self.ops.push(SurfaceOp::Arc { center, radius });
    }

    fn rect(&mut self, rect: Rect) {
        self.ops.push(SurfaceOp::Rect(rect));
    }

    fn fill(&mut self) {
        let call = self.paint_call(&self.state.fill_style);
        self.ops.push(SurfaceOp::Fill(call));
    }

    fn stroke(&mut self) {
        let call = self.paint_call(&self.state.stroke_style);
        self.ops.push(SurfaceOp::Stroke(call));
    }

    fn clip(&mut self) {
        self.ops.push(SurfaceOp::Clip);
    }

    fn clear_rect(&mut self, rect: Rect) {
        self.ops.push(SurfaceOp::ClearRect(rect));
    }

    fn set_style(&mut self, value: StyleValue) {
        match &value {
            StyleValue::FillStyle(paint) => self.state.fill_style = paint.clone(),
            StyleValue::StrokeStyle(paint) => self.state.stroke_style = paint.clone(),
            StyleValue::LineWidth(w) => self.state.line_width = *w,
            StyleValue::LineCap(cap) => self.state.line_cap = *cap,
            StyleValue::LineJoin(join) => self.state.line_join = *join,
            StyleValue::MiterLimit(limit) => self.state.miter_limit = *limit,
        }
        self.ops.push(SurfaceOp::SetStyle(value));
    }

    fn style(&self, property: StyleProperty) -> StyleValue {
        match property {
            StyleProperty::FillStyle => StyleValue::FillStyle(self.state.fill_style.clone()),
            StyleProperty::StrokeStyle => StyleValue::StrokeStyle(self.state.stroke_style.clone()),
            StyleProperty::LineWidth => StyleValue::LineWidth(self.state.line_width),
            StyleProperty::LineCap => StyleValue::LineCap(self.state.line_cap),
            StyleProperty::LineJoin => StyleValue::LineJoin(self.state.line_join),
            StyleProperty::MiterLimit => StyleValue::MiterLimit(self.state.miter_limit),
        }
    }

    fn draw_image(&mut self, image: &BitmapData, origin: Point) {
        self.ops.push(SurfaceOp::DrawImage {
            origin,
            width: image.width(),
            height: image.height(),
        });
    }

    fn draw_surface(&mut self, source: &dyn Surface, origin: Point) {
        self.ops.push(SurfaceOp::DrawSurface {
            origin,
            width: source.width(),
            height: source.height(),
        });
    }

    fn create_offscreen(&self, width: u32, height: u32) -> Box<dyn Surface> {
        Box::new(Self::new(width, height))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::replay;
    use understory_graphics::{GradientType, Graphics, gradient_box};

    #[test]
    fn save_restore_tracks_state() {
        let mut s = RecordingSurface::new(10, 10);
        s.save();
        s.translate(5.0, 0.0);
        s.set_global_alpha(0.5);
        assert_eq!(s.depth(), 1);
        s.restore();
        assert_eq!(s.depth(), 0);
        assert_eq!(s.state().transform, Affine::IDENTITY);
        assert_eq!(s.state().alpha, 1.0);
        s.restore();
        assert_eq!(s.depth(), 0, "unbalanced restore is ignored");
    }

    #[test]
    fn replay_restores_held_cap_after_rect() {
        let mut g = Graphics::new();
        g.draw_rect(0.0, 0.0, 5.0, 5.0);

        let mut s = RecordingSurface::new(10, 10);
        s.set_style(StyleValue::LineCap(LineCap::Round));
        replay(g.commands(), &mut s);

        assert!(s.ops().contains(&SurfaceOp::SetStyle(StyleValue::LineCap(LineCap::Square))));
        assert_eq!(s.state().line_cap, LineCap::Round, "cap restored after the rectangle");
        assert_eq!(s.strokes().count(), 1);
    }

    #[test]
    fn replay_builds_and_assigns_gradients() {
        let mut g = Graphics::new();
        g.begin_gradient_fill(
            GradientType::Linear,
            &[0xFF0000, 0x00FF00],
            &[1.0, 1.0],
            &[0.0, 255.0],
            gradient_box(10.0, 10.0, 0.0, 0.0, 0.0),
            0.0,
        );
        g.draw_circle(5.0, 5.0, 5.0);
        g.end_fill();

        let mut s = RecordingSurface::new(10, 10);
        replay(g.commands(), &mut s);
        let fill = s.fills().next().expect("one fill");
        let Paint::Gradient(gradient) = &fill.paint else {
            panic!("expected a gradient fill, got {:?}", fill.paint);
        };
        assert_eq!(gradient.stops().len(), 2);
        assert_eq!(gradient.stops()[1].offset, 1.0);
    }
}
