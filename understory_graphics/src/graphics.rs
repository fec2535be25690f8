// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`Graphics`] command recorder.

use alloc::vec::Vec;
use core::f64::consts::TAU;

use kurbo::{Affine, Point, Rect};

use crate::color::Rgba;
use crate::command::{Command, PaintTarget, PathOp};
use crate::gradient::{ColorStop, GradientType, gradient_shape};
use crate::numeric::{check_numeric, clamp_alpha};
use crate::style::{CapsStyle, JointStyle, LineCap, Paint, StyleProperty, StyleValue};

/// Control point distance for approximating a quarter ellipse with a cubic.
const KAPPA: f64 = 0.552_284_8;

/// Default miter limit.
const DEFAULT_MITER_LIMIT: f64 = 10.0;

/// Full set of stroke parameters for [`Graphics::line_style_with`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineStyle {
    /// Stroke width. NaN or negative values become `1.0`.
    pub thickness: f64,
    /// `0xRRGGBB` stroke color.
    pub color: u32,
    /// Stroke alpha.
    pub alpha: f64,
    /// End caps.
    pub caps: CapsStyle,
    /// Corner joints.
    pub joints: JointStyle,
    /// Miter limit, clamped to `0.0..=255.0`.
    pub miter_limit: f64,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            thickness: 1.0,
            color: 0,
            alpha: 1.0,
            caps: CapsStyle::None,
            joints: JointStyle::Miter,
            miter_limit: DEFAULT_MITER_LIMIT,
        }
    }
}

/// Records vector drawing as a list of [`Command`]s.
///
/// Nothing is drawn at call time. Each primitive appends its commands and
/// grows the tracked rectangles by its own geometry. When no fill is active,
/// every segment is followed by a stroke so that open paths show up.
#[derive(Clone, Debug, Default)]
pub struct Graphics {
    commands: Vec<Command>,
    bounds: Option<Rect>,
    rect: Option<Rect>,
    filling: bool,
    line_width: f64,
}

impl Graphics {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded commands in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Returns `true` if nothing has been recorded since creation or the last [`clear`](Self::clear).
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Whether any primitive with an extent has been recorded.
    pub fn has_geometry(&self) -> bool {
        self.rect.is_some()
    }

    /// Visual extent: path extent grown by half the line width for unfilled geometry.
    ///
    /// [`Rect::ZERO`] when nothing with geometry has been recorded.
    pub fn bounds(&self) -> Rect {
        self.bounds.unwrap_or(Rect::ZERO)
    }

    /// Geometric extent of the path, strokes excluded.
    ///
    /// [`Rect::ZERO`] when nothing with geometry has been recorded.
    pub fn rect(&self) -> Rect {
        self.rect.unwrap_or(Rect::ZERO)
    }

    /// Whether a fill is currently open.
    pub fn is_filling(&self) -> bool {
        self.filling
    }

    /// Current line width; `0.0` until a line style is set.
    pub fn line_width(&self) -> f64 {
        self.line_width
    }

    /// Start a solid fill for subsequent drawing.
    pub fn begin_fill(&mut self, color: u32, alpha: f64) {
        self.push(Command::Set(StyleValue::FillStyle(Paint::Color(
            Rgba::from_hex(color, alpha),
        ))));
        self.push(Command::Call(PathOp::BeginPath));
        self.filling = true;
    }

    /// Start a gradient fill for subsequent drawing.
    ///
    /// `matrix` is a gradient box as built by [`gradient_box`](crate::gradient_box).
    /// Missing alphas default to `1.0` and missing ratios to `255`.
    pub fn begin_gradient_fill(
        &mut self,
        kind: GradientType,
        colors: &[u32],
        alphas: &[f64],
        ratios: &[f64],
        matrix: Affine,
        focal_point_ratio: f64,
    ) {
        self.push_gradient(kind, colors, alphas, ratios, matrix, focal_point_ratio);
        self.push(Command::AssignGradient(PaintTarget::Fill));
        self.push(Command::Call(PathOp::BeginPath));
        self.filling = true;
    }

    /// Set a solid stroke with default caps, joints and miter limit.
    pub fn line_style(&mut self, thickness: f64, color: u32, alpha: f64) {
        self.line_style_with(&LineStyle {
            thickness,
            color,
            alpha,
            ..LineStyle::default()
        });
    }

    /// Set a solid stroke.
    pub fn line_style_with(&mut self, style: &LineStyle) {
        let thickness = if style.thickness.is_nan() || style.thickness < 0.0 {
            1.0
        } else {
            style.thickness
        };
        self.line_width = thickness;

        self.push(Command::Set(StyleValue::LineWidth(thickness)));
        self.push(Command::Set(StyleValue::StrokeStyle(Paint::Color(
            Rgba::from_hex(style.color, style.alpha),
        ))));
        self.push(Command::Set(StyleValue::LineCap(style.caps.line_cap())));
        self.push(Command::Set(StyleValue::LineJoin(style.joints.line_join())));
        self.push(Command::Set(StyleValue::MiterLimit(check_numeric(
            style.miter_limit,
            Some(0.0),
            Some(255.0),
        ))));
    }

    /// Use a gradient for strokes.
    ///
    /// Like the solid fill methods this opens a path and suppresses the
    /// per-segment stroke until [`end_fill`](Self::end_fill).
    pub fn line_gradient_style(
        &mut self,
        kind: GradientType,
        colors: &[u32],
        alphas: &[f64],
        ratios: &[f64],
        matrix: Affine,
        focal_point_ratio: f64,
    ) {
        self.push_gradient(kind, colors, alphas, ratios, matrix, focal_point_ratio);
        self.push(Command::AssignGradient(PaintTarget::Stroke));
        self.push(Command::Call(PathOp::BeginPath));
        self.filling = true;
    }

    /// Move the pen.
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.include(Rect::new(x, y, x, y));
        self.push(Command::Call(PathOp::MoveTo(Point::new(x, y))));
    }

    /// Straight line from the pen to `(x, y)`.
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.include(Rect::new(x, y, x, y));
        self.push(Command::Call(PathOp::LineTo(Point::new(x, y))));
        self.stroke_if_needed();
    }

    /// Quadratic curve to the anchor through the control point.
    ///
    /// Bounds grow by the control and anchor points, not the exact curve extent.
    pub fn curve_to(&mut self, control_x: f64, control_y: f64, anchor_x: f64, anchor_y: f64) {
        self.include(Rect::new(control_x, control_y, anchor_x, anchor_y));
        self.push(Command::Call(PathOp::QuadTo(
            Point::new(control_x, control_y),
            Point::new(anchor_x, anchor_y),
        )));
        self.stroke_if_needed();
    }

    /// Axis-aligned rectangle.
    ///
    /// The outline is stroked with square caps so corners come out closed;
    /// the previous cap is restored afterwards.
    pub fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (right, bottom) = (x + width, y + height);
        self.include(Rect::new(x, y, right, bottom));

        self.push(Command::SaveValue(StyleProperty::LineCap));
        self.push(Command::Set(StyleValue::LineCap(LineCap::Square)));
        self.push(Command::Call(PathOp::MoveTo(Point::new(x, y))));
        for point in [(right, y), (right, bottom), (x, bottom), (x, y)] {
            self.push(Command::Call(PathOp::LineTo(point.into())));
        }
        self.stroke_if_needed();
        self.push(Command::RestoreValue(StyleProperty::LineCap));
    }

    /// Rectangle with elliptical corners.
    ///
    /// `ellipse_width` and `ellipse_height` are the corner ellipse diameters;
    /// a missing height reuses the width. Radii are clamped to half the
    /// rectangle size.
    pub fn draw_round_rect(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        ellipse_width: f64,
        ellipse_height: Option<f64>,
    ) {
        let (right, bottom) = (x + width, y + height);
        self.include(Rect::new(x, y, right, bottom));

        let half_w = (width / 2.0).abs();
        let half_h = (height / 2.0).abs();
        let rx = check_numeric(ellipse_width / 2.0, Some(0.0), Some(half_w));
        let ry = check_numeric(
            ellipse_height.unwrap_or(ellipse_width) / 2.0,
            Some(0.0),
            Some(half_h),
        );

        let pt = Point::new;
        self.push(Command::Call(PathOp::MoveTo(pt(x + rx, y))));
        self.push(Command::Call(PathOp::LineTo(pt(right - rx, y))));
        self.push(Command::Call(PathOp::QuadTo(pt(right, y), pt(right, y + ry))));
        self.push(Command::Call(PathOp::LineTo(pt(right, bottom - ry))));
        self.push(Command::Call(PathOp::QuadTo(
            pt(right, bottom),
            pt(right - rx, bottom),
        )));
        self.push(Command::Call(PathOp::LineTo(pt(x + rx, bottom))));
        self.push(Command::Call(PathOp::QuadTo(pt(x, bottom), pt(x, bottom - ry))));
        self.push(Command::Call(PathOp::LineTo(pt(x, y + ry))));
        self.push(Command::Call(PathOp::QuadTo(pt(x, y), pt(x + rx, y))));
        self.stroke_if_needed();
    }

    /// Full circle.
    pub fn draw_circle(&mut self, x: f64, y: f64, radius: f64) {
        self.include(Rect::new(x - radius, y - radius, x + radius, y + radius));
        self.push(Command::Call(PathOp::Arc {
            center: Point::new(x, y),
            radius,
            start_angle: 0.0,
            end_angle: TAU,
            anticlockwise: false,
        }));
        self.stroke_if_needed();
    }

    /// Ellipse inscribed in the given box, as four cubic segments.
    pub fn draw_ellipse(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let (right, bottom) = (x + width, y + height);
        self.include(Rect::new(x, y, right, bottom));

        let ox = width / 2.0 * KAPPA;
        let oy = height / 2.0 * KAPPA;
        let mid_x = x + width / 2.0;
        let mid_y = y + height / 2.0;
        let pt = Point::new;

        self.push(Command::Call(PathOp::MoveTo(pt(x, mid_y))));
        self.push(Command::Call(PathOp::CurveTo(
            pt(x, mid_y - oy),
            pt(mid_x - ox, y),
            pt(mid_x, y),
        )));
        self.push(Command::Call(PathOp::CurveTo(
            pt(mid_x + ox, y),
            pt(right, mid_y - oy),
            pt(right, mid_y),
        )));
        self.push(Command::Call(PathOp::CurveTo(
            pt(right, mid_y + oy),
            pt(mid_x + ox, bottom),
            pt(mid_x, bottom),
        )));
        self.push(Command::Call(PathOp::CurveTo(
            pt(mid_x - ox, bottom),
            pt(x, mid_y + oy),
            pt(x, mid_y),
        )));
        self.stroke_if_needed();
    }

    /// Close and fill the current path, then stroke it if a line width is set.
    pub fn end_fill(&mut self) {
        self.push(Command::Call(PathOp::ClosePath));
        self.push(Command::Call(PathOp::Fill));
        if self.line_width > 0.0 {
            self.push(Command::Call(PathOp::Stroke));
        }
        self.filling = false;
    }

    /// Drop all commands, reset both rectangles and the drawing state.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn push(&mut self, command: Command) {
        self.commands.push(command);
    }

    fn stroke_if_needed(&mut self) {
        if !self.filling {
            self.push(Command::Call(PathOp::Stroke));
        }
    }

    fn include(&mut self, extent: Rect) {
        let extent = extent.abs();
        self.rect = Some(self.rect.map_or(extent, |r| r.union(extent)));

        let visual = if self.filling {
            extent
        } else {
            extent.inflate(self.line_width / 2.0, self.line_width / 2.0)
        };
        self.bounds = Some(self.bounds.map_or(visual, |b| b.union(visual)));
    }

    fn push_gradient(
        &mut self,
        kind: GradientType,
        colors: &[u32],
        alphas: &[f64],
        ratios: &[f64],
        matrix: Affine,
        focal_point_ratio: f64,
    ) {
        let focal = check_numeric(focal_point_ratio, Some(-1.0), Some(1.0));
        self.push(Command::CreateGradient(gradient_shape(kind, matrix, focal)));

        for (i, &color) in colors.iter().enumerate() {
            let offset = ratios
                .get(i)
                .map_or(1.0, |&r| check_numeric(r, Some(0.0), Some(255.0)) / 255.0);
            let alpha = alphas.get(i).map_or(1.0, |&a| clamp_alpha(a));
            self.push(Command::AddColorStop(ColorStop {
                offset,
                color: Rgba::from_hex(color, alpha),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gradient::{GradientShape, gradient_box};
    use alloc::string::ToString;

    fn names(g: &Graphics) -> Vec<&'static str> {
        g.commands().iter().map(Command::name).collect()
    }

    #[test]
    fn filled_rect_records_fill_sequence() {
        let mut g = Graphics::new();
        g.begin_fill(0xFF0000, 1.0);
        g.draw_rect(0.0, 0.0, 10.0, 10.0);
        g.end_fill();

        assert_eq!(g.bounds(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(g.rect(), Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(
            names(&g),
            [
                "fillStyle",
                "beginPath",
                "lineCap",
                "lineCap",
                "moveTo",
                "lineTo",
                "lineTo",
                "lineTo",
                "lineTo",
                "lineCap",
                "closePath",
                "fill",
            ]
        );
        let Command::Set(StyleValue::FillStyle(Paint::Color(color))) = &g.commands()[0] else {
            panic!("fill style first");
        };
        assert_eq!(color.to_string(), "rgba(255,0,0,1)");
        assert!(!g.is_filling());
    }

    #[test]
    fn rect_stroke_is_bracketed_by_cap_save_and_restore() {
        let mut g = Graphics::new();
        g.line_style(2.0, 0, 1.0);
        g.draw_rect(0.0, 0.0, 4.0, 4.0);
        let cmds = g.commands();
        let n = cmds.len();
        assert_eq!(cmds[n - 1], Command::RestoreValue(StyleProperty::LineCap));
        assert_eq!(cmds[n - 2], Command::Call(PathOp::Stroke));
        assert!(cmds.contains(&Command::SaveValue(StyleProperty::LineCap)));
    }

    #[test]
    fn clear_resets_everything() {
        let mut g = Graphics::new();
        g.line_style(4.0, 0x00FF00, 1.0);
        g.begin_fill(0, 1.0);
        g.draw_circle(0.0, 0.0, 100.0);
        g.clear();

        assert!(g.is_empty());
        assert!(!g.has_geometry());
        assert_eq!(g.bounds(), Rect::ZERO);
        assert_eq!(g.rect(), Rect::ZERO);
        assert!(!g.is_filling());
        assert_eq!(g.line_width(), 0.0);

        g.move_to(3.0, 4.0);
        g.line_to(5.0, 9.0);
        assert_eq!(g.rect(), Rect::new(3.0, 4.0, 5.0, 9.0));
    }

    #[test]
    fn stroked_circle_bounds_include_half_line_width() {
        let mut g = Graphics::new();
        g.line_style(4.0, 0, 1.0);
        g.draw_circle(10.0, 10.0, 5.0);
        g.end_fill();

        assert_eq!(g.rect(), Rect::new(5.0, 5.0, 15.0, 15.0));
        assert_eq!(g.bounds(), Rect::new(3.0, 3.0, 17.0, 17.0));
        assert_eq!(g.commands().last(), Some(&Command::Call(PathOp::Stroke)));
    }

    #[test]
    fn filled_circle_bounds_are_exact() {
        let mut g = Graphics::new();
        g.line_style(4.0, 0, 1.0);
        g.begin_fill(0, 1.0);
        g.draw_circle(10.0, 10.0, 5.0);
        g.end_fill();
        assert_eq!(g.bounds(), Rect::new(5.0, 5.0, 15.0, 15.0));
    }

    #[test]
    fn open_lines_stroke_each_segment() {
        let mut g = Graphics::new();
        g.move_to(0.0, 0.0);
        g.line_to(10.0, 0.0);
        g.curve_to(20.0, -5.0, 30.0, 10.0);
        assert_eq!(
            names(&g),
            ["moveTo", "lineTo", "stroke", "quadraticCurveTo", "stroke"]
        );
        assert_eq!(g.rect(), Rect::new(0.0, -5.0, 30.0, 10.0));
    }

    #[test]
    fn line_style_clamps_inputs() {
        let mut g = Graphics::new();
        g.line_style_with(&LineStyle {
            thickness: -3.0,
            color: 0xFFFF_FFFF,
            alpha: 7.0,
            caps: CapsStyle::from_name("ROUND"),
            joints: JointStyle::from_name("bevel"),
            miter_limit: 900.0,
        });
        assert_eq!(g.line_width(), 1.0);
        let cmds = g.commands();
        assert_eq!(cmds[0], Command::Set(StyleValue::LineWidth(1.0)));
        let Command::Set(StyleValue::StrokeStyle(Paint::Color(color))) = &cmds[1] else {
            panic!("stroke style second");
        };
        assert_eq!(color.to_string(), "rgba(255,255,255,1)");
        assert_eq!(cmds[2], Command::Set(StyleValue::LineCap(LineCap::Round)));
        assert_eq!(cmds[4], Command::Set(StyleValue::MiterLimit(255.0)));
    }

    #[test]
    fn gradient_fill_records_stops_with_defaults() {
        let mut g = Graphics::new();
        g.begin_gradient_fill(
            GradientType::from_name("bogus"),
            &[0xFF0000, 0x0000FF],
            &[0.5],
            &[0.0, 510.0],
            gradient_box(100.0, 100.0, 0.0, 0.0, 0.0),
            0.0,
        );
        let cmds = g.commands();
        assert!(matches!(
            cmds[0],
            Command::CreateGradient(GradientShape::Radial { .. })
        ));
        let Command::AddColorStop(first) = cmds[1] else {
            panic!("first stop");
        };
        assert_eq!(first.offset, 0.0);
        assert_eq!(first.color.alpha, 0.5);
        let Command::AddColorStop(second) = cmds[2] else {
            panic!("second stop");
        };
        assert_eq!(second.offset, 1.0);
        assert_eq!(second.color.alpha, 1.0);
        assert_eq!(cmds[3], Command::AssignGradient(PaintTarget::Fill));
        assert!(g.is_filling());
    }

    #[test]
    fn round_rect_radii_are_clamped() {
        let mut g = Graphics::new();
        g.begin_fill(0, 1.0);
        g.draw_round_rect(0.0, 0.0, 10.0, 20.0, 40.0, None);
        assert_eq!(g.rect(), Rect::new(0.0, 0.0, 10.0, 20.0));
        assert_eq!(
            g.commands()[2],
            Command::Call(PathOp::MoveTo(Point::new(5.0, 0.0)))
        );
        assert_eq!(
            g.commands()[4],
            Command::Call(PathOp::QuadTo(Point::new(10.0, 0.0), Point::new(10.0, 10.0)))
        );
    }

    #[test]
    fn ellipse_is_four_cubics() {
        let mut g = Graphics::new();
        g.begin_fill(0, 1.0);
        g.draw_ellipse(0.0, 0.0, 20.0, 10.0);
        let cubics = g
            .commands()
            .iter()
            .filter(|c| matches!(c, Command::Call(PathOp::CurveTo(..))))
            .count();
        assert_eq!(cubics, 4);
        assert_eq!(g.bounds(), Rect::new(0.0, 0.0, 20.0, 10.0));
    }
}
