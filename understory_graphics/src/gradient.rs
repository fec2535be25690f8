// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gradient geometry derived from a gradient box matrix.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Affine, Point, Vec2};

use crate::color::Rgba;

/// Scale of one gradient box unit: a unit gradient spans 1638.4 pixels.
pub const GRADIENT_BOX_UNIT: f64 = 0.000_610_351_562_5;

/// Which kind of gradient to construct.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GradientType {
    /// Gradient along a line.
    Linear,
    /// Gradient radiating from a center point.
    Radial,
}

impl GradientType {
    /// Parse a gradient type name.
    ///
    /// Only `"linear"` (any case) is special; every other name, including
    /// typos, selects [`GradientType::Radial`].
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("linear") {
            Self::Linear
        } else {
            Self::Radial
        }
    }

    /// Lowercase name of the type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Radial => "radial",
        }
    }
}

/// Geometry of a gradient object as created on the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GradientShape {
    /// `createLinearGradient(start, end)`.
    Linear {
        /// Start of the gradient line.
        start: Point,
        /// End of the gradient line.
        end: Point,
    },
    /// `createRadialGradient(center, 0, center, radius)`.
    Radial {
        /// Shared center of the inner and outer circles.
        center: Point,
        /// Outer radius; the inner radius is zero.
        radius: f64,
    },
}

/// One color stop of a gradient.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorStop {
    /// Position along the gradient in `0.0..=1.0`.
    pub offset: f64,
    /// Color at this position.
    pub color: Rgba,
}

/// A gradient paint: geometry plus ordered color stops.
#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    shape: GradientShape,
    stops: Vec<ColorStop>,
}

impl Gradient {
    /// Create a gradient with no color stops.
    pub fn new(shape: GradientShape) -> Self {
        Self {
            shape,
            stops: Vec::new(),
        }
    }

    /// Append a color stop.
    pub fn add_color_stop(&mut self, stop: ColorStop) {
        self.stops.push(stop);
    }

    /// Geometry of the gradient.
    pub fn shape(&self) -> GradientShape {
        self.shape
    }

    /// Color stops in insertion order.
    pub fn stops(&self) -> &[ColorStop] {
        &self.stops
    }
}

/// Build a gradient box matrix.
///
/// The returned [`Affine`] rotates by `rotation` radians, scales a unit
/// gradient to `width` x `height` and centers it on the box whose top-left
/// corner is `(tx, ty)`.
pub fn gradient_box(width: f64, height: f64, rotation: f64, tx: f64, ty: f64) -> Affine {
    let (sin, cos) = rotation.sin_cos();
    let sx = width * GRADIENT_BOX_UNIT;
    let sy = height * GRADIENT_BOX_UNIT;
    Affine::new([
        cos * sx,
        sin * sy,
        -sin * sx,
        cos * sy,
        width / 2.0 + tx,
        height / 2.0 + ty,
    ])
}

/// Derive surface gradient geometry from a gradient box matrix.
pub(crate) fn gradient_shape(kind: GradientType, matrix: Affine, focal_point_ratio: f64) -> GradientShape {
    let [a, b, c, d, e, f] = matrix.as_coeffs();
    let origin = matrix * Point::ZERO;
    let unit = matrix * Point::new(1.0, 0.0);
    let rotation = (unit.y - origin.y).atan2(unit.x - origin.x);

    let width = (a * a + c * c).sqrt() / GRADIENT_BOX_UNIT;
    let height = (b * b + d * d).sqrt() / GRADIENT_BOX_UNIT;

    match kind {
        GradientType::Linear => {
            let tx = e - width / 2.0;
            let ty = f - height / 2.0;
            let delta_width = width - width * rotation.cos();
            let delta_height = height - height * rotation.sin();
            let start = Point::new(delta_width / 2.0 + tx, delta_height / 2.0 + ty);
            let end = Point::new(
                start.x + width - delta_width,
                start.y + height - delta_height,
            );
            GradientShape::Linear { start, end }
        }
        GradientType::Radial => {
            let radius = width.max(height) / 2.0;
            let focal = Vec2::from_angle(rotation) * (radius * focal_point_ratio);
            GradientShape::Radial {
                center: Point::new(e, f) + focal,
                radius,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn unknown_type_names_are_radial() {
        assert_eq!(GradientType::from_name("LINEAR"), GradientType::Linear);
        assert_eq!(GradientType::from_name("radial"), GradientType::Radial);
        assert_eq!(GradientType::from_name("linaer"), GradientType::Radial);
    }

    #[test]
    fn horizontal_linear_gradient_spans_the_box() {
        let m = gradient_box(100.0, 50.0, 0.0, 10.0, 20.0);
        let GradientShape::Linear { start, end } = gradient_shape(GradientType::Linear, m, 0.0)
        else {
            panic!("expected a linear gradient");
        };
        assert!(close(start.x, 10.0), "start.x = {}", start.x);
        assert!(close(start.y, 45.0), "start.y = {}", start.y);
        assert!(close(end.x, 110.0), "end.x = {}", end.x);
        assert!(close(end.y, 45.0), "end.y = {}", end.y);
    }

    #[test]
    fn radial_gradient_centers_on_the_box() {
        let m = gradient_box(40.0, 20.0, 0.0, 0.0, 0.0);
        let GradientShape::Radial { center, radius } =
            gradient_shape(GradientType::Radial, m, 0.0)
        else {
            panic!("expected a radial gradient");
        };
        assert!(close(center.x, 20.0) && close(center.y, 10.0), "center = {center:?}");
        assert!(close(radius, 20.0), "radius = {radius}");

        let GradientShape::Radial { center, .. } = gradient_shape(GradientType::Radial, m, 0.5)
        else {
            panic!("expected a radial gradient");
        };
        assert!(close(center.x, 30.0), "focal point shifts the center: {center:?}");
    }
}
