// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tagged deferred drawing commands.

use kurbo::Point;

use crate::gradient::{ColorStop, GradientShape};
use crate::style::{StyleProperty, StyleValue};

/// A path construction or painting call on the drawing surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathOp {
    /// Start a new path.
    BeginPath,
    /// Close the current subpath.
    ClosePath,
    /// Move the pen without drawing.
    MoveTo(Point),
    /// Straight segment to the point.
    LineTo(Point),
    /// Quadratic curve: control point, end point.
    QuadTo(Point, Point),
    /// Cubic curve: two control points, end point.
    CurveTo(Point, Point, Point),
    /// Circular arc around `center`.
    Arc {
        /// Center of the arc.
        center: Point,
        /// Radius of the arc.
        radius: f64,
        /// Start angle in radians.
        start_angle: f64,
        /// End angle in radians.
        end_angle: f64,
        /// Sweep direction.
        anticlockwise: bool,
    },
    /// Fill the current path with the fill style.
    Fill,
    /// Stroke the current path with the stroke style.
    Stroke,
}

impl PathOp {
    /// Surface method name of the operation.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::BeginPath => "beginPath",
            Self::ClosePath => "closePath",
            Self::MoveTo(_) => "moveTo",
            Self::LineTo(_) => "lineTo",
            Self::QuadTo(..) => "quadraticCurveTo",
            Self::CurveTo(..) => "bezierCurveTo",
            Self::Arc { .. } => "arc",
            Self::Fill => "fill",
            Self::Stroke => "stroke",
        }
    }
}

/// Which paint slot a gradient is assigned to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PaintTarget {
    /// `fillStyle`.
    Fill,
    /// `strokeStyle`.
    Stroke,
}

impl PaintTarget {
    /// The style property behind this slot.
    pub const fn property(self) -> StyleProperty {
        match self {
            Self::Fill => StyleProperty::FillStyle,
            Self::Stroke => StyleProperty::StrokeStyle,
        }
    }
}

/// Coarse classification of a [`Command`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Direct surface method call.
    ContextCall,
    /// Surface property assignment.
    PropertySet,
    /// Gradient object creation.
    GradientCreate,
    /// Method call on the current gradient object.
    GradientCall,
    /// Assignment of the current gradient to a paint slot.
    GradientAssign,
    /// Remember the current value of a style property.
    SaveValue,
    /// Restore the remembered value of a style property.
    RestoreValue,
}

/// One deferred drawing operation.
///
/// Gradient commands form a small protocol: [`Command::CreateGradient`] binds
/// a new current gradient, [`Command::AddColorStop`] appends to it, and
/// [`Command::AssignGradient`] installs it as a paint. [`Command::SaveValue`]
/// and [`Command::RestoreValue`] bracket a temporary style override.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Path construction or painting.
    Call(PathOp),
    /// Style property assignment.
    Set(StyleValue),
    /// Create the current gradient.
    CreateGradient(GradientShape),
    /// Add a stop to the current gradient.
    AddColorStop(ColorStop),
    /// Install the current gradient as a paint.
    AssignGradient(PaintTarget),
    /// Remember the value of a style property.
    SaveValue(StyleProperty),
    /// Put back the remembered value of a style property.
    RestoreValue(StyleProperty),
}

impl Command {
    /// Classification of this command.
    pub const fn kind(&self) -> CommandKind {
        match self {
            Self::Call(_) => CommandKind::ContextCall,
            Self::Set(_) => CommandKind::PropertySet,
            Self::CreateGradient(_) => CommandKind::GradientCreate,
            Self::AddColorStop(_) => CommandKind::GradientCall,
            Self::AssignGradient(_) => CommandKind::GradientAssign,
            Self::SaveValue(_) => CommandKind::SaveValue,
            Self::RestoreValue(_) => CommandKind::RestoreValue,
        }
    }

    /// Surface-level name of the method or property involved.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Call(op) => op.name(),
            Self::Set(value) => value.property().name(),
            Self::CreateGradient(GradientShape::Linear { .. }) => "createLinearGradient",
            Self::CreateGradient(GradientShape::Radial { .. }) => "createRadialGradient",
            Self::AddColorStop(_) => "addColorStop",
            Self::AssignGradient(target) => target.property().name(),
            Self::SaveValue(property) | Self::RestoreValue(property) => property.name(),
        }
    }
}
