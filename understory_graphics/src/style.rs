// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stroke and fill style values as understood by a 2D drawing surface.

use crate::color::Rgba;
use crate::gradient::Gradient;

/// Line cap as applied by the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineCap {
    /// Flat end exactly at the end point.
    #[default]
    Butt,
    /// Rounded end.
    Round,
    /// Flat end extended by half the line width.
    Square,
}

impl LineCap {
    /// Surface-level name of the cap.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
            Self::Square => "square",
        }
    }
}

/// Line join as applied by the drawing surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum LineJoin {
    /// Sharp corner, cut at the miter limit.
    #[default]
    Miter,
    /// Rounded corner.
    Round,
    /// Beveled corner.
    Bevel,
}

impl LineJoin {
    /// Surface-level name of the join.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Miter => "miter",
            Self::Round => "round",
            Self::Bevel => "bevel",
        }
    }
}

/// Cap style accepted by [`Graphics::line_style_with`](crate::Graphics::line_style_with).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CapsStyle {
    /// No cap; maps to [`LineCap::Butt`].
    #[default]
    None,
    /// Round caps.
    Round,
    /// Square caps.
    Square,
}

impl CapsStyle {
    /// Parse a cap style name case-insensitively. Unknown names map to [`CapsStyle::None`].
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("round") {
            Self::Round
        } else if name.eq_ignore_ascii_case("square") {
            Self::Square
        } else {
            Self::None
        }
    }

    /// The surface cap for this style.
    pub const fn line_cap(self) -> LineCap {
        match self {
            Self::None => LineCap::Butt,
            Self::Round => LineCap::Round,
            Self::Square => LineCap::Square,
        }
    }
}

/// Joint style accepted by [`Graphics::line_style_with`](crate::Graphics::line_style_with).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JointStyle {
    /// Mitered joints.
    #[default]
    Miter,
    /// Round joints.
    Round,
    /// Beveled joints.
    Bevel,
}

impl JointStyle {
    /// Parse a joint style name case-insensitively. Unknown names map to [`JointStyle::Miter`].
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("round") {
            Self::Round
        } else if name.eq_ignore_ascii_case("bevel") {
            Self::Bevel
        } else {
            Self::Miter
        }
    }

    /// The surface join for this style.
    pub const fn line_join(self) -> LineJoin {
        match self {
            Self::Miter => LineJoin::Miter,
            Self::Round => LineJoin::Round,
            Self::Bevel => LineJoin::Bevel,
        }
    }
}

/// A fill or stroke paint.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Solid color.
    Color(Rgba),
    /// Linear or radial gradient.
    Gradient(Gradient),
}

impl Default for Paint {
    fn default() -> Self {
        Self::Color(Rgba::BLACK)
    }
}

/// Names a surface style property.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleProperty {
    /// Paint used by `fill`.
    FillStyle,
    /// Paint used by `stroke`.
    StrokeStyle,
    /// Stroke width.
    LineWidth,
    /// Stroke cap.
    LineCap,
    /// Stroke join.
    LineJoin,
    /// Miter limit for [`LineJoin::Miter`].
    MiterLimit,
}

impl StyleProperty {
    /// Surface-level property name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::FillStyle => "fillStyle",
            Self::StrokeStyle => "strokeStyle",
            Self::LineWidth => "lineWidth",
            Self::LineCap => "lineCap",
            Self::LineJoin => "lineJoin",
            Self::MiterLimit => "miterLimit",
        }
    }
}

/// A value assigned to one surface style property.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleValue {
    /// Fill paint.
    FillStyle(Paint),
    /// Stroke paint.
    StrokeStyle(Paint),
    /// Stroke width.
    LineWidth(f64),
    /// Stroke cap.
    LineCap(LineCap),
    /// Stroke join.
    LineJoin(LineJoin),
    /// Miter limit.
    MiterLimit(f64),
}

impl StyleValue {
    /// The property this value is assigned to.
    pub const fn property(&self) -> StyleProperty {
        match self {
            Self::FillStyle(_) => StyleProperty::FillStyle,
            Self::StrokeStyle(_) => StyleProperty::StrokeStyle,
            Self::LineWidth(_) => StyleProperty::LineWidth,
            Self::LineCap(_) => StyleProperty::LineCap,
            Self::LineJoin(_) => StyleProperty::LineJoin,
            Self::MiterLimit(_) => StyleProperty::MiterLimit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn style_names_parse_case_insensitively() {
        assert_eq!(CapsStyle::from_name("ROUND"), CapsStyle::Round);
        assert_eq!(CapsStyle::from_name("Square").line_cap(), LineCap::Square);
        assert_eq!(CapsStyle::from_name("").line_cap(), LineCap::Butt);
        assert_eq!(JointStyle::from_name("Bevel").line_join(), LineJoin::Bevel);
        assert_eq!(JointStyle::from_name("nonsense"), JointStyle::Miter);
    }

    #[test]
    fn values_know_their_property() {
        assert_eq!(
            StyleValue::LineCap(LineCap::Square).property().name(),
            "lineCap"
        );
        assert_eq!(
            StyleValue::FillStyle(Paint::default()).property(),
            StyleProperty::FillStyle
        );
    }
}
