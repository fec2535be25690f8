// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;

use crate::numeric::{clamp_alpha, clamp_color};

/// An 8-bit RGB color with a floating point alpha.
///
/// Displays as a CSS-style `rgba(r,g,b,a)` string, which is the resolved
/// style string handed to canvas-like surfaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    /// Red channel.
    pub red: u8,
    /// Green channel.
    pub green: u8,
    /// Blue channel.
    pub blue: u8,
    /// Alpha in `0.0..=1.0`.
    pub alpha: f64,
}

impl Rgba {
    /// Opaque black, the default fill and stroke style.
    pub const BLACK: Self = Self {
        red: 0,
        green: 0,
        blue: 0,
        alpha: 1.0,
    };

    /// Build a color from a `0xRRGGBB` value and an alpha.
    ///
    /// The color is clamped to `0xFFFFFF` and the alpha to `0.0..=1.0`.
    pub fn from_hex(color: u32, alpha: f64) -> Self {
        let [_, red, green, blue] = clamp_color(color).to_be_bytes();
        Self {
            red,
            green,
            blue,
            alpha: clamp_alpha(alpha),
        }
    }

    /// The `0xRRGGBB` value of this color, ignoring alpha.
    pub fn to_hex(self) -> u32 {
        (u32::from(self.red) << 16) | (u32::from(self.green) << 8) | u32::from(self.blue)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "rgba({},{},{},{})",
            self.red, self.green, self.blue, self.alpha
        )
    }
}
