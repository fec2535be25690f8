// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clamping helpers shared by the drawing methods.

/// Largest representable `0xRRGGBB` color.
const MAX_COLOR: u32 = 0x00FF_FFFF;

/// Clamp `value` into `[min, max]`, treating NaN as "not a number".
///
/// A NaN input falls back to `min`, or to `0.0` when no lower bound is given.
/// Either bound may be omitted.
///
/// ```rust
/// use understory_graphics::check_numeric;
///
/// assert_eq!(check_numeric(f64::NAN, Some(2.0), None), 2.0);
/// assert_eq!(check_numeric(f64::NAN, None, Some(5.0)), 0.0);
/// assert_eq!(check_numeric(300.0, Some(0.0), Some(255.0)), 255.0);
/// ```
pub fn check_numeric(value: f64, min: Option<f64>, max: Option<f64>) -> f64 {
    let mut value = if value.is_nan() {
        min.unwrap_or(0.0)
    } else {
        value
    };
    if let Some(min) = min
        && value < min
    {
        value = min;
    }
    if let Some(max) = max
        && value > max
    {
        value = max;
    }
    value
}

/// Clamp a color to the `0x000000..=0xFFFFFF` range.
pub fn clamp_color(color: u32) -> u32 {
    color.min(MAX_COLOR)
}

/// Clamp an alpha value to `0.0..=1.0`; NaN becomes `0.0`.
pub fn clamp_alpha(alpha: f64) -> f64 {
    check_numeric(alpha, Some(0.0), Some(1.0))
}
