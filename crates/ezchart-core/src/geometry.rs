// File: crates/ezchart-core/src/geometry.rs
// Summary: Lightweight geometry helpers for pixel math (plot rects, polar points).

use crate::types::Insets;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self { Self { x, y } }

    /// Point at `radius` from the origin; `angle` in radians, 0 at 12 o'clock, clockwise.
    pub fn polar(radius: f64, angle: f64) -> Self {
        Self { x: radius * angle.sin(), y: -radius * angle.cos() }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    pub const fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self { left, top, right, bottom }
    }
    pub fn from_ltwh(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, right: left + width, bottom: top + height }
    }
    /// Plot area left after removing `insets` from a `width` x `height` surface.
    pub fn inset(width: f64, height: f64, insets: &Insets) -> Self {
        Self::from_ltrb(
            insets.left as f64,
            insets.top as f64,
            width - insets.right as f64,
            height - insets.bottom as f64,
        )
    }
    pub fn width(&self) -> f64 { self.right - self.left }
    pub fn height(&self) -> f64 { self.bottom - self.top }
    pub fn center(&self) -> Point {
        Point::new((self.left + self.right) / 2.0, (self.top + self.bottom) / 2.0)
    }
    pub fn is_empty(&self) -> bool { !(self.width() > 0.0 && self.height() > 0.0) }
}

#[inline]
pub fn clamp<T: PartialOrd>(v: T, lo: T, hi: T) -> T {
    if v < lo { lo } else if v > hi { hi } else { v }
}
