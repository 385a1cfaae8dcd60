// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rect tests and pointer-direction tracking.
//!
//! Rects are cached when a drag starts and then shifted in place as items move
//! or ancestors scroll, rather than re-measured, so an element that is still
//! mid-transition never feeds an inconsistent value back into the cache.

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::{Point, Rect, Vec2};

/// Returns `true` if `point` is inside `rect`, edges included.
pub fn is_inside_rect(rect: Rect, point: Point) -> bool {
    point.y >= rect.y0 && point.y <= rect.y1 && point.x >= rect.x0 && point.x <= rect.x1
}

/// Returns `true` if `point` is strictly inside `rect` grown on every side by
/// `proximity` times its own width (horizontally) and height (vertically).
pub fn is_near_rect(rect: Rect, proximity: f64, point: Point) -> bool {
    let x_threshold = rect.width() * proximity;
    let y_threshold = rect.height() * proximity;
    point.y > rect.y0 - y_threshold
        && point.y < rect.y1 + y_threshold
        && point.x > rect.x0 - x_threshold
        && point.x < rect.x1 + x_threshold
}

/// Floors a rect's edges.
///
/// Rects are frequently reported with sub-pixel precision while pointer
/// coordinates are whole pixels.
pub(crate) fn floor_rect(rect: Rect) -> Rect {
    Rect::new(rect.x0.floor(), rect.y0.floor(), rect.x1.floor(), rect.y1.floor())
}

/// Sign of pointer travel on one axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisDirection {
    /// Moving toward smaller coordinates.
    Negative,
    /// No direction recorded yet.
    #[default]
    None,
    /// Moving toward larger coordinates.
    Positive,
}

impl AxisDirection {
    /// `-1`, `0`, or `1`.
    pub fn signum(self) -> i8 {
        match self {
            Self::Negative => -1,
            Self::None => 0,
            Self::Positive => 1,
        }
    }
}

/// Pointer direction per axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectionDelta {
    /// Horizontal direction.
    pub x: AxisDirection,
    /// Vertical direction.
    pub y: AxisDirection,
}

/// Direction tracker with hysteresis.
///
/// An axis only flips once the pointer has travelled more than `threshold`
/// pixels on that axis since the position recorded at the previous flip.
/// Per-pixel jitter therefore never toggles direction-dependent decisions.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct DirectionTracker {
    delta: DirectionDelta,
    last_change: Point,
}

impl DirectionTracker {
    /// Start tracking at `origin` with no recorded direction.
    pub fn new(origin: Point) -> Self {
        Self {
            delta: DirectionDelta::default(),
            last_change: origin,
        }
    }

    /// The current direction.
    pub fn delta(&self) -> DirectionDelta {
        self.delta
    }

    /// The position recorded at the most recent flip of each axis.
    pub fn last_change(&self) -> Point {
        self.last_change
    }

    /// Feed a new pointer position and return the resulting direction.
    pub fn update(&mut self, position: Point, threshold: f64) -> DirectionDelta {
        let change_x = (position.x - self.last_change.x).abs();
        let change_y = (position.y - self.last_change.y).abs();
        if change_x > threshold {
            self.delta.x = if position.x > self.last_change.x {
                AxisDirection::Positive
            } else {
                AxisDirection::Negative
            };
            self.last_change.x = position.x;
        }
        if change_y > threshold {
            self.delta.y = if position.y > self.last_change.y {
                AxisDirection::Positive
            } else {
                AxisDirection::Negative
            };
            self.last_change.y = position.y;
        }
        self.delta
    }
}

/// Clamp `point` so that a box of `size`, held at `pickup_in_element`, stays
/// inside `boundary`.
pub(crate) fn clamp_to_boundary(
    point: Point,
    pickup_in_element: Vec2,
    size: kurbo::Size,
    boundary: Rect,
) -> Point {
    let min_x = boundary.x0 + pickup_in_element.x;
    let max_x = boundary.x1 - (size.width - pickup_in_element.x);
    let min_y = boundary.y0 + pickup_in_element.y;
    let max_y = boundary.y1 - (size.height - pickup_in_element.y);
    Point::new(clamp(point.x, min_x, max_x), clamp(point.y, min_y, max_y))
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if max < min {
        // The element is larger than the boundary on this axis.
        return min;
    }
    value.max(min).min(max)
}
