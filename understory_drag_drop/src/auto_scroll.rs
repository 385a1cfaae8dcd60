// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Edge auto-scrolling while dragging.
//!
//! A container resolves which node should scroll (and in which directions)
//! from the pointer position on every processed move. The resolved decision is
//! held by an [`AutoScroller`], which nudges the node by a fixed step on every
//! animation frame until the decision changes to "nothing".

use kurbo::{Point, Rect, Vec2};

use crate::host::{DragDropHost, ScrollMetrics, ScrollTarget};

/// Vertical auto-scroll direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum VerticalScroll {
    /// Not scrolling vertically.
    #[default]
    None,
    /// Toward the top.
    Up,
    /// Toward the bottom.
    Down,
}

/// Horizontal auto-scroll direction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum HorizontalScroll {
    /// Not scrolling horizontally.
    #[default]
    None,
    /// Toward the left.
    Left,
    /// Toward the right.
    Right,
}

/// Which edge band of `rect`, if any, `y` falls into.
pub fn vertical_scroll_direction(rect: Rect, proximity: f64, y: f64) -> VerticalScroll {
    let threshold = rect.height() * proximity;
    if y >= rect.y0 - threshold && y <= rect.y0 + threshold {
        VerticalScroll::Up
    } else if y >= rect.y1 - threshold && y <= rect.y1 + threshold {
        VerticalScroll::Down
    } else {
        VerticalScroll::None
    }
}

/// Which edge band of `rect`, if any, `x` falls into.
pub fn horizontal_scroll_direction(rect: Rect, proximity: f64, x: f64) -> HorizontalScroll {
    let threshold = rect.width() * proximity;
    if x >= rect.x0 - threshold && x <= rect.x0 + threshold {
        HorizontalScroll::Left
    } else if x >= rect.x1 - threshold && x <= rect.x1 + threshold {
        HorizontalScroll::Right
    } else {
        HorizontalScroll::None
    }
}

/// Edge directions for `point` over `rect`, dropping any direction in which
/// the scroller described by `metrics` cannot move any further.
///
/// Exhausted directions yield to an outer scroller.
pub fn scroll_directions(
    metrics: ScrollMetrics,
    rect: Rect,
    proximity: f64,
    point: Point,
) -> (VerticalScroll, HorizontalScroll) {
    let vertical = match vertical_scroll_direction(rect, proximity, point.y) {
        VerticalScroll::Up if metrics.offset.y > 0.0 => VerticalScroll::Up,
        VerticalScroll::Down
            if metrics.scroll_size.height - metrics.offset.y > metrics.client_size.height =>
        {
            VerticalScroll::Down
        }
        _ => VerticalScroll::None,
    };
    let horizontal = match horizontal_scroll_direction(rect, proximity, point.x) {
        HorizontalScroll::Left if metrics.offset.x > 0.0 => HorizontalScroll::Left,
        HorizontalScroll::Right
            if metrics.scroll_size.width - metrics.offset.x > metrics.client_size.width =>
        {
            HorizontalScroll::Right
        }
        _ => HorizontalScroll::None,
    };
    (vertical, horizontal)
}

/// The per-frame scroll ticker for one container.
#[derive(Clone, Debug)]
pub struct AutoScroller<E> {
    target: Option<ScrollTarget<E>>,
    vertical: VerticalScroll,
    horizontal: HorizontalScroll,
}

impl<E> Default for AutoScroller<E> {
    fn default() -> Self {
        Self {
            target: None,
            vertical: VerticalScroll::None,
            horizontal: HorizontalScroll::None,
        }
    }
}

impl<E: Clone + PartialEq> AutoScroller<E> {
    /// Apply a newly resolved decision.
    ///
    /// Returns `true` if the running decision changed. A decision with no
    /// active direction stops the ticker.
    pub fn update(
        &mut self,
        target: ScrollTarget<E>,
        vertical: VerticalScroll,
        horizontal: HorizontalScroll,
    ) -> bool {
        if self.target.as_ref() == Some(&target)
            && self.vertical == vertical
            && self.horizontal == horizontal
        {
            return false;
        }
        self.vertical = vertical;
        self.horizontal = horizontal;
        self.target = Some(target);
        if vertical == VerticalScroll::None && horizontal == HorizontalScroll::None {
            self.stop();
        }
        true
    }

    /// Stop scrolling.
    pub fn stop(&mut self) {
        self.target = None;
        self.vertical = VerticalScroll::None;
        self.horizontal = HorizontalScroll::None;
    }

    /// Returns `true` while a direction is active.
    pub fn is_running(&self) -> bool {
        self.target.is_some()
            && (self.vertical != VerticalScroll::None || self.horizontal != HorizontalScroll::None)
    }

    /// The node currently being scrolled.
    pub fn target(&self) -> Option<&ScrollTarget<E>> {
        self.target.as_ref().filter(|_| self.is_running())
    }

    /// Current directions.
    pub fn directions(&self) -> (VerticalScroll, HorizontalScroll) {
        (self.vertical, self.horizontal)
    }

    /// The scroll delta applied per frame for a given step.
    pub fn frame_delta(&self, step: f64) -> Vec2 {
        let y = match self.vertical {
            VerticalScroll::Up => -step,
            VerticalScroll::Down => step,
            VerticalScroll::None => 0.0,
        };
        let x = match self.horizontal {
            HorizontalScroll::Left => -step,
            HorizontalScroll::Right => step,
            HorizontalScroll::None => 0.0,
        };
        Vec2::new(x, y)
    }

    /// Nudge the target by one frame's worth of scrolling.
    pub fn tick<H: DragDropHost<Element = E>>(&self, host: &mut H, step: f64) {
        if let Some(target) = self.target() {
            host.scroll_by(target, self.frame_delta(step));
        }
    }
}
