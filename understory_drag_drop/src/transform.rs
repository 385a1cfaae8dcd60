// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! CSS formatting and parsing helpers.
//!
//! All positional animation goes through `transform: translate3d(...)`; the
//! engine never writes `top`/`left`.

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use kurbo::common::FloatFuncs as _;
use kurbo::Vec2;

/// Format a `translate3d` transform for an offset in pixels.
///
/// Both components are rounded to whole pixels (some browsers blur elements
/// on sub-pixel transforms). Non-finite components are written as `0` so the
/// output is always a well-formed CSS value.
pub fn translate3d(offset: Vec2) -> String {
    format!(
        "translate3d({}px, {}px, 0)",
        whole_px(offset.x),
        whole_px(offset.y)
    )
}

fn whole_px(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    let rounded = value.round();
    // Avoid printing `-0px`.
    if rounded == 0.0 { 0.0 } else { rounded }
}

/// Parse a single CSS time (`"150ms"`, `"0.2s"`) into milliseconds.
///
/// Unparseable values are treated as zero.
pub fn parse_css_time_ms(value: &str) -> f64 {
    let value = value.trim();
    let (number, multiplier) = if let Some(n) = strip_suffix_ignore_case(value, "ms") {
        (n, 1.0)
    } else if let Some(n) = strip_suffix_ignore_case(value, "s") {
        (n, 1000.0)
    } else {
        (value, 1000.0)
    };
    number
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map_or(0.0, |n| n * multiplier)
}

fn strip_suffix_ignore_case<'a>(value: &'a str, suffix: &str) -> Option<&'a str> {
    let split = value.len().checked_sub(suffix.len())?;
    if !value.is_char_boundary(split) {
        return None;
    }
    let (head, tail) = value.split_at(split);
    tail.eq_ignore_ascii_case(suffix).then_some(head)
}

/// Total `transform` transition time in milliseconds from computed
/// `transition-property`, `transition-duration` and `transition-delay`
/// values.
///
/// Returns zero when neither `transform` nor `all` is transitioned.
pub fn transform_transition_ms(properties: &str, durations: &str, delays: &str) -> f64 {
    let Some(index) = properties
        .split(',')
        .map(str::trim)
        .position(|p| p == "transform" || p == "all")
    else {
        return 0.0;
    };
    let pick = |list: &str| {
        list.split(',')
            .map(str::trim)
            .nth(index)
            .map_or(0.0, parse_css_time_ms)
    };
    pick(durations) + pick(delays)
}
