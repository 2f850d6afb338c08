//! Scroll offset → visual parameters
//!
//! Everything in this module is a pure function of the latest scroll offset
//! and viewport height. The scroll offset is unbounded, so every output is
//! clamped to its range. An unmeasured viewport (zero, negative or not finite)
//! maps to the top-of-page "day" state.
//!
//! Sun and moon opacity are computed independently and overlap while the sky
//! darkens.

use serde::Serialize;

use super::states::{NVec2, Rgb};

/// Coefficients of the sky transition, in viewport heights
#[derive(Debug, Clone)]
pub struct SkyCurve {
    pub night_span: f64,
    pub sun_fade_span: f64,
    pub moon_gain: f64,
    pub stars_span: f64,
    pub horizontal_start_pct: f64,
    pub horizontal_end_pct: f64,
    pub scroll_hint_fade_px: f64,
}

impl Default for SkyCurve {
    fn default() -> Self {
        Self {
            night_span: 0.8,
            sun_fade_span: 0.5,
            moon_gain: 1.2,
            stars_span: 0.3,
            horizontal_start_pct: 20.0,
            horizontal_end_pct: 80.0,
            scroll_hint_fade_px: 300.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualParams {
    pub sky_channel: f64,              // [0, 255], red and green of the sky, blue stays 255
    pub night_overlay_opacity: f64,    // [0, 1]
    pub celestial_horizontal_pct: f64, // [start, end] of the sky curve
    pub sun_opacity: f64,              // [0, 1]
    pub moon_opacity: f64,             // [0, 1]
    pub stars_opacity: f64,            // [0, 1]
    pub scroll_hint_opacity: f64,      // [0, 1]
}

impl VisualParams {
    /// Sky background color, `rgb(c, c, 255)`
    pub fn sky_rgb(&self) -> Rgb {
        let c = self.sky_channel.round().clamp(0.0, 255.0) as u8;
        Rgb::new(c, c, 255)
    }
}

/// Map a scroll sample to the sky parameters
pub fn visual_state(scroll_offset_px: f64, viewport_height_px: f64, curve: &SkyCurve) -> VisualParams {
    let scroll = sanitize_scroll(scroll_offset_px);

    // progress in viewports; zero until the viewport has been measured. Capped
    // so that a zero coefficient never meets an infinite ratio.
    let ratio = if viewport_height_px.is_finite() && viewport_height_px > 0.0 {
        (scroll / viewport_height_px).min(f64::MAX)
    } else {
        0.0
    };

    let (lo, hi) = ordered(curve.horizontal_start_pct, curve.horizontal_end_pct);

    VisualParams {
        sky_channel: (255.0 - ratio * 255.0).clamp(0.0, 255.0),
        night_overlay_opacity: unit(span_ratio(ratio, curve.night_span)),
        celestial_horizontal_pct: (curve.horizontal_start_pct
            + ratio * (curve.horizontal_end_pct - curve.horizontal_start_pct))
            .clamp(lo, hi),
        sun_opacity: unit(1.0 - span_ratio(ratio, curve.sun_fade_span)),
        moon_opacity: unit(ratio * curve.moon_gain),
        stars_opacity: unit(span_ratio(ratio, curve.stars_span)),
        scroll_hint_opacity: unit(1.0 - span_ratio(scroll, curve.scroll_hint_fade_px)),
    }
}

/// Named content block that drifts with the scroll offset
#[derive(Debug, Clone)]
pub struct ParallaxBlock {
    pub name: String,
    pub translate_x: f64,
    pub translate_y: f64,
    pub scale: f64,
    pub rotate_deg: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BlockOffset {
    pub name: String,
    pub translate: NVec2, // px
    pub scale: f64,       // 1 at the top of the page
    pub rotate_deg: f64,
}

impl ParallaxBlock {
    pub fn offset(&self, scroll_offset_px: f64) -> BlockOffset {
        let s = sanitize_scroll(scroll_offset_px);
        BlockOffset {
            name: self.name.clone(),
            translate: NVec2::new(self.translate_x * s, self.translate_y * s),
            scale: 1.0 + self.scale * s,
            rotate_deg: self.rotate_deg * s,
        }
    }
}

/// Coefficients of the alternating planet detail rows
#[derive(Debug, Clone)]
pub struct DetailCurve {
    pub row_y: f64,
    pub row_x: f64,
    pub image_y: f64,
    pub image_scale: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailRow {
    pub name: String,
    pub translate: NVec2,
    pub image_translate_y: f64,
    pub image_scale: f64,
    pub opacity: f64, // 0 while the body is swallowed
}

impl DetailCurve {
    /// Detail row of the `index`-th body; even rows drift down and left, odd rows up and right
    pub fn row(&self, index: usize, name: &str, scroll_offset_px: f64, swallowed: bool) -> DetailRow {
        let s = sanitize_scroll(scroll_offset_px);
        let sign = if index % 2 == 0 { 1.0 } else { -1.0 };
        DetailRow {
            name: name.to_owned(),
            translate: NVec2::new(-sign * self.row_x * s, sign * self.row_y * s),
            image_translate_y: -sign * self.image_y * s,
            image_scale: 1.0 + self.image_scale * s,
            opacity: if swallowed { 0.0 } else { 1.0 },
        }
    }
}

// negative (overscroll) and NaN samples count as the top of the page, +inf
// saturates to the largest finite offset
fn sanitize_scroll(scroll_offset_px: f64) -> f64 {
    if scroll_offset_px.is_nan() {
        0.0
    } else {
        scroll_offset_px.clamp(0.0, f64::MAX)
    }
}

fn span_ratio(value: f64, span: f64) -> f64 {
    if span > 0.0 {
        value / span
    } else if value > 0.0 {
        f64::INFINITY
    } else {
        0.0
    }
}

fn unit(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}
