//! Seeded decorative background: twinkling stars and flying comets
//!
//! Layouts are generated once from the scene seed, so the same scene always
//! produces the same sky. Per-tick values (twinkle, comet progress) are derived
//! from absolute time like the orbits.
//!
//! Each layer draws from its own ChaCha stream of the seed, so resizing one
//! layer never reshuffles another.

use std::ops::RangeInclusive;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::black_hole::eased_dip;
use super::states::NVec2;

pub const SKY_STARS_STREAM: u64 = 0;
pub const SKY_COMETS_STREAM: u64 = 1;
pub const BLACK_HOLE_STARS_STREAM: u64 = 2;
pub const BLACK_HOLE_COMETS_STREAM: u64 = 3;

/// Delay of each of the three twinkle groups, in seconds
pub const TWINKLE_DELAYS_SEC: [f64; 3] = [0.0, 0.5, 1.0];

#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    pub x_pct: f64,   // [0, 100) of the viewport width
    pub y_pct: f64,   // [0, 100) of the viewport height
    pub size_px: f64, // [1, 4)
    pub delay_sec: f64,
}

#[derive(Debug, Clone)]
pub struct StarField {
    pub stars: Vec<Star>,
    pub period_sec: f64,
    pub min_opacity: f64,
}

impl StarField {
    pub fn generate(count: usize, seed: u64, stream: u64, period_sec: f64, min_opacity: f64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);
        let stars = (0..count)
            .map(|i| Star {
                x_pct: rng.gen_range(0.0..100.0),
                y_pct: rng.gen_range(0.0..100.0),
                size_px: rng.gen_range(1.0..4.0),
                delay_sec: TWINKLE_DELAYS_SEC[i % 3],
            })
            .collect();

        Self {
            stars,
            period_sec,
            min_opacity,
        }
    }

    /// Twinkle opacity of one star: 1 -> min -> 1 over a period, eased on each half
    pub fn twinkle(&self, star: &Star, sim_time_sec: f64) -> f64 {
        let local = sim_time_sec - star.delay_sec;
        if local < 0.0 {
            return 1.0;
        }
        1.0 - (1.0 - self.min_opacity) * eased_dip(local / self.period_sec)
    }

    /// Opacity of every star, scaled by the scroll-driven star field opacity
    pub fn opacities(&self, sim_time_sec: f64, stars_opacity: f64) -> Vec<f64> {
        self.stars
            .iter()
            .map(|s| stars_opacity * self.twinkle(s, sim_time_sec))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comet {
    pub start_pct: NVec2, // start position, percent of the solar system view
    pub length_px: f64,   // within the shower's length range
    pub heading_deg: f64, // [-45, 45)
    pub opacity: f64,     // [0.7, 1.0)
    pub duration_sec: f64,
    pub delay_sec: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CometFrame {
    pub visible: bool,
    pub progress: f64, // [0, 1) through the current fly cycle
    pub offset: NVec2, // px along the heading from the start position
    pub opacity: f64,
}

/// Ranges a shower draws its comets from
#[derive(Debug, Clone)]
pub struct CometSpread {
    pub travel_px: f64,
    pub length_px: RangeInclusive<f64>,
    pub duration_sec: RangeInclusive<f64>,
    pub max_delay_sec: f64,
}

#[derive(Debug, Clone)]
pub struct CometShower {
    pub comets: Vec<Comet>,
    pub travel_px: f64,
}

impl CometShower {
    pub fn generate(count: usize, seed: u64, stream: u64, spread: &CometSpread) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        rng.set_stream(stream);

        let comets = (0..count)
            .map(|_| Comet {
                start_pct: NVec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)),
                length_px: rng.gen_range(spread.length_px.clone()),
                heading_deg: rng.gen_range(-45.0..45.0),
                opacity: rng.gen_range(0.7..1.0),
                duration_sec: rng.gen_range(spread.duration_sec.clone()),
                delay_sec: rng.gen_range(0.0..=spread.max_delay_sec),
            })
            .collect();

        Self {
            comets,
            travel_px: spread.travel_px,
        }
    }

    pub fn frame(&self, comet: &Comet, sim_time_sec: f64) -> CometFrame {
        let local = sim_time_sec - comet.delay_sec;
        if local < 0.0 {
            return CometFrame {
                visible: false,
                progress: 0.0,
                offset: NVec2::zeros(),
                opacity: 0.0,
            };
        }

        let progress = (local / comet.duration_sec).rem_euclid(1.0);
        let heading = comet.heading_deg.to_radians();
        let distance = progress * self.travel_px;

        CometFrame {
            visible: true,
            progress,
            offset: NVec2::new(heading.cos(), heading.sin()) * distance,
            opacity: comet.opacity * (std::f64::consts::PI * progress).sin(),
        }
    }

    pub fn frames(&self, sim_time_sec: f64) -> Vec<CometFrame> {
        self.comets.iter().map(|c| self.frame(c, sim_time_sec)).collect()
    }
}
