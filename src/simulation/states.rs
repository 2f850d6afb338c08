//! Core state types for the animation.
//!
//! - `OrbitingBody`: immutable per-body configuration, built once at startup
//! - `BodyFrame`:    where a body is drawn on one tick
//! - `BlackHoleFrame`: the black-hole section on one tick
//! - `Frame`:        everything the rendering layer paints on one tick
//!
//! Positions are offsets in px from the center of the solar system, with `y`
//! growing downwards like page coordinates.

use nalgebra::Vector2;
use serde::Serialize;

use super::black_hole::{BlackHolePulse, RingAngles, Shrink};
use super::orbit::SunPulse;
use super::sky::{BlockOffset, DetailRow, VisualParams};
use super::starfield::CometFrame;

pub type NVec2 = Vector2<f64>;

/// 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` (the leading `#` is optional)
    pub fn from_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Channels scaled to [0, 1]
    pub fn to_unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitingBody {
    pub name: String,                 // unique identifier
    pub orbit_radius_px: f64,         // semi-major axis
    pub orbit_speed_deg_per_sec: f64, // never zero
    pub eccentricity: f64,            // in [0, 1)
    pub initial_angle_deg: f64,       // phase at t = 0
    pub visual_size: f64,             // render hint
    pub color: Rgb,                   // render hint
    pub has_rings: bool,              // render hint
    pub stack_order: i32,             // draw order only
}

/// One body on one tick
#[derive(Debug, Clone, Serialize)]
pub struct BodyFrame {
    pub name: String,
    pub position: NVec2, // offset from the center in px
    pub suppressed: bool, // swallowed: the label is hidden, the body shrinks away
    pub shrink: Shrink,   // Shrink::NONE unless swallowed
    pub spin_deg: f64,    // decorative surface rotation
    pub stack_order: i32,
}

/// Black-hole section on one tick
#[derive(Debug, Clone, Serialize)]
pub struct BlackHoleFrame {
    pub pulse: BlackHolePulse,
    pub rings: RingAngles,
    pub star_opacity: Vec<f64>, // the section is always dark, so only the twinkle
    pub comets: Vec<CometFrame>,
}

/// Flat parameter set handed to the rendering layer on every tick
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub sim_time_sec: f64,
    pub visual: VisualParams,
    pub sun: SunPulse,
    pub bodies: Vec<BodyFrame>, // back to front
    pub swallowed: Vec<String>,
    pub blocks: Vec<BlockOffset>,
    pub details: Vec<DetailRow>,
    pub star_opacity: Vec<f64>,
    pub comets: Vec<CometFrame>,
    pub black_hole: BlackHoleFrame,
}

impl Frame {
    pub fn body(&self, name: &str) -> Option<&BodyFrame> {
        self.bodies.iter().find(|b| b.name == name)
    }

    pub fn block(&self, name: &str) -> Option<&BlockOffset> {
        self.blocks.iter().find(|b| b.name == name)
    }
}
