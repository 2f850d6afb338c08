//! Configuration types for loading animation scenes from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! scene. A scene consists of:
//!
//! - [`ParametersConfig`] – orbit flattening, spin constant, sun pulse, seed and clock epoch
//! - [`SkyConfig`]        – coefficients of the scroll → sky mapping
//! - [`BlackHoleConfig`]  – which body gets swallowed and when, and the section's own sky
//! - [`LayoutConfig`]     – page height used by the viewer
//! - [`ParallaxConfig`]   – per-block parallax coefficients
//! - [`DetailsConfig`]    – parallax of the planet detail rows
//! - [`StarfieldConfig`] / [`CometsConfig`] – decorative background
//! - [`BodyConfig`]       – one orbiting body
//! - [`SceneConfig`]      – top-level wrapper used to load a scene from YAML
//!
//! Every section except `bodies` and `black_hole` has defaults, so a minimal
//! scene only lists its planets and the body that the black hole takes.
//!
//! # YAML format
//!
//! ```yaml
//! parameters:
//!   flatten_factor: 0.3     # vertical squash of every orbit
//!   spin_base_sec: 2.5      # spin period = spin_base_sec / orbit_speed
//!   seed: 42                # star field and comet seed
//!   clock: unix             # or "startup"
//!
//! black_hole:
//!   swallows: Neptune
//!   activation_ratio: 0.8
//!
//! bodies:
//!   - name: Earth
//!     orbit_radius_px: 300.0
//!     orbit_speed_deg_per_sec: 2.0
//!     eccentricity: 0.02
//!     initial_angle_deg: 230.0
//!     visual_size: 48.0
//!     color: "#4B92DB"
//!     stack_order: 6
//! ```
//!
//! The scene builder then validates this configuration and maps it into the
//! runtime [`Scene`](crate::simulation::scenario::Scene).

use serde::Deserialize;

/// Where the simulation clock starts counting from
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClockEpoch {
    #[serde(rename = "unix")] // Seconds since 1970, so planets sit at the wall-clock phase
    #[default]
    Unix,

    #[serde(rename = "startup")] // Zero at startup, every run starts at the initial angles
    Startup,
}

/// Global parameters shared by every body
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct ParametersConfig {
    pub flatten_factor: f64,       // y-scale of the orbit plane, gives the isometric look
    pub spin_base_sec: f64,        // base constant of the decorative spin period
    pub sun_pulse_period_sec: f64, // one full breath of the central sun
    pub seed: u64,                 // seed for stars and comets
    pub clock: ClockEpoch,         // epoch of the simulation clock
}

impl Default for ParametersConfig {
    fn default() -> Self {
        Self {
            flatten_factor: 0.3,
            spin_base_sec: 2.5,
            sun_pulse_period_sec: 3.0,
            seed: 42,
            clock: ClockEpoch::Unix,
        }
    }
}

/// Coefficients of the scroll → sky mapping, expressed in viewport heights
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SkyConfig {
    pub night_span: f64,           // scroll (in viewports) until the night overlay is opaque
    pub sun_fade_span: f64,        // scroll (in viewports) until the sun is gone
    pub moon_gain: f64,            // moon opacity per viewport scrolled
    pub stars_span: f64,           // scroll (in viewports) until the stars are fully visible
    pub horizontal_start_pct: f64, // sun/moon horizontal position at the top of the page
    pub horizontal_end_pct: f64,   // sun/moon horizontal position once a viewport is scrolled
    pub scroll_hint_fade_px: f64,  // scroll in px until the "scroll to continue" hint is gone
}

impl Default for SkyConfig {
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

/// Black hole section and the body it swallows
#[derive(Deserialize, Debug, Clone)]
pub struct BlackHoleConfig {
    pub swallows: String, // name of the designated body
    #[serde(default = "default_activation_ratio")]
    pub activation_ratio: f64, // active while section top < viewport * ratio
    #[serde(default = "default_section_offset")]
    pub section_offset_viewports: f64, // where the section starts on the page, in viewports
    #[serde(default = "default_expand_period")]
    pub expand_period_sec: f64, // one half-cycle of the pulsing animation
    #[serde(default = "default_shrink_duration")]
    pub shrink_duration_sec: f64, // the swallowed body shrinks away over this time
    #[serde(default = "default_outer_ring_period")]
    pub outer_ring_period_sec: f64, // one clockwise turn of the outer ring
    #[serde(default = "default_inner_ring_period")]
    pub inner_ring_period_sec: f64, // one counter-clockwise turn of the inner ring
    #[serde(default = "default_black_hole_starfield")]
    pub starfield: StarfieldConfig,
    #[serde(default = "default_black_hole_comets")]
    pub comets: CometsConfig,
}

fn default_activation_ratio() -> f64 {
    0.8
}

fn default_section_offset() -> f64 {
    2.0
}

fn default_expand_period() -> f64 {
    3.0
}

fn default_shrink_duration() -> f64 {
    2.0
}

fn default_outer_ring_period() -> f64 {
    20.0
}

fn default_inner_ring_period() -> f64 {
    15.0
}

fn default_black_hole_starfield() -> StarfieldConfig {
    StarfieldConfig {
        count: 300,
        ..Default::default()
    }
}

fn default_black_hole_comets() -> CometsConfig {
    CometsConfig {
        count: 15,
        travel_px: 400.0,
        min_length_px: 60.0,
        max_length_px: 160.0,
        min_duration_sec: 8.0,
        max_duration_sec: 20.0,
        max_delay_sec: 5.0,
    }
}

/// Page geometry used by the viewer to bound the scroll offset
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct LayoutConfig {
    pub page_viewports: f64, // total page height in viewports
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { page_viewports: 3.0 }
    }
}

/// One content block moving with the scroll offset
///
/// Each coefficient is multiplied by the scroll offset in px.
#[derive(Deserialize, Debug, Clone)]
pub struct ParallaxConfig {
    pub name: String,
    #[serde(default)]
    pub translate_x: f64, // px per px scrolled
    #[serde(default)]
    pub translate_y: f64, // px per px scrolled
    #[serde(default)]
    pub scale: f64, // added scale per px scrolled
    #[serde(default)]
    pub rotate_deg: f64, // degrees per px scrolled
}

/// Parallax of the alternating planet detail rows
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct DetailsConfig {
    pub row_y: f64,       // vertical drift of a row, sign alternates per row
    pub row_x: f64,       // horizontal drift of a row, opposite sign to row_y
    pub image_y: f64,     // vertical drift of the row's planet image
    pub image_scale: f64, // growth of the planet image per px scrolled
}

impl Default for DetailsConfig {
    fn default() -> Self {
        Self {
            row_y: 0.08,
            row_x: 0.03,
            image_y: 0.05,
            image_scale: 0.0001,
        }
    }
}

/// Twinkling background stars
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct StarfieldConfig {
    pub count: usize,
    pub twinkle_period_sec: f64, // full 1 -> min -> 1 cycle
    pub twinkle_min_opacity: f64,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            count: 100,
            twinkle_period_sec: 2.0,
            twinkle_min_opacity: 0.3,
        }
    }
}

/// Comets crossing the solar system (or the black-hole section)
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct CometsConfig {
    pub count: usize,
    pub travel_px: f64, // distance covered during one fly cycle
    pub min_length_px: f64,
    pub max_length_px: f64,
    pub min_duration_sec: f64, // length of one fly cycle
    pub max_duration_sec: f64,
    pub max_delay_sec: f64, // before the first cycle
}

impl Default for CometsConfig {
    fn default() -> Self {
        Self {
            count: 12,
            travel_px: 400.0,
            min_length_px: 80.0,
            max_length_px: 200.0,
            min_duration_sec: 5.0,
            max_duration_sec: 20.0,
            max_delay_sec: 10.0,
        }
    }
}

/// Configuration for a single orbiting body
#[derive(Deserialize, Debug, Clone)]
pub struct BodyConfig {
    pub name: String,                 // unique identifier, also the label
    pub orbit_radius_px: f64,         // semi-major axis in px
    pub orbit_speed_deg_per_sec: f64, // angular speed, must not be zero
    pub eccentricity: f64,            // in [0, 1)
    #[serde(default)]
    pub initial_angle_deg: f64, // phase at t = 0
    pub visual_size: f64,       // diameter in px
    pub color: String,          // "#RRGGBB"
    #[serde(default)]
    pub has_rings: bool,
    #[serde(default)]
    pub stack_order: i32, // higher draws on top
}

/// Top-level scene configuration loaded from YAML
#[derive(Deserialize, Debug, Clone)]
pub struct SceneConfig {
    #[serde(default)]
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub sky: SkyConfig,
    pub black_hole: BlackHoleConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub parallax: Vec<ParallaxConfig>,
    #[serde(default)]
    pub details: DetailsConfig,
    #[serde(default)]
    pub starfield: StarfieldConfig,
    #[serde(default)]
    pub comets: CometsConfig,
    pub bodies: Vec<BodyConfig>,
}
