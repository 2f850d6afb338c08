//! Build a validated runtime scene from configuration
//!
//! Takes a `SceneConfig` (YAML-facing) and produces a `Scene` containing:
//! - global parameters (`Parameters`)
//! - the immutable body list (`OrbitingBody`)
//! - the sky, parallax and detail-row curves
//! - the black-hole settings
//! - the seeded star fields and comet showers, one pair for the solar system
//!   and one for the black-hole section
//!
//! Validation is eager: the first invalid value aborts the build, so an engine
//! is never started from a partially-valid scene.

use std::collections::HashSet;
use std::fs::File;
use std::io::BufReader;
use std::ops::RangeInclusive;
use std::path::Path;

use log::info;

use crate::configuration::config::{BodyConfig, CometsConfig, SceneConfig, StarfieldConfig};
use crate::simulation::error::{SceneError, SceneResult};
use crate::simulation::params::Parameters;
use crate::simulation::sky::{DetailCurve, ParallaxBlock, SkyCurve};
use crate::simulation::starfield::{
    CometShower, CometSpread, StarField, BLACK_HOLE_COMETS_STREAM, BLACK_HOLE_STARS_STREAM, SKY_COMETS_STREAM,
    SKY_STARS_STREAM,
};
use crate::simulation::states::{OrbitingBody, Rgb};

/// Black hole settings resolved against the body list
#[derive(Debug, Clone)]
pub struct BlackHoleSpec {
    pub swallows: String,
    pub activation_ratio: f64,
    pub section_offset_viewports: f64,
    pub expand_period_sec: f64,
    pub shrink_duration_sec: f64,
    pub outer_ring_period_sec: f64,
    pub inner_ring_period_sec: f64,
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub parameters: Parameters,
    pub bodies: Vec<OrbitingBody>,
    pub sky: SkyCurve,
    pub black_hole: BlackHoleSpec,
    pub page_viewports: f64,
    pub blocks: Vec<ParallaxBlock>,
    pub details: DetailCurve,
    pub starfield: StarField,
    pub comets: CometShower,
    pub black_hole_starfield: StarField,
    pub black_hole_comets: CometShower,
}

impl Scene {
    pub fn from_yaml_str(yaml: &str) -> SceneResult<Self> {
        let cfg: SceneConfig = serde_yaml::from_str(yaml)?;
        Self::build(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> SceneResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let cfg: SceneConfig = serde_yaml::from_reader(reader)?;
        Self::build(cfg)
    }

    pub fn build(cfg: SceneConfig) -> SceneResult<Self> {
        if cfg.bodies.is_empty() {
            return Err(SceneError::EmptyBodySet);
        }

        // Bodies: map `BodyConfig` -> runtime `OrbitingBody`, rejecting bad values
        let mut seen = HashSet::new();
        let mut bodies = Vec::with_capacity(cfg.bodies.len());
        for bc in &cfg.bodies {
            if !seen.insert(bc.name.as_str()) {
                return Err(SceneError::DuplicateBodyName(bc.name.clone()));
            }
            bodies.push(build_body(bc)?);
        }

        // Parameters (runtime) from ParametersConfig
        let p_cfg = cfg.parameters;
        let parameters = Parameters {
            flatten_factor: positive("parameters.flatten_factor", p_cfg.flatten_factor)?,
            spin_base_sec: positive("parameters.spin_base_sec", p_cfg.spin_base_sec)?,
            sun_pulse_period_sec: positive("parameters.sun_pulse_period_sec", p_cfg.sun_pulse_period_sec)?,
            seed: p_cfg.seed,
            clock: p_cfg.clock,
        };

        let s_cfg = cfg.sky;
        let sky = SkyCurve {
            night_span: positive("sky.night_span", s_cfg.night_span)?,
            sun_fade_span: positive("sky.sun_fade_span", s_cfg.sun_fade_span)?,
            moon_gain: finite("sky.moon_gain", s_cfg.moon_gain)?,
            stars_span: positive("sky.stars_span", s_cfg.stars_span)?,
            horizontal_start_pct: finite("sky.horizontal_start_pct", s_cfg.horizontal_start_pct)?,
            horizontal_end_pct: finite("sky.horizontal_end_pct", s_cfg.horizontal_end_pct)?,
            scroll_hint_fade_px: positive("sky.scroll_hint_fade_px", s_cfg.scroll_hint_fade_px)?,
        };

        let bh = cfg.black_hole;
        if !bodies.iter().any(|b| b.name == bh.swallows) {
            return Err(SceneError::UnknownSwallowedBody(bh.swallows));
        }
        let black_hole = BlackHoleSpec {
            activation_ratio: positive("black_hole.activation_ratio", bh.activation_ratio)?,
            section_offset_viewports: finite("black_hole.section_offset_viewports", bh.section_offset_viewports)?,
            expand_period_sec: positive("black_hole.expand_period_sec", bh.expand_period_sec)?,
            shrink_duration_sec: positive("black_hole.shrink_duration_sec", bh.shrink_duration_sec)?,
            outer_ring_period_sec: positive("black_hole.outer_ring_period_sec", bh.outer_ring_period_sec)?,
            inner_ring_period_sec: positive("black_hole.inner_ring_period_sec", bh.inner_ring_period_sec)?,
            swallows: bh.swallows,
        };
        let black_hole_starfield = build_starfield(
            "black_hole.starfield",
            &bh.starfield,
            parameters.seed,
            BLACK_HOLE_STARS_STREAM,
        )?;
        let black_hole_comets = build_comets(
            "black_hole.comets",
            &bh.comets,
            parameters.seed,
            BLACK_HOLE_COMETS_STREAM,
        )?;

        let page_viewports = positive("layout.page_viewports", cfg.layout.page_viewports)?;

        let blocks = cfg
            .parallax
            .iter()
            .map(|pc| {
                Ok(ParallaxBlock {
                    name: pc.name.clone(),
                    translate_x: finite(&format!("parallax.{}.translate_x", pc.name), pc.translate_x)?,
                    translate_y: finite(&format!("parallax.{}.translate_y", pc.name), pc.translate_y)?,
                    scale: finite(&format!("parallax.{}.scale", pc.name), pc.scale)?,
                    rotate_deg: finite(&format!("parallax.{}.rotate_deg", pc.name), pc.rotate_deg)?,
                })
            })
            .collect::<SceneResult<Vec<_>>>()?;

        let d_cfg = cfg.details;
        let details = DetailCurve {
            row_y: finite("details.row_y", d_cfg.row_y)?,
            row_x: finite("details.row_x", d_cfg.row_x)?,
            image_y: finite("details.image_y", d_cfg.image_y)?,
            image_scale: finite("details.image_scale", d_cfg.image_scale)?,
        };

        let starfield = build_starfield("starfield", &cfg.starfield, parameters.seed, SKY_STARS_STREAM)?;
        let comets = build_comets("comets", &cfg.comets, parameters.seed, SKY_COMETS_STREAM)?;

        info!(
            "scene built: {} bodies, {} swallowed by the black hole, {}+{} stars, {}+{} comets",
            bodies.len(),
            black_hole.swallows,
            starfield.stars.len(),
            black_hole_starfield.stars.len(),
            comets.comets.len(),
            black_hole_comets.comets.len()
        );

        Ok(Self {
            parameters,
            bodies,
            sky,
            black_hole,
            page_viewports,
            blocks,
            details,
            starfield,
            comets,
            black_hole_starfield,
            black_hole_comets,
        })
    }

    pub fn body(&self, name: &str) -> Option<&OrbitingBody> {
        self.bodies.iter().find(|b| b.name == name)
    }
}

fn build_body(bc: &BodyConfig) -> SceneResult<OrbitingBody> {
    let field = |f: &str| format!("bodies.{}.{}", bc.name, f);

    let speed = finite(&field("orbit_speed_deg_per_sec"), bc.orbit_speed_deg_per_sec)?;
    if speed == 0.0 {
        return Err(SceneError::ZeroOrbitSpeed(bc.name.clone()));
    }

    let eccentricity = finite(&field("eccentricity"), bc.eccentricity)?;
    if !(0.0..1.0).contains(&eccentricity) {
        return Err(SceneError::EccentricityOutOfRange {
            name: bc.name.clone(),
            value: eccentricity,
        });
    }

    let color = Rgb::from_hex(&bc.color).ok_or_else(|| SceneError::InvalidColor {
        owner: bc.name.clone(),
        value: bc.color.clone(),
    })?;

    Ok(OrbitingBody {
        name: bc.name.clone(),
        orbit_radius_px: positive(&field("orbit_radius_px"), bc.orbit_radius_px)?,
        orbit_speed_deg_per_sec: speed,
        eccentricity,
        initial_angle_deg: finite(&field("initial_angle_deg"), bc.initial_angle_deg)?,
        visual_size: positive(&field("visual_size"), bc.visual_size)?,
        color,
        has_rings: bc.has_rings,
        stack_order: bc.stack_order,
    })
}

fn build_starfield(section: &str, cfg: &StarfieldConfig, seed: u64, stream: u64) -> SceneResult<StarField> {
    Ok(StarField::generate(
        cfg.count,
        seed,
        stream,
        positive(&format!("{section}.twinkle_period_sec"), cfg.twinkle_period_sec)?,
        finite(&format!("{section}.twinkle_min_opacity"), cfg.twinkle_min_opacity)?.clamp(0.0, 1.0),
    ))
}

fn build_comets(section: &str, cfg: &CometsConfig, seed: u64, stream: u64) -> SceneResult<CometShower> {
    let spread = CometSpread {
        travel_px: finite(&format!("{section}.travel_px"), cfg.travel_px)?,
        length_px: range(
            &format!("{section}.length_px"),
            positive(&format!("{section}.min_length_px"), cfg.min_length_px)?,
            positive(&format!("{section}.max_length_px"), cfg.max_length_px)?,
        )?,
        duration_sec: range(
            &format!("{section}.duration_sec"),
            positive(&format!("{section}.min_duration_sec"), cfg.min_duration_sec)?,
            positive(&format!("{section}.max_duration_sec"), cfg.max_duration_sec)?,
        )?,
        max_delay_sec: non_negative(&format!("{section}.max_delay_sec"), cfg.max_delay_sec)?,
    };
    Ok(CometShower::generate(cfg.count, seed, stream, &spread))
}

fn range(label: &str, min: f64, max: f64) -> SceneResult<RangeInclusive<f64>> {
    if min <= max {
        Ok(min..=max)
    } else {
        Err(SceneError::InvertedRange(label.to_owned()))
    }
}

fn non_negative(label: &str, value: f64) -> SceneResult<f64> {
    let value = finite(label, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(SceneError::Negative(label.to_owned()))
    }
}

fn finite(label: &str, value: f64) -> SceneResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SceneError::NonFinite(label.to_owned()))
    }
}

fn positive(label: &str, value: f64) -> SceneResult<f64> {
    let value = finite(label, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::NonPositive(label.to_owned()))
    }
}
