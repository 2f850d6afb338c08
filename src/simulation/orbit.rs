//! Orbital positions derived from absolute simulation time
//!
//! Every value here is a pure function of `t` and the body, so there is no
//! per-tick accumulation and nothing drifts with frame rate or long uptimes.
//! The angle is reduced modulo 360 before any trigonometry.
//!
//! The radius is modulated by the phase angle itself,
//! `r = a * (1 - e * cos(angle))`, rather than by a true anomaly. Orbits are
//! decorative and this is the shape they are drawn with.

use serde::Serialize;

use super::black_hole::eased_dip;
use super::states::{NVec2, OrbitingBody};

/// Orbital phase angle in degrees, reduced modulo 360
pub fn phase_angle_deg(body: &OrbitingBody, sim_time_sec: f64) -> f64 {
    (sim_time_sec * body.orbit_speed_deg_per_sec + body.initial_angle_deg).rem_euclid(360.0)
}

/// Distance from the center at a given phase angle (radians)
pub fn orbit_radius(body: &OrbitingBody, angle_rad: f64) -> f64 {
    body.orbit_radius_px * (1.0 - body.eccentricity * angle_rad.cos())
}

/// Offset of the body from the center at `sim_time_sec`
pub fn position(body: &OrbitingBody, sim_time_sec: f64, flatten_factor: f64) -> NVec2 {
    let angle = phase_angle_deg(body, sim_time_sec).to_radians();
    let r = orbit_radius(body, angle);
    NVec2::new(r * angle.cos(), r * angle.sin() * flatten_factor)
}

/// Time for one full orbit
pub fn orbital_period_sec(body: &OrbitingBody) -> f64 {
    360.0 / body.orbit_speed_deg_per_sec.abs()
}

/// Period of the decorative surface rotation, signed like the orbit speed
pub fn spin_period_sec(body: &OrbitingBody, spin_base_sec: f64) -> f64 {
    spin_base_sec / body.orbit_speed_deg_per_sec
}

/// Surface rotation in degrees, in [0, 360)
pub fn spin_deg(body: &OrbitingBody, sim_time_sec: f64, spin_base_sec: f64) -> f64 {
    // t / period turns, folded to a single turn before scaling to degrees
    let turns = (sim_time_sec / spin_period_sec(body, spin_base_sec)).rem_euclid(1.0);
    (turns * 360.0).rem_euclid(360.0)
}

/// Semi-axes of the orbit guide drawn behind the planets
pub fn orbit_path(body: &OrbitingBody, flatten_factor: f64) -> NVec2 {
    NVec2::new(body.orbit_radius_px, body.orbit_radius_px * flatten_factor)
}

/// Breathing of the sun at the center of every orbit
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SunPulse {
    pub scale: f64,   // 1 .. 0.95
    pub opacity: f64, // 1 .. 0.8
}

/// Sun pulse at `sim_time_sec`: dims and shrinks halfway through each period
pub fn sun_pulse(sim_time_sec: f64, period_sec: f64) -> SunPulse {
    let dip = eased_dip(sim_time_sec / period_sec);
    SunPulse {
        scale: 1.0 - 0.05 * dip,
        opacity: 1.0 - 0.2 * dip,
    }
}
