//! Runtime parameters shared by every body
//!
//! `Parameters` holds:
//! - the orbit flattening factor applied to `y`,
//! - the base constant of the decorative spin period,
//! - the period of the sun's pulse,
//! - the seed for stars and comets and the clock epoch

use crate::configuration::config::ClockEpoch;

#[derive(Debug, Clone)]
pub struct Parameters {
    pub flatten_factor: f64,       // y-scale of the orbit plane
    pub spin_base_sec: f64,        // spin period numerator
    pub sun_pulse_period_sec: f64, // sun breath, 1 -> 0.95 -> 1
    pub seed: u64,                 // deterministic seed
    pub clock: ClockEpoch,         // simulation clock epoch
}

