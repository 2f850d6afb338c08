//! Black-hole sequencer
//!
//! A two-state machine re-evaluated on every scroll sample:
//!
//! - `Dormant`: the section is below the activation line, nothing is swallowed
//! - `Active`:  the section's top edge is above `viewport * activation_ratio`,
//!   the designated body is swallowed
//!
//! Transitions are level-triggered. Staying inside the zone keeps the
//! activation instant, leaving it forgets it, so re-entering starts the
//! sequence over.
//!
//! Scroll samples arrive between ticks and carry no time, so a fresh activation
//! is stamped with the first tick that shows it. Every animation derived from
//! the activation (pulse, shrink) therefore starts at its first keyframe.

use std::collections::BTreeSet;

use log::debug;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SequencerState {
    Dormant,
    Active { since_sec: Option<f64> }, // sim time of the first tick after the transition
}

/// Names of the bodies that are currently not drawn
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SwallowedSet(BTreeSet<String>);

impl SwallowedSet {
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Pulsing of the black hole while it is active
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlackHolePulse {
    pub scale: f64,      // 1 .. 1.5
    pub rotate_deg: f64, // 0 .. 180
}

impl BlackHolePulse {
    pub const REST: Self = Self {
        scale: 1.0,
        rotate_deg: 0.0,
    };
}

/// Swallow animation of the designated body: shrinks to nothing while spinning
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Shrink {
    pub scale: f64,      // 1 .. 0
    pub rotate_deg: f64, // 0 .. 720
}

impl Shrink {
    pub const NONE: Self = Self {
        scale: 1.0,
        rotate_deg: 0.0,
    };
}

/// Rotation of the two rings around the black hole
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RingAngles {
    pub outer_deg: f64, // clockwise
    pub inner_deg: f64, // counter-clockwise, so always <= 0
}

/// Ring angles at `sim_time_sec`, independent of the sequencer state
pub fn ring_angles(sim_time_sec: f64, outer_period_sec: f64, inner_period_sec: f64) -> RingAngles {
    RingAngles {
        outer_deg: (sim_time_sec / outer_period_sec).rem_euclid(1.0) * 360.0,
        inner_deg: -(sim_time_sec / inner_period_sec).rem_euclid(1.0) * 360.0,
    }
}

#[derive(Debug, Clone)]
pub struct BlackHoleSequencer {
    target: String,        // the one body that gets swallowed
    activation_ratio: f64, // fraction of the viewport height
    expand_period_sec: f64,
    shrink_sec: f64,
    state: SequencerState,
    swallowed: SwallowedSet,
}

impl BlackHoleSequencer {
    pub fn new(target: impl Into<String>, activation_ratio: f64, expand_period_sec: f64, shrink_sec: f64) -> Self {
        Self {
            target: target.into(),
            activation_ratio,
            expand_period_sec,
            shrink_sec,
            state: SequencerState::Dormant,
            swallowed: SwallowedSet::default(),
        }
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SequencerState::Active { .. })
    }

    pub fn swallowed(&self) -> &SwallowedSet {
        &self.swallowed
    }

    /// Re-evaluate the state from the section's distance to the viewport top.
    ///
    /// An unmeasured viewport keeps the sequencer dormant.
    pub fn update(&mut self, section_top_px: f64, viewport_height_px: f64) -> SequencerState {
        let measured = viewport_height_px.is_finite() && viewport_height_px > 0.0;
        let in_zone = measured
            && section_top_px.is_finite()
            && section_top_px < viewport_height_px * self.activation_ratio;

        match (self.state, in_zone) {
            (SequencerState::Dormant, true) => {
                debug!("black hole active, swallowing {}", self.target);
                self.state = SequencerState::Active { since_sec: None };
            }
            (SequencerState::Active { .. }, false) => {
                debug!("black hole dormant, {} restored", self.target);
                self.state = SequencerState::Dormant;
            }
            _ => {}
        }

        // the swallowed set always mirrors the state, whatever happened before
        self.swallowed.0.clear();
        if self.is_active() {
            self.swallowed.0.insert(self.target.clone());
        }

        self.state
    }

    /// Stamp a fresh activation with the time of the tick that first shows it
    pub fn start_clock(&mut self, now_sec: f64) {
        if let SequencerState::Active { since_sec: None } = self.state {
            debug!("black hole animation starts at t={now_sec:.3}");
            self.state = SequencerState::Active {
                since_sec: Some(now_sec),
            };
        }
    }

    fn active_since(&self) -> Option<f64> {
        match self.state {
            SequencerState::Active { since_sec } => since_sec,
            SequencerState::Dormant => None,
        }
    }

    /// Pulse of the black hole at `now_sec`: eased ping-pong between rest and full
    /// expansion, starting from rest at the activation instant.
    pub fn pulse(&self, now_sec: f64) -> BlackHolePulse {
        let Some(since_sec) = self.active_since() else {
            return BlackHolePulse::REST;
        };

        let elapsed = (now_sec - since_sec).max(0.0);
        let cycle = (elapsed / self.expand_period_sec).rem_euclid(2.0);
        // forward on even half-cycles, backwards on odd ones
        let p = if cycle <= 1.0 { cycle } else { 2.0 - cycle };
        let eased = ease_in_out(p);

        BlackHolePulse {
            scale: 1.0 + 0.5 * eased,
            rotate_deg: 180.0 * eased,
        }
    }

    /// Swallow animation of the target at `now_sec`. Runs once and holds at
    /// scale 0 for as long as the sequencer stays active.
    pub fn shrink(&self, now_sec: f64) -> Shrink {
        let Some(since_sec) = self.active_since() else {
            return Shrink::NONE;
        };

        let p = ease_in_out((now_sec - since_sec) / self.shrink_sec);
        Shrink {
            scale: 1.0 - p,
            rotate_deg: 720.0 * p,
        }
    }
}

/// 0 at both ends of a cycle, 1 halfway, eased on each half
pub fn eased_dip(phase: f64) -> f64 {
    let p = phase.rem_euclid(1.0);
    if p < 0.5 {
        ease_in_out(p * 2.0)
    } else {
        ease_in_out((1.0 - p) * 2.0)
    }
}

/// Cubic ease-in-out on [0, 1]
pub fn ease_in_out(p: f64) -> f64 {
    let p = p.clamp(0.0, 1.0);
    if p < 0.5 {
        4.0 * p * p * p
    } else {
        1.0 - (-2.0 * p + 2.0).powi(3) / 2.0
    }
}
