//! Runtime engine driven by the host
//!
//! The host feeds three kinds of samples: resizes, scroll events and animation
//! ticks. Scroll and resize only record the latest inputs (and re-evaluate the
//! black-hole sequencer); a tick recomputes the whole `Frame` from scratch out
//! of the tick time and those inputs. Scroll samples carry no time, so a
//! black-hole activation takes the time of the next tick.
//!
//! `detach` is the teardown: once detached, no callback changes state or
//! produces a frame.

use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::Resource;
use log::{info, warn};

use crate::configuration::config::ClockEpoch;
use crate::simulation::black_hole::{ring_angles, BlackHoleSequencer, Shrink};
use crate::simulation::orbit;
use crate::simulation::scenario::Scene;
use crate::simulation::sky::visual_state;
use crate::simulation::states::{BlackHoleFrame, BodyFrame, Frame};

/// Simulation clock: `epoch offset + elapsed`, monotonic as long as `elapsed` is.
///
/// With the Unix epoch the offset is around 1.7e9 s, which still leaves a
/// resolution of about 2e-7 s in an `f64`.
#[derive(Debug, Clone, Copy)]
pub struct SimClock {
    pub offset_sec: f64,
}

impl SimClock {
    pub fn new(epoch: ClockEpoch) -> Self {
        let offset_sec = match epoch {
            ClockEpoch::Startup => 0.0,
            ClockEpoch::Unix => match SystemTime::now().duration_since(UNIX_EPOCH) {
                Ok(d) => d.as_secs_f64(),
                Err(e) => {
                    warn!("system clock is before the Unix epoch ({e}), starting at t = 0");
                    0.0
                }
            },
        };
        Self { offset_sec }
    }

    pub fn now(&self, elapsed_sec: f64) -> f64 {
        self.offset_sec + elapsed_sec
    }
}

/// Latest samples from the host
#[derive(Debug, Clone, Copy, Default)]
pub struct HostInputs {
    pub scroll_offset_px: f64,
    pub viewport_height_px: f64, // 0 until measured
    pub section_top_px: Option<f64>, // black-hole section distance from the viewport top
}

#[derive(Resource)]
pub struct Engine {
    scene: Scene,
    sequencer: BlackHoleSequencer,
    inputs: HostInputs,
    last_tick_sec: f64,
    attached: bool,
}

impl Engine {
    pub fn new(scene: Scene) -> Self {
        let sequencer = BlackHoleSequencer::new(
            scene.black_hole.swallows.clone(),
            scene.black_hole.activation_ratio,
            scene.black_hole.expand_period_sec,
            scene.black_hole.shrink_duration_sec,
        );
        Self {
            scene,
            sequencer,
            inputs: HostInputs::default(),
            last_tick_sec: 0.0,
            attached: true,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn sequencer(&self) -> &BlackHoleSequencer {
        &self.sequencer
    }

    pub fn inputs(&self) -> HostInputs {
        self.inputs
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Stop reacting to the host; idempotent
    pub fn detach(&mut self) {
        if self.attached {
            info!("engine detached at t={:.3}", self.last_tick_sec);
            self.attached = false;
        }
    }

    pub fn on_resize(&mut self, viewport_height_px: f64) {
        if !self.attached {
            return;
        }
        self.inputs.viewport_height_px = viewport_height_px;
        self.resequence();
    }

    /// Record a scroll sample. `section_top_px` is where the black-hole section
    /// currently sits relative to the viewport top.
    pub fn on_scroll(&mut self, scroll_offset_px: f64, section_top_px: f64) {
        if !self.attached {
            return;
        }
        self.inputs.scroll_offset_px = scroll_offset_px;
        self.inputs.section_top_px = Some(section_top_px);
        self.resequence();
    }

    /// Produce the frame for `sim_time_sec`, or `None` once detached
    pub fn tick(&mut self, sim_time_sec: f64) -> Option<Frame> {
        if !self.attached {
            return None;
        }
        self.last_tick_sec = sim_time_sec;
        self.sequencer.start_clock(sim_time_sec);
        Some(self.frame(sim_time_sec))
    }

    /// Pure recomputation of everything drawn at `sim_time_sec`
    pub fn frame(&self, sim_time_sec: f64) -> Frame {
        let scene = &self.scene;
        let p = &scene.parameters;
        let scroll = self.inputs.scroll_offset_px;
        let swallowed = self.sequencer.swallowed();
        let shrink = self.sequencer.shrink(sim_time_sec);
        let visual = visual_state(scroll, self.inputs.viewport_height_px, &scene.sky);

        let mut bodies: Vec<BodyFrame> = scene
            .bodies
            .iter()
            .map(|b| {
                let suppressed = swallowed.contains(&b.name);
                BodyFrame {
                    name: b.name.clone(),
                    position: orbit::position(b, sim_time_sec, p.flatten_factor),
                    suppressed,
                    shrink: if suppressed { shrink } else { Shrink::NONE },
                    spin_deg: orbit::spin_deg(b, sim_time_sec, p.spin_base_sec),
                    stack_order: b.stack_order,
                }
            })
            .collect();
        // stable: equal stack orders keep configuration order
        bodies.sort_by_key(|b| b.stack_order);

        let details = scene
            .bodies
            .iter()
            .enumerate()
            .map(|(i, b)| scene.details.row(i, &b.name, scroll, swallowed.contains(&b.name)))
            .collect();

        Frame {
            sim_time_sec,
            visual,
            sun: orbit::sun_pulse(sim_time_sec, p.sun_pulse_period_sec),
            bodies,
            swallowed: swallowed.iter().map(str::to_owned).collect(),
            blocks: scene.blocks.iter().map(|b| b.offset(scroll)).collect(),
            details,
            star_opacity: scene.starfield.opacities(sim_time_sec, visual.stars_opacity),
            comets: scene.comets.frames(sim_time_sec),
            black_hole: BlackHoleFrame {
                pulse: self.sequencer.pulse(sim_time_sec),
                rings: ring_angles(
                    sim_time_sec,
                    scene.black_hole.outer_ring_period_sec,
                    scene.black_hole.inner_ring_period_sec,
                ),
                star_opacity: scene.black_hole_starfield.opacities(sim_time_sec, 1.0),
                comets: scene.black_hole_comets.frames(sim_time_sec),
            },
        }
    }

    fn resequence(&mut self) {
        if let Some(top) = self.inputs.section_top_px {
            self.sequencer.update(top, self.inputs.viewport_height_px);
        }
    }
}
