pub mod simulation;
pub mod configuration;
pub mod visualization;

pub use simulation::states::{OrbitingBody, BodyFrame, BlackHoleFrame, Frame, Rgb, NVec2};
pub use simulation::orbit::{phase_angle_deg, orbit_radius, position, orbital_period_sec, spin_period_sec, spin_deg, orbit_path, sun_pulse, SunPulse};
pub use simulation::sky::{visual_state, SkyCurve, VisualParams, ParallaxBlock, BlockOffset, DetailCurve, DetailRow};
pub use simulation::black_hole::{BlackHoleSequencer, SequencerState, SwallowedSet, BlackHolePulse, Shrink, RingAngles, ring_angles};
pub use simulation::starfield::{StarField, Star, CometShower, CometSpread, Comet, CometFrame};
pub use simulation::scenario::{Scene, BlackHoleSpec};
pub use simulation::engine::{Engine, SimClock, HostInputs};
pub use simulation::error::{SceneError, SceneResult};

pub use configuration::config::{SceneConfig, ParametersConfig, SkyConfig, BlackHoleConfig, BodyConfig, ClockEpoch, StarfieldConfig, CometsConfig};

pub use visualization::galaxy_vis2d::run_2d;
