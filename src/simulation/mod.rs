pub mod states;
pub mod params;
pub mod error;
pub mod engine;
pub mod orbit;
pub mod sky;
pub mod black_hole;
pub mod starfield;
pub mod scenario;
