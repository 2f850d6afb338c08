pub mod galaxy_vis2d;
