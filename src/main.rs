use galaxy_scroll::{run_2d, Engine, Scene, SimClock};

use anyhow::{Context, Result};
use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, default_value = "solar_system.yaml")]
    file_name: String,

    /// Print frames instead of opening a window
    #[arg(long)]
    headless: bool,

    /// Number of ticks to print in headless mode
    #[arg(long, default_value_t = 10)]
    frames: usize,

    /// Seconds between headless ticks
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f64,

    /// Pixels scrolled per headless tick
    #[arg(long, default_value_t = 0.0)]
    scroll_step: f64,

    /// Viewport height in headless mode
    #[arg(long, default_value_t = 800.0)]
    viewport: f64,
}

// load here to keep main clean
fn load_scene(file_name: &str) -> Result<Scene> {
    let scene_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenes").join(file_name);
    Scene::load(&scene_path).with_context(|| format!("failed to load scene {}", scene_path.display()))
}

fn run_headless(scene: Scene, args: &Args) -> Result<()> {
    let clock = SimClock::new(scene.parameters.clock);
    let section_offset = scene.black_hole.section_offset_viewports * args.viewport;

    let mut engine = Engine::new(scene);
    engine.on_resize(args.viewport);

    for i in 0..args.frames {
        let scroll = i as f64 * args.scroll_step;
        engine.on_scroll(scroll, section_offset - scroll);

        let Some(frame) = engine.tick(clock.now(i as f64 * args.dt)) else {
            break;
        };
        println!("---\n{}", serde_yaml::to_string(&frame)?);
    }

    engine.detach();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.headless {
        env_logger::init();
    }

    // a bad scene never reaches the viewer
    let scene = load_scene(&args.file_name)?;

    if args.headless {
        run_headless(scene, &args)
    } else {
        run_2d(scene);
        Ok(())
    }
}
