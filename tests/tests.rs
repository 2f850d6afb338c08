use galaxy_scroll::simulation::orbit;
use galaxy_scroll::simulation::sky::{visual_state, SkyCurve};
use galaxy_scroll::simulation::starfield::{BLACK_HOLE_STARS_STREAM, SKY_COMETS_STREAM, SKY_STARS_STREAM};
use galaxy_scroll::{
    ring_angles, BlackHolePulse, BlackHoleSequencer, CometShower, CometSpread, Engine, OrbitingBody, Rgb, Scene,
    SceneConfig, SceneError, SequencerState, Shrink, StarField,
};

const SCENE_YAML: &str = include_str!("../scenes/solar_system.yaml");

const MINIMAL_YAML: &str = r##"
black_hole:
  swallows: Earth
bodies:
  - name: Earth
    orbit_radius_px: 300.0
    orbit_speed_deg_per_sec: 2.0
    eccentricity: 0.02
    initial_angle_deg: 230.0
    visual_size: 48.0
    color: "#4B92DB"
    stack_order: 6
"##;

const VH: f64 = 800.0;
const EPS: f64 = 1e-9;

/// The scene shipped with the binary
pub fn test_scene() -> Scene {
    Scene::from_yaml_str(SCENE_YAML).expect("shipped scene is valid")
}

/// One-body configuration, mutated by the validation tests
pub fn minimal_config() -> SceneConfig {
    serde_yaml::from_str(MINIMAL_YAML).expect("minimal scene parses")
}

/// Earth from the page: r = 300, 2 deg/s, e = 0.02, starts at 230 deg
pub fn earth() -> OrbitingBody {
    OrbitingBody {
        name: "Earth".into(),
        orbit_radius_px: 300.0,
        orbit_speed_deg_per_sec: 2.0,
        eccentricity: 0.02,
        initial_angle_deg: 230.0,
        visual_size: 48.0,
        color: Rgb::new(0x4B, 0x92, 0xDB),
        has_rings: false,
        stack_order: 6,
    }
}

/// Engine with a measured viewport and the black-hole section `top` px below the viewport top
pub fn engine_at(top: f64) -> Engine {
    let mut engine = Engine::new(test_scene());
    engine.on_resize(VH);
    engine.on_scroll(0.0, top);
    engine
}

fn assert_close(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() < eps, "expected {b}, got {a}");
}

// ==================================================================================
// Orbit tests
// ==================================================================================

#[test]
fn orbit_earth_at_time_zero() {
    let body = earth();
    assert_close(orbit::phase_angle_deg(&body, 0.0), 230.0, EPS);

    let a = 230f64.to_radians();
    let r = 300.0 * (1.0 - 0.02 * a.cos());
    let p = orbit::position(&body, 0.0, 0.3);

    assert_close(p.x, r * a.cos(), EPS);
    assert_close(p.y, r * a.sin() * 0.3, EPS);
}

#[test]
fn orbit_position_is_deterministic() {
    let body = earth();
    for t in [0.0, 0.5, 17.25, 1234.5, 1.7e9] {
        assert_eq!(orbit::position(&body, t, 0.3), orbit::position(&body, t, 0.3));
    }
}

#[test]
fn orbit_repeats_once_per_period() {
    let body = earth();
    let period = orbit::orbital_period_sec(&body);
    assert_close(period, 180.0, EPS);

    for t in [0.0, 12.3, 99.9, 500.0] {
        let a = orbit::position(&body, t, 0.3);
        let b = orbit::position(&body, t + period, 0.3);
        assert!((a - b).norm() < 1e-6, "t = {t}: {a:?} vs {b:?}");
    }
}

#[test]
fn orbit_radius_stays_within_eccentricity_band() {
    let mut body = earth();
    body.eccentricity = 0.3;
    let lo = body.orbit_radius_px * (1.0 - body.eccentricity);
    let hi = body.orbit_radius_px * (1.0 + body.eccentricity);

    let mut t = 0.0;
    while t < 400.0 {
        let p = orbit::position(&body, t, 0.3);
        // undo the flattening to recover the radius
        let r = (p.x * p.x + (p.y / 0.3) * (p.y / 0.3)).sqrt();
        assert!(r >= lo - 1e-9 && r <= hi + 1e-9, "radius {r} outside [{lo}, {hi}] at t = {t}");
        t += 0.37;
    }
}

#[test]
fn orbit_does_not_drift_at_wall_clock_times() {
    let body = earth();
    let t = 1_700_000_000.0;

    let angle = orbit::phase_angle_deg(&body, t);
    assert!((0.0..=360.0).contains(&angle));

    let a = orbit::position(&body, t, 0.3);
    let b = orbit::position(&body, t + 180.0, 0.3);
    assert!((a - b).norm() < 1e-6);

    // 2 * 1.7e9 + 230 = 30 (mod 360), the same phase as t = 80
    assert_close(angle, 30.0, 1e-6);
    assert_close(orbit::phase_angle_deg(&body, t + 0.25), 30.5, 1e-6);
    for (wall, reduced) in [(t, 80.0), (t + 0.25, 80.25), (t + 37.5, 117.5)] {
        let a = orbit::position(&body, wall, 0.3);
        let b = orbit::position(&body, reduced, 0.3);
        assert!((a - b).norm() < 1e-6, "t = {wall}: {a:?} vs {b:?}");
    }
}

#[test]
fn orbit_negative_speed_runs_backwards() {
    let mut body = earth();
    body.orbit_speed_deg_per_sec = -2.0;
    assert_close(orbit::phase_angle_deg(&body, 10.0), 210.0, 1e-9);

    let spin = orbit::spin_deg(&body, 0.3, 2.5);
    assert!((0.0..360.0).contains(&spin));
}

#[test]
fn orbit_spin_period_follows_speed() {
    let body = earth();
    assert_close(orbit::spin_period_sec(&body, 2.5), 1.25, EPS);
    assert_close(orbit::spin_deg(&body, 0.625, 2.5), 180.0, 1e-9);
    assert_close(orbit::spin_deg(&body, 0.0, 2.5), 0.0, 1e-9);
}

#[test]
fn orbit_guide_is_flattened() {
    let axes = orbit::orbit_path(&earth(), 0.3);
    assert_close(axes.x, 300.0, EPS);
    assert_close(axes.y, 90.0, EPS);
}

// ==================================================================================
// Sky tests
// ==================================================================================

#[test]
fn sky_top_of_page_is_day() {
    let v = visual_state(0.0, VH, &SkyCurve::default());
    assert_close(v.sky_channel, 255.0, EPS);
    assert_close(v.night_overlay_opacity, 0.0, EPS);
    assert_close(v.sun_opacity, 1.0, EPS);
    assert_close(v.moon_opacity, 0.0, EPS);
    assert_close(v.stars_opacity, 0.0, EPS);
    assert_close(v.celestial_horizontal_pct, 20.0, EPS);
    assert_close(v.scroll_hint_opacity, 1.0, EPS);
    assert_eq!(v.sky_rgb(), Rgb::new(255, 255, 255));
}

#[test]
fn sky_one_viewport_down_is_night() {
    let v = visual_state(VH, VH, &SkyCurve::default());
    assert_close(v.sky_channel, 0.0, EPS);
    assert_close(v.night_overlay_opacity, 1.0, EPS);
    assert_close(v.sun_opacity, 0.0, EPS); // clamped from -1
    assert_close(v.moon_opacity, 1.0, EPS); // clamped from 1.2
    assert_close(v.stars_opacity, 1.0, EPS);
    assert_close(v.celestial_horizontal_pct, 80.0, EPS);
    assert_close(v.scroll_hint_opacity, 0.0, EPS);
    assert_eq!(v.sky_rgb(), Rgb::new(0, 0, 255));
}

#[test]
fn sky_unmeasured_viewport_falls_back_to_day() {
    let curve = SkyCurve::default();
    for vh in [0.0, -10.0, f64::NAN, f64::INFINITY] {
        let v = visual_state(500.0, vh, &curve);
        assert_close(v.sky_channel, 255.0, EPS);
        assert_close(v.night_overlay_opacity, 0.0, EPS);
        assert_close(v.sun_opacity, 1.0, EPS);
        assert_close(v.moon_opacity, 0.0, EPS);
        assert_close(v.stars_opacity, 0.0, EPS);
    }
}

#[test]
fn sky_outputs_stay_clamped() {
    // a zero moon gain and a fixed horizontal track both meet huge ratios
    let degenerate = SkyCurve {
        moon_gain: 0.0,
        horizontal_end_pct: 20.0,
        ..SkyCurve::default()
    };

    for curve in [SkyCurve::default(), degenerate] {
        let (lo, hi) = (curve.horizontal_start_pct, curve.horizontal_end_pct);
        for scroll in [0.0, 1.0, 100.0, 1e3, 1e6, 1e12, 1e300, f64::MAX, f64::INFINITY] {
            for vh in [0.0, 1e-300, 1e-10, 1e-9, 1.0, VH, 1e9] {
                let v = visual_state(scroll, vh, &curve);
                assert!((0.0..=255.0).contains(&v.sky_channel));
                assert!(
                    (lo..=hi).contains(&v.celestial_horizontal_pct),
                    "{} out of range for scroll {scroll}, vh {vh}",
                    v.celestial_horizontal_pct
                );
                for o in [
                    v.night_overlay_opacity,
                    v.sun_opacity,
                    v.moon_opacity,
                    v.stars_opacity,
                    v.scroll_hint_opacity,
                ] {
                    assert!((0.0..=1.0).contains(&o), "{o} out of range for scroll {scroll}, vh {vh}");
                }
            }
        }
    }
}

#[test]
fn sky_infinite_scroll_is_night_and_nan_is_day() {
    let curve = SkyCurve::default();

    let night = visual_state(f64::INFINITY, VH, &curve);
    assert_close(night.sky_channel, 0.0, EPS);
    assert_close(night.night_overlay_opacity, 1.0, EPS);
    assert_close(night.moon_opacity, 1.0, EPS);
    assert_close(night.celestial_horizontal_pct, 80.0, EPS);

    for scroll in [f64::NAN, -50.0, f64::NEG_INFINITY] {
        let day = visual_state(scroll, VH, &curve);
        assert_close(day.sky_channel, 255.0, EPS);
        assert_close(day.sun_opacity, 1.0, EPS);
    }
}

#[test]
fn sky_sun_and_moon_overlap_during_dusk() {
    let v = visual_state(0.3 * VH, VH, &SkyCurve::default());
    assert_close(v.sun_opacity, 0.4, 1e-9);
    assert_close(v.moon_opacity, 0.36, 1e-9);
}

#[test]
fn sky_parallax_blocks_are_linear_in_scroll() {
    let mut engine = engine_at(2.0 * VH);
    engine.on_scroll(100.0, 2.0 * VH - 100.0);
    let frame = engine.tick(0.0).expect("attached");

    assert_close(frame.block("hero").unwrap().translate.y, 30.0, EPS);
    assert_close(frame.block("call-to-action").unwrap().translate.y, 10.0, EPS);
    assert_close(frame.block("second-section").unwrap().translate.y, -10.0, EPS);

    let solar = frame.block("solar-system").unwrap();
    assert_close(solar.translate.y, 10.0, EPS);
    assert_close(solar.scale, 1.02, EPS);

    let hole = frame.block("black-hole").unwrap();
    assert_close(hole.scale, 1.05, EPS);
    assert_close(hole.rotate_deg, 5.0, EPS);
}

#[test]
fn sky_detail_rows_alternate() {
    let scene = test_scene();
    let even = scene.details.row(0, "Mercury", 100.0, false);
    let odd = scene.details.row(1, "Venus", 100.0, false);

    assert_close(even.translate.x, -3.0, EPS);
    assert_close(even.translate.y, 8.0, EPS);
    assert_close(even.image_translate_y, -5.0, EPS);
    assert_close(even.image_scale, 1.01, EPS);

    assert_close(odd.translate.x, 3.0, EPS);
    assert_close(odd.translate.y, -8.0, EPS);
    assert_close(odd.image_translate_y, 5.0, EPS);

    assert_close(scene.details.row(7, "Neptune", 0.0, true).opacity, 0.0, EPS);
}

// ==================================================================================
// Black hole tests
// ==================================================================================

fn sequencer() -> BlackHoleSequencer {
    BlackHoleSequencer::new("Neptune", 0.8, 3.0, 2.0)
}

#[test]
fn black_hole_active_when_section_is_half_way_up() {
    let mut seq = sequencer();
    let state = seq.update(0.5 * VH, VH);

    assert!(matches!(state, SequencerState::Active { .. }));
    assert!(seq.swallowed().contains("Neptune"));
    assert_eq!(seq.swallowed().len(), 1);
}

#[test]
fn black_hole_dormant_when_section_is_a_viewport_down() {
    let mut seq = sequencer();
    assert_eq!(seq.update(1.0 * VH, VH), SequencerState::Dormant);
    assert!(seq.swallowed().is_empty());
}

#[test]
fn black_hole_threshold_is_strict() {
    let mut seq = sequencer();
    assert_eq!(seq.update(640.0, VH), SequencerState::Dormant);
    assert!(seq.update(639.0, VH) != SequencerState::Dormant);
}

#[test]
fn black_hole_toggling_never_sticks() {
    let mut seq = sequencer();
    for i in 0..5 {
        seq.update(0.5 * VH, VH);
        assert!(seq.is_active());
        assert_eq!(seq.swallowed().iter().collect::<Vec<_>>(), vec!["Neptune"]);

        seq.update(1.0 * VH, VH);
        assert!(!seq.is_active());
        assert!(seq.swallowed().is_empty());
    }
}

#[test]
fn black_hole_reentry_starts_over() {
    let mut seq = sequencer();
    seq.update(0.5 * VH, VH);
    assert_eq!(seq.state(), SequencerState::Active { since_sec: None });
    seq.start_clock(1.0);
    seq.update(0.4 * VH, VH);
    seq.start_clock(5.0);
    assert_eq!(seq.state(), SequencerState::Active { since_sec: Some(1.0) });

    seq.update(VH, VH);
    seq.start_clock(7.0);
    assert_eq!(seq.state(), SequencerState::Dormant);

    seq.update(0.5 * VH, VH);
    seq.start_clock(10.0);
    assert_eq!(seq.state(), SequencerState::Active { since_sec: Some(10.0) });
}

#[test]
fn black_hole_needs_a_measured_viewport() {
    let mut seq = sequencer();
    assert_eq!(seq.update(-100.0, 0.0), SequencerState::Dormant);
    assert_eq!(seq.update(-100.0, f64::NAN), SequencerState::Dormant);
}

#[test]
fn black_hole_pulses_from_activation() {
    let mut seq = sequencer();
    assert_eq!(seq.pulse(2.0), BlackHolePulse::REST);

    seq.update(0.5 * VH, VH);
    // not shown yet, so not started yet
    assert_eq!(seq.pulse(12.0), BlackHolePulse::REST);

    seq.start_clock(10.0);
    let start = seq.pulse(10.0);
    assert_close(start.scale, 1.0, EPS);
    assert_close(start.rotate_deg, 0.0, EPS);

    let full = seq.pulse(13.0);
    assert_close(full.scale, 1.5, EPS);
    assert_close(full.rotate_deg, 180.0, EPS);

    let back = seq.pulse(16.0);
    assert_close(back.scale, 1.0, EPS);

    let half = seq.pulse(11.5);
    assert_close(half.scale, 1.25, EPS);
}

#[test]
fn black_hole_shrinks_the_target_once() {
    let mut seq = sequencer();
    assert_eq!(seq.shrink(5.0), Shrink::NONE);

    seq.update(0.5 * VH, VH);
    seq.start_clock(10.0);
    assert_eq!(seq.shrink(10.0), Shrink::NONE);

    let half = seq.shrink(11.0);
    assert_close(half.scale, 0.5, EPS);
    assert_close(half.rotate_deg, 360.0, EPS);

    // holds at nothing for as long as the section stays in view
    for t in [12.0, 15.0, 100.0] {
        let gone = seq.shrink(t);
        assert_close(gone.scale, 0.0, EPS);
        assert_close(gone.rotate_deg, 720.0, EPS);
    }

    seq.update(VH, VH);
    assert_eq!(seq.shrink(100.0), Shrink::NONE);
}

#[test]
fn black_hole_rings_turn_in_opposite_directions() {
    let rest = ring_angles(0.0, 20.0, 15.0);
    assert_close(rest.outer_deg, 0.0, EPS);
    assert_close(rest.inner_deg, 0.0, EPS);

    let rings = ring_angles(5.0, 20.0, 15.0);
    assert_close(rings.outer_deg, 90.0, 1e-9);
    assert_close(rings.inner_deg, -120.0, 1e-9);

    // one full turn of each ring brings it back
    let outer = ring_angles(1_700_000_020.0, 20.0, 15.0);
    assert_close(outer.outer_deg, ring_angles(1_700_000_000.0, 20.0, 15.0).outer_deg, 1e-6);
    for t in [0.3, 7.7, 1.7e9] {
        let r = ring_angles(t, 20.0, 15.0);
        assert!((0.0..=360.0).contains(&r.outer_deg));
        assert!((-360.0..=0.0).contains(&r.inner_deg));
    }
}

// ==================================================================================
// Engine tests
// ==================================================================================

#[test]
fn engine_swallows_neptune_in_frame() {
    let mut engine = engine_at(0.5 * VH);
    let frame = engine.tick(42.0).expect("attached");

    assert_eq!(frame.swallowed, vec!["Neptune".to_string()]);
    for body in &frame.bodies {
        assert_eq!(body.suppressed, body.name == "Neptune", "{}", body.name);
    }

    let neptune_row = frame.details.iter().find(|d| d.name == "Neptune").unwrap();
    assert_close(neptune_row.opacity, 0.0, EPS);
}

#[test]
fn engine_activation_waits_for_the_first_tick() {
    let t0 = 1_700_000_001.0;
    let mut engine = Engine::new(test_scene());
    engine.on_resize(VH);
    engine.on_scroll(0.0, 100.0);
    assert_eq!(engine.sequencer().state(), SequencerState::Active { since_sec: None });

    let frame = engine.tick(t0).expect("attached");
    assert_eq!(engine.sequencer().state(), SequencerState::Active { since_sec: Some(t0) });
    assert_eq!(frame.black_hole.pulse, BlackHolePulse::REST);
    assert_eq!(frame.body("Neptune").unwrap().shrink, Shrink::NONE);

    let frame = engine.tick(t0 + 3.0).expect("attached");
    assert_close(frame.black_hole.pulse.scale, 1.5, 1e-6);
    assert_close(frame.body("Neptune").unwrap().shrink.scale, 0.0, EPS);
}

#[test]
fn engine_later_activation_takes_the_next_tick_time() {
    let mut engine = engine_at(2.0 * VH);
    engine.tick(10.0).expect("attached");

    engine.on_scroll(VH, 0.5 * VH);
    let frame = engine.tick(12.0).expect("attached");
    assert_eq!(engine.sequencer().state(), SequencerState::Active { since_sec: Some(12.0) });
    assert_eq!(frame.black_hole.pulse, BlackHolePulse::REST);

    let frame = engine.tick(13.0).expect("attached");
    let neptune = frame.body("Neptune").unwrap();
    assert!(neptune.suppressed);
    assert_close(neptune.shrink.scale, 0.5, EPS);
    assert!(frame.bodies.iter().filter(|b| b.name != "Neptune").all(|b| b.shrink == Shrink::NONE));
}

#[test]
fn engine_sun_breathes() {
    let mut engine = engine_at(2.0 * VH);

    let frame = engine.tick(0.0).expect("attached");
    assert_close(frame.sun.scale, 1.0, EPS);
    assert_close(frame.sun.opacity, 1.0, EPS);

    let frame = engine.tick(1.5).expect("attached");
    assert_close(frame.sun.scale, 0.95, EPS);
    assert_close(frame.sun.opacity, 0.8, EPS);

    let frame = engine.tick(3.0).expect("attached");
    assert_close(frame.sun.scale, 1.0, EPS);
}

#[test]
fn engine_black_hole_section_has_its_own_sky() {
    let mut engine = engine_at(2.0 * VH);
    // the section is always dark, so its stars twinkle even at the top of the page
    let frame = engine.tick(0.0).expect("attached");
    assert_eq!(frame.black_hole.star_opacity.len(), 300);
    assert_eq!(frame.black_hole.comets.len(), 15);
    assert!(frame.black_hole.star_opacity.iter().all(|o| *o == 1.0));
    assert!(frame.star_opacity.iter().all(|o| *o == 0.0));

    let frame = engine.tick(1.0).expect("attached");
    assert!(frame.black_hole.star_opacity.iter().all(|o| (0.3 - 1e-9..=1.0).contains(o)));

    let rings = frame.black_hole.rings;
    assert_close(rings.outer_deg, 18.0, 1e-9);
    assert_close(rings.inner_deg, -24.0, 1e-9);
}

#[test]
fn engine_scrolling_back_restores_the_planet() {
    let mut engine = engine_at(0.5 * VH);
    engine.on_scroll(0.0, 2.0 * VH);
    let frame = engine.tick(42.0).expect("attached");

    assert!(frame.swallowed.is_empty());
    assert!(frame.bodies.iter().all(|b| !b.suppressed && b.shrink == Shrink::NONE));
}

#[test]
fn engine_frames_are_back_to_front() {
    let mut engine = engine_at(2.0 * VH);
    let frame = engine.tick(0.0).expect("attached");

    assert_eq!(frame.bodies.len(), 8);
    assert_eq!(frame.bodies.first().unwrap().name, "Neptune");
    assert_eq!(frame.bodies.last().unwrap().name, "Mercury");
    assert!(frame.bodies.windows(2).all(|w| w[0].stack_order <= w[1].stack_order));
}

#[test]
fn engine_positions_match_orbit_formula() {
    let mut engine = engine_at(2.0 * VH);
    let t = 1_234.5;
    let frame = engine.tick(t).expect("attached");
    let scene = engine.scene();

    for body in &scene.bodies {
        let expected = orbit::position(body, t, scene.parameters.flatten_factor);
        let got = frame.body(&body.name).unwrap().position;
        assert!((expected - got).norm() < EPS, "{}", body.name);
    }
}

#[test]
fn engine_unmeasured_viewport_is_top_of_page() {
    let mut engine = Engine::new(test_scene());
    engine.on_scroll(500.0, 1000.0);
    let frame = engine.tick(0.0).expect("attached");

    assert_close(frame.visual.sky_channel, 255.0, EPS);
    assert_close(frame.visual.sun_opacity, 1.0, EPS);
    assert!(frame.swallowed.is_empty());
}

#[test]
fn engine_stars_fade_in_with_scroll() {
    let mut engine = engine_at(2.0 * VH);
    let frame = engine.tick(0.0).expect("attached");
    assert_eq!(frame.star_opacity.len(), 100);
    assert!(frame.star_opacity.iter().all(|o| *o == 0.0));

    engine.on_scroll(VH, VH);
    let frame = engine.tick(7.3).expect("attached");
    assert!(frame.star_opacity.iter().all(|o| (0.3 - 1e-9..=1.0).contains(o)));
}

#[test]
fn engine_detach_stops_everything() {
    let mut engine = engine_at(2.0 * VH);
    engine.detach();
    assert!(!engine.is_attached());

    assert!(engine.tick(1.0).is_none());

    engine.on_scroll(VH, 0.0);
    engine.on_resize(1.0);
    assert_close(engine.inputs().scroll_offset_px, 0.0, EPS);
    assert_close(engine.inputs().viewport_height_px, VH, EPS);
    assert!(!engine.sequencer().is_active());

    // detaching twice is harmless
    engine.detach();
    assert!(engine.tick(2.0).is_none());
}

// ==================================================================================
// Scene tests
// ==================================================================================

#[test]
fn scene_shipped_file_builds() {
    let scene = test_scene();
    assert_eq!(scene.bodies.len(), 8);
    assert_eq!(scene.black_hole.swallows, "Neptune");
    assert!(scene.body("Saturn").unwrap().has_rings);
    assert_eq!(scene.body("Earth").unwrap().color, Rgb::new(0x4B, 0x92, 0xDB));
    assert_eq!(scene.blocks.len(), 5);
}

#[test]
fn scene_minimal_file_uses_defaults() {
    let scene = Scene::build(minimal_config()).expect("valid");
    assert_close(scene.parameters.flatten_factor, 0.3, EPS);
    assert_close(scene.parameters.spin_base_sec, 2.5, EPS);
    assert_close(scene.sky.night_span, 0.8, EPS);
    assert_close(scene.black_hole.activation_ratio, 0.8, EPS);
    assert_eq!(scene.starfield.stars.len(), 100);
    assert_eq!(scene.comets.comets.len(), 12);
    assert!(scene.blocks.is_empty());

    assert_close(scene.parameters.sun_pulse_period_sec, 3.0, EPS);
    assert_close(scene.black_hole.shrink_duration_sec, 2.0, EPS);
    assert_close(scene.black_hole.outer_ring_period_sec, 20.0, EPS);
    assert_close(scene.black_hole.inner_ring_period_sec, 15.0, EPS);
    assert_eq!(scene.black_hole_starfield.stars.len(), 300);
    assert_eq!(scene.black_hole_comets.comets.len(), 15);
    for comet in &scene.black_hole_comets.comets {
        assert!((60.0..=160.0).contains(&comet.length_px));
        assert!((8.0..=20.0).contains(&comet.duration_sec));
        assert!((0.0..=5.0).contains(&comet.delay_sec));
    }
}

#[test]
fn scene_rejects_bad_comet_ranges() {
    let mut cfg = minimal_config();
    cfg.comets.min_length_px = 300.0;
    assert!(matches!(Scene::build(cfg), Err(SceneError::InvertedRange(label)) if label == "comets.length_px"));

    let mut cfg = minimal_config();
    cfg.black_hole.comets.min_duration_sec = 0.0;
    assert!(matches!(Scene::build(cfg), Err(SceneError::NonPositive(_))));

    let mut cfg = minimal_config();
    cfg.black_hole.comets.max_delay_sec = -1.0;
    assert!(matches!(Scene::build(cfg), Err(SceneError::Negative(_))));

    let mut cfg = minimal_config();
    cfg.black_hole.shrink_duration_sec = 0.0;
    assert!(matches!(Scene::build(cfg), Err(SceneError::NonPositive(_))));
}

#[test]
fn scene_rejects_zero_speed() {
    let mut cfg = minimal_config();
    cfg.bodies[0].orbit_speed_deg_per_sec = 0.0;
    assert!(matches!(Scene::build(cfg), Err(SceneError::ZeroOrbitSpeed(name)) if name == "Earth"));
}

#[test]
fn scene_rejects_eccentricity_out_of_range() {
    for e in [1.0, 1.5, -0.1] {
        let mut cfg = minimal_config();
        cfg.bodies[0].eccentricity = e;
        assert!(matches!(Scene::build(cfg), Err(SceneError::EccentricityOutOfRange { .. })), "e = {e}");
    }
}

#[test]
fn scene_rejects_unknown_swallowed_body() {
    let mut cfg = minimal_config();
    cfg.black_hole.swallows = "Pluto".into();
    assert!(matches!(Scene::build(cfg), Err(SceneError::UnknownSwallowedBody(name)) if name == "Pluto"));
}

#[test]
fn scene_rejects_duplicate_names() {
    let mut cfg = minimal_config();
    let twin = cfg.bodies[0].clone();
    cfg.bodies.push(twin);
    assert!(matches!(Scene::build(cfg), Err(SceneError::DuplicateBodyName(_))));
}

#[test]
fn scene_rejects_bad_color_and_non_finite_values() {
    let mut cfg = minimal_config();
    cfg.bodies[0].color = "blue".into();
    assert!(matches!(Scene::build(cfg), Err(SceneError::InvalidColor { .. })));

    let mut cfg = minimal_config();
    cfg.bodies[0].orbit_radius_px = f64::NAN;
    assert!(matches!(Scene::build(cfg), Err(SceneError::NonFinite(_))));

    let mut cfg = minimal_config();
    cfg.bodies[0].orbit_radius_px = 0.0;
    assert!(matches!(Scene::build(cfg), Err(SceneError::NonPositive(_))));
}

#[test]
fn scene_rejects_empty_body_set() {
    let mut cfg = minimal_config();
    cfg.bodies.clear();
    assert!(matches!(Scene::build(cfg), Err(SceneError::EmptyBodySet)));
}

#[test]
fn scene_reports_yaml_errors() {
    assert!(matches!(Scene::from_yaml_str("bodies: [oops"), Err(SceneError::Yaml(_))));
}

#[test]
fn scene_color_parsing() {
    assert_eq!(Rgb::from_hex("#A9A9A9"), Some(Rgb::new(0xA9, 0xA9, 0xA9)));
    assert_eq!(Rgb::from_hex("5b8cdb"), Some(Rgb::new(0x5B, 0x8C, 0xDB)));
    assert_eq!(Rgb::from_hex("#FFF"), None);
    assert_eq!(Rgb::from_hex("#GG0000"), None);
}

// ==================================================================================
// Star field and comet tests
// ==================================================================================

#[test]
fn starfield_is_seeded() {
    let a = StarField::generate(100, 42, SKY_STARS_STREAM, 2.0, 0.3);
    let b = StarField::generate(100, 42, SKY_STARS_STREAM, 2.0, 0.3);
    let c = StarField::generate(100, 7, SKY_STARS_STREAM, 2.0, 0.3);
    let d = StarField::generate(100, 42, BLACK_HOLE_STARS_STREAM, 2.0, 0.3);

    assert_eq!(a.stars, b.stars);
    assert_ne!(a.stars, c.stars);
    assert_ne!(a.stars, d.stars);

    for (i, s) in a.stars.iter().enumerate() {
        assert!((0.0..100.0).contains(&s.x_pct));
        assert!((0.0..100.0).contains(&s.y_pct));
        assert!((1.0..4.0).contains(&s.size_px));
        assert_close(s.delay_sec, [0.0, 0.5, 1.0][i % 3], EPS);
    }
}

#[test]
fn starfield_twinkle_cycle() {
    let field = StarField::generate(3, 42, SKY_STARS_STREAM, 2.0, 0.3);
    let first = &field.stars[0]; // no delay
    let last = &field.stars[2]; // 1 s delay

    assert_close(field.twinkle(first, 0.0), 1.0, EPS);
    assert_close(field.twinkle(first, 1.0), 0.3, EPS);
    assert_close(field.twinkle(first, 2.0), 1.0, EPS);
    assert_close(field.twinkle(last, 0.5), 1.0, EPS);
    assert_close(field.twinkle(last, 2.0), 0.3, EPS);
}

#[test]
fn comets_fly_after_their_delay() {
    let spread = CometSpread {
        travel_px: 400.0,
        length_px: 80.0..=200.0,
        duration_sec: 5.0..=20.0,
        max_delay_sec: 10.0,
    };
    let shower = CometShower::generate(12, 42, SKY_COMETS_STREAM, &spread);
    assert_eq!(shower.comets.len(), 12);

    for comet in &shower.comets {
        assert!((80.0..=200.0).contains(&comet.length_px));
        assert!((-45.0..45.0).contains(&comet.heading_deg));
        assert!((0.7..1.0).contains(&comet.opacity));

        if comet.delay_sec > 0.0 {
            assert!(!shower.frame(comet, 0.0).visible);
        }

        let mid = shower.frame(comet, comet.delay_sec + comet.duration_sec / 2.0);
        assert!(mid.visible);
        assert_close(mid.progress, 0.5, 1e-9);
        assert_close(mid.opacity, comet.opacity, 1e-9);
        assert_close(mid.offset.norm(), 200.0, 1e-6);
    }
}
