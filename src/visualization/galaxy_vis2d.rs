use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::math::primitives::{Circle, Ellipse};
use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::window::{PrimaryWindow, WindowResized};
use log::info;

use crate::simulation::engine::{Engine, SimClock};
use crate::simulation::scenario::Scene;
use crate::simulation::states::{Frame, Rgb};

/// Pixels scrolled per wheel "line"
const LINE_PX: f64 = 40.0;

/// Large enough to cover any window
const OVERLAY_SIZE: f32 = 20_000.0;

/// Parallax blocks the viewer reads from the frame
const SOLAR_BLOCK: &str = "solar-system";
const BLACK_HOLE_BLOCK: &str = "black-hole";

const NIGHT: Rgb = Rgb::new(0x1A, 0x1F, 0x2C);
const SUN: Rgb = Rgb::new(0xF9, 0x73, 0x16);
const MOON: Rgb = Rgb::new(0xD6, 0xBC, 0xFA);
const SOLAR_SUN: Rgb = Rgb::new(0xFD, 0xB8, 0x13);

#[derive(Resource)]
struct ViewerClock(SimClock);

#[derive(Resource, Default)]
struct PageScroll {
    offset_px: f64,
}

#[derive(Resource, Default)]
struct CurrentFrame(Option<Frame>);

#[derive(Component)]
struct NightOverlay;

#[derive(Component)]
struct SkyDisc(Rgb); // sun or moon, alpha set per frame

#[derive(Component)]
struct SunDisc;

#[derive(Component)]
struct BodyAnchor(String);

#[derive(Component)]
struct BodyDisc(String);

#[derive(Component)]
struct CentralSun;

#[derive(Component)]
struct BodyLabel(String);

/// Which background a star or comet belongs to
#[derive(Clone, Copy, PartialEq, Eq)]
enum Layer {
    Sky,
    BlackHole,
}

#[derive(Component)]
struct StarIndex(Layer, usize);

#[derive(Component)]
struct CometIndex(Layer, usize);

#[derive(Component)]
struct BlackHoleDisc;

#[derive(Component)]
enum BlackHoleRing {
    Outer,
    Inner,
}

pub fn run_2d(scene: Scene) {
    info!("run_2d: starting Bevy 2D viewer with {} bodies", scene.bodies.len());

    let clock = SimClock::new(scene.parameters.clock);

    App::new()
        .insert_resource(Engine::new(scene))
        .insert_resource(ViewerClock(clock))
        .insert_resource(ClearColor(Color::srgb(1.0, 1.0, 1.0)))
        .init_resource::<PageScroll>()
        .init_resource::<CurrentFrame>()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "galaxy-scroll".into(),
                ..Default::default()
            }),
            ..Default::default()
        }))
        .add_systems(Startup, setup_scene_system)
        .add_systems(
            Update,
            (
                input_system,
                tick_system,
                (
                    sync_sky_system,
                    sync_bodies_system,
                    sync_sun_system,
                    sync_stars_system,
                    sync_comets_system,
                    sync_black_hole_system,
                    draw_orbits_system,
                ),
            )
                .chain(),
        )
        .add_systems(Last, detach_on_exit_system)
        .run();
}

fn setup_scene_system(
    mut commands: Commands,
    mut engine: ResMut<Engine>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    commands.spawn(Camera2dBundle::default());

    // first measurement of the viewport; scroll starts at the top of the page
    if let Ok(window) = windows.get_single() {
        let viewport = window.height() as f64;
        engine.on_resize(viewport);
        let section_top = engine.scene().black_hole.section_offset_viewports * viewport;
        engine.on_scroll(0.0, section_top);
    }

    commands.spawn((
        SpriteBundle {
            sprite: Sprite {
                color: rgba(NIGHT, 0.0),
                custom_size: Some(Vec2::splat(OVERLAY_SIZE)),
                ..Default::default()
            },
            transform: Transform::from_xyz(0.0, 0.0, -9.0),
            ..Default::default()
        },
        NightOverlay,
    ));

    let scene = engine.scene();

    for (layer, field, z) in [
        (Layer::Sky, &scene.starfield, -8.0),
        (Layer::BlackHole, &scene.black_hole_starfield, 3.4),
    ] {
        for (i, star) in field.stars.iter().enumerate() {
            commands.spawn((
                SpriteBundle {
                    sprite: Sprite {
                        color: Color::srgba(1.0, 1.0, 1.0, 0.0),
                        custom_size: Some(Vec2::splat(star.size_px as f32)),
                        ..Default::default()
                    },
                    transform: Transform::from_xyz(0.0, 0.0, z),
                    ..Default::default()
                },
                StarIndex(layer, i),
            ));
        }
    }

    let disc = meshes.add(Circle::new(60.0));
    commands.spawn((
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(disc.clone()),
            material: materials.add(ColorMaterial::from(rgba(SUN, 1.0))),
            transform: Transform::from_xyz(0.0, 0.0, -7.0),
            ..Default::default()
        },
        SkyDisc(SUN),
        SunDisc,
    ));
    commands.spawn((
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(disc),
            material: materials.add(ColorMaterial::from(rgba(MOON, 0.0))),
            transform: Transform::from_xyz(0.0, 0.0, -6.9),
            ..Default::default()
        },
        SkyDisc(MOON),
    ));

    // the sun of the solar system, at the center of every orbit
    commands.spawn((
        MaterialMesh2dBundle {
            mesh: Mesh2dHandle(meshes.add(Circle::new(60.0))),
            material: materials.add(ColorMaterial::from(rgba(SOLAR_SUN, 1.0))),
            transform: Transform::from_xyz(0.0, 0.0, 2.5),
            ..Default::default()
        },
        CentralSun,
    ));

    for body in &scene.bodies {
        let size = body.visual_size as f32;
        // anchor carries the orbit position; the disc spins, the label does not
        commands
            .spawn((
                SpatialBundle::from_transform(Transform::from_xyz(0.0, 0.0, body_z(body.stack_order))),
                BodyAnchor(body.name.clone()),
            ))
            .with_children(|parent| {
                parent
                    .spawn((
                        MaterialMesh2dBundle {
                            mesh: Mesh2dHandle(meshes.add(Circle::new(size / 2.0))),
                            material: materials.add(ColorMaterial::from(rgba(body.color, 1.0))),
                            ..Default::default()
                        },
                        BodyDisc(body.name.clone()),
                    ))
                    .with_children(|disc| {
                        if body.has_rings {
                            disc.spawn(MaterialMesh2dBundle {
                                mesh: Mesh2dHandle(meshes.add(Ellipse::new(size * 1.1, size * 0.2))),
                                material: materials.add(ColorMaterial::from(Color::srgba(
                                    237.0 / 255.0,
                                    185.0 / 255.0,
                                    99.0 / 255.0,
                                    0.6,
                                ))),
                                transform: Transform::from_xyz(0.0, 0.0, -0.005)
                                    .with_rotation(Quat::from_rotation_z(-20f32.to_radians())),
                                ..Default::default()
                            });
                        }
                    });

                parent.spawn((
                    Text2dBundle {
                        text: Text::from_section(
                            body.name.clone(),
                            TextStyle {
                                font_size: 14.0,
                                color: Color::WHITE,
                                ..Default::default()
                            },
                        ),
                        transform: Transform::from_xyz(0.0, -(size / 2.0 + 14.0), 0.01),
                        ..Default::default()
                    },
                    BodyLabel(body.name.clone()),
                ));
            });
    }

    for (layer, shower, z) in [
        (Layer::Sky, &scene.comets, 3.0),
        (Layer::BlackHole, &scene.black_hole_comets, 3.5),
    ] {
        for (i, comet) in shower.comets.iter().enumerate() {
            commands.spawn((
                SpriteBundle {
                    sprite: Sprite {
                        color: Color::srgba(1.0, 1.0, 1.0, 0.0),
                        custom_size: Some(Vec2::new(comet.length_px as f32, 2.0)),
                        ..Default::default()
                    },
                    transform: Transform::from_xyz(0.0, 0.0, z),
                    visibility: Visibility::Hidden,
                    ..Default::default()
                },
                CometIndex(layer, i),
            ));
        }
    }

    commands
        .spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(160.0))),
                material: materials.add(ColorMaterial::from(Color::BLACK)),
                transform: Transform::from_xyz(0.0, 0.0, 4.0),
                ..Default::default()
            },
            BlackHoleDisc,
        ))
        .with_children(|parent| {
            parent.spawn(MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(176.0))),
                material: materials.add(ColorMaterial::from(Color::srgba(0.51, 0.34, 0.9, 0.3))),
                transform: Transform::from_xyz(0.0, 0.0, -0.01),
                ..Default::default()
            });

            // each ring carries two beads so its rotation shows
            for (ring, radius, color) in [
                (BlackHoleRing::Outer, 168.0, Color::srgba(0.66, 0.33, 0.97, 0.6)),
                (BlackHoleRing::Inner, 156.0, Color::srgba(0.38, 0.65, 0.98, 0.5)),
            ] {
                parent
                    .spawn((SpatialBundle::from_transform(Transform::from_xyz(0.0, 0.0, 0.01)), ring))
                    .with_children(|beads| {
                        for x in [radius, -radius] {
                            beads.spawn(SpriteBundle {
                                sprite: Sprite {
                                    color,
                                    custom_size: Some(Vec2::splat(4.0)),
                                    ..Default::default()
                                },
                                transform: Transform::from_xyz(x, 0.0, 0.0),
                                ..Default::default()
                            });
                        }
                    });
            }
        });
}

fn input_system(
    mut wheel: EventReader<MouseWheel>,
    mut resized: EventReader<WindowResized>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut scroll: ResMut<PageScroll>,
    mut engine: ResMut<Engine>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    let viewport = window.height() as f64;

    let was_resized = resized.read().last().is_some();
    if was_resized {
        engine.on_resize(viewport);
    }

    let delta: f64 = wheel
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y as f64 * LINE_PX,
            MouseScrollUnit::Pixel => ev.y as f64,
        })
        .sum();

    if delta == 0.0 && !was_resized {
        return;
    }

    // wheel up (positive y) moves towards the top of the page
    let max_offset = (engine.scene().page_viewports - 1.0).max(0.0) * viewport;
    scroll.offset_px = (scroll.offset_px - delta).clamp(0.0, max_offset);

    let section_top = engine.scene().black_hole.section_offset_viewports * viewport - scroll.offset_px;
    engine.on_scroll(scroll.offset_px, section_top);
}

fn tick_system(
    time: Res<Time>,
    clock: Res<ViewerClock>,
    mut engine: ResMut<Engine>,
    mut current: ResMut<CurrentFrame>,
) {
    current.0 = engine.tick(clock.0.now(time.elapsed_seconds_f64()));
}

fn sync_sky_system(
    current: Res<CurrentFrame>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut clear: ResMut<ClearColor>,
    mut overlay: Query<&mut Sprite, With<NightOverlay>>,
    mut discs: Query<(&SkyDisc, Has<SunDisc>, &mut Transform, &Handle<ColorMaterial>)>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let (Some(frame), Ok(window)) = (&current.0, windows.get_single()) else {
        return;
    };
    let v = &frame.visual;

    clear.0 = rgba(v.sky_rgb(), 1.0);
    for mut sprite in &mut overlay {
        sprite.color = rgba(NIGHT, v.night_overlay_opacity as f32);
    }

    // sun and moon share a track 15% below the top edge
    let x = (v.celestial_horizontal_pct as f32 / 100.0 - 0.5) * window.width();
    let y = window.height() * (0.5 - 0.15) - 60.0;
    for (disc, is_sun, mut transform, handle) in &mut discs {
        transform.translation.x = x;
        transform.translation.y = y;
        let alpha = if is_sun { v.sun_opacity } else { v.moon_opacity };
        if let Some(material) = materials.get_mut(handle) {
            material.color = rgba(disc.0, alpha as f32);
        }
    }
}

fn sync_bodies_system(
    current: Res<CurrentFrame>,
    mut anchors: Query<(&BodyAnchor, &mut Transform, &mut Visibility), (Without<BodyDisc>, Without<BodyLabel>)>,
    mut discs: Query<(&BodyDisc, &mut Transform), Without<BodyAnchor>>,
    mut labels: Query<(&BodyLabel, &mut Visibility), Without<BodyAnchor>>,
) {
    let Some(frame) = &current.0 else {
        return;
    };
    let (center, scale) = solar_transform(frame);

    for (BodyAnchor(name), mut transform, mut visibility) in &mut anchors {
        let Some(body) = frame.body(name) else {
            continue;
        };
        // page y grows downwards, world y upwards
        transform.translation.x = center.x + body.position.x as f32 * scale;
        transform.translation.y = center.y - body.position.y as f32 * scale;
        // a swallowed body shrinks and spins around its own center
        let size = scale * body.shrink.scale as f32;
        transform.scale = Vec3::new(size, size, 1.0);
        transform.rotation = Quat::from_rotation_z(-(body.shrink.rotate_deg as f32).to_radians());
        *visibility = if body.shrink.scale <= 0.0 {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }

    for (BodyLabel(name), mut visibility) in &mut labels {
        let suppressed = frame.body(name).is_some_and(|b| b.suppressed);
        *visibility = if suppressed {
            Visibility::Hidden
        } else {
            Visibility::Inherited
        };
    }

    for (BodyDisc(name), mut transform) in &mut discs {
        if let Some(body) = frame.body(name) {
            transform.rotation = Quat::from_rotation_z(-(body.spin_deg as f32).to_radians());
        }
    }
}

fn sync_stars_system(
    current: Res<CurrentFrame>,
    engine: Res<Engine>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut stars: Query<(&StarIndex, &mut Transform, &mut Sprite)>,
) {
    let (Some(frame), Ok(window)) = (&current.0, windows.get_single()) else {
        return;
    };
    let scene = engine.scene();
    let section_y = black_hole_section_y(&engine);

    for (StarIndex(layer, i), mut transform, mut sprite) in &mut stars {
        let (field, opacities, center_y) = match layer {
            Layer::Sky => (&scene.starfield, &frame.star_opacity, 0.0),
            Layer::BlackHole => (&scene.black_hole_starfield, &frame.black_hole.star_opacity, section_y),
        };
        let (Some(star), Some(opacity)) = (field.stars.get(*i), opacities.get(*i)) else {
            continue;
        };
        transform.translation.x = (star.x_pct as f32 / 100.0 - 0.5) * window.width();
        transform.translation.y = center_y + (0.5 - star.y_pct as f32 / 100.0) * window.height();
        sprite.color = Color::srgba(1.0, 1.0, 1.0, *opacity as f32);
    }
}

fn sync_comets_system(
    current: Res<CurrentFrame>,
    engine: Res<Engine>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut comets: Query<(&CometIndex, &mut Transform, &mut Sprite, &mut Visibility)>,
) {
    let (Some(frame), Ok(window)) = (&current.0, windows.get_single()) else {
        return;
    };
    let scene = engine.scene();
    let section_y = black_hole_section_y(&engine);

    for (CometIndex(layer, i), mut transform, mut sprite, mut visibility) in &mut comets {
        let (shower, states, center_y) = match layer {
            Layer::Sky => (&scene.comets, &frame.comets, 0.0),
            Layer::BlackHole => (&scene.black_hole_comets, &frame.black_hole.comets, section_y),
        };
        let (Some(comet), Some(state)) = (shower.comets.get(*i), states.get(*i)) else {
            continue;
        };
        if !state.visible {
            *visibility = Visibility::Hidden;
            continue;
        }
        *visibility = Visibility::Inherited;
        transform.translation.x = (comet.start_pct.x as f32 / 100.0 - 0.5) * window.width() + state.offset.x as f32;
        transform.translation.y =
            center_y + (0.5 - comet.start_pct.y as f32 / 100.0) * window.height() - state.offset.y as f32;
        transform.rotation = Quat::from_rotation_z(-(comet.heading_deg as f32).to_radians());
        sprite.color = Color::srgba(1.0, 1.0, 1.0, state.opacity as f32);
    }
}

fn sync_sun_system(
    current: Res<CurrentFrame>,
    mut suns: Query<(&mut Transform, &Handle<ColorMaterial>), With<CentralSun>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let Some(frame) = &current.0 else {
        return;
    };
    let (center, scale) = solar_transform(frame);

    for (mut transform, handle) in &mut suns {
        let size = scale * frame.sun.scale as f32;
        transform.translation.x = center.x;
        transform.translation.y = center.y;
        transform.scale = Vec3::new(size, size, 1.0);
        if let Some(material) = materials.get_mut(handle) {
            material.color = rgba(SOLAR_SUN, frame.sun.opacity as f32);
        }
    }
}

fn sync_black_hole_system(
    current: Res<CurrentFrame>,
    engine: Res<Engine>,
    mut holes: Query<&mut Transform, (With<BlackHoleDisc>, Without<BlackHoleRing>)>,
    mut rings: Query<(&BlackHoleRing, &mut Transform), Without<BlackHoleDisc>>,
) {
    let Some(frame) = &current.0 else {
        return;
    };
    let (block_scale, block_rotate) = frame
        .block(BLACK_HOLE_BLOCK)
        .map_or((1.0, 0.0), |b| (b.scale, b.rotate_deg));
    let pulse = frame.black_hole.pulse;

    for mut transform in &mut holes {
        let scale = (block_scale * pulse.scale) as f32;
        transform.translation.y = black_hole_section_y(&engine);
        transform.scale = Vec3::new(scale, scale, 1.0);
        transform.rotation = Quat::from_rotation_z(-((block_rotate + pulse.rotate_deg) as f32).to_radians());
    }

    for (ring, mut transform) in &mut rings {
        let deg = match ring {
            BlackHoleRing::Outer => frame.black_hole.rings.outer_deg,
            BlackHoleRing::Inner => frame.black_hole.rings.inner_deg,
        };
        transform.rotation = Quat::from_rotation_z(-(deg as f32).to_radians());
    }
}

fn draw_orbits_system(current: Res<CurrentFrame>, engine: Res<Engine>, mut gizmos: Gizmos) {
    let Some(frame) = &current.0 else {
        return;
    };
    let (center, scale) = solar_transform(frame);
    let flatten = engine.scene().parameters.flatten_factor;

    for body in &engine.scene().bodies {
        let axes = crate::simulation::orbit::orbit_path(body, flatten);
        let half_size = Vec2::new(axes.x as f32, axes.y as f32) * scale;
        gizmos.ellipse_2d(center, 0.0, half_size, Color::srgba(1.0, 1.0, 1.0, 0.1));
    }
}

fn detach_on_exit_system(mut exits: EventReader<AppExit>, mut engine: ResMut<Engine>) {
    if exits.read().next().is_some() {
        engine.detach();
    }
}

// section top relative to the viewport top maps to world y = -top for a
// viewport-tall section centered on its content
fn black_hole_section_y(engine: &Engine) -> f32 {
    -(engine.inputs().section_top_px.unwrap_or(0.0) as f32)
}

fn solar_transform(frame: &Frame) -> (Vec2, f32) {
    frame.block(SOLAR_BLOCK).map_or((Vec2::ZERO, 1.0), |b| {
        (
            Vec2::new(b.translate.x as f32, -b.translate.y as f32),
            b.scale as f32,
        )
    })
}

fn body_z(stack_order: i32) -> f32 {
    2.0 + stack_order as f32 * 0.01
}

fn rgba(c: Rgb, alpha: f32) -> Color {
    let [r, g, b] = c.to_unit();
    Color::srgba(r, g, b, alpha)
}
