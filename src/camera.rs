//! Orbit camera around the junction.
//!
//! Left-drag rotates, the wheel zooms. The pitch clamp keeps the viewpoint
//! above the horizon so the scene never flips underneath the ground plane.

use std::f32::consts::FRAC_PI_2;

use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;

pub struct OrbitCameraPlugin;

impl Plugin for OrbitCameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<OrbitCameraConfig>()
            .add_systems(Startup, spawn_camera)
            .add_systems(
                Update,
                (orbit_camera, zoom_camera, apply_camera_transform).chain(),
            );
    }
}

#[derive(Resource)]
pub struct OrbitCameraConfig {
    pub rotate_sensitivity: f32,
    pub zoom_sensitivity: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
}

impl Default for OrbitCameraConfig {
    fn default() -> Self {
        Self {
            rotate_sensitivity: 0.005,
            zoom_sensitivity: 2.0,
            min_distance: 8.0,
            max_distance: 120.0,
            min_pitch: 0.05,
            max_pitch: FRAC_PI_2 - 0.05,
        }
    }
}

/// Polar orbit state around a fixed target.
#[derive(Component)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
}

fn spawn_camera(mut commands: Commands) {
    let start = Vec3::new(20.0, 20.0, 20.0);
    let distance = start.length();
    let pitch = (start.y / distance).asin();
    let yaw = start.x.atan2(start.z);

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 60.0_f32.to_radians(),
            ..default()
        }),
        Transform::from_translation(start).looking_at(Vec3::ZERO, Vec3::Y),
        DistanceFog {
            color: Color::srgb(0.67, 0.73, 0.87),
            falloff: FogFalloff::Linear {
                start: 10.0,
                end: 80.0,
            },
            ..default()
        },
        OrbitCamera {
            target: Vec3::ZERO,
            yaw,
            pitch,
            distance,
        },
    ));
}

fn orbit_camera(
    buttons: Res<ButtonInput<MouseButton>>,
    mut motion: EventReader<MouseMotion>,
    config: Res<OrbitCameraConfig>,
    mut cameras: Query<&mut OrbitCamera>,
) {
    // Drain motion even when the button is up, or stale deltas snap the
    // camera on the next click.
    let delta: Vec2 = motion.read().map(|event| event.delta).sum();
    if !buttons.pressed(MouseButton::Left) || delta == Vec2::ZERO {
        return;
    }

    for mut orbit in cameras.iter_mut() {
        orbit.yaw -= delta.x * config.rotate_sensitivity;
        orbit.pitch = (orbit.pitch + delta.y * config.rotate_sensitivity)
            .clamp(config.min_pitch, config.max_pitch);
    }
}

fn zoom_camera(
    mut wheel: EventReader<MouseWheel>,
    config: Res<OrbitCameraConfig>,
    mut cameras: Query<&mut OrbitCamera>,
) {
    let scroll: f32 = wheel.read().map(|event| event.y).sum();
    if scroll == 0.0 {
        return;
    }

    for mut orbit in cameras.iter_mut() {
        orbit.distance = (orbit.distance - scroll * config.zoom_sensitivity)
            .clamp(config.min_distance, config.max_distance);
    }
}

fn apply_camera_transform(mut cameras: Query<(&OrbitCamera, &mut Transform)>) {
    for (orbit, mut transform) in cameras.iter_mut() {
        let offset = Vec3::new(
            orbit.yaw.sin() * orbit.pitch.cos(),
            orbit.pitch.sin(),
            orbit.yaw.cos() * orbit.pitch.cos(),
        ) * orbit.distance;
        transform.translation = orbit.target + offset;
        transform.look_at(orbit.target, Vec3::Y);
    }
}
