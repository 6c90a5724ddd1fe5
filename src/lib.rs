//! Crossroadsim - interactive 3D crossroads
//!
//! A Bevy scene built around one signalized junction: correlated traffic
//! lights on a shared cycle, through cars driven by velocity commands, and
//! parked cars that remember being bumped. Rapier supplies the physics.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

pub mod camera;
pub mod scene;
pub mod traffic;

/// Assemble the app and hand control to Bevy.
pub fn run() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Crossroadsim".into(),
                resolution: (1280., 720.).into(),
                ..default()
            }),
            ..default()
        }))
        // Physics host
        .add_plugins(RapierPhysicsPlugin::<NoUserData>::default())
        // Core plugins
        .add_plugins(camera::OrbitCameraPlugin)
        .add_plugins(scene::ScenePlugin)
        .add_plugins(traffic::TrafficPlugin)
        .run();
}
