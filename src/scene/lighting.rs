//! Scene lighting: sky ambient plus one shadowed sun.

use bevy::prelude::*;

pub fn setup_lighting(mut commands: Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::srgb(0.8, 0.85, 1.0),
        brightness: 150.0,
    });
    commands.insert_resource(ClearColor(Color::srgb(0.53, 0.71, 0.92)));

    commands.spawn((
        DirectionalLight {
            illuminance: 9_000.0,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(5.0, 10.0, -5.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));
}
