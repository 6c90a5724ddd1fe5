//! Lampposts along both sides of every arm.

use bevy::prelude::*;

use crate::scene::layout::CrossroadsLayout;

#[derive(Component)]
pub struct Lamppost;

#[derive(Resource)]
pub struct LamppostConfig {
    pub pitch: f32,
    pub start_offset: f32,
    pub kerb_offset: f32,
    pub pole_height: f32,
    pub pole_radius: f32,
    pub arm_length: f32,
    pub bulb_radius: f32,
}

impl Default for LamppostConfig {
    fn default() -> Self {
        Self {
            pitch: 10.0,
            start_offset: 5.0,
            kerb_offset: 4.0,
            pole_height: 4.0,
            pole_radius: 0.1,
            arm_length: 0.8,
            bulb_radius: 0.2,
        }
    }
}

pub fn spawn_lampposts(
    mut commands: Commands,
    layout: Res<CrossroadsLayout>,
    config: Res<LamppostConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let pole_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.2, 0.22),
        perceptual_roughness: 0.6,
        metallic: 0.7,
        ..default()
    });
    let bulb_material = materials.add(StandardMaterial {
        base_color: Color::srgb(1.0, 0.95, 0.7),
        emissive: LinearRgba::new(0.8, 0.72, 0.48, 1.0),
        ..default()
    });

    let pole_mesh = meshes.add(Cylinder::new(config.pole_radius, config.pole_height));
    let arm_mesh = meshes.add(Cylinder::new(config.pole_radius * 0.7, config.arm_length));
    let bulb_mesh = meshes.add(Sphere::new(config.bulb_radius));

    let mut lamp_count = 0;

    for arm in layout.arms() {
        for side in [-1.0, 1.0] {
            let lateral = arm.lateral() * side;
            // The cross-arm leans back over the roadway.
            let inward = -lateral;

            let mut d = config.start_offset;
            while d < arm.length {
                let base = arm.point_at(d) + lateral * config.kerb_offset;
                let inward3 = Vec3::new(inward.x, 0.0, inward.y);

                commands.spawn((
                    Mesh3d(pole_mesh.clone()),
                    MeshMaterial3d(pole_material.clone()),
                    Transform::from_xyz(base.x, config.pole_height / 2.0, base.y),
                    Lamppost,
                ));
                commands.spawn((
                    Mesh3d(arm_mesh.clone()),
                    MeshMaterial3d(pole_material.clone()),
                    Transform::from_translation(
                        Vec3::new(base.x, config.pole_height, base.y)
                            + inward3 * (config.arm_length / 2.0),
                    )
                    .with_rotation(Quat::from_rotation_arc(Vec3::Y, inward3)),
                    Lamppost,
                ));
                commands.spawn((
                    Mesh3d(bulb_mesh.clone()),
                    MeshMaterial3d(bulb_material.clone()),
                    Transform::from_translation(
                        Vec3::new(base.x, config.pole_height, base.y)
                            + inward3 * config.arm_length,
                    ),
                    Lamppost,
                ));

                lamp_count += 1;
                d += config.pitch;
            }
        }
    }

    info!("Spawned {} lampposts", lamp_count);
}
