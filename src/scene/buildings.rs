//! Block buildings in the four quadrants around the junction.
//!
//! Each quadrant gets a short row of boxes with randomized footprints and
//! heights, a roof slab, and a window grid where some windows glow.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scene::layout::CrossroadsLayout;

#[derive(Component)]
pub struct Building;

#[derive(Resource)]
pub struct BuildingConfig {
    pub per_quadrant: usize,
    pub base_offset: f32,
    pub row_pitch_x: f32,
    pub row_pitch_z: f32,
    pub floor_height: f32,
    pub window_width: f32,
    pub window_height: f32,
    pub lit_fraction: f32,
    pub seed: u64,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            per_quadrant: 5,
            base_offset: 10.0,
            row_pitch_x: 5.0,
            row_pitch_z: 3.0,
            floor_height: 1.5,
            window_width: 0.35,
            window_height: 0.5,
            lit_fraction: 0.7,
            seed: 13579,
        }
    }
}

pub fn spawn_buildings(
    mut commands: Commands,
    config: Res<BuildingConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = StdRng::seed_from_u64(config.seed);

    let roof_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.25, 0.25, 0.28),
        perceptual_roughness: 0.9,
        ..default()
    });
    let lit_window = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.8, 0.5),
        emissive: LinearRgba::new(0.9, 0.7, 0.35, 1.0),
        ..default()
    });
    let dark_window = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.1, 0.12),
        perceptual_roughness: 0.2,
        metallic: 0.4,
        ..default()
    });

    let front_window_mesh = meshes.add(Cuboid::new(
        config.window_width,
        config.window_height,
        0.02,
    ));
    let side_window_mesh = meshes.add(Cuboid::new(
        0.02,
        config.window_height,
        config.window_width,
    ));

    let mut building_count = 0;
    let mut lit_count = 0;

    for signs in CrossroadsLayout::quadrant_signs() {
        for i in 0..config.per_quadrant {
            let x = signs.x * (config.base_offset + config.row_pitch_x * i as f32);
            let z = signs.y * (config.base_offset + config.row_pitch_z * i as f32);

            let height = 5.0 + rng.gen::<f32>() * 5.0;
            let width = 2.0 + rng.gen::<f32>();
            let depth = 2.0 + rng.gen::<f32>() * 2.0;

            // Muted facade tones so the lit windows carry the color.
            let tone = 0.7 + rng.gen::<f32>() * 0.2;
            let facade = materials.add(StandardMaterial {
                base_color: Color::srgb(tone, tone, tone * 0.95),
                perceptual_roughness: 0.85,
                ..default()
            });

            commands
                .spawn((
                    Mesh3d(meshes.add(Cuboid::new(width, height, depth))),
                    MeshMaterial3d(facade),
                    Transform::from_xyz(x, height / 2.0, z),
                    Building,
                    Visibility::default(),
                ))
                .with_children(|parent| {
                    // Roof slab with a small overhang.
                    parent.spawn((
                        Mesh3d(meshes.add(Cuboid::new(width + 0.2, 0.2, depth + 0.2))),
                        MeshMaterial3d(roof_material.clone()),
                        Transform::from_xyz(0.0, height / 2.0 + 0.1, 0.0),
                    ));

                    let floors = (height / config.floor_height).floor() as usize;
                    for floor in 0..floors {
                        // Window centers, measured from the building center.
                        let y = -height / 2.0
                            + config.floor_height * floor as f32
                            + config.floor_height / 2.0;

                        for side in [-1.0f32, 1.0] {
                            let lit = rng.gen::<f32>() < config.lit_fraction;
                            let material = if lit { &lit_window } else { &dark_window };
                            if lit {
                                lit_count += 1;
                            }
                            parent.spawn((
                                Mesh3d(front_window_mesh.clone()),
                                MeshMaterial3d(material.clone()),
                                Transform::from_xyz(
                                    side * width * 0.25,
                                    y,
                                    depth / 2.0 + 0.01,
                                ),
                            ));

                            let lit = rng.gen::<f32>() < config.lit_fraction;
                            let material = if lit { &lit_window } else { &dark_window };
                            if lit {
                                lit_count += 1;
                            }
                            parent.spawn((
                                Mesh3d(side_window_mesh.clone()),
                                MeshMaterial3d(material.clone()),
                                Transform::from_xyz(
                                    width / 2.0 + 0.01,
                                    y,
                                    side * depth * 0.25,
                                ),
                            ));
                        }
                    }
                });

            building_count += 1;
        }
    }

    info!(
        "Spawned {} buildings ({} lit windows)",
        building_count, lit_count
    );
}
