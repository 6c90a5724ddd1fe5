//! Street trees scattered over the grass quadrants.
//!
//! Placement is rejection-sampled against a Perlin density field so the
//! trees clump a little instead of spreading out evenly.

use bevy::prelude::*;
use noise::{NoiseFn, Perlin};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scene::layout::CrossroadsLayout;

#[derive(Component)]
pub struct Tree;

#[derive(Resource)]
pub struct TreeConfig {
    pub per_quadrant: usize,
    pub min_scale: f32,
    pub max_scale: f32,
    pub trunk_radius: f32,
    pub trunk_height: f32,
    pub canopy_radius: f32,
    pub canopy_height: f32,
    pub noise_scale: f64,
    pub noise_seed: u32,
    pub seed: u64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            per_quadrant: 10,
            min_scale: 0.7,
            max_scale: 1.2,
            trunk_radius: 0.22,
            trunk_height: 1.8,
            canopy_radius: 1.0,
            canopy_height: 2.6,
            noise_scale: 0.08,
            noise_seed: 7,
            seed: 424242,
        }
    }
}

pub fn spawn_trees(
    mut commands: Commands,
    config: Res<TreeConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let density_field = Perlin::new(config.noise_seed);

    let trunk_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.35, 0.25, 0.15),
        perceptual_roughness: 0.9,
        ..default()
    });
    let canopy_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.4, 0.15),
        perceptual_roughness: 0.95,
        ..default()
    });

    let trunk_mesh = meshes.add(Cylinder::new(config.trunk_radius, config.trunk_height));
    let canopy_mesh = meshes.add(Cone::new(config.canopy_radius, config.canopy_height));

    let mut tree_count = 0;

    for signs in CrossroadsLayout::quadrant_signs() {
        let mut placed = 0;
        let mut attempts = 0;
        // A few spare attempts per tree; sparse density pockets can reject.
        while placed < config.per_quadrant && attempts < config.per_quadrant * 4 {
            attempts += 1;

            let x = signs.x * (6.0 + rng.gen::<f32>() * 30.0);
            let z = signs.y * (8.0 + rng.gen::<f32>() * 30.0);

            let density = (density_field
                .get([x as f64 * config.noise_scale, z as f64 * config.noise_scale])
                as f32
                + 1.0)
                / 2.0;
            if rng.gen::<f32>() > 0.3 + 0.6 * density {
                continue;
            }

            let scale = config.min_scale + rng.gen::<f32>() * (config.max_scale - config.min_scale);

            commands
                .spawn((
                    Transform::from_xyz(x, 0.0, z).with_scale(Vec3::splat(scale)),
                    Visibility::default(),
                    Tree,
                ))
                .with_children(|parent| {
                    parent.spawn((
                        Mesh3d(trunk_mesh.clone()),
                        MeshMaterial3d(trunk_material.clone()),
                        Transform::from_xyz(0.0, config.trunk_height / 2.0, 0.0),
                    ));
                    parent.spawn((
                        Mesh3d(canopy_mesh.clone()),
                        MeshMaterial3d(canopy_material.clone()),
                        Transform::from_xyz(
                            0.0,
                            config.trunk_height + config.canopy_height / 2.0,
                            0.0,
                        ),
                    ));
                });

            placed += 1;
            tree_count += 1;
        }
    }

    info!("Spawned {} trees", tree_count);
}
