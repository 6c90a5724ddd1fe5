//! Signal head fixtures at the junction corners.
//!
//! Spawns the poles and lamp housings and keeps the lamp emissives in sync
//! with the controller phase. The heads hold no phase state of their own.

use std::f32::consts::{FRAC_PI_2, PI};

use bevy::prelude::*;

use crate::scene::layout::CrossroadsLayout;
use crate::traffic::signal::{SignalController, SignalPhase};
use crate::traffic::vehicles::TravelAxis;

/// Marker for static signal head parts.
#[derive(Component)]
pub struct SignalHead;

/// One lamp sphere on a head. Lit when the controller phase for its axis
/// matches the indication it shows.
#[derive(Component)]
pub struct SignalLamp {
    pub axis: TravelAxis,
    pub shows: SignalPhase,
}

#[derive(Resource)]
pub struct SignalHeadConfig {
    pub pole_height: f32,
    pub pole_radius: f32,
    pub housing_width: f32,
    pub housing_height: f32,
    pub housing_depth: f32,
    pub lamp_radius: f32,
}

impl Default for SignalHeadConfig {
    fn default() -> Self {
        Self {
            pole_height: 4.0,
            pole_radius: 0.12,
            housing_width: 0.6,
            housing_height: 1.4,
            housing_depth: 0.5,
            lamp_radius: 0.16,
        }
    }
}

// Corner mounts around the junction: planar offset, facing yaw, served axis.
const HEAD_MOUNTS: &[(Vec2, f32, TravelAxis)] = &[
    (Vec2::new(6.0, 4.5), FRAC_PI_2, TravelAxis::X),
    (Vec2::new(-6.0, -4.5), -FRAC_PI_2, TravelAxis::X),
    (Vec2::new(-4.5, 6.0), 0.0, TravelAxis::Z),
    (Vec2::new(5.0, -5.0), PI, TravelAxis::Z),
];

// Unlit lamps keep a faint glow so the head reads as powered but idle.
const DIM_FACTOR: f32 = 0.04;

fn lamp_emissive(shows: SignalPhase) -> LinearRgba {
    match shows {
        SignalPhase::Red => LinearRgba::new(1.0, 0.1, 0.1, 1.0),
        SignalPhase::Yellow => LinearRgba::new(1.0, 0.85, 0.1, 1.0),
        SignalPhase::Green => LinearRgba::new(0.1, 1.0, 0.2, 1.0),
    }
}

fn lamp_base_color(shows: SignalPhase) -> Color {
    match shows {
        SignalPhase::Red => Color::srgb(0.8, 0.1, 0.1),
        SignalPhase::Yellow => Color::srgb(0.8, 0.7, 0.1),
        SignalPhase::Green => Color::srgb(0.1, 0.8, 0.2),
    }
}

/// Spawn the controller and the four corner heads around the junction.
pub fn spawn_signal_heads(
    mut commands: Commands,
    layout: Res<CrossroadsLayout>,
    config: Res<SignalHeadConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let pole_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.15, 0.15, 0.15),
        perceptual_roughness: 0.5,
        metallic: 0.6,
        ..default()
    });
    let housing_material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.1, 0.1, 0.1),
        perceptual_roughness: 0.7,
        metallic: 0.3,
        ..default()
    });

    let pole_mesh = meshes.add(Cylinder::new(config.pole_radius, config.pole_height));
    let housing_mesh = meshes.add(Cuboid::new(
        config.housing_width,
        config.housing_height,
        config.housing_depth,
    ));
    let lamp_mesh = meshes.add(Sphere::new(config.lamp_radius));

    let mut head_count = 0;
    let mut controller_count = 0;

    // The signalized node is the one where both roads meet.
    for node_idx in layout.graph.node_indices() {
        if layout.graph.neighbors(node_idx).count() < 3 {
            continue;
        }
        let Some(node) = layout.graph.node_weight(node_idx) else {
            continue;
        };

        commands.spawn(SignalController::new());
        controller_count += 1;

        for &(offset, yaw, axis) in HEAD_MOUNTS {
            let base = node.position + offset;
            let rotation = Quat::from_rotation_y(yaw);
            let forward = rotation * Vec3::Z;

            commands.spawn((
                Mesh3d(pole_mesh.clone()),
                MeshMaterial3d(pole_material.clone()),
                Transform::from_xyz(base.x, config.pole_height / 2.0, base.y),
                SignalHead,
            ));

            let housing_y = config.pole_height + config.housing_height / 2.0;
            commands.spawn((
                Mesh3d(housing_mesh.clone()),
                MeshMaterial3d(housing_material.clone()),
                Transform::from_xyz(base.x, housing_y, base.y).with_rotation(rotation),
                SignalHead,
            ));

            // Red on top, yellow in the middle, green at the bottom. Every
            // lamp gets its own material so it can glow independently.
            let lamp_spacing = config.housing_height / 4.0;
            let lamp_offset = forward * (config.housing_depth / 2.0 + config.lamp_radius * 0.5);
            let rows = [
                (SignalPhase::Red, housing_y + lamp_spacing),
                (SignalPhase::Yellow, housing_y),
                (SignalPhase::Green, housing_y - lamp_spacing),
            ];
            for (shows, lamp_y) in rows {
                let lamp_material = materials.add(StandardMaterial {
                    base_color: lamp_base_color(shows),
                    emissive: lamp_emissive(shows) * DIM_FACTOR,
                    ..default()
                });
                commands.spawn((
                    Mesh3d(lamp_mesh.clone()),
                    MeshMaterial3d(lamp_material),
                    Transform::from_xyz(
                        base.x + lamp_offset.x,
                        lamp_y,
                        base.y + lamp_offset.z,
                    ),
                    SignalHead,
                    SignalLamp { axis, shows },
                ));
            }

            head_count += 1;
        }
    }

    if controller_count == 0 {
        warn!("Layout has no junction node; signals not spawned");
        return;
    }
    info!("Spawned {} signal heads", head_count);
}

/// Drive the lamp emissives from the controller phase. During startup the
/// X heads stay dark even though traffic treats them as red.
pub fn sync_signal_lamps(
    controllers: Query<&SignalController>,
    lamps: Query<(&SignalLamp, &MeshMaterial3d<StandardMaterial>)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let Ok(controller) = controllers.get_single() else {
        return;
    };

    for (lamp, material) in lamps.iter() {
        let dark = controller.phase.x_heads_dark() && lamp.axis == TravelAxis::X;
        let lit = !dark && controller.phase.phase_for(lamp.axis) == lamp.shows;

        if let Some(mat) = materials.get_mut(&material.0) {
            mat.emissive = if lit {
                lamp_emissive(lamp.shows)
            } else {
                lamp_emissive(lamp.shows) * DIM_FACTOR
            };
        }
    }
}
