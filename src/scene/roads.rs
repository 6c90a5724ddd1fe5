//! Road surfaces, lane markings, sidewalks, grass and the invisible
//! barriers that keep traffic on the pavement.

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::scene::layout::CrossroadsLayout;
use crate::traffic::vehicles::TravelAxis;

#[derive(Component)]
pub struct RoadSurface;

#[derive(Component)]
pub struct LaneMarking;

#[derive(Component)]
pub struct Sidewalk;

#[derive(Component)]
pub struct GrassPatch;

/// Invisible collider keeping cars inside the road corridor.
#[derive(Component)]
pub struct TrafficBarrier;

#[derive(Resource)]
pub struct RoadStyle {
    pub surface_thickness: f32,
    pub lane_offset: f32,
    pub dash_length: f32,
    pub dash_pitch: f32,
    pub dash_width: f32,
    pub divider_width: f32,
    pub sidewalk_width: f32,
    pub sidewalk_height: f32,
    pub verge_offset: f32,
    pub barrier_half_height: f32,
    pub grass_extent: f32,
}

impl Default for RoadStyle {
    fn default() -> Self {
        Self {
            surface_thickness: 0.05,
            lane_offset: 2.0,
            dash_length: 1.0,
            dash_pitch: 2.0,
            dash_width: 0.1,
            divider_width: 0.2,
            sidewalk_width: 1.0,
            sidewalk_height: 0.3,
            verge_offset: 1.5,      // Barriers sit just past the sidewalk
            barrier_half_height: 2.0,
            grass_extent: 40.0,
        }
    }
}

/// Size a flat marking quad for an arm axis: markings run along travel.
fn marking_size(axis: TravelAxis, along: f32, across: f32) -> Vec2 {
    match axis {
        TravelAxis::X => Vec2::new(along, across),
        TravelAxis::Z => Vec2::new(across, along),
    }
}

/// Spawn the whole road network off the layout graph.
pub fn spawn_road_network(
    mut commands: Commands,
    layout: Res<CrossroadsLayout>,
    style: Res<RoadStyle>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let asphalt = materials.add(StandardMaterial {
        base_color: Color::srgb(0.18, 0.18, 0.21),
        perceptual_roughness: 0.95,
        ..default()
    });
    let divider_paint = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.75, 0.1),
        perceptual_roughness: 0.8,
        ..default()
    });
    let dash_paint = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.9, 0.9),
        perceptual_roughness: 0.8,
        ..default()
    });
    let concrete = materials.add(StandardMaterial {
        base_color: Color::srgb(0.55, 0.55, 0.55),
        perceptual_roughness: 0.9,
        ..default()
    });
    let grass = materials.add(StandardMaterial {
        base_color: Color::srgb(0.2, 0.45, 0.2),
        perceptual_roughness: 1.0,
        ..default()
    });

    // Grass quadrants first, below everything else.
    let grass_mesh = meshes.add(
        Plane3d::default()
            .mesh()
            .size(style.grass_extent, style.grass_extent),
    );
    // Quadrant centers clear the sidewalks on both axes.
    let grass_center = style.grass_extent / 2.0 + 5.0;
    for signs in CrossroadsLayout::quadrant_signs() {
        commands.spawn((
            Mesh3d(grass_mesh.clone()),
            MeshMaterial3d(grass.clone()),
            Transform::from_xyz(signs.x * grass_center, -0.15, signs.y * grass_center),
            GrassPatch,
        ));
    }

    // One continuous surface slab per axis. The Z slab sits a touch higher
    // so the overlap at the junction never flickers.
    let mut surface_y = -0.1;
    for axis in [TravelAxis::X, TravelAxis::Z] {
        let span = layout.road_span(axis);
        let width = 2.0 * layout.road_half_width(axis);
        let size = marking_size(axis, span, width);
        commands.spawn((
            Mesh3d(meshes.add(Cuboid::new(size.x, style.surface_thickness, size.y))),
            MeshMaterial3d(asphalt.clone()),
            Transform::from_xyz(0.0, surface_y - style.surface_thickness / 2.0, 0.0),
            RigidBody::Fixed,
            Collider::cuboid(size.x / 2.0, style.surface_thickness / 2.0, size.y / 2.0),
            RoadSurface,
        ));

        // Solid center divider, full span.
        let divider_size = marking_size(axis, span, style.divider_width);
        commands.spawn((
            Mesh3d(
                meshes.add(
                    Plane3d::default()
                        .mesh()
                        .size(divider_size.x, divider_size.y),
                ),
            ),
            MeshMaterial3d(divider_paint.clone()),
            Transform::from_xyz(0.0, surface_y + 0.015, 0.0),
            LaneMarking,
        ));

        surface_y += 0.005;
    }

    // Dashed lane separators, walked out along each arm.
    let mut dash_count = 0;
    for arm in layout.arms() {
        let dash_size = marking_size(arm.axis, style.dash_length, style.dash_width);
        let dash_mesh = meshes.add(Plane3d::default().mesh().size(dash_size.x, dash_size.y));
        let cross_half_width = layout.road_half_width(arm.axis.cross());

        for side in [-1.0, 1.0] {
            let lateral = arm.lateral() * (side * style.lane_offset);
            let mut d = cross_half_width + style.dash_length;
            while d + style.dash_length / 2.0 < arm.length {
                let pos = arm.point_at(d) + lateral;
                commands.spawn((
                    Mesh3d(dash_mesh.clone()),
                    MeshMaterial3d(dash_paint.clone()),
                    Transform::from_xyz(pos.x, -0.075, pos.y),
                    LaneMarking,
                ));
                dash_count += 1;
                d += style.dash_pitch;
            }
        }
    }

    // Sidewalk strips flanking each arm, with colliders so nothing clips
    // through the kerb. Strips begin past the crossing road so their
    // colliders leave the junction open; the corner gap doubles as a
    // crossing point.
    for arm in layout.arms() {
        let cross_half_width = layout.road_half_width(arm.axis.cross());
        let strip_start = cross_half_width + style.sidewalk_width;
        let strip_len = arm.length - strip_start;
        let size = marking_size(arm.axis, strip_len, style.sidewalk_width);
        let strip_mesh = meshes.add(Cuboid::new(size.x, style.sidewalk_height, size.y));
        let kerb_offset = arm.half_width + style.sidewalk_width / 2.0;

        for side in [-1.0, 1.0] {
            let pos = arm.point_at(strip_start + strip_len / 2.0)
                + arm.lateral() * (side * kerb_offset);
            commands.spawn((
                Mesh3d(strip_mesh.clone()),
                MeshMaterial3d(concrete.clone()),
                Transform::from_xyz(pos.x, 0.0, pos.y),
                RigidBody::Fixed,
                Collider::cuboid(size.x / 2.0, style.sidewalk_height / 2.0, size.y / 2.0),
                Sidewalk,
            ));
        }
    }

    // Invisible barriers. Side walls flank each arm past the verge and a cap
    // closes the arm end, so through cars cross the junction but never leave
    // the roadway.
    let mut barrier_count = 0;
    for arm in layout.arms() {
        let wall_offset = arm.half_width + style.verge_offset;
        let wall_start = wall_offset;
        let wall_half_len = (arm.length - wall_start) / 2.0;
        let wall_center = wall_start + wall_half_len;

        for side in [-1.0, 1.0] {
            let pos = arm.point_at(wall_center) + arm.lateral() * (side * wall_offset);
            let collider = match arm.axis {
                TravelAxis::X => {
                    Collider::cuboid(wall_half_len, style.barrier_half_height, 0.5)
                }
                TravelAxis::Z => {
                    Collider::cuboid(0.5, style.barrier_half_height, wall_half_len)
                }
            };
            commands.spawn((
                collider,
                Transform::from_xyz(pos.x, 1.0, pos.y),
                TrafficBarrier,
            ));
            barrier_count += 1;
        }

        let cap_pos = arm.point_at(arm.length + 0.5);
        let cap_collider = match arm.axis {
            TravelAxis::X => Collider::cuboid(0.5, style.barrier_half_height, wall_offset),
            TravelAxis::Z => Collider::cuboid(wall_offset, style.barrier_half_height, 0.5),
        };
        commands.spawn((
            cap_collider,
            Transform::from_xyz(cap_pos.x, 1.0, cap_pos.y),
            TrafficBarrier,
        ));
        barrier_count += 1;
    }

    info!(
        "Spawned road network: {} dashes, {} barrier segments",
        dash_count, barrier_count
    );
}
