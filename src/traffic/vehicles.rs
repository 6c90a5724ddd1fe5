//! Vehicle actuation: through traffic and parked cars.
//!
//! Moving cars are dynamic bodies that get their cruise velocity written
//! every frame, whatever the signals show. Parked cars are kinematic bodies
//! that remember being hit for a fixed hold window.

use std::f32::consts::{FRAC_PI_2, PI};

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Commanded cruise speed for through traffic, in world units per second.
pub const CRUISE_SPEED: f32 = 5.0;

/// Mass assigned to parked cars at creation so impacts barely move them.
pub const STATIONARY_CAR_MASS: f32 = 1000.0;

/// How long a parked car keeps reporting `collided` after its latest contact.
pub const COLLIDED_HOLD_SECS: f32 = 5.0;

/// Spawn height that puts the collider bottom just above the road surface.
const CAR_RIDE_HEIGHT: f32 = 0.48;

/// Which of the two crossing roads a car travels along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TravelAxis {
    X,
    Z,
}

impl TravelAxis {
    /// Unit vector along the axis of travel.
    pub fn unit(self) -> Vec3 {
        match self {
            Self::X => Vec3::X,
            Self::Z => Vec3::Z,
        }
    }

    /// The other road axis.
    pub fn cross(self) -> Self {
        match self {
            Self::X => Self::Z,
            Self::Z => Self::X,
        }
    }
}

/// Signed heading along a travel axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TravelDirection {
    Positive,
    Negative,
}

impl TravelDirection {
    pub fn signum(self) -> f32 {
        match self {
            Self::Positive => 1.0,
            Self::Negative => -1.0,
        }
    }
}

/// Through-traffic car crossing the junction at cruise speed.
#[derive(Component, Clone, Copy, Debug)]
pub struct MovingCar {
    pub axis: TravelAxis,
    pub direction: TravelDirection,
}

impl MovingCar {
    /// Velocity written to the body every frame: cruise speed along the
    /// travel axis, zero on the other two so gravity never accumulates.
    pub fn commanded_velocity(self) -> Vec3 {
        self.axis.unit() * (CRUISE_SPEED * self.direction.signum())
    }
}

/// Parked car that through traffic can bump into.
#[derive(Component)]
pub struct StationaryCar;

/// Contact memory for a parked car.
///
/// `collided` goes up the moment the physics host reports a touch and comes
/// back down once the hold window lapses. A new contact re-arms the window,
/// so the flag always clears a full hold after the latest touch.
#[derive(Component, Debug)]
pub struct CollisionState {
    pub collided: bool,
    pub decay: Timer,
}

impl Default for CollisionState {
    fn default() -> Self {
        Self {
            collided: false,
            decay: Timer::from_seconds(COLLIDED_HOLD_SECS, TimerMode::Once),
        }
    }
}

/// Car geometry and paint tuning.
#[derive(Resource)]
pub struct CarConfig {
    pub body_length: f32,
    pub body_width: f32,
    pub body_height: f32,
    pub wheel_radius: f32,
    pub seed: u64,
}

impl Default for CarConfig {
    fn default() -> Self {
        Self {
            body_length: 2.8,
            body_width: 1.5,
            body_height: 1.1,
            wheel_radius: 0.3,
            seed: 24680,
        }
    }
}

// Fixed roster: two through cars per axis, spawned at the far ends of the
// arms in the lane matching their heading.
const MOVING_ROSTER: &[(TravelAxis, TravelDirection, Vec3)] = &[
    (
        TravelAxis::X,
        TravelDirection::Negative,
        Vec3::new(25.0, CAR_RIDE_HEIGHT, -1.7),
    ),
    (
        TravelAxis::X,
        TravelDirection::Positive,
        Vec3::new(-25.0, CAR_RIDE_HEIGHT, 1.5),
    ),
    (
        TravelAxis::Z,
        TravelDirection::Positive,
        Vec3::new(1.5, CAR_RIDE_HEIGHT, -25.0),
    ),
    (
        TravelAxis::Z,
        TravelDirection::Negative,
        Vec3::new(-1.5, CAR_RIDE_HEIGHT, 25.0),
    ),
];

// Parked cars sit kerbside, nosed in at their own yaw.
const PARKED_ROSTER: &[(Vec3, f32)] = &[
    (Vec3::new(-3.0, CAR_RIDE_HEIGHT, -15.0), PI),
    (Vec3::new(20.0, CAR_RIDE_HEIGHT, 3.0), FRAC_PI_2),
];

// Car paint palette shared by moving and parked cars.
const CAR_COLORS: &[(f32, f32, f32)] = &[
    (0.1, 0.1, 0.12),   // Black
    (0.9, 0.9, 0.92),   // White
    (0.6, 0.6, 0.65),   // Silver
    (0.15, 0.15, 0.2),  // Dark gray
    (0.5, 0.1, 0.1),    // Dark red
    (0.1, 0.2, 0.4),    // Dark blue
    (0.2, 0.25, 0.2),   // Dark green
    (0.4, 0.35, 0.25),  // Brown/tan
];

/// Yaw that points the car body along its travel heading.
fn heading_yaw(axis: TravelAxis, direction: TravelDirection) -> f32 {
    match (axis, direction) {
        (TravelAxis::X, TravelDirection::Positive) => 0.0,
        (TravelAxis::X, TravelDirection::Negative) => PI,
        (TravelAxis::Z, TravelDirection::Positive) => -FRAC_PI_2,
        (TravelAxis::Z, TravelDirection::Negative) => FRAC_PI_2,
    }
}

/// Physics components for a through car. Spawned already cruising.
fn moving_car_physics(car: MovingCar, config: &CarConfig) -> impl Bundle {
    (
        RigidBody::Dynamic,
        Collider::cuboid(
            config.body_length / 2.0,
            config.body_height / 2.0,
            config.body_width / 2.0,
        ),
        Velocity::linear(car.commanded_velocity()),
        LockedAxes::ROTATION_LOCKED_X | LockedAxes::ROTATION_LOCKED_Z,
        car,
    )
}

/// Physics components for a parked car. Mass is assigned here, once;
/// nothing touches it afterwards.
fn stationary_car_physics(config: &CarConfig) -> impl Bundle {
    (
        RigidBody::KinematicPositionBased,
        Collider::cuboid(
            config.body_length / 2.0,
            config.body_height / 2.0,
            config.body_width / 2.0,
        ),
        AdditionalMassProperties::Mass(STATIONARY_CAR_MASS),
        Restitution::coefficient(0.2),
        Friction::coefficient(0.1),
        ActiveEvents::COLLISION_EVENTS,
        StationaryCar,
        CollisionState::default(),
    )
}

struct CarMeshes {
    body: Handle<Mesh>,
    cabin: Handle<Mesh>,
    wheel: Handle<Mesh>,
}

/// Attach the visual body parts as children of a car entity.
fn attach_car_visuals(
    parent: &mut ChildBuilder,
    parts: &CarMeshes,
    paint: Handle<StandardMaterial>,
    glass: Handle<StandardMaterial>,
    trim: Handle<StandardMaterial>,
    config: &CarConfig,
) {
    parent.spawn((
        Mesh3d(parts.body.clone()),
        MeshMaterial3d(paint.clone()),
        Transform::from_xyz(0.0, -config.body_height * 0.2, 0.0),
    ));
    parent.spawn((
        Mesh3d(parts.cabin.clone()),
        MeshMaterial3d(glass),
        Transform::from_xyz(0.0, config.body_height * 0.3, 0.0),
    ));

    let wheel_y = -(config.body_height / 2.0 - config.wheel_radius);
    for dx in [-1.0, 1.0] {
        for dz in [-1.0, 1.0] {
            parent.spawn((
                Mesh3d(parts.wheel.clone()),
                MeshMaterial3d(trim.clone()),
                Transform::from_xyz(
                    dx * config.body_length * 0.35,
                    wheel_y,
                    dz * config.body_width * 0.45,
                )
                .with_rotation(Quat::from_rotation_x(FRAC_PI_2)),
            ));
        }
    }
}

/// Spawn the fixed car roster with physics bodies and primitive visuals.
pub fn spawn_cars(
    mut commands: Commands,
    config: Res<CarConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    assert!(
        config.body_length > 0.0 && config.body_width > 0.0 && config.body_height > 0.0,
        "car dimensions must be positive"
    );

    let mut rng = StdRng::seed_from_u64(config.seed);

    let parts = CarMeshes {
        body: meshes.add(Cuboid::new(
            config.body_length,
            config.body_height * 0.6,
            config.body_width,
        )),
        cabin: meshes.add(Cuboid::new(
            config.body_length * 0.5,
            config.body_height * 0.4,
            config.body_width * 0.9,
        )),
        wheel: meshes.add(Cylinder::new(config.wheel_radius, 0.2)),
    };

    let glass = materials.add(StandardMaterial {
        base_color: Color::srgba(0.1, 0.15, 0.2, 0.8),
        perceptual_roughness: 0.1,
        metallic: 0.3,
        ..default()
    });
    let trim = materials.add(StandardMaterial {
        base_color: Color::srgb(0.08, 0.08, 0.08),
        perceptual_roughness: 0.9,
        ..default()
    });

    let mut paint_for = |rng: &mut StdRng| {
        let (r, g, b) = CAR_COLORS[rng.gen_range(0..CAR_COLORS.len())];
        materials.add(StandardMaterial {
            base_color: Color::srgb(r, g, b),
            perceptual_roughness: 0.4,
            metallic: 0.6,
            ..default()
        })
    };

    for &(axis, direction, position) in MOVING_ROSTER {
        let car = MovingCar { axis, direction };
        let paint = paint_for(&mut rng);
        commands
            .spawn((
                moving_car_physics(car, &config),
                Transform::from_translation(position)
                    .with_rotation(Quat::from_rotation_y(heading_yaw(axis, direction))),
                Visibility::default(),
            ))
            .with_children(|parent| {
                attach_car_visuals(parent, &parts, paint, glass.clone(), trim.clone(), &config);
            });
    }

    for &(position, yaw) in PARKED_ROSTER {
        let paint = paint_for(&mut rng);
        commands
            .spawn((
                stationary_car_physics(&config),
                Transform::from_translation(position).with_rotation(Quat::from_rotation_y(yaw)),
                Visibility::default(),
            ))
            .with_children(|parent| {
                attach_car_visuals(parent, &parts, paint, glass.clone(), trim.clone(), &config);
            });
    }

    info!(
        "Spawned {} moving and {} parked cars",
        MOVING_ROSTER.len(),
        PARKED_ROSTER.len()
    );
}

/// Write the cruise command to every through car. Runs every frame and
/// overwrites whatever the solver left in the body, so a car shoved off
/// course recovers its heading on the next tick.
pub fn drive_moving_cars(mut cars: Query<(&MovingCar, &mut Velocity)>) {
    for (car, mut velocity) in cars.iter_mut() {
        velocity.linvel = car.commanded_velocity();
    }
}

/// Latch contact on parked cars when the physics host reports a new touch.
pub fn mark_collisions(
    mut events: EventReader<CollisionEvent>,
    mut parked: Query<&mut CollisionState, With<StationaryCar>>,
) {
    for event in events.read() {
        let CollisionEvent::Started(a, b, _) = event else {
            continue;
        };
        for entity in [*a, *b] {
            if let Ok(mut state) = parked.get_mut(entity) {
                if !state.collided {
                    info!("Parked car {entity} was hit");
                }
                state.collided = true;
                // Re-arm so the window runs from the latest contact.
                state.decay.reset();
            }
        }
    }
}

/// Count down contact memory and drop the flag once the window lapses.
pub fn decay_collisions(time: Res<Time>, mut parked: Query<&mut CollisionState>) {
    for mut state in parked.iter_mut() {
        if !state.collided {
            continue;
        }
        state.decay.tick(time.delta());
        if state.decay.finished() {
            state.collided = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

    struct Rig {
        world: World,
        schedule: Schedule,
    }

    impl Rig {
        fn new() -> Self {
            let mut world = World::new();
            world.init_resource::<Time>();
            world.init_resource::<Events<CollisionEvent>>();
            let mut schedule = Schedule::default();
            schedule.add_systems((mark_collisions, decay_collisions).chain());
            Rig { world, schedule }
        }

        fn spawn_parked(&mut self) -> Entity {
            self.world
                .spawn((StationaryCar, CollisionState::default()))
                .id()
        }

        fn collide(&mut self, target: Entity) {
            let other = self.world.spawn_empty().id();
            self.world.send_event(CollisionEvent::Started(
                target,
                other,
                CollisionEventFlags::empty(),
            ));
        }

        fn step(&mut self, secs: f32) {
            self.world
                .resource_mut::<Time>()
                .advance_by(Duration::from_secs_f32(secs));
            self.schedule.run(&mut self.world);
        }

        fn collided(&self, entity: Entity) -> bool {
            self.world.get::<CollisionState>(entity).unwrap().collided
        }
    }

    #[test]
    fn commanded_velocity_is_cruise_speed_along_the_axis() {
        let cases = [
            (TravelAxis::X, TravelDirection::Positive, Vec3::new(5.0, 0.0, 0.0)),
            (TravelAxis::X, TravelDirection::Negative, Vec3::new(-5.0, 0.0, 0.0)),
            (TravelAxis::Z, TravelDirection::Positive, Vec3::new(0.0, 0.0, 5.0)),
            (TravelAxis::Z, TravelDirection::Negative, Vec3::new(0.0, 0.0, -5.0)),
        ];
        for (axis, direction, expected) in cases {
            let car = MovingCar { axis, direction };
            assert_eq!(car.commanded_velocity(), expected);
        }
    }

    #[test]
    fn drive_overwrites_whatever_the_solver_left() {
        let mut world = World::new();
        let car = MovingCar {
            axis: TravelAxis::X,
            direction: TravelDirection::Negative,
        };
        let entity = world
            .spawn((car, Velocity::linear(Vec3::new(1.0, -3.0, 2.5))))
            .id();

        let mut schedule = Schedule::default();
        schedule.add_systems(drive_moving_cars);
        schedule.run(&mut world);

        let velocity = world.get::<Velocity>(entity).unwrap();
        assert_eq!(velocity.linvel, Vec3::new(-5.0, 0.0, 0.0));
    }

    #[test]
    fn parked_mass_is_assigned_once_at_creation() {
        let mut world = World::new();
        let config = CarConfig::default();
        let entity = world.spawn(stationary_car_physics(&config)).id();

        let mass = world.get::<AdditionalMassProperties>(entity).unwrap();
        assert!(matches!(
            mass,
            AdditionalMassProperties::Mass(m) if *m == STATIONARY_CAR_MASS
        ));
        // Parked cars are never driven: no marker, no velocity to command.
        assert!(world.get::<MovingCar>(entity).is_none());
        assert!(world.get::<Velocity>(entity).is_none());
    }

    #[test]
    fn contact_sets_the_flag_right_away() {
        let mut rig = Rig::new();
        let parked = rig.spawn_parked();
        assert!(!rig.collided(parked));

        rig.collide(parked);
        rig.step(0.0);
        assert!(rig.collided(parked));
    }

    #[test]
    fn flag_clears_a_full_hold_after_contact() {
        let mut rig = Rig::new();
        let parked = rig.spawn_parked();

        rig.collide(parked);
        rig.step(4.99);
        assert!(rig.collided(parked));

        rig.step(0.02);
        assert!(!rig.collided(parked));
    }

    #[test]
    fn second_contact_rearms_the_hold_window() {
        let mut rig = Rig::new();
        let parked = rig.spawn_parked();

        rig.collide(parked);
        rig.step(1.0);
        rig.collide(parked);
        rig.step(1.0);

        // 5 s after the first contact the flag must still be up, because
        // the second contact restarted the window.
        rig.step(3.9);
        assert!(rig.collided(parked));

        // 5 s after the second contact it drops.
        rig.step(0.2);
        assert!(!rig.collided(parked));
    }

    #[test]
    fn contacts_on_other_entities_are_ignored() {
        let mut rig = Rig::new();
        let parked = rig.spawn_parked();
        let bystander = rig.world.spawn_empty().id();

        rig.collide(bystander);
        rig.step(0.1);
        assert!(!rig.collided(parked));
    }

    #[test]
    fn despawn_mid_hold_leaves_nothing_ticking() {
        let mut rig = Rig::new();
        let parked = rig.spawn_parked();
        rig.collide(parked);
        rig.step(1.0);

        rig.world.despawn(parked);
        rig.step(10.0);
        let mut states = rig.world.query::<&CollisionState>();
        assert_eq!(states.iter(&rig.world).count(), 0);
    }
}
