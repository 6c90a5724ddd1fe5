//! Signal phase control for the junction.
//!
//! One controller entity owns the shared cycle timer. The two road axes never
//! carry independent light state: every reachable combination is enumerated as
//! a joint phase, so a state with both axes green cannot even be expressed.

use bevy::prelude::*;

use crate::traffic::vehicles::TravelAxis;

/// Seconds between phase transitions. Both axes switch on the same boundary.
pub const CYCLE_PERIOD_SECS: f32 = 8.0;

/// Indication shown by one group of signal heads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignalPhase {
    Red,
    Yellow,
    Green,
}

/// Joint state of the whole junction.
///
/// `Startup` is the power-on seed: the X-axis heads are still dark (traffic
/// must treat them as red) while Z already shows green. The first cycle tick
/// leaves it for good; after that the three running states repeat forever.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IntersectionPhase {
    #[default]
    Startup,
    XRedZYellow,
    XGreenZRed,
    XYellowZGreen,
}

impl IntersectionPhase {
    /// Next joint state. After leaving `Startup` the cycle has period three.
    pub fn advance(self) -> Self {
        match self {
            Self::Startup => Self::XRedZYellow,
            Self::XRedZYellow => Self::XGreenZRed,
            Self::XGreenZRed => Self::XYellowZGreen,
            Self::XYellowZGreen => Self::XRedZYellow,
        }
    }

    /// Indication for one axis.
    pub fn phase_for(self, axis: TravelAxis) -> SignalPhase {
        match (self, axis) {
            (Self::Startup, TravelAxis::X) => SignalPhase::Red,
            (Self::Startup, TravelAxis::Z) => SignalPhase::Green,
            (Self::XRedZYellow, TravelAxis::X) => SignalPhase::Red,
            (Self::XRedZYellow, TravelAxis::Z) => SignalPhase::Yellow,
            (Self::XGreenZRed, TravelAxis::X) => SignalPhase::Green,
            (Self::XGreenZRed, TravelAxis::Z) => SignalPhase::Red,
            (Self::XYellowZGreen, TravelAxis::X) => SignalPhase::Yellow,
            (Self::XYellowZGreen, TravelAxis::Z) => SignalPhase::Green,
        }
    }

    /// True while the X heads have not yet shown their first indication.
    pub fn x_heads_dark(self) -> bool {
        matches!(self, Self::Startup)
    }
}

/// Controller for the signalized junction.
/// One controller per junction owns the phase and the cycle timer.
#[derive(Component)]
pub struct SignalController {
    pub phase: IntersectionPhase,
    pub cycle: Timer,
}

impl SignalController {
    pub fn new() -> Self {
        Self {
            phase: IntersectionPhase::default(),
            cycle: Timer::from_seconds(CYCLE_PERIOD_SECS, TimerMode::Repeating),
        }
    }
}

impl Default for SignalController {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance controllers whose cycle timer elapsed this frame.
pub fn advance_signal_phase(time: Res<Time>, mut controllers: Query<&mut SignalController>) {
    for mut controller in controllers.iter_mut() {
        controller.cycle.tick(time.delta());

        // A stalled frame can span several periods; step once per period so
        // the phase stays locked to wall-clock boundaries.
        for _ in 0..controller.cycle.times_finished_this_tick() {
            controller.phase = controller.phase.advance();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::traffic::vehicles::TravelAxis;

    fn make_world() -> (World, Schedule) {
        let mut world = World::new();
        world.init_resource::<Time>();
        let mut schedule = Schedule::default();
        schedule.add_systems(advance_signal_phase);
        (world, schedule)
    }

    fn step(world: &mut World, schedule: &mut Schedule, secs: f32) {
        world
            .resource_mut::<Time>()
            .advance_by(Duration::from_secs_f32(secs));
        schedule.run(world);
    }

    #[test]
    fn startup_reads_red_x_green_z() {
        let phase = IntersectionPhase::default();
        assert_eq!(phase, IntersectionPhase::Startup);
        assert_eq!(phase.phase_for(TravelAxis::X), SignalPhase::Red);
        assert_eq!(phase.phase_for(TravelAxis::Z), SignalPhase::Green);
        assert!(phase.x_heads_dark());
    }

    #[test]
    fn per_axis_sequences_match_the_posted_cycle() {
        let mut phase = IntersectionPhase::default();
        let mut x_seen = Vec::new();
        let mut z_seen = Vec::new();
        for _ in 0..7 {
            phase = phase.advance();
            x_seen.push(phase.phase_for(TravelAxis::X));
            z_seen.push(phase.phase_for(TravelAxis::Z));
        }
        use SignalPhase::*;
        assert_eq!(x_seen, vec![Red, Green, Yellow, Red, Green, Yellow, Red]);
        assert_eq!(z_seen, vec![Yellow, Red, Green, Yellow, Red, Green, Yellow]);
    }

    #[test]
    fn axes_are_never_both_green() {
        let mut phase = IntersectionPhase::default();
        for _ in 0..16 {
            let both_green = phase.phase_for(TravelAxis::X) == SignalPhase::Green
                && phase.phase_for(TravelAxis::Z) == SignalPhase::Green;
            assert!(!both_green, "both axes green in {:?}", phase);
            phase = phase.advance();
        }
    }

    #[test]
    fn cycle_has_period_three_after_startup() {
        let first = IntersectionPhase::Startup.advance();
        assert_eq!(first.advance().advance().advance(), first);
        // Startup is never re-entered.
        let mut phase = first;
        for _ in 0..9 {
            phase = phase.advance();
            assert_ne!(phase, IntersectionPhase::Startup);
        }
    }

    #[test]
    fn heads_light_up_only_after_the_first_tick() {
        assert!(IntersectionPhase::Startup.x_heads_dark());
        let mut phase = IntersectionPhase::Startup;
        for _ in 0..4 {
            phase = phase.advance();
            assert!(!phase.x_heads_dark());
        }
    }

    #[test]
    fn controller_holds_until_the_period_boundary() {
        let (mut world, mut schedule) = make_world();
        let entity = world.spawn(SignalController::new()).id();

        step(&mut world, &mut schedule, 7.9);
        let controller = world.get::<SignalController>(entity).unwrap();
        assert_eq!(controller.phase, IntersectionPhase::Startup);

        step(&mut world, &mut schedule, 0.2);
        let controller = world.get::<SignalController>(entity).unwrap();
        assert_eq!(controller.phase, IntersectionPhase::XRedZYellow);
    }

    #[test]
    fn stalled_frame_advances_once_per_elapsed_period() {
        let (mut world, mut schedule) = make_world();
        let entity = world.spawn(SignalController::new()).id();

        // 24.5 s in one frame spans three full periods.
        step(&mut world, &mut schedule, 24.5);
        let controller = world.get::<SignalController>(entity).unwrap();
        assert_eq!(controller.phase, IntersectionPhase::XYellowZGreen);
    }

    #[test]
    fn despawned_controller_leaves_nothing_ticking() {
        let (mut world, mut schedule) = make_world();
        let entity = world.spawn(SignalController::new()).id();
        step(&mut world, &mut schedule, 9.0);

        world.despawn(entity);
        step(&mut world, &mut schedule, 9.0);
        let mut controllers = world.query::<&SignalController>();
        assert_eq!(controllers.iter(&world).count(), 0);
    }
}
