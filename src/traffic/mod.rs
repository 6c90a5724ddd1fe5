//! Traffic control and vehicle actuation.

pub mod light_heads;
pub mod signal;
pub mod vehicles;

use bevy::prelude::*;

pub struct TrafficPlugin;

impl Plugin for TrafficPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<vehicles::CarConfig>()
            .init_resource::<light_heads::SignalHeadConfig>()
            .add_systems(
                Startup,
                (light_heads::spawn_signal_heads, vehicles::spawn_cars),
            )
            .add_systems(
                Update,
                (
                    signal::advance_signal_phase,
                    light_heads::sync_signal_lamps,
                    vehicles::drive_moving_cars,
                    vehicles::mark_collisions,
                    vehicles::decay_collisions,
                )
                    .chain(),
            );
    }
}
