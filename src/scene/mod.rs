//! Static scene composition around the junction.

pub mod buildings;
pub mod lampposts;
pub mod layout;
pub mod lighting;
pub mod roads;
pub mod trees;

use bevy::prelude::*;

pub struct ScenePlugin;

impl Plugin for ScenePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<layout::CrossroadsLayout>()
            .init_resource::<roads::RoadStyle>()
            .init_resource::<buildings::BuildingConfig>()
            .init_resource::<trees::TreeConfig>()
            .init_resource::<lampposts::LamppostConfig>()
            .add_systems(
                Startup,
                (
                    lighting::setup_lighting,
                    roads::spawn_road_network,
                    buildings::spawn_buildings,
                    trees::spawn_trees,
                    lampposts::spawn_lampposts,
                ),
            );
    }
}
