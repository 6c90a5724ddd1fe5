//! Crossroads layout graph.
//!
//! One junction node with four arm-end nodes hanging off it. Decoration
//! systems walk the arms instead of hardcoding per-axis extents, and the
//! signal spawner looks for the node where both roads meet.

use bevy::prelude::*;
use petgraph::graph::UnGraph;
use smallvec::{smallvec, SmallVec};

use crate::traffic::vehicles::TravelAxis;

/// How far each arm runs from the junction center.
pub const X_ARM_REACH: f32 = 45.0;
pub const Z_ARM_REACH: f32 = 50.0;

/// Half-width of the paved roadway on both axes.
pub const ROAD_HALF_WIDTH: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutNodeKind {
    Junction,
    ArmEnd,
}

/// A node in the layout graph: the junction or the open end of one arm.
#[derive(Clone, Debug)]
pub struct LayoutNode {
    pub position: Vec2,
    pub kind: LayoutNodeKind,
}

/// One arm of the crossroads, from the junction out to the map edge.
#[derive(Clone, Debug)]
pub struct RoadArm {
    pub axis: TravelAxis,
    pub points: SmallVec<[Vec2; 4]>,
    pub length: f32,
    pub half_width: f32,
}

impl RoadArm {
    /// Unit direction from the junction toward the arm end.
    pub fn direction(&self) -> Vec2 {
        match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => (*b - *a).normalize_or_zero(),
            _ => Vec2::X,
        }
    }

    /// Planar position at distance `d` out from the junction.
    pub fn point_at(&self, d: f32) -> Vec2 {
        let start = self.points.first().copied().unwrap_or(Vec2::ZERO);
        start + self.direction() * d
    }

    /// Unit lateral direction, perpendicular to travel.
    pub fn lateral(&self) -> Vec2 {
        self.direction().perp()
    }
}

/// The two crossing roads as a graph.
#[derive(Resource)]
pub struct CrossroadsLayout {
    pub graph: UnGraph<LayoutNode, RoadArm>,
}

impl Default for CrossroadsLayout {
    fn default() -> Self {
        let mut graph = UnGraph::new_undirected();
        let junction = graph.add_node(LayoutNode {
            position: Vec2::ZERO,
            kind: LayoutNodeKind::Junction,
        });

        let ends = [
            (TravelAxis::X, Vec2::new(X_ARM_REACH, 0.0)),
            (TravelAxis::X, Vec2::new(-X_ARM_REACH, 0.0)),
            (TravelAxis::Z, Vec2::new(0.0, Z_ARM_REACH)),
            (TravelAxis::Z, Vec2::new(0.0, -Z_ARM_REACH)),
        ];
        for (axis, end) in ends {
            let node = graph.add_node(LayoutNode {
                position: end,
                kind: LayoutNodeKind::ArmEnd,
            });
            graph.add_edge(
                junction,
                node,
                RoadArm {
                    axis,
                    points: smallvec![Vec2::ZERO, end],
                    length: end.length(),
                    half_width: ROAD_HALF_WIDTH,
                },
            );
        }

        Self { graph }
    }
}

impl CrossroadsLayout {
    /// Position of the junction node, if the graph has one.
    pub fn junction(&self) -> Option<Vec2> {
        self.graph
            .node_weights()
            .find(|node| node.kind == LayoutNodeKind::Junction)
            .map(|node| node.position)
    }

    /// Iterate the arms in insertion order.
    pub fn arms(&self) -> impl Iterator<Item = &RoadArm> {
        self.graph.edge_weights()
    }

    /// Full paved span of one axis, end to end.
    pub fn road_span(&self, axis: TravelAxis) -> f32 {
        self.arms()
            .filter(|arm| arm.axis == axis)
            .map(|arm| arm.length)
            .sum()
    }

    pub fn road_half_width(&self, axis: TravelAxis) -> f32 {
        self.arms()
            .find(|arm| arm.axis == axis)
            .map(|arm| arm.half_width)
            .unwrap_or(ROAD_HALF_WIDTH)
    }

    /// Planar sign pair for each of the four grass quadrants.
    pub fn quadrant_signs() -> [Vec2; 4] {
        [
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, -1.0),
            Vec2::new(-1.0, 1.0),
            Vec2::new(-1.0, -1.0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_has_one_junction_and_four_arms() {
        let layout = CrossroadsLayout::default();
        assert_eq!(layout.graph.node_count(), 5);
        assert_eq!(layout.graph.edge_count(), 4);

        let junctions: Vec<_> = layout
            .graph
            .node_indices()
            .filter(|&idx| layout.graph.neighbors(idx).count() >= 3)
            .collect();
        assert_eq!(junctions.len(), 1);
        assert_eq!(layout.junction(), Some(Vec2::ZERO));
    }

    #[test]
    fn road_spans_cover_both_arms_of_each_axis() {
        let layout = CrossroadsLayout::default();
        assert_eq!(layout.road_span(TravelAxis::X), 2.0 * X_ARM_REACH);
        assert_eq!(layout.road_span(TravelAxis::Z), 2.0 * Z_ARM_REACH);
        assert_eq!(layout.road_half_width(TravelAxis::X), ROAD_HALF_WIDTH);
    }

    #[test]
    fn arm_walk_runs_junction_to_end() {
        let layout = CrossroadsLayout::default();
        for arm in layout.arms() {
            assert_eq!(arm.point_at(0.0), Vec2::ZERO);
            let end = arm.point_at(arm.length);
            assert!((end.length() - arm.length).abs() < 1e-4);
            // Lateral offset stays perpendicular to travel.
            assert!(arm.direction().dot(arm.lateral()).abs() < 1e-6);
        }
    }
}
