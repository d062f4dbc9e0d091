//! Boundary traits for the physics collaborators.
//!
//! The controller never integrates positions itself. It hands a displacement
//! to a [`CharacterBody`] (which resolves collisions and owns the transform)
//! and asks a [`WorldQuery`] for raycasts.

use ascent_common::LayerMask;
use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Collision-resolving body driven by the controller.
pub trait CharacterBody {
    /// Moves the body by `displacement`, resolving collisions.
    fn move_by(&mut self, displacement: Vec3);

    /// Whether the body rests on a supporting surface after its last move.
    fn is_grounded(&self) -> bool;

    /// Current world position.
    fn position(&self) -> Vec3;

    /// Current orientation. The body faces its local +Z axis.
    fn rotation(&self) -> Quat;

    /// Replaces the orientation.
    fn set_rotation(&mut self, rotation: Quat);

    /// Unit vector the body is facing.
    fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::Z
    }
}

/// Result of a successful raycast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RayHit {
    /// World-space hit point
    pub point: Vec3,
    /// Distance along the ray
    pub distance: f32,
    /// Surface normal at the hit point
    pub normal: Vec3,
}

/// Read-only world queries.
pub trait WorldQuery {
    /// Casts a ray and returns the nearest hit on any of `layers`.
    ///
    /// `direction` is expected to be normalized; hits farther than
    /// `max_distance` are ignored.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit>;
}

/// One-sided wall plane for simple test and demo worlds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallPlane {
    /// Any point on the plane
    pub point: Vec3,
    /// Normal pointing out of the solid side
    pub normal: Vec3,
    /// Layers the wall belongs to
    pub layers: LayerMask,
    /// Height above which the wall no longer exists
    pub top: f32,
}

impl WallPlane {
    /// Creates an unbounded wall.
    #[must_use]
    pub fn new(point: Vec3, normal: Vec3, layers: LayerMask) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
            layers,
            top: f32::INFINITY,
        }
    }

    /// Limits the wall to points at or below `top`.
    #[must_use]
    pub fn with_top(mut self, top: f32) -> Self {
        self.top = top;
        self
    }

    /// Intersects a ray with the front face of the plane.
    #[must_use]
    pub fn intersect(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let denom = direction.dot(self.normal);
        // Back faces and grazing rays never hit.
        if denom >= -f32::EPSILON {
            return None;
        }

        let distance = (self.point - origin).dot(self.normal) / denom;
        if distance < 0.0 {
            return None;
        }

        let point = origin + direction * distance;
        if point.y > self.top {
            return None;
        }

        Some(RayHit {
            point,
            distance,
            normal: self.normal,
        })
    }
}

/// World made of wall planes.
#[derive(Debug, Clone, Default)]
pub struct PlaneWorld {
    /// Walls in the world
    walls: Vec<WallPlane>,
}

impl PlaneWorld {
    /// Creates an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a wall.
    pub fn add_wall(&mut self, wall: WallPlane) {
        self.walls.push(wall);
    }

    /// Adds a wall (builder pattern).
    #[must_use]
    pub fn with_wall(mut self, wall: WallPlane) -> Self {
        self.add_wall(wall);
        self
    }

    /// Returns the walls.
    #[must_use]
    pub fn walls(&self) -> &[WallPlane] {
        &self.walls
    }
}

impl WorldQuery for PlaneWorld {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f32,
        layers: LayerMask,
    ) -> Option<RayHit> {
        self.walls
            .iter()
            .filter(|wall| wall.layers.intersects(layers))
            .filter_map(|wall| wall.intersect(origin, direction))
            .filter(|hit| hit.distance <= max_distance)
            .min_by(|a, b| a.distance.total_cmp(&b.distance))
    }
}

/// Mock body for testing.
///
/// Applies displacements without collision and reports whatever grounded
/// flag the test sets.
#[derive(Debug, Clone)]
pub struct MockBody {
    /// Current position
    pub position: Vec3,
    /// Current orientation
    pub rotation: Quat,
    /// Grounded flag returned by `is_grounded`
    pub grounded: bool,
    /// Every displacement received, in order
    pub moves: Vec<Vec3>,
}

impl Default for MockBody {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBody {
    /// Creates a grounded body at the origin facing +Z.
    #[must_use]
    pub fn new() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            grounded: true,
            moves: Vec::new(),
        }
    }

    /// Creates an airborne body.
    #[must_use]
    pub fn airborne() -> Self {
        Self {
            grounded: false,
            ..Self::new()
        }
    }

    /// Last displacement received.
    #[must_use]
    pub fn last_move(&self) -> Option<Vec3> {
        self.moves.last().copied()
    }
}

impl CharacterBody for MockBody {
    fn move_by(&mut self, displacement: Vec3) {
        self.position += displacement;
        self.moves.push(displacement);
    }

    fn is_grounded(&self) -> bool {
        self.grounded
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn rotation(&self) -> Quat {
        self.rotation
    }

    fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_ahead(distance: f32) -> WallPlane {
        WallPlane::new(
            Vec3::new(0.0, 0.0, distance),
            Vec3::NEG_Z,
            LayerMask::layer(3),
        )
    }

    #[test]
    fn test_ray_hits_front_face() {
        let hit = wall_ahead(2.0)
            .intersect(Vec3::ZERO, Vec3::Z)
            .expect("wall should be hit");
        assert!((hit.distance - 2.0).abs() < 1e-5);
        assert!((hit.point - Vec3::new(0.0, 0.0, 2.0)).length() < 1e-5);
    }

    #[test]
    fn test_ray_ignores_back_face() {
        let wall = wall_ahead(-2.0);
        assert!(wall.intersect(Vec3::ZERO, Vec3::Z).is_none());
        assert!(wall.intersect(Vec3::ZERO, Vec3::NEG_Z).is_none());
    }

    #[test]
    fn test_ray_above_top_misses() {
        let wall = wall_ahead(1.0).with_top(2.0);
        assert!(wall.intersect(Vec3::new(0.0, 1.0, 0.0), Vec3::Z).is_some());
        assert!(wall.intersect(Vec3::new(0.0, 2.5, 0.0), Vec3::Z).is_none());
    }

    #[test]
    fn test_world_filters_layers_and_range() {
        let world = PlaneWorld::new().with_wall(wall_ahead(0.9));

        assert!(world
            .raycast(Vec3::ZERO, Vec3::Z, 1.0, LayerMask::layer(3))
            .is_some());
        assert!(world
            .raycast(Vec3::ZERO, Vec3::Z, 1.0, LayerMask::layer(4))
            .is_none());
        assert!(world
            .raycast(Vec3::ZERO, Vec3::Z, 0.5, LayerMask::layer(3))
            .is_none());
    }

    #[test]
    fn test_world_returns_nearest_hit() {
        let world = PlaneWorld::new()
            .with_wall(wall_ahead(3.0))
            .with_wall(wall_ahead(1.5));

        let hit = world
            .raycast(Vec3::ZERO, Vec3::Z, 10.0, LayerMask::ALL)
            .expect("a wall should be hit");
        assert!((hit.distance - 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_mock_body_records_moves() {
        let mut body = MockBody::new();
        body.move_by(Vec3::new(1.0, 0.0, 0.0));
        body.move_by(Vec3::new(0.0, 0.0, 2.0));

        assert_eq!(body.position(), Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(body.moves.len(), 2);
        assert_eq!(body.last_move(), Some(Vec3::new(0.0, 0.0, 2.0)));
        assert!((body.forward() - Vec3::Z).length() < 1e-6);
    }
}
