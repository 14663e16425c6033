//! Collision detection between a robot's bounding box and the walls.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use super::{rotate_around, segments_intersect, LineSegment, Point, Wall};

/// Distance from a robot's center to the corners of its bounding box.
pub const BOUNDING_BOX_RADIUS: f64 = 10.0;

pub trait HasCollision {
    fn has_collision(&self, walls: &[Wall]) -> bool {
        self.bounding_box().collides_with(walls)
    }

    fn bounding_box(&self) -> BoundingBox;
}

/// Square around a pose, rotated with it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundingBox {
    corners: [Point; 4],
}

impl BoundingBox {
    pub fn around(x: f64, y: f64, direction: f64) -> Self {
        let corner = |k: f64| {
            rotate_around(
                x,
                y,
                BOUNDING_BOX_RADIUS,
                direction + FRAC_PI_4 + k * FRAC_PI_2,
            )
        };
        Self {
            corners: [corner(0.0), corner(1.0), corner(2.0), corner(3.0)],
        }
    }

    pub fn corners(&self) -> &[Point; 4] {
        &self.corners
    }

    pub fn edges(&self) -> [LineSegment; 4] {
        let [p1, p2, p3, p4] = self.corners;
        [
            LineSegment::new(p1, p2),
            LineSegment::new(p2, p3),
            LineSegment::new(p3, p4),
            LineSegment::new(p4, p1),
        ]
    }

    /// True as soon as any box edge crosses any wall segment.
    pub fn collides_with(&self, walls: &[Wall]) -> bool {
        let edges = self.edges();
        walls.iter().any(|wall| {
            wall.lines()
                .iter()
                .any(|line| edges.iter().any(|edge| segments_intersect(edge, line)))
        })
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::Color;

    const EPSILON: f64 = 1e-9;

    fn vertical_wall(x: f64) -> Wall {
        Wall::new(
            Color::BLACK,
            vec![LineSegment::new(Point::new(x, -50.0), Point::new(x, 50.0))],
        )
    }

    #[test]
    fn test_bounding_box_corners() {
        let half_side = BOUNDING_BOX_RADIUS / 2.0_f64.sqrt();
        let bounding_box = BoundingBox::around(0.0, 0.0, 0.0);
        let expected = [
            Point::new(half_side, half_side),
            Point::new(-half_side, half_side),
            Point::new(-half_side, -half_side),
            Point::new(half_side, -half_side),
        ];
        for (corner, expected) in bounding_box.corners().iter().zip(expected) {
            assert_abs_diff_eq!(*corner, expected, epsilon = EPSILON);
        }
    }

    #[rstest]
    #[case::crossing(5.0, true)]
    #[case::touching_outside(8.0, false)]
    #[case::far(20.0, false)]
    #[case::behind(-5.0, true)]
    fn test_bounding_box_collision(#[case] wall_x: f64, #[case] collision: bool) {
        let bounding_box = BoundingBox::around(0.0, 0.0, 0.0);
        assert_eq!(bounding_box.collides_with(&[vertical_wall(wall_x)]), collision);
    }

    #[test]
    fn test_bounding_box_rotation_changes_reach() {
        // The diagonal reaches the full radius, the flat side only radius / sqrt(2).
        let wall = [vertical_wall(9.0)];
        assert!(!BoundingBox::around(0.0, 0.0, 0.0).collides_with(&wall));
        assert!(BoundingBox::around(0.0, 0.0, FRAC_PI_4).collides_with(&wall));
    }

    #[test]
    fn test_wall_inside_bounding_box_is_not_detected() {
        let tiny = Wall::rectangle(Color::BLACK, Point::new(-1.0, -1.0), Point::new(1.0, 1.0));
        assert!(!BoundingBox::around(0.0, 0.0, 0.0).collides_with(&[tiny]));
    }
}
