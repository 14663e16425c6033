//! Exact and tolerant 2D line segment intersection.
//!
//! `segments_intersect` answers "do these cross" for the collision test, while `segment_hit`
//! produces the crossing point for ray casting. The two intentionally disagree on edge cases:
//! collinear overlaps never intersect, and hits within `HIT_TOLERANCE` of a segment's bounding
//! box are accepted to absorb floating point error at shared corners.

use serde::{Deserialize, Serialize};

use super::Point;

/// Slack added on every side of a segment's bounding box when validating a hit.
pub const HIT_TOLERANCE: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct LineSegment {
    pub p1: Point,
    pub p2: Point,
}

impl LineSegment {
    pub const fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    pub fn intersects(&self, other: &LineSegment) -> bool {
        segments_intersect(self, other)
    }

    pub fn hit(&self, other: &LineSegment) -> Option<Point> {
        segment_hit(self, other)
    }

    fn contains_with_tolerance(&self, point: Point) -> bool {
        let low_x = self.p1.x().min(self.p2.x()) - HIT_TOLERANCE;
        let high_x = self.p1.x().max(self.p2.x()) + HIT_TOLERANCE;
        let low_y = self.p1.y().min(self.p2.y()) - HIT_TOLERANCE;
        let high_y = self.p1.y().max(self.p2.y()) + HIT_TOLERANCE;
        low_x <= point.x() && point.x() <= high_x && low_y <= point.y() && point.y() <= high_y
    }
}

/// Standard form of the line through two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Counter-clockwise predicate on the triangle `a`, `b`, `c`.
pub fn orientation(a: Point, b: Point, c: Point) -> bool {
    (c.y() - a.y()) * (b.x() - a.x()) > (b.y() - a.y()) * (c.x() - a.x())
}

/// True if segments `ab` and `cd` cross. Collinear overlapping segments are not reported.
pub fn segments_intersect(ab: &LineSegment, cd: &LineSegment) -> bool {
    let (a, b, c, d) = (ab.p1, ab.p2, cd.p1, cd.p2);
    orientation(a, c, d) != orientation(b, c, d) && orientation(a, b, c) != orientation(a, b, d)
}

/// `A = p1.y - p2.y`, `B = p2.x - p1.x`, `C = p1.x * p2.y - p2.x * p1.y`. Points on the line
/// satisfy `A x + B y = -C`.
pub fn line_coefficients(p1: Point, p2: Point) -> LineCoefficients {
    LineCoefficients {
        a: p1.y() - p2.y(),
        b: p2.x() - p1.x(),
        c: p1.x() * p2.y() - p2.x() * p1.y(),
    }
}

/// Intersection of two infinite lines by Cramer's rule. Parallel and collinear lines have no
/// solution.
pub fn intersection_point(l1: LineCoefficients, l2: LineCoefficients) -> Option<Point> {
    let d = l1.a * l2.b - l1.b * l2.a;
    if d == 0.0 {
        return None;
    }
    let (r1, r2) = (-l1.c, -l2.c);
    let dx = r1 * l2.b - l1.b * r2;
    let dy = l1.a * r2 - r1 * l2.a;
    Some(Point::new(dx / d, dy / d))
}

/// Point where segments `ab` and `cd` meet, allowing `HIT_TOLERANCE` of slack around both.
pub fn segment_hit(ab: &LineSegment, cd: &LineSegment) -> Option<Point> {
    let point = intersection_point(
        line_coefficients(ab.p1, ab.p2),
        line_coefficients(cd.p1, cd.p2),
    )?;
    (ab.contains_with_tolerance(point) && cd.contains_with_tolerance(point)).then_some(point)
}
