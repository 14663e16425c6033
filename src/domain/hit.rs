//! Ray casting against wall segments and robot bodies.

use super::{geometry::segment_hit, Color, LineSegment, Point, Wall};

/// Result of a ray meeting a segment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hit {
    pub x: f64,
    pub y: f64,
    pub distance: f64,
    pub color: Color,
    pub origin_x: f64,
    pub origin_y: f64,
}

impl Hit {
    pub fn point(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.origin_x, self.origin_y)
    }
}

/// A ray of finite length, starting at `origin`.
///
/// `angle` is measured in ray space, where the end point is
/// `(origin.x + sin(angle) * length, origin.y + cos(angle) * length)`. A heading `d` in world
/// space therefore corresponds to the ray angle `PI / 2 - d`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    origin: Point,
    angle: f64,
    length: f64,
}

impl Ray {
    pub fn new(origin: Point, angle: f64, length: f64) -> Self {
        Self {
            origin,
            angle,
            length,
        }
    }

    /// Ray leaving `origin` along the world space heading `direction`.
    pub fn from_heading(origin: Point, direction: f64, length: f64) -> Self {
        Self::new(origin, std::f64::consts::FRAC_PI_2 - direction, length)
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn end(&self) -> Point {
        Point::new(
            self.angle.sin() * self.length + self.origin.x(),
            self.angle.cos() * self.length + self.origin.y(),
        )
    }

    pub fn segment(&self) -> LineSegment {
        LineSegment::new(self.origin, self.end())
    }

    /// Hit against a single segment, colored with `color`.
    pub fn hit_segment(&self, segment: &LineSegment, color: Color) -> Option<Hit> {
        let point = segment_hit(&self.segment(), segment)?;
        Some(Hit {
            x: point.x(),
            y: point.y(),
            distance: point.distance(self.origin),
            color,
            origin_x: self.origin.x(),
            origin_y: self.origin.y(),
        })
    }

    /// Nearest hit among all segments of all walls.
    pub fn cast(&self, walls: &[Wall]) -> Option<Hit> {
        nearest(walls.iter().flat_map(|wall| {
            wall.lines()
                .iter()
                .filter_map(move |line| self.hit_segment(line, wall.color()))
        }))
    }

    /// Nearest hit on the closed polygon given by `vertices`.
    pub fn cast_polygon(&self, vertices: &[Point], color: Color) -> Option<Hit> {
        let edges = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(p1, p2)| LineSegment::new(*p1, *p2));
        nearest(edges.filter_map(|edge| self.hit_segment(&edge, color)))
    }
}

/// The hit with the smallest distance. Ties keep the earliest hit.
pub fn nearest(hits: impl IntoIterator<Item = Hit>) -> Option<Hit> {
    hits.into_iter().fold(None, |minimum: Option<Hit>, hit| match minimum {
        Some(m) if m.distance <= hit.distance => Some(m),
        _ => Some(hit),
    })
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    const EPSILON: f64 = 1e-9;
    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn hit(distance: f64) -> Hit {
        Hit {
            x: 0.0,
            y: 0.0,
            distance,
            color: RED,
            origin_x: 0.0,
            origin_y: 0.0,
        }
    }

    #[rstest]
    #[case::east(0.0, Point::new(10.0, 0.0))]
    #[case::south(0.5 * PI, Point::new(0.0, 10.0))]
    #[case::west(PI, Point::new(-10.0, 0.0))]
    fn test_ray_from_heading(#[case] direction: f64, #[case] end: Point) {
        let ray = Ray::from_heading(Point::new(0.0, 0.0), direction, 10.0);
        assert_abs_diff_eq!(ray.end(), end, epsilon = EPSILON);
    }

    #[test]
    fn test_nearest() {
        assert_eq!(nearest(Vec::new()), None);
        assert_eq!(
            nearest(vec![hit(3.0), hit(1.0), hit(2.0)]).map(|h| h.distance),
            Some(1.0)
        );
    }

    #[test]
    fn test_cast_picks_nearest_wall() {
        let walls = vec![
            Wall::new(
                BLUE,
                vec![LineSegment::new(Point::new(8.0, -5.0), Point::new(8.0, 5.0))],
            ),
            Wall::new(
                RED,
                vec![LineSegment::new(Point::new(4.0, -5.0), Point::new(4.0, 5.0))],
            ),
        ];
        let ray = Ray::from_heading(Point::new(0.0, 0.0), 0.0, 20.0);
        let hit = ray.cast(&walls).unwrap();
        assert_abs_diff_eq!(hit.distance, 4.0, epsilon = EPSILON);
        assert_abs_diff_eq!(hit.point(), Point::new(4.0, 0.0), epsilon = EPSILON);
        assert_eq!(hit.color, RED);
        assert_eq!(hit.origin(), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_cast_out_of_range() {
        let walls = vec![Wall::new(
            RED,
            vec![LineSegment::new(Point::new(30.0, -5.0), Point::new(30.0, 5.0))],
        )];
        assert_eq!(
            Ray::from_heading(Point::new(0.0, 0.0), 0.0, 20.0).cast(&walls),
            None
        );
    }

    #[test]
    fn test_cast_polygon_hits_near_side() {
        let square = [
            Point::new(5.0, -1.0),
            Point::new(7.0, -1.0),
            Point::new(7.0, 1.0),
            Point::new(5.0, 1.0),
        ];
        let ray = Ray::from_heading(Point::new(0.0, 0.0), 0.0, 100.0);
        let hit = ray.cast_polygon(&square, BLUE).unwrap();
        assert_abs_diff_eq!(hit.distance, 5.0, epsilon = EPSILON);
        assert_eq!(hit.color, BLUE);
        assert_eq!(
            Ray::from_heading(Point::new(0.0, 0.0), PI, 100.0).cast_polygon(&square, BLUE),
            None
        );
    }
}
