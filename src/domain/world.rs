//! Arena with walls and the robots living in it.

use std::sync::atomic::{AtomicU64, Ordering};

use log::{info, warn};
use thiserror::Error;

use super::{Color, DrawList, LineSegment, Point, Robot};

pub const BOUNDARY_WALL_COLOR: Color = Color::rgb(128, 0, 128);
pub const GROUND_COLOR: Color = Color::rgb(0, 128, 0);

static NEXT_WORLD_ID: AtomicU64 = AtomicU64::new(0);

/// Handle a robot keeps of the world that owns it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct WorldId(u64);

/// Index of a robot in its world's roster.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct RobotId(usize);

impl RobotId {
    pub fn index(&self) -> usize {
        self.0
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum WorldError {
    #[error("world size must be positive, got {width} x {height}")]
    InvalidSize { width: f64, height: f64 },
    #[error("robot {0:?} already belongs to a world")]
    RobotAlreadyAttached(String),
    #[error("a robot named {0:?} already exists")]
    DuplicateRobotName(String),
    #[error("wall needs at least two vertices, got {0}")]
    DegenerateWall(usize),
}

/// A colored sequence of line segments, either a single boundary edge or a closed polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Wall {
    color: Color,
    lines: Vec<LineSegment>,
}

impl Wall {
    pub fn new(color: Color, lines: Vec<LineSegment>) -> Self {
        Self { color, lines }
    }

    /// Closed polygon through `vertices`, the last vertex connecting back to the first.
    pub fn closed(color: Color, vertices: &[Point]) -> Self {
        let lines = vertices
            .iter()
            .zip(vertices.iter().cycle().skip(1))
            .map(|(p1, p2)| LineSegment::new(*p1, *p2))
            .collect();
        Self { color, lines }
    }

    /// Axis-aligned box with corners `p1` and `p2`.
    pub fn rectangle(color: Color, p1: Point, p2: Point) -> Self {
        Self::closed(
            color,
            &[
                Point::new(p1.x(), p1.y()),
                Point::new(p2.x(), p1.y()),
                Point::new(p2.x(), p2.y()),
                Point::new(p1.x(), p2.y()),
            ],
        )
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn lines(&self) -> &[LineSegment] {
        &self.lines
    }

    pub fn is_edge(&self) -> bool {
        self.lines.len() == 1
    }
}

/// What a robot can see of the world while it updates: all walls and every robot but itself.
pub struct Surroundings<'a> {
    walls: &'a [Wall],
    before: &'a [Robot],
    after: &'a [Robot],
    size: f64,
}

impl<'a> Surroundings<'a> {
    pub fn walls(&self) -> &'a [Wall] {
        self.walls
    }

    pub fn other_robots(&self) -> impl Iterator<Item = &'a Robot> {
        self.before.iter().chain(self.after.iter())
    }

    /// Larger of the world's width and height.
    pub fn size(&self) -> f64 {
        self.size
    }
}

#[derive(Debug)]
pub struct World {
    id: WorldId,
    width: f64,
    height: f64,
    time: f64,
    walls: Vec<Wall>,
    robots: Vec<Robot>,
    ground_color: Color,
}

impl World {
    /// World of the given size enclosed by four boundary edges.
    pub fn new(width: f64, height: f64) -> Result<Self, WorldError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(WorldError::InvalidSize { width, height });
        }
        let mut world = Self {
            id: WorldId(NEXT_WORLD_ID.fetch_add(1, Ordering::Relaxed)),
            width,
            height,
            time: 0.0,
            walls: vec![],
            robots: vec![],
            ground_color: GROUND_COLOR,
        };
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(0.0, height);
        let p3 = Point::new(width, height);
        let p4 = Point::new(width, 0.0);
        for (a, b) in [(p1, p2), (p2, p3), (p3, p4), (p4, p1)] {
            world.walls.push(Wall::new(
                BOUNDARY_WALL_COLOR,
                vec![LineSegment::new(a, b)],
            ));
        }
        info!("created {width} x {height} world {:?}", world.id);
        Ok(world)
    }

    /// World with one box wall per `(color, corner, opposite corner)` entry.
    pub fn with_boxes(
        width: f64,
        height: f64,
        boxes: impl IntoIterator<Item = (Color, Point, Point)>,
    ) -> Result<Self, WorldError> {
        let mut world = Self::new(width, height)?;
        for (color, p1, p2) in boxes {
            world.add_box(color, p1, p2);
        }
        Ok(world)
    }

    pub fn id(&self) -> WorldId {
        self.id
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn size(&self) -> f64 {
        self.width.max(self.height)
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    pub fn robots(&self) -> &[Robot] {
        &self.robots
    }

    pub fn robot(&self, id: RobotId) -> Option<&Robot> {
        self.robots.get(id.0)
    }

    pub fn robot_mut(&mut self, id: RobotId) -> Option<&mut Robot> {
        self.robots.get_mut(id.0)
    }

    pub fn robot_by_name(&self, name: &str) -> Option<RobotId> {
        self.robots
            .iter()
            .position(|r| r.name() == name)
            .map(RobotId)
    }

    pub fn robots_mut(&mut self) -> impl Iterator<Item = &mut Robot> {
        self.robots.iter_mut()
    }

    pub fn set_ground_color(&mut self, color: Color) {
        self.ground_color = color;
    }

    pub fn add_box(&mut self, color: Color, p1: Point, p2: Point) {
        self.walls.push(Wall::rectangle(color, p1, p2));
    }

    /// Adds a closed polygon obstacle.
    pub fn add_wall(&mut self, color: Color, vertices: &[Point]) -> Result<(), WorldError> {
        if vertices.len() < 2 {
            return Err(WorldError::DegenerateWall(vertices.len()));
        }
        self.walls.push(Wall::closed(color, vertices));
        Ok(())
    }

    pub fn add_robot(&mut self, mut robot: Robot) -> Result<RobotId, WorldError> {
        if self.robot_by_name(robot.name()).is_some() {
            return Err(WorldError::DuplicateRobotName(robot.name().to_owned()));
        }
        robot.attach(self.id)?;
        info!(
            "added robot {:?} at ({}, {}) to world {:?}",
            robot.name(),
            robot.x(),
            robot.y(),
            self.id
        );
        self.robots.push(robot);
        Ok(RobotId(self.robots.len() - 1))
    }

    /// Advances the world by one tick and returns what to draw.
    ///
    /// Robots update in roster order, each seeing the poses the robots before it committed in
    /// this tick and the poses of the robots after it from the previous tick.
    pub fn update(&mut self, time: f64) -> DrawList {
        if time < self.time {
            warn!("ignoring time going backwards from {} to {time}", self.time);
        } else {
            self.time = time;
        }

        let mut draw = self.draw();
        let size = self.size();
        for i in 0..self.robots.len() {
            let (before, rest) = self.robots.split_at_mut(i);
            let Some((robot, after)) = rest.split_first_mut() else {
                break;
            };
            let surroundings = Surroundings {
                walls: &self.walls,
                before,
                after,
                size,
            };
            draw.extend(robot.update(&surroundings));
            draw.extend(robot.draw());
        }
        draw
    }

    /// Background, walls and boundary edges.
    pub fn draw(&self) -> DrawList {
        let mut draw = DrawList::new();
        draw.clear();
        draw.no_stroke();
        draw.fill(self.ground_color);
        draw.rect(0.0, 0.0, self.width, self.height);
        for wall in self.walls.iter().filter(|w| !w.lines.is_empty()) {
            draw.no_stroke();
            draw.fill(wall.color);
            draw.polygon(wall.lines.iter().flat_map(|l| [l.p1, l.p2]));
        }
        for wall in self.walls.iter().filter(|w| w.is_edge()) {
            draw.stroke(wall.color, 3.0);
            draw.line(wall.lines[0].p1, wall.lines[0].p2);
            draw.no_stroke();
        }
        draw
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;
    use crate::domain::DrawCommand;

    #[test]
    fn test_world_has_boundary_walls() {
        let world = World::new(500.0, 250.0).unwrap();
        let edges = world
            .walls()
            .iter()
            .map(|w| {
                assert!(w.is_edge());
                assert_eq!(w.color(), BOUNDARY_WALL_COLOR);
                let line = w.lines()[0];
                format!("({}, {}) -> ({}, {})", line.p1.x(), line.p1.y(), line.p2.x(), line.p2.y())
            })
            .collect::<Vec<_>>()
            .join("\n");
        insta::assert_snapshot!(edges, @r"
        (0, 0) -> (0, 250)
        (0, 250) -> (500, 250)
        (500, 250) -> (500, 0)
        (500, 0) -> (0, 0)
        ");
    }

    #[rstest]
    #[case(0.0, 10.0)]
    #[case(10.0, 0.0)]
    #[case(-1.0, 10.0)]
    #[case(f64::NAN, 10.0)]
    fn test_world_rejects_invalid_size(#[case] width: f64, #[case] height: f64) {
        assert!(matches!(
            World::new(width, height),
            Err(WorldError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_world_box_is_closed_loop() {
        let world = World::with_boxes(
            100.0,
            100.0,
            [(
                Color::rgb(255, 255, 0),
                Point::new(10.0, 20.0),
                Point::new(30.0, 40.0),
            )],
        )
        .unwrap();
        assert_eq!(world.walls().len(), 5);
        let wall = &world.walls()[4];
        assert_eq!(
            wall.lines(),
            &[
                LineSegment::new(Point::new(10.0, 20.0), Point::new(30.0, 20.0)),
                LineSegment::new(Point::new(30.0, 20.0), Point::new(30.0, 40.0)),
                LineSegment::new(Point::new(30.0, 40.0), Point::new(10.0, 40.0)),
                LineSegment::new(Point::new(10.0, 40.0), Point::new(10.0, 20.0)),
            ]
        );
        assert_eq!(wall.lines()[0].p1, wall.lines()[3].p2);
        assert_eq!(wall.color(), Color::rgb(255, 255, 0));
    }

    #[test]
    fn test_world_add_wall() {
        let mut world = World::new(100.0, 100.0).unwrap();
        let triangle = [
            Point::new(10.0, 10.0),
            Point::new(20.0, 10.0),
            Point::new(15.0, 20.0),
        ];
        world.add_wall(Color::BLACK, &triangle).unwrap();
        assert_eq!(world.walls()[4].lines().len(), 3);
        assert_eq!(
            world.add_wall(Color::BLACK, &triangle[..1]),
            Err(WorldError::DegenerateWall(1))
        );
    }

    #[test]
    fn test_world_add_robot() {
        let mut world = World::new(100.0, 100.0).unwrap();
        let id = world.add_robot(Robot::new("a", 50.0, 50.0, 0.0)).unwrap();
        assert_eq!(id.index(), 0);
        assert_eq!(world.robot(id).unwrap().world(), Some(world.id()));
        assert_eq!(world.robot_by_name("a"), Some(id));
        assert_eq!(world.robot_by_name("b"), None);
        assert_eq!(
            world.add_robot(Robot::new("a", 20.0, 20.0, 0.0)),
            Err(WorldError::DuplicateRobotName("a".into()))
        );
    }

    #[test]
    fn test_robot_attaches_to_one_world_only() {
        let mut first = World::new(100.0, 100.0).unwrap();
        let mut second = World::new(100.0, 100.0).unwrap();
        assert_ne!(first.id(), second.id());
        let id = first.add_robot(Robot::new("a", 50.0, 50.0, 0.0)).unwrap();
        let robot = first.robot(id).unwrap().clone();
        assert_eq!(
            second.add_robot(robot),
            Err(WorldError::RobotAlreadyAttached("a".into()))
        );
    }

    #[test]
    fn test_world_time_never_decreases() {
        let mut world = World::new(100.0, 100.0).unwrap();
        world.update(0.5);
        assert_abs_diff_eq!(world.time(), 0.5);
        world.update(0.2);
        assert_abs_diff_eq!(world.time(), 0.5);
        world.update(1.0);
        assert_abs_diff_eq!(world.time(), 1.0);
    }

    #[test]
    fn test_world_draw_starts_with_background() {
        let world = World::new(100.0, 50.0).unwrap();
        let draw = world.draw();
        assert_eq!(
            &draw.commands()[..4],
            &[
                DrawCommand::Clear,
                DrawCommand::NoStroke,
                DrawCommand::Fill(GROUND_COLOR),
                DrawCommand::Rect {
                    corner: Point::new(0.0, 0.0),
                    width: 100.0,
                    height: 50.0
                },
            ]
        );
        let boundary_lines = draw
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line(..)))
            .count();
        assert_eq!(boundary_lines, 4);
    }
}
