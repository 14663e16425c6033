//! Wheeled robot driven by body-frame velocities, with range sensors and cameras.

use std::f64::consts::{FRAC_PI_2, PI};

use log::debug;
use thiserror::Error;

use super::{
    BoundingBox, Camera, Color, DrawList, HasCollision, Point, RangeSensor, Surroundings, Wall,
    WorldError, WorldId,
};

/// Chassis outline in body coordinates (CM), front facing positive x.
pub const DEFAULT_BODY: [(f64, f64); 20] = [
    (4.17, 5.0),
    (4.17, 6.67),
    (5.83, 5.83),
    (5.83, 5.0),
    (7.5, 5.0),
    (7.5, -5.0),
    (5.83, -5.0),
    (5.83, -5.83),
    (4.17, -6.67),
    (4.17, -5.0),
    (-4.17, -5.0),
    (-4.17, -6.67),
    (-5.83, -5.83),
    (-6.67, -5.0),
    (-7.5, -4.17),
    (-7.5, 4.17),
    (-6.67, 5.0),
    (-5.83, 5.83),
    (-4.17, 6.67),
    (-4.17, 5.0),
];

pub const DEFAULT_COLOR: Color = Color::rgb(255, 0, 0);
const STALLED_COLOR: Color = Color::rgb(128, 128, 128);
const DETAIL_COLOR: Color = Color::rgb(0, 64, 0);
const SENSOR_ARC_COLOR: Color = Color::rgba(128, 0, 128, 64);
const DEBUG_HIT_COLOR: Color = Color::rgb(0, 255, 0);
/// Half angle of the arc drawn for a single-ray sensor.
const SENSOR_ARC_HALF_ANGLE: f64 = 0.5;

#[derive(Error, Debug, PartialEq)]
pub enum RobotError {
    #[error("robot body needs at least three vertices, got {0}")]
    DegenerateBody(usize),
}

/// Position and heading. Headings are radians, clockwise on a y-down screen, and never wrapped.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub x: f64,
    pub y: f64,
    pub direction: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Robot {
    name: String,
    x: f64,
    y: f64,
    direction: f64,
    vx: f64,
    vy: f64,
    va: f64,
    stalled: bool,
    debug: bool,
    color: Color,
    body: Vec<Point>,
    range_sensors: Vec<RangeSensor>,
    cameras: Vec<Camera>,
    bounding_box: BoundingBox,
    world: Option<WorldId>,
}

impl Robot {
    /// Robot with the default chassis and two forward IR sensors, left and right of center.
    pub fn new(name: impl Into<String>, x: f64, y: f64, direction: f64) -> Self {
        let ir_sensors = [PI / 8.0, -PI / 8.0]
            .into_iter()
            .filter_map(|direction| RangeSensor::new(8.3, direction, 20.0, 0.0).ok())
            .collect();
        Self {
            name: name.into(),
            x,
            y,
            direction,
            vx: 0.0,
            vy: 0.0,
            va: 0.0,
            stalled: false,
            debug: false,
            color: DEFAULT_COLOR,
            body: DEFAULT_BODY.iter().map(|p| Point::from(*p)).collect(),
            range_sensors: ir_sensors,
            cameras: vec![],
            bounding_box: BoundingBox::around(x, y, direction),
            world: None,
        }
    }

    pub fn with_color(self, color: Color) -> Self {
        Self { color, ..self }
    }

    pub fn with_body(self, body: Vec<Point>) -> Result<Self, RobotError> {
        if body.len() < 3 {
            return Err(RobotError::DegenerateBody(body.len()));
        }
        Ok(Self { body, ..self })
    }

    /// Replaces the default IR sensors.
    pub fn with_range_sensors(self, range_sensors: Vec<RangeSensor>) -> Self {
        Self {
            range_sensors,
            ..self
        }
    }

    pub fn with_camera(mut self, camera: Camera) -> Self {
        self.cameras.push(camera);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn pose(&self) -> Pose {
        Pose {
            x: self.x,
            y: self.y,
            direction: self.direction,
        }
    }

    pub fn velocity(&self) -> (f64, f64, f64) {
        (self.vx, self.vy, self.va)
    }

    pub fn stalled(&self) -> bool {
        self.stalled
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn body(&self) -> &[Point] {
        &self.body
    }

    pub fn range_sensors(&self) -> &[RangeSensor] {
        &self.range_sensors
    }

    pub fn cameras(&self) -> &[Camera] {
        &self.cameras
    }

    pub fn world(&self) -> Option<WorldId> {
        self.world
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    /// Reading of range sensor `index`, 1.0 meaning nothing in range.
    pub fn ir(&self, index: usize) -> Option<f64> {
        self.range_sensors.get(index).map(RangeSensor::reading)
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn set_pose(&mut self, pose: Pose) {
        self.x = pose.x;
        self.y = pose.y;
        self.direction = pose.direction;
    }

    /// Forward, sideways (positive to the left) and turn velocity per tick. A positive turn
    /// velocity decreases the heading.
    pub fn set_velocity(&mut self, vx: f64, vy: f64, va: f64) {
        self.vx = vx;
        self.vy = vy;
        self.va = va;
    }

    pub fn forward(&mut self, vx: f64) {
        self.vx = vx;
    }

    pub fn backward(&mut self, vx: f64) {
        self.vx = -vx;
    }

    pub fn turn(&mut self, va: f64) {
        self.va = va;
    }

    pub fn stop(&mut self) {
        self.set_velocity(0.0, 0.0, 0.0);
    }

    pub(super) fn attach(&mut self, world: WorldId) -> Result<(), WorldError> {
        if self.world.is_some() {
            return Err(WorldError::RobotAlreadyAttached(self.name.clone()));
        }
        self.world = Some(world);
        Ok(())
    }

    /// Body polygon at the current pose.
    pub fn body_in_world(&self) -> Vec<Point> {
        let center = Point::new(self.x, self.y);
        self.body
            .iter()
            .map(|p| center + p.rotate_vector(self.direction))
            .collect()
    }

    /// Pose the robot would reach this tick if nothing is in the way.
    pub fn tentative_pose(&self) -> Pose {
        let angle = -self.direction + FRAC_PI_2;
        let tvx = self.vx * angle.sin() + self.vy * angle.cos();
        let tvy = self.vx * angle.cos() - self.vy * angle.sin();
        Pose {
            x: self.x + tvx,
            y: self.y + tvy,
            direction: self.direction - self.va,
        }
    }

    /// Moves unless the bounding box at the tentative pose crosses a wall. A rejected move
    /// leaves the pose untouched and sets `stalled`.
    pub fn move_within(&mut self, walls: &[Wall]) {
        let tentative = self.tentative_pose();
        self.bounding_box = BoundingBox::around(tentative.x, tentative.y, tentative.direction);
        if tentative == self.pose() {
            self.stalled = false;
            return;
        }
        self.stalled = self.has_collision(walls);
        if self.stalled {
            debug!(
                "robot {:?} stalled at ({:.2}, {:.2})",
                self.name, self.x, self.y
            );
        } else {
            self.set_pose(tentative);
        }
    }

    /// Motion, then sensors, then cameras, all measured from the committed pose.
    pub fn update(&mut self, surroundings: &Surroundings) -> DrawList {
        self.move_within(surroundings.walls());
        let pose = self.pose();
        let mut draw = DrawList::new();
        for sensor in &mut self.range_sensors {
            let hits = sensor.update(pose, surroundings.walls());
            if self.debug {
                let mount = sensor.mount(pose);
                draw.fill(DEBUG_HIT_COLOR);
                for hit in hits {
                    draw.ellipse(mount, 5.0, 5.0);
                    draw.ellipse(hit.point(), 5.0, 5.0);
                }
            }
        }
        for camera in &mut self.cameras {
            camera.update(pose, surroundings);
        }
        draw
    }

    pub fn draw(&self) -> DrawList {
        let mut draw = DrawList::new();
        if self.debug {
            draw.stroke(Color::WHITE, 1.0);
            for edge in self.bounding_box.edges() {
                draw.line(edge.p1, edge.p2);
            }
        }
        draw.push_matrix();
        draw.translate(self.x, self.y);
        draw.rotate(self.direction);
        if self.stalled {
            draw.fill(STALLED_COLOR);
            draw.stroke(Color::WHITE, 1.0);
        } else {
            draw.fill(self.color);
            draw.no_stroke();
        }
        draw.polygon(self.body.iter().copied());
        draw.no_stroke();
        // Wheels
        draw.fill(Color::BLACK);
        draw.rect(-3.33, -7.67, 6.33, 1.67);
        draw.rect(-3.33, 6.0, 6.33, 1.67);
        // Hole
        draw.fill(DETAIL_COLOR);
        draw.ellipse(Point::new(0.0, 0.0), 1.67, 1.67);
        // Fluke
        draw.rect(5.0, -3.33, 1.33, 6.33);
        draw.pop_matrix();

        let pose = self.pose();
        for sensor in &self.range_sensors {
            if sensor.reading() < 1.0 {
                draw.stroke(Color::WHITE, 1.0);
            } else {
                draw.stroke(Color::BLACK, 1.0);
            }
            draw.fill(SENSOR_ARC_COLOR);
            let half_angle = if sensor.width() > 0.0 {
                sensor.width() / 2.0
            } else {
                SENSOR_ARC_HALF_ANGLE
            };
            let boresight = sensor.boresight(pose);
            draw.arc(
                sensor.mount(pose),
                sensor.distance(),
                sensor.distance(),
                boresight - half_angle,
                boresight + half_angle,
            );
        }
        draw
    }
}

/// The box checked on the last move, at the tentative pose.
impl HasCollision for Robot {
    fn bounding_box(&self) -> BoundingBox {
        self.bounding_box
    }
}
