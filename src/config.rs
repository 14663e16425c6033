//! Scenario files: the world, its robots and their initial commands, loaded from JSON.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    domain::{
        Camera, CameraConfig, CameraError, Color, Point, RangeSensor, Robot, RobotError,
        SensorError, World, WorldError, DEFAULT_COLUMNS, DEFAULT_FIELD_OF_VIEW, DEFAULT_ROWS,
    },
    policy::Wander,
    simulation::Simulation,
};

pub const DEFAULT_TICK_RATE: f64 = 10.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(transparent)]
    World(#[from] WorldError),
    #[error(transparent)]
    Robot(#[from] RobotError),
    #[error(transparent)]
    Sensor(#[from] SensorError),
    #[error(transparent)]
    Camera(#[from] CameraError),
    #[error("command references unknown robot {0:?}")]
    UnknownRobot(String),
    #[error("tick rate must be positive, got {0}")]
    InvalidTickRate(f64),
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid scenario: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub color: Color,
    pub p1: Point,
    pub p2: Point,
}

/// Closed polygon obstacle given by its vertices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub color: Color,
    pub points: Vec<Point>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldSpec {
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub boxes: Vec<BoxSpec>,
    #[serde(default)]
    pub walls: Vec<WallSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ground_color: Option<Color>,
}

impl WorldSpec {
    pub fn build(&self) -> Result<World, ConfigError> {
        let mut world = World::with_boxes(
            self.width,
            self.height,
            self.boxes.iter().map(|b| (b.color, b.p1, b.p2)),
        )?;
        for wall in &self.walls {
            world.add_wall(wall.color, &wall.points)?;
        }
        if let Some(color) = self.ground_color {
            world.set_ground_color(color);
        }
        Ok(world)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraKind {
    #[default]
    #[serde(rename = "camera", alias = "color")]
    Color,
    #[serde(rename = "depth")]
    Depth,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraSpec {
    #[serde(rename = "type", default)]
    pub kind: CameraKind,
    /// Columns.
    #[serde(default = "default_columns")]
    pub width: usize,
    /// Rows.
    #[serde(default = "default_rows")]
    pub height: usize,
    /// Field of view in degrees.
    #[serde(default = "default_field_of_view")]
    pub angle: f64,
    #[serde(default = "default_true")]
    pub colors_fade_with_distance: bool,
}

impl Default for CameraSpec {
    fn default() -> Self {
        Self {
            kind: CameraKind::Color,
            width: DEFAULT_COLUMNS,
            height: DEFAULT_ROWS,
            angle: DEFAULT_FIELD_OF_VIEW,
            colors_fade_with_distance: true,
        }
    }
}

impl CameraSpec {
    pub fn build(&self) -> Result<Camera, CameraError> {
        let config = CameraConfig {
            columns: self.width,
            rows: self.height,
            field_of_view: self.angle,
            colors_fade_with_distance: self.colors_fade_with_distance,
        };
        match self.kind {
            CameraKind::Color => Camera::color(config),
            CameraKind::Depth => Camera::depth(config),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RangeSensorSpec {
    pub position: f64,
    pub direction: f64,
    pub max: f64,
    #[serde(default)]
    pub width: f64,
}

impl RangeSensorSpec {
    pub fn build(&self) -> Result<RangeSensor, SensorError> {
        RangeSensor::new(self.position, self.direction, self.max, self.width)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RobotSpec {
    pub name: String,
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub direction: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    /// Chassis polygon in body coordinates; the default chassis when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Vec<Point>>,
    #[serde(default)]
    pub cameras: Vec<CameraSpec>,
    /// Replaces the two default IR sensors when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_sensors: Option<Vec<RangeSensorSpec>>,
}

impl RobotSpec {
    pub fn build(&self) -> Result<Robot, ConfigError> {
        let mut robot = Robot::new(self.name.clone(), self.x, self.y, self.direction);
        if let Some(color) = self.color {
            robot = robot.with_color(color);
        }
        if let Some(body) = &self.body {
            robot = robot.with_body(body.clone())?;
        }
        if let Some(sensors) = &self.range_sensors {
            let sensors = sensors
                .iter()
                .map(RangeSensorSpec::build)
                .collect::<Result<Vec<_>, _>>()?;
            robot = robot.with_range_sensors(sensors);
        }
        for camera in &self.cameras {
            robot = robot.with_camera(camera.build()?);
        }
        Ok(robot)
    }
}

/// Velocity given to a robot before the first tick.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub robot: String,
    #[serde(default)]
    pub vx: f64,
    #[serde(default)]
    pub vy: f64,
    #[serde(default)]
    pub va: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PolicySpec {
    Wander {
        #[serde(default = "default_cruise")]
        cruise: f64,
        #[serde(default = "default_jitter")]
        jitter: f64,
    },
}

impl PolicySpec {
    pub fn build(&self) -> Wander {
        match *self {
            PolicySpec::Wander { cruise, jitter } => Wander::new(cruise, jitter),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioSpec {
    pub world: WorldSpec,
    #[serde(default)]
    pub robots: Vec<RobotSpec>,
    #[serde(default)]
    pub commands: Vec<CommandSpec>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default = "default_tick_rate")]
    pub tick_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<PolicySpec>,
}

impl ScenarioSpec {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;
        let scenario = Self::from_json(&json)?;
        info!("loaded scenario {}", path.display());
        Ok(scenario)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// A 500 x 250 arena with four boxes and one camera robot circling to the right.
    pub fn demo() -> Self {
        let boxes = [
            (Color::BLACK, (100.0, 0.0), (110.0, 110.0)),
            (Color::rgb(255, 0, 255), (200.0, 95.0), (210.0, 170.0)),
            (Color::rgb(255, 255, 0), (300.0, 10.0), (310.0, 95.0)),
            (Color::rgb(255, 128, 0), (300.0, 190.0), (310.0, 240.0)),
        ];
        Self {
            world: WorldSpec {
                width: 500.0,
                height: 250.0,
                boxes: boxes
                    .into_iter()
                    .map(|(color, p1, p2)| BoxSpec {
                        color,
                        p1: p1.into(),
                        p2: p2.into(),
                    })
                    .collect(),
                walls: vec![],
                ground_color: None,
            },
            robots: vec![RobotSpec {
                name: "robot".to_owned(),
                x: 400.0,
                y: 50.0,
                direction: 0.0,
                color: None,
                body: None,
                cameras: vec![CameraSpec::default()],
                range_sensors: None,
            }],
            commands: vec![CommandSpec {
                robot: "robot".to_owned(),
                vx: 3.0,
                vy: 0.0,
                va: -0.05,
            }],
            seed: 0,
            tick_rate: DEFAULT_TICK_RATE,
            policy: None,
        }
    }

    pub fn build(&self) -> Result<Simulation, ConfigError> {
        if !(self.tick_rate > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate));
        }
        let mut world = self.world.build()?;
        for robot in &self.robots {
            world.add_robot(robot.build()?)?;
        }
        for command in &self.commands {
            let robot = world
                .robot_by_name(&command.robot)
                .and_then(|id| world.robot_mut(id))
                .ok_or_else(|| ConfigError::UnknownRobot(command.robot.clone()))?;
            robot.set_velocity(command.vx, command.vy, command.va);
        }
        let simulation = Simulation::new(world, self.tick_rate, self.seed);
        Ok(match &self.policy {
            Some(policy) => simulation.with_policy(Box::new(policy.build())),
            None => simulation,
        })
    }
}

fn default_columns() -> usize {
    DEFAULT_COLUMNS
}

fn default_rows() -> usize {
    DEFAULT_ROWS
}

fn default_field_of_view() -> f64 {
    DEFAULT_FIELD_OF_VIEW
}

fn default_true() -> bool {
    true
}

fn default_tick_rate() -> f64 {
    DEFAULT_TICK_RATE
}

fn default_cruise() -> f64 {
    3.0
}

fn default_jitter() -> f64 {
    0.1
}
