//! The domain module encapsulates the simulation itself. It defines the `World` and `Robot`
//! entities, the sensors robots carry, and the geometry governing their interactions.
//!
//! Nothing in here depends on a renderer: drawing is expressed as a `DrawList` that any
//! frontend can replay.

mod basis;
mod camera;
mod collision;
mod draw;
mod geometry;
mod hit;
mod robot;
mod sensor;
mod world;

pub use basis::{rotate_around, Color, Point};
pub use camera::{
    Camera, CameraConfig, CameraError, Picture, View, CAMERA_GROUND_COLOR, CAMERA_RANGE,
    DEFAULT_COLUMNS, DEFAULT_FIELD_OF_VIEW, DEFAULT_ROWS, ROBOT_BAND_HEIGHT, SKY_COLOR,
};
pub use collision::{BoundingBox, HasCollision, BOUNDING_BOX_RADIUS};
pub use draw::{DrawCommand, DrawList};
pub use geometry::{
    intersection_point, line_coefficients, orientation, segment_hit, segments_intersect,
    LineCoefficients, LineSegment, HIT_TOLERANCE,
};
pub use hit::{nearest, Hit, Ray};
pub use robot::{Pose, Robot, RobotError, DEFAULT_BODY, DEFAULT_COLOR};
pub use sensor::{RangeSensor, SensorError};
pub use world::{
    RobotId, Surroundings, Wall, World, WorldError, WorldId, BOUNDARY_WALL_COLOR, GROUND_COLOR,
};
