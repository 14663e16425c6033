//! Range sensor casting a narrow cone of rays from a mount on the robot.

use std::f64::consts::FRAC_PI_2;

use thiserror::Error;

use super::{rotate_around, Hit, Point, Pose, Ray, Wall};

#[derive(Error, Debug, PartialEq)]
pub enum SensorError {
    #[error("range sensor max range must be positive, got {0}")]
    NonPositiveMax(f64),
    #[error("range sensor cone width must not be negative, got {0}")]
    NegativeWidth(f64),
}

/// Reads 1.0 when nothing is in range, otherwise `distance / max`.
#[derive(Clone, Debug, PartialEq)]
pub struct RangeSensor {
    position: f64,
    direction: f64,
    max: f64,
    width: f64,
    distance: f64,
    reading: f64,
}

impl RangeSensor {
    /// `position` is the radial offset of the mount from the robot center, `direction` the
    /// angle offset of both the mount and the boresight, `width` the full cone width in radians.
    pub fn new(position: f64, direction: f64, max: f64, width: f64) -> Result<Self, SensorError> {
        if !(max > 0.0) {
            return Err(SensorError::NonPositiveMax(max));
        }
        if width < 0.0 {
            return Err(SensorError::NegativeWidth(width));
        }
        Ok(Self {
            position,
            direction,
            max,
            width,
            distance: max,
            reading: 1.0,
        })
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn direction(&self) -> f64 {
        self.direction
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn reading(&self) -> f64 {
        self.reading
    }

    pub fn set_distance(&mut self, distance: f64) {
        self.distance = distance;
        self.reading = distance / self.max;
    }

    pub fn set_reading(&mut self, reading: f64) {
        self.reading = reading;
        self.distance = reading * self.max;
    }

    /// World position of the mount for a robot at `pose`.
    pub fn mount(&self, pose: Pose) -> Point {
        rotate_around(
            pose.x,
            pose.y,
            self.position,
            pose.direction + self.direction,
        )
    }

    /// World heading of the boresight for a robot at `pose`.
    pub fn boresight(&self, pose: Pose) -> f64 {
        pose.direction + self.direction
    }

    /// Angle offsets of the sampled rays around the boresight.
    ///
    /// The cone is quantized: a zero width casts one ray, any other width casts three, at the
    /// edges and the center, regardless of how wide the cone is.
    pub fn sample_offsets(&self) -> Vec<f64> {
        if self.width == 0.0 {
            return vec![0.0];
        }
        let step = self.width / 2.0;
        let mut offsets = vec![];
        let mut offset = -step;
        while offset <= step {
            offsets.push(offset);
            offset += step;
        }
        offsets
    }

    /// Re-measures from scratch and returns the hits that tightened the reading.
    pub fn update(&mut self, pose: Pose, walls: &[Wall]) -> Vec<Hit> {
        let mount = self.mount(pose);
        let gaze = FRAC_PI_2 - self.boresight(pose);
        self.set_reading(1.0);
        let mut closer = vec![];
        for offset in self.sample_offsets() {
            let Some(hit) = Ray::new(mount, gaze + offset, self.max).cast(walls) else {
                continue;
            };
            if hit.distance < self.distance {
                self.set_distance(hit.distance);
                closer.push(hit);
            }
        }
        closer
    }
}
