//! Basic building blocks.

use std::ops::{Add, Sub};

use nalgebra::{Rotation2, Vector2};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn distance(&self, point: Self) -> f64 {
        ((self.x - point.x).powi(2) + (self.y - point.y).powi(2)).sqrt()
    }

    /// Rotates the point, taken as a vector from the origin, counter-clockwise by `angle` radians
    /// in the mathematical (y-up) sense.
    pub fn rotate_vector(&self, angle: f64) -> Point {
        Rotation2::new(angle)
            .transform_vector(&Vector2::new(self.x, self.y))
            .into()
    }
}

impl From<Vector2<f64>> for Point {
    fn from(value: Vector2<f64>) -> Self {
        Self::new(value.x, value.y)
    }
}

impl From<Point> for Vector2<f64> {
    fn from(value: Point) -> Self {
        Vector2::new(value.x, value.y)
    }
}

impl From<(f64, f64)> for Point {
    fn from(value: (f64, f64)) -> Self {
        Self::new(value.0, value.1)
    }
}

impl From<Point> for (f64, f64) {
    fn from(value: Point) -> Self {
        (value.x, value.y)
    }
}

impl From<Point> for (f32, f32) {
    fn from(value: Point) -> Self {
        (value.x as f32, value.y as f32)
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Point at `length` from `(x, y)` in direction `angle`.
///
/// Angles grow clockwise on a y-down screen, which makes this identical to
/// `(x + length * cos(angle), y + length * sin(angle))`. Used for sensor mounts, bounding boxes
/// and gaze directions alike.
pub fn rotate_around(x: f64, y: f64, length: f64, angle: f64) -> Point {
    Point::new(x + length * (-angle).cos(), y - length * (-angle).sin())
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "ColorSpec", into = "ColorSpec")]
pub struct Color {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn rgb(red: u8, green: u8, blue: u8) -> Self {
        Self::rgba(red, green, blue, 255)
    }

    pub const fn rgba(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    /// Scales the color channels by `factor`, keeping alpha. Channels are truncated like an
    /// integer canvas color would be.
    pub fn scaled(&self, factor: f64) -> Self {
        let scale = |channel: u8| (channel as f64 * factor).clamp(0.0, 255.0) as u8;
        Self {
            red: scale(self.red),
            green: scale(self.green),
            blue: scale(self.blue),
            alpha: self.alpha,
        }
    }
}

/// Colors are written as `[r, g, b]` or `[r, g, b, a]` in configuration files.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum ColorSpec {
    Rgb([u8; 3]),
    Rgba([u8; 4]),
}

impl From<ColorSpec> for Color {
    fn from(value: ColorSpec) -> Self {
        match value {
            ColorSpec::Rgb([r, g, b]) => Color::rgb(r, g, b),
            ColorSpec::Rgba([r, g, b, a]) => Color::rgba(r, g, b, a),
        }
    }
}

impl From<Color> for ColorSpec {
    fn from(value: Color) -> Self {
        if value.alpha == 255 {
            ColorSpec::Rgb([value.red, value.green, value.blue])
        } else {
            ColorSpec::Rgba([value.red, value.green, value.blue, value.alpha])
        }
    }
}
