//! Cameras rendering a one-ray-per-column image strip.
//!
//! Every column casts one ray against the walls and the same ray against the bodies of the
//! other robots. `take_picture` turns the hit distances into bands: sky at the top, the hit
//! wall in the middle and ground at the bottom, with nearer walls filling more rows. Robots
//! are painted on top, farthest first.

use std::f64::consts::FRAC_PI_2;

use thiserror::Error;

use super::{Color, Hit, Point, Pose, Ray, Surroundings};

pub const DEFAULT_FIELD_OF_VIEW: f64 = 60.0;
pub const DEFAULT_COLUMNS: usize = 256;
pub const DEFAULT_ROWS: usize = 128;
/// Length of every camera ray.
pub const CAMERA_RANGE: f64 = 1000.0;
/// Height in rows of a robot seen at distance zero.
pub const ROBOT_BAND_HEIGHT: f64 = 30.0;

pub const SKY_COLOR: Color = Color::rgb(0, 0, 128);
pub const CAMERA_GROUND_COLOR: Color = Color::rgb(0, 128, 0);

#[derive(Error, Debug, PartialEq)]
pub enum CameraError {
    #[error("camera resolution must be non-zero, got {columns} x {rows}")]
    ZeroResolution { columns: usize, rows: usize },
    #[error("camera field of view must be within (0, 360) degrees, got {0}")]
    InvalidFieldOfView(f64),
}

/// RGBA pixel buffer, row-major with the origin at the top left.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Picture {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl Picture {
    /// Fully transparent black picture.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height * 4],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some(Color::rgba(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }

    /// Pixels outside the picture are ignored.
    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = (y * self.width + x) * 4;
        self.data[i..i + 4].copy_from_slice(&[color.red, color.green, color.blue, color.alpha]);
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub columns: usize,
    pub rows: usize,
    /// Field of view in degrees.
    pub field_of_view: f64,
    pub colors_fade_with_distance: bool,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            field_of_view: DEFAULT_FIELD_OF_VIEW,
            colors_fade_with_distance: true,
        }
    }
}

/// Ray data shared by all camera kinds.
#[derive(Clone, Debug, PartialEq)]
pub struct View {
    config: CameraConfig,
    hits: Vec<Option<Hit>>,
    robot_hits: Vec<Vec<Hit>>,
    world_size: f64,
}

impl View {
    fn new(config: CameraConfig) -> Result<Self, CameraError> {
        if config.columns == 0 || config.rows == 0 {
            return Err(CameraError::ZeroResolution {
                columns: config.columns,
                rows: config.rows,
            });
        }
        if !(config.field_of_view > 0.0 && config.field_of_view < 360.0) {
            return Err(CameraError::InvalidFieldOfView(config.field_of_view));
        }
        Ok(Self {
            hits: vec![None; config.columns],
            robot_hits: vec![vec![]; config.columns],
            config,
            world_size: 0.0,
        })
    }

    /// Angle of column `column` relative to the heading, in degrees.
    fn column_angle(&self, column: usize) -> f64 {
        column as f64 / self.config.columns as f64 * self.config.field_of_view
            - self.config.field_of_view / 2.0
    }

    fn update(&mut self, pose: Pose, surroundings: &Surroundings) {
        let origin = Point::new(pose.x, pose.y);
        let bodies = surroundings
            .other_robots()
            .map(|robot| (robot.body_in_world(), robot.color()))
            .collect::<Vec<_>>();
        self.world_size = surroundings.size();
        for column in 0..self.config.columns {
            let angle = FRAC_PI_2 - pose.direction - self.column_angle(column).to_radians();
            let ray = Ray::new(origin, angle, CAMERA_RANGE);
            self.hits[column] = ray.cast(surroundings.walls());
            self.robot_hits[column] = bodies
                .iter()
                .filter_map(|(body, color)| ray.cast_polygon(body, *color))
                .collect();
        }
    }

    /// `1` for a hit at the camera, falling linearly to `0` at the world size.
    fn shade(&self, distance: f64) -> f64 {
        (1.0 - distance / self.world_size).clamp(0.0, 1.0)
    }

    /// Robot bands behind the column's wall hit are skipped.
    fn render(&self, encode: impl Fn(Band, f64) -> Color) -> Picture {
        let columns = self.config.columns;
        let rows = self.config.rows;
        let row_count = rows as f64;
        let mut picture = Picture::new(columns, rows);

        for column in 0..columns {
            let hit = self.hits[column];
            let (horizon, hit_color) = match hit {
                Some(hit) => {
                    let s = self.shade(hit.distance);
                    (
                        (1.0 - s) * row_count / 2.0,
                        Some(encode(Band::Hit(hit.color), s)),
                    )
                }
                None => (0.0, None),
            };
            for row in 0..rows {
                let r = row as f64;
                if r < horizon / 2.0 {
                    picture.set(column, row, encode(Band::Sky, 0.0));
                } else if r < row_count - horizon / 2.0 {
                    if let Some(color) = hit_color {
                        picture.set(column, row, color);
                    }
                } else {
                    picture.set(column, row, encode(Band::Ground, 0.0));
                }
            }

            let mut robot_hits = self.robot_hits[column]
                .iter()
                .filter(|r| hit.map_or(true, |h| r.distance < h.distance))
                .collect::<Vec<_>>();
            robot_hits.sort_by(|a, b| b.distance.total_cmp(&a.distance));
            for robot_hit in robot_hits {
                let s = self.shade(robot_hit.distance);
                let color = encode(Band::Hit(robot_hit.color), s);
                let bottom = row_count - row_count / 2.0 * (1.0 - s);
                let top = bottom - ROBOT_BAND_HEIGHT * s;
                for row in 0..rows {
                    let r = row as f64;
                    if top <= r && r < bottom {
                        picture.set(column, row, color);
                    }
                }
            }
        }
        picture
    }
}

#[derive(Clone, Copy, Debug)]
enum Band {
    Sky,
    Hit(Color),
    Ground,
}

/// A color camera shades hits by distance, a depth camera encodes the shading factor itself as
/// a gray level.
#[derive(Clone, Debug, PartialEq)]
pub enum Camera {
    Color(View),
    Depth(View),
}

impl Camera {
    pub fn color(config: CameraConfig) -> Result<Self, CameraError> {
        Ok(Camera::Color(View::new(config)?))
    }

    pub fn depth(config: CameraConfig) -> Result<Self, CameraError> {
        Ok(Camera::Depth(View::new(config)?))
    }

    fn view(&self) -> &View {
        match self {
            Camera::Color(view) | Camera::Depth(view) => view,
        }
    }

    fn view_mut(&mut self) -> &mut View {
        match self {
            Camera::Color(view) | Camera::Depth(view) => view,
        }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.view().config
    }

    /// Nearest wall hit of every column.
    pub fn hits(&self) -> &[Option<Hit>] {
        &self.view().hits
    }

    /// Hits on other robots of every column, one per robot in view.
    pub fn robot_hits(&self) -> &[Vec<Hit>] {
        &self.view().robot_hits
    }

    /// Shading factor of a column's wall hit, `None` if the column sees no wall.
    pub fn shading(&self, column: usize) -> Option<f64> {
        let view = self.view();
        view.hits
            .get(column)
            .copied()
            .flatten()
            .map(|hit| view.shade(hit.distance))
    }

    pub fn update(&mut self, pose: Pose, surroundings: &Surroundings) {
        self.view_mut().update(pose, surroundings);
    }

    pub fn take_picture(&self) -> Picture {
        match self {
            Camera::Color(view) => {
                let fade = view.config.colors_fade_with_distance;
                view.render(|band, s| match band {
                    Band::Sky => SKY_COLOR,
                    Band::Ground => CAMERA_GROUND_COLOR,
                    Band::Hit(color) if fade => color.scaled(s),
                    Band::Hit(color) => color,
                })
            }
            Camera::Depth(view) => view.render(|band, s| match band {
                Band::Sky | Band::Ground => Color::BLACK,
                Band::Hit(_) => Color::gray((255.0 * s) as u8),
            }),
        }
    }
}
