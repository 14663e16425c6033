//! Drawing commands emitted by a simulation tick.
//!
//! The engine never owns a display surface. Every update returns a [`DrawList`] that a
//! front end replays against whatever canvas it has, in order. The commands mirror a small
//! immediate mode canvas: fill and stroke state, a transform stack and a handful of shapes.

use super::{Color, Point};

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Clear,
    Fill(Color),
    NoFill,
    Stroke { color: Color, width: f64 },
    NoStroke,
    Polygon(Vec<Point>),
    Line(Point, Point),
    /// Elliptical arc centered at `center`, sweeping clockwise on screen from `start` to `stop`
    /// radians.
    Arc {
        center: Point,
        width: f64,
        height: f64,
        start: f64,
        stop: f64,
    },
    Rect {
        corner: Point,
        width: f64,
        height: f64,
    },
    Ellipse {
        center: Point,
        width: f64,
        height: f64,
    },
    PushMatrix,
    PopMatrix,
    Translate(Point),
    Rotate(f64),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn extend(&mut self, other: DrawList) {
        self.commands.extend(other.commands);
    }

    pub fn clear(&mut self) {
        self.push(DrawCommand::Clear);
    }

    pub fn fill(&mut self, color: Color) {
        self.push(DrawCommand::Fill(color));
    }

    pub fn no_fill(&mut self) {
        self.push(DrawCommand::NoFill);
    }

    pub fn stroke(&mut self, color: Color, width: f64) {
        self.push(DrawCommand::Stroke { color, width });
    }

    pub fn no_stroke(&mut self) {
        self.push(DrawCommand::NoStroke);
    }

    pub fn polygon(&mut self, vertices: impl IntoIterator<Item = Point>) {
        self.push(DrawCommand::Polygon(vertices.into_iter().collect()));
    }

    pub fn line(&mut self, p1: Point, p2: Point) {
        self.push(DrawCommand::Line(p1, p2));
    }

    pub fn arc(&mut self, center: Point, width: f64, height: f64, start: f64, stop: f64) {
        self.push(DrawCommand::Arc {
            center,
            width,
            height,
            start,
            stop,
        });
    }

    pub fn rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.push(DrawCommand::Rect {
            corner: Point::new(x, y),
            width,
            height,
        });
    }

    pub fn ellipse(&mut self, center: Point, width: f64, height: f64) {
        self.push(DrawCommand::Ellipse {
            center,
            width,
            height,
        });
    }

    pub fn push_matrix(&mut self) {
        self.push(DrawCommand::PushMatrix);
    }

    pub fn pop_matrix(&mut self) {
        self.push(DrawCommand::PopMatrix);
    }

    pub fn translate(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::Translate(Point::new(x, y)));
    }

    pub fn rotate(&mut self, angle: f64) {
        self.push(DrawCommand::Rotate(angle));
    }
}

impl IntoIterator for DrawList {
    type Item = DrawCommand;
    type IntoIter = std::vec::IntoIter<DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.into_iter()
    }
}

impl<'a> IntoIterator for &'a DrawList {
    type Item = &'a DrawCommand;
    type IntoIter = std::slice::Iter<'a, DrawCommand>;

    fn into_iter(self) -> Self::IntoIter {
        self.commands.iter()
    }
}
