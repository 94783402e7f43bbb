//! Vector path type
//!
//! A `Path` is a plain ordered list of drawing commands. Arcs are expected to
//! have been converted to cubic Béziers by the parser, so the command set is
//! the one every rasterizer understands natively.

use crate::geometry::{Affine2D, Point};

/// Path command for building vector paths
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathCommand {
    /// Move to a point
    MoveTo(Point),
    /// Line to a point
    LineTo(Point),
    /// Quadratic Bézier curve
    QuadTo { control: Point, end: Point },
    /// Cubic Bézier curve
    CubicTo {
        control1: Point,
        control2: Point,
        end: Point,
    },
    /// Close the current subpath
    Close,
}

impl PathCommand {
    /// The point the pen ends on, if the command moves the pen explicitly
    pub fn end_point(&self) -> Option<Point> {
        match self {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => Some(*p),
            PathCommand::QuadTo { end, .. } | PathCommand::CubicTo { end, .. } => Some(*end),
            PathCommand::Close => None,
        }
    }

    /// Apply an affine transform to every point of the command
    pub fn transform(&self, t: &Affine2D) -> PathCommand {
        match *self {
            PathCommand::MoveTo(p) => PathCommand::MoveTo(t.transform_point(p)),
            PathCommand::LineTo(p) => PathCommand::LineTo(t.transform_point(p)),
            PathCommand::QuadTo { control, end } => PathCommand::QuadTo {
                control: t.transform_point(control),
                end: t.transform_point(end),
            },
            PathCommand::CubicTo {
                control1,
                control2,
                end,
            } => PathCommand::CubicTo {
                control1: t.transform_point(control1),
                control2: t.transform_point(control2),
                end: t.transform_point(end),
            },
            PathCommand::Close => PathCommand::Close,
        }
    }
}

/// A vector path
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Path {
    commands: Vec<PathCommand>,
}

impl Path {
    /// Create a new empty path
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    /// Create a path from a vector of commands
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    /// Move to a point
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::MoveTo(Point::new(x, y)));
        self
    }

    /// Line to a point
    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::LineTo(Point::new(x, y)));
        self
    }

    /// Quadratic Bézier curve
    pub fn quad_to(mut self, cx: f32, cy: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::QuadTo {
            control: Point::new(cx, cy),
            end: Point::new(x, y),
        });
        self
    }

    /// Cubic Bézier curve
    pub fn cubic_to(mut self, cx1: f32, cy1: f32, cx2: f32, cy2: f32, x: f32, y: f32) -> Self {
        self.commands.push(PathCommand::CubicTo {
            control1: Point::new(cx1, cy1),
            control2: Point::new(cx2, cy2),
            end: Point::new(x, y),
        });
        self
    }

    /// Close the path
    pub fn close(mut self) -> Self {
        self.commands.push(PathCommand::Close);
        self
    }

    /// Create a circle path
    pub fn circle(center: Point, radius: f32) -> Self {
        // Approximate circle with 4 cubic Bézier curves
        let k = 0.5522847498;
        let r = radius;
        let cx = center.x;
        let cy = center.y;

        Self::new()
            .move_to(cx + r, cy)
            .cubic_to(cx + r, cy + r * k, cx + r * k, cy + r, cx, cy + r)
            .cubic_to(cx - r * k, cy + r, cx - r, cy + r * k, cx - r, cy)
            .cubic_to(cx - r, cy - r * k, cx - r * k, cy - r, cx, cy - r)
            .cubic_to(cx + r * k, cy - r, cx + r, cy - r * k, cx + r, cy)
            .close()
    }

    /// Create a line path
    pub fn line(from: Point, to: Point) -> Self {
        Self::new().move_to(from.x, from.y).line_to(to.x, to.y)
    }

    pub(crate) fn push(&mut self, command: PathCommand) {
        self.commands.push(command);
    }

    /// Get the path commands
    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Check if the path is empty
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Number of contours (subpaths started by a `MoveTo`)
    pub fn contour_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, PathCommand::MoveTo(_)))
            .count()
    }

    /// The point where the pen rests after the last command
    ///
    /// A trailing `Close` returns the pen to the start of its contour.
    pub fn end_point(&self) -> Option<Point> {
        let mut contour_start = None;
        let mut current = None;
        for cmd in &self.commands {
            match cmd {
                PathCommand::MoveTo(p) => {
                    contour_start = Some(*p);
                    current = Some(*p);
                }
                PathCommand::Close => current = contour_start,
                other => current = other.end_point(),
            }
        }
        current
    }

    /// Return a copy of this path with `t` applied to every point
    pub fn transformed(&self, t: &Affine2D) -> Path {
        if t.is_identity() {
            return self.clone();
        }
        Path::from_commands(self.commands.iter().map(|c| c.transform(t)).collect())
    }

    /// Convert to a tiny-skia path
    ///
    /// Returns `None` when the path has nothing to draw.
    pub fn to_tiny_skia(&self) -> Option<tiny_skia::Path> {
        let mut builder = tiny_skia::PathBuilder::new();

        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => builder.move_to(p.x, p.y),
                PathCommand::LineTo(p) => builder.line_to(p.x, p.y),
                PathCommand::QuadTo { control, end } => {
                    builder.quad_to(control.x, control.y, end.x, end.y)
                }
                PathCommand::CubicTo {
                    control1,
                    control2,
                    end,
                } => builder.cubic_to(
                    control1.x, control1.y, control2.x, control2.y, end.x, end.y,
                ),
                PathCommand::Close => builder.close(),
            }
        }

        builder.finish()
    }
}
