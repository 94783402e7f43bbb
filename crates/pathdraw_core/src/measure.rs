//! Path metrics
//!
//! `PathGeometry` pairs an immutable `Path` with an arc-length table built
//! once at construction. Every query after that (total length, bounds,
//! truncation, position lookup) is answered from the table without
//! re-measuring the whole path.
//!
//! Each drawing command is measured as a `kurbo` segment. Truncation solves
//! for the curve parameter at the cut length and keeps the front subsegment,
//! so a cut cubic stays a cubic.

use kurbo::{ParamCurve, ParamCurveArclen, ParamCurveExtrema, PathSeg};

use crate::geometry::{BoundsBuilder, IntRect, Point, Rect};
use crate::path::{Path, PathCommand};
use crate::region;

/// Default arc-length accuracy, in the units of the transformed path
/// (viewport pixels once extracted)
pub const DEFAULT_ACCURACY: f32 = 1e-3;

/// Arc-length entry for one path command
#[derive(Clone, Debug)]
struct Segment {
    /// Index of the measured command in the path
    command: usize,
    /// Drawn segment; `None` for `MoveTo`
    curve: Option<PathSeg>,
    /// Arc length at which this segment begins
    start: f32,
    length: f32,
}

impl Segment {
    fn end(&self) -> f32 {
        self.start + self.length
    }

    /// Curve parameter at `local` arc length into this segment
    fn param_at(&self, curve: &PathSeg, local: f32, accuracy: f64) -> f64 {
        if self.length <= 0.0 {
            return 0.0;
        }
        curve
            .inv_arclen(f64::from(local), accuracy)
            .clamp(0.0, 1.0)
    }
}

/// An immutable path with precomputed length and bounds
#[derive(Clone, Debug)]
pub struct PathGeometry {
    path: Path,
    segments: Vec<Segment>,
    accuracy: f64,
    total_length: f32,
    tight_bounds: Rect,
    bounds: IntRect,
    stroke_width: f32,
}

impl PathGeometry {
    /// Measure a path with the default accuracy and no stroke hint
    pub fn new(path: Path) -> Self {
        Self::measure(path, DEFAULT_ACCURACY, 0.0)
    }

    /// Measure a path, recording the stroke width it will be drawn with
    pub fn with_stroke_width(path: Path, stroke_width: f32) -> Self {
        Self::measure(path, DEFAULT_ACCURACY, stroke_width)
    }

    /// Measure a path with an explicit arc-length accuracy
    pub fn measure(path: Path, accuracy: f32, stroke_width: f32) -> Self {
        let accuracy = if accuracy.is_finite() && accuracy > 0.0 {
            f64::from(accuracy)
        } else {
            f64::from(DEFAULT_ACCURACY)
        };

        let mut segments = Vec::with_capacity(path.commands().len());
        let mut outline = BoundsBuilder::new();
        let mut current = Point::ZERO;
        let mut contour_start = Point::ZERO;
        let mut total = 0.0f32;

        for (index, cmd) in path.commands().iter().enumerate() {
            let curve = match *cmd {
                PathCommand::MoveTo(p) => {
                    contour_start = p;
                    current = p;
                    outline.add(p);
                    None
                }
                PathCommand::Close => Some(PathSeg::Line(kurbo::Line::new(
                    to_kurbo(current),
                    to_kurbo(contour_start),
                ))),
                _ => to_segment(current, cmd),
            };

            let length = match &curve {
                Some(curve) => {
                    let bbox = curve.bounding_box();
                    outline.add(Point::new(bbox.x0 as f32, bbox.y0 as f32));
                    outline.add(Point::new(bbox.x1 as f32, bbox.y1 as f32));
                    current = from_kurbo(curve.end());
                    curve.arclen(accuracy) as f32
                }
                None => 0.0,
            };

            segments.push(Segment {
                command: index,
                curve,
                start: total,
                length,
            });
            total += length;
        }

        let tight_bounds = outline.build().unwrap_or(Rect::ZERO);
        let bounds = region::fill_bounds(&path, tight_bounds);

        Self {
            path,
            segments,
            accuracy,
            total_length: total,
            tight_bounds,
            bounds,
            stroke_width: stroke_width.max(0.0),
        }
    }

    /// The full, untruncated path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Arc length over every contour of the path
    pub fn total_length(&self) -> f32 {
        self.total_length
    }

    /// Check if the path has no measurable length
    pub fn is_degenerate(&self) -> bool {
        self.total_length <= 0.0
    }

    /// Integer bounds of the area the path encloses when filled
    ///
    /// Open contours are closed implicitly and pixels are sampled at their
    /// centers, so an open straight line or any other zero-area outline has
    /// empty bounds. Use `tight_bounds()` for the outline's own extent.
    pub fn bounds(&self) -> IntRect {
        self.bounds
    }

    /// Floating-point bounding box of the path outline
    pub fn tight_bounds(&self) -> Rect {
        self.tight_bounds
    }

    /// Stroke width hint recorded at extraction
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Outline bounds grown by half the stroke width, i.e. the area a stroke can touch
    pub fn stroke_bounds(&self) -> IntRect {
        if self.path.is_empty() {
            return IntRect::ZERO;
        }
        self.tight_bounds.outset(self.stroke_width / 2.0).round_out()
    }

    /// Sub-path from arc length 0 up to `length`
    ///
    /// Commands entirely before the cut are copied unchanged; the command the
    /// cut falls in is split so the result keeps the original command kinds.
    /// A length at or beyond the total returns the full path; a length of zero
    /// or less returns an empty path.
    pub fn truncate(&self, length: f32) -> Path {
        let length = if length.is_nan() { 0.0 } else { length };
        if length >= self.total_length {
            return self.path.clone();
        }
        if length <= 0.0 {
            return Path::new();
        }

        let commands = self.path.commands();
        let mut out = Path::new();

        for seg in &self.segments {
            if seg.start >= length {
                break;
            }
            if seg.end() <= length {
                out.push(commands[seg.command]);
                continue;
            }
            if let Some(curve) = &seg.curve {
                let t = seg.param_at(curve, length - seg.start, self.accuracy);
                out.push(to_command(&curve.subsegment(0.0..t)));
            }
            break;
        }

        out
    }

    /// Position at `length` along the path, clamped to the path's extent
    pub fn point_at_length(&self, length: f32) -> Option<Point> {
        let last = self.segments.last()?;
        let length = if length.is_nan() {
            0.0
        } else {
            length.clamp(0.0, self.total_length)
        };

        let idx = self.segments.partition_point(|s| s.end() < length);
        let seg = self.segments.get(idx).unwrap_or(last);

        let point = match (&seg.curve, self.path.commands()[seg.command]) {
            (Some(curve), _) => {
                let t = seg.param_at(curve, length - seg.start, self.accuracy);
                from_kurbo(curve.eval(t))
            }
            (None, PathCommand::MoveTo(p)) => p,
            (None, _) => return None,
        };
        Some(point)
    }
}

impl From<Path> for PathGeometry {
    fn from(path: Path) -> Self {
        PathGeometry::new(path)
    }
}

fn to_kurbo(p: Point) -> kurbo::Point {
    kurbo::Point::new(f64::from(p.x), f64::from(p.y))
}

fn from_kurbo(p: kurbo::Point) -> Point {
    Point::new(p.x as f32, p.y as f32)
}

/// The drawn segment of a `LineTo`, `QuadTo` or `CubicTo` starting at `from`
fn to_segment(from: Point, cmd: &PathCommand) -> Option<PathSeg> {
    let p0 = to_kurbo(from);
    match *cmd {
        PathCommand::LineTo(p) => Some(PathSeg::Line(kurbo::Line::new(p0, to_kurbo(p)))),
        PathCommand::QuadTo { control, end } => Some(PathSeg::Quad(kurbo::QuadBez::new(
            p0,
            to_kurbo(control),
            to_kurbo(end),
        ))),
        PathCommand::CubicTo {
            control1,
            control2,
            end,
        } => Some(PathSeg::Cubic(kurbo::CubicBez::new(
            p0,
            to_kurbo(control1),
            to_kurbo(control2),
            to_kurbo(end),
        ))),
        PathCommand::MoveTo(_) | PathCommand::Close => None,
    }
}

/// The command that draws `seg` from the current pen position
///
/// A cut `Close` comes back as a line, since the truncated contour is open.
fn to_command(seg: &PathSeg) -> PathCommand {
    match *seg {
        PathSeg::Line(line) => PathCommand::LineTo(from_kurbo(line.p1)),
        PathSeg::Quad(quad) => PathCommand::QuadTo {
            control: from_kurbo(quad.p1),
            end: from_kurbo(quad.p2),
        },
        PathSeg::Cubic(cubic) => PathCommand::CubicTo {
            control1: from_kurbo(cubic.p1),
            control2: from_kurbo(cubic.p2),
            end: from_kurbo(cubic.p3),
        },
    }
}
