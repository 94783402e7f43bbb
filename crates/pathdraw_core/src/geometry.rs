//! Geometry primitives
//!
//! Points, sizes, float and integer rectangles, and the 2D affine transform
//! used to map drawing coordinates into a viewport.

// ─────────────────────────────────────────────────────────────────────────────
// Points and Sizes
// ─────────────────────────────────────────────────────────────────────────────

/// 2D point
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f32 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Linear interpolation towards `other` by factor `t`
    pub fn lerp(&self, other: Point, t: f32) -> Point {
        Point::new(self.x + (other.x - self.x) * t, self.y + (other.y - self.y) * t)
    }

    /// Check if two points are within `epsilon` of each other on both axes
    pub fn approx_eq(&self, other: Point, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon && (self.y - other.y).abs() <= epsilon
    }
}

/// 2D size
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Check if either dimension is zero, negative, or not finite
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rectangles
// ─────────────────────────────────────────────────────────────────────────────

/// 2D rectangle
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        origin: Point::ZERO,
        size: Size::ZERO,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }

    /// Create a rect from min/max edges
    pub fn from_ltrb(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    pub fn x(&self) -> f32 {
        self.origin.x
    }

    pub fn y(&self) -> f32 {
        self.origin.y
    }

    pub fn width(&self) -> f32 {
        self.size.width
    }

    pub fn height(&self) -> f32 {
        self.size.height
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Grow the rect by `d` on every side
    pub fn outset(&self, d: f32) -> Self {
        Rect::from_ltrb(
            self.x() - d,
            self.y() - d,
            self.right() + d,
            self.bottom() + d,
        )
    }

    /// Smallest integer rectangle that fully contains this one
    pub fn round_out(&self) -> IntRect {
        IntRect::from_ltrb(
            self.x().floor() as i32,
            self.y().floor() as i32,
            self.right().ceil() as i32,
            self.bottom().ceil() as i32,
        )
    }
}

/// Integer rectangle stored as edges, the way a scan-converted region
/// reports its extent
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct IntRect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl IntRect {
    pub const ZERO: IntRect = IntRect {
        left: 0,
        top: 0,
        right: 0,
        bottom: 0,
    };

    pub const fn from_ltrb(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left as f32
            && point.x <= self.right as f32
            && point.y >= self.top as f32
            && point.y <= self.bottom as f32
    }
}

/// Running min/max accumulator for computing bounds from a point stream
#[derive(Clone, Copy, Debug)]
pub(crate) struct BoundsBuilder {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl BoundsBuilder {
    pub(crate) fn new() -> Self {
        Self {
            min_x: f32::INFINITY,
            min_y: f32::INFINITY,
            max_x: f32::NEG_INFINITY,
            max_y: f32::NEG_INFINITY,
        }
    }

    pub(crate) fn add(&mut self, p: Point) {
        self.min_x = self.min_x.min(p.x);
        self.min_y = self.min_y.min(p.y);
        self.max_x = self.max_x.max(p.x);
        self.max_y = self.max_y.max(p.y);
    }

    pub(crate) fn build(&self) -> Option<Rect> {
        if self.min_x.is_finite()
            && self.min_y.is_finite()
            && self.max_x.is_finite()
            && self.max_y.is_finite()
        {
            Some(Rect::from_ltrb(self.min_x, self.min_y, self.max_x, self.max_y))
        } else {
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transforms
// ─────────────────────────────────────────────────────────────────────────────

/// 2D affine transform
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2D {
    /// Matrix elements [a, b, c, d, tx, ty]
    /// | a  c  tx |
    /// | b  d  ty |
    /// | 0  0   1 |
    pub elements: [f32; 6],
}

impl Default for Affine2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine2D {
    pub const IDENTITY: Affine2D = Affine2D {
        elements: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub const fn new(a: f32, b: f32, c: f32, d: f32, tx: f32, ty: f32) -> Self {
        Self {
            elements: [a, b, c, d, tx, ty],
        }
    }

    pub fn translation(x: f32, y: f32) -> Self {
        Self {
            elements: [1.0, 0.0, 0.0, 1.0, x, y],
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            elements: [sx, 0.0, 0.0, sy, 0.0, 0.0],
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn transform_point(&self, point: Point) -> Point {
        let [a, b, c, d, tx, ty] = self.elements;
        Point::new(
            a * point.x + c * point.y + tx,
            b * point.x + d * point.y + ty,
        )
    }

    /// Concatenate this transform with another (self * other)
    /// The resulting transform first applies `other`, then `self`.
    pub fn then(&self, other: &Affine2D) -> Affine2D {
        let [a1, b1, c1, d1, tx1, ty1] = self.elements;
        let [a2, b2, c2, d2, tx2, ty2] = other.elements;

        Affine2D {
            elements: [
                a1 * a2 + c1 * b2,
                b1 * a2 + d1 * b2,
                a1 * c2 + c1 * d2,
                b1 * c2 + d1 * d2,
                a1 * tx2 + c1 * ty2 + tx1,
                b1 * tx2 + d1 * ty2 + ty1,
            ],
        }
    }

    /// Uniform scale-to-fit of `content` inside `viewport`, centered
    ///
    /// The scale is `min(vw / cw, vh / ch)` so the whole drawing is visible
    /// without cropping or stretching; the leftover space is split evenly on
    /// both sides. Points are scaled first, then translated.
    pub fn fit_centered(content: Size, viewport: Size) -> Affine2D {
        if content.is_empty() || viewport.is_empty() {
            return Affine2D::scale(0.0, 0.0);
        }

        let scale = (viewport.width / content.width).min(viewport.height / content.height);
        let dx = (viewport.width - content.width * scale) / 2.0;
        let dy = (viewport.height - content.height * scale) / 2.0;

        Affine2D::translation(dx, dy).then(&Affine2D::scale(scale, scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_out() {
        let r = Rect::new(0.5, 1.2, 10.0, 3.3);
        assert_eq!(r.round_out(), IntRect::from_ltrb(0, 1, 11, 5));
    }

    #[test]
    fn test_then_applies_other_first() {
        let t = Affine2D::translation(10.0, 0.0).then(&Affine2D::scale(2.0, 2.0));
        let p = t.transform_point(Point::new(1.0, 1.0));
        assert_eq!(p, Point::new(12.0, 2.0));
    }

    #[test]
    fn test_fit_centered_wide_viewport() {
        // 100x50 drawing into a 400x400 viewport: scale 4, vertically centered
        let t = Affine2D::fit_centered(Size::new(100.0, 50.0), Size::new(400.0, 400.0));
        assert_eq!(t.transform_point(Point::ZERO), Point::new(0.0, 100.0));
        assert_eq!(
            t.transform_point(Point::new(100.0, 50.0)),
            Point::new(400.0, 300.0)
        );
    }

    #[test]
    fn test_fit_centered_tall_viewport() {
        let t = Affine2D::fit_centered(Size::new(10.0, 10.0), Size::new(20.0, 40.0));
        assert_eq!(t.transform_point(Point::ZERO), Point::new(0.0, 10.0));
        assert_eq!(t.transform_point(Point::new(10.0, 10.0)), Point::new(20.0, 30.0));
    }

    #[test]
    fn test_fit_centered_degenerate() {
        let t = Affine2D::fit_centered(Size::new(10.0, 10.0), Size::new(0.0, 40.0));
        assert_eq!(t.transform_point(Point::new(5.0, 5.0)), Point::ZERO);
    }
}
