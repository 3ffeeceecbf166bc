//! Points and rectangles in virtual-desktop coordinates.
//!
//! The virtual desktop is the bounding box of every connected display.
//! Its origin is the top-left of the primary display, so displays placed
//! left of or above the primary occupy negative coordinates.

/// A position on the virtual desktop, in logical pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Logical size and position of a rectangle on the virtual desktop.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn from_origin_size(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            left: x,
            top: y,
            right: x.saturating_add(width as i32),
            bottom: y.saturating_add(height as i32),
        }
    }

    /// Normalized rectangle spanning two arbitrary corner points.
    ///
    /// The corners may be given in any order; the result always has
    /// `left <= right` and `top <= bottom`.
    pub fn from_points(a: Point, b: Point) -> Self {
        Self {
            left: a.x.min(b.x),
            top: a.y.min(b.y),
            right: a.x.max(b.x),
            bottom: a.y.max(b.y),
        }
    }

    pub fn intersect(&self, other: Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        if left < right && top < bottom {
            Some(Rect {
                left,
                top,
                right,
                bottom,
            })
        } else {
            None
        }
    }

    pub fn union(&self, other: Rect) -> Rect {
        Rect {
            left: self.left.min(other.left),
            top: self.top.min(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn translate(&self, x: i32, y: i32) -> Rect {
        Rect {
            left: self.left + x,
            top: self.top + y,
            right: self.right + x,
            bottom: self.bottom + y,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Pixel dimensions, clamped to zero for degenerate rectangles.
    pub fn size(&self) -> (u32, u32) {
        (
            self.width().max(0) as u32,
            self.height().max(0) as u32,
        )
    }

    pub fn origin(&self) -> Point {
        Point {
            x: self.left,
            y: self.top,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left && p.x < self.right && p.y >= self.top && p.y < self.bottom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_points_normalizes_corners() {
        let a = Point::new(300, 250);
        let b = Point::new(100, 100);
        let rect = Rect::from_points(a, b);
        assert_eq!(rect, Rect::new(100, 100, 300, 250));
        assert_eq!(rect, Rect::from_points(b, a));
    }

    #[test]
    fn test_from_points_degenerate_is_empty() {
        let p = Point::new(50, 50);
        let rect = Rect::from_points(p, p);
        assert!(rect.is_empty());
        assert_eq!(rect.size(), (0, 0));
    }

    #[test]
    fn test_intersect_overlapping() {
        let a = Rect::new(-100, -100, 100, 100);
        let b = Rect::new(0, 0, 200, 200);
        assert_eq!(a.intersect(b), Some(Rect::new(0, 0, 100, 100)));
    }

    #[test]
    fn test_intersect_disjoint_is_none() {
        let a = Rect::new(0, 0, 100, 100);
        let b = Rect::new(100, 0, 200, 100);
        // Touching edges share no pixels.
        assert_eq!(a.intersect(b), None);
        let c = Rect::new(500, 500, 600, 600);
        assert_eq!(a.intersect(c), None);
    }

    #[test]
    fn test_union_spans_negative_space() {
        let a = Rect::new(-1920, 0, 0, 1080);
        let b = Rect::new(0, 0, 2560, 1440);
        assert_eq!(a.union(b), Rect::new(-1920, 0, 2560, 1440));
    }

    #[test]
    fn test_translate() {
        let rect = Rect::new(10, 20, 30, 40);
        assert_eq!(rect.translate(-10, -20), Rect::new(0, 0, 20, 20));
    }

    #[test]
    fn test_contains_is_half_open() {
        let rect = Rect::new(0, 0, 10, 10);
        assert!(rect.contains(Point::new(0, 0)));
        assert!(rect.contains(Point::new(9, 9)));
        assert!(!rect.contains(Point::new(10, 10)));
        assert!(!rect.contains(Point::new(-1, 5)));
    }
}
