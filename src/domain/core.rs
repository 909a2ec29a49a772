//! Core domain types and operations
//!
//! This module defines pure domain types that work exclusively with
//! virtual-screen pixels and have no knowledge of Win32 structures.

/// Rectangle in virtual-screen pixel coordinates
///
/// Stored the way the shell reports rectangles: the upper-left corner and the
/// exclusive lower-right corner. Secondary monitors can have negative
/// coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    /// Creates a new rectangle from its four edges
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Creates a rectangle from an origin and a size
    pub fn from_origin_size(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self::new(left, top, left + width, top + height)
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.bottom - self.top
    }

    /// Returns true if the rectangle has a positive width and height
    pub fn is_valid(&self) -> bool {
        self.right > self.left && self.bottom > self.top
    }

    /// Returns true if this rectangle contains the given point
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }

    /// Returns the intersection of two rectangles, or None if they don't intersect
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);

        if left < right && top < bottom {
            Some(Rect::new(left, top, right, bottom))
        } else {
            None
        }
    }

    /// Returns the area of the rectangle in square pixels
    pub fn area(&self) -> i64 {
        i64::from(self.width()) * i64::from(self.height())
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {})-({}, {}) [{}x{}]",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

/// Point in virtual-screen pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Host window geometry as the window toolkit reports it
///
/// Window toolkits keep position and size with floating precision; the shell
/// only deals in whole pixels, so conversions round to the nearest pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WindowGeometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowGeometry {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whole-pixel rectangle covered by this geometry
    pub fn to_rect(&self) -> Rect {
        Rect::from_origin_size(
            self.left.round() as i32,
            self.top.round() as i32,
            self.width.round() as i32,
            self.height.round() as i32,
        )
    }
}

impl From<Rect> for WindowGeometry {
    fn from(rect: Rect) -> Self {
        Self::new(
            f64::from(rect.left),
            f64::from(rect.top),
            f64::from(rect.width()),
            f64::from(rect.height()),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_basic_properties() {
        let rect = Rect::new(10, 20, 110, 70);
        assert_eq!(rect.width(), 100);
        assert_eq!(rect.height(), 50);
        assert_eq!(rect.area(), 5000);
        assert!(rect.is_valid());
        assert_eq!(Rect::from_origin_size(10, 20, 100, 50), rect);
    }

    #[test]
    fn degenerate_rect_is_invalid() {
        assert!(!Rect::new(10, 10, 10, 20).is_valid());
        assert!(!Rect::new(10, 30, 20, 20).is_valid());
    }

    #[test]
    fn rect_contains_point() {
        let rect = Rect::new(10, 10, 30, 30);
        assert!(rect.contains_point(Point::new(15, 15)));
        assert!(rect.contains_point(Point::new(10, 10))); // Top-left corner
        assert!(!rect.contains_point(Point::new(30, 30))); // Exclusive lower-right
        assert!(!rect.contains_point(Point::new(5, 5)));
    }

    #[test]
    fn rect_intersection_with_negative_coordinates() {
        let left_monitor = Rect::new(-1920, 0, 0, 1080);
        let window = Rect::new(-100, 100, 300, 400);
        assert_eq!(
            left_monitor.intersection(&window),
            Some(Rect::new(-100, 100, 0, 400))
        );

        let right_monitor = Rect::new(0, 0, 1920, 1080);
        assert!(left_monitor.intersection(&right_monitor).is_none());
    }

    #[test]
    fn geometry_rounds_to_whole_pixels() {
        let geometry = WindowGeometry::new(10.4, 19.6, 99.5, 50.2);
        assert_eq!(geometry.to_rect(), Rect::new(10, 20, 110, 70));
        assert_eq!(
            WindowGeometry::from(Rect::new(0, 0, 1920, 216)),
            WindowGeometry::new(0.0, 0.0, 1920.0, 216.0)
        );
    }
}
