//! Screen coordinates.

use serde::{Deserialize, Serialize};

/// A point on the device screen, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i64,
    pub y: i64,
}

impl Point {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Element bounds as reported by the automation server.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point::new(
            (self.x + self.width / 2.0).round() as i64,
            (self.y + self.height / 2.0).round() as i64,
        )
    }

    /// Key used to recognise the same on-screen row across reads.
    pub fn position_key(&self) -> String {
        format!("{},{}", self.x.round() as i64, self.y.round() as i64)
    }
}

/// Size of the device window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: i64,
    pub height: i64,
}

impl WindowSize {
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }

    /// Point at the given fractions of width and height.
    pub fn at_fraction(&self, fx: f64, fy: f64) -> Point {
        Point::new(
            (self.width as f64 * fx) as i64,
            (self.height as f64 * fy) as i64,
        )
    }

    pub fn center_x(&self) -> i64 {
        self.width / 2
    }
}

impl std::fmt::Display for WindowSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_center_rounds() {
        let r = Rect {
            x: 0.0,
            y: 100.0,
            width: 1080.0,
            height: 151.0,
        };
        assert_eq!(r.center(), Point::new(540, 176));
    }

    #[test]
    fn test_fraction_points() {
        let size = WindowSize::new(1080, 2400);
        assert_eq!(size.at_fraction(0.5, 0.8), Point::new(540, 1920));
        assert_eq!(size.at_fraction(0.5, 0.2), Point::new(540, 480));
        assert_eq!(size.to_string(), "1080x2400");
    }

    #[test]
    fn test_position_key() {
        let r = Rect {
            x: 0.4,
            y: 311.6,
            width: 10.0,
            height: 10.0,
        };
        assert_eq!(r.position_key(), "0,312");
    }
}
