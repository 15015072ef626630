// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Tourline and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// A point on the drawing surface, in pixels (`y` grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self { x: self.x + (other.x - self.x) * t, y: self.y + (other.y - self.y) * t }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceError {
    NonFinite,
    TooSmall { width: f64, height: f64, pad: f64 },
}

impl std::fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NonFinite => write!(f, "surface dimensions must be finite"),
            Self::TooSmall { width, height, pad } => {
                write!(f, "surface {width}x{height} leaves no room inside padding {pad}")
            }
        }
    }
}

impl std::error::Error for SurfaceError {}

/// The drawable area: `[pad, width - pad] x [pad, height - pad]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    width: f64,
    height: f64,
    pad: f64,
}

impl Default for Surface {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0, pad: 40.0 }
    }
}

impl Surface {
    pub fn new(width: f64, height: f64, pad: f64) -> Result<Self, SurfaceError> {
        if !(width.is_finite() && height.is_finite() && pad.is_finite()) {
            return Err(SurfaceError::NonFinite);
        }
        if pad < 0.0 || width - 2.0 * pad <= 0.0 || height - 2.0 * pad <= 0.0 {
            return Err(SurfaceError::TooSmall { width, height, pad });
        }
        Ok(Self { width, height, pad })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn pad(&self) -> f64 {
        self.pad
    }

    pub fn min_x(&self) -> f64 {
        self.pad
    }

    pub fn max_x(&self) -> f64 {
        self.width - self.pad
    }

    pub fn min_y(&self) -> f64 {
        self.pad
    }

    pub fn max_y(&self) -> f64 {
        self.height - self.pad
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn clamp(&self, p: Point) -> Point {
        Point::new(p.x.clamp(self.min_x(), self.max_x()), p.y.clamp(self.min_y(), self.max_y()))
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }
}

#[cfg(test)]
mod tests {
    use super::{Point, Surface, SurfaceError};

    #[test]
    fn surface_rejects_padding_that_swallows_the_canvas() {
        assert_eq!(
            Surface::new(80.0, 600.0, 40.0),
            Err(SurfaceError::TooSmall { width: 80.0, height: 600.0, pad: 40.0 })
        );
        assert_eq!(Surface::new(f64::INFINITY, 600.0, 40.0), Err(SurfaceError::NonFinite));
        assert!(Surface::new(81.0, 81.0, 40.0).is_ok());
    }

    #[test]
    fn clamp_keeps_points_inside_padding() {
        let surface = Surface::default();
        assert_eq!(surface.clamp(Point::new(-5.0, 900.0)), Point::new(40.0, 560.0));
        assert!(surface.contains(surface.clamp(Point::new(1e9, -1e9))));
    }

    #[test]
    fn lerp_hits_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, -4.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 0.5), Point::new(5.0, -2.0));
    }
}
