//! Points, vectors and the scene → local coordinate mapping capability.

#[cfg(test)]
#[path = "geometry_test.rs"]
mod geometry_test;

use std::ops::{Add, AddAssign, Div, Mul, Sub};

use serde::{Deserialize, Serialize};

/// A point in scene or local space. Also used as a 2D vector
/// (movement, velocity).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length when treated as a vector.
    #[must_use]
    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Component-wise absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self { x: self.x.abs(), y: self.y.abs() }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl Div<f64> for Point {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self { x: self.x / rhs, y: self.y / rhs }
    }
}

/// Coordinate transform between the scene and some component's local space.
///
/// The gesture core stores every position in scene space and converts on
/// query, so a consumer can swap the target mapping at any time.
pub trait SceneMapping {
    /// Convert a scene-space point into local coordinates.
    fn map_from_scene(&self, scene: Point) -> Point;

    /// Convert a local point into scene coordinates.
    fn map_to_scene(&self, local: Point) -> Point;
}

/// Local space equals scene space.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl SceneMapping for Identity {
    fn map_from_scene(&self, scene: Point) -> Point {
        scene
    }

    fn map_to_scene(&self, local: Point) -> Point {
        local
    }
}

/// A panned and zoomed view onto the scene.
///
/// `pan_x` / `pan_y` are the scene position of the local origin.
/// `zoom` is a scale factor (1.0 = no zoom).
#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub pan_x: f64,
    pub pan_y: f64,
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { pan_x: 0.0, pan_y: 0.0, zoom: 1.0 }
    }
}

impl SceneMapping for Viewport {
    fn map_from_scene(&self, scene: Point) -> Point {
        Point {
            x: (scene.x - self.pan_x) / self.zoom,
            y: (scene.y - self.pan_y) / self.zoom,
        }
    }

    fn map_to_scene(&self, local: Point) -> Point {
        Point {
            x: local.x * self.zoom + self.pan_x,
            y: local.y * self.zoom + self.pan_y,
        }
    }
}
