//! Dataset points.

use serde::{Deserialize, Serialize};

/// A single dataset record on the abstract Cartesian plane.
///
/// `value` is carried through storage but never influences rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub value: i64,
}

impl Point {
    pub fn new(x: f64, y: f64, value: i64) -> Self {
        Self { x, y, value }
    }
}

impl From<(f64, f64, i64)> for Point {
    fn from((x, y, value): (f64, f64, i64)) -> Self {
        Self { x, y, value }
    }
}
