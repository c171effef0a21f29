//! Planar coordinates and straight-line geometry.
//!
//! All distances in the workspace are Euclidean; there is no road network.
//! `Point` uses `f64` because route costs are sums of many legs and the
//! allocation strategies compare those sums against each other.

/// A point in the plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[inline]
    pub fn dist(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Move at most `max_step` toward `target` along the straight line.
    ///
    /// Returns the new point and `true` when `target` was reached, either
    /// because it is closer than `epsilon` or because the step would
    /// overshoot.  A reached target is returned exactly, never approximately.
    pub fn step_toward(self, target: Point, max_step: f64, epsilon: f64) -> (Point, bool) {
        let dx = target.x - self.x;
        let dy = target.y - self.y;
        let distance = dx.hypot(dy);

        if distance < epsilon || max_step >= distance {
            return (target, true);
        }
        let ratio = max_step / distance;
        (Point::new(self.x + dx * ratio, self.y + dy * ratio), false)
    }
}

impl From<(f64, f64)> for Point {
    #[inline]
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}
