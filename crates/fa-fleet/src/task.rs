//! Transport requests.

use fa_core::{Point, TaskId};

/// A pickup/drop-off request.
///
/// Immutable once created: fields are private and there are no setters.
/// Tasks are cloned into agent queues and trial snapshots freely.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Task {
    id:          TaskId,
    start:       Point,
    destination: Point,
}

impl Task {
    pub fn new(id: TaskId, start: Point, destination: Point) -> Self {
        Self { id, start, destination }
    }

    #[inline]
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Pickup point.
    #[inline]
    pub fn start(&self) -> Point {
        self.start
    }

    /// Drop-off point.
    #[inline]
    pub fn destination(&self) -> Point {
        self.destination
    }

    /// Loaded distance: pickup to drop-off.
    #[inline]
    pub fn length(&self) -> f64 {
        self.start.dist(self.destination)
    }
}

impl std::fmt::Display for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} -> {}", self.id, self.start, self.destination)
    }
}
