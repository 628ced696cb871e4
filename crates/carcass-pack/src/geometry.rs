//! Bins, requests and placements.

use serde::{Deserialize, Serialize};

/// Tolerance for coordinate comparisons, in millimeters.
pub const EPSILON: f64 = 1e-9;

/// A rectangular stock sheet offered to the solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bin {
    /// Extent along X (mm).
    pub width: f64,
    /// Extent along Y (mm).
    pub height: f64,
}

impl Bin {
    /// Create a new bin.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Sheet area in mm².
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether a `width` x `height` rectangle fits without rotation.
    pub fn fits(&self, width: f64, height: f64) -> bool {
        width <= self.width + EPSILON && height <= self.height + EPSILON
    }
}

/// A rectangle submitted to the solver, identified by `id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackRequest {
    /// Identifier echoed back in the matching [`Placement`].
    pub id: String,
    /// Requested width (mm).
    pub width: f64,
    /// Requested height (mm).
    pub height: f64,
}

impl PackRequest {
    /// Create a request with the exact given size.
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }

    /// Create a request padded by `kerf` on both axes, leaving room for the blade.
    pub fn with_kerf(id: impl Into<String>, width: f64, height: f64, kerf: f64) -> Self {
        Self::new(id, width + kerf, height + kerf)
    }

    /// Requested area in mm².
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Where the solver put one request.
///
/// `(x, y)` is the lower-left corner in the bin's own frame. `width` and
/// `height` are the requested (padded) size in the orientation actually used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Index into the bin catalog.
    pub bin_index: usize,
    /// Lower-left X (mm).
    pub x: f64,
    /// Lower-left Y (mm).
    pub y: f64,
    /// Placed extent along X (mm).
    pub width: f64,
    /// Placed extent along Y (mm).
    pub height: f64,
    /// Request id.
    pub id: String,
    /// Whether the request was turned 90° relative to its requested size.
    #[serde(default)]
    pub rotated: bool,
}

impl Placement {
    /// X coordinate of the right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Y coordinate of the top edge.
    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// Placed area in mm².
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Whether two placements share interior area on the same bin.
    ///
    /// Touching edges do not count as overlap.
    pub fn overlaps(&self, other: &Placement) -> bool {
        if self.bin_index != other.bin_index {
            return false;
        }
        let apart = self.right() <= other.x + EPSILON
            || other.right() <= self.x + EPSILON
            || self.top() <= other.y + EPSILON
            || other.top() <= self.y + EPSILON;
        !apart
    }

    /// Whether the placement lies entirely inside `bin`.
    pub fn within(&self, bin: &Bin) -> bool {
        self.x >= -EPSILON
            && self.y >= -EPSILON
            && self.right() <= bin.width + EPSILON
            && self.top() <= bin.height + EPSILON
    }
}
