pub mod color_group;
pub mod density;
pub mod detection;
pub mod route;

pub use color_group::color_grouped_routes;
pub use density::{class_aware_distance, density_clusters, pairwise_metric, NOISE_LABEL};
pub use detection::{Detection, ClassEntry, DEFAULT_CLASS_TABLE, UNKNOWN_CLASS};
pub use route::Route;

use serde::{Deserialize, Serialize};

use crate::error::Error;

///
/// Axis-aligned bounding box in corner format `(x1, y1, x2, y2)`,
/// image pixel coordinates. `x1 < x2` and `y1 < y2` always hold for a
/// validated box.
///
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox([f32; 4]);

impl BBox {
    /// Build a box from its corners, rejecting degenerate or non-finite
    /// coordinates.
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Result<Self, Error> {
        let bbox = BBox([x1, y1, x2, y2]);
        bbox.validate()?;
        Ok(bbox)
    }

    /// Re-check the corner invariants. Needed for boxes that arrived through
    /// deserialization and therefore bypassed `new`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.0.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidDetection(format!(
                "non-finite bbox coordinates {:?}",
                self.0
            )));
        }

        if self.x1() >= self.x2() || self.y1() >= self.y2() {
            return Err(Error::InvalidDetection(format!(
                "degenerate bbox ({}, {}, {}, {})",
                self.x1(),
                self.y1(),
                self.x2(),
                self.y2()
            )));
        }

        Ok(())
    }

    #[inline(always)]
    pub fn x1(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn y1(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn x2(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn y2(&self) -> f32 {
        self.0[3]
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2() - self.x1()
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2() - self.y1()
    }

    /// Midpoint of the rectangle.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (
            (self.x1() + self.x2()) / 2.0,
            (self.y1() + self.y2()) / 2.0,
        )
    }

    /// Smallest box covering both `self` and `other`.
    #[inline]
    pub fn merge(&self, other: &BBox) -> BBox {
        BBox([
            self.x1().min(other.x1()),
            self.y1().min(other.y1()),
            self.x2().max(other.x2()),
            self.y2().max(other.y2()),
        ])
    }
}

/// Euclidean distance between two points.
#[inline]
pub fn euclidean_distance(p: (f32, f32), q: (f32, f32)) -> f32 {
    let (dx, dy) = (p.0 - q.0, p.1 - q.1);
    (dx * dx + dy * dy).sqrt()
}
