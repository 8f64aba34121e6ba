use serde::{Deserialize, Serialize};

use crate::cluster::BBox;

/// Name written for a `class_id` that is not covered by the class table.
pub const UNKNOWN_CLASS: &str = "unknown";

///
/// One entry of the class palette: the human-readable hold color name and
/// the RGB color used by downstream annotation.
///
/// The palette is plain data. Extending it to more classes means appending
/// entries, not touching any clustering code.
///
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassEntry {
    pub name: &'static str,
    pub color: [u8; 3],
}

/// The detector's training palette, indexed by `class_id`.
pub const DEFAULT_CLASS_TABLE: &[ClassEntry] = &[
    ClassEntry { name: "black", color: [0, 0, 0] },
    ClassEntry { name: "blue", color: [0, 0, 255] },
    ClassEntry { name: "grey", color: [128, 128, 128] },
    ClassEntry { name: "orange", color: [255, 165, 0] },
    ClassEntry { name: "purple", color: [128, 0, 128] },
    ClassEntry { name: "red", color: [255, 0, 0] },
    ClassEntry { name: "turquoise", color: [0, 255, 255] },
    ClassEntry { name: "white", color: [255, 255, 255] },
    ClassEntry { name: "wood", color: [139, 69, 19] },
    ClassEntry { name: "yellow", color: [255, 255, 0] },
];

///
/// This class represents a bounding box detection in a single image.
/// Parameters
///
/// bbox : BBox in corner format `(x1, y1, x2, y2)`.
/// class_id : u32 - Discrete color/material category assigned by the detector.
/// confidence : f32 - Detector confidence score, carried through untouched.
///
/// Serializes to the upstream record shape
/// `{"class": id, "confidence": c, "bbox": [x1, y1, x2, y2]}`.
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(rename = "class")]
    pub class_id: u32,
    pub confidence: f32,
    pub bbox: BBox,
}

impl Detection {
    pub fn new(class_id: u32, confidence: f32, bbox: BBox) -> Self {
        Self {
            class_id,
            confidence,
            bbox,
        }
    }

    /// Midpoint of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        self.bbox.center()
    }

    /// Resolve the human-readable class name against `table`. Ids past the
    /// end of the table resolve to `"unknown"` - a defined fallback, not an
    /// error; clustering stays keyed on the raw `class_id`.
    #[inline]
    pub fn class_name(&self, table: &[ClassEntry]) -> &'static str {
        table
            .get(self.class_id as usize)
            .map(|entry| entry.name)
            .unwrap_or(UNKNOWN_CLASS)
    }
}
