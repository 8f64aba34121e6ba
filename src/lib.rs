pub mod cluster;
pub mod error;
pub mod segment;

pub use cluster::{
    color_grouped_routes, density_clusters, BBox, ClassEntry, Detection, Route,
    DEFAULT_CLASS_TABLE, NOISE_LABEL, UNKNOWN_CLASS,
};
pub use error::Error;
pub use segment::{segment_colors, ColorRange, DEFAULT_COLOR_RANGES};

use std::collections::HashSet;

use log::debug;

///
/// Selects which clustering strategy runs and carries its parameters. The
/// two strategies are alternatives, not layers; they share nothing but the
/// geometry helpers and need not produce identical partitions on the same
/// input.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    /// Per-color connected components: detections are split by exact class
    /// id, then grouped under the adjacency "center distance < threshold".
    ColorGrouping {
        threshold: f32,
        min_grip_count: usize,
    },

    /// Density-based clustering over `(center_x, center_y, class_id)` with
    /// an additive penalty on cross-class pairs.
    Density {
        eps: f32,
        min_samples: usize,
        class_penalty: f32,
    },
}

pub struct RouteSortConfig {
    pub strategy: Strategy,
    /// Classes excluded up front; their detections never reach a route.
    pub ignored_class_ids: HashSet<u32>,
}

impl RouteSortConfig {
    /// Color-grouped clustering with the default minimum route size of 3.
    pub fn color_grouping(threshold: f32) -> Self {
        Self {
            strategy: Strategy::ColorGrouping {
                threshold,
                min_grip_count: 3,
            },
            ignored_class_ids: HashSet::new(),
        }
    }

    /// Density-based clustering with the default cross-class penalty of 20
    /// and a minimum neighborhood of 3.
    pub fn density(eps: f32) -> Self {
        Self {
            strategy: Strategy::Density {
                eps,
                min_samples: 3,
                class_penalty: 20.0,
            },
            ignored_class_ids: HashSet::new(),
        }
    }

    pub fn ignore_classes<I: IntoIterator<Item = u32>>(mut self, ids: I) -> Self {
        self.ignored_class_ids.extend(ids);
        self
    }
}

/// Group one image's detections into routes.
///
/// ```text
/// Parameters
/// ----------
/// detections : List[Detection]
///     The detector output for a single image. Every bounding box is
///     validated before any clustering happens.
/// config : RouteSortConfig
///     Strategy selection, its parameters and the ignored class set.
///
/// Returns
/// -------
/// List[Route]
///     The partition produced by the selected strategy. For the density
///     strategy, clusters are flattened in ascending label order and
///     noise points are absent.
/// ```
pub fn cluster_routes(
    detections: &[Detection],
    config: &RouteSortConfig,
) -> Result<Vec<Route>, Error> {
    for det in detections {
        det.bbox.validate()?;
    }

    let kept: Vec<Detection> = detections
        .iter()
        .filter(|det| !config.ignored_class_ids.contains(&det.class_id))
        .cloned()
        .collect();

    if kept.len() < detections.len() {
        debug!(
            "ignored {} of {} detections by class filter",
            detections.len() - kept.len(),
            detections.len()
        );
    }

    match config.strategy {
        Strategy::ColorGrouping {
            threshold,
            min_grip_count,
        } => color_grouped_routes(&kept, threshold, min_grip_count),

        Strategy::Density {
            eps,
            min_samples,
            class_penalty,
        } => {
            let clusters = density_clusters(&kept, eps, min_samples, class_penalty)?;

            Ok(clusters
                .into_iter()
                .map(|(_, members)| Route::new(members))
                .collect())
        }
    }
}
