use std::collections::{BTreeMap, VecDeque};

use log::debug;
use ndarray::prelude::*;

use crate::cluster::{euclidean_distance, Detection};
use crate::error::Error;

/// Sentinel label for points reachable from no core point. Never appears as
/// a key in the clustering output.
pub const NOISE_LABEL: i32 = -1;

/// Metric between two detections: Euclidean center distance, plus a flat
/// additive penalty when the classes differ. Same-class detections cluster
/// more readily than cross-class ones without forbidding cross-class merges
/// outright. Symmetric in its arguments.
#[inline]
pub fn class_aware_distance(a: &Detection, b: &Detection, class_penalty: f32) -> f32 {
    let spatial = euclidean_distance(a.center(), b.center());

    if a.class_id != b.class_id {
        spatial + class_penalty
    } else {
        spatial
    }
}

/// Compute the pair-wise class-aware metric between all detections.
///
/// ```text
/// Parameters
/// ----------
/// detections : List[Detection]
///     N detections.
/// class_penalty : float
///     Additive penalty applied to cross-class pairs.
///
/// Returns
/// -------
/// ndarray
///     A symmetric NxN matrix with zero diagonal such that element
///     (i, j) contains the metric between `detections[i]` and
///     `detections[j]`.
/// ```
pub fn pairwise_metric(detections: &[Detection], class_penalty: f32) -> Array2<f32> {
    let n = detections.len();
    let mut dist = Array2::zeros((n, n));

    for i in 0..n {
        for j in (i + 1)..n {
            let d = class_aware_distance(&detections[i], &detections[j], class_penalty);
            dist[[i, j]] = d;
            dist[[j, i]] = d;
        }
    }

    dist
}

/// Density-based clustering over `(center_x, center_y, class_id)` with the
/// class-aware metric.
///
/// ```text
/// Parameters
/// ----------
/// detections : List[Detection]
///     Detections of a single image, already filtered for ignored
///     classes by the caller.
/// eps : float
///     Neighborhood radius in metric units. Must be finite and positive.
/// min_samples : int
///     A point is a core point iff its closed eps-neighborhood,
///     counting the point itself, holds at least this many points.
///     With `min_samples = 1` every point is core. Must be at least 1.
/// class_penalty : float
///     Additive metric penalty for cross-class pairs.
///
/// Returns
/// -------
/// Map[int -> List[Detection]]
///     Cluster label to members, noise excluded. Label values follow
///     discovery order and are not meaningful; only membership is.
/// ```
pub fn density_clusters(
    detections: &[Detection],
    eps: f32,
    min_samples: usize,
    class_penalty: f32,
) -> Result<BTreeMap<i32, Vec<Detection>>, Error> {
    if !eps.is_finite() || eps <= 0.0 {
        return Err(Error::InvalidParameter("eps", eps as f64));
    }

    if min_samples == 0 {
        return Err(Error::InvalidParameter("min_samples", 0.0));
    }

    if !class_penalty.is_finite() || class_penalty < 0.0 {
        return Err(Error::InvalidParameter("class_penalty", class_penalty as f64));
    }

    for det in detections {
        det.bbox.validate()?;
    }

    let n = detections.len();
    let dist = pairwise_metric(detections, class_penalty);

    // Closed eps-neighborhoods; the zero diagonal makes every point a member
    // of its own neighborhood, which is the documented min_samples
    // convention.
    let neighborhoods: Vec<Vec<usize>> = (0..n)
        .map(|i| (0..n).filter(|&j| dist[[i, j]] <= eps).collect())
        .collect();

    let mut labels: Vec<Option<i32>> = vec![None; n];
    let mut next_label = 0i32;

    for point in 0..n {
        if labels[point].is_some() {
            continue;
        }

        if neighborhoods[point].len() < min_samples {
            labels[point] = Some(NOISE_LABEL);
            continue;
        }

        let label = next_label;
        next_label += 1;
        labels[point] = Some(label);

        let mut seeds: VecDeque<usize> = neighborhoods[point]
            .iter()
            .copied()
            .filter(|&j| j != point)
            .collect();

        while let Some(candidate) = seeds.pop_front() {
            match labels[candidate] {
                // Previously judged noise: reachable after all, absorb as a
                // border point but do not expand through it.
                Some(NOISE_LABEL) => labels[candidate] = Some(label),
                Some(_) => continue,
                None => {
                    labels[candidate] = Some(label);

                    if neighborhoods[candidate].len() >= min_samples {
                        seeds.extend(neighborhoods[candidate].iter().copied());
                    }
                }
            }
        }
    }

    let mut clusters: BTreeMap<i32, Vec<Detection>> = BTreeMap::new();

    for (idx, label) in labels.iter().enumerate() {
        match label {
            Some(NOISE_LABEL) | None => continue,
            Some(label) => clusters
                .entry(*label)
                .or_insert_with(Vec::new)
                .push(detections[idx].clone()),
        }
    }

    debug!(
        "{} detections -> {} clusters, {} noise",
        n,
        clusters.len(),
        labels.iter().filter(|l| **l == Some(NOISE_LABEL)).count()
    );

    Ok(clusters)
}
