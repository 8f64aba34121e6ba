use log::debug;

use crate::cluster::{euclidean_distance, Detection, Route};
use crate::error::Error;

/// Partition detections into routes, one color at a time.
///
/// ```text
/// Parameters
/// ----------
/// detections : List[Detection]
///     Detections of a single image, already filtered for ignored
///     classes by the caller.
/// threshold : float
///     Two detections of the same class are adjacent iff the Euclidean
///     distance between their bbox centers is strictly below this value.
///     Must be finite and positive.
/// min_grip_count : int
///     Connected components with fewer members than this are dropped
///     from the result entirely. Must be at least 1.
///
/// Returns
/// -------
/// List[Route]
///     One route per surviving connected component, members in input
///     order. Route membership is deterministic for identical input.
/// ```
pub fn color_grouped_routes(
    detections: &[Detection],
    threshold: f32,
    min_grip_count: usize,
) -> Result<Vec<Route>, Error> {
    if !threshold.is_finite() || threshold <= 0.0 {
        return Err(Error::InvalidParameter("threshold", threshold as f64));
    }

    if min_grip_count == 0 {
        return Err(Error::InvalidParameter("min_grip_count", 0.0));
    }

    for det in detections {
        det.bbox.validate()?;
    }

    let centers: Vec<(f32, f32)> = detections.iter().map(|d| d.center()).collect();

    // Group detection indices by exact class id, groups ordered by first
    // appearance so the output is stable across runs.
    let mut groups: Vec<(u32, Vec<usize>)> = Vec::new();
    for (idx, det) in detections.iter().enumerate() {
        match groups.iter_mut().find(|(class_id, _)| *class_id == det.class_id) {
            Some((_, members)) => members.push(idx),
            None => groups.push((det.class_id, vec![idx])),
        }
    }

    let mut routes = Vec::new();

    for (class_id, members) in &groups {
        let components = connected_components(members, &centers, threshold);

        debug!(
            "class {}: {} detections, {} components",
            class_id,
            members.len(),
            components.len()
        );

        for component in components {
            if component.len() < min_grip_count {
                continue;
            }

            routes.push(Route::new(
                component.iter().map(|&i| detections[i].clone()).collect(),
            ));
        }
    }

    debug!(
        "{} detections over {} classes -> {} routes",
        detections.len(),
        groups.len(),
        routes.len()
    );

    Ok(routes)
}

/// Connected components of one class group under the adjacency relation
/// "center distance < threshold".
///
/// The adjacency is built on the fly with an O(n²) neighbor scan inside an
/// explicit-stack traversal; n is tens to low hundreds per image, so no
/// spatial index is warranted.
fn connected_components(
    members: &[usize],
    centers: &[(f32, f32)],
    threshold: f32,
) -> Vec<Vec<usize>> {
    let mut visited = vec![false; members.len()];
    let mut components = Vec::new();

    for start in 0..members.len() {
        if visited[start] {
            continue;
        }

        visited[start] = true;

        let mut stack = vec![start];
        let mut component = vec![members[start]];

        while let Some(current) = stack.pop() {
            for candidate in 0..members.len() {
                if visited[candidate] {
                    continue;
                }

                let dist = euclidean_distance(
                    centers[members[current]],
                    centers[members[candidate]],
                );

                if dist < threshold {
                    visited[candidate] = true;
                    stack.push(candidate);
                    component.push(members[candidate]);
                }
            }
        }

        components.push(component);
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::BBox;

    fn det_at(class_id: u32, cx: f32, cy: f32) -> Detection {
        Detection::new(
            class_id,
            0.8,
            BBox::new(cx - 5.0, cy - 5.0, cx + 5.0, cy + 5.0).unwrap(),
        )
    }

    #[test]
    fn empty_input_yields_empty_result() {
        let routes = color_grouped_routes(&[], 50.0, 3).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn distant_singleton_is_dropped() {
        let dets = vec![
            det_at(5, 0.0, 0.0),
            det_at(5, 10.0, 0.0),
            det_at(5, 1000.0, 1000.0),
        ];

        let routes = color_grouped_routes(&dets, 50.0, 2).unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].members(), &dets[..2]);
    }

    #[test]
    fn large_threshold_merges_everything() {
        let dets = vec![
            det_at(5, 0.0, 0.0),
            det_at(5, 10.0, 0.0),
            det_at(5, 1000.0, 1000.0),
        ];

        let routes = color_grouped_routes(&dets, 2000.0, 2).unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].len(), 3);
    }

    #[test]
    fn classes_never_mix() {
        // Two classes sitting on top of each other; each group is evaluated
        // on its own, so neither reaches min_grip_count = 2.
        let dets = vec![det_at(1, 0.0, 0.0), det_at(2, 0.5, 0.5)];

        let routes = color_grouped_routes(&dets, 50.0, 2).unwrap();
        assert!(routes.is_empty());

        let routes = color_grouped_routes(&dets, 50.0, 1).unwrap();
        assert_eq!(routes.len(), 2);
        assert!(routes.iter().all(|r| r.len() == 1));
    }

    #[test]
    fn adjacency_is_transitive_through_chains() {
        // 0 -- 40 -- 80: ends are 80 apart but linked through the middle.
        let dets = vec![
            det_at(3, 0.0, 0.0),
            det_at(3, 40.0, 0.0),
            det_at(3, 80.0, 0.0),
        ];

        let routes = color_grouped_routes(&dets, 50.0, 3).unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].len(), 3);
    }

    #[test]
    fn threshold_is_strictly_exclusive() {
        let dets = vec![det_at(0, 0.0, 0.0), det_at(0, 10.0, 0.0)];

        // Exactly at the threshold: not adjacent.
        assert!(color_grouped_routes(&dets, 10.0, 2).unwrap().is_empty());
        assert_eq!(color_grouped_routes(&dets, 10.001, 2).unwrap().len(), 1);
    }

    #[test]
    fn non_positive_threshold_is_rejected() {
        let dets = vec![det_at(0, 0.0, 0.0)];

        assert!(matches!(
            color_grouped_routes(&dets, 0.0, 1),
            Err(Error::InvalidParameter("threshold", _))
        ));
        assert!(matches!(
            color_grouped_routes(&dets, -5.0, 1),
            Err(Error::InvalidParameter("threshold", _))
        ));
        assert!(matches!(
            color_grouped_routes(&dets, f32::NAN, 1),
            Err(Error::InvalidParameter("threshold", _))
        ));
    }

    #[test]
    fn zero_min_grip_count_is_rejected() {
        assert!(matches!(
            color_grouped_routes(&[], 50.0, 0),
            Err(Error::InvalidParameter("min_grip_count", _))
        ));
    }
}
