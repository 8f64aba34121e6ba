use std::collections::HashSet;

use route_sort::{
    cluster_routes, BBox, Detection, Route, RouteSortConfig, Strategy,
};

fn det_at(class_id: u32, cx: f32, cy: f32) -> Detection {
    Detection::new(
        class_id,
        0.8,
        BBox::new(cx - 5.0, cy - 5.0, cx + 5.0, cy + 5.0).unwrap(),
    )
}

/// A small wall: two vertical lines of blue holds, a diagonal of yellow
/// holds, one stray red hold.
fn wall() -> Vec<Detection> {
    vec![
        det_at(1, 100.0, 50.0),
        det_at(1, 105.0, 100.0),
        det_at(1, 98.0, 150.0),
        det_at(1, 102.0, 200.0),
        det_at(1, 400.0, 60.0),
        det_at(1, 405.0, 110.0),
        det_at(1, 395.0, 160.0),
        det_at(9, 200.0, 80.0),
        det_at(9, 240.0, 120.0),
        det_at(9, 280.0, 160.0),
        det_at(5, 600.0, 600.0),
    ]
}

fn contains(route: &Route, det: &Detection) -> bool {
    route.members().iter().any(|m| m == det)
}

#[test]
fn color_grouping_partitions_the_wall() {
    let config = RouteSortConfig::color_grouping(80.0);
    let routes = cluster_routes(&wall(), &config).unwrap();

    // Two blue lines and the yellow diagonal; the stray red is a singleton
    // below min_grip_count.
    assert_eq!(routes.len(), 3);

    let sizes: Vec<usize> = routes.iter().map(|r| r.len()).collect();
    assert_eq!(sizes, vec![4, 3, 3]);

    let classes: Vec<u32> = routes.iter().map(|r| r.class_id()).collect();
    assert_eq!(classes, vec![1, 1, 9]);
}

#[test]
fn routes_are_disjoint_and_cover_only_input() {
    let dets = wall();
    let config = RouteSortConfig::color_grouping(80.0);
    let routes = cluster_routes(&dets, &config).unwrap();

    let mut seen = 0usize;
    for route in &routes {
        for member in route.members() {
            assert!(dets.iter().any(|d| d == member));
            seen += 1;
        }
    }

    // No detection appears in two routes: total route membership matches
    // the number of distinct input detections covered.
    let covered: usize = dets
        .iter()
        .filter(|d| routes.iter().any(|r| contains(r, d)))
        .count();
    assert_eq!(seen, covered);
}

#[test]
fn raising_the_threshold_only_merges_routes() {
    let dets = wall();

    let fine_config = RouteSortConfig {
        strategy: Strategy::ColorGrouping {
            threshold: 80.0,
            min_grip_count: 1,
        },
        ignored_class_ids: HashSet::new(),
    };
    let fine = cluster_routes(&dets, &fine_config).unwrap();

    for threshold in [150.0f32, 400.0, 1000.0] {
        let config = RouteSortConfig {
            strategy: Strategy::ColorGrouping {
                threshold,
                min_grip_count: 1,
            },
            ignored_class_ids: HashSet::new(),
        };
        let merged = cluster_routes(&dets, &config).unwrap();

        // Every fine route lands whole inside exactly one coarser route.
        for route in &fine {
            let homes: Vec<&Route> = merged
                .iter()
                .filter(|m| route.members().iter().all(|d| contains(m, d)))
                .collect();
            assert_eq!(homes.len(), 1);
        }
    }
}

#[test]
fn min_grip_count_filters_small_components() {
    let dets = wall();

    let config = RouteSortConfig {
        strategy: Strategy::ColorGrouping {
            threshold: 80.0,
            min_grip_count: 1,
        },
        ignored_class_ids: HashSet::new(),
    };
    let routes = cluster_routes(&dets, &config).unwrap();
    assert_eq!(routes.len(), 4);

    let config = RouteSortConfig {
        strategy: Strategy::ColorGrouping {
            threshold: 80.0,
            min_grip_count: 4,
        },
        ignored_class_ids: HashSet::new(),
    };
    let routes = cluster_routes(&dets, &config).unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].len(), 4);
}

#[test]
fn ignored_classes_never_reach_a_route() {
    let dets = wall();
    let config = RouteSortConfig::color_grouping(80.0).ignore_classes([1]);

    let routes = cluster_routes(&dets, &config).unwrap();

    assert_eq!(routes.len(), 1);
    assert_eq!(routes[0].class_id(), 9);
}

#[test]
fn identical_input_produces_identical_routes() {
    let dets = wall();

    for config in [
        RouteSortConfig::color_grouping(80.0),
        RouteSortConfig::density(60.0),
    ] {
        let first = cluster_routes(&dets, &config).unwrap();
        let second = cluster_routes(&dets, &config).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
fn density_strategy_clusters_the_wall() {
    let dets = wall();

    let config = RouteSortConfig {
        strategy: Strategy::Density {
            eps: 60.0,
            min_samples: 2,
            class_penalty: 20.0,
        },
        ignored_class_ids: HashSet::new(),
    };
    let routes = cluster_routes(&dets, &config).unwrap();

    // Same three coherent lines; the stray red hold has no neighbors within
    // eps and is dropped as noise.
    assert_eq!(routes.len(), 3);
    assert!(routes
        .iter()
        .all(|r| !contains(r, &det_at(5, 600.0, 600.0))));
}

#[test]
fn malformed_bbox_fails_before_clustering() {
    let mut dets = wall();
    dets.push(Detection {
        class_id: 1,
        confidence: 0.9,
        bbox: serde_json::from_str("[10.0, 10.0, 5.0, 20.0]").unwrap(),
    });

    let config = RouteSortConfig::color_grouping(80.0);
    assert!(matches!(
        cluster_routes(&dets, &config),
        Err(route_sort::Error::InvalidDetection(_))
    ));
}

#[test]
fn empty_input_is_not_an_error() {
    for config in [
        RouteSortConfig::color_grouping(80.0),
        RouteSortConfig::density(60.0),
    ] {
        assert!(cluster_routes(&[], &config).unwrap().is_empty());
    }
}
