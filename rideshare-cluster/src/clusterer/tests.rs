//! Tests for the spatio-temporal clusterer.
#![expect(
    clippy::float_arithmetic,
    clippy::expect_used,
    reason = "tests offset coordinates and use expect for readable failures"
)]

use std::collections::HashSet;
use std::sync::Arc;

use rideshare_core::test_support::{RecordingObserver, request_at};
use rideshare_core::{ClusterParams, Clusterer, RideRequest, SearchEvent};
use rstest::{fixture, rstest};

use super::*;

const MINUTE_MS: u64 = 60_000;
/// Roughly one kilometre of latitude.
const KM_LAT: f64 = 0.009;

#[fixture]
fn params() -> ClusterParams {
    ClusterParams {
        time_window_minutes: 30.0,
        max_distance_km: 2.0,
        now_ms: 10 * MINUTE_MS,
    }
}

fn ids(cluster: &Cluster) -> Vec<u64> {
    cluster.request_ids().collect()
}

#[rstest]
fn empty_input_yields_no_clusters(params: ClusterParams) {
    assert!(SpatioTemporalClusterer::new().cluster(&[], &params).is_empty());
}

#[rstest]
fn close_requests_share_a_cluster(params: ClusterParams) {
    // About 14 m and one minute apart.
    let requests = vec![
        request_at(1, 40.7128, -74.0060, 9 * MINUTE_MS),
        request_at(2, 40.7129, -74.0061, 10 * MINUTE_MS),
    ];
    let clusters = SpatioTemporalClusterer::new().cluster(&requests, &params);
    assert_eq!(clusters.len(), 1);
    let cluster = clusters.first().expect("one cluster");
    assert_eq!(ids(cluster), vec![1, 2]);
    assert!((cluster.centroid.y - 40.712_85).abs() < 1e-9);
}

#[rstest]
fn isolated_requests_become_singletons(params: ClusterParams) {
    let requests = vec![
        request_at(1, 40.70, -74.00, 10 * MINUTE_MS),
        request_at(2, 40.80, -74.00, 10 * MINUTE_MS),
        request_at(3, 40.90, -74.00, 10 * MINUTE_MS),
    ];
    let clusters = SpatioTemporalClusterer::new().cluster(&requests, &params);
    assert_eq!(clusters.len(), 3);
    assert!(clusters.iter().all(|c| c.size() == 1));
    assert_eq!(
        clusters.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[rstest]
fn requests_outside_the_window_are_dropped(params: ClusterParams) {
    let requests = vec![
        request_at(1, 40.70, -74.00, 10 * MINUTE_MS),
        request_at(2, 40.70, -74.00, 50 * MINUTE_MS),
        request_at(3, 40.70, -74.00, 0),
    ];
    let narrow = ClusterParams {
        time_window_minutes: 5.0,
        ..params
    };
    let clusters = SpatioTemporalClusterer::new().cluster(&requests, &narrow);
    let seen: Vec<u64> = clusters.iter().flat_map(Cluster::request_ids).collect();
    assert_eq!(seen, vec![1]);
}

#[rstest]
fn mutually_close_requests_form_one_cluster(params: ClusterParams) {
    let requests: Vec<RideRequest> = (0..6_u64)
        .map(|id| request_at(id, 40.70, -74.00, 10 * MINUTE_MS))
        .collect();
    let clusters = SpatioTemporalClusterer::new().cluster(&requests, &params);
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters.first().map(Cluster::size), Some(6));
}

#[rstest]
fn unreachable_min_points_yields_singletons(params: ClusterParams) {
    let requests: Vec<RideRequest> = (0..3_u64)
        .map(|id| request_at(id, 40.70, -74.00, 10 * MINUTE_MS))
        .collect();
    let clusterer = SpatioTemporalClusterer::with_config(ClustererConfig {
        min_points: 10,
        ..ClustererConfig::default()
    });
    let clusters = clusterer.cluster(&requests, &params);
    assert_eq!(clusters.len(), 3);
    assert!(clusters.iter().all(|c| c.size() == 1));
}

#[rstest]
fn dense_groups_precede_singletons(params: ClusterParams) {
    let requests = vec![
        request_at(10, 41.50, -74.00, 10 * MINUTE_MS),
        request_at(11, 40.70, -74.00, 10 * MINUTE_MS),
        request_at(12, 40.70, -74.00, 10 * MINUTE_MS),
    ];
    let clusters = SpatioTemporalClusterer::new().cluster(&requests, &params);
    let layout: Vec<(u64, Vec<u64>)> = clusters.iter().map(|c| (c.id, ids(c))).collect();
    assert_eq!(layout, vec![(0, vec![11, 12]), (1, vec![10])]);
}

#[rstest]
fn border_members_do_not_chain(params: ClusterParams) {
    // With a fixed epsilon of 0.3 and a 3 km scale, neighbours lie within
    // 1.2 km. Only the middle request has three neighbours.
    let clusterer = SpatioTemporalClusterer::with_config(ClustererConfig {
        min_points: 3,
        epsilon: EpsilonPolicy::Fixed(0.3),
        ..ClustererConfig::default()
    });
    let wide = ClusterParams {
        max_distance_km: 5.0,
        ..params
    };
    let requests = vec![
        request_at(1, 40.70, -74.00, 10 * MINUTE_MS),
        request_at(2, 40.70 + KM_LAT, -74.00, 10 * MINUTE_MS),
        request_at(3, 40.70 + 2.0 * KM_LAT, -74.00, 10 * MINUTE_MS),
        request_at(4, 40.70 + 3.3 * KM_LAT, -74.00, 10 * MINUTE_MS),
    ];
    let clusters = clusterer.cluster(&requests, &wide);
    let layout: Vec<Vec<u64>> = clusters.iter().map(ids).collect();
    assert_eq!(layout, vec![vec![2, 1, 3], vec![4]]);
}

#[rstest]
fn every_recent_request_appears_once(params: ClusterParams) {
    let requests: Vec<RideRequest> = (0..20_u64)
        .map(|id| {
            let offset = f64::from(u32::try_from(id % 5).expect("small")) * 0.004;
            request_at(id, 40.70 + offset, -74.00, 10 * MINUTE_MS)
        })
        .collect();
    let clusters = SpatioTemporalClusterer::new().cluster(&requests, &params);
    let seen: Vec<u64> = clusters.iter().flat_map(Cluster::request_ids).collect();
    let unique: HashSet<u64> = seen.iter().copied().collect();
    assert_eq!(seen.len(), requests.len());
    assert_eq!(unique.len(), requests.len());
}

#[rstest]
fn observer_receives_summary(params: ClusterParams) {
    let observer = Arc::new(RecordingObserver::default());
    let clusterer = SpatioTemporalClusterer::new().with_observer(observer.clone());
    let requests = vec![
        request_at(1, 40.70, -74.00, 10 * MINUTE_MS),
        request_at(2, 40.70, -74.00, 10 * MINUTE_MS),
        request_at(3, 41.70, -74.00, 10 * MINUTE_MS),
    ];
    let _ = clusterer.cluster(&requests, &params);
    let events = observer.events();
    assert!(matches!(
        events.as_slice(),
        [SearchEvent::ClusteringFinished {
            considered: 3,
            clusters: 1,
            noise: 1,
            ..
        }]
    ));
}

#[rstest]
#[case(0, 0.25)]
#[case(1, 0.25)]
#[case(10, 0.30)]
#[case(1_000, 0.35)]
fn adaptive_epsilon_grows_with_input(#[case] considered: usize, #[case] expected: f64) {
    let epsilon = EpsilonPolicy::default().epsilon_for(considered);
    assert!((epsilon - expected).abs() < 1e-12, "got {epsilon}");
}

#[rstest]
fn fixed_epsilon_ignores_input_size() {
    let policy = EpsilonPolicy::Fixed(0.4);
    assert!((policy.epsilon_for(1) - 0.4).abs() < f64::EPSILON);
    assert!((policy.epsilon_for(10_000) - 0.4).abs() < f64::EPSILON);
}
