use ragkit_core::ranking::{rank_records, Ranking};
use ragkit_core::{DistanceMetric, Error, SearchParams, StoredRecord};

fn rec(key: u64, text: &str, embedding: &[f32]) -> StoredRecord {
    StoredRecord { key, text: text.to_string(), embedding: embedding.to_vec(), source: "test".to_string() }
}

fn params(metric: DistanceMetric, top_k: usize, threshold: f64) -> SearchParams {
    SearchParams { metric, top_k, threshold }
}

#[test]
fn cosine_and_euclidean_distances() {
    let c = DistanceMetric::Cosine;
    assert_eq!(c.distance(&[1.0, 0.0], &[1.0, 0.0]), 0.0);
    assert_eq!(c.distance(&[1.0, 0.0], &[0.0, 1.0]), 1.0);
    assert_eq!(c.distance(&[1.0, 0.0], &[-1.0, 0.0]), 2.0);
    assert!((c.distance(&[1.0, 1.0], &[2.0, 2.0])).abs() < 1e-12, "scale invariant");
    assert!(c.distance(&[0.0, 0.0], &[1.0, 0.0]).is_nan());

    let e = DistanceMetric::Euclidean;
    assert_eq!(e.distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
    assert_eq!(e.distance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]), 0.0);
}

#[test]
fn metric_parses_from_config_strings() {
    assert_eq!("cosine".parse::<DistanceMetric>().unwrap(), DistanceMetric::Cosine);
    assert_eq!("Euclidean".parse::<DistanceMetric>().unwrap(), DistanceMetric::Euclidean);
    assert_eq!("l2".parse::<DistanceMetric>().unwrap(), DistanceMetric::Euclidean);
    assert!(matches!("manhattan".parse::<DistanceMetric>(), Err(Error::InvalidParameter(_))));
    assert_eq!(DistanceMetric::Euclidean.to_string(), "euclidean");
}

#[test]
fn results_are_sorted_by_distance_and_truncated() {
    let records = vec![
        rec(0, "far", &[10.0, 0.0]),
        rec(1, "near", &[1.0, 0.0]),
        rec(2, "mid", &[3.0, 0.0]),
        rec(3, "exact", &[0.0, 0.0]),
    ];
    let q = [0.0, 0.0];
    let out = rank_records(&q, 2, &records, params(DistanceMetric::Euclidean, 3, 100.0)).unwrap();
    assert_eq!(out, vec!["exact", "near", "mid"]);
}

#[test]
fn threshold_is_strict() {
    let records = vec![rec(0, "at", &[3.0, 4.0]), rec(1, "under", &[3.0, 3.9])];
    let q = [0.0, 0.0];
    let out = rank_records(&q, 2, &records, params(DistanceMetric::Euclidean, 10, 5.0)).unwrap();
    assert_eq!(out, vec!["under"], "distance == threshold is excluded");

    let orth = vec![rec(0, "orthogonal", &[0.0, 1.0])];
    let out = rank_records(&[1.0, 0.0], 2, &orth, params(DistanceMetric::Cosine, 10, 1.0)).unwrap();
    assert!(out.is_empty());
    let out = rank_records(&[1.0, 0.0], 2, &orth, params(DistanceMetric::Cosine, 10, 1.000_001)).unwrap();
    assert_eq!(out, vec!["orthogonal"]);
}

#[test]
fn ties_keep_insertion_order_regardless_of_scan_order() {
    let q = [1.0, 0.0];
    let p = params(DistanceMetric::Cosine, 10, 0.5);
    let mut ranking = Ranking::new(&q, 2, p).unwrap();
    // offered out of key order
    ranking.offer(7, "second", &[2.0, 0.0]).unwrap();
    ranking.offer(3, "first", &[1.0, 0.0]).unwrap();
    ranking.offer(9, "third", &[5.0, 0.0]).unwrap();
    assert_eq!(ranking.len(), 3);
    assert_eq!(ranking.finish(), vec!["first", "second", "third"]);
}

#[test]
fn fewer_matches_than_top_k_and_zero_top_k() {
    let records = vec![rec(0, "a", &[1.0, 0.0]), rec(1, "b", &[0.0, 1.0])];
    let q = [1.0, 0.0];
    let out = rank_records(&q, 2, &records, params(DistanceMetric::Cosine, 5, 0.5)).unwrap();
    assert_eq!(out, vec!["a"]);
    let out = rank_records(&q, 2, &records, params(DistanceMetric::Cosine, 0, 0.5)).unwrap();
    assert!(out.is_empty());
}

#[test]
fn no_match_is_an_empty_result_not_an_error() {
    let records = vec![rec(0, "a", &[0.0, 1.0])];
    let out = rank_records(&[1.0, 0.0], 2, &records, params(DistanceMetric::Cosine, 3, 0.1)).unwrap();
    assert!(out.is_empty());
    let out = rank_records(&[1.0, 0.0], 2, &[], params(DistanceMetric::Cosine, 3, 0.1)).unwrap();
    assert!(out.is_empty());
}

#[test]
fn dimensionality_mismatch_is_a_configuration_error() {
    let p = params(DistanceMetric::Cosine, 3, 1.0);
    assert!(matches!(Ranking::new(&[1.0, 0.0, 0.0], 2, p), Err(Error::Configuration(_))));
    let records = vec![rec(0, "short", &[1.0])];
    assert!(matches!(rank_records(&[1.0, 0.0], 2, &records, p), Err(Error::Configuration(_))));
}

#[test]
fn repeated_searches_are_identical() {
    let records: Vec<StoredRecord> = (0..50)
        .map(|i| {
            let x = (i % 7) as f32;
            rec(i, &format!("r{i}"), &[x, 1.0, (i % 3) as f32])
        })
        .collect();
    let q = [2.0, 1.0, 1.0];
    let p = params(DistanceMetric::Euclidean, 10, 3.0);
    let first = rank_records(&q, 3, &records, p).unwrap();
    for _ in 0..5 {
        assert_eq!(rank_records(&q, 3, &records, p).unwrap(), first);
    }
}
