use approx::assert_relative_eq;

use pardalote::model::allele_support::{aggregate, concordance};
use pardalote::reads::ReadObservation;

fn observation(length: usize, avg_bq: f64, min_flank: usize, reverse: bool) -> ReadObservation {
    ReadObservation {
        allele_length: length,
        avg_base_quality: avg_bq,
        min_flank,
        reverse,
        map_quality: 60,
    }
}

#[test]
fn merges_by_length_and_averages() {
    let observations = vec![
        observation(10, 0.99, 5, false),
        observation(12, 0.98, 4, true),
        observation(10, 0.97, 7, true),
        observation(10, 0.95, 6, false),
    ];
    let supports = aggregate(&observations);

    assert_eq!(supports.len(), 2);
    assert_eq!(supports[0].length, 10);
    assert_eq!(supports[0].occurrences, 3);
    assert_relative_eq!(
        supports[0].avg_base_quality,
        (0.99 + 0.97 + 0.95) / 3.0,
        epsilon = 1e-12
    );
    assert_relative_eq!(supports[0].avg_min_flank, 6.0, epsilon = 1e-12);
    assert_eq!(supports[0].reverse, 1);
    assert_eq!(supports[1].length, 12);
    assert_eq!(supports[1].occurrences, 1);
}

#[test]
fn sorts_by_count_then_longer_length() {
    let observations = vec![
        observation(10, 0.99, 5, false),
        observation(10, 0.99, 5, false),
        observation(14, 0.99, 5, false),
        observation(14, 0.99, 5, false),
        observation(12, 0.99, 5, false),
    ];
    let supports = aggregate(&observations);

    assert_eq!(
        supports.iter().map(|s| s.length).collect::<Vec<_>>(),
        vec![14, 10, 12]
    );
}

#[test]
fn concordance_follows_majority_minus_one() {
    let supports = aggregate(&[
        observation(10, 0.99, 5, false),
        observation(10, 0.99, 5, false),
        observation(10, 0.99, 5, false),
        observation(12, 0.99, 5, false),
    ]);
    assert_relative_eq!(concordance(&supports).unwrap(), 2.0 / 3.0, epsilon = 1e-12);
}

#[test]
fn concordance_is_undefined_below_two_reads() {
    assert!(concordance(&[]).is_none());
    let single = aggregate(&[observation(10, 0.99, 5, false)]);
    assert!(concordance(&single).is_none());
}

#[test]
fn unanimous_reads_have_full_concordance() {
    let supports = aggregate(&vec![observation(10, 0.99, 5, false); 20]);
    assert_relative_eq!(concordance(&supports).unwrap(), 1.0, epsilon = 1e-12);
}
