// Copyright (c) Calibra Research
// SPDX-License-Identifier: Apache-2.0

use super::*;

#[test]
fn test_interest_registration() {
    let mut metrics = RunMetrics::new();
    let a = metrics.register_interest();
    let b = metrics.register_interest();
    assert_eq!(a, InterestId(0));
    assert_eq!(b, InterestId(1));
    metrics.bump_hit_distance(a);
    metrics.bump_hit_distance(a);
    metrics.bump_hit_distance(b);
    assert_eq!(metrics.hit_distances(), &[2, 1]);
}

#[test]
fn test_cache_status_bookkeeping() {
    let mut metrics = RunMetrics::new();
    let name = Name::from("uuv1/health_info");
    assert_eq!(metrics.cached_copies(&name), 0);
    metrics.note_cached(&name);
    metrics.note_cached(&name);
    assert_eq!(metrics.cached_copies(&name), 2);
    metrics.note_evicted(&name);
    assert_eq!(metrics.cached_copies(&name), 1);
    metrics.reset_cache_status();
    assert_eq!(metrics.cached_copies(&name), 0);
    // Underflow warns instead of panicking.
    metrics.note_evicted(&name);
    assert_eq!(metrics.cached_copies(&name), 0);
}

#[test]
fn test_summary_means_and_variances() {
    let mut metrics = RunMetrics::new();
    metrics.mark_sample_start();
    for _ in 0..4 {
        let id = metrics.register_interest();
        metrics.bump_hit_distance(id);
    }
    // Hit distances 1, 1, 3, 3: mean 2, sample variance 4/3.
    metrics.bump_hit_distance(InterestId(2));
    metrics.bump_hit_distance(InterestId(2));
    metrics.bump_hit_distance(InterestId(3));
    metrics.bump_hit_distance(InterestId(3));
    metrics.record_return_time(Duration(2.0));
    metrics.record_return_time(Duration(4.0));

    let summary = metrics.summarize(0.0);
    assert_eq!(summary.interests, 4);
    assert_eq!(summary.deliveries, 2);
    assert_eq!(summary.hit_distance_mean, 2.0);
    assert!((summary.hit_distance_variance - 4.0 / 3.0).abs() < 1e-12);
    assert_eq!(summary.return_time_mean, 3.0);
    assert_eq!(summary.return_time_variance, 2.0);
    assert_eq!(summary.hit_distance_percentages[0], 50.0);
    assert_eq!(summary.hit_distance_percentages[1], 0.0);
    assert_eq!(summary.hit_distance_percentages[2], 50.0);
}

#[test]
fn test_per_sample_slicing() {
    let mut metrics = RunMetrics::new();
    metrics.mark_sample_start();
    for _ in 0..2 {
        let id = metrics.register_interest();
        metrics.bump_hit_distance(id);
    }
    metrics.record_return_time(Duration(1.0));
    metrics.mark_sample_start();
    let id = metrics.register_interest();
    metrics.bump_hit_distance(id);
    metrics.bump_hit_distance(id);
    metrics.bump_hit_distance(id);
    metrics.record_return_time(Duration(3.0));

    let (hd_marks, rt_marks) = metrics.sample_marks();
    assert_eq!(hd_marks, &[0, 2]);
    assert_eq!(rt_marks, &[0, 1]);

    let summary = metrics.summarize(0.0);
    assert_eq!(summary.sample_hit_distance_means, vec![1.0, 3.0]);
    assert_eq!(summary.sample_return_time_means, vec![1.0, 3.0]);
    assert_eq!(summary.hit_distance_sample_variance, 2.0);
}

#[test]
fn test_empty_sample_is_skipped() {
    let mut metrics = RunMetrics::new();
    metrics.mark_sample_start();
    let id = metrics.register_interest();
    metrics.bump_hit_distance(id);
    metrics.record_return_time(Duration(5.0));
    // Second sample sees no traffic at all.
    metrics.mark_sample_start();

    let summary = metrics.summarize(0.0);
    assert_eq!(summary.sample_hit_distance_means, vec![1.0]);
    assert_eq!(summary.sample_return_time_means, vec![5.0]);
    assert_eq!(summary.hit_distance_sample_variance, 0.0);
}
