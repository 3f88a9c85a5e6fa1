//! Grouping & aggregation engine: membership semantics, numeric edge
//! cases, sort toggling.

mod common;

use common::{record, with_category, with_metric};
use nerfdash_core::models::{CategoryKey, Field, MetricKey};
use nerfdash_core::{group_records, normalize, sort_records, MetricSummary, SortState};

#[test]
fn scalar_grouping_is_a_true_partition() {
    let records = normalize(&[
        record(1, "NeRF", "COLMAP"),
        record(2, "Gaussian", "COLMAP"),
        record(3, "NeRF", "HLOC"),
        record(4, "NeRF", "COLMAP"),
    ]);
    let groups = group_records(&records, Field::Model, &[]);

    // First-appearance order.
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["NeRF", "Gaussian"]);

    // Every record lands in exactly one group.
    let total: usize = groups.iter().map(|g| g.len()).sum();
    assert_eq!(total, records.len());
    let mut seen: Vec<u64> = groups
        .iter()
        .flat_map(|g| g.members.iter().map(|m| m.id))
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, vec![1, 2, 3, 4]);
}

#[test]
fn tag_grouping_counts_records_once_per_tag() {
    let records = normalize(&[
        with_category(
            with_category(record(1, "NeRF", "COLMAP"), CategoryKey::OpaqueObj),
            CategoryKey::TransparentObj,
        ),
        with_category(record(2, "NeRF", "COLMAP"), CategoryKey::TransparentObj),
        with_category(record(3, "NeRF", "COLMAP"), CategoryKey::ComplexObj),
        record(4, "NeRF", "COLMAP"), // untagged, member of no group
    ]);
    let groups = group_records(&records, Field::TagObj, &[]);

    // Universe is the union of tags present in the data.
    let keys: Vec<&str> = groups.iter().map(|g| g.key.as_str()).collect();
    assert_eq!(keys, vec!["opaque_obj", "transparent_obj", "complex_obj"]);

    // Multiset membership equals the summed tag-list lengths.
    let memberships: usize = groups.iter().map(|g| g.len()).sum();
    let tag_lengths: usize = records.iter().map(|r| r.tag_obj.len()).sum();
    assert_eq!(memberships, tag_lengths);

    // Record 1 shows up in both of its tag groups.
    assert!(groups[0].members.iter().any(|m| m.id == 1));
    assert!(groups[1].members.iter().any(|m| m.id == 1));
}

#[test]
fn aggregates_are_avg_min_max_over_present_values() {
    let records = normalize(&[
        with_metric(record(1, "NeRF", "COLMAP"), MetricKey::Psnr, 10.0),
        with_metric(record(2, "NeRF", "COLMAP"), MetricKey::Psnr, 20.0),
        with_metric(record(3, "NeRF", "COLMAP"), MetricKey::Psnr, 30.0),
    ]);
    let groups = group_records(&records, Field::Model, &[MetricKey::Psnr]);
    let stats = &groups[0].stats[&MetricKey::Psnr];
    assert_eq!(stats.avg, 20.0);
    assert_eq!(stats.min, 10.0);
    assert_eq!(stats.max, 30.0);
    assert_eq!(stats.count, 3);
}

#[test]
fn missing_values_leave_the_denominator() {
    let records = normalize(&[
        with_metric(record(1, "NeRF", "COLMAP"), MetricKey::Ssim, 0.8),
        record(2, "NeRF", "COLMAP"), // no ssim
        with_metric(record(3, "NeRF", "COLMAP"), MetricKey::Ssim, 0.6),
    ]);
    let groups = group_records(&records, Field::Model, &[MetricKey::Ssim]);
    let stats = &groups[0].stats[&MetricKey::Ssim];
    assert_eq!(stats.count, 2);
    assert!((stats.avg - 0.7).abs() < 1e-9);
}

#[test]
fn empty_value_set_degrades_to_sentinels_without_panicking() {
    let records = normalize(&[record(1, "NeRF", "COLMAP")]);
    let groups = group_records(&records, Field::Model, &[MetricKey::Lpips]);
    let stats = &groups[0].stats[&MetricKey::Lpips];
    assert!(stats.avg.is_nan());
    assert_eq!(stats.min, f64::INFINITY);
    assert_eq!(stats.max, f64::NEG_INFINITY);
    assert!(stats.is_empty());

    // Direct check of the summary arithmetic on an empty iterator.
    let summary = MetricSummary::compute(std::iter::empty());
    assert!(summary.avg.is_nan());
}

#[test]
fn sort_toggle_gives_ascending_then_exact_reverse() {
    let mut records = normalize(&[
        with_metric(record(1, "NeRF", "COLMAP"), MetricKey::Fps, 24.0),
        with_metric(record(2, "NeRF", "COLMAP"), MetricKey::Fps, 12.0),
        with_metric(record(3, "NeRF", "COLMAP"), MetricKey::Fps, 60.0),
    ]);

    let mut sort = SortState::default();
    sort.toggle(Field::Metric(MetricKey::Fps));
    assert!(sort.ascending);
    sort.apply(&mut records);
    let ascending: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ascending, vec![2, 1, 3]);

    sort.toggle(Field::Metric(MetricKey::Fps));
    assert!(!sort.ascending);
    sort.apply(&mut records);
    let descending: Vec<u64> = records.iter().map(|r| r.id).collect();
    let mut reversed = ascending.clone();
    reversed.reverse();
    assert_eq!(descending, reversed);

    // A new column resets to ascending.
    sort.toggle(Field::Title);
    assert_eq!(sort.column, Some(Field::Title));
    assert!(sort.ascending);
}

#[test]
fn byte_size_columns_sort_by_numeric_count() {
    // 2MB < 1GB even though "1..." sorts before "2..." as text.
    let mut records = normalize(&[
        with_metric(
            record(1, "NeRF", "COLMAP"),
            MetricKey::FrameSizeAvg,
            1024.0 * 1024.0 * 1024.0,
        ),
        with_metric(
            record(2, "NeRF", "COLMAP"),
            MetricKey::FrameSizeAvg,
            2.0 * 1024.0 * 1024.0,
        ),
    ]);
    sort_records(&mut records, Field::Metric(MetricKey::FrameSizeAvg), true);
    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![2, 1]);
}

#[test]
fn tag_columns_sort_by_joined_names() {
    let mut records = normalize(&[
        with_category(record(1, "NeRF", "COLMAP"), CategoryKey::TransparentObj),
        with_category(record(2, "NeRF", "COLMAP"), CategoryKey::ComplexObj),
        with_category(record(3, "NeRF", "COLMAP"), CategoryKey::OpaqueObj),
    ]);
    sort_records(&mut records, Field::TagObj, true);
    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    // "complex_obj" < "opaque_obj" < "transparent_obj"
    assert_eq!(ids, vec![2, 3, 1]);
}

#[test]
fn missing_metric_sorts_as_zero() {
    let mut records = normalize(&[
        with_metric(record(1, "NeRF", "COLMAP"), MetricKey::Psnr, 30.0),
        record(2, "NeRF", "COLMAP"),
        with_metric(record(3, "NeRF", "COLMAP"), MetricKey::Psnr, -5.0),
    ]);
    sort_records(&mut records, Field::Metric(MetricKey::Psnr), true);
    let ids: Vec<u64> = records.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);
}
