//! Grouping & aggregation engine.
//!
//! Two distinct grouping passes: tag fields expand to one group per tag
//! value (a record with tags `[A, B]` belongs to both groups), every other
//! field partitions records by the string form of its value. Keeping the
//! passes separate keeps the multi-membership arithmetic auditable.

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{Field, FieldValue, MetricKey, TableRecord};

/// Per-group, per-metric aggregate over the members that actually carry a
/// numeric value for the metric.
///
/// Degenerate cases are values, not errors: with no surviving members the
/// average is NaN and min/max are +inf/-inf. Callers render these as
/// missing; nothing here panics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricSummary {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    /// Number of members that contributed a value.
    pub count: usize,
}

impl MetricSummary {
    pub fn compute(values: impl IntoIterator<Item = f64>) -> MetricSummary {
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut count = 0usize;
        for v in values {
            sum += v;
            min = min.min(v);
            max = max.max(v);
            count += 1;
        }
        MetricSummary {
            avg: sum / count as f64,
            min,
            max,
            count,
        }
    }

    /// True when no member carried a value and the fields hold sentinels.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

/// One group of table records with its aggregates.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// The grouped field's value, or a single tag name for tag fields.
    pub key: String,
    pub members: Vec<TableRecord>,
    pub stats: BTreeMap<MetricKey, MetricSummary>,
}

impl Group {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Partition records by `group_by` and aggregate `metrics` per group.
///
/// Group order is first-appearance order of the key in the input.
pub fn group_records(
    records: &[TableRecord],
    group_by: Field,
    metrics: &[MetricKey],
) -> Vec<Group> {
    let buckets = if group_by.is_tag() {
        group_by_tags(records, group_by)
    } else {
        group_by_scalar(records, group_by)
    };
    debug!(
        field = %group_by,
        groups = buckets.len(),
        "grouped {} records",
        records.len()
    );

    buckets
        .into_iter()
        .map(|(key, members)| {
            let stats = metrics
                .iter()
                .map(|&metric| {
                    let summary = MetricSummary::compute(
                        members.iter().filter_map(|r| r.metrics.get(metric)),
                    );
                    (metric, summary)
                })
                .collect();
            Group {
                key,
                members,
                stats,
            }
        })
        .collect()
}

/// Tag-field pass: the group universe is the union of tag values across all
/// records; each record joins the group of every tag it carries.
fn group_by_tags(records: &[TableRecord], field: Field) -> Vec<(String, Vec<TableRecord>)> {
    let tags_of = |record: &TableRecord| match record.value_of(field) {
        FieldValue::Tags(tags) => tags.to_vec(),
        _ => unreachable!("tag grouping on a non-tag field"),
    };

    let mut universe = Vec::new();
    for record in records {
        for tag in tags_of(record) {
            if !universe.contains(&tag) {
                universe.push(tag);
            }
        }
    }

    universe
        .into_iter()
        .map(|tag| {
            let members = records
                .iter()
                .filter(|r| tags_of(r).contains(&tag))
                .cloned()
                .collect();
            (tag.as_str().to_string(), members)
        })
        .collect()
}

/// Scalar pass: a true partition keyed by the string form of the value.
fn group_by_scalar(records: &[TableRecord], field: Field) -> Vec<(String, Vec<TableRecord>)> {
    let mut buckets: Vec<(String, Vec<TableRecord>)> = Vec::new();
    for record in records {
        let key = record.key_of(field);
        match buckets.iter_mut().find(|(k, _)| *k == key) {
            Some((_, members)) => members.push(record.clone()),
            None => buckets.push((key, vec![record.clone()])),
        }
    }
    buckets
}
