//! nerfdash-core: the data-shaping pipeline behind the nerfdash dashboard.
//!
//! Raw experiment records come in over REST; this crate normalizes them
//! into a tag-based table shape, groups and aggregates them by arbitrary
//! columns, and pivots them into per-category metric comparisons. Every
//! engine function is synchronous and pure; callers re-run them whenever
//! their inputs change.

pub mod error;
pub mod format;
pub mod group;
pub mod models;
pub mod normalize;
pub mod pivot;
pub mod sort;
pub mod store;
pub mod view;

pub use error::{DashError, Result};
pub use group::{group_records, Group, MetricSummary};
pub use models::{
    CategoryFlags, CategoryKey, ExperimentRecord, Field, FieldValue, MediaKind, MetricKey,
    Metrics, TableRecord,
};
pub use normalize::{normalize, normalize_one, replace_record};
pub use pivot::{
    count_experiments, pivot, MetricChart, PivotOptions, PivotSummary, PivotTable, PrimaryFilter,
};
pub use sort::{sort_records, SortState};
pub use store::ExperimentSet;
pub use view::ViewState;
