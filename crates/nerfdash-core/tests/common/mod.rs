//! Shared record fixtures for the engine tests.

use chrono::{TimeZone, Utc};
use nerfdash_core::models::{
    CategoryFlags, CategoryKey, ExperimentRecord, MediaKind, MetricKey, Metrics,
};

/// A minimal raw record; tests tweak the fields they care about.
pub fn record(id: u64, model: &str, preprocessor: &str) -> ExperimentRecord {
    ExperimentRecord {
        id,
        title: format!("run-{id}"),
        dataset: "lego".to_string(),
        kind: MediaKind::Image,
        model: model.to_string(),
        preprocessor: preprocessor.to_string(),
        scene_type: "tabletop".to_string(),
        virtual_scene: false,
        real_scene: true,
        date_added: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        date_updated: Utc.with_ymd_and_hms(2024, 3, 2, 12, 0, 0).unwrap(),
        metrics: Metrics::default(),
        categories: CategoryFlags::default(),
        preprocessed: true,
        trained: true,
        evaluated: true,
        successful: true,
        error: String::new(),
        raw_data: serde_json::Value::Null,
    }
}

pub fn with_metric(mut rec: ExperimentRecord, key: MetricKey, value: f64) -> ExperimentRecord {
    rec.metrics.set(key, Some(value));
    rec
}

pub fn with_category(mut rec: ExperimentRecord, key: CategoryKey) -> ExperimentRecord {
    rec.categories.set(key, true);
    rec
}
