//! Record normalizer: raw API records to table-ready records.
//!
//! Category flags collapse into the two tag lists; pipeline status, error
//! and raw payload are stripped. Pure functions, re-run over the full set
//! after every change so the tag lists always re-derive from the flags.

use tracing::debug;

use crate::error::{DashError, Result};
use crate::models::{CategoryKey, ExperimentRecord, TableRecord};

/// Normalize one raw record.
///
/// The tag lists are built by scanning the fixed vocabularies in
/// declaration order, so they are deduplicated and vocabulary-ordered by
/// construction regardless of how the flags were set.
pub fn normalize_one(record: &ExperimentRecord) -> TableRecord {
    let tag_obj = CategoryKey::OBJECT
        .into_iter()
        .filter(|key| record.categories.get(*key))
        .collect();
    let tag_esc = CategoryKey::SCENE
        .into_iter()
        .filter(|key| record.categories.get(*key))
        .collect();

    TableRecord {
        id: record.id,
        title: record.title.clone(),
        dataset: record.dataset.clone(),
        kind: record.kind,
        model: record.model.clone(),
        preprocessor: record.preprocessor.clone(),
        scene_type: record.scene_type.clone(),
        virtual_scene: record.virtual_scene,
        real_scene: record.real_scene,
        date_added: record.date_added,
        date_updated: record.date_updated,
        metrics: record.metrics.clone(),
        tag_obj,
        tag_esc,
    }
}

/// Normalize a full record set. Output length always equals input length.
pub fn normalize(records: &[ExperimentRecord]) -> Vec<TableRecord> {
    debug!(count = records.len(), "normalizing record set");
    records.iter().map(normalize_one).collect()
}

/// Apply an edited record to the set by id.
///
/// The whole record is replaced; callers re-run [`normalize`] over the set
/// afterwards rather than patching tag lists incrementally.
pub fn replace_record(records: &mut [ExperimentRecord], updated: ExperimentRecord) -> Result<()> {
    match records.iter_mut().find(|r| r.id == updated.id) {
        Some(slot) => {
            *slot = updated;
            Ok(())
        }
        None => Err(DashError::RecordNotFound(updated.id)),
    }
}
