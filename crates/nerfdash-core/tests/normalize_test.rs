//! Normalizer invariants: tag derivation, stripping, edit round trips.

mod common;

use common::{record, with_category, with_metric};
use nerfdash_core::models::{CategoryKey, MetricKey};
use nerfdash_core::{normalize, replace_record, DashError};

#[test]
fn output_length_matches_input() {
    let records = vec![
        record(1, "NeRF", "COLMAP"),
        record(2, "Gaussian", "HLOC"),
        record(3, "NeRF", "HLOC"),
    ];
    assert_eq!(normalize(&records).len(), records.len());
    assert!(normalize(&[]).is_empty());
}

#[test]
fn tags_follow_vocabulary_order_not_flag_order() {
    // Flag order in the struct is irrelevant; derived tags always come out
    // in vocabulary declaration order.
    let rec = with_category(
        with_category(record(1, "NeRF", "COLMAP"), CategoryKey::TransparentObj),
        CategoryKey::OpaqueObj,
    );
    let table = normalize(&[rec]);
    assert_eq!(
        table[0].tag_obj,
        vec![CategoryKey::OpaqueObj, CategoryKey::TransparentObj]
    );
}

#[test]
fn all_flags_set_yields_full_vocabularies_once() {
    let mut rec = record(1, "NeRF", "COLMAP");
    for key in CategoryKey::ALL {
        rec.categories.set(key, true);
    }
    let table = normalize(&[rec]);
    assert_eq!(table[0].tag_obj, CategoryKey::OBJECT.to_vec());
    assert_eq!(table[0].tag_esc, CategoryKey::SCENE.to_vec());
}

#[test]
fn no_flags_means_no_tags() {
    let table = normalize(&[record(1, "NeRF", "COLMAP")]);
    assert!(table[0].tag_obj.is_empty());
    assert!(table[0].tag_esc.is_empty());
}

#[test]
fn scene_flags_never_leak_into_object_tags() {
    let rec = with_category(
        with_category(record(1, "NeRF", "COLMAP"), CategoryKey::OpenScene),
        CategoryKey::ComplexObj,
    );
    let table = normalize(&[rec]);
    assert_eq!(table[0].tag_obj, vec![CategoryKey::ComplexObj]);
    assert_eq!(table[0].tag_esc, vec![CategoryKey::OpenScene]);
}

#[test]
fn scalars_and_metrics_survive_normalization() {
    let rec = with_metric(record(7, "Gaussian", "HLOC"), MetricKey::Psnr, 31.7);
    let table = normalize(&[rec.clone()]);
    assert_eq!(table[0].id, 7);
    assert_eq!(table[0].title, rec.title);
    assert_eq!(table[0].dataset, rec.dataset);
    assert_eq!(table[0].model, "Gaussian");
    assert_eq!(table[0].preprocessor, "HLOC");
    assert_eq!(table[0].date_added, rec.date_added);
    assert_eq!(table[0].metrics.get(MetricKey::Psnr), Some(31.7));
}

#[test]
fn edit_then_renormalize_rederives_tags_from_scratch() {
    let records = vec![
        with_category(record(1, "NeRF", "COLMAP"), CategoryKey::OpaqueObj),
        record(2, "Gaussian", "HLOC"),
    ];
    let before = normalize(&records);
    assert_eq!(before[0].tag_obj, vec![CategoryKey::OpaqueObj]);

    // Edit record 1: drop opaque, set transparent + closed scene.
    let mut records = records;
    let mut edited = records[0].clone();
    edited.categories.set(CategoryKey::OpaqueObj, false);
    edited.categories.set(CategoryKey::TransparentObj, true);
    edited.categories.set(CategoryKey::ClosedScene, true);
    replace_record(&mut records, edited).expect("record 1 exists");

    let after = normalize(&records);
    assert_eq!(after[0].tag_obj, vec![CategoryKey::TransparentObj]);
    assert_eq!(after[0].tag_esc, vec![CategoryKey::ClosedScene]);
    // The untouched record is unaffected.
    assert!(after[1].tag_obj.is_empty());
}

#[test]
fn replace_unknown_id_is_an_error() {
    let mut records = vec![record(1, "NeRF", "COLMAP")];
    let ghost = record(99, "NeRF", "COLMAP");
    match replace_record(&mut records, ghost) {
        Err(DashError::RecordNotFound(99)) => {}
        other => panic!("expected RecordNotFound(99), got {other:?}"),
    }
}
