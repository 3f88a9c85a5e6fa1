//! Selection state: vocabulary validation and pagination arithmetic.

use nerfdash_core::models::{Field, MetricKey};
use nerfdash_core::ViewState;

#[test]
fn defaults_show_everything() {
    let view = ViewState::default();
    assert_eq!(view.visible_columns.len(), Field::all().count());
    assert_eq!(view.aggregations, MetricKey::ALL.to_vec());
    assert!(view.group_by.is_none());
    assert_eq!(view.page, 1);
}

#[test]
fn unknown_aggregation_names_are_rejected() {
    let mut view = ViewState::default();
    view.set_aggregations(["psnr", "definitely_not_a_metric", "fps", "title"]);
    assert_eq!(view.aggregations, vec![MetricKey::Psnr, MetricKey::Fps]);
}

#[test]
fn visible_columns_keep_canonical_order() {
    let mut view = ViewState::default();
    // Selection order is deliberately scrambled.
    view.set_visible_columns(["psnr", "title", "nonsense", "model"]);
    assert_eq!(
        view.visible_columns,
        vec![Field::Title, Field::Model, Field::Metric(MetricKey::Psnr)]
    );
}

#[test]
fn group_by_validates_through_the_field_vocabulary() {
    let mut view = ViewState::default();
    view.set_group_by(Some("tag_obj"));
    assert_eq!(view.group_by, Some(Field::TagObj));
    view.set_group_by(Some("no_such_column"));
    assert!(view.group_by.is_none());
    view.set_group_by(None);
    assert!(view.group_by.is_none());
}

#[test]
fn pagination_windows_and_clamps() {
    let mut view = ViewState {
        per_page: 10,
        ..ViewState::default()
    };
    assert_eq!(view.page_count(35), 4);
    assert_eq!(view.page_bounds(35), (0, 10));

    view.page = 4;
    assert_eq!(view.page_bounds(35), (30, 35));

    // Shrinking the data clamps the page back into range.
    view.clamp_page(12);
    assert_eq!(view.page, 2);

    // Empty data still has one (empty) page.
    view.clamp_page(0);
    assert_eq!(view.page, 1);
    assert_eq!(view.page_bounds(0), (0, 0));

    let items: Vec<u32> = (0..35).collect();
    view.page = 2;
    assert_eq!(view.paginate(&items), &items[10..20]);

    // Changing the window resets to page 1.
    view.set_per_page(20);
    assert_eq!(view.page, 1);
    assert_eq!(view.paginate(&items).len(), 20);
}
