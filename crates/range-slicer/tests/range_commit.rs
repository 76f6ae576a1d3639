//! Integration tests for committing the range from the slider and the bound
//! inputs, and for restoring persisted bounds.

mod common;

use common::{numeric_snapshot, slicer, snapshot, update};
use range_slicer::filter::{ConditionOperator, FilterColumnTarget};
use range_slicer::model::{RangeValue, ScaledValue};
use range_slicer::settings::SettingsBag;
use range_slicer::view::{Bound, CommitOutcome, Handle, InputState, Viewport};

const VIEWPORT: Viewport = Viewport::new(300.0, 400.0);

#[test]
fn test_drag_issues_one_filter_and_one_render() {
    let (mut slicer, host) = slicer();
    update(&mut slicer, numeric_snapshot(100, SettingsBag::new()), VIEWPORT);
    let renders = slicer.table_view().render_count();
    let slider_updates = slicer.surface().slider_updates;

    assert!(slicer.slider_pressed(Handle::Lower));
    for step in 1..=50 {
        slicer.slider_moved(step as f64 * 0.5);
    }

    // Intermediate moves only move the drawn thumb
    assert_eq!(host.filter_count(), 0);
    assert_eq!(slicer.table_view().render_count(), renders);
    assert_eq!(slicer.surface().slider_updates, slider_updates + 50);
    assert_eq!(slicer.surface().slider, ScaledValue::new(25.0, 100.0));

    assert!(slicer.slider_released());
    assert_eq!(host.filter_count(), 1);
    assert_eq!(slicer.table_view().render_count(), renders + 1);

    // 25% of [0, 99] rounds to 25 at zero decimals
    assert_eq!(
        slicer.behavior().range().value(),
        RangeValue::new(Some(25.0), Some(99.0))
    );
    let filter = host.last_filter().unwrap();
    assert_eq!(filter.target.table, "Sales");
    assert_eq!(filter.target.column, "Amount");
    assert_eq!(filter.conditions[0].operator, ConditionOperator::GreaterThanOrEqual);
    assert_eq!(filter.conditions[0].value, 25.0);

    assert_eq!(host.persisted("rangeSelectionStart").as_deref(), Some("25"));
    assert_eq!(host.persisted("rangeSelectionEnd").as_deref(), Some("99"));
    assert!(host.persisted("filter").is_some_and(|json| json.contains("GreaterThanOrEqual")));

    assert_eq!(slicer.surface().input(Bound::Start), "25");
    assert_eq!(slicer.surface().input(Bound::End), "99");

    let data = slicer.data().unwrap();
    let in_range = data
        .data_points
        .iter()
        .filter(|point| point.is_selected_range_point)
        .count();
    assert_eq!(in_range, 75);
}

#[test]
fn test_release_without_press_is_ignored() {
    let (mut slicer, host) = slicer();
    update(&mut slicer, numeric_snapshot(10, SettingsBag::new()), VIEWPORT);

    slicer.slider_moved(40.0);
    assert!(!slicer.slider_released());
    assert_eq!(host.filter_count(), 0);
}

#[test]
fn test_cancelled_drag_restores_thumbs() {
    let (mut slicer, host) = slicer();
    update(&mut slicer, numeric_snapshot(10, SettingsBag::new()), VIEWPORT);

    slicer.slider_pressed_at(90.0);
    slicer.slider_moved(60.0);
    slicer.slider_cancelled();
    assert_eq!(slicer.surface().slider, ScaledValue::FULL);
    assert!(!slicer.slider().is_dragging());
    assert_eq!(host.filter_count(), 0);
}

#[test]
fn test_text_commit_issues_filter() {
    let (mut slicer, host) = slicer();
    update(&mut slicer, numeric_snapshot(100, SettingsBag::new()), VIEWPORT);

    assert_eq!(slicer.text_focused(Bound::Start), "");
    slicer.text_edited(Bound::Start, "10");
    assert!(matches!(
        slicer.text_committed(Bound::Start),
        CommitOutcome::Committed(Some(v)) if v == 10.0
    ));

    assert_eq!(host.filter_count(), 1);
    assert_eq!(slicer.behavior().range().value().min, Some(10.0));
    assert_eq!(slicer.surface().input(Bound::Start), "10");
    assert_eq!(slicer.surface().slider.min, 10.0 / 99.0 * 100.0);
}

#[test]
fn test_invalid_text_reverts_without_filter() {
    let (mut slicer, host) = slicer();
    update(&mut slicer, numeric_snapshot(100, SettingsBag::new()), VIEWPORT);

    slicer.text_focused(Bound::Start);
    slicer.text_edited(Bound::Start, "10");
    slicer.text_committed(Bound::Start);
    assert_eq!(host.filter_count(), 1);
    let renders = slicer.table_view().render_count();

    slicer.text_focused(Bound::Start);
    slicer.text_edited(Bound::Start, "abc");
    assert!(matches!(
        slicer.text_committed(Bound::Start),
        CommitOutcome::Reverted(_)
    ));

    assert_eq!(host.filter_count(), 1);
    assert_eq!(slicer.table_view().render_count(), renders);
    assert_eq!(slicer.surface().input(Bound::Start), "10");
    assert_eq!(slicer.behavior().range().value().min, Some(10.0));
}

#[test]
fn test_empty_text_clears_bound() {
    let (mut slicer, host) = slicer();
    update(&mut slicer, numeric_snapshot(100, SettingsBag::new()), VIEWPORT);

    slicer.text_edited(Bound::End, "50");
    slicer.text_committed(Bound::End);
    slicer.text_edited(Bound::End, "");
    assert!(matches!(
        slicer.text_committed(Bound::End),
        CommitOutcome::Committed(None)
    ));

    assert_eq!(host.filter_count(), 2);
    assert_eq!(slicer.behavior().range().value().max, None);
    assert!(host.last_filter().unwrap().is_clear());
    assert_eq!(host.persisted("rangeSelectionEnd").as_deref(), Some(""));
}

#[test]
fn test_persisted_range_is_restored() {
    let (mut slicer, host) = slicer();
    let mut bag = SettingsBag::new();
    bag.set("general.rangeSelectionStart", "20");
    bag.set("general.rangeSelectionEnd", "40");

    update(&mut slicer, numeric_snapshot(100, bag), VIEWPORT);

    assert_eq!(
        slicer.behavior().range().value(),
        RangeValue::new(Some(20.0), Some(40.0))
    );
    assert_eq!(slicer.surface().input(Bound::Start), "20");
    assert_eq!(slicer.surface().input(Bound::End), "40");
    let in_range = slicer
        .data()
        .unwrap()
        .data_points
        .iter()
        .filter(|point| point.is_selected_range_point)
        .count();
    assert_eq!(in_range, 21);

    // Restoring is not a new commit
    assert_eq!(host.filter_count(), 0);
}

#[test]
fn test_user_commit_wins_over_stale_persisted_range() {
    let (mut slicer, _host) = slicer();
    let mut bag = SettingsBag::new();
    bag.set("general.rangeSelectionStart", "20");

    update(&mut slicer, numeric_snapshot(100, bag.clone()), VIEWPORT);
    slicer.text_edited(Bound::Start, "30");
    slicer.text_committed(Bound::Start);

    // The host has not echoed the new bound yet
    update(&mut slicer, numeric_snapshot(100, bag), VIEWPORT);
    assert_eq!(slicer.behavior().range().value().min, Some(30.0));
}

#[test]
fn test_collapsed_domain_pins_controls() {
    let (mut slicer, _host) = slicer();
    update(
        &mut slicer,
        snapshot(&[("a", 5.0), ("b", 5.0)], SettingsBag::new()),
        VIEWPORT,
    );

    assert!(slicer.behavior().range().is_collapsed());
    assert_eq!(slicer.surface().slider, ScaledValue::COLLAPSED);
    assert_eq!(slicer.surface().input(Bound::Start), "5");
    assert_eq!(slicer.surface().input(Bound::End), "5");

    // Widening the domain releases the pinned bounds
    update(
        &mut slicer,
        snapshot(&[("a", 5.0), ("b", 9.0)], SettingsBag::new()),
        VIEWPORT,
    );
    assert_eq!(slicer.behavior().range().value(), RangeValue::UNBOUNDED);
    assert_eq!(slicer.surface().slider, ScaledValue::FULL);
    assert_eq!(slicer.surface().input(Bound::Start), "");
}

#[test]
fn test_domain_shrink_clamps_range() {
    let (mut slicer, _host) = slicer();
    update(&mut slicer, numeric_snapshot(100, SettingsBag::new()), VIEWPORT);
    slicer.text_edited(Bound::Start, "60");
    slicer.text_committed(Bound::Start);
    slicer.text_edited(Bound::End, "70");
    slicer.text_committed(Bound::End);

    update(&mut slicer, numeric_snapshot(31, SettingsBag::new()), VIEWPORT);
    let value = slicer.behavior().range().value();
    assert_eq!(value, RangeValue::new(Some(30.0), Some(30.0)));
}

#[test]
fn test_text_commit_before_data_is_discarded() {
    let (mut slicer, host) = slicer();

    assert_eq!(slicer.text_focused(Bound::Start), "");
    slicer.text_edited(Bound::Start, "10");
    assert!(matches!(
        slicer.text_committed(Bound::Start),
        CommitOutcome::Discarded
    ));

    assert_eq!(host.filter_count(), 0);
    assert!(host.persisted("rangeSelectionStart").is_none());
    assert_eq!(slicer.surface().input(Bound::Start), "");
    assert_eq!(slicer.input(Bound::Start).state(), &InputState::Idle);
    assert_eq!(slicer.input(Bound::Start).last_valid(), None);
    assert_eq!(slicer.behavior().range().value(), RangeValue::UNBOUNDED);
}

#[test]
fn test_slider_release_before_data_cancels_drag() {
    let (mut slicer, host) = slicer();

    assert!(slicer.slider_pressed(Handle::Lower));
    slicer.slider_moved(40.0);
    assert_eq!(slicer.surface().slider, ScaledValue::new(40.0, 100.0));

    assert!(!slicer.slider_released());
    assert_eq!(host.filter_count(), 0);
    assert!(!slicer.slider().is_dragging());
    assert_eq!(slicer.surface().slider, ScaledValue::FULL);
    assert_eq!(slicer.behavior().range().value(), RangeValue::UNBOUNDED);
}

#[test]
fn test_commits_after_empty_snapshot_are_discarded() {
    let (mut slicer, host) = slicer();
    update(&mut slicer, numeric_snapshot(10, SettingsBag::new()), VIEWPORT);
    slicer.text_edited(Bound::Start, "3");
    slicer.text_committed(Bound::Start);
    assert_eq!(host.filter_count(), 1);

    update(&mut slicer, snapshot::<f64>(&[], SettingsBag::new()), VIEWPORT);
    assert!(slicer.behavior().range().domain().is_none());
    assert_eq!(slicer.behavior().column_target(), &FilterColumnTarget::default());
    assert_eq!(slicer.surface().slider, ScaledValue::FULL);

    slicer.slider_pressed(Handle::Lower);
    slicer.slider_moved(50.0);
    assert!(!slicer.slider_released());

    slicer.text_edited(Bound::End, "5");
    assert!(matches!(
        slicer.text_committed(Bound::End),
        CommitOutcome::Discarded
    ));

    assert_eq!(host.filter_count(), 1);
    assert_eq!(slicer.surface().input(Bound::End), "");
    assert_eq!(slicer.surface().input(Bound::Start), "3");
    assert_eq!(
        slicer.behavior().range().value(),
        RangeValue::new(Some(3.0), None)
    );

    // Commits work again once data is back
    update(&mut slicer, numeric_snapshot(10, SettingsBag::new()), VIEWPORT);
    slicer.text_edited(Bound::End, "5");
    slicer.text_committed(Bound::End);
    assert_eq!(host.filter_count(), 2);
    let filter = host.last_filter().unwrap();
    assert_eq!(filter.target.column, "Amount");
    assert_eq!(filter.conditions.len(), 2);
}

#[test]
fn test_controls_resync_only_when_range_changes() {
    let (mut slicer, _host) = slicer();
    update(&mut slicer, numeric_snapshot(100, SettingsBag::new()), VIEWPORT);
    let slider_updates = slicer.surface().slider_updates;

    // Searching and refreshing with the same domain leave the range alone
    slicer.set_search_text("k1");
    update(&mut slicer, numeric_snapshot(100, SettingsBag::new()), VIEWPORT);
    assert_eq!(slicer.surface().slider_updates, slider_updates);

    slicer.text_edited(Bound::Start, "50");
    slicer.text_committed(Bound::Start);
    assert_eq!(slicer.surface().slider_updates, slider_updates + 1);
    assert_eq!(slicer.surface().slider, ScaledValue::new(50.0 / 99.0 * 100.0, 100.0));
}
