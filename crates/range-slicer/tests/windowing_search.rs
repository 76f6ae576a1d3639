//! Integration tests for the windowed item list and the prefix search.

mod common;

use common::{fixed_rows_bag, numeric_snapshot, slicer, snapshot, update};
use range_slicer::settings::SettingsBag;
use range_slicer::view::{Flow, Viewport};

#[test]
fn test_only_visible_rows_are_materialized() {
    let (mut slicer, _host) = slicer();

    // 400px of list below the header at 20px per row
    update(&mut slicer, numeric_snapshot(1000, fixed_rows_bag(20.0)), Viewport::new(300.0, 520.0));

    let surface = slicer.surface();
    assert_eq!(surface.entered, 20);
    assert_eq!(surface.updated, 0);
    assert_eq!(surface.rows.len(), 20);
    assert_eq!(slicer.table_view().len(), 1000);
}

#[test]
fn test_scrolling_reuses_rows_by_key() {
    let (mut slicer, _host) = slicer();
    update(&mut slicer, numeric_snapshot(1000, fixed_rows_bag(20.0)), Viewport::new(300.0, 520.0));
    slicer.surface_mut().reset_counts();

    slicer.scroll_to(0.0, 100.0);
    let surface = slicer.surface();
    assert_eq!(surface.entered, 5);
    assert_eq!(surface.updated, 15);
    assert_eq!(surface.exited, 5);
    assert_eq!(surface.rows.keys().next(), Some(&5));
    assert_eq!(surface.rows.keys().last(), Some(&24));
}

#[test]
fn test_rows_are_keyed_by_full_list_index() {
    let (mut slicer, _host) = slicer();
    let rows = [("a", "apple"), ("b", "banana"), ("c", "avocado")];
    update(&mut slicer, snapshot(&rows, SettingsBag::new()), Viewport::new(300.0, 400.0));

    slicer.set_search_text("a");
    let keys: Vec<usize> = slicer.surface().rows.keys().copied().collect();
    assert_eq!(keys, vec![0, 2]);
}

#[test]
fn test_search_is_case_insensitive_prefix() {
    let (mut slicer, host) = slicer();
    let rows = [("1", "abc"), ("2", "xab"), ("3", "ABD"), ("4", "b")];
    update(&mut slicer, snapshot(&rows, SettingsBag::new()), Viewport::new(300.0, 400.0));
    assert_eq!(slicer.surface().categories(), vec!["abc", "xab", "ABD", "b"]);

    slicer.set_search_text("ab");
    assert_eq!(slicer.surface().categories(), vec!["abc", "ABD"]);

    slicer.set_search_text("abc");
    assert_eq!(slicer.surface().categories(), vec!["abc"]);

    slicer.set_search_text("");
    assert_eq!(slicer.surface().rows.len(), 4);

    // Searching narrows the list only; it never issues a filter
    assert_eq!(host.filter_count(), 0);
}

#[test]
fn test_search_survives_refresh() {
    let (mut slicer, _host) = slicer();
    let rows = [("1", "abc"), ("2", "xab")];
    let viewport = Viewport::new(300.0, 400.0);
    update(&mut slicer, snapshot(&rows, SettingsBag::new()), viewport);

    slicer.set_search_text("x");
    update(&mut slicer, snapshot(&rows, SettingsBag::new()), viewport);
    assert_eq!(slicer.search_text(), "x");
    assert_eq!(slicer.surface().categories(), vec!["xab"]);
}

#[test]
fn test_grid_layout_from_settings() {
    let (mut slicer, _host) = slicer();
    let mut bag = fixed_rows_bag(20.0);
    bag.set("general.columns", 3u32);

    update(&mut slicer, numeric_snapshot(100, bag), Viewport::new(317.0, 320.0));
    let view = slicer.table_view();
    assert_eq!(view.flow(), Flow::Vertical);
    assert_eq!(view.computed_columns(), 3);
    assert_eq!(view.cell_width(), 100.0);

    // 200px of list: 10 grid rows of 3
    assert_eq!(slicer.surface().rows.len(), 30);
}

#[test]
fn test_horizontal_flow_from_settings() {
    let (mut slicer, _host) = slicer();
    let mut bag = fixed_rows_bag(20.0);
    bag.set("general.columns", 0u32);
    bag.set("general.rows", 2u32);
    bag.set("slicerText.width", 50.0);

    update(&mut slicer, numeric_snapshot(100, bag), Viewport::new(217.0, 320.0));
    let view = slicer.table_view();
    assert_eq!(view.flow(), Flow::Horizontal);

    // 200px wide at 50px per column, 2 items per column
    assert_eq!(slicer.surface().rows.len(), 8);
}

#[test]
fn test_blank_values_are_labelled() {
    let (mut slicer, _host) = slicer();
    let rows = [
        ("a", range_slicer::snapshot::RawValue::Number(1.0)),
        ("b", range_slicer::snapshot::RawValue::Null),
    ];
    update(&mut slicer, snapshot(&rows, SettingsBag::new()), Viewport::new(300.0, 400.0));
    assert_eq!(slicer.surface().categories(), vec!["1", "(Blank)"]);
}

#[test]
fn test_unbounded_viewport_grid_renders_all_rows() {
    let (mut slicer, _host) = slicer();
    let mut bag = fixed_rows_bag(20.0);
    bag.set("general.columns", 3u32);

    update(&mut slicer, numeric_snapshot(100, bag), Viewport::new(300.0, f64::INFINITY));
    assert_eq!(slicer.table_view().visible_range(), 0..100);
    assert_eq!(slicer.surface().rows.len(), 100);
}

#[test]
fn test_item_style_follows_settings() {
    let (mut slicer, _host) = slicer();
    let mut bag = fixed_rows_bag(20.0);
    bag.set("general.columns", 3u32);
    bag.set("slicerText.padding", 6.0);
    bag.set("headerText.marginTop", 4.0);
    bag.set("slicerItemContainer.marginLeft", 2.0);

    update(&mut slicer, numeric_snapshot(10, bag), Viewport::new(317.0, 320.0));
    let style = slicer.surface().item_style.unwrap();
    assert_eq!(style.padding, 6.0);
    assert_eq!(style.header_margin_top, 4.0);
    assert_eq!(style.header_margin_left, 8.0);
    assert_eq!(style.item_margin_left, 2.0);
    // 100px cells less chiclet padding and borders
    assert_eq!(style.label_max_width, 84.0);

    // Resizing re-derives the label width
    slicer.update(range_slicer::UpdateOptions::new(Viewport::new(617.0, 320.0)));
    assert_eq!(slicer.surface().item_style.unwrap().label_max_width, 184.0);
}
