use std::path::PathBuf;

use crate::app::{execute_render, RenderConfig};
use crate::loader::{parse_records, DataSource, LoadOptions, MalformedPolicy};
use crate::model::{Column, Name, Record, RecordId};
use crate::output;
use crate::view::edit::EditPatch;
use crate::view::{Event, Outcome, TableViewModel};

fn record(id: usize) -> Record {
    Record {
        id: RecordId::new(id.to_string()),
        name: Name {
            first_name: format!("First{id:02}"),
            last_name: format!("Last{:02}", 99 - id),
        },
        about: format!("about {id}"),
        eye_color: ["blue", "brown", "green"][id % 3].to_string(),
    }
}

fn dataset(n: usize) -> Vec<Record> {
    (0..n).map(record).collect()
}

fn render_config(source: DataSource, output: Option<PathBuf>) -> RenderConfig {
    RenderConfig {
        source,
        load: LoadOptions::default(),
        events_path: None,
        page: None,
        hidden: Vec::new(),
        sort: None,
        output,
        title: "Records".to_string(),
    }
}

#[test]
fn empty_dataset_renders_no_page_controls_and_no_rows() {
    let vm = TableViewModel::with_records(Vec::new());
    assert_eq!(vm.state().pages_quantity(), 0);
    assert!(vm.page_links().is_empty());
    assert!(vm.body().is_empty());
    let html = output::report::render_document(&vm.render_app(), "Records");
    assert!(!html.contains(r#"class="pages__page"#));
    assert!(!html.contains("<tr id="));
}

#[test]
fn page_switch_shows_clipped_last_window() {
    let mut vm = TableViewModel::with_records(dataset(25));
    assert_eq!(vm.page_links().len(), 3);
    assert!(vm.dispatch(Event::SwitchPage(3)).is_applied());
    let ids: Vec<_> = vm.body().into_iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, vec!["20", "21", "22", "23", "24"]);
    let active: Vec<_> = vm.page_links().into_iter().filter(|l| l.active).collect();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].number, 3);
}

#[test]
fn double_toggle_restores_rendered_columns() {
    let mut vm = TableViewModel::with_records(dataset(3));
    let before = vm.render_app();
    vm.dispatch(Event::ToggleColumn(Column::Surname));
    let hidden = vm.render_app();
    assert!(hidden.head.iter().all(|h| h.column != Column::Surname));
    assert!(hidden.body.iter().all(|r| r.cell(Column::Surname).is_none()));
    assert!(hidden.hide_buttons[1].label.starts_with("Show column"));
    vm.dispatch(Event::ToggleColumn(Column::Surname));
    assert_eq!(vm.render_app(), before);
}

#[test]
fn descending_is_reverse_of_ascending_on_distinct_keys() {
    let mut vm = TableViewModel::with_records(dataset(10));
    vm.dispatch(Event::SortBy(Column::Surname));
    let asc: Vec<_> = vm.body().into_iter().map(|r| r.id).collect();
    assert_eq!(asc.first().map(RecordId::as_str), Some("9"));
    let head = vm.head();
    assert!(head[1].active && head[1].sorted_to_high);

    vm.dispatch(Event::SortBy(Column::Surname));
    let mut desc: Vec<_> = vm.body().into_iter().map(|r| r.id).collect();
    let head = vm.head();
    assert!(head[1].active && !head[1].sorted_to_high);
    desc.reverse();
    assert_eq!(desc, asc);
}

#[test]
fn toggle_after_sort_restores_data_order() {
    let mut vm = TableViewModel::with_records(dataset(10));
    vm.dispatch(Event::SortBy(Column::Surname));
    vm.dispatch(Event::ToggleColumn(Column::About));
    let ids: Vec<_> = vm.body().into_iter().map(|r| r.id.to_string()).collect();
    let expected: Vec<_> = (0..10).map(|i| i.to_string()).collect();
    assert_eq!(ids, expected);
    assert_eq!(vm.state().sort(), None);
}

#[test]
fn page_switch_after_sort_resets_indicators() {
    let mut vm = TableViewModel::with_records(dataset(15));
    vm.dispatch(Event::SortBy(Column::Name));
    vm.dispatch(Event::SwitchPage(2));
    assert!(vm.head().iter().all(|h| !h.active));
}

#[test]
fn editing_updates_only_the_target_record() {
    let body = r#"[
        {"id":"4","name":{"firstName":"Max","lastName":"Ode"},"about":"y","eyeColor":"green"},
        {"id":"5","name":{"firstName":"Ann","lastName":"Lee"},"about":"x","eyeColor":"blue"}
    ]"#;
    let records = parse_records(body, MalformedPolicy::Reject).unwrap();
    let untouched = records[0].clone();
    let mut vm = TableViewModel::with_records(records);

    assert!(vm.dispatch(Event::OpenEdit(RecordId::from("5"))).is_applied());
    assert_eq!(vm.form().fields().first_name, "Ann");
    assert_eq!(vm.state().row_edit(), Some(&RecordId::from("5")));

    let outcome = vm.dispatch(Event::SaveEdit(EditPatch {
        first_name: Some("Anna".to_string()),
        ..Default::default()
    }));
    let Outcome::Applied(regions) = outcome else {
        panic!("save was ignored");
    };
    assert_eq!(regions.row, Some(RecordId::from("5")));
    assert!(regions.edit_form);

    let data = vm.state().data();
    assert_eq!(data[0], untouched);
    assert_eq!(data[1].id.as_str(), "5");
    assert_eq!(data[1].name.first_name, "Anna");
    assert_eq!(data[1].name.last_name, "Lee");
    assert_eq!(data[1].about, "x");
    assert_eq!(data[1].eye_color, "blue");

    assert!(!vm.form().is_visible());
    let row = vm.row(&RecordId::from("5")).unwrap();
    assert!(output::render_row(&row).contains("<p>Anna</p>"));

    let fragments = output::render_regions(&vm.render_app(), &regions);
    assert!(fragments.iter().any(|(sel, html)| sel == r#"tr[id="5"]"# && html.contains("Anna")));
    assert!(fragments
        .iter()
        .any(|(sel, html)| sel == ".edit" && html.starts_with(r#"<div class="edit">"#)));
}

#[tokio::test]
async fn load_failure_routes_to_error_and_renders_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("table.html");
    let run = render_config(
        DataSource::File(tmp.path().join("missing.json")),
        Some(out.clone()),
    );
    let err = execute_render(&run).await.unwrap_err();
    assert!(err.starts_with("failed to load data from"));
    assert!(!out.exists());
}

#[tokio::test]
async fn unparseable_data_is_a_load_failure() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data.json");
    tokio::fs::write(&data, "{not json").await.unwrap();
    let err = execute_render(&render_config(DataSource::File(data), None))
        .await
        .unwrap_err();
    assert!(err.contains("failed to parse data"));
}

#[tokio::test]
async fn render_applies_flags_then_event_script() {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data.json");
    let json = serde_json::to_string(&dataset(12)).unwrap();
    tokio::fs::write(&data, json).await.unwrap();
    let events = tmp.path().join("events.txt");
    tokio::fs::write(&events, "open 11\nsave first=Zoe\nopen nope\n")
        .await
        .unwrap();

    let mut run = render_config(DataSource::File(data), None);
    run.hidden = vec![Column::About];
    run.page = Some(2);
    run.events_path = Some(events.display().to_string());

    let (html, summary) = execute_render(&run).await.unwrap();
    assert_eq!(summary.records, 12);
    assert_eq!(summary.pages, 2);
    assert_eq!(summary.page, 2);
    assert_eq!(summary.applied, 4);
    assert_eq!(summary.ignored, 1);
    assert!(html.contains(r#"<tr id="11">"#));
    assert!(html.contains("<p>Zoe</p>"));
    assert!(!html.contains("table__about\""));
    assert!(html.contains(r#"<button class="hide__about" data-column="about">Show column &quot;About&quot;</button>"#));
}
