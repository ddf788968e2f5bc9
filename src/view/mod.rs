//! The table view-model: state, event dispatch and derived views.

pub mod edit;
pub mod pagination;
pub mod sort;
pub mod state;
pub mod table;
pub mod visibility;

use log::{debug, warn};

use crate::model::{Column, Record, RecordId};

use self::edit::{EditForm, EditPatch};
use self::pagination::PageLink;
use self::sort::SortSpec;
use self::state::ApplicationState;
use self::table::{HeaderCell, RowView};
use self::visibility::HideButton;

/// A user interaction. Handlers are fixed; each reads state when it runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    SwitchPage(usize),
    ToggleColumn(Column),
    SortBy(Column),
    OpenEdit(RecordId),
    CancelEdit,
    SaveEdit(EditPatch),
}

/// Parts of the page that must be rebuilt after an event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderRegions {
    pub pagination: bool,
    pub hide_buttons: bool,
    pub head: bool,
    pub body: bool,
    pub edit_form: bool,
    pub row: Option<RecordId>,
}

impl RenderRegions {
    pub fn everything() -> Self {
        Self {
            pagination: true,
            hide_buttons: true,
            head: true,
            body: true,
            edit_form: true,
            row: None,
        }
    }

    fn table() -> Self {
        Self {
            head: true,
            body: true,
            ..Default::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    UnknownRecord(RecordId),
    PageOutOfRange(usize),
    ColumnHidden(Column),
    NoActiveEdit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Applied(RenderRegions),
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied(_))
    }
}

/// Full snapshot of what the page shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppView {
    pub page_links: Vec<PageLink>,
    pub hide_buttons: Vec<HideButton>,
    pub head: Vec<HeaderCell>,
    pub body: Vec<RowView>,
    pub form: EditForm,
}

#[derive(Clone, Debug, Default)]
pub struct TableViewModel {
    state: ApplicationState,
    form: EditForm,
}

impl TableViewModel {
    pub fn new(state: ApplicationState) -> Self {
        Self {
            state,
            form: EditForm::default(),
        }
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        let mut state = ApplicationState::default();
        state.append_data(records);
        Self::new(state)
    }

    pub fn state(&self) -> &ApplicationState {
        &self.state
    }

    pub fn form(&self) -> &EditForm {
        &self.form
    }

    pub fn dispatch(&mut self, event: Event) -> Outcome {
        debug!("dispatch {event:?}");
        let outcome = match event {
            Event::SwitchPage(page) => self.switch_page(page),
            Event::ToggleColumn(column) => self.toggle_column(column),
            Event::SortBy(column) => self.sort_by(column),
            Event::OpenEdit(id) => self.open_edit(id),
            Event::CancelEdit => self.cancel_edit(),
            Event::SaveEdit(patch) => self.save_edit(patch),
        };
        if let Outcome::Ignored(reason) = &outcome {
            warn!("ignored event: {reason:?}");
        }
        outcome
    }

    fn switch_page(&mut self, page: usize) -> Outcome {
        if page == 0 || page > self.state.pages_quantity {
            return Outcome::Ignored(IgnoreReason::PageOutOfRange(page));
        }
        self.state.page = page;
        // a full table render resets sorting
        self.state.sort = None;
        Outcome::Applied(RenderRegions {
            pagination: true,
            ..RenderRegions::table()
        })
    }

    fn toggle_column(&mut self, column: Column) -> Outcome {
        self.state.visibility.toggle(column);
        self.state.sort = None;
        Outcome::Applied(RenderRegions {
            hide_buttons: true,
            ..RenderRegions::table()
        })
    }

    fn sort_by(&mut self, column: Column) -> Outcome {
        // only rendered headers can be clicked
        if self.state.visibility.is_hidden(column) {
            return Outcome::Ignored(IgnoreReason::ColumnHidden(column));
        }
        self.state.sort = Some(SortSpec::next(self.state.sort, column));
        Outcome::Applied(RenderRegions::table())
    }

    fn open_edit(&mut self, id: RecordId) -> Outcome {
        let Some(record) = self.state.record(&id) else {
            return Outcome::Ignored(IgnoreReason::UnknownRecord(id));
        };
        self.form.open(record);
        self.state.row_edit = Some(id);
        Outcome::Applied(RenderRegions {
            edit_form: true,
            ..Default::default()
        })
    }

    fn cancel_edit(&mut self) -> Outcome {
        if !self.form.is_visible() {
            return Outcome::Ignored(IgnoreReason::NoActiveEdit);
        }
        self.form.hide();
        self.state.row_edit = None;
        Outcome::Applied(RenderRegions {
            edit_form: true,
            ..Default::default()
        })
    }

    fn save_edit(&mut self, patch: EditPatch) -> Outcome {
        let id = match self.state.row_edit.clone() {
            Some(id) if self.form.is_visible() => id,
            _ => return Outcome::Ignored(IgnoreReason::NoActiveEdit),
        };
        patch.merge_into(self.form.fields_mut());
        let Some(record) = self.state.record_mut(&id) else {
            self.form.hide();
            self.state.row_edit = None;
            return Outcome::Ignored(IgnoreReason::UnknownRecord(id));
        };
        self.form.fields().apply_to(record);
        self.form.hide();
        self.state.row_edit = None;
        Outcome::Applied(RenderRegions {
            edit_form: true,
            // an active sort may move the edited row
            body: self.state.sort.is_some(),
            row: Some(id),
            ..Default::default()
        })
    }

    pub fn page_links(&self) -> Vec<PageLink> {
        pagination::render_page_links(self.state.page, self.state.pages_quantity)
    }

    pub fn hide_buttons(&self) -> Vec<HideButton> {
        visibility::render_hide_buttons(&self.state.visibility)
    }

    pub fn head(&self) -> Vec<HeaderCell> {
        table::render_head(&self.state.visibility, self.state.sort)
    }

    pub fn body(&self) -> Vec<RowView> {
        table::render_body(
            self.state.page,
            &self.state.data,
            &self.state.visibility,
            self.state.sort,
        )
    }

    pub fn row(&self, id: &RecordId) -> Option<RowView> {
        self.state
            .record(id)
            .map(|r| table::render_row(r, &self.state.visibility))
    }

    pub fn render_app(&self) -> AppView {
        AppView {
            page_links: self.page_links(),
            hide_buttons: self.hide_buttons(),
            head: self.head(),
            body: self.body(),
            form: self.form.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Name;

    fn rec(id: &str, first: &str, last: &str) -> Record {
        Record {
            id: RecordId::from(id),
            name: Name {
                first_name: first.to_string(),
                last_name: last.to_string(),
            },
            about: format!("about {id}"),
            eye_color: "blue".to_string(),
        }
    }

    fn body_names(vm: &TableViewModel) -> Vec<String> {
        vm.body()
            .iter()
            .map(|r| r.cell(Column::Name).map(|c| c.text.clone()).unwrap_or_default())
            .collect()
    }

    fn sample() -> TableViewModel {
        TableViewModel::with_records(vec![
            rec("1", "Cid", "Zed"),
            rec("2", "Amy", "Yun"),
            rec("3", "Bea", "Xu"),
        ])
    }

    #[test]
    fn second_click_reverses_the_sort() {
        let mut vm = sample();
        vm.dispatch(Event::SortBy(Column::Name));
        let asc = body_names(&vm);
        assert_eq!(asc, vec!["Amy", "Bea", "Cid"]);
        vm.dispatch(Event::SortBy(Column::Name));
        let mut desc = body_names(&vm);
        desc.reverse();
        assert_eq!(desc, asc);
        assert_eq!(vm.state().data()[0].id.as_str(), "1");
    }

    #[test]
    fn toggling_a_column_discards_the_sort() {
        let mut vm = sample();
        vm.dispatch(Event::SortBy(Column::Name));
        assert_eq!(body_names(&vm), vec!["Amy", "Bea", "Cid"]);
        vm.dispatch(Event::ToggleColumn(Column::About));
        assert_eq!(vm.state().sort(), None);
        assert_eq!(body_names(&vm), vec!["Cid", "Amy", "Bea"]);
        assert!(vm.head().iter().all(|h| !h.active && !h.sorted_to_high));
    }

    #[test]
    fn hidden_column_cannot_be_sorted() {
        let mut vm = TableViewModel::with_records(vec![
            Record {
                about: "zzz".to_string(),
                ..rec("1", "Cid", "Zed")
            },
            Record {
                about: "aaa".to_string(),
                ..rec("2", "Amy", "Yun")
            },
        ]);
        vm.dispatch(Event::ToggleColumn(Column::About));
        let head_before = vm.head();
        assert_eq!(
            vm.dispatch(Event::SortBy(Column::About)),
            Outcome::Ignored(IgnoreReason::ColumnHidden(Column::About))
        );
        assert_eq!(vm.state().sort(), None);
        let ids: Vec<_> = vm.body().into_iter().map(|r| r.id.to_string()).collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert_eq!(vm.head(), head_before);
        assert!(vm.head().iter().all(|h| !h.active));
    }

    #[test]
    fn out_of_range_page_is_ignored() {
        let mut vm = sample();
        assert_eq!(
            vm.dispatch(Event::SwitchPage(2)),
            Outcome::Ignored(IgnoreReason::PageOutOfRange(2))
        );
        assert_eq!(vm.state().page(), 1);
    }

    #[test]
    fn unknown_row_lookup_is_ignored() {
        let mut vm = sample();
        let outcome = vm.dispatch(Event::OpenEdit(RecordId::from("missing")));
        assert_eq!(
            outcome,
            Outcome::Ignored(IgnoreReason::UnknownRecord(RecordId::from("missing")))
        );
        assert!(!vm.form().is_visible());
        assert!(vm.state().row_edit().is_none());
    }

    #[test]
    fn cancel_leaves_data_untouched() {
        let mut vm = sample();
        let before = vm.state().data().to_vec();
        vm.dispatch(Event::OpenEdit(RecordId::from("2")));
        assert!(vm.form().is_visible());
        assert_eq!(vm.form().fields().first_name, "Amy");
        assert!(vm.dispatch(Event::CancelEdit).is_applied());
        assert!(!vm.form().is_visible());
        assert_eq!(vm.state().data(), before.as_slice());
    }

    #[test]
    fn save_without_open_form_is_ignored() {
        let mut vm = sample();
        assert_eq!(
            vm.dispatch(Event::SaveEdit(EditPatch::default())),
            Outcome::Ignored(IgnoreReason::NoActiveEdit)
        );
    }

    #[test]
    fn save_accepts_empty_strings() {
        let mut vm = sample();
        vm.dispatch(Event::OpenEdit(RecordId::from("3")));
        vm.dispatch(Event::SaveEdit(EditPatch {
            about: Some(String::new()),
            ..Default::default()
        }));
        assert_eq!(vm.state().data()[2].about, "");
        assert_eq!(vm.state().data()[2].name.first_name, "Bea");
    }
}
