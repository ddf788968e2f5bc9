use crate::model::{Record, RecordId};

use super::pagination::compute_page_count;
use super::sort::SortSpec;
use super::visibility::ColumnVisibility;

/// Everything the table view knows at runtime. Owned by [`super::TableViewModel`].
#[derive(Clone, Debug)]
pub struct ApplicationState {
    pub(super) data: Vec<Record>,
    pub(super) row_edit: Option<RecordId>,
    pub(super) pages_quantity: usize,
    pub(super) page: usize,
    pub(super) visibility: ColumnVisibility,
    pub(super) sort: Option<SortSpec>,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self {
            data: Vec::new(),
            row_edit: None,
            pages_quantity: 0,
            page: 1,
            visibility: ColumnVisibility::default(),
            sort: None,
        }
    }
}

impl ApplicationState {
    pub fn data(&self) -> &[Record] {
        &self.data
    }

    pub fn row_edit(&self) -> Option<&RecordId> {
        self.row_edit.as_ref()
    }

    pub fn pages_quantity(&self) -> usize {
        self.pages_quantity
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn visibility(&self) -> &ColumnVisibility {
        &self.visibility
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Appends loaded records; existing ones are kept.
    pub fn append_data(&mut self, records: impl IntoIterator<Item = Record>) {
        self.data.extend(records);
        self.pages_quantity = compute_page_count(self.data.len());
        self.page = self.page.clamp(1, self.pages_quantity.max(1));
    }

    pub fn record(&self, id: &RecordId) -> Option<&Record> {
        self.data.iter().find(|r| &r.id == id)
    }

    pub(super) fn record_mut(&mut self, id: &RecordId) -> Option<&mut Record> {
        self.data.iter_mut().find(|r| &r.id == id)
    }
}
