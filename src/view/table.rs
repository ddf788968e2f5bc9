use crate::model::{Column, Record, RecordId};

use super::pagination::page_window;
use super::sort::{sort_rows, SortDirection, SortSpec};
use super::visibility::ColumnVisibility;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderCell {
    pub column: Column,
    pub label: &'static str,
    pub active: bool,
    pub sorted_to_high: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellView {
    pub column: Column,
    pub text: String,
}

impl CellView {
    /// Eye colour cells paint a swatch with the raw value; bad colours just don't show.
    pub fn swatch(&self) -> Option<&str> {
        (self.column == Column::EyeColor).then_some(self.text.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RowView {
    pub id: RecordId,
    pub cells: Vec<CellView>,
}

impl RowView {
    pub fn cell(&self, column: Column) -> Option<&CellView> {
        self.cells.iter().find(|c| c.column == column)
    }
}

pub fn render_head(visibility: &ColumnVisibility, sort: Option<SortSpec>) -> Vec<HeaderCell> {
    visibility
        .visible_columns()
        .into_iter()
        .map(|column| {
            let sorted = sort.filter(|s| s.column == column);
            HeaderCell {
                column,
                label: column.title(),
                active: sorted.is_some(),
                sorted_to_high: sorted.is_some_and(|s| s.direction == SortDirection::Ascending),
            }
        })
        .collect()
}

pub fn render_row(record: &Record, visibility: &ColumnVisibility) -> RowView {
    RowView {
        id: record.id.clone(),
        cells: visibility
            .visible_columns()
            .into_iter()
            .map(|column| CellView {
                column,
                text: record.field(column).to_string(),
            })
            .collect(),
    }
}

/// Rows of `page`, ordered by `sort` when one is active, otherwise in data order.
pub fn render_body(
    page: usize,
    data: &[Record],
    visibility: &ColumnVisibility,
    sort: Option<SortSpec>,
) -> Vec<RowView> {
    let mut rows: Vec<&Record> = data[page_window(page, data.len())].iter().collect();
    if let Some(spec) = sort {
        sort_rows(&mut rows, spec);
    }
    rows.into_iter()
        .map(|record| render_row(record, visibility))
        .collect()
}
