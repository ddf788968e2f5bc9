use std::cmp::Ordering;

use crate::model::{Column, Record};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub column: Column,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(column: Column) -> Self {
        Self {
            column,
            direction: SortDirection::Ascending,
        }
    }

    /// Header click transition. Only the clicked column can end up sorted.
    pub fn next(current: Option<SortSpec>, column: Column) -> SortSpec {
        match current {
            Some(spec) if spec.column == column && spec.direction == SortDirection::Ascending => {
                SortSpec {
                    column,
                    direction: SortDirection::Descending,
                }
            }
            _ => SortSpec::ascending(column),
        }
    }

    pub fn compare(&self, a: &Record, b: &Record) -> Ordering {
        let ordering = a.field(self.column).cmp(b.field(self.column));
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Case-sensitive, byte-wise ordering on the cell text. Stable.
pub fn sort_rows(rows: &mut [&Record], spec: SortSpec) {
    rows.sort_by(|a, b| spec.compare(a, b));
}
