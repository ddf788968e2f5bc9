use crate::model::Column;

/// Per-column hidden flags. `true` means hidden.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColumnVisibility {
    hidden: [bool; 4],
}

impl ColumnVisibility {
    pub fn is_hidden(&self, column: Column) -> bool {
        self.hidden[column.index()]
    }

    pub fn set_hidden(&mut self, column: Column, hidden: bool) {
        self.hidden[column.index()] = hidden;
    }

    pub fn toggle(&mut self, column: Column) {
        let slot = &mut self.hidden[column.index()];
        *slot = !*slot;
    }

    pub fn visible_columns(&self) -> Vec<Column> {
        Column::ALL
            .into_iter()
            .filter(|c| !self.is_hidden(*c))
            .collect()
    }

    pub fn button_label(&self, column: Column) -> String {
        let action = if self.is_hidden(column) {
            "Show column"
        } else {
            "Hide column"
        };
        format!("{action} \"{}\"", column.title())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HideButton {
    pub column: Column,
    pub hidden: bool,
    pub label: String,
}

pub fn render_hide_buttons(visibility: &ColumnVisibility) -> Vec<HideButton> {
    Column::ALL
        .into_iter()
        .map(|column| HideButton {
            column,
            hidden: visibility.is_hidden(column),
            label: visibility.button_label(column),
        })
        .collect()
}
