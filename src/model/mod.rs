use std::fmt;

use serde::{Deserialize, Serialize};

/// Identity of a record. Never changes once loaded.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name {
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub name: Name,
    pub about: String,
    #[serde(rename = "eyeColor")]
    pub eye_color: String,
}

impl Record {
    /// Text shown in the cell for `column`. Sorting compares exactly this.
    pub fn field(&self, column: Column) -> &str {
        match column {
            Column::Name => &self.name.first_name,
            Column::Surname => &self.name.last_name,
            Column::About => &self.about,
            Column::EyeColor => &self.eye_color,
        }
    }
}

/// The four table columns, in their fixed display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Surname,
    About,
    EyeColor,
}

impl Column {
    pub const ALL: [Column; 4] = [
        Column::Name,
        Column::Surname,
        Column::About,
        Column::EyeColor,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "name" | "firstname" | "first-name" | "first" => Some(Self::Name),
            "surname" | "lastname" | "last-name" | "last" => Some(Self::Surname),
            "about" | "description" => Some(Self::About),
            "eyecolor" | "eye-color" | "eye_color" | "eye" => Some(Self::EyeColor),
            _ => None,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Column::Name => 0,
            Column::Surname => 1,
            Column::About => 2,
            Column::EyeColor => 3,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Surname => "surname",
            Column::About => "about",
            Column::EyeColor => "eyeColor",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Column::Name => "Name",
            Column::Surname => "Surname",
            Column::About => "About",
            Column::EyeColor => "Eye color",
        }
    }

    /// Class carried by header and body cells of this column.
    pub fn cell_class(self) -> &'static str {
        match self {
            Column::Name => "table__name",
            Column::Surname => "table__surname",
            Column::About => "table__about",
            Column::EyeColor => "table__eyeColor",
        }
    }

    pub fn hide_class(self) -> &'static str {
        match self {
            Column::Name => "hide__name",
            Column::Surname => "hide__surname",
            Column::About => "hide__about",
            Column::EyeColor => "hide__eyeColor",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
