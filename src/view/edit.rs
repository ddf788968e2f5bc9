use crate::model::{Name, Record};

/// Values held by the four inputs of the edit form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditFields {
    pub first_name: String,
    pub last_name: String,
    pub about: String,
    pub eye_color: String,
}

impl EditFields {
    pub fn from_record(record: &Record) -> Self {
        Self {
            first_name: record.name.first_name.clone(),
            last_name: record.name.last_name.clone(),
            about: record.about.clone(),
            eye_color: record.eye_color.clone(),
        }
    }

    /// Overwrites everything but the id. No validation; empty strings are kept.
    pub fn apply_to(&self, record: &mut Record) {
        record.name = Name {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
        };
        record.about = self.about.clone();
        record.eye_color = self.eye_color.clone();
    }
}

/// Field changes submitted with a save. `None` keeps the pre-filled value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub about: Option<String>,
    pub eye_color: Option<String>,
}

impl EditPatch {
    pub fn merge_into(self, fields: &mut EditFields) {
        if let Some(v) = self.first_name {
            fields.first_name = v;
        }
        if let Some(v) = self.last_name {
            fields.last_name = v;
        }
        if let Some(v) = self.about {
            fields.about = v;
        }
        if let Some(v) = self.eye_color {
            fields.eye_color = v;
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditForm {
    visible: bool,
    fields: EditFields,
}

impl EditForm {
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn fields(&self) -> &EditFields {
        &self.fields
    }

    pub(super) fn fields_mut(&mut self) -> &mut EditFields {
        &mut self.fields
    }

    pub(super) fn open(&mut self, record: &Record) {
        self.fields = EditFields::from_record(record);
        self.visible = true;
    }

    pub(super) fn hide(&mut self) {
        self.visible = false;
    }
}
