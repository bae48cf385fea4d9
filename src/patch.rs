//! Sparse field updates.
//!
//! A [`FieldPatch`] names only the attributes it changes. Merging overwrites
//! exactly those attributes; list-valued attributes (options, table columns
//! and rows, panel children) are replaced wholesale. Keys that do not apply
//! to the target's kind are ignored, so one patch shape serves every kind.

#[cfg(test)]
#[path = "patch_test.rs"]
mod patch_test;

use serde::{Deserialize, Serialize};

use crate::field::{
    Answer, ChoiceLayout, ChoiceOption, DateFormat, Field, FieldBody, OrdinalStyle, TableColumn, TableRow, Width,
};

/// Sparse update for a field. Only present attributes are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldPatch {
    // Common
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_label: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_bold: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_italic: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_underline: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label_size: Option<u8>,
    /// An empty string clears the helper text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Width>,

    // Text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underline: Option<bool>,

    // Description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    // Choice
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<ChoiceOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout: Option<ChoiceLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ordinal: Option<OrdinalStyle>,

    // Date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_format: Option<DateFormat>,

    // Table
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<TableColumn>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<TableRow>>,

    // Panel
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Field>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns_per_row: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_layout: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_panel_label: Option<bool>,

    // Answer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Answer>,
}

fn set<T>(slot: &mut T, incoming: Option<&T>)
where
    T: Clone,
{
    if let Some(v) = incoming {
        slot.clone_from(v);
    }
}

impl FieldPatch {
    /// Patch that only replaces the stored answer.
    #[must_use]
    pub fn value(answer: Answer) -> Self {
        Self { value: Some(answer), ..Default::default() }
    }

    /// Whether the patch names no attribute at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge this patch into `field`.
    ///
    /// The field's id and kind are never touched. An answer of the wrong shape
    /// for the kind (a list for a text field, a single string for checkboxes)
    /// is ignored.
    pub(crate) fn apply_to(&self, field: &mut Field) {
        set(&mut field.label, self.label.as_ref());
        set(&mut field.required, self.required.as_ref());
        set(&mut field.show_label, self.show_label.as_ref());
        set(&mut field.label_style.bold, self.label_bold.as_ref());
        set(&mut field.label_style.italic, self.label_italic.as_ref());
        set(&mut field.label_style.underline, self.label_underline.as_ref());
        set(&mut field.label_style.size, self.label_size.as_ref());
        set(&mut field.width, self.width.as_ref());
        if let Some(helper) = &self.helper_text {
            field.helper_text = if helper.is_empty() { None } else { Some(helper.clone()) };
        }

        match &mut field.body {
            FieldBody::Text(text) => {
                set(&mut text.placeholder, self.placeholder.as_ref());
                set(&mut text.underline, self.underline.as_ref());
                if let Some(Answer::One(v)) = &self.value {
                    text.value.clone_from(v);
                }
            }
            FieldBody::Description(desc) => {
                set(&mut desc.content, self.content.as_ref());
            }
            FieldBody::Radio(choice) | FieldBody::Select(choice) => {
                set(&mut choice.options, self.options.as_ref());
                set(&mut choice.layout, self.layout.as_ref());
                set(&mut choice.ordinal, self.ordinal.as_ref());
                if let Some(Answer::One(v)) = &self.value {
                    choice.value.clone_from(v);
                }
            }
            FieldBody::Checkbox(choice) => {
                set(&mut choice.options, self.options.as_ref());
                set(&mut choice.layout, self.layout.as_ref());
                set(&mut choice.ordinal, self.ordinal.as_ref());
                if let Some(Answer::Many(v)) = &self.value {
                    choice.value.clone_from(v);
                }
            }
            FieldBody::Date(date) => {
                set(&mut date.format, self.date_format.as_ref());
                if let Some(Answer::One(v)) = &self.value {
                    date.value.clone_from(v);
                }
            }
            FieldBody::Signature => {}
            FieldBody::Table(table) => {
                set(&mut table.columns, self.columns.as_ref());
                set(&mut table.rows, self.rows.as_ref());
            }
            FieldBody::Panel(panel) => {
                set(&mut panel.children, self.children.as_ref());
                set(&mut panel.columns_per_row, self.columns_per_row.as_ref());
                set(&mut panel.rows_layout, self.rows_layout.as_ref());
                set(&mut panel.background_color, self.background_color.as_ref());
                set(&mut panel.border_color, self.border_color.as_ref());
                set(&mut panel.padding, self.padding.as_ref());
                set(&mut panel.show_panel_label, self.show_panel_label.as_ref());
            }
        }
    }
}
