//! Rendering: maps fields to view trees and input changes back to updates.
//!
//! Rendering is pure. [`render_field`] reads a field, the current mode, the
//! preview answers and the selection, and produces a [`FieldView`] that the
//! host paints however it likes. Nothing here mutates state.
//!
//! The reverse direction is an [`InputChange`] reported by a control. In edit
//! mode it becomes a [`FieldPatch`] for the document ([`edit_patch`]); in
//! preview mode it becomes an answer update
//! ([`crate::preview::Answers::apply`]).

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

use crate::consts::APPENDED_TABLE_COLUMN_WIDTH;
use crate::doc::DocStore;
use crate::field::{
    Answer, ChoiceLayout, ChoiceOption, ChoiceProps, DateFormat, Field, FieldBody, FieldId, FieldKind, LabelStyle,
    PanelProps, TableColumn, TableRow, blank_row,
};
use crate::patch::FieldPatch;
use crate::preview::Answers;

const ISO_DATE: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const ISO_MINUTES: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]T[hour]:[minute]");
const ISO_SECONDS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");

/// Whether the form is being built or filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Controls write to the document; the selection is highlighted.
    #[default]
    Edit,
    /// Controls write to the preview answers.
    Preview,
}

/// A value change reported by a rendered control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "kebab-case")]
pub enum InputChange {
    /// New text of a text input.
    Text { text: String },
    /// Option chosen in a radio group or picker.
    Choose { value: String },
    /// Checkbox toggled.
    Toggle { value: String, checked: bool },
    /// Raw text of a date input.
    Date { text: String },
    /// New body of a description block.
    Content { text: String },
    /// Table cell edited.
    Cell { row: usize, column: String, text: String },
    AppendColumn,
    AppendRow,
}

/// Label line above a control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelView {
    pub text: String,
    pub required: bool,
    pub style: LabelStyle,
}

/// One option of a choice control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub label: String,
    pub value: String,
    pub checked: bool,
    /// Ordinal prefix such as `1.` or `a.`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
}

/// Child arrangement inside a panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "layout", rename_all = "lowercase")]
pub enum PanelLayout {
    Grid { columns: u8 },
    Stack,
}

/// Title bar of a panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelHeader {
    pub title: String,
    /// `"1 field"`, `"3 fields"`.
    pub count_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelView {
    /// Hidden when the panel's label bar is switched off.
    pub header: Option<PanelHeader>,
    pub layout: PanelLayout,
    pub background_color: String,
    pub border_color: String,
    pub padding: u8,
    pub children: Vec<FieldView>,
}

/// The interactive part of a rendered field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "control", rename_all = "kebab-case")]
pub enum Control {
    TextInput { value: String, placeholder: String, underline: bool },
    TextBlock { content: String, editable: bool },
    RadioGroup { options: Vec<OptionView>, layout: ChoiceLayout },
    CheckboxGroup { options: Vec<OptionView>, layout: ChoiceLayout },
    Picker { options: Vec<OptionView>, value: String },
    DateInput {
        /// ISO `YYYY-MM-DD`, or empty.
        value: String,
        /// `value` in the field's display format.
        display: Option<String>,
        format: DateFormat,
    },
    SignaturePad,
    Table { columns: Vec<TableColumn>, rows: Vec<TableRow>, editable: bool },
    Panel(PanelView),
}

/// A rendered field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldView {
    pub id: FieldId,
    pub kind: FieldKind,
    /// CSS width.
    pub width: String,
    pub selected: bool,
    pub label: Option<LabelView>,
    pub control: Control,
    pub helper_text: Option<String>,
}

/// Render one field, and its children if it is a panel.
///
/// In edit mode controls show the values stored on the node; in preview mode
/// they show `answers`. Selection is only highlighted in edit mode.
#[must_use]
pub fn render_field(field: &Field, mode: Mode, answers: &Answers, selected: Option<&FieldId>) -> FieldView {
    let current = match mode {
        Mode::Edit => field.value(),
        Mode::Preview => answers.get(&field.id).cloned(),
    };
    let control = match &field.body {
        FieldBody::Text(text) => Control::TextInput {
            value: one(current.as_ref()).to_owned(),
            placeholder: text.placeholder.clone(),
            underline: text.underline,
        },
        FieldBody::Description(desc) => {
            Control::TextBlock { content: desc.content.clone(), editable: mode == Mode::Edit }
        }
        FieldBody::Radio(choice) => {
            let chosen = one(current.as_ref());
            Control::RadioGroup { options: option_views(choice, |v| v == chosen), layout: choice.layout }
        }
        FieldBody::Checkbox(choice) => {
            let checked = many(current.as_ref());
            Control::CheckboxGroup {
                options: option_views(choice, |v| checked.iter().any(|c| c == v)),
                layout: choice.layout,
            }
        }
        FieldBody::Select(choice) => {
            let chosen = one(current.as_ref());
            Control::Picker { options: option_views(choice, |v| v == chosen), value: chosen.to_owned() }
        }
        FieldBody::Date(date) => {
            let value = one(current.as_ref()).to_owned();
            let display = parse_date(&value).map(|d| date.format.format(d));
            Control::DateInput { value, display, format: date.format }
        }
        FieldBody::Signature => Control::SignaturePad,
        FieldBody::Table(table) => {
            Control::Table { columns: table.columns.clone(), rows: table.rows.clone(), editable: mode == Mode::Edit }
        }
        FieldBody::Panel(panel) => Control::Panel(render_panel(field, panel, mode, answers, selected)),
    };

    let label = (field.show_label && !matches!(field.kind(), FieldKind::Description | FieldKind::Panel))
        .then(|| LabelView { text: field.label.clone(), required: field.required, style: field.label_style });

    FieldView {
        id: field.id,
        kind: field.kind(),
        width: field.width.css().to_owned(),
        selected: mode == Mode::Edit && selected == Some(&field.id),
        label,
        control,
        helper_text: if field.is_panel() { None } else { field.helper_text.clone() },
    }
}

/// Render the whole top level in document order.
#[must_use]
pub fn render_document(doc: &DocStore, mode: Mode, answers: &Answers, selected: Option<&FieldId>) -> Vec<FieldView> {
    doc.fields().iter().map(|f| render_field(f, mode, answers, selected)).collect()
}

fn render_panel(
    field: &Field,
    panel: &PanelProps,
    mode: Mode,
    answers: &Answers,
    selected: Option<&FieldId>,
) -> PanelView {
    let header = panel.show_panel_label.then(|| {
        let n = panel.children.len();
        PanelHeader {
            title: field.label.clone(),
            count_label: format!("{n} {}", if n == 1 { "field" } else { "fields" }),
        }
    });
    let layout =
        if panel.rows_layout { PanelLayout::Grid { columns: panel.columns_per_row } } else { PanelLayout::Stack };
    PanelView {
        header,
        layout,
        background_color: panel.background_color.clone(),
        border_color: panel.border_color.clone(),
        padding: panel.padding,
        children: panel.children.iter().map(|c| render_field(c, mode, answers, selected)).collect(),
    }
}

fn option_views<V>(choice: &ChoiceProps<V>, checked: impl Fn(&str) -> bool) -> Vec<OptionView> {
    choice
        .options
        .iter()
        .enumerate()
        .map(|(i, ChoiceOption { label, value })| OptionView {
            label: label.clone(),
            value: value.clone(),
            checked: checked(value),
            prefix: choice.ordinal.prefix(i),
        })
        .collect()
}

fn one(answer: Option<&Answer>) -> &str {
    match answer {
        Some(Answer::One(s)) => s,
        _ => "",
    }
}

fn many(answer: Option<&Answer>) -> &[String] {
    match answer {
        Some(Answer::Many(v)) => v,
        _ => &[],
    }
}

/// Parse a date or ISO date-time, keeping only the date part.
fn parse_date(input: &str) -> Option<Date> {
    let input = input.trim();
    if let Ok(date) = Date::parse(input, ISO_DATE) {
        return Some(date);
    }
    if let Ok(at) = OffsetDateTime::parse(input, &Rfc3339) {
        return Some(at.date());
    }
    [ISO_SECONDS, ISO_MINUTES].into_iter().find_map(|fmt| match PrimitiveDateTime::parse(input, fmt) {
        Ok(at) => Some(at.date()),
        Err(_) => None,
    })
}

/// Normalize raw date input to `YYYY-MM-DD`. Empty input clears; anything
/// unparsable yields `None`.
#[must_use]
pub fn normalize_date(input: &str) -> Option<String> {
    if input.trim().is_empty() {
        return Some(String::new());
    }
    parse_date(input).map(|d| DateFormat::Iso.format(d))
}

/// The answer `change` produces for `field`, starting from `current`.
///
/// `None` means the change does not apply: wrong kind, an option key that is
/// not in the list, unparsable date text, or a toggle that changes nothing.
pub(crate) fn next_answer(field: &Field, current: Option<&Answer>, change: &InputChange) -> Option<Answer> {
    match (&field.body, change) {
        (FieldBody::Text(_), InputChange::Text { text }) => Some(Answer::One(text.clone())),
        (FieldBody::Radio(choice) | FieldBody::Select(choice), InputChange::Choose { value }) => {
            choice.has_option(value).then(|| Answer::One(value.clone()))
        }
        (FieldBody::Checkbox(choice), InputChange::Toggle { value, checked }) => {
            if !choice.has_option(value) {
                return None;
            }
            let mut keys = many(current).to_vec();
            let present = keys.contains(value);
            match (checked, present) {
                (true, false) => keys.push(value.clone()),
                (false, true) => keys.retain(|k| k != value),
                _ => return None,
            }
            Some(Answer::Many(keys))
        }
        (FieldBody::Date(_), InputChange::Date { text }) => normalize_date(text).map(Answer::One),
        _ => None,
    }
}

/// Turn an edit-mode input change into a patch for `field`.
#[must_use]
pub fn edit_patch(field: &Field, change: &InputChange) -> Option<FieldPatch> {
    match (&field.body, change) {
        (FieldBody::Description(_), InputChange::Content { text }) => {
            Some(FieldPatch { content: Some(text.clone()), ..Default::default() })
        }
        (FieldBody::Table(table), InputChange::Cell { row, column, text }) => {
            if !table.columns.iter().any(|c| &c.id == column) {
                return None;
            }
            let mut rows = table.rows.clone();
            rows.get_mut(*row)?.insert(column.clone(), text.clone());
            Some(FieldPatch { rows: Some(rows), ..Default::default() })
        }
        (FieldBody::Table(table), InputChange::AppendColumn) => {
            let mut n = table.columns.len() + 1;
            while table.columns.iter().any(|c| c.id == format!("c{n}")) {
                n += 1;
            }
            let id = format!("c{n}");
            let mut columns = table.columns.clone();
            columns.push(TableColumn {
                id: id.clone(),
                header: format!("Column {}", table.columns.len() + 1),
                width: APPENDED_TABLE_COLUMN_WIDTH.to_owned(),
            });
            let rows = table
                .rows
                .iter()
                .map(|r| {
                    let mut r = r.clone();
                    r.insert(id.clone(), String::new());
                    r
                })
                .collect();
            Some(FieldPatch { columns: Some(columns), rows: Some(rows), ..Default::default() })
        }
        (FieldBody::Table(table), InputChange::AppendRow) => {
            let mut rows = table.rows.clone();
            rows.push(blank_row(&table.columns));
            Some(FieldPatch { rows: Some(rows), ..Default::default() })
        }
        _ => next_answer(field, field.value().as_ref(), change).map(FieldPatch::value),
    }
}
