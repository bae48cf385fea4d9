//! Properties editor model.
//!
//! [`visible_properties`] lists what the side panel shows for a field,
//! gated by kind and current state. Every [`PropertyEdit`] becomes a
//! [`FieldPatch`] through [`edit_to_patch`], or `None` when the property is
//! hidden for that field or the edit is blocked.

#[cfg(test)]
#[path = "properties_test.rs"]
mod properties_test;

use serde::{Deserialize, Serialize};

use crate::consts::{
    COLUMNS_PER_ROW_MAX, COLUMNS_PER_ROW_MIN, DEFAULT_GRID_COLUMNS, GRID_COLUMNS_MAX, GRID_COLUMNS_MIN,
    LABEL_SIZE_MAX, LABEL_SIZE_MIN, PADDING_MAX, PADDING_STEP,
};
use crate::field::{ChoiceLayout, ChoiceOption, DateFormat, Field, FieldBody, FieldKind, OrdinalStyle, Width};
use crate::patch::FieldPatch;
use crate::render::{InputChange, edit_patch};

/// One row of the properties panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyKey {
    Label,
    ShowLabel,
    LabelStyle,
    Width,
    CustomWidth,
    Placeholder,
    Underline,
    Content,
    DateFormat,
    Options,
    LayoutDirection,
    OrdinalStyle,
    GridColumns,
    TableColumns,
    PanelTitle,
    ShowPanelLabel,
    ColumnsPerRow,
    RowsLayout,
    BackgroundColor,
    BorderColor,
    Padding,
    Required,
    HelperText,
}

/// Choice layout picked from the direction dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Row,
    Column,
    Grid,
}

/// A single edit made in the properties panel.
///
/// Slider-backed values are signed and get clamped into their range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "edit", content = "value", rename_all = "kebab-case")]
pub enum PropertyEdit {
    Label(String),
    ShowLabel(bool),
    LabelBold(bool),
    LabelItalic(bool),
    LabelUnderline(bool),
    LabelSize(i32),
    Width(Width),
    CustomWidth(String),
    Placeholder(String),
    Underline(bool),
    Content(String),
    DateFormat(DateFormat),
    AddOption,
    RemoveOption(usize),
    OptionLabel { index: usize, label: String },
    OptionValue { index: usize, value: String },
    LayoutDirection(Direction),
    GridColumns(i32),
    OrdinalStyle(OrdinalStyle),
    AddTableColumn,
    RemoveTableColumn(usize),
    TableColumnHeader { index: usize, header: String },
    TableColumnWidth { index: usize, width: String },
    PanelTitle(String),
    ShowPanelLabel(bool),
    ColumnsPerRow(i32),
    RowsLayout(bool),
    BackgroundColor(String),
    BorderColor(String),
    Padding(i32),
    Required(bool),
    HelperText(String),
}

impl PropertyEdit {
    /// The panel row this edit belongs to.
    #[must_use]
    pub fn key(&self) -> PropertyKey {
        match self {
            Self::Label(_) => PropertyKey::Label,
            Self::ShowLabel(_) => PropertyKey::ShowLabel,
            Self::LabelBold(_) | Self::LabelItalic(_) | Self::LabelUnderline(_) | Self::LabelSize(_) => {
                PropertyKey::LabelStyle
            }
            Self::Width(_) => PropertyKey::Width,
            Self::CustomWidth(_) => PropertyKey::CustomWidth,
            Self::Placeholder(_) => PropertyKey::Placeholder,
            Self::Underline(_) => PropertyKey::Underline,
            Self::Content(_) => PropertyKey::Content,
            Self::DateFormat(_) => PropertyKey::DateFormat,
            Self::AddOption | Self::RemoveOption(_) | Self::OptionLabel { .. } | Self::OptionValue { .. } => {
                PropertyKey::Options
            }
            Self::LayoutDirection(_) => PropertyKey::LayoutDirection,
            Self::GridColumns(_) => PropertyKey::GridColumns,
            Self::OrdinalStyle(_) => PropertyKey::OrdinalStyle,
            Self::AddTableColumn
            | Self::RemoveTableColumn(_)
            | Self::TableColumnHeader { .. }
            | Self::TableColumnWidth { .. } => PropertyKey::TableColumns,
            Self::PanelTitle(_) => PropertyKey::PanelTitle,
            Self::ShowPanelLabel(_) => PropertyKey::ShowPanelLabel,
            Self::ColumnsPerRow(_) => PropertyKey::ColumnsPerRow,
            Self::RowsLayout(_) => PropertyKey::RowsLayout,
            Self::BackgroundColor(_) => PropertyKey::BackgroundColor,
            Self::BorderColor(_) => PropertyKey::BorderColor,
            Self::Padding(_) => PropertyKey::Padding,
            Self::Required(_) => PropertyKey::Required,
            Self::HelperText(_) => PropertyKey::HelperText,
        }
    }
}

/// Properties shown for `field`, in panel order.
#[must_use]
pub fn visible_properties(field: &Field) -> Vec<PropertyKey> {
    let kind = field.kind();
    let mut keys = Vec::new();
    if !kind.is_panel() {
        keys.push(PropertyKey::Label);
        keys.push(PropertyKey::ShowLabel);
        if field.show_label {
            keys.push(PropertyKey::LabelStyle);
        }
    }
    keys.push(PropertyKey::Width);
    if matches!(field.width, Width::Custom(_)) {
        keys.push(PropertyKey::CustomWidth);
    }
    match &field.body {
        FieldBody::Text(_) => keys.extend([PropertyKey::Placeholder, PropertyKey::Underline]),
        FieldBody::Description(_) => keys.push(PropertyKey::Content),
        FieldBody::Date(_) => keys.push(PropertyKey::DateFormat),
        FieldBody::Table(_) => keys.push(PropertyKey::TableColumns),
        FieldBody::Panel(_) => keys.extend([
            PropertyKey::PanelTitle,
            PropertyKey::ShowPanelLabel,
            PropertyKey::ColumnsPerRow,
            PropertyKey::RowsLayout,
            PropertyKey::BackgroundColor,
            PropertyKey::BorderColor,
            PropertyKey::Padding,
        ]),
        _ => {}
    }
    if kind.is_choice() {
        keys.push(PropertyKey::Options);
    }
    if let FieldBody::Radio(choice) = &field.body {
        push_layout_keys(&mut keys, choice.layout);
    } else if let FieldBody::Checkbox(choice) = &field.body {
        push_layout_keys(&mut keys, choice.layout);
    }
    if !matches!(kind, FieldKind::Panel | FieldKind::Description) {
        keys.push(PropertyKey::Required);
    }
    if !kind.is_panel() {
        keys.push(PropertyKey::HelperText);
    }
    keys
}

fn push_layout_keys(keys: &mut Vec<PropertyKey>, layout: ChoiceLayout) {
    keys.push(PropertyKey::LayoutDirection);
    if matches!(layout, ChoiceLayout::Grid { .. }) {
        keys.push(PropertyKey::GridColumns);
    }
    keys.push(PropertyKey::OrdinalStyle);
}

/// Whether the option at `index` may be removed. The list never goes empty.
#[must_use]
pub fn can_remove_option(field: &Field, index: usize) -> bool {
    field.options().is_some_and(|opts| opts.len() > 1 && index < opts.len())
}

fn clamp_u8(value: i32, min: u8, max: u8) -> u8 {
    u8::try_from(value.clamp(i32::from(min), i32::from(max))).unwrap_or(max)
}

/// Padding snaps to the nearest step inside `0..=PADDING_MAX`.
fn snap_padding(value: i32) -> u8 {
    let step = i32::from(PADDING_STEP);
    let clamped = value.clamp(0, i32::from(PADDING_MAX));
    clamp_u8((clamped + step / 2) / step * step, 0, PADDING_MAX)
}

/// Turn `edit` into a patch for `field`.
///
/// Returns `None` when the property is not visible for `field`, or when the
/// edit is blocked: removing the last option or table column, or an index out
/// of range.
#[must_use]
pub fn edit_to_patch(field: &Field, edit: &PropertyEdit) -> Option<FieldPatch> {
    if !visible_properties(field).contains(&edit.key()) {
        return None;
    }
    let mut patch = FieldPatch::default();
    match edit {
        PropertyEdit::Label(s) | PropertyEdit::PanelTitle(s) => patch.label = Some(s.clone()),
        PropertyEdit::ShowLabel(b) => patch.show_label = Some(*b),
        PropertyEdit::LabelBold(b) => patch.label_bold = Some(*b),
        PropertyEdit::LabelItalic(b) => patch.label_italic = Some(*b),
        PropertyEdit::LabelUnderline(b) => patch.label_underline = Some(*b),
        PropertyEdit::LabelSize(n) => patch.label_size = Some(clamp_u8(*n, LABEL_SIZE_MIN, LABEL_SIZE_MAX)),
        PropertyEdit::Width(w) => patch.width = Some(w.clone()),
        PropertyEdit::CustomWidth(s) => patch.width = Some(Width::Custom(s.clone())),
        PropertyEdit::Placeholder(s) => patch.placeholder = Some(s.clone()),
        PropertyEdit::Underline(b) => patch.underline = Some(*b),
        PropertyEdit::Content(s) => patch.content = Some(s.clone()),
        PropertyEdit::DateFormat(f) => patch.date_format = Some(*f),
        PropertyEdit::AddOption
        | PropertyEdit::RemoveOption(_)
        | PropertyEdit::OptionLabel { .. }
        | PropertyEdit::OptionValue { .. } => {
            patch.options = Some(edit_options(field, edit)?);
        }
        PropertyEdit::LayoutDirection(d) => {
            patch.layout = Some(match d {
                Direction::Row => ChoiceLayout::Row,
                Direction::Column => ChoiceLayout::Column,
                Direction::Grid => match current_layout(field) {
                    Some(grid @ ChoiceLayout::Grid { .. }) => grid,
                    _ => ChoiceLayout::Grid { columns: DEFAULT_GRID_COLUMNS },
                },
            });
        }
        PropertyEdit::GridColumns(n) => {
            patch.layout = Some(ChoiceLayout::Grid { columns: clamp_u8(*n, GRID_COLUMNS_MIN, GRID_COLUMNS_MAX) });
        }
        PropertyEdit::OrdinalStyle(o) => patch.ordinal = Some(*o),
        PropertyEdit::AddTableColumn => return edit_patch(field, &InputChange::AppendColumn),
        PropertyEdit::RemoveTableColumn(_)
        | PropertyEdit::TableColumnHeader { .. }
        | PropertyEdit::TableColumnWidth { .. } => {
            return edit_table_columns(field, edit);
        }
        PropertyEdit::ShowPanelLabel(b) => patch.show_panel_label = Some(*b),
        PropertyEdit::ColumnsPerRow(n) => {
            patch.columns_per_row = Some(clamp_u8(*n, COLUMNS_PER_ROW_MIN, COLUMNS_PER_ROW_MAX));
        }
        PropertyEdit::RowsLayout(b) => patch.rows_layout = Some(*b),
        PropertyEdit::BackgroundColor(s) => patch.background_color = Some(s.clone()),
        PropertyEdit::BorderColor(s) => patch.border_color = Some(s.clone()),
        PropertyEdit::Padding(n) => patch.padding = Some(snap_padding(*n)),
        PropertyEdit::Required(b) => patch.required = Some(*b),
        PropertyEdit::HelperText(s) => patch.helper_text = Some(s.clone()),
    }
    Some(patch)
}

fn current_layout(field: &Field) -> Option<ChoiceLayout> {
    match &field.body {
        FieldBody::Radio(c) | FieldBody::Select(c) => Some(c.layout),
        FieldBody::Checkbox(c) => Some(c.layout),
        _ => None,
    }
}

fn edit_options(field: &Field, edit: &PropertyEdit) -> Option<Vec<ChoiceOption>> {
    let mut options = field.options()?.to_vec();
    match edit {
        PropertyEdit::AddOption => options.push(ChoiceOption::numbered(options.len() + 1)),
        PropertyEdit::RemoveOption(index) => {
            if !can_remove_option(field, *index) {
                return None;
            }
            options.remove(*index);
        }
        PropertyEdit::OptionLabel { index, label } => options.get_mut(*index)?.label.clone_from(label),
        PropertyEdit::OptionValue { index, value } => options.get_mut(*index)?.value.clone_from(value),
        _ => return None,
    }
    Some(options)
}

fn edit_table_columns(field: &Field, edit: &PropertyEdit) -> Option<FieldPatch> {
    let FieldBody::Table(table) = &field.body else {
        return None;
    };
    let mut columns = table.columns.clone();
    let mut patch = FieldPatch::default();
    match edit {
        PropertyEdit::RemoveTableColumn(index) => {
            if columns.len() <= 1 || *index >= columns.len() {
                return None;
            }
            let removed = columns.remove(*index);
            let rows = table
                .rows
                .iter()
                .map(|r| {
                    let mut r = r.clone();
                    r.remove(&removed.id);
                    r
                })
                .collect();
            patch.rows = Some(rows);
        }
        PropertyEdit::TableColumnHeader { index, header } => columns.get_mut(*index)?.header.clone_from(header),
        PropertyEdit::TableColumnWidth { index, width } => columns.get_mut(*index)?.width.clone_from(width),
        _ => return None,
    }
    patch.columns = Some(columns);
    Some(patch)
}
