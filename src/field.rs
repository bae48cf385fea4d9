//! Field schema: kinds, per-kind properties, and creation templates.
//!
//! A [`Field`] is the unit the user drags around. Attributes every kind shares
//! (label, width, helper text, ...) live on `Field` itself; everything that only
//! makes sense for some kinds lives in the [`FieldBody`] variant, so a date
//! field cannot carry options and a panel cannot carry a value.
//!
//! The whole tree is serde-serializable so hosts can receive it as a snapshot.
//! `kind` is written inline next to the common attributes.

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::consts::{
    DEFAULT_COLUMNS_PER_ROW, DEFAULT_DESCRIPTION, DEFAULT_LABEL_SIZE, DEFAULT_OPTION_COUNT, DEFAULT_PANEL_BACKGROUND,
    DEFAULT_PANEL_BORDER, DEFAULT_PANEL_LABEL, DEFAULT_PANEL_PADDING, DEFAULT_TABLE_COLUMN_WIDTH, DEFAULT_TABLE_COLUMNS,
    DEFAULT_TABLE_ROWS,
};

/// Unique identifier for a field. One namespace covers the whole document.
pub type FieldId = Uuid;

/// The kind of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line text input.
    Text,
    /// Static block of text.
    Description,
    /// Choose exactly one option.
    Radio,
    /// Choose any number of options.
    Checkbox,
    /// Choose one option from a picker.
    Select,
    /// Calendar date.
    Date,
    /// Signature placeholder.
    Signature,
    /// Editable grid of text cells.
    Table,
    /// Container holding one level of child fields.
    Panel,
}

impl FieldKind {
    /// Every kind, in toolbox order.
    pub const ALL: [FieldKind; 9] = [
        Self::Panel,
        Self::Text,
        Self::Description,
        Self::Checkbox,
        Self::Radio,
        Self::Select,
        Self::Date,
        Self::Signature,
        Self::Table,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Description => "description",
            Self::Radio => "radio",
            Self::Checkbox => "checkbox",
            Self::Select => "select",
            Self::Date => "date",
            Self::Signature => "signature",
            Self::Table => "table",
            Self::Panel => "panel",
        }
    }

    /// Whether this kind carries an option list.
    #[must_use]
    pub fn is_choice(self) -> bool {
        matches!(self, Self::Radio | Self::Checkbox | Self::Select)
    }

    #[must_use]
    pub fn is_panel(self) -> bool {
        self == Self::Panel
    }

    /// Whether this kind stores an answer.
    #[must_use]
    pub fn has_value(self) -> bool {
        matches!(self, Self::Text | Self::Radio | Self::Checkbox | Self::Select | Self::Date)
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known field kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field kind: {0}")]
pub struct ParseKindError(pub String);

impl FromStr for FieldKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "description" => Ok(Self::Description),
            "radio" | "choice-single" => Ok(Self::Radio),
            "checkbox" | "choice-multi" => Ok(Self::Checkbox),
            "select" => Ok(Self::Select),
            "date" => Ok(Self::Date),
            "signature" => Ok(Self::Signature),
            "table" | "dynamic-table" => Ok(Self::Table),
            "panel" => Ok(Self::Panel),
            _ => Err(ParseKindError(s.to_owned())),
        }
    }
}

/// Typography applied to a field's label line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Font size in pixels.
    pub size: u8,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self { bold: false, italic: false, underline: false, size: DEFAULT_LABEL_SIZE }
    }
}

/// Horizontal space a field takes in its row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Width {
    #[default]
    Full,
    Half,
    Third,
    Quarter,
    /// Any CSS length, e.g. `"250px"` or `"60%"`.
    Custom(String),
}

impl Width {
    /// The width as a CSS length.
    #[must_use]
    pub fn css(&self) -> &str {
        match self {
            Self::Full => "100%",
            Self::Half => "50%",
            Self::Third => "33.333%",
            Self::Quarter => "25%",
            Self::Custom(size) => size,
        }
    }
}

/// One entry of a choice field. `value` is what gets stored, `label` is what
/// gets shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

impl ChoiceOption {
    /// The `n`-th default option (1-based): `Option n` / `option_n`.
    #[must_use]
    pub fn numbered(n: usize) -> Self {
        Self { label: format!("Option {n}"), value: format!("option_{n}") }
    }
}

/// How a choice group arranges its options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "direction", rename_all = "lowercase")]
pub enum ChoiceLayout {
    Row,
    #[default]
    Column,
    Grid { columns: u8 },
}

/// Prefix drawn before each option label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrdinalStyle {
    #[default]
    None,
    /// `1.`, `2.`, `3.`
    Numeric,
    /// `a.`, `b.`, ... `z.`, `aa.`
    Alphabetic,
}

impl OrdinalStyle {
    /// Prefix for the option at zero-based `index`, if any.
    #[must_use]
    pub fn prefix(self, index: usize) -> Option<String> {
        match self {
            Self::None => None,
            Self::Numeric => Some(format!("{}.", index + 1)),
            Self::Alphabetic => {
                let mut letters = Vec::new();
                let mut n = index + 1;
                while n > 0 {
                    n -= 1;
                    // n % 26 < 26, so the cast cannot truncate.
                    #[allow(clippy::cast_possible_truncation)]
                    letters.push(char::from(b'a' + (n % 26) as u8));
                    n /= 26;
                }
                letters.reverse();
                let mut out: String = letters.into_iter().collect();
                out.push('.');
                Some(out)
            }
        }
    }
}

/// Display format for a date field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYearSlash,
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYearSlash,
    #[serde(rename = "YYYY-MM-DD")]
    Iso,
    #[serde(rename = "DD-MM-YYYY")]
    DayMonthYearDash,
    #[serde(rename = "MM-DD-YYYY")]
    MonthDayYearDash,
}

impl DateFormat {
    pub const ALL: [DateFormat; 5] = [
        Self::MonthDayYearSlash,
        Self::DayMonthYearSlash,
        Self::Iso,
        Self::DayMonthYearDash,
        Self::MonthDayYearDash,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MonthDayYearSlash => "MM/DD/YYYY",
            Self::DayMonthYearSlash => "DD/MM/YYYY",
            Self::Iso => "YYYY-MM-DD",
            Self::DayMonthYearDash => "DD-MM-YYYY",
            Self::MonthDayYearDash => "MM-DD-YYYY",
        }
    }

    /// Render `date` in this format.
    #[must_use]
    pub fn format(self, date: time::Date) -> String {
        let day = date.day();
        let month = u8::from(date.month());
        let year = date.year();
        match self {
            Self::MonthDayYearSlash => format!("{month:02}/{day:02}/{year:04}"),
            Self::DayMonthYearSlash => format!("{day:02}/{month:02}/{year:04}"),
            Self::Iso => format!("{year:04}-{month:02}-{day:02}"),
            Self::DayMonthYearDash => format!("{day:02}-{month:02}-{year:04}"),
            Self::MonthDayYearDash => format!("{month:02}-{day:02}-{year:04}"),
        }
    }
}

/// A stored answer. Single-valued kinds hold `One`, checkboxes hold `Many`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    One(String),
    Many(Vec<String>),
}

impl Answer {
    /// Whether nothing has been entered or chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::One(s) => s.is_empty(),
            Self::Many(v) => v.is_empty(),
        }
    }
}

impl From<&Answer> for serde_json::Value {
    fn from(answer: &Answer) -> Self {
        match answer {
            Answer::One(s) => serde_json::Value::String(s.clone()),
            Answer::Many(v) => serde_json::Value::Array(v.iter().cloned().map(serde_json::Value::String).collect()),
        }
    }
}

/// Text input props.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextProps {
    #[serde(default)]
    pub placeholder: String,
    /// Draw the input as a bottom border only.
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub value: String,
}

/// Description block props.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptionProps {
    pub content: String,
}

/// Props shared by the choice kinds. `V` is the stored answer shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceProps<V> {
    pub options: Vec<ChoiceOption>,
    #[serde(default)]
    pub layout: ChoiceLayout,
    #[serde(default)]
    pub ordinal: OrdinalStyle,
    pub value: V,
}

impl<V: Default> ChoiceProps<V> {
    fn template() -> Self {
        Self {
            options: (1..=DEFAULT_OPTION_COUNT).map(ChoiceOption::numbered).collect(),
            layout: ChoiceLayout::Column,
            ordinal: OrdinalStyle::None,
            value: V::default(),
        }
    }
}

impl<V> ChoiceProps<V> {
    /// Whether `value` is the key of one of the options.
    #[must_use]
    pub fn has_option(&self, value: &str) -> bool {
        self.options.iter().any(|o| o.value == value)
    }
}

/// Date field props. `value` is an ISO `YYYY-MM-DD` string or empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateProps {
    #[serde(default)]
    pub format: DateFormat,
    #[serde(default)]
    pub value: String,
}

/// One column of a table field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableColumn {
    /// Key of this column's cell in every row. Unique within the table.
    pub id: String,
    pub header: String,
    pub width: String,
}

/// A table row: cell text keyed by column id.
pub type TableRow = BTreeMap<String, String>;

/// Table field props.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableProps {
    pub columns: Vec<TableColumn>,
    pub rows: Vec<TableRow>,
}

impl TableProps {
    fn template() -> Self {
        let columns: Vec<TableColumn> = (1..=DEFAULT_TABLE_COLUMNS)
            .map(|n| TableColumn {
                id: format!("c{n}"),
                header: format!("Column {n}"),
                width: DEFAULT_TABLE_COLUMN_WIDTH.to_owned(),
            })
            .collect();
        let rows = (0..DEFAULT_TABLE_ROWS).map(|_| blank_row(&columns)).collect();
        Self { columns, rows }
    }
}

/// A row with an empty cell for every column.
#[must_use]
pub fn blank_row(columns: &[TableColumn]) -> TableRow {
    columns.iter().map(|c| (c.id.clone(), String::new())).collect()
}

/// Panel props.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PanelProps {
    /// Child fields, in display order. Never contains a panel.
    #[serde(default)]
    pub children: Vec<Field>,
    pub columns_per_row: u8,
    /// Lay children out in a grid of `columns_per_row`; otherwise stack them.
    pub rows_layout: bool,
    pub background_color: String,
    pub border_color: String,
    /// Inner padding in pixels.
    pub padding: u8,
    pub show_panel_label: bool,
}

impl PanelProps {
    fn template() -> Self {
        Self {
            children: Vec::new(),
            columns_per_row: DEFAULT_COLUMNS_PER_ROW,
            rows_layout: true,
            background_color: DEFAULT_PANEL_BACKGROUND.to_owned(),
            border_color: DEFAULT_PANEL_BORDER.to_owned(),
            padding: DEFAULT_PANEL_PADDING,
            show_panel_label: true,
        }
    }
}

/// Kind-specific part of a field. The variant is the field's kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum FieldBody {
    Text(TextProps),
    Description(DescriptionProps),
    Radio(ChoiceProps<String>),
    Checkbox(ChoiceProps<Vec<String>>),
    Select(ChoiceProps<String>),
    Date(DateProps),
    Signature,
    Table(TableProps),
    Panel(PanelProps),
}

impl FieldBody {
    /// Default props for a fresh field of `kind`.
    #[must_use]
    pub fn template(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => Self::Text(TextProps::default()),
            FieldKind::Description => Self::Description(DescriptionProps { content: DEFAULT_DESCRIPTION.to_owned() }),
            FieldKind::Radio => Self::Radio(ChoiceProps::template()),
            FieldKind::Checkbox => Self::Checkbox(ChoiceProps::template()),
            FieldKind::Select => Self::Select(ChoiceProps::template()),
            FieldKind::Date => Self::Date(DateProps::default()),
            FieldKind::Signature => Self::Signature,
            FieldKind::Table => Self::Table(TableProps::template()),
            FieldKind::Panel => Self::Panel(PanelProps::template()),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Description(_) => FieldKind::Description,
            Self::Radio(_) => FieldKind::Radio,
            Self::Checkbox(_) => FieldKind::Checkbox,
            Self::Select(_) => FieldKind::Select,
            Self::Date(_) => FieldKind::Date,
            Self::Signature => FieldKind::Signature,
            Self::Table(_) => FieldKind::Table,
            Self::Panel(_) => FieldKind::Panel,
        }
    }
}

/// A placeable form element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    /// Assigned at creation, never changes.
    pub id: FieldId,
    pub label: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_true")]
    pub show_label: bool,
    #[serde(default)]
    pub label_style: LabelStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper_text: Option<String>,
    #[serde(default)]
    pub width: Width,
    #[serde(flatten)]
    pub body: FieldBody,
}

fn default_true() -> bool {
    true
}

impl Field {
    /// A fresh field of `kind` with template defaults.
    #[must_use]
    pub fn template(kind: FieldKind, id: FieldId) -> Self {
        let label = if kind.is_panel() { DEFAULT_PANEL_LABEL.to_owned() } else { format!("New {kind} Field") };
        Self {
            id,
            label,
            required: false,
            show_label: true,
            label_style: LabelStyle::default(),
            helper_text: None,
            width: Width::Full,
            body: FieldBody::template(kind),
        }
    }

    #[must_use]
    pub fn kind(&self) -> FieldKind {
        self.body.kind()
    }

    #[must_use]
    pub fn is_panel(&self) -> bool {
        matches!(self.body, FieldBody::Panel(_))
    }

    /// Child fields. Empty for anything but a panel.
    #[must_use]
    pub fn children(&self) -> &[Field] {
        match &self.body {
            FieldBody::Panel(panel) => &panel.children,
            _ => &[],
        }
    }

    /// Option list of a choice field.
    #[must_use]
    pub fn options(&self) -> Option<&[ChoiceOption]> {
        match &self.body {
            FieldBody::Radio(c) | FieldBody::Select(c) => Some(&c.options),
            FieldBody::Checkbox(c) => Some(&c.options),
            _ => None,
        }
    }

    /// The answer stored on the node, for kinds that have one.
    #[must_use]
    pub fn value(&self) -> Option<Answer> {
        match &self.body {
            FieldBody::Text(t) => Some(Answer::One(t.value.clone())),
            FieldBody::Radio(c) | FieldBody::Select(c) => Some(Answer::One(c.value.clone())),
            FieldBody::Checkbox(c) => Some(Answer::Many(c.value.clone())),
            FieldBody::Date(d) => Some(Answer::One(d.value.clone())),
            _ => None,
        }
    }
}
