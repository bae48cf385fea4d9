//! Shared constants for the form builder crate.

// ── Form ────────────────────────────────────────────────────────

/// Title given to a fresh form.
pub const DEFAULT_FORM_TITLE: &str = "My Drag & Drop Form";

// ── Field templates ─────────────────────────────────────────────

/// Label given to a fresh panel.
pub const DEFAULT_PANEL_LABEL: &str = "Panel Container";

/// Body text given to a fresh description block.
pub const DEFAULT_DESCRIPTION: &str = "Enter your description here...";

/// Number of options a fresh choice field starts with.
pub const DEFAULT_OPTION_COUNT: usize = 3;

/// Number of columns and rows a fresh table starts with.
pub const DEFAULT_TABLE_COLUMNS: usize = 2;
pub const DEFAULT_TABLE_ROWS: usize = 2;

/// Width given to the template table columns.
pub const DEFAULT_TABLE_COLUMN_WIDTH: &str = "50%";

/// Width given to columns appended after creation.
pub const APPENDED_TABLE_COLUMN_WIDTH: &str = "auto";

/// Panel background and border colors.
pub const DEFAULT_PANEL_BACKGROUND: &str = "#ffffff";
pub const DEFAULT_PANEL_BORDER: &str = "#e5e7eb";

// ── Editor ranges ───────────────────────────────────────────────

/// Label font size in pixels.
pub const DEFAULT_LABEL_SIZE: u8 = 14;
pub const LABEL_SIZE_MIN: u8 = 10;
pub const LABEL_SIZE_MAX: u8 = 24;

/// Panel columns per row.
pub const DEFAULT_COLUMNS_PER_ROW: u8 = 2;
pub const COLUMNS_PER_ROW_MIN: u8 = 1;
pub const COLUMNS_PER_ROW_MAX: u8 = 6;

/// Panel padding in pixels, snapped to `PADDING_STEP`.
pub const DEFAULT_PANEL_PADDING: u8 = 16;
pub const PADDING_MAX: u8 = 48;
pub const PADDING_STEP: u8 = 4;

/// Columns in a grid-laid-out choice group.
pub const DEFAULT_GRID_COLUMNS: u8 = 2;
pub const GRID_COLUMNS_MIN: u8 = 2;
pub const GRID_COLUMNS_MAX: u8 = 4;
