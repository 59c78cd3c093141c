//! Column layout for the human help table.

use opshell_core::DisplayedRow;
use unicode_width::UnicodeWidthStr;

/// Spaces between the two columns.
const COLUMN_GAP: usize = 2;

/// Display width of the command column wide enough for the header and every
/// row in `rows`.
pub(crate) fn command_column_width(rows: &[DisplayedRow]) -> usize {
    rows.iter()
        .map(|row| row.command().width())
        .chain(std::iter::once(DisplayedRow::COMMAND_HEADER.width()))
        .max()
        .unwrap_or_default()
}

/// Renders one table line, padding the command column to `width` display
/// columns. Trailing whitespace is dropped when the second column is empty.
pub(crate) fn table_line(command: &str, parameter_types: &str, width: usize) -> String {
    if parameter_types.is_empty() {
        return command.to_owned();
    }
    let padding = width.saturating_sub(command.width()) + COLUMN_GAP;
    format!("{command}{}{parameter_types}", " ".repeat(padding))
}

/// Renders the table header.
pub(crate) fn header_line(width: usize) -> String {
    table_line(
        DisplayedRow::COMMAND_HEADER,
        DisplayedRow::PARAMETER_TYPES_HEADER,
        width,
    )
}
