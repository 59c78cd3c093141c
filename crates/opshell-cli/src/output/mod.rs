//! Rendering of help listings and operation results.
//!
//! Human output lays help rows out as an aligned two-column table and prints
//! results as pretty JSON (bare strings unquoted). JSON output writes one
//! document per line for each row and each result.

mod render;

use std::io::{self, Write};

use clap::ValueEnum;
use opshell_core::{DisplayedRow, OutputSink};
use serde_json::Value;

use crate::output::render::{command_column_width, header_line, table_line};

/// Output format selection for shell output.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Selects `human` for terminal output and `json` for redirected output.
    #[default]
    Auto,
    /// Always render human-readable output.
    Human,
    /// Always emit JSON documents.
    Json,
}

/// Output format after resolving `auto` based on TTY detection.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ResolvedOutputFormat {
    /// Aligned tables and pretty JSON.
    Human,
    /// One JSON document per line.
    Json,
}

impl OutputFormat {
    /// Resolves the output format based on whether stdout is a terminal.
    #[must_use]
    pub const fn resolve(self, stdout_is_terminal: bool) -> ResolvedOutputFormat {
        match self {
            Self::Auto => {
                if stdout_is_terminal {
                    ResolvedOutputFormat::Human
                } else {
                    ResolvedOutputFormat::Json
                }
            }
            Self::Human => ResolvedOutputFormat::Human,
            Self::Json => ResolvedOutputFormat::Json,
        }
    }
}

/// Sink writing rendered output to a stream.
pub(crate) struct TerminalSink<W: Write> {
    writer: W,
    format: ResolvedOutputFormat,
    command_width: usize,
    header_written: bool,
}

impl<W: Write> TerminalSink<W> {
    /// Creates a sink whose help table is sized for `listing`.
    pub(crate) fn new(writer: W, format: ResolvedOutputFormat, listing: &[DisplayedRow]) -> Self {
        Self {
            writer,
            format,
            command_width: command_column_width(listing),
            header_written: false,
        }
    }

    /// Prepares the sink for the next command's output.
    pub(crate) const fn reset(&mut self) {
        self.header_written = false;
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for TerminalSink<W> {
    fn emit_row(&mut self, row: &DisplayedRow) -> io::Result<()> {
        match self.format {
            ResolvedOutputFormat::Human => {
                if !self.header_written {
                    writeln!(self.writer, "{}", header_line(self.command_width))?;
                    self.header_written = true;
                }
                writeln!(
                    self.writer,
                    "{}",
                    table_line(row.command(), row.parameter_types(), self.command_width)
                )?;
            }
            ResolvedOutputFormat::Json => {
                serde_json::to_writer(&mut self.writer, row)?;
                writeln!(self.writer)?;
            }
        }
        self.writer.flush()
    }

    fn emit_value(&mut self, value: &Value) -> io::Result<()> {
        match (self.format, value) {
            (ResolvedOutputFormat::Human, Value::String(text)) => {
                writeln!(self.writer, "{text}")?;
            }
            (ResolvedOutputFormat::Human, _) => {
                serde_json::to_writer_pretty(&mut self.writer, value)?;
                writeln!(self.writer)?;
            }
            (ResolvedOutputFormat::Json, _) => {
                serde_json::to_writer(&mut self.writer, value)?;
                writeln!(self.writer)?;
            }
        }
        self.writer.flush()
    }
}
