//! Output channel receiving help rows and invocation results.

use std::io;

use serde_json::Value;

use crate::descriptor::DisplayedRow;

/// Destination for rendered output.
///
/// A rejected help row aborts the listing; a rejected value fails the
/// command.
#[cfg_attr(test, mockall::automock)]
pub trait OutputSink {
    /// Accepts one help row.
    ///
    /// # Errors
    ///
    /// Returns an error when the row cannot be rendered.
    fn emit_row(&mut self, row: &DisplayedRow) -> io::Result<()>;

    /// Accepts the result of an invocation.
    ///
    /// # Errors
    ///
    /// Returns an error when the value cannot be rendered.
    fn emit_value(&mut self, value: &Value) -> io::Result<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn emit_row(&mut self, row: &DisplayedRow) -> io::Result<()> {
        (**self).emit_row(row)
    }

    fn emit_value(&mut self, value: &Value) -> io::Result<()> {
        (**self).emit_value(value)
    }
}

/// Sink that keeps everything it receives, in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectedOutput {
    /// Help rows received.
    pub rows: Vec<DisplayedRow>,
    /// Values received.
    pub values: Vec<Value>,
}

impl OutputSink for CollectedOutput {
    fn emit_row(&mut self, row: &DisplayedRow) -> io::Result<()> {
        self.rows.push(row.clone());
        Ok(())
    }

    fn emit_value(&mut self, value: &Value) -> io::Result<()> {
        self.values.push(value.clone());
        Ok(())
    }
}
