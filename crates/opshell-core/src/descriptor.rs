//! Operation descriptors and the rows rendered for operators.

use serde::Serialize;

/// A named operation paired with its human-readable parameter signature.
///
/// Equality covers both fields: two interfaces exposing the same name with
/// different parameter descriptions produce distinct descriptors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OperationDescriptor {
    name: String,
    parameter_types: String,
}

impl OperationDescriptor {
    /// Creates a descriptor from an operation name and its parameter
    /// description.
    pub fn new(name: impl Into<String>, parameter_types: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_types: parameter_types.into(),
        }
    }

    /// Returns the operation name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter-type description (empty for nullary operations).
    #[must_use]
    pub fn parameter_types(&self) -> &str {
        &self.parameter_types
    }

    /// Projects the descriptor onto a help row.
    #[must_use]
    pub fn to_row(&self) -> DisplayedRow {
        DisplayedRow::new(self.name.clone(), self.parameter_types.clone())
    }
}

/// One row of the help listing.
///
/// Serialises with the column names shown to operators, `Command` first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedRow {
    #[serde(rename = "Command")]
    command: String,
    #[serde(rename = "Parameter types")]
    parameter_types: String,
}

impl DisplayedRow {
    /// Header of the command column.
    pub const COMMAND_HEADER: &'static str = "Command";
    /// Header of the parameter column.
    pub const PARAMETER_TYPES_HEADER: &'static str = "Parameter types";

    /// Creates a row from its two columns.
    pub fn new(command: impl Into<String>, parameter_types: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            parameter_types: parameter_types.into(),
        }
    }

    /// Returns the command column.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Returns the parameter column.
    #[must_use]
    pub fn parameter_types(&self) -> &str {
        &self.parameter_types
    }
}

/// A help row handled by the shell itself rather than either operations
/// interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticEntry {
    command: &'static str,
    description: &'static str,
}

impl StaticEntry {
    /// Immediate node shutdown.
    pub const SHUTDOWN: Self = Self::new("shutdown", "Shuts node down (immediately)");
    /// Shutdown that waits for in-flight flows to finish.
    pub const GRACEFUL_SHUTDOWN: Self = Self::new(
        "gracefulShutdown",
        "Shuts node down gracefully, waiting for all flows to complete first.",
    );
    /// The shell-native entries, in display order.
    pub const SHUTDOWN_ENTRIES: [Self; 2] = [Self::SHUTDOWN, Self::GRACEFUL_SHUTDOWN];

    /// Creates a static entry.
    #[must_use]
    pub const fn new(command: &'static str, description: &'static str) -> Self {
        Self {
            command,
            description,
        }
    }

    /// Returns the command the shell recognises.
    #[must_use]
    pub const fn command(&self) -> &'static str {
        self.command
    }

    /// Returns the description shown in the parameter column.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Projects the entry onto a help row.
    #[must_use]
    pub fn to_row(&self) -> DisplayedRow {
        DisplayedRow::new(self.command, self.description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptors_differ_by_parameter_description() {
        let plain = OperationDescriptor::new("killFlow", "id: String");
        let forced = OperationDescriptor::new("killFlow", "id: String, force: Boolean");
        assert_ne!(plain, forced);
        assert_eq!(plain, OperationDescriptor::new("killFlow", "id: String"));
    }

    #[test]
    fn row_serialises_with_command_column_first() {
        let row = OperationDescriptor::new("fooBar", "value: String").to_row();
        let json = serde_json::to_string(&row).expect("serialise row");
        assert_eq!(json, r#"{"Command":"fooBar","Parameter types":"value: String"}"#);
    }

    #[test]
    fn shutdown_entries_keep_immediate_before_graceful() {
        let commands: Vec<_> = StaticEntry::SHUTDOWN_ENTRIES
            .iter()
            .map(StaticEntry::command)
            .collect();
        assert_eq!(commands, ["shutdown", "gracefulShutdown"]);
    }
}
