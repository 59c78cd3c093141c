//! Configuration loading helpers for the shell.
//!
//! Configuration flags are peeled off the front of the argument list so
//! `ortho_config` only sees the flags it understands, while clap parses the
//! remaining shell command.

use std::ffi::{OsStr, OsString};

use opshell_config::Config;
use ortho_config::OrthoConfig;

use crate::AppError;

/// CLI flags recognised by the configuration loader.
///
/// Keep in sync with the fields of [`Config`].
pub(crate) const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--log-filter",
    "--log-format",
    "--node-name",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration for the shell.
    ///
    /// Configuration flags must appear before the subcommand; later
    /// occurrences are treated as command tokens.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagAction {
    Include { needs_value: bool },
    Skip,
}

fn classify_flag(argument: &OsStr) -> FlagAction {
    let text = argument.to_string_lossy();
    if !text.starts_with("--") {
        return FlagAction::Skip;
    }

    let (flag, has_inline_value) = match text.split_once('=') {
        Some((name, _)) => (name, true),
        None => (&*text, false),
    };
    if CONFIG_CLI_FLAGS.contains(&flag) {
        FlagAction::Include {
            needs_value: !has_inline_value,
        }
    } else {
        FlagAction::Skip
    }
}

/// Arguments split between the configuration loader and clap.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ConfigArgumentSplit {
    /// Program name followed by the leading configuration flags.
    pub(crate) config_arguments: Vec<OsString>,
    /// Program name followed by everything after the configuration flags.
    pub(crate) command_arguments: Vec<OsString>,
}

pub(crate) fn split_config_arguments(args: &[OsString]) -> ConfigArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ConfigArgumentSplit::default();
    };

    let mut config_arguments = vec![program.clone()];
    let mut remaining = rest.iter().peekable();
    while let Some(argument) = remaining.peek().copied() {
        match classify_flag(argument.as_os_str()) {
            FlagAction::Include { needs_value } => {
                config_arguments.push(argument.clone());
                remaining.next();
                if needs_value && let Some(value) = remaining.next() {
                    config_arguments.push(value.clone());
                }
            }
            FlagAction::Skip => break,
        }
    }

    let mut command_arguments = vec![program.clone()];
    command_arguments.extend(remaining.cloned());
    ConfigArgumentSplit {
        config_arguments,
        command_arguments,
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn os_args(raw: &[&str]) -> Vec<OsString> {
        raw.iter().map(OsString::from).collect()
    }

    #[rstest]
    #[case::inline("--log-filter=debug", FlagAction::Include { needs_value: false })]
    #[case::separate("--node-name", FlagAction::Include { needs_value: true })]
    #[case::other_flag("--output", FlagAction::Skip)]
    #[case::positional("run", FlagAction::Skip)]
    fn flags_are_classified(#[case] argument: &str, #[case] expected: FlagAction) {
        assert_eq!(classify_flag(OsStr::new(argument)), expected);
    }

    #[rstest]
    fn leading_config_flags_are_split_off() {
        let split = split_config_arguments(&os_args(&[
            "opshell",
            "--node-name",
            "O=Bank B, L=Paris, C=FR",
            "--log-format=json",
            "--output",
            "json",
            "run",
            "nodeInfo",
        ]));
        assert_eq!(
            split.config_arguments,
            os_args(&[
                "opshell",
                "--node-name",
                "O=Bank B, L=Paris, C=FR",
                "--log-format=json",
            ])
        );
        assert_eq!(
            split.command_arguments,
            os_args(&["opshell", "--output", "json", "run", "nodeInfo"])
        );
    }

    #[rstest]
    fn config_flags_after_subcommand_stay_command_tokens() {
        let split = split_config_arguments(&os_args(&["opshell", "run", "--log-filter", "x"]));
        assert_eq!(split.config_arguments, os_args(&["opshell"]));
        assert_eq!(
            split.command_arguments,
            os_args(&["opshell", "run", "--log-filter", "x"])
        );
    }

    #[rstest]
    fn empty_arguments_split_to_nothing() {
        assert_eq!(split_config_arguments(&[]), ConfigArgumentSplit::default());
    }
}
