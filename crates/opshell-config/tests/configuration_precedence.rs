//! Behaviour tests for configuration layering.

use std::cell::RefCell;
use std::ffi::OsString;
use std::fs;
use std::sync::{Mutex, MutexGuard, PoisonError};

use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use ortho_config::OrthoConfig;
use tempfile::TempDir;

use opshell_config::{
    Config, LogFormat, default_log_filter, default_log_format, default_node_name_string,
};

/// Serialises scenarios because overrides mutate the process environment.
static ENVIRONMENT: Mutex<()> = Mutex::new(());

struct Harness {
    temp_dir: TempDir,
    cli_args: RefCell<Vec<OsString>>,
    env_overrides: RefCell<Vec<(String, Option<OsString>)>>,
    loaded: RefCell<Option<Config>>,
    error: RefCell<Option<String>>,
    _environment: MutexGuard<'static, ()>,
}

impl Harness {
    fn new() -> Self {
        let temp_dir = match TempDir::new() {
            Ok(dir) => dir,
            Err(error) => panic!("failed to create temporary directory: {error}"),
        };
        let environment = ENVIRONMENT.lock().unwrap_or_else(PoisonError::into_inner);
        Self {
            temp_dir,
            cli_args: RefCell::new(vec![OsString::from("opshell")]),
            env_overrides: RefCell::new(Vec::new()),
            loaded: RefCell::new(None),
            error: RefCell::new(None),
            _environment: environment,
        }
    }

    fn write_config(&self, node_name: &str) {
        let path = self.temp_dir.path().join("opshell.toml");
        if let Err(error) = fs::write(&path, format!("node_name = \"{node_name}\"\n")) {
            panic!("failed to write configuration: {error}");
        }

        let mut args = self.cli_args.borrow_mut();
        args.push(OsString::from("--config-path"));
        args.push(path.into_os_string());
    }

    fn set_env(&self, key: &str, value: &str) {
        let previous = std::env::var_os(key);
        // Environment mutation is `unsafe` in edition 2024. Overrides are
        // restored in `Drop` while the environment lock is still held.
        unsafe { std::env::set_var(key, value) };
        self.env_overrides
            .borrow_mut()
            .push((key.to_owned(), previous));
    }

    fn push_cli_arg(&self, arg: impl Into<OsString>) {
        self.cli_args.borrow_mut().push(arg.into());
    }

    fn load(&self) {
        if self.loaded.borrow().is_some() || self.error.borrow().is_some() {
            return;
        }

        let args = self.cli_args.borrow().clone();
        match Config::load_from_iter(args) {
            Ok(config) => {
                *self.loaded.borrow_mut() = Some(config);
            }
            Err(error) => {
                *self.error.borrow_mut() = Some(error.to_string());
            }
        }
    }

    fn loaded_config(&self) -> Config {
        self.load();
        if let Some(error) = self.error.borrow().as_ref() {
            panic!("configuration failed to load: {error}");
        }
        match self.loaded.borrow().as_ref() {
            Some(config) => config.clone(),
            None => panic!("configuration was not loaded"),
        }
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let mut overrides = self.env_overrides.borrow_mut();
        while let Some((key, value)) = overrides.pop() {
            if let Some(previous) = value {
                unsafe { std::env::set_var(&key, previous) };
            } else {
                unsafe { std::env::remove_var(&key) };
            }
        }
    }
}

#[fixture]
fn harness() -> Harness {
    Harness::new()
}

#[given("a configuration file setting the node name to {name}")]
fn given_configuration_file(harness: &Harness, name: String) {
    harness.write_config(&name);
}

#[given("the environment sets the node name to {name}")]
fn given_environment_node_name(harness: &Harness, name: String) {
    harness.set_env("OPSHELL_NODE_NAME", &name);
}

#[when("the CLI sets the node name to {name}")]
fn when_cli_sets_node_name(harness: &Harness, name: String) {
    harness.push_cli_arg("--node-name");
    harness.push_cli_arg(name);
}

#[when("the CLI sets the log format to {format}")]
fn when_cli_sets_log_format(harness: &Harness, format: String) {
    harness.push_cli_arg("--log-format");
    harness.push_cli_arg(format);
}

#[when("the configuration loads without overrides")]
fn when_load_without_overrides(harness: &Harness) {
    harness.load();
}

#[then("loading the configuration resolves the node name to {name}")]
fn then_resolved_node_name(harness: &Harness, name: String) {
    assert_eq!(harness.loaded_config().node_name(), name);
}

#[then("loading the configuration resolves the log format to {format}")]
fn then_resolved_log_format(harness: &Harness, format: String) {
    let expected: LogFormat = match format.parse() {
        Ok(parsed) => parsed,
        Err(error) => panic!("invalid expected format '{format}': {error}"),
    };
    assert_eq!(harness.loaded_config().log_format(), expected);
}

#[then("loading the configuration applies the built-in defaults")]
fn then_defaults_applied(harness: &Harness) {
    let config = harness.loaded_config();
    assert_eq!(config.log_filter(), default_log_filter());
    assert_eq!(config.log_format(), default_log_format());
    assert_eq!(config.node_name(), default_node_name_string());
}

#[scenario(path = "tests/features/configuration_precedence.feature")]
fn configuration_precedence(#[from(harness)] harness: Harness) {
    let _ = harness;
}
