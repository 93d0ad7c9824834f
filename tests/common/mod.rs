// Shared test helpers for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use peridot::cli::Options;
use peridot::cli::application::Application;
use peridot::cli::definition::{Input, InputDefinition};
use peridot::cli::environment::Environment;
use peridot::core::config::PluginRegistry;
use peridot::core::events::EventBus;

pub const PASSING_SPEC: &str = r#"
[[describe]]
description = "Array"

  [[describe.it]]
  description = "has a length"
  assert = true
"#;

pub const FAILING_SPEC: &str = r#"
[[describe]]
description = "Array"

  [[describe.it]]
  description = "is empty"
  assert = false
  message = "expected array to be empty"

  [[describe.it]]
  description = "has a length"
  assert = true
"#;

/// Writes `content` to `dir/relative`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, content).expect("Failed to write fixture");
    path
}

/// An environment with the built-in plugins and a fresh bus.
pub fn environment(options: Options) -> Rc<Environment> {
    Rc::new(
        Environment::new(InputDefinition::new(), EventBus::new(), options)
            .with_plugins(PluginRegistry::with_builtins()),
    )
}

pub fn application(options: Options) -> Rc<Application> {
    Application::new(environment(options)).expect("Failed to create application")
}

/// Input pointing at `path` with colors off, so output is plain text.
pub fn input_for(path: &Path) -> Input {
    Input {
        path: Some(path.to_path_buf()),
        no_colors: true,
        ..Input::default()
    }
}
