//! # Environment / 运行环境
//!
//! Owns the pre-parsed [`Options`], the shared [`EventBus`] and [`Context`],
//! and the configuration loading that populates the bus before the first
//! lifecycle event.
//!
//! 持有预解析的 `Options`、共享的 `EventBus` 与 `Context`，
//! 并在第一个生命周期事件之前通过加载配置来填充事件总线。

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::cli::Options;
use crate::cli::definition::InputDefinition;
use crate::core::config::{ConfigFile, ConfigurationUnit, PluginRegistry};
use crate::core::context::Context;
use crate::core::events::EventBus;
use crate::error::ConfigurationError;
use crate::infra::fs;

/// Option keys naming a configuration file, in lookup order.
pub const CONFIGURATION_KEYS: [&str; 2] = ["c", "configuration"];

#[derive(Debug)]
pub struct Environment {
    definition: InputDefinition,
    bus: Rc<EventBus>,
    context: Rc<Context>,
    options: Options,
    plugins: PluginRegistry,
}

impl Environment {
    pub fn new(definition: InputDefinition, bus: Rc<EventBus>, options: Options) -> Self {
        let context = Context::new(bus.clone());
        Self {
            definition,
            bus,
            context,
            options,
            plugins: PluginRegistry::new(),
        }
    }

    pub fn with_plugins(mut self, plugins: PluginRegistry) -> Self {
        self.plugins = plugins;
        self
    }

    /// Applies the configuration file, if any.
    ///
    /// An explicit `-c`/`--configuration` path must name an existing file;
    /// otherwise `default` is used when present and silently skipped when not.
    pub fn load(&self, default: &Path) -> Result<(), ConfigurationError> {
        let Some(path) = self.configuration_path(default)? else {
            debug!(default = %default.display(), "no configuration file");
            return Ok(());
        };
        debug!(path = %path.display(), "loading configuration");

        self.context.include_once(&path, |file| {
            match ConfigFile::read(file)?.into_unit(file, &self.plugins)? {
                Some(unit) => unit.configure(&self.bus),
                None => Ok(()),
            }
        })?;
        Ok(())
    }

    /// The first explicit key naming an existing file wins. Explicit keys that
    /// all miss are an error; with none given the default is tried.
    fn configuration_path(&self, default: &Path) -> Result<Option<PathBuf>, ConfigurationError> {
        let explicit: Vec<PathBuf> = CONFIGURATION_KEYS
            .iter()
            .filter_map(|key| self.options.get(key))
            .map(|value| fs::resolve_path(value, Path::new("")))
            .collect();

        if let Some(path) = explicit.iter().find(|path| path.is_file()) {
            return Ok(Some(path.clone()));
        }
        match explicit.into_iter().next() {
            Some(missing) => Err(ConfigurationError::NotFound(missing)),
            None if default.is_file() => Ok(Some(default.to_path_buf())),
            None => Ok(None),
        }
    }

    pub fn definition(&self) -> &InputDefinition {
        &self.definition
    }

    pub fn context(&self) -> &Rc<Context> {
        &self.context
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn plugins(&self) -> &PluginRegistry {
        &self.plugins
    }
}
