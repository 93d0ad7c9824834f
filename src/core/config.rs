//! # Configuration Units / 配置单元
//!
//! A configuration unit is anything that subscribes listeners to the
//! [`EventBus`] before the first event fires. Units come from two places:
//!
//! - `peridot.toml`, parsed into a [`ConfigFile`] whose sections each become
//!   one listener;
//! - the [`PluginRegistry`], a compile-time table of named units that a
//!   configuration file enables through `plugins = [...]`.
//!
//! 配置单元是在第一个事件触发之前向 `EventBus` 注册监听器的任何东西。
//! 配置单元有两个来源：`peridot.toml`（每个配置段成为一个监听器）
//! 以及 `PluginRegistry`（按名称编译进程序的单元表）。

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::Context as _;
use regex::Regex;
use tracing::{debug, info};

use crate::cli::definition::Input;
use crate::core::events::{EventBus, EventKind};
use crate::core::suite::Scope;
use crate::error::ConfigurationError;
use crate::infra::{command, fs as pfs};

/// Subscribes listeners to the bus / 向事件总线注册监听器
pub trait ConfigurationUnit {
    fn configure(&self, bus: &Rc<EventBus>) -> Result<(), ConfigurationError>;
}

impl<F> ConfigurationUnit for F
where
    F: Fn(&Rc<EventBus>) -> Result<(), ConfigurationError>,
{
    fn configure(&self, bus: &Rc<EventBus>) -> Result<(), ConfigurationError> {
        self(bus)
    }
}

/// Named units compiled into the binary / 编译进程序的具名单元
#[derive(Clone, Default)]
pub struct PluginRegistry {
    units: BTreeMap<String, Rc<dyn ConfigurationUnit>>,
}

impl PluginRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry the `peridot` binary starts with.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("trace-events", trace_events);
        registry
    }

    pub fn register(&mut self, name: impl Into<String>, unit: impl ConfigurationUnit + 'static) {
        self.units.insert(name.into(), Rc::new(unit));
    }

    pub fn get(&self, name: &str) -> Option<Rc<dyn ConfigurationUnit>> {
        self.units.get(name).cloned()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for PluginRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.units.keys()).finish()
    }
}

/// Logs every event at `info` level.
fn trace_events(bus: &Rc<EventBus>) -> Result<(), ConfigurationError> {
    for kind in EventKind::LIFECYCLE.into_iter().chain(EventKind::RUNNER) {
        bus.on(kind, |event| {
            info!(event = %event.kind(), "event");
            Ok(())
        });
    }
    Ok(())
}

/// `[defaults]`: values applied to the input when the command line left them unset.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Defaults {
    #[serde(default)]
    pub reporter: Option<String>,
    #[serde(default)]
    pub grep: Option<String>,
    #[serde(default)]
    pub bail: Option<bool>,
    #[serde(default)]
    pub no_colors: Option<bool>,
    #[serde(default)]
    pub path: Option<String>,
}

impl Defaults {
    /// Fills unset fields of `input`. `base` anchors a relative `path`.
    pub fn apply(&self, input: &mut Input, base: &Path) {
        if input.reporter.is_none() {
            input.reporter = self.reporter.clone();
        }
        if input.grep.is_none() {
            input.grep = self.grep.clone();
        }
        if input.path.is_none() {
            input.path = self.path.as_deref().map(|path| pfs::resolve_path(path, base));
        }
        input.bail |= self.bail.unwrap_or(false);
        input.no_colors |= self.no_colors.unwrap_or(false);
    }
}

/// `[[scope]]`: helpers and variables for suites whose file matches `path`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeDef {
    pub path: String,
    #[serde(default)]
    pub helpers: BTreeMap<String, String>,
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// Parsed `peridot.toml` / 解析后的 `peridot.toml`
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub plugins: Vec<String>,
    #[serde(default)]
    pub dsl: Vec<String>,
    #[serde(default)]
    pub defaults: Option<Defaults>,
    #[serde(default)]
    pub scope: Vec<ScopeDef>,
}

impl ConfigFile {
    pub fn parse(path: &Path, content: &str) -> Result<Self, ConfigurationError> {
        toml::from_str(content).map_err(|source| ConfigurationError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<Self, ConfigurationError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
            && self.dsl.is_empty()
            && self.defaults.is_none()
            && self.scope.is_empty()
    }

    /// Validates every section and turns the file into a unit. `path` is the
    /// file's own location; relative entries resolve against its directory.
    /// An empty file yields `None`.
    pub fn into_unit(
        self,
        path: &Path,
        registry: &PluginRegistry,
    ) -> Result<Option<FileUnit>, ConfigurationError> {
        if self.is_empty() {
            return Ok(None);
        }
        let base = path.parent().unwrap_or(Path::new("")).to_path_buf();

        let plugins = self
            .plugins
            .iter()
            .map(|name| {
                registry
                    .get(name)
                    .map(|unit| (name.clone(), unit))
                    .ok_or_else(|| ConfigurationError::UnknownPlugin(name.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let scopes = self
            .scope
            .iter()
            .map(|def| compile_scope(def, path))
            .collect::<Result<Vec<_>, _>>()?;

        let dsl = self
            .dsl
            .iter()
            .map(|entry| pfs::resolve_path(entry, &base))
            .collect();

        Ok(Some(FileUnit {
            plugins,
            dsl,
            defaults: self.defaults,
            scopes,
            base,
        }))
    }
}

fn compile_scope(def: &ScopeDef, path: &Path) -> Result<(Regex, Scope), ConfigurationError> {
    let matcher = Regex::new(&def.path).map_err(|source| ConfigurationError::InvalidScope {
        pattern: def.path.clone(),
        source,
    })?;

    let mut scope = Scope::new();
    for (name, line) in &def.helpers {
        let words =
            command::split_command(line).ok_or_else(|| ConfigurationError::InvalidHelper {
                path: path.to_path_buf(),
                name: name.clone(),
            })?;
        scope = scope.with_helper(name.clone(), words);
    }
    for (key, value) in &def.env {
        scope = scope.with_env(key.clone(), value.clone());
    }
    Ok((matcher, scope))
}

/// The validated content of one configuration file.
pub struct FileUnit {
    plugins: Vec<(String, Rc<dyn ConfigurationUnit>)>,
    dsl: Vec<PathBuf>,
    defaults: Option<Defaults>,
    scopes: Vec<(Regex, Scope)>,
    base: PathBuf,
}

impl ConfigurationUnit for FileUnit {
    fn configure(&self, bus: &Rc<EventBus>) -> Result<(), ConfigurationError> {
        for (name, unit) in &self.plugins {
            debug!(plugin = %name, "configuring plugin");
            unit.configure(bus)?;
        }

        if !self.dsl.is_empty() {
            let files = self.dsl.clone();
            bus.on_start(move |_, application| {
                for file in &files {
                    application
                        .load_dsl(file)
                        .with_context(|| format!("failed to load {}", file.display()))?;
                }
                Ok(())
            });
        }

        if let Some(defaults) = self.defaults.clone() {
            let base = self.base.clone();
            bus.on_execute(move |input, _| {
                defaults.apply(input, &base);
                Ok(())
            });
        }

        for (matcher, scope) in self.scopes.iter().cloned() {
            bus.on_suite_start(move |suite| {
                let matched = suite
                    .file()
                    .is_some_and(|file| matcher.is_match(&file.to_string_lossy()));
                if matched {
                    suite.scope_mut().add_child(scope.clone());
                }
                Ok(())
            });
        }
        Ok(())
    }
}
