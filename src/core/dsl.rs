//! # DSL Extension Files / DSL 扩展文件
//!
//! A DSL file adds global helpers that every spec file can call:
//!
//! ```toml
//! [helpers]
//! peridot = "target/debug/peridot --lang en"
//! ```

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use tracing::warn;

use crate::core::context::Context;
use crate::error::{DiscoveryError, Result};
use crate::infra::command;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DslFile {
    #[serde(default)]
    pub helpers: BTreeMap<String, String>,
}

impl DslFile {
    pub fn read(path: &Path) -> Result<Self, DiscoveryError> {
        let content = fs::read_to_string(path).map_err(|source| DiscoveryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| DiscoveryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Registers every helper of the file as a global helper of `context`.
    pub fn install(&self, context: &Context, path: &Path) -> Result<()> {
        let origin = path.display().to_string();
        for (name, line) in &self.helpers {
            let words =
                command::split_command(line).ok_or_else(|| DiscoveryError::InvalidHelper {
                    path: path.to_path_buf(),
                    name: name.clone(),
                })?;
            context.define_helper(name, words, &origin)?;
        }
        Ok(())
    }
}

/// Loads `path` into `context` unless it was loaded before.
/// A missing file is skipped and reported as not loaded.
pub fn load(context: &Context, path: &Path) -> Result<bool> {
    if !path.is_file() {
        warn!(path = %path.display(), "dsl file not found, skipping");
        return Ok(false);
    }
    context.include_once(path, |file| DslFile::read(file)?.install(context, file))
}
