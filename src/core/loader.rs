//! # Suite Loader / 套件加载器
//!
//! The discovery component: resolves a path and a file-name pattern into spec
//! files and declares their contents on the shared [`Context`].
//!
//! 发现组件：将路径和文件名模式解析为规范文件，并在共享的 `Context` 上声明其内容。

use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::core::context::Context;
use crate::core::spec_file::SpecFile;
use crate::error::DiscoveryError;
use crate::infra::fs;

/// File-name pattern used when `--grep` is not given.
pub const DEFAULT_PATTERN: &str = "*.spec.toml";

/// Turns a root path into a populated test tree.
/// 将根路径转换为已填充的测试树。
pub trait SuiteLoader {
    fn set_pattern(&mut self, pattern: &str);

    fn pattern(&self) -> &str;

    /// Spec files reachable from `path`: the file itself, or every file below
    /// the directory whose name matches the pattern.
    fn tests(&self, path: &Path) -> Result<Vec<PathBuf>, DiscoveryError>;

    /// Declares every spec file reachable from `path`.
    fn load(&mut self, path: &Path) -> Result<(), DiscoveryError>;
}

/// Glob-based loader declaring into a [`Context`] / 基于 glob 的加载器
#[derive(Debug)]
pub struct GlobLoader {
    pattern: String,
    context: Rc<Context>,
}

impl GlobLoader {
    pub fn new(pattern: impl Into<String>, context: Rc<Context>) -> Self {
        Self {
            pattern: pattern.into(),
            context,
        }
    }
}

impl SuiteLoader for GlobLoader {
    fn set_pattern(&mut self, pattern: &str) {
        self.pattern = pattern.to_string();
    }

    fn pattern(&self) -> &str {
        &self.pattern
    }

    fn tests(&self, path: &Path) -> Result<Vec<PathBuf>, DiscoveryError> {
        if path.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }
        if !path.is_dir() {
            return Err(DiscoveryError::PathNotFound(path.to_path_buf()));
        }

        let matcher =
            fs::glob_to_regex(&self.pattern).map_err(|source| DiscoveryError::InvalidPattern {
                pattern: self.pattern.clone(),
                source,
            })?;
        fs::find_files(path, &matcher).map_err(|source| DiscoveryError::Read {
            path: path.to_path_buf(),
            source,
        })
    }

    fn load(&mut self, path: &Path) -> Result<(), DiscoveryError> {
        let files = self.tests(path)?;
        debug!(path = %path.display(), pattern = %self.pattern, files = files.len(), "discovered spec files");
        for file in files {
            SpecFile::read(&file)?.declare(&self.context, &file)?;
        }
        Ok(())
    }
}
