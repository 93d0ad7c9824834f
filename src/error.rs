//! # Error Types / 错误类型
//!
//! Typed errors for every failure that is allowed to end a run. Test failures
//! are not errors: they are recorded by [`crate::core::result::TestResult`] and
//! only surface as a non-zero exit code.
//!
//! 所有可以终止一次运行的错误类型。测试失败不是错误：
//! 它们由 `TestResult` 记录，只会体现为非零退出码。

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error of a peridot run / peridot 运行的顶层错误
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("reporter \"{0}\" is not registered")]
    UnknownReporter(String),

    /// A DSL file tried to define a helper that another file already owns.
    #[error("helper `{name}` is already defined by {defined_in}")]
    HelperRedefinition { name: String, defined_in: String },

    #[error("listener for `{event}` failed: {source:#}")]
    Listener {
        event: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Failures while resolving or applying a configuration file.
/// 解析或应用配置文件时的失败。
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("configuration file specified but does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read configuration {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unknown plugin `{0}`")]
    UnknownPlugin(String),

    #[error("invalid scope pattern `{pattern}`: {source}")]
    InvalidScope {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("helper `{name}` in {} is not a valid command line", path.display())]
    InvalidHelper { path: PathBuf, name: String },
}

/// Failures while turning a path and a pattern into a test tree.
/// 将路径和模式转换为测试树时的失败。
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("cannot load path {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid test \"{test}\" in {}: {reason}", path.display())]
    InvalidTest {
        path: PathBuf,
        test: String,
        reason: String,
    },

    #[error("helper `{name}` in {} is not a valid command line", path.display())]
    InvalidHelper { path: PathBuf, name: String },

    #[error("invalid file pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
