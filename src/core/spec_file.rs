//! # Spec File Format / 规范文件格式
//!
//! Spec files are TOML documents made of nested `describe`/`context` tables and
//! `it` entries. Loading a file replays those declarations against the
//! [`Context`], the same way a DSL would call `describe` and `it`.
//!
//! 规范文件是由嵌套的 `describe`/`context` 表和 `it` 条目组成的 TOML 文档。
//! 加载文件时会把这些声明在 `Context` 上重放，就像 DSL 调用 `describe` 和 `it` 一样。

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::core::context::Context;
use crate::core::suite::{CommandSpec, TestBody};
use crate::error::DiscoveryError;

/// Top level of a spec file / 规范文件的顶层
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpecFile {
    #[serde(default)]
    pub describe: Vec<SuiteDef>,
    #[serde(default)]
    pub context: Vec<SuiteDef>,
    #[serde(default)]
    pub it: Vec<TestDef>,
}

/// A `describe` or `context` block / 一个 `describe` 或 `context` 块
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteDef {
    pub description: String,
    #[serde(default)]
    pub skip: bool,
    #[serde(default)]
    pub describe: Vec<SuiteDef>,
    #[serde(default)]
    pub context: Vec<SuiteDef>,
    #[serde(default)]
    pub it: Vec<TestDef>,
}

/// An `it` entry / 一个 `it` 条目
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TestDef {
    pub description: String,
    #[serde(default)]
    pub assert: Option<bool>,
    #[serde(default)]
    pub run: Option<String>,
    #[serde(default)]
    pub stdout: Option<String>,
    #[serde(default)]
    pub status: Option<i32>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub skip: bool,
}

impl TestDef {
    fn body(&self, path: &Path) -> Result<TestBody, DiscoveryError> {
        if self.skip {
            return Ok(TestBody::Pending);
        }
        match (&self.assert, &self.run) {
            (Some(_), Some(_)) => Err(DiscoveryError::InvalidTest {
                path: path.to_path_buf(),
                test: self.description.clone(),
                reason: "a test takes either `assert` or `run`, not both".to_string(),
            }),
            (Some(value), None) => Ok(TestBody::Assertion {
                value: *value,
                message: self.message.clone(),
            }),
            (None, Some(run)) => Ok(TestBody::Command(CommandSpec {
                run: run.clone(),
                stdout: self.stdout.clone(),
                status: self.status,
                message: self.message.clone(),
            })),
            (None, None) => Ok(TestBody::Pending),
        }
    }
}

impl SpecFile {
    pub fn parse(path: &Path, content: &str) -> Result<Self, DiscoveryError> {
        toml::from_str(content).map_err(|source| DiscoveryError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn read(path: &Path) -> Result<Self, DiscoveryError> {
        let content = fs::read_to_string(path).map_err(|source| DiscoveryError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &content)
    }

    /// Declares every suite and test of this file on `context`'s current node.
    pub fn declare(&self, context: &Context, path: &Path) -> Result<(), DiscoveryError> {
        context.with_file(path, |context| {
            declare_block(context, path, &self.describe, &self.context, &self.it)
        })
    }
}

fn declare_block(
    context: &Context,
    path: &Path,
    describe: &[SuiteDef],
    contexts: &[SuiteDef],
    tests: &[TestDef],
) -> Result<(), DiscoveryError> {
    for test in tests {
        context.it(&test.description, test.body(path)?);
    }
    for suite in describe.iter().chain(contexts) {
        context.describe(&suite.description, suite.skip, |context| {
            declare_block(context, path, &suite.describe, &suite.context, &suite.it)
        })?;
    }
    Ok(())
}
