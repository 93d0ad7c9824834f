//! # Test Tree / 测试树
//!
//! Suites, tests and the scopes that spec files resolve helpers against.
//!
//! 套件、测试，以及规范文件用于解析辅助命令的作用域。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// What a test does when it runs / 测试运行时执行的内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestBody {
    /// No body, or explicitly skipped.
    Pending,
    /// A literal outcome.
    Assertion { value: bool, message: Option<String> },
    /// An external command, judged by its exit status and output.
    Command(CommandSpec),
}

/// A command-backed test body / 以命令为主体的测试
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// The command line, split with shell rules at execution time.
    pub run: String,
    /// Text the command's stdout must contain.
    pub stdout: Option<String>,
    /// Expected exit status; `0` when absent.
    pub status: Option<i32>,
    /// Failure message shown instead of the generated one.
    pub message: Option<String>,
}

/// A single test / 单个测试
#[derive(Debug, Clone)]
pub struct Test {
    description: String,
    title: String,
    file: Option<PathBuf>,
    body: TestBody,
}

impl Test {
    pub fn new(description: impl Into<String>, body: TestBody) -> Self {
        let description = description.into();
        Self {
            title: description.clone(),
            description,
            file: None,
            body,
        }
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Ancestor descriptions followed by this test's description.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn body(&self) -> &TestBody {
        &self.body
    }

    pub fn is_pending(&self) -> bool {
        self.body == TestBody::Pending
    }
}

/// Named helpers and environment variables visible to the tests of a suite.
///
/// A helper maps a word to the command words it stands for: a test whose
/// command starts with `peridot` runs the helper's words followed by the rest
/// of the command.
///
/// 套件内测试可见的具名辅助命令与环境变量。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    helpers: BTreeMap<String, Vec<String>>,
    env: BTreeMap<String, String>,
    children: Vec<Scope>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_helper<I, S>(mut self, name: impl Into<String>, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.helpers
            .insert(name.into(), words.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn add_child(&mut self, child: Scope) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[Scope] {
        &self.children
    }

    pub fn is_empty(&self) -> bool {
        self.helpers.is_empty() && self.env.is_empty() && self.children.is_empty()
    }

    /// Looks `name` up in this scope, then in child scopes (most recently added first).
    pub fn helper(&self, name: &str) -> Option<&[String]> {
        self.helpers.get(name).map(Vec::as_slice).or_else(|| {
            self.children
                .iter()
                .rev()
                .find_map(|child| child.helper(name))
        })
    }

    pub fn helpers(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.helpers
            .iter()
            .map(|(name, words)| (name.as_str(), words.as_slice()))
    }

    /// Environment variables of this scope and its children; children win.
    pub fn env(&self) -> BTreeMap<String, String> {
        let mut env = self.env.clone();
        for child in &self.children {
            env.extend(child.env());
        }
        env
    }
}

/// A node of the test tree / 测试树的节点
#[derive(Debug, Clone, Default)]
pub struct Suite {
    description: String,
    file: Option<PathBuf>,
    skipped: bool,
    tests: Vec<Test>,
    suites: Vec<Suite>,
    scope: Scope,
}

impl Suite {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, file: Option<PathBuf>) -> Self {
        self.file = file;
        self
    }

    pub fn skipped(mut self, skipped: bool) -> Self {
        self.skipped = skipped;
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    pub fn is_skipped(&self) -> bool {
        self.skipped
    }

    pub fn add_test(&mut self, test: Test) {
        self.tests.push(test);
    }

    pub fn add_suite(&mut self, suite: Suite) {
        self.suites.push(suite);
    }

    pub fn tests(&self) -> &[Test] {
        &self.tests
    }

    pub fn suites(&self) -> &[Suite] {
        &self.suites
    }

    pub(crate) fn suites_mut(&mut self) -> &mut [Suite] {
        &mut self.suites
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn scope_mut(&mut self) -> &mut Scope {
        &mut self.scope
    }

    /// Number of tests in this suite and all of its descendants.
    pub fn total_tests(&self) -> usize {
        self.tests.len() + self.suites.iter().map(Suite::total_tests).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.tests.is_empty() && self.suites.is_empty()
    }
}
