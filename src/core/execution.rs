//! # Test Execution Module / 测试执行模块
//!
//! Turns a single [`Test`] into an [`Outcome`]. Command-backed tests resolve
//! their first word against the scope chain, expand variables, and run in the
//! directory of the spec file that declared them.
//!
//! 将单个 `Test` 转换为 `Outcome`。命令型测试根据作用域链解析第一个词，
//! 展开变量，并在声明它的规范文件所在目录中运行。

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use std::time::Instant;

use tracing::debug;

use crate::core::result::TestFailure;
use crate::core::suite::{CommandSpec, Scope, Test, TestBody};
use crate::infra::{command, t};

/// How a test ended / 测试的结束方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(TestFailure),
    Pending,
}

/// Runs `test` with `scopes` ordered outermost first; the last scope wins.
pub fn run_test(test: &Test, scopes: &[&Scope]) -> Outcome {
    match test.body() {
        TestBody::Pending => Outcome::Pending,
        TestBody::Assertion { value: true, .. } => Outcome::Passed,
        TestBody::Assertion {
            value: false,
            message,
        } => Outcome::Failed(TestFailure::new(
            message
                .clone()
                .unwrap_or_else(|| t!("report.assertion_failed").to_string()),
        )),
        TestBody::Command(spec) => run_command_test(test, spec, scopes),
    }
}

fn run_command_test(test: &Test, spec: &CommandSpec, scopes: &[&Scope]) -> Outcome {
    let fail = |generated: String| TestFailure::new(spec.message.clone().unwrap_or(generated));

    let Some(words) = command::split_command(&spec.run) else {
        return Outcome::Failed(fail(
            t!("report.command_parse", command = &spec.run).to_string(),
        ));
    };

    let env = scope_env(scopes);
    let words = command::expand_words(&resolve_helper(words, scopes), &env);
    let (program, args) = match words.split_first() {
        Some((program, args)) => (program, args),
        None => {
            return Outcome::Failed(fail(
                t!("report.command_parse", command = &spec.run).to_string(),
            ));
        }
    };

    let mut cmd = Command::new(program);
    cmd.args(args).envs(&env);
    if let Some(dir) = test.file().and_then(Path::parent) {
        if !dir.as_os_str().is_empty() {
            cmd.current_dir(dir);
        }
    }

    let started = Instant::now();
    let (status, captured) = command::spawn_and_capture(cmd);
    let output = captured.combined();
    debug!(test = test.title(), command = %spec.run, elapsed = ?started.elapsed(), "command finished");

    let status = match status {
        Ok(status) => status,
        Err(e) => {
            return Outcome::Failed(fail(
                t!("report.command_spawn", command = &spec.run, error = e).to_string(),
            ));
        }
    };

    let expected = spec.status.unwrap_or(0);
    match status.code() {
        Some(code) if code == expected => {}
        Some(code) => {
            return Outcome::Failed(
                fail(t!("report.command_failed", command = &spec.run, status = code).to_string())
                    .with_output(output),
            );
        }
        None => {
            return Outcome::Failed(
                fail(t!("report.command_signal", command = &spec.run).to_string())
                    .with_output(output),
            );
        }
    }

    if let Some(needle) = &spec.stdout {
        if !captured.stdout.contains(needle.as_str()) {
            return Outcome::Failed(
                fail(t!("report.command_output", expected = needle).to_string())
                    .with_output(output),
            );
        }
    }

    Outcome::Passed
}

/// Replaces a leading helper name with the helper's words.
/// The innermost scope that defines the helper wins.
pub fn resolve_helper(words: Vec<String>, scopes: &[&Scope]) -> Vec<String> {
    let helper = words
        .first()
        .and_then(|first| scopes.iter().rev().find_map(|scope| scope.helper(first)));
    match helper {
        Some(helper) => helper.iter().chain(&words[1..]).cloned().collect(),
        None => words,
    }
}

/// Environment variables from every scope; inner scopes override outer ones.
pub fn scope_env(scopes: &[&Scope]) -> BTreeMap<String, String> {
    scopes.iter().fold(BTreeMap::new(), |mut env, scope| {
        env.extend(scope.env());
        env
    })
}
