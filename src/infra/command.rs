//! # Command Execution Module / 命令执行模块
//!
//! Helpers for running the external commands behind command-backed tests:
//! splitting a command line, expanding variables and capturing output.
//!
//! 用于运行命令型测试背后的外部命令：拆分命令行、展开变量并捕获输出。

use std::collections::BTreeMap;
use std::process::{Command, ExitStatus, Stdio};

/// Splits a command line using POSIX shell quoting rules.
/// Returns `None` for unbalanced quotes or an empty line.
///
/// 使用 POSIX shell 引号规则拆分命令行。引号不匹配或命令为空时返回 `None`。
pub fn split_command(line: &str) -> Option<Vec<String>> {
    shlex::split(line).filter(|words| !words.is_empty())
}

/// Expands `$VAR` and `${VAR}` in every word, looking variables up in `env`
/// first and in the process environment second. Unknown variables are kept
/// verbatim.
///
/// 展开每个词中的 `$VAR` 与 `${VAR}`，先在 `env` 中查找，再查找进程环境变量。
pub fn expand_words(words: &[String], env: &BTreeMap<String, String>) -> Vec<String> {
    words
        .iter()
        .map(|word| {
            shellexpand::env_with_context_no_errors(word, |name: &str| {
                env.get(name).cloned().or_else(|| std::env::var(name).ok())
            })
            .into_owned()
        })
        .collect()
}

/// Captured streams of a finished command / 已结束命令的输出流
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    pub stdout: String,
    pub stderr: String,
}

impl CapturedOutput {
    /// stdout followed by stderr.
    pub fn combined(&self) -> String {
        let mut combined = self.stdout.clone();
        combined.push_str(&self.stderr);
        combined
    }
}

/// Runs a command to completion and captures its output; stdin is closed.
///
/// # Returns
/// A tuple containing:
/// - The `ExitStatus` of the process wrapped in an `io::Result`.
/// - The captured stdout and stderr.
///
/// 运行命令直到结束并捕获其输出；stdin 被关闭。
pub fn spawn_and_capture(mut cmd: Command) -> (std::io::Result<ExitStatus>, CapturedOutput) {
    let output = match cmd
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
    {
        Ok(output) => output,
        // If spawning fails, we return the error and empty output.
        Err(e) => return (Err(e), CapturedOutput::default()),
    };

    let captured = CapturedOutput {
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };
    (Ok(output.status), captured)
}
