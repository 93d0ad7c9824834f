//! # Reporter Base / 报告器基础
//!
//! The [`Reporter`] trait and the pieces every reporter shares: colouring,
//! the summary footer and per-test records.
//!
//! `Reporter` 特征以及所有报告器共享的部分：着色、摘要页脚和逐条测试记录。

use colored::{Color, Colorize};
use serde::Serialize;
use std::time::Duration;

use crate::core::events::{Event, ListenerResult};
use crate::core::result::TestResult;
use crate::infra::t;

/// Renders run progress to an output / 将运行进度渲染到输出
pub trait Reporter {
    fn set_colors_enabled(&mut self, enabled: bool);

    fn colors_enabled(&self) -> bool;

    /// Called for every runner, suite and test event.
    fn handle(&mut self, event: &Event<'_>) -> ListenerResult;
}

/// Colours `text` when `enabled`, otherwise returns it untouched.
pub fn paint(text: &str, color: Color, enabled: bool) -> String {
    if enabled {
        text.color(color).to_string()
    } else {
        text.to_string()
    }
}

/// Two spaces per level.
pub fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

// Failure details line up under the test title of `  1) `.
const DETAIL: &str = "     ";

/// Counts followed by the numbered failure details.
///
/// ```text
///
///   2 passing (4 ms)
///   1 failing
///
///   1) Array fails:
///      expected output to contain `x`
/// ```
pub fn footer(result: &TestResult, elapsed: Duration, colors: bool) -> String {
    let mut text = String::from("\n");

    let passing = t!("report.passing", count = result.passing_count());
    text.push_str(&format!(
        "{}{} ({} ms)\n",
        indent(1),
        paint(&passing, Color::Green, colors),
        elapsed.as_millis()
    ));
    if result.failure_count() > 0 {
        let failing = t!("report.failing", count = result.failure_count());
        text.push_str(&format!("{}{}\n", indent(1), paint(&failing, Color::Red, colors)));
    }
    if result.pending_count() > 0 {
        let pending = t!("report.pending", count = result.pending_count());
        text.push_str(&format!("{}{}\n", indent(1), paint(&pending, Color::Cyan, colors)));
    }

    for (number, failed) in result.failures().iter().enumerate() {
        text.push('\n');
        text.push_str(&format!("{}{}) {}:\n", indent(1), number + 1, failed.title));
        for line in failed.failure.message.lines() {
            text.push_str(&format!("{DETAIL}{}\n", paint(line, Color::Red, colors)));
        }
        if let Some(output) = &failed.failure.output {
            for line in output.lines() {
                text.push_str(&format!("{DETAIL}{}\n", paint(line, Color::BrightBlack, colors)));
            }
        }
    }
    text
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Passed,
    Failed,
    Pending,
}

impl Status {
    pub fn label(&self) -> String {
        match self {
            Status::Passed => t!("report.status_passed").to_string(),
            Status::Failed => t!("report.status_failed").to_string(),
            Status::Pending => t!("report.status_pending").to_string(),
        }
    }
}

/// One finished test, as kept by the document reporters.
#[derive(Debug, Clone, Serialize)]
pub struct TestRecord {
    pub title: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl TestRecord {
    /// Builds a record from a test event; `None` for every other event.
    pub fn from_event(event: &Event<'_>) -> Option<Self> {
        let (test, status, failure) = match event {
            Event::TestPassed { test } => (test, Status::Passed, None),
            Event::TestFailed { test, failure } => (test, Status::Failed, Some(failure)),
            Event::TestPending { test } => (test, Status::Pending, None),
            _ => return None,
        };
        Some(Self {
            title: test.title().to_string(),
            status,
            message: failure.map(|failure| failure.message.clone()),
            output: failure.and_then(|failure| failure.output.clone()),
        })
    }
}
