//! # Result Aggregation / 结果汇总
//!
//! [`TestResult`] counts outcomes for a single run and announces each one on
//! the bus so reporters can render progress.
//!
//! `TestResult` 统计单次运行的结果，并在事件总线上通告每个结果，以便报告器渲染进度。

use std::rc::Rc;

use serde::Serialize;

use crate::core::events::{Event, EventBus};
use crate::core::suite::Test;
use crate::error::Result;

/// Why a test failed / 测试失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestFailure {
    pub message: String,
    /// Captured stdout and stderr of a command-backed test.
    pub output: Option<String>,
}

impl TestFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            output: None,
        }
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        let output = output.into();
        self.output = (!output.trim().is_empty()).then_some(output);
        self
    }
}

/// A failing test and its failure, kept for the report footer.
#[derive(Debug, Clone)]
pub struct FailedTest {
    pub title: String,
    pub failure: TestFailure,
}

/// Aggregated outcome of a run / 一次运行的汇总结果
#[derive(Debug)]
pub struct TestResult {
    bus: Rc<EventBus>,
    passing: usize,
    pending: usize,
    failures: Vec<FailedTest>,
}

impl TestResult {
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            passing: 0,
            pending: 0,
            failures: Vec::new(),
        }
    }

    pub fn pass_test(&mut self, test: &Test) -> Result<()> {
        self.passing += 1;
        self.bus.emit(&mut Event::TestPassed { test })
    }

    pub fn fail_test(&mut self, test: &Test, failure: TestFailure) -> Result<()> {
        self.failures.push(FailedTest {
            title: test.title().to_string(),
            failure: failure.clone(),
        });
        self.bus.emit(&mut Event::TestFailed {
            test,
            failure: &failure,
        })
    }

    pub fn pend_test(&mut self, test: &Test) -> Result<()> {
        self.pending += 1;
        self.bus.emit(&mut Event::TestPending { test })
    }

    pub fn passing_count(&self) -> usize {
        self.passing
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn pending_count(&self) -> usize {
        self.pending
    }

    pub fn test_count(&self) -> usize {
        self.passing + self.pending + self.failures.len()
    }

    pub fn failures(&self) -> &[FailedTest] {
        &self.failures
    }
}
