//! # JSON Reporter / JSON 报告器
//!
//! Writes a single JSON document when the run ends:
//!
//! ```json
//! {
//!   "stats": { "passes": 1, "failures": 0, "pending": 0, "duration_ms": 3, "start": "..." },
//!   "tests": [ { "title": "Array has a length", "status": "passed" } ]
//! }
//! ```

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::core::events::{Event, ListenerResult};
use crate::infra::output::Output;
use crate::reporting::base::{Reporter, TestRecord};

#[derive(Debug, Serialize)]
struct Stats {
    passes: usize,
    failures: usize,
    pending: usize,
    duration_ms: u128,
    start: DateTime<Local>,
}

#[derive(Debug, Serialize)]
struct Document<'a> {
    stats: Stats,
    tests: &'a [TestRecord],
}

#[derive(Debug)]
pub struct JsonReporter {
    output: Output,
    colors: bool,
    started: DateTime<Local>,
    tests: Vec<TestRecord>,
}

impl JsonReporter {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            colors: true,
            started: Local::now(),
            tests: Vec::new(),
        }
    }
}

impl Reporter for JsonReporter {
    fn set_colors_enabled(&mut self, enabled: bool) {
        self.colors = enabled;
    }

    fn colors_enabled(&self) -> bool {
        self.colors
    }

    fn handle(&mut self, event: &Event<'_>) -> ListenerResult {
        match event {
            Event::RunnerStart => {
                self.started = Local::now();
                self.tests.clear();
            }
            Event::RunnerEnd { elapsed, result } => {
                let document = Document {
                    stats: Stats {
                        passes: result.passing_count(),
                        failures: result.failure_count(),
                        pending: result.pending_count(),
                        duration_ms: elapsed.as_millis(),
                        start: self.started,
                    },
                    tests: &self.tests,
                };
                self.output.writeln(&serde_json::to_string_pretty(&document)?);
            }
            other => {
                if let Some(record) = TestRecord::from_event(other) {
                    self.tests.push(record);
                }
            }
        }
        Ok(())
    }
}
