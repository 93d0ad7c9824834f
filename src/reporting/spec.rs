//! # Spec Reporter / 规范报告器
//!
//! Hierarchical list: suites indented by depth, one line per test.
//!
//! ```text
//!
//!   Array
//!     ✓ has a length
//!     when empty
//!       1) runs a command
//!       - is pending
//! ```

use colored::Color;

use crate::core::events::{Event, ListenerResult};
use crate::infra::output::Output;
use crate::reporting::base::{Reporter, footer, indent, paint};

#[derive(Debug)]
pub struct SpecReporter {
    output: Output,
    colors: bool,
    depth: usize,
    // One entry per open suite: whether it printed a heading.
    headings: Vec<bool>,
    failures: usize,
}

impl SpecReporter {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            colors: true,
            depth: 0,
            headings: Vec::new(),
            failures: 0,
        }
    }

    fn line(&self, text: &str) {
        self.output
            .writeln(&format!("{}{}", indent(self.depth + 1), text));
    }
}

impl Reporter for SpecReporter {
    fn set_colors_enabled(&mut self, enabled: bool) {
        self.colors = enabled;
    }

    fn colors_enabled(&self) -> bool {
        self.colors
    }

    fn handle(&mut self, event: &Event<'_>) -> ListenerResult {
        match event {
            Event::RunnerStart => self.output.writeln(""),
            Event::SuiteStart { suite } => {
                let heading = !suite.description().is_empty();
                if heading {
                    self.line(suite.description());
                    self.depth += 1;
                }
                self.headings.push(heading);
            }
            Event::SuiteEnd { .. } => {
                if self.headings.pop() == Some(true) {
                    self.depth -= 1;
                }
            }
            Event::TestPassed { test } => {
                let text = format!(
                    "{} {}",
                    paint("✓", Color::Green, self.colors),
                    paint(test.description(), Color::BrightBlack, self.colors)
                );
                self.line(&text);
            }
            Event::TestFailed { test, .. } => {
                self.failures += 1;
                let text = format!("{}) {}", self.failures, test.description());
                self.line(&paint(&text, Color::Red, self.colors));
            }
            Event::TestPending { test } => {
                let text = format!("- {}", test.description());
                self.line(&paint(&text, Color::Cyan, self.colors));
            }
            Event::RunnerEnd { elapsed, result } => {
                self.output.write(&footer(result, *elapsed, self.colors));
            }
            _ => {}
        }
        Ok(())
    }
}
