//! # Dot Reporter / 点阵报告器
//!
//! One glyph per test: `.` passed, `F` failed, `,` pending.

use colored::Color;

use crate::core::events::{Event, ListenerResult};
use crate::infra::output::Output;
use crate::reporting::base::{Reporter, footer, indent, paint};

#[derive(Debug)]
pub struct DotReporter {
    output: Output,
    colors: bool,
}

impl DotReporter {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            colors: true,
        }
    }
}

impl Reporter for DotReporter {
    fn set_colors_enabled(&mut self, enabled: bool) {
        self.colors = enabled;
    }

    fn colors_enabled(&self) -> bool {
        self.colors
    }

    fn handle(&mut self, event: &Event<'_>) -> ListenerResult {
        match event {
            Event::RunnerStart => self.output.write(&format!("\n{}", indent(1))),
            Event::TestPassed { .. } => self.output.write(&paint(".", Color::BrightBlack, self.colors)),
            Event::TestFailed { .. } => self.output.write(&paint("F", Color::Red, self.colors)),
            Event::TestPending { .. } => self.output.write(&paint(",", Color::Cyan, self.colors)),
            Event::RunnerEnd { elapsed, result } => {
                self.output.writeln("");
                self.output.write(&footer(result, *elapsed, self.colors));
            }
            _ => {}
        }
        Ok(())
    }
}
