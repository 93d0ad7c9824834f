//! # HTML Reporter / HTML 报告器
//!
//! Renders a self-contained HTML document with summary counts and a results
//! table once the run ends. Captured command output sits in a collapsed
//! `<details>` element under each failing test.
//!
//! 运行结束时渲染一个自包含的 HTML 文档，包含汇总计数和结果表格。
//! 捕获的命令输出位于每个失败测试下方折叠的 `<details>` 元素中。

use chrono::Local;
use maud::{DOCTYPE, Markup, PreEscaped, html};
use std::time::Duration;

use crate::core::events::{Event, ListenerResult};
use crate::core::result::TestResult;
use crate::infra::output::Output;
use crate::infra::t;
use crate::reporting::base::{Reporter, Status, TestRecord};

/// Embedded CSS styles for HTML reports / HTML 报告的嵌入式 CSS 样式
const HTML_STYLE: &str = include_str!("assets/report.css");

#[derive(Debug)]
pub struct HtmlReporter {
    output: Output,
    colors: bool,
    tests: Vec<TestRecord>,
}

impl HtmlReporter {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            colors: true,
            tests: Vec::new(),
        }
    }

    fn render(&self, result: &TestResult, elapsed: Duration) -> Markup {
        let counts = [
            (result.passing_count(), Status::Passed),
            (result.failure_count(), Status::Failed),
            (result.pending_count(), Status::Pending),
        ];
        html! {
            (DOCTYPE)
            html {
                head {
                    meta charset="utf-8";
                    title { (t!("report.title")) }
                    style { (PreEscaped(HTML_STYLE)) }
                }
                body {
                    h1 { (t!("report.title")) }
                    p.generated {
                        (t!("report.generated_at", time = Local::now().format("%Y-%m-%d %H:%M:%S")))
                        " · " (elapsed.as_millis().to_string()) " ms"
                    }
                    div.summary-container {
                        @for (count, status) in counts {
                            div.summary-item {
                                span class={ "count " (status_class(status)) } { (count) }
                                span.label { (status.label()) }
                            }
                        }
                    }
                    table {
                        thead {
                            tr {
                                th { (t!("report.table_title")) }
                                th.status-col { (t!("report.table_status")) }
                                th { (t!("report.table_message")) }
                            }
                        }
                        tbody {
                            @for test in &self.tests {
                                tr {
                                    td { (test.title) }
                                    td.status-col {
                                        div class={ "status-cell " (status_class(test.status)) } {
                                            (test.status.label())
                                        }
                                    }
                                    td {
                                        @if let Some(message) = &test.message {
                                            (message)
                                        }
                                        @if let Some(output) = &test.output {
                                            details {
                                                summary { (t!("report.output")) }
                                                pre.output-content { (output) }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn status_class(status: Status) -> &'static str {
    match status {
        Status::Passed => "passed",
        Status::Failed => "failed",
        Status::Pending => "pending",
    }
}

impl Reporter for HtmlReporter {
    fn set_colors_enabled(&mut self, enabled: bool) {
        self.colors = enabled;
    }

    fn colors_enabled(&self) -> bool {
        self.colors
    }

    fn handle(&mut self, event: &Event<'_>) -> ListenerResult {
        match event {
            Event::RunnerStart => self.tests.clear(),
            Event::RunnerEnd { elapsed, result } => {
                let markup = self.render(result, *elapsed);
                self.output.writeln(&markup.into_string());
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
