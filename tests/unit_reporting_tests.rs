//! # Reporting Unit Tests / 报告单元测试
//!
//! Each built-in reporter driven through a real run into a buffered output.
//!
//! 通过真实运行把每个内置报告器的输出写入缓冲区进行测试。

mod common;

use std::time::Duration;

use common::{FAILING_SPEC, write_file};
use peridot::cli::Options;
use peridot::cli::definition::Input;
use peridot::core::events::EventBus;
use peridot::core::result::{TestFailure, TestResult};
use peridot::core::suite::{Test, TestBody};
use peridot::infra::output::Output;
use peridot::reporting::base::footer;
use peridot::reporting::factory::ReporterFactory;
use tempfile::tempdir;

const NESTED_SPEC: &str = r#"
[[describe]]
description = "Array"

  [[describe.it]]
  description = "has a length"
  assert = true

  [[describe.context]]
  description = "when empty"

    [[describe.context.it]]
    description = "is falsy"
    assert = false
    message = "expected [] to be falsy"

    [[describe.context.it]]
    description = "is pending"
"#;

/// Runs `spec` with `reporter` and returns everything written.
fn render(spec: &str, reporter: &str, colors: bool) -> String {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "array.spec.toml", spec);

    let application = common::application(Options::new());
    let output = Output::buffered();
    let mut input = Input {
        path: Some(dir.path().to_path_buf()),
        reporter: Some(reporter.to_string()),
        no_colors: !colors,
        ..Input::default()
    };
    application.run_with(&mut input, &output);
    output.fetch()
}

#[cfg(test)]
mod spec_reporter_tests {
    use super::*;

    #[test]
    fn test_indents_suites_and_numbers_failures() {
        let text = render(NESTED_SPEC, "spec", false);

        assert!(text.contains("\n  Array\n"));
        assert!(text.contains("    ✓ has a length\n"));
        assert!(text.contains("    when empty\n"));
        assert!(text.contains("      1) is falsy\n"));
        assert!(text.contains("      - is pending\n"));
        assert!(text.contains("  1 passing ("));
        assert!(text.contains("  1 failing\n"));
        assert!(text.contains("  1 pending\n"));
        assert!(text.contains("  1) Array when empty is falsy:\n"));
        assert!(text.contains("     expected [] to be falsy\n"));
    }

    #[test]
    fn test_no_escape_codes_without_colors() {
        let text = render(NESTED_SPEC, "spec", false);
        assert!(!text.contains('\u{1b}'));
    }
}

#[cfg(test)]
mod dot_reporter_tests {
    use super::*;

    #[test]
    fn test_one_glyph_per_test() {
        let text = render(NESTED_SPEC, "dot", false);
        assert!(text.starts_with("\n  .F,\n"));
        assert!(text.contains("  1 failing"));
    }
}

#[cfg(test)]
mod document_reporter_tests {
    use super::*;

    #[test]
    fn test_json_document() {
        let text = render(FAILING_SPEC, "json", false);
        let document: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(document["stats"]["passes"], 1);
        assert_eq!(document["stats"]["failures"], 1);
        assert_eq!(document["stats"]["pending"], 0);
        assert!(document["stats"]["start"].is_string());

        let tests = document["tests"].as_array().unwrap();
        assert_eq!(tests.len(), 2);
        assert_eq!(tests[0]["title"], "Array is empty");
        assert_eq!(tests[0]["status"], "failed");
        assert_eq!(tests[0]["message"], "expected array to be empty");
        assert_eq!(tests[1]["status"], "passed");
        assert!(tests[1].get("message").is_none());
    }

    #[test]
    fn test_html_document() {
        let text = render(NESTED_SPEC, "html", true);

        assert!(text.starts_with("<!DOCTYPE html>"));
        assert!(text.contains("<title>Peridot Test Report</title>"));
        assert!(text.contains("Array when empty is falsy"));
        assert!(text.contains("expected [] to be falsy"));
        assert!(text.contains("status-cell failed"));
        assert!(!text.contains('\u{1b}'));
    }
}

#[cfg(test)]
mod factory_tests {
    use super::*;

    #[test]
    fn test_defaults_in_registration_order() {
        let factory = ReporterFactory::with_defaults(EventBus::new());
        let names: Vec<&str> = factory.entries().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["spec", "dot", "json", "html"]);
        assert!(factory.contains("dot"));
        assert!(!factory.contains("tap"));
    }

    #[test]
    fn test_footer_lists_failures_with_output() {
        let bus = EventBus::new();
        let mut result = TestResult::new(bus);
        let test = Test::new("runs", TestBody::Pending);
        result
            .fail_test(
                &test,
                TestFailure::new("command `x` exited with status 2").with_output("boom\n"),
            )
            .unwrap();

        let text = footer(&result, Duration::from_millis(12), false);
        assert!(text.contains("  0 passing (12 ms)\n"));
        assert!(text.contains("  1 failing\n"));
        assert!(!text.contains("pending"));
        assert!(text.contains("  1) runs:\n     command `x` exited with status 2\n     boom\n"));
    }
}
