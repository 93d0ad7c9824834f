//! # Context Unit Tests / 上下文单元测试
//!
//! Tree building through `describe`/`it`, include-once bookkeeping and global
//! helper registration.
//!
//! 测试通过 `describe`/`it` 构建测试树、仅包含一次的记录以及全局辅助命令注册。

use std::path::Path;

use peridot::core::context::Context;
use peridot::core::events::EventBus;
use peridot::core::suite::TestBody;
use peridot::error::Error;
use tempfile::tempdir;

fn assertion(value: bool) -> TestBody {
    TestBody::Assertion {
        value,
        message: None,
    }
}

#[cfg(test)]
mod tree_tests {
    use super::*;

    #[test]
    fn test_nested_describe_builds_titles() {
        let context = Context::new(EventBus::new());
        context
            .describe("Array", false, |context| {
                context.it("has a length", assertion(true));
                context.describe("when empty", false, |context| {
                    context.it("has no items", assertion(true));
                    Ok::<(), Error>(())
                })
            })
            .unwrap();

        context.with_root(|root| {
            assert_eq!(root.total_tests(), 2);
            let array = &root.suites()[0];
            assert_eq!(array.description(), "Array");
            assert_eq!(array.tests()[0].title(), "Array has a length");
            assert_eq!(
                array.suites()[0].tests()[0].title(),
                "Array when empty has no items"
            );
        });
    }

    #[test]
    fn test_tests_under_skipped_suite_are_pending() {
        let context = Context::new(EventBus::new());
        context
            .describe("skipped", true, |context| {
                context.describe("inner", false, |context| {
                    context.it("would fail", assertion(false));
                    Ok::<(), Error>(())
                })
            })
            .unwrap();

        context.with_root(|root| {
            let test = &root.suites()[0].suites()[0].tests()[0];
            assert!(test.is_pending());
        });
    }

    #[test]
    fn test_failed_describe_is_discarded() {
        let context = Context::new(EventBus::new());
        let outcome = context.describe("broken", false, |context| {
            context.it("never attached", assertion(true));
            Err("bad declaration")
        });

        assert_eq!(outcome, Err("bad declaration"));
        assert_eq!(context.current_description(), "");
        context.with_root(|root| assert!(root.is_empty()));
    }

    #[test]
    fn test_take_and_restore_root() {
        let context = Context::new(EventBus::new());
        context.it("top level", assertion(true));

        let root = context.take_root();
        assert_eq!(root.total_tests(), 1);
        context.with_root(|empty| assert!(empty.is_empty()));

        context.restore_root(root);
        context.with_root(|root| assert_eq!(root.total_tests(), 1));
    }

    #[test]
    fn test_with_file_records_file_on_suites_and_tests() {
        let context = Context::new(EventBus::new());
        let file = Path::new("specs/array.spec.toml");
        context.with_file(file, |context| {
            context.describe("Array", false, |context| {
                context.it("has a length", assertion(true));
                Ok::<(), Error>(())
            })
        })
        .unwrap();

        assert_eq!(context.current_file(), None);
        context.with_root(|root| {
            assert_eq!(root.suites()[0].file(), Some(file));
            assert_eq!(root.suites()[0].tests()[0].file(), Some(file));
        });
    }
}

#[cfg(test)]
mod include_tests {
    use super::*;

    #[test]
    fn test_include_once_runs_body_once_per_path() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("unit.toml");
        std::fs::write(&file, "").unwrap();

        let context = Context::new(EventBus::new());
        let mut runs = 0;
        assert!(context
            .include_once(&file, |_| {
                runs += 1;
                Ok::<(), Error>(())
            })
            .unwrap());
        // A different spelling of the same file is still the same file.
        let respelled = dir.path().join(".").join("unit.toml");
        assert!(!context
            .include_once(&respelled, |_| {
                runs += 1;
                Ok::<(), Error>(())
            })
            .unwrap());

        assert_eq!(runs, 1);
        assert!(context.is_included(&file));
    }

    #[test]
    fn test_reset_forgets_includes_and_helpers() {
        let context = Context::new(EventBus::new());
        context
            .define_helper("say", vec!["echo".into()], "a.dsl.toml")
            .unwrap();
        context
            .include_once(Path::new("missing.toml"), |_| Ok::<(), Error>(()))
            .unwrap();

        context.reset();
        assert!(!context.has_helper("say"));
        assert!(!context.is_included(Path::new("missing.toml")));
    }
}

#[cfg(test)]
mod helper_tests {
    use super::*;

    #[test]
    fn test_identical_redefinition_is_accepted() {
        let context = Context::new(EventBus::new());
        let words = vec!["echo".to_string(), "hi".to_string()];
        context.define_helper("say", words.clone(), "a.dsl.toml").unwrap();
        context.define_helper("say", words, "b.dsl.toml").unwrap();
        assert!(context.has_helper("say"));
    }

    #[test]
    fn test_conflicting_redefinition_is_an_error() {
        let context = Context::new(EventBus::new());
        context
            .define_helper("say", vec!["echo".into()], "a.dsl.toml")
            .unwrap();
        let err = context
            .define_helper("say", vec!["printf".into()], "b.dsl.toml")
            .unwrap_err();

        match err {
            Error::HelperRedefinition { name, defined_in } => {
                assert_eq!(name, "say");
                assert_eq!(defined_in, "a.dsl.toml");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_global_scope_exposes_helpers() {
        let context = Context::new(EventBus::new());
        context
            .define_helper("say", vec!["echo".into(), "said".into()], "a.dsl.toml")
            .unwrap();

        let scope = context.global_scope();
        assert_eq!(
            scope.helper("say"),
            Some(&["echo".to_string(), "said".to_string()][..])
        );
    }
}
