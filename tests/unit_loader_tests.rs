//! # Loader Unit Tests / 加载器单元测试
//!
//! Glob translation, file discovery and spec-file declaration.
//!
//! 测试 glob 转换、文件发现以及规范文件声明。

mod common;

use std::path::Path;

use common::{PASSING_SPEC, write_file};
use peridot::core::context::Context;
use peridot::core::events::EventBus;
use peridot::core::loader::{DEFAULT_PATTERN, GlobLoader, SuiteLoader};
use peridot::core::spec_file::SpecFile;
use peridot::core::suite::TestBody;
use peridot::error::DiscoveryError;
use peridot::infra::fs::glob_to_regex;
use tempfile::tempdir;

#[cfg(test)]
mod glob_tests {
    use super::*;

    #[test]
    fn test_glob_matches_whole_file_name() {
        let re = glob_to_regex("*.spec.toml").unwrap();
        assert!(re.is_match("array.spec.toml"));
        assert!(!re.is_match("array.spec.toml.bak"));
        assert!(!re.is_match("arrayXspecXtoml"));
    }

    #[test]
    fn test_question_mark_matches_one_character() {
        let re = glob_to_regex("a?.toml").unwrap();
        assert!(re.is_match("ab.toml"));
        assert!(!re.is_match("abc.toml"));
    }
}

#[cfg(test)]
mod discovery_tests {
    use super::*;

    #[test]
    fn test_directory_is_searched_recursively_and_sorted() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "b.spec.toml", PASSING_SPEC);
        write_file(dir.path(), "nested/a.spec.toml", PASSING_SPEC);
        write_file(dir.path(), "ignored.test.toml", PASSING_SPEC);

        let loader = GlobLoader::new(DEFAULT_PATTERN, Context::new(EventBus::new()));
        let files = loader.tests(dir.path()).unwrap();

        let names: Vec<String> = files
            .iter()
            .map(|file| file.strip_prefix(dir.path()).unwrap().display().to_string())
            .collect();
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"b.spec.toml".to_string()));
        assert!(files.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_are_not_followed() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "specs/a.spec.toml", PASSING_SPEC);
        let specs = dir.path().join("specs");
        std::os::unix::fs::symlink(dir.path(), specs.join("loop")).unwrap();

        let loader = GlobLoader::new(DEFAULT_PATTERN, Context::new(EventBus::new()));
        let files = loader.tests(&specs).unwrap();
        assert_eq!(files, vec![specs.join("a.spec.toml")]);
    }

    #[test]
    fn test_file_path_is_loaded_regardless_of_pattern() {
        let dir = tempdir().unwrap();
        let file = write_file(dir.path(), "single.test.toml", PASSING_SPEC);

        let loader = GlobLoader::new(DEFAULT_PATTERN, Context::new(EventBus::new()));
        assert_eq!(loader.tests(&file).unwrap(), vec![file]);
    }

    #[test]
    fn test_missing_path_is_an_error() {
        let loader = GlobLoader::new(DEFAULT_PATTERN, Context::new(EventBus::new()));
        let err = loader.tests(Path::new("does/not/exist")).unwrap_err();
        assert!(matches!(err, DiscoveryError::PathNotFound(_)));
    }

    #[test]
    fn test_set_pattern_changes_matching() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "one.spec.toml", PASSING_SPEC);
        write_file(dir.path(), "two.test.toml", PASSING_SPEC);

        let mut loader = GlobLoader::new(DEFAULT_PATTERN, Context::new(EventBus::new()));
        loader.set_pattern("*.test.toml");
        assert_eq!(loader.pattern(), "*.test.toml");

        let files = loader.tests(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("two.test.toml"));
    }

    #[test]
    fn test_load_declares_suites_on_context() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "array.spec.toml", PASSING_SPEC);

        let context = Context::new(EventBus::new());
        let mut loader = GlobLoader::new(DEFAULT_PATTERN, context.clone());
        loader.load(dir.path()).unwrap();

        context.with_root(|root| {
            assert_eq!(root.suites()[0].description(), "Array");
            assert_eq!(root.total_tests(), 1);
        });
    }
}

#[cfg(test)]
mod spec_file_tests {
    use super::*;

    #[test]
    fn test_parse_command_test() {
        let spec = SpecFile::parse(
            Path::new("cmd.spec.toml"),
            r#"
            [[it]]
            description = "lists reporters"
            run = "peridot --reporters"
            stdout = "spec - "
            status = 0
            "#,
        )
        .unwrap();

        let context = Context::new(EventBus::new());
        spec.declare(&context, Path::new("cmd.spec.toml")).unwrap();
        context.with_root(|root| match root.tests()[0].body() {
            TestBody::Command(command) => {
                assert_eq!(command.run, "peridot --reporters");
                assert_eq!(command.stdout.as_deref(), Some("spec - "));
                assert_eq!(command.status, Some(0));
            }
            other => panic!("unexpected body: {other:?}"),
        });
    }

    #[test]
    fn test_context_is_a_synonym_for_describe() {
        let spec = SpecFile::parse(
            Path::new("ctx.spec.toml"),
            r#"
            [[describe]]
            description = "outer"

              [[describe.context]]
              description = "when nested"

                [[describe.context.it]]
                description = "has no body"
            "#,
        )
        .unwrap();

        let context = Context::new(EventBus::new());
        spec.declare(&context, Path::new("ctx.spec.toml")).unwrap();
        context.with_root(|root| {
            let test = &root.suites()[0].suites()[0].tests()[0];
            assert_eq!(test.title(), "outer when nested has no body");
            assert!(test.is_pending());
        });
    }

    #[test]
    fn test_assert_and_run_together_is_invalid() {
        let spec = SpecFile::parse(
            Path::new("bad.spec.toml"),
            r#"
            [[it]]
            description = "confused"
            assert = true
            run = "true"
            "#,
        )
        .unwrap();

        let context = Context::new(EventBus::new());
        let err = spec
            .declare(&context, Path::new("bad.spec.toml"))
            .unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidTest { .. }));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let err = SpecFile::parse(
            Path::new("typo.spec.toml"),
            r#"
            [[it]]
            description = "typo"
            asert = true
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, DiscoveryError::Parse { .. }));
    }
}
