//! # Command-Line Interface / 命令行接口
//!
//! Process entry for the `peridot` binary. Options that must be known before
//! the command definition exists (`--lang`, `-c`/`--configuration`) are
//! pre-parsed from the raw arguments; everything else is left to clap.
//!
//! `peridot` 可执行文件的进程入口。在命令定义存在之前就必须知道的选项
//! （`--lang`、`-c`/`--configuration`）从原始参数中预解析，其余交给 clap。

pub mod application;
pub mod command;
pub mod definition;
pub mod environment;

use std::collections::BTreeMap;
use std::env;
use std::rc::Rc;

use crate::cli::application::Application;
use crate::infra::output::Output;

/// Pre-parsed options as key → value / 预解析选项（键 → 值）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    values: BTreeMap<String, String>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Extracts the options the environment needs before clap runs.
/// 在 clap 运行之前提取环境所需的选项。
#[derive(Debug, Clone, Copy, Default)]
pub struct CliOptionParser;

impl CliOptionParser {
    /// Value-taking flags understood here, as (flag, option key).
    const FLAGS: [(&'static str, &'static str); 3] = [
        ("-c", "c"),
        ("--configuration", "configuration"),
        ("--lang", "lang"),
    ];

    /// Scans `args` (program name excluded). The first occurrence of a key wins.
    /// Accepts `--flag value`, `--flag=value` and `-cvalue`.
    pub fn parse(args: &[String]) -> Options {
        let mut options = Options::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "--" {
                break;
            }
            for (flag, key) in Self::FLAGS {
                let value = if arg == flag {
                    iter.clone().next().cloned()
                } else if let Some(rest) = arg.strip_prefix(flag) {
                    match rest.strip_prefix('=') {
                        Some(value) => Some(value.to_string()),
                        // Only the short flag takes an attached value.
                        None if flag.len() == 2 && !rest.is_empty() => Some(rest.to_string()),
                        None => None,
                    }
                } else {
                    None
                };
                if let Some(value) = value {
                    if !options.contains(key) {
                        options.values.insert(key.to_string(), value);
                    }
                    break;
                }
            }
        }
        options
    }
}

/// Runs the binary with the process arguments and returns its exit code.
pub fn run() -> i32 {
    let args: Vec<String> = env::args().skip(1).collect();
    crate::init(CliOptionParser::parse(&args).get("lang"));

    let environment = Application::environment_for(&args);
    application::launch(Rc::new(environment), None, &Output::stdout())
}
