//! # Input Definition / 输入定义
//!
//! The single `peridot` command: its flags, its positional path and the
//! [`Input`] they parse into. Built with the clap builder API so every help
//! string goes through the active locale.
//!
//! 唯一的 `peridot` 命令：它的标志、位置参数路径以及解析得到的 `Input`。

use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

use crate::cli::application::COMMAND_NAME;
use crate::infra::t;

/// Parsed command line / 解析后的命令行
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Input {
    pub path: Option<PathBuf>,
    pub grep: Option<String>,
    pub reporter: Option<String>,
    pub no_colors: bool,
    pub bail: bool,
    pub reporters: bool,
    pub configuration: Option<PathBuf>,
    pub lang: Option<String>,
}

impl Input {
    fn from_matches(matches: &ArgMatches) -> Self {
        Self {
            path: matches.get_one::<PathBuf>("path").cloned(),
            grep: matches.get_one::<String>("grep").cloned(),
            reporter: matches.get_one::<String>("reporter").cloned(),
            no_colors: matches.get_flag("no-colors"),
            bail: matches.get_flag("bail"),
            reporters: matches.get_flag("reporters"),
            configuration: matches.get_one::<PathBuf>("configuration").cloned(),
            lang: matches.get_one::<String>("lang").cloned(),
        }
    }
}

/// Describes the accepted arguments / 描述可接受的参数
#[derive(Debug, Clone, Default)]
pub struct InputDefinition;

impl InputDefinition {
    pub fn new() -> Self {
        Self
    }

    pub fn command(&self) -> Command {
        Command::new(COMMAND_NAME)
            .version(env!("CARGO_PKG_VERSION"))
            .about(t!("cli_about").to_string())
            .arg(
                Arg::new("configuration")
                    .short('c')
                    .long("configuration")
                    .help(t!("arg.configuration").to_string())
                    .value_name("FILE")
                    .value_parser(clap::value_parser!(PathBuf))
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("grep")
                    .long("grep")
                    .help(t!("arg.grep").to_string())
                    .value_name("PATTERN")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("reporter")
                    .short('r')
                    .long("reporter")
                    .help(t!("arg.reporter").to_string())
                    .value_name("NAME")
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("no-colors")
                    .long("no-colors")
                    .help(t!("arg.no_colors").to_string())
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("bail")
                    .long("bail")
                    .help(t!("arg.bail").to_string())
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("reporters")
                    .long("reporters")
                    .help(t!("arg.reporters").to_string())
                    .action(ArgAction::SetTrue),
            )
            .arg(
                Arg::new("lang")
                    .long("lang")
                    .help(t!("cli_lang").to_string())
                    .value_name("LANGUAGE")
                    .global(true)
                    .action(ArgAction::Set),
            )
            .arg(
                Arg::new("path")
                    .help(t!("arg.path").to_string())
                    .value_name("PATH")
                    .value_parser(clap::value_parser!(PathBuf))
                    .action(ArgAction::Set),
            )
    }

    /// Parses `argv`, program name included.
    pub fn parse<I, T>(&self, argv: I) -> Result<Input, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let matches = self.command().try_get_matches_from(argv)?;
        Ok(Input::from_matches(&matches))
    }
}
