//! # Application / 应用程序
//!
//! Process bootstrap: validates the configuration, fires `peridot.start`,
//! builds the one supported [`Command`] and turns its outcome into an exit code.
//!
//! 进程引导：校验配置、触发 `peridot.start`、构建唯一支持的 `Command`，
//! 并将其结果转换为退出码。

use std::env;
use std::path::Path;
use std::rc::Rc;

use clap::error::ErrorKind;
use tracing::debug;

use crate::cli::command::Command;
use crate::cli::definition::{Input, InputDefinition};
use crate::cli::environment::Environment;
use crate::cli::CliOptionParser;
use crate::core::config::PluginRegistry;
use crate::core::dsl;
use crate::core::events::{Event, EventBus};
use crate::error::{ConfigurationError, Error, Result};
use crate::infra::output::Output;
use crate::infra::t;
use crate::reporting::factory::ReporterFactory;

/// Name of the single top-level command.
pub const COMMAND_NAME: &str = "peridot";

/// Configuration file looked up in the working directory.
pub const DEFAULT_CONFIGURATION: &str = "peridot.toml";

#[derive(Debug)]
pub struct Application {
    environment: Rc<Environment>,
}

impl Application {
    /// Loads the configuration and fires `peridot.start`.
    ///
    /// Fails when an explicitly given configuration file does not exist; no
    /// event fires in that case.
    pub fn new(environment: Rc<Environment>) -> Result<Rc<Self>> {
        let default = env::current_dir()?.join(DEFAULT_CONFIGURATION);
        environment.load(&default)?;

        let application = Rc::new(Self { environment });
        application.environment.bus().emit(&mut Event::Start {
            environment: &application.environment,
            application: &application,
        })?;
        Ok(application)
    }

    /// Builds the environment for `args` (program name excluded) with the
    /// built-in plugins and a fresh bus.
    pub fn create(args: &[String]) -> Result<Rc<Self>> {
        Self::new(Rc::new(Self::environment_for(args)))
    }

    /// The environment the binary runs with for `args` (program name excluded).
    pub fn environment_for(args: &[String]) -> Environment {
        Environment::new(
            InputDefinition::new(),
            EventBus::new(),
            CliOptionParser::parse(args),
        )
        .with_plugins(PluginRegistry::with_builtins())
    }

    pub fn environment(&self) -> &Rc<Environment> {
        &self.environment
    }

    pub fn command_name(&self) -> &'static str {
        COMMAND_NAME
    }

    /// Parses `argv` (program name included). `Err` carries the exit code for
    /// input that ends the process: 0 after `--help`/`--version`, 1 otherwise.
    pub fn input<I, T>(&self, argv: I) -> std::result::Result<Input, i32>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        match self.environment.definition().parse(argv) {
            Ok(input) => Ok(input),
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                // Printing to a closed stdout is not worth failing over.
                let _ = e.print();
                Err(0)
            }
            Err(e) => {
                eprintln!("{} {}", t!("error.input_invalid"), e.render());
                Err(1)
            }
        }
    }

    /// Runs against stdout. Without `input` the process arguments are parsed.
    pub fn run(&self, input: Option<Input>) -> i32 {
        self.run_to(input, &Output::stdout())
    }

    /// Like [`Application::run`], writing to `output`.
    pub fn run_to(&self, input: Option<Input>, output: &Output) -> i32 {
        let mut input = match input {
            Some(input) => input,
            None => match self.input(env::args_os()) {
                Ok(input) => input,
                Err(code) => return code,
            },
        };
        self.run_with(&mut input, output)
    }

    /// Runs and renders any fatal error to stderr.
    pub fn run_with(&self, input: &mut Input, output: &Output) -> i32 {
        match self.do_run(input, output) {
            Ok(code) => code,
            Err(e) => {
                eprintln!("{} {}", t!("error.prefix"), render_error(&e));
                1
            }
        }
    }

    /// Runs the command and fires `peridot.end` with its exit code.
    pub fn do_run(&self, input: &mut Input, output: &Output) -> Result<i32> {
        let mut command = self.command();
        let exit_code = command.run(input, output)?;
        debug!(exit_code, "command finished");

        self.environment.bus().emit(&mut Event::End {
            exit_code,
            input: &*input,
            output,
        })?;
        Ok(exit_code)
    }

    pub fn command(&self) -> Command {
        let bus = self.environment.bus().clone();
        Command::new(
            ReporterFactory::with_defaults(bus.clone()),
            bus,
            self.environment.context().clone(),
        )
    }

    /// Loads a DSL extension file once per process. Returns whether the file
    /// was loaded by this call.
    pub fn load_dsl(&self, path: &Path) -> Result<bool> {
        dsl::load(self.environment.context(), path)
    }
}

/// Bootstraps `environment` and runs it to an exit code. A bootstrap failure
/// is rendered to stderr and ends the process with 1 before anything runs.
pub fn launch(environment: Rc<Environment>, input: Option<Input>, output: &Output) -> i32 {
    match Application::new(environment) {
        Ok(application) => application.run_to(input, output),
        Err(e) => {
            eprintln!("{} {}", t!("error.prefix"), render_error(&e));
            1
        }
    }
}

/// Diagnostic text for a fatal error.
pub fn render_error(error: &Error) -> String {
    match error {
        Error::Configuration(ConfigurationError::NotFound(path)) => format!(
            "{}: {}",
            t!("error.configuration_missing"),
            path.display()
        ),
        other => format!("{other:#}"),
    }
}
