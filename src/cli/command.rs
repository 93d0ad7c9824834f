//! # Command / 命令
//!
//! The lifecycle state machine of a run:
//! Initialize → Configure → Discover → Execute → Report.
//!
//! 一次运行的生命周期状态机：初始化 → 配置 → 发现 → 执行 → 报告。
//!
//! | State      | Events                            | Work                                     |
//! |------------|-----------------------------------|------------------------------------------|
//! | Initialize | `peridot.execute`, `peridot.reporters` |                                     |
//! | Configure  | `peridot.load`                    | bail, reporter, colors, pattern          |
//! | Discover   |                                   | loader fills the context's test tree     |
//! | Execute    | `runner.*`, `suite.*`, `test.*`   | runner records onto a `TestResult`       |
//! | Report     |                                   | exit code from the failure count         |
//!
//! `--reporters` short-circuits after Initialize with the reporter catalogue.

use std::env;
use std::rc::Rc;

use tracing::{debug, info};

use crate::cli::application::COMMAND_NAME;
use crate::cli::definition::Input;
use crate::core::context::Context;
use crate::core::events::{Event, EventBus};
use crate::core::loader::{DEFAULT_PATTERN, GlobLoader, SuiteLoader};
use crate::core::result::TestResult;
use crate::core::runner::{Runner, SuiteRunner};
use crate::error::Result;
use crate::infra::output::Output;
use crate::reporting::factory::{DEFAULT_REPORTER, ReporterFactory, SharedReporter};

/// Directory searched when no path is given, relative to the working directory.
pub const DEFAULT_SPEC_DIR: &str = "specs";

pub struct Command {
    factory: ReporterFactory,
    bus: Rc<EventBus>,
    context: Rc<Context>,
    loader: Option<Box<dyn SuiteLoader>>,
    runner: Option<Box<dyn Runner>>,
    reporter: Option<SharedReporter>,
}

impl Command {
    pub fn new(factory: ReporterFactory, bus: Rc<EventBus>, context: Rc<Context>) -> Self {
        Self {
            factory,
            bus,
            context,
            loader: None,
            runner: None,
            reporter: None,
        }
    }

    pub fn synopsis(&self) -> String {
        format!("{COMMAND_NAME} [options] [files]")
    }

    pub fn set_loader(&mut self, loader: impl SuiteLoader + 'static) {
        self.loader = Some(Box::new(loader));
    }

    /// The discovery component; a [`GlobLoader`] unless one was set.
    pub fn loader(&mut self) -> &mut dyn SuiteLoader {
        self.loader
            .get_or_insert_with(|| Box::new(GlobLoader::new(DEFAULT_PATTERN, self.context.clone())))
            .as_mut()
    }

    pub fn set_runner(&mut self, runner: impl Runner + 'static) {
        self.runner = Some(Box::new(runner));
    }

    /// The execution component; a [`SuiteRunner`] over the context unless one was set.
    pub fn runner(&mut self) -> &mut dyn Runner {
        self.runner
            .get_or_insert_with(|| {
                Box::new(SuiteRunner::new(self.context.clone(), self.bus.clone()))
            })
            .as_mut()
    }

    pub fn factory(&self) -> &ReporterFactory {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut ReporterFactory {
        &mut self.factory
    }

    /// The active reporter, once Configure has selected it.
    pub fn reporter(&self) -> Option<&SharedReporter> {
        self.reporter.as_ref()
    }

    pub fn context(&self) -> &Rc<Context> {
        &self.context
    }

    pub fn run(&mut self, input: &mut Input, output: &Output) -> Result<i32> {
        let bus = self.bus.clone();

        // Initialize
        bus.emit(&mut Event::Execute {
            input: &mut *input,
            output,
        })?;
        bus.emit(&mut Event::Reporters {
            input: &*input,
            factory: &mut self.factory,
        })?;

        if input.reporters {
            self.list_reporters(output);
            return Ok(0);
        }

        // Configure
        bus.emit(&mut Event::Load { command: &mut *self })?;
        self.runner().set_stop_on_failure(input.bail);

        let name = input.reporter.as_deref().unwrap_or(DEFAULT_REPORTER);
        let reporter = self.factory.create(name, output)?;
        reporter.borrow_mut().set_colors_enabled(!input.no_colors);
        self.reporter = Some(reporter);

        let pattern = input.grep.as_deref().unwrap_or(DEFAULT_PATTERN);
        self.loader().set_pattern(pattern);

        // Discover
        let path = match &input.path {
            Some(path) => path.clone(),
            None => env::current_dir()?.join(DEFAULT_SPEC_DIR),
        };
        debug!(path = %path.display(), pattern, reporter = name, "discovering");
        self.loader().load(&path)?;

        // Execute
        let mut result = TestResult::new(bus);
        self.runner().run(&mut result)?;

        // Report
        info!(
            passing = result.passing_count(),
            failing = result.failure_count(),
            pending = result.pending_count(),
            "run finished"
        );
        Ok(if result.failure_count() > 0 { 1 } else { 0 })
    }

    fn list_reporters(&self, output: &Output) {
        output.writeln("");
        for (name, description) in self.factory.entries() {
            output.writeln(&format!("    {name} - {description}"));
        }
        output.writeln("");
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("factory", &self.factory)
            .field("loader", &self.loader.as_ref().map(|loader| loader.pattern().to_string()))
            .field("runner", &self.runner.as_ref().map(|runner| runner.stop_on_failure()))
            .finish_non_exhaustive()
    }
}
