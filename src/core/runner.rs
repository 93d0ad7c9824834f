//! # Suite Runner / 套件运行器
//!
//! The execution component: walks the test tree held by the [`Context`] and
//! records every outcome on a [`TestResult`].
//!
//! 执行组件：遍历 `Context` 持有的测试树，并把每个结果记录到 `TestResult`。

use std::rc::Rc;
use std::time::Instant;

use tracing::{debug, info};

use crate::core::context::Context;
use crate::core::events::{Event, EventBus};
use crate::core::execution::{self, Outcome};
use crate::core::result::TestResult;
use crate::core::suite::{Scope, Suite};
use crate::error::Result;

/// Walks a test tree and records outcomes / 遍历测试树并记录结果
pub trait Runner {
    fn run(&mut self, result: &mut TestResult) -> Result<()>;

    fn set_stop_on_failure(&mut self, stop: bool);

    fn stop_on_failure(&self) -> bool;
}

/// Default runner bound to the context's root suite.
#[derive(Debug)]
pub struct SuiteRunner {
    context: Rc<Context>,
    bus: Rc<EventBus>,
    stop_on_failure: bool,
}

impl SuiteRunner {
    pub fn new(context: Rc<Context>, bus: Rc<EventBus>) -> Self {
        Self {
            context,
            bus,
            stop_on_failure: false,
        }
    }

    /// Returns `true` when the run must halt.
    fn run_suite(
        &self,
        suite: &mut Suite,
        scopes: &mut Vec<Scope>,
        result: &mut TestResult,
    ) -> Result<bool> {
        self.bus.emit(&mut Event::SuiteStart {
            suite: &mut *suite,
        })?;
        scopes.push(suite.scope().clone());

        let halted = self.run_children(suite, scopes, result);

        scopes.pop();
        self.bus.emit(&mut Event::SuiteEnd { suite: &*suite })?;
        halted
    }

    fn run_children(
        &self,
        suite: &mut Suite,
        scopes: &mut Vec<Scope>,
        result: &mut TestResult,
    ) -> Result<bool> {
        for test in suite.tests() {
            let chain: Vec<&Scope> = scopes.iter().collect();
            match execution::run_test(test, &chain) {
                Outcome::Passed => result.pass_test(test)?,
                Outcome::Pending => result.pend_test(test)?,
                Outcome::Failed(failure) => {
                    result.fail_test(test, failure)?;
                    if self.stop_on_failure {
                        debug!(test = test.title(), "stopping on first failure");
                        return Ok(true);
                    }
                }
            }
        }

        for child in suite.suites_mut() {
            if self.run_suite(child, scopes, result)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

impl Runner for SuiteRunner {
    fn run(&mut self, result: &mut TestResult) -> Result<()> {
        let mut root = self.context.take_root();
        info!(tests = root.total_tests(), "running");

        let started = Instant::now();
        let walked = self.bus.emit(&mut Event::RunnerStart).and_then(|()| {
            // Global helpers sit below every suite scope.
            let mut scopes = vec![self.context.global_scope()];
            self.run_suite(&mut root, &mut scopes, result)
        });
        self.context.restore_root(root);
        walked?;

        self.bus.emit(&mut Event::RunnerEnd {
            elapsed: started.elapsed(),
            result: &*result,
        })
    }

    fn set_stop_on_failure(&mut self, stop: bool) {
        self.stop_on_failure = stop;
    }

    fn stop_on_failure(&self) -> bool {
        self.stop_on_failure
    }
}
