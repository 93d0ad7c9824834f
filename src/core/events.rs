//! # Event Bus / 事件总线
//!
//! Synchronous, in-process publish/subscribe channel that carries every
//! lifecycle point of a run. Configuration units and plugins attach listeners
//! here before the first event fires.
//!
//! 同步的进程内发布/订阅通道，承载一次运行的所有生命周期节点。
//! 配置单元和插件在第一个事件触发之前在此注册监听器。
//!
//! ## Rules / 规则
//!
//! - Listeners run in registration order, one after another, on the emitting
//!   thread. `emit` returns only after the last listener returned.
//! - A listener registered while an event is being emitted is first invoked by
//!   the next emission.
//! - The first listener error stops the emission and is returned to the emitter.
//! - Listeners are never removed.
//!
//! The bus is shared as `Rc<EventBus>` and is therefore neither `Send` nor
//! `Sync`; an embedding host must keep a run on a single thread.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use crate::cli::application::Application;
use crate::cli::command::Command;
use crate::cli::definition::Input;
use crate::cli::environment::Environment;
use crate::core::result::{TestFailure, TestResult};
use crate::core::suite::{Suite, Test};
use crate::error::{Error, Result};
use crate::infra::output::Output;
use crate::reporting::factory::ReporterFactory;

/// Every event a run can emit / 运行期间可能触发的所有事件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Start,
    Execute,
    Reporters,
    Load,
    End,
    RunnerStart,
    RunnerEnd,
    SuiteStart,
    SuiteEnd,
    TestPassed,
    TestFailed,
    TestPending,
}

impl EventKind {
    /// The lifecycle events in the order a normal run fires them.
    pub const LIFECYCLE: [EventKind; 5] = [
        EventKind::Start,
        EventKind::Execute,
        EventKind::Reporters,
        EventKind::Load,
        EventKind::End,
    ];

    /// Events fired by the runner and the result aggregator while tests execute.
    pub const RUNNER: [EventKind; 7] = [
        EventKind::RunnerStart,
        EventKind::RunnerEnd,
        EventKind::SuiteStart,
        EventKind::SuiteEnd,
        EventKind::TestPassed,
        EventKind::TestFailed,
        EventKind::TestPending,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Start => "peridot.start",
            EventKind::Execute => "peridot.execute",
            EventKind::Reporters => "peridot.reporters",
            EventKind::Load => "peridot.load",
            EventKind::End => "peridot.end",
            EventKind::RunnerStart => "runner.start",
            EventKind::RunnerEnd => "runner.end",
            EventKind::SuiteStart => "suite.start",
            EventKind::SuiteEnd => "suite.end",
            EventKind::TestPassed => "test.passed",
            EventKind::TestFailed => "test.failed",
            EventKind::TestPending => "test.pending",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An event together with its payload. Each kind has exactly one payload shape.
/// 事件及其负载。每种事件只有一种负载形态。
pub enum Event<'a> {
    /// The application finished loading configuration.
    Start {
        environment: &'a Rc<Environment>,
        application: &'a Rc<Application>,
    },
    /// The command is about to run; listeners may rewrite the input.
    Execute {
        input: &'a mut Input,
        output: &'a Output,
    },
    /// Listeners may register additional reporters before one is selected.
    Reporters {
        input: &'a Input,
        factory: &'a mut ReporterFactory,
    },
    /// Tests are about to be loaded; listeners may swap the loader or runner.
    Load { command: &'a mut Command },
    /// The command completed with `exit_code`.
    End {
        exit_code: i32,
        input: &'a Input,
        output: &'a Output,
    },
    RunnerStart,
    RunnerEnd {
        elapsed: Duration,
        result: &'a TestResult,
    },
    /// A suite is about to run; listeners may extend its scope.
    SuiteStart { suite: &'a mut Suite },
    SuiteEnd { suite: &'a Suite },
    TestPassed { test: &'a Test },
    TestFailed {
        test: &'a Test,
        failure: &'a TestFailure,
    },
    TestPending { test: &'a Test },
}

impl Event<'_> {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Start { .. } => EventKind::Start,
            Event::Execute { .. } => EventKind::Execute,
            Event::Reporters { .. } => EventKind::Reporters,
            Event::Load { .. } => EventKind::Load,
            Event::End { .. } => EventKind::End,
            Event::RunnerStart => EventKind::RunnerStart,
            Event::RunnerEnd { .. } => EventKind::RunnerEnd,
            Event::SuiteStart { .. } => EventKind::SuiteStart,
            Event::SuiteEnd { .. } => EventKind::SuiteEnd,
            Event::TestPassed { .. } => EventKind::TestPassed,
            Event::TestFailed { .. } => EventKind::TestFailed,
            Event::TestPending { .. } => EventKind::TestPending,
        }
    }
}

impl fmt::Debug for Event<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Event").field(&self.kind()).finish()
    }
}

/// Result a listener hands back to the bus.
pub type ListenerResult = anyhow::Result<()>;

type Listener = Rc<dyn Fn(&mut Event<'_>) -> ListenerResult>;

/// Named-event publish/subscribe channel / 命名事件的发布/订阅通道
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<HashMap<EventKind, Vec<Listener>>>,
}

impl EventBus {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    /// Subscribes `listener` to `kind`. The listener receives the full event and
    /// is expected to match on the variant belonging to `kind`.
    pub fn on<F>(&self, kind: EventKind, listener: F)
    where
        F: Fn(&mut Event<'_>) -> ListenerResult + 'static,
    {
        self.listeners
            .borrow_mut()
            .entry(kind)
            .or_default()
            .push(Rc::new(listener));
    }

    /// Delivers `event` to every listener of its kind, in registration order.
    ///
    /// The listener list is snapshotted before delivery, so listeners may
    /// subscribe (even to the same kind) without deadlocking the bus.
    pub fn emit(&self, event: &mut Event<'_>) -> Result<()> {
        let kind = event.kind();
        let listeners: Vec<Listener> = self
            .listeners
            .borrow()
            .get(&kind)
            .cloned()
            .unwrap_or_default();

        trace!(event = kind.name(), listeners = listeners.len(), "emit");

        for listener in listeners {
            listener(event).map_err(|source| Error::Listener {
                event: kind.name(),
                source,
            })?;
        }
        Ok(())
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.borrow().get(&kind).map_or(0, Vec::len)
    }

    /// `peridot.start` → `(environment, application)`
    pub fn on_start<F>(&self, listener: F)
    where
        F: Fn(&Rc<Environment>, &Rc<Application>) -> ListenerResult + 'static,
    {
        self.on(EventKind::Start, move |event| match event {
            Event::Start {
                environment,
                application,
            } => listener(environment, application),
            _ => Ok(()),
        });
    }

    /// `peridot.execute` → `(input, output)`
    pub fn on_execute<F>(&self, listener: F)
    where
        F: Fn(&mut Input, &Output) -> ListenerResult + 'static,
    {
        self.on(EventKind::Execute, move |event| match event {
            Event::Execute { input, output } => listener(input, output),
            _ => Ok(()),
        });
    }

    /// `peridot.reporters` → `(input, factory)`
    pub fn on_reporters<F>(&self, listener: F)
    where
        F: Fn(&Input, &mut ReporterFactory) -> ListenerResult + 'static,
    {
        self.on(EventKind::Reporters, move |event| match event {
            Event::Reporters { input, factory } => listener(input, factory),
            _ => Ok(()),
        });
    }

    /// `peridot.load` → `(command)`
    pub fn on_load<F>(&self, listener: F)
    where
        F: Fn(&mut Command) -> ListenerResult + 'static,
    {
        self.on(EventKind::Load, move |event| match event {
            Event::Load { command } => listener(command),
            _ => Ok(()),
        });
    }

    /// `peridot.end` → `(exit_code, input, output)`
    pub fn on_end<F>(&self, listener: F)
    where
        F: Fn(i32, &Input, &Output) -> ListenerResult + 'static,
    {
        self.on(EventKind::End, move |event| match event {
            Event::End {
                exit_code,
                input,
                output,
            } => listener(*exit_code, input, output),
            _ => Ok(()),
        });
    }

    /// `suite.start` → `(suite)`
    pub fn on_suite_start<F>(&self, listener: F)
    where
        F: Fn(&mut Suite) -> ListenerResult + 'static,
    {
        self.on(EventKind::SuiteStart, move |event| match event {
            Event::SuiteStart { suite } => listener(suite),
            _ => Ok(()),
        });
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.borrow();
        let mut counts: Vec<_> = listeners
            .iter()
            .map(|(kind, list)| (kind.name(), list.len()))
            .collect();
        counts.sort();
        f.debug_struct("EventBus").field("listeners", &counts).finish()
    }
}
