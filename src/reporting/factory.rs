//! # Reporter Factory / 报告器工厂
//!
//! Catalogue of named reporters. Plugins add entries on `peridot.reporters`;
//! the command then creates the selected one, which subscribes itself to the
//! runner events.
//!
//! 具名报告器目录。插件在 `peridot.reporters` 事件中添加条目，
//! 随后命令创建被选中的报告器，它会自行订阅运行器事件。

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::core::events::{EventBus, EventKind};
use crate::error::{Error, Result};
use crate::infra::output::Output;
use crate::infra::t;
use crate::reporting::base::Reporter;
use crate::reporting::dot::DotReporter;
use crate::reporting::html::HtmlReporter;
use crate::reporting::json::JsonReporter;
use crate::reporting::spec::SpecReporter;

/// Reporter used when `--reporter` is not given.
pub const DEFAULT_REPORTER: &str = "spec";

pub type SharedReporter = Rc<RefCell<Box<dyn Reporter>>>;

type Constructor = Box<dyn Fn(&Output) -> Box<dyn Reporter>>;

struct Entry {
    name: String,
    description: String,
    constructor: Constructor,
}

pub struct ReporterFactory {
    bus: Rc<EventBus>,
    entries: Vec<Entry>,
}

impl ReporterFactory {
    /// An empty catalogue.
    pub fn new(bus: Rc<EventBus>) -> Self {
        Self {
            bus,
            entries: Vec::new(),
        }
    }

    /// The built-in reporters: spec, dot, json and html.
    pub fn with_defaults(bus: Rc<EventBus>) -> Self {
        let mut factory = Self::new(bus);
        factory.register("spec", t!("reporter.spec"), |output| {
            Box::new(SpecReporter::new(output.clone()))
        });
        factory.register("dot", t!("reporter.dot"), |output| {
            Box::new(DotReporter::new(output.clone()))
        });
        factory.register("json", t!("reporter.json"), |output| {
            Box::new(JsonReporter::new(output.clone()))
        });
        factory.register("html", t!("reporter.html"), |output| {
            Box::new(HtmlReporter::new(output.clone()))
        });
        factory
    }

    /// Adds a reporter, replacing any entry with the same name in place.
    pub fn register<F>(&mut self, name: impl Into<String>, description: impl Into<String>, constructor: F)
    where
        F: Fn(&Output) -> Box<dyn Reporter> + 'static,
    {
        let entry = Entry {
            name: name.into(),
            description: description.into(),
            constructor: Box::new(constructor),
        };
        match self.entries.iter_mut().find(|existing| existing.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|entry| entry.name == name)
    }

    /// `(name, description)` in registration order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), entry.description.as_str()))
    }

    /// Creates `name` writing to `output` and subscribes it to the runner events.
    pub fn create(&self, name: &str, output: &Output) -> Result<SharedReporter> {
        let entry = self
            .entries
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| Error::UnknownReporter(name.to_string()))?;

        let reporter: SharedReporter = Rc::new(RefCell::new((entry.constructor)(output)));
        for kind in EventKind::RUNNER {
            let reporter = reporter.clone();
            self.bus
                .on(kind, move |event| reporter.borrow_mut().handle(event));
        }
        debug!(reporter = name, "reporter created");
        Ok(reporter)
    }
}

impl fmt::Debug for ReporterFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.name))
            .finish()
    }
}
