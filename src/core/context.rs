//! # Run Context / 运行上下文
//!
//! The one piece of shared state besides the event bus: the test tree being
//! built, the file currently being loaded, the global helpers installed by DSL
//! files and the set of files already included.
//!
//! 除事件总线之外唯一的共享状态：正在构建的测试树、当前加载的文件、
//! DSL 文件安装的全局辅助命令，以及已经包含过的文件集合。
//!
//! A single `Rc<Context>` is created by [`crate::cli::environment::Environment`]
//! and handed to every collaborator that needs it. Nothing here is global.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use crate::core::events::EventBus;
use crate::core::suite::{Scope, Suite, Test, TestBody};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
struct Helper {
    words: Vec<String>,
    origin: String,
}

#[derive(Debug)]
pub struct Context {
    bus: Rc<EventBus>,
    // stack[0] is the root suite, the last entry is the open node.
    stack: RefCell<Vec<Suite>>,
    file: RefCell<Option<PathBuf>>,
    helpers: RefCell<BTreeMap<String, Helper>>,
    included: RefCell<HashSet<PathBuf>>,
}

impl Context {
    pub fn new(bus: Rc<EventBus>) -> Rc<Self> {
        Rc::new(Self {
            bus,
            stack: RefCell::new(vec![Suite::default()]),
            file: RefCell::new(None),
            helpers: RefCell::new(BTreeMap::new()),
            included: RefCell::new(HashSet::new()),
        })
    }

    pub fn bus(&self) -> &Rc<EventBus> {
        &self.bus
    }

    /// Drops the tree, the helpers and the include history. Used to isolate
    /// independent runs that share one process.
    pub fn reset(&self) {
        *self.stack.borrow_mut() = vec![Suite::default()];
        *self.file.borrow_mut() = None;
        self.helpers.borrow_mut().clear();
        self.included.borrow_mut().clear();
    }

    /// Opens a suite, runs `body` with it as the current node, then attaches it
    /// to its parent. On error the half-built suite is discarded.
    pub fn describe<E>(
        &self,
        description: &str,
        skipped: bool,
        body: impl FnOnce(&Context) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        let suite = Suite::new(description)
            .with_file(self.current_file())
            .skipped(skipped);
        self.stack.borrow_mut().push(suite);

        let outcome = body(self);

        let mut stack = self.stack.borrow_mut();
        let suite = stack.pop();
        if outcome.is_ok() {
            if let (Some(suite), Some(parent)) = (suite, stack.last_mut()) {
                parent.add_suite(suite);
            }
        }
        outcome
    }

    /// Adds a test to the current node. Tests under a skipped suite are pending.
    pub fn it(&self, description: &str, body: TestBody) {
        let mut stack = self.stack.borrow_mut();
        let skipped = stack.iter().any(Suite::is_skipped);
        let body = if skipped { TestBody::Pending } else { body };

        let mut test = Test::new(description, body).with_file(self.current_file());
        let title: Vec<&str> = stack
            .iter()
            .map(Suite::description)
            .chain(std::iter::once(description))
            .filter(|part| !part.is_empty())
            .collect();
        test.set_title(title.join(" "));

        if let Some(current) = stack.last_mut() {
            current.add_test(test);
        }
    }

    /// Description of the open node; empty at the root.
    pub fn current_description(&self) -> String {
        self.stack
            .borrow()
            .last()
            .map(|suite| suite.description().to_string())
            .unwrap_or_default()
    }

    pub fn current_file(&self) -> Option<PathBuf> {
        self.file.borrow().clone()
    }

    /// Runs `body` with `file` recorded as the file being loaded.
    pub fn with_file<T>(&self, file: &Path, body: impl FnOnce(&Context) -> T) -> T {
        let previous = self.file.replace(Some(file.to_path_buf()));
        let value = body(self);
        *self.file.borrow_mut() = previous;
        value
    }

    /// Moves the root suite out so it can run while listeners use the context.
    pub fn take_root(&self) -> Suite {
        let mut stack = self.stack.borrow_mut();
        stack.truncate(1);
        stack.pop().unwrap_or_default()
    }

    pub fn restore_root(&self, root: Suite) {
        let mut stack = self.stack.borrow_mut();
        stack.clear();
        stack.push(root);
    }

    pub fn with_root<T>(&self, body: impl FnOnce(&Suite) -> T) -> T {
        let stack = self.stack.borrow();
        match stack.first() {
            Some(root) => body(root),
            None => body(&Suite::default()),
        }
    }

    /// Runs `body` once per canonical path. Returns `false` if the file had
    /// already been included. A path that cannot be canonicalized is keyed as given.
    pub fn include_once<F, E>(&self, path: &Path, body: F) -> std::result::Result<bool, E>
    where
        F: FnOnce(&Path) -> std::result::Result<(), E>,
    {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if !self.included.borrow_mut().insert(key.clone()) {
            debug!(path = %key.display(), "already included, skipping");
            return Ok(false);
        }
        debug!(path = %key.display(), "including");
        body(&key)?;
        Ok(true)
    }

    pub fn is_included(&self, path: &Path) -> bool {
        let key = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        self.included.borrow().contains(&key)
    }

    /// Registers a global helper. Re-defining a name with identical words is
    /// accepted; any other redefinition is an error.
    pub fn define_helper(&self, name: &str, words: Vec<String>, origin: &str) -> Result<()> {
        let mut helpers = self.helpers.borrow_mut();
        if let Some(existing) = helpers.get(name) {
            if existing.words == words {
                return Ok(());
            }
            return Err(Error::HelperRedefinition {
                name: name.to_string(),
                defined_in: existing.origin.clone(),
            });
        }
        helpers.insert(
            name.to_string(),
            Helper {
                words,
                origin: origin.to_string(),
            },
        );
        Ok(())
    }

    pub fn has_helper(&self, name: &str) -> bool {
        self.helpers.borrow().contains_key(name)
    }

    /// The global helpers as a scope, consulted after every suite scope.
    pub fn global_scope(&self) -> Scope {
        self.helpers
            .borrow()
            .iter()
            .fold(Scope::new(), |scope, (name, helper)| {
                scope.with_helper(name.clone(), helper.words.clone())
            })
    }
}
