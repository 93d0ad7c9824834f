//! # Output Sink / 输出目标
//!
//! [`Output`] is the writer shared by the command and the active reporter.
//! Clones write to the same sink.
//!
//! `Output` 是命令与当前报告器共享的写入目标。克隆体写入同一个目标。

use std::cell::RefCell;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

#[derive(Debug)]
enum Sink {
    Stdout,
    Buffer(String),
}

#[derive(Clone)]
pub struct Output {
    sink: Rc<RefCell<Sink>>,
}

impl Output {
    /// Writes straight to the process's stdout.
    pub fn stdout() -> Self {
        Self {
            sink: Rc::new(RefCell::new(Sink::Stdout)),
        }
    }

    /// Collects everything in memory; read it back with [`Output::fetch`].
    pub fn buffered() -> Self {
        Self {
            sink: Rc::new(RefCell::new(Sink::Buffer(String::new()))),
        }
    }

    pub fn write(&self, text: &str) {
        match &mut *self.sink.borrow_mut() {
            Sink::Stdout => {
                let mut stdout = std::io::stdout().lock();
                // A closed stdout (e.g. `peridot | head`) is not a test failure.
                let _ = stdout.write_all(text.as_bytes());
                let _ = stdout.flush();
            }
            Sink::Buffer(buffer) => buffer.push_str(text),
        }
    }

    pub fn writeln(&self, text: &str) {
        self.write(text);
        self.write("\n");
    }

    /// Returns and clears the buffered text. Always empty for stdout.
    pub fn fetch(&self) -> String {
        match &mut *self.sink.borrow_mut() {
            Sink::Stdout => String::new(),
            Sink::Buffer(buffer) => std::mem::take(buffer),
        }
    }

    pub fn is_buffered(&self) -> bool {
        matches!(*self.sink.borrow(), Sink::Buffer(_))
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("buffered", &self.is_buffered())
            .finish()
    }
}
