//! # Core Module / 核心模块
//!
//! The run model: the event bus, the shared context, the test tree and the
//! components that discover, execute and record tests.
//!
//! 运行模型：事件总线、共享上下文、测试树，以及发现、执行和记录测试的组件。

pub mod config;
pub mod context;
pub mod dsl;
pub mod events;
pub mod execution;
pub mod loader;
pub mod result;
pub mod runner;
pub mod spec_file;
pub mod suite;
