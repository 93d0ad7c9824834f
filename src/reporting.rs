//! # Reporting Module / 报告模块
//!
//! Reporters render a run as it happens. Each one listens to the runner
//! events on the bus and writes to the shared [`crate::infra::output::Output`].
//!
//! 报告器在运行过程中渲染结果。每个报告器监听事件总线上的运行器事件，
//! 并写入共享的输出目标。

pub mod base;
pub mod dot;
pub mod factory;
pub mod html;
pub mod json;
pub mod spec;
