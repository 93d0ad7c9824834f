//! # Infrastructure Module / 基础设施模块
//!
//! This module provides infrastructure services for Peridot,
//! including command execution, file system operations, the shared output
//! sink and i18n support.
//!
//! 此模块为 Peridot 提供基础设施服务，
//! 包括命令执行、文件系统操作、共享输出目标和国际化支持。

pub mod command;
pub mod fs;
pub mod output;

// Re-export i18n functions for easier access
pub use rust_i18n::t;
