//! # Peridot Library / Peridot 库
//!
//! An extensible, event-driven test runner. Configuration units subscribe
//! listeners to a typed event bus; the command then discovers spec files,
//! runs them and turns the result into an exit code.
//!
//! 一个可扩展的事件驱动测试运行器。配置单元向类型化事件总线注册监听器，
//! 随后命令发现规范文件、运行它们并将结果转换为退出码。
//!
//! ## Modules / 模块
//!
//! - `core` - Event bus, context, test tree, discovery and execution
//! - `infra` - Command execution, file system helpers and the output sink
//! - `reporting` - Reporters and the reporter factory
//! - `cli` - Input definition, environment, application and command
//! - `error` - Typed errors
//!
//! - `core` - 事件总线、上下文、测试树、发现与执行
//! - `infra` - 命令执行、文件系统辅助与输出目标
//! - `reporting` - 报告器与报告器工厂
//! - `cli` - 输入定义、环境、应用程序与命令
//! - `error` - 类型化错误

pub mod cli;
pub mod core;
pub mod error;
pub mod infra;
pub mod reporting;

pub use error::{Error, Result};

use once_cell::sync::Lazy;

static AVAILABLE_LOCALES: Lazy<Vec<&'static str>> = Lazy::new(|| rust_i18n::available_locales!());

/// Selects the message language.
///
/// `lang` wins when given; otherwise the system locale is detected. The full
/// locale (e.g. "zh-CN") is tried first, then its language part (e.g. "en"
/// from "en-US"), then "en".
pub fn init(lang: Option<&str>) {
    let locale = lang
        .map(str::to_string)
        .or_else(sys_locale::get_locale)
        .unwrap_or_else(|| "en".to_string());
    let lang = if AVAILABLE_LOCALES.contains(&locale.as_str()) {
        locale.as_str()
    } else {
        locale
            .split('-')
            .next()
            .filter(|lang_code| AVAILABLE_LOCALES.contains(lang_code))
            .unwrap_or("en")
    };

    rust_i18n::set_locale(lang);
}

rust_i18n::i18n!("locales", fallback = "en");
