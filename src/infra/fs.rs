//! # File System Operations Module / 文件系统操作模块
//!
//! Glob matching and recursive file discovery for the spec loader, plus path
//! resolution for user-supplied paths.
//!
//! 为规范加载器提供的 glob 匹配与递归文件发现，以及用户提供路径的解析。

use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Translates a file-name glob (`*`, `?`) into an anchored regular expression.
///
/// # Examples
/// ```
/// let re = peridot::infra::fs::glob_to_regex("*.spec.toml").unwrap();
/// assert!(re.is_match("array.spec.toml"));
/// assert!(!re.is_match("array.test.toml"));
/// ```
pub fn glob_to_regex(pattern: &str) -> Result<Regex, regex::Error> {
    let mut expr = String::with_capacity(pattern.len() + 8);
    expr.push('^');
    for c in pattern.chars() {
        match c {
            '*' => expr.push_str(".*"),
            '?' => expr.push('.'),
            other => expr.push_str(&regex::escape(&other.to_string())),
        }
    }
    expr.push('$');
    Regex::new(&expr)
}

/// Recursively collects the files below `root` whose file name matches
/// `matcher`. Results are sorted so discovery order is stable. Symlinked
/// directories are not descended into.
///
/// # Arguments
/// * `root` - Directory to search
/// * `matcher` - Compiled file-name pattern
pub fn find_files(root: &Path, matcher: &Regex) -> io::Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        for entry in fs::read_dir(&dir)? {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                pending.push(path);
            } else if path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| matcher.is_match(name))
            {
                found.push(path);
            }
        }
    }

    found.sort();
    Ok(found)
}

/// Expands `~` and makes `path` absolute against `base` when it is relative.
pub fn resolve_path(path: &str, base: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(path).into_owned());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
