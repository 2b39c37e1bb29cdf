//! Derive a re-titled copy of a generated page.

use crate::error::PostProcessError;
use crate::render::rst::underline;
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

/// A first line followed by an `=` underline of any length.
static RE_TITLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\A([^\n]*)\n=+\n").unwrap());

/// Replace the leading `title` heading of `text` with `new_title`.
///
/// `text` must start with `title`, a newline, an `=` underline of any length
/// and a newline. Everything after that heading is kept byte for byte.
/// Returns `None` when the heading is not there.
pub fn retitle(text: &str, title: &str, new_title: &str) -> Option<String> {
    let heading = RE_TITLE.captures(text).filter(|caps| &caps[1] == title)?;
    let rest = &text[heading.get(0)?.end()..];
    Some(format!("{new_title}\n{}\n{rest}", underline(new_title, '=')))
}

/// Read `source`, re-title it and write the result to `dest`.
pub fn write_retitled(
    source: &Path,
    dest: &Path,
    title: &str,
    new_title: &str,
) -> Result<(), PostProcessError> {
    let text = fs::read_to_string(source).map_err(|e| PostProcessError::Io {
        path: source.to_path_buf(),
        source: e,
    })?;
    let retitled = retitle(&text, title, new_title).ok_or_else(|| PostProcessError::TitleMismatch {
        path: source.to_path_buf(),
        title: title.to_string(),
    })?;
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| PostProcessError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }
    fs::write(dest, retitled).map_err(|e| PostProcessError::Io {
        path: dest.to_path_buf(),
        source: e,
    })
}
