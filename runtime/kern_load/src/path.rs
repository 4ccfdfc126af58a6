//! Path classification and expansion.
//!
//! Identifiers are plain `/`-separated strings. Expansion turns any of the
//! four shapes into an absolute, `.`/`..`-free string without touching the
//! filesystem; symlinks are never resolved, so two textual routes to the same
//! file stay distinct.

use crate::error::LoaderError;
use crate::host::Host;

pub const SEPARATOR: char = '/';

/// The syntactic shape of an identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathShape<'a> {
    /// Starts at the filesystem root.
    Absolute,
    /// Starts with `~`; `rest` is what follows the marker and its separator.
    HomeRelative { rest: &'a str },
    /// Starts with `./` or `../`; based on the current directory.
    ExplicitRelative,
    /// A bare name, resolved against the search path list.
    Implicit,
}

impl PathShape<'_> {
    #[inline]
    pub fn is_implicit(self) -> bool {
        matches!(self, PathShape::Implicit)
    }
}

/// Classify an identifier. Rules are checked in priority order.
pub fn classify(path: &str) -> PathShape<'_> {
    if is_absolute(path) {
        PathShape::Absolute
    } else if let Some(after) = path.strip_prefix('~') {
        PathShape::HomeRelative {
            rest: after.strip_prefix(SEPARATOR).unwrap_or(after),
        }
    } else if is_explicit_relative(path) {
        PathShape::ExplicitRelative
    } else {
        PathShape::Implicit
    }
}

#[inline]
pub fn is_absolute(path: &str) -> bool {
    path.starts_with(SEPARATOR)
}

/// `./x` or `../x`. A lone `.` or `..` does not count.
pub fn is_explicit_relative(path: &str) -> bool {
    let rest = path
        .strip_prefix("..")
        .or_else(|| path.strip_prefix('.'));
    rest.is_some_and(|r| r.starts_with(SEPARATOR))
}

/// Whether `path` can only ever name a directory: empty, a bare `~`, a
/// trailing separator, or a final `.`/`..` component. Such identifiers
/// never resolve to a file, and expanding them would land on the base
/// directory itself.
pub fn names_directory(path: &str) -> bool {
    path.is_empty()
        || path == "~"
        || path.ends_with(SEPARATOR)
        || matches!(basename(path), "." | "..")
}

/// Expand `path` into an absolute, normalized path.
///
/// - `~` and `~/...` are based on the host's home directory.
/// - Absolute paths are only normalized.
/// - Anything else is joined onto `base`, itself expanded first, or onto the
///   current directory when `base` is `None`.
pub fn expand_path(path: &str, base: Option<&str>, host: &dyn Host) -> Result<String, LoaderError> {
    if let Some(after) = path.strip_prefix('~') {
        if !(after.is_empty() || after.starts_with(SEPARATOR)) {
            return Err(LoaderError::InvalidArgumentValue(
                "'~USER' expanding isn't supported".to_owned(),
            ));
        }
        let home = host.home_dir().ok_or(LoaderError::EnvironmentLookup)?;
        if !is_absolute(&home) {
            return Err(LoaderError::InvalidArgumentValue(
                "non-absolute home".to_owned(),
            ));
        }
        return Ok(join_normalized(&home, after));
    }

    if is_absolute(path) {
        return Ok(normalize(path));
    }

    let base = match base {
        Some(dir) => expand_path(dir, None, host)?,
        None => host.current_dir().map_err(|source| LoaderError::Io {
            path: ".".to_owned(),
            source,
        })?,
    };
    Ok(join_normalized(&base, path))
}

/// Drop empty and `.` segments and resolve `..` against what precedes it.
///
/// The result always starts with `/`; `..` never climbs above the root.
pub fn normalize(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split(SEPARATOR) {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }

    if parts.is_empty() {
        return SEPARATOR.to_string();
    }
    let mut out = String::with_capacity(path.len() + 1);
    for part in parts {
        out.push(SEPARATOR);
        out.push_str(part);
    }
    out
}

fn join_normalized(base: &str, rest: &str) -> String {
    let mut joined = String::with_capacity(base.len() + rest.len() + 1);
    joined.push_str(base);
    joined.push(SEPARATOR);
    joined.push_str(rest);
    normalize(&joined)
}

/// The last component, ignoring trailing separators.
pub fn basename(path: &str) -> &str {
    let trimmed = path.trim_end_matches(SEPARATOR);
    if trimmed.is_empty() {
        // "/" or "" have no last component beyond themselves
        return &path[..path.len().min(1)];
    }
    match trimmed.rfind(SEPARATOR) {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}

/// The extension of the last component, including the dot, or `""`.
///
/// Leading dots of the component are not extension markers, so `.profile`
/// has no extension while `a.tar.gz` has `.gz`.
pub fn extname(path: &str) -> &str {
    let base = basename(path);
    let stem = base.trim_start_matches('.');
    match stem.rfind('.') {
        Some(idx) => &stem[idx..],
        None => "",
    }
}
