//! Extension completion for `require`.

use crate::path::extname;

/// Generate the candidate files for an expanded `require` path, in priority
/// order:
///
/// 1. `<path>` if it already ends in the source extension or names some
///    other extension explicitly,
/// 2. otherwise `<path><ext>` first, then `<path>` as given.
///
/// `source_extension` includes the leading dot (`.rb`).
pub fn candidates(path: String, source_extension: &str) -> Vec<String> {
    if !extname(&path).is_empty() {
        return vec![path];
    }

    let mut completed = String::with_capacity(path.len() + source_extension.len());
    completed.push_str(&path);
    completed.push_str(source_extension);
    vec![completed, path]
}
