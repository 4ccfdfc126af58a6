//! Loader configuration.

/// Tunables for a [`crate::Loader`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Extension appended by `require` when the identifier has none,
    /// including the leading dot.
    pub source_extension: String,
    /// Maximum nesting of `load`/`require` calls made from loaded code.
    pub max_depth: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        LoaderConfig {
            source_extension: ".rb".to_owned(),
            max_depth: 256,
        }
    }
}

impl LoaderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the source extension. A missing leading dot is added.
    #[must_use]
    pub fn with_source_extension(mut self, ext: &str) -> Self {
        self.source_extension = if ext.starts_with('.') {
            ext.to_owned()
        } else {
            format!(".{ext}")
        };
        self
    }

    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}
