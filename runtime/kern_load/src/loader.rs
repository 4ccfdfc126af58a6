//! The `load`/`require` façade.
//!
//! ```text
//! validate → classify → resolve ─┬─ load:    exists? → execute → log
//!                                └─ require: cached? → complete ext → exists?
//!                                            → execute → record → log
//! ```
//!
//! Resolution reads the search path list fresh on every call, so changes
//! made between calls (or by loaded code) are observed by the next call.

use crate::cache::LoadCache;
use crate::config::LoaderConfig;
use crate::error::LoaderError;
use crate::extension;
use crate::host::{Host, OsHost};
use crate::input::{Identifier, Input};
use crate::path::{classify, expand_path, names_directory};
use crate::scope::{Evaluator, ExecutionScope};
use crate::search_path::{consult, SearchEntry, SearchPaths};

/// Outcome of resolving a `require` identifier.
#[derive(Debug, PartialEq, Eq)]
enum Resolved {
    /// A loadable file that has not been required yet.
    Found(String),
    /// Already executed under `require`.
    Loaded(String),
    /// Currently executing under `require` further up the call stack.
    InFlight(String),
}

/// Resolves identifiers and executes files, tracking what `require` has run.
pub struct Loader {
    host: Box<dyn Host>,
    config: LoaderConfig,
    search_paths: SearchPaths,
    cache: LoadCache,
    /// Canonical paths of successful executions, in completion order.
    loaded: Vec<String>,
    depth: usize,
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Loader {
    /// A loader backed by the real filesystem and environment.
    pub fn new() -> Self {
        Self::with_host(OsHost::new())
    }

    pub fn with_host(host: impl Host + 'static) -> Self {
        Loader {
            host: Box::new(host),
            config: LoaderConfig::default(),
            search_paths: SearchPaths::default(),
            cache: LoadCache::default(),
            loaded: Vec::new(),
            depth: 0,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: LoaderConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn with_search_paths(mut self, search_paths: SearchPaths) -> Self {
        self.search_paths = search_paths;
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn host(&self) -> &dyn Host {
        self.host.as_ref()
    }

    pub fn search_paths(&self) -> &SearchPaths {
        &self.search_paths
    }

    pub fn search_paths_mut(&mut self) -> &mut SearchPaths {
        &mut self.search_paths
    }

    pub fn cache(&self) -> &LoadCache {
        &self.cache
    }

    /// Canonical paths of every successful execution so far.
    pub fn loaded_paths(&self) -> &[String] {
        &self.loaded
    }

    /// Drain the loaded-path log.
    pub fn take_loaded_paths(&mut self) -> Vec<String> {
        std::mem::take(&mut self.loaded)
    }

    /// `load(args...)`: resolve and execute, unconditionally.
    ///
    /// Returns `true` on success.
    pub fn load<E: Evaluator>(&mut self, ev: &mut E, args: &[Input]) -> Result<bool, E::Error> {
        let ident = Identifier::from_args(args)?;
        self.load_identifier(ev, &ident)
    }

    /// `load` with a single text identifier.
    pub fn load_path<E: Evaluator>(&mut self, ev: &mut E, path: &str) -> Result<bool, E::Error> {
        let ident = Identifier::parse(path)?;
        self.load_identifier(ev, &ident)
    }

    /// `require(args...)`: resolve and execute unless already required.
    ///
    /// Returns `true` if the file was executed, `false` if it had already
    /// been required (or is being required further up the stack).
    pub fn require<E: Evaluator>(&mut self, ev: &mut E, args: &[Input]) -> Result<bool, E::Error> {
        let ident = Identifier::from_args(args)?;
        self.require_identifier(ev, &ident)
    }

    /// `require` with a single text identifier.
    pub fn require_feature<E: Evaluator>(
        &mut self,
        ev: &mut E,
        feature: &str,
    ) -> Result<bool, E::Error> {
        let ident = Identifier::parse(feature)?;
        self.require_identifier(ev, &ident)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(identifier = %ident))]
    fn load_identifier<E: Evaluator>(
        &mut self,
        ev: &mut E,
        ident: &Identifier,
    ) -> Result<bool, E::Error> {
        let path = self.resolve_for_load(ident)?;
        self.execute(ev, &path)?;
        Ok(true)
    }

    #[tracing::instrument(level = "debug", skip_all, fields(identifier = %ident))]
    fn require_identifier<E: Evaluator>(
        &mut self,
        ev: &mut E,
        ident: &Identifier,
    ) -> Result<bool, E::Error> {
        let path = match self.resolve_for_require(ident)? {
            Resolved::Found(path) => path,
            Resolved::Loaded(path) => {
                tracing::debug!(%path, "already required");
                return Ok(false);
            }
            Resolved::InFlight(path) => {
                tracing::warn!(%path, "circular require detected; skipping");
                return Ok(false);
            }
        };

        self.cache.begin(&path);
        let result = self.execute(ev, &path);
        self.cache.finish(&path);
        result?;

        self.cache.record(path);
        Ok(true)
    }

    /// Resolve a `load` identifier to the path to read.
    ///
    /// Implicit identifiers try each search entry in order (`nil` meaning
    /// the current directory) and finally the identifier itself, relative to
    /// the current directory and left unexpanded.
    fn resolve_for_load(&self, ident: &Identifier) -> Result<String, LoaderError> {
        let text = ident.as_str();
        let host = self.host.as_ref();
        if names_directory(text) {
            return Err(LoaderError::not_found(text));
        }

        if !classify(text).is_implicit() {
            let candidate = expand_path(text, None, host)?;
            if host.is_loadable(&candidate) {
                return Ok(candidate);
            }
            return Err(LoaderError::not_found(text));
        }

        for entry in self.search_paths.entries()? {
            let base = match consult(entry)? {
                SearchEntry::CurrentDir => None,
                SearchEntry::Dir(dir) => Some(dir),
            };
            let candidate = expand_path(text, base, host)?;
            tracing::trace!(%candidate, "probing");
            if host.is_loadable(&candidate) {
                return Ok(candidate);
            }
        }

        if host.is_loadable(text) {
            return Ok(text.to_owned());
        }
        Err(LoaderError::not_found(text))
    }

    /// Resolve a `require` identifier.
    ///
    /// Each candidate is checked against the cache before the filesystem;
    /// `nil` search entries are skipped, so the current directory is never
    /// searched implicitly.
    fn resolve_for_require(&self, ident: &Identifier) -> Result<Resolved, LoaderError> {
        let text = ident.as_str();
        let host = self.host.as_ref();
        if names_directory(text) {
            return Err(LoaderError::not_found(text));
        }

        if !classify(text).is_implicit() {
            let base = expand_path(text, None, host)?;
            return self
                .probe(base)
                .ok_or_else(|| LoaderError::not_found(text));
        }

        for entry in self.search_paths.entries()? {
            let dir = match consult(entry)? {
                SearchEntry::CurrentDir => continue,
                SearchEntry::Dir(dir) => dir,
            };
            let base = expand_path(text, Some(dir), host)?;
            if let Some(resolved) = self.probe(base) {
                return Ok(resolved);
            }
        }
        Err(LoaderError::not_found(text))
    }

    fn probe(&self, base: String) -> Option<Resolved> {
        for candidate in extension::candidates(base, &self.config.source_extension) {
            tracing::trace!(%candidate, "probing");
            if self.cache.contains(&candidate) {
                return Some(Resolved::Loaded(candidate));
            }
            if self.cache.is_in_flight(&candidate) {
                return Some(Resolved::InFlight(candidate));
            }
            if self.host.is_loadable(&candidate) {
                return Some(Resolved::Found(candidate));
            }
        }
        None
    }

    /// Read `path` and run it in a fresh scope over the evaluator's shared
    /// namespace. The scope, and every local it holds, is dropped on return.
    fn execute<E: Evaluator>(&mut self, ev: &mut E, path: &str) -> Result<(), E::Error> {
        if self.depth >= self.config.max_depth {
            return Err(LoaderError::NestingTooDeep {
                path: path.to_owned(),
                depth: self.config.max_depth,
            }
            .into());
        }

        let source = self
            .host
            .read_text(path)
            .map_err(|source| LoaderError::Io {
                path: path.to_owned(),
                source,
            })?;

        let mut scope = ExecutionScope::new(ev.namespace(), path);
        self.depth += 1;
        let result = ev.evaluate(self, &source, &mut scope);
        self.depth -= 1;
        drop(scope);
        result?;

        tracing::info!(path, "loaded");
        self.loaded.push(path.to_owned());
        Ok(())
    }
}
