//! Filesystem and process-environment collaborator.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Everything the loader needs from the outside world.
pub trait Host {
    /// The home directory used for `~` expansion, if any.
    fn home_dir(&self) -> Option<String>;

    /// The current working directory, as an absolute path.
    fn current_dir(&self) -> io::Result<String>;

    /// Whether `path` names a readable file that can be loaded.
    fn is_loadable(&self, path: &str) -> bool;

    fn read_text(&self, path: &str) -> io::Result<String>;
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
enum HomeSource {
    #[default]
    Environment,
    Fixed(String),
    Unset,
}

/// [`Host`] backed by `std::fs` and `std::env`.
///
/// The home and current directories can be pinned, which lets tests and
/// embedders run resolutions without mutating process-global state.
#[derive(Clone, Debug, Default)]
pub struct OsHost {
    home: HomeSource,
    cwd: Option<PathBuf>,
}

impl OsHost {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_home(mut self, home: impl Into<String>) -> Self {
        self.home = HomeSource::Fixed(home.into());
        self
    }

    /// Behave as if `HOME` were not set.
    #[must_use]
    pub fn without_home(mut self) -> Self {
        self.home = HomeSource::Unset;
        self
    }

    #[must_use]
    pub fn with_current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Relative paths are taken relative to the pinned directory, if any.
    fn locate<'p>(&self, path: &'p str) -> std::borrow::Cow<'p, Path> {
        match &self.cwd {
            Some(cwd) if !Path::new(path).is_absolute() => cwd.join(path).into(),
            _ => Path::new(path).into(),
        }
    }
}

impl Host for OsHost {
    fn home_dir(&self) -> Option<String> {
        match &self.home {
            HomeSource::Environment => std::env::var("HOME").ok(),
            HomeSource::Fixed(home) => Some(home.clone()),
            HomeSource::Unset => None,
        }
    }

    fn current_dir(&self) -> io::Result<String> {
        let dir = match &self.cwd {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        dir.into_os_string().into_string().map_err(|_| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "current directory is not valid UTF-8",
            )
        })
    }

    fn is_loadable(&self, path: &str) -> bool {
        let Ok(meta) = fs::metadata(self.locate(path)) else {
            return false;
        };
        loadable_metadata(&meta)
    }

    fn read_text(&self, path: &str) -> io::Result<String> {
        fs::read_to_string(self.locate(path))
    }
}

#[cfg(unix)]
fn loadable_metadata(meta: &fs::Metadata) -> bool {
    use std::os::unix::fs::{FileTypeExt, PermissionsExt};

    const OWNER_READ: u32 = 0o400;
    let kind = meta.file_type();
    let readable = meta.permissions().mode() & OWNER_READ != 0;
    readable && (kind.is_file() || kind.is_fifo() || kind.is_char_device())
}

#[cfg(not(unix))]
fn loadable_metadata(meta: &fs::Metadata) -> bool {
    meta.is_file()
}
