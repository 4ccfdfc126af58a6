//! Shared fixtures for resolution tests.

use std::fs;
use std::path::Path;

use kern_load::{
    Evaluator, ExecutionScope, Input, Loader, LoaderConfig, LoaderError, Namespace, OsHost,
    SearchPaths, Shared,
};
use tempfile::TempDir;

/// A temporary directory tree laid out like a small library:
///
/// ```text
/// def_class.rb      const M 1
/// def_lv            local lvar 1
/// def_lv.rb         local lvar 1
/// key.ruby          global key key.ruby
/// key.ruby.rb       global key key.ruby.rb
/// only.ruby         global key only.ruby
/// same_feat.rb
/// same_path.rb
/// dir/def_class.rb  const M 2
/// dir/foo.rb
/// dir/key.ruby.rb   global key dir/key.ruby.rb
/// link1 -> .        (unix only)
/// link2 -> .        (unix only)
/// ```
pub struct Fixture {
    dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create fixture dir");
        let fixture = Fixture { dir };

        fixture.write("def_class.rb", "const M 1\n");
        fixture.write("def_lv", "local lvar 1\n");
        fixture.write("def_lv.rb", "local lvar 1\n");
        fixture.write("key.ruby", "global key key.ruby\n");
        fixture.write("key.ruby.rb", "global key key.ruby.rb\n");
        fixture.write("only.ruby", "global key only.ruby\n");
        fixture.write("same_feat.rb", "");
        fixture.write("same_path.rb", "");
        fixture.write("dir/def_class.rb", "const M 2\n");
        fixture.write("dir/foo.rb", "global key dir/foo.rb\n");
        fixture.write("dir/key.ruby.rb", "global key dir/key.ruby.rb\n");

        #[cfg(unix)]
        {
            let root = fixture.dir.path();
            std::os::unix::fs::symlink(root, root.join("link1")).expect("symlink link1");
            std::os::unix::fs::symlink(root, root.join("link2")).expect("symlink link2");
        }

        fixture
    }

    /// Absolute path of the fixture root, as a string.
    pub fn root(&self) -> String {
        self.dir.path().to_str().expect("utf-8 temp dir").to_owned()
    }

    /// Absolute path of `rel` inside the fixture.
    pub fn path(&self, rel: &str) -> String {
        format!("{}/{rel}", self.root())
    }

    pub fn write(&self, rel: &str, contents: &str) {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create fixture subdir");
        }
        fs::write(path, contents).expect("write fixture file");
    }

    pub fn remove(&self, rel: &str) {
        fs::remove_file(self.dir.path().join(rel)).expect("remove fixture file");
    }

    /// A host whose home and current directory are both `rel` inside the
    /// fixture (`""` for the root).
    pub fn host_at(&self, rel: &str) -> OsHost {
        let dir = if rel.is_empty() {
            self.root()
        } else {
            self.path(rel)
        };
        OsHost::new()
            .with_home(dir.clone())
            .with_current_dir(Path::new(&dir))
    }

    /// A loader rooted at the fixture with the given search directories.
    pub fn loader(&self, search: &[Input]) -> Loader {
        self.loader_on(self.host_at(""), search)
    }

    pub fn loader_on(&self, host: OsHost, search: &[Input]) -> Loader {
        let mut paths = SearchPaths::new();
        paths.replace(Input::List(search.to_vec()));
        Loader::with_host(host)
            .with_config(LoaderConfig::default().with_max_depth(16))
            .with_search_paths(paths)
    }
}

#[derive(Debug)]
pub enum TestError {
    Loader(LoaderError),
    Raised(String),
    Expectation(String),
}

impl From<LoaderError> for TestError {
    fn from(err: LoaderError) -> Self {
        TestError::Loader(err)
    }
}

impl TestError {
    pub fn loader(self) -> LoaderError {
        match self {
            TestError::Loader(err) => err,
            other => panic!("expected a loader error, got {other:?}"),
        }
    }
}

/// A line-oriented evaluator that records what it executes.
///
/// Each line is one command:
///
/// ```text
/// local NAME VALUE        bind a local
/// const NAME VALUE        define a shared constant
/// global NAME VALUE       set a shared global
/// require FEATURE         nested require
/// load PATH               nested load
/// raise MESSAGE           fail with TestError::Raised
/// expect_local NAME       fail unless NAME is a visible local
/// expect_no_local NAME    fail if NAME is a visible local
/// ```
#[derive(Default)]
pub struct Recorder {
    namespace: Shared<Namespace<String>>,
    /// Paths in the order execution started.
    pub executed: Vec<String>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(&self, name: &str) -> Option<String> {
        self.namespace.borrow().constant(name)
    }

    pub fn global(&self, name: &str) -> Option<String> {
        self.namespace.borrow().global(name)
    }
}

impl Evaluator for Recorder {
    type Value = String;
    type Error = TestError;

    fn namespace(&self) -> Shared<Namespace<String>> {
        self.namespace.clone()
    }

    fn evaluate(
        &mut self,
        loader: &mut Loader,
        source: &str,
        scope: &mut ExecutionScope<String>,
    ) -> Result<(), TestError> {
        self.executed.push(scope.path().to_owned());

        for line in source.lines() {
            let words: Vec<&str> = line.split_whitespace().collect();
            match words.as_slice() {
                ["local", name, value] => scope.set_local(*name, (*value).to_owned()),
                ["const", name, value] => {
                    scope.set_constant(*name, (*value).to_owned());
                }
                ["global", name, value] => scope.set_global(*name, (*value).to_owned()),
                ["require", feature] => {
                    loader.require_feature(self, feature)?;
                }
                ["load", path] => {
                    loader.load_path(self, path)?;
                }
                ["raise", message] => return Err(TestError::Raised((*message).to_owned())),
                ["expect_local", name] => {
                    if scope.local(name).is_none() {
                        return Err(TestError::Expectation(format!("missing local {name}")));
                    }
                }
                ["expect_no_local", name] => {
                    if scope.local(name).is_some() {
                        return Err(TestError::Expectation(format!("leaked local {name}")));
                    }
                }
                _ => {}
            }
        }
        Ok(())
    }
}

/// Text entries for a search path list.
pub fn dirs(entries: &[&str]) -> Vec<Input> {
    entries.iter().map(|e| Input::from(*e)).collect()
}
