//! Execution scopes, failures and nested loads.

use kern_load::{ErrorKind, LoaderError};
use pretty_assertions::assert_eq;

use crate::common::{dirs, Fixture, Recorder, TestError};

#[test]
fn locals_stay_inside_the_loaded_file() {
    let fixture = Fixture::new();
    fixture.write(
        "outer.rb",
        "local x 1\nrequire inner\nexpect_local x\nexpect_no_local y\n",
    );
    fixture.write("inner.rb", "expect_no_local x\nlocal y 2\nconst SHARED yes\n");
    let mut loader = fixture.loader(&dirs(&[&fixture.root()]));
    let mut ev = Recorder::new();

    assert!(loader.require_feature(&mut ev, "outer").unwrap());
    assert_eq!(ev.constant("SHARED").as_deref(), Some("yes"));
}

#[test]
fn caller_locals_are_not_visible_to_the_callee() {
    let fixture = Fixture::new();
    fixture.write("outer.rb", "local x 1\nload ./inner.rb\n");
    fixture.write("inner.rb", "expect_local x\n");
    let mut loader = fixture.loader(&[]);

    let err = loader
        .load_path(&mut Recorder::new(), "./outer.rb")
        .unwrap_err();
    assert!(matches!(err, TestError::Expectation(ref msg) if msg == "missing local x"));
    assert!(loader.loaded_paths().is_empty());
}

#[test]
fn constants_defined_by_the_caller_are_visible() {
    let fixture = Fixture::new();
    fixture.write("reader.rb", "global seen yes\n");
    fixture.write("writer.rb", "const FROM_CALLER 1\nload ./reader.rb\n");
    let mut loader = fixture.loader(&[]);
    let mut ev = Recorder::new();

    assert!(loader.load_path(&mut ev, "./writer.rb").unwrap());
    assert_eq!(ev.global("seen").as_deref(), Some("yes"));
    assert_eq!(ev.constant("FROM_CALLER").as_deref(), Some("1"));
}

#[test]
fn failed_execution_is_not_cached() {
    let fixture = Fixture::new();
    fixture.write("flaky.rb", "const BEFORE 1\nraise boom\n");
    let mut loader = fixture.loader(&dirs(&[&fixture.root()]));
    let mut ev = Recorder::new();

    let err = loader.require_feature(&mut ev, "flaky").unwrap_err();
    assert!(matches!(err, TestError::Raised(ref msg) if msg == "boom"));
    assert!(loader.cache().is_empty());
    assert!(loader.loaded_paths().is_empty());
    // side effects before the failure remain
    assert_eq!(ev.constant("BEFORE").as_deref(), Some("1"));

    fixture.write("flaky.rb", "const AFTER 1\n");
    assert!(loader.require_feature(&mut ev, "flaky").unwrap());
    assert_eq!(ev.executed.len(), 2);
    assert_eq!(loader.loaded_paths(), [fixture.path("flaky.rb")]);
}

#[test]
fn nested_errors_propagate_unchanged() {
    let fixture = Fixture::new();
    fixture.write("outer.rb", "require inner\n");
    fixture.write("inner.rb", "raise nested\n");
    let mut loader = fixture.loader(&dirs(&[&fixture.root()]));

    let err = loader
        .require_feature(&mut Recorder::new(), "outer")
        .unwrap_err();
    assert!(matches!(err, TestError::Raised(ref msg) if msg == "nested"));
    assert!(loader.cache().is_empty());
}

#[test]
fn nested_load_errors_reach_the_outer_caller() {
    let fixture = Fixture::new();
    fixture.write("outer.rb", "require missing_feature\n");
    let mut loader = fixture.loader(&dirs(&[&fixture.root()]));

    let err = loader
        .require_feature(&mut Recorder::new(), "outer")
        .unwrap_err()
        .loader();
    assert_eq!(err.load_path(), Some("missing_feature"));
}

#[test]
fn nested_requires_are_logged_in_completion_order() {
    let fixture = Fixture::new();
    fixture.write("a.rb", "require b\n");
    fixture.write("b.rb", "require c\n");
    fixture.write("c.rb", "");
    let mut loader = fixture.loader(&dirs(&[&fixture.root()]));
    let mut ev = Recorder::new();

    assert!(loader.require_feature(&mut ev, "a").unwrap());
    assert_eq!(
        ev.executed,
        [fixture.path("a.rb"), fixture.path("b.rb"), fixture.path("c.rb")]
    );
    assert_eq!(
        loader.loaded_paths(),
        [fixture.path("c.rb"), fixture.path("b.rb"), fixture.path("a.rb")]
    );
}

#[test]
fn circular_require_executes_each_file_once() {
    let fixture = Fixture::new();
    fixture.write("ping.rb", "require pong\nglobal ping done\n");
    fixture.write("pong.rb", "require ping\nglobal pong done\n");
    let mut loader = fixture.loader(&dirs(&[&fixture.root()]));
    let mut ev = Recorder::new();

    assert!(loader.require_feature(&mut ev, "ping").unwrap());
    assert_eq!(ev.executed, [fixture.path("ping.rb"), fixture.path("pong.rb")]);
    assert_eq!(ev.global("pong").as_deref(), Some("done"));
    assert_eq!(ev.global("ping").as_deref(), Some("done"));
    assert!(!loader.require_feature(&mut ev, "pong").unwrap());
}

#[test]
fn self_loading_file_hits_the_nesting_limit() {
    let fixture = Fixture::new();
    fixture.write("again.rb", "load ./again.rb\n");
    let mut loader = fixture.loader(&[]);
    let mut ev = Recorder::new();

    let err = loader.load_path(&mut ev, "./again.rb").unwrap_err().loader();
    assert!(matches!(err, LoaderError::NestingTooDeep { depth: 16, .. }));
    assert_eq!(err.kind(), ErrorKind::LoadError);
    assert_eq!(ev.executed.len(), 16);
    assert!(loader.loaded_paths().is_empty());
}

#[test]
fn take_loaded_paths_drains_the_log() {
    let fixture = Fixture::new();
    let mut loader = fixture.loader(&[]);
    let mut ev = Recorder::new();

    loader.load_path(&mut ev, "./def_lv").unwrap();
    assert_eq!(loader.take_loaded_paths(), [fixture.path("def_lv")]);
    assert!(loader.loaded_paths().is_empty());
}
