//! The runner without the process: option parsing and `cli::run`.

use kern_script::cli::{parse_args, run, Command, Options, Program};
use kern_script::{Output, ScriptError};
use pretty_assertions::assert_eq;

use crate::common::Tree;

fn options(args: &[String]) -> Options {
    match parse_args(args.iter().cloned()) {
        Ok(Command::Run(options)) => options,
        other => panic!("expected run options, got {other:?}"),
    }
}

#[test]
fn requires_run_before_the_program() {
    let tree = Tree::new();
    tree.write("lib/greeting.rb", "GREETING = \"hello\"\nputs \"greeting loaded\"\n")
        .write("app.rb", "puts GREETING\nputs require(\"greeting\")\n");

    let opts = options(&[
        "-I".to_owned(),
        tree.path("lib"),
        "-r".to_owned(),
        "greeting".to_owned(),
        tree.path("app.rb"),
    ]);
    let out = Output::buffer();
    run(&opts, None, out.clone()).unwrap();
    assert_eq!(out.captured(), "greeting loaded\nhello\nfalse\n");
}

#[test]
fn env_load_path_is_searched_after_include_dirs() {
    let tree = Tree::new();
    tree.write("first/which.rb", "puts \"first\"\n")
        .write("second/which.rb", "puts \"second\"\n")
        .write("second/only_env.rb", "puts \"env\"\n");

    let opts = Options {
        include: vec![tree.path("first")],
        requires: vec!["which".to_owned(), "only_env".to_owned()],
        program: Program::Inline("puts $LOAD_PATH".to_owned()),
        verbose: false,
    };
    let out = Output::buffer();
    let env = format!("{}:", tree.path("second"));
    run(&opts, Some(env.as_str()), out.clone()).unwrap();
    assert_eq!(
        out.captured(),
        format!(
            "first\nenv\n{}\n{}\n",
            tree.path("first"),
            tree.path("second")
        )
    );
}

#[test]
fn inline_code_sees_the_search_list() {
    let tree = Tree::new();
    tree.write("lib/util.rb", "UTIL = :ready\n");

    let opts = options(&[
        format!("-I{}", tree.path("lib")),
        "-e".to_owned(),
        "require \"util\"".to_owned(),
        "-e".to_owned(),
        "puts UTIL, __FILE__".to_owned(),
    ]);
    let out = Output::buffer();
    run(&opts, None, out.clone()).unwrap();
    assert_eq!(out.captured(), "ready\n-e\n");
}

#[test]
fn missing_feature_stops_the_run() {
    let opts = Options {
        include: vec![],
        requires: vec!["_kern_no_such_feature_".to_owned()],
        program: Program::Inline("puts \"unreachable\"".to_owned()),
        verbose: false,
    };
    let out = Output::buffer();
    let err = run(&opts, None, out.clone()).unwrap_err();
    assert!(matches!(err, ScriptError::Loader(_)));
    assert_eq!(out.captured(), "");
}

#[test]
fn missing_program_file_reports_the_given_name() {
    let tree = Tree::new();
    let missing = tree.path("nope.rb");
    let opts = options(&[missing.clone()]);

    let err = run(&opts, None, Output::silent()).unwrap_err();
    assert_eq!(err.to_string(), format!("cannot load such file -- {missing}"));
}
