//! Rendering script errors for the terminal.
//!
//! Syntax errors get a source snippet via ariadne; everything else is a
//! single `error: ...` line.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::error::ScriptError;

/// Render `err` as it should appear on stderr.
pub fn render(err: &ScriptError, color: bool) -> String {
    match err {
        ScriptError::Syntax {
            path,
            message,
            span,
            text,
            ..
        } => render_snippet(path, message, span.range(), text, color)
            .unwrap_or_else(|| format!("error: {err}\n")),
        other => format!("error: {other}\n"),
    }
}

fn render_snippet(
    path: &str,
    message: &str,
    range: std::ops::Range<usize>,
    text: &str,
    color: bool,
) -> Option<String> {
    let mut out = Vec::new();
    Report::build(ReportKind::Error, path, range.start)
        .with_config(Config::default().with_color(color))
        .with_message("syntax error")
        .with_label(
            Label::new((path, range))
                .with_message(message)
                .with_color(Color::Red),
        )
        .finish()
        .write((path, Source::from(text.to_owned())), &mut out)
        .ok()?;
    String::from_utf8(out).ok()
}
