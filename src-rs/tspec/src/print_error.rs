//! Diagnostic formatting in the style of rustc
//!
//! ```text
//! error: `Types.Point` is not exported
//!  --> user.ttcn:4:18
//!   |
//! 4 |     const Types.Point origin := { x := 0 };
//!   |           ^^^^^^^^^^^
//!   = help: add `Point` to the exports of `Types`
//!
//! note: declared private here
//!  --> types.ttcn:2:5
//! ```

use std::path::Path;

use anstream::eprintln;
use owo_colors::{OwoColorize, Style};
use tspec_shared::{Context, ErrorLocation, Severity, TspecError};

use crate::{error::CliError, stylesheet};

/// Prints a formatted diagnostic to stderr
pub fn print(error: &TspecError, print_debug: bool) {
    if print_debug {
        #[expect(clippy::use_debug, reason = "debug output is requested explicitly")]
        {
            eprintln!("{error:?}");
        }
    } else {
        eprintln!("{}", error_to_string(error));
    }
}

/// Prints an error that stopped the command
pub fn print_cli_error(error: &CliError) {
    eprintln!("{}", get_error_message_line(&error.to_string()));
}

/// Prints a note that is not tied to a source location
pub fn print_note(message: &str) {
    eprintln!("{}", get_note_message_line(message));
}

/// Converts a diagnostic to its formatted string representation
pub fn error_to_string(error: &TspecError) -> String {
    let message_line = match error.severity() {
        Severity::Error => get_error_message_line(error.message()),
        Severity::Warning => get_message_line("warning", stylesheet::WARNING_COLOR, error.message()),
    };
    let highlight = match error.severity() {
        Severity::Error => stylesheet::ERROR_COLOR,
        Severity::Warning => stylesheet::WARNING_COLOR,
    };

    let mut lines = vec![message_line, get_location_line(error.path(), error.location())];
    match error.location() {
        Some(location) => lines.push(get_source_lines(location, error.context(), highlight)),
        None => lines.extend(error.context().iter().map(|context| {
            let (equals, message) = context_parts(context);
            format!("  {equals} {message}")
        })),
    }
    lines.push(String::new());
    lines.extend(get_context_with_source_lines(error.path(), error.context_with_source()));

    lines.join("\n")
}

fn get_error_message_line(message: &str) -> String {
    get_message_line("error", stylesheet::ERROR_COLOR, message)
}

fn get_note_message_line(message: &str) -> String {
    get_message_line("note", stylesheet::NOTE_COLOR, message)
}

fn get_help_message_line(message: &str) -> String {
    get_message_line("help", stylesheet::HELP_COLOR, message)
}

/// Formats `<kind>: <message>` with a colored kind
fn get_message_line(kind: &str, kind_color: Style, message: &str) -> String {
    let kind_str = kind_color.style(kind);
    format!("{kind_str}: {message}").bold().to_string()
}

fn get_location_line(path: &Path, location: Option<&ErrorLocation>) -> String {
    //  --> <path>
    // OR
    //  --> <path>:<line>:<column>
    let arrow = stylesheet::SOURCE_ANNOTATION.style("-->");
    let path = path.display();

    location.map_or_else(
        || format!(" {arrow} {path}"),
        |location| format!(" {arrow} {path}:{}:{}", location.line(), location.column()),
    )
}

fn context_parts(context: &Context) -> (String, String) {
    match context {
        Context::Note(message) => (
            stylesheet::NOTE_COLOR.bold().style("=").to_string(),
            get_note_message_line(message),
        ),
        Context::Help(message) => (
            stylesheet::HELP_COLOR.bold().style("=").to_string(),
            get_help_message_line(message),
        ),
    }
}

/// Formats the source line with the highlighted range below it
fn get_source_lines(location: &ErrorLocation, context: &[Context], code_highlight_color: Style) -> String {
    //   |
    // 1 | import from Types all;
    //   |             ^^^^^
    let line = location.line();
    let margin_width = line.ilog10() + 1;
    let margin = " ".repeat(margin_width as usize);

    let bar = stylesheet::SOURCE_ANNOTATION.style("|");
    let line_label = stylesheet::SOURCE_ANNOTATION.style(line.to_string());

    let pointer_indent = " ".repeat(location.column() - 1);
    let pointer = code_highlight_color.bold().style("^".repeat(location.length()));

    let mut source_lines = vec![
        format!("{margin} {bar} "),
        format!("{line_label} {bar} {}", location.line_source()),
        format!("{margin} {bar} {pointer_indent}{pointer}"),
    ];
    source_lines.extend(context.iter().map(|context| {
        let (equals, message) = context_parts(context);
        format!("{margin} {equals} {message}")
    }));

    source_lines.join("\n")
}

fn get_context_with_source_lines(path: &Path, contexts: &[(Context, ErrorLocation)]) -> Vec<String> {
    contexts
        .iter()
        .map(|(context, location)| {
            let (message, color) = match context {
                Context::Note(message) => (get_note_message_line(message), stylesheet::NOTE_COLOR),
                Context::Help(message) => (get_help_message_line(message), stylesheet::HELP_COLOR),
            };

            [
                message,
                get_location_line(path, Some(location)),
                get_source_lines(location, &[], color),
                String::new(),
            ]
            .join("\n")
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use indoc::indoc;
    use tspec_shared::{AsTspecError, Span};

    use super::*;

    struct Unknown {
        span: Span,
    }

    impl AsTspecError for Unknown {
        fn message(&self) -> String {
            "`Pointt` is not defined".to_string()
        }

        fn context(&self) -> Vec<Context> {
            vec![Context::Help("did you mean `Point`?".to_string())]
        }

        fn error_location(&self, source: &str) -> Option<ErrorLocation> {
            Some(ErrorLocation::from_source_and_span(source, self.span))
        }
    }

    fn plain(text: &str) -> String {
        anstream::adapter::strip_str(text).to_string()
    }

    #[test]
    fn located_errors_show_the_source_line() {
        let source = "module M {\n  const Pointt p := 1;\n}\n";
        let error = Unknown {
            span: Span::new(19, 25),
        };
        let error = TspecError::from_error_with_source(&error, PathBuf::from("M.ttcn"), source);

        assert_eq!(
            plain(&error_to_string(&error)),
            indoc! {"
                error: `Pointt` is not defined
                 --> M.ttcn:2:9
                  | 
                2 |   const Pointt p := 1;
                  |         ^^^^^^
                  = help: did you mean `Point`?
            "}
        );
    }

    #[test]
    fn errors_without_source_keep_their_context() {
        let error = Unknown { span: Span::new(0, 1) };
        let error = TspecError::from_error(&error, PathBuf::from("M.ttcn"));

        assert_eq!(
            plain(&error_to_string(&error)),
            indoc! {"
                error: `Pointt` is not defined
                 --> M.ttcn
                  = help: did you mean `Point`?
            "}
        );
    }
}
