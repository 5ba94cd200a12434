use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream};

use harness::{ExecutionResult, Outcome, RunSummary};

/// Point at each failing example's opening line in the document.
pub fn emit_failures(summary: &RunSummary, color_choice: ColorChoice) {
    if summary.failures().next().is_none() {
        return;
    }

    let mut files = SimpleFiles::new();
    let file_ids: Vec<usize> = summary
        .documents
        .iter()
        .map(|document| files.add(document.name.clone(), document.text.clone()))
        .collect();

    let writer = StandardStream::stderr(color_choice);
    let config = term::Config::default();

    for failure in summary.failures() {
        let text = &summary.document_of(failure).text;
        let diagnostic = failure_diagnostic(failure, text, file_ids[failure.document]);
        let _ = term::emit_to_write_style(&mut writer.lock(), &config, &files, &diagnostic);
    }
}

fn failure_diagnostic(failure: &ExecutionResult, text: &str, file_id: usize) -> Diagnostic<usize> {
    // Label only the first line; examples are often long.
    let first_line_end = text[failure.span.clone()]
        .find('\n')
        .map_or(failure.span.end, |n| failure.span.start + n);

    let (message, note) = match &failure.outcome {
        Outcome::Exited(code) => (
            format!("example {} exited with status {}", failure.ordinal, code),
            None,
        ),
        Outcome::TimedOut(limit) => (
            format!("example {} timed out after {:?}", failure.ordinal, limit),
            None,
        ),
        Outcome::Faulted(reason) => (
            format!("example {} could not be run", failure.ordinal),
            Some(reason.clone()),
        ),
        Outcome::Skipped(reason) => (
            format!("example {} was skipped", failure.ordinal),
            Some(reason.clone()),
        ),
    };

    Diagnostic::error()
        .with_message(message)
        .with_labels(vec![
            Label::primary(file_id, failure.span.start..first_line_end)
                .with_message(format!("example {} starts here", failure.ordinal)),
        ])
        .with_notes(note.into_iter().collect())
}
