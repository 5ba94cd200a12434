//! Orchestration of a full check: extract, run each example, aggregate.

use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

use docex::{Document, Example};

use crate::config::CheckConfig;
use crate::error::{Error, Result};
use crate::runner::{GoToolchain, Runner, Toolchain};

/// Returned when the number of examples found differs from the expected count.
pub const COUNT_MISMATCH_STATUS: i32 = 86;

/// Recorded for an example that was killed after exceeding its time limit.
pub const TIMEOUT_STATUS: i32 = 124;

/// Recorded for an example the harness could not run at all.
pub const FAULT_STATUS: i32 = 127;

/// How one example's run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The toolchain ran and exited with this status.
    Exited(i32),
    TimedOut(Duration),
    /// The harness failed before the example could produce a status.
    Faulted(String),
    /// Not run on this platform because of an `os` tag. Counts as a pass.
    Skipped(String),
}

impl Outcome {
    pub fn from_run(result: Result<i32>) -> Self {
        match result {
            Ok(code) => Outcome::Exited(code),
            Err(Error::Timeout(limit)) => Outcome::TimedOut(limit),
            Err(err) => Outcome::Faulted(err.to_string()),
        }
    }

    pub fn status(&self) -> i32 {
        match self {
            Outcome::Exited(code) => *code,
            Outcome::TimedOut(_) => TIMEOUT_STATUS,
            Outcome::Faulted(_) => FAULT_STATUS,
            Outcome::Skipped(_) => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Index into [`RunSummary::documents`].
    pub document: usize,
    /// 1-based position among the runnable examples of its document.
    pub ordinal: usize,
    /// 1-based document line on which the example starts.
    pub line: usize,
    /// Byte span of the example in the document.
    pub span: Range<usize>,
    pub outcome: Outcome,
}

impl ExecutionResult {
    fn new(document: usize, example: &Example<'_>, outcome: Outcome) -> Self {
        ExecutionResult {
            document,
            ordinal: example.ordinal,
            line: example.line,
            span: example.span.clone(),
            outcome,
        }
    }

    pub fn status(&self) -> i32 {
        self.outcome.status()
    }

    pub fn passed(&self) -> bool {
        self.status() == 0
    }
}

/// Aggregate over every example run in one check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// The checked documents, in the order they were given.
    pub documents: Vec<Document>,
    /// Results in document order, then ordinal order.
    pub results: Vec<ExecutionResult>,
    /// Expected example count across all documents.
    pub expected: usize,
    /// Final process-visible status.
    pub status: i32,
}

impl RunSummary {
    pub fn actual(&self) -> usize {
        self.results.len()
    }

    pub fn count_matches(&self) -> bool {
        self.actual() == self.expected
    }

    pub fn failures(&self) -> impl Iterator<Item = &ExecutionResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// The document `result` came from.
    pub fn document_of(&self, result: &ExecutionResult) -> &Document {
        &self.documents[result.document]
    }
}

/// Runs every example of one or more documents through a toolchain, in order.
pub struct Checker<T> {
    runner: Runner<T>,
    expected: usize,
    os: String,
}

impl<T: Toolchain> Checker<T> {
    pub fn new(toolchain: T, expected: usize) -> Self {
        Checker {
            runner: Runner::new(toolchain),
            expected,
            os: docex::tags::current_os().to_string(),
        }
    }

    /// Leave each example's temporary source file on disk.
    pub fn keep_sources(mut self, keep: bool) -> Self {
        self.runner = self.runner.keep_sources(keep);
        self
    }

    /// Platform name matched against `os` tags. Defaults to the running one.
    pub fn with_os(mut self, os: impl Into<String>) -> Self {
        self.os = os.into();
        self
    }

    /// Check the document at `path`. Progress goes to `ok`, failures to `err`.
    pub fn check_path(
        &self,
        path: &Path,
        ok: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<RunSummary> {
        self.check_paths(std::slice::from_ref(&path.to_path_buf()), ok, err)
    }

    /// Check each document at `paths` in turn; the count covers all of them.
    ///
    /// Documents are read as they are reached, so a read failure stops the
    /// check after the earlier documents have been reported.
    pub fn check_paths(
        &self,
        paths: &[PathBuf],
        ok: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<RunSummary> {
        let mut documents = Vec::with_capacity(paths.len());
        let mut results = Vec::new();

        for path in paths {
            writeln!(ok, "---> CHECKING {}", path.display())?;
            let document = Document::read(path).map_err(|source| Error::ReadDocument {
                path: path.clone(),
                source,
            })?;
            self.run_document(documents.len(), &document, &mut results, ok, err)?;
            documents.push(document);
        }

        self.finish(documents, results, ok, err)
    }

    /// Check an already loaded document.
    pub fn check_document(
        &self,
        document: &Document,
        ok: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<RunSummary> {
        self.check_documents(std::slice::from_ref(document), ok, err)
    }

    /// Check already loaded documents as one run.
    pub fn check_documents(
        &self,
        documents: &[Document],
        ok: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<RunSummary> {
        let mut results = Vec::new();
        for (index, document) in documents.iter().enumerate() {
            writeln!(ok, "---> CHECKING {}", document.name)?;
            self.run_document(index, document, &mut results, ok, err)?;
        }
        self.finish(documents.to_vec(), results, ok, err)
    }

    fn run_document(
        &self,
        index: usize,
        document: &Document,
        results: &mut Vec<ExecutionResult>,
        ok: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<()> {
        for example in document.examples() {
            let outcome = if example.tags.allows_os(&self.os) {
                Outcome::from_run(self.runner.run(example.source, &example.tags.args))
            } else {
                tracing::debug!(ordinal = example.ordinal, os = %self.os, "skipping example");
                Outcome::Skipped(format!("not supported on {}", self.os))
            };
            report_outcome(&example, &outcome, ok, err)?;
            results.push(ExecutionResult::new(index, &example, outcome));
        }
        Ok(())
    }

    fn finish(
        &self,
        documents: Vec<Document>,
        results: Vec<ExecutionResult>,
        ok: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<RunSummary> {
        let status = if results.len() != self.expected {
            writeln!(
                err,
                "!!!> EXPECTED SOURCE COUNT {} != {}",
                self.expected,
                results.len()
            )?;
            COUNT_MISMATCH_STATUS
        } else {
            let aggregate = results.iter().map(ExecutionResult::status).max().unwrap_or(0);
            if aggregate == 0 {
                writeln!(ok, "---> OK!")?;
            }
            aggregate
        };

        tracing::info!(
            documents = documents.len(),
            expected = self.expected,
            actual = results.len(),
            status,
            "check finished"
        );

        Ok(RunSummary {
            documents,
            results,
            expected: self.expected,
            status,
        })
    }
}

fn report_outcome(
    example: &Example<'_>,
    outcome: &Outcome,
    ok: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<()> {
    if let Outcome::Skipped(reason) = outcome {
        writeln!(ok, "---> SKIP ({}): {}", example.ordinal, reason)?;
        return Ok(());
    }
    if outcome.status() == 0 {
        writeln!(ok, "---> PASS ({})", example.ordinal)?;
        return Ok(());
    }

    writeln!(
        err,
        "!!!> FAIL ({}):\n!!! {}",
        example.ordinal,
        example.numbered().replace('\n', "\n!!! ")
    )?;

    match outcome {
        Outcome::Exited(_) | Outcome::Skipped(_) => {}
        Outcome::TimedOut(limit) => {
            writeln!(err, "!!!> TIMED OUT ({}) after {:?}", example.ordinal, limit)?;
        }
        Outcome::Faulted(reason) => {
            writeln!(err, "!!!> HARNESS FAULT ({}): {}", example.ordinal, reason)?;
        }
    }
    Ok(())
}

/// Run a full check with the Go toolchain described by `config`.
pub fn check(config: &CheckConfig, ok: &mut dyn Write, err: &mut dyn Write) -> Result<RunSummary> {
    Checker::new(GoToolchain::from_config(config), config.expected_count)
        .keep_sources(config.keep_sources)
        .check_paths(&config.sources, ok, err)
}
