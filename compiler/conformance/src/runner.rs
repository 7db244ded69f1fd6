//! The multi-threaded conformance suite runner.
//!
//! Worker threads pull chunks of directory entries from a shared walker and
//! run every test file they receive. Each worker keeps its own source map so
//! failure reports can be rendered with source snippets once the suite is done.

use crate::{
    summary::{TestSuiteStatistics, TestSuiteSummary},
    Configuration, Expectation, Verdict,
};
use diagnostics::Diagnostic;
use joinery::JoinableIterator;
use span::SourceMap;
use std::{
    collections::BTreeSet,
    io::{self, Write},
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::{Arc, LazyLock, Mutex},
    time::{Duration, Instant},
};
use utility::{
    paint::{AnsiColor, ColorChoice, Painter},
    pluralize,
};

pub struct Options {
    /// The folder containing the test files.
    pub suite: PathBuf,
    /// Only run tests whose path starts with one of these filters.
    pub filters: Vec<PathBuf>,
    pub number_test_threads: NonZeroUsize,
    /// The wall-clock limit per test file.
    pub timeout: Option<Duration>,
    pub color: ColorChoice,
}

pub fn run_suite(options: Options) -> Result<(), ()> {
    let entries = Arc::new(Mutex::new(
        walkdir::WalkDir::new(&options.suite).into_iter(),
    ));
    let number_test_threads = options.number_test_threads.get();
    let options = SharedOptions::from(options);

    let suite_time = Instant::now();

    let handles: Vec<_> = (0..number_test_threads)
        .map(|_| {
            let shared_entries = entries.clone();

            std::thread::spawn(move || {
                let chunk_size = number_test_threads;
                let mut entries = Vec::with_capacity(chunk_size);
                let mut statistics = TestSuiteStatistics::default();
                let mut failed_tests = Vec::new();
                let mut map = SourceMap::default();

                loop {
                    {
                        let mut shared_entries = shared_entries.lock().unwrap();

                        for _ in 0..chunk_size {
                            match shared_entries.next() {
                                Some(entry) => entries.push(entry),
                                None => break,
                            }
                        }
                    }

                    if entries.is_empty() {
                        break;
                    }

                    for entry in entries.drain(..) {
                        handle_suite_entry(
                            &entry.unwrap(),
                            options,
                            &mut statistics,
                            &mut failed_tests,
                            &mut map,
                        );
                    }
                }

                (statistics, failed_tests, map)
            })
        })
        .collect();

    let thread_local_data: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let duration = suite_time.elapsed();
    let mut statistics = TestSuiteStatistics::default();
    let mut failed_tests = Vec::new();
    let mut stdout = Painter::stdout(options.color);

    for (local_statistics, mut local_failed_tests, map) in thread_local_data {
        if !local_failed_tests.is_empty() {
            writeln!(stdout).unwrap();
            writeln!(stdout, "{}", section_separator()).unwrap();
            writeln!(stdout).unwrap();

            for failed_test in &local_failed_tests {
                failed_test.print(&map, &mut stdout).unwrap();
                writeln!(stdout).unwrap();
            }
        }

        statistics += &local_statistics;
        failed_tests.append(&mut local_failed_tests);
    }

    if !failed_tests.is_empty() {
        let (invalid_tests, failed_tests): (Vec<_>, Vec<_>) = failed_tests
            .into_iter()
            .partition(|test| matches!(test.failure, Failure::Invalid { .. }));

        let invalid_tests: BTreeSet<_> = invalid_tests.into_iter().map(|test| test.path).collect();
        let failed_tests: BTreeSet<_> = failed_tests.into_iter().map(|test| test.path).collect();

        if !failed_tests.is_empty() {
            writeln!(stdout, "{}", section_header("FAILED TESTS")).unwrap();
            writeln!(stdout).unwrap();

            for failed_test in failed_tests {
                writeln!(stdout, "  {}", path::shorten(&failed_test).display()).unwrap();
            }
        }

        if !invalid_tests.is_empty() {
            writeln!(stdout).unwrap();
            writeln!(stdout, "{}", section_header("INVALID TESTS")).unwrap();
            writeln!(stdout).unwrap();

            for invalid_test in invalid_tests {
                writeln!(stdout, "  {}", path::shorten(&invalid_test).display()).unwrap();
            }
        }
    }

    let summary = TestSuiteSummary {
        statistics,
        duration,
    };

    if summary.statistics.total_amount() != 0 {
        writeln!(stdout).unwrap();
        writeln!(stdout, "{}", section_separator()).unwrap();
        writeln!(stdout).unwrap();
    }

    summary.render(&mut stdout).unwrap();
    writeln!(stdout).unwrap();

    writeln!(stdout, "{}", section_separator()).unwrap();
    writeln!(stdout).unwrap();

    stdout.flush().unwrap();

    if !summary.statistics.passed() {
        return Err(());
    }

    Ok(())
}

#[derive(Clone, Copy)]
struct SharedOptions {
    filters: &'static [PathBuf],
    timeout: Option<Duration>,
    color: ColorChoice,
}

impl From<Options> for SharedOptions {
    fn from(options: Options) -> Self {
        Self {
            filters: options.filters.leak(),
            timeout: options.timeout,
            color: options.color,
        }
    }
}

fn handle_suite_entry(
    entry: &walkdir::DirEntry,
    options: SharedOptions,
    statistics: &mut TestSuiteStatistics,
    failed_tests: &mut Vec<FailedTest>,
    map: &mut SourceMap,
) {
    let path = entry.path();

    if entry.file_type().is_dir() {
        return;
    }

    // disallow symbolic links for now
    if entry.file_type().is_symlink() {
        print_file_status(path, Status::Invalid, None, options.color).unwrap();
        failed_tests.push(FailedTest::new(
            path.to_owned(),
            Failure::Invalid {
                message: "symbolic links are not allowed".into(),
                span: None,
            },
        ));
        statistics.invalid += 1;
        return;
    }

    // anything that is not a test file is commentary, e.g. README files
    if !utility::has_file_extension(path, utility::FILE_EXTENSION) {
        return;
    }

    if !options.filters.is_empty()
        && !options
            .filters
            .iter()
            .any(|filter| path.starts_with(filter))
    {
        statistics.skipped += 1;
        return;
    }

    let file = match map.load(path) {
        Ok(file) => file,
        Err(error) => {
            print_file_status(path, Status::Invalid, None, options.color).unwrap();
            failed_tests.push(FailedTest::new(
                path.to_owned(),
                Failure::Invalid {
                    message: format!("the test file could not be read: {error}").into(),
                    span: None,
                },
            ));
            statistics.invalid += 1;
            return;
        }
    };

    let configuration = match Configuration::parse(&map[file]) {
        Ok(configuration) => configuration,
        Err(error) => {
            print_file_status(path, Status::Invalid, None, options.color).unwrap();
            failed_tests.push(FailedTest::new(
                path.to_owned(),
                Failure::Invalid {
                    message: error.message,
                    span: error.span,
                },
            ));
            statistics.invalid += 1;
            return;
        }
    };

    if configuration.ignored {
        print_file_status(path, Status::Ignored, None, options.color).unwrap();
        statistics.ignored += 1;
        return;
    }

    let time = Instant::now();
    let verdict = crate::run_test(map, file, &configuration);
    let duration = time.elapsed();

    let verdict = match verdict {
        Ok(verdict) => verdict,
        Err(error) => {
            print_file_status(path, Status::Invalid, None, options.color).unwrap();
            failed_tests.push(FailedTest::new(
                path.to_owned(),
                Failure::Invalid {
                    message: error.message,
                    span: error.span,
                },
            ));
            statistics.invalid += 1;
            return;
        }
    };

    let failure = if let Some(timeout) = options.timeout.filter(|&timeout| duration > timeout) {
        Some(Failure::Timeout { timeout })
    } else {
        match verdict {
            Verdict::Pass => None,
            Verdict::Fail {
                missing,
                unexpected,
            } => Some(Failure::Mismatch {
                missing,
                unexpected,
                description: configuration.citation.description,
                issues: configuration.citation.issues,
            }),
        }
    };

    let status = match failure {
        Some(failure) => {
            failed_tests.push(FailedTest::new(path.to_owned(), failure));
            statistics.failed += 1;
            Status::Failure
        }
        None => {
            statistics.passed += 1;
            Status::Ok
        }
    };

    print_file_status(path, status, Some(duration), options.color).unwrap();
}

fn print_file_status(
    path: &Path,
    status: Status,
    duration: Option<Duration>,
    color: ColorChoice,
) -> io::Result<()> {
    let padding = terminal_width() * 4 / 5;
    let mut stdout = Painter::stdout(color);

    write!(stdout, "  {:<padding$} ", path::shorten(path).display())?;
    stdout.set(status.color())?;
    write!(stdout, "{}", status.name())?;
    stdout.unset()?;

    if let Some(duration) = duration {
        stdout.set(AnsiColor::BrightBlack)?;
        write!(stdout, " {duration:.2?}")?;
        stdout.unset()?;
    }

    writeln!(stdout)?;
    stdout.flush()
}

#[derive(Clone, Copy)]
enum Status {
    Ok,
    Ignored,
    Failure,
    Invalid,
}

impl Status {
    const fn name(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Ignored => "ignored",
            Self::Failure => "FAIL",
            Self::Invalid => "INVALID",
        }
    }

    const fn color(self) -> AnsiColor {
        match self {
            Self::Ok => AnsiColor::Green,
            Self::Ignored => AnsiColor::Yellow,
            Self::Failure | Self::Invalid => AnsiColor::Red,
        }
    }
}

struct FailedTest {
    path: PathBuf,
    failure: Failure,
}

impl FailedTest {
    fn new(path: PathBuf, failure: Failure) -> Self {
        Self { path, failure }
    }

    fn print(&self, map: &SourceMap, sink: &mut Painter) -> io::Result<()> {
        match &self.failure {
            Failure::Mismatch {
                missing,
                unexpected,
                description,
                issues,
            } => {
                let diagnostic = Diagnostic::error()
                    .path(path::shorten(&self.path).into_owned())
                    .message("the produced diagnostics differ from the expected ones")
                    .with(|error| match description {
                        Some(description) => {
                            error.note(format!("the test covers: {description}"))
                        }
                        None => error,
                    })
                    .with(|error| match &issues[..] {
                        [] => error,
                        issues => error.note(format!(
                            "the test tracks {}",
                            issues
                                .iter()
                                .map(|issue| format!("‘{issue}’"))
                                .join_with(", "),
                        )),
                    });

                writeln!(sink, "{}", diagnostic.format(None))?;

                for &Expectation { code, span } in missing {
                    let diagnostic = Diagnostic::error()
                        .code(code)
                        .message("this expected diagnostic was not produced")
                        .unlabeled_span(span);

                    writeln!(sink, "{}", diagnostic.format(Some(map)))?;
                }

                for &Expectation { code, span } in unexpected {
                    let diagnostic = Diagnostic::error()
                        .code(code)
                        .message("this produced diagnostic was not expected")
                        .unlabeled_span(span);

                    writeln!(sink, "{}", diagnostic.format(Some(map)))?;
                }

                Ok(())
            }
            Failure::Invalid { message, span } => {
                let diagnostic = Diagnostic::error()
                    .path(path::shorten(&self.path).into_owned())
                    .message(message.clone())
                    .with(|error| match span {
                        Some(span) => error.unlabeled_span(span),
                        None => error,
                    });

                writeln!(sink, "{}", diagnostic.format(Some(map)))
            }
            Failure::Timeout { timeout } => {
                let timeout = timeout.as_secs();

                let diagnostic = Diagnostic::error()
                    .path(path::shorten(&self.path).into_owned())
                    .message("the test ran longer than the specified timeout")
                    .note(format!(
                        "the timeout is {timeout} {} (set via the command-line option)",
                        pluralize!(timeout, "second"),
                    ));

                writeln!(sink, "{}", diagnostic.format(None))
            }
        }
    }
}

enum Failure {
    /// The produced diagnostics differ from the expectations.
    Mismatch {
        missing: Vec<Expectation>,
        unexpected: Vec<Expectation>,
        description: Option<String>,
        issues: Vec<String>,
    },
    /// The test file itself is malformed.
    Invalid {
        message: utility::Str,
        span: Option<span::Span>,
    },
    Timeout {
        timeout: Duration,
    },
}

fn section_separator() -> String {
    "=".repeat(terminal_width())
}

fn section_header(title: &str) -> String {
    use unicode_width::UnicodeWidthStr;

    let mut header = format!("==== {title} ");
    let width = header.width();
    header += &"=".repeat(terminal_width().saturating_sub(width));
    header
}

fn terminal_width() -> usize {
    static WIDTH: LazyLock<usize> =
        LazyLock::new(|| terminal_size::terminal_size().map_or(120, |(width, _)| width.0 as _));

    *WIDTH
}

mod path {
    use std::{
        borrow::Cow,
        path::{Path, PathBuf},
        sync::LazyLock,
    };

    pub(super) fn shorten(path: &Path) -> Cow<'_, Path> {
        pathdiff::diff_paths(path, current_folder()).map_or(path.into(), Into::into)
    }

    fn current_folder() -> &'static Path {
        static PATH: LazyLock<PathBuf> =
            LazyLock::new(|| std::env::current_dir().unwrap_or_default());

        &PATH
    }
}
