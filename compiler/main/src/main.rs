//! The command-line entry point.

use diagnostics::{Diagnostic, Reporter};
use session::{Features, Session};
use span::SourceMap;
use std::{
    path::PathBuf,
    process::ExitCode,
    sync::{Arc, RwLock},
};
use utility::default;

mod cli;

fn main() -> ExitCode {
    match try_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

fn try_main() -> Result<(), ()> {
    let (command, global_options) = cli::arguments();

    match command {
        cli::Command::Check { paths } => check(&paths),
        cli::Command::Verify {
            suite,
            filters,
            number_test_threads,
            timeout,
        } => conformance::run_suite(conformance::Options {
            suite,
            filters,
            number_test_threads,
            timeout,
            color: global_options.color,
        }),
    }
}

fn check(paths: &[PathBuf]) -> Result<(), ()> {
    let map: Arc<RwLock<SourceMap>> = default();
    let reporter = Reporter::stderr().with_map(map.clone());

    let mut health = Ok(());

    for path in paths {
        let file = match map.write().unwrap().load(path) {
            Ok(file) => file,
            Err(error) => {
                Diagnostic::error()
                    .message(format!("the file could not be read: {error}"))
                    .path(path.clone())
                    .report(&reporter);
                health = Err(());
                continue;
            }
        };

        let session = Session::new(Features::default(), &reporter);
        let map = map.read().unwrap();

        if driver::analyze(&map, file, &session).is_err() {
            health = Err(());
        }
    }

    health
}
