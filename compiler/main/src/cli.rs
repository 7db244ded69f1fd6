use clap::{
    builder::{PossibleValue, TypedValueParser, ValueParser},
    Arg, ArgAction, ArgMatches,
};
use std::{num::NonZeroUsize, path::PathBuf, time::Duration};
use utility::paint::ColorChoice;

pub(crate) fn arguments() -> (Command, GlobalOptions) {
    let path_arg = Arg::new(argument::PATH).value_parser(ValueParser::path_buf());

    let matches = clap::Command::new("arden")
        .bin_name("arden")
        .version(env!("CARGO_PKG_VERSION"))
        .about("The diagnostics and specification-conformance engine of the Arden language")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new(option::COLOR)
                .long("color")
                .global(true)
                .value_name("WHEN")
                .value_parser(ColorChoiceParser)
                .help("Control when to use color"),
        )
        .subcommands([
            clap::Command::new(subcommand::CHECK)
                .visible_alias("c")
                .about("Check the given source files for errors")
                .arg(
                    path_arg
                        .clone()
                        .required(true)
                        .action(ArgAction::Append)
                        .help("The paths to the source files"),
                ),
            clap::Command::new(subcommand::VERIFY)
                .visible_alias("v")
                .about("Run the specification-conformance suite")
                .args([
                    path_arg
                        .action(ArgAction::Append)
                        .help("Only run the tests below these paths"),
                    Arg::new(option::SUITE)
                        .long("suite")
                        .value_name("PATH")
                        .value_parser(ValueParser::path_buf())
                        .help("Set the folder containing the test files"),
                    Arg::new(option::TEST_THREADS)
                        .long("test-threads")
                        .value_name("COUNT")
                        .value_parser(clap::value_parser!(u64).range(1..))
                        .help("Set the number of test threads"),
                    Arg::new(option::TIMEOUT)
                        .long("timeout")
                        .value_name("SECONDS")
                        .value_parser(clap::value_parser!(u64))
                        .help("Treat tests that run longer than the given time as failures"),
                ]),
        ])
        .get_matches();

    let command = match matches.subcommand().unwrap() {
        (subcommand::CHECK, matches) => Command::Check {
            paths: matches
                .get_many(argument::PATH)
                .unwrap()
                .cloned()
                .collect(),
        },
        (subcommand::VERIFY, matches) => Command::Verify {
            suite: matches
                .get_one(option::SUITE)
                .cloned()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SUITE_FOLDER)),
            filters: matches
                .get_many(argument::PATH)
                .map(|paths| paths.cloned().collect())
                .unwrap_or_default(),
            number_test_threads: matches
                .get_one::<u64>(option::TEST_THREADS)
                .and_then(|&count| NonZeroUsize::new(count as usize))
                .unwrap_or_else(default_test_thread_count),
            timeout: matches
                .get_one::<u64>(option::TIMEOUT)
                .map(|&seconds| Duration::from_secs(seconds)),
        },
        _ => unreachable!(),
    };

    (command, GlobalOptions::deserialize(&matches))
}

const DEFAULT_SUITE_FOLDER: &str = "test/conformance";

fn default_test_thread_count() -> NonZeroUsize {
    std::thread::available_parallelism().unwrap_or(NonZeroUsize::MIN)
}

mod subcommand {
    pub(super) const CHECK: &str = "check";
    pub(super) const VERIFY: &str = "verify";
}

mod argument {
    pub(super) const PATH: &str = "PATH";
}

mod option {
    pub(super) const COLOR: &str = "color";
    pub(super) const SUITE: &str = "suite";
    pub(super) const TEST_THREADS: &str = "test_threads";
    pub(super) const TIMEOUT: &str = "timeout";
}

pub(crate) enum Command {
    Check {
        paths: Vec<PathBuf>,
    },
    Verify {
        suite: PathBuf,
        filters: Vec<PathBuf>,
        number_test_threads: NonZeroUsize,
        timeout: Option<Duration>,
    },
}

pub(crate) struct GlobalOptions {
    pub(crate) color: ColorChoice,
}

impl GlobalOptions {
    fn deserialize(matches: &ArgMatches) -> Self {
        Self {
            color: matches.get_one(option::COLOR).copied().unwrap_or_default(),
        }
    }
}

#[derive(Clone)]
struct ColorChoiceParser;

impl TypedValueParser for ColorChoiceParser {
    type Value = ColorChoice;

    fn parse_ref(
        &self,
        _: &clap::Command,
        _: Option<&Arg>,
        source: &std::ffi::OsStr,
    ) -> Result<Self::Value, clap::Error> {
        let Some(source) = source.to_str() else {
            return Err(clap::Error::raw(
                clap::error::ErrorKind::InvalidUtf8,
                "the color choice is not valid UTF-8\n",
            ));
        };

        source.parse().map_err(|()| {
            clap::Error::raw(
                clap::error::ErrorKind::InvalidValue,
                format!("‘{source}’ is not a valid color choice\n"),
            )
        })
    }

    fn possible_values(&self) -> Option<Box<dyn Iterator<Item = PossibleValue>>> {
        Some(Box::new(
            ColorChoice::VALUES.into_iter().map(PossibleValue::new),
        ))
    }
}
