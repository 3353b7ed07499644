// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// File: app.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use crate::mh::checklist::LineErrorPolicy;
use crate::mh::commands::{
	self, sum::DEFAULT_ALGORITHM, CheckOptions, CommandError, ExitStatus,
	ListOptions, SumOptions,
};
use crate::mh::output::TextEncoding;
use clap::{crate_name, Arg, ArgAction};
use clap_complete::{generate, Generator, Shell};
use colored::Colorize;
use std::io;
use tracing_subscriber::EnvFilter;

const HELP_TEMPLATE: &str = "{before-help}{name} {version}
Written by {author-with-newline}{about-with-newline}
Commands:
  mhsum list                 Show available hash algorithms
  mhsum sum -h sha2-256 FILE Print self-describing hashes (stdin when no FILE)
  mhsum check SUMS           Verify a checklist written by `sum`
{usage-heading} {usage}

{all-args}{after-help}
";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "MHSUM_LOG";
/// Environment variable overriding the default `sum` algorithm.
pub const HASH_ENV: &str = "MHSUM_HASH";

pub fn build_cli() -> clap::Command {
	clap::Command::new(clap::crate_name!())
		.color(clap::ColorChoice::Never)
		.help_template(HELP_TEMPLATE)
		.bin_name(crate_name!())
		.version(clap::crate_version!())
		.author(clap::crate_authors!())
		.about("Compute and verify multihash checksums")
		.subcommand_required(true)
		.arg_required_else_help(true)
		.subcommand(
			clap::command!("list")
				.about("List available hash algorithms")
				.arg(
					Arg::new("long")
						.short('l')
						.long("long")
						.help("Show code, default length and legacy marker")
						.action(ArgAction::SetTrue),
				),
		)
		.subcommand(
			clap::command!("sum")
				.about("Print the multihash of files (or stdin)")
				.disable_help_flag(true)
				.arg(
					Arg::new("help")
						.long("help")
						.help("Print help")
						.action(ArgAction::Help),
				)
				.arg(
					Arg::new("hash")
						.short('h')
						.long("hash")
						.env(HASH_ENV)
						.help("Hash algorithm to use (see `mhsum list`)")
						.default_value(DEFAULT_ALGORITHM),
				)
				.arg(
					Arg::new("length")
						.short('l')
						.long("length")
						.value_parser(clap::value_parser!(usize))
						.help("Digest length in bytes (truncates fixed-size digests)"),
				)
				.arg(
					Arg::new("format")
						.short('f')
						.long("format")
						.value_parser(clap::value_parser!(TextEncoding))
						.help("Text encoding of the printed hash")
						.default_value("hex"),
				)
				.arg(
					Arg::new("quiet")
						.short('q')
						.long("quiet")
						.help("Do not warn about weak algorithms")
						.action(ArgAction::SetTrue),
				)
				.arg(
					Arg::new("files")
						.help("Files to hash; `-` or nothing reads stdin")
						.num_args(0..)
						.action(ArgAction::Append),
				),
		)
		.subcommand(
			clap::command!("check")
				.about("Read sums from a checklist and verify them")
				.arg(
					Arg::new("strict")
						.long("strict")
						.help("Abort on the first line that cannot be verified")
						.action(ArgAction::SetTrue),
				)
				.arg(
					Arg::new("checklist")
						.help("Checklist file written by `mhsum sum`")
						.num_args(0..)
						.action(ArgAction::Append),
				),
		)
		.subcommand(
			clap::command!("completions")
				.about("Generate shell completions")
				.arg(
					Arg::new("shell")
						.value_parser(clap::value_parser!(Shell))
						.required(true),
				),
		)
}

fn strings(matches: &clap::ArgMatches, id: &str) -> Vec<String> {
	matches
		.get_many::<String>(id)
		.map(|values| values.cloned().collect())
		.unwrap_or_default()
}

impl ListOptions {
	pub fn from_matches(matches: &clap::ArgMatches) -> Self {
		Self {
			long: matches.get_flag("long"),
		}
	}
}

impl SumOptions {
	pub fn from_matches(matches: &clap::ArgMatches) -> Self {
		Self {
			algorithm: matches
				.get_one::<String>("hash")
				.cloned()
				.unwrap_or_else(|| DEFAULT_ALGORITHM.to_string()),
			paths: strings(matches, "files"),
			length: matches.get_one::<usize>("length").copied(),
			encoding: matches
				.get_one::<TextEncoding>("format")
				.copied()
				.unwrap_or_default(),
			quiet: matches.get_flag("quiet"),
		}
	}
}

impl CheckOptions {
	pub fn from_matches(
		matches: &clap::ArgMatches,
	) -> Result<Self, CommandError> {
		let policy = if matches.get_flag("strict") {
			LineErrorPolicy::Abort
		} else {
			LineErrorPolicy::SkipAndReport
		};
		Self::from_args(&strings(matches, "checklist"), policy)
	}
}

/// Install the stderr tracing subscriber. Filter comes from `MHSUM_LOG`,
/// defaulting to warnings only so stdout stays clean.
pub fn init_logging() {
	let filter = EnvFilter::try_from_env(LOG_ENV)
		.unwrap_or_else(|_| EnvFilter::new("warn"));
	let _ = tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.with_target(false)
		.try_init();
}

fn report_error(err: &CommandError) {
	eprintln!("{} {}", "error:".red().bold(), err);
}

fn dispatch(matches: &clap::ArgMatches) -> Result<ExitStatus, CommandError> {
	let stdout = io::stdout();
	let mut out = stdout.lock();
	let mut err = io::stderr();

	match matches.subcommand() {
		Some(("list", args)) => {
			commands::list(&ListOptions::from_matches(args), &mut out)?;
			Ok(ExitStatus::Success)
		}
		Some(("sum", args)) => {
			commands::sum(&SumOptions::from_matches(args), &mut out, &mut err)?;
			Ok(ExitStatus::Success)
		}
		Some(("check", args)) => {
			let options = CheckOptions::from_matches(args)?;
			let outcome = commands::check(&options, &mut out, &mut err)?;
			Ok(outcome.exit_status)
		}
		Some(("completions", args)) => {
			if let Some(shell) = args.get_one::<Shell>("shell") {
				print_completions(*shell, &mut build_cli());
			}
			Ok(ExitStatus::Success)
		}
		_ => Ok(ExitStatus::Success),
	}
}

/// Parse the command line, run the selected command and report the status
/// the process should exit with.
pub fn run() -> ExitStatus {
	init_logging();
	let matches = build_cli().get_matches();
	match dispatch(&matches) {
		Ok(status) => status,
		Err(err) => {
			report_error(&err);
			err.exit_status()
		}
	}
}

fn print_completions<G: Generator>(gen: G, cmd: &mut clap::Command) {
	generate(
		gen,
		cmd,
		cmd.get_name().to_string(),
		&mut std::io::stdout(),
	);
}
