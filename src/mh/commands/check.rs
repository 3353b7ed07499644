// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// check command: verify recorded hashes against files on disk

use super::{encode_digest, read_input, CommandError};
use crate::mh::checklist::{
	CheckOutcome, CheckTally, ChecklistEntry, LineErrorPolicy, Verdict,
};
use crate::mh::codec::EncodedHash;
use crate::mh::output::parse_token;
use crate::mh::registry::lookup_by_code;
use colored::Colorize;
use std::io::Write;
use tracing::{debug, info};

pub const USAGE: &str = "mhsum check <checklist>";

#[derive(Clone, Debug)]
pub struct CheckOptions {
	pub checklist: String,
	pub policy: LineErrorPolicy,
}

impl CheckOptions {
	/// Build options from raw positional arguments; exactly one is allowed.
	pub fn from_args(
		args: &[String],
		policy: LineErrorPolicy,
	) -> Result<Self, CommandError> {
		match args {
			[checklist] => Ok(Self {
				checklist: checklist.clone(),
				policy,
			}),
			_ => Err(CommandError::Usage(USAGE.to_string())),
		}
	}
}

/// Verify every entry of the checklist, printing `<path>  PASS|FAIL`.
pub fn check<W: Write, E: Write>(
	options: &CheckOptions,
	out: &mut W,
	err: &mut E,
) -> Result<CheckOutcome, CommandError> {
	let contents = read_input(&options.checklist)?;
	let mut tally = CheckTally::new(options.policy);

	for (index, raw) in contents.split(|byte| *byte == b'\n').enumerate() {
		let line_no = index + 1;

		match verify_line(line_no, raw, err) {
			Ok(None) => {}
			Ok(Some((path, verdict))) => {
				debug!(line = line_no, %path, ?verdict, "entry checked");
				tally.record(verdict);
				writeln!(out, "{}  {}", path, verdict.label())?;
			}
			Err(source) => {
				let error = CommandError::Checklist {
					checklist: options.checklist.clone(),
					line: line_no,
					source: Box::new(source),
				};
				if !tally.record_skip() {
					return Err(error);
				}
				writeln!(
					err,
					"{} {} (skipped)",
					"warning:".yellow(),
					error
				)?;
			}
		}
	}

	let summary = tally.summary().clone();
	info!(
		passed = summary.passed,
		failed = summary.failed,
		skipped = summary.skipped,
		"check complete"
	);
	if summary.skipped > 0 {
		writeln!(
			err,
			"{} {} line(s) could not be verified",
			"warning:".yellow(),
			summary.skipped
		)?;
	}
	Ok(tally.finalize())
}

/// Verify one line. A token that cannot describe any digest of the target
/// is a FAIL, since the file cannot match it; a line without a usable
/// target (not UTF-8, bad field count, unreadable file) is an error.
fn verify_line<E: Write>(
	line_no: usize,
	raw: &[u8],
	err: &mut E,
) -> Result<Option<(String, Verdict)>, CommandError> {
	let Some(entry) = ChecklistEntry::parse_bytes(line_no, raw)? else {
		return Ok(None);
	};
	let data = read_input(&entry.path)?;

	let verdict = match expected_and_actual(&entry, &data) {
		Ok((expected, actual)) if expected == actual => Verdict::Pass,
		Ok(_) => Verdict::Fail,
		Err(reason) => {
			writeln!(
				err,
				"{} line {}: {}: {}",
				"note:".cyan(),
				line_no,
				entry.path,
				reason
			)?;
			Verdict::Fail
		}
	};
	Ok(Some((entry.path, verdict)))
}

fn expected_and_actual(
	entry: &ChecklistEntry,
	data: &[u8],
) -> Result<(EncodedHash, EncodedHash), CommandError> {
	let expected = parse_token(&entry.token)?;
	let record = expected.decode()?;
	let spec = lookup_by_code(record.code())?;
	let actual = encode_digest(spec, data, Some(record.length()))?;
	Ok((expected, actual))
}
