// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// File: checklist.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

//! Checklist lines (`<token>  <path>`) and the bookkeeping for a `check` run.

use crate::mh::commands::ExitStatus;
use std::str::Utf8Error;
use thiserror::Error;

/// One parsed checklist line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChecklistEntry {
	/// 1-based line number within the checklist file.
	pub line: usize,
	pub token: String,
	pub path: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChecklistError {
	#[error("expected `<hash> <file>`, found {found} field(s)")]
	FieldCount { found: usize },
	#[error("line is not valid UTF-8: {source}")]
	NotUtf8 {
		#[source]
		source: Utf8Error,
	},
}

impl ChecklistEntry {
	/// Parse a raw line as read from disk.
	pub fn parse_bytes(
		line: usize,
		raw: &[u8],
	) -> Result<Option<Self>, ChecklistError> {
		let text = std::str::from_utf8(raw)
			.map_err(|source| ChecklistError::NotUtf8 { source })?;
		Self::parse(line, text)
	}

	/// Parse a single line. Blank lines yield `Ok(None)`.
	pub fn parse(
		line: usize,
		text: &str,
	) -> Result<Option<Self>, ChecklistError> {
		let fields: Vec<&str> = text.split_whitespace().collect();
		match fields.as_slice() {
			[] => Ok(None),
			[token, path] => Ok(Some(Self {
				line,
				token: (*token).to_string(),
				path: (*path).to_string(),
			})),
			other => Err(ChecklistError::FieldCount {
				found: other.len(),
			}),
		}
	}
}

/// What to do with a line that cannot be verified at all.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum LineErrorPolicy {
	/// Report the line on stderr and keep going.
	#[default]
	SkipAndReport,
	/// Stop the whole run at the first such line.
	Abort,
}

/// Outcome of verifying one entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Verdict {
	Pass,
	Fail,
}

impl Verdict {
	pub fn label(self) -> &'static str {
		match self {
			Self::Pass => "PASS",
			Self::Fail => "FAIL",
		}
	}
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct CheckSummary {
	pub passed: u64,
	pub failed: u64,
	pub skipped: u64,
}

#[derive(Debug)]
pub struct CheckOutcome {
	pub summary: CheckSummary,
	pub exit_status: ExitStatus,
}

/// Tallies verdicts and skipped lines while a checklist is processed.
pub struct CheckTally {
	policy: LineErrorPolicy,
	summary: CheckSummary,
}

impl CheckTally {
	pub fn new(policy: LineErrorPolicy) -> Self {
		Self {
			policy,
			summary: CheckSummary::default(),
		}
	}

	pub fn record(&mut self, verdict: Verdict) {
		match verdict {
			Verdict::Pass => self.summary.passed += 1,
			Verdict::Fail => self.summary.failed += 1,
		}
	}

	/// Count a skipped line. Returns whether processing may continue.
	pub fn record_skip(&mut self) -> bool {
		self.summary.skipped += 1;
		matches!(self.policy, LineErrorPolicy::SkipAndReport)
	}

	pub fn summary(&self) -> &CheckSummary {
		&self.summary
	}

	/// FAIL verdicts are ordinary results; only unverifiable lines make the
	/// run unsuccessful.
	pub fn finalize(self) -> CheckOutcome {
		let exit_status = if self.summary.skipped > 0 {
			ExitStatus::Failure
		} else {
			ExitStatus::Success
		};
		CheckOutcome {
			summary: self.summary,
			exit_status,
		}
	}
}
