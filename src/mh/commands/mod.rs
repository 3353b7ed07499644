// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// File: src/mh/commands/mod.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
//
// Command group: list, sum and check, plus the read-and-hash step they share.

pub mod check;
pub mod list;
pub mod sum;

pub use check::{check, CheckOptions};
pub use list::{list, ListOptions};
pub use sum::{sum, SumOptions};

use crate::mh::checklist::ChecklistError;
use crate::mh::codec::{encode_hash, CodecError, EncodedHash};
use crate::mh::digest::{compute, DigestError};
use crate::mh::registry::{AlgorithmSpec, RegistryError};
use std::io::{self, Read};
use thiserror::Error;

/// Pseudo-path naming standard input.
pub const STDIN_PATH: &str = "-";

/// Process exit status, distinguishing usage errors from other failures.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ExitStatus {
	Success,
	Failure,
	UsageError,
}

impl ExitStatus {
	pub fn code(self) -> i32 {
		match self {
			Self::Success => 0,
			Self::Failure => 1,
			Self::UsageError => 2,
		}
	}
}

#[derive(Debug, Error)]
pub enum CommandError {
	#[error(transparent)]
	Registry(#[from] RegistryError),
	#[error(transparent)]
	Digest(#[from] DigestError),
	#[error(transparent)]
	Codec(#[from] CodecError),
	#[error("{path}: {source}")]
	FileRead {
		path: String,
		#[source]
		source: io::Error,
	},
	#[error("{checklist}:{line}: {source}")]
	Checklist {
		checklist: String,
		line: usize,
		#[source]
		source: Box<CommandError>,
	},
	#[error(transparent)]
	Format(#[from] ChecklistError),
	#[error("usage: {0}")]
	Usage(String),
	#[error("write failed: {0}")]
	Io(#[from] io::Error),
}

impl CommandError {
	pub fn exit_status(&self) -> ExitStatus {
		match self {
			Self::Usage(_) => ExitStatus::UsageError,
			_ => ExitStatus::Failure,
		}
	}
}

/// Read the whole of `path`, or standard input for `-`.
pub fn read_input(path: &str) -> Result<Vec<u8>, CommandError> {
	let read = if path == STDIN_PATH {
		let mut buffer = Vec::new();
		io::stdin()
			.lock()
			.read_to_end(&mut buffer)
			.map(|_| buffer)
	} else {
		std::fs::read(path)
	};
	read.map_err(|source| CommandError::FileRead {
		path: path.to_string(),
		source,
	})
}

/// Hash `data` with `spec` and wrap the digest in its self-describing form.
pub fn encode_digest(
	spec: &AlgorithmSpec,
	data: &[u8],
	length: Option<usize>,
) -> Result<EncodedHash, DigestError> {
	let digest = compute(spec, data, length)?;
	Ok(encode_hash(spec.code, &digest))
}
