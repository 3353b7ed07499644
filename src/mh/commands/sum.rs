// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// sum command: hash files or stdin and print `<token>  <path>` lines

use super::{encode_digest, read_input, CommandError, STDIN_PATH};
use crate::mh::output::TextEncoding;
use crate::mh::registry::{lookup_by_name, AlgorithmSpec};
use colored::Colorize;
use std::io::Write;
use tracing::{debug, info};

pub const DEFAULT_ALGORITHM: &str = "md5";

#[derive(Clone, Debug)]
pub struct SumOptions {
	pub algorithm: String,
	/// Paths to hash in order; empty means standard input.
	pub paths: Vec<String>,
	/// Digest length override in bytes.
	pub length: Option<usize>,
	pub encoding: TextEncoding,
	/// Suppress the weak-algorithm warning.
	pub quiet: bool,
}

impl Default for SumOptions {
	fn default() -> Self {
		Self {
			algorithm: DEFAULT_ALGORITHM.to_string(),
			paths: Vec::new(),
			length: None,
			encoding: TextEncoding::Hex,
			quiet: false,
		}
	}
}

impl SumOptions {
	fn inputs(&self) -> Vec<&str> {
		if self.paths.is_empty() {
			vec![STDIN_PATH]
		} else {
			self.paths.iter().map(String::as_str).collect()
		}
	}
}

/// Hash every input in order. The first read or hash error stops the run;
/// lines already written stay written.
pub fn sum<W: Write, E: Write>(
	options: &SumOptions,
	out: &mut W,
	err: &mut E,
) -> Result<(), CommandError> {
	let mut warned = options.quiet;
	for path in options.inputs() {
		let data = read_input(path)?;
		let spec = lookup_by_name(&options.algorithm)?;
		if !warned && spec.is_legacy() {
			emit_legacy_warning(spec, err)?;
			warned = true;
		}
		let encoded = encode_digest(spec, &data, options.length)?;
		debug!(path, bytes = data.len(), "digest computed");
		writeln!(out, "{}  {}", options.encoding.render(&encoded), path)?;
	}
	info!(
		algorithm = %options.algorithm,
		files = options.inputs().len(),
		"sum complete"
	);
	Ok(())
}

fn emit_legacy_warning<E: Write>(
	spec: &AlgorithmSpec,
	err: &mut E,
) -> std::io::Result<()> {
	let banner = format!(
		"warning: {} is a weak algorithm (collisions known); prefer sha2-256 or blake3 for new checksums",
		spec.name
	);
	writeln!(err, "{}", banner.yellow())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mh::commands::ExitStatus;
	use crate::mh::registry::RegistryError;
	use std::fs;
	use tempfile::tempdir;

	fn run(options: &SumOptions) -> (Result<(), CommandError>, String, String) {
		let mut out = Vec::new();
		let mut err = Vec::new();
		let result = sum(options, &mut out, &mut err);
		(
			result,
			String::from_utf8(out).unwrap(),
			String::from_utf8(err).unwrap(),
		)
	}

	#[test]
	fn md5_of_hello_is_tagged_and_hex_rendered() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("hello.txt");
		fs::write(&path, b"hello").unwrap();
		let path = path.to_string_lossy().into_owned();

		let (result, out, err) = run(&SumOptions {
			paths: vec![path.clone()],
			..SumOptions::default()
		});
		result.unwrap();
		assert_eq!(
			out,
			format!("d501105d41402abc4b2a76b9719d911017c592  {}\n", path)
		);
		assert!(err.contains("weak algorithm"));
	}

	#[test]
	fn files_are_processed_in_order() {
		let dir = tempdir().unwrap();
		let mut paths = Vec::new();
		for name in ["b", "a", "c"] {
			let path = dir.path().join(name);
			fs::write(&path, name).unwrap();
			paths.push(path.to_string_lossy().into_owned());
		}
		let (result, out, _) = run(&SumOptions {
			algorithm: "sha2-256".to_string(),
			paths: paths.clone(),
			..SumOptions::default()
		});
		result.unwrap();
		let printed: Vec<&str> = out
			.lines()
			.map(|line| line.split("  ").nth(1).unwrap())
			.collect();
		assert_eq!(printed, paths);
	}

	#[test]
	fn unsupported_algorithm_prints_nothing() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("somefile");
		fs::write(&path, b"x").unwrap();
		let (result, out, _) = run(&SumOptions {
			algorithm: "not-a-real-algo".to_string(),
			paths: vec![path.to_string_lossy().into_owned()],
			..SumOptions::default()
		});
		let err = result.unwrap_err();
		assert!(matches!(
			err,
			CommandError::Registry(RegistryError::UnsupportedAlgorithm { .. })
		));
		assert_eq!(err.exit_status(), ExitStatus::Failure);
		assert!(out.is_empty());
	}

	#[test]
	fn first_unreadable_file_stops_the_batch() {
		let dir = tempdir().unwrap();
		let good = dir.path().join("good");
		let later = dir.path().join("later");
		fs::write(&good, b"ok").unwrap();
		fs::write(&later, b"never hashed").unwrap();
		let missing = dir.path().join("missing");

		let (result, out, _) = run(&SumOptions {
			algorithm: "sha2-256".to_string(),
			paths: vec![
				good.to_string_lossy().into_owned(),
				missing.to_string_lossy().into_owned(),
				later.to_string_lossy().into_owned(),
			],
			..SumOptions::default()
		});
		assert!(matches!(
			result,
			Err(CommandError::FileRead { .. })
		));
		assert_eq!(out.lines().count(), 1);
		assert!(!out.contains("later"));
	}

	#[test]
	fn quiet_suppresses_the_weak_warning() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("f");
		fs::write(&path, b"data").unwrap();
		let (result, _, err) = run(&SumOptions {
			paths: vec![path.to_string_lossy().into_owned()],
			quiet: true,
			..SumOptions::default()
		});
		result.unwrap();
		assert!(err.is_empty());
	}

	#[test]
	fn truncated_length_is_encoded() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("f");
		fs::write(&path, b"data").unwrap();
		let (result, out, _) = run(&SumOptions {
			algorithm: "sha2-256".to_string(),
			paths: vec![path.to_string_lossy().into_owned()],
			length: Some(20),
			..SumOptions::default()
		});
		result.unwrap();
		let token = out.split_whitespace().next().unwrap();
		assert!(token.starts_with("1214"));
		assert_eq!(token.len(), 2 * (2 + 20));
	}
}
