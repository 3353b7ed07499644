// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// Module: registry
// Purpose: Map algorithm names to multicodec codes and back, and carry the
//          metadata needed to hash with each algorithm.
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use crate::mh::codec::AlgorithmCode;
use crate::mh::digest::{self as engines, DigestFactory};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// How an algorithm sizes its output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputKind {
	/// Fixed digest size in bytes.
	Fixed(usize),
	/// Extendable output; the value is the default size.
	Extendable(usize),
	/// Output is the input itself.
	Identity,
}

/// One registry row.
#[derive(Clone, Copy)]
pub struct AlgorithmSpec {
	pub name: &'static str,
	pub code: AlgorithmCode,
	pub output: OutputKind,
	pub legacy: bool,
	pub factory: DigestFactory,
}

impl AlgorithmSpec {
	const fn new(
		name: &'static str,
		code: u64,
		output: OutputKind,
		factory: DigestFactory,
	) -> Self {
		Self {
			name,
			code: AlgorithmCode::new(code),
			output,
			legacy: false,
			factory,
		}
	}

	const fn fixed(
		name: &'static str,
		code: u64,
		size: usize,
		factory: DigestFactory,
	) -> Self {
		Self::new(name, code, OutputKind::Fixed(size), factory)
	}

	const fn legacy(mut self) -> Self {
		self.legacy = true;
		self
	}

	/// Digest length produced when no explicit length is requested.
	pub fn default_length(&self, input_len: usize) -> usize {
		match self.output {
			OutputKind::Fixed(size) | OutputKind::Extendable(size) => {
				size
			}
			OutputKind::Identity => input_len,
		}
	}

	pub fn is_legacy(&self) -> bool {
		self.legacy
	}
}

impl fmt::Debug for AlgorithmSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AlgorithmSpec")
			.field("name", &self.name)
			.field("code", &self.code)
			.field("output", &self.output)
			.field("legacy", &self.legacy)
			.finish()
	}
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
	#[error("unsupported hash algorithm `{algorithm}`")]
	UnsupportedAlgorithm { algorithm: String },
	#[error("unknown multihash algorithm code {code}")]
	UnknownAlgorithmCode { code: AlgorithmCode },
}

/// Name and code indexes over [`ALGORITHMS`], built once per process.
pub struct Registry {
	by_name: HashMap<&'static str, &'static AlgorithmSpec>,
	by_code: HashMap<AlgorithmCode, &'static AlgorithmSpec>,
}

impl Registry {
	fn index(table: &'static [AlgorithmSpec]) -> Self {
		let mut by_name = HashMap::with_capacity(table.len());
		let mut by_code = HashMap::with_capacity(table.len());
		for spec in table {
			by_name.insert(spec.name, spec);
			by_code.insert(spec.code, spec);
		}
		Self { by_name, by_code }
	}

	pub fn lookup_by_name(
		&self,
		name: &str,
	) -> Result<&'static AlgorithmSpec, RegistryError> {
		self.by_name.get(name).copied().ok_or_else(|| {
			RegistryError::UnsupportedAlgorithm {
				algorithm: name.to_string(),
			}
		})
	}

	pub fn lookup_by_code(
		&self,
		code: AlgorithmCode,
	) -> Result<&'static AlgorithmSpec, RegistryError> {
		self.by_code
			.get(&code)
			.copied()
			.ok_or(RegistryError::UnknownAlgorithmCode { code })
	}

	/// Every registered name, in no particular order.
	pub fn list_names(&self) -> impl Iterator<Item = &'static str> + '_ {
		self.by_name.keys().copied()
	}

	pub fn len(&self) -> usize {
		self.by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_name.is_empty()
	}
}

static REGISTRY: Lazy<Registry> = Lazy::new(|| Registry::index(ALGORITHMS));

pub fn registry() -> &'static Registry {
	&REGISTRY
}

pub fn algorithms() -> &'static [AlgorithmSpec] {
	ALGORITHMS
}

pub fn lookup_by_name(
	name: &str,
) -> Result<&'static AlgorithmSpec, RegistryError> {
	registry().lookup_by_name(name)
}

pub fn lookup_by_code(
	code: AlgorithmCode,
) -> Result<&'static AlgorithmSpec, RegistryError> {
	registry().lookup_by_code(code)
}

pub fn list_names() -> impl Iterator<Item = &'static str> {
	registry().list_names()
}

const ALGORITHMS: &[AlgorithmSpec] = &[
	AlgorithmSpec::new(
		"identity",
		0x00,
		OutputKind::Identity,
		engines::create_identity,
	),
	AlgorithmSpec::fixed("md4", 0xd4, 16, engines::create_md4).legacy(),
	AlgorithmSpec::fixed("md5", 0xd5, 16, engines::create_md5).legacy(),
	AlgorithmSpec::fixed("sha1", 0x11, 20, engines::create_sha1)
		.legacy(),
	AlgorithmSpec::fixed(
		"sha2-224",
		0x1013,
		28,
		engines::create_sha2_224,
	),
	AlgorithmSpec::fixed("sha2-256", 0x12, 32, engines::create_sha2_256),
	AlgorithmSpec::fixed("sha2-384", 0x20, 48, engines::create_sha2_384),
	AlgorithmSpec::fixed("sha2-512", 0x13, 64, engines::create_sha2_512),
	AlgorithmSpec::fixed(
		"sha2-512-224",
		0x1014,
		28,
		engines::create_sha2_512_224,
	),
	AlgorithmSpec::fixed(
		"sha2-512-256",
		0x1015,
		32,
		engines::create_sha2_512_256,
	),
	AlgorithmSpec::fixed(
		"dbl-sha2-256",
		0x56,
		32,
		engines::create_dbl_sha2_256,
	),
	AlgorithmSpec::fixed("sha3-224", 0x17, 28, engines::create_sha3_224),
	AlgorithmSpec::fixed("sha3-256", 0x16, 32, engines::create_sha3_256),
	AlgorithmSpec::fixed("sha3-384", 0x15, 48, engines::create_sha3_384),
	AlgorithmSpec::fixed("sha3-512", 0x14, 64, engines::create_sha3_512),
	AlgorithmSpec::fixed(
		"keccak-224",
		0x1a,
		28,
		engines::create_keccak_224,
	),
	AlgorithmSpec::fixed(
		"keccak-256",
		0x1b,
		32,
		engines::create_keccak_256,
	),
	AlgorithmSpec::fixed(
		"keccak-384",
		0x1c,
		48,
		engines::create_keccak_384,
	),
	AlgorithmSpec::fixed(
		"keccak-512",
		0x1d,
		64,
		engines::create_keccak_512,
	),
	AlgorithmSpec::new(
		"shake-128",
		0x18,
		OutputKind::Extendable(32),
		engines::create_shake_128,
	),
	AlgorithmSpec::new(
		"shake-256",
		0x19,
		OutputKind::Extendable(64),
		engines::create_shake_256,
	),
	AlgorithmSpec::fixed("blake3", 0x1e, 32, engines::create_blake3),
	AlgorithmSpec::fixed(
		"blake2b-128",
		0xb210,
		16,
		engines::create_blake2b_128,
	),
	AlgorithmSpec::fixed(
		"blake2b-160",
		0xb214,
		20,
		engines::create_blake2b_160,
	),
	AlgorithmSpec::fixed(
		"blake2b-256",
		0xb220,
		32,
		engines::create_blake2b_256,
	),
	AlgorithmSpec::fixed(
		"blake2b-384",
		0xb230,
		48,
		engines::create_blake2b_384,
	),
	AlgorithmSpec::fixed(
		"blake2b-512",
		0xb240,
		64,
		engines::create_blake2b_512,
	),
	AlgorithmSpec::fixed(
		"blake2s-128",
		0xb250,
		16,
		engines::create_blake2s_128,
	),
	AlgorithmSpec::fixed(
		"blake2s-160",
		0xb254,
		20,
		engines::create_blake2s_160,
	),
	AlgorithmSpec::fixed(
		"blake2s-224",
		0xb25c,
		28,
		engines::create_blake2s_224,
	),
	AlgorithmSpec::fixed(
		"blake2s-256",
		0xb260,
		32,
		engines::create_blake2s_256,
	),
	AlgorithmSpec::fixed(
		"ripemd-128",
		0x1052,
		16,
		engines::create_ripemd_128,
	),
	AlgorithmSpec::fixed(
		"ripemd-160",
		0x1053,
		20,
		engines::create_ripemd_160,
	),
	AlgorithmSpec::fixed(
		"ripemd-256",
		0x1054,
		32,
		engines::create_ripemd_256,
	),
	AlgorithmSpec::fixed(
		"ripemd-320",
		0x1055,
		40,
		engines::create_ripemd_320,
	),
	AlgorithmSpec::fixed("sm3-256", 0x534d, 32, engines::create_sm3),
];

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashSet;

	#[test]
	fn names_and_codes_are_unique() {
		let names: HashSet<_> =
			ALGORITHMS.iter().map(|spec| spec.name).collect();
		let codes: HashSet<_> =
			ALGORITHMS.iter().map(|spec| spec.code).collect();
		assert_eq!(names.len(), ALGORITHMS.len());
		assert_eq!(codes.len(), ALGORITHMS.len());
		assert_eq!(registry().len(), ALGORITHMS.len());
	}

	#[test]
	fn name_code_lookups_are_inverse() {
		for name in list_names() {
			let spec = lookup_by_name(name).expect("listed name");
			let back = lookup_by_code(spec.code).expect("known code");
			assert_eq!(back.name, name);
		}
	}

	#[test]
	fn well_known_codes() {
		let expect = [
			("md5", 0xd5),
			("sha1", 0x11),
			("sha2-256", 0x12),
			("sha2-512", 0x13),
			("sha3-512", 0x14),
			("blake3", 0x1e),
			("blake2b-256", 0xb220),
		];
		for (name, code) in expect {
			assert_eq!(
				lookup_by_name(name).unwrap().code,
				AlgorithmCode(code)
			);
		}
	}

	#[test]
	fn lookup_is_case_sensitive() {
		assert_eq!(
			lookup_by_name("MD5").unwrap_err(),
			RegistryError::UnsupportedAlgorithm {
				algorithm: "MD5".to_string()
			}
		);
	}

	#[test]
	fn unknown_code_is_reported() {
		assert!(matches!(
			lookup_by_code(AlgorithmCode(0x7fff)),
			Err(RegistryError::UnknownAlgorithmCode { .. })
		));
	}

	#[test]
	fn legacy_flags_mark_weak_algorithms() {
		let legacy: Vec<_> = ALGORITHMS
			.iter()
			.filter(|spec| spec.is_legacy())
			.map(|spec| spec.name)
			.collect();
		assert_eq!(legacy, ["md4", "md5", "sha1"]);
	}
}
