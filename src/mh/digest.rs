// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// File: digest.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

//! Digest executors behind every registered algorithm, plus the length
//! rules used when a caller asks for a non-default digest size.

use crate::mh::registry::{AlgorithmSpec, OutputKind};
use digest::consts::{U16, U20, U28, U32, U48, U64};
use digest::{Digest, DynDigest, ExtendableOutput, Update, XofReader};
use thiserror::Error;

/// Incremental hashing state for one algorithm.
pub trait DigestExecutor {
	fn update(&mut self, data: &[u8]);
	/// Finish hashing and return exactly `length` bytes. Callers resolve
	/// `length` through [`resolve_length`] first.
	fn finalize(self: Box<Self>, length: usize) -> Vec<u8>;
}

pub type DigestFactory = fn() -> Box<dyn DigestExecutor>;

/// Longest digest an extendable-output function may be asked for: the
/// largest length a two-byte varint can carry.
pub const MAX_XOF_LENGTH: usize = (1 << 14) - 1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DigestError {
	#[error(
		"{algorithm} cannot produce a {requested}-byte digest (default is {default} bytes)"
	)]
	InvalidLength {
		algorithm: &'static str,
		requested: usize,
		default: usize,
	},
}

struct FixedExecutor(Box<dyn DynDigest>);

impl DigestExecutor for FixedExecutor {
	fn update(&mut self, data: &[u8]) {
		self.0.update(data);
	}

	fn finalize(self: Box<Self>, length: usize) -> Vec<u8> {
		let mut out = self.0.finalize().into_vec();
		out.truncate(length);
		out
	}
}

struct XofExecutor<H>(H);

impl<H> DigestExecutor for XofExecutor<H>
where
	H: Update + ExtendableOutput,
{
	fn update(&mut self, data: &[u8]) {
		Update::update(&mut self.0, data);
	}

	fn finalize(self: Box<Self>, length: usize) -> Vec<u8> {
		let mut out = vec![0u8; length];
		self.0.finalize_xof().read(&mut out);
		out
	}
}

#[derive(Default)]
struct IdentityExecutor(Vec<u8>);

impl DigestExecutor for IdentityExecutor {
	fn update(&mut self, data: &[u8]) {
		self.0.extend_from_slice(data);
	}

	fn finalize(self: Box<Self>, length: usize) -> Vec<u8> {
		let mut out = self.0;
		out.truncate(length);
		out
	}
}

#[derive(Default)]
struct DoubleSha256Executor(sha2::Sha256);

impl DigestExecutor for DoubleSha256Executor {
	fn update(&mut self, data: &[u8]) {
		Digest::update(&mut self.0, data);
	}

	fn finalize(self: Box<Self>, length: usize) -> Vec<u8> {
		let first = self.0.finalize();
		let mut out = sha2::Sha256::digest(first).to_vec();
		out.truncate(length);
		out
	}
}

macro_rules! fixed_factories {
	($($name:ident => $hasher:ty),+ $(,)?) => {
		$(
			pub(crate) fn $name() -> Box<dyn DigestExecutor> {
				Box::new(FixedExecutor(Box::new(
					<$hasher as Default>::default(),
				)))
			}
		)+
	};
}

fixed_factories!(
	create_md4 => md4::Md4,
	create_md5 => md5::Md5,
	create_sha1 => sha1::Sha1,
	create_sha2_224 => sha2::Sha224,
	create_sha2_256 => sha2::Sha256,
	create_sha2_384 => sha2::Sha384,
	create_sha2_512 => sha2::Sha512,
	create_sha2_512_224 => sha2::Sha512_224,
	create_sha2_512_256 => sha2::Sha512_256,
	create_sha3_224 => sha3::Sha3_224,
	create_sha3_256 => sha3::Sha3_256,
	create_sha3_384 => sha3::Sha3_384,
	create_sha3_512 => sha3::Sha3_512,
	create_keccak_224 => sha3::Keccak224,
	create_keccak_256 => sha3::Keccak256,
	create_keccak_384 => sha3::Keccak384,
	create_keccak_512 => sha3::Keccak512,
	create_blake3 => blake3::Hasher,
	create_blake2b_128 => blake2::Blake2b<U16>,
	create_blake2b_160 => blake2::Blake2b<U20>,
	create_blake2b_256 => blake2::Blake2b<U32>,
	create_blake2b_384 => blake2::Blake2b<U48>,
	create_blake2b_512 => blake2::Blake2b<U64>,
	create_blake2s_128 => blake2::Blake2s<U16>,
	create_blake2s_160 => blake2::Blake2s<U20>,
	create_blake2s_224 => blake2::Blake2s<U28>,
	create_blake2s_256 => blake2::Blake2s<U32>,
	create_ripemd_128 => ripemd::Ripemd128,
	create_ripemd_160 => ripemd::Ripemd160,
	create_ripemd_256 => ripemd::Ripemd256,
	create_ripemd_320 => ripemd::Ripemd320,
	create_sm3 => sm3::Sm3,
);

pub(crate) fn create_shake_128() -> Box<dyn DigestExecutor> {
	Box::new(XofExecutor(sha3::Shake128::default()))
}

pub(crate) fn create_shake_256() -> Box<dyn DigestExecutor> {
	Box::new(XofExecutor(sha3::Shake256::default()))
}

pub(crate) fn create_identity() -> Box<dyn DigestExecutor> {
	Box::new(IdentityExecutor::default())
}

pub(crate) fn create_dbl_sha2_256() -> Box<dyn DigestExecutor> {
	Box::new(DoubleSha256Executor::default())
}

/// Pick the digest length for `input_len` bytes of input.
///
/// Fixed-output functions may be truncated but never extended. Shake
/// squeezes any positive length up to [`MAX_XOF_LENGTH`]. Identity only
/// ever equals its input.
pub fn resolve_length(
	spec: &AlgorithmSpec,
	input_len: usize,
	requested: Option<usize>,
) -> Result<usize, DigestError> {
	let default = spec.default_length(input_len);
	let Some(requested) = requested else {
		return Ok(default);
	};
	let valid = match spec.output {
		OutputKind::Fixed(size) => requested > 0 && requested <= size,
		OutputKind::Extendable(_) => {
			requested > 0 && requested <= MAX_XOF_LENGTH
		}
		OutputKind::Identity => requested == input_len,
	};
	if valid {
		Ok(requested)
	} else {
		Err(DigestError::InvalidLength {
			algorithm: spec.name,
			requested,
			default,
		})
	}
}

/// Hash `data` in one pass with the algorithm described by `spec`.
pub fn compute(
	spec: &AlgorithmSpec,
	data: &[u8],
	length: Option<usize>,
) -> Result<Vec<u8>, DigestError> {
	let length = resolve_length(spec, data.len(), length)?;
	let mut executor = (spec.factory)();
	executor.update(data);
	Ok(executor.finalize(length))
}
