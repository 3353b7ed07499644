// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// Module: codec
// Purpose: Self-describing hash codec. Wraps a digest as
//          varint(code) || varint(length) || digest and parses it back.
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use std::fmt;
use thiserror::Error;
use unsigned_varint::{decode, encode};

/// Numeric multicodec identifier of a hash function.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlgorithmCode(pub u64);

impl AlgorithmCode {
	pub const fn new(code: u64) -> Self {
		Self(code)
	}

	pub const fn value(self) -> u64 {
		self.0
	}
}

impl From<u64> for AlgorithmCode {
	fn from(code: u64) -> Self {
		Self(code)
	}
}

impl fmt::Display for AlgorithmCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:#x}", self.0)
	}
}

/// Which leading integer of an encoded hash failed to parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VarintField {
	Code,
	Length,
}

impl fmt::Display for VarintField {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			Self::Code => "algorithm code",
			Self::Length => "digest length",
		})
	}
}

/// Errors raised while decoding an encoded hash or its text form.
#[derive(Debug, Error)]
pub enum CodecError {
	#[error("malformed varint in {field}: {reason}")]
	MalformedVarint { field: VarintField, reason: String },
	#[error(
		"truncated input: digest declares {declared} bytes but only {available} remain"
	)]
	TruncatedInput { declared: usize, available: usize },
	#[error(
		"inconsistent length: digest declares {declared} bytes but {available} remain"
	)]
	TrailingBytes { declared: usize, available: usize },
	#[error("invalid hex: {source}")]
	InvalidHex {
		#[source]
		source: hex::FromHexError,
	},
	#[error("invalid multibase token: {reason}")]
	InvalidMultibase { reason: String },
}

/// A decoded hash: algorithm code plus the digest it tags.
///
/// The declared length is always the digest's length; there is no way to
/// build a record where the two disagree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigestRecord {
	code: AlgorithmCode,
	digest: Vec<u8>,
}

impl DigestRecord {
	pub fn new(code: AlgorithmCode, digest: impl Into<Vec<u8>>) -> Self {
		Self {
			code,
			digest: digest.into(),
		}
	}

	pub fn code(&self) -> AlgorithmCode {
		self.code
	}

	pub fn length(&self) -> usize {
		self.digest.len()
	}

	pub fn digest(&self) -> &[u8] {
		&self.digest
	}

	pub fn into_digest(self) -> Vec<u8> {
		self.digest
	}

	pub fn encode(&self) -> EncodedHash {
		encode_hash(self.code, &self.digest)
	}
}

/// Binary serialization of a [`DigestRecord`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EncodedHash(Vec<u8>);

impl EncodedHash {
	pub fn as_bytes(&self) -> &[u8] {
		&self.0
	}

	pub fn into_bytes(self) -> Vec<u8> {
		self.0
	}

	/// Lower-case hexadecimal rendering of the encoded bytes.
	pub fn to_hex(&self) -> String {
		hex::encode(&self.0)
	}

	/// Parse hex text back into encoded bytes. The result is not validated
	/// structurally; call [`EncodedHash::decode`] for that.
	pub fn from_hex(text: &str) -> Result<Self, CodecError> {
		hex::decode(text)
			.map(Self)
			.map_err(|source| CodecError::InvalidHex { source })
	}

	pub fn decode(&self) -> Result<DigestRecord, CodecError> {
		decode_hash(&self.0)
	}
}

impl From<Vec<u8>> for EncodedHash {
	fn from(bytes: Vec<u8>) -> Self {
		Self(bytes)
	}
}

impl AsRef<[u8]> for EncodedHash {
	fn as_ref(&self) -> &[u8] {
		&self.0
	}
}

impl fmt::Display for EncodedHash {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.to_hex())
	}
}

/// Encode `digest` tagged with `code` and its own length.
pub fn encode_hash(code: AlgorithmCode, digest: &[u8]) -> EncodedHash {
	let mut code_buf = encode::u64_buffer();
	let mut len_buf = encode::usize_buffer();
	let code_bytes = encode::u64(code.value(), &mut code_buf);
	let len_bytes = encode::usize(digest.len(), &mut len_buf);

	let mut bytes = Vec::with_capacity(
		code_bytes.len() + len_bytes.len() + digest.len(),
	);
	bytes.extend_from_slice(code_bytes);
	bytes.extend_from_slice(len_bytes);
	bytes.extend_from_slice(digest);
	EncodedHash(bytes)
}

/// Decode an encoded hash into its code, length and digest.
pub fn decode_hash(bytes: &[u8]) -> Result<DigestRecord, CodecError> {
	let (code, rest) = read_varint(bytes, VarintField::Code)?;
	let (length, rest) = read_varint(rest, VarintField::Length)?;
	// A length beyond the address space can never be satisfied.
	let declared = usize::try_from(length).unwrap_or(usize::MAX);

	if rest.len() < declared {
		return Err(CodecError::TruncatedInput {
			declared,
			available: rest.len(),
		});
	}
	if rest.len() > declared {
		return Err(CodecError::TrailingBytes {
			declared,
			available: rest.len(),
		});
	}

	Ok(DigestRecord::new(AlgorithmCode(code), rest))
}

fn read_varint(
	bytes: &[u8],
	field: VarintField,
) -> Result<(u64, &[u8]), CodecError> {
	decode::u64(bytes).map_err(|err| CodecError::MalformedVarint {
		field,
		reason: err.to_string(),
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use hex_literal::hex;

	const MD5_HELLO: [u8; 16] = hex!("5d41402abc4b2a76b9719d911017c592");

	#[test]
	fn encodes_md5_with_two_byte_code() {
		let encoded = encode_hash(AlgorithmCode(0xd5), &MD5_HELLO);
		assert_eq!(
			encoded.to_hex(),
			"d501105d41402abc4b2a76b9719d911017c592"
		);
	}

	#[test]
	fn decode_recovers_code_length_and_digest() {
		let digest = [7u8; 32];
		let encoded = encode_hash(AlgorithmCode(0x12), &digest);
		assert_eq!(&encoded.as_bytes()[..2], &[0x12, 0x20]);

		let record = encoded.decode().expect("decodes");
		assert_eq!(record.code(), AlgorithmCode(0x12));
		assert_eq!(record.length(), 32);
		assert_eq!(record.digest(), &digest);
	}

	#[test]
	fn round_trips_over_varied_codes_and_lengths() {
		let codes = [0x00, 0x11, 0xd5, 0x1013, 0xb260, 0x534d];
		for code in codes {
			for len in [0usize, 1, 20, 127, 128, 300] {
				let digest: Vec<u8> =
					(0..len).map(|i| (i * 31 % 251) as u8).collect();
				let record =
					DigestRecord::new(AlgorithmCode(code), digest);
				let decoded = record.encode().decode().expect("decode");
				assert_eq!(decoded, record);
			}
		}
	}

	#[test]
	fn long_digests_use_multi_byte_length() {
		let digest = vec![0xab; 200];
		let encoded = encode_hash(AlgorithmCode(0x00), &digest);
		assert_eq!(&encoded.as_bytes()[..3], &[0x00, 0xc8, 0x01]);
		assert_eq!(encoded.as_bytes().len(), 203);
	}

	#[test]
	fn hex_round_trip() {
		let encoded = encode_hash(AlgorithmCode(0xd5), &MD5_HELLO);
		let parsed =
			EncodedHash::from_hex(&encoded.to_hex()).expect("hex");
		assert_eq!(parsed, encoded);
	}

	#[test]
	fn truncated_digest_is_rejected() {
		let encoded = encode_hash(AlgorithmCode(0x12), &[1u8; 32]);
		let bytes = &encoded.as_bytes()[..encoded.as_bytes().len() - 1];
		match decode_hash(bytes) {
			Err(CodecError::TruncatedInput {
				declared,
				available,
			}) => {
				assert_eq!(declared, 32);
				assert_eq!(available, 31);
			}
			other => panic!("unexpected result: {other:?}"),
		}
	}

	#[test]
	fn trailing_bytes_are_rejected() {
		let mut bytes =
			encode_hash(AlgorithmCode(0x11), &[2u8; 20]).into_bytes();
		bytes.push(0);
		assert!(matches!(
			decode_hash(&bytes),
			Err(CodecError::TrailingBytes {
				declared: 20,
				available: 21
			})
		));
	}

	#[test]
	fn unterminated_varint_is_malformed() {
		assert!(matches!(
			decode_hash(&[0x80]),
			Err(CodecError::MalformedVarint {
				field: VarintField::Code,
				..
			})
		));
		assert!(matches!(
			decode_hash(&[0x12, 0xff]),
			Err(CodecError::MalformedVarint {
				field: VarintField::Length,
				..
			})
		));
		assert!(matches!(
			decode_hash(&[]),
			Err(CodecError::MalformedVarint { .. })
		));
	}

	#[test]
	fn non_minimal_varint_is_malformed() {
		// 0x12 padded with an empty continuation byte.
		assert!(matches!(
			decode_hash(&[0x92, 0x00, 0x00]),
			Err(CodecError::MalformedVarint { .. })
		));
	}

	#[test]
	fn invalid_hex_is_rejected() {
		assert!(matches!(
			EncodedHash::from_hex("123"),
			Err(CodecError::InvalidHex { .. })
		));
		assert!(matches!(
			EncodedHash::from_hex("zz"),
			Err(CodecError::InvalidHex { .. })
		));
	}

	#[test]
	fn code_displays_as_hex() {
		assert_eq!(AlgorithmCode(0xb220).to_string(), "0xb220");
	}
}
