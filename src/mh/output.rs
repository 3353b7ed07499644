// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// Module: output
// Purpose: Text forms of an encoded hash for sum output and checklist input.
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use crate::mh::codec::{CodecError, EncodedHash};
use clap::ValueEnum;
use multibase::Base;
use std::fmt;
use strum::EnumIter;

/// Text encodings surfaced via the `sum --format` flag.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum, EnumIter)]
#[value(rename_all = "kebab-case")]
pub enum TextEncoding {
	#[default]
	Hex,
	#[value(alias = "b58")]
	Base58,
}

impl TextEncoding {
	pub fn canonical_name(self) -> &'static str {
		match self {
			Self::Hex => "hex",
			Self::Base58 => "base58",
		}
	}

	pub fn render(self, hash: &EncodedHash) -> String {
		match self {
			Self::Hex => hash.to_hex(),
			Self::Base58 => {
				multibase::encode(Base::Base58Btc, hash.as_bytes())
			}
		}
	}
}

impl fmt::Display for TextEncoding {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let label = match self {
			Self::Hex => "Hexadecimal",
			Self::Base58 => "Multibase (base58btc)",
		};
		write!(f, "{}", label)
	}
}

/// Parse a checklist token. Multibase base58btc tokens carry a `z` prefix,
/// which never appears in hex, so anything else is read as hex.
pub fn parse_token(token: &str) -> Result<EncodedHash, CodecError> {
	if token.starts_with('z') {
		let (base, bytes) = multibase::decode(token).map_err(|err| {
			CodecError::InvalidMultibase {
				reason: err.to_string(),
			}
		})?;
		if base != Base::Base58Btc {
			return Err(CodecError::InvalidMultibase {
				reason: format!("unexpected base {:?}", base),
			});
		}
		Ok(EncodedHash::from(bytes))
	} else {
		EncodedHash::from_hex(token)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::mh::codec::{encode_hash, AlgorithmCode};
	use digest::Digest;
	use strum::IntoEnumIterator;

	#[test]
	fn base58_matches_reference_multihash() {
		let digest = sha2::Sha256::digest(b"rustgenhash");
		let encoded = encode_hash(AlgorithmCode(0x12), &digest);
		assert_eq!(
			TextEncoding::Base58.render(&encoded),
			"zQmTY2GYmjoMc6n2Ka8up2xyYVKstkU3Hd3duBo9qhdNjFt"
		);
	}

	#[test]
	fn every_encoding_parses_back() {
		let encoded = encode_hash(AlgorithmCode(0xd5), &[9u8; 16]);
		for encoding in TextEncoding::iter() {
			let token = encoding.render(&encoded);
			assert_eq!(
				parse_token(&token).expect("parses"),
				encoded,
				"{} did not round-trip",
				encoding.canonical_name()
			);
		}
	}

	#[test]
	fn hex_is_lower_case() {
		let encoded = encode_hash(AlgorithmCode(0xd5), &[0xab; 4]);
		assert_eq!(TextEncoding::Hex.render(&encoded), "d50104abababab");
	}

	#[test]
	fn broken_base58_is_reported() {
		assert!(matches!(
			parse_token("z0OIl"),
			Err(CodecError::InvalidMultibase { .. })
		));
	}
}
