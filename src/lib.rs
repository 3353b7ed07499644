// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// File: lib.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

pub mod mh {
	pub mod app;
	pub mod checklist;
	pub mod codec;
	pub mod commands;
	pub mod digest;
	pub mod output;
	pub mod registry;
}

pub use mh::codec::{
	decode_hash, encode_hash, AlgorithmCode, CodecError, DigestRecord,
	EncodedHash,
};
pub use mh::registry::{
	list_names, lookup_by_code, lookup_by_name, AlgorithmSpec,
	RegistryError,
};
