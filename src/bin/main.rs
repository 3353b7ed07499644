// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// File: main.rs
// Author: Volker Schwaberow <volker@schwaberow.de>
// Copyright (c) 2025 Volker Schwaberow

use mhsum::mh::app;

fn main() {
	let status = app::run();
	std::process::exit(status.code());
}
