// SPDX-License-Identifier: MIT OR Apache-2.0
// Project: mhsum
// list command: print registered algorithm names

use crate::mh::registry::{lookup_by_name, registry, OutputKind};
use std::io::{self, Write};

#[derive(Clone, Debug, Default)]
pub struct ListOptions {
	/// Print code, default length and legacy marker next to each name.
	pub long: bool,
}

/// Print every registered algorithm, one per line, sorted by name.
pub fn list<W: Write>(options: &ListOptions, out: &mut W) -> io::Result<()> {
	let mut names: Vec<&'static str> = registry().list_names().collect();
	names.sort_unstable();

	for name in names {
		if !options.long {
			writeln!(out, "{}", name)?;
			continue;
		}
		let Ok(spec) = lookup_by_name(name) else {
			continue;
		};
		let length = match spec.output {
			OutputKind::Fixed(size) => size.to_string(),
			OutputKind::Extendable(size) => format!("{}+", size),
			OutputKind::Identity => "input".to_string(),
		};
		let marker = if spec.is_legacy() { "  legacy" } else { "" };
		writeln!(
			out,
			"{:<14} {:>8} {:>6}{}",
			name,
			spec.code.to_string(),
			length,
			marker
		)?;
	}
	Ok(())
}
