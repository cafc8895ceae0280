use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

/// Grammar for a lookup reference: `{{ lookup "<type>" "<key>" }}`.
///
/// Neither the type nor the key may contain a double quote; there is no
/// escaping.
static LOOKUP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"\{\{\s*lookup\s+"(?P<type>[^"]*)"\s*"(?P<key>[^"]*)"\s*\}\}"#)
		.expect("lookup pattern is a valid regex")
});

/// A single `{{ lookup "<type>" "<key>" }}` occurrence inside a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placeholder<'a> {
	/// The object type, e.g. `firewallRule` or `policy`. Case sensitive.
	pub type_name: &'a str,
	/// The name of the object to look up.
	pub key: &'a str,
	/// Byte offset of the opening `{{`.
	pub start: usize,
	/// Byte offset just past the closing `}}`.
	pub end: usize,
}

impl Placeholder<'_> {
	/// Byte range of the whole placeholder in the scanned string.
	pub fn span(&self) -> Range<usize> {
		self.start..self.end
	}
}

/// Find every lookup placeholder in `value`, ordered by start offset.
///
/// Matches never overlap. A string without placeholders yields an empty
/// `Vec`, which does not allocate.
pub fn find_placeholders(value: &str) -> Vec<Placeholder<'_>> {
	LOOKUP_PATTERN
		.captures_iter(value)
		.filter_map(|captures| {
			let whole = captures.get(0)?;
			Some(Placeholder {
				type_name: captures.name("type")?.as_str(),
				key: captures.name("key")?.as_str(),
				start: whole.start(),
				end: whole.end(),
			})
		})
		.collect()
}
