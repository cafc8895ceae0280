use std::path::Path;

use serde_json::Value;
use serde_yaml_ng::Mapping;
use serde_yaml_ng::value::TaggedValue;

use crate::LookupError;
use crate::LookupResult;

/// Serialization format of a document on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
	Json,
	Yaml,
}

impl DocumentFormat {
	/// Pick the format from a file extension (`json`, `yaml` or `yml`).
	pub fn from_extension(extension: &str) -> LookupResult<Self> {
		match extension.to_ascii_lowercase().as_str() {
			"json" => Ok(Self::Json),
			"yaml" | "yml" => Ok(Self::Yaml),
			other => Err(LookupError::UnsupportedFormat(other.to_string())),
		}
	}

	/// Pick the format from the extension of `path`.
	pub fn from_path(path: &Path) -> LookupResult<Self> {
		let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
		Self::from_extension(extension)
	}
}

/// Read and parse the document at `path`. Mapping keys keep their order.
pub fn load_document(path: &Path) -> LookupResult<(Value, DocumentFormat)> {
	let format = DocumentFormat::from_path(path)?;
	let content = std::fs::read_to_string(path).map_err(|e| {
		LookupError::DocumentParse {
			path: path.display().to_string(),
			reason: e.to_string(),
		}
	})?;
	let document = parse_document(&content, format, &path.display().to_string())?;

	Ok((document, format))
}

/// Parse `content` as a document in the given format.
pub fn parse_document(
	content: &str,
	format: DocumentFormat,
	path_display: &str,
) -> LookupResult<Value> {
	let parsed = match format {
		DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
		DocumentFormat::Yaml => {
			serde_yaml_ng::from_str(content)
				.map_err(|e| e.to_string())
				.and_then(|value| serde_json::to_value(expand_tags(value)).map_err(|e| e.to_string()))
		}
	};

	parsed.map_err(|reason| {
		LookupError::DocumentParse {
			path: path_display.to_string(),
			reason,
		}
	})
}

/// Rewrite short-form intrinsic function tags into their long form:
/// `!Ref Foo` becomes `{ Ref: Foo }`, `!Condition` likewise, and any other
/// `!Name value` becomes `{ "Fn::Name": value }`. `!GetAtt a.b` splits into
/// `["a", "b"]`.
fn expand_tags(value: serde_yaml_ng::Value) -> serde_yaml_ng::Value {
	use serde_yaml_ng::Value as Yaml;

	match value {
		Yaml::Tagged(tagged) => {
			let TaggedValue { tag, value } = *tagged;
			let tag = tag.to_string();
			let name = tag.trim_start_matches('!');
			let key = match name {
				"Ref" | "Condition" => name.to_string(),
				_ => format!("Fn::{name}"),
			};
			let value = match (name, expand_tags(value)) {
				("GetAtt", Yaml::String(attribute)) => {
					let parts: Vec<Yaml> = attribute
						.splitn(2, '.')
						.map(|part| Yaml::String(part.to_string()))
						.collect();
					if parts.len() == 2 {
						Yaml::Sequence(parts)
					} else {
						Yaml::String(attribute)
					}
				}
				(_, value) => value,
			};

			let mut mapping = Mapping::new();
			mapping.insert(Yaml::String(key), value);
			Yaml::Mapping(mapping)
		}
		Yaml::Sequence(items) => Yaml::Sequence(items.into_iter().map(expand_tags).collect()),
		Yaml::Mapping(mapping) => {
			Yaml::Mapping(
				mapping
					.into_iter()
					.map(|(key, value)| (key, expand_tags(value)))
					.collect(),
			)
		}
		other => other,
	}
}

/// Serialize a document. JSON output is pretty printed and ends with a
/// newline, like YAML output does.
pub fn render_document(document: &Value, format: DocumentFormat) -> LookupResult<String> {
	match format {
		DocumentFormat::Json => {
			serde_json::to_string_pretty(document)
				.map(|mut rendered| {
					rendered.push('\n');
					rendered
				})
				.map_err(|e| LookupError::Render(e.to_string()))
		}
		DocumentFormat::Yaml => {
			serde_yaml_ng::to_string(document).map_err(|e| LookupError::Render(e.to_string()))
		}
	}
}
