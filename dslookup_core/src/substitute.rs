use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::LookupError;
use crate::placeholder::find_placeholders;
use crate::search::Resolve;

/// A placeholder that could not be resolved. Its text is left in the
/// document unchanged.
#[derive(Debug, Error)]
#[error("unable to resolve `{placeholder}`: {error}")]
pub struct Failure {
	/// The placeholder text exactly as it appears in the document.
	pub placeholder: String,
	pub type_name: String,
	pub key: String,
	pub error: LookupError,
}

/// Result of substituting all placeholders in a document.
#[derive(Debug)]
pub struct Substitution {
	/// The rewritten document. It has the same shape as the input; only
	/// string contents differ.
	pub document: Value,
	/// Every placeholder that failed to resolve, in traversal order: keys in
	/// document order, elements by index, and placeholders within a string
	/// left to right.
	pub failures: Vec<Failure>,
}

impl Substitution {
	/// Returns true if every placeholder was resolved.
	pub fn is_ok(&self) -> bool {
		self.failures.is_empty()
	}

	/// The failure messages, in traversal order.
	pub fn messages(&self) -> Vec<String> {
		self.failures.iter().map(ToString::to_string).collect()
	}

	/// The document if fully resolved, otherwise all failures.
	pub fn into_result(self) -> Result<Value, Vec<Failure>> {
		if self.failures.is_empty() {
			Ok(self.document)
		} else {
			Err(self.failures)
		}
	}
}

/// Returns true if any string value in `document` holds a placeholder.
/// Mapping keys are not searched.
pub fn has_placeholders(document: &Value) -> bool {
	match document {
		Value::String(text) => !find_placeholders(text).is_empty(),
		Value::Array(items) => items.iter().any(has_placeholders),
		Value::Object(fields) => fields.values().any(has_placeholders),
		Value::Null | Value::Bool(_) | Value::Number(_) => false,
	}
}

/// Replace every `{{ lookup "<type>" "<key>" }}` in the string values of
/// `document` with the identifier returned by `resolver`.
///
/// Traversal is depth first and never stops early: a placeholder that fails
/// to resolve is kept verbatim and recorded, and the rest of the document is
/// still processed. Lookups are issued one at a time and are not cached, so
/// a placeholder that occurs twice is resolved twice.
pub fn substitute<R>(document: Value, resolver: &R) -> Substitution
where
	R: Resolve + ?Sized,
{
	let (document, failures) = substitute_value(document, resolver);
	Substitution { document, failures }
}

fn substitute_value<R>(value: Value, resolver: &R) -> (Value, Vec<Failure>)
where
	R: Resolve + ?Sized,
{
	match value {
		Value::String(text) => {
			let (text, failures) = substitute_text(text, resolver);
			(Value::String(text), failures)
		}
		Value::Array(items) => {
			let mut failures = Vec::new();
			let items = items
				.into_iter()
				.map(|item| {
					let (item, item_failures) = substitute_value(item, resolver);
					failures.extend(item_failures);
					item
				})
				.collect();
			(Value::Array(items), failures)
		}
		Value::Object(fields) => {
			let mut failures = Vec::new();
			let fields: Map<String, Value> = fields
				.into_iter()
				.map(|(key, field)| {
					let (field, field_failures) = substitute_value(field, resolver);
					failures.extend(field_failures);
					(key, field)
				})
				.collect();
			(Value::Object(fields), failures)
		}
		scalar @ (Value::Null | Value::Bool(_) | Value::Number(_)) => (scalar, Vec::new()),
	}
}

/// Substitute the placeholders of a single string.
///
/// A string without placeholders is returned as is, without copying.
pub fn substitute_text<R>(text: String, resolver: &R) -> (String, Vec<Failure>)
where
	R: Resolve + ?Sized,
{
	let placeholders = find_placeholders(&text);
	if placeholders.is_empty() {
		return (text, Vec::new());
	}

	let mut output = String::with_capacity(text.len());
	let mut failures = Vec::new();
	let mut cursor = 0;

	for placeholder in &placeholders {
		output.push_str(&text[cursor..placeholder.start]);

		match resolver.resolve(placeholder.type_name, placeholder.key) {
			Ok(id) => output.push_str(&id),
			Err(error) => {
				let original = &text[placeholder.span()];
				tracing::warn!(placeholder = original, %error, "lookup failed");
				output.push_str(original);
				failures.push(Failure {
					placeholder: original.to_string(),
					type_name: placeholder.type_name.to_string(),
					key: placeholder.key.to_string(),
					error,
				});
			}
		}

		cursor = placeholder.end;
	}

	output.push_str(&text[cursor..]);
	(output, failures)
}
