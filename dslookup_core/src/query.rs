use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::LookupError;
use crate::LookupResult;

/// Number of results requested when resolving a name to a single identifier.
/// Asking for two lets a duplicate name be told apart from a unique one.
pub const RESOLVE_MAX_ITEMS: u32 = 2;

static QUERY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r#"^\s*(?P<field>[^\s=]*)\s*==\s*"(?P<value>[^"]*)"$"#)
		.expect("query pattern is a valid regex")
});

/// Body of a `POST /<types>/search` request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub max_items: Option<u32>,
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub search_criteria: Vec<SearchCriterion>,
}

impl SearchRequest {
	/// The request used to resolve `name` to exactly one object.
	pub fn by_name(name: &str) -> Self {
		Self {
			max_items: Some(RESOLVE_MAX_ITEMS),
			search_criteria: vec![SearchCriterion::name(name)],
		}
	}

	/// An unfiltered request returning at most `max_items` results.
	pub fn with_max_items(max_items: u32) -> Self {
		Self {
			max_items: Some(max_items),
			search_criteria: Vec::new(),
		}
	}

	/// Add a criterion to the request.
	#[must_use]
	pub fn criterion(mut self, criterion: SearchCriterion) -> Self {
		self.search_criteria.push(criterion);
		self
	}
}

/// A single string-equality criterion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriterion {
	pub field_name: String,
	pub string_value: String,
}

impl SearchCriterion {
	/// Match objects whose `name` equals `value`.
	pub fn name(value: &str) -> Self {
		Self {
			field_name: "name".to_string(),
			string_value: value.to_string(),
		}
	}

	/// Parse a query of the form `field == "value"`.
	///
	/// Equality is the only supported operator and the value must be double
	/// quoted.
	pub fn parse_query(query: &str) -> LookupResult<Self> {
		let Some(captures) = QUERY_PATTERN.captures(query) else {
			return Err(LookupError::InvalidQuery(format!(
				"unsupported query syntax '{query}'"
			)));
		};

		let field = captures.name("field").map_or("", |m| m.as_str());
		if field.is_empty() {
			return Err(LookupError::InvalidQuery(format!(
				"no field name found in query '{query}'"
			)));
		}

		Ok(Self {
			field_name: field.to_string(),
			string_value: captures
				.name("value")
				.map_or_else(String::new, |m| m.as_str().to_string()),
		})
	}
}
