use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::LookupError;
use crate::LookupResult;
use crate::search::SearchClient;
use crate::search::identifier;

/// Look up a single object by name, by an explicit search, or both.
///
/// Deserializes from the resource property casing:
///
/// ```json
/// { "Type": "firewallRule", "Name": "SMTP Server" }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LookupRequest {
	#[serde(rename = "Type")]
	pub type_name: String,
	#[serde(rename = "Name", default)]
	pub name: Option<String>,
	/// A raw `/search` body, passed through as-is.
	#[serde(rename = "Search", default)]
	pub search: Option<Map<String, Value>>,
}

impl LookupRequest {
	pub fn by_name(type_name: impl Into<String>, name: impl Into<String>) -> Self {
		Self {
			type_name: type_name.into(),
			name: Some(name.into()),
			search: None,
		}
	}

	/// Ensure there is something to search for.
	pub fn validate(&self) -> LookupResult<()> {
		if self.name.is_none() && self.search.is_none() {
			return Err(LookupError::MissingLookupCriteria(self.type_name.clone()));
		}

		Ok(())
	}

	/// The search body: a copy of `search` with a `name` criterion appended
	/// when `name` is set.
	pub fn criteria(&self) -> Map<String, Value> {
		let mut body = self.search.clone().unwrap_or_default();
		let Some(name) = &self.name else {
			return body;
		};

		let criterion = json!({ "fieldName": "name", "stringValue": name });
		let criteria = body
			.entry("searchCriteria")
			.or_insert_with(|| Value::Array(Vec::new()));
		match criteria {
			Value::Array(criteria) => criteria.push(criterion),
			// a single criterion object is accepted by the API as well
			existing => {
				let single = existing.take();
				*existing = Value::Array(vec![single, criterion]);
			}
		}

		body
	}
}

impl SearchClient {
	/// Resolve `request` to the identifier of exactly one object. Results
	/// without an `ID` are ignored.
	pub fn lookup(&self, request: &LookupRequest) -> LookupResult<String> {
		request.validate()?;

		let results = self.search(&request.type_name, &request.criteria())?;
		let ids: Vec<String> = results.iter().filter_map(identifier).collect();

		match ids.as_slice() {
			[id] => Ok(id.clone()),
			_ => {
				Err(LookupError::Cardinality {
					type_name: request.type_name.clone(),
					key: request.name.clone().unwrap_or_default(),
					found: ids.len(),
				})
			}
		}
	}
}
