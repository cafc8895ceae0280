use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Serialize;
use serde_json::Value;

use crate::LookupError;
use crate::LookupResult;
use crate::config::Connection;
use crate::query::SearchRequest;

/// Header carrying the API version.
pub const API_VERSION_HEADER: &str = "api-version";

/// Header carrying the API secret key.
pub const API_SECRET_KEY_HEADER: &str = "api-secret-key";

/// Field holding the identifier of an object in search results.
pub const IDENTIFIER_FIELD: &str = "ID";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Translates a `(type, key)` pair into the identifier of exactly one remote
/// object.
pub trait Resolve {
	fn resolve(&self, type_name: &str, key: &str) -> LookupResult<String>;
}

impl<R: Resolve + ?Sized> Resolve for &R {
	fn resolve(&self, type_name: &str, key: &str) -> LookupResult<String> {
		(**self).resolve(type_name, key)
	}
}

/// Plural form of a type name: a trailing `y` becomes `ies`, anything else
/// gets an `s`.
///
/// The result is both the response field holding the results and, lower
/// cased, the URL path segment. Irregular plurals are not handled; the
/// endpoint names depend on this exact mapping.
pub fn plural(type_name: &str) -> String {
	match type_name.strip_suffix('y') {
		Some(stem) => format!("{stem}ies"),
		None => format!("{type_name}s"),
	}
}

/// `POST` target for searching objects of `type_name` under `endpoint`.
pub fn search_url(endpoint: &str, type_name: &str) -> String {
	format!(
		"{}/{}/search",
		endpoint.trim_end_matches('/'),
		plural(type_name).to_lowercase()
	)
}

/// String form of the identifier of a search result. Numbers are rendered
/// in decimal; anything but a string or a number counts as missing.
pub fn identifier(result: &Value) -> Option<String> {
	match result.get(IDENTIFIER_FIELD)? {
		Value::String(id) => Some(id.clone()),
		Value::Number(id) => Some(id.to_string()),
		_ => None,
	}
}

/// Blocking client for the `/<types>/search` endpoints.
#[derive(Clone)]
pub struct SearchClient {
	client: Client,
	endpoint: String,
	version: String,
	api_key: String,
}

impl fmt::Debug for SearchClient {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SearchClient")
			.field("endpoint", &self.endpoint)
			.field("version", &self.version)
			.finish_non_exhaustive()
	}
}

impl SearchClient {
	/// Build a client for `connection` authenticating with `api_key`.
	pub fn new(connection: &Connection, api_key: impl Into<String>) -> LookupResult<Self> {
		let client = Client::builder()
			.timeout(DEFAULT_TIMEOUT)
			.build()
			.map_err(|e| LookupError::Client(e.to_string()))?;

		Ok(Self {
			client,
			endpoint: connection.endpoint().to_string(),
			version: connection.version.clone(),
			api_key: api_key.into(),
		})
	}

	/// Search objects of `type_name` and return the result array found under
	/// the plural type name in the response.
	pub fn search<B>(&self, type_name: &str, body: &B) -> LookupResult<Vec<Value>>
	where
		B: Serialize + ?Sized,
	{
		let url = search_url(&self.endpoint, type_name);
		let field = plural(type_name);
		tracing::debug!(%url, type_name, "searching");

		let transport = |e: reqwest::Error| {
			LookupError::Transport {
				type_name: type_name.to_string(),
				reason: e.to_string(),
			}
		};

		let response = self
			.client
			.post(&url)
			.header(API_VERSION_HEADER, &self.version)
			.header(API_SECRET_KEY_HEADER, &self.api_key)
			.json(body)
			.send()
			.map_err(transport)?;

		let status = response.status();
		let text = response.text().map_err(transport)?;

		if status != StatusCode::OK {
			return Err(LookupError::Status {
				type_name: type_name.to_string(),
				status: status.as_u16(),
				body: text,
			});
		}

		let invalid = |reason: String| {
			LookupError::InvalidResponse {
				type_name: type_name.to_string(),
				reason,
			}
		};

		let value: Value = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;
		let Value::Object(mut fields) = value else {
			return Err(invalid("expected a JSON object".to_string()));
		};

		match fields.remove(&field) {
			Some(Value::Array(results)) => Ok(results),
			Some(_) => Err(invalid(format!("field '{field}' is not an array"))),
			None => {
				Err(LookupError::MissingField {
					type_name: type_name.to_string(),
					field,
				})
			}
		}
	}
}

impl Resolve for SearchClient {
	fn resolve(&self, type_name: &str, key: &str) -> LookupResult<String> {
		let results = self.search(type_name, &SearchRequest::by_name(key))?;

		let [result] = results.as_slice() else {
			return Err(LookupError::Cardinality {
				type_name: type_name.to_string(),
				key: key.to_string(),
				found: results.len(),
			});
		};

		identifier(result).ok_or_else(|| {
			LookupError::MissingIdentifier {
				type_name: type_name.to_string(),
			}
		})
	}
}
