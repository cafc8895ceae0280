use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum LookupError {
	#[error(transparent)]
	#[diagnostic(code(dslookup::io_error))]
	Io(#[from] std::io::Error),

	#[error("search for '{type_name}' failed, {reason}")]
	#[diagnostic(
		code(dslookup::transport),
		help("check that the API endpoint is reachable from this machine")
	)]
	Transport { type_name: String, reason: String },

	#[error("search for '{type_name}' failed with status {status} - {body}")]
	#[diagnostic(code(dslookup::status))]
	Status {
		type_name: String,
		status: u16,
		body: String,
	},

	#[error("search for '{type_name}' returned an unreadable response: {reason}")]
	#[diagnostic(code(dslookup::invalid_response))]
	InvalidResponse { type_name: String, reason: String },

	#[error("search for '{type_name}' returned no field '{field}' in response")]
	#[diagnostic(
		code(dslookup::missing_field),
		help("the type name is case sensitive, e.g. `firewallRule` or `policy`")
	)]
	MissingField { type_name: String, field: String },

	#[error("expected exactly one {type_name} with name '{key}', found {found}")]
	#[diagnostic(
		code(dslookup::cardinality),
		help("names must identify a single object; rename duplicates or refine the search")
	)]
	Cardinality {
		type_name: String,
		key: String,
		found: usize,
	},

	#[error("no identifier field `ID` in {type_name} search result")]
	#[diagnostic(code(dslookup::missing_identifier))]
	MissingIdentifier { type_name: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(dslookup::config_parse),
		help("check that dslookup.toml is valid TOML with [connection] and/or [search] sections")
	)]
	ConfigParse(String),

	#[error("no api key available")]
	#[diagnostic(
		code(dslookup::missing_api_key),
		help("pass `--api-key` or export the `{0}` environment variable")
	)]
	MissingApiKey(String),

	#[error("failed to build http client: {0}")]
	#[diagnostic(code(dslookup::client))]
	Client(String),

	#[error("failed to load document `{path}`: {reason}")]
	#[diagnostic(code(dslookup::document_parse))]
	DocumentParse { path: String, reason: String },

	#[error("unsupported document format: `{0}`")]
	#[diagnostic(
		code(dslookup::unsupported_format),
		help("supported formats: json, yaml, yml")
	)]
	UnsupportedFormat(String),

	#[error("failed to render document: {0}")]
	#[diagnostic(code(dslookup::render))]
	Render(String),

	#[error("{0}")]
	#[diagnostic(
		code(dslookup::invalid_query),
		help("the only supported query syntax is: field == \"value\"")
	)]
	InvalidQuery(String),

	#[error("either a name or a search, or both, must be present to look up a `{0}`")]
	#[diagnostic(code(dslookup::missing_lookup_criteria))]
	MissingLookupCriteria(String),
}

pub type LookupResult<T> = Result<T, LookupError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
