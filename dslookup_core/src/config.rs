use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::LookupError;
use crate::LookupResult;

/// Default endpoint of the Deep Security API.
pub const DEFAULT_API_URL: &str = "https://app.deepsecurity.trendmicro.com/api";

/// Default API version sent in the `api-version` header.
pub const DEFAULT_API_VERSION: &str = "v1";

/// Default environment variable holding the API secret key.
pub const DEFAULT_API_KEY_ENV: &str = "DEEP_SECURITY_API_KEY";

/// Default number of results returned by a free-form search.
pub const DEFAULT_MAX_ITEMS: u32 = 10;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"dslookup.toml",
	".dslookup.toml",
	".config/dslookup.toml",
];

/// Configuration loaded from a `dslookup.toml` file.
///
/// ```toml
/// [connection]
/// url = "https://app.deepsecurity.trendmicro.com/api"
/// version = "v1"
/// api_key_env = "DEEP_SECURITY_API_KEY"
///
/// [search]
/// max_items = 10
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct LookupConfig {
	/// How to reach the API.
	#[serde(default)]
	pub connection: Connection,
	/// Defaults for free-form searches.
	#[serde(default)]
	pub search: SearchConfig,
}

/// Connection settings for the Deep Security API.
///
/// Also accepts the casing used by resource properties (`URL`, `Version`).
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Connection {
	/// Base URL of the API, without a trailing `/`.
	#[serde(default = "default_url", alias = "URL")]
	pub url: String,
	/// Value of the `api-version` header.
	#[serde(default = "default_version", alias = "Version")]
	pub version: String,
	/// Environment variable to read the API secret key from.
	#[serde(default = "default_api_key_env")]
	pub api_key_env: String,
}

impl Default for Connection {
	fn default() -> Self {
		Self {
			url: default_url(),
			version: default_version(),
			api_key_env: default_api_key_env(),
		}
	}
}

impl Connection {
	/// Base URL with any trailing `/` removed.
	pub fn endpoint(&self) -> &str {
		self.url.trim_end_matches('/')
	}

	/// Read the API secret key from the configured environment variable.
	pub fn api_key_from_env(&self) -> LookupResult<String> {
		std::env::var(&self.api_key_env)
			.ok()
			.filter(|key| !key.is_empty())
			.ok_or_else(|| LookupError::MissingApiKey(self.api_key_env.clone()))
	}
}

/// Defaults for the `search` command.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
	#[serde(default = "default_max_items")]
	pub max_items: u32,
}

impl Default for SearchConfig {
	fn default() -> Self {
		Self {
			max_items: DEFAULT_MAX_ITEMS,
		}
	}
}

fn default_url() -> String {
	DEFAULT_API_URL.to_string()
}

fn default_version() -> String {
	DEFAULT_API_VERSION.to_string()
}

fn default_api_key_env() -> String {
	DEFAULT_API_KEY_ENV.to_string()
}

fn default_max_items() -> u32 {
	DEFAULT_MAX_ITEMS
}

impl LookupConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> LookupResult<Option<LookupConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: LookupConfig =
			toml::from_str(&content).map_err(|e| LookupError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to defaults when none exists.
	pub fn load_or_default(root: &Path) -> LookupResult<LookupConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}
}
