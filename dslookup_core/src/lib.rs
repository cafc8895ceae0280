//! `dslookup_core` resolves `{{ lookup "<type>" "<name>" }}` references in
//! arbitrary JSON or YAML documents to the identifiers of Deep Security
//! objects, so that resource definitions can refer to rules, policies and
//! lists by name instead of by numeric ID.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Document (maps, sequences, scalars)
//!   → Walker (depth first over every string value)
//!   → Placeholder matcher (finds `{{ lookup "type" "name" }}` spans)
//!   → Resolver (POST /<types>/search, exactly one result required)
//!   → Rewritten document + every failure, in traversal order
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Connection settings loaded from `dslookup.toml`.
//! - [`placeholder`]: The placeholder grammar and matcher.
//! - [`search`]: The search client, pluralization of type names, and the
//!   [`Resolve`] seam.
//! - [`substitute`](mod@substitute): The document walker.
//! - [`lookup`]: Single object lookups by name and/or raw search body.
//! - [`query`]: Search request bodies and the `field == "value"` query
//!   syntax.
//! - [`document`]: Loading and rendering JSON and YAML documents.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dslookup_core::Connection;
//! use dslookup_core::SearchClient;
//! use dslookup_core::substitute;
//! use serde_json::json;
//!
//! let connection = Connection::default();
//! let client = SearchClient::new(&connection, connection.api_key_from_env().unwrap()).unwrap();
//!
//! let document = json!({
//!   "ruleIDs": ["{{ lookup \"firewallRule\" \"FTP Server\" }}"],
//! });
//! let result = substitute(document, &client);
//! for message in result.messages() {
//!   eprintln!("{message}");
//! }
//! ```

pub use config::*;
pub use document::*;
pub use error::*;
pub use lookup::*;
pub use placeholder::*;
pub use query::*;
pub use search::*;
pub use substitute::*;

pub mod config;
pub mod document;
#[allow(unused_assignments)]
mod error;
pub mod lookup;
pub mod placeholder;
pub mod query;
pub mod search;
pub mod substitute;

#[cfg(test)]
mod __fixtures;
