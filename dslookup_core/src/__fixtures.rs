use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Read;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use serde_json::Value;
use serde_json::json;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

use crate::Connection;
use crate::LookupError;
use crate::LookupResult;
use crate::Resolve;
use crate::SearchClient;

/// Resolves from a fixed table and records every call.
#[derive(Debug, Default)]
pub struct StaticResolver {
	ids: HashMap<(String, String), String>,
	pub calls: RefCell<Vec<(String, String)>>,
}

impl StaticResolver {
	pub fn new(entries: &[(&str, &str, &str)]) -> Self {
		let ids = entries
			.iter()
			.map(|(type_name, key, id)| ((type_name.to_string(), key.to_string()), id.to_string()))
			.collect();
		Self {
			ids,
			calls: RefCell::new(Vec::new()),
		}
	}

	pub fn firewall_rules() -> Self {
		Self::new(&[
			("firewallRule", "FTP Server", "21"),
			("firewallRule", "SMTP Server", "25"),
			("policy", "Base Policy", "1"),
		])
	}

	pub fn call_count(&self) -> usize {
		self.calls.borrow().len()
	}
}

impl Resolve for StaticResolver {
	fn resolve(&self, type_name: &str, key: &str) -> LookupResult<String> {
		self.calls
			.borrow_mut()
			.push((type_name.to_string(), key.to_string()));

		self.ids
			.get(&(type_name.to_string(), key.to_string()))
			.cloned()
			.ok_or_else(|| {
				LookupError::Cardinality {
					type_name: type_name.to_string(),
					key: key.to_string(),
					found: 0,
				}
			})
	}
}

/// A request received by [`MockApi`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
	pub method: String,
	pub path: String,
	pub api_version: Option<String>,
	pub api_key: Option<String>,
	pub body: Value,
}

/// A local HTTP server standing in for the search API.
pub struct MockApi {
	pub endpoint: String,
	requests: Arc<Mutex<Vec<RecordedRequest>>>,
	server: Arc<Server>,
	handle: Option<JoinHandle<()>>,
}

impl MockApi {
	/// Serve every request with `respond(path, body)`.
	pub fn start<F>(respond: F) -> Self
	where
		F: Fn(&str, &Value) -> (u16, String) + Send + 'static,
	{
		let server = Arc::new(Server::http("127.0.0.1:0").expect("http server"));
		let endpoint = format!("http://{}/api", server.server_addr());
		let requests = Arc::new(Mutex::new(Vec::new()));

		let handle = {
			let server = Arc::clone(&server);
			let requests = Arc::clone(&requests);
			thread::spawn(move || {
				for mut request in server.incoming_requests() {
					let mut raw = String::new();
					request
						.as_reader()
						.read_to_string(&mut raw)
						.expect("read request body");
					let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
					let header = |name: &str| {
						request
							.headers()
							.iter()
							.find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
							.map(|h| h.value.as_str().to_string())
					};

					let recorded = RecordedRequest {
						method: request.method().to_string(),
						path: request.url().to_string(),
						api_version: header("api-version"),
						api_key: header("api-secret-key"),
						body,
					};
					let (status, text) = respond(&recorded.path, &recorded.body);
					requests.lock().expect("requests lock").push(recorded);

					let response = Response::from_string(text)
						.with_status_code(status)
						.with_header(
							Header::from_bytes("Content-Type", "application/json")
								.expect("content type header"),
						);
					request.respond(response).expect("respond");
				}
			})
		};

		Self {
			endpoint,
			requests,
			server,
			handle: Some(handle),
		}
	}

	/// Answer every search with `body` and status 200.
	pub fn respond_with(body: Value) -> Self {
		let text = body.to_string();
		Self::start(move |_, _| (200, text.clone()))
	}

	/// Answer name searches from a table of `(type, name, id)`. Searches for
	/// a type that is not in the table get a 404.
	pub fn with_objects(objects: &[(&str, &str, u64)]) -> Self {
		let objects: Vec<(String, String, u64)> = objects
			.iter()
			.map(|(type_name, name, id)| (type_name.to_string(), name.to_string(), *id))
			.collect();

		Self::start(move |path, body| {
			let name = body["searchCriteria"][0]["stringValue"]
				.as_str()
				.unwrap_or_default();
			let Some(type_name) = objects
				.iter()
				.map(|(type_name, _, _)| type_name)
				.find(|type_name| path == search_path(type_name))
			else {
				return (404, format!("no such resource: {path}"));
			};

			let results: Vec<Value> = objects
				.iter()
				.filter(|(object_type, object_name, _)| object_type == type_name && object_name == name)
				.map(|(_, object_name, id)| json!({ "ID": id, "name": object_name }))
				.collect();
			let field = crate::plural(type_name);
			(200, json!({ field: results }).to_string())
		})
	}

	pub fn client(&self) -> SearchClient {
		let connection = Connection {
			url: self.endpoint.clone(),
			..Connection::default()
		};
		SearchClient::new(&connection, "secret-key").expect("search client")
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().expect("requests lock").clone()
	}
}

impl Drop for MockApi {
	fn drop(&mut self) {
		self.server.unblock();
		if let Some(handle) = self.handle.take() {
			let _ = handle.join();
		}
	}
}

fn search_path(type_name: &str) -> String {
	format!("/api/{}/search", crate::plural(type_name).to_lowercase())
}

/// A search response holding one result per id under `field`.
pub fn search_response(field: &str, ids: &[u64]) -> Value {
	let results: Vec<Value> = ids.iter().map(|id| json!({ "ID": id })).collect();
	json!({ field: results })
}
