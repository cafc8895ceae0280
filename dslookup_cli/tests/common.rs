#![allow(dead_code)]

use std::io::Read;
use std::sync::Arc;
use std::sync::Mutex;
use std::thread;
use std::thread::JoinHandle;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;
use serde_json::Value;
use tiny_http::Header;
use tiny_http::Response;
use tiny_http::Server;

pub fn dslookup_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("dslookup"));
	cmd.env("NO_COLOR", "1")
		.env_remove("DEEP_SECURITY_API_KEY")
		.env_remove("RUST_LOG");
	cmd
}

/// A request received by [`MockApi`].
#[derive(Debug, Clone)]
pub struct Recorded {
	pub path: String,
	pub api_key: Option<String>,
	pub body: Value,
}

/// Local stand-in for the search API.
pub struct MockApi {
	pub endpoint: String,
	requests: Arc<Mutex<Vec<Recorded>>>,
	server: Arc<Server>,
	handle: Option<JoinHandle<()>>,
}

impl MockApi {
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
					let _ = request.as_reader().read_to_string(&mut raw);
					let body: Value = serde_json::from_str(&raw).unwrap_or(Value::Null);
					let api_key = request
						.headers()
						.iter()
						.find(|h| h.field.equiv("api-secret-key"))
						.map(|h| h.value.as_str().to_string());
					let path = request.url().to_string();

					let (status, text) = respond(&path, &body);
					requests
						.lock()
						.expect("requests lock")
						.push(Recorded { path, api_key, body });

					let response = Response::from_string(text)
						.with_status_code(status)
						.with_header(
							Header::from_bytes("Content-Type", "application/json")
								.expect("content type header"),
						);
					let _ = request.respond(response);
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

	/// Answer every request with status 200 and `body`.
	pub fn respond_with(body: Value) -> Self {
		let text = body.to_string();
		Self::start(move |_, _| (200, text.clone()))
	}

	/// Answer firewall rule searches by name: `FTP Server` is 21, `SMTP
	/// Server` is 25, `Duplicate` matches twice and anything else matches
	/// nothing.
	pub fn firewall_rules() -> Self {
		Self::start(|path, body| {
			if path != "/api/firewallrules/search" {
				return (404, format!("unknown resource {path}"));
			}

			let results = match body["searchCriteria"][0]["stringValue"].as_str() {
				Some("FTP Server") => serde_json::json!([{ "ID": 21, "name": "FTP Server" }]),
				Some("SMTP Server") => serde_json::json!([{ "ID": 25, "name": "SMTP Server" }]),
				Some("Duplicate") => serde_json::json!([{ "ID": 30 }, { "ID": 31 }]),
				_ => serde_json::json!([]),
			};
			(200, serde_json::json!({ "firewallRules": results }).to_string())
		})
	}

	pub fn requests(&self) -> Vec<Recorded> {
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
