use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use dslookup_cli::Commands;
use dslookup_cli::DslookupCli;
use dslookup_cli::OutputFormat;
use dslookup_core::DocumentFormat;
use dslookup_core::LookupConfig;
use dslookup_core::LookupError;
use dslookup_core::LookupRequest;
use dslookup_core::SearchClient;
use dslookup_core::SearchCriterion;
use dslookup_core::SearchRequest;
use dslookup_core::Substitution;
use dslookup_core::has_placeholders;
use dslookup_core::load_document;
use dslookup_core::render_document;
use dslookup_core::substitute;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = DslookupCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Search {
			type_name,
			query,
			max_items,
			format,
		}) => run_search(&args, type_name, query.as_deref(), *max_items, *format),
		Some(Commands::Lookup {
			type_name,
			name,
			search,
		}) => run_lookup(&args, type_name, name.as_deref(), search.as_deref()),
		Some(Commands::Substitute { file, format, diff }) => {
			run_substitute(&args, file, *format, *diff)
		}
		None => {
			eprintln!("No subcommand specified. Run `dslookup --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		match e.downcast::<LookupError>() {
			Ok(lookup_err) => {
				let report: miette::Report = (*lookup_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr, at `error` by default and `debug` with `--verbose`.
/// `RUST_LOG` takes precedence over both.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "error" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init()
		.ok();
}

fn resolve_root(args: &DslookupCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load_config(args: &DslookupCli) -> Result<LookupConfig, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	if args.verbose {
		match LookupConfig::resolve_path(&root) {
			Some(path) => eprintln!("Using config: {}", path.display()),
			None => eprintln!("No config file found in {}, using defaults", root.display()),
		}
	}

	Ok(LookupConfig::load_or_default(&root)?)
}

/// Build a search client from the config file, with command line flags
/// taking precedence.
fn build_client(
	args: &DslookupCli,
	config: &LookupConfig,
) -> Result<SearchClient, Box<dyn std::error::Error>> {
	let mut connection = config.connection.clone();
	if let Some(url) = &args.url {
		connection.url.clone_from(url);
	}
	if let Some(version) = &args.api_version {
		connection.version.clone_from(version);
	}

	let api_key = match &args.api_key {
		Some(api_key) => api_key.clone(),
		None => connection.api_key_from_env()?,
	};

	tracing::debug!(endpoint = connection.endpoint(), version = %connection.version, "connecting");
	Ok(SearchClient::new(&connection, api_key)?)
}

fn run_search(
	args: &DslookupCli,
	type_name: &str,
	query: Option<&str>,
	max_items: Option<u32>,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let config = load_config(args)?;

	let mut request = SearchRequest::with_max_items(max_items.unwrap_or(config.search.max_items));
	if let Some(query) = query {
		request = request.criterion(SearchCriterion::parse_query(query)?);
	}

	let client = build_client(args, &config)?;
	let results = client.search(type_name, &request)?;

	if args.verbose {
		eprintln!("Found {} {type_name} result(s)", results.len());
	}

	print!(
		"{}",
		render_document(&serde_json::Value::Array(results), format.into())?
	);

	Ok(())
}

fn run_lookup(
	args: &DslookupCli,
	type_name: &str,
	name: Option<&str>,
	search: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
	let search = search
		.map(|body| {
			serde_json::from_str(body)
				.map_err(|e| LookupError::InvalidQuery(format!("invalid search body: {e}")))
		})
		.transpose()?;

	let request = LookupRequest {
		type_name: type_name.to_string(),
		name: name.map(str::to_string),
		search,
	};
	request.validate()?;

	let config = load_config(args)?;
	let client = build_client(args, &config)?;
	let id = client.lookup(&request)?;
	println!("{id}");

	Ok(())
}

fn run_substitute(
	args: &DslookupCli,
	file: &Path,
	format: Option<OutputFormat>,
	show_diff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let (document, detected) = load_document(file)?;
	let format: DocumentFormat = format.map_or(detected, Into::into);

	let original = if show_diff {
		Some(render_document(&document, format)?)
	} else {
		None
	};

	let result = if has_placeholders(&document) {
		let config = load_config(args)?;
		let client = build_client(args, &config)?;
		substitute(document, &client)
	} else {
		tracing::debug!(file = %file.display(), "no lookups found");
		Substitution {
			document,
			failures: Vec::new(),
		}
	};
	let rendered = render_document(&result.document, format)?;

	match original {
		Some(original) => print_diff(&original, &rendered),
		None => print!("{rendered}"),
	}

	if result.is_ok() {
		return Ok(());
	}

	for failure in &result.failures {
		eprintln!("{} {failure}", colored!("error:", red));
	}
	eprintln!();
	eprintln!(
		"{} lookup(s) in {} could not be resolved.",
		result.failures.len(),
		file.display()
	);
	std::io::stdout().flush()?;
	process::exit(1);
}

fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				print!("{}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				print!("{}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				print!(" {change}");
			}
		}
	}
}
