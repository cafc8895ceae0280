use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use dslookup_core::DocumentFormat;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Resolve Deep Security object names to identifiers.",
	long_about = "dslookup resolves `{{ lookup \"<type>\" \"<name>\" }}` references in JSON and \
	              YAML documents to the identifiers of Deep Security objects, and searches the \
	              API directly.\n\nQuick start:\n  dslookup search --type firewallRule        \
	              List firewall rules\n  dslookup lookup --type policy --name Base   Print the ID \
	              of one object\n  dslookup substitute policy.yaml            Resolve every \
	              lookup in a document"
)]
pub struct DslookupCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the directory holding `dslookup.toml`.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Endpoint of the Deep Security API. Overrides the config file.
	#[arg(long, global = true)]
	pub url: Option<String>,

	/// Version of the Deep Security API. Overrides the config file.
	#[arg(long, global = true)]
	pub api_version: Option<String>,

	/// Secret key for the Deep Security API. Defaults to the environment
	/// variable named in the config file (`DEEP_SECURITY_API_KEY`).
	#[arg(long, global = true)]
	pub api_key: Option<String>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Search objects of one type and print the results.
	///
	/// Prints the array of matching objects. Without `--query` every object
	/// of the type is returned, up to `--max-items`.
	Search {
		/// Type to search for, e.g. `policy`, `firewallRule`, `ipList`.
		#[arg(long = "type", value_name = "TYPE")]
		type_name: String,

		/// Filter to apply. The only supported syntax is `field == "value"`.
		#[arg(long)]
		query: Option<String>,

		/// Maximum number of results to return. Defaults to the config
		/// file's `search.max_items`.
		#[arg(long)]
		max_items: Option<u32>,

		/// Output format for the results.
		#[arg(long, value_enum, default_value_t = OutputFormat::Yaml)]
		format: OutputFormat,
	},
	/// Print the identifier of exactly one object.
	///
	/// Fails when the search matches no object or more than one.
	Lookup {
		/// Type of the object, e.g. `policy` or `firewallRule`.
		#[arg(long = "type", value_name = "TYPE")]
		type_name: String,

		/// Name of the object.
		#[arg(long)]
		name: Option<String>,

		/// Raw JSON body for the search endpoint. Combined with `--name` when
		/// both are given.
		#[arg(long)]
		search: Option<String>,
	},
	/// Resolve every `{{ lookup "<type>" "<name>" }}` in a JSON or YAML
	/// document and print the result.
	///
	/// Placeholders that cannot be resolved are left in place and reported.
	/// Exits with status 1 when any placeholder failed. A document without
	/// placeholders is printed as is and needs no API key.
	///
	/// YAML short-form intrinsic tags such as `!Ref` and `!GetAtt` are read
	/// and written back in their long form (`Ref:`, `Fn::GetAtt:`).
	Substitute {
		/// The document to process (`.json`, `.yaml` or `.yml`).
		file: PathBuf,

		/// Output format. Defaults to the format of the input file.
		#[arg(long, value_enum)]
		format: Option<OutputFormat>,

		/// Show a unified diff between the input and the substituted document
		/// instead of printing it.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Pretty printed JSON.
	Json,
	/// YAML.
	Yaml,
}

impl From<OutputFormat> for DocumentFormat {
	fn from(format: OutputFormat) -> Self {
		match format {
			OutputFormat::Json => Self::Json,
			OutputFormat::Yaml => Self::Yaml,
		}
	}
}
