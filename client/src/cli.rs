use std::path::PathBuf;

use clap::{command, Parser, Subcommand};
use explorer_core::{network::Network, Threshold};
use tracing::Level;

#[derive(Parser)]
#[command(version)]
pub struct CliOpts {
	/// Path to the toml configuration file
	#[arg(short, long, value_name = "FILE", global = true)]
	pub config: Option<String>,
	/// Network whose explorer is used for account links
	#[arg(short, long, value_name = "network", global = true)]
	pub network: Option<Network>,
	/// Explorer base URL, overrides the network default
	#[arg(long, global = true)]
	pub explorer_url: Option<String>,
	/// Quorum threshold as a fraction of the total weight (e.g. 2/3)
	#[arg(long, global = true)]
	pub threshold: Option<Threshold>,
	/// Log level
	#[arg(long, global = true)]
	pub verbosity: Option<Level>,
	/// Set logs format to JSON
	#[arg(long, global = true)]
	pub logs_json: bool,
	#[command(subcommand)]
	pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
	/// Decode a signer bitvector into its bits
	Decode {
		/// URL-safe base64 bitvector, as found in the `bv` field
		bitvector: String,
		/// Fail on malformed input instead of treating it as empty
		#[arg(long)]
		strict: bool,
	},
	/// Encode a string of 0 and 1 into a signer bitvector
	Encode {
		/// Signer flags in committee order (e.g. 1011)
		bits: String,
	},
	/// Compute committee participation of a signed block or epoch record
	Participation {
		/// JSON record file, read from stdin if omitted
		#[arg(short, long, value_name = "FILE")]
		input: Option<PathBuf>,
		/// Print the result as JSON
		#[arg(long)]
		json: bool,
	},
}
