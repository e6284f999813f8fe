use std::fs;

use crate::cli::CliOpts;
use color_eyre::{eyre::WrapErr, Result};
use explorer_core::{
	network::Network, presentation::PresentationConfig, types::tracing_level_format, Threshold,
};
use serde::{Deserialize, Serialize};
use tracing::Level;

/// Representation of a configuration used by this project.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct RuntimeConfig {
	/// Log level, default is `INFO`. See `<https://docs.rs/log/0.4.14/log/enum.LevelFilter.html>` for possible log level values. (default: `INFO`).
	#[serde(with = "tracing_level_format")]
	pub log_level: Level,
	/// If set to true, logs are displayed in JSON format, which is used for structured logging. Otherwise, plain text format is used (default: false).
	pub log_format_json: bool,
	/// Network the explorer links point to (default: mainnet).
	pub network: Network,
	/// Explorer base URL. If not set, the network default is used (default: None).
	pub explorer_url: Option<String>,
	/// Width of the participation bar in characters (default: 40).
	pub bar_width: usize,
	/// Fraction of the committee weight required for quorum (default: "2/3").
	pub threshold: Threshold,
}

impl Default for RuntimeConfig {
	fn default() -> Self {
		RuntimeConfig {
			log_level: Level::INFO,
			log_format_json: false,
			network: Network::Mainnet,
			explorer_url: None,
			bar_width: 40,
			threshold: Threshold::default(),
		}
	}
}

impl From<&RuntimeConfig> for PresentationConfig {
	fn from(val: &RuntimeConfig) -> Self {
		PresentationConfig {
			explorer_url: val
				.explorer_url
				.clone()
				.unwrap_or_else(|| val.network.explorer_url().to_string()),
			bar_width: val.bar_width,
			threshold: val.threshold,
		}
	}
}

pub fn load(opts: &CliOpts) -> Result<RuntimeConfig> {
	let mut config = match &opts.config {
		Some(path) => {
			fs::metadata(path).wrap_err(format!("Configuration file {path} not found"))?;
			confy::load_path(path).wrap_err(format!("Failed to load configuration from {path}"))?
		},
		None => RuntimeConfig::default(),
	};

	config.log_level = opts.verbosity.unwrap_or(config.log_level);
	config.log_format_json = opts.logs_json || config.log_format_json;

	if let Some(network) = opts.network {
		config.network = network;
	}
	if let Some(explorer_url) = &opts.explorer_url {
		config.explorer_url = Some(explorer_url.clone());
	}
	if let Some(threshold) = opts.threshold {
		config.threshold = threshold;
	}

	Ok(config)
}
