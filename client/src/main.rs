#![doc = include_str!("../README.md")]

use crate::{
	cli::{CliOpts, Command},
	config::RuntimeConfig,
};
use clap::Parser;
use color_eyre::{
	eyre::{eyre, WrapErr},
	Result,
};
use explorer_core::{
	bitvector,
	presentation::{ParticipationView, PresentationConfig},
	types::{parse_record, SignedRecord},
	utils::{default_subscriber, install_panic_hooks, json_subscriber},
	ParticipationResult,
};
use serde::Serialize;
use std::{
	fs,
	io::{self, Read},
	path::PathBuf,
};
use tracing::{debug, info, span, warn, Level};

mod cli;
mod config;

/// Participation result with the derived values, as printed by `--json`.
#[derive(Serialize)]
struct ParticipationOutput<'a> {
	record: String,
	#[serde(flatten)]
	result: &'a ParticipationResult,
	/// Serialized as `null` for empty committees.
	ratio: f64,
	has_quorum: bool,
	signature: Option<&'a str>,
}

fn bit_string(bits: &[bool]) -> String {
	bits.iter().map(|&bit| if bit { '1' } else { '0' }).collect()
}

fn parse_bits(value: &str) -> Result<Vec<bool>> {
	value
		.chars()
		.map(|c| match c {
			'0' => Ok(false),
			'1' => Ok(true),
			c => Err(eyre!("Invalid bit {c:?}, expecting '0' or '1'")),
		})
		.collect()
}

fn read_record(input: Option<PathBuf>) -> Result<SignedRecord> {
	let json = match input {
		Some(path) => fs::read_to_string(&path)
			.wrap_err(format!("Failed to read record from {}", path.display()))?,
		None => {
			let mut json = String::new();
			io::stdin()
				.read_to_string(&mut json)
				.wrap_err("Failed to read record from stdin")?;
			json
		},
	};

	parse_record(&json).wrap_err("Invalid signed record")
}

fn decode(encoded: &str, strict: bool) -> Result<String> {
	let bits = if strict {
		bitvector::try_decode(encoded).wrap_err("Cannot decode bitvector")?
	} else {
		bitvector::decode(Some(encoded))
	};

	if bits.is_empty() && !encoded.trim().is_empty() {
		warn!("Bitvector {encoded} is malformed, treating it as empty");
	}

	Ok(format!(
		"bits: {}\nbytes: {}\nlength: {}\nsigners: {}",
		bit_string(&bits),
		hex::encode(bitvector::pack(&bits)),
		bits.len(),
		bits.iter().filter(|&&bit| bit).count()
	))
}

fn participation(config: &RuntimeConfig, record: &SignedRecord, json: bool) -> Result<String> {
	let committee = record.committee();
	info!(
		%record,
		epoch = committee.epoch,
		members = committee.members.len(),
		"Computing committee participation"
	);

	let result = record.participation();
	let presentation = PresentationConfig::from(config);
	let signature = record.signature().sig.as_deref();
	debug!(%result, "Participation computed");

	if json {
		let output = ParticipationOutput {
			record: record.to_string(),
			result: &result,
			ratio: result.ratio(),
			has_quorum: result.has_quorum(&presentation.threshold),
			signature,
		};
		return Ok(serde_json::to_string_pretty(&output)?);
	}

	let view = ParticipationView::new(&result, &presentation).with_signature(signature);
	Ok(format!("{record}\n{view}"))
}

fn run(command: Command, config: &RuntimeConfig) -> Result<()> {
	let version = clap::crate_version!();
	debug!("Running explorer v{version}");
	debug!("Using configuration: {config:?}");

	let output = match command {
		Command::Decode { bitvector, strict } => decode(&bitvector, strict)?,
		Command::Encode { bits } => bitvector::encode(&parse_bits(&bits)?),
		Command::Participation { input, json } => {
			let record = read_record(input)?;
			participation(config, &record, json)?
		},
	};

	println!("{output}");
	Ok(())
}

pub fn main() -> Result<()> {
	let opts = CliOpts::parse();
	let config = config::load(&opts)?;

	if config.log_format_json {
		tracing::subscriber::set_global_default(json_subscriber(config.log_level))?;
	} else {
		tracing::subscriber::set_global_default(default_subscriber(config.log_level))?;
	}

	install_panic_hooks()?;

	let span = span!(Level::INFO, "run", network = %config.network);
	let _enter = span.enter();

	run(opts.command, &config)
}
