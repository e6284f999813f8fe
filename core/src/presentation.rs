//! Text rendering of participation results for terminal consumers.
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::participation::{ParticipationResult, Threshold, Weight};

/// Presentation settings, passed explicitly to every view.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresentationConfig {
	/// Base URL used to build account links.
	pub explorer_url: String,
	/// Width of the participation bar in characters.
	pub bar_width: usize,
	/// Weighted quorum the record is checked against.
	pub threshold: Threshold,
}

impl Default for PresentationConfig {
	fn default() -> Self {
		PresentationConfig {
			explorer_url: "https://l2scan.io".to_string(),
			bar_width: 40,
			threshold: Threshold::default(),
		}
	}
}

/// Formats participation ratio as percentage.
///
/// `NaN` from empty or zero-weight committees, and any other non-finite ratio, render as `N/A`.
pub fn format_percentage(ratio: f64) -> String {
	if !ratio.is_finite() {
		return "N/A".to_string();
	}
	format!("{:.2}%", ratio * 100.0)
}

fn account_link(explorer_url: &str, account: &str) -> String {
	format!("{}/address/{account}", explorer_url.trim_end_matches('/'))
}

fn bar(ratio: f64, width: usize) -> String {
	let filled = if ratio.is_finite() {
		((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width)
	} else {
		0
	};
	format!("[{}{}]", "#".repeat(filled), "-".repeat(width - filled))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Voter {
	pub account: String,
	pub weight: Weight,
	pub link: String,
}

/// Participation result shaped for display.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticipationView {
	pub voters: Vec<Voter>,
	pub voted_weight: u128,
	pub total_weight: u128,
	pub ratio: f64,
	pub percentage: String,
	pub bar: String,
	pub threshold: Threshold,
	pub has_quorum: bool,
	/// Aggregate signature, shown as received.
	pub signature: Option<String>,
}

impl ParticipationView {
	pub fn new(result: &ParticipationResult, config: &PresentationConfig) -> Self {
		let ratio = result.ratio();
		let voters = result
			.voted_members
			.iter()
			.map(|member| Voter {
				account: member.account.clone(),
				weight: member.weight,
				link: account_link(&config.explorer_url, &member.account),
			})
			.collect();

		ParticipationView {
			voters,
			voted_weight: result.voted_weight,
			total_weight: result.total_weight,
			ratio,
			percentage: format_percentage(ratio),
			bar: bar(ratio, config.bar_width),
			threshold: config.threshold,
			has_quorum: result.has_quorum(&config.threshold),
			signature: None,
		}
	}

	pub fn with_signature(mut self, signature: Option<&str>) -> Self {
		self.signature = signature.map(str::to_string);
		self
	}
}

impl Display for ParticipationView {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		writeln!(
			f,
			"Participation: {} {} ({}/{})",
			self.bar, self.percentage, self.voted_weight, self.total_weight
		)?;
		writeln!(
			f,
			"Quorum ({}): {}",
			self.threshold,
			if self.has_quorum { "reached" } else { "not reached" }
		)?;
		writeln!(f, "Voters ({}):", self.voters.len())?;
		for voter in &self.voters {
			writeln!(f, "  {} [{}] {}", voter.account, voter.weight, voter.link)?;
		}
		write!(
			f,
			"Signature: {}",
			self.signature.as_deref().unwrap_or("Indexing...")
		)
	}
}
