//! Weighted committee participation derived from a signer bitvector.
use std::{fmt, str::FromStr};

use derive_more::derive::Display;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
	bitvector,
	error::{Error, Result},
};

/// Voting weight of a single committee member for one epoch.
pub type Weight = u64;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeMember {
	pub account: String,
	pub weight: Weight,
}

impl CommitteeMember {
	pub fn new(account: impl Into<String>, weight: Weight) -> Self {
		CommitteeMember {
			account: account.into(),
			weight,
		}
	}
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParticipationResult {
	/// Members whose bit is set, in committee order.
	pub voted_members: Vec<CommitteeMember>,
	pub voted_weight: u128,
	/// Sum over the whole committee, regardless of who voted.
	pub total_weight: u128,
}

impl ParticipationResult {
	/// Fraction of the total weight that voted.
	///
	/// An empty or zero-weight committee yields `NaN`, formatting is left to the consumer.
	pub fn ratio(&self) -> f64 {
		self.voted_weight as f64 / self.total_weight as f64
	}

	pub fn has_quorum(&self, threshold: &Threshold) -> bool {
		threshold.is_met(self.voted_weight, self.total_weight)
	}
}

/// Fraction of the total committee weight required to consider a record signed.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[display("{numerator}/{denominator}")]
#[serde(try_from = "String", into = "String")]
pub struct Threshold {
	numerator: u64,
	denominator: u64,
}

impl Threshold {
	pub fn new(numerator: u64, denominator: u64) -> Result<Self> {
		if denominator == 0 {
			return Err(Error::InvalidArgument(
				"Threshold denominator cannot be 0".to_string(),
			));
		}
		if numerator > denominator {
			return Err(Error::InvalidArgument(format!(
				"Threshold {numerator}/{denominator} is greater than 1"
			)));
		}
		Ok(Threshold {
			numerator,
			denominator,
		})
	}

	pub fn is_met(&self, voted_weight: u128, total_weight: u128) -> bool {
		if total_weight == 0 {
			return false;
		}
		fraction_at_least(
			(voted_weight, total_weight),
			(self.numerator as u128, self.denominator as u128),
		)
	}
}

/// Exact `a/b >= c/d` for non-zero denominators, without cross-multiplying.
///
/// Compares integer parts, then the inverted remainders, the same way a
/// continued fraction expansion proceeds.
fn fraction_at_least((mut a, mut b): (u128, u128), (mut c, mut d): (u128, u128)) -> bool {
	loop {
		let (left, right) = (a / b, c / d);
		if left != right {
			return left > right;
		}
		let (left_rem, right_rem) = (a % b, c % d);
		if right_rem == 0 {
			return true;
		}
		if left_rem == 0 {
			return false;
		}
		// left_rem/b >= right_rem/d iff d/right_rem >= b/left_rem
		(a, b, c, d) = (d, right_rem, b, left_rem);
	}
}

impl Default for Threshold {
	fn default() -> Self {
		Threshold {
			numerator: 2,
			denominator: 3,
		}
	}
}

impl FromStr for Threshold {
	type Err = Error;

	fn from_str(value: &str) -> Result<Self> {
		let parts = value
			.split('/')
			.map(|part| part.trim().parse::<u64>())
			.collect::<std::result::Result<Vec<u64>, _>>()
			.map_err(|error| Error::InvalidArgument(format!("Invalid threshold {value}: {error}")))?;

		match parts[..] {
			[numerator, denominator] => Threshold::new(numerator, denominator),
			_ => Err(Error::InvalidArgument(format!(
				"Invalid threshold {value}, expected <numerator>/<denominator>"
			))),
		}
	}
}

impl TryFrom<String> for Threshold {
	type Error = Error;

	fn try_from(value: String) -> Result<Self> {
		value.parse()
	}
}

impl From<Threshold> for String {
	fn from(value: Threshold) -> Self {
		value.to_string()
	}
}

fn tally<'a>(
	bits: &[bool],
	roster: impl Iterator<Item = (&'a str, Weight)>,
) -> ParticipationResult {
	roster
		.enumerate()
		.fold(ParticipationResult::default(), |mut result, (i, (account, weight))| {
			if bits.get(i).copied().unwrap_or(false) {
				result.voted_members.push(CommitteeMember::new(account, weight));
				result.voted_weight += weight as u128;
			}
			result.total_weight += weight as u128;
			result
		})
}

/// Computes which committee members signed and the weight they represent.
///
/// Members and weights are parallel; if their lengths differ, the shorter one wins.
/// Positions past the end of the bitvector count as not voted.
pub fn compute_participation<A: AsRef<str>>(
	encoded: Option<&str>,
	members: &[A],
	weights: &[Weight],
) -> ParticipationResult {
	if members.len() != weights.len() {
		warn!(
			members = members.len(),
			weights = weights.len(),
			"Committee roster length mismatch, truncating to the shorter list"
		);
	}

	let bits = bitvector::decode(encoded);
	let roster = members
		.iter()
		.map(|member| member.as_ref())
		.zip(weights.iter().copied());
	tally(&bits, roster)
}

/// Same as [`compute_participation`] for a roster of member and weight pairs.
pub fn compute_for_roster(encoded: Option<&str>, roster: &[CommitteeMember]) -> ParticipationResult {
	let bits = bitvector::decode(encoded);
	let roster = roster
		.iter()
		.map(|member| (member.account.as_str(), member.weight));
	tally(&bits, roster)
}

impl fmt::Display for ParticipationResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"{}/{} weight from {} voters",
			self.voted_weight,
			self.total_weight,
			self.voted_members.len()
		)
	}
}
