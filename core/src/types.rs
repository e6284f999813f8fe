//! Shared explorer structs and enums, and the upstream payloads they are extracted from.
use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::{
	bitvector::EncodedBitvector,
	error::{Error, Result},
	participation::{compute_participation, ParticipationResult, Weight},
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElectionMember {
	/// L1 account name or DID of the member.
	pub account: String,
	/// BLS public key, not used for accounting.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub key: Option<String>,
}

/// Committee elected for one epoch, with weights parallel to members.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitteeSnapshot {
	pub epoch: u64,
	pub members: Vec<ElectionMember>,
	#[serde(with = "weight_list_format")]
	pub weights: Vec<Weight>,
}

impl CommitteeSnapshot {
	pub fn accounts(&self) -> Vec<&str> {
		self.members
			.iter()
			.map(|member| member.account.as_str())
			.collect()
	}

	pub fn participation(&self, bv: Option<&EncodedBitvector>) -> ParticipationResult {
		compute_participation(
			bv.map(EncodedBitvector::as_str),
			&self.accounts(),
			&self.weights,
		)
	}
}

/// BLS aggregate signature as published by the indexer.
///
/// Both parts are missing while the record is still being indexed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateSignature {
	/// Opaque aggregate signature, displayed as is.
	pub sig: Option<String>,
	/// Signer bitvector indexed by committee position.
	pub bv: Option<EncodedBitvector>,
}

/// Record co-signed by a committee.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SignedRecord {
	Block {
		height: u64,
		id: String,
		#[serde(default)]
		signature: AggregateSignature,
		committee: CommitteeSnapshot,
	},
	Epoch {
		epoch: u64,
		#[serde(default)]
		signature: AggregateSignature,
		committee: CommitteeSnapshot,
	},
}

impl SignedRecord {
	pub fn signature(&self) -> &AggregateSignature {
		match self {
			SignedRecord::Block { signature, .. } => signature,
			SignedRecord::Epoch { signature, .. } => signature,
		}
	}

	pub fn committee(&self) -> &CommitteeSnapshot {
		match self {
			SignedRecord::Block { committee, .. } => committee,
			SignedRecord::Epoch { committee, .. } => committee,
		}
	}

	pub fn participation(&self) -> ParticipationResult {
		self.committee().participation(self.signature().bv.as_ref())
	}
}

impl Display for SignedRecord {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			SignedRecord::Block { height, id, .. } => write!(f, "block {height} ({id})"),
			SignedRecord::Epoch { epoch, .. } => write!(f, "epoch {epoch}"),
		}
	}
}

impl TryFrom<serde_json::Value> for SignedRecord {
	type Error = Error;

	fn try_from(value: serde_json::Value) -> Result<Self> {
		Ok(serde_json::from_value(value)?)
	}
}

/// Parses a signed record, rejecting payloads of the wrong shape as invalid arguments.
pub fn parse_record(json: &str) -> Result<SignedRecord> {
	Ok(serde_json::from_str(json)?)
}

/// Weights arrive either as JSON numbers or as decimal strings.
pub mod weight_list_format {
	use crate::participation::Weight;
	use serde::{self, de::Error, Deserialize, Deserializer, Serialize, Serializer};

	#[derive(Deserialize)]
	#[serde(untagged)]
	enum RawWeight {
		Number(Weight),
		Text(String),
	}

	pub fn serialize<S>(weights: &[Weight], serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		weights.serialize(serializer)
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Weight>, D::Error>
	where
		D: Deserializer<'de>,
	{
		Vec::<RawWeight>::deserialize(deserializer)?
			.into_iter()
			.map(|raw| match raw {
				RawWeight::Number(weight) => Ok(weight),
				RawWeight::Text(text) => text
					.trim()
					.parse::<Weight>()
					.map_err(|error| D::Error::custom(format!("Invalid weight {text:?}: {error}"))),
			})
			.collect()
	}
}

pub mod tracing_level_format {
	use serde::{self, Deserialize, Deserializer, Serializer};
	use std::str::FromStr;
	use tracing::Level;

	pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&level.to_string())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
	where
		D: Deserializer<'de>,
	{
		let value = String::deserialize(deserializer)?;
		Level::from_str(&value).map_err(serde::de::Error::custom)
	}
}

#[cfg(test)]
mod tests {
	use super::{parse_record, AggregateSignature, SignedRecord};
	use crate::{error::Error, participation::CommitteeMember};
	use serde_json::json;
	use std::fs;
	use test_case::test_case;

	fn committee() -> serde_json::Value {
		json!({
			"epoch": 12,
			"members": [
				{ "account": "alice", "key": "a1" },
				{ "account": "bob" },
				{ "account": "carol" }
			],
			"weights": [10, "20", 30]
		})
	}

	#[test]
	fn block_record_participation() {
		let record = SignedRecord::try_from(json!({
			"type": "block",
			"height": 4821,
			"id": "bafyreib",
			"signature": { "sig": "qZ3x", "bv": "oA" },
			"committee": committee()
		}))
		.unwrap();

		assert_eq!(record.to_string(), "block 4821 (bafyreib)");
		assert_eq!(record.signature().sig.as_deref(), Some("qZ3x"));

		let result = record.participation();
		assert_eq!(
			result.voted_members,
			vec![
				CommitteeMember::new("alice", 10),
				CommitteeMember::new("carol", 30)
			]
		);
		assert_eq!(result.voted_weight, 40);
		assert_eq!(result.total_weight, 60);
	}

	#[test]
	fn missing_signature_means_nobody_voted() {
		let record = SignedRecord::try_from(json!({
			"type": "epoch",
			"epoch": 13,
			"committee": committee()
		}))
		.unwrap();

		assert_eq!(record.signature(), &AggregateSignature::default());
		let result = record.participation();
		assert!(result.voted_members.is_empty());
		assert_eq!(result.total_weight, 60);
	}

	#[test]
	fn null_bitvector_is_accepted() {
		let record = SignedRecord::try_from(json!({
			"type": "epoch",
			"epoch": 13,
			"signature": { "sig": null, "bv": null },
			"committee": committee()
		}))
		.unwrap();
		assert_eq!(record.participation().voted_weight, 0);
	}

	#[test_case(json!({ "type": "epoch", "epoch": 1, "signature": { "bv": 42 }, "committee": committee() }) ; "numeric bitvector")]
	#[test_case(json!({ "type": "epoch", "epoch": 1, "committee": { "epoch": 1, "members": "alice", "weights": [] } }) ; "members not a list")]
	#[test_case(json!({ "type": "epoch", "epoch": 1, "committee": { "epoch": 1, "members": [], "weights": ["ten"] } }) ; "non numeric weight")]
	#[test_case(json!({ "type": "epoch", "epoch": 1, "committee": { "epoch": 1, "members": [], "weights": [-1] } }) ; "negative weight")]
	#[test_case(json!({ "type": "transfer", "epoch": 1, "committee": committee() }) ; "unknown record type")]
	#[test_case(json!("oA") ; "not an object")]
	fn wrong_shapes_are_invalid_arguments(value: serde_json::Value) {
		match SignedRecord::try_from(value) {
			Err(Error::InvalidArgument(_)) => {},
			Ok(record) => panic!("Record should have been rejected: {record:?}"),
		}
	}

	#[test_case("src/test_assets/block_signed.json" => (3, 2_250, 3_000) ; "signed block")]
	#[test_case("src/test_assets/epoch_indexing.json" => (0, 0, 1_500) ; "epoch still indexing")]
	#[test_case("src/test_assets/block_roster_mismatch.json" => (2, 300, 300) ; "roster mismatch")]
	fn participation_from_fixture(path: &str) -> (usize, u128, u128) {
		let json = fs::read_to_string(path).unwrap();
		let result = parse_record(&json).unwrap().participation();
		(
			result.voted_members.len(),
			result.voted_weight,
			result.total_weight,
		)
	}
}
