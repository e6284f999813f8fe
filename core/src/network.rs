use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Backend deployments the explorer can be pointed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum, Display, Serialize, Deserialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Network {
	Local,
	Testnet,
	Mainnet,
}

impl Network {
	/// REST/RPC indexer base URL.
	pub fn indexer_url(&self) -> &str {
		match self {
			Network::Local => "http://127.0.0.1:1337/api/v1",
			Network::Testnet => "https://api.testnet.l2scan.io/api/v1",
			Network::Mainnet => "https://api.l2scan.io/api/v1",
		}
	}

	pub fn graphql_url(&self) -> &str {
		match self {
			Network::Local => "http://127.0.0.1:8080/api/v1/graphql",
			Network::Testnet => "https://node.testnet.l2scan.io/api/v1/graphql",
			Network::Mainnet => "https://node.l2scan.io/api/v1/graphql",
		}
	}

	/// Contract verification service base URL.
	pub fn verifier_url(&self) -> &str {
		match self {
			Network::Local => "http://127.0.0.1:3000",
			Network::Testnet => "https://verifier.testnet.l2scan.io",
			Network::Mainnet => "https://verifier.l2scan.io",
		}
	}

	/// Base URL used to link accounts and records.
	pub fn explorer_url(&self) -> &str {
		match self {
			Network::Local => "http://127.0.0.1:5173",
			Network::Testnet => "https://testnet.l2scan.io",
			Network::Mainnet => "https://l2scan.io",
		}
	}
}
