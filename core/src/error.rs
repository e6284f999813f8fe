use thiserror::Error;

/// Failures surfaced by the core.
///
/// Incomplete upstream data (absent or malformed bitvectors, mismatched rosters)
/// is absorbed where it is found and never ends up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),
}

impl From<serde_json::Error> for Error {
	fn from(error: serde_json::Error) -> Self {
		Error::InvalidArgument(error.to_string())
	}
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
