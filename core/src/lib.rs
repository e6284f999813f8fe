//! Committee participation accounting for the L2 block explorer.
//!
//! Decodes the signer bitvector attached to BLS aggregate signatures and
//! combines it with the committee roster of the epoch to find who signed
//! and how much weight they represent.
pub mod bitvector;
pub mod error;
pub mod network;
pub mod participation;
pub mod presentation;
pub mod types;
pub mod utils;

pub use error::{Error, Result};
pub use participation::{
	compute_for_roster, compute_participation, CommitteeMember, ParticipationResult, Threshold,
	Weight,
};
