//! Packed signer bitvectors as published by the indexer.
//!
//! Upstream encodes the set of committee members that contributed to an aggregate
//! signature as URL-safe base64 over a byte string. Logical bit `i` is bit `7 - (i % 8)`
//! of byte `i / 8`, so the most significant bit of the first byte belongs to member 0.
use base64::{
	alphabet,
	engine::{general_purpose, DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
	DecodeError, Engine,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Standard alphabet engine which accepts both padded and unpadded input,
/// and ignores non-zero bits left over in the last symbol.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
	&alphabet::STANDARD,
	GeneralPurposeConfig::new()
		.with_decode_padding_mode(DecodePaddingMode::Indifferent)
		.with_decode_allow_trailing_bits(true),
);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Malformed bitvector encoding: {0}")]
pub struct MalformedEncoding(#[from] DecodeError);

/// Raw bitvector string, kept as received so that decoding stays lenient.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedBitvector(pub String);

impl EncodedBitvector {
	pub fn as_str(&self) -> &str {
		&self.0
	}

	pub fn decode(&self) -> Vec<bool> {
		decode(Some(self.0.as_str()))
	}
}

impl From<&str> for EncodedBitvector {
	fn from(value: &str) -> Self {
		EncodedBitvector(value.to_string())
	}
}

/// Drops ASCII whitespace anywhere in the input and maps the URL-safe alphabet onto the standard one.
fn normalize(encoded: &str) -> String {
	encoded
		.chars()
		.filter(|c| !c.is_ascii_whitespace())
		.map(|c| match c {
			'-' => '+',
			'_' => '/',
			c => c,
		})
		.collect()
}

fn expand(bytes: &[u8]) -> Vec<bool> {
	bytes
		.iter()
		.flat_map(|byte| (0..8).rev().map(move |shift| (byte >> shift) & 1 == 1))
		.collect()
}

/// Decodes bitvector, failing on input that isn't valid base64 after normalization.
///
/// Padding is optional, but when present it must complete the last quantum.
pub fn try_decode(encoded: &str) -> Result<Vec<bool>, MalformedEncoding> {
	let normalized = normalize(encoded);
	if normalized.is_empty() {
		return Ok(vec![]);
	}
	if normalized.contains('=') && normalized.len() % 4 != 0 {
		return Err(DecodeError::InvalidPadding.into());
	}
	let bytes = LENIENT.decode(normalized)?;
	Ok(expand(&bytes))
}

/// Decodes bitvector into signer flags indexed by committee position.
///
/// Absent, empty or malformed input yields an empty sequence, which callers
/// treat as "nobody signed yet".
pub fn decode(encoded: Option<&str>) -> Vec<bool> {
	let Some(encoded) = encoded else {
		return vec![];
	};

	try_decode(encoded).unwrap_or_else(|error| {
		debug!(encoded, %error, "Ignoring malformed bitvector");
		vec![]
	})
}

/// Packs signer flags into bytes, most significant bit first, zero-filling the last byte.
pub fn pack(bits: &[bool]) -> Vec<u8> {
	bits.chunks(8)
		.map(|chunk| {
			chunk
				.iter()
				.enumerate()
				.filter(|(_, bit)| **bit)
				.fold(0u8, |byte, (i, _)| byte | (0x80 >> i))
		})
		.collect()
}

/// Encodes signer flags the way upstream publishes them, URL-safe and unpadded.
pub fn encode(bits: &[bool]) -> String {
	general_purpose::URL_SAFE_NO_PAD.encode(pack(bits))
}

#[cfg(test)]
mod tests {
	use super::{decode, encode, pack, try_decode, EncodedBitvector};
	use base64::{engine::general_purpose, Engine};
	use proptest::{collection, prelude::*};
	use test_case::test_case;

	fn bits(pattern: &str) -> Vec<bool> {
		pattern.chars().map(|c| c == '1').collect()
	}

	#[test]
	fn empty_input_decodes_to_nothing() {
		assert!(decode(None).is_empty());
		assert!(decode(Some("")).is_empty());
		assert!(decode(Some("   ")).is_empty());
	}

	#[test]
	fn most_significant_bit_comes_first() {
		let decoded = decode(Some("gA"));
		assert_eq!(decoded.len(), 8);
		assert!(decoded[0]);
		assert!(decoded[1..].iter().all(|bit| !bit));
	}

	#[test_case("gA" => bits("10000000") ; "single high bit")]
	#[test_case("gA==" => bits("10000000") ; "padded")]
	#[test_case("AQ" => bits("00000001") ; "single low bit")]
	#[test_case("oA" => bits("10100000") ; "alternating prefix")]
	#[test_case("_w" => bits("11111111") ; "url safe underscore")]
	#[test_case("/w" => bits("11111111") ; "standard slash")]
	#[test_case("-w" => bits("11111011") ; "url safe dash")]
	#[test_case("+w" => bits("11111011") ; "standard plus")]
	#[test_case("gB" => bits("10000000") ; "non zero trailing bits")]
	#[test_case("gAE" => bits("1000000000000001") ; "two bytes")]
	#[test_case("g A" => bits("10000000") ; "inner space")]
	#[test_case(" gA\n" => bits("10000000") ; "surrounding whitespace")]
	#[test_case("gA\r\n==" => bits("10000000") ; "line break before padding")]
	fn decode_known_vectors(encoded: &str) -> Vec<bool> {
		decode(Some(encoded))
	}

	#[test_case("not base64!" ; "invalid characters")]
	#[test_case("g" ; "impossible length")]
	#[test_case("g*A" ; "symbol outside both alphabets")]
	#[test_case("gA=" ; "incomplete padding")]
	#[test_case("gA===" ; "excess padding")]
	fn malformed_input_degrades_to_empty(encoded: &str) {
		assert!(try_decode(encoded).is_err());
		assert!(decode(Some(encoded)).is_empty());
	}

	#[test]
	fn pack_fills_from_most_significant_bit() {
		assert_eq!(pack(&bits("1")), vec![0x80]);
		assert_eq!(pack(&bits("000000011")), vec![0x01, 0x80]);
		assert!(pack(&[]).is_empty());
	}

	#[test_case(&[] => "" ; "no bits")]
	#[test_case(&[true, false, true] => "oA" ; "partial byte")]
	#[test_case(&[true; 8] => "_w" ; "full byte uses url safe alphabet")]
	fn encode_known_vectors(flags: &[bool]) -> String {
		encode(flags)
	}

	#[test]
	fn encoded_bitvector_deserializes_from_plain_string() {
		let bv: EncodedBitvector = serde_json::from_str("\"oA\"").unwrap();
		assert_eq!(bv.as_str(), "oA");
		assert_eq!(bv.decode(), bits("10100000"));
	}

	proptest! {
		#[test]
		fn decoded_length_is_eight_bits_per_byte(bytes in collection::vec(any::<u8>(), 0..128)) {
			let encoded = general_purpose::URL_SAFE_NO_PAD.encode(&bytes);
			prop_assert_eq!(decode(Some(encoded.as_str())).len(), 8 * bytes.len());
		}

		#[test]
		fn alphabets_and_padding_are_interchangeable(bytes in collection::vec(any::<u8>(), 0..64)) {
			let url_safe = general_purpose::URL_SAFE_NO_PAD.encode(&bytes);
			let standard = general_purpose::STANDARD.encode(&bytes);
			prop_assert_eq!(decode(Some(url_safe.as_str())), decode(Some(standard.as_str())));
		}

		#[test]
		fn encode_then_decode_keeps_prefix(flags in collection::vec(any::<bool>(), 0..256)) {
			let decoded = decode(Some(encode(&flags).as_str()));
			prop_assert_eq!(decoded.len(), flags.len().div_ceil(8) * 8);
			prop_assert_eq!(&decoded[..flags.len()], &flags[..]);
			prop_assert!(decoded[flags.len()..].iter().all(|bit| !bit));
		}
	}
}
