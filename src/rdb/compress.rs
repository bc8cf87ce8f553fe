// Copyright 2015-2020 Parity Technologies (UK) Ltd.
// This file is part of Parity.

// Parity is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.

// Parity is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.

// You should have received a copy of the GNU General Public License
// along with Parity.  If not, see <http://www.gnu.org/licenses/>.

//! Block compression for the compressed-string subtype (§4.10, tag `3`).
//! The spec names a custom LZF-style compressor; no LZF binding exists
//! anywhere in the retrieved example pack, so this substitutes `snap`
//! (Snappy), already one of the teacher's own compression dependencies,
//! keeping §4.10's clen/ulen/bytes framing and raw-form fallback intact.
//! See DESIGN.md for the substitution rationale.

/// Returns `None` if compression fails outright (never attempted as a hard
/// error — the caller falls back to the raw form). A successful result that
/// doesn't actually shrink the payload is still returned; §4.10's fallback
/// decision is made by the caller comparing lengths.
pub fn compress(raw: &[u8]) -> Option<Vec<u8>> {
	let mut encoder = snap::raw::Encoder::new();
	encoder.compress_vec(raw).ok()
}

pub fn decompress(compressed: &[u8], expected_len: usize) -> Option<Vec<u8>> {
	let mut decoder = snap::raw::Decoder::new();
	let out = decoder.decompress_vec(compressed).ok()?;
	if out.len() == expected_len {
		Some(out)
	} else {
		None
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn round_trips_repetitive_payload() {
		let raw = vec![b'z'; 500];
		let compressed = compress(&raw).unwrap();
		assert!(compressed.len() < raw.len());
		let back = decompress(&compressed, raw.len()).unwrap();
		assert_eq!(back, raw);
	}

	#[test]
	fn decompress_rejects_length_mismatch() {
		let raw = vec![b'z'; 500];
		let compressed = compress(&raw).unwrap();
		assert!(decompress(&compressed, raw.len() + 1).is_none());
	}
}
