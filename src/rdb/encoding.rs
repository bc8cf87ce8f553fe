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

//! Wire-level length/string/double encoding for the snapshot codec (§4.10).
//! Generalizes `table.rs`'s fixed-width `read_slice`/`write_slice` cursor
//! idiom to the spec's variable-width prefix-bit scheme.

use std::convert::TryInto;
use std::io::{self, Read, Write};

use crate::error::{Error, Result};
use crate::rdb::compress;

const LEN_6BIT: u8 = 0b00;
const LEN_14BIT: u8 = 0b01;
const LEN_32BIT: u8 = 0b10;
const LEN_SPECIAL: u8 = 0b11;

const ENC_INT8: u8 = 0;
const ENC_INT16: u8 = 1;
const ENC_INT32: u8 = 2;
const ENC_COMPRESSED: u8 = 3;

/// Either a plain length, or one of the "special" string subtypes that the
/// top two bits of the prefix byte select between (§4.10).
pub enum LenOrEncoding {
	Len(u32),
	Int8,
	Int16,
	Int32,
	Compressed,
}

pub fn write_len<W: Write>(w: &mut W, len: u32) -> Result<()> {
	if len < 0x40 {
		w.write_all(&[(LEN_6BIT << 6) | (len as u8)])?;
	} else if len < 0x4000 {
		let hi = (LEN_14BIT << 6) | ((len >> 8) as u8 & 0x3F);
		w.write_all(&[hi, (len & 0xFF) as u8])?;
	} else {
		w.write_all(&[LEN_32BIT << 6])?;
		w.write_all(&len.to_be_bytes())?;
	}
	Ok(())
}

pub fn read_len_or_encoding<R: Read>(r: &mut R) -> Result<LenOrEncoding> {
	let mut first = [0u8; 1];
	r.read_exact(&mut first)?;
	let tag = first[0] >> 6;
	match tag {
		t if t == LEN_6BIT => Ok(LenOrEncoding::Len((first[0] & 0x3F) as u32)),
		t if t == LEN_14BIT => {
			let mut next = [0u8; 1];
			r.read_exact(&mut next)?;
			let len = (((first[0] & 0x3F) as u32) << 8) | next[0] as u32;
			Ok(LenOrEncoding::Len(len))
		}
		t if t == LEN_32BIT => {
			let mut buf = [0u8; 4];
			r.read_exact(&mut buf)?;
			Ok(LenOrEncoding::Len(u32::from_be_bytes(buf)))
		}
		t if t == LEN_SPECIAL => match first[0] & 0x3F {
			ENC_INT8 => Ok(LenOrEncoding::Int8),
			ENC_INT16 => Ok(LenOrEncoding::Int16),
			ENC_INT32 => Ok(LenOrEncoding::Int32),
			ENC_COMPRESSED => Ok(LenOrEncoding::Compressed),
			other => Err(Error::FormatUnsupported(other as u32)),
		},
		_ => unreachable!("only two bits of tag space exist"),
	}
}

fn canonical_int(bytes: &[u8]) -> Option<i64> {
	if bytes.is_empty() || bytes.len() > 20 {
		return None;
	}
	let s = std::str::from_utf8(bytes).ok()?;
	let n: i64 = s.parse().ok()?;
	if n.to_string() == s {
		Some(n)
	} else {
		None
	}
}

/// Writes a string: integer fast-path, then (if enabled) compression, else
/// the raw length-prefixed form (§4.10).
pub fn write_string<W: Write>(w: &mut W, bytes: &[u8], compression_enabled: bool, compression_min_len: usize) -> Result<()> {
	if let Some(n) = canonical_int(bytes) {
		if let Ok(v) = i8::try_from(n) {
			w.write_all(&[(LEN_SPECIAL << 6) | ENC_INT8, v as u8])?;
			return Ok(());
		} else if let Ok(v) = i16::try_from(n) {
			w.write_all(&[(LEN_SPECIAL << 6) | ENC_INT16])?;
			w.write_all(&v.to_le_bytes())?;
			return Ok(());
		} else if let Ok(v) = i32::try_from(n) {
			w.write_all(&[(LEN_SPECIAL << 6) | ENC_INT32])?;
			w.write_all(&v.to_le_bytes())?;
			return Ok(());
		}
	}
	if compression_enabled && bytes.len() > compression_min_len {
		if let Some(compressed) = compress::compress(bytes) {
			if compressed.len() < bytes.len() {
				w.write_all(&[(LEN_SPECIAL << 6) | ENC_COMPRESSED])?;
				write_len(w, compressed.len() as u32)?;
				write_len(w, bytes.len() as u32)?;
				w.write_all(&compressed)?;
				return Ok(());
			}
		}
	}
	write_len(w, bytes.len() as u32)?;
	w.write_all(bytes)?;
	Ok(())
}

/// Reads a plain length-prefixed blob (§4.9's compact-encoding opaque byte
/// buffers), the inverse of `writer::write_blob`. Unlike `read_string` this
/// never dispatches on the integer/compression special encodings — a compact
/// blob's own bytes decide that, not the outer length prefix.
pub fn read_blob<R: Read>(r: &mut R) -> Result<Vec<u8>> {
	match read_len_or_encoding(r)? {
		LenOrEncoding::Len(len) => {
			let mut buf = vec![0u8; len as usize];
			r.read_exact(&mut buf)?;
			Ok(buf)
		}
		_ => Err(Error::Syntax("expected a plain length for a compact-encoding blob".into())),
	}
}

pub fn read_string<R: Read>(r: &mut R) -> Result<Vec<u8>> {
	match read_len_or_encoding(r)? {
		LenOrEncoding::Len(len) => {
			let mut buf = vec![0u8; len as usize];
			r.read_exact(&mut buf)?;
			Ok(buf)
		}
		LenOrEncoding::Int8 => {
			let mut buf = [0u8; 1];
			r.read_exact(&mut buf)?;
			Ok((buf[0] as i8).to_string().into_bytes())
		}
		LenOrEncoding::Int16 => {
			let mut buf = [0u8; 2];
			r.read_exact(&mut buf)?;
			Ok(i16::from_le_bytes(buf).to_string().into_bytes())
		}
		LenOrEncoding::Int32 => {
			let mut buf = [0u8; 4];
			r.read_exact(&mut buf)?;
			Ok(i32::from_le_bytes(buf).to_string().into_bytes())
		}
		LenOrEncoding::Compressed => {
			let clen = match read_len_or_encoding(r)? {
				LenOrEncoding::Len(l) => l as usize,
				_ => return Err(Error::Syntax("expected a plain length for compressed-string clen".into())),
			};
			let ulen = match read_len_or_encoding(r)? {
				LenOrEncoding::Len(l) => l as usize,
				_ => return Err(Error::Syntax("expected a plain length for compressed-string ulen".into())),
			};
			let mut compressed = vec![0u8; clen];
			r.read_exact(&mut compressed)?;
			compress::decompress(&compressed, ulen).ok_or_else(|| Error::Syntax("corrupt compressed string block".into()))
		}
	}
}

const DOUBLE_NAN: u8 = 253;
const DOUBLE_POS_INF: u8 = 254;
const DOUBLE_NEG_INF: u8 = 255;

/// One length byte followed by that many ASCII bytes at 17-digit precision,
/// or one of the three sentinel length values for NaN/+inf/-inf (§4.10).
pub fn write_double<W: Write>(w: &mut W, value: f64) -> Result<()> {
	if value.is_nan() {
		w.write_all(&[DOUBLE_NAN])?;
	} else if value.is_infinite() && value > 0.0 {
		w.write_all(&[DOUBLE_POS_INF])?;
	} else if value.is_infinite() {
		w.write_all(&[DOUBLE_NEG_INF])?;
	} else {
		let text = format!("{:.17}", value);
		w.write_all(&[text.len() as u8])?;
		w.write_all(text.as_bytes())?;
	}
	Ok(())
}

pub fn read_double<R: Read>(r: &mut R) -> Result<f64> {
	let mut len = [0u8; 1];
	r.read_exact(&mut len)?;
	match len[0] {
		DOUBLE_NAN => Ok(f64::NAN),
		DOUBLE_POS_INF => Ok(f64::INFINITY),
		DOUBLE_NEG_INF => Ok(f64::NEG_INFINITY),
		n => {
			let mut buf = vec![0u8; n as usize];
			r.read_exact(&mut buf)?;
			let s = std::str::from_utf8(&buf).map_err(|_| Error::Syntax("double payload is not valid utf-8".into()))?;
			s.parse::<f64>().map_err(|_| Error::Syntax(format!("malformed double literal {:?}", s)))
		}
	}
}

pub fn write_u64_le<W: Write>(w: &mut W, v: u64) -> io::Result<()> {
	w.write_all(&v.to_le_bytes())
}

pub fn read_u64_le<R: Read>(r: &mut R) -> io::Result<u64> {
	let mut buf = [0u8; 8];
	r.read_exact(&mut buf)?;
	Ok(u64::from_le_bytes(buf))
}

pub fn read_u32_be(buf: &[u8]) -> u32 {
	u32::from_be_bytes(buf[0..4].try_into().unwrap())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn length_round_trips_across_width_boundaries() {
		for len in [0u32, 1, 63, 64, 16383, 16384, 70000] {
			let mut buf = Vec::new();
			write_len(&mut buf, len).unwrap();
			let mut cur = &buf[..];
			match read_len_or_encoding(&mut cur).unwrap() {
				LenOrEncoding::Len(got) => assert_eq!(got, len),
				_ => panic!("expected a length"),
			}
		}
	}

	#[test]
	fn integer_string_fast_path_round_trips() {
		for n in [0i64, 127, -128, 30000, -30000, 2_000_000_000, -2_000_000_000] {
			let text = n.to_string();
			let mut buf = Vec::new();
			write_string(&mut buf, text.as_bytes(), false, 20).unwrap();
			let mut cur = &buf[..];
			let got = read_string(&mut cur).unwrap();
			assert_eq!(got, text.into_bytes());
		}
	}

	#[test]
	fn non_integer_string_round_trips_without_compression() {
		let mut buf = Vec::new();
		write_string(&mut buf, b"hello world", false, 20).unwrap();
		let mut cur = &buf[..];
		assert_eq!(read_string(&mut cur).unwrap(), b"hello world");
	}

	#[test]
	fn long_repetitive_string_round_trips_through_compression() {
		let payload = vec![b'a'; 200];
		let mut buf = Vec::new();
		write_string(&mut buf, &payload, true, 20).unwrap();
		let mut cur = &buf[..];
		assert_eq!(read_string(&mut cur).unwrap(), payload);
	}

	#[test]
	fn double_round_trip_including_sentinels() {
		for v in [0.0, 1.5, -1.5, 3.14159265358979, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
			let mut buf = Vec::new();
			write_double(&mut buf, v).unwrap();
			let mut cur = &buf[..];
			let got = read_double(&mut cur).unwrap();
			if v.is_nan() {
				assert!(got.is_nan());
			} else {
				assert_eq!(got, v);
			}
		}
	}
}
