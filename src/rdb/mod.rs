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

//! The binary snapshot format (§4.8-§4.11, §6): magic header, per-database
//! opcode stream, value payloads, and a CRC-64 trailer.

pub mod compress;
pub mod crc64;
pub mod encoding;
pub mod reader;
pub mod writer;

use std::io::{self, Read, Write};

pub const OP_EXPIRE_S: u8 = 0xFD;
pub const OP_EXPIRE_MS: u8 = 0xFC;
pub const OP_SELECT_DB: u8 = 0xFE;
pub const OP_EOF: u8 = 0xFF;

pub const MAGIC_TAG: &[u8; 5] = b"KEYDB";

/// Writes through to `inner` while streaming every byte into a CRC-64 digest,
/// so the digest covers exactly the bytes a reader will see (magic through
/// the last value, but not the trailer itself — see §4.8 step 5).
pub struct ChecksummingWriter<W: Write> {
	inner: W,
	crc: Option<crc64::StreamingCrc64<'static>>,
}

impl<W: Write> ChecksummingWriter<W> {
	pub fn new(inner: W, enabled: bool) -> ChecksummingWriter<W> {
		ChecksummingWriter { inner, crc: if enabled { Some(crc64::StreamingCrc64::new()) } else { None } }
	}

	/// Consumes the wrapper, returning the underlying writer and the final
	/// digest (0 if checksumming was disabled, matching §4.11's "stored zero
	/// means not checksummed").
	pub fn finish(self) -> (W, u64) {
		let digest = self.crc.map(|c| c.finalize()).unwrap_or(0);
		(self.inner, digest)
	}
}

impl<W: Write> Write for ChecksummingWriter<W> {
	fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
		let n = self.inner.write(buf)?;
		if let Some(crc) = &mut self.crc {
			crc.update(&buf[..n]);
		}
		Ok(n)
	}

	fn flush(&mut self) -> io::Result<()> {
		self.inner.flush()
	}
}

/// Read-side counterpart: every byte read is mirrored into a CRC-64 digest so
/// the reader can verify the trailer without buffering the whole file.
pub struct ChecksummingReader<R: Read> {
	inner: R,
	crc: Option<crc64::StreamingCrc64<'static>>,
}

impl<R: Read> ChecksummingReader<R> {
	pub fn new(inner: R, enabled: bool) -> ChecksummingReader<R> {
		ChecksummingReader { inner, crc: if enabled { Some(crc64::StreamingCrc64::new()) } else { None } }
	}

	/// Consumes the wrapper, returning the underlying reader (positioned right
	/// after the last byte read) and the digest so far.
	pub fn finish(self) -> (R, u64) {
		let digest = self.crc.map(|c| c.finalize()).unwrap_or(0);
		(self.inner, digest)
	}
}

impl<R: Read> Read for ChecksummingReader<R> {
	fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
		let n = self.inner.read(buf)?;
		if let Some(crc) = &mut self.crc {
			crc.update(&buf[..n]);
		}
		Ok(n)
	}
}
