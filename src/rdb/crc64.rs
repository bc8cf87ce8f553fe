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

//! Streaming CRC-64 for the snapshot's end-of-file trailer (§4.8, §6). Takes
//! over the role the teacher's `crc32fast::Hasher` plays around `table.rs`'s
//! page checksums, upgraded to a 64-bit digest since the trailer is specified
//! as CRC-64.

use crc::{Crc, Digest, CRC_64_XZ};

static CRC64: Crc<u64> = Crc::<u64>::new(&CRC_64_XZ);

pub struct StreamingCrc64<'a> {
	digest: Digest<'a, u64>,
}

impl<'a> StreamingCrc64<'a> {
	pub fn new() -> StreamingCrc64<'a> {
		StreamingCrc64 { digest: CRC64.digest() }
	}

	pub fn update(&mut self, bytes: &[u8]) {
		self.digest.update(bytes);
	}

	pub fn finalize(self) -> u64 {
		self.digest.finalize()
	}
}

impl<'a> Default for StreamingCrc64<'a> {
	fn default() -> StreamingCrc64<'a> {
		StreamingCrc64::new()
	}
}

pub fn checksum(bytes: &[u8]) -> u64 {
	CRC64.checksum(bytes)
}
