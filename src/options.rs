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

//! Tunables governing encoding promotion thresholds, database count and the
//! snapshot codec. Mirrors the role of the teacher's `options::ColumnOptions`.

/// Current snapshot format version, written zero-padded into the 9-byte magic.
pub const SNAPSHOT_FORMAT_VERSION: u32 = 7;
/// Oldest format version this reader will still load.
pub const SNAPSHOT_FORMAT_MIN_SUPPORTED: u32 = 5;

#[derive(Clone, Debug)]
pub struct Options {
	/// Number of independent logical databases selected by index.
	pub dbnum: usize,

	/// Above this many entries a list is promoted from packed sequence to linked list.
	pub list_max_ziplist_entries: usize,
	/// Above this entry byte length a list is promoted to linked list.
	pub list_max_ziplist_value: usize,

	/// Above this many entries an all-integer set is promoted to a hash-table set.
	pub set_max_intset_entries: usize,

	/// Above this many entries an ordered set is promoted from packed sequence to skiplist.
	pub zset_max_ziplist_entries: usize,
	/// Above this member byte length an ordered set is promoted to skiplist.
	pub zset_max_ziplist_value: usize,

	/// Above this many entries a hash is promoted from packed sequence to hash-table.
	pub hash_max_ziplist_entries: usize,
	/// Above this field/value byte length a hash is promoted to hash-table.
	pub hash_max_ziplist_value: usize,

	/// Above this byte length a string is promoted from inline/integer-immediate to raw bytes.
	pub string_inline_cap: usize,

	/// Whether `save` computes and verifies a CRC-64 trailer.
	pub checksum_enabled: bool,
	/// Whether `save` attempts block compression on long strings.
	pub compression_enabled: bool,
	/// Strings shorter than or equal to this are never compressed (mirrors §4.10's "length > 20").
	pub compression_min_len: usize,
}

impl Default for Options {
	fn default() -> Options {
		Options {
			dbnum: 16,
			list_max_ziplist_entries: 128,
			list_max_ziplist_value: 64,
			set_max_intset_entries: 512,
			zset_max_ziplist_entries: 128,
			zset_max_ziplist_value: 64,
			hash_max_ziplist_entries: 128,
			hash_max_ziplist_value: 64,
			string_inline_cap: 44,
			checksum_enabled: true,
			compression_enabled: true,
			compression_min_len: 20,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_sane() {
		let o = Options::default();
		assert!(o.dbnum > 0);
		assert!(o.list_max_ziplist_entries > 0);
		assert!(o.compression_min_len == 20);
	}
}
