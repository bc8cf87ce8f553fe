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

//! The `save` algorithm (§4.8): write every non-empty database, then an
//! `eof` opcode and a CRC-64 trailer, committed via create-temp-then-rename —
//! the same durability idiom the teacher uses opening `ValueTable` files
//! (`table.rs::ValueTable::open`'s `set_len`/grow-then-rename shape).

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use crate::db::Keyspace;
use crate::error::Result;
use crate::options::{Options, SNAPSHOT_FORMAT_VERSION};
use crate::rdb::{encoding, ChecksummingWriter, MAGIC_TAG, OP_EOF, OP_EXPIRE_MS, OP_SELECT_DB};
use crate::value::Object;

fn write_magic<W: Write>(w: &mut W) -> Result<()> {
	w.write_all(MAGIC_TAG)?;
	w.write_all(format!("{:04}", SNAPSHOT_FORMAT_VERSION).as_bytes())?;
	Ok(())
}

fn write_blob<W: Write>(w: &mut W, bytes: &[u8]) -> Result<()> {
	encoding::write_len(w, bytes.len() as u32)?;
	w.write_all(bytes)?;
	Ok(())
}

fn write_value_payload<W: Write>(w: &mut W, obj: &Object, opts: &Options) -> Result<()> {
	if let Some(blob) = obj.compact_bytes() {
		return write_blob(w, &blob);
	}
	use crate::value::Category;
	match obj.category() {
		Category::Str => {
			encoding::write_string(w, &obj.str_get()?, opts.compression_enabled, opts.compression_min_len)?;
		}
		Category::List => {
			let items = obj.list_range(0, -1)?;
			encoding::write_len(w, items.len() as u32)?;
			for item in items {
				encoding::write_string(w, &item, opts.compression_enabled, opts.compression_min_len)?;
			}
		}
		Category::Set => {
			let members = obj.set_members()?;
			encoding::write_len(w, members.len() as u32)?;
			for m in members {
				encoding::write_string(w, &m, opts.compression_enabled, opts.compression_min_len)?;
			}
		}
		Category::ZSet => {
			let entries = obj.zset_range_by_rank(0, -1)?;
			encoding::write_len(w, entries.len() as u32)?;
			for (member, score) in entries {
				encoding::write_string(w, &member, opts.compression_enabled, opts.compression_min_len)?;
				encoding::write_double(w, score)?;
			}
		}
		Category::Hash => {
			let entries = obj.hash_entries()?;
			encoding::write_len(w, entries.len() as u32)?;
			for (field, value) in entries {
				encoding::write_string(w, &field, opts.compression_enabled, opts.compression_min_len)?;
				encoding::write_string(w, &value, opts.compression_enabled, opts.compression_min_len)?;
			}
		}
	}
	Ok(())
}

/// Writes the full snapshot body (magic through `eof` + trailer) to `w`.
/// `now_ms` is the instant §4.8 step 4 compares deadlines against; it should
/// be captured once at save start, not re-read per key.
pub fn save<W: Write>(w: W, keyspace: &Keyspace, now_ms: u64) -> Result<()> {
	let opts = keyspace.options.clone();
	let mut cw = ChecksummingWriter::new(w, opts.checksum_enabled);
	write_magic(&mut cw)?;
	for (db_idx, database) in keyspace.iter_databases() {
		if database.is_empty() {
			continue;
		}
		cw.write_all(&[OP_SELECT_DB])?;
		encoding::write_len(&mut cw, db_idx as u32)?;
		for (key, value) in database.iter() {
			if let Some(deadline) = database.expire_of(key) {
				if deadline <= now_ms {
					continue;
				}
				cw.write_all(&[OP_EXPIRE_MS])?;
				encoding::write_u64_le(&mut cw, deadline)?;
			}
			let obj = value.borrow();
			cw.write_all(&[obj.snapshot_tag()])?;
			encoding::write_string(&mut cw, key, opts.compression_enabled, opts.compression_min_len)?;
			write_value_payload(&mut cw, &obj, &opts)?;
		}
	}
	cw.write_all(&[OP_EOF])?;
	let (mut inner, digest) = cw.finish();
	encoding::write_u64_le(&mut inner, digest)?;
	inner.flush()?;
	Ok(())
}

/// Synchronous save to a path: temp file next to `path`, `fsync`, then
/// `rename` as the commit point (§4.8 steps 1 and 6). Used directly by the
/// synchronous fallback, and by the forked child in `snapshot.rs`.
pub fn save_to_path(path: &Path, keyspace: &Keyspace, now_ms: u64, pid: u32) -> Result<()> {
	let dir = path.parent().unwrap_or_else(|| Path::new("."));
	let temp_path = dir.join(format!("temp-{}.snapshot", pid));
	{
		let file = File::create(&temp_path)?;
		save(&file, keyspace, now_ms)?;
		file.sync_all()?;
	}
	fs::rename(&temp_path, path)?;
	log::info!(target: "keydb", "snapshot written to {}", path.display());
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::Options;
	use crate::value::Object;

	fn ks() -> Keyspace {
		Keyspace::new(Options::default())
	}

	#[test]
	fn save_empty_keyspace_produces_just_magic_and_eof() {
		let mut opts = Options::default();
		opts.checksum_enabled = false;
		let k = Keyspace::new(opts);
		let mut buf = Vec::new();
		save(&mut buf, &k, 0).unwrap();
		assert_eq!(&buf[0..5], b"KEYDB");
		assert_eq!(buf.len(), 9 + 1 + 8); // magic + eof opcode + zero trailer
		assert_eq!(&buf[buf.len() - 8..], &[0u8; 8]);
	}

	#[test]
	fn save_writes_select_db_and_value_for_populated_db() {
		let mut k = ks();
		k.set(0, b"foo".to_vec(), Object::new_string(b"bar".to_vec(), &Options::default(), 0)).unwrap();
		let mut buf = Vec::new();
		save(&mut buf, &k, 0).unwrap();
		assert!(buf.len() > 14); // magic(9) + select-db + tag + key + value + eof + trailer
		assert!(buf.windows(1).any(|w| w[0] == crate::rdb::OP_SELECT_DB));
	}

	#[test]
	fn save_skips_keys_whose_deadline_has_already_passed() {
		let mut k = ks();
		k.set(0, b"k".to_vec(), Object::new_string(b"v".to_vec(), &Options::default(), 0)).unwrap();
		k.set_expire(0, b"k", 10, 0).unwrap();
		let mut buf = Vec::new();
		save(&mut buf, &k, 1000).unwrap();
		// The db is non-empty so select-db is still written (§4.8 step 3), but the
		// only key's deadline has already passed by save time, so no value follows
		// it: magic + select-db opcode + db-index byte + eof + trailer, nothing else.
		assert!(buf.iter().any(|&b| b == crate::rdb::OP_SELECT_DB));
		assert_eq!(buf.len(), 9 + 1 + 1 + 1 + 8);
	}
}
