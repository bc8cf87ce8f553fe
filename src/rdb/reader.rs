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

//! The `load` algorithm (§4.11): the inverse of `writer::save`. A corrupt or
//! truncated snapshot is unrecoverable (§7) — every error here is fatal and
//! left for the caller to decide what to do about (the teacher's
//! `table.rs::ValueTable::open` takes the same stance on a torn page).

use std::cell::RefCell;
use std::io::Read;
use std::rc::Rc;

use crate::db::Keyspace;
use crate::error::{Error, Result};
use crate::options::{SNAPSHOT_FORMAT_MIN_SUPPORTED, SNAPSHOT_FORMAT_VERSION};
use crate::rdb::encoding::{self, LenOrEncoding};
use crate::rdb::{ChecksummingReader, MAGIC_TAG, OP_EOF, OP_EXPIRE_MS, OP_EXPIRE_S, OP_SELECT_DB};
use crate::replication::Role;
use crate::value::Object;

/// A legacy on-disk hash representation (zipmap) that no retrieved source
/// ever specifies the byte layout for; §4.11 gives it a tag but not a codec,
/// so a snapshot containing it is rejected rather than guessed at.
const TAG_HASH_ZIPMAP_LEGACY: u8 = 9;

fn read_value(r: &mut impl Read, tag: u8, now_ms: u64, opts: &crate::options::Options) -> Result<Object> {
	match tag {
		0 => {
			let bytes = encoding::read_string(r)?;
			Ok(Object::new_string(bytes, opts, now_ms))
		}
		1 => {
			let n = read_count(r)?;
			let mut items = Vec::with_capacity(n);
			for _ in 0..n {
				items.push(encoding::read_string(r)?);
			}
			Ok(Object::from_list_expanded(items, now_ms))
		}
		2 => {
			let n = read_count(r)?;
			let mut members = Vec::with_capacity(n);
			for _ in 0..n {
				members.push(encoding::read_string(r)?);
			}
			Ok(Object::from_set_expanded(members, now_ms))
		}
		3 => {
			let n = read_count(r)?;
			let mut entries = Vec::with_capacity(n);
			for _ in 0..n {
				let member = encoding::read_string(r)?;
				let score = encoding::read_double(r)?;
				entries.push((member, score));
			}
			Ok(Object::from_zset_expanded(entries, now_ms))
		}
		4 => {
			let n = read_count(r)?;
			let mut entries = Vec::with_capacity(n);
			for _ in 0..n {
				let field = encoding::read_string(r)?;
				let value = encoding::read_string(r)?;
				entries.push((field, value));
			}
			Ok(Object::from_hash_expanded(entries, now_ms))
		}
		TAG_HASH_ZIPMAP_LEGACY => Err(Error::FormatUnsupported(TAG_HASH_ZIPMAP_LEGACY as u32)),
		10 | 11 | 12 | 13 => {
			let blob = encoding::read_blob(r)?;
			Object::from_compact(tag, blob, now_ms)
		}
		other => Err(Error::FormatUnsupported(other as u32)),
	}
}

fn read_count(r: &mut impl Read) -> Result<usize> {
	match encoding::read_len_or_encoding(r)? {
		LenOrEncoding::Len(n) => Ok(n as usize),
		_ => Err(Error::Syntax("expected a plain length for a collection count".into())),
	}
}

fn read_db_index(r: &mut impl Read) -> Result<usize> {
	match encoding::read_len_or_encoding(r)? {
		LenOrEncoding::Len(n) => Ok(n as usize),
		_ => Err(Error::Syntax("expected a plain length for a select-db index".into())),
	}
}

/// Loads a snapshot produced by `writer::save` into `keyspace`, replacing
/// whatever databases it names. `now_ms` is compared against stored
/// deadlines exactly as §4.11 step 4 describes: a leader drops an
/// already-past key instead of loading it; a follower loads it anyway and
/// waits for lazy expiration or the leader's propagated DEL.
pub fn load<R: Read>(r: R, keyspace: &mut Keyspace, now_ms: u64) -> Result<()> {
	keyspace.snapshot_loading = true;
	let result = load_inner(r, keyspace, now_ms);
	keyspace.snapshot_loading = false;
	result
}

fn load_inner<R: Read>(r: R, keyspace: &mut Keyspace, now_ms: u64) -> Result<()> {
	let checksum_enabled = keyspace.options.checksum_enabled;
	let mut cr = ChecksummingReader::new(r, checksum_enabled);

	let mut magic = [0u8; 9];
	cr.read_exact(&mut magic)?;
	if &magic[0..5] != MAGIC_TAG {
		return Err(Error::Syntax("missing magic header".into()));
	}
	let version_str = std::str::from_utf8(&magic[5..9]).map_err(|_| Error::Syntax("malformed version field".into()))?;
	let version: u32 = version_str.parse().map_err(|_| Error::Syntax("malformed version field".into()))?;
	if version < SNAPSHOT_FORMAT_MIN_SUPPORTED || version > SNAPSHOT_FORMAT_VERSION {
		return Err(Error::FormatUnsupported(version));
	}

	let opts = keyspace.options.clone();
	let mut current_db = 0usize;
	let mut pending_deadline: Option<u64> = None;

	loop {
		let mut opcode = [0u8; 1];
		cr.read_exact(&mut opcode)?;
		match opcode[0] {
			OP_EOF => break,
			OP_SELECT_DB => {
				current_db = read_db_index(&mut cr)?;
				pending_deadline = None;
			}
			OP_EXPIRE_MS => {
				pending_deadline = Some(encoding::read_u64_le(&mut cr)?);
			}
			OP_EXPIRE_S => {
				let seconds = encoding::read_u64_le(&mut cr)?;
				pending_deadline = Some(seconds.saturating_mul(1000));
			}
			tag => {
				let key = encoding::read_string(&mut cr)?;
				let obj = read_value(&mut cr, tag, now_ms, &opts)?;
				let deadline = pending_deadline.take();
				let drop_key = match deadline {
					Some(d) => keyspace.role == Role::Leader && d <= now_ms,
					None => false,
				};
				if !drop_key {
					let cell = Rc::new(RefCell::new(obj));
					keyspace.db_for_load(current_db)?.load_insert(key, cell, deadline);
				}
			}
		}
	}

	let (mut inner, computed) = cr.finish();
	let stored = encoding::read_u64_le(&mut inner)?;
	if checksum_enabled && stored != 0 && stored != computed {
		return Err(Error::ChecksumMismatch);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::db::Keyspace;
	use crate::options::Options;
	use crate::rdb::writer::save;
	use crate::value::Object;

	fn roundtrip(k: &Keyspace, now_ms: u64) -> Keyspace {
		let mut buf = Vec::new();
		save(&mut buf, k, now_ms).unwrap();
		let mut loaded = Keyspace::new(k.options.clone());
		load(&buf[..], &mut loaded, now_ms).unwrap();
		loaded
	}

	#[test]
	fn empty_keyspace_round_trips() {
		let k = Keyspace::new(Options::default());
		let loaded = roundtrip(&k, 0);
		assert_eq!(loaded.dbnum(), k.dbnum());
		assert_eq!(loaded.db(0).unwrap().len(), 0);
	}

	#[test]
	fn string_value_round_trips() {
		let mut k = Keyspace::new(Options::default());
		k.set(0, b"foo".to_vec(), Object::new_string(b"bar".to_vec(), &Options::default(), 0)).unwrap();
		let mut loaded = roundtrip(&k, 0);
		let cell = loaded.lookup_read(0, b"foo", 0).unwrap().unwrap();
		assert_eq!(cell.borrow().str_get().unwrap(), b"bar".to_vec());
	}

	#[test]
	fn hash_round_trip_preserves_insertion_order() {
		let mut k = Keyspace::new(Options::default());
		k.set(0, b"h".to_vec(), Object::new_hash(0)).unwrap();
		{
			let cell = k.lookup_write_unique(0, b"h", 0).unwrap().unwrap();
			let mut obj = cell.borrow_mut();
			obj.hash_set_field(b"a".to_vec(), b"1".to_vec(), &k.options).unwrap();
			obj.hash_set_field(b"b".to_vec(), b"2".to_vec(), &k.options).unwrap();
			obj.hash_set_field(b"c".to_vec(), b"3".to_vec(), &k.options).unwrap();
		}
		let mut loaded = roundtrip(&k, 0);
		let cell = loaded.lookup_read(0, b"h", 0).unwrap().unwrap();
		let keys = cell.borrow().hash_keys().unwrap();
		assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
	}

	#[test]
	fn expired_key_is_dropped_on_load_for_a_leader() {
		let mut k = Keyspace::new(Options::default());
		k.set(0, b"k".to_vec(), Object::new_string(b"v".to_vec(), &Options::default(), 0)).unwrap();
		k.set_expire(0, b"k", 10, 0).unwrap();
		let mut buf = Vec::new();
		save(&mut buf, &k, 5).unwrap(); // not yet past at save time, still written
		let mut loaded = Keyspace::new(k.options.clone());
		load(&buf[..], &mut loaded, 1000).unwrap(); // past by load time
		assert!(loaded.lookup_read(0, b"k", 1000).unwrap().is_none());
	}

	#[test]
	fn follower_keeps_an_already_expired_key_on_load() {
		let mut k = Keyspace::new(Options::default());
		k.set(0, b"k".to_vec(), Object::new_string(b"v".to_vec(), &Options::default(), 0)).unwrap();
		k.set_expire(0, b"k", 10, 0).unwrap();
		let mut buf = Vec::new();
		save(&mut buf, &k, 5).unwrap();
		let mut loaded = Keyspace::new(k.options.clone());
		loaded.role = Role::Follower;
		load(&buf[..], &mut loaded, 1000).unwrap();
		assert!(loaded.lookup_read(0, b"k", 1000).unwrap().is_some());
	}

	#[test]
	fn truncated_payload_is_a_fatal_error() {
		let mut k = Keyspace::new(Options::default());
		k.set(0, b"foo".to_vec(), Object::new_string(b"bar".to_vec(), &Options::default(), 0)).unwrap();
		let mut buf = Vec::new();
		save(&mut buf, &k, 0).unwrap();
		buf.truncate(buf.len() - 3);
		let mut loaded = Keyspace::new(Options::default());
		assert!(load(&buf[..], &mut loaded, 0).is_err());
	}

	#[test]
	fn unsupported_format_version_is_rejected() {
		let mut buf = Vec::new();
		buf.extend_from_slice(b"KEYDB");
		buf.extend_from_slice(b"0001");
		buf.push(OP_EOF);
		buf.extend_from_slice(&0u64.to_le_bytes());
		let mut loaded = Keyspace::new(Options::default());
		match load(&buf[..], &mut loaded, 0) {
			Err(Error::FormatUnsupported(1)) => {}
			other => panic!("expected FormatUnsupported(1), got {:?}", other),
		}
	}
}
