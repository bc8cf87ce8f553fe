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

//! The literal end-to-end scenarios enumerated in the spec's testable
//! properties section, run against the public `Keyspace` surface.

use keydb::db::Keyspace;
use keydb::options::Options;
use keydb::value::Object;

fn ks() -> Keyspace {
	Keyspace::new(Options::default())
}

#[test]
fn scenario_1_string_set_get_append_strlen() {
	let mut k = ks();
	k.set(0, b"foo".to_vec(), Object::new_string(b"bar".to_vec(), &k.options.clone(), 0)).unwrap();
	let v = k.lookup_read(0, b"foo", 0).unwrap().unwrap();
	assert_eq!(v.borrow().str_get().unwrap(), b"bar".to_vec());

	let cell = k.lookup_write_unique(0, b"foo", 0).unwrap().unwrap();
	let opts = k.options.clone();
	cell.borrow_mut().str_append(b"baz", &opts).unwrap();
	let len = k.lookup_read(0, b"foo", 0).unwrap().unwrap().borrow().str_len().unwrap();
	assert_eq!(len, 6);
}

#[test]
fn scenario_2_set_promotes_from_intset_to_hash_set_on_non_integer_member() {
	let mut k = ks();
	k.set(0, b"s".to_vec(), Object::new_set(0)).unwrap();
	let opts = k.options.clone();
	{
		let cell = k.lookup_write_unique(0, b"s", 0).unwrap().unwrap();
		let mut obj = cell.borrow_mut();
		obj.set_add(b"1".to_vec(), &opts).unwrap();
		obj.set_add(b"2".to_vec(), &opts).unwrap();
		obj.set_add(b"3".to_vec(), &opts).unwrap();
	}
	{
		let cell = k.lookup_read(0, b"s", 0).unwrap().unwrap();
		assert!(matches!(cell.borrow().category(), keydb::value::Category::Set));
		assert_eq!(cell.borrow().set_card().unwrap(), 3);
	}
	{
		let cell = k.lookup_write_unique(0, b"s", 0).unwrap().unwrap();
		cell.borrow_mut().set_add(b"x".to_vec(), &opts).unwrap();
	}
	let cell = k.lookup_read(0, b"s", 0).unwrap().unwrap();
	assert_eq!(cell.borrow().set_card().unwrap(), 4);
}

#[test]
fn scenario_3_zset_range_by_score_and_rank() {
	let mut k = ks();
	k.set(0, b"z".to_vec(), Object::new_zset(0)).unwrap();
	let opts = k.options.clone();
	{
		let cell = k.lookup_write_unique(0, b"z", 0).unwrap().unwrap();
		let mut obj = cell.borrow_mut();
		obj.zset_add(b"a".to_vec(), 1.0, &opts).unwrap();
		obj.zset_add(b"b".to_vec(), 2.0, &opts).unwrap();
		obj.zset_add(b"c".to_vec(), 3.0, &opts).unwrap();
	}
	let cell = k.lookup_read(0, b"z", 0).unwrap().unwrap();
	let obj = cell.borrow();
	let range = obj.zset_range_by_score(1.0, false, 3.0, true).unwrap();
	assert_eq!(range, vec![(b"b".to_vec(), 2.0), (b"c".to_vec(), 3.0)]);
	assert_eq!(obj.zset_rank(b"c", false).unwrap(), Some(2));
}

#[test]
fn scenario_4_ttl_expires_key_on_access() {
	let mut k = ks();
	k.set(0, b"k".to_vec(), Object::new_string(b"v".to_vec(), &k.options.clone(), 0)).unwrap();
	k.set_expire(0, b"k", 100_100, 0).unwrap(); // deadline at t=100_100ms
	assert_eq!(k.ttl_seconds(0, b"k", 100).unwrap(), 100);

	// Not yet expired just before the deadline.
	assert!(k.lookup_read(0, b"k", 100_000).unwrap().is_some());

	// Past the deadline: lazily expires on access.
	assert!(k.lookup_read(0, b"k", 101_200).unwrap().is_none());
	assert!(!k.exists(0, b"k").unwrap());
}

#[test]
fn scenario_5_hash_save_restart_preserves_insertion_order() {
	use keydb::rdb::{reader, writer};

	let mut k = ks();
	k.set(0, b"h".to_vec(), Object::new_hash(0)).unwrap();
	{
		let opts = k.options.clone();
		let cell = k.lookup_write_unique(0, b"h", 0).unwrap().unwrap();
		let mut obj = cell.borrow_mut();
		obj.hash_set_field(b"f1".to_vec(), b"a".to_vec(), &opts).unwrap();
		obj.hash_set_field(b"f2".to_vec(), b"b".to_vec(), &opts).unwrap();
	}

	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("dump.snapshot");
	writer::save_to_path(&path, &k, 0, std::process::id()).unwrap();

	// Simulate a restart: a brand new keyspace, loaded from the file on disk.
	let mut restarted = Keyspace::new(Options::default());
	let file = std::fs::File::open(&path).unwrap();
	reader::load(file, &mut restarted, 0).unwrap();

	let cell = restarted.lookup_read(0, b"h", 0).unwrap().unwrap();
	let entries = cell.borrow().hash_entries().unwrap();
	assert_eq!(entries, vec![(b"f1".to_vec(), b"a".to_vec()), (b"f2".to_vec(), b"b".to_vec())]);
}

#[test]
fn scenario_6_rename_moves_ttl_to_destination() {
	let mut k = ks();
	k.set(0, b"a".to_vec(), Object::new_string(b"v".to_vec(), &k.options.clone(), 0)).unwrap();
	k.set_expire(0, b"a", 50_000, 0).unwrap();

	k.rename(0, b"a", b"b", true, 0).unwrap();

	assert!(k.lookup_read(0, b"a", 0).unwrap().is_none());
	assert!(k.lookup_read(0, b"b", 0).unwrap().is_some());
	assert_eq!(k.get_expire(0, b"b").unwrap(), Some(50_000));
}
