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

//! The keyspace: a fixed array of logical databases, each a primary map plus
//! an expirations map (§3, §4.6, §4.7). Generalizes the teacher's
//! `Column`-holds-an-`IndexTable`-plus-`ValueTable` relationship from
//! index/blob to primary/expiration.

use std::cell::RefCell;
use std::rc::Rc;

use rand::Rng;

use crate::dict::Dict;
use crate::error::{Error, Result};
use crate::notify::{NullNotifier, Notifier};
use crate::options::Options;
use crate::replication::{NullPropagator, Propagator, Role};
use crate::value::Object;

pub type ValueRef = Rc<RefCell<Object>>;

/// Copy-on-write helper (§5: "writers clone or replace; they never mutate a
/// shared immutable object in place"). If `cell` is held by anything besides
/// the keyspace's own primary-map count plus this local binding, clones the
/// inner `Object` into a fresh `Rc` and writes it back into the database so
/// the caller can mutate it without perturbing other holders (iterators,
/// in-flight replies). Returns the (possibly new) reference to mutate.
pub fn make_unique(database: &mut Database, key: &[u8], cell: ValueRef) -> ValueRef {
	if Rc::strong_count(&cell) <= 1 {
		return cell;
	}
	let cloned = Rc::new(RefCell::new(cell.borrow().clone()));
	database.primary.insert(key.to_vec(), cloned.clone());
	cloned
}

/// One logical database: primary key→value map and key→deadline-ms map.
pub struct Database {
	primary: Dict<Vec<u8>, ValueRef>,
	expirations: Dict<Vec<u8>, u64>,
}

impl Database {
	fn new() -> Database {
		Database { primary: Dict::new(), expirations: Dict::new() }
	}

	pub fn len(&self) -> usize {
		self.primary.len()
	}

	pub fn is_empty(&self) -> bool {
		self.primary.is_empty()
	}

	/// Safe (non-rehashing) iteration over every live key/value pair, for the
	/// snapshot writer (§4.8).
	pub fn iter(&self) -> impl Iterator<Item = (&Vec<u8>, &ValueRef)> {
		self.primary.iter()
	}

	pub fn expire_of(&self, key: &[u8]) -> Option<u64> {
		self.expirations.get_const(&key.to_vec()).copied()
	}

	/// Inserts a key/value pair (and optional deadline) directly, bypassing
	/// the `add`/`overwrite` preconditions — used only by the snapshot loader
	/// (§4.11), which is reconstructing already-validated on-disk state.
	pub fn load_insert(&mut self, key: Vec<u8>, value: ValueRef, deadline_ms: Option<u64>) {
		if let Some(d) = deadline_ms {
			self.expirations.insert(key.clone(), d);
		}
		self.primary.insert(key, value);
	}
}

/// Outcome of `expire_if_needed` (§4.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpireOutcome {
	NotExpired,
	Expired,
}

/// Global keyspace state (§3's "Global state"). `snapshot_loading` and
/// `snapshot_child` are booleans/options flipped by `snapshot.rs` around a
/// save/load cycle; `dirty` is the change counter consulted by a periodic
/// snapshot policy living outside this crate.
pub struct Keyspace {
	databases: Vec<Database>,
	pub options: Options,
	pub role: Role,
	pub dirty: u64,
	pub last_snapshot_ms: Option<u64>,
	pub snapshot_child: Option<u32>,
	pub snapshot_loading: bool,
	notifier: Box<dyn Notifier>,
	propagator: Box<dyn Propagator>,
}

impl Keyspace {
	pub fn new(options: Options) -> Keyspace {
		let dbnum = options.dbnum;
		Keyspace {
			databases: (0..dbnum).map(|_| Database::new()).collect(),
			options,
			role: Role::Leader,
			dirty: 0,
			last_snapshot_ms: None,
			snapshot_child: None,
			snapshot_loading: false,
			notifier: Box::new(NullNotifier),
			propagator: Box::new(NullPropagator),
		}
	}

	pub fn with_collaborators(options: Options, notifier: Box<dyn Notifier>, propagator: Box<dyn Propagator>) -> Keyspace {
		let mut ks = Keyspace::new(options);
		ks.notifier = notifier;
		ks.propagator = propagator;
		ks
	}

	pub fn dbnum(&self) -> usize {
		self.databases.len()
	}

	pub fn db(&self, idx: usize) -> Result<&Database> {
		self.databases.get(idx).ok_or_else(|| Error::OutOfRange(format!("database index {} out of range", idx)))
	}

	fn db_mut(&mut self, idx: usize) -> Result<&mut Database> {
		self.databases.get_mut(idx).ok_or_else(|| Error::OutOfRange(format!("database index {} out of range", idx)))
	}

	/// All databases in index order, for the snapshot writer (§4.8).
	pub fn iter_databases(&self) -> impl Iterator<Item = (usize, &Database)> {
		self.databases.iter().enumerate()
	}

	/// Mutable per-database access used only by the snapshot loader (§4.11),
	/// which bypasses `add`/`set`'s notification and dirty-count side effects
	/// since it is reconstructing state, not performing a write command.
	pub fn db_for_load(&mut self, idx: usize) -> Result<&mut Database> {
		self.db_mut(idx)
	}

	/// §4.7's five-step contract. `now_ms` is supplied by the caller (the
	/// command layer owns the wall clock) so expiration is deterministic and
	/// testable without sleeping.
	pub fn expire_if_needed(&mut self, db: usize, key: &[u8], now_ms: u64) -> Result<ExpireOutcome> {
		if self.snapshot_loading {
			return Ok(ExpireOutcome::NotExpired);
		}
		let deadline = match self.db_mut(db)?.expirations.get(&key.to_vec()) {
			Some(d) => *d,
			None => return Ok(ExpireOutcome::NotExpired),
		};
		if self.role == Role::Follower {
			return Ok(if now_ms > deadline { ExpireOutcome::Expired } else { ExpireOutcome::NotExpired });
		}
		if now_ms <= deadline {
			return Ok(ExpireOutcome::NotExpired);
		}
		self.propagator.propagate(db, &[b"DEL".to_vec(), key.to_vec()]);
		self.delete(db, key)?;
		log::debug!(target: "keydb", "db {}: lazily expired key of length {}", db, key.len());
		Ok(ExpireOutcome::Expired)
	}

	/// Read-side lookup: evaluates expiration first, then touches the access
	/// timestamp unless a snapshot child is alive (preserve copy-on-write).
	pub fn lookup_read(&mut self, db: usize, key: &[u8], now_ms: u64) -> Result<Option<ValueRef>> {
		self.expire_if_needed(db, key, now_ms)?;
		let has_child = self.snapshot_child.is_some();
		let value = self.db_mut(db)?.primary.get(&key.to_vec()).cloned();
		if let Some(v) = &value {
			if !has_child {
				v.borrow_mut().access_time_ms = now_ms;
			}
		}
		Ok(value)
	}

	pub fn lookup_write(&mut self, db: usize, key: &[u8], now_ms: u64) -> Result<Option<ValueRef>> {
		self.expire_if_needed(db, key, now_ms)?;
		Ok(self.db_mut(db)?.primary.get(&key.to_vec()).cloned())
	}

	/// Like `lookup_write`, but also guarantees the returned `Object` is not
	/// shared with any other holder, cloning it first if needed (§5's COW rule).
	pub fn lookup_write_unique(&mut self, db: usize, key: &[u8], now_ms: u64) -> Result<Option<ValueRef>> {
		match self.lookup_write(db, key, now_ms)? {
			Some(cell) => {
				let database = self.db_mut(db)?;
				Ok(Some(make_unique(database, key, cell)))
			}
			None => Ok(None),
		}
	}

	pub fn add(&mut self, db: usize, key: Vec<u8>, value: Object) -> Result<()> {
		let database = self.db_mut(db)?;
		if database.primary.contains_key(&key) {
			return Err(Error::Exists);
		}
		database.primary.insert(key, Rc::new(RefCell::new(value)));
		self.dirty += 1;
		Ok(())
	}

	pub fn overwrite(&mut self, db: usize, key: &[u8], value: Object) -> Result<()> {
		let database = self.db_mut(db)?;
		if !database.primary.contains_key(&key.to_vec()) {
			return Err(Error::NoSuchKey);
		}
		database.primary.insert(key.to_vec(), Rc::new(RefCell::new(value)));
		self.dirty += 1;
		Ok(())
	}

	/// Add-or-overwrite; clears any expiration; emits `notify-modified`.
	pub fn set(&mut self, db: usize, key: Vec<u8>, value: Object) -> Result<()> {
		{
			let database = self.db_mut(db)?;
			database.expirations.remove(&key);
			database.primary.insert(key.clone(), Rc::new(RefCell::new(value)));
		}
		self.dirty += 1;
		self.notifier.notify_modified(db, &key);
		Ok(())
	}

	/// Removes the expiration entry first, then the primary entry (§3's
	/// atomicity note — both must go together, expirations go first so a
	/// dangling expiration is never observable even transiently).
	pub fn delete(&mut self, db: usize, key: &[u8]) -> Result<bool> {
		let existed = {
			let database = self.db_mut(db)?;
			database.expirations.remove(&key.to_vec());
			database.primary.remove(&key.to_vec()).is_some()
		};
		if existed {
			self.dirty += 1;
			self.notifier.notify_modified(db, key);
		}
		Ok(existed)
	}

	/// Uniformly samples the primary map; resamples if the drawn key turns
	/// out to be expired (bounded by the number of keys in the db).
	pub fn random_key(&mut self, db: usize, now_ms: u64, rng: &mut impl Rng) -> Result<Option<Vec<u8>>> {
		let attempts = self.db(db)?.len();
		for _ in 0..attempts.max(1) {
			let candidate = {
				let database = self.db(db)?;
				if database.is_empty() {
					return Ok(None);
				}
				let idx = rng.gen_range(0..database.len());
				database.primary.keys().nth(idx).cloned()
			};
			let candidate = match candidate {
				Some(k) => k,
				None => return Ok(None),
			};
			if self.expire_if_needed(db, &candidate, now_ms)? == ExpireOutcome::Expired {
				continue;
			}
			return Ok(Some(candidate));
		}
		Ok(None)
	}

	/// Atomic move including expiration (§4.6). Fails if `src` absent; if
	/// `dst` exists and `allow_overwrite` is false, fails with `Exists`.
	pub fn rename(&mut self, db: usize, src: &[u8], dst: &[u8], allow_overwrite: bool, now_ms: u64) -> Result<()> {
		if self.expire_if_needed(db, src, now_ms)? == ExpireOutcome::Expired {
			return Err(Error::NoSuchKey);
		}
		let database = self.db_mut(db)?;
		if !database.primary.contains_key(&src.to_vec()) {
			return Err(Error::NoSuchKey);
		}
		if !allow_overwrite && database.primary.contains_key(&dst.to_vec()) {
			return Err(Error::Exists);
		}
		let value = database.primary.remove(&src.to_vec()).unwrap();
		let deadline = database.expirations.remove(&src.to_vec());
		database.primary.insert(dst.to_vec(), value);
		database.expirations.remove(&dst.to_vec());
		if let Some(d) = deadline {
			database.expirations.insert(dst.to_vec(), d);
		}
		self.dirty += 1;
		self.notifier.notify_modified(db, src);
		self.notifier.notify_modified(db, dst);
		Ok(())
	}

	/// Fails if `key` absent in `src_db`, present in `dst_db`, or the two
	/// database indices are equal.
	pub fn move_key(&mut self, src_db: usize, dst_db: usize, key: &[u8], now_ms: u64) -> Result<()> {
		if src_db == dst_db {
			return Err(Error::OutOfRange("source and destination database must differ".into()));
		}
		if self.expire_if_needed(src_db, key, now_ms)? == ExpireOutcome::Expired {
			return Err(Error::NoSuchKey);
		}
		if self.db(dst_db)?.primary.contains_key_const(&key.to_vec()) {
			return Err(Error::Exists);
		}
		let (value, deadline) = {
			let src = self.db_mut(src_db)?;
			if !src.primary.contains_key(&key.to_vec()) {
				return Err(Error::NoSuchKey);
			}
			let value = src.primary.remove(&key.to_vec()).unwrap();
			let deadline = src.expirations.remove(&key.to_vec());
			(value, deadline)
		};
		{
			let dst = self.db_mut(dst_db)?;
			dst.primary.insert(key.to_vec(), value);
			if let Some(d) = deadline {
				dst.expirations.insert(key.to_vec(), d);
			}
		}
		self.dirty += 1;
		self.notifier.notify_modified(src_db, key);
		self.notifier.notify_modified(dst_db, key);
		Ok(())
	}

	pub fn flush_db(&mut self, db: usize) -> Result<()> {
		let database = self.db_mut(db)?;
		*database = Database::new();
		self.dirty += 1;
		self.notifier.notify_flushed(Some(db));
		Ok(())
	}

	pub fn flush_all(&mut self) {
		for db in &mut self.databases {
			*db = Database::new();
		}
		self.dirty += 1;
		self.notifier.notify_flushed(None);
	}

	// ---- expiration engine (§4.7) ----

	/// A past deadline while leader and not loading is equivalent to an
	/// immediate delete with propagation (§4.7, §8) rather than a stored
	/// expiration entry.
	pub fn set_expire(&mut self, db: usize, key: &[u8], deadline_ms: u64, now_ms: u64) -> Result<()> {
		{
			let database = self.db_mut(db)?;
			if !database.primary.contains_key(&key.to_vec()) {
				return Err(Error::NoSuchKey);
			}
		}
		if self.role == Role::Leader && !self.snapshot_loading && deadline_ms <= now_ms {
			self.propagator.propagate(db, &[b"DEL".to_vec(), key.to_vec()]);
			self.delete(db, key)?;
			return Ok(());
		}
		let database = self.db_mut(db)?;
		database.expirations.insert(key.to_vec(), deadline_ms);
		self.dirty += 1;
		Ok(())
	}

	pub fn get_expire(&mut self, db: usize, key: &[u8]) -> Result<Option<u64>> {
		Ok(self.db_mut(db)?.expirations.get(&key.to_vec()).copied())
	}

	pub fn clear_expire(&mut self, db: usize, key: &[u8]) -> Result<bool> {
		let removed = self.db_mut(db)?.expirations.remove(&key.to_vec()).is_some();
		if removed {
			self.dirty += 1;
		}
		Ok(removed)
	}

	/// `-2` if absent, `-1` if present with no expiration, else remaining
	/// milliseconds to the deadline.
	pub fn ttl_ms(&mut self, db: usize, key: &[u8], now_ms: u64) -> Result<i64> {
		let database = self.db_mut(db)?;
		if !database.primary.contains_key(&key.to_vec()) {
			return Ok(-2);
		}
		match database.expirations.get(&key.to_vec()) {
			None => Ok(-1),
			Some(deadline) => Ok((*deadline as i64) - (now_ms as i64)),
		}
	}

	/// Seconds variant, rounded half-up per §4.7.
	pub fn ttl_seconds(&mut self, db: usize, key: &[u8], now_ms: u64) -> Result<i64> {
		let ms = self.ttl_ms(db, key, now_ms)?;
		if ms < 0 {
			Ok(ms)
		} else {
			Ok((ms + 500) / 1000)
		}
	}

	pub fn db_size(&self, db: usize) -> Result<usize> {
		Ok(self.db(db)?.len())
	}

	pub fn exists(&self, db: usize, key: &[u8]) -> Result<bool> {
		Ok(self.db(db)?.primary.contains_key_const(&key.to_vec()))
	}

	pub fn keys_matching(&self, db: usize, pattern: &[u8]) -> Result<Vec<Vec<u8>>> {
		Ok(self.db(db)?.primary.keys().filter(|k| crate::glob::glob_match(pattern, k)).cloned().collect())
	}

	/// `type(key)` (§6): `"none"` on a miss (including a lazily-expired key),
	/// else the category name of the held value.
	pub fn key_type(&mut self, db: usize, key: &[u8], now_ms: u64) -> Result<&'static str> {
		match self.lookup_read(db, key, now_ms)? {
			Some(cell) => Ok(cell.borrow().category().name()),
			None => Ok("none"),
		}
	}

	/// Freezes rehash stepping across every database while a snapshot child
	/// is alive (§4.3, §5) — consulted by `snapshot.rs`, never by command
	/// handling directly.
	pub fn pause_rehash(&mut self) {
		for database in &mut self.databases {
			database.primary.pause_rehash();
			database.expirations.pause_rehash();
		}
	}

	pub fn resume_rehash(&mut self) {
		for database in &mut self.databases {
			database.primary.resume_rehash();
			database.expirations.resume_rehash();
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn ks() -> Keyspace {
		Keyspace::new(Options::default())
	}

	#[test]
	fn set_then_get_then_delete() {
		let mut k = ks();
		k.set(0, b"foo".to_vec(), Object::new_string(b"bar".to_vec(), &Options::default(), 0)).unwrap();
		let v = k.lookup_read(0, b"foo", 0).unwrap().unwrap();
		assert_eq!(v.borrow().str_get().unwrap(), b"bar");
		assert!(k.delete(0, b"foo").unwrap());
		assert!(k.lookup_read(0, b"foo", 0).unwrap().is_none());
	}

	#[test]
	fn add_fails_if_key_present() {
		let mut k = ks();
		k.add(0, b"a".to_vec(), Object::new_string(b"1".to_vec(), &Options::default(), 0)).unwrap();
		assert!(matches!(k.add(0, b"a".to_vec(), Object::new_string(b"2".to_vec(), &Options::default(), 0)), Err(Error::Exists)));
	}

	#[test]
	fn ttl_absent_is_minus_two_persistent_is_minus_one() {
		let mut k = ks();
		assert_eq!(k.ttl_ms(0, b"missing", 0).unwrap(), -2);
		k.set(0, b"k".to_vec(), Object::new_string(b"v".to_vec(), &Options::default(), 0)).unwrap();
		assert_eq!(k.ttl_ms(0, b"k", 0).unwrap(), -1);
	}

	#[test]
	fn lazy_expiration_deletes_past_deadline_on_leader() {
		let mut k = ks();
		k.set(0, b"k".to_vec(), Object::new_string(b"v".to_vec(), &Options::default(), 0)).unwrap();
		k.set_expire(0, b"k", 100, 0).unwrap();
		assert!(k.lookup_read(0, b"k", 50).unwrap().is_some());
		assert!(k.lookup_read(0, b"k", 200).unwrap().is_none());
		assert!(!k.exists(0, b"k").unwrap());
	}

	#[test]
	fn set_expire_of_a_past_deadline_deletes_immediately_on_leader() {
		let mut k = ks();
		k.set(0, b"k".to_vec(), Object::new_string(b"v".to_vec(), &Options::default(), 0)).unwrap();
		k.set_expire(0, b"k", 100, 200).unwrap();
		assert!(!k.exists(0, b"k").unwrap());
	}

	#[test]
	fn set_expire_of_a_past_deadline_is_stored_on_follower() {
		let mut k = ks();
		k.role = Role::Follower;
		k.set(0, b"k".to_vec(), Object::new_string(b"v".to_vec(), &Options::default(), 0)).unwrap();
		k.set_expire(0, b"k", 100, 200).unwrap();
		assert!(k.exists(0, b"k").unwrap());
		assert_eq!(k.get_expire(0, b"k").unwrap(), Some(100));
	}

	#[test]
	fn follower_expire_if_needed_does_not_mutate_state() {
		let mut k = ks();
		k.role = Role::Follower;
		k.set(0, b"k".to_vec(), Object::new_string(b"v".to_vec(), &Options::default(), 0)).unwrap();
		k.set_expire(0, b"k", 100, 0).unwrap();
		assert_eq!(k.expire_if_needed(0, b"k", 200).unwrap(), ExpireOutcome::Expired);
		// Follower must not have actually deleted the key.
		assert!(k.exists(0, b"k").unwrap());
	}

	#[test]
	fn rename_moves_value_and_ttl() {
		let mut k = ks();
		k.set(0, b"a".to_vec(), Object::new_string(b"1".to_vec(), &Options::default(), 0)).unwrap();
		k.set_expire(0, b"a", 50, 0).unwrap();
		k.rename(0, b"a", b"b", true, 0).unwrap();
		assert!(k.lookup_read(0, b"a", 0).unwrap().is_none());
		assert_eq!(k.get_expire(0, b"b").unwrap(), Some(50));
	}

	#[test]
	fn rename_without_overwrite_fails_if_dst_exists() {
		let mut k = ks();
		k.set(0, b"a".to_vec(), Object::new_string(b"1".to_vec(), &Options::default(), 0)).unwrap();
		k.set(0, b"b".to_vec(), Object::new_string(b"2".to_vec(), &Options::default(), 0)).unwrap();
		assert!(matches!(k.rename(0, b"a", b"b", false, 0), Err(Error::Exists)));
	}

	#[test]
	fn move_key_fails_when_source_and_dest_are_the_same_db() {
		let mut k = ks();
		k.set(0, b"a".to_vec(), Object::new_string(b"1".to_vec(), &Options::default(), 0)).unwrap();
		assert!(matches!(k.move_key(0, 0, b"a", 0), Err(Error::OutOfRange(_))));
	}

	#[test]
	fn move_key_transfers_value_across_databases() {
		let mut k = ks();
		k.set(0, b"a".to_vec(), Object::new_string(b"1".to_vec(), &Options::default(), 0)).unwrap();
		k.move_key(0, 1, b"a", 0).unwrap();
		assert!(k.lookup_read(0, b"a", 0).unwrap().is_none());
		assert!(k.lookup_read(1, b"a", 0).unwrap().is_some());
	}

	#[test]
	fn flush_db_empties_only_that_database() {
		let mut k = ks();
		k.set(0, b"a".to_vec(), Object::new_string(b"1".to_vec(), &Options::default(), 0)).unwrap();
		k.set(1, b"b".to_vec(), Object::new_string(b"2".to_vec(), &Options::default(), 0)).unwrap();
		k.flush_db(0).unwrap();
		assert_eq!(k.db_size(0).unwrap(), 0);
		assert_eq!(k.db_size(1).unwrap(), 1);
	}

	#[test]
	fn random_key_samples_from_nonempty_db() {
		let mut k = ks();
		k.set(0, b"only".to_vec(), Object::new_string(b"1".to_vec(), &Options::default(), 0)).unwrap();
		let mut rng = StdRng::seed_from_u64(7);
		assert_eq!(k.random_key(0, 0, &mut rng).unwrap(), Some(b"only".to_vec()));
	}

	#[test]
	fn lookup_write_unique_clones_when_shared() {
		let mut k = ks();
		k.set(0, b"k".to_vec(), Object::new_string(b"v".to_vec(), &Options::default(), 0)).unwrap();
		let shared = k.lookup_read(0, b"k", 0).unwrap().unwrap();
		assert_eq!(Rc::strong_count(&shared), 2);
		let unique = k.lookup_write_unique(0, b"k", 0).unwrap().unwrap();
		assert!(!Rc::ptr_eq(&shared, &unique));
		assert_eq!(Rc::strong_count(&unique), 2);
	}

	#[test]
	fn keys_matching_uses_glob_pattern() {
		let mut k = ks();
		k.set(0, b"foo:1".to_vec(), Object::new_string(b"1".to_vec(), &Options::default(), 0)).unwrap();
		k.set(0, b"bar:1".to_vec(), Object::new_string(b"1".to_vec(), &Options::default(), 0)).unwrap();
		let mut matched = k.keys_matching(0, b"foo:*").unwrap();
		matched.sort();
		assert_eq!(matched, vec![b"foo:1".to_vec()]);
	}

	#[test]
	fn key_type_reports_category_name_or_none() {
		let mut k = ks();
		k.set(0, b"s".to_vec(), Object::new_string(b"v".to_vec(), &Options::default(), 0)).unwrap();
		k.set(0, b"h".to_vec(), Object::new_hash(0)).unwrap();
		assert_eq!(k.key_type(0, b"s", 0).unwrap(), "string");
		assert_eq!(k.key_type(0, b"h", 0).unwrap(), "hash");
		assert_eq!(k.key_type(0, b"missing", 0).unwrap(), "none");
	}
}
