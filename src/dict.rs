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

//! Open-addressed (chained) hash table with incremental rehash (§4.3),
//! generalizing the teacher's `IndexTable` rebalance machinery
//! (`rebalancing: VecDeque`, `rebalance_progress`, bounded per-call batches)
//! from index rebalancing to dictionary rehashing.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

const GROW_LOAD_FACTOR: f64 = 1.0;
const REHASH_BUCKETS_PER_STEP: usize = 1;
const MIN_BUCKETS: usize = 4;

#[derive(Clone)]
struct Bucket<K, V> {
	entries: Vec<(K, V)>,
}

impl<K, V> Bucket<K, V> {
	fn new() -> Bucket<K, V> {
		Bucket { entries: Vec::new() }
	}
}

fn hash_of<K: Hash>(k: &K) -> u64 {
	let mut hasher = DefaultHasher::new();
	k.hash(&mut hasher);
	hasher.finish()
}

/// A dict table holds one array of buckets; `Dict` holds up to two of these
/// (table 0 live, table 1 the rehash target) plus a migration cursor.
#[derive(Clone)]
struct Table<K, V> {
	buckets: Vec<Bucket<K, V>>,
	len: usize,
}

impl<K, V> Table<K, V> {
	fn with_buckets(n: usize) -> Table<K, V> {
		let mut buckets = Vec::with_capacity(n);
		for _ in 0..n {
			buckets.push(Bucket::new());
		}
		Table { buckets, len: 0 }
	}

	fn bucket_index(&self, hash: u64) -> usize {
		(hash as usize) & (self.buckets.len() - 1)
	}
}

#[derive(Clone)]
pub struct Dict<K: Eq + Hash + Clone, V> {
	table0: Table<K, V>,
	table1: Option<Table<K, V>>,
	rehash_cursor: usize,
	rehash_paused: bool,
}

impl<K: Eq + Hash + Clone, V> Dict<K, V> {
	pub fn new() -> Dict<K, V> {
		Dict { table0: Table::with_buckets(MIN_BUCKETS), table1: None, rehash_cursor: 0, rehash_paused: false }
	}

	pub fn len(&self) -> usize {
		self.table0.len + self.table1.as_ref().map_or(0, |t| t.len)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn is_rehashing(&self) -> bool {
		self.table1.is_some()
	}

	/// Disables rehash stepping while a snapshot child exists (§4.3, §5).
	pub fn pause_rehash(&mut self) {
		self.rehash_paused = true;
	}

	pub fn resume_rehash(&mut self) {
		self.rehash_paused = false;
	}

	fn maybe_start_rehash(&mut self) {
		if self.table1.is_some() || self.rehash_paused {
			return;
		}
		let load = self.table0.len as f64 / self.table0.buckets.len() as f64;
		if load >= GROW_LOAD_FACTOR {
			let new_size = (self.table0.buckets.len() * 2).next_power_of_two();
			log::debug!(target: "keydb", "dict: starting incremental rehash {} -> {} buckets", self.table0.buckets.len(), new_size);
			self.table1 = Some(Table::with_buckets(new_size));
			self.rehash_cursor = 0;
		}
	}

	fn rehash_step(&mut self) {
		if self.rehash_paused {
			return;
		}
		let table1 = match self.table1.as_mut() {
			Some(t) => t,
			None => return,
		};
		let mut migrated = 0;
		while migrated < REHASH_BUCKETS_PER_STEP && self.rehash_cursor < self.table0.buckets.len() {
			let bucket = std::mem::replace(&mut self.table0.buckets[self.rehash_cursor], Bucket::new());
			for (k, v) in bucket.entries {
				let h = hash_of(&k);
				let idx = table1.bucket_index(h);
				table1.buckets[idx].entries.push((k, v));
				table1.len += 1;
				self.table0.len -= 1;
			}
			self.rehash_cursor += 1;
			migrated += 1;
		}
		if self.rehash_cursor >= self.table0.buckets.len() {
			log::debug!(target: "keydb", "dict: completed incremental rehash");
			let finished = self.table1.take().unwrap();
			self.table0 = finished;
			self.rehash_cursor = 0;
		}
	}

	fn advance(&mut self) {
		self.maybe_start_rehash();
		self.rehash_step();
	}

	pub fn get(&mut self, key: &K) -> Option<&V> {
		self.advance();
		let h = hash_of(key);
		if let Some(t1) = &self.table1 {
			let idx = t1.bucket_index(h);
			if let Some(pos) = t1.buckets[idx].entries.iter().position(|(k, _)| k == key) {
				return Some(&t1.buckets[idx].entries[pos].1);
			}
		}
		let idx = self.table0.bucket_index(h);
		self.table0.buckets[idx].entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
		self.advance();
		let h = hash_of(key);
		if let Some(t1) = &mut self.table1 {
			let idx = t1.bucket_index(h);
			if let Some(pos) = t1.buckets[idx].entries.iter().position(|(k, _)| k == key) {
				return Some(&mut t1.buckets[idx].entries[pos].1);
			}
		}
		let idx = self.table0.bucket_index(h);
		self.table0.buckets[idx].entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	pub fn contains_key(&mut self, key: &K) -> bool {
		self.get(key).is_some()
	}

	/// Membership check that never advances the rehash cursor — for callers
	/// that only hold `&self` (e.g. a read-only existence check).
	pub fn contains_key_const(&self, key: &K) -> bool {
		let h = hash_of(key);
		if let Some(t1) = &self.table1 {
			let idx = t1.bucket_index(h);
			if t1.buckets[idx].entries.iter().any(|(k, _)| k == key) {
				return true;
			}
		}
		let idx = self.table0.bucket_index(h);
		self.table0.buckets[idx].entries.iter().any(|(k, _)| k == key)
	}

	/// Lookup that never advances the rehash cursor, mirroring `contains_key_const`.
	pub fn get_const(&self, key: &K) -> Option<&V> {
		let h = hash_of(key);
		if let Some(t1) = &self.table1 {
			let idx = t1.bucket_index(h);
			if let Some(pos) = t1.buckets[idx].entries.iter().position(|(k, _)| k == key) {
				return Some(&t1.buckets[idx].entries[pos].1);
			}
		}
		let idx = self.table0.bucket_index(h);
		self.table0.buckets[idx].entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
	}

	/// Inserts go to table 1 while rehashing, matching §4.3's stated policy.
	pub fn insert(&mut self, key: K, value: V) -> Option<V> {
		self.advance();
		let h = hash_of(&key);
		if let Some(t1) = &mut self.table1 {
			let idx = t1.bucket_index(h);
			if let Some(pos) = t1.buckets[idx].entries.iter().position(|(k, _)| *k == key) {
				return Some(std::mem::replace(&mut t1.buckets[idx].entries[pos].1, value));
			}
			let idx0 = self.table0.bucket_index(h);
			if let Some(pos) = self.table0.buckets[idx0].entries.iter().position(|(k, _)| *k == key) {
				let (_, old) = self.table0.buckets[idx0].entries.remove(pos);
				self.table0.len -= 1;
				let t1 = self.table1.as_mut().unwrap();
				t1.buckets[idx].entries.push((key, value));
				t1.len += 1;
				return Some(old);
			}
			t1.buckets[idx].entries.push((key, value));
			t1.len += 1;
			return None;
		}
		let idx = self.table0.bucket_index(h);
		if let Some(pos) = self.table0.buckets[idx].entries.iter().position(|(k, _)| *k == key) {
			return Some(std::mem::replace(&mut self.table0.buckets[idx].entries[pos].1, value));
		}
		self.table0.buckets[idx].entries.push((key, value));
		self.table0.len += 1;
		None
	}

	pub fn remove(&mut self, key: &K) -> Option<V> {
		self.advance();
		let h = hash_of(key);
		if let Some(t1) = &mut self.table1 {
			let idx = t1.bucket_index(h);
			if let Some(pos) = t1.buckets[idx].entries.iter().position(|(k, _)| k == key) {
				t1.len -= 1;
				return Some(t1.buckets[idx].entries.remove(pos).1);
			}
		}
		let idx = self.table0.bucket_index(h);
		if let Some(pos) = self.table0.buckets[idx].entries.iter().position(|(k, _)| k == key) {
			self.table0.len -= 1;
			return Some(self.table0.buckets[idx].entries.remove(pos).1);
		}
		None
	}

	/// A "safe" iterator (§4.3): never triggers rehash steps during traversal.
	pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
		self.table0
			.buckets
			.iter()
			.chain(self.table1.iter().flat_map(|t| t.buckets.iter()))
			.flat_map(|b| b.entries.iter())
			.map(|(k, v)| (k, v))
	}

	pub fn keys(&self) -> impl Iterator<Item = &K> {
		self.iter().map(|(k, _)| k)
	}
}

impl<K: Eq + Hash + Clone, V> Default for Dict<K, V> {
	fn default() -> Dict<K, V> {
		Dict::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_get_remove_round_trip() {
		let mut d: Dict<String, i32> = Dict::new();
		d.insert("a".into(), 1);
		d.insert("b".into(), 2);
		assert_eq!(d.get(&"a".to_string()), Some(&1));
		assert_eq!(d.remove(&"a".to_string()), Some(1));
		assert_eq!(d.get(&"a".to_string()), None);
		assert_eq!(d.len(), 1);
	}

	#[test]
	fn grows_and_finishes_rehash_transparently() {
		let mut d: Dict<i32, i32> = Dict::new();
		for i in 0..500 {
			d.insert(i, i * 10);
		}
		for i in 0..500 {
			assert_eq!(d.get(&i), Some(&(i * 10)));
		}
		assert_eq!(d.len(), 500);
	}

	#[test]
	fn pausing_rehash_freezes_migration_but_keeps_lookups_correct() {
		let mut d: Dict<i32, i32> = Dict::new();
		for i in 0..20 {
			d.insert(i, i);
		}
		d.pause_rehash();
		for i in 0..20 {
			d.insert(i + 100, i);
		}
		for i in 0..20 {
			assert_eq!(d.get(&i), Some(&i));
			assert_eq!(d.get(&(i + 100)), Some(&i));
		}
		d.resume_rehash();
		assert_eq!(d.get(&5), Some(&5));
	}

	#[test]
	fn overwrite_existing_key_returns_previous_value() {
		let mut d: Dict<&str, i32> = Dict::new();
		d.insert("k", 1);
		assert_eq!(d.insert("k", 2), Some(1));
		assert_eq!(d.get(&"k"), Some(&2));
	}
}
