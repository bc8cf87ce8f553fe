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

//! The typed value object (§3, §4.5): a tagged union over the five value
//! categories, each dispatching between a compact and an expanded encoding.
//! Modeled after the teacher's size-tier dispatch in `column.rs::get_entry_value`,
//! generalized from "which value table" to "which encoding variant".

use std::collections::VecDeque;
use rand::Rng;

use crate::dict::Dict;
use crate::error::{Error, Result};
use crate::intset::IntSet;
use crate::options::Options;
use crate::packed::{PackedSeq, PackedValue};
use crate::skiplist::SkipList;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
	Str,
	List,
	Set,
	ZSet,
	Hash,
}

impl Category {
	pub fn name(self) -> &'static str {
		match self {
			Category::Str => "string",
			Category::List => "list",
			Category::Set => "set",
			Category::ZSet => "zset",
			Category::Hash => "hash",
		}
	}
}

#[derive(Clone, Debug)]
enum StringData {
	IntImmediate(i64),
	Inline(Vec<u8>),
	Raw(Vec<u8>),
}

fn try_canonical_int(bytes: &[u8]) -> Option<i64> {
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

impl StringData {
	fn new(bytes: Vec<u8>, opts: &Options) -> StringData {
		if let Some(n) = try_canonical_int(&bytes) {
			StringData::IntImmediate(n)
		} else if bytes.len() <= opts.string_inline_cap {
			StringData::Inline(bytes)
		} else {
			StringData::Raw(bytes)
		}
	}

	fn as_bytes(&self) -> Vec<u8> {
		match self {
			StringData::IntImmediate(n) => n.to_string().into_bytes(),
			StringData::Inline(b) | StringData::Raw(b) => b.clone(),
		}
	}

	fn len(&self) -> usize {
		self.as_bytes().len()
	}
}

#[derive(Clone)]
enum ListData {
	Packed(PackedSeq),
	Linked(VecDeque<Vec<u8>>),
}

#[derive(Clone)]
enum SetData {
	IntSet(IntSet),
	Hash(Dict<Vec<u8>, ()>),
}

#[derive(Clone)]
enum ZSetData {
	/// Alternating member/score entries, score stored as its canonical
	/// decimal string (§4.9's zset/compact payload).
	Packed(PackedSeq),
	Skip(SkipList),
}

#[derive(Clone)]
enum HashData {
	Packed(PackedSeq),
	Table(Dict<Vec<u8>, Vec<u8>>),
}

#[derive(Clone)]
enum Data {
	Str(StringData),
	List(ListData),
	Set(SetData),
	ZSet(ZSetData),
	Hash(HashData),
}

/// A keyspace value: tagged category/encoding plus an approximate-LRU access
/// timestamp. Shared ownership is provided by wrapping this in `Rc<RefCell<_>>`
/// at the keyspace layer (db.rs) — §5 fixes single-threaded access, so a
/// non-atomic `Rc` is the correct (not merely convenient) choice.
#[derive(Clone)]
pub struct Object {
	data: Data,
	pub access_time_ms: u64,
}

impl Object {
	pub fn category(&self) -> Category {
		match &self.data {
			Data::Str(_) => Category::Str,
			Data::List(_) => Category::List,
			Data::Set(_) => Category::Set,
			Data::ZSet(_) => Category::ZSet,
			Data::Hash(_) => Category::Hash,
		}
	}

	pub fn new_string(bytes: Vec<u8>, opts: &Options, now_ms: u64) -> Object {
		Object { data: Data::Str(StringData::new(bytes, opts)), access_time_ms: now_ms }
	}

	pub fn new_list(now_ms: u64) -> Object {
		Object { data: Data::List(ListData::Packed(PackedSeq::new())), access_time_ms: now_ms }
	}

	pub fn new_set(now_ms: u64) -> Object {
		Object { data: Data::Set(SetData::IntSet(IntSet::new())), access_time_ms: now_ms }
	}

	pub fn new_zset(now_ms: u64) -> Object {
		Object { data: Data::ZSet(ZSetData::Packed(PackedSeq::new())), access_time_ms: now_ms }
	}

	pub fn new_hash(now_ms: u64) -> Object {
		Object { data: Data::Hash(HashData::Packed(PackedSeq::new())), access_time_ms: now_ms }
	}

	// ---- string ----

	pub fn str_get(&self) -> Result<Vec<u8>> {
		match &self.data {
			Data::Str(s) => Ok(s.as_bytes()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn str_len(&self) -> Result<usize> {
		match &self.data {
			Data::Str(s) => Ok(s.len()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn str_append(&mut self, suffix: &[u8], opts: &Options) -> Result<usize> {
		match &mut self.data {
			Data::Str(s) => {
				let mut bytes = s.as_bytes();
				bytes.extend_from_slice(suffix);
				let len = bytes.len();
				*s = StringData::new(bytes, opts);
				Ok(len)
			}
			_ => Err(Error::WrongKind),
		}
	}

	pub fn str_incr_by(&mut self, delta: i64, opts: &Options) -> Result<i64> {
		match &mut self.data {
			Data::Str(s) => {
				let current = match s {
					StringData::IntImmediate(n) => *n,
					StringData::Inline(b) | StringData::Raw(b) => {
						try_canonical_int(b).ok_or(Error::Syntax("value is not an integer".into()))?
					}
				};
				let next = current.checked_add(delta).ok_or(Error::OutOfRange("increment would overflow".into()))?;
				*s = StringData::new(next.to_string().into_bytes(), opts);
				Ok(next)
			}
			_ => Err(Error::WrongKind),
		}
	}

	// ---- list ----

	fn promote_list_if_needed(&mut self, opts: &Options) {
		if let Data::List(ListData::Packed(p)) = &self.data {
			let needs = p.len() > opts.list_max_ziplist_entries
				|| p.iter().any(|v| v.to_bytes().len() > opts.list_max_ziplist_value);
			if needs {
				let items: VecDeque<Vec<u8>> = p.iter().map(|v| v.to_bytes()).collect();
				self.data = Data::List(ListData::Linked(items));
			}
		}
	}

	pub fn list_len(&self) -> Result<usize> {
		match &self.data {
			Data::List(ListData::Packed(p)) => Ok(p.len()),
			Data::List(ListData::Linked(l)) => Ok(l.len()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn list_push(&mut self, value: Vec<u8>, head: bool, opts: &Options) -> Result<usize> {
		match &mut self.data {
			Data::List(ListData::Packed(p)) => {
				if head {
					p.push_head(&value);
				} else {
					p.push_tail(&value);
				}
			}
			Data::List(ListData::Linked(l)) => {
				if head {
					l.push_front(value);
				} else {
					l.push_back(value);
				}
			}
			_ => return Err(Error::WrongKind),
		}
		self.promote_list_if_needed(opts);
		self.list_len()
	}

	pub fn list_pop(&mut self, head: bool) -> Result<Option<Vec<u8>>> {
		match &mut self.data {
			Data::List(ListData::Packed(p)) => {
				if p.is_empty() {
					return Ok(None);
				}
				let idx = if head { 0 } else { p.len() - 1 };
				Ok(p.delete(idx).map(|v| v.to_bytes()))
			}
			Data::List(ListData::Linked(l)) => Ok(if head { l.pop_front() } else { l.pop_back() }),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn list_index(&self, index: i64) -> Result<Option<Vec<u8>>> {
		let len = self.list_len()? as i64;
		let idx = normalize_index(index, len);
		let idx = match idx {
			Some(i) => i as usize,
			None => return Ok(None),
		};
		match &self.data {
			Data::List(ListData::Packed(p)) => Ok(p.get(idx).map(|v| v.to_bytes())),
			Data::List(ListData::Linked(l)) => Ok(l.get(idx).cloned()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn list_range(&self, start: i64, stop: i64) -> Result<Vec<Vec<u8>>> {
		let len = self.list_len()? as i64;
		if len == 0 {
			return Ok(Vec::new());
		}
		let (lo, hi) = normalize_range(start, stop, len);
		if lo > hi {
			return Ok(Vec::new());
		}
		match &self.data {
			Data::List(ListData::Packed(p)) => Ok((lo..=hi).filter_map(|i| p.get(i as usize)).map(|v| v.to_bytes()).collect()),
			Data::List(ListData::Linked(l)) => Ok((lo..=hi).filter_map(|i| l.get(i as usize)).cloned().collect()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn list_insert(&mut self, pivot: &[u8], value: Vec<u8>, before: bool, opts: &Options) -> Result<Option<usize>> {
		let pos = match &self.data {
			Data::List(ListData::Packed(p)) => p.find(pivot),
			Data::List(ListData::Linked(l)) => l.iter().position(|v| v == pivot),
			_ => return Err(Error::WrongKind),
		};
		let pos = match pos {
			Some(p) => p,
			None => return Ok(None),
		};
		match &mut self.data {
			Data::List(ListData::Packed(p)) => {
				if before {
					p.insert_before(pos, &value);
				} else {
					p.insert_after(pos, &value);
				}
			}
			Data::List(ListData::Linked(l)) => {
				let at = if before { pos } else { pos + 1 };
				l.insert(at, value);
			}
			_ => unreachable!(),
		}
		self.promote_list_if_needed(opts);
		Ok(Some(self.list_len()?))
	}

	/// Removes up to `count` occurrences of `value` (0 means "all"); positive
	/// `count`/negative `count` selects head-to-tail vs tail-to-head direction.
	pub fn list_remove(&mut self, value: &[u8], count: i64) -> Result<usize> {
		let from_tail = count < 0;
		let limit = if count == 0 { usize::MAX } else { count.unsigned_abs() as usize };
		let mut removed = 0;
		match &mut self.data {
			Data::List(ListData::Packed(p)) => {
				loop {
					if removed >= limit {
						break;
					}
					let found = if from_tail {
						p.iter_rev().position(|v| v.to_bytes() == value).map(|i| p.len() - 1 - i)
					} else {
						p.find(value)
					};
					match found {
						Some(idx) => {
							p.delete(idx);
							removed += 1;
						}
						None => break,
					}
				}
			}
			Data::List(ListData::Linked(l)) => {
				loop {
					if removed >= limit {
						break;
					}
					let found = if from_tail { l.iter().rposition(|v| v == value) } else { l.iter().position(|v| v == value) };
					match found {
						Some(idx) => {
							l.remove(idx);
							removed += 1;
						}
						None => break,
					}
				}
			}
			_ => return Err(Error::WrongKind),
		}
		Ok(removed)
	}

	// ---- set ----

	fn promote_set_if_needed(&mut self, opts: &Options) {
		if let Data::Set(SetData::IntSet(s)) = &self.data {
			if s.len() > opts.set_max_intset_entries {
				let mut d: Dict<Vec<u8>, ()> = Dict::new();
				for v in s.iter() {
					d.insert(v.to_string().into_bytes(), ());
				}
				self.data = Data::Set(SetData::Hash(d));
			}
		}
	}

	pub fn set_add(&mut self, member: Vec<u8>, opts: &Options) -> Result<bool> {
		let as_int = try_canonical_int(&member);
		match &mut self.data {
			Data::Set(SetData::IntSet(s)) => match as_int {
				Some(n) => {
					let added = s.insert(n);
					self.promote_set_if_needed(opts);
					Ok(added)
				}
				None => {
					let mut d: Dict<Vec<u8>, ()> = Dict::new();
					for v in s.iter() {
						d.insert(v.to_string().into_bytes(), ());
					}
					let added = d.insert(member, ()).is_none();
					self.data = Data::Set(SetData::Hash(d));
					Ok(added)
				}
			},
			Data::Set(SetData::Hash(d)) => {
				let added = d.insert(member, ()).is_none();
				Ok(added)
			}
			_ => Err(Error::WrongKind),
		}
	}

	pub fn set_remove(&mut self, member: &[u8]) -> Result<bool> {
		match &mut self.data {
			Data::Set(SetData::IntSet(s)) => match try_canonical_int(member) {
				Some(n) => Ok(s.remove(n)),
				None => Ok(false),
			},
			Data::Set(SetData::Hash(d)) => Ok(d.remove(&member.to_vec()).is_some()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn set_is_member(&mut self, member: &[u8]) -> Result<bool> {
		match &mut self.data {
			Data::Set(SetData::IntSet(s)) => Ok(try_canonical_int(member).map_or(false, |n| s.contains(n))),
			Data::Set(SetData::Hash(d)) => Ok(d.contains_key(&member.to_vec())),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn set_card(&self) -> Result<usize> {
		match &self.data {
			Data::Set(SetData::IntSet(s)) => Ok(s.len()),
			Data::Set(SetData::Hash(d)) => Ok(d.len()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn set_members(&self) -> Result<Vec<Vec<u8>>> {
		match &self.data {
			Data::Set(SetData::IntSet(s)) => Ok(s.iter().map(|n| n.to_string().into_bytes()).collect()),
			Data::Set(SetData::Hash(d)) => Ok(d.keys().cloned().collect()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn set_random_member(&self, rng: &mut impl Rng) -> Result<Option<Vec<u8>>> {
		let members = self.set_members()?;
		if members.is_empty() {
			Ok(None)
		} else {
			Ok(Some(members[rng.gen_range(0..members.len())].clone()))
		}
	}

	pub fn set_pop_random(&mut self, rng: &mut impl Rng) -> Result<Option<Vec<u8>>> {
		match self.set_random_member(rng)? {
			Some(m) => {
				self.set_remove(&m)?;
				Ok(Some(m))
			}
			None => Ok(None),
		}
	}

	// ---- ordered set ----

	fn zset_entries(&self) -> Result<Vec<(Vec<u8>, f64)>> {
		match &self.data {
			Data::ZSet(ZSetData::Packed(p)) => {
				let mut out = Vec::new();
				let mut it = p.iter();
				while let (Some(member), Some(score)) = (it.next(), it.next()) {
					let member = member.to_bytes();
					let score: f64 = String::from_utf8_lossy(&score.to_bytes()).parse().unwrap_or(0.0);
					out.push((member, score));
				}
				Ok(out)
			}
			Data::ZSet(ZSetData::Skip(s)) => Ok(s.iter().map(|e| (e.member.clone(), e.score)).collect()),
			_ => Err(Error::WrongKind),
		}
	}

	fn promote_zset_if_needed(&mut self, opts: &Options) {
		if let Data::ZSet(ZSetData::Packed(_)) = &self.data {
			let entries = self.zset_entries().unwrap_or_default();
			let needs = entries.len() > opts.zset_max_ziplist_entries
				|| entries.iter().any(|(m, _)| m.len() > opts.zset_max_ziplist_value);
			if needs {
				let mut rng = rand::thread_rng();
				let mut skip = SkipList::new();
				for (m, s) in entries {
					skip.insert(m, s, &mut rng);
				}
				self.data = Data::ZSet(ZSetData::Skip(skip));
			}
		}
	}

	pub fn zset_add(&mut self, member: Vec<u8>, score: f64, opts: &Options) -> Result<bool> {
		match &mut self.data {
			Data::ZSet(ZSetData::Packed(p)) => {
				let mut it = p.iter();
				let mut idx = None;
				let mut i = 0;
				while let (Some(m), Some(_)) = (it.next(), it.next()) {
					if m.to_bytes() == member {
						idx = Some(i);
						break;
					}
					i += 1;
				}
				let is_new = idx.is_none();
				if let Some(i) = idx {
					p.delete(i * 2 + 1);
					p.delete(i * 2);
				}
				p.push_tail(&member);
				p.push_tail(score.to_string().as_bytes());
				self.promote_zset_if_needed(opts);
				Ok(is_new)
			}
			Data::ZSet(ZSetData::Skip(s)) => {
				let is_new = !s.contains(&member);
				let mut rng = rand::thread_rng();
				s.insert(member, score, &mut rng);
				Ok(is_new)
			}
			_ => Err(Error::WrongKind),
		}
	}

	pub fn zset_score(&self, member: &[u8]) -> Result<Option<f64>> {
		match &self.data {
			Data::ZSet(ZSetData::Packed(_)) => Ok(self.zset_entries()?.into_iter().find(|(m, _)| m == member).map(|(_, s)| s)),
			Data::ZSet(ZSetData::Skip(s)) => Ok(s.score(member)),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn zset_remove(&mut self, member: &[u8]) -> Result<bool> {
		match &mut self.data {
			Data::ZSet(ZSetData::Packed(p)) => {
				let mut it = p.iter();
				let mut idx = None;
				let mut i = 0;
				while let (Some(m), Some(_)) = (it.next(), it.next()) {
					if m.to_bytes() == member {
						idx = Some(i);
						break;
					}
					i += 1;
				}
				match idx {
					Some(i) => {
						p.delete(i * 2 + 1);
						p.delete(i * 2);
						Ok(true)
					}
					None => Ok(false),
				}
			}
			Data::ZSet(ZSetData::Skip(s)) => Ok(s.remove(member)),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn zset_card(&self) -> Result<usize> {
		match &self.data {
			Data::ZSet(ZSetData::Packed(p)) => Ok(p.len() / 2),
			Data::ZSet(ZSetData::Skip(s)) => Ok(s.len()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn zset_rank(&self, member: &[u8], reverse: bool) -> Result<Option<u64>> {
		let mut entries = self.zset_entries()?;
		entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then_with(|| a.0.cmp(&b.0)));
		let card = entries.len() as u64;
		let pos = entries.iter().position(|(m, _)| m == member);
		Ok(pos.map(|p| if reverse { card - 1 - p as u64 } else { p as u64 }))
	}

	pub fn zset_range_by_rank(&self, start: i64, stop: i64) -> Result<Vec<(Vec<u8>, f64)>> {
		let mut entries = self.zset_entries()?;
		entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then_with(|| a.0.cmp(&b.0)));
		let len = entries.len() as i64;
		if len == 0 {
			return Ok(Vec::new());
		}
		let (lo, hi) = normalize_range(start, stop, len);
		if lo > hi {
			return Ok(Vec::new());
		}
		Ok(entries[lo as usize..=hi as usize].to_vec())
	}

	pub fn zset_range_by_score(&self, min: f64, min_inclusive: bool, max: f64, max_inclusive: bool) -> Result<Vec<(Vec<u8>, f64)>> {
		let mut entries = self.zset_entries()?;
		entries.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then_with(|| a.0.cmp(&b.0)));
		Ok(entries
			.into_iter()
			.filter(|(_, s)| {
				let above = if min_inclusive { *s >= min } else { *s > min };
				let below = if max_inclusive { *s <= max } else { *s < max };
				above && below
			})
			.collect())
	}

	pub fn zset_count_in_range(&self, min: f64, min_inclusive: bool, max: f64, max_inclusive: bool) -> Result<u64> {
		Ok(self.zset_range_by_score(min, min_inclusive, max, max_inclusive)?.len() as u64)
	}

	pub fn zset_incr_by(&mut self, member: Vec<u8>, delta: f64, opts: &Options) -> Result<f64> {
		let current = self.zset_score(&member)?.unwrap_or(0.0);
		let next = current + delta;
		self.zset_add(member, next, opts)?;
		Ok(next)
	}

	// ---- hash ----

	fn promote_hash_if_needed(&mut self, opts: &Options) {
		if let Data::Hash(HashData::Packed(p)) = &self.data {
			let needs = p.len() / 2 > opts.hash_max_ziplist_entries
				|| p.iter().any(|v| v.to_bytes().len() > opts.hash_max_ziplist_value);
			if needs {
				let mut d: Dict<Vec<u8>, Vec<u8>> = Dict::new();
				let mut it = p.iter();
				while let (Some(f), Some(v)) = (it.next(), it.next()) {
					d.insert(f.to_bytes(), v.to_bytes());
				}
				self.data = Data::Hash(HashData::Table(d));
			}
		}
	}

	/// Returns whether the field was newly created (per-field independent, §7/§9).
	pub fn hash_set_field(&mut self, field: Vec<u8>, value: Vec<u8>, opts: &Options) -> Result<bool> {
		match &mut self.data {
			Data::Hash(HashData::Packed(p)) => {
				let mut it = p.iter();
				let mut idx = None;
				let mut i = 0;
				while let (Some(f), Some(_)) = (it.next(), it.next()) {
					if f.to_bytes() == field {
						idx = Some(i);
						break;
					}
					i += 1;
				}
				let is_new = idx.is_none();
				if let Some(i) = idx {
					p.delete(i * 2 + 1);
					p.delete(i * 2);
				}
				p.push_tail(&field);
				p.push_tail(&value);
				self.promote_hash_if_needed(opts);
				Ok(is_new)
			}
			Data::Hash(HashData::Table(d)) => Ok(d.insert(field, value).is_none()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn hash_get_field(&mut self, field: &[u8]) -> Result<Option<Vec<u8>>> {
		match &mut self.data {
			Data::Hash(HashData::Packed(p)) => {
				let mut it = p.iter();
				while let (Some(f), Some(v)) = (it.next(), it.next()) {
					if f.to_bytes() == field {
						return Ok(Some(v.to_bytes()));
					}
				}
				Ok(None)
			}
			Data::Hash(HashData::Table(d)) => Ok(d.get(&field.to_vec()).cloned()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn hash_delete_field(&mut self, field: &[u8]) -> Result<bool> {
		match &mut self.data {
			Data::Hash(HashData::Packed(p)) => {
				let mut it = p.iter();
				let mut idx = None;
				let mut i = 0;
				while let (Some(f), Some(_)) = (it.next(), it.next()) {
					if f.to_bytes() == field {
						idx = Some(i);
						break;
					}
					i += 1;
				}
				match idx {
					Some(i) => {
						p.delete(i * 2 + 1);
						p.delete(i * 2);
						Ok(true)
					}
					None => Ok(false),
				}
			}
			Data::Hash(HashData::Table(d)) => Ok(d.remove(&field.to_vec()).is_some()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn hash_field_exists(&mut self, field: &[u8]) -> Result<bool> {
		Ok(self.hash_get_field(field)?.is_some())
	}

	pub fn hash_len(&self) -> Result<usize> {
		match &self.data {
			Data::Hash(HashData::Packed(p)) => Ok(p.len() / 2),
			Data::Hash(HashData::Table(d)) => Ok(d.len()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn hash_entries(&self) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
		match &self.data {
			Data::Hash(HashData::Packed(p)) => {
				let mut out = Vec::new();
				let mut it = p.iter();
				while let (Some(f), Some(v)) = (it.next(), it.next()) {
					out.push((f.to_bytes(), v.to_bytes()));
				}
				Ok(out)
			}
			Data::Hash(HashData::Table(d)) => Ok(d.iter().map(|(k, v)| (k.clone(), v.clone())).collect()),
			_ => Err(Error::WrongKind),
		}
	}

	pub fn hash_keys(&self) -> Result<Vec<Vec<u8>>> {
		Ok(self.hash_entries()?.into_iter().map(|(k, _)| k).collect())
	}

	pub fn hash_values(&self) -> Result<Vec<Vec<u8>>> {
		Ok(self.hash_entries()?.into_iter().map(|(_, v)| v).collect())
	}

	pub fn hash_incr_by(&mut self, field: Vec<u8>, delta: i64, opts: &Options) -> Result<i64> {
		let current = match self.hash_get_field(&field)? {
			Some(b) => try_canonical_int(&b).ok_or(Error::Syntax("hash value is not an integer".into()))?,
			None => 0,
		};
		let next = current.checked_add(delta).ok_or(Error::OutOfRange("increment would overflow".into()))?;
		self.hash_set_field(field, next.to_string().into_bytes(), opts)?;
		Ok(next)
	}

	// ---- encoding introspection for the snapshot codec and tests ----

	pub fn is_compact(&self) -> bool {
		matches!(
			&self.data,
			Data::Str(StringData::IntImmediate(_)) | Data::Str(StringData::Inline(_))
				| Data::List(ListData::Packed(_))
				| Data::Set(SetData::IntSet(_))
				| Data::ZSet(ZSetData::Packed(_))
				| Data::Hash(HashData::Packed(_))
		)
	}

	/// The §6 value-type tag for this object's current encoding.
	pub fn snapshot_tag(&self) -> u8 {
		match &self.data {
			Data::Str(_) => 0,
			Data::List(ListData::Linked(_)) => 1,
			Data::Set(SetData::Hash(_)) => 2,
			Data::ZSet(ZSetData::Skip(_)) => 3,
			Data::Hash(HashData::Table(_)) => 4,
			Data::List(ListData::Packed(_)) => 10,
			Data::Set(SetData::IntSet(_)) => 11,
			Data::ZSet(ZSetData::Packed(_)) => 12,
			Data::Hash(HashData::Packed(_)) => 13,
		}
	}

	/// Raw bytes of a compact encoding's backing buffer, written verbatim as
	/// an opaque blob under its type tag (§4.9). `None` for expanded objects
	/// and for strings (which go through the ordinary string-encoding path).
	pub fn compact_bytes(&self) -> Option<Vec<u8>> {
		match &self.data {
			Data::List(ListData::Packed(p)) => Some(p.as_bytes().to_vec()),
			Data::Set(SetData::IntSet(s)) => Some(s.to_bytes()),
			Data::ZSet(ZSetData::Packed(p)) => Some(p.as_bytes().to_vec()),
			Data::Hash(HashData::Packed(p)) => Some(p.as_bytes().to_vec()),
			_ => None,
		}
	}

	/// Reconstructs a compact-encoded object from its type tag and raw blob
	/// (§4.11, the inverse of `compact_bytes`).
	pub fn from_compact(tag: u8, bytes: Vec<u8>, now_ms: u64) -> Result<Object> {
		let data = match tag {
			10 => Data::List(ListData::Packed(PackedSeq::from_bytes(bytes))),
			11 => Data::Set(SetData::IntSet(IntSet::from_bytes(&bytes))),
			12 => Data::ZSet(ZSetData::Packed(PackedSeq::from_bytes(bytes))),
			13 => Data::Hash(HashData::Packed(PackedSeq::from_bytes(bytes))),
			other => return Err(Error::FormatUnsupported(other as u32)),
		};
		Ok(Object { data, access_time_ms: now_ms })
	}

	pub fn from_list_expanded(items: Vec<Vec<u8>>, now_ms: u64) -> Object {
		Object { data: Data::List(ListData::Linked(items.into_iter().collect())), access_time_ms: now_ms }
	}

	pub fn from_set_expanded(members: Vec<Vec<u8>>, now_ms: u64) -> Object {
		let mut d: Dict<Vec<u8>, ()> = Dict::new();
		for m in members {
			d.insert(m, ());
		}
		Object { data: Data::Set(SetData::Hash(d)), access_time_ms: now_ms }
	}

	pub fn from_zset_expanded(entries: Vec<(Vec<u8>, f64)>, now_ms: u64) -> Object {
		let mut rng = rand::thread_rng();
		let mut skip = SkipList::new();
		for (m, s) in entries {
			skip.insert(m, s, &mut rng);
		}
		Object { data: Data::ZSet(ZSetData::Skip(skip)), access_time_ms: now_ms }
	}

	pub fn from_hash_expanded(entries: Vec<(Vec<u8>, Vec<u8>)>, now_ms: u64) -> Object {
		let mut d: Dict<Vec<u8>, Vec<u8>> = Dict::new();
		for (f, v) in entries {
			d.insert(f, v);
		}
		Object { data: Data::Hash(HashData::Table(d)), access_time_ms: now_ms }
	}
}

fn normalize_index(index: i64, len: i64) -> Option<i64> {
	let idx = if index < 0 { len + index } else { index };
	if idx < 0 || idx >= len {
		None
	} else {
		Some(idx)
	}
}

fn normalize_range(start: i64, stop: i64, len: i64) -> (i64, i64) {
	let mut lo = if start < 0 { (len + start).max(0) } else { start.min(len) };
	let mut hi = if stop < 0 { len + stop } else { stop.min(len - 1) };
	if hi >= len {
		hi = len - 1;
	}
	if lo < 0 {
		lo = 0;
	}
	(lo, hi)
}

/// Set algebra (§4.5): intersection iterates the smallest input and probes
/// the rest; difference picks the cheaper strategy by estimated work.
pub fn set_union(sets: &[Vec<Vec<u8>>]) -> Vec<Vec<u8>> {
	let mut seen = std::collections::HashSet::new();
	let mut out = Vec::new();
	for s in sets {
		for m in s {
			if seen.insert(m.clone()) {
				out.push(m.clone());
			}
		}
	}
	out
}

pub fn set_intersect(sets: &[Vec<Vec<u8>>]) -> Vec<Vec<u8>> {
	if sets.is_empty() {
		return Vec::new();
	}
	let smallest = sets.iter().min_by_key(|s| s.len()).unwrap();
	let rest: Vec<&Vec<Vec<u8>>> = sets.iter().filter(|s| !std::ptr::eq(*s, smallest)).collect();
	smallest
		.iter()
		.filter(|m| rest.iter().all(|s| s.contains(m)))
		.cloned()
		.collect()
}

pub fn set_difference(a: &[Vec<u8>], others: &[Vec<Vec<u8>>]) -> Vec<Vec<u8>> {
	let iterate_and_filter_cost = a.len() * others.len().max(1);
	let copy_then_subtract_cost: usize = others.iter().map(|s| s.len()).sum::<usize>() + a.len();
	if iterate_and_filter_cost <= copy_then_subtract_cost {
		a.iter().filter(|m| !others.iter().any(|s| s.contains(m))).cloned().collect()
	} else {
		let mut remaining: std::collections::HashSet<Vec<u8>> = a.iter().cloned().collect();
		for s in others {
			for m in s {
				remaining.remove(m);
			}
		}
		a.iter().filter(|m| remaining.contains(*m)).cloned().collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn opts() -> Options {
		Options::default()
	}

	#[test]
	fn string_set_get_append() {
		let mut o = Object::new_string(b"bar".to_vec(), &opts(), 0);
		assert_eq!(o.str_get().unwrap(), b"bar");
		o.str_append(b"baz", &opts()).unwrap();
		assert_eq!(o.str_len().unwrap(), 6);
		assert_eq!(o.str_get().unwrap(), b"barbaz");
	}

	#[test]
	fn string_increment_requires_integer_representable_value() {
		let mut o = Object::new_string(b"10".to_vec(), &opts(), 0);
		assert_eq!(o.str_incr_by(5, &opts()).unwrap(), 15);
		let mut o2 = Object::new_string(b"abc".to_vec(), &opts(), 0);
		assert!(matches!(o2.str_incr_by(1, &opts()), Err(Error::Syntax(_))));
	}

	#[test]
	fn set_promotes_from_intset_to_hash_on_non_integer_member() {
		let mut o = Object::new_set(0);
		o.set_add(b"1".to_vec(), &opts()).unwrap();
		o.set_add(b"2".to_vec(), &opts()).unwrap();
		o.set_add(b"3".to_vec(), &opts()).unwrap();
		assert!(matches!(&o.data, Data::Set(SetData::IntSet(_))));
		o.set_add(b"x".to_vec(), &opts()).unwrap();
		assert!(matches!(&o.data, Data::Set(SetData::Hash(_))));
		assert_eq!(o.set_card().unwrap(), 4);
	}

	#[test]
	fn zset_range_by_score_and_rank() {
		let mut o = Object::new_zset(0);
		o.zset_add(b"a".to_vec(), 1.0, &opts()).unwrap();
		o.zset_add(b"b".to_vec(), 2.0, &opts()).unwrap();
		o.zset_add(b"c".to_vec(), 3.0, &opts()).unwrap();
		let r = o.zset_range_by_score(1.0, false, 3.0, true).unwrap();
		assert_eq!(r, vec![(b"b".to_vec(), 2.0), (b"c".to_vec(), 3.0)]);
		assert_eq!(o.zset_rank(b"c", false).unwrap(), Some(2));
	}

	#[test]
	fn hash_set_and_get_preserve_insertion_order_in_compact_form() {
		let mut o = Object::new_hash(0);
		o.hash_set_field(b"f1".to_vec(), b"a".to_vec(), &opts()).unwrap();
		o.hash_set_field(b"f2".to_vec(), b"b".to_vec(), &opts()).unwrap();
		assert_eq!(o.hash_entries().unwrap(), vec![(b"f1".to_vec(), b"a".to_vec()), (b"f2".to_vec(), b"b".to_vec())]);
	}

	#[test]
	fn list_promotes_to_linked_past_entry_threshold() {
		let mut small_opts = opts();
		small_opts.list_max_ziplist_entries = 2;
		let mut o = Object::new_list(0);
		o.list_push(b"a".to_vec(), false, &small_opts).unwrap();
		o.list_push(b"b".to_vec(), false, &small_opts).unwrap();
		assert!(matches!(&o.data, Data::List(ListData::Packed(_))));
		o.list_push(b"c".to_vec(), false, &small_opts).unwrap();
		assert!(matches!(&o.data, Data::List(ListData::Linked(_))));
		assert_eq!(o.list_range(0, -1).unwrap(), vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
	}

	#[test]
	fn wrong_kind_operation_fails() {
		let mut o = Object::new_string(b"x".to_vec(), &opts(), 0);
		assert!(matches!(o.list_push(b"y".to_vec(), false, &opts()), Err(Error::WrongKind)));
	}

	#[test]
	fn set_algebra_laws() {
		let a: Vec<Vec<u8>> = vec![b"1".to_vec(), b"2".to_vec(), b"3".to_vec()];
		let b: Vec<Vec<u8>> = vec![b"2".to_vec(), b"3".to_vec(), b"4".to_vec()];
		let mut inter_ab = set_intersect(&[a.clone(), b.clone()]);
		let mut inter_ba = set_intersect(&[b.clone(), a.clone()]);
		inter_ab.sort();
		inter_ba.sort();
		assert_eq!(inter_ab, inter_ba);
		let diff = set_difference(&a, &[a.clone()]);
		assert!(diff.is_empty());
	}
}
