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

//! Ordered-set compact-overflow encoding: a probabilistic skiplist keyed by
//! (score, member) plus a companion hash map for O(1) score lookup (§4.4).
//! Single-threaded, arena-indexed (`Vec<Node>` with `Option<usize>` links)
//! rather than the pointer-chasing/epoch-reclaimed style of concurrent
//! skiplists, since §5 fixes single-threaded cooperative access.

use std::collections::HashMap;
use rand::Rng;

const MAX_LEVEL: usize = 32;
const BRANCHING_P: f64 = 0.25;

#[derive(Clone, Debug, PartialEq)]
pub struct Entry {
	pub score: f64,
	pub member: Vec<u8>,
}

fn entry_less(a: &Entry, b: &Entry) -> bool {
	(a.score, &a.member) < (b.score, &b.member)
}

#[derive(Clone)]
struct Node {
	entry: Option<Entry>, // None only for the head sentinel
	forward: Vec<Option<usize>>,
	span: Vec<u64>,
	backward: Option<usize>,
}

#[derive(Clone)]
pub struct SkipList {
	nodes: Vec<Node>,
	level: usize,
	len: usize,
	scores: HashMap<Vec<u8>, f64>,
}

fn random_level(rng: &mut impl Rng) -> usize {
	let mut level = 1;
	while level < MAX_LEVEL && rng.gen::<f64>() < BRANCHING_P {
		level += 1;
	}
	level
}

impl SkipList {
	pub fn new() -> SkipList {
		let head = Node { entry: None, forward: vec![None; MAX_LEVEL], span: vec![0; MAX_LEVEL], backward: None };
		SkipList { nodes: vec![head], level: 1, len: 0, scores: HashMap::new() }
	}

	pub fn len(&self) -> usize {
		self.len
	}

	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	pub fn score(&self, member: &[u8]) -> Option<f64> {
		self.scores.get(member).copied()
	}

	pub fn contains(&self, member: &[u8]) -> bool {
		self.scores.contains_key(member)
	}

	const HEAD: usize = 0;

	/// Finds, per level, the rightmost node whose entry is strictly less than
	/// `entry`, and the cumulative rank (span sum) up to and including each.
	fn find_predecessors(&self, entry: &Entry) -> ([usize; MAX_LEVEL], [u64; MAX_LEVEL]) {
		let mut update = [Self::HEAD; MAX_LEVEL];
		let mut rank = [0u64; MAX_LEVEL];
		let mut cur = Self::HEAD;
		for lvl in (0..self.level).rev() {
			rank[lvl] = if lvl == self.level - 1 { 0 } else { rank[lvl + 1] };
			loop {
				match self.nodes[cur].forward[lvl] {
					Some(next) if entry_less(self.nodes[next].entry.as_ref().unwrap(), entry) => {
						rank[lvl] += self.nodes[cur].span[lvl];
						cur = next;
					}
					_ => break,
				}
			}
			update[lvl] = cur;
		}
		(update, rank)
	}

	pub fn insert(&mut self, member: Vec<u8>, score: f64, rng: &mut impl Rng) {
		if let Some(&old_score) = self.scores.get(&member) {
			if old_score == score {
				return;
			}
			self.remove(&member);
		}
		let entry = Entry { score, member: member.clone() };
		let (update, rank) = self.find_predecessors(&entry);
		let new_level = random_level(rng);
		if new_level > self.level {
			for lvl in self.level..new_level {
				self.nodes[Self::HEAD].forward[lvl] = None;
				self.nodes[Self::HEAD].span[lvl] = self.len as u64 + 1;
			}
			self.level = new_level;
		}
		let new_idx = self.nodes.len();
		let mut forward = vec![None; new_level];
		let mut span = vec![0u64; new_level];
		for lvl in 0..new_level {
			let pred = update[lvl];
			forward[lvl] = self.nodes[pred].forward[lvl];
			let pred_span = self.nodes[pred].span[lvl];
			let rank0 = rank[0];
			let rank_l = rank[lvl];
			span[lvl] = pred_span.saturating_sub(rank0 - rank_l);
			self.nodes[pred].span[lvl] = rank0 - rank_l + 1;
			self.nodes[pred].forward[lvl] = Some(new_idx);
		}
		for lvl in new_level..self.level {
			let pred = update[lvl];
			self.nodes[pred].span[lvl] += 1;
		}
		let backward = if update[0] == Self::HEAD { None } else { Some(update[0]) };
		self.nodes.push(Node { entry: Some(entry), forward, span, backward });
		if let Some(next) = self.nodes[new_idx].forward.get(0).copied().flatten() {
			self.nodes[next].backward = Some(new_idx);
		}
		self.scores.insert(member, score);
		self.len += 1;
	}

	pub fn remove(&mut self, member: &[u8]) -> bool {
		let score = match self.scores.remove(member) {
			Some(s) => s,
			None => return false,
		};
		let target = Entry { score, member: member.to_vec() };
		let (update, _rank) = self.find_predecessors(&target);
		let idx = match self.nodes[update[0]].forward[0] {
			Some(i) if self.nodes[i].entry.as_ref().map(|e| e.member.as_slice()) == Some(member) => i,
			_ => return false,
		};
		let node_level = self.nodes[idx].forward.len();
		for lvl in 0..self.level {
			let pred = update[lvl];
			if lvl < node_level && self.nodes[pred].forward[lvl] == Some(idx) {
				self.nodes[pred].span[lvl] += self.nodes[idx].span[lvl];
				self.nodes[pred].span[lvl] -= 1;
				self.nodes[pred].forward[lvl] = self.nodes[idx].forward[lvl];
			} else {
				self.nodes[pred].span[lvl] -= 1;
			}
		}
		if let Some(next) = self.nodes[idx].forward.get(0).copied().flatten() {
			self.nodes[next].backward = self.nodes[idx].backward;
		}
		self.nodes[idx].entry = None;
		self.len -= 1;
		true
	}

	/// 0-based forward rank of `member`, or `None` if absent.
	pub fn rank(&self, member: &[u8]) -> Option<u64> {
		let score = self.scores.get(member)?;
		let target = Entry { score: *score, member: member.to_vec() };
		let (update, rank) = self.find_predecessors(&target);
		let candidate = self.nodes[update[0]].forward[0]?;
		if self.nodes[candidate].entry.as_ref().map(|e| e.member.as_slice()) == Some(member) {
			Some(rank[0])
		} else {
			None
		}
	}

	/// Entries with 0-based rank in `[start, stop]` inclusive, ascending.
	pub fn range_by_rank(&self, start: u64, stop: u64) -> Vec<Entry> {
		let mut out = Vec::new();
		let mut cur = Self::HEAD;
		let mut idx = 0u64;
		loop {
			let next = self.nodes[cur].forward[0];
			let next = match next {
				Some(n) => n,
				None => break,
			};
			if idx > stop {
				break;
			}
			if idx >= start {
				out.push(self.nodes[next].entry.clone().unwrap());
			}
			cur = next;
			idx += 1;
		}
		out
	}

	/// Entries with score in `(min, max)` bounds (inclusive flags per bound).
	pub fn range_by_score(&self, min: f64, min_inclusive: bool, max: f64, max_inclusive: bool) -> Vec<Entry> {
		let mut out = Vec::new();
		let mut cur = Self::HEAD;
		loop {
			let next = match self.nodes[cur].forward[0] {
				Some(n) => n,
				None => break,
			};
			let entry = self.nodes[next].entry.as_ref().unwrap();
			let above_min = if min_inclusive { entry.score >= min } else { entry.score > min };
			if !above_min {
				cur = next;
				continue;
			}
			let below_max = if max_inclusive { entry.score <= max } else { entry.score < max };
			if !below_max {
				break;
			}
			out.push(entry.clone());
			cur = next;
		}
		out
	}

	pub fn count_in_range(&self, min: f64, min_inclusive: bool, max: f64, max_inclusive: bool) -> u64 {
		self.range_by_score(min, min_inclusive, max, max_inclusive).len() as u64
	}

	pub fn iter(&self) -> impl Iterator<Item = &Entry> {
		let mut cur = self.nodes[Self::HEAD].forward[0];
		std::iter::from_fn(move || {
			let idx = cur?;
			cur = self.nodes[idx].forward[0];
			self.nodes[idx].entry.as_ref()
		})
	}
}

impl Default for SkipList {
	fn default() -> SkipList {
		SkipList::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	fn rng() -> StdRng {
		StdRng::seed_from_u64(42)
	}

	#[test]
	fn insert_then_iterate_in_ascending_score_order() {
		let mut s = SkipList::new();
		let mut r = rng();
		s.insert(b"c".to_vec(), 3.0, &mut r);
		s.insert(b"a".to_vec(), 1.0, &mut r);
		s.insert(b"b".to_vec(), 2.0, &mut r);
		let members: Vec<Vec<u8>> = s.iter().map(|e| e.member.clone()).collect();
		assert_eq!(members, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
	}

	#[test]
	fn rank_reflects_ascending_position() {
		let mut s = SkipList::new();
		let mut r = rng();
		s.insert(b"a".to_vec(), 1.0, &mut r);
		s.insert(b"b".to_vec(), 2.0, &mut r);
		s.insert(b"c".to_vec(), 3.0, &mut r);
		assert_eq!(s.rank(b"a"), Some(0));
		assert_eq!(s.rank(b"b"), Some(1));
		assert_eq!(s.rank(b"c"), Some(2));
		assert_eq!(s.rank(b"missing"), None);
	}

	#[test]
	fn range_by_score_respects_open_and_closed_bounds() {
		let mut s = SkipList::new();
		let mut r = rng();
		s.insert(b"a".to_vec(), 1.0, &mut r);
		s.insert(b"b".to_vec(), 2.0, &mut r);
		s.insert(b"c".to_vec(), 3.0, &mut r);
		let members: Vec<Vec<u8>> = s.range_by_score(1.0, false, 3.0, true).into_iter().map(|e| e.member).collect();
		assert_eq!(members, vec![b"b".to_vec(), b"c".to_vec()]);
	}

	#[test]
	fn remove_updates_rank_and_membership() {
		let mut s = SkipList::new();
		let mut r = rng();
		for (m, sc) in [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0)] {
			s.insert(m.as_bytes().to_vec(), sc, &mut r);
		}
		assert!(s.remove(b"b"));
		assert!(!s.contains(b"b"));
		assert_eq!(s.rank(b"c"), Some(1));
		assert_eq!(s.len(), 3);
	}

	#[test]
	fn re_insert_with_new_score_reorders() {
		let mut s = SkipList::new();
		let mut r = rng();
		s.insert(b"a".to_vec(), 1.0, &mut r);
		s.insert(b"b".to_vec(), 2.0, &mut r);
		s.insert(b"a".to_vec(), 5.0, &mut r);
		let members: Vec<Vec<u8>> = s.iter().map(|e| e.member.clone()).collect();
		assert_eq!(members, vec![b"b".to_vec(), b"a".to_vec()]);
		assert_eq!(s.score(b"a"), Some(5.0));
	}

	#[test]
	fn range_by_rank_is_inclusive_on_both_ends() {
		let mut s = SkipList::new();
		let mut r = rng();
		for (m, sc) in [("a", 1.0), ("b", 2.0), ("c", 3.0), ("d", 4.0), ("e", 5.0)] {
			s.insert(m.as_bytes().to_vec(), sc, &mut r);
		}
		let members: Vec<Vec<u8>> = s.range_by_rank(1, 3).into_iter().map(|e| e.member).collect();
		assert_eq!(members, vec![b"b".to_vec(), b"c".to_vec(), b"d".to_vec()]);
	}
}
