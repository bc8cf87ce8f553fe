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

//! A sorted array of fixed-width signed integers (§4.2), used as the compact
//! encoding for sets whose members are all representable as integers. Width
//! is auto-promoted among 16/32/64-bit and only ever grows.

use rand::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Width {
	W16,
	W32,
	W64,
}

impl Width {
	fn bytes(self) -> usize {
		match self {
			Width::W16 => 2,
			Width::W32 => 4,
			Width::W64 => 8,
		}
	}

	fn fits(self, v: i64) -> bool {
		match self {
			Width::W16 => i16::try_from(v).is_ok(),
			Width::W32 => i32::try_from(v).is_ok(),
			Width::W64 => true,
		}
	}

	fn needed_for(v: i64) -> Width {
		if i16::try_from(v).is_ok() {
			Width::W16
		} else if i32::try_from(v).is_ok() {
			Width::W32
		} else {
			Width::W64
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct IntSet {
	width: Option<Width>,
	values: Vec<i64>,
}

impl IntSet {
	pub fn new() -> IntSet {
		IntSet { width: None, values: Vec::new() }
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn width(&self) -> Option<Width> {
		self.width
	}

	fn search(&self, value: i64) -> Result<usize, usize> {
		self.values.binary_search(&value)
	}

	pub fn contains(&self, value: i64) -> bool {
		self.search(value).is_ok()
	}

	pub fn insert(&mut self, value: i64) -> bool {
		let needed = Width::needed_for(value);
		self.width = Some(match self.width {
			None => needed,
			Some(w) => w.max(needed),
		});
		match self.search(value) {
			Ok(_) => false,
			Err(pos) => {
				self.values.insert(pos, value);
				true
			}
		}
	}

	pub fn remove(&mut self, value: i64) -> bool {
		match self.search(value) {
			Ok(pos) => {
				self.values.remove(pos);
				if self.values.is_empty() {
					self.width = None;
				}
				true
			}
			Err(_) => false,
		}
	}

	pub fn random(&self, rng: &mut impl Rng) -> Option<i64> {
		if self.values.is_empty() {
			None
		} else {
			Some(self.values[rng.gen_range(0..self.values.len())])
		}
	}

	pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
		self.values.iter().copied()
	}

	/// Serializes the width tag followed by the tightly packed sorted array,
	/// matching §4.2's on-disk layout for the compact set encoding.
	pub fn to_bytes(&self) -> Vec<u8> {
		let width = self.width.unwrap_or(Width::W16);
		let mut out = Vec::with_capacity(1 + self.values.len() * width.bytes());
		out.push(match width {
			Width::W16 => 2,
			Width::W32 => 4,
			Width::W64 => 8,
		});
		for v in &self.values {
			match width {
				Width::W16 => out.extend_from_slice(&(*v as i16).to_le_bytes()),
				Width::W32 => out.extend_from_slice(&(*v as i32).to_le_bytes()),
				Width::W64 => out.extend_from_slice(&v.to_le_bytes()),
			}
		}
		out
	}

	pub fn from_bytes(buf: &[u8]) -> IntSet {
		if buf.is_empty() {
			return IntSet::new();
		}
		let width = match buf[0] {
			2 => Width::W16,
			4 => Width::W32,
			8 => Width::W64,
			_ => Width::W64,
		};
		let stride = width.bytes();
		let mut values = Vec::new();
		let mut pos = 1;
		while pos + stride <= buf.len() {
			let v: i64 = match width {
				Width::W16 => i16::from_le_bytes(buf[pos..pos + 2].try_into().unwrap()) as i64,
				Width::W32 => i32::from_le_bytes(buf[pos..pos + 4].try_into().unwrap()) as i64,
				Width::W64 => i64::from_le_bytes(buf[pos..pos + 8].try_into().unwrap()),
			};
			values.push(v);
			pos += stride;
		}
		IntSet { width: if values.is_empty() { None } else { Some(width) }, values }
	}
}
