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

//! Replication/log boundary (§4.7, §5, §6). The core only knows whether it is
//! a leader or a follower, and how to hand a synthesized command to whatever
//! feeds the append-log and the follower links; it implements none of that
//! itself.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
	Leader,
	Follower,
}

/// Implemented by the external append-log/replication feeder. `propagate`
/// must be called, and must return, before the local mutation it describes
/// takes effect — see §5's ordering guarantee.
pub trait Propagator {
	fn propagate(&self, db: usize, argv: &[Vec<u8>]);
}

pub struct NullPropagator;

impl Propagator for NullPropagator {
	fn propagate(&self, _db: usize, _argv: &[Vec<u8>]) {}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn role_equality() {
		assert_eq!(Role::Leader, Role::Leader);
		assert_ne!(Role::Leader, Role::Follower);
	}

	#[test]
	fn null_propagator_accepts_any_argv() {
		let p = NullPropagator;
		p.propagate(0, &[b"DEL".to_vec(), b"k".to_vec()]);
	}
}
