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

//! An in-memory keyspace engine for a single-node key-value database:
//! typed values with adaptive compact/expanded encodings, per-key TTL with
//! lazy expiration, multiple logical databases, and a binary snapshot codec
//! for durable point-in-time saves. See `DESIGN.md` for how each module
//! here is grounded and `SPEC_FULL.md` for the full specification.

pub mod db;
pub mod dict;
pub mod error;
pub mod glob;
pub mod intset;
pub mod notify;
pub mod options;
pub mod packed;
pub mod rdb;
pub mod replication;
pub mod skiplist;
pub mod snapshot;
pub mod value;

pub use db::{Database, ExpireOutcome, Keyspace, ValueRef};
pub use error::{Error, Result};
pub use notify::{NullNotifier, Notifier};
pub use options::Options;
pub use replication::{NullPropagator, Propagator, Role};
pub use value::{Category, Object};
