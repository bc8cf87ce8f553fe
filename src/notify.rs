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

//! Change-notification boundary (§6): the core only calls out, it never
//! interprets what a watcher does with these events (optimistic-concurrency
//! watches and keyspace-event pub/sub live outside this crate).

/// Implemented by the external collaborator that fans notifications out to
/// watchers/pub-sub. `db` is the logical database index.
pub trait Notifier {
	fn notify_modified(&self, db: usize, key: &[u8]);
	fn notify_flushed(&self, db: Option<usize>);
}

/// Default no-op sink, used wherever no watcher collaborator is wired up.
pub struct NullNotifier;

impl Notifier for NullNotifier {
	fn notify_modified(&self, _db: usize, _key: &[u8]) {}
	fn notify_flushed(&self, _db: Option<usize>) {}
}
