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

//! Background snapshot orchestration (§4.8's background variant, §5, §9).
//! The teacher already reaches for `libc` for low-level file control in
//! `table.rs::open`'s `F_RDAHEAD` call; here it backs `fork`/`waitpid`
//! directly on unix, matching §9's resolved Open Question. Non-unix targets
//! fall back to the synchronous writer within the same call.

use std::path::{Path, PathBuf};

use crate::db::Keyspace;
use crate::error::{Error, Result};
use crate::rdb::writer;

/// How a background snapshot child finished, translated from its exit
/// status (§6: "0 success, 1 error; signal termination is error").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOutcome {
	Success,
	Error,
	Killed,
}

fn temp_path_for(path: &Path, pid: u32) -> PathBuf {
	let dir = path.parent().unwrap_or_else(|| Path::new("."));
	dir.join(format!("temp-{}.snapshot", pid))
}

/// Starts a point-in-time save to `path`. Disables rehash stepping across
/// every database for as long as a child is alive (§4.3, §5): the parent
/// must not dirty pages the child's copy-on-write view is still reading.
/// Fails with `AlreadyInProgress` if a child is already running.
pub fn save_in_background(path: &Path, keyspace: &mut Keyspace, now_ms: u64) -> Result<()> {
	if keyspace.snapshot_child.is_some() {
		return Err(Error::AlreadyInProgress);
	}
	keyspace.pause_rehash();

	#[cfg(unix)]
	{
		match unsafe { fork_child(path, keyspace, now_ms) } {
			Ok(pid) => {
				keyspace.snapshot_child = Some(pid as u32);
				log::info!(target: "keydb", "snapshot: forked child {} to write {}", pid, path.display());
				Ok(())
			}
			Err(e) => {
				keyspace.resume_rehash();
				Err(e)
			}
		}
	}
	#[cfg(not(unix))]
	{
		log::warn!(target: "keydb", "snapshot: background fork unavailable on this platform, saving synchronously");
		let result = writer::save_to_path(path, keyspace, now_ms, std::process::id());
		keyspace.resume_rehash();
		if result.is_ok() {
			keyspace.last_snapshot_ms = Some(now_ms);
		}
		result
	}
}

/// Forks and has the child write the snapshot then exit; the parent gets
/// the child's pid back immediately. Only async-signal-safe work happens
/// between `fork` and `exit` in the child: no panicking, no destructors run
/// on its way out (`process::exit` skips them), matching the same
/// fork-then-write-then-exit shape every redis-like snapshotter uses.
#[cfg(unix)]
unsafe fn fork_child(path: &Path, keyspace: &Keyspace, now_ms: u64) -> Result<libc::pid_t> {
	let pid = libc::fork();
	if pid < 0 {
		return Err(Error::Io(std::io::Error::last_os_error()));
	}
	if pid == 0 {
		let code = match writer::save_to_path(path, keyspace, now_ms, std::process::id()) {
			Ok(()) => 0,
			Err(e) => {
				log::error!(target: "keydb", "snapshot child failed: {}", e);
				1
			}
		};
		std::process::exit(code);
	}
	Ok(pid)
}

/// Blocks until the running child exits (a no-op, returning `Success`, if
/// none is running), translates its wait status into a `ChildOutcome`,
/// clears `snapshot_child`, and resumes rehash stepping.
#[cfg(unix)]
pub fn wait_for_child(keyspace: &mut Keyspace, now_ms: u64) -> Result<ChildOutcome> {
	let pid = match keyspace.snapshot_child {
		Some(pid) => pid as libc::pid_t,
		None => return Ok(ChildOutcome::Success),
	};
	let mut status: libc::c_int = 0;
	let ret = unsafe { libc::waitpid(pid, &mut status, 0) };
	keyspace.snapshot_child = None;
	keyspace.resume_rehash();
	if ret < 0 {
		return Err(Error::Io(std::io::Error::last_os_error()));
	}
	let outcome = if wifexited(status) {
		if wexitstatus(status) == 0 {
			keyspace.last_snapshot_ms = Some(now_ms);
			ChildOutcome::Success
		} else {
			ChildOutcome::Error
		}
	} else {
		ChildOutcome::Killed
	};
	Ok(outcome)
}

#[cfg(not(unix))]
pub fn wait_for_child(keyspace: &mut Keyspace, now_ms: u64) -> Result<ChildOutcome> {
	keyspace.snapshot_child = None;
	keyspace.resume_rehash();
	keyspace.last_snapshot_ms = Some(now_ms);
	Ok(ChildOutcome::Success)
}

/// Terminates an in-flight background snapshot (§5: "the snapshot child can
/// be terminated by signal from the parent, e.g. during flush-all"). Unlinks
/// the child's temp file rather than letting it finish, so a killed child
/// can never race a concurrent writer into renaming a half-written file
/// into place.
#[cfg(unix)]
pub fn kill_child(path: &Path, keyspace: &mut Keyspace) -> Result<()> {
	let pid = match keyspace.snapshot_child.take() {
		Some(pid) => pid as libc::pid_t,
		None => return Ok(()),
	};
	unsafe {
		libc::kill(pid, libc::SIGKILL);
		let mut status: libc::c_int = 0;
		libc::waitpid(pid, &mut status, 0);
	}
	keyspace.resume_rehash();
	let temp_path = temp_path_for(path, pid as u32);
	if temp_path.exists() {
		let _ = std::fs::remove_file(&temp_path);
	}
	log::warn!(target: "keydb", "snapshot: killed child {} and removed its temp file", pid);
	Ok(())
}

#[cfg(not(unix))]
pub fn kill_child(_path: &Path, keyspace: &mut Keyspace) -> Result<()> {
	keyspace.snapshot_child = None;
	keyspace.resume_rehash();
	Ok(())
}

#[cfg(unix)]
fn wifexited(status: libc::c_int) -> bool {
	status & 0x7f == 0
}

#[cfg(unix)]
fn wexitstatus(status: libc::c_int) -> libc::c_int {
	(status >> 8) & 0xff
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::options::Options;
	use std::path::PathBuf;

	fn ks() -> Keyspace {
		Keyspace::new(Options::default())
	}

	#[test]
	fn save_in_background_rejects_when_a_child_is_already_running() {
		let mut k = ks();
		k.snapshot_child = Some(1234);
		let result = save_in_background(&PathBuf::from("/tmp/does-not-matter.snapshot"), &mut k, 0);
		assert!(matches!(result, Err(Error::AlreadyInProgress)));
	}

	#[test]
	fn wait_for_child_is_a_no_op_without_a_running_child() {
		let mut k = ks();
		let outcome = wait_for_child(&mut k, 0).unwrap();
		assert_eq!(outcome, ChildOutcome::Success);
		assert!(k.snapshot_child.is_none());
	}

	#[test]
	fn kill_child_is_a_no_op_without_a_running_child() {
		let mut k = ks();
		assert!(kill_child(&PathBuf::from("/tmp/does-not-matter.snapshot"), &mut k).is_ok());
	}

	#[test]
	fn temp_path_naming_matches_the_writer() {
		let p = temp_path_for(Path::new("/var/lib/keydb/dump.snapshot"), 42);
		assert_eq!(p, PathBuf::from("/var/lib/keydb/temp-42.snapshot"));
	}

	#[test]
	#[cfg(unix)]
	fn wait_status_helpers_decode_a_clean_exit() {
		// glibc wait-status layout for a normal exit: low 7 bits zero, exit
		// code in the next byte.
		let status: libc::c_int = 0 << 8;
		assert!(wifexited(status));
		assert_eq!(wexitstatus(status), 0);
		let status_err: libc::c_int = 1 << 8;
		assert!(wifexited(status_err));
		assert_eq!(wexitstatus(status_err), 1);
	}
}
