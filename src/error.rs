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

use std::fmt;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	WrongKind,
	NoSuchKey,
	Syntax(String),
	OutOfRange(String),
	Io(std::io::Error),
	ChecksumMismatch,
	FormatUnsupported(u32),
	AlreadyInProgress,
	Exists,
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::WrongKind => write!(f, "operation against a key holding the wrong kind of value"),
			Error::NoSuchKey => write!(f, "no such key"),
			Error::Syntax(s) => write!(f, "syntax error: {}", s),
			Error::OutOfRange(s) => write!(f, "value is out of range: {}", s),
			Error::Io(e) => write!(f, "io error: {}", e),
			Error::ChecksumMismatch => write!(f, "snapshot checksum mismatch"),
			Error::FormatUnsupported(v) => write!(f, "unsupported snapshot format version {}", v),
			Error::AlreadyInProgress => write!(f, "a snapshot is already in progress"),
			Error::Exists => write!(f, "destination key already exists"),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Error::Io(e) => Some(e),
			_ => None,
		}
	}
}

impl From<std::io::Error> for Error {
	fn from(e: std::io::Error) -> Error {
		Error::Io(e)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn display_messages_are_non_empty() {
		let errs: Vec<Error> = vec![
			Error::WrongKind,
			Error::NoSuchKey,
			Error::Syntax("bad int".into()),
			Error::OutOfRange("db index".into()),
			Error::ChecksumMismatch,
			Error::FormatUnsupported(99),
			Error::AlreadyInProgress,
			Error::Exists,
		];
		for e in errs {
			assert!(!format!("{}", e).is_empty());
		}
	}

	#[test]
	fn io_error_converts() {
		let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
		let e: Error = io.into();
		assert!(matches!(e, Error::Io(_)));
	}
}
