//! Validated names for users and clients.
//!
//! Usernames accept any printable, non-whitespace character and are capped at
//! [`Username::MAX_LEN`]. Client identifiers are restricted to ASCII letters, digits, `-`, `_`
//! and `.` so they survive form encoding and Basic authorization untouched.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

/// Error returned when a user or client name fails validation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// Nothing was supplied.
	#[error("{kind} name cannot be empty.")]
	Empty {
		/// `user` or `client`.
		kind: &'static str,
	},
	/// A character outside the allowed set was found.
	#[error("{kind} name contains disallowed character {found:?}.")]
	DisallowedChar {
		/// `user` or `client`.
		kind: &'static str,
		/// First offending character.
		found: char,
	},
	/// The name is longer than permitted.
	#[error("{kind} name exceeds {max} bytes.")]
	TooLong {
		/// `user` or `client`.
		kind: &'static str,
		/// Maximum permitted length in bytes.
		max: usize,
	},
}

macro_rules! validated_name {
	(
		$(#[$meta:meta])*
		$name:ident { kind: $kind:literal, max_len: $max:expr, allow: $allow:expr }
	) => {
		$(#[$meta])*
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Longest accepted value in bytes.
			pub const MAX_LEN: usize = $max;

			/// Validates and wraps `value`.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				check($kind, &value, Self::MAX_LEN, $allow)?;

				Ok(Self(value))
			}

			/// Borrows the validated name.
			pub fn as_str(&self) -> &str {
				&self.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				Self::new(value)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &str {
				self.as_str()
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.as_str()
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				self.as_str()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(self.as_str())
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, "{}({:?})", stringify!($name), self.0)
			}
		}
	};
}

validated_name! {
	/// Login name of a registered user.
	Username { kind: "user", max_len: 64, allow: |c: char| !c.is_whitespace() && !c.is_control() }
}
validated_name! {
	/// OAuth 2.0 client identifier.
	ClientId {
		kind: "client",
		max_len: 128,
		allow: |c: char| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.')
	}
}

fn check(
	kind: &'static str,
	value: &str,
	max: usize,
	allow: fn(char) -> bool,
) -> Result<(), IdentifierError> {
	if value.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if let Some(found) = value.chars().find(|c| !allow(*c)) {
		return Err(IdentifierError::DisallowedChar { kind, found });
	}
	if value.len() > max {
		return Err(IdentifierError::TooLong { kind, max });
	}

	Ok(())
}
