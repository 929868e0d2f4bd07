//! Capability scopes carried by users, clients, and issued tokens.

// std
use std::collections::BTreeSet;
// crates.io
use serde::{Deserializer, Serializer, de::Error as DeError};
// self
use crate::_prelude::*;

/// Reasons a scope list is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ScopeValidationError {
	/// A scope entry (or the whole list) was blank.
	#[error("Scope list contains a blank entry.")]
	Empty,
	/// A single entry carried whitespace, so it would split on the wire.
	#[error("Scope `{scope}` contains whitespace.")]
	ContainsWhitespace {
		/// The offending scope string.
		scope: String,
	},
}

/// Normalized set of capability strings.
///
/// Scopes are deduplicated and sorted, so equality and the space-delimited wire form are stable
/// regardless of input order. Matching is exact; there is no hierarchy or wildcard.
#[derive(Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeSet(Arc<[String]>);
impl ScopeSet {
	/// Builds a set from individual entries, rejecting blank or whitespace-bearing ones.
	pub fn new<I, S>(scopes: I) -> Result<Self, ScopeValidationError>
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		normalize(scopes).map(Self)
	}

	/// Parses a whitespace-delimited scope string, skipping empty segments.
	///
	/// Unlike [`FromStr`], blank input yields an empty set instead of an error, matching how
	/// stored scope strings are read back.
	pub fn parse_lenient(raw: &str) -> Self {
		let unique = raw.split_whitespace().map(str::to_owned).collect::<BTreeSet<_>>();

		Self(unique.into_iter().collect())
	}

	/// Count of distinct entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// True for the empty set.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Exact-match membership test.
	pub fn contains(&self, scope: &str) -> bool {
		self.0.binary_search_by(|candidate| candidate.as_str().cmp(scope)).is_ok()
	}

	/// Returns true if every scope in `self` is also in `other`.
	pub fn is_subset_of(&self, other: &ScopeSet) -> bool {
		self.iter().all(|scope| other.contains(scope))
	}

	/// Scopes of `required` that are absent from `self`.
	pub fn missing<'a>(&self, required: &'a ScopeSet) -> Vec<&'a str> {
		required.iter().filter(|scope| !self.contains(scope)).collect()
	}

	/// Union of both sets.
	pub fn union(&self, other: &ScopeSet) -> ScopeSet {
		let merged = self.iter().chain(other.iter()).map(str::to_owned).collect::<BTreeSet<_>>();

		Self(merged.into_iter().collect())
	}

	/// Entries in sorted order.
	pub fn iter(&self) -> impl Iterator<Item = &str> {
		self.0.iter().map(String::as_str)
	}

	/// Space-delimited wire form.
	pub fn normalized(&self) -> String {
		self.0.join(" ")
	}
}
impl Debug for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ScopeSet").field(&self.0).finish()
	}
}
impl Display for ScopeSet {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.normalized())
	}
}
impl FromStr for ScopeSet {
	type Err = ScopeValidationError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		if s.is_empty() {
			return Ok(Self::default());
		}
		if s.chars().all(char::is_whitespace) {
			return Err(ScopeValidationError::Empty);
		}

		Self::new(s.split_whitespace())
	}
}
impl Serialize for ScopeSet {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_str(&self.normalized())
	}
}
impl<'de> Deserialize<'de> for ScopeSet {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		let raw = String::deserialize(deserializer)?;

		ScopeSet::from_str(&raw).map_err(DeError::custom)
	}
}

fn normalize<I, S>(scopes: I) -> Result<Arc<[String]>, ScopeValidationError>
where
	I: IntoIterator<Item = S>,
	S: Into<String>,
{
	let mut set = BTreeSet::new();

	for scope in scopes {
		let owned: String = scope.into();

		if owned.is_empty() {
			return Err(ScopeValidationError::Empty);
		}
		if owned.chars().any(char::is_whitespace) {
			return Err(ScopeValidationError::ContainsWhitespace { scope: owned });
		}

		set.insert(owned);
	}

	Ok(set.into_iter().collect())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scopes_normalize_order_and_duplicates() {
		let lhs = ScopeSet::new(["user.write", "user.read", "user.read"])
			.expect("Left-hand scope set should be valid.");
		let rhs = ScopeSet::from_str("user.read  user.write")
			.expect("Right-hand scope string should parse.");

		assert_eq!(lhs, rhs);
		assert_eq!(lhs.normalized(), "user.read user.write");
		assert_eq!(lhs.len(), 2);
	}

	#[test]
	fn invalid_scopes_error() {
		assert!(ScopeSet::new([""]).is_err());
		assert!(matches!(
			ScopeSet::new(["contains space"]),
			Err(ScopeValidationError::ContainsWhitespace { .. })
		));
		assert!(ScopeSet::from_str("").is_ok(), "Empty string represents an empty scope set.");
		assert!(ScopeSet::from_str("   ").is_err(), "Whitespace-only input must be rejected.");
		assert!(ScopeSet::parse_lenient("   ").is_empty());
	}

	#[test]
	fn subset_union_and_missing() {
		let token = ScopeSet::from_str("user.read user.write").expect("Token scope should parse.");
		let read = ScopeSet::from_str("user.read").expect("Required scope should parse.");
		let admin = ScopeSet::from_str("admin.write").expect("Admin scope should parse.");

		assert!(read.is_subset_of(&token));
		assert!(!admin.is_subset_of(&token));
		assert!(ScopeSet::default().is_subset_of(&token));
		assert_eq!(token.missing(&admin), vec!["admin.write"]);
		assert_eq!(read.union(&admin).normalized(), "admin.write user.read");
	}

	#[test]
	fn serde_uses_space_delimited_form() {
		let scope = ScopeSet::new(["service.write", "service.read"]).expect("Scope should build.");
		let json = serde_json::to_string(&scope).expect("Scope should serialize.");

		assert_eq!(json, "\"service.read service.write\"");

		let back: ScopeSet = serde_json::from_str(&json).expect("Scope should deserialize.");

		assert_eq!(back, scope);
	}
}
