//! `Authorization: Bearer` header parsing.

// self
use crate::_prelude::*;

/// Extracts the token from a `Bearer` authorization header.
///
/// The scheme is matched case-insensitively and must be followed by whitespace and a non-empty
/// token. A missing header and any other shape fail with `Unauthorized`.
pub fn parse_bearer(header: Option<&str>) -> Result<&str> {
	let header = header
		.map(str::trim)
		.filter(|header| !header.is_empty())
		.ok_or_else(|| Error::unauthorized("missing bearer token"))?;
	let (scheme, token) = header
		.split_once(char::is_whitespace)
		.ok_or_else(|| Error::unauthorized("malformed authorization header"))?;

	if !scheme.eq_ignore_ascii_case("bearer") {
		return Err(Error::unauthorized("authorization scheme must be Bearer"));
	}

	let token = token.trim();

	if token.is_empty() || token.contains(char::is_whitespace) {
		return Err(Error::unauthorized("malformed bearer token"));
	}

	Ok(token)
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn scheme_is_case_insensitive() {
		assert_eq!(parse_bearer(Some("Bearer abc")).ok(), Some("abc"));
		assert_eq!(parse_bearer(Some("bearer  abc ")).ok(), Some("abc"));
		assert_eq!(parse_bearer(Some("BEARER\tabc")).ok(), Some("abc"));
	}

	#[test]
	fn malformed_headers_are_unauthorized() {
		let headers = [
			None,
			Some(""),
			Some("Bearer"),
			Some("Bearer   "),
			Some("Basic abc"),
			Some("Bearer a b"),
		];

		for header in headers {
			assert!(
				matches!(parse_bearer(header), Err(Error::Unauthorized { .. })),
				"header {header:?} should be rejected"
			);
		}
	}
}
