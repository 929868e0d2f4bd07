//! Storage contracts and built-in in-memory stores for tokens and credentials.

pub mod credential;
pub mod memory;

pub use credential::CredentialStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::TokenRecord};

/// Boxed future returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract implemented by token stores.
///
/// Expiry is never enforced here: lookups return expired records unchanged and callers decide.
/// Records disappear only through revocation, rotation, or an explicit
/// [`purge_expired`](Self::purge_expired).
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Inserts a fully formed record. Fails with [`StoreError::Conflict`] if either secret is
	/// already present.
	fn save(&self, record: TokenRecord) -> StoreFuture<'_, ()>;

	/// Fetches the record whose access token equals `value`.
	fn find_by_access_token<'a>(&'a self, value: &'a str) -> StoreFuture<'a, Option<TokenRecord>>;

	/// Fetches the record whose refresh token equals `value`.
	fn find_by_refresh_token<'a>(&'a self, value: &'a str)
	-> StoreFuture<'a, Option<TokenRecord>>;

	/// Removes the record holding the refresh token; `true` if one was removed.
	fn revoke_by_refresh_token<'a>(&'a self, value: &'a str) -> StoreFuture<'a, bool>;

	/// Removes the record holding the access token; `true` if one was removed.
	fn revoke_by_access_token<'a>(&'a self, value: &'a str) -> StoreFuture<'a, bool>;

	/// Atomically replaces the record holding `expected_refresh` with `replacement`.
	fn rotate_refresh<'a>(
		&'a self,
		expected_refresh: &'a str,
		replacement: TokenRecord,
	) -> StoreFuture<'a, CompareAndSwapOutcome>;

	/// Drops records whose access and refresh halves are both expired at `instant`; returns
	/// how many were removed.
	fn purge_expired(&self, instant: OffsetDateTime) -> StoreFuture<'_, usize>;
}

/// Result of a refresh rotation attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareAndSwapOutcome {
	/// The old record was removed and the replacement inserted.
	Updated,
	/// No record holds the expected refresh token (already rotated or revoked).
	Missing,
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// A token value collided with one already stored.
	#[error("Token value conflict: {message}.")]
	Conflict {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for external storage engines.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
