//! Thread-safe in-memory [`TokenStore`] implementation.

// self
use crate::{
	_prelude::*,
	auth::{TokenDigest, TokenRecord},
	store::{CompareAndSwapOutcome, StoreError, StoreFuture, TokenStore},
};

type StoreMap = Arc<RwLock<Tables>>;

/// Records keyed by access-token digest plus a refresh-token index.
#[derive(Debug, Default)]
struct Tables {
	records: HashMap<TokenDigest, TokenRecord>,
	by_refresh: HashMap<TokenDigest, TokenDigest>,
}
impl Tables {
	fn check_free(&self, record: &TokenRecord) -> Result<(), StoreError> {
		let access = record.access_token.digest();

		if self.records.contains_key(&access) || self.by_refresh.contains_key(&access) {
			return Err(StoreError::Conflict { message: "access token already stored".into() });
		}

		let refresh_taken = record.refresh_token.as_ref().map(|secret| secret.digest()).is_some_and(
			|refresh| {
				refresh == access
					|| self.by_refresh.contains_key(&refresh)
					|| self.records.contains_key(&refresh)
			},
		);

		if refresh_taken {
			return Err(StoreError::Conflict { message: "refresh token already stored".into() });
		}

		Ok(())
	}

	fn insert(&mut self, record: TokenRecord) {
		let access = record.access_token.digest();

		if let Some(refresh) = record.refresh_token.as_ref() {
			self.by_refresh.insert(refresh.digest(), access);
		}

		self.records.insert(access, record);
	}

	fn remove(&mut self, access: &TokenDigest) -> Option<TokenRecord> {
		let record = self.records.remove(access)?;

		if let Some(refresh) = record.refresh_token.as_ref() {
			self.by_refresh.remove(&refresh.digest());
		}

		Some(record)
	}
}

/// Thread-safe storage backend that keeps records in-process.
///
/// Writers hold the exclusive lock across the uniqueness check and the mutation, so two
/// concurrent inserts can never both claim the same value.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of stored records, expired ones included.
	pub fn len(&self) -> usize {
		self.0.read().records.len()
	}

	/// Returns true when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn save_now(map: StoreMap, record: TokenRecord) -> Result<(), StoreError> {
		let mut guard = map.write();

		guard.check_free(&record)?;
		guard.insert(record);

		Ok(())
	}

	fn find_access_now(map: StoreMap, digest: TokenDigest) -> Option<TokenRecord> {
		map.read().records.get(&digest).cloned()
	}

	fn find_refresh_now(map: StoreMap, digest: TokenDigest) -> Option<TokenRecord> {
		let guard = map.read();

		guard.by_refresh.get(&digest).and_then(|access| guard.records.get(access)).cloned()
	}

	fn revoke_access_now(map: StoreMap, digest: TokenDigest) -> bool {
		map.write().remove(&digest).is_some()
	}

	fn revoke_refresh_now(map: StoreMap, digest: TokenDigest) -> bool {
		let mut guard = map.write();

		match guard.by_refresh.get(&digest).copied() {
			Some(access) => guard.remove(&access).is_some(),
			None => false,
		}
	}

	fn rotate_now(
		map: StoreMap,
		expected: TokenDigest,
		replacement: TokenRecord,
	) -> Result<CompareAndSwapOutcome, StoreError> {
		let mut guard = map.write();
		let Some(access) = guard.by_refresh.get(&expected).copied() else {
			return Ok(CompareAndSwapOutcome::Missing);
		};
		let previous = guard.remove(&access);

		if let Err(e) = guard.check_free(&replacement) {
			// Restore the old record so a failed rotation leaves the store untouched.
			if let Some(previous) = previous {
				guard.insert(previous);
			}

			return Err(e);
		}

		guard.insert(replacement);

		Ok(CompareAndSwapOutcome::Updated)
	}

	fn purge_now(map: StoreMap, instant: OffsetDateTime) -> usize {
		let mut guard = map.write();
		let dead = guard
			.records
			.iter()
			.filter(|(_, record)| record.is_dead_at(instant))
			.map(|(digest, _)| *digest)
			.collect::<Vec<_>>();

		dead.iter().filter(|digest| guard.remove(digest).is_some()).count()
	}
}
impl TokenStore for MemoryStore {
	fn save(&self, record: TokenRecord) -> StoreFuture<'_, ()> {
		let map = self.0.clone();

		Box::pin(async move { Self::save_now(map, record) })
	}

	fn find_by_access_token<'a>(&'a self, value: &'a str) -> StoreFuture<'a, Option<TokenRecord>> {
		let map = self.0.clone();
		let digest = TokenDigest::of(value);

		Box::pin(async move { Ok(Self::find_access_now(map, digest)) })
	}

	fn find_by_refresh_token<'a>(
		&'a self,
		value: &'a str,
	) -> StoreFuture<'a, Option<TokenRecord>> {
		let map = self.0.clone();
		let digest = TokenDigest::of(value);

		Box::pin(async move { Ok(Self::find_refresh_now(map, digest)) })
	}

	fn revoke_by_refresh_token<'a>(&'a self, value: &'a str) -> StoreFuture<'a, bool> {
		let map = self.0.clone();
		let digest = TokenDigest::of(value);

		Box::pin(async move { Ok(Self::revoke_refresh_now(map, digest)) })
	}

	fn revoke_by_access_token<'a>(&'a self, value: &'a str) -> StoreFuture<'a, bool> {
		let map = self.0.clone();
		let digest = TokenDigest::of(value);

		Box::pin(async move { Ok(Self::revoke_access_now(map, digest)) })
	}

	fn rotate_refresh<'a>(
		&'a self,
		expected_refresh: &'a str,
		replacement: TokenRecord,
	) -> StoreFuture<'a, CompareAndSwapOutcome> {
		let map = self.0.clone();
		let expected = TokenDigest::of(expected_refresh);

		Box::pin(async move { Self::rotate_now(map, expected, replacement) })
	}

	fn purge_expired(&self, instant: OffsetDateTime) -> StoreFuture<'_, usize> {
		let map = self.0.clone();

		Box::pin(async move { Ok(Self::purge_now(map, instant)) })
	}
}
