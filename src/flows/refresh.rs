//! Refresh Token grant with rotate-and-invalidate semantics.
//!
//! A refresh token is single use. Exchanging it mints a new access + refresh pair with the same
//! user and scope (optionally narrowed), then swaps the old record for the new one through
//! [`TokenStore::rotate_refresh`](crate::store::TokenStore::rotate_refresh). The swap is atomic,
//! so when two requests race on the same refresh token only one of them receives tokens; the
//! other observes [`CompareAndSwapOutcome::Missing`] and fails with `invalid_grant`. The old
//! access token dies with its record.

mod metrics;

pub use metrics::RotationMetrics;

// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	flows::{GrantRequest, GrantType, Issuer, common},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	store::CompareAndSwapOutcome,
};

impl Issuer {
	/// Exchanges a refresh token for a new token pair.
	pub(crate) async fn refresh(
		&self,
		request: &GrantRequest,
		now: OffsetDateTime,
	) -> Result<TokenRecord> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);
		self.rotation_metrics.record_attempt();

		let result = span.instrument(self.rotate(request, now)).await;

		match &result {
			Ok(_) => self.rotation_metrics.record_rotated(),
			Err(_) => self.rotation_metrics.record_rejected(),
		}

		obs::finish(KIND, &result);

		result
	}

	async fn rotate(&self, request: &GrantRequest, now: OffsetDateTime) -> Result<TokenRecord> {
		let client = self.client_for(request, GrantType::RefreshToken)?;
		let presented = common::required(request.refresh_token.as_deref(), "refresh_token")?;
		let current = self
			.store
			.find_by_refresh_token(presented)
			.await?
			.ok_or_else(|| Error::invalid_grant("refresh token is invalid"))?;

		if current.client != client.id {
			return Err(Error::invalid_grant("refresh token was issued to another client"));
		}
		if current.is_refresh_expired_at(now) {
			return Err(Error::invalid_grant("refresh token has expired"));
		}

		let scope = common::narrow_scope(&current.scope, request.scope.as_deref())?;
		let replacement = self.mint(&client.id, current.user.clone(), scope, true, now)?;

		match self.store.rotate_refresh(presented, replacement.clone()).await? {
			CompareAndSwapOutcome::Updated => Ok(replacement),
			CompareAndSwapOutcome::Missing => {
				self.rotation_metrics.record_lost_race();

				Err(Error::invalid_grant("refresh token was already used"))
			},
		}
	}
}
