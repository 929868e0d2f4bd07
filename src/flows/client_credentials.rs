//! Client Credentials grant.
//!
//! Service-to-service callers authenticate as themselves; the issued record has no user and no
//! refresh token, and its default scope is the client's registered scope set.

// self
use crate::{
	_prelude::*,
	auth::TokenRecord,
	flows::{GrantRequest, GrantType, Issuer, common},
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
};

impl Issuer {
	/// Performs the `client_credentials` grant.
	pub(crate) async fn client_credentials(
		&self,
		request: &GrantRequest,
		now: OffsetDateTime,
	) -> Result<TokenRecord> {
		const KIND: FlowKind = FlowKind::ClientCredentials;

		let span = FlowSpan::new(KIND, "client_credentials");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let client = self.client_for(request, GrantType::ClientCredentials)?;
				let scope = common::narrow_scope(&client.scope, request.scope.as_deref())?;
				let record = self.mint(&client.id, None, scope, false, now)?;

				self.store.save(record.clone()).await?;

				Ok(record)
			})
			.await;

		obs::finish(KIND, &result);

		result
	}
}
