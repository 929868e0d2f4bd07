//! In-process OAuth 2.0 authorization core: typed credential and token stores, password,
//! client-credentials, and rotating refresh grants, bearer authentication, and scope/role gates.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod account;
pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod guard;
pub mod obs;
pub mod store;

mod blocking;

#[cfg(any(test, feature = "test"))]
#[doc(hidden)]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests, enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		config::IssuerConfig,
		flows::Issuer,
		store::{CredentialStore, MemoryStore, TokenStore},
	};

	/// Configuration with cheap Argon2 parameters so test suites stay fast.
	pub fn test_config() -> IssuerConfig {
		IssuerConfig::default()
			.with_password_cost(8, 1, 1)
			.build()
			.expect("Test configuration should be valid.")
	}

	/// Builds an [`Issuer`] over an in-memory token store and the demo credential fixtures
	/// (clients `application` and `webapp`, users `admin` and `andre`).
	pub fn build_test_issuer() -> (Issuer, Arc<MemoryStore>) {
		build_test_issuer_with(test_config())
	}

	/// Same as [`build_test_issuer`] but with caller-supplied configuration.
	pub fn build_test_issuer_with(config: IssuerConfig) -> (Issuer, Arc<MemoryStore>) {
		let hasher = config.password_hasher().expect("Test password cost should be valid.");
		let credentials = Arc::new(
			CredentialStore::demo(hasher)
				.expect("Demo credential fixtures should seed successfully."),
		);
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn TokenStore> = store_backend.clone();

		(Issuer::new(credentials, store, config), store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{BTreeMap, HashMap},
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::RwLock;
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

#[cfg(test)] use color_eyre as _;
