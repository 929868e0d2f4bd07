// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for refresh-token rotation, shared by every clone of an issuer.
#[derive(Debug, Default)]
pub struct RotationMetrics {
	attempts: AtomicU64,
	rotated: AtomicU64,
	rejected: AtomicU64,
	lost_races: AtomicU64,
}
impl RotationMetrics {
	/// Refresh grants received.
	pub fn attempts(&self) -> u64 {
		self.attempts.load(Ordering::Relaxed)
	}

	/// Refresh tokens successfully rotated into a new pair.
	pub fn rotated(&self) -> u64 {
		self.rotated.load(Ordering::Relaxed)
	}

	/// Refresh grants rejected for any reason.
	pub fn rejected(&self) -> u64 {
		self.rejected.load(Ordering::Relaxed)
	}

	/// Rejections caused by a concurrent request consuming the same refresh token first.
	pub fn lost_races(&self) -> u64 {
		self.lost_races.load(Ordering::Relaxed)
	}

	pub(crate) fn record_attempt(&self) {
		self.attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_rotated(&self) {
		self.rotated.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_rejected(&self) {
		self.rejected.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_lost_race(&self) {
		self.lost_races.fetch_add(1, Ordering::Relaxed);
	}
}
