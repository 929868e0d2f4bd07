//! CPU-bound work (password hashing and verification) offloaded to the rayon pool.

// crates.io
use tokio::sync::oneshot;
// self
use crate::_prelude::*;

/// Runs `func` on the rayon thread pool and awaits its output without blocking the caller's
/// executor thread.
pub(crate) async fn cpu<F, O>(func: F) -> Result<O>
where
	F: FnOnce() -> O + Send + 'static,
	O: Send + 'static,
{
	let (sender, receiver) = oneshot::channel();
	#[cfg(feature = "tracing")]
	let span = tracing::Span::current();

	rayon::spawn(move || {
		#[cfg(feature = "tracing")]
		let _entered = span.enter();

		// The receiver is gone only when the awaiting future was dropped.
		let _ = sender.send(func());
	});

	receiver.await.map_err(Error::from)
}

#[cfg(test)]
mod tests {
	// std
	use std::thread;
	// self
	use super::*;

	#[tokio::test(flavor = "current_thread")]
	async fn work_runs_off_the_executor_thread() {
		let caller = thread::current().id();
		let worker = cpu(|| thread::current().id()).await.expect("Worker should reply.");

		assert_ne!(caller, worker);
	}

	#[tokio::test(flavor = "current_thread")]
	async fn concurrent_jobs_all_complete() {
		let (a, b) = tokio::join!(cpu(|| 1 + 1), cpu(|| 2 * 3));

		assert_eq!(a.expect("First job should reply."), 2);
		assert_eq!(b.expect("Second job should reply."), 6);
	}
}
