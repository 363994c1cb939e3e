//! Access token cache shared by every request of one API client.
//!
//! Tokens are reused until they enter the preemptive refresh window. Concurrent callers that
//! find the cache stale funnel through a singleflight guard so only one of them calls the token
//! endpoint; the rest observe the freshly stored token.

// self
use crate::{_prelude::*, client::Secret};

/// Tokens closer than this to expiry are refreshed before use.
///
/// Short-lived tokens use half of their lifetime instead, so they are reused at least once.
pub const PREEMPTIVE_REFRESH_WINDOW: Duration = Duration::seconds(60);

/// Access token paired with its absolute expiry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Bearer token value.
	pub secret: Secret,
	/// Instant after which the token is rejected.
	pub expires_at: OffsetDateTime,
	/// Instant from which the token is refreshed before use.
	pub refresh_at: OffsetDateTime,
}
impl AccessToken {
	/// Builds a token that expires `expires_in` after `issued_at`.
	pub fn new(secret: Secret, issued_at: OffsetDateTime, expires_in: Duration) -> Self {
		let expires_at = issued_at + expires_in;
		let window = PREEMPTIVE_REFRESH_WINDOW.min(expires_in / 2);

		Self { secret, expires_at, refresh_at: expires_at - window }
	}

	/// Returns `true` if the token can still be used at `now`.
	pub fn is_fresh_at(&self, now: OffsetDateTime) -> bool {
		now < self.refresh_at
	}
}

/// Singleflight cache around a single [`AccessToken`].
#[derive(Debug, Default)]
pub struct TokenCache {
	current: RwLock<Option<AccessToken>>,
	refresh_guard: AsyncMutex<()>,
}
impl TokenCache {
	/// Returns the cached token, fetching a new one with `fetch` when the cache is stale.
	pub async fn get_or_fetch<F, Fut>(&self, fetch: F) -> Result<Secret>
	where
		F: FnOnce() -> Fut,
		Fut: Future<Output = Result<AccessToken>>,
	{
		if let Some(secret) = self.fresh() {
			return Ok(secret);
		}

		let _guard = self.refresh_guard.lock().await;

		if let Some(secret) = self.fresh() {
			return Ok(secret);
		}

		let token = fetch().await?;
		let secret = token.secret.clone();

		*self.current.write() = Some(token);

		Ok(secret)
	}

	/// Drops the cached token so the next call fetches a new one.
	pub fn invalidate(&self) {
		self.current.write().take();
	}

	fn fresh(&self) -> Option<Secret> {
		let now = OffsetDateTime::now_utc();

		self.current
			.read()
			.as_ref()
			.filter(|token| token.is_fresh_at(now))
			.map(|token| token.secret.clone())
	}
}

#[cfg(test)]
mod tests {
	// std
	use std::sync::atomic::{AtomicUsize, Ordering};
	// self
	use super::*;

	fn token(value: &str, expires_in: Duration) -> AccessToken {
		AccessToken::new(Secret::new(value), OffsetDateTime::now_utc(), expires_in)
	}

	#[test]
	fn tokens_inside_the_refresh_window_are_stale() {
		let now = OffsetDateTime::now_utc();
		let token = AccessToken::new(Secret::new("t"), now, Duration::seconds(90));

		assert!(token.is_fresh_at(now));
		assert!(!token.is_fresh_at(now + Duration::seconds(31)));
	}

	#[test]
	fn short_lived_tokens_refresh_at_half_their_lifetime() {
		let now = OffsetDateTime::now_utc();
		let token = AccessToken::new(Secret::new("t"), now, Duration::seconds(30));

		assert!(token.is_fresh_at(now + Duration::seconds(10)));
		assert!(!token.is_fresh_at(now + Duration::seconds(15)));

		let token = AccessToken::new(Secret::new("t"), now, Duration::seconds(60));

		assert!(token.is_fresh_at(now + Duration::seconds(29)));
	}

	#[tokio::test]
	async fn cache_reuses_fresh_tokens() {
		let cache = TokenCache::default();
		let fetches = AtomicUsize::new(0);

		for _ in 0..3 {
			let secret = cache
				.get_or_fetch(|| async {
					fetches.fetch_add(1, Ordering::SeqCst);

					Ok(token("first", Duration::hours(1)))
				})
				.await
				.expect("Token fetch should succeed.");

			assert_eq!(secret.expose(), "first");
		}

		assert_eq!(fetches.load(Ordering::SeqCst), 1);
	}

	#[tokio::test]
	async fn cache_refetches_stale_or_invalidated_tokens() {
		let cache = TokenCache::default();

		cache
			.get_or_fetch(|| async {
				Ok(AccessToken::new(
					Secret::new("expired"),
					OffsetDateTime::now_utc() - Duration::minutes(5),
					Duration::seconds(10),
				))
			})
			.await
			.expect("First fetch should succeed.");

		let secret = cache
			.get_or_fetch(|| async { Ok(token("second", Duration::hours(1))) })
			.await
			.expect("Stale token should be replaced.");

		assert_eq!(secret.expose(), "second");

		cache.invalidate();

		let secret = cache
			.get_or_fetch(|| async { Ok(token("third", Duration::hours(1))) })
			.await
			.expect("Invalidated token should be replaced.");

		assert_eq!(secret.expose(), "third");
	}

	#[tokio::test]
	async fn fetch_failures_leave_the_cache_empty() {
		let cache = TokenCache::default();
		let err = cache
			.get_or_fetch(|| async { Err(crate::error::AuthError::MissingExpiresIn.into()) })
			.await
			.expect_err("Fetch failure should propagate.");

		assert!(matches!(err, Error::Auth(_)));
		assert!(cache.current.read().is_none());
	}
}
