//! Conflict-retry budget and backoff schedule.

// crates.io
use rand::Rng;
// self
use crate::{_prelude::*, error::ConfigError};

/// Bounded exponential backoff applied between update attempts that hit a version conflict.
///
/// Only optimistic-concurrency conflicts consume this budget; every other store failure is
/// returned immediately.
///
/// Serialized durations are floating-point seconds. Deserialization fills missing fields with
/// defaults and rejects policies that fail [`validate`](Self::validate).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "RetryPolicyConfig", try_from = "RetryPolicyConfig")]
pub struct RetryPolicy {
	/// Total update attempts, including the first one.
	pub max_attempts: u32,
	/// Delay before the second attempt.
	pub initial_backoff: Duration,
	/// Growth factor applied to the delay after each conflict.
	pub multiplier: f64,
	/// Upper bound for the delay before jitter.
	pub max_backoff: Duration,
	/// Extra random delay as a fraction of the computed delay, in `[0, 1]`.
	pub jitter: f64,
}
impl RetryPolicy {
	const DEFAULT_MAX_ATTEMPTS: u32 = 5;
	const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(10);
	const DEFAULT_MULTIPLIER: f64 = 2.0;
	const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(1);
	const DEFAULT_JITTER: f64 = 0.1;

	/// Policy that makes a single attempt and never retries.
	pub fn no_retry() -> Self {
		Self { max_attempts: 1, ..Default::default() }
	}

	/// Overrides the attempt budget.
	pub fn with_max_attempts(mut self, attempts: u32) -> Self {
		self.max_attempts = attempts;

		self
	}

	/// Overrides the initial delay.
	pub fn with_initial_backoff(mut self, delay: Duration) -> Self {
		self.initial_backoff = delay;

		self
	}

	/// Overrides the growth factor.
	pub fn with_multiplier(mut self, multiplier: f64) -> Self {
		self.multiplier = multiplier;

		self
	}

	/// Overrides the delay cap.
	pub fn with_max_backoff(mut self, delay: Duration) -> Self {
		self.max_backoff = delay;

		self
	}

	/// Overrides the jitter fraction.
	pub fn with_jitter(mut self, jitter: f64) -> Self {
		self.jitter = jitter;

		self
	}

	/// Checks that every parameter is in range.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.max_attempts == 0 {
			return Err(ConfigError::InvalidRetryPolicy { reason: "max_attempts must be positive" });
		}
		if !self.multiplier.is_finite() || self.multiplier < 1.0 {
			return Err(ConfigError::InvalidRetryPolicy {
				reason: "multiplier must be a finite value of at least 1",
			});
		}
		if !(0.0..=1.0).contains(&self.jitter) {
			return Err(ConfigError::InvalidRetryPolicy { reason: "jitter must be within [0, 1]" });
		}
		if self.max_backoff < self.initial_backoff {
			return Err(ConfigError::InvalidRetryPolicy {
				reason: "max_backoff must not be shorter than initial_backoff",
			});
		}

		Ok(())
	}

	/// Delay before retry number `retry` (0 for the delay after the first conflict), capped at
	/// [`max_backoff`](Self::max_backoff) and without jitter.
	pub fn backoff_for(&self, retry: u32) -> Duration {
		let exponent = i32::try_from(retry).unwrap_or(i32::MAX);
		let secs = self.initial_backoff.as_secs_f64() * self.multiplier.powi(exponent);
		let capped = secs.min(self.max_backoff.as_secs_f64());

		Duration::try_from_secs_f64(capped).unwrap_or(self.max_backoff)
	}

	/// [`backoff_for`](Self::backoff_for) plus up to `jitter` times that delay at random.
	///
	/// Saturates at the unjittered delay when the jittered one is not representable.
	pub fn jittered_backoff_for(&self, retry: u32) -> Duration {
		let base = self.backoff_for(retry);

		if self.jitter.is_nan() || self.jitter <= 0.0 || base.is_zero() {
			return base;
		}

		let extra = rand::rng().random_range(0.0..=self.jitter.min(1.0));

		Duration::try_from_secs_f64(base.as_secs_f64() * (1.0 + extra)).unwrap_or(base)
	}
}
impl Default for RetryPolicy {
	fn default() -> Self {
		Self {
			max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
			initial_backoff: Self::DEFAULT_INITIAL_BACKOFF,
			multiplier: Self::DEFAULT_MULTIPLIER,
			max_backoff: Self::DEFAULT_MAX_BACKOFF,
			jitter: Self::DEFAULT_JITTER,
		}
	}
}

/// Wire shape of [`RetryPolicy`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
struct RetryPolicyConfig {
	max_attempts: u32,
	#[serde(with = "secs_f64")]
	initial_backoff: Duration,
	multiplier: f64,
	#[serde(with = "secs_f64")]
	max_backoff: Duration,
	jitter: f64,
}
impl Default for RetryPolicyConfig {
	fn default() -> Self {
		RetryPolicy::default().into()
	}
}
impl From<RetryPolicy> for RetryPolicyConfig {
	fn from(policy: RetryPolicy) -> Self {
		let RetryPolicy { max_attempts, initial_backoff, multiplier, max_backoff, jitter } = policy;

		Self { max_attempts, initial_backoff, multiplier, max_backoff, jitter }
	}
}
impl TryFrom<RetryPolicyConfig> for RetryPolicy {
	type Error = ConfigError;

	fn try_from(config: RetryPolicyConfig) -> Result<Self, Self::Error> {
		let RetryPolicyConfig { max_attempts, initial_backoff, multiplier, max_backoff, jitter } =
			config;
		let policy = Self { max_attempts, initial_backoff, multiplier, max_backoff, jitter };

		policy.validate()?;

		Ok(policy)
	}
}

mod secs_f64 {
	// crates.io
	use serde::{Deserializer, Serializer, de::Error as _};
	// self
	use crate::_prelude::*;

	pub fn serialize<S>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		serializer.serialize_f64(value.as_secs_f64())
	}

	pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
	where
		D: Deserializer<'de>,
	{
		let secs = f64::deserialize(deserializer)?;

		Duration::try_from_secs_f64(secs).map_err(|e| {
			D::Error::custom(format!("expected a non-negative number of seconds, got {secs}: {e}"))
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn default_schedule_doubles_until_capped() {
		let policy = RetryPolicy::default().with_jitter(0.0);

		assert!(policy.validate().is_ok());
		assert_eq!(policy.backoff_for(0), Duration::from_millis(10));
		assert_eq!(policy.backoff_for(1), Duration::from_millis(20));
		assert_eq!(policy.backoff_for(3), Duration::from_millis(80));
		assert_eq!(policy.backoff_for(20), Duration::from_secs(1));
		assert_eq!(policy.backoff_for(u32::MAX), Duration::from_secs(1));
		assert_eq!(policy.jittered_backoff_for(2), policy.backoff_for(2));
	}

	#[test]
	fn jitter_stays_within_fraction() {
		let policy = RetryPolicy::default().with_jitter(0.5);

		for retry in 0..5 {
			let base = policy.backoff_for(retry);
			let jittered = policy.jittered_backoff_for(retry);

			assert!(jittered >= base);
			assert!(jittered <= base.mul_f64(1.5));
		}
	}

	#[test]
	fn validation_rejects_out_of_range_values() {
		assert!(RetryPolicy::default().with_max_attempts(0).validate().is_err());
		assert!(RetryPolicy::default().with_multiplier(0.5).validate().is_err());
		assert!(RetryPolicy::default().with_multiplier(f64::NAN).validate().is_err());
		assert!(RetryPolicy::default().with_jitter(1.5).validate().is_err());
		assert!(
			RetryPolicy::default()
				.with_initial_backoff(Duration::from_secs(2))
				.with_max_backoff(Duration::from_secs(1))
				.validate()
				.is_err()
		);
		assert!(RetryPolicy::no_retry().validate().is_ok());
	}

	#[test]
	fn unbounded_backoff_saturates_instead_of_overflowing() {
		let policy = RetryPolicy::default()
			.with_initial_backoff(Duration::MAX)
			.with_max_backoff(Duration::MAX)
			.with_jitter(1.0);

		assert!(policy.validate().is_ok());
		assert_eq!(policy.backoff_for(0), Duration::MAX);

		for retry in [0, 1, 64, u32::MAX] {
			assert!(policy.jittered_backoff_for(retry) >= policy.backoff_for(retry));
		}

		let near_cap = RetryPolicy::default()
			.with_initial_backoff(Duration::from_secs(u64::MAX / 2))
			.with_max_backoff(Duration::from_secs(u64::MAX - 1))
			.with_jitter(1.0);

		for retry in 0..4 {
			let _ = near_cap.jittered_backoff_for(retry);
		}
	}

	#[test]
	fn deserializes_with_defaults() {
		let policy: RetryPolicy = serde_json::from_str(r#"{"max_attempts": 8}"#)
			.expect("Partial retry policy should deserialize.");

		assert_eq!(policy.max_attempts, 8);
		assert_eq!(policy.initial_backoff, RetryPolicy::default().initial_backoff);
	}

	#[test]
	fn durations_use_float_seconds() {
		let policy: RetryPolicy = serde_json::from_str(
			r#"{"max_attempts": 3, "initial_backoff": 0.5, "multiplier": 3.0, "max_backoff": 4, "jitter": 0.25}"#,
		)
		.expect("Retry policy with float seconds should deserialize.");

		assert_eq!(
			policy,
			RetryPolicy::default()
				.with_max_attempts(3)
				.with_initial_backoff(Duration::from_millis(500))
				.with_multiplier(3.0)
				.with_max_backoff(Duration::from_secs(4))
				.with_jitter(0.25)
		);

		let value = serde_json::to_value(RetryPolicy::default())
			.expect("Default retry policy should serialize.");

		assert_eq!(value["initial_backoff"], serde_json::json!(0.01));
		assert_eq!(value["max_backoff"], serde_json::json!(1.0));

		let back: RetryPolicy =
			serde_json::from_value(value).expect("Serialized retry policy should deserialize.");

		assert_eq!(back, RetryPolicy::default());
		assert!(serde_json::from_str::<RetryPolicy>(r#"{"initial_backoff": -1.0}"#).is_err());
	}

	#[test]
	fn deserialization_rejects_invalid_policies() {
		for json in [
			r#"{"jitter": 1e300}"#,
			r#"{"max_attempts": 0}"#,
			r#"{"multiplier": 0.5}"#,
			r#"{"initial_backoff": 2.0, "max_backoff": 1.0}"#,
		] {
			let err = serde_json::from_str::<RetryPolicy>(json)
				.expect_err("Out-of-range retry policy should be rejected.");

			assert!(err.to_string().contains("Retry policy is invalid"), "unexpected error: {err}");
		}
	}
}
