//! Request pacing between portal fetches.
//!
//! The portal throttles or blocks bursts of automated queries. A fixed delay
//! spaces requests out; a randomized delay additionally removes detectable
//! periodicity. The random sampler is injectable so tests stay deterministic.

use std::time::Duration;

use trendq_core::ConfigError;

/// Function that picks a delay from an inclusive `[min, max]` window.
pub type DurationSampler = dyn Fn(Duration, Duration) -> Duration + Send + Sync;

/// How long to wait between consecutive portal fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacingPolicy {
    /// No wait between calls.
    None,
    /// Wait exactly this long between calls.
    Fixed(Duration),
    /// Wait a uniformly sampled duration in `[min, max]` between calls.
    Random { min: Duration, max: Duration },
}

impl PacingPolicy {
    /// Parses the CLI throttle argument: `none`, `random` (1–4 s window),
    /// or a whole number of seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidThrottle`] for anything else.
    pub fn from_arg(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim() {
            "none" | "0" => Ok(Self::None),
            "random" => Ok(Self::Random {
                min: Duration::from_secs(1),
                max: Duration::from_secs(4),
            }),
            other => other
                .parse::<u64>()
                .map(|secs| Self::Fixed(Duration::from_secs(secs)))
                .map_err(|_| ConfigError::InvalidThrottle {
                    input: raw.to_owned(),
                }),
        }
    }
}

/// Applies a [`PacingPolicy`] between work items.
pub struct Pacer {
    policy: PacingPolicy,
    sampler: Box<DurationSampler>,
}

impl Pacer {
    /// Pacer with the default uniform random sampler.
    #[must_use]
    pub fn new(policy: PacingPolicy) -> Self {
        Self::with_sampler(policy, Box::new(uniform_sample))
    }

    /// Pacer with an injected sampler, for deterministic tests.
    #[must_use]
    pub fn with_sampler(policy: PacingPolicy, sampler: Box<DurationSampler>) -> Self {
        Self { policy, sampler }
    }

    /// The delay the policy prescribes right now, if any.
    #[must_use]
    pub fn delay(&self) -> Option<Duration> {
        match self.policy {
            PacingPolicy::None => None,
            PacingPolicy::Fixed(d) => (!d.is_zero()).then_some(d),
            PacingPolicy::Random { min, max } => Some((self.sampler)(min, max)),
        }
    }

    /// Sleeps for the prescribed delay, logging it at debug.
    pub async fn pause(&self) {
        if let Some(delay) = self.delay() {
            tracing::debug!(?delay, "pacing wait");
            tokio::time::sleep(delay).await;
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn uniform_sample(min: Duration, max: Duration) -> Duration {
    use rand::Rng;
    let (lo, hi) = (min.as_millis() as u64, max.as_millis() as u64);
    if hi <= lo {
        return min;
    }
    Duration::from_millis(rand::rng().random_range(lo..=hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_throttle_arguments() {
        assert_eq!(PacingPolicy::from_arg("none").unwrap(), PacingPolicy::None);
        assert_eq!(PacingPolicy::from_arg("0").unwrap(), PacingPolicy::None);
        assert_eq!(
            PacingPolicy::from_arg("5").unwrap(),
            PacingPolicy::Fixed(Duration::from_secs(5))
        );
        assert_eq!(
            PacingPolicy::from_arg("random").unwrap(),
            PacingPolicy::Random {
                min: Duration::from_secs(1),
                max: Duration::from_secs(4),
            }
        );
    }

    #[test]
    fn rejects_garbage_throttle() {
        let err = PacingPolicy::from_arg("sometimes").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidThrottle { .. }), "{err}");
    }

    #[test]
    fn none_policy_has_no_delay() {
        assert_eq!(Pacer::new(PacingPolicy::None).delay(), None);
    }

    #[test]
    fn zero_fixed_delay_collapses_to_no_wait() {
        let pacer = Pacer::new(PacingPolicy::Fixed(Duration::ZERO));
        assert_eq!(pacer.delay(), None);
    }

    #[test]
    fn random_policy_uses_injected_sampler() {
        let pacer = Pacer::with_sampler(
            PacingPolicy::Random {
                min: Duration::from_millis(100),
                max: Duration::from_millis(400),
            },
            Box::new(|min, _max| min),
        );
        assert_eq!(pacer.delay(), Some(Duration::from_millis(100)));
    }

    #[test]
    fn default_sampler_stays_within_bounds() {
        let min = Duration::from_millis(10);
        let max = Duration::from_millis(20);
        for _ in 0..100 {
            let d = uniform_sample(min, max);
            assert!(d >= min && d <= max, "{d:?} outside [{min:?}, {max:?}]");
        }
    }
}
