//! The timed unlock-and-redirect state machine.
//!
//! Unlocking a coupon is a simulation: a progress bar runs for a configured
//! duration, the full code is shown for a short grace period, then the
//! caller is redirected to the coupon's external store URL. The machine is a
//! pure function of elapsed time, so the server only has to remember when an
//! unlock started and tests never sleep.
//!
//! There is no cancellation path once unlocking starts; abandoned unlocks
//! simply age out of the server's token cache.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Timing knobs for the unlock flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockConfig {
    /// How long the progress bar runs.
    pub duration: Duration,
    /// How long the revealed code stays up before the redirect.
    pub grace: Duration,
    /// Progress advances in increments of this tick.
    pub tick: Duration,
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(3000),
            grace: Duration::from_millis(1500),
            tick: Duration::from_millis(100),
        }
    }
}

impl UnlockConfig {
    /// Total lifetime of an unlock token, with slack for a final poll.
    #[must_use]
    pub fn token_ttl(&self) -> Duration {
        self.duration + self.grace + Duration::from_secs(30)
    }
}

/// Where an unlock is in its life, computed from elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum UnlockPhase {
    /// Progress bar running; `progress` is 0-100 in whole-tick increments.
    Unlocking { progress: u8 },
    /// Full code visible for the grace period.
    Revealed,
    /// Grace period over; the caller should follow the redirect target.
    Redirect,
}

/// Compute the unlock phase after `elapsed` time.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn phase_at(config: &UnlockConfig, elapsed: Duration) -> UnlockPhase {
    if elapsed >= config.duration + config.grace {
        return UnlockPhase::Redirect;
    }
    if elapsed >= config.duration {
        return UnlockPhase::Revealed;
    }

    // Quantize to whole ticks so progress advances in fixed steps.
    let tick_ms = config.tick.as_millis().max(1);
    let duration_ms = config.duration.as_millis().max(1);
    let quantized_ms = (elapsed.as_millis() / tick_ms) * tick_ms;
    let progress = (quantized_ms * 100 / duration_ms).min(100);

    UnlockPhase::Unlocking {
        progress: progress as u8,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> UnlockConfig {
        UnlockConfig::default()
    }

    #[test]
    fn test_starts_at_zero_progress() {
        assert_eq!(
            phase_at(&config(), Duration::ZERO),
            UnlockPhase::Unlocking { progress: 0 }
        );
    }

    #[test]
    fn test_progress_halfway() {
        assert_eq!(
            phase_at(&config(), Duration::from_millis(1500)),
            UnlockPhase::Unlocking { progress: 50 }
        );
    }

    #[test]
    fn test_progress_quantized_to_ticks() {
        // 1234ms floors to the 1200ms tick: 1200/3000 = 40%.
        assert_eq!(
            phase_at(&config(), Duration::from_millis(1234)),
            UnlockPhase::Unlocking { progress: 40 }
        );
    }

    #[test]
    fn test_revealed_at_duration() {
        assert_eq!(
            phase_at(&config(), Duration::from_millis(3000)),
            UnlockPhase::Revealed
        );
        assert_eq!(
            phase_at(&config(), Duration::from_millis(4499)),
            UnlockPhase::Revealed
        );
    }

    #[test]
    fn test_redirect_after_grace() {
        assert_eq!(
            phase_at(&config(), Duration::from_millis(4500)),
            UnlockPhase::Redirect
        );
        assert_eq!(
            phase_at(&config(), Duration::from_secs(3600)),
            UnlockPhase::Redirect
        );
    }

    #[test]
    fn test_custom_duration() {
        let quick = UnlockConfig {
            duration: Duration::from_millis(500),
            ..UnlockConfig::default()
        };
        assert_eq!(
            phase_at(&quick, Duration::from_millis(250)),
            UnlockPhase::Unlocking { progress: 40 }
        );
        assert_eq!(
            phase_at(&quick, Duration::from_millis(600)),
            UnlockPhase::Revealed
        );
    }

    #[test]
    fn test_token_ttl_covers_full_flow() {
        let ttl = config().token_ttl();
        assert!(ttl >= Duration::from_millis(4500));
    }

    #[test]
    fn test_phase_serializes_with_tag() {
        let json = serde_json::to_value(UnlockPhase::Unlocking { progress: 40 }).unwrap();
        assert_eq!(json["phase"], "unlocking");
        assert_eq!(json["progress"], 40);
        let json = serde_json::to_value(UnlockPhase::Redirect).unwrap();
        assert_eq!(json["phase"], "redirect");
    }
}
