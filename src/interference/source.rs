//! Interference state refresh
//!
//! Produces the next [`InterferenceState`] when the refresh gate opens:
//! geomagnetic storm intensity from the Kp feed (fail-soft), solar flare
//! from a memoryless Normal draw, EMP from a stateful spike-and-decay
//! process. All draws go through an injectable seeded RNG so refresh
//! behavior is reproducible in tests.

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::{info, warn};

use crate::config::{ConfigError, EngineConfig};
use crate::interference::feed::KpFeed;
use crate::types::{clamp01, InterferenceState};

/// What a refresh attempt did.
///
/// Makes the fail-soft contract visible to callers: `feed_applied` is false
/// when the Kp feed failed and the previous geomagnetic intensity was
/// retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshOutcome {
    /// The state as committed by this refresh
    pub state: InterferenceState,
    /// True if the feed contributed a fresh geomagnetic value
    pub feed_applied: bool,
}

/// Stochastic interference models plus feed normalization.
///
/// Owns the RNG; the EMP value it evolves lives in the shared state, so the
/// source itself holds only model parameters.
pub struct InterferenceSource {
    solar: Normal<f64>,
    emp_spike: Normal<f64>,
    emp_spike_probability: f64,
    emp_decay_factor: f64,
    kp_scale_max: f64,
    rng: StdRng,
}

impl InterferenceSource {
    /// Build from validated config. The Normal parameters come straight from
    /// the config, so a non-positive standard deviation that slipped past
    /// validation is reported as a config error here.
    pub fn from_config(cfg: &EngineConfig, rng: StdRng) -> Result<Self, ConfigError> {
        let solar = Normal::new(cfg.solar.mean, cfg.solar.std_dev).map_err(|e| {
            ConfigError::Validation(vec![format!("solar model parameters invalid: {}", e)])
        })?;
        let emp_spike = Normal::new(cfg.emp.spike_mean, cfg.emp.spike_std_dev).map_err(|e| {
            ConfigError::Validation(vec![format!("emp model parameters invalid: {}", e)])
        })?;

        Ok(Self {
            solar,
            emp_spike,
            emp_spike_probability: cfg.emp.spike_probability,
            emp_decay_factor: cfg.emp.decay_factor,
            kp_scale_max: cfg.feed.kp_scale_max,
            rng,
        })
    }

    /// Derive the next state from the current one.
    ///
    /// The caller commits the returned state atomically; nothing here
    /// mutates shared data. A feed failure is absorbed field-locally: the
    /// stochastic fields still advance and `last_updated` still moves.
    pub async fn refresh(
        &mut self,
        current: InterferenceState,
        feed: &dyn KpFeed,
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        let mut next = current;
        let mut feed_applied = false;

        match feed.latest_kp().await {
            Ok(kp) => {
                next.geomagnetic_storm = clamp01(kp / self.kp_scale_max);
                feed_applied = true;
            }
            Err(e) => {
                warn!(error = %e, "Kp feed unavailable — keeping previous geomagnetic intensity");
            }
        }

        next.solar_flare = clamp01(self.solar.sample(&mut self.rng));
        next.emp_effect = self.next_emp(current.emp_effect);

        // A caller-supplied clock that runs backwards must not move the
        // refresh timestamp backwards with it.
        next.last_updated = now.max(current.last_updated);

        info!(
            solar_flare = next.solar_flare,
            geomagnetic_storm = next.geomagnetic_storm,
            emp_effect = next.emp_effect,
            feed_applied = feed_applied,
            "Updated space weather state"
        );

        RefreshOutcome {
            state: next,
            feed_applied,
        }
    }

    /// Advance the EMP spike-and-decay process one step.
    fn next_emp(&mut self, current: f64) -> f64 {
        if self.rng.gen::<f64>() < self.emp_spike_probability {
            clamp01(self.emp_spike.sample(&mut self.rng))
        } else {
            current * self.emp_decay_factor
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interference::feed::{FeedError, OfflineFeed};
    use async_trait::async_trait;
    use rand::SeedableRng;

    struct StaticFeed(f64);

    #[async_trait]
    impl KpFeed for StaticFeed {
        async fn latest_kp(&self) -> Result<f64, FeedError> {
            Ok(self.0)
        }
    }

    fn source(seed: u64) -> InterferenceSource {
        InterferenceSource::from_config(&EngineConfig::default(), StdRng::seed_from_u64(seed))
            .expect("default config is valid")
    }

    #[tokio::test]
    async fn feed_value_normalized_by_kp_scale() {
        let mut src = source(1);
        let current = InterferenceState::quiet(Utc::now());
        let outcome = src.refresh(current, &StaticFeed(4.5), Utc::now()).await;
        assert!(outcome.feed_applied);
        assert!((outcome.state.geomagnetic_storm - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn extreme_kp_clamps_to_one() {
        let mut src = source(1);
        let current = InterferenceState::quiet(Utc::now());
        let outcome = src.refresh(current, &StaticFeed(27.0), Utc::now()).await;
        assert_eq!(outcome.state.geomagnetic_storm, 1.0);
    }

    #[tokio::test]
    async fn feed_failure_keeps_previous_geomagnetic_value() {
        let mut src = source(1);
        let mut current = InterferenceState::quiet(Utc::now());
        current.geomagnetic_storm = 0.44;

        let outcome = src.refresh(current, &OfflineFeed, Utc::now()).await;
        assert!(!outcome.feed_applied);
        assert_eq!(outcome.state.geomagnetic_storm, 0.44);
    }

    #[tokio::test]
    async fn stochastic_fields_stay_normalized() {
        let mut src = source(7);
        let mut state = InterferenceState::quiet(Utc::now());
        for _ in 0..500 {
            let outcome = src.refresh(state, &OfflineFeed, Utc::now()).await;
            state = outcome.state;
            assert!(state.is_normalized(), "state left [0,1]: {:?}", state);
        }
    }

    #[tokio::test]
    async fn emp_decays_when_spikes_disabled() {
        let mut cfg = EngineConfig::default();
        cfg.emp.spike_probability = 0.0;
        let mut src = InterferenceSource::from_config(&cfg, StdRng::seed_from_u64(2))
            .expect("config is valid");

        let mut current = InterferenceState::quiet(Utc::now());
        current.emp_effect = 0.5;
        let outcome = src.refresh(current, &OfflineFeed, Utc::now()).await;
        assert!((outcome.state.emp_effect - 0.45).abs() < 1e-12);
    }

    #[tokio::test]
    async fn emp_spike_replaces_decayed_value() {
        let mut cfg = EngineConfig::default();
        cfg.emp.spike_probability = 1.0;
        let mut src = InterferenceSource::from_config(&cfg, StdRng::seed_from_u64(11))
            .expect("config is valid");

        let mut state = InterferenceState::quiet(Utc::now());
        state.emp_effect = 0.5;
        let mut replaced = false;
        for _ in 0..10 {
            let decayed = state.emp_effect * cfg.emp.decay_factor;
            state = src.refresh(state, &OfflineFeed, Utc::now()).await.state;
            assert!((0.0..=1.0).contains(&state.emp_effect));
            if (state.emp_effect - decayed).abs() > 1e-12 {
                replaced = true;
            }
        }
        assert!(replaced, "every spike landed exactly on the decay value");
    }

    #[tokio::test]
    async fn last_updated_never_moves_backwards() {
        let mut src = source(3);
        let t1 = Utc::now();
        let t0 = t1 - chrono::Duration::seconds(60);

        let current = InterferenceState::quiet(t1);
        let outcome = src.refresh(current, &OfflineFeed, t0).await;
        assert_eq!(outcome.state.last_updated, t1);
    }

    #[tokio::test]
    async fn refresh_sets_last_updated_forward() {
        let mut src = source(3);
        let t0 = Utc::now();
        let t1 = t0 + chrono::Duration::seconds(301);

        let current = InterferenceState::quiet(t0);
        let outcome = src.refresh(current, &StaticFeed(2.0), t1).await;
        assert_eq!(outcome.state.last_updated, t1);
    }
}
