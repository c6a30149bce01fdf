//! Simulated daily usage pattern for display
//!
//! A sinusoidal baseline with Gaussian noise. This is illustrative only: it
//! is not derived from the model and is intentionally non-deterministic.

use anyhow::{Context, Result};
use rand::distributions::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;
use std::f64::consts::PI;

/// Standard deviation of the noise added to each hour, in kWh
pub const NOISE_STD_DEV_KWH: f64 = 0.5;

/// One point of the simulated curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyUsage {
    pub hour: u32,
    pub usage_kwh: f64,
}

/// Noise-free curve value for an hour of the day
pub fn baseline(hour: u32) -> f64 {
    (hour as f64 * PI / 12.0).sin() * 3.0 + 5.0
}

/// Simulate 24 hourly values
pub fn simulate<R: Rng + ?Sized>(rng: &mut R) -> Result<Vec<HourlyUsage>> {
    let noise = Normal::new(0.0, NOISE_STD_DEV_KWH).context("Invalid noise distribution")?;
    Ok((0..24)
        .map(|hour| HourlyUsage {
            hour,
            usage_kwh: baseline(hour) + noise.sample(rng),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_baseline_shape() {
        assert!((baseline(0) - 5.0).abs() < 1e-9);
        assert!((baseline(6) - 8.0).abs() < 1e-9);
        assert!((baseline(18) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_simulate_covers_day() {
        let mut rng = StdRng::seed_from_u64(7);
        let pattern = simulate(&mut rng).unwrap();
        assert_eq!(pattern.len(), 24);
        for (i, point) in pattern.iter().enumerate() {
            assert_eq!(point.hour as usize, i);
            // 8 standard deviations is far outside any plausible draw
            assert!((point.usage_kwh - baseline(point.hour)).abs() < 8.0 * NOISE_STD_DEV_KWH);
        }
    }

    #[test]
    fn test_same_seed_same_curve() {
        let a = simulate(&mut StdRng::seed_from_u64(42)).unwrap();
        let b = simulate(&mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }
}
