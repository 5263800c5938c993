//! Speed profile recalculation.
//!
//! A "Max speed" modifier also reshapes the ship's polar diagram: every
//! heading sample is scaled by the same percentage and then kept inside
//! bounds shared by the whole ship catalog.

use crate::attributes::{ShipAttributes, SpeedProfile};
use crate::error::ShipStatError;
use crate::registry::Registries;
use serde::Serialize;

/// Margin applied to the slowest sample seen in the catalog.
pub const MIN_SPEED_SAFETY_FACTOR: f64 = 1.2;

/// Theoretical lower and upper speed of any ship.
///
/// # Examples
///
/// ```rust
/// use shipstat::SpeedBounds;
///
/// let bounds = SpeedBounds::new(-2.0, 15.5).unwrap();
/// assert_eq!(bounds.clamp(20.0), 15.5);
/// assert_eq!(bounds.clamp(-3.0), -2.0);
/// assert!(SpeedBounds::new(16.0, 15.5).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SpeedBounds {
    min: f64,
    max: f64,
}

impl SpeedBounds {
    /// Create bounds from explicit limits.
    ///
    /// # Errors
    ///
    /// Returns [`ShipStatError::InvalidSpeedBounds`] when `min > max` or
    /// either limit is NaN.
    pub fn new(min: f64, max: f64) -> Result<Self, ShipStatError> {
        if min.is_nan() || max.is_nan() || min > max {
            return Err(ShipStatError::InvalidSpeedBounds { min, max });
        }
        Ok(Self { min, max })
    }

    /// Derive the bounds from every ship of a catalog.
    ///
    /// The minimum is the slowest profile sample in the catalog times
    /// [`MIN_SPEED_SAFETY_FACTOR`]. The maximum is the fixed "Max speed" cap,
    /// or the fastest sample when that modifier has no fixed cap.
    pub fn from_catalog<'a, I>(ships: I, registries: &Registries) -> Result<Self, ShipStatError>
    where
        I: IntoIterator<Item = &'a ShipAttributes>,
    {
        let (slowest, fastest) = ships
            .into_iter()
            .filter_map(ShipAttributes::speed_profile)
            .fold(None, |acc: Option<(f64, f64)>, profile| {
                let (lo, hi) = acc.unwrap_or((f64::INFINITY, f64::NEG_INFINITY));
                Some((lo.min(profile.min()), hi.max(profile.max())))
            })
            .ok_or(ShipStatError::EmptyCatalog)?;

        let max = registries.max_speed_cap().unwrap_or(fastest);
        Self::new(slowest * MIN_SPEED_SAFETY_FACTOR, max)
    }

    /// Lowest allowed sample.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Highest allowed sample.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Clamp `speed` into `[min, max]`.
    pub fn clamp(&self, speed: f64) -> f64 {
        speed.clamp(self.min, self.max)
    }
}

/// Scale every sample of `profile` by a net percentage (as a fraction).
///
/// Positive samples are multiplied by `1 + percentage`, negative ones are
/// divided by it. Every result is clamped to `bounds`.
///
/// ```rust
/// use shipstat::{rescale_speed_profile, SpeedBounds, SpeedProfile};
///
/// let bounds = SpeedBounds::new(-5.0, 15.5).unwrap();
/// let mut profile = SpeedProfile::uniform(10.0);
/// profile.samples_mut()[12] = -2.5;
///
/// rescale_speed_profile(&mut profile, 0.25, &bounds);
/// assert_eq!(profile.samples()[0], 12.5);
/// assert_eq!(profile.samples()[12], -2.0);
/// ```
pub fn rescale_speed_profile(profile: &mut SpeedProfile, percentage: f64, bounds: &SpeedBounds) {
    let factor = 1.0 + percentage;
    for sample in profile.samples_mut().iter_mut() {
        let scaled = if *sample > 0.0 {
            *sample * factor
        } else if *sample < 0.0 {
            *sample / factor
        } else {
            *sample
        };
        *sample = bounds.clamp(scaled);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::HEADING_COUNT;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn sample_profile() -> SpeedProfile {
        let mut samples = [0.0; HEADING_COUNT];
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = if i < 12 { i as f64 } else { -((i - 11) as f64) * 0.25 };
        }
        SpeedProfile::new(samples)
    }

    #[test]
    fn test_rescale_positive_and_negative() {
        let bounds = SpeedBounds::new(-100.0, 100.0).unwrap();
        let mut profile = sample_profile();
        rescale_speed_profile(&mut profile, 0.25, &bounds);

        assert_eq!(profile.samples()[0], 0.0);
        assert!(approx(profile.samples()[4], 5.0));
        assert!(approx(profile.samples()[12], -0.2));
    }

    #[test]
    fn test_rescale_negative_percentage() {
        let bounds = SpeedBounds::new(-100.0, 100.0).unwrap();
        let mut profile = SpeedProfile::uniform(10.0);
        rescale_speed_profile(&mut profile, -0.2, &bounds);
        assert!(profile.samples().iter().all(|&s| approx(s, 8.0)));
    }

    #[test]
    fn test_rescale_stays_within_bounds() {
        let bounds = SpeedBounds::new(-1.5, 15.5).unwrap();
        for percentage in [-0.99, -0.5, 0.0, 0.5, 3.0, 1e6] {
            let mut profile = sample_profile();
            profile.samples_mut()[3] = 15.0;
            profile.samples_mut()[20] = -1.4;
            rescale_speed_profile(&mut profile, percentage, &bounds);
            assert!(
                profile
                    .samples()
                    .iter()
                    .all(|&s| (bounds.min()..=bounds.max()).contains(&s)),
                "out of bounds for {percentage}"
            );
        }
    }

    #[test]
    fn test_zero_percentage_only_clamps() {
        let bounds = SpeedBounds::new(0.0, 5.0).unwrap();
        let mut profile = sample_profile();
        rescale_speed_profile(&mut profile, 0.0, &bounds);
        assert_eq!(profile.samples()[3], 3.0);
        assert_eq!(profile.samples()[11], 5.0);
        assert_eq!(profile.samples()[15], 0.0);
    }

    #[test]
    fn test_bounds_from_catalog() {
        let mut slow = [4.0; HEADING_COUNT];
        slow[12] = -2.0;
        let ships = vec![
            ShipAttributes::new().with_speed_profile(SpeedProfile::new(slow)),
            ShipAttributes::new().with_speed_profile(SpeedProfile::uniform(14.0)),
            ShipAttributes::new(),
        ];

        let bounds = SpeedBounds::from_catalog(&ships, &Registries::naval_action()).unwrap();
        assert!(approx(bounds.min(), -2.4));
        assert_eq!(bounds.max(), 15.5);

        let uncapped = SpeedBounds::from_catalog(&ships, &Registries::empty()).unwrap();
        assert_eq!(uncapped.max(), 14.0);
    }

    #[test]
    fn test_bounds_from_empty_catalog() {
        let ships: Vec<ShipAttributes> = vec![ShipAttributes::new()];
        assert!(matches!(
            SpeedBounds::from_catalog(&ships, &Registries::naval_action()),
            Err(ShipStatError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_invalid_bounds() {
        assert!(SpeedBounds::new(f64::NAN, 1.0).is_err());
        assert!(SpeedBounds::new(2.0, 1.0).is_err());
        assert!(SpeedBounds::new(1.0, 1.0).is_ok());
    }
}
