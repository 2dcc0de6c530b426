//! Distance-to-score conversion.
//!
//! Every scale awards [`MAX_SCORE`] for a perfect guess and pays out along an
//! inverse power curve: half the points are gone once the miss reaches the
//! scale's characteristic distance, and the falloff exponent controls how
//! quickly the rest drain away beyond it.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Score awarded for a perfect guess.
pub const MAX_SCORE: u32 = 5000;

/// How forgiving scoring is. Tighter scales demand closer guesses.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumIter, Serialize, Deserialize,
)]
pub enum ScoreScale {
    /// Tight scoring for photo sets inside a single metro area.
    City,
    /// Mid-range scoring for regional photo sets.
    #[default]
    State,
    /// Loose scoring for sets that span a continent.
    Country,
}

impl ScoreScale {
    /// Miss distance, in kilometers, at which half the points are gone.
    pub fn scale_km(&self) -> f64 {
        match self {
            Self::City => 50.0,
            Self::State => 200.0,
            Self::Country => 2000.0,
        }
    }

    /// Exponent shaping how sharply points fall away past the scale distance.
    pub fn falloff(&self) -> f64 {
        match self {
            Self::City => 1.6,
            Self::State => 1.3,
            Self::Country => 1.0,
        }
    }

    /// Short name for settings screens.
    pub fn label(&self) -> &'static str {
        match self {
            Self::City => "City scale",
            Self::State => "State scale",
            Self::Country => "Country scale",
        }
    }

    /// One-line description for settings screens.
    pub fn description(&self) -> &'static str {
        match self {
            Self::City => "Best for close memories within a metro area.",
            Self::State => "A forgiving midpoint for regions and road trips.",
            Self::Country => "Loose scoring for big, cross-country spreads.",
        }
    }
}

/// Convert a miss distance into points under the given scale.
///
/// The result is rounded to the nearest integer and always lands in
/// `[0, MAX_SCORE]`. For any fixed positive distance a looser scale never
/// pays less than a tighter one. Non-finite distances score zero.
pub fn score(distance_km: f64, scale: ScoreScale) -> u32 {
    // max(0.0) below would quietly turn NaN into a perfect guess.
    if !distance_km.is_finite() {
        return 0;
    }

    let distance_km = distance_km.max(0.0);
    let normalized = (distance_km / scale.scale_km()).powf(scale.falloff());
    let raw = f64::from(MAX_SCORE) / (1.0 + normalized);

    (raw.round() as u32).min(MAX_SCORE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_perfect_guess_scores_max_on_every_scale() {
        for scale in ScoreScale::iter() {
            assert_eq!(score(0.0, scale), MAX_SCORE);
        }
    }

    #[test]
    fn test_half_points_at_the_scale_distance() {
        for scale in ScoreScale::iter() {
            assert_eq!(score(scale.scale_km(), scale), MAX_SCORE / 2);
        }
    }

    #[test]
    fn test_score_is_monotone_non_increasing() {
        for scale in ScoreScale::iter() {
            let mut previous = MAX_SCORE;
            let mut d = 0.01;
            while d < 25_000.0 {
                let s = score(d, scale);
                assert!(
                    s <= previous,
                    "score rose from {previous} to {s} at {d} km on {scale}"
                );
                previous = s;
                d *= 1.07;
            }
        }
    }

    #[test]
    fn test_looser_scales_never_pay_less() {
        let mut d = 0.001;
        while d < 25_000.0 {
            let city = score(d, ScoreScale::City);
            let state = score(d, ScoreScale::State);
            let country = score(d, ScoreScale::Country);
            assert!(city <= state, "city {city} > state {state} at {d} km");
            assert!(state <= country, "state {state} > country {country} at {d} km");
            d *= 1.03;
        }
    }

    #[test]
    fn test_score_never_exceeds_bounds() {
        for scale in ScoreScale::iter() {
            for d in [0.0, 0.3, 42.0, 777.0, 20_000.0, 1e9] {
                let s = score(d, scale);
                assert!(s <= MAX_SCORE);
            }
        }
    }

    #[test]
    fn test_far_misses_still_round_to_zero_eventually() {
        assert_eq!(score(1e9, ScoreScale::Country), 0);
    }

    #[test]
    fn test_non_finite_distances_score_zero() {
        for scale in ScoreScale::iter() {
            assert_eq!(score(f64::NAN, scale), 0);
            assert_eq!(score(f64::INFINITY, scale), 0);
            assert_eq!(score(f64::NEG_INFINITY, scale), 0);
        }
    }

    #[test]
    fn test_country_scale_spot_values() {
        // Linear falloff: 5000 / (1 + d/2000)
        assert_eq!(score(2000.0, ScoreScale::Country), 2500);
        assert_eq!(score(6000.0, ScoreScale::Country), 1250);
        assert_eq!(score(500.0, ScoreScale::Country), 4000);
    }

    #[test]
    fn test_scales_carry_settings_copy() {
        for scale in ScoreScale::iter() {
            assert!(!scale.label().is_empty());
            assert!(!scale.description().is_empty());
        }
    }
}
