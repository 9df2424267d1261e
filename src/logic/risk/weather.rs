//! Weather stress on top of the structural score.
//!
//! Wind, rain and snow are banded independently, scaled by a multiplier that
//! depends on foliage (evergreen vs deciduous, leaf-on season) or on the site,
//! then summed and clamped to 0-100.

use crate::logic::calculations::{band_points, clamp_score, scaled};
use crate::models::{
    is_leaf_on, SoilStability, Tree, WeatherComponent, WeatherRisk, WeatherSnapshot,
};

/// Peak wind (m/s)
pub const WIND_BANDS: &[(f64, u32)] = &[(7.0, 5), (10.0, 10), (15.0, 20), (20.0, 30)];
/// 3-day cumulative rain (mm)
pub const RAIN_BANDS: &[(f64, u32)] = &[(50.0, 10), (100.0, 20)];
/// Snow depth (cm)
pub const SNOW_BANDS: &[(f64, u32)] = &[(5.0, 10), (15.0, 20)];

pub const EVERGREEN_WIND_FACTOR: f64 = 1.3;
pub const LEAF_ON_WIND_FACTOR: f64 = 1.1;
pub const LEAF_OFF_WIND_FACTOR: f64 = 0.3;

pub const EVERGREEN_SNOW_FACTOR: f64 = 1.2;
pub const LEAF_ON_SNOW_FACTOR: f64 = 0.8;
pub const LEAF_OFF_SNOW_FACTOR: f64 = 0.2;

/// Slope (deg) from which saturated ground amplifies rain stress
pub const RAIN_SLOPE_THRESHOLD: f64 = 15.0;

/// Site conditions that amplify rain stress.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SiteConditions {
    pub soft_soil: bool,
    pub slope_deg: f64,
}

impl SiteConditions {
    pub fn of(tree: &Tree) -> Self {
        Self {
            soft_soil: tree.soil_stability == Some(SoilStability::Soft),
            slope_deg: tree.slope_deg(),
        }
    }
}

pub fn wind_factor(deciduous: bool, month: u32) -> f64 {
    match (deciduous, is_leaf_on(month)) {
        (false, _) => EVERGREEN_WIND_FACTOR,
        (true, true) => LEAF_ON_WIND_FACTOR,
        (true, false) => LEAF_OFF_WIND_FACTOR,
    }
}

pub fn snow_factor(deciduous: bool, month: u32) -> f64 {
    match (deciduous, is_leaf_on(month)) {
        (false, _) => EVERGREEN_SNOW_FACTOR,
        (true, true) => LEAF_ON_SNOW_FACTOR,
        (true, false) => LEAF_OFF_SNOW_FACTOR,
    }
}

/// Soft soil and steep slope each add 0.5 to the base multiplier of 1.0.
pub fn rain_factor(site: SiteConditions) -> f64 {
    let mut factor = 1.0;
    if site.soft_soil {
        factor += 0.5;
    }
    if site.slope_deg >= RAIN_SLOPE_THRESHOLD {
        factor += 0.5;
    }
    factor
}

fn component(value: f64, bands: &[(f64, u32)], factor: f64) -> WeatherComponent {
    let raw = band_points(value, bands);
    WeatherComponent {
        value,
        raw,
        factor,
        score: scaled(raw, factor),
    }
}

pub fn compute_weather_risk(
    weather: &WeatherSnapshot,
    deciduous: bool,
    month: u32,
    site: SiteConditions,
) -> WeatherRisk {
    let wind = component(weather.wind(), WIND_BANDS, wind_factor(deciduous, month));
    let rain = component(weather.rain(), RAIN_BANDS, rain_factor(site));
    let snow = component(weather.snow(), SNOW_BANDS, snow_factor(deciduous, month));

    let total = wind.score as i64 + rain.score as i64 + snow.score as i64;

    WeatherRisk {
        score: clamp_score(total),
        wind,
        rain,
        snow,
        month,
        deciduous,
        leaf_on: is_leaf_on(month),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn wx(wind: f64, rain: f64, snow: f64) -> WeatherSnapshot {
        WeatherSnapshot::new(wind, rain, snow, None)
    }

    #[test]
    fn calm_weather_scores_zero() {
        let risk = compute_weather_risk(&wx(6.0, 0.0, 0.0), true, 9, SiteConditions::default());
        assert_eq!(risk.score, 0);
        assert_eq!(risk.wind.raw, 0);
        assert_eq!(risk.wind.factor, LEAF_ON_WIND_FACTOR);
    }

    #[test]
    fn wind_bands() {
        let site = SiteConditions::default();
        let raw = |v: f64| compute_weather_risk(&wx(v, 0.0, 0.0), false, 7, site).wind.raw;
        assert_eq!(raw(6.9), 0);
        assert_eq!(raw(7.0), 5);
        assert_eq!(raw(10.0), 10);
        assert_eq!(raw(15.0), 20);
        assert_eq!(raw(19.9), 20);
        assert_eq!(raw(20.0), 30);
    }

    #[test]
    fn wind_multipliers() {
        let site = SiteConditions::default();
        // evergreen: 20 * 1.3
        assert_eq!(compute_weather_risk(&wx(15.0, 0.0, 0.0), false, 1, site).score, 26);
        // deciduous leaf-on: 20 * 1.1
        assert_eq!(compute_weather_risk(&wx(15.0, 0.0, 0.0), true, 7, site).score, 22);
        // deciduous leaf-off: 20 * 0.3
        assert_eq!(compute_weather_risk(&wx(15.0, 0.0, 0.0), true, 1, site).score, 6);
    }

    #[test]
    fn deciduous_scores_lower_in_january_than_july() {
        let site = SiteConditions::default();
        let jan = compute_weather_risk(&wx(12.0, 0.0, 0.0), true, 1, site);
        let jul = compute_weather_risk(&wx(12.0, 0.0, 0.0), true, 7, site);
        assert!(jan.score < jul.score);
        assert!(!jan.leaf_on);
        assert!(jul.leaf_on);
    }

    #[test]
    fn rain_multiplier_stacks() {
        let flat = SiteConditions::default();
        let soft = SiteConditions {
            soft_soil: true,
            slope_deg: 0.0,
        };
        let soft_steep = SiteConditions {
            soft_soil: true,
            slope_deg: 15.0,
        };
        assert_eq!(rain_factor(flat), 1.0);
        assert_eq!(rain_factor(soft), 1.5);
        assert_eq!(rain_factor(soft_steep), 2.0);

        assert_eq!(compute_weather_risk(&wx(0.0, 49.9, 0.0), true, 7, soft).score, 0);
        assert_eq!(compute_weather_risk(&wx(0.0, 50.0, 0.0), true, 7, soft).score, 15);
        assert_eq!(compute_weather_risk(&wx(0.0, 100.0, 0.0), true, 7, soft_steep).score, 40);
    }

    #[test]
    fn snow_multipliers() {
        let site = SiteConditions::default();
        assert_eq!(compute_weather_risk(&wx(0.0, 0.0, 4.9), false, 1, site).score, 0);
        assert_eq!(compute_weather_risk(&wx(0.0, 0.0, 15.0), false, 1, site).score, 24);
        assert_eq!(compute_weather_risk(&wx(0.0, 0.0, 5.0), true, 5, site).score, 8);
        assert_eq!(compute_weather_risk(&wx(0.0, 0.0, 5.0), true, 12, site).score, 2);
    }

    #[test]
    fn components_sum() {
        let site = SiteConditions {
            soft_soil: true,
            slope_deg: 20.0,
        };
        // wind 30*1.3=39, rain 20*2=40, snow 20*1.2=24 -> 103, clamped
        let risk = compute_weather_risk(&wx(25.0, 120.0, 30.0), false, 2, site);
        assert_eq!(risk.wind.score, 39);
        assert_eq!(risk.rain.score, 40);
        assert_eq!(risk.snow.score, 24);
        assert_eq!(risk.score, 100);
    }

    proptest! {
        #[test]
        fn weather_score_is_bounded(
            wind in -10.0f64..200.0,
            rain in -10.0f64..2000.0,
            snow in -10.0f64..500.0,
            deciduous in any::<bool>(),
            month in 1u32..=12,
            soft in any::<bool>(),
            slope in 0.0f64..90.0,
        ) {
            let site = SiteConditions { soft_soil: soft, slope_deg: slope };
            let risk = compute_weather_risk(&wx(wind, rain, snow), deciduous, month, site);
            prop_assert!(risk.score <= 100);
        }

        #[test]
        fn more_wind_never_lowers_score(
            a in 0.0f64..60.0,
            b in 0.0f64..60.0,
            deciduous in any::<bool>(),
            month in 1u32..=12,
        ) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let site = SiteConditions::default();
            let low = compute_weather_risk(&wx(lo, 0.0, 0.0), deciduous, month, site);
            let high = compute_weather_risk(&wx(hi, 0.0, 0.0), deciduous, month, site);
            prop_assert!(low.score <= high.score);
        }
    }
}
