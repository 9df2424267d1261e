use super::RiskModel;
use crate::logic::calculations::clamp_score;
use crate::models::LevelThresholds;

/// Alternate model: the weather score scales the structural score.
///
/// weather_factor = 1 + weather / 100, so calm weather leaves the structural
/// score unchanged and the worst weather doubles it.
///
/// Tiers:
/// - HIGH: 70 and above
/// - MID: 40 to 69
/// - LOW: below 40
pub struct MultiplicativeModel;

pub const MULTIPLICATIVE_THRESHOLDS: LevelThresholds = LevelThresholds::new(70, 40);

impl MultiplicativeModel {
    pub fn weather_factor(weather: u32) -> f64 {
        1.0 + weather.min(100) as f64 / 100.0
    }
}

impl RiskModel for MultiplicativeModel {
    fn id(&self) -> &'static str {
        "multiplicative"
    }

    fn name(&self) -> &'static str {
        "Structural × weather factor"
    }

    fn thresholds(&self) -> LevelThresholds {
        MULTIPLICATIVE_THRESHOLDS
    }

    fn combine(&self, base: u32, weather: u32) -> u32 {
        let instant = (base as f64 * Self::weather_factor(weather)).round();
        clamp_score(instant as i64)
    }

    fn describe(&self, base: u32, weather: u32, instant: u32) -> String {
        format!(
            "structural {} × weather factor {:.2} = {} (capped at 100)",
            base,
            Self::weather_factor(weather),
            instant
        )
    }
}
