use super::RiskModel;
use crate::logic::calculations::clamp_score;
use crate::models::LevelThresholds;

/// Canonical model: instant = base + weather, clamped.
///
/// Tiers:
/// - HIGH: 60 and above
/// - MID: 30 to 59
/// - LOW: below 30
pub struct AdditiveModel;

pub const ADDITIVE_THRESHOLDS: LevelThresholds = LevelThresholds::new(60, 30);

impl RiskModel for AdditiveModel {
    fn id(&self) -> &'static str {
        "additive"
    }

    fn name(&self) -> &'static str {
        "Structural + weather"
    }

    fn thresholds(&self) -> LevelThresholds {
        ADDITIVE_THRESHOLDS
    }

    fn combine(&self, base: u32, weather: u32) -> u32 {
        clamp_score(base as i64 + weather as i64)
    }

    fn describe(&self, base: u32, weather: u32, instant: u32) -> String {
        format!(
            "structural {} + weather {} = {} (capped at 100)",
            base, weather, instant
        )
    }
}
