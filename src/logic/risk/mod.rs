pub mod additive;
pub mod composer;
pub mod multiplicative;
pub mod structural;
pub mod weather;

pub use additive::AdditiveModel;
pub use composer::RiskComposer;
pub use multiplicative::MultiplicativeModel;
pub use structural::compute_structural_risk;
pub use weather::{compute_weather_risk, SiteConditions};

use crate::models::LevelThresholds;
use serde::{Deserialize, Serialize};

/// Strategy combining the structural and weather scores into the instant score.
pub trait RiskModel: Send + Sync {
    /// Unique identifier for this model
    fn id(&self) -> &'static str;

    /// Human-readable name
    fn name(&self) -> &'static str;

    fn thresholds(&self) -> LevelThresholds;

    /// Combine the two partial scores; the result must lie in 0..=100.
    fn combine(&self, base: u32, weather: u32) -> u32;

    /// One-line rendering of the combination, used in explanations.
    fn describe(&self, base: u32, weather: u32, instant: u32) -> String;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskModelKind {
    #[default]
    Additive,
    Multiplicative,
}

impl RiskModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskModelKind::Additive => "additive",
            RiskModelKind::Multiplicative => "multiplicative",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "additive" | "add" | "sum" => Some(RiskModelKind::Additive),
            "multiplicative" | "mul" | "factor" => Some(RiskModelKind::Multiplicative),
            _ => None,
        }
    }

    pub fn build(&self) -> Box<dyn RiskModel> {
        match self {
            RiskModelKind::Additive => Box::new(AdditiveModel),
            RiskModelKind::Multiplicative => Box::new(MultiplicativeModel),
        }
    }
}

impl std::fmt::Display for RiskModelKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_kind_from_str() {
        assert_eq!(RiskModelKind::from_str("Additive"), Some(RiskModelKind::Additive));
        assert_eq!(
            RiskModelKind::from_str("multiplicative"),
            Some(RiskModelKind::Multiplicative)
        );
        assert_eq!(RiskModelKind::from_str("bayesian"), None);
    }

    #[test]
    fn model_kind_builds_matching_strategy() {
        assert_eq!(RiskModelKind::Additive.build().id(), "additive");
        assert_eq!(RiskModelKind::Multiplicative.build().id(), "multiplicative");
    }
}
