use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    #[default]
    #[serde(rename = "LOW")]
    Low,
    #[serde(rename = "MID")]
    Mid,
    #[serde(rename = "HIGH")]
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Mid => "MID",
            RiskLevel::High => "HIGH",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            RiskLevel::Low => "·",
            RiskLevel::Mid => "⚠",
            RiskLevel::High => "!",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "LOW" => Some(RiskLevel::Low),
            "MID" | "MOD" | "MODERATE" => Some(RiskLevel::Mid),
            "HIGH" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Score cut-offs for the discrete risk tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelThresholds {
    pub high: u32,
    pub mid: u32,
}

impl LevelThresholds {
    pub const fn new(high: u32, mid: u32) -> Self {
        Self { high, mid }
    }

    pub fn classify(&self, instant: u32) -> RiskLevel {
        if instant >= self.high {
            RiskLevel::High
        } else if instant >= self.mid {
            RiskLevel::Mid
        } else {
            RiskLevel::Low
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StructuralFactor {
    Height,
    CrownWidth,
    Dbh,
    Slope,
    Tilt,
    SoilStability,
    RootCondition,
}

impl StructuralFactor {
    pub fn as_str(&self) -> &'static str {
        match self {
            StructuralFactor::Height => "height",
            StructuralFactor::CrownWidth => "crown width",
            StructuralFactor::Dbh => "dbh",
            StructuralFactor::Slope => "slope",
            StructuralFactor::Tilt => "tilt",
            StructuralFactor::SoilStability => "soil",
            StructuralFactor::RootCondition => "root",
        }
    }
}

impl std::fmt::Display for StructuralFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralItem {
    pub factor: StructuralFactor,
    /// Factor name with the measured value, e.g. "height 7.2m"
    pub label: String,
    pub points: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StructuralRisk {
    pub score: u32,
    pub items: Vec<StructuralItem>,
}

impl StructuralRisk {
    pub fn points_for(&self, factor: StructuralFactor) -> u32 {
        self.items
            .iter()
            .filter(|i| i.factor == factor)
            .map(|i| i.points)
            .sum()
    }
}

/// One weather stressor: measured value, banded points, multiplier, adjusted points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherComponent {
    pub value: f64,
    pub raw: u32,
    pub factor: f64,
    pub score: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherRisk {
    pub score: u32,
    pub wind: WeatherComponent,
    pub rain: WeatherComponent,
    pub snow: WeatherComponent,
    pub month: u32,
    pub deciduous: bool,
    pub leaf_on: bool,
}

/// Explanation of one tree's score. Derived on demand and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskDetail {
    pub model: &'static str,
    pub structural: StructuralRisk,
    pub weather: WeatherRisk,
    pub instant: u32,
    pub level: RiskLevel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RiskResult {
    pub base: u32,
    pub weather: u32,
    pub instant: u32,
    pub level: RiskLevel,
    /// `None` for trees outside the applicability gate.
    pub detail: Option<RiskDetail>,
}

impl RiskResult {
    pub fn not_applicable() -> Self {
        Self {
            base: 0,
            weather: 0,
            instant: 0,
            level: RiskLevel::Low,
            detail: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_boundaries_are_exact() {
        let t = LevelThresholds::new(60, 30);
        assert_eq!(t.classify(0), RiskLevel::Low);
        assert_eq!(t.classify(29), RiskLevel::Low);
        assert_eq!(t.classify(30), RiskLevel::Mid);
        assert_eq!(t.classify(59), RiskLevel::Mid);
        assert_eq!(t.classify(60), RiskLevel::High);
        assert_eq!(t.classify(100), RiskLevel::High);
    }

    #[test]
    fn risk_level_from_str_accepts_legacy_values() {
        assert_eq!(RiskLevel::from_str("high"), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_str("MOD"), Some(RiskLevel::Mid));
        assert_eq!(RiskLevel::from_str(" mid "), Some(RiskLevel::Mid));
        assert_eq!(RiskLevel::from_str("LOW"), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::from_str("severe"), None);
    }

    #[test]
    fn risk_level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&RiskLevel::High).unwrap(), "\"HIGH\"");
        assert!(RiskLevel::High > RiskLevel::Mid);
    }
}
