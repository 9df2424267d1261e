use super::number::{lenient_bool, lenient_f64, lenient_string, lenient_u32};
use super::risk::{RiskLevel, RiskResult};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Minimum height (m) for a canopy tree to be considered for fall risk.
pub const MIN_RISK_HEIGHT_M: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TreeType {
    /// 교목
    Canopy,
    /// 관목
    Shrub,
    Other(String),
}

impl TreeType {
    pub fn as_str(&self) -> &str {
        match self {
            TreeType::Canopy => "교목",
            TreeType::Shrub => "관목",
            TreeType::Other(s) => s.as_str(),
        }
    }
}

impl From<String> for TreeType {
    fn from(s: String) -> Self {
        match s.trim() {
            "교목" => TreeType::Canopy,
            "관목" => TreeType::Shrub,
            _ => TreeType::Other(s),
        }
    }
}

impl From<TreeType> for String {
    fn from(t: TreeType) -> Self {
        match t {
            TreeType::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for TreeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoilStability {
    #[serde(rename = "단단함")]
    Firm,
    #[serde(rename = "보통")]
    Normal,
    #[serde(rename = "연약함")]
    Soft,
}

impl SoilStability {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoilStability::Firm => "단단함",
            SoilStability::Normal => "보통",
            SoilStability::Soft => "연약함",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "단단함" | "firm" => Some(SoilStability::Firm),
            "보통" | "normal" => Some(SoilStability::Normal),
            "연약함" | "soft" | "weak" => Some(SoilStability::Soft),
            _ => None,
        }
    }
}

impl std::fmt::Display for SoilStability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RootCondition {
    #[default]
    #[serde(rename = "없음")]
    None,
    #[serde(rename = "약간")]
    Slight,
    #[serde(rename = "심함")]
    Severe,
}

impl RootCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            RootCondition::None => "없음",
            RootCondition::Slight => "약간",
            RootCondition::Severe => "심함",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "없음" | "none" => Some(RootCondition::None),
            "약간" | "slight" => Some(RootCondition::Slight),
            "심함" | "severe" => Some(RootCondition::Severe),
            _ => None,
        }
    }
}

impl std::fmt::Display for RootCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One monitored tree.
///
/// Structural inputs are optional because inventory records are often
/// incomplete; an unknown measurement scores 0 for its factor. The `risk_*`
/// fields are derived and overwritten on every recomputation. Fields this
/// crate does not model (coordinates, history, tags) ride along in `extra`
/// so a load/save cycle does not lose them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTree")]
pub struct Tree {
    pub id: String,
    pub species: String,
    #[serde(rename = "type")]
    pub tree_type: TreeType,
    pub zone: Option<String>,
    pub height: Option<f64>,
    pub dbh: Option<f64>,
    pub crown_width: Option<f64>,
    pub slope: Option<f64>,
    pub tilt: Option<f64>,
    /// `None` when the record holds a value we do not recognise.
    pub soil_stability: Option<SoilStability>,
    pub root_condition: RootCondition,
    pub health_score: Option<f64>,
    pub deciduous: Option<bool>,
    pub risk_base: u32,
    pub risk_weather: u32,
    pub risk_instant: u32,
    pub risk_level: RiskLevel,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Tree {
    pub fn new(id: impl Into<String>, species: impl Into<String>, tree_type: TreeType) -> Self {
        Self {
            id: id.into(),
            species: species.into(),
            tree_type,
            zone: None,
            height: None,
            dbh: None,
            crown_width: None,
            slope: None,
            tilt: None,
            soil_stability: Some(SoilStability::Normal),
            root_condition: RootCondition::None,
            health_score: None,
            deciduous: None,
            risk_base: 0,
            risk_weather: 0,
            risk_instant: 0,
            risk_level: RiskLevel::Low,
            extra: Map::new(),
        }
    }

    pub fn height_m(&self) -> f64 {
        self.height.unwrap_or(0.0)
    }

    pub fn dbh_cm(&self) -> f64 {
        self.dbh.unwrap_or(0.0)
    }

    pub fn crown_width_m(&self) -> f64 {
        self.crown_width.unwrap_or(0.0)
    }

    pub fn slope_deg(&self) -> f64 {
        self.slope.unwrap_or(0.0)
    }

    pub fn tilt_deg(&self) -> f64 {
        self.tilt.unwrap_or(0.0)
    }

    /// Only canopy trees of at least 5m are scored for fall risk.
    pub fn is_risk_candidate(&self) -> bool {
        self.tree_type == TreeType::Canopy && self.height_m() >= MIN_RISK_HEIGHT_M
    }

    pub fn apply_risk(&mut self, result: &RiskResult) {
        self.risk_base = result.base;
        self.risk_weather = result.weather;
        self.risk_instant = result.instant;
        self.risk_level = result.level;
    }

    /// Zero the derived fields of a tree outside the gate.
    pub fn reset_risk(&mut self) {
        self.risk_base = 0;
        self.risk_weather = 0;
        self.risk_instant = 0;
        self.risk_level = RiskLevel::Low;
    }
}

/// Wire shape accepted on load, including field names from older dashboard
/// revisions.
#[derive(Deserialize)]
struct RawTree {
    #[serde(default, deserialize_with = "lenient_string")]
    id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    species: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    tree_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    zone: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    height: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    dbh: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    crown_width: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    crown: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    slope: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    slope_deg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    tilt: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    tilt_deg: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    soil_stability: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    root_condition: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    root_issue: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    health_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient_bool")]
    deciduous: Option<bool>,
    #[serde(default, deserialize_with = "lenient_u32")]
    risk_base: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    risk_weather: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    risk_instant: Option<u32>,
    #[serde(default, deserialize_with = "lenient_string")]
    risk_level: Option<String>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawTree> for Tree {
    fn from(raw: RawTree) -> Self {
        let id = raw.id.unwrap_or_default();

        let soil_stability = match raw.soil_stability.as_deref().map(str::trim) {
            None | Some("") => Some(SoilStability::Normal),
            Some(s) => {
                let parsed = SoilStability::from_str(s);
                if parsed.is_none() {
                    tracing::warn!("Tree {}: unrecognised soil_stability {:?}", id, s);
                }
                parsed
            }
        };

        let root_condition = raw
            .root_condition
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or(raw.root_issue.as_deref())
            .and_then(RootCondition::from_str)
            .unwrap_or_default();

        let mut extra = raw.extra;
        // Superseded by risk_instant / the in-memory explanation
        extra.remove("risk_score");
        extra.remove("_risk_detail");

        Tree {
            species: raw.species.unwrap_or_default(),
            tree_type: TreeType::from(raw.tree_type.unwrap_or_default()),
            zone: raw.zone.filter(|z| !z.trim().is_empty()),
            height: raw.height,
            dbh: raw.dbh,
            crown_width: raw.crown_width.or(raw.crown),
            slope: raw.slope.or(raw.slope_deg),
            tilt: raw.tilt.or(raw.tilt_deg),
            soil_stability,
            root_condition,
            health_score: raw.health_score,
            deciduous: raw.deciduous,
            risk_base: raw.risk_base.unwrap_or(0).min(100),
            risk_weather: raw.risk_weather.unwrap_or(0).min(100),
            risk_instant: raw.risk_instant.unwrap_or(0).min(100),
            risk_level: raw
                .risk_level
                .as_deref()
                .and_then(RiskLevel::from_str)
                .unwrap_or_default(),
            extra,
            id,
        }
    }
}
