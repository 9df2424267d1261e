use super::number::{lenient_f64, lenient_u32};
use chrono::Datelike;
use serde::{Deserialize, Serialize};

pub const DEFAULT_WIND_MAX: f64 = 6.0;

/// Today's weather as consumed by the risk engine.
///
/// Missing numeric fields deserialize as 0; a missing or out-of-range
/// `month` resolves to the current calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Peak wind speed (m/s)
    #[serde(default, deserialize_with = "zero_if_unknown")]
    pub wind_max: f64,
    /// Cumulative rainfall over the last 3 days (mm)
    #[serde(default, alias = "rain_3d_mm", deserialize_with = "zero_if_unknown")]
    pub rain_3d: f64,
    /// Snow depth (cm)
    #[serde(default, deserialize_with = "zero_if_unknown")]
    pub snow_cm: f64,
    #[serde(default, deserialize_with = "lenient_u32", skip_serializing_if = "Option::is_none")]
    pub month: Option<u32>,
}

fn zero_if_unknown<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(lenient_f64(deserializer)?.unwrap_or(0.0))
}

impl WeatherSnapshot {
    pub fn new(wind_max: f64, rain_3d: f64, snow_cm: f64, month: Option<u32>) -> Self {
        Self {
            wind_max,
            rain_3d,
            snow_cm,
            month,
        }
    }

    pub fn resolved_month(&self) -> u32 {
        match self.month {
            Some(m) if (1..=12).contains(&m) => m,
            _ => chrono::Local::now().month(),
        }
    }

    /// Copy with the month fixed, so a fleet pass sees one consistent month.
    pub fn pinned(&self) -> Self {
        Self {
            month: Some(self.resolved_month()),
            ..self.clone()
        }
    }

    /// Non-finite magnitudes are read as 0.
    pub fn wind(&self) -> f64 {
        finite_or_zero(self.wind_max)
    }

    pub fn rain(&self) -> f64 {
        finite_or_zero(self.rain_3d)
    }

    pub fn snow(&self) -> f64 {
        finite_or_zero(self.snow_cm)
    }

    /// Overlay individually supplied values, leaving the rest untouched.
    pub fn with_overrides(
        mut self,
        wind_max: Option<f64>,
        rain_3d: Option<f64>,
        snow_cm: Option<f64>,
        month: Option<u32>,
    ) -> Self {
        if let Some(v) = wind_max {
            self.wind_max = v;
        }
        if let Some(v) = rain_3d {
            self.rain_3d = v;
        }
        if let Some(v) = snow_cm {
            self.snow_cm = v;
        }
        if month.is_some() {
            self.month = month;
        }
        self
    }
}

impl Default for WeatherSnapshot {
    fn default() -> Self {
        Self::new(DEFAULT_WIND_MAX, 0.0, 0.0, None)
    }
}

impl std::fmt::Display for WeatherSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "wind {}m/s · rain(3d) {}mm · snow {}cm · month {}",
            self.wind(),
            self.rain(),
            self.snow(),
            self.resolved_month()
        )
    }
}

/// Deciduous trees carry foliage from April through October.
pub fn is_leaf_on(month: u32) -> bool {
    (4..=10).contains(&month)
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}
