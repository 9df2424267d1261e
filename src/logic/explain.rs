use super::risk::RiskModel;
use crate::models::{RiskDetail, RiskLevel, Tree, WeatherComponent};

/// Human-readable breakdown of one tree's score.
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    pub headline: String,
    pub structural: Vec<String>,
    pub structural_total: u32,
    pub weather: Vec<String>,
    pub weather_total: u32,
    pub season: String,
    pub conclusion: String,
    pub level: RiskLevel,
}

fn weather_line(label: &str, value: f64, unit: &str, c: &WeatherComponent) -> String {
    format!("{} {}{} (×{}) → +{}", label, value, unit, c.factor, c.score)
}

pub fn explain(tree: &Tree, detail: &RiskDetail, model: &dyn RiskModel) -> Explanation {
    let headline = format!(
        "{} · {} ({}) - current risk {} ({})",
        tree.id,
        if tree.species.is_empty() {
            "-"
        } else {
            tree.species.as_str()
        },
        tree.zone.as_deref().unwrap_or("-"),
        detail.instant,
        detail.level
    );

    let structural = detail
        .structural
        .items
        .iter()
        .map(|item| format!("{} → +{}", item.label, item.points))
        .collect();

    let w = &detail.weather;
    let weather = vec![
        weather_line("max wind", w.wind.value, "m/s", &w.wind),
        weather_line("3-day rain", w.rain.value, "mm", &w.rain),
        weather_line("snow", w.snow.value, "cm", &w.snow),
    ];

    let season = format!(
        "month {}, {}{}",
        w.month,
        if w.deciduous { "deciduous" } else { "evergreen" },
        match (w.deciduous, w.leaf_on) {
            (false, _) => "",
            (true, true) => " (leaf-on)",
            (true, false) => " (leaf-off)",
        }
    );

    Explanation {
        headline,
        structural,
        structural_total: detail.structural.score,
        weather,
        weather_total: w.score,
        season,
        conclusion: model.describe(detail.structural.score, w.score, detail.instant),
        level: detail.level,
    }
}

impl std::fmt::Display for Explanation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.headline)?;
        writeln!(f)?;
        writeln!(f, "[Structural risk]")?;
        if self.structural.is_empty() {
            writeln!(f, "no contributing factors")?;
        }
        for line in &self.structural {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "= structural total {}", self.structural_total)?;
        writeln!(f)?;
        writeln!(f, "[Weather impact] {}", self.season)?;
        for line in &self.weather {
            writeln!(f, "{}", line)?;
        }
        writeln!(f, "= weather total {}", self.weather_total)?;
        writeln!(f)?;
        writeln!(f, "[Instant risk]")?;
        write!(f, "{} → {}", self.conclusion, self.level)
    }
}
