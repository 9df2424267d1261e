use super::calculations::average_one_decimal;
use crate::models::{RiskLevel, Tree};
use std::collections::BTreeMap;

pub const NO_ZONE: &str = "-";

/// Average instant risk of the trees in one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneRisk {
    pub zone: String,
    pub trees: usize,
    pub average: f64,
    pub max: u32,
}

/// Per-zone averages, sorted by zone name. Trees without a zone are grouped
/// under "-".
pub fn zone_summary(trees: &[Tree]) -> Vec<ZoneRisk> {
    let mut by_zone: BTreeMap<&str, Vec<u32>> = BTreeMap::new();
    for tree in trees {
        let zone = tree.zone.as_deref().unwrap_or(NO_ZONE);
        by_zone.entry(zone).or_default().push(tree.risk_instant);
    }

    by_zone
        .into_iter()
        .map(|(zone, scores)| ZoneRisk {
            zone: zone.to_string(),
            trees: scores.len(),
            average: average_one_decimal(&scores),
            max: scores.iter().copied().max().unwrap_or(0),
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelCounts {
    pub low: usize,
    pub mid: usize,
    pub high: usize,
}

impl LevelCounts {
    pub fn total(&self) -> usize {
        self.low + self.mid + self.high
    }
}

pub fn level_counts(trees: &[Tree]) -> LevelCounts {
    trees
        .iter()
        .fold(LevelCounts::default(), |mut counts, tree| {
            match tree.risk_level {
                RiskLevel::Low => counts.low += 1,
                RiskLevel::Mid => counts.mid += 1,
                RiskLevel::High => counts.high += 1,
            }
            counts
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TreeType;

    fn tree(zone: Option<&str>, instant: u32, level: RiskLevel) -> Tree {
        let mut t = Tree::new("t", "", TreeType::Canopy);
        t.zone = zone.map(String::from);
        t.risk_instant = instant;
        t.risk_level = level;
        t
    }

    #[test]
    fn averages_per_zone() {
        let trees = vec![
            tree(Some("도로변 B존"), 62, RiskLevel::High),
            tree(Some("정문 A존"), 30, RiskLevel::Mid),
            tree(Some("도로변 B존"), 20, RiskLevel::Low),
            tree(None, 0, RiskLevel::Low),
            tree(Some("정문 A존"), 41, RiskLevel::Mid),
            tree(Some("정문 A존"), 10, RiskLevel::Low),
        ];
        let summary = zone_summary(&trees);
        assert_eq!(summary.len(), 3);

        assert_eq!(summary[0].zone, "-");
        assert_eq!(summary[0].average, 0.0);

        let b = summary.iter().find(|z| z.zone == "도로변 B존").unwrap();
        assert_eq!(b.trees, 2);
        assert_eq!(b.average, 41.0);
        assert_eq!(b.max, 62);

        let a = summary.iter().find(|z| z.zone == "정문 A존").unwrap();
        assert_eq!(a.average, 27.0);
    }

    #[test]
    fn counts_levels() {
        let trees = vec![
            tree(None, 70, RiskLevel::High),
            tree(None, 35, RiskLevel::Mid),
            tree(None, 5, RiskLevel::Low),
            tree(None, 0, RiskLevel::Low),
        ];
        let counts = level_counts(&trees);
        assert_eq!(
            counts,
            LevelCounts {
                low: 2,
                mid: 1,
                high: 1
            }
        );
        assert_eq!(counts.total(), 4);
        assert_eq!(level_counts(&[]), LevelCounts::default());
    }
}
