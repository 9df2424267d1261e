//! Structural (weather-independent) fall risk.
//!
//! Each factor is a half-open step function over the measured value; the
//! points are summed and clamped to 0-100.

use crate::logic::calculations::{band_points, clamp_score};
use crate::models::{
    RootCondition, SoilStability, StructuralFactor, StructuralItem, StructuralRisk, Tree,
};

/// Height (m)
pub const HEIGHT_BANDS: &[(f64, u32)] = &[(5.0, 10), (8.0, 20), (12.0, 30)];
/// Crown width (m)
pub const CROWN_WIDTH_BANDS: &[(f64, u32)] = &[(4.0, 10), (6.0, 15)];
/// Diameter at breast height (cm)
pub const DBH_BANDS: &[(f64, u32)] = &[(30.0, 5), (50.0, 10)];
/// Ground slope (deg)
pub const SLOPE_BANDS: &[(f64, u32)] = &[(5.0, 10), (15.0, 20), (30.0, 30)];
/// Trunk tilt (deg)
pub const TILT_BANDS: &[(f64, u32)] = &[(5.0, 10), (10.0, 20), (20.0, 30)];

pub fn soil_points(soil: Option<SoilStability>) -> u32 {
    match soil {
        Some(SoilStability::Normal) => 10,
        Some(SoilStability::Soft) => 20,
        Some(SoilStability::Firm) | None => 0,
    }
}

pub fn root_points(root: RootCondition) -> u32 {
    match root {
        RootCondition::None => 0,
        RootCondition::Slight => 10,
        RootCondition::Severe => 25,
    }
}

pub fn compute_structural_risk(tree: &Tree) -> StructuralRisk {
    if !tree.is_risk_candidate() {
        return StructuralRisk::default();
    }

    let height = tree.height_m();
    let crown = tree.crown_width_m();
    let dbh = tree.dbh_cm();
    let slope = tree.slope_deg();
    let tilt = tree.tilt_deg();

    let mut items = Vec::new();
    let mut push = |factor: StructuralFactor, label: String, points: u32| {
        if points > 0 {
            items.push(StructuralItem {
                factor,
                label,
                points,
            });
        }
    };

    push(
        StructuralFactor::Height,
        format!("height {}m", height),
        band_points(height, HEIGHT_BANDS),
    );
    push(
        StructuralFactor::CrownWidth,
        format!("crown width {}m", crown),
        band_points(crown, CROWN_WIDTH_BANDS),
    );
    push(
        StructuralFactor::Dbh,
        format!("dbh {}cm", dbh),
        band_points(dbh, DBH_BANDS),
    );
    push(
        StructuralFactor::Slope,
        format!("slope {}°", slope),
        band_points(slope, SLOPE_BANDS),
    );
    push(
        StructuralFactor::Tilt,
        format!("tilt {}°", tilt),
        band_points(tilt, TILT_BANDS),
    );
    if let Some(soil) = tree.soil_stability {
        push(
            StructuralFactor::SoilStability,
            format!("soil {}", soil),
            soil_points(Some(soil)),
        );
    }
    push(
        StructuralFactor::RootCondition,
        format!("root damage {}", tree.root_condition),
        root_points(tree.root_condition),
    );

    let total: i64 = items.iter().map(|i| i.points as i64).sum();

    StructuralRisk {
        score: clamp_score(total),
        items,
    }
}
