/// Step function over an ascending `(lower_bound, points)` table.
///
/// Bands are half-open: a value scores the points of the last bound it
/// reaches. Values below the first bound, and NaN, score 0.
pub fn band_points(value: f64, bands: &[(f64, u32)]) -> u32 {
    bands
        .iter()
        .take_while(|(lower, _)| value >= *lower)
        .last()
        .map(|(_, points)| *points)
        .unwrap_or(0)
}

/// Clamp an accumulated score to the 0-100 scale.
pub fn clamp_score(score: i64) -> u32 {
    score.clamp(0, 100) as u32
}

/// Apply a multiplier to banded points, rounding half away from zero.
pub fn scaled(raw: u32, factor: f64) -> u32 {
    let v = (raw as f64 * factor).round();
    if v.is_finite() && v > 0.0 {
        v as u32
    } else {
        0
    }
}

/// Mean rounded to one decimal place.
pub fn average_one_decimal(values: &[u32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u64 = values.iter().map(|v| *v as u64).sum();
    let avg = sum as f64 / values.len() as f64;
    (avg * 10.0).round() / 10.0
}
