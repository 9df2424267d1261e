use super::fleet::RiskDetails;
use crate::models::{RiskDetail, RiskLevel, Tree};

pub const DEFAULT_TOP_N: usize = 5;

/// One row of the alert board.
#[derive(Debug, Clone, Copy)]
pub struct RankedTree<'a> {
    /// 1-based position
    pub rank: usize,
    pub tree: &'a Tree,
    pub detail: Option<&'a RiskDetail>,
}

impl RankedTree<'_> {
    /// HIGH-level rows are flagged as priority alerts.
    pub fn is_priority(&self) -> bool {
        self.tree.risk_level == RiskLevel::High
    }
}

/// The `n` highest `risk_instant` trees, ties kept in collection order.
///
/// Returns up to `n` rows whatever their level, so the board is never empty
/// just because no tree is HIGH.
pub fn rank_top_risk<'a>(
    trees: &'a [Tree],
    details: &'a RiskDetails,
    n: usize,
) -> Vec<RankedTree<'a>> {
    let mut order: Vec<&Tree> = trees.iter().collect();
    // sort_by is stable
    order.sort_by(|a, b| b.risk_instant.cmp(&a.risk_instant));

    order
        .into_iter()
        .take(n)
        .enumerate()
        .map(|(i, tree)| RankedTree {
            rank: i + 1,
            tree,
            detail: details.get(&tree.id),
        })
        .collect()
}

pub fn priority_alerts<'a>(ranked: &[RankedTree<'a>]) -> Vec<RankedTree<'a>> {
    ranked.iter().filter(|r| r.is_priority()).copied().collect()
}
