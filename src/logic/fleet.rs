use super::risk::RiskComposer;
use crate::models::{RiskDetail, Tree, WeatherSnapshot};
use std::collections::HashMap;

/// Explanations for the latest fleet pass, keyed by tree id.
///
/// Kept beside the tree collection rather than inside it so nothing derived
/// for display ever reaches storage. Trees outside the applicability gate
/// have no entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RiskDetails {
    by_id: HashMap<String, RiskDetail>,
}

impl RiskDetails {
    pub fn get(&self, tree_id: &str) -> Option<&RiskDetail> {
        self.by_id.get(tree_id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    fn record(&mut self, tree_id: &str, detail: RiskDetail) {
        self.by_id.insert(tree_id.to_string(), detail);
    }
}

/// Recompute every tree in collection order.
///
/// Each tree is read, scored and written back before the next one is touched.
/// Gated trees are not skipped here; the composer zeroes them.
pub fn update_all_risks(
    composer: &RiskComposer,
    trees: &mut [Tree],
    weather: &WeatherSnapshot,
) -> RiskDetails {
    let weather = weather.pinned();
    let mut details = RiskDetails::default();

    for tree in trees.iter_mut() {
        if let Some(detail) = composer.apply(tree, &weather) {
            details.record(&tree.id, detail);
        }
    }

    tracing::debug!(
        "Recomputed fall risk for {} trees ({} scored) using {} model, {}",
        trees.len(),
        details.len(),
        composer.model().id(),
        weather
    );

    details
}
