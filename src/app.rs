use crate::config::{Config, RiskConfig};
use crate::error::{LsmsError, Result};
use crate::logic::explain::explain;
use crate::logic::species::DeciduousClassifier;
use crate::logic::summary::{level_counts, zone_summary, LevelCounts, ZoneRisk};
use crate::logic::{
    rank_top_risk, update_all_risks, Explanation, RankedTree, RiskComposer, RiskDetails,
    RiskModelKind,
};
use crate::models::{RiskResult, Tree, WeatherSnapshot};
use crate::store::TreeStore;

/// Owns the tree fleet and everything derived from it.
///
/// Every mutation recomputes the affected risk fields before returning, so
/// readers never observe stale or half-written scores.
pub struct App {
    pub config: Config,
    store: TreeStore,
    trees: Vec<Tree>,
    weather: WeatherSnapshot,
    composer: RiskComposer,
    details: RiskDetails,
    top_n: usize,
}

impl App {
    pub fn new(config: Config, store: TreeStore) -> Result<Self> {
        let trees = store.load()?;
        Ok(Self::with_trees(config, store, trees))
    }

    pub fn with_trees(config: Config, store: TreeStore, trees: Vec<Tree>) -> Self {
        let composer = Self::composer_for(&config.risk, None);
        let weather = config.weather.clone().unwrap_or_default();
        let top_n = config.risk.top_n.max(1);

        let mut app = Self {
            config,
            store,
            trees,
            weather,
            composer,
            details: RiskDetails::default(),
            top_n,
        };
        app.recompute();
        app
    }

    pub fn composer_for(risk: &RiskConfig, model_override: Option<RiskModelKind>) -> RiskComposer {
        let kind = model_override.unwrap_or(risk.model);
        let classifier =
            DeciduousClassifier::new().with_keywords(risk.evergreen_keywords.iter().cloned());
        RiskComposer::with_model(kind.build()).with_classifier(classifier)
    }

    pub fn set_model(&mut self, kind: RiskModelKind) {
        self.composer = Self::composer_for(&self.config.risk, Some(kind));
        self.recompute();
    }

    pub fn set_top_n(&mut self, n: usize) {
        self.top_n = n.max(1);
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    pub fn trees(&self) -> &[Tree] {
        &self.trees
    }

    pub fn weather(&self) -> &WeatherSnapshot {
        &self.weather
    }

    pub fn details(&self) -> &RiskDetails {
        &self.details
    }

    pub fn composer(&self) -> &RiskComposer {
        &self.composer
    }

    pub fn find_tree(&self, id: &str) -> Option<&Tree> {
        self.trees.iter().find(|t| t.id == id)
    }

    pub fn recompute(&mut self) {
        self.details = update_all_risks(&self.composer, &mut self.trees, &self.weather);
    }

    pub fn set_weather(&mut self, weather: WeatherSnapshot) {
        self.weather = weather;
        self.recompute();
    }

    /// Insert or replace a tree by id.
    pub fn upsert_tree(&mut self, tree: Tree) {
        match self.trees.iter_mut().find(|t| t.id == tree.id) {
            Some(existing) => *existing = tree,
            None => self.trees.push(tree),
        }
        self.recompute();
    }

    pub fn remove_tree(&mut self, id: &str) -> Result<Tree> {
        let idx = self
            .trees
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| LsmsError::NotFound(format!("tree {}", id)))?;
        let removed = self.trees.remove(idx);
        self.recompute();
        Ok(removed)
    }

    pub fn top_alerts(&self) -> Vec<RankedTree<'_>> {
        rank_top_risk(&self.trees, &self.details, self.top_n)
    }

    pub fn explain(&self, id: &str) -> Result<Explanation> {
        let tree = self
            .find_tree(id)
            .ok_or_else(|| LsmsError::NotFound(format!("tree {}", id)))?;
        let detail = self.details.get(id).ok_or_else(|| {
            LsmsError::InvalidData(format!(
                "tree {} is not scored for fall risk (canopy trees of 5m or more only)",
                id
            ))
        })?;
        Ok(explain(tree, detail, self.composer.model()))
    }

    /// Score one tree under a hypothetical snapshot without touching the fleet.
    pub fn test_tree(
        &self,
        id: &str,
        weather: &WeatherSnapshot,
    ) -> Result<(RiskResult, Option<Explanation>)> {
        let tree = self
            .find_tree(id)
            .ok_or_else(|| LsmsError::NotFound(format!("tree {}", id)))?;
        let result = self.composer.compose(tree, &weather.pinned());
        let explanation = result
            .detail
            .as_ref()
            .map(|d| explain(tree, d, self.composer.model()));
        Ok((result, explanation))
    }

    pub fn zone_summary(&self) -> Vec<ZoneRisk> {
        zone_summary(&self.trees)
    }

    pub fn level_counts(&self) -> LevelCounts {
        level_counts(&self.trees)
    }

    pub fn store(&self) -> &TreeStore {
        &self.store
    }

    pub fn save(&self) -> Result<usize> {
        self.store.save(&self.trees)
    }
}
