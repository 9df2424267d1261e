use super::{
    compute_structural_risk, compute_weather_risk, AdditiveModel, RiskModel, SiteConditions,
};
use crate::logic::species::DeciduousClassifier;
use crate::models::{RiskDetail, RiskResult, Tree, WeatherSnapshot};

/// Turns a tree and a weather snapshot into a scored, levelled result.
pub struct RiskComposer {
    model: Box<dyn RiskModel>,
    classifier: DeciduousClassifier,
}

impl RiskComposer {
    pub fn new() -> Self {
        Self::with_model(Box::new(AdditiveModel))
    }

    pub fn with_model(model: Box<dyn RiskModel>) -> Self {
        Self {
            model,
            classifier: DeciduousClassifier::new(),
        }
    }

    pub fn with_classifier(mut self, classifier: DeciduousClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn model(&self) -> &dyn RiskModel {
        self.model.as_ref()
    }

    pub fn compose(&self, tree: &Tree, weather: &WeatherSnapshot) -> RiskResult {
        if !tree.is_risk_candidate() {
            return RiskResult::not_applicable();
        }

        let structural = compute_structural_risk(tree);
        let deciduous = self.classifier.is_deciduous(tree);
        let weather_risk = compute_weather_risk(
            weather,
            deciduous,
            weather.resolved_month(),
            SiteConditions::of(tree),
        );

        let base = structural.score;
        let weather_score = weather_risk.score;
        let instant = self.model.combine(base, weather_score);
        let level = self.model.thresholds().classify(instant);

        RiskResult {
            base,
            weather: weather_score,
            instant,
            level,
            detail: Some(RiskDetail {
                model: self.model.id(),
                structural,
                weather: weather_risk,
                instant,
                level,
            }),
        }
    }

    /// Compose and write the derived fields onto `tree`.
    pub fn apply(&self, tree: &mut Tree, weather: &WeatherSnapshot) -> Option<RiskDetail> {
        let result = self.compose(tree, weather);
        match result.detail {
            Some(_) => tree.apply_risk(&result),
            None => tree.reset_risk(),
        }
        result.detail
    }
}

impl Default for RiskComposer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::risk::MultiplicativeModel;
    use crate::models::{RiskLevel, RootCondition, SoilStability, TreeType};
    use proptest::prelude::*;

    fn example_tree() -> Tree {
        let mut tree = Tree::new("YA-001", "소나무", TreeType::Canopy);
        tree.height = Some(7.2);
        tree.dbh = Some(28.0);
        tree.crown_width = Some(5.4);
        tree.slope = Some(8.0);
        tree.tilt = Some(4.0);
        tree.soil_stability = Some(SoilStability::Normal);
        tree.root_condition = RootCondition::None;
        tree
    }

    fn calm_september() -> WeatherSnapshot {
        WeatherSnapshot::new(6.0, 0.0, 0.0, Some(9))
    }

    #[test]
    fn end_to_end_example() {
        let composer = RiskComposer::new();
        let mut tree = example_tree();
        let detail = composer.apply(&mut tree, &calm_september()).unwrap();

        // height 10 + crown 10 + slope 10 + soil 10
        assert_eq!(tree.risk_base, 40);
        assert_eq!(tree.risk_weather, 0);
        assert_eq!(tree.risk_instant, 40);
        assert_eq!(tree.risk_level, RiskLevel::Mid);
        assert_eq!(detail.structural.items.len(), 4);
        assert!(!detail.weather.deciduous);
        assert_eq!(detail.model, "additive");
    }

    #[test]
    fn example_without_crown_lands_on_mid_boundary() {
        let composer = RiskComposer::new();
        let mut tree = example_tree();
        tree.crown_width = Some(3.9);
        composer.apply(&mut tree, &calm_september());
        assert_eq!(tree.risk_instant, 30);
        assert_eq!(tree.risk_level, RiskLevel::Mid);
    }

    #[test]
    fn gated_trees_reset_to_low() {
        let composer = RiskComposer::new();
        let storm = WeatherSnapshot::new(30.0, 200.0, 40.0, Some(7));

        let mut shrub = example_tree();
        shrub.tree_type = TreeType::Shrub;
        shrub.risk_base = 55;
        shrub.risk_instant = 80;
        shrub.risk_level = RiskLevel::High;
        assert!(composer.apply(&mut shrub, &storm).is_none());
        assert_eq!(shrub.risk_base, 0);
        assert_eq!(shrub.risk_weather, 0);
        assert_eq!(shrub.risk_instant, 0);
        assert_eq!(shrub.risk_level, RiskLevel::Low);

        let mut short = example_tree();
        short.height = Some(4.5);
        short.risk_weather = 30;
        assert!(composer.apply(&mut short, &storm).is_none());
        assert_eq!(short.risk_weather, 0);
        assert_eq!(short.risk_level, RiskLevel::Low);
    }

    #[test]
    fn storm_pushes_example_to_high() {
        let composer = RiskComposer::new();
        let mut tree = example_tree();
        // evergreen wind 20 * 1.3 = 26
        composer.apply(&mut tree, &WeatherSnapshot::new(16.0, 0.0, 0.0, Some(9)));
        assert_eq!(tree.risk_weather, 26);
        assert_eq!(tree.risk_instant, 66);
        assert_eq!(tree.risk_level, RiskLevel::High);
    }

    #[test]
    fn rain_uses_site_conditions() {
        let composer = RiskComposer::new();
        let mut tree = example_tree();
        tree.soil_stability = Some(SoilStability::Soft);
        tree.slope = Some(18.0);
        let detail = composer
            .apply(&mut tree, &WeatherSnapshot::new(0.0, 120.0, 0.0, Some(9)))
            .unwrap();
        assert_eq!(detail.weather.rain.factor, 2.0);
        assert_eq!(detail.weather.rain.score, 40);
    }

    #[test]
    fn deciduous_flag_drives_seasonal_factor() {
        let composer = RiskComposer::new();
        let mut tree = example_tree();
        tree.species = "느티나무".into();
        let windy = |month| WeatherSnapshot::new(12.0, 0.0, 0.0, Some(month));

        let jan = composer.compose(&tree, &windy(1));
        let jul = composer.compose(&tree, &windy(7));
        assert!(jan.weather < jul.weather);

        tree.deciduous = Some(false);
        let jan_evergreen = composer.compose(&tree, &windy(1));
        assert!(jan_evergreen.weather > jan.weather);
    }

    #[test]
    fn swapping_model_changes_combination_only() {
        let composer = RiskComposer::with_model(Box::new(MultiplicativeModel));
        let tree = example_tree();
        let result = composer.compose(&tree, &WeatherSnapshot::new(16.0, 0.0, 0.0, Some(9)));
        assert_eq!(result.base, 40);
        assert_eq!(result.weather, 26);
        // 40 * 1.26 = 50.4
        assert_eq!(result.instant, 50);
        assert_eq!(result.level, RiskLevel::Mid);
        assert_eq!(result.detail.unwrap().model, "multiplicative");
    }

    #[test]
    fn custom_classifier_is_used() {
        let composer = RiskComposer::new()
            .with_classifier(DeciduousClassifier::new().with_keywords(["느티"]));
        let mut tree = example_tree();
        tree.species = "느티나무".into();
        let detail = composer.compose(&tree, &calm_september()).detail.unwrap();
        assert!(!detail.weather.deciduous);
    }

    fn arb_soil() -> impl Strategy<Value = Option<SoilStability>> {
        prop_oneof![
            Just(None),
            Just(Some(SoilStability::Firm)),
            Just(Some(SoilStability::Normal)),
            Just(Some(SoilStability::Soft)),
        ]
    }

    fn arb_root() -> impl Strategy<Value = RootCondition> {
        prop_oneof![
            Just(RootCondition::None),
            Just(RootCondition::Slight),
            Just(RootCondition::Severe),
        ]
    }

    prop_compose! {
        fn arb_tree()(
            canopy in any::<bool>(),
            height in 0.0f64..40.0,
            dbh in 0.0f64..150.0,
            crown in 0.0f64..20.0,
            slope in 0.0f64..60.0,
            tilt in 0.0f64..45.0,
            soil in arb_soil(),
            root in arb_root(),
        ) -> Tree {
            let tree_type = if canopy { TreeType::Canopy } else { TreeType::Shrub };
            let mut tree = Tree::new("P", "느티나무", tree_type);
            tree.height = Some(height);
            tree.dbh = Some(dbh);
            tree.crown_width = Some(crown);
            tree.slope = Some(slope);
            tree.tilt = Some(tilt);
            tree.soil_stability = soil;
            tree.root_condition = root;
            tree
        }
    }

    prop_compose! {
        fn arb_weather()(
            wind in 0.0f64..60.0,
            rain in 0.0f64..400.0,
            snow in 0.0f64..100.0,
            month in 1u32..=12,
        ) -> WeatherSnapshot {
            WeatherSnapshot::new(wind, rain, snow, Some(month))
        }
    }

    proptest! {
        #[test]
        fn scores_stay_in_range(tree in arb_tree(), weather in arb_weather()) {
            let result = RiskComposer::new().compose(&tree, &weather);
            prop_assert!(result.base <= 100);
            prop_assert!(result.weather <= 100);
            prop_assert!(result.instant <= 100);
        }

        #[test]
        fn compose_is_idempotent(tree in arb_tree(), weather in arb_weather()) {
            let composer = RiskComposer::new();
            let mut once = tree.clone();
            let first = composer.apply(&mut once, &weather);
            let mut twice = once.clone();
            let second = composer.apply(&mut twice, &weather);
            prop_assert_eq!(&once, &twice);
            prop_assert_eq!(first, second);
        }

        #[test]
        fn gated_trees_always_zero(tree in arb_tree(), weather in arb_weather()) {
            prop_assume!(!tree.is_risk_candidate());
            let result = RiskComposer::new().compose(&tree, &weather);
            prop_assert_eq!(result, RiskResult::not_applicable());
        }

        #[test]
        fn taller_never_lowers_base(tree in arb_tree(), extra in 0.0f64..10.0) {
            let composer = RiskComposer::new();
            let mut taller = tree.clone();
            taller.height = Some(tree.height_m() + extra);
            let weather = WeatherSnapshot::new(0.0, 0.0, 0.0, Some(6));
            let a = composer.compose(&tree, &weather);
            let b = composer.compose(&taller, &weather);
            prop_assert!(a.base <= b.base);
        }
    }
}
