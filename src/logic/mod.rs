pub mod calculations;
pub mod explain;
pub mod fleet;
pub mod ranking;
pub mod risk;
pub mod species;
pub mod summary;
pub mod weather_sync;

pub use explain::Explanation;
pub use fleet::{update_all_risks, RiskDetails};
pub use ranking::{priority_alerts, rank_top_risk, RankedTree};
pub use risk::{RiskComposer, RiskModelKind};
pub use weather_sync::{ResolvedWeather, WeatherSyncService};
