use crate::config::Config;
use crate::datasources::OpenWeatherMapClient;
use crate::models::WeatherSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeatherSource {
    OpenWeatherMap,
    Config,
    Default,
}

impl WeatherSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherSource::OpenWeatherMap => "OpenWeatherMap",
            WeatherSource::Config => "Configured snapshot",
            WeatherSource::Default => "Default (calm)",
        }
    }
}

impl std::fmt::Display for WeatherSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedWeather {
    pub snapshot: WeatherSnapshot,
    pub source: WeatherSource,
}

/// Picks today's weather snapshot: live forecast, then the configured
/// snapshot, then the calm default. Provider failures are logged, never fatal.
pub struct WeatherSyncService {
    fallback: Option<WeatherSnapshot>,
    openweathermap_client: Option<OpenWeatherMapClient>,
}

impl WeatherSyncService {
    pub fn new(config: &Config) -> Self {
        let openweathermap_client = config
            .openweathermap
            .as_ref()
            .filter(|c| c.enabled && !c.api_key.is_empty())
            .map(|c| {
                tracing::info!("OpenWeatherMap client configured for weather snapshot");
                OpenWeatherMapClient::new(c.clone())
            });

        if openweathermap_client.is_none() {
            tracing::info!("OpenWeatherMap not configured - using static weather snapshot");
        }

        Self {
            fallback: config.weather.clone(),
            openweathermap_client,
        }
    }

    pub fn has_provider(&self) -> bool {
        self.openweathermap_client.is_some()
    }

    pub async fn resolve(&self) -> ResolvedWeather {
        let mut resolved = None;

        if let Some(ref client) = self.openweathermap_client {
            match client.fetch_snapshot().await {
                Ok(snapshot) => {
                    tracing::debug!("Weather snapshot updated: {}", snapshot);
                    resolved = Some(ResolvedWeather {
                        snapshot,
                        source: WeatherSource::OpenWeatherMap,
                    });
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch weather snapshot: {}", e);
                }
            }
        }

        resolved.unwrap_or_else(|| self.offline())
    }

    /// Snapshot available without touching the network.
    pub fn offline(&self) -> ResolvedWeather {
        match self.fallback {
            Some(ref snapshot) => ResolvedWeather {
                snapshot: snapshot.clone(),
                source: WeatherSource::Config,
            },
            None => ResolvedWeather {
                snapshot: WeatherSnapshot::default(),
                source: WeatherSource::Default,
            },
        }
    }

    pub async fn check_connection(&self) -> Option<bool> {
        match self.openweathermap_client {
            Some(ref client) => Some(client.test_connection().await.unwrap_or(false)),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OpenWeatherMapConfig;

    #[tokio::test]
    async fn falls_back_to_default_without_config() {
        let service = WeatherSyncService::new(&Config::default());
        assert!(!service.has_provider());
        let resolved = service.resolve().await;
        assert_eq!(resolved.source, WeatherSource::Default);
        assert_eq!(resolved.snapshot, WeatherSnapshot::default());
        assert_eq!(resolved, service.offline());
    }

    #[tokio::test]
    async fn uses_configured_snapshot() {
        let config = Config {
            weather: Some(WeatherSnapshot::new(14.0, 80.0, 0.0, Some(8))),
            ..Config::default()
        };
        let service = WeatherSyncService::new(&config);
        let resolved = service.resolve().await;
        assert_eq!(resolved.source, WeatherSource::Config);
        assert_eq!(resolved.snapshot.wind_max, 14.0);
        assert_eq!(service.check_connection().await, None);
    }

    #[test]
    fn disabled_provider_is_ignored() {
        let config = Config {
            openweathermap: Some(OpenWeatherMapConfig {
                api_key: "key".into(),
                latitude: 37.0,
                longitude: 127.0,
                enabled: false,
            }),
            ..Config::default()
        };
        assert!(!WeatherSyncService::new(&config).has_provider());
    }
}
