use crate::config::OpenWeatherMapConfig;
use crate::error::{LsmsError, Result};
use crate::models::WeatherSnapshot;
use chrono::Datelike;
use serde::Deserialize;

const API_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// 3-hour forecast steps covering the next 24 hours
const WIND_WINDOW_STEPS: usize = 8;
/// 3-hour forecast steps covering the next 72 hours
const PRECIP_WINDOW_STEPS: usize = 24;

pub struct OpenWeatherMapClient {
    client: reqwest::Client,
    config: OpenWeatherMapConfig,
}

// OpenWeatherMap API response structures
#[derive(Debug, Deserialize)]
struct OwmForecastResponse {
    list: Vec<OwmForecastItem>,
}

#[derive(Debug, Deserialize)]
struct OwmForecastItem {
    #[allow(dead_code)]
    dt: i64,
    wind: OwmWind,
    #[serde(default)]
    rain: Option<OwmPrecipitation>,
    #[serde(default)]
    snow: Option<OwmPrecipitation>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
    #[serde(default)]
    gust: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmPrecipitation {
    #[serde(rename = "3h", default)]
    three_hour: f64,
}

impl OpenWeatherMapClient {
    pub fn new(config: OpenWeatherMapConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Fetch the 5-day/3-hour forecast and condense it into a snapshot
    pub async fn fetch_snapshot(&self) -> Result<WeatherSnapshot> {
        let url = format!(
            "{}/forecast?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.config.latitude, self.config.longitude, self.config.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                LsmsError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LsmsError::DataSourceUnavailable(format!(
                "OpenWeatherMap returned {}: {}",
                status, body
            )));
        }

        let owm_response: OwmForecastResponse = response.json().await.map_err(|e| {
            LsmsError::DataSourceUnavailable(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })?;

        let month = chrono::Local::now().month();
        Ok(summarize(&owm_response.list, month))
    }

    /// Test connection to OpenWeatherMap API
    pub async fn test_connection(&self) -> Result<bool> {
        let url = format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            API_BASE_URL, self.config.latitude, self.config.longitude, self.config.api_key
        );

        let response =
            self.client.get(&url).send().await.map_err(|e| {
                LsmsError::DataSourceUnavailable(format!("OpenWeatherMap: {}", e))
            })?;

        Ok(response.status().is_success())
    }
}

/// Peak gust over the next day; rain and snow accumulated over three days.
///
/// OpenWeatherMap reports snow as mm per 3h; it is converted to cm.
fn summarize(items: &[OwmForecastItem], month: u32) -> WeatherSnapshot {
    let wind_max = items
        .iter()
        .take(WIND_WINDOW_STEPS)
        .map(|i| i.wind.gust.unwrap_or(i.wind.speed).max(i.wind.speed))
        .fold(0.0_f64, f64::max);

    let window = items.iter().take(PRECIP_WINDOW_STEPS);
    let (rain_mm, snow_mm) = window.fold((0.0, 0.0), |(rain, snow), item| {
        (
            rain + item.rain.as_ref().map(|r| r.three_hour).unwrap_or(0.0),
            snow + item.snow.as_ref().map(|s| s.three_hour).unwrap_or(0.0),
        )
    });

    WeatherSnapshot::new(wind_max, rain_mm, snow_mm / 10.0, Some(month))
}
