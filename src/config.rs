use crate::error::{LsmsError, Result};
use crate::logic::ranking::DEFAULT_TOP_N;
use crate::logic::risk::RiskModelKind;
use crate::models::WeatherSnapshot;
use dialoguer::{Input, Password, Select};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub trees: TreesConfig,
    /// Static snapshot used when no live provider is configured or reachable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openweathermap: Option<OpenWeatherMapConfig>,
    #[serde(default)]
    pub risk: RiskConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TreesConfig {
    /// Inventory file; defaults to `<data dir>/trees.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RiskConfig {
    #[serde(default)]
    pub model: RiskModelKind,
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Added to the built-in evergreen species keywords, which always apply
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub evergreen_keywords: Vec<String>,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            model: RiskModelKind::default(),
            top_n: DEFAULT_TOP_N,
            evergreen_keywords: Vec::new(),
        }
    }
}

#[derive(Clone, Deserialize, Serialize)]
pub struct OpenWeatherMapConfig {
    pub api_key: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl std::fmt::Debug for OpenWeatherMapConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherMapConfig")
            .field("api_key", &"[REDACTED]")
            .field("latitude", &self.latitude)
            .field("longitude", &self.longitude)
            .field("enabled", &self.enabled)
            .finish()
    }
}

/// Yangjae HQ, the default monitored site
pub const DEFAULT_LATITUDE: f64 = 37.4643;
pub const DEFAULT_LONGITUDE: f64 = 127.0428;

impl Config {
    pub fn load(config_override: Option<PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => p,
            None => Self::find_config_path()?,
        };

        if !config_path.exists() {
            return Err(LsmsError::Config(format!(
                "Config file not found at {:?}. Run `lsms init` to set up.",
                config_path
            )));
        }

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| LsmsError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_yaml(&config_str)
    }

    /// Parse YAML after `${VAR}` substitution.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content);
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| LsmsError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("lsms").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/lsms/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| LsmsError::Config("Cannot determine config directory".into()))?
            .join("lsms");
        Ok(config_dir.join("config.yaml"))
    }

    pub fn validate(&self) -> Result<()> {
        if self.risk.top_n == 0 {
            return Err(LsmsError::Config("risk.top_n must be at least 1".into()));
        }
        if let Some(month) = self.weather.as_ref().and_then(|w| w.month) {
            if !(1..=12).contains(&month) {
                return Err(LsmsError::Config(format!(
                    "weather.month must be 1-12, got {}",
                    month
                )));
            }
        }
        if let Some(owm) = self.openweathermap.as_ref().filter(|o| o.enabled) {
            if owm.api_key.trim().is_empty() {
                return Err(LsmsError::Config(
                    "openweathermap.api_key is empty (set enabled: false to skip)".into(),
                ));
            }
            if !(-90.0..=90.0).contains(&owm.latitude) || !(-180.0..=180.0).contains(&owm.longitude)
            {
                return Err(LsmsError::Config(format!(
                    "openweathermap coordinates out of range: {}, {}",
                    owm.latitude, owm.longitude
                )));
            }
        }
        Ok(())
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the loaded Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        println!();
        println!("Let's set up LSMS tree risk monitoring!");
        println!();

        println!("Tree inventory");
        let default_trees = Self::data_dir(None)?.join("trees.json");
        let trees_path: String = Input::new()
            .with_prompt("  Inventory file (JSON)")
            .default(default_trees.display().to_string())
            .interact_text()
            .map_err(|e| LsmsError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Risk model");
        let models = [RiskModelKind::Additive, RiskModelKind::Multiplicative];
        let model_idx = Select::new()
            .with_prompt("  Scoring model")
            .items(&["additive (structural + weather)", "multiplicative (structural × factor)"])
            .default(0)
            .interact()
            .map_err(|e| LsmsError::Config(format!("Input error: {}", e)))?;

        let top_n: usize = Input::new()
            .with_prompt("  Alert board size")
            .default(DEFAULT_TOP_N)
            .interact_text()
            .map_err(|e| LsmsError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("OpenWeatherMap (leave API key blank to skip)");
        let owm_api_key: String = Password::new()
            .with_prompt("  API key")
            .allow_empty_password(true)
            .interact()
            .map_err(|e| LsmsError::Config(format!("Input error: {}", e)))?;

        let openweathermap = if owm_api_key.is_empty() {
            None
        } else {
            let latitude: f64 = Input::new()
                .with_prompt("  Latitude")
                .default(DEFAULT_LATITUDE)
                .interact_text()
                .map_err(|e| LsmsError::Config(format!("Input error: {}", e)))?;

            let longitude: f64 = Input::new()
                .with_prompt("  Longitude")
                .default(DEFAULT_LONGITUDE)
                .interact_text()
                .map_err(|e| LsmsError::Config(format!("Input error: {}", e)))?;

            Some(OpenWeatherMapConfig {
                api_key: owm_api_key,
                latitude,
                longitude,
                enabled: true,
            })
        };

        println!();

        let config = Config {
            trees: TreesConfig {
                path: Some(PathBuf::from(trees_path)),
            },
            weather: Some(WeatherSnapshot::default()),
            openweathermap,
            risk: RiskConfig {
                model: models.get(model_idx).copied().unwrap_or_default(),
                top_n: top_n.max(1),
                evergreen_keywords: Vec::new(),
            },
        };

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| LsmsError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# LSMS Configuration\n\
             # Generated by `lsms init`\n\
             # Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> String {
        let Ok(re) = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}") else {
            return content.to_string();
        };

        let mut result = content.to_string();
        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        result
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("LSMS_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| LsmsError::Config("Cannot determine data directory".into()))?
            .join("lsms");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    /// CLI override, then the configured path, then the data directory default.
    pub fn trees_path(&self, trees_override: Option<&PathBuf>) -> Result<PathBuf> {
        if let Some(p) = trees_override {
            return Ok(p.clone());
        }
        if let Some(ref p) = self.trees.path {
            return Ok(p.clone());
        }
        Ok(Self::data_dir(None)?.join("trees.json"))
    }
}
