use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use alphadesk::api::HttpApiConfig;
use alphadesk::curve::Viewport;
use alphadesk::poll::PollConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub api: ApiConfig,
    pub poll: PollSettings,
    pub chart: ChartConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_ms: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_ms: 30000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollSettings {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval_ms: 2000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 320.0,
            padding: 40.0,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            api: ApiConfig::default(),
            poll: PollSettings::default(),
            chart: ChartConfig::default(),
        }
    }
}

impl Config {
    /// Resolve configuration, preferring an explicit path over discovery.
    ///
    /// Without an explicit path the first readable candidate wins, then the
    /// built-in defaults. A discovered file that fails to read or parse is
    /// skipped with a warning; a failing explicit path is an error.
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load {}", path.display()));
        }

        for candidate in Self::candidate_paths() {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_file(&candidate) {
                Ok(config) => return Ok(config),
                Err(e) => log::warn!("Skipping config {}: {}", candidate.display(), e),
            }
        }

        log::info!("No config file found, starting from defaults");
        Ok(Self::default())
    }

    /// Discovery order: the user config directory, then the working directory
    fn candidate_paths() -> Vec<PathBuf> {
        let name = env!("CARGO_PKG_NAME");
        let file_name = format!("{}.yml", name);
        let mut candidates = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(name).join(&file_name));
        }
        candidates.push(PathBuf::from(file_name));
        candidates
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            fs::read_to_string(&path).context(format!("Failed to read {}", path.as_ref().display()))?;
        let config: Self =
            serde_yaml::from_str(&content).context(format!("Failed to parse {}", path.as_ref().display()))?;
        log::info!("Config loaded from {}", path.as_ref().display());
        Ok(config)
    }

    /// Reject values the downstream components cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.api.base_url.trim().is_empty() {
            eyre::bail!("api.base_url must not be empty");
        }
        if self.poll.max_attempts == 0 {
            eyre::bail!("poll.max_attempts must be at least 1");
        }
        if self.poll.interval_ms == 0 {
            eyre::bail!("poll.interval_ms must be at least 1");
        }
        if self.chart.width <= 2.0 * self.chart.padding || self.chart.height <= 2.0 * self.chart.padding {
            eyre::bail!("chart dimensions must leave room inside the padding");
        }
        Ok(())
    }

    pub fn api_config(&self) -> HttpApiConfig {
        HttpApiConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_millis(self.api.timeout_ms),
        }
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            max_attempts: self.poll.max_attempts,
            interval: Duration::from_millis(self.poll.interval_ms),
        }
    }

    pub fn viewport(&self) -> Viewport {
        Viewport {
            width: self.chart.width,
            height: self.chart.height,
            padding: self.chart.padding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.log_level.as_deref(), Some("info"));
        assert_eq!(config.api.base_url, "http://127.0.0.1:8000");
        assert_eq!(config.poll.max_attempts, 30);
        assert_eq!(config.poll.interval_ms, 2000);
        assert_eq!(config.chart.width, 640.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_yaml_keeps_defaults_elsewhere() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api:\n  base_url: http://desk.internal:9000\npoll:\n  interval_ms: 500").unwrap();
        let path = file.path().to_path_buf();

        let config = Config::load(Some(&path)).unwrap();

        assert_eq!(config.api.base_url, "http://desk.internal:9000");
        assert_eq!(config.poll.interval_ms, 500);
        assert_eq!(config.poll.max_attempts, 30);
        assert_eq!(config.api.timeout_ms, 30000);
    }

    #[test]
    fn test_load_rejects_invalid_yaml() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "api: [not, a, mapping").unwrap();
        let path = file.path().to_path_buf();

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let path = PathBuf::from("/nonexistent/alphadesk.yml");

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_candidate_paths_fall_back_to_working_directory() {
        let candidates = Config::candidate_paths();

        assert!(!candidates.is_empty());
        assert_eq!(candidates.last(), Some(&PathBuf::from("alphadesk.yml")));
        for candidate in &candidates {
            assert!(candidate.ends_with("alphadesk.yml"));
        }
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.poll.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.chart.width = 50.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bridges_convert_units() {
        let config = Config::default();

        assert_eq!(config.poll_config().interval, Duration::from_millis(2000));
        assert_eq!(config.api_config().timeout, Duration::from_secs(30));
        assert_eq!(config.viewport().padding, 40.0);
    }
}
