//! Run settings.
//!
//! Values are layered: built-in defaults, then the TOML config file, then
//! command-line flags (see [`SettingsArgs`]).

mod args;
pub mod duration;

pub use args::SettingsArgs;

use anyhow::Context;
use clap::ValueEnum;
use loadtest_generator::{IdPolicy, Schema, TimeWindow};
use loadtest_populate_opensearch::{ClientConfig, IndexSettings, PopulateOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "server.toml";

/// Field format used when none is configured.
pub const DEFAULT_FORMAT: &str = "name:str,age:int,last_updated:ts";

/// What a run does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Action {
    /// Generate (or load) documents and upload them
    GenerateData,
    /// Scroll through every document in the time window
    QueryAll,
    /// Run the query in `json_path`
    CustomQuery,
    /// Delete the index
    DeleteIndex,
    /// generate_data, query_all, then delete_index
    #[default]
    All,
}

/// One step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Generate,
    QueryAll,
    CustomQuery,
    DeleteIndex,
}

impl Action {
    /// Phases this action runs, in order.
    pub fn phases(self) -> &'static [Phase] {
        match self {
            Self::GenerateData => &[Phase::Generate],
            Self::QueryAll => &[Phase::QueryAll],
            Self::CustomQuery => &[Phase::CustomQuery],
            Self::DeleteIndex => &[Phase::DeleteIndex],
            Self::All => &[Phase::Generate, Phase::QueryAll, Phase::DeleteIndex],
        }
    }
}

/// Fully merged settings for one run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub action: Action,
    pub url: String,
    pub index_name: String,
    pub batch_size: usize,
    pub number_of_shards: u32,
    pub number_of_replicas: u32,
    #[serde(deserialize_with = "duration::deserialize_duration")]
    pub http_upload_timeout: Duration,
    pub count: u64,
    pub force_init_index: bool,
    pub set_refresh: bool,
    pub out_file: Option<PathBuf>,
    pub id_type: Option<String>,
    pub dict_file: Option<PathBuf>,
    pub data_file: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub client_cert: Option<PathBuf>,
    pub client_key: Option<PathBuf>,
    pub validate_cert: bool,
    pub random_seed: Option<u64>,
    pub start_time: Option<String>,
    pub finish_time: Option<String>,
    pub format: String,
    #[serde(deserialize_with = "duration::deserialize_duration")]
    pub phase_delay: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            action: Action::All,
            url: "http://localhost:9200".to_string(),
            index_name: "test".to_string(),
            batch_size: 1000,
            number_of_shards: 1,
            number_of_replicas: 1,
            http_upload_timeout: Duration::from_secs(10),
            count: 100_000,
            force_init_index: false,
            set_refresh: false,
            out_file: None,
            id_type: None,
            dict_file: None,
            data_file: None,
            json_path: None,
            username: None,
            password: None,
            client_cert: None,
            client_key: None,
            validate_cert: true,
            random_seed: None,
            start_time: None,
            finish_time: None,
            format: DEFAULT_FORMAT.to_string(),
            phase_delay: Duration::from_secs(1),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text; missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    /// Load the config file.
    ///
    /// An explicitly given path must exist. Without one, [`DEFAULT_CONFIG_FILE`]
    /// is read if present, otherwise defaults are used.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let (path, explicit) = match path {
            Some(path) => (path, true),
            None => (Path::new(DEFAULT_CONFIG_FILE), false),
        };

        if !explicit && !path.exists() {
            tracing::info!(
                "Config file {} not found, using defaults and command-line options",
                path.display()
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let settings = Self::from_toml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(settings)
    }

    /// Check values that would otherwise fail mid-run.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.batch_size == 0 {
            anyhow::bail!("batch_size must be at least 1");
        }
        if self.client_cert.is_some() != self.client_key.is_some() {
            anyhow::bail!("client_cert and client_key must be set together");
        }
        self.schema()?;
        self.id_policy()?;
        self.time_window()?;
        Ok(())
    }

    /// Compiled field format.
    pub fn schema(&self) -> anyhow::Result<Schema> {
        Schema::parse(&self.format).with_context(|| format!("Invalid format '{}'", self.format))
    }

    pub fn id_policy(&self) -> anyhow::Result<IdPolicy> {
        match &self.id_type {
            Some(id_type) => Ok(id_type.parse::<IdPolicy>()?),
            None => Ok(IdPolicy::None),
        }
    }

    pub fn time_window(&self) -> anyhow::Result<TimeWindow> {
        TimeWindow::from_options(self.start_time.as_deref(), self.finish_time.as_deref())
            .context("Invalid time window")
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            url: self.url.clone(),
            index_name: self.index_name.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            client_cert: self.client_cert.clone(),
            client_key: self.client_key.clone(),
            validate_cert: self.validate_cert,
            upload_timeout: self.http_upload_timeout,
            ..ClientConfig::default()
        }
    }

    pub fn populate_options(&self) -> PopulateOptions {
        PopulateOptions {
            batch_size: self.batch_size,
            force_init_index: self.force_init_index,
            set_refresh: self.set_refresh,
            index_settings: IndexSettings {
                number_of_shards: self.number_of_shards,
                number_of_replicas: self.number_of_replicas,
            },
            out_file: self.out_file.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.action, Action::All);
        assert_eq!(settings.batch_size, 1000);
        assert_eq!(settings.count, 100_000);
        assert_eq!(settings.http_upload_timeout, Duration::from_secs(10));
        assert!(settings.validate_cert);
        settings.validate().unwrap();
    }

    #[test]
    fn test_from_toml_partial() {
        let settings = Settings::from_toml_str(
            r#"
            action = "generate_data"
            url = "https://search.internal:9200"
            batch_size = 500
            http_upload_timeout = 30
            phase_delay = "0s"
            id_type = "int"
            format = "msg:words,@timestamp:tstxt"
            "#,
        )
        .unwrap();

        assert_eq!(settings.action, Action::GenerateData);
        assert_eq!(settings.url, "https://search.internal:9200");
        assert_eq!(settings.batch_size, 500);
        assert_eq!(settings.http_upload_timeout, Duration::from_secs(30));
        assert_eq!(settings.phase_delay, Duration::ZERO);
        assert_eq!(settings.id_policy().unwrap(), IdPolicy::Sequential);
        assert_eq!(settings.index_name, "test");
        assert_eq!(settings.schema().unwrap().fields().len(), 2);
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Settings::from_toml_str("batchsize = 5").is_err());
    }

    #[test]
    fn test_invalid_action_rejected() {
        assert!(Settings::from_toml_str(r#"action = "period_breakdown""#).is_err());
    }

    #[test]
    fn test_validate_batch_size() {
        let settings = Settings {
            batch_size: 0,
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_format() {
        let settings = Settings {
            format: "a:int:9:1".to_string(),
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(format!("{err:#}").contains("a:int:9:1"));
    }

    #[test]
    fn test_validate_cert_pair() {
        let settings = Settings {
            client_cert: Some(PathBuf::from("cert.pem")),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_time_window_from_settings() {
        let settings = Settings {
            start_time: Some("2024-03-01 00:00:00".to_string()),
            finish_time: Some("2024-03-02 00:00:00".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            settings.time_window().unwrap(),
            TimeWindow::Fixed { .. }
        ));

        let start_only = Settings {
            start_time: Some("2024-03-01 00:00:00".to_string()),
            ..Default::default()
        };
        assert!(start_only.validate().is_err());
    }

    #[test]
    fn test_load_explicit_missing_file() {
        assert!(Settings::load(Some(Path::new("/nonexistent/server.toml"))).is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "index_name = \"logs\"\ncount = 42").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.index_name, "logs");
        assert_eq!(settings.count, 42);
    }

    #[test]
    fn test_action_phases() {
        assert_eq!(
            Action::All.phases(),
            &[Phase::Generate, Phase::QueryAll, Phase::DeleteIndex]
        );
        assert_eq!(Action::CustomQuery.phases(), &[Phase::CustomQuery]);
    }

    #[test]
    fn test_client_config_mapping() {
        let settings = Settings {
            username: Some("admin".to_string()),
            validate_cert: false,
            http_upload_timeout: Duration::from_secs(60),
            ..Default::default()
        };
        let config = settings.client_config();
        assert_eq!(config.username.as_deref(), Some("admin"));
        assert!(!config.validate_cert);
        assert_eq!(config.upload_timeout, Duration::from_secs(60));
        assert_eq!(config.index_name, "test");
    }
}
