//! Command-line overrides for [`Settings`].

use super::duration::parse_duration;
use super::{Action, Settings};
use clap::Args;
use std::path::PathBuf;
use std::time::Duration;

/// Every setting as an optional flag. Flags that are given win over the
/// config file.
#[derive(Args, Clone, Debug, Default)]
pub struct SettingsArgs {
    /// Action to perform
    #[arg(long, value_enum)]
    pub action: Option<Action>,

    /// Base URL of the OpenSearch node
    #[arg(long, env = "SEARCH_LOADTEST_URL")]
    pub url: Option<String>,

    /// Index to write to and query
    #[arg(long, env = "SEARCH_LOADTEST_INDEX")]
    pub index_name: Option<String>,

    /// Documents per bulk request
    #[arg(long)]
    pub batch_size: Option<usize>,

    /// Number of shards for a newly created index
    #[arg(long)]
    pub number_of_shards: Option<u32>,

    /// Number of replicas for a newly created index
    #[arg(long)]
    pub number_of_replicas: Option<u32>,

    /// Timeout for one bulk upload (e.g. "10", "30s", "2m")
    #[arg(long, value_parser = parse_duration)]
    pub http_upload_timeout: Option<Duration>,

    /// Number of documents to generate
    #[arg(long)]
    pub count: Option<u64>,

    /// Delete and re-create the index before uploading
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub force_init_index: Option<bool>,

    /// Disable index refresh during the upload
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub set_refresh: Option<bool>,

    /// Also write generated documents to this file as JSON lines
    #[arg(long)]
    pub out_file: Option<PathBuf>,

    /// Add an _id to each document: "int" or "uuid4"
    #[arg(long)]
    pub id_type: Option<String>,

    /// Word list for dict fields, one word per line
    #[arg(long)]
    pub dict_file: Option<PathBuf>,

    /// Upload documents from this CSV or JSON file instead of generating them
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Query file for the custom_query action
    #[arg(long)]
    pub json_path: Option<PathBuf>,

    /// Basic auth username
    #[arg(long, env = "SEARCH_LOADTEST_USERNAME")]
    pub username: Option<String>,

    /// Basic auth password
    #[arg(long, env = "SEARCH_LOADTEST_PASSWORD")]
    pub password: Option<String>,

    /// Client certificate (PEM)
    #[arg(long, env = "SEARCH_LOADTEST_CLIENT_CERT")]
    pub client_cert: Option<PathBuf>,

    /// Client private key (PEM)
    #[arg(long, env = "SEARCH_LOADTEST_CLIENT_KEY")]
    pub client_key: Option<PathBuf>,

    /// Validate the server certificate; use false for self-signed certificates
    #[arg(long)]
    pub validate_cert: Option<bool>,

    /// Seed for reproducible documents
    #[arg(long)]
    pub random_seed: Option<u64>,

    /// Start of the time window ("%Y-%m-%d %H:%M:%S")
    #[arg(long)]
    pub start_time: Option<String>,

    /// End of the time window ("%Y-%m-%d %H:%M:%S")
    #[arg(long)]
    pub finish_time: Option<String>,

    /// Document format, e.g. "name:str:3:10,age:int:18:99,seen:ts"
    #[arg(long)]
    pub format: Option<String>,

    /// Pause before each phase (e.g. "1s", "0")
    #[arg(long, value_parser = parse_duration)]
    pub phase_delay: Option<Duration>,
}

macro_rules! override_fields {
    ($args:expr, $settings:expr, [$($field:ident),* $(,)?]) => {
        $(
            if let Some(value) = $args.$field {
                $settings.$field = value;
            }
        )*
    };
}

macro_rules! override_optional_fields {
    ($args:expr, $settings:expr, [$($field:ident),* $(,)?]) => {
        $(
            if $args.$field.is_some() {
                $settings.$field = $args.$field;
            }
        )*
    };
}

impl SettingsArgs {
    /// Apply every flag that was given on top of `settings`.
    pub fn apply(self, settings: &mut Settings) {
        override_fields!(
            self,
            settings,
            [
                action,
                url,
                index_name,
                batch_size,
                number_of_shards,
                number_of_replicas,
                http_upload_timeout,
                count,
                force_init_index,
                set_refresh,
                validate_cert,
                format,
                phase_delay,
            ]
        );
        override_optional_fields!(
            self,
            settings,
            [
                out_file,
                id_type,
                dict_file,
                data_file,
                json_path,
                username,
                password,
                client_cert,
                client_key,
                random_seed,
                start_time,
                finish_time,
            ]
        );
    }
}
