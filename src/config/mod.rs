pub mod cli;

use crate::core::ConfigProvider;
use crate::utils::error::{DumpError, Result};
use crate::utils::validation::{
    validate_non_empty_list, validate_required_field, validate_url, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;

pub const API_KEY_ENV: &str = "GOOGLE_API_KEY";
pub const DETAILS_ENDPOINT_ENV: &str = "PLACES_DETAILS_ENDPOINT";
pub const DEFAULT_DETAILS_ENDPOINT: &str = "https://maps.googleapis.com/maps/api/place/details/json";
pub const DEFAULT_OUTPUT_FILE: &str = "output.json";

/// Every command-line argument is a place id; there are no flags.
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "place-dump")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct CliConfig {
    #[arg(value_name = "PLACE_ID", num_args = 0.., allow_hyphen_values = true, trailing_var_arg = true)]
    pub place_ids: Vec<String>,

    #[arg(skip)]
    pub api_key: Option<String>,

    #[arg(skip = DEFAULT_DETAILS_ENDPOINT.to_string())]
    pub api_endpoint: String,

    #[arg(skip = DEFAULT_OUTPUT_FILE.to_string())]
    pub output_path: String,
}

impl CliConfig {
    /// Build the config from process arguments and an environment lookup.
    pub fn load<I, T, F>(args: I, env: F) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
        F: Fn(&str) -> Option<String>,
    {
        let mut config =
            Self::try_parse_from(args).map_err(|e| DumpError::InvalidConfigValueError {
                field: "arguments".to_string(),
                value: String::new(),
                reason: e.kind().to_string(),
            })?;

        config.api_key = env(API_KEY_ENV);
        if let Some(endpoint) = env(DETAILS_ENDPOINT_ENV) {
            config.api_endpoint = endpoint;
        }

        Ok(config)
    }

    pub fn from_env() -> Result<Self> {
        Self::load(std::env::args_os(), |name| std::env::var(name).ok())
    }
}

impl Validate for CliConfig {
    // Order matters: a missing key is reported even when ids are missing too.
    fn validate(&self) -> Result<()> {
        validate_required_field("api_key", &self.api_key)?;
        validate_non_empty_list("place_ids", &self.place_ids)?;
        validate_url("api_endpoint", &self.api_endpoint)?;
        Ok(())
    }
}

impl ConfigProvider for CliConfig {
    fn api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or_default()
    }

    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }
}
