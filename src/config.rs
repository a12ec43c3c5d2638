// Runtime configuration, loaded via the 'config' crate with 'dotenv' support.

use anyhow::Result;
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Base URL of the catalog API, including the /api prefix.
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Settings {
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok(); // Load .env file if present

        let builder = Config::builder()
            .set_default("api_base_url", "http://127.0.0.1:8000/api")?
            .set_default("request_timeout_secs", 30i64)?
            // Load from a configuration file (e.g., config.toml)
            .add_source(File::with_name("config").required(false))
            // Load from environment variables (e.g., CATALOG_API_BASE_URL)
            .add_source(Environment::with_prefix("CATALOG"));

        let settings = builder.build()?.try_deserialize()?;
        Ok(settings)
    }
}
