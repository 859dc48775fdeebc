//! Configuration management for the Minimega CLI

use minimega_base::programs::{MARKETPLACE_PROGRAM_ID, PRESALE_PROGRAM_ID};
use minimega_base::{ProgramLayout, Pubkey};
use minimega_rpc_client::client::DEFAULT_HTTP_ENDPOINT;
use minimega_rpc_client::{Client, CommitmentLevel};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::error::{CliError, ConfigError};

/// Configuration structure for the Minimega CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON-RPC endpoint (e.g. https://api.devnet.solana.com)
    pub rpc_url: String,

    /// Account schema of the target program: collections or presale
    pub layout: ProgramLayout,

    /// Program id used with the collections layout
    pub marketplace_program_id: String,

    /// Program id used with the presale layout
    pub presale_program_id: String,

    /// Commitment used for reads and confirmation
    pub commitment: CommitmentLevel,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Optional authorization token for HTTP requests
    pub auth_token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_HTTP_ENDPOINT.to_string(),
            layout: ProgramLayout::Collections,
            marketplace_program_id: MARKETPLACE_PROGRAM_ID.to_base58(),
            presale_program_id: PRESALE_PROGRAM_ID.to_base58(),
            commitment: CommitmentLevel::Confirmed,
            timeout_seconds: 30,
            auth_token: None,
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it on first use
    pub async fn load() -> Result<Self, CliError> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path).await?;
        }

        Self::load_from(&config_path).await
    }

    /// Load and validate the configuration at `path`
    pub async fn load_from(path: &Path) -> Result<Self, CliError> {
        let config_content = tokio::fs::read_to_string(path).await?;
        let config: Config =
            serde_yaml::from_str(&config_content).map_err(ConfigError::InvalidFormat)?;

        config.validate()?;

        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), CliError> {
        self.rpc_endpoint()?;
        Self::parse_program_id("marketplace_program_id", &self.marketplace_program_id)?;
        Self::parse_program_id("presale_program_id", &self.presale_program_id)?;
        Ok(())
    }

    /// Apply per-invocation flags on top of the file
    pub fn apply_overrides(
        &mut self,
        url: Option<String>,
        layout: Option<ProgramLayout>,
    ) -> Result<(), CliError> {
        if let Some(url) = url {
            self.rpc_url = url;
            self.rpc_endpoint()?;
        }
        if let Some(layout) = layout {
            self.layout = layout;
        }
        Ok(())
    }

    /// The RPC endpoint, checked to be http or https
    pub fn rpc_endpoint(&self) -> Result<Url, CliError> {
        let url = Url::parse(&self.rpc_url).map_err(|e| ConfigError::InvalidUrl(e.to_string()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidUrl(format!(
                "unsupported scheme '{}'; expected http or https",
                url.scheme()
            ))
            .into());
        }
        if url.host_str().is_none() {
            return Err(ConfigError::InvalidUrl("missing host in RPC endpoint".to_string()).into());
        }

        Ok(url)
    }

    /// Program id for the configured layout
    pub fn program_id(&self) -> Result<Pubkey, CliError> {
        match self.layout {
            ProgramLayout::Collections => {
                Self::parse_program_id("marketplace_program_id", &self.marketplace_program_id)
            }
            ProgramLayout::Presale => {
                Self::parse_program_id("presale_program_id", &self.presale_program_id)
            }
        }
    }

    fn parse_program_id(field: &'static str, value: &str) -> Result<Pubkey, CliError> {
        Pubkey::from_base58(value.trim()).map_err(|e| {
            ConfigError::InvalidPublicKey {
                field,
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Build an RPC client from this configuration
    pub fn client(&self) -> Result<Client, CliError> {
        Ok(Client::builder()
            .http_endpoint(self.rpc_endpoint()?)
            .timeout(Duration::from_secs(self.timeout_seconds))
            .auth_token(self.auth_token.clone())
            .commitment(self.commitment)
            .build()?)
    }

    /// Get the configuration file path
    pub fn get_config_path() -> Result<PathBuf, CliError> {
        Ok(Self::get_config_dir()?.join("config.yaml"))
    }

    /// Get the configuration directory path
    pub fn get_config_dir() -> Result<PathBuf, CliError> {
        let home_dir = dirs::home_dir().ok_or(ConfigError::NoHomeDirectory)?;

        Ok(home_dir.join(".minimega").join("cli"))
    }

    /// Write the default configuration to `config_path`
    pub async fn create_default_config(config_path: &Path) -> Result<(), CliError> {
        if let Some(config_dir) = config_path.parent() {
            if !config_dir.exists() {
                tokio::fs::create_dir_all(config_dir)
                    .await
                    .map_err(ConfigError::DirectoryCreation)?;
            }
        }

        let config_content = Self::generate_config_template(&Config::default())?;
        tokio::fs::write(config_path, config_content).await?;

        eprintln!(
            "Created default configuration at: {}",
            config_path.display()
        );

        Ok(())
    }

    /// Generate a configuration template with comments
    fn generate_config_template(config: &Config) -> Result<String, CliError> {
        let yaml_content = serde_yaml::to_string(config).map_err(ConfigError::InvalidFormat)?;

        Ok(format!(
            r#"# Minimega CLI Configuration File
# layout selects the account schema: collections or presale
# Program ids default to the public deployments of each layout

{}"#,
            yaml_content
        ))
    }
}
