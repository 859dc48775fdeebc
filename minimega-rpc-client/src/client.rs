//! Client configuration and construction

use std::time::Duration;
use url::Url;

use minimega_base::{ProgramLayout, Pubkey};

use crate::error::{ClientError, Result};
use crate::http::HttpClient;
use crate::marketplace::MarketplaceClient;
use crate::submit::SubmitConfig;
use crate::types::CommitmentLevel;

/// Public devnet endpoint used when none is configured
pub const DEFAULT_HTTP_ENDPOINT: &str = "https://api.devnet.solana.com";

/// Configuration for the RPC client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// HTTP endpoint for RPC calls
    pub http_endpoint: Url,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of idle connections kept per host
    pub max_connections: usize,
    /// Optional authorization token for HTTP requests
    pub auth_token: Option<String>,
    /// Commitment used for reads and required for confirmation
    pub commitment: CommitmentLevel,
    /// How long to wait for a submitted transaction to confirm
    pub confirm_timeout: Duration,
    /// Delay between signature status polls
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Defaults pointed at `http_endpoint`
    pub fn new(http_endpoint: Url) -> Self {
        Self {
            http_endpoint,
            timeout: Duration::from_secs(30),
            max_connections: 10,
            auth_token: None,
            commitment: CommitmentLevel::Confirmed,
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }

    /// Submission settings derived from this configuration
    pub fn submit_config(&self) -> SubmitConfig {
        SubmitConfig {
            commitment: self.commitment,
            confirm_timeout: self.confirm_timeout,
            poll_interval: self.poll_interval,
        }
    }
}

/// Builder for creating a configured client
#[derive(Debug, Default)]
pub struct ClientBuilder {
    http_endpoint: Option<Url>,
    timeout: Option<Duration>,
    max_connections: Option<usize>,
    auth_token: Option<String>,
    commitment: Option<CommitmentLevel>,
    confirm_timeout: Option<Duration>,
    poll_interval: Option<Duration>,
}

impl ClientBuilder {
    /// Create a new client builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP endpoint
    pub fn http_endpoint(mut self, url: Url) -> Self {
        self.http_endpoint = Some(url);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the maximum number of idle connections per host
    pub fn max_connections(mut self, max: usize) -> Self {
        self.max_connections = Some(max);
        self
    }

    /// Set authorization token for HTTP requests
    pub fn auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    /// Set the commitment level
    pub fn commitment(mut self, commitment: CommitmentLevel) -> Self {
        self.commitment = Some(commitment);
        self
    }

    /// Set how long to wait for confirmation
    pub fn confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = Some(timeout);
        self
    }

    /// Set the delay between status polls
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Build the client
    pub fn build(self) -> Result<Client> {
        let endpoint = match self.http_endpoint {
            Some(url) => url,
            None => Url::parse(DEFAULT_HTTP_ENDPOINT)
                .map_err(|e| ClientError::Configuration(e.to_string()))?,
        };
        let mut config = ClientConfig::new(endpoint);
        if let Some(timeout) = self.timeout {
            config.timeout = timeout;
        }
        if let Some(max) = self.max_connections {
            config.max_connections = max;
        }
        config.auth_token = self.auth_token;
        if let Some(commitment) = self.commitment {
            config.commitment = commitment;
        }
        if let Some(timeout) = self.confirm_timeout {
            config.confirm_timeout = timeout;
        }
        if let Some(interval) = self.poll_interval {
            config.poll_interval = interval;
        }
        Client::new(config)
    }
}

/// Entry point owning the HTTP connection
#[derive(Clone, Debug)]
pub struct Client {
    config: ClientConfig,
    http_client: HttpClient,
}

impl Client {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        tracing::info!(endpoint = %config.http_endpoint, "creating RPC client");
        let http_client = HttpClient::new(config.clone())?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Create a client builder
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the HTTP client
    pub fn http(&self) -> &HttpClient {
        &self.http_client
    }

    /// Get the client configuration
    pub fn get_config(&self) -> &ClientConfig {
        &self.config
    }

    /// Marketplace view over the default deployment of `layout`
    pub fn marketplace(&self, layout: ProgramLayout) -> MarketplaceClient<HttpClient> {
        MarketplaceClient::new(self.http_client.clone(), layout)
    }

    /// Marketplace view over a specific program deployment
    pub fn marketplace_at(
        &self,
        layout: ProgramLayout,
        program_id: Pubkey,
    ) -> MarketplaceClient<HttpClient> {
        MarketplaceClient::with_program_id(self.http_client.clone(), layout, program_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = Client::builder().build().unwrap();
        let config = client.get_config();
        assert_eq!(config.http_endpoint.as_str(), "https://api.devnet.solana.com/");
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.commitment, CommitmentLevel::Confirmed);
        assert_eq!(config.confirm_timeout, Duration::from_secs(60));
        assert_eq!(config.poll_interval, Duration::from_millis(500));
    }

    #[test]
    fn test_builder_overrides() {
        let client = Client::builder()
            .http_endpoint(Url::parse("http://localhost:8899").unwrap())
            .timeout(Duration::from_secs(5))
            .commitment(CommitmentLevel::Finalized)
            .confirm_timeout(Duration::from_secs(10))
            .poll_interval(Duration::from_millis(50))
            .auth_token(Some("token".to_string()))
            .build()
            .unwrap();
        let submit = client.get_config().submit_config();
        assert_eq!(submit.commitment, CommitmentLevel::Finalized);
        assert_eq!(submit.confirm_timeout, Duration::from_secs(10));
        assert_eq!(submit.poll_interval, Duration::from_millis(50));
        assert_eq!(client.get_config().auth_token.as_deref(), Some("token"));
    }
}
