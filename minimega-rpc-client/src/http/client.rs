//! HTTP client implementation

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use minimega_base::{ProgramAccount, Pubkey, Signature};

use crate::client::ClientConfig;
use crate::connection::ChainConnection;
use crate::error::{ClientError, HttpError, Result, SerializationError};
use crate::types::{
    AccountInfoConfig, AccountInfoResponse, KeyedAccount, LatestBlockhash,
    LatestBlockhashResponse, SendTransactionConfig, SignatureStatus, SignatureStatusesResponse,
};

/// Preflight simulation failed
const SEND_TRANSACTION_PREFLIGHT_FAILURE: i64 = -32002;
/// Signature verification failed
const TRANSACTION_SIGNATURE_VERIFICATION_FAILURE: i64 = -32003;

/// JSON-RPC request structure
#[derive(Debug, Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    id: u64,
    method: String,
    params: Option<Value>,
}

/// JSON-RPC response structure
#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    result: Option<T>,
    error: Option<JsonRpcError>,
}

/// JSON-RPC error structure
#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
    data: Option<Value>,
}

/// HTTP client for RPC requests
#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
    config: ClientConfig,
    request_id: Arc<AtomicU64>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(config: ClientConfig) -> Result<Self> {
        if !matches!(config.http_endpoint.scheme(), "http" | "https") {
            return Err(HttpError::InvalidEndpoint(config.http_endpoint.to_string()).into());
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .zstd(true)
            .pool_max_idle_per_host(config.max_connections)
            .build()
            .map_err(HttpError::Transport)?;

        Ok(Self {
            client,
            config,
            request_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Get the next request ID
    fn next_request_id(&self) -> u64 {
        self.request_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Send a JSON-RPC request
    ///
    /// A `null` result is returned as `None`; callers decide whether that
    /// means "absent" or is an error.
    async fn send_request<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<Option<T>> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            id: self.next_request_id(),
            method: method.to_string(),
            params,
        };
        tracing::trace!("request: {:?}", request);

        let mut request_builder = self
            .client
            .post(self.config.http_endpoint.as_str())
            .json(&request);

        // Add authorization header if auth_token is configured
        if let Some(ref token) = self.config.auth_token {
            request_builder = request_builder.bearer_auth(token);
        }

        let response = request_builder.send().await.map_err(HttpError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(HttpError::RequestFailed {
                status: status.as_u16(),
                message: if body.is_empty() {
                    format!("HTTP {} error", status)
                } else {
                    body
                },
            }
            .into());
        }

        let body = response.text().await.map_err(HttpError::ResponseBody)?;

        tracing::trace!("response: {:?}", body);

        let rpc_response: JsonRpcResponse<T> =
            serde_json::from_str(&body).map_err(|e| SerializationError::JsonDeserialize {
                source: e,
                data: body.clone(),
            })?;

        if let Some(error) = rpc_response.error {
            tracing::debug!(method, code = error.code, message = %error.message, "RPC error");
            return Err(HttpError::from_rpc_error(error.code, error.message, error.data).into());
        }

        Ok(rpc_response.result)
    }

    /// Like `send_request` but a missing result is an error
    async fn send_request_required<T: for<'de> Deserialize<'de>>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T> {
        self.send_request(method, params).await?.ok_or_else(|| {
            ClientError::Http(HttpError::RpcError {
                code: -32603,
                message: "Internal error: missing result".to_string(),
                data: None,
            })
        })
    }

    /// Get account information
    pub async fn get_account_info(
        &self,
        pubkey: &Pubkey,
        config: Option<AccountInfoConfig>,
    ) -> Result<AccountInfoResponse> {
        let config = config.unwrap_or_else(|| AccountInfoConfig::base64(self.config.commitment));
        let params = json!([pubkey.to_base58(), config]);
        self.send_request_required("getAccountInfo", Some(params))
            .await
    }

    /// Get every account owned by a program
    pub async fn get_program_accounts_raw(
        &self,
        program_id: &Pubkey,
        config: Option<AccountInfoConfig>,
    ) -> Result<Vec<KeyedAccount>> {
        let config = config.unwrap_or_else(|| AccountInfoConfig::base64(self.config.commitment));
        let params = json!([program_id.to_base58(), config]);
        self.send_request_required("getProgramAccounts", Some(params))
            .await
    }

    /// Get a recent blockhash
    pub async fn latest_blockhash(&self) -> Result<LatestBlockhash> {
        let params = json!([{ "commitment": self.config.commitment }]);
        let response: LatestBlockhashResponse = self
            .send_request_required("getLatestBlockhash", Some(params))
            .await?;
        Ok(response.value)
    }

    /// Send a signed transaction
    ///
    /// Preflight and signature verification failures come back as
    /// [`ClientError::TransactionRejected`] with the node's message intact.
    pub async fn send_transaction(
        &self,
        transaction: &[u8],
        config: Option<SendTransactionConfig>,
    ) -> Result<Signature> {
        let config = config.unwrap_or_else(|| SendTransactionConfig::new(self.config.commitment));
        let encoded = general_purpose::STANDARD.encode(transaction);
        let params = json!([encoded, config]);

        let signature: String = match self
            .send_request_required("sendTransaction", Some(params))
            .await
        {
            Ok(signature) => signature,
            Err(ClientError::Http(HttpError::RpcError {
                code,
                message,
                data,
            })) if code == SEND_TRANSACTION_PREFLIGHT_FAILURE
                || code == TRANSACTION_SIGNATURE_VERIFICATION_FAILURE =>
            {
                let reason = match data.as_ref().and_then(|d| d.get("err")) {
                    Some(err) if !err.is_null() => format!("{message}: {err}"),
                    _ => message,
                };
                return Err(ClientError::TransactionRejected {
                    signature: None,
                    reason,
                });
            }
            Err(e) => return Err(e),
        };

        Ok(Signature::new(signature)?)
    }

    /// Get statuses of several signatures
    pub async fn get_signature_statuses(
        &self,
        signatures: &[Signature],
    ) -> Result<Vec<Option<SignatureStatus>>> {
        let signatures: Vec<&str> = signatures.iter().map(Signature::as_str).collect();
        let params = json!([signatures, { "searchTransactionHistory": false }]);
        let response: SignatureStatusesResponse = self
            .send_request_required("getSignatureStatuses", Some(params))
            .await?;
        Ok(response.value)
    }

    /// Get the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl ChainConnection for HttpClient {
    async fn get_account_data(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self.get_account_info(address, None).await?;
        match response.value {
            Some(account) => Ok(Some(account.decode_data()?)),
            None => Ok(None),
        }
    }

    async fn get_program_accounts(&self, program_id: &Pubkey) -> Result<Vec<ProgramAccount>> {
        let accounts = self.get_program_accounts_raw(program_id, None).await?;
        tracing::debug!(program = %program_id, count = accounts.len(), "fetched program accounts");
        accounts
            .into_iter()
            .map(|keyed| keyed.into_program_account().map_err(ClientError::from))
            .collect()
    }

    async fn get_latest_blockhash(&self) -> Result<LatestBlockhash> {
        self.latest_blockhash().await
    }

    async fn send_raw_transaction(&self, transaction: &[u8]) -> Result<Signature> {
        self.send_transaction(transaction, None).await
    }

    async fn get_signature_status(&self, signature: &Signature) -> Result<Option<SignatureStatus>> {
        let statuses = self
            .get_signature_statuses(std::slice::from_ref(signature))
            .await?;
        Ok(statuses.into_iter().next().flatten())
    }
}
