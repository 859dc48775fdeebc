//! Integration tests for minimega-rpc-client
//!
//! These tests validate the client end to end:
//! - JSON-RPC requests against a mock node
//! - Typed marketplace reads and scans
//! - Submission, confirmation and error categories

use assert_matches::assert_matches;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

use minimega_base::accounts::{AccountRecord, CollectionsMarketplace};
use minimega_base::{Collection, InstructionBuilder, ItemType, ProgramAccount, pda};
use minimega_rpc_client::error::HttpError;
use minimega_rpc_client::{
    ChainConnection, Client, ClientError, CommitmentLevel, LatestBlockhash, MarketplaceClient,
    ProgramLayout, Pubkey, Signature, SignatureStatus, SigningError, SubmitConfig,
    TransactionRequest, WalletSigner, submit,
};

fn heroes() -> Collection {
    Collection {
        admin: Pubkey::new([1u8; 32]),
        name: "Heroes".to_string(),
        symbol: "HRO".to_string(),
        uri: "https://x/y.json".to_string(),
        royalty: 500,
        mint: Pubkey::new([2u8; 32]),
        is_active: true,
        bump: 254,
    }
}

fn account_json(data: &[u8]) -> serde_json::Value {
    json!({
        "data": [general_purpose::STANDARD.encode(data), "base64"],
        "executable": false,
        "lamports": 2_000_000,
        "owner": "12LJUQx5mfVfqACGgEac65Xe6PMGnYm5rdaRRcU4HE7V",
        "rentEpoch": 18446744073709551615u64,
        "space": data.len()
    })
}

fn rpc_result(result: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "result": result
    }))
}

async fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .http_endpoint(Url::parse(&server.uri()).unwrap())
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_fetch_collection_by_name() {
    let server = MockServer::start().await;
    let (address, _) =
        pda::collection_address(&ProgramLayout::Collections.default_program_id(), "Heroes")
            .unwrap();

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "getAccountInfo",
            "params": [address.to_base58(), {"encoding": "base64", "commitment": "confirmed"}]
        })))
        .respond_with(rpc_result(json!({
            "context": {"slot": 100},
            "value": account_json(&heroes().to_bytes().unwrap())
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let marketplace = client.marketplace(ProgramLayout::Collections);
    let found = marketplace.fetch_collection("Heroes").await.unwrap().unwrap();
    assert_eq!(found.address, address);
    assert_eq!(found.account, heroes());
    assert_eq!(found.account.royalty_percent(), 5.0);
}

#[tokio::test]
async fn test_missing_marketplace_is_hard_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "getAccountInfo"})))
        .respond_with(rpc_result(json!({"context": {"slot": 1}, "value": null})))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let marketplace = client.marketplace(ProgramLayout::Collections);
    assert_matches!(
        marketplace.fetch_marketplace().await,
        Err(ClientError::AccountNotFound(_))
    );
    assert_matches!(marketplace.fetch_presale_config().await, Ok(None));
}

#[tokio::test]
async fn test_malformed_marketplace_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "getAccountInfo"})))
        .respond_with(rpc_result(json!({
            "context": {"slot": 1},
            "value": account_json(&[0u8; 51])
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let result = client
        .marketplace(ProgramLayout::Collections)
        .fetch_marketplace()
        .await;
    assert_matches!(result, Err(ClientError::Decode(_)));
}

#[tokio::test]
async fn test_scan_program_accounts() {
    let server = MockServer::start().await;
    let program = ProgramLayout::Collections.default_program_id();
    let sword = ItemType {
        collection: Pubkey::new([9u8; 32]),
        name: "Sword".to_string(),
        uri: "https://x/sword.json".to_string(),
        price: 1_000_000_000,
        max_supply: 0,
        current_supply: 0,
        bump: 250,
    };

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "getProgramAccounts",
            "params": [program.to_base58()]
        })))
        .respond_with(rpc_result(json!([
            {"pubkey": Pubkey::new([3u8; 32]).to_base58(), "account": account_json(&heroes().to_bytes().unwrap())},
            {"pubkey": Pubkey::new([4u8; 32]).to_base58(), "account": account_json(&[0xAB; 12])},
            {"pubkey": Pubkey::new([5u8; 32]).to_base58(), "account": account_json(&sword.to_bytes().unwrap())}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let report = client
        .marketplace(ProgramLayout::Collections)
        .scan()
        .await
        .unwrap();
    assert_eq!(report.classified_count(), 2);
    assert_eq!(report.skipped_count(), 1);
    assert_eq!(report.skipped[0].address, Pubkey::new([4u8; 32]));
    assert_eq!(report.item_types[0].account.price, 1_000_000_000);
}

#[tokio::test]
async fn test_preflight_failure_is_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"method": "sendTransaction"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {
                "code": -32002,
                "message": "Transaction simulation failed: Error processing Instruction 0: custom program error: 0x1771",
                "data": {"err": {"InstructionError": [0, {"Custom": 6001}]}, "logs": []}
            }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = client
        .http()
        .send_transaction(&[1, 2, 3], None)
        .await
        .unwrap_err();
    assert!(error.is_rejection());
    assert_matches!(error, ClientError::TransactionRejected { signature: None, reason } => {
        assert!(reason.contains("custom program error: 0x1771"));
        assert!(reason.contains("6001"));
    });
}

#[tokio::test]
async fn test_other_rpc_errors_keep_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32602, "message": "Invalid params"}
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = client.http().latest_blockhash().await.unwrap_err();
    assert_eq!(error.rpc_code(), Some(-32602));
    assert!(!error.is_rejection());
}

#[tokio::test]
async fn test_http_status_is_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let error = client
        .http()
        .get_account_data(&Pubkey::new([1u8; 32]))
        .await
        .unwrap_err();
    assert!(error.is_transport());
    assert_matches!(
        error,
        ClientError::Http(HttpError::RequestFailed { status: 503, message }) if message == "overloaded"
    );
}

#[tokio::test]
async fn test_signature_status_over_http() {
    let server = MockServer::start().await;
    let signature = Signature::from_bytes(&[7u8; 64]);
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "method": "getSignatureStatuses",
            "params": [[signature.as_str()]]
        })))
        .respond_with(rpc_result(json!({
            "context": {"slot": 90},
            "value": [{"slot": 88, "confirmations": null, "err": null, "confirmationStatus": "finalized"}]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let status = client
        .http()
        .get_signature_status(&signature)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(status.slot, 88);
    assert!(status.satisfies(CommitmentLevel::Finalized));
}

/// In-memory chain with scripted signature statuses
#[derive(Default)]
struct FakeChain {
    accounts: HashMap<Pubkey, Vec<u8>>,
    statuses: Mutex<VecDeque<Option<SignatureStatus>>>,
    sent: Mutex<Vec<Vec<u8>>>,
}

impl FakeChain {
    fn with_statuses(statuses: Vec<Option<SignatureStatus>>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            ..Self::default()
        }
    }

    fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ChainConnection for FakeChain {
    async fn get_account_data(
        &self,
        address: &Pubkey,
    ) -> minimega_rpc_client::Result<Option<Vec<u8>>> {
        Ok(self.accounts.get(address).cloned())
    }

    async fn get_program_accounts(
        &self,
        _program_id: &Pubkey,
    ) -> minimega_rpc_client::Result<Vec<ProgramAccount>> {
        Ok(self
            .accounts
            .iter()
            .map(|(address, data)| ProgramAccount::new(*address, data.clone()))
            .collect())
    }

    async fn get_latest_blockhash(&self) -> minimega_rpc_client::Result<LatestBlockhash> {
        Ok(LatestBlockhash {
            blockhash: "EkSnNWid2cvwEVnVx9aBqawnmiCNiDgp3gUdkDPTKN1N".to_string(),
            last_valid_block_height: 100,
        })
    }

    async fn send_raw_transaction(&self, transaction: &[u8]) -> minimega_rpc_client::Result<Signature> {
        self.sent.lock().unwrap().push(transaction.to_vec());
        Ok(Signature::from_bytes(&[7u8; 64]))
    }

    async fn get_signature_status(
        &self,
        _signature: &Signature,
    ) -> minimega_rpc_client::Result<Option<SignatureStatus>> {
        Ok(self.statuses.lock().unwrap().pop_front().flatten())
    }
}

/// Signer that serializes the request as JSON instead of a real transaction
struct FakeSigner {
    key: Pubkey,
    refuse: bool,
}

#[async_trait]
impl WalletSigner for FakeSigner {
    fn pubkey(&self) -> Pubkey {
        self.key
    }

    async fn sign_transaction(&self, request: &TransactionRequest) -> Result<Vec<u8>, SigningError> {
        if self.refuse {
            return Err(SigningError("user rejected the request".to_string()));
        }
        Ok(serde_json::to_vec(request).unwrap())
    }
}

fn status(level: CommitmentLevel, err: Option<serde_json::Value>) -> Option<SignatureStatus> {
    Some(SignatureStatus {
        slot: 10,
        confirmations: Some(1),
        err,
        confirmation_status: Some(level),
    })
}

fn fast_config() -> SubmitConfig {
    SubmitConfig {
        commitment: CommitmentLevel::Confirmed,
        confirm_timeout: Duration::from_millis(300),
        poll_interval: Duration::from_millis(10),
    }
}

fn donate_instruction(donor: Pubkey) -> minimega_base::Instruction {
    InstructionBuilder::for_layout(ProgramLayout::Presale)
        .build_donate(donor, Pubkey::new([6u8; 32]), 250_000_000)
        .unwrap()
}

#[tokio::test]
async fn test_submit_waits_for_commitment() {
    let chain = FakeChain::with_statuses(vec![
        None,
        status(CommitmentLevel::Processed, None),
        status(CommitmentLevel::Confirmed, None),
    ]);
    let signer = FakeSigner {
        key: Pubkey::new([5u8; 32]),
        refuse: false,
    };

    let signature = submit(
        &chain,
        &signer,
        vec![donate_instruction(signer.key)],
        &fast_config(),
    )
    .await
    .unwrap();
    assert_eq!(signature, Signature::from_bytes(&[7u8; 64]));
    assert_eq!(chain.sent_count(), 1);
    assert!(chain.statuses.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_reports_on_chain_failure() {
    let chain = FakeChain::with_statuses(vec![status(
        CommitmentLevel::Confirmed,
        Some(json!({"InstructionError": [0, {"Custom": 6000}]})),
    )]);
    let signer = FakeSigner {
        key: Pubkey::new([5u8; 32]),
        refuse: false,
    };

    let error = submit(
        &chain,
        &signer,
        vec![donate_instruction(signer.key)],
        &fast_config(),
    )
    .await
    .unwrap_err();
    assert_matches!(error, ClientError::TransactionRejected { signature: Some(_), reason } => {
        assert!(reason.contains("6000"));
    });
}

#[tokio::test]
async fn test_submit_times_out_without_retrying() {
    let chain = FakeChain::default();
    let signer = FakeSigner {
        key: Pubkey::new([5u8; 32]),
        refuse: false,
    };

    let error = submit(
        &chain,
        &signer,
        vec![donate_instruction(signer.key)],
        &fast_config(),
    )
    .await
    .unwrap_err();
    assert_matches!(error, ClientError::Timeout { after, .. } => {
        assert_eq!(after, Duration::from_millis(300));
    });
    assert_eq!(chain.sent_count(), 1);
}

#[tokio::test]
async fn test_signer_refusal_sends_nothing() {
    let chain = FakeChain::default();
    let signer = FakeSigner {
        key: Pubkey::new([5u8; 32]),
        refuse: true,
    };

    let error = submit(
        &chain,
        &signer,
        vec![donate_instruction(signer.key)],
        &fast_config(),
    )
    .await
    .unwrap_err();
    assert_matches!(error, ClientError::Signing(_));
    assert_eq!(chain.sent_count(), 0);
}

#[tokio::test]
async fn test_marketplace_client_over_fake_chain() {
    let program = ProgramLayout::Collections.default_program_id();
    let (marketplace_address, _) = pda::marketplace_address(&program).unwrap();
    let record = CollectionsMarketplace {
        admin: Pubkey::new([3u8; 32]),
        fee_basis_points: 250,
        total_collections: 1,
        bump: 252,
    };

    let mut chain = FakeChain::default();
    chain
        .accounts
        .insert(marketplace_address, record.to_bytes().unwrap());

    let client = MarketplaceClient::new(chain, ProgramLayout::Collections);
    let marketplace = client.fetch_marketplace().await.unwrap();
    assert_eq!(marketplace.address, marketplace_address);
    assert_eq!(marketplace.account.fee_basis_points(), 250);
    assert_eq!(marketplace.account.total_collections(), Some(1));

    let ix = client
        .instructions()
        .build_initialize_marketplace(Pubkey::new([3u8; 32]), 250)
        .unwrap();
    assert_eq!(ix.accounts[0].pubkey, marketplace_address);
    assert_eq!(client.fetch_metadata(&Pubkey::new([2u8; 32])).await.unwrap(), None);
}
