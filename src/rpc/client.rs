//! JSON-RPC client for the account queries the dashboard needs.
//!
//! # Responsibilities
//! - Speak JSON-RPC 2.0 over HTTP POST to a single endpoint
//! - Query balances, signature pages and parsed transactions
//! - Map transport, status and RPC error objects into `RpcError`
//! - Apply the optional request deadline

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::time::timeout;

use crate::config::schema::{Commitment, RpcConfig};
use crate::rpc::types::{Address, ParsedTransaction, RpcError, RpcResult, SignatureInfo};

/// The RPC capability consumed by account sync.
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Balance of `address` in lamports.
    async fn get_balance(&self, address: &Address) -> RpcResult<u64>;

    /// One page of recent signatures for `address`, most recent first.
    async fn get_signatures_for_address(
        &self,
        address: &Address,
        limit: Option<usize>,
    ) -> RpcResult<Vec<SignatureInfo>>;

    /// Parsed detail of a transaction. `None` when the node does not know it.
    async fn get_parsed_transaction(&self, signature: &str) -> RpcResult<Option<ParsedTransaction>>;
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct WithContext<T> {
    value: T,
}

/// HTTP implementation of [`RpcClient`].
pub struct HttpRpcClient {
    http: reqwest::Client,
    endpoint: url::Url,
    commitment: Commitment,
    /// `None` means wait as long as the transport allows.
    deadline: Option<Duration>,
    next_id: AtomicU64,
}

impl HttpRpcClient {
    /// Create a client for the endpoint described by `config`.
    pub fn new(config: &RpcConfig) -> RpcResult<Self> {
        let endpoint: url::Url = config.endpoint().parse().map_err(|e| {
            RpcError::Transport(format!("Invalid RPC URL '{}': {}", config.endpoint(), e))
        })?;

        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let deadline = (config.timeout_secs > 0).then(|| Duration::from_secs(config.timeout_secs));

        tracing::debug!(
            endpoint = %endpoint,
            commitment = ?config.commitment,
            timeout_secs = config.timeout_secs,
            "RPC client initialized"
        );

        Ok(Self {
            http,
            endpoint,
            commitment: config.commitment,
            deadline,
            next_id: AtomicU64::new(1),
        })
    }

    /// The endpoint this client talks to.
    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }

    /// Issue one JSON-RPC call and decode its `result`.
    async fn call<T: DeserializeOwned>(&self, method: &str, params: Value) -> RpcResult<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": method,
            "params": params,
        });

        let exchange = self.exchange(&body);
        let text = match self.deadline {
            Some(deadline) => timeout(deadline, exchange)
                .await
                .map_err(|_| RpcError::Timeout(deadline.as_secs()))??,
            None => exchange.await?,
        };

        let response: RpcResponse = serde_json::from_str(&text)
            .map_err(|e| RpcError::Malformed(format!("{method}: {e}")))?;

        if let Some(error) = response.error {
            return Err(RpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        serde_json::from_value(response.result.unwrap_or(Value::Null))
            .map_err(|e| RpcError::Malformed(format!("{method}: {e}")))
    }

    async fn exchange(&self, body: &Value) -> RpcResult<String> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(body)
            .send()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RpcError::Status(status.as_u16()));
        }

        response
            .text()
            .await
            .map_err(|e| RpcError::Transport(e.to_string()))
    }
}

#[async_trait]
impl RpcClient for HttpRpcClient {
    async fn get_balance(&self, address: &Address) -> RpcResult<u64> {
        let params = json!([address.as_str(), { "commitment": self.commitment.as_str() }]);
        let balance: WithContext<u64> = self.call("getBalance", params).await?;
        Ok(balance.value)
    }

    async fn get_signatures_for_address(
        &self,
        address: &Address,
        limit: Option<usize>,
    ) -> RpcResult<Vec<SignatureInfo>> {
        let mut options = json!({ "commitment": self.commitment.as_str() });
        if let Some(limit) = limit {
            options["limit"] = json!(limit);
        }
        self.call("getSignaturesForAddress", json!([address.as_str(), options]))
            .await
    }

    async fn get_parsed_transaction(&self, signature: &str) -> RpcResult<Option<ParsedTransaction>> {
        let params = json!([
            signature,
            {
                "encoding": "jsonParsed",
                "maxSupportedTransactionVersion": 0,
                "commitment": self.commitment.as_str(),
            }
        ]);
        self.call("getTransaction", params).await
    }
}

impl std::fmt::Debug for HttpRpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpRpcClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("commitment", &self.commitment)
            .field("deadline", &self.deadline)
            .finish()
    }
}
