//! Minimal Solana JSON-RPC client
//!
//! Just the two calls a launch needs: `sendTransaction` and
//! `getSignatureStatuses`. Request building and response parsing are pure
//! functions so they can be tested without a node.

use crate::error::{LaunchError, LaunchResult};
use crate::signer::Confirmation;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Public mainnet endpoint
pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Helius endpoint template, key appended
pub const HELIUS_RPC_URL_PREFIX: &str = "https://mainnet.helius-rpc.com/?api-key=";

/// Retries the RPC node may spend on a sent transaction
pub const SEND_MAX_RETRIES: u64 = 3;

/// Upper bound for any single RPC round trip
pub const DEFAULT_RPC_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Failure of a single RPC call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcCallError {
    /// Request never got a well-formed answer
    #[error("{0}")]
    Transport(String),
    /// Node answered with a JSON-RPC error object
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}

/// Status of one signature as reported by the node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureStatus {
    /// Unknown to the node yet, or below `confirmed`
    Pending,
    Confirmed { slot: u64, commitment: String },
    Failed(String),
}

/// Build a JSON-RPC 2.0 request
pub fn build_rpc_request(id: u64, method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params,
    })
}

/// Params for `sendTransaction`
pub fn send_transaction_params(wire: &[u8]) -> Value {
    json!([
        BASE64.encode(wire),
        {
            "encoding": "base64",
            "skipPreflight": true,
            "maxRetries": SEND_MAX_RETRIES,
        }
    ])
}

/// Params for `getSignatureStatuses`
pub fn signature_status_params(signature: &str) -> Value {
    json!([[signature], { "searchTransactionHistory": false }])
}

/// Extract `result` or the error object from a JSON-RPC response
pub fn parse_rpc_response(body: &Value) -> Result<Value, RpcCallError> {
    if let Some(error) = body.get("error") {
        return Err(RpcCallError::Rpc {
            code: error.get("code").and_then(|c| c.as_i64()).unwrap_or_default(),
            message: error
                .get("message")
                .and_then(|m| m.as_str())
                .map(String::from)
                .unwrap_or_else(|| error.to_string()),
        });
    }
    body.get("result")
        .cloned()
        .ok_or_else(|| RpcCallError::Transport("RPC response has neither result nor error".to_string()))
}

/// Interpret a `getSignatureStatuses` result for a single signature
pub fn parse_signature_status(result: &Value) -> LaunchResult<SignatureStatus> {
    let entry = result
        .get("value")
        .and_then(|v| v.as_array())
        .and_then(|values| values.first())
        .ok_or_else(|| LaunchError::Network("Malformed getSignatureStatuses result".to_string()))?;

    if entry.is_null() {
        return Ok(SignatureStatus::Pending);
    }

    if let Some(err) = entry.get("err").filter(|e| !e.is_null()) {
        return Ok(SignatureStatus::Failed(err.to_string()));
    }

    let slot = entry.get("slot").and_then(|s| s.as_u64()).unwrap_or_default();
    match entry.get("confirmationStatus").and_then(|s| s.as_str()) {
        Some(level @ ("confirmed" | "finalized")) => Ok(SignatureStatus::Confirmed {
            slot,
            commitment: level.to_string(),
        }),
        _ => Ok(SignatureStatus::Pending),
    }
}

/// JSON-RPC client over `reqwest`
#[derive(Debug)]
pub struct RpcClient {
    http: reqwest::Client,
    url: String,
    next_id: AtomicU64,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> LaunchResult<Self> {
        Self::with_request_timeout(url, DEFAULT_RPC_REQUEST_TIMEOUT)
    }

    pub fn with_request_timeout(url: impl Into<String>, request_timeout: Duration) -> LaunchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| LaunchError::Configuration(format!("Failed to build RPC client: {}", e)))?;
        Ok(Self {
            http,
            url: url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, method: &str, params: Value) -> Result<Value, RpcCallError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = build_rpc_request(id, method, params);
        let response = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RpcCallError::Transport(format!("{} failed: {}", method, e)))?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| RpcCallError::Transport(format!("{} returned invalid JSON: {}", method, e)))?;
        parse_rpc_response(&body)
    }

    /// Submit wire bytes; returns the signature the node reports
    pub async fn send_transaction(&self, wire: &[u8]) -> LaunchResult<String> {
        let result = self
            .call("sendTransaction", send_transaction_params(wire))
            .await
            .map_err(|e| match e {
                RpcCallError::Transport(msg) => LaunchError::Network(msg),
                rpc @ RpcCallError::Rpc { .. } => LaunchError::ChainRejected(rpc.to_string()),
            })?;
        result
            .as_str()
            .map(String::from)
            .ok_or_else(|| LaunchError::Network(format!("Unexpected sendTransaction result: {}", result)))
    }

    pub async fn signature_status(&self, signature: &str) -> Result<SignatureStatus, RpcCallError> {
        let result = self
            .call("getSignatureStatuses", signature_status_params(signature))
            .await?;
        parse_signature_status(&result).map_err(|e| RpcCallError::Transport(e.to_string()))
    }

    /// Poll until the signature is confirmed or fails, giving up after `timeout`
    ///
    /// The bound covers the whole wait, including a status call the node
    /// never answers. Errors while polling are logged and polling continues.
    pub async fn wait_for_confirmation(
        &self,
        signature: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> LaunchResult<Confirmation> {
        match tokio::time::timeout(timeout, self.poll_confirmation(signature, poll_interval)).await {
            Ok(verdict) => verdict,
            Err(_) => Err(LaunchError::ConfirmationTimeout {
                signature: signature.to_string(),
                waited_secs: timeout.as_secs(),
            }),
        }
    }

    async fn poll_confirmation(&self, signature: &str, poll_interval: Duration) -> LaunchResult<Confirmation> {
        loop {
            match self.signature_status(signature).await {
                Ok(SignatureStatus::Confirmed { slot, commitment }) => {
                    debug!("{} confirmed at slot {} ({})", signature, slot, commitment);
                    return Ok(Confirmation {
                        signature: signature.to_string(),
                        slot,
                        commitment,
                    });
                }
                Ok(SignatureStatus::Failed(err)) => {
                    return Err(LaunchError::ChainRejected(err));
                }
                Ok(SignatureStatus::Pending) => {}
                Err(e) => warn!("Status check for {} failed: {}", signature, e),
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

/// Pick the RPC endpoint: explicit URL, else Helius key, else public mainnet
pub fn resolve_rpc_url(explicit: Option<&str>, helius_api_key: Option<&str>) -> String {
    if let Some(url) = explicit.filter(|u| !u.trim().is_empty()) {
        return url.to_string();
    }
    if let Some(key) = helius_api_key.filter(|k| !k.trim().is_empty()) {
        return format!("{}{}", HELIUS_RPC_URL_PREFIX, key);
    }
    DEFAULT_RPC_URL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    /// Accepts connections and never writes a byte back
    async fn silent_node() -> (String, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let handle = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        (url, handle)
    }

    #[test]
    fn test_send_transaction_params() {
        let params = send_transaction_params(&[1, 2, 3]);
        assert_eq!(params[0], "AQID");
        assert_eq!(params[1]["encoding"], "base64");
        assert_eq!(params[1]["skipPreflight"], true);
        assert_eq!(params[1]["maxRetries"], 3);
    }

    #[test]
    fn test_parse_rpc_error_object() {
        let body = json!({"jsonrpc":"2.0","id":1,"error":{"code":-32002,"message":"insufficient funds"}});
        assert_eq!(
            parse_rpc_response(&body),
            Err(RpcCallError::Rpc {
                code: -32002,
                message: "insufficient funds".to_string()
            })
        );
    }

    #[test]
    fn test_parse_rpc_result() {
        let body = json!({"jsonrpc":"2.0","id":1,"result":"5sig"});
        assert_eq!(parse_rpc_response(&body).unwrap(), json!("5sig"));
    }

    #[test]
    fn test_signature_status_pending_when_unknown() {
        let result = json!({"context":{"slot":10},"value":[null]});
        assert_eq!(parse_signature_status(&result).unwrap(), SignatureStatus::Pending);
    }

    #[test]
    fn test_signature_status_processed_is_pending() {
        let result = json!({"context":{"slot":10},"value":[{"slot":9,"confirmations":0,"err":null,"confirmationStatus":"processed"}]});
        assert_eq!(parse_signature_status(&result).unwrap(), SignatureStatus::Pending);
    }

    #[test]
    fn test_signature_status_confirmed() {
        let result = json!({"context":{"slot":10},"value":[{"slot":9,"confirmations":1,"err":null,"confirmationStatus":"confirmed"}]});
        assert_eq!(
            parse_signature_status(&result).unwrap(),
            SignatureStatus::Confirmed {
                slot: 9,
                commitment: "confirmed".to_string()
            }
        );
    }

    #[test]
    fn test_signature_status_failed() {
        let result = json!({"context":{"slot":10},"value":[{"slot":9,"err":{"InstructionError":[0,"Custom"]},"confirmationStatus":"confirmed"}]});
        match parse_signature_status(&result).unwrap() {
            SignatureStatus::Failed(err) => assert!(err.contains("InstructionError")),
            other => panic!("unexpected status: {:?}", other),
        }
    }

    #[test]
    fn test_resolve_rpc_url_precedence() {
        assert_eq!(resolve_rpc_url(Some("http://localhost:8899"), Some("key")), "http://localhost:8899");
        assert_eq!(
            resolve_rpc_url(None, Some("key")),
            "https://mainnet.helius-rpc.com/?api-key=key"
        );
        assert_eq!(resolve_rpc_url(Some(""), None), DEFAULT_RPC_URL);
    }

    #[tokio::test]
    async fn test_confirmation_times_out_when_node_unreachable() {
        let rpc = RpcClient::new("http://127.0.0.1:9").unwrap();
        let err = rpc
            .wait_for_confirmation("5sig", Duration::from_millis(200), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, LaunchError::ConfirmationTimeout { .. }));
    }

    #[tokio::test]
    async fn test_send_transaction_unreachable_is_network_error() {
        let rpc = RpcClient::new("http://127.0.0.1:9").unwrap();
        let err = rpc.send_transaction(&[0u8; 4]).await.unwrap_err();
        assert!(matches!(err, LaunchError::Network(_)));
    }

    #[tokio::test]
    async fn test_confirmation_bounded_when_node_never_answers() {
        let (url, node) = silent_node().await;
        let rpc = RpcClient::new(url).unwrap();

        let waited = tokio::time::timeout(
            Duration::from_secs(5),
            rpc.wait_for_confirmation("5sig", Duration::from_millis(300), Duration::from_millis(50)),
        )
        .await;
        node.abort();

        let err = waited.expect("wait outlived its bound").unwrap_err();
        assert!(matches!(err, LaunchError::ConfirmationTimeout { ref signature, .. } if signature == "5sig"));
    }

    #[tokio::test]
    async fn test_send_transaction_to_silent_node_times_out() {
        let (url, node) = silent_node().await;
        let rpc = RpcClient::with_request_timeout(url, Duration::from_millis(200)).unwrap();

        let sent = tokio::time::timeout(Duration::from_secs(5), rpc.send_transaction(&[0u8; 4])).await;
        node.abort();

        let err = sent.expect("request outlived its timeout").unwrap_err();
        assert!(matches!(err, LaunchError::Network(_)));
    }

    #[test]
    fn test_rpc_call_error_display() {
        let err = RpcCallError::Rpc {
            code: -32002,
            message: "insufficient funds".to_string(),
        };
        assert_eq!(err.to_string(), "RPC error -32002: insufficient funds");
        assert_eq!(RpcCallError::Transport("down".to_string()).to_string(), "down");
    }
}
