//! Launch API client
//!
//! [`LaunchApi`] is the request/response contract the orchestrator consumes.
//! [`BagsApiClient`] implements it over HTTPS with `reqwest`.
//!
//! Every endpoint answers with the same envelope:
//!
//! ```text
//! { "success": true, "response": <payload> }
//! ```
//!
//! Each operation accepts exactly one payload shape. Anything else is an
//! [`LaunchError::Upstream`], never a guess.

use crate::error::{LaunchError, LaunchResult};
use crate::fee_share::FeeSlots;
use crate::types::{
    ImageUpload, LaunchConfig, SerializedTransaction, SocialLinks, SocialPlatform, TokenArtifact,
    WRAPPED_SOL_MINT,
};
use crate::validation::validate_image;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Production API root
pub const DEFAULT_API_URL: &str = "https://public-api-v2.bags.fm/api/v1";

/// Health-check URL
pub const DEFAULT_PING_URL: &str = "https://public-api-v2.bags.fm/ping";

/// Header carrying the static API key
pub const API_KEY_HEADER: &str = "x-api-key";

pub const CREATE_TOKEN_INFO_ENDPOINT: &str = "/token-launch/create-token-info";
pub const FEE_SHARE_WALLET_ENDPOINT: &str = "/token-launch/fee-share/wallet";
pub const CREATE_FEE_SHARE_CONFIG_ENDPOINT: &str = "/token-launch/fee-share/create-config";
pub const CREATE_CONFIG_ENDPOINT: &str = "/token-launch/create-config";
pub const CREATE_LAUNCH_TX_ENDPOINT: &str = "/token-launch/create-launch-transaction";
/// Dedicated after-config route; some API deployments serve this request on
/// [`CREATE_LAUNCH_TX_ENDPOINT`] instead, so a 404 here points at the deployment
pub const CREATE_LAUNCH_TX_AFTER_CONFIG_ENDPOINT: &str =
    "/token-launch/create-launch-transaction-after-config";

// ============================================================================
// Contract
// ============================================================================

/// Remote launch service operations
#[async_trait]
pub trait LaunchApi: Send + Sync {
    /// Upload metadata (and image) and reserve a token mint
    async fn create_token_info(&self, request: &TokenInfoRequest) -> LaunchResult<TokenArtifact>;

    /// Resolve the wallet registered for a social handle
    async fn lookup_platform_wallet(
        &self,
        platform: SocialPlatform,
        username: &str,
    ) -> LaunchResult<String>;

    /// Create a two-wallet fee-share config
    async fn create_fee_share_config(
        &self,
        request: &FeeShareConfigRequest,
    ) -> LaunchResult<LaunchConfig>;

    /// Create a plain launch config for a launch without fee sharing
    async fn create_standalone_launch_config(&self, launch_wallet: &str)
        -> LaunchResult<LaunchConfig>;

    /// Request the launch transaction for a config that needs no signing
    async fn create_launch_transaction(
        &self,
        request: &LaunchTransactionRequest,
    ) -> LaunchResult<SerializedTransaction>;

    /// Request the launch transaction once the config transaction is confirmed
    async fn create_launch_transaction_after_config(
        &self,
        request: &LaunchTransactionRequest,
    ) -> LaunchResult<SerializedTransaction>;
}

// ============================================================================
// Request bodies
// ============================================================================

/// Multipart body of create-token-info
#[derive(Debug, Clone)]
pub struct TokenInfoRequest {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: Option<ImageUpload>,
    pub links: SocialLinks,
}

/// JSON body of fee-share/create-config
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeShareConfigRequest {
    pub wallet_a: String,
    pub wallet_b: String,
    pub wallet_a_bps: u16,
    pub wallet_b_bps: u16,
    pub payer: String,
    pub base_mint: String,
    pub quote_mint: String,
}

impl FeeShareConfigRequest {
    pub fn new(slots: &FeeSlots, payer: &str, base_mint: &str) -> Self {
        Self {
            wallet_a: slots.wallet_a.clone(),
            wallet_b: slots.wallet_b.clone(),
            wallet_a_bps: slots.wallet_a_bps,
            wallet_b_bps: slots.wallet_b_bps,
            payer: payer.to_string(),
            base_mint: base_mint.to_string(),
            quote_mint: WRAPPED_SOL_MINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct StandaloneConfigRequest<'a> {
    launch_wallet: &'a str,
}

/// JSON body of both launch-transaction endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchTransactionRequest {
    pub ipfs: String,
    pub token_mint: String,
    pub wallet: String,
    pub config_key: String,
    pub initial_buy_lamports: u64,
}

impl LaunchTransactionRequest {
    pub fn new(
        token: &TokenArtifact,
        config_key: &str,
        wallet: &str,
        initial_buy_lamports: u64,
    ) -> Self {
        Self {
            ipfs: token.ipfs_hash().to_string(),
            token_mint: token.token_mint.clone(),
            wallet: wallet.to_string(),
            config_key: config_key.to_string(),
            initial_buy_lamports,
        }
    }
}

// ============================================================================
// Response parsing (pure)
// ============================================================================

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    response: Option<T>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenInfoPayload {
    token_mint: String,
    token_metadata: String,
    token_launch: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigPayload {
    config_key: String,
    #[serde(default)]
    tx: Option<String>,
}

/// Best human-readable message in an error body
pub fn extract_error_message(status: u16, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}

/// Decode a response envelope, turning every deviation into an upstream error
pub fn parse_envelope<T: DeserializeOwned>(status: u16, body: &str) -> LaunchResult<T> {
    if !(200..300).contains(&status) {
        return Err(LaunchError::Upstream {
            status: Some(status),
            message: extract_error_message(status, body),
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(body).map_err(|e| LaunchError::Upstream {
        status: Some(status),
        message: format!("Unexpected response shape: {}", e),
    })?;

    if !envelope.success {
        return Err(LaunchError::Upstream {
            status: Some(status),
            message: envelope
                .error
                .unwrap_or_else(|| "Request reported failure".to_string()),
        });
    }

    envelope.response.ok_or_else(|| LaunchError::Upstream {
        status: Some(status),
        message: "Response payload missing".to_string(),
    })
}

fn require_non_empty(value: String, what: &str) -> LaunchResult<String> {
    if value.trim().is_empty() {
        Err(LaunchError::upstream(format!("Empty {} in response", what)))
    } else {
        Ok(value)
    }
}

pub fn parse_token_info(status: u16, body: &str) -> LaunchResult<TokenArtifact> {
    let payload: TokenInfoPayload = parse_envelope(status, body)?;
    Ok(TokenArtifact {
        token_mint: require_non_empty(payload.token_mint, "tokenMint")?,
        metadata_uri: require_non_empty(payload.token_metadata, "tokenMetadata")?,
        launch_record: payload.token_launch,
    })
}

pub fn parse_launch_config(status: u16, body: &str) -> LaunchResult<LaunchConfig> {
    let payload: ConfigPayload = parse_envelope(status, body)?;
    Ok(LaunchConfig {
        config_key: require_non_empty(payload.config_key, "configKey")?,
        pending_transaction: payload
            .tx
            .filter(|tx| !tx.trim().is_empty())
            .map(SerializedTransaction::config),
    })
}

pub fn parse_launch_transaction(status: u16, body: &str) -> LaunchResult<SerializedTransaction> {
    let encoded: String = parse_envelope(status, body)?;
    Ok(SerializedTransaction::launch(require_non_empty(
        encoded,
        "launch transaction",
    )?))
}

pub fn parse_platform_wallet(
    status: u16,
    body: &str,
    platform: SocialPlatform,
    username: &str,
) -> LaunchResult<String> {
    if status == 404 {
        return Err(LaunchError::WalletNotFound {
            platform: platform.as_str().to_string(),
            username: username.to_string(),
        });
    }
    let wallet: String = parse_envelope(status, body)?;
    require_non_empty(wallet, "wallet")
}

/// Path and query of a wallet lookup
pub fn build_wallet_lookup_query(platform: SocialPlatform, username: &str) -> (String, Vec<(String, String)>) {
    (
        format!("{}/{}", FEE_SHARE_WALLET_ENDPOINT, platform.as_str()),
        vec![(format!("{}Username", platform.as_str()), username.to_string())],
    )
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// Client settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub ping_url: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            ping_url: DEFAULT_PING_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(60),
        }
    }
}

/// `reqwest` implementation of [`LaunchApi`]
#[derive(Debug, Clone)]
pub struct BagsApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl BagsApiClient {
    pub fn new(config: ApiConfig) -> LaunchResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| LaunchError::Configuration(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    /// Fails fast when no key is configured
    fn api_key(&self) -> LaunchResult<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| LaunchError::Configuration("Bags API key not configured".to_string()))
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Send and return status plus raw body
    async fn execute(&self, endpoint: &str, request: reqwest::RequestBuilder) -> LaunchResult<(u16, String)> {
        debug!("Calling launch API {}", endpoint);
        let response = request.send().await.map_err(|e| LaunchError::Upstream {
            status: None,
            message: format!("{} request failed: {}", endpoint, e),
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| LaunchError::Upstream {
            status: Some(status),
            message: format!("Failed to read {} response: {}", endpoint, e),
        })?;
        if !(200..300).contains(&status) {
            warn!("Launch API {} answered HTTP {}", endpoint, status);
        }
        Ok((status, body))
    }

    async fn post_json<B: Serialize + Sync>(&self, endpoint: &str, body: &B) -> LaunchResult<(u16, String)> {
        let key = self.api_key()?;
        let request = self
            .http
            .post(self.url(endpoint))
            .header(API_KEY_HEADER, key)
            .json(body);
        self.execute(endpoint, request).await
    }

    /// Health check. True when the service answers `pong`.
    pub async fn ping(&self) -> LaunchResult<bool> {
        let (status, body) = self
            .execute("ping", self.http.get(&self.config.ping_url))
            .await?;
        if !(200..300).contains(&status) {
            return Ok(false);
        }
        let value: serde_json::Value = serde_json::from_str(&body).map_err(|e| LaunchError::Upstream {
            status: Some(status),
            message: format!("Unexpected ping response: {}", e),
        })?;
        Ok(value.get("message").and_then(|m| m.as_str()) == Some("pong"))
    }
}

fn build_token_info_form(request: &TokenInfoRequest) -> LaunchResult<Form> {
    let mut form = Form::new()
        .text("name", request.name.clone())
        .text("symbol", request.symbol.clone())
        .text("description", request.description.clone());

    if let Some(image) = &request.image {
        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)
            .map_err(|e| LaunchError::InvalidMedia(format!("Bad MIME type: {}", e)))?;
        form = form.part("image", part);
    }

    let links = [
        ("website", &request.links.website),
        ("twitter", &request.links.twitter),
        ("telegram", &request.links.telegram),
    ];
    for (field, value) in links {
        if let Some(url) = value.as_ref().filter(|u| !u.trim().is_empty()) {
            form = form.text(field, url.clone());
        }
    }

    Ok(form)
}

#[async_trait]
impl LaunchApi for BagsApiClient {
    async fn create_token_info(&self, request: &TokenInfoRequest) -> LaunchResult<TokenArtifact> {
        let key = self.api_key()?;
        if let Some(image) = &request.image {
            validate_image(image)?;
            info!(
                "Uploading image {} ({:.2}MB)",
                image.file_name,
                image.size() as f64 / 1024.0 / 1024.0
            );
        }

        let form = build_token_info_form(request)?;
        let http_request = self
            .http
            .post(self.url(CREATE_TOKEN_INFO_ENDPOINT))
            .header(API_KEY_HEADER, key)
            .multipart(form);
        let (status, body) = self.execute(CREATE_TOKEN_INFO_ENDPOINT, http_request).await?;
        let token = parse_token_info(status, &body)?;
        info!("Token info created, mint {}", token.token_mint);
        Ok(token)
    }

    async fn lookup_platform_wallet(
        &self,
        platform: SocialPlatform,
        username: &str,
    ) -> LaunchResult<String> {
        let key = self.api_key()?;
        let (path, query) = build_wallet_lookup_query(platform, username);
        let http_request = self
            .http
            .get(self.url(&path))
            .header(API_KEY_HEADER, key)
            .query(&query);
        let (status, body) = self.execute(FEE_SHARE_WALLET_ENDPOINT, http_request).await?;
        parse_platform_wallet(status, &body, platform, username)
    }

    async fn create_fee_share_config(
        &self,
        request: &FeeShareConfigRequest,
    ) -> LaunchResult<LaunchConfig> {
        let (status, body) = self
            .post_json(CREATE_FEE_SHARE_CONFIG_ENDPOINT, request)
            .await?;
        parse_launch_config(status, &body)
    }

    async fn create_standalone_launch_config(
        &self,
        launch_wallet: &str,
    ) -> LaunchResult<LaunchConfig> {
        let (status, body) = self
            .post_json(CREATE_CONFIG_ENDPOINT, &StandaloneConfigRequest { launch_wallet })
            .await?;
        parse_launch_config(status, &body)
    }

    async fn create_launch_transaction(
        &self,
        request: &LaunchTransactionRequest,
    ) -> LaunchResult<SerializedTransaction> {
        let (status, body) = self.post_json(CREATE_LAUNCH_TX_ENDPOINT, request).await?;
        parse_launch_transaction(status, &body)
    }

    async fn create_launch_transaction_after_config(
        &self,
        request: &LaunchTransactionRequest,
    ) -> LaunchResult<SerializedTransaction> {
        let (status, body) = self
            .post_json(CREATE_LAUNCH_TX_AFTER_CONFIG_ENDPOINT, request)
            .await?;
        parse_launch_transaction(status, &body)
    }
}
