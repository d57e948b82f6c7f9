//! Authenticated client for the position history endpoint

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::header::HeaderValue;
use serde::{Deserialize, Deserializer};

use crate::config::OkxConfig;
use crate::consts::{HEADER_SIMULATED_TRADING, POSITIONS_HISTORY_PATH};
use crate::errors::{Error, Result};
use crate::signature::{sign_request_headers, Credentials};
use crate::types::Position;

/// Pagination and filter parameters for `/api/v5/account/positions-history`
///
/// `None` leaves a parameter out of the query string. `Some("")` is sent as
/// an explicit empty value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub inst_type: Option<String>,
    pub inst_id: Option<String>,
    /// Return records older than this `uTime`
    pub after: Option<String>,
    /// Return records newer than this `uTime`
    pub before: Option<String>,
    /// Page size, the exchange caps it at 100
    pub limit: Option<u32>,
}

impl HistoryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inst_type(mut self, inst_type: impl Into<String>) -> Self {
        self.inst_type = Some(inst_type.into());
        self
    }

    pub fn inst_id(mut self, inst_id: impl Into<String>) -> Self {
        self.inst_id = Some(inst_id.into());
        self
    }

    pub fn after(mut self, after: impl Into<String>) -> Self {
        self.after = Some(after.into());
        self
    }

    pub fn before(mut self, before: impl Into<String>) -> Self {
        self.before = Some(before.into());
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// URL-encoded query string, empty when no parameter is set
    pub fn query_string(&self) -> String {
        let limit = self.limit.map(|l| l.to_string());
        let params = [
            ("instType", self.inst_type.as_deref()),
            ("instId", self.inst_id.as_deref()),
            ("after", self.after.as_deref()),
            ("before", self.before.as_deref()),
            ("limit", limit.as_deref()),
        ];

        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (key, value) in params {
            if let Some(value) = value {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    /// Endpoint path plus query string; this is what gets signed
    pub fn request_path(&self) -> String {
        let query = self.query_string();
        if query.is_empty() {
            POSITIONS_HISTORY_PATH.to_string()
        } else {
            format!("{}?{}", POSITIONS_HISTORY_PATH, query)
        }
    }
}

/// Response wrapper shared by all v5 endpoints
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(deserialize_with = "deserialize_code")]
    code: i64,
    #[serde(default)]
    msg: String,
    data: T,
}

// The exchange documents `code` as a number but sends it as a string ("0")
fn deserialize_code<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Code {
        Num(i64),
        Str(String),
    }

    match Code::deserialize(deserializer)? {
        Code::Num(n) => Ok(n),
        Code::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// Parse a response body, rejecting bodies that do not match the envelope
/// and envelopes carrying a non-zero code
pub(crate) fn parse_positions(body: &str) -> Result<Vec<Position>> {
    let envelope: Envelope<Vec<Position>> = serde_json::from_str(body)?;
    if envelope.code != 0 {
        return Err(Error::Application {
            code: envelope.code,
            msg: envelope.msg,
        });
    }
    Ok(envelope.data)
}

/// Anything that can produce a page of closed positions
#[async_trait]
pub trait PositionSource: Send + Sync {
    async fn positions_history(&self, query: &HistoryQuery) -> Result<Vec<Position>>;
}

/// Client for the OKX account endpoints
#[derive(Debug)]
pub struct PositionClient {
    http_client: reqwest::Client,
    base_url: String,
    credentials: Credentials,
    simulated: bool,
}

impl PositionClient {
    pub fn new(config: OkxConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build()?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials: config.credentials(),
            simulated: config.simulated,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of position history, newest first.
    ///
    /// Single attempt: transport errors, non-2xx statuses, malformed bodies
    /// and exchange error codes are all returned to the caller.
    pub async fn positions_history(&self, query: &HistoryQuery) -> Result<Vec<Position>> {
        let method = "GET";
        let request_path = query.request_path();
        let signed = sign_request_headers(method, &request_path, "", &self.credentials)?;

        let mut headers = signed.to_header_map()?;
        if self.simulated {
            headers.insert(HEADER_SIMULATED_TRADING, HeaderValue::from_static("1"));
        }

        let url = format!("{}{}", self.base_url, request_path);
        debug!("GET {}", url);

        let response = self.http_client.get(&url).headers(headers).send().await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Position history request failed: {}", status);
            return Err(Error::RequestFailed {
                status: status
                    .canonical_reason()
                    .map(str::to_string)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        let body = response.text().await?;
        let positions = parse_positions(&body).inspect_err(|e| {
            warn!("Position history response rejected: {}", e);
        })?;

        debug!("Fetched {} positions", positions.len());
        Ok(positions)
    }
}

#[async_trait]
impl PositionSource for PositionClient {
    async fn positions_history(&self, query: &HistoryQuery) -> Result<Vec<Position>> {
        PositionClient::positions_history(self, query).await
    }
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================
