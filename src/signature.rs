//! Request signing for the OKX REST API
//!
//! Every private endpoint expects four headers. The signature is the base64
//! encoded HMAC-SHA256 of `timestamp + method + requestPath + body`, keyed by
//! the account secret. The timestamp that goes into the prehash must be sent
//! byte-for-byte in `OK-ACCESS-TIMESTAMP`, otherwise the exchange rejects the
//! request.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use sha2::Sha256;

use crate::consts::{
    HEADER_ACCESS_KEY, HEADER_ACCESS_PASSPHRASE, HEADER_ACCESS_SIGN, HEADER_ACCESS_TIMESTAMP,
};
use crate::errors::{Error, Result};

type HmacSha256 = Hmac<Sha256>;

/// API credentials issued by the exchange
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub secret_key: String,
    pub passphrase: String,
}

impl Credentials {
    pub fn new(
        api_key: impl Into<String>,
        secret_key: impl Into<String>,
        passphrase: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            secret_key: secret_key.into(),
            passphrase: passphrase.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("secret_key", &"<redacted>")
            .field("passphrase", &"<redacted>")
            .finish()
    }
}

/// The four authentication headers of a signed request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedHeaders {
    pub api_key: String,
    pub sign: String,
    pub timestamp: String,
    pub passphrase: String,
}

impl SignedHeaders {
    /// Header name / value pairs in the order the exchange documents them
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            (HEADER_ACCESS_KEY, self.api_key.as_str()),
            (HEADER_ACCESS_SIGN, self.sign.as_str()),
            (HEADER_ACCESS_TIMESTAMP, self.timestamp.as_str()),
            (HEADER_ACCESS_PASSPHRASE, self.passphrase.as_str()),
        ]
        .into_iter()
    }

    /// Convert into a header map usable by reqwest
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::with_capacity(4);
        for (name, value) in self.iter() {
            let value = HeaderValue::from_str(value).map_err(|_| {
                Error::InvalidCredentials(format!("{} contains non-visible characters", name))
            })?;
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| Error::InvalidCredentials(e.to_string()))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }
}

/// Current UTC time as ISO-8601 with millisecond precision, e.g. `2020-12-08T09:08:57.715Z`
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Compute the base64 HMAC-SHA256 signature for a request
pub fn sign(
    timestamp: &str,
    method: &str,
    request_path: &str,
    body: &str,
    secret_key: &str,
) -> Result<String> {
    let mut mac = HmacSha256::new_from_slice(secret_key.as_bytes())
        .map_err(|e| Error::InvalidCredentials(e.to_string()))?;
    mac.update(timestamp.as_bytes());
    mac.update(method.as_bytes());
    mac.update(request_path.as_bytes());
    mac.update(body.as_bytes());

    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Build signed headers for a request with an explicit timestamp
pub fn sign_headers(
    method: &str,
    request_path: &str,
    body: &str,
    credentials: &Credentials,
    timestamp: String,
) -> Result<SignedHeaders> {
    let sign = sign(&timestamp, method, request_path, body, &credentials.secret_key)?;
    Ok(SignedHeaders {
        api_key: credentials.api_key.clone(),
        sign,
        timestamp,
        passphrase: credentials.passphrase.clone(),
    })
}

/// Build signed headers for a request, stamped with the current time
pub fn sign_request_headers(
    method: &str,
    request_path: &str,
    body: &str,
    credentials: &Credentials,
) -> Result<SignedHeaders> {
    sign_headers(method, request_path, body, credentials, current_timestamp())
}
