use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};
use hmac::{Hmac, Mac as _};
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret as _;
use sha2::Sha256;

use crate::auth::{
    Credentials, POLY_ADDRESS, POLY_API_KEY, POLY_PASSPHRASE, POLY_SIGNATURE, POLY_TIMESTAMP,
};
use crate::error::Error;
use crate::types::Address;
use crate::{Result, Timestamp};

type HmacSha256 = Hmac<Sha256>;

/// Builds the header set for authenticated CLOB calls.
///
/// The signature covers `timestamp + method + path + body`, keyed with the
/// base64-decoded API secret.
pub fn create_headers(
    address: Address,
    credentials: &Credentials,
    request: &reqwest::Request,
    timestamp: Timestamp,
) -> Result<HeaderMap> {
    let body = request
        .body()
        .and_then(reqwest::Body::as_bytes)
        .unwrap_or_default();
    let signature = sign(
        credentials.secret().expose_secret(),
        timestamp,
        request.method().as_str(),
        request.url().path(),
        body,
    )?;

    let mut headers = HeaderMap::with_capacity(5);
    headers.insert(POLY_ADDRESS, HeaderValue::from_str(&address.to_string())?);
    headers.insert(POLY_SIGNATURE, HeaderValue::from_str(&signature)?);
    headers.insert(
        POLY_TIMESTAMP,
        HeaderValue::from_str(&timestamp.to_string())?,
    );
    headers.insert(
        POLY_API_KEY,
        HeaderValue::from_str(&credentials.key().to_string())?,
    );
    headers.insert(
        POLY_PASSPHRASE,
        HeaderValue::from_str(credentials.passphrase().expose_secret())?,
    );

    Ok(headers)
}

/// HMAC-SHA256 over the canonical message, emitted as padded URL-safe base64.
///
/// Secrets are accepted in either URL-safe or standard base64.
fn sign(
    secret: &str,
    timestamp: Timestamp,
    method: &str,
    path: &str,
    body: &[u8],
) -> Result<String> {
    let key = URL_SAFE
        .decode(secret)
        .or_else(|_| STANDARD.decode(secret))
        .map_err(|e| Error::signing(format!("unable to decode API secret: {e}")))?;

    let mut mac = HmacSha256::new_from_slice(&key)
        .map_err(|e| Error::signing(format!("unable to key HMAC: {e}")))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(method.as_bytes());
    mac.update(path.as_bytes());
    mac.update(body);

    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}
