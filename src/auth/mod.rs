//! Authentication header builders.
//!
//! L1 proves control of the wallet key and bootstraps API credentials;
//! L2 signs individual requests with the API secret.

use reqwest::header::HeaderName;
use secrecy::SecretString;
use serde::Deserialize;
use uuid::Uuid;

pub mod l1;
pub mod l2;

pub(crate) const POLY_ADDRESS: HeaderName = HeaderName::from_static("poly_address");
pub(crate) const POLY_SIGNATURE: HeaderName = HeaderName::from_static("poly_signature");
pub(crate) const POLY_TIMESTAMP: HeaderName = HeaderName::from_static("poly_timestamp");
pub(crate) const POLY_NONCE: HeaderName = HeaderName::from_static("poly_nonce");
pub(crate) const POLY_API_KEY: HeaderName = HeaderName::from_static("poly_api_key");
pub(crate) const POLY_PASSPHRASE: HeaderName = HeaderName::from_static("poly_passphrase");

/// API credential triple issued by the auth endpoints.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    api_key: Uuid,
    secret: SecretString,
    passphrase: SecretString,
}

impl Credentials {
    #[must_use]
    pub fn new(api_key: Uuid, secret: SecretString, passphrase: SecretString) -> Self {
        Self {
            api_key,
            secret,
            passphrase,
        }
    }

    /// The API key, also the `owner` of submitted orders.
    #[must_use]
    pub fn key(&self) -> Uuid {
        self.api_key
    }

    #[must_use]
    pub fn secret(&self) -> &SecretString {
        &self.secret
    }

    #[must_use]
    pub fn passphrase(&self) -> &SecretString {
        &self.passphrase
    }
}
