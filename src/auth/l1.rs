use std::borrow::Cow;

use alloy::dyn_abi::Eip712Domain;
use alloy::primitives::U256;
use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolStruct as _;
use reqwest::header::{HeaderMap, HeaderValue};

use crate::auth::{POLY_ADDRESS, POLY_NONCE, POLY_SIGNATURE, POLY_TIMESTAMP};
use crate::types::ChainId;
use crate::{Result, Timestamp};

const DOMAIN_NAME: Option<Cow<'static, str>> = Some(Cow::Borrowed("ClobAuthDomain"));
const DOMAIN_VERSION: Option<Cow<'static, str>> = Some(Cow::Borrowed("1"));
const ATTESTATION: &str = "This message attests that I control the given wallet";

alloy::sol! {
    /// Wallet-control attestation hashed and signed under EIP-712.
    #[derive(Debug)]
    struct ClobAuth {
        address address;
        string timestamp;
        uint256 nonce;
        string message;
    }
}

/// Builds the header set for `POST /auth/api-key` and
/// `GET /auth/derive-api-key`.
///
/// The domain carries no verifying contract; the attestation is bound to
/// the chain id alone.
pub async fn create_headers(
    signer: &PrivateKeySigner,
    chain_id: ChainId,
    timestamp: Timestamp,
    nonce: Option<u32>,
) -> Result<HeaderMap> {
    let nonce = nonce.unwrap_or(0);
    let auth = ClobAuth {
        address: signer.address(),
        timestamp: timestamp.to_string(),
        nonce: U256::from(nonce),
        message: ATTESTATION.to_owned(),
    };
    let domain = Eip712Domain {
        name: DOMAIN_NAME,
        version: DOMAIN_VERSION,
        chain_id: Some(U256::from(chain_id)),
        ..Eip712Domain::default()
    };
    let signature = signer.sign_hash(&auth.eip712_signing_hash(&domain)).await?;

    let mut headers = HeaderMap::with_capacity(4);
    headers.insert(
        POLY_ADDRESS,
        HeaderValue::from_str(&signer.address().to_string())?,
    );
    headers.insert(
        POLY_SIGNATURE,
        HeaderValue::from_str(&alloy::hex::encode_prefixed(signature.as_bytes()))?,
    );
    headers.insert(
        POLY_TIMESTAMP,
        HeaderValue::from_str(&timestamp.to_string())?,
    );
    headers.insert(POLY_NONCE, HeaderValue::from_str(&nonce.to_string())?);

    Ok(headers)
}
