//! Minimal Polymarket CLOB client plus the diagnostic order probe built on it.
//!
//! The library covers exactly what one signed limit order needs: credential
//! handling, EIP-712 order construction and signing, L1/L2 authentication
//! headers, and `POST /order` submission. The `polymarket-order-probe` binary
//! wires it together and prints every signed field so the output can be
//! diffed against other client implementations.

use alloy::primitives::address;
use phf::phf_map;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod order;
pub mod policy;
pub mod response;
pub mod types;

pub use client::Client;
pub use error::{Error, Kind};

use crate::types::{Address, ChainId};

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unix timestamp in seconds.
pub type Timestamp = i64;

/// Polygon mainnet.
pub const POLYGON: ChainId = 137;
/// Polygon Amoy testnet.
pub const AMOY: ChainId = 80002;

/// Contract addresses for one `(chain, neg_risk)` exchange deployment.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ContractConfig {
    pub exchange: Address,
    pub collateral: Address,
    pub conditional_tokens: Address,
}

struct ChainContracts {
    exchange: Address,
    neg_risk_exchange: Address,
    collateral: Address,
    conditional_tokens: Address,
}

static CONTRACTS: phf::Map<u64, ChainContracts> = phf_map! {
    137u64 => ChainContracts {
        exchange: address!("0x4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E"),
        neg_risk_exchange: address!("0xC5d563A36AE78145C45a50134d48A1215220f80a"),
        collateral: address!("0x2791Bca1f2de4661ED88A30C99A7a9449Aa84174"),
        conditional_tokens: address!("0x4D97DCd97eC945f40cF65F87097ACe5EA0476045"),
    },
    80002u64 => ChainContracts {
        exchange: address!("0xdFE02Eb6733538f8Ea35D585af8DE5958AD99E40"),
        neg_risk_exchange: address!("0xC5d563A36AE78145C45a50134d48A1215220f80a"),
        collateral: address!("0x9c4e1703476E875070ee25b56a58b008cfb8fa78"),
        conditional_tokens: address!("0x69308FB512518e39F9b16112fA8d994F4e2Bf8bB"),
    },
};

/// Looks up the contract set for `chain_id`, routing to the neg-risk
/// exchange when requested.
#[must_use]
pub fn contract_config(chain_id: ChainId, neg_risk: bool) -> Option<ContractConfig> {
    let contracts = CONTRACTS.get(&chain_id)?;
    let exchange = if neg_risk {
        contracts.neg_risk_exchange
    } else {
        contracts.exchange
    };

    Some(ContractConfig {
        exchange,
        collateral: contracts.collateral,
        conditional_tokens: contracts.conditional_tokens,
    })
}

/// Executes a prepared request and decodes the JSON body, preserving the
/// body text of non-2xx responses in the error.
pub(crate) async fn request<T: DeserializeOwned>(
    client: &reqwest::Client,
    mut request: reqwest::Request,
    headers: Option<HeaderMap>,
) -> Result<T> {
    if let Some(headers) = headers {
        request.headers_mut().extend(headers);
    }

    let method = request.method().clone();
    let url = request.url().clone();
    let response = client.execute(request).await?;
    let status = response.status();
    tracing::debug!(%method, %url, %status, "request completed");

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(Error::status(status, body));
    }

    let bytes = response.bytes().await?;
    let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
    Ok(serde_path_to_error::deserialize(&mut deserializer)?)
}
