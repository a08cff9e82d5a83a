use std::str::FromStr as _;
use std::sync::{Arc, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolStruct as _;
use bon::Builder;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::Rng as _;
use reqwest::Client as ReqwestClient;
use reqwest::Method;
use rust_decimal::prelude::ToPrimitive as _;
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;
use url::Url;

use crate::auth::{self, Credentials};
use crate::error::{Error, Kind};
use crate::order::{self, Order, SignedOrder};
use crate::policy::{FixedOrFetch, Policies, TimePolicy};
use crate::response::PostOrderResponse;
use crate::types::{
    Address, ChainId, Decimal, LimitOrderRequest, OrderType, Side, SignatureType, TickSize, U256,
};
use crate::{POLYGON, Result, Timestamp, contract_config};

const USDC_DECIMALS: u32 = 6;
const LOT_SIZE_SCALE: u32 = 2;

/// Connection and signing configuration for [`Client`].
#[derive(Builder, Clone, Debug)]
pub struct ClientConfig {
    /// CLOB REST endpoint.
    pub host: Url,
    #[builder(default = POLYGON)]
    pub chain_id: ChainId,
    /// Hex-encoded wallet key used for both order and auth signatures.
    pub private_key: SecretString,
    #[builder(default)]
    pub signature_type: SignatureType,
    /// Funding address. Required for proxy signature types, forbidden
    /// for `Eoa`.
    pub funder: Option<Address>,
    /// L1 auth nonce; the API defaults to 0.
    pub nonce: Option<u32>,
    #[builder(default)]
    pub policies: Policies,
}

/// Order-placing client for the Polymarket CLOB.
///
/// Cheap to clone; per-token lookups and the server clock offset are
/// cached behind shared handles.
#[derive(Clone, Debug)]
pub struct Client {
    host: Url,
    chain_id: ChainId,
    nonce: Option<u32>,
    signer: PrivateKeySigner,
    signature_type: SignatureType,
    funder: Address,
    policies: Policies,
    credentials: Credentials,
    client: ReqwestClient,
    tick_sizes: Arc<DashMap<U256, TickSize>>,
    neg_risks: Arc<DashMap<U256, bool>>,
    time_offset: Arc<OnceLock<Timestamp>>,
}

impl Client {
    /// Creates a client and bootstraps API credentials with L1 auth.
    pub async fn bootstrap(config: ClientConfig) -> Result<Self> {
        Self::bootstrap_with_client(config, ReqwestClient::new()).await
    }

    /// Creates a client and bootstraps API credentials with a custom HTTP client.
    pub async fn bootstrap_with_client(
        config: ClientConfig,
        client: ReqwestClient,
    ) -> Result<Self> {
        let signer = Self::signer_from_config(&config)?;
        let credentials = Self::create_or_derive_api_key(
            &client,
            &config.host,
            &signer,
            config.chain_id,
            config.nonce,
            config.policies.time,
        )
        .await?;

        Self::with_credentials_inner(config, signer, credentials, client)
    }

    /// Creates a client from already known credentials.
    pub fn with_credentials(config: ClientConfig, credentials: Credentials) -> Result<Self> {
        Self::with_credentials_and_client(config, credentials, ReqwestClient::new())
    }

    /// Creates a client from already known credentials and a custom HTTP client.
    pub fn with_credentials_and_client(
        config: ClientConfig,
        credentials: Credentials,
        client: ReqwestClient,
    ) -> Result<Self> {
        let signer = Self::signer_from_config(&config)?;
        Self::with_credentials_inner(config, signer, credentials, client)
    }

    fn with_credentials_inner(
        config: ClientConfig,
        signer: PrivateKeySigner,
        credentials: Credentials,
        client: ReqwestClient,
    ) -> Result<Self> {
        let funder = Self::validate_funder(config.signature_type, config.funder, signer.address())?;

        Ok(Self {
            host: config.host,
            chain_id: config.chain_id,
            nonce: config.nonce,
            signer,
            signature_type: config.signature_type,
            funder,
            policies: config.policies,
            credentials,
            client,
            tick_sizes: Arc::new(DashMap::new()),
            neg_risks: Arc::new(DashMap::new()),
            time_offset: Arc::new(OnceLock::new()),
        })
    }

    fn signer_from_config(config: &ClientConfig) -> Result<PrivateKeySigner> {
        PrivateKeySigner::from_str(config.private_key.expose_secret())
            .map_err(|e| Error::validation(format!("invalid private key: {e}")))
            .map(|signer| signer.with_chain_id(Some(config.chain_id)))
    }

    fn validate_funder(
        signature_type: SignatureType,
        funder: Option<Address>,
        signer_address: Address,
    ) -> Result<Address> {
        match (signature_type, funder) {
            (SignatureType::Eoa, None) => Ok(signer_address),
            (SignatureType::Eoa, Some(_)) => Err(Error::validation(
                "Cannot set a funder address with an Eoa signature type",
            )),
            (_, Some(funder)) if funder == Address::ZERO => Err(Error::validation(
                "Cannot use a zero funder address with a proxy signature type",
            )),
            (_, Some(funder)) => Ok(funder),
            (_, None) => Err(Error::validation(
                "Proxy signature types require a funder address",
            )),
        }
    }

    #[must_use]
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    #[must_use]
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Builds and signs a limit order.
    ///
    /// Tick size and neg-risk resolve per the configured policies; with
    /// `FetchAndCache` both lookups run concurrently and memoize per token.
    pub async fn sign_limit_order(&self, request: &LimitOrderRequest) -> Result<SignedOrder> {
        let (tick_size, neg_risk) = tokio::try_join!(
            self.resolve_tick_size(request.token_id),
            self.resolve_neg_risk(request.token_id),
        )?;

        let order_type = request.order_type.unwrap_or(OrderType::GTC);
        let expiration = request.expiration.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
        let nonce = request.nonce.unwrap_or(0);
        let taker = request.taker.unwrap_or(Address::ZERO);

        if !matches!(order_type, OrderType::GTD) && expiration > DateTime::<Utc>::UNIX_EPOCH {
            return Err(Error::validation(
                "Only GTD orders may have a non-zero expiration",
            ));
        }

        let price = request.price;
        let size = request.size;
        let side = request.side;

        if price.is_sign_negative() {
            return Err(Error::validation(format!(
                "Unable to build Order due to negative price {price}"
            )));
        }
        if size.is_zero() || size.is_sign_negative() {
            return Err(Error::validation(format!(
                "Unable to build Order due to negative size {size}"
            )));
        }
        if size.scale() > LOT_SIZE_SCALE {
            return Err(Error::validation(format!(
                "Unable to build Order: Size {size} has {} decimal places. Maximum lot size is {LOT_SIZE_SCALE}",
                size.scale()
            )));
        }

        let minimum_tick_size = tick_size.as_decimal();
        let decimals = minimum_tick_size.scale();

        if price.scale() > minimum_tick_size.scale() {
            return Err(Error::validation(format!(
                "Unable to build Order: Price {price} has {} decimal places. Minimum tick size \
                {minimum_tick_size} has {} decimal places. Price decimal places <= minimum tick size decimal places",
                price.scale(),
                minimum_tick_size.scale()
            )));
        }
        if price < minimum_tick_size || price > Decimal::ONE - minimum_tick_size {
            return Err(Error::validation(format!(
                "Price {price} is too small or too large for the minimum tick size {minimum_tick_size}"
            )));
        }

        let (taker_amount, maker_amount) = match side {
            Side::Buy => (
                size,
                (size * price).trunc_with_scale(decimals + LOT_SIZE_SCALE),
            ),
            Side::Sell => (
                (size * price).trunc_with_scale(decimals + LOT_SIZE_SCALE),
                size,
            ),
        };

        let expiration_u64 = expiration
            .timestamp()
            .to_u64()
            .ok_or(Error::validation(format!(
                "Unable to represent expiration {expiration} as a u64"
            )))?;

        let order = Order {
            salt: U256::from(to_ieee_754_int(generate_seed())),
            maker: self.funder,
            signer: self.address(),
            taker,
            tokenId: request.token_id,
            makerAmount: U256::from(to_fixed_u128(maker_amount)?),
            takerAmount: U256::from(to_fixed_u128(taker_amount)?),
            expiration: U256::from(expiration_u64),
            nonce: U256::from(nonce),
            feeRateBps: U256::from(self.policies.fee_rate_bps),
            side: side as u8,
            signatureType: self.signature_type as u8,
        };

        let exchange = contract_config(self.chain_id, neg_risk)
            .ok_or(Error::missing_contract_config(self.chain_id, neg_risk))?
            .exchange;
        let domain = order::signing_domain(self.chain_id, exchange);
        let signature = self
            .signer
            .sign_hash(&order.eip712_signing_hash(&domain))
            .await?;

        Ok(SignedOrder {
            order,
            signature,
            order_type,
            owner: self.credentials.key(),
        })
    }

    /// Posts a signed order to `POST /order` under L2 auth.
    pub async fn post_order(&self, signed_order: &SignedOrder) -> Result<PostOrderResponse> {
        let request = self
            .client
            .request(Method::POST, self.endpoint("order")?)
            .json(signed_order)
            .build()?;
        let timestamp = self.resolve_timestamp().await?;
        let headers =
            auth::l2::create_headers(self.address(), &self.credentials, &request, timestamp)?;

        crate::request(&self.client, request, Some(headers)).await
    }

    async fn create_or_derive_api_key(
        client: &ReqwestClient,
        host: &Url,
        signer: &PrivateKeySigner,
        chain_id: ChainId,
        nonce: Option<u32>,
        time: TimePolicy,
    ) -> Result<Credentials> {
        match Self::create_api_key(client, host, signer, chain_id, nonce, time).await {
            Ok(credentials) => Ok(credentials),
            Err(err) if err.kind() == Kind::Status => {
                tracing::debug!(error = %err, "api key creation refused, deriving instead");
                Self::derive_api_key(client, host, signer, chain_id, nonce, time).await
            }
            Err(err) => Err(err),
        }
    }

    async fn create_api_key(
        client: &ReqwestClient,
        host: &Url,
        signer: &PrivateKeySigner,
        chain_id: ChainId,
        nonce: Option<u32>,
        time: TimePolicy,
    ) -> Result<Credentials> {
        let request = client
            .request(Method::POST, host.join("auth/api-key")?)
            .build()?;
        let timestamp = Self::bootstrap_timestamp(client, host, time).await?;
        let headers = auth::l1::create_headers(signer, chain_id, timestamp, nonce).await?;

        crate::request(client, request, Some(headers)).await
    }

    async fn derive_api_key(
        client: &ReqwestClient,
        host: &Url,
        signer: &PrivateKeySigner,
        chain_id: ChainId,
        nonce: Option<u32>,
        time: TimePolicy,
    ) -> Result<Credentials> {
        let request = client
            .request(Method::GET, host.join("auth/derive-api-key")?)
            .build()?;
        let timestamp = Self::bootstrap_timestamp(client, host, time).await?;
        let headers = auth::l1::create_headers(signer, chain_id, timestamp, nonce).await?;

        crate::request(client, request, Some(headers)).await
    }

    /// Timestamp for auth headers before the client (and its offset cache)
    /// exists. `Server` costs one `GET /time` per call here.
    async fn bootstrap_timestamp(
        client: &ReqwestClient,
        host: &Url,
        time: TimePolicy,
    ) -> Result<Timestamp> {
        match time {
            TimePolicy::Local => Ok(Utc::now().timestamp()),
            TimePolicy::Server => Self::fetch_server_time(client, host).await,
        }
    }

    async fn resolve_timestamp(&self) -> Result<Timestamp> {
        match self.policies.time {
            TimePolicy::Local => Ok(Utc::now().timestamp()),
            TimePolicy::Server => {
                if let Some(offset) = self.time_offset.get() {
                    return Ok(Utc::now().timestamp() + offset);
                }
                let server = Self::fetch_server_time(&self.client, &self.host).await?;
                let offset = *self
                    .time_offset
                    .get_or_init(|| server - Utc::now().timestamp());
                Ok(Utc::now().timestamp() + offset)
            }
        }
    }

    async fn fetch_server_time(client: &ReqwestClient, host: &Url) -> Result<Timestamp> {
        let request = client.request(Method::GET, host.join("time")?).build()?;
        crate::request(client, request, None).await
    }

    async fn resolve_tick_size(&self, token_id: U256) -> Result<TickSize> {
        match self.policies.tick_size {
            FixedOrFetch::Fixed(tick_size) => Ok(tick_size),
            FixedOrFetch::FetchAndCache => {
                if let Some(tick_size) = self.tick_sizes.get(&token_id) {
                    return Ok(*tick_size);
                }
                let tick_size = self.fetch_tick_size(token_id).await?;
                self.tick_sizes.insert(token_id, tick_size);
                Ok(tick_size)
            }
        }
    }

    async fn resolve_neg_risk(&self, token_id: U256) -> Result<bool> {
        match self.policies.neg_risk {
            FixedOrFetch::Fixed(neg_risk) => Ok(neg_risk),
            FixedOrFetch::FetchAndCache => {
                if let Some(neg_risk) = self.neg_risks.get(&token_id) {
                    return Ok(*neg_risk);
                }
                let neg_risk = self.fetch_neg_risk(token_id).await?;
                self.neg_risks.insert(token_id, neg_risk);
                Ok(neg_risk)
            }
        }
    }

    async fn fetch_tick_size(&self, token_id: U256) -> Result<TickSize> {
        #[derive(Deserialize)]
        struct TickSizeResponse {
            minimum_tick_size: Decimal,
        }

        let request = self
            .client
            .request(Method::GET, self.endpoint("tick-size")?)
            .query(&[("token_id", token_id.to_string())])
            .build()?;
        let response: TickSizeResponse = crate::request(&self.client, request, None).await?;

        TickSize::try_from_decimal(response.minimum_tick_size)
    }

    async fn fetch_neg_risk(&self, token_id: U256) -> Result<bool> {
        #[derive(Deserialize)]
        struct NegRiskResponse {
            neg_risk: bool,
        }

        let request = self
            .client
            .request(Method::GET, self.endpoint("neg-risk")?)
            .query(&[("token_id", token_id.to_string())])
            .build()?;
        let response: NegRiskResponse = crate::request(&self.client, request, None).await?;

        Ok(response.neg_risk)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.host.join(path)?)
    }
}

/// Truncates to 6 decimals, pads to the fixed scale, and quantizes as an
/// integer number of base units.
fn to_fixed_u128(d: Decimal) -> Result<u128> {
    if d.is_sign_negative() {
        return Err(Error::validation(format!("amount cannot be negative: {d}")));
    }

    let mut scaled = d.trunc_with_scale(USDC_DECIMALS);
    scaled.rescale(USDC_DECIMALS);
    scaled.mantissa().to_u128().ok_or(Error::validation(format!(
        "unable to represent amount as u128: {d}"
    )))
}

/// Mask salt to <= 2^53 - 1 because backend parses as IEEE 754.
fn to_ieee_754_int(salt: u64) -> u64 {
    salt & ((1 << 53) - 1)
}

fn generate_seed() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards");
    let seconds = now.as_secs_f64();
    let random = rand::rng().random::<f64>();
    (seconds * random).round() as u64
}
