use std::error::Error as _;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use url::Url;

use polymarket_order_probe::client::{Client, ClientConfig};
use polymarket_order_probe::config::{EnvFile, Settings};
use polymarket_order_probe::policy::{FixedOrFetch, Policies};
use polymarket_order_probe::response::{Outcome, PostOrderResponse};
use polymarket_order_probe::types::{Decimal, LimitOrderRequest, Side, TickSize, U256};
use polymarket_order_probe::{POLYGON, Result};

/// Market the probe trades against when no token is given. One YES token
/// of a long-resolved market; harmless to bid on at a low price.
const DEFAULT_TOKEN_ID: &str =
    "11862165566757345985240476164489718219056735011698825377388402888080786399275";

/// Signs one test limit order, prints every field for diffing against
/// another client implementation, submits it, and reports the verdict.
///
/// Exit codes: 0 order accepted, 1 order rejected, 2 unrecognized
/// response, 3 fatal error before a verdict.
#[derive(Debug, Parser)]
#[command(name = "polymarket-order-probe", version, about)]
struct Args {
    /// Credentials file, KEY=VALUE per line.
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// CLOB REST endpoint.
    #[arg(long, default_value = "https://clob.polymarket.com")]
    host: Url,

    /// Chain the order settles on (137 = Polygon mainnet).
    #[arg(long, default_value_t = POLYGON)]
    chain_id: u64,

    /// Outcome token to trade.
    #[arg(long, default_value = DEFAULT_TOKEN_ID)]
    token_id: U256,

    /// Limit price in USDC.
    #[arg(long, default_value = "0.15")]
    price: Decimal,

    /// Size in outcome tokens.
    #[arg(long, default_value = "1.1")]
    size: Decimal,

    /// BUY or SELL.
    #[arg(long, default_value_t = Side::Buy)]
    side: Side,

    /// Minimum price increment of the market.
    #[arg(long, default_value = "0.01")]
    tick_size: TickSize,

    /// Sign against the neg-risk exchange contract.
    #[arg(long)]
    neg_risk: bool,

    /// Ask the service for tick size and neg-risk instead of trusting
    /// `--tick-size` and `--neg-risk`.
    #[arg(long)]
    fetch_market_params: bool,

    /// Build, sign, and print the order without submitting it.
    #[arg(long)]
    paper: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();
    match run(args).await {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            println!("\n❌ FATAL: {err}");
            let mut source = err.source();
            while let Some(cause) = source {
                println!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::from(3)
        }
    }
}

async fn run(args: Args) -> Result<u8> {
    println!("=== Polymarket Order Probe ===\n");
    println!("Host: {}", args.host);
    println!("Chain id: {}", args.chain_id);

    let env = EnvFile::load(&args.env_file)?;
    let settings = Settings::from_env_file(&env)?;

    let policies = if args.fetch_market_params {
        Policies {
            tick_size: FixedOrFetch::FetchAndCache,
            neg_risk: FixedOrFetch::FetchAndCache,
            ..Policies::default()
        }
    } else {
        Policies {
            tick_size: FixedOrFetch::Fixed(args.tick_size),
            neg_risk: FixedOrFetch::Fixed(args.neg_risk),
            ..Policies::default()
        }
    };
    let config = ClientConfig::builder()
        .host(args.host)
        .chain_id(args.chain_id)
        .private_key(settings.private_key)
        .policies(policies)
        .build();

    let client = match settings.credentials {
        Some(credentials) => Client::with_credentials(config, credentials)?,
        None => {
            println!("\nNo API credentials on file, deriving them via wallet signature...");
            Client::bootstrap(config).await?
        }
    };

    println!("Signer: {}", client.address());
    println!("API key: {}", client.credentials().key());
    println!("Token: {}", args.token_id);

    println!("\n=== Building Order ===");
    println!("Price: ${}", args.price);
    println!("Size: ${}", args.size);
    println!("Side: {}", args.side);

    let request = LimitOrderRequest::new(args.token_id, args.side, args.price, args.size);

    println!("\nBuilding and signing order...");
    let signed = client.sign_limit_order(&request).await?;
    println!("✓ Order signed successfully");

    let wire = signed.wire();
    println!("\n=== Signed Order ===");
    println!("Salt: {}", wire.salt);
    println!("Maker: {}", wire.maker);
    println!("Signer: {}", wire.signer);
    println!("Taker: {}", wire.taker);
    println!("TokenId: {}", wire.token_id);
    println!("MakerAmount: {}", wire.maker_amount);
    println!("TakerAmount: {}", wire.taker_amount);
    println!("Side: {}", wire.side);
    println!("FeeRateBps: {}", wire.fee_rate_bps);
    println!("Nonce: {}", wire.nonce);
    println!("Expiration: {}", wire.expiration);
    println!("SignatureType: {}", wire.signature_type as u8);
    println!("Signature: {}", wire.signature);
    println!("{}", "=".repeat(50));

    let response = if args.paper {
        println!("\nPaper mode, not submitting...");
        PostOrderResponse::paper(&signed)
    } else {
        println!("\nPlacing order...");
        client.post_order(&signed).await?
    };

    println!("\n=== Order Response ===");
    println!("Success: {}", response.success.unwrap_or(false));
    println!("Order ID: {}", response.order_id.as_deref().unwrap_or_default());
    println!("Error: {}", response.error_msg.as_deref().unwrap_or_default());
    println!("Status: {}", response.status.as_deref().unwrap_or_default());

    let outcome = response.outcome();
    match outcome {
        Outcome::Accepted => {
            println!("\n✅ ORDER PLACED SUCCESSFULLY");
            println!("Order ID: {}", response.order_id.as_deref().unwrap_or_default());
        }
        Outcome::Rejected => {
            println!(
                "\n❌ ORDER FAILED: {}",
                response.error_msg.as_deref().unwrap_or_default()
            );
        }
        Outcome::Unrecognized => {
            println!("\n⚠️  UNKNOWN RESULT");
            println!("Full response: {response:?}");
        }
    }

    Ok(outcome.exit_code())
}
