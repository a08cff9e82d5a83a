//! Known-answer checks for the two EIP-712 surfaces, pinned against an
//! independent implementation so an encoding drift fails loudly.

use std::str::FromStr as _;

use alloy::primitives::{Address, U256, address, b256, hex};
use alloy::signers::Signer as _;
use alloy::signers::local::PrivateKeySigner;
use alloy::sol_types::SolStruct as _;

use polymarket_order_probe::auth::l1::{self, ClobAuth};
use polymarket_order_probe::order::{Order, signing_domain};
use polymarket_order_probe::{POLYGON, contract_config};

const HARDHAT_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const HARDHAT_ADDRESS: Address = address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");

fn reference_order() -> Order {
    Order {
        salt: U256::from(479_249_096_354_u64),
        maker: HARDHAT_ADDRESS,
        signer: HARDHAT_ADDRESS,
        taker: Address::ZERO,
        tokenId: U256::from_str(
            "11862165566757345985240476164489718219056735011698825377388402888080786399275",
        )
        .unwrap(),
        makerAmount: U256::from(165_000_u64),
        takerAmount: U256::from(1_100_000_u64),
        expiration: U256::ZERO,
        nonce: U256::ZERO,
        feeRateBps: U256::ZERO,
        side: 0,
        signatureType: 0,
    }
}

#[test]
fn order_type_string_matches_the_exchange_contract() {
    assert_eq!(
        Order::eip712_root_type(),
        "Order(uint256 salt,address maker,address signer,address taker,uint256 tokenId,\
         uint256 makerAmount,uint256 takerAmount,uint256 expiration,uint256 nonce,\
         uint256 feeRateBps,uint8 side,uint8 signatureType)"
    );
}

#[test]
fn clob_auth_type_string_matches_the_service() {
    assert_eq!(
        ClobAuth::eip712_root_type(),
        "ClobAuth(address address,string timestamp,uint256 nonce,string message)"
    );
}

#[test]
fn order_signing_hash_is_stable() {
    let exchange = contract_config(POLYGON, false).unwrap().exchange;
    assert_eq!(exchange, address!("0x4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E"));

    let domain = signing_domain(POLYGON, exchange);
    assert_eq!(
        reference_order().eip712_signing_hash(&domain),
        b256!("0xfcc2389f4f115f3067b91527196b23046ad152e9a2f506120dc8e3e43e94069a")
    );
}

#[test]
fn neg_risk_markets_sign_against_a_different_exchange() {
    let standard = contract_config(POLYGON, false).unwrap().exchange;
    let neg_risk = contract_config(POLYGON, true).unwrap().exchange;
    assert_ne!(standard, neg_risk);

    let order = reference_order();
    assert_ne!(
        order.eip712_signing_hash(&signing_domain(POLYGON, standard)),
        order.eip712_signing_hash(&signing_domain(POLYGON, neg_risk))
    );
}

#[tokio::test]
async fn order_signature_matches_the_reference_vector() {
    let signer = PrivateKeySigner::from_str(HARDHAT_KEY)
        .unwrap()
        .with_chain_id(Some(POLYGON));
    assert_eq!(signer.address(), HARDHAT_ADDRESS);

    let exchange = contract_config(POLYGON, false).unwrap().exchange;
    let hash = reference_order().eip712_signing_hash(&signing_domain(POLYGON, exchange));
    let signature = signer.sign_hash(&hash).await.unwrap();

    assert_eq!(
        hex::encode_prefixed(signature.as_bytes()),
        "0x0696cb2e9a9db8be3689855608cb6e25f56eb4e91de0d3c31cc7ac6f7ad787f0\
         1c6dd1032dd6d4a6ffbb205d9dea57e6b6c96ea59d203b66b74035bef9760107\
         1c"
    );
    assert_eq!(
        signature.recover_address_from_prehash(&hash).unwrap(),
        HARDHAT_ADDRESS
    );
}

#[tokio::test]
async fn l1_headers_carry_the_reference_attestation() {
    let signer = PrivateKeySigner::from_str(HARDHAT_KEY)
        .unwrap()
        .with_chain_id(Some(POLYGON));
    let headers = l1::create_headers(&signer, POLYGON, 1_700_000_000, None)
        .await
        .unwrap();

    assert_eq!(
        headers.get("poly_address").unwrap(),
        "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
    );
    assert_eq!(headers.get("poly_timestamp").unwrap(), "1700000000");
    assert_eq!(headers.get("poly_nonce").unwrap(), "0");
    assert_eq!(
        headers.get("poly_signature").unwrap(),
        "0x659ed4b28ae28e0f038fdf0023c00863c9559caacb9ebc83f44eea87059a099a\
         36f1e1dee110e7faa1c4f65d17489b2da1333ebef78bbe2116d81207b975052d\
         1c"
    );
}

#[tokio::test]
async fn l1_nonce_changes_the_attestation() {
    let signer = PrivateKeySigner::from_str(HARDHAT_KEY)
        .unwrap()
        .with_chain_id(Some(POLYGON));
    let default_nonce = l1::create_headers(&signer, POLYGON, 1_700_000_000, None)
        .await
        .unwrap();
    let explicit = l1::create_headers(&signer, POLYGON, 1_700_000_000, Some(7))
        .await
        .unwrap();

    assert_eq!(explicit.get("poly_nonce").unwrap(), "7");
    assert_ne!(
        default_nonce.get("poly_signature").unwrap(),
        explicit.get("poly_signature").unwrap()
    );
}
