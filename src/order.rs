use std::borrow::Cow;

use alloy::dyn_abi::Eip712Domain;
use alloy::primitives::{Signature, U256};
use serde::ser::SerializeStruct as _;
use serde::{Serialize, Serializer};
use serde_with::{DisplayFromStr, serde_as};
use uuid::Uuid;

use crate::types::{Address, ChainId, OrderType, Side, SignatureType};

const DOMAIN_NAME: Option<Cow<'static, str>> = Some(Cow::Borrowed("Polymarket CTF Exchange"));
const DOMAIN_VERSION: Option<Cow<'static, str>> = Some(Cow::Borrowed("1"));

alloy::sol! {
    /// CTF exchange order, hashed and signed under EIP-712.
    #[derive(Debug)]
    struct Order {
        uint256 salt;
        address maker;
        address signer;
        address taker;
        uint256 tokenId;
        uint256 makerAmount;
        uint256 takerAmount;
        uint256 expiration;
        uint256 nonce;
        uint256 feeRateBps;
        uint8 side;
        uint8 signatureType;
    }
}

/// EIP-712 domain binding orders to one exchange deployment.
#[must_use]
pub fn signing_domain(chain_id: ChainId, exchange: Address) -> Eip712Domain {
    Eip712Domain {
        name: DOMAIN_NAME,
        version: DOMAIN_VERSION,
        chain_id: Some(U256::from(chain_id)),
        verifying_contract: Some(exchange),
        ..Eip712Domain::default()
    }
}

/// Signed order plus the submission envelope for `POST /order`.
///
/// Serializes as `{"order": {...}, "owner": "<api key>", "orderType": "GTC"}`
/// with the signature inside the order object.
#[derive(Clone, Debug)]
pub struct SignedOrder {
    pub order: Order,
    pub signature: Signature,
    pub order_type: OrderType,
    pub owner: Uuid,
}

impl SignedOrder {
    /// Wire view of the order, every field rendered as it is serialized.
    #[must_use]
    pub fn wire(&self) -> WireOrder {
        WireOrder {
            // salt is masked to 53 bits at construction
            salt: self.order.salt.to::<u64>(),
            maker: self.order.maker,
            signer: self.order.signer,
            taker: self.order.taker,
            token_id: self.order.tokenId,
            maker_amount: self.order.makerAmount,
            taker_amount: self.order.takerAmount,
            expiration: self.order.expiration,
            nonce: self.order.nonce,
            fee_rate_bps: self.order.feeRateBps,
            side: if self.order.side == Side::Sell as u8 {
                Side::Sell
            } else {
                Side::Buy
            },
            signature_type: match self.order.signatureType {
                1 => SignatureType::Proxy,
                2 => SignatureType::GnosisSafe,
                _ => SignatureType::Eoa,
            },
            signature: alloy::hex::encode_prefixed(self.signature.as_bytes()),
        }
    }
}

impl Serialize for SignedOrder {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SignedOrder", 3)?;
        state.serialize_field("order", &self.wire())?;
        state.serialize_field("owner", &self.owner)?;
        state.serialize_field("orderType", &self.order_type)?;
        state.end()
    }
}

/// Order fields exactly as `POST /order` carries them: salt as a JSON
/// integer, addresses checksummed, numeric fields as decimal strings,
/// side as `BUY`/`SELL`, signature type as an integer.
#[serde_as]
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WireOrder {
    pub salt: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub maker: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub signer: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub taker: Address,
    #[serde_as(as = "DisplayFromStr")]
    pub token_id: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub maker_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub taker_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub expiration: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub nonce: U256,
    #[serde_as(as = "DisplayFromStr")]
    pub fee_rate_bps: U256,
    pub side: Side,
    pub signature_type: SignatureType,
    pub signature: String,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use alloy::primitives::{Address, Signature, U256, address};
    use serde_json::json;
    use uuid::Uuid;

    use super::{Order, SignedOrder};
    use crate::types::OrderType;

    fn reference_order() -> Order {
        Order {
            salt: U256::from(479_249_096_354_u64),
            maker: address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
            signer: address!("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
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
    fn wire_json_matches_the_submission_shape() {
        let signed = SignedOrder {
            order: reference_order(),
            signature: Signature::new(U256::from(1), U256::from(2), false),
            order_type: OrderType::GTC,
            owner: Uuid::from_str("4f4f9a50-1ecb-4f82-9e61-032b7b6a9b52").unwrap(),
        };

        let value = serde_json::to_value(&signed).unwrap();
        let order = &value["order"];

        assert_eq!(order["salt"], json!(479_249_096_354_u64), "salt is a JSON integer");
        assert_eq!(order["maker"], "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266");
        assert_eq!(order["taker"], "0x0000000000000000000000000000000000000000");
        assert_eq!(
            order["tokenId"],
            "11862165566757345985240476164489718219056735011698825377388402888080786399275"
        );
        assert_eq!(order["makerAmount"], "165000");
        assert_eq!(order["takerAmount"], "1100000");
        assert_eq!(order["expiration"], "0");
        assert_eq!(order["nonce"], "0");
        assert_eq!(order["feeRateBps"], "0");
        assert_eq!(order["side"], "BUY");
        assert_eq!(order["signatureType"], json!(0));
        assert!(
            order["signature"].as_str().unwrap().starts_with("0x"),
            "signature rides inside the order object"
        );

        assert_eq!(value["owner"], "4f4f9a50-1ecb-4f82-9e61-032b7b6a9b52");
        assert_eq!(value["orderType"], "GTC");
        assert!(value.get("postOnly").is_none());
    }

    #[test]
    fn wire_signature_is_sixty_five_bytes_hex() {
        let signed = SignedOrder {
            order: reference_order(),
            signature: Signature::new(U256::from(1), U256::from(2), true),
            order_type: OrderType::GTC,
            owner: Uuid::nil(),
        };
        let wire = signed.wire();
        // 0x + 65 bytes
        assert_eq!(wire.signature.len(), 2 + 130);
        assert!(wire.signature.ends_with("1c"), "parity true maps to v=28");
    }
}
