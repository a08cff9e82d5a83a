use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use serde::Serialize;
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::Result;
use crate::error::Error;

pub use alloy::primitives::{Address, U256};
pub use rust_decimal::Decimal;

/// EVM chain identifier.
pub type ChainId = u64;

/// Order side, `BUY` or `SELL` on the wire.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum_macros::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
#[non_exhaustive]
#[repr(u8)]
pub enum Side {
    Buy = 0,
    Sell = 1,
}

impl FromStr for Side {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(Error::validation(format!(
                "invalid side `{other}`; expected BUY or SELL"
            ))),
        }
    }
}

/// Signature scheme the exchange verifies the order against.
///
/// `Eoa` signs with the wallet key directly; the proxy schemes sign on
/// behalf of a funder contract.
#[derive(
    Clone, Copy, Debug, Default, Deserialize_repr, Eq, PartialEq, Serialize_repr,
)]
#[non_exhaustive]
#[repr(u8)]
pub enum SignatureType {
    #[default]
    Eoa = 0,
    Proxy = 1,
    GnosisSafe = 2,
}

/// Order lifetime policy.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, strum_macros::Display)]
#[non_exhaustive]
pub enum OrderType {
    /// Good till cancelled.
    GTC,
    /// Good till date; the only type that may carry an expiration.
    GTD,
    /// Fill or kill.
    FOK,
    /// Fill and kill.
    FAK,
}

/// Minimum price increment of a market.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum TickSize {
    Tenth,
    Hundredth,
    Thousandth,
    TenThousandth,
}

impl TickSize {
    #[must_use]
    pub fn as_decimal(self) -> Decimal {
        match self {
            TickSize::Tenth => dec!(0.1),
            TickSize::Hundredth => dec!(0.01),
            TickSize::Thousandth => dec!(0.001),
            TickSize::TenThousandth => dec!(0.0001),
        }
    }

    /// Maps a reported minimum tick to the enum, tolerating trailing zeros.
    pub fn try_from_decimal(value: Decimal) -> Result<Self> {
        let normalized = value.normalize();
        if normalized == dec!(0.1) {
            Ok(TickSize::Tenth)
        } else if normalized == dec!(0.01) {
            Ok(TickSize::Hundredth)
        } else if normalized == dec!(0.001) {
            Ok(TickSize::Thousandth)
        } else if normalized == dec!(0.0001) {
            Ok(TickSize::TenThousandth)
        } else {
            Err(Error::validation(format!("unsupported tick size {value}")))
        }
    }
}

impl fmt::Display for TickSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_decimal())
    }
}

impl FromStr for TickSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let value = Decimal::from_str(s.trim())
            .map_err(|e| Error::validation(format!("invalid tick size `{s}`: {e}")))?;
        Self::try_from_decimal(value)
    }
}

/// Input values for a single limit order.
#[derive(Clone, Debug)]
pub struct LimitOrderRequest {
    pub token_id: U256,
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
    pub nonce: Option<u64>,
    pub expiration: Option<DateTime<Utc>>,
    pub taker: Option<Address>,
    pub order_type: Option<OrderType>,
}

impl LimitOrderRequest {
    #[must_use]
    pub fn new(token_id: U256, side: Side, price: Decimal, size: Decimal) -> Self {
        Self {
            token_id,
            side,
            price,
            size,
            nonce: None,
            expiration: None,
            taker: None,
            order_type: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr as _;

    use rust_decimal_macros::dec;

    use super::{Side, TickSize};
    use crate::error::Kind;

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!(Side::from_str("BUY").unwrap(), Side::Buy);
        assert_eq!(Side::from_str("sell").unwrap(), Side::Sell);
        assert_eq!(Side::from_str(" Buy ").unwrap(), Side::Buy);

        let err = Side::from_str("HOLD").unwrap_err();
        assert_eq!(err.kind(), Kind::Validation);
    }

    #[test]
    fn side_displays_wire_names() {
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn tick_size_round_trips_through_strings() {
        for (text, tick) in [
            ("0.1", TickSize::Tenth),
            ("0.01", TickSize::Hundredth),
            ("0.001", TickSize::Thousandth),
            ("0.0001", TickSize::TenThousandth),
        ] {
            assert_eq!(TickSize::from_str(text).unwrap(), tick);
            assert_eq!(tick.to_string(), text);
        }
    }

    #[test]
    fn tick_size_scale_matches_decimal_places() {
        assert_eq!(TickSize::Tenth.as_decimal().scale(), 1);
        assert_eq!(TickSize::Hundredth.as_decimal().scale(), 2);
        assert_eq!(TickSize::Thousandth.as_decimal().scale(), 3);
        assert_eq!(TickSize::TenThousandth.as_decimal().scale(), 4);
    }

    #[test]
    fn tick_size_tolerates_trailing_zeros() {
        assert_eq!(
            TickSize::try_from_decimal(dec!(0.0100)).unwrap(),
            TickSize::Hundredth
        );
        assert!(TickSize::try_from_decimal(dec!(0.05)).is_err());
    }
}
