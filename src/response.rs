use serde::Deserialize;
use uuid::Uuid;

use crate::order::SignedOrder;

/// Response body of `POST /order`.
///
/// Every field is optional: the service has shipped several shapes over
/// time, and classification must not fail on an unexpected one.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostOrderResponse {
    pub success: Option<bool>,
    pub error_msg: Option<String>,
    #[serde(rename = "orderID", alias = "orderId")]
    pub order_id: Option<String>,
    #[serde(alias = "transactionsHashes")]
    pub order_hashes: Option<Vec<String>>,
    pub status: Option<String>,
    pub taking_amount: Option<String>,
    pub making_amount: Option<String>,
}

impl PostOrderResponse {
    /// Classifies the response. A populated `errorMsg` wins over an order
    /// id, even when both are present.
    #[must_use]
    pub fn outcome(&self) -> Outcome {
        if self.error_msg.as_deref().is_some_and(|msg| !msg.is_empty()) {
            return Outcome::Rejected;
        }
        if self.order_id.as_deref().is_some_and(|id| !id.is_empty()) {
            return Outcome::Accepted;
        }
        Outcome::Unrecognized
    }

    /// Synthetic accepted response for paper submissions.
    #[must_use]
    pub fn paper(signed_order: &SignedOrder) -> Self {
        let wire = signed_order.wire();
        Self {
            success: Some(true),
            error_msg: None,
            order_id: Some(format!("paper-{}", Uuid::new_v4())),
            order_hashes: None,
            status: Some("live".to_owned()),
            taking_amount: Some(wire.taker_amount.to_string()),
            making_amount: Some(wire.maker_amount.to_string()),
        }
    }
}

/// The three recognized submission outcomes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// An order id was assigned.
    Accepted,
    /// The service rejected the order with an error message.
    Rejected,
    /// Neither an order id nor an error message was present.
    Unrecognized,
}

impl Outcome {
    /// Process exit code the probe reports for this outcome.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Outcome::Accepted => 0,
            Outcome::Rejected => 1,
            Outcome::Unrecognized => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Outcome, PostOrderResponse};

    fn response(error_msg: Option<&str>, order_id: Option<&str>) -> PostOrderResponse {
        PostOrderResponse {
            error_msg: error_msg.map(str::to_owned),
            order_id: order_id.map(str::to_owned),
            ..PostOrderResponse::default()
        }
    }

    #[test]
    fn order_id_alone_is_accepted() {
        let outcome = response(None, Some("abc123")).outcome();
        assert_eq!(outcome, Outcome::Accepted);
        assert_eq!(outcome.exit_code(), 0);
    }

    #[test]
    fn error_message_alone_is_rejected() {
        let outcome = response(Some("not enough balance / allowance"), None).outcome();
        assert_eq!(outcome, Outcome::Rejected);
        assert_eq!(outcome.exit_code(), 1);
    }

    #[test]
    fn error_message_wins_when_both_are_present() {
        assert_eq!(
            response(Some("bad"), Some("x")).outcome(),
            Outcome::Rejected,
            "errorMsg takes priority over orderID"
        );
    }

    #[test]
    fn empty_fields_count_as_absent() {
        assert_eq!(response(Some(""), Some("abc")).outcome(), Outcome::Accepted);
        assert_eq!(response(Some(""), Some("")).outcome(), Outcome::Unrecognized);
        let outcome = response(None, None).outcome();
        assert_eq!(outcome, Outcome::Unrecognized);
        assert_eq!(outcome.exit_code(), 2);
    }

    #[test]
    fn deserializes_both_order_id_spellings() {
        let upper: PostOrderResponse =
            serde_json::from_str(r#"{"orderID": "abc"}"#).unwrap();
        let lower: PostOrderResponse =
            serde_json::from_str(r#"{"orderId": "abc"}"#).unwrap();
        assert_eq!(upper.order_id.as_deref(), Some("abc"));
        assert_eq!(lower.order_id.as_deref(), Some("abc"));
    }

    #[test]
    fn deserializes_the_full_success_shape() {
        let response: PostOrderResponse = serde_json::from_str(
            r#"{
                "success": true,
                "errorMsg": "",
                "orderID": "0x9aa",
                "transactionsHashes": ["0x1"],
                "status": "live",
                "takingAmount": "1100000",
                "makingAmount": "165000"
            }"#,
        )
        .unwrap();
        assert_eq!(response.outcome(), Outcome::Accepted);
        assert_eq!(response.status.as_deref(), Some("live"));
        assert_eq!(response.order_hashes.as_deref(), Some(["0x1".to_owned()].as_slice()));
    }

    #[test]
    fn empty_object_is_unrecognized() {
        let response: PostOrderResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.outcome(), Outcome::Unrecognized);
    }
}
