use std::fmt;

use reqwest::StatusCode;

use crate::types::ChainId;

/// Coarse error classification, for matching without destructuring.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::Display)]
#[strum(serialize_all = "snake_case")]
pub enum Kind {
    /// Configuration file or client configuration problems.
    Config,
    /// Inputs that cannot produce a well-formed order.
    Validation,
    /// Key handling, hashing, or header assembly failures.
    Signing,
    /// Transport-level failures before a response was read.
    Request,
    /// Non-2xx HTTP responses, with the body preserved.
    Status,
    /// Response bodies that do not match the expected shape.
    Decode,
}

/// Crate-wide error type.
pub struct Error {
    kind: Kind,
    message: String,
    status: Option<StatusCode>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    pub(crate) fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
            source: None,
        }
    }

    pub(crate) fn with_source(
        kind: Kind,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            kind,
            message: source.to_string(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(Kind::Config, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(Kind::Validation, message)
    }

    pub fn signing(message: impl Into<String>) -> Self {
        Self::new(Kind::Signing, message)
    }

    pub fn status(status: StatusCode, body: impl Into<String>) -> Self {
        let mut err = Self::new(Kind::Status, body);
        err.status = Some(status);
        err
    }

    pub(crate) fn missing_contract_config(chain_id: ChainId, neg_risk: bool) -> Self {
        Self::new(
            Kind::Config,
            format!("no exchange contract known for chain id {chain_id} (neg_risk={neg_risk})"),
        )
    }

    #[must_use]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// HTTP status code, for `Kind::Status` errors.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        self.status
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "{}: HTTP {status}: {}", self.kind, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Error")
            .field("kind", &self.kind)
            .field("message", &self.message)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::with_source(Kind::Config, source)
    }
}

impl From<url::ParseError> for Error {
    fn from(source: url::ParseError) -> Self {
        Self::with_source(Kind::Config, source)
    }
}

impl From<reqwest::Error> for Error {
    fn from(source: reqwest::Error) -> Self {
        Self::with_source(Kind::Request, source)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(source: reqwest::header::InvalidHeaderValue) -> Self {
        Self::with_source(Kind::Signing, source)
    }
}

impl From<alloy::signers::Error> for Error {
    fn from(source: alloy::signers::Error) -> Self {
        Self::with_source(Kind::Signing, source)
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::with_source(Kind::Decode, source)
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for Error {
    fn from(source: serde_path_to_error::Error<serde_json::Error>) -> Self {
        Self::with_source(Kind::Decode, source)
    }
}

#[cfg(test)]
mod tests {
    use super::{Error, Kind};

    #[test]
    fn display_includes_kind_and_message() {
        let err = Error::validation("size must be positive");
        assert_eq!(err.to_string(), "validation: size must be positive");
        assert_eq!(err.kind(), Kind::Validation);
    }

    #[test]
    fn status_errors_carry_the_code() {
        let err = Error::status(reqwest::StatusCode::BAD_REQUEST, "invalid order");
        assert_eq!(err.kind(), Kind::Status);
        assert_eq!(
            err.status_code(),
            Some(reqwest::StatusCode::BAD_REQUEST),
            "constructor should preserve the status code"
        );
        assert_eq!(err.to_string(), "status: HTTP 400 Bad Request: invalid order");
    }
}
