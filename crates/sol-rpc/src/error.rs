use sol_core::{Signature, SolError};
use thiserror::Error;

/// Errors from talking to a Solana JSON-RPC node.
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("http error: {0}")]
    Http(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("node reported signature {actual}, expected {expected}")]
    SignatureMismatch {
        expected: Signature,
        actual: Signature,
    },

    #[error(transparent)]
    Core(#[from] SolError),
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<serde_json::Error> for RpcError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RpcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_rpc() {
        let err = RpcError::Rpc {
            code: -32002,
            message: "Transaction simulation failed".into(),
        };
        assert_eq!(
            err.to_string(),
            "rpc error -32002: Transaction simulation failed"
        );
    }

    #[test]
    fn core_errors_pass_through() {
        let err: RpcError = SolError::Decode("bad blockhash".into()).into();
        assert_eq!(err.to_string(), "decode error: bad blockhash");
    }

    #[test]
    fn json_errors_become_parse() {
        let json_err = serde_json::from_str::<u64>("nope").unwrap_err();
        assert!(matches!(RpcError::from(json_err), RpcError::Parse(_)));
    }
}
