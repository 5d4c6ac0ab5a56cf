use thiserror::Error;

use crate::pubkey::Pubkey;

/// Transaction construction and codec errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolError {
    #[error("decode error: {0}")]
    Decode(String),

    #[error("no valid program derived address bump seed found")]
    DerivationExhausted,

    #[error("invalid seeds: {0}")]
    InvalidSeeds(String),

    #[error("missing keypair for signer {0}")]
    MissingSigner(Pubkey),

    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error("serialization limit exceeded: {0}")]
    SerializationLimitExceeded(String),

    #[error("invalid instruction: {0}")]
    InvalidInstruction(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_decode() {
        let err = SolError::Decode("invalid base58 character".into());
        assert_eq!(err.to_string(), "decode error: invalid base58 character");
    }

    #[test]
    fn display_derivation_exhausted() {
        assert_eq!(
            SolError::DerivationExhausted.to_string(),
            "no valid program derived address bump seed found"
        );
    }

    #[test]
    fn display_missing_signer_shows_base58_key() {
        let err = SolError::MissingSigner(Pubkey::new_from_array([0u8; 32]));
        assert_eq!(
            err.to_string(),
            "missing keypair for signer 11111111111111111111111111111111"
        );
    }

    #[test]
    fn display_invalid_key_length() {
        let err = SolError::InvalidKeyLength {
            expected: 32,
            actual: 31,
        };
        assert_eq!(
            err.to_string(),
            "invalid key length: expected 32 bytes, got 31"
        );
    }

    #[test]
    fn display_serialization_limit_exceeded() {
        let err = SolError::SerializationLimitExceeded("too many accounts".into());
        assert_eq!(
            err.to_string(),
            "serialization limit exceeded: too many accounts"
        );
    }

    #[test]
    fn error_trait_is_implemented() {
        let err: Box<dyn std::error::Error> = Box::new(SolError::InvalidSeeds("test".into()));
        assert!(err.to_string().contains("test"));
    }

    #[test]
    fn debug_format_works() {
        let err = SolError::DerivationExhausted;
        let debug = format!("{:?}", err);
        assert!(debug.contains("DerivationExhausted"));
    }
}
