//! Solana public keys.
//!
//! A Solana address is the Base58 encoding of a raw 32-byte Ed25519 public
//! key (or of an off-curve program derived address). No hashing step is
//! involved: the key bytes are the address bytes.

use std::fmt;
use std::str::FromStr;

use crate::codec;
use crate::error::SolError;

/// Length of a public key in bytes.
pub const PUBKEY_BYTES: usize = 32;

/// A 32-byte account address. Always fully populated.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new_from_array(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    /// Build a key from a byte slice that must be exactly 32 bytes long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self, SolError> {
        let arr: [u8; PUBKEY_BYTES] =
            bytes.try_into().map_err(|_| SolError::InvalidKeyLength {
                expected: PUBKEY_BYTES,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    pub fn to_bytes(self) -> [u8; PUBKEY_BYTES] {
        self.0
    }

    pub fn as_array(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }

    /// Whether these bytes decompress to a point on the Ed25519 curve.
    ///
    /// Wallet keys are on the curve; program derived addresses never are.
    pub fn is_on_curve(&self) -> bool {
        bytes_are_curve_point(&self.0)
    }
}

/// Check if 32 bytes are a valid compressed Edwards Y coordinate.
pub(crate) fn bytes_are_curve_point(bytes: &[u8; PUBKEY_BYTES]) -> bool {
    curve25519_dalek::edwards::CompressedEdwardsY(*bytes)
        .decompress()
        .is_some()
}

impl FromStr for Pubkey {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        codec::decode_base58_32(s).map(Self)
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::base58_encode(&self.0))
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({self})")
    }
}

impl From<[u8; PUBKEY_BYTES]> for Pubkey {
    fn from(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Pubkey {
    type Error = SolError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::try_from_slice(bytes)
    }
}

impl AsRef<[u8]> for Pubkey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The System Program address is 32 zero bytes.
    #[test]
    fn system_program_address() {
        let key = Pubkey::default();
        assert_eq!(key.to_string(), "11111111111111111111111111111111");
    }

    #[test]
    fn parse_and_display_roundtrip() {
        let address = "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA";
        let key: Pubkey = address.parse().unwrap();
        assert_eq!(key.to_string(), address);
    }

    #[test]
    fn well_known_address_parses() {
        // Memo Program v2
        let key: Pubkey = "MemoSq4gqABAXKb96qnH8TysNcWxMyWCqXgDLGmfcHr".parse().unwrap();
        assert_eq!(key.as_ref().len(), PUBKEY_BYTES);
    }

    #[test]
    fn parse_garbage_is_decode_error() {
        let err = "not-a-valid-address!!!".parse::<Pubkey>().unwrap_err();
        assert!(matches!(err, SolError::Decode(_)));
    }

    #[test]
    fn parse_wrong_length_is_rejected() {
        assert!("1".parse::<Pubkey>().is_err());
        assert!("StV1DL6CwTryKyV".parse::<Pubkey>().is_err());
    }

    #[test]
    fn try_from_slice_checks_length() {
        assert!(Pubkey::try_from_slice(&[7u8; 32]).is_ok());
        assert_eq!(
            Pubkey::try_from_slice(&[7u8; 31]).unwrap_err(),
            SolError::InvalidKeyLength {
                expected: 32,
                actual: 31
            }
        );
        assert!(Pubkey::try_from(&[7u8; 33][..]).is_err());
    }

    #[test]
    fn debug_shows_base58() {
        let key = Pubkey::new_from_array([0u8; 32]);
        assert_eq!(
            format!("{key:?}"),
            "Pubkey(11111111111111111111111111111111)"
        );
    }

    #[test]
    fn basepoint_is_on_curve() {
        let mut basepoint = [0x66u8; 32];
        basepoint[0] = 0x58;
        assert!(Pubkey::new_from_array(basepoint).is_on_curve());
    }

    #[test]
    fn arbitrary_bytes_can_be_off_curve() {
        assert!(!Pubkey::new_from_array([0x02; 32]).is_on_curve());
    }
}
