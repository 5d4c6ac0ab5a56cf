//! Ed25519 signatures over serialized messages.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::VerifyingKey;

use crate::codec;
use crate::error::SolError;
use crate::keypair::Keypair;
use crate::message::Message;
use crate::pubkey::Pubkey;

pub const SIGNATURE_BYTES: usize = 64;

/// A 64-byte Ed25519 signature. The first signature of a transaction is its
/// id, displayed in Base58.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_BYTES]);

impl Signature {
    pub const fn new_from_array(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; SIGNATURE_BYTES] {
        self.0
    }

    pub fn as_array(&self) -> &[u8; SIGNATURE_BYTES] {
        &self.0
    }

    /// Strict Ed25519 verification of this signature over `message`.
    pub fn verify(&self, pubkey: &Pubkey, message: &[u8]) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(pubkey.as_array()) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&self.0);
        key.verify_strict(message, &signature).is_ok()
    }
}

impl FromStr for Signature {
    type Err = SolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = codec::base58_decode(s)?;
        let arr: [u8; SIGNATURE_BYTES] = bytes.try_into().map_err(|v: Vec<u8>| {
            SolError::Decode(format!("expected {SIGNATURE_BYTES} bytes, got {}", v.len()))
        })?;
        Ok(Self(arr))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&codec::base58_encode(&self.0))
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({self})")
    }
}

/// Sign `message` once per required signer, in account-table order.
///
/// Each signer key is matched to a keypair by public key. A signer with no
/// matching keypair is an error; no placeholder signature is ever emitted.
/// Keypairs that match no signer are ignored.
pub fn sign_message(message: &Message, keypairs: &[&Keypair]) -> Result<Vec<Signature>, SolError> {
    let message_bytes = message.serialize()?;

    message
        .signer_keys()
        .iter()
        .map(|signer| {
            keypairs
                .iter()
                .find(|kp| kp.pubkey() == *signer)
                .map(|kp| kp.sign_message(&message_bytes))
                .ok_or(SolError::MissingSigner(*signer))
        })
        .collect()
}
