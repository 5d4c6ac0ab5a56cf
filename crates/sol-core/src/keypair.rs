//! Ed25519 keypairs.
//!
//! The 64-byte export layout is `seed (32) || public key (32)`, the format
//! used by Solana CLI keypair files and browser wallets. The public half is
//! always derived from the seed and never trusted as given.

use std::fmt;

use ed25519_dalek::{Signer as _, SigningKey};
use rand::rngs::OsRng;
use zeroize::{Zeroize, Zeroizing};

use crate::codec;
use crate::error::SolError;
use crate::pubkey::{Pubkey, PUBKEY_BYTES};
use crate::signer::Signature;

/// Length of the Ed25519 seed (secret scalar source).
pub const SECRET_KEY_BYTES: usize = 32;

/// Length of the exported `seed || public key` keypair.
pub const KEYPAIR_BYTES: usize = SECRET_KEY_BYTES + PUBKEY_BYTES;

/// A signing key together with its derived public key.
///
/// The secret is zeroized when the keypair is dropped.
pub struct Keypair {
    signing_key: SigningKey,
    pubkey: Pubkey,
}

impl Keypair {
    /// Generate a fresh keypair from OS randomness.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    /// Build a keypair from a 32-byte Ed25519 seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_BYTES]) -> Self {
        let mut seed = *seed;
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        Self::from_signing_key(signing_key)
    }

    /// Build a keypair from its 64-byte `seed || public key` form.
    ///
    /// The public key is re-derived from the seed; if the stored public half
    /// disagrees the bytes are rejected.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SolError> {
        if bytes.len() != KEYPAIR_BYTES {
            return Err(SolError::InvalidKeyLength {
                expected: KEYPAIR_BYTES,
                actual: bytes.len(),
            });
        }

        let mut seed = [0u8; SECRET_KEY_BYTES];
        seed.copy_from_slice(&bytes[..SECRET_KEY_BYTES]);
        let keypair = Self::from_seed(&seed);
        seed.zeroize();

        if keypair.pubkey.as_ref() != &bytes[SECRET_KEY_BYTES..] {
            return Err(SolError::InvalidKeypair(
                "public key does not match secret seed".into(),
            ));
        }

        Ok(keypair)
    }

    /// Parse the Base58 export of a 64-byte keypair.
    pub fn from_base58_string(s: &str) -> Result<Self, SolError> {
        let bytes = Zeroizing::new(codec::base58_decode(s)?);
        Self::from_bytes(&bytes)
    }

    pub fn pubkey(&self) -> Pubkey {
        self.pubkey
    }

    /// Ed25519 signature over `message` exactly as given.
    pub fn sign_message(&self, message: &[u8]) -> Signature {
        Signature::new_from_array(self.signing_key.sign(message).to_bytes())
    }

    /// The 64-byte `seed || public key` form.
    pub fn to_bytes(&self) -> Zeroizing<[u8; KEYPAIR_BYTES]> {
        Zeroizing::new(self.signing_key.to_keypair_bytes())
    }

    pub fn to_base58_string(&self) -> Zeroizing<String> {
        Zeroizing::new(codec::base58_encode(&self.to_bytes()[..]))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let pubkey = Pubkey::new_from_array(signing_key.verifying_key().to_bytes());
        Self {
            signing_key,
            pubkey,
        }
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keypair")
            .field("pubkey", &self.pubkey)
            .finish_non_exhaustive()
    }
}
