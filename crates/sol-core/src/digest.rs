//! SHA-256 hashing and Anchor-style instruction discriminators.

use sha2::{Digest, Sha256};

/// Length of an instruction or account discriminator.
pub const DISCRIMINATOR_LEN: usize = 8;

/// Namespace for top-level program instructions.
pub const GLOBAL_NAMESPACE: &str = "global";

/// Namespace for account type discriminators.
pub const ACCOUNT_NAMESPACE: &str = "account";

/// SHA-256 of a single byte string.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(data).into()
}

/// SHA-256 over the concatenation of several byte strings.
pub fn hashv(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// First 8 bytes of `sha256(namespace ":" function_name)`.
///
/// On-chain programs recompute this independently; any mismatch makes the
/// program reject the instruction.
pub fn calculate_discriminator(namespace: &str, function_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    let hash = hashv(&[namespace.as_bytes(), b":", function_name.as_bytes()]);
    let mut discriminator = [0u8; DISCRIMINATOR_LEN];
    discriminator.copy_from_slice(&hash[..DISCRIMINATOR_LEN]);
    discriminator
}

/// Discriminator for an instruction in the `global` namespace.
pub fn global_discriminator(function_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    calculate_discriminator(GLOBAL_NAMESPACE, function_name)
}

/// Discriminator stored at the start of an account of the given type.
pub fn account_discriminator(type_name: &str) -> [u8; DISCRIMINATOR_LEN] {
    calculate_discriminator(ACCOUNT_NAMESPACE, type_name)
}
