//! Program Derived Address (PDA) derivation.
//!
//! A PDA is `SHA-256(seed_0 || .. || seed_n || bump || program_id ||
//! "ProgramDerivedAddress")` for the first bump (255 down to 0) whose hash is
//! NOT a valid Ed25519 point, so that no private key can exist for it.

use log::trace;

use crate::digest::hashv;
use crate::error::SolError;
use crate::pubkey::{bytes_are_curve_point, Pubkey};

/// Maximum number of seeds, bump seed included.
pub const MAX_SEEDS: usize = 16;

/// Maximum length of a single seed.
pub const MAX_SEED_LEN: usize = 32;

/// The string appended to PDA derivation.
const PDA_MARKER: &[u8] = b"ProgramDerivedAddress";

/// An off-curve address and the bump seed that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgramDerivedAddress {
    pub address: Pubkey,
    pub bump: u8,
}

/// Find the canonical PDA for `seeds` under `program_id`.
///
/// Deterministic: the same inputs always return the same address and bump.
pub fn find_program_address(
    seeds: &[&[u8]],
    program_id: &Pubkey,
) -> Result<ProgramDerivedAddress, SolError> {
    search_bump(seeds, program_id, bytes_are_curve_point)
}

/// Derive the address for seeds that already carry their bump.
///
/// Fails with `InvalidSeeds` if the result lies on the curve.
pub fn create_program_address(seeds: &[&[u8]], program_id: &Pubkey) -> Result<Pubkey, SolError> {
    check_seeds(seeds.len(), seeds)?;

    let hash = derive(seeds, &[], program_id);
    if bytes_are_curve_point(&hash) {
        return Err(SolError::InvalidSeeds(
            "derived address lies on the ed25519 curve".into(),
        ));
    }
    Ok(Pubkey::new_from_array(hash))
}

fn search_bump(
    seeds: &[&[u8]],
    program_id: &Pubkey,
    is_on_curve: impl Fn(&[u8; 32]) -> bool,
) -> Result<ProgramDerivedAddress, SolError> {
    // The bump occupies one seed slot.
    check_seeds(seeds.len() + 1, seeds)?;

    for bump in (0u8..=255).rev() {
        let hash = derive(seeds, &[bump], program_id);
        if !is_on_curve(&hash) {
            trace!("pda found for program {program_id} with bump {bump}");
            return Ok(ProgramDerivedAddress {
                address: Pubkey::new_from_array(hash),
                bump,
            });
        }
    }

    Err(SolError::DerivationExhausted)
}

fn derive(seeds: &[&[u8]], bump_seed: &[u8], program_id: &Pubkey) -> [u8; 32] {
    let mut parts: Vec<&[u8]> = Vec::with_capacity(seeds.len() + 3);
    parts.extend_from_slice(seeds);
    parts.push(bump_seed);
    parts.push(program_id.as_ref());
    parts.push(PDA_MARKER);
    hashv(&parts)
}

fn check_seeds(total: usize, seeds: &[&[u8]]) -> Result<(), SolError> {
    if total > MAX_SEEDS {
        return Err(SolError::SerializationLimitExceeded(format!(
            "{total} seeds exceeds the maximum of {MAX_SEEDS}"
        )));
    }
    if let Some(seed) = seeds.iter().find(|s| s.len() > MAX_SEED_LEN) {
        return Err(SolError::SerializationLimitExceeded(format!(
            "seed of {} bytes exceeds the maximum of {MAX_SEED_LEN}",
            seed.len()
        )));
    }
    Ok(())
}
