//! System Program instructions.

use crate::codec::{encode_u32_le, encode_u64_le};
use crate::error::SolError;
use crate::instruction::{AccountMeta, Instruction};
use crate::pubkey::Pubkey;

/// The System Program public key: 32 zero bytes.
/// Base58: `11111111111111111111111111111111`
pub const ID: Pubkey = Pubkey::new_from_array([0u8; 32]);

/// System Program `Transfer` instruction index (little-endian u32).
const TRANSFER_IX_INDEX: u32 = 2;

/// Build a native SOL `Transfer` of `lamports` from `from` to `to`.
///
/// Data: u32 LE instruction index (2) followed by u64 LE lamports.
pub fn transfer(from: &Pubkey, to: &Pubkey, lamports: u64) -> Result<Instruction, SolError> {
    if lamports == 0 {
        return Err(SolError::InvalidInstruction("lamports must be > 0".into()));
    }

    let mut data = Vec::with_capacity(12);
    data.extend_from_slice(&encode_u32_le(TRANSFER_IX_INDEX));
    data.extend_from_slice(&encode_u64_le(lamports));

    Ok(Instruction::new(
        ID,
        vec![
            AccountMeta::new(*from, true, true),
            AccountMeta::new(*to, false, true),
        ],
        data,
    ))
}
