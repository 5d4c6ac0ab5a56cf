//! Legacy message compilation and wire format.
//!
//! ```text
//! Message:
//!   num_required_sigs     u8
//!   num_readonly_signed   u8
//!   num_readonly_unsigned u8
//!   num_accounts          compact-u16
//!   account_keys          32 bytes * num_accounts
//!   recent_blockhash      32 bytes
//!   num_instructions      compact-u16
//!   instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index      u8
//!   num_accounts          compact-u16
//!   account_indices       u8 * num_accounts
//!   data_len              compact-u16
//!   data                  u8 * data_len
//! ```

use log::trace;

use crate::codec::{decode_compact_u16, encode_compact_len};
use crate::error::SolError;
use crate::hash::{Hash, HASH_BYTES};
use crate::instruction::Instruction;
use crate::pubkey::{Pubkey, PUBKEY_BYTES};

/// Account indices are single bytes, so a message addresses at most 256 keys.
pub const MAX_ACCOUNT_KEYS: usize = 256;

/// The three header counts that classify the account table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    /// Number of required signatures (first N accounts are signers).
    pub num_required_signatures: u8,
    /// How many of the signing accounts are read-only.
    pub num_readonly_signed_accounts: u8,
    /// How many of the non-signing accounts are read-only.
    pub num_readonly_unsigned_accounts: u8,
}

/// An instruction whose account references are replaced by u8 indices into
/// the message's `account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

/// The signable content of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    /// All account keys referenced by this message, in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile instructions into a message paid for by `fee_payer`.
    ///
    /// Keys are deduplicated with their signer/writable flags OR-ed together
    /// and then stably grouped, so first-seen order survives inside each
    /// group. The fee payer is always a writable signer at index 0.
    pub fn compile(
        fee_payer: &Pubkey,
        recent_blockhash: Hash,
        instructions: &[Instruction],
    ) -> Result<Self, SolError> {
        // A Vec keeps insertion order and the lists are small.
        struct KeyEntry {
            pubkey: Pubkey,
            is_signer: bool,
            is_writable: bool,
        }

        let mut entries: Vec<KeyEntry> = Vec::new();
        let mut upsert = |pubkey: Pubkey, signer: bool, writable: bool| {
            if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
                entry.is_signer |= signer;
                entry.is_writable |= writable;
            } else {
                entries.push(KeyEntry {
                    pubkey,
                    is_signer: signer,
                    is_writable: writable,
                });
            }
        };

        upsert(*fee_payer, true, true);
        for ix in instructions {
            // Program IDs are non-signer, read-only accounts.
            upsert(ix.program_id, false, false);
            for meta in &ix.accounts {
                upsert(meta.pubkey, meta.is_signer, meta.is_writable);
            }
        }

        if entries.len() > MAX_ACCOUNT_KEYS {
            return Err(SolError::SerializationLimitExceeded(format!(
                "{} unique accounts exceeds the maximum of {MAX_ACCOUNT_KEYS}",
                entries.len()
            )));
        }

        // `sort_by_key` is stable.
        entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
            (true, true) => 0u8,
            (true, false) => 1,
            (false, true) => 2,
            (false, false) => 3,
        });

        let header = MessageHeader {
            num_required_signatures: header_count(
                entries.iter().filter(|e| e.is_signer).count(),
                "signer",
            )?,
            num_readonly_signed_accounts: header_count(
                entries.iter().filter(|e| e.is_signer && !e.is_writable).count(),
                "readonly signer",
            )?,
            num_readonly_unsigned_accounts: header_count(
                entries.iter().filter(|e| !e.is_signer && !e.is_writable).count(),
                "readonly non-signer",
            )?,
        };

        let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();

        let compiled = instructions
            .iter()
            .map(|ix| {
                let program_id_index = key_index(&account_keys, &ix.program_id)?;
                let accounts = ix
                    .accounts
                    .iter()
                    .map(|meta| key_index(&account_keys, &meta.pubkey))
                    .collect::<Result<Vec<u8>, SolError>>()?;
                Ok(CompiledInstruction {
                    program_id_index,
                    accounts,
                    data: ix.data.clone(),
                })
            })
            .collect::<Result<Vec<_>, SolError>>()?;

        trace!(
            "compiled message: {} accounts, {} signers, {} instructions",
            account_keys.len(),
            header.num_required_signatures,
            compiled.len()
        );

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// The accounts that must sign, in signature order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        let n = (self.header.num_required_signatures as usize).min(self.account_keys.len());
        &self.account_keys[..n]
    }

    pub fn is_signer(&self, index: usize) -> bool {
        index < self.header.num_required_signatures as usize
    }

    pub fn is_writable(&self, index: usize) -> bool {
        let num_signers = self.header.num_required_signatures as usize;
        if index >= self.account_keys.len() {
            return false;
        }
        if index < num_signers {
            index < num_signers.saturating_sub(self.header.num_readonly_signed_accounts as usize)
        } else {
            let num_unsigned = self.account_keys.len() - num_signers;
            index - num_signers
                < num_unsigned.saturating_sub(self.header.num_readonly_unsigned_accounts as usize)
        }
    }

    /// Serialize the message (the bytes that get signed).
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let mut buf = Vec::with_capacity(
            3 + 3 + self.account_keys.len() * PUBKEY_BYTES + HASH_BYTES + 3,
        );

        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed_accounts);
        buf.push(self.header.num_readonly_unsigned_accounts);

        buf.extend_from_slice(&encode_compact_len(self.account_keys.len(), "account keys")?);
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_ref());
        }

        buf.extend_from_slice(self.recent_blockhash.as_array());

        buf.extend_from_slice(&encode_compact_len(self.instructions.len(), "instructions")?);
        for ix in &self.instructions {
            buf.push(ix.program_id_index);

            buf.extend_from_slice(&encode_compact_len(ix.accounts.len(), "instruction accounts")?);
            buf.extend_from_slice(&ix.accounts);

            buf.extend_from_slice(&encode_compact_len(ix.data.len(), "instruction data")?);
            buf.extend_from_slice(&ix.data);
        }

        Ok(buf)
    }

    /// Parse a serialized message, rejecting truncated input, trailing
    /// bytes, inconsistent headers and out-of-range account indices.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, SolError> {
        let mut reader = Reader::new(bytes);
        let message = Self::read_from(&mut reader)?;
        reader.finish()?;
        Ok(message)
    }

    pub(crate) fn read_from(reader: &mut Reader<'_>) -> Result<Self, SolError> {
        let header = MessageHeader {
            num_required_signatures: reader.read_u8()?,
            num_readonly_signed_accounts: reader.read_u8()?,
            num_readonly_unsigned_accounts: reader.read_u8()?,
        };

        let num_keys = reader.read_compact_u16()? as usize;
        let mut account_keys = Vec::with_capacity(num_keys);
        for _ in 0..num_keys {
            account_keys.push(Pubkey::try_from_slice(reader.take(PUBKEY_BYTES)?)?);
        }

        let signers = header.num_required_signatures as usize;
        if signers > num_keys
            || header.num_readonly_signed_accounts as usize > signers
            || header.num_readonly_unsigned_accounts as usize > num_keys - signers
        {
            return Err(SolError::Decode(
                "message header is inconsistent with account table".into(),
            ));
        }

        let mut blockhash = [0u8; HASH_BYTES];
        blockhash.copy_from_slice(reader.take(HASH_BYTES)?);

        let num_instructions = reader.read_compact_u16()? as usize;
        let mut instructions = Vec::with_capacity(num_instructions);
        for _ in 0..num_instructions {
            let program_id_index = reader.read_u8()?;
            let num_accounts = reader.read_compact_u16()? as usize;
            let accounts = reader.take(num_accounts)?.to_vec();
            let data_len = reader.read_compact_u16()? as usize;
            let data = reader.take(data_len)?.to_vec();

            let out_of_range = std::iter::once(&program_id_index)
                .chain(accounts.iter())
                .any(|&i| i as usize >= num_keys);
            if out_of_range {
                return Err(SolError::Decode(
                    "instruction references an account outside the table".into(),
                ));
            }

            instructions.push(CompiledInstruction {
                program_id_index,
                accounts,
                data,
            });
        }

        Ok(Self {
            header,
            account_keys,
            recent_blockhash: Hash::new_from_array(blockhash),
            instructions,
        })
    }
}

fn header_count(count: usize, what: &str) -> Result<u8, SolError> {
    u8::try_from(count).map_err(|_| {
        SolError::SerializationLimitExceeded(format!("{count} {what} accounts does not fit in u8"))
    })
}

fn key_index(keys: &[Pubkey], key: &Pubkey) -> Result<u8, SolError> {
    let pos = keys.iter().position(|k| k == key).ok_or_else(|| {
        SolError::InvalidInstruction(format!("account {key} not in account keys"))
    })?;
    u8::try_from(pos).map_err(|_| {
        SolError::SerializationLimitExceeded(format!("account index {pos} does not fit in u8"))
    })
}

/// Bounds-checked cursor over wire bytes.
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], SolError> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| SolError::Decode("unexpected end of data".into()))?;
        let slice = &self.data[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, SolError> {
        Ok(self.take(1)?[0])
    }

    pub(crate) fn read_compact_u16(&mut self) -> Result<u16, SolError> {
        let (value, consumed) = decode_compact_u16(&self.data[self.pos..])?;
        self.pos += consumed;
        Ok(value)
    }

    pub(crate) fn finish(&self) -> Result<(), SolError> {
        if self.pos != self.data.len() {
            return Err(SolError::Decode(format!(
                "{} trailing bytes",
                self.data.len() - self.pos
            )));
        }
        Ok(())
    }
}
