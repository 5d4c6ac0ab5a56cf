//! Instructions and their account references.

use crate::digest::calculate_discriminator;
use crate::pubkey::Pubkey;

/// A single account reference in an instruction.
///
/// `is_signer` and `is_writable` are independent: a fee-paying signer is
/// usually writable, a readonly authority is not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool, is_writable: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable,
        }
    }
}

/// A program invocation before it is compiled into a message.
///
/// Account order matters: the program reads its accounts by position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn new(program_id: Pubkey, accounts: Vec<AccountMeta>, data: Vec<u8>) -> Self {
        Self {
            program_id,
            accounts,
            data,
        }
    }

    /// Build an instruction whose data is `discriminator(namespace, name)`
    /// followed by the already-encoded `args`.
    pub fn with_discriminator(
        program_id: Pubkey,
        namespace: &str,
        function_name: &str,
        args: &[u8],
        accounts: Vec<AccountMeta>,
    ) -> Self {
        let discriminator = calculate_discriminator(namespace, function_name);
        let mut data = Vec::with_capacity(discriminator.len() + args.len());
        data.extend_from_slice(&discriminator);
        data.extend_from_slice(args);
        Self::new(program_id, accounts, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_u64_le;
    use crate::digest::global_discriminator;

    #[test]
    fn account_meta_flags_are_independent() {
        let key = Pubkey::new_from_array([1u8; 32]);
        let cases = [(true, true), (true, false), (false, true), (false, false)];
        for (is_signer, is_writable) in cases {
            let meta = AccountMeta::new(key, is_signer, is_writable);
            assert_eq!(meta.is_signer, is_signer);
            assert_eq!(meta.is_writable, is_writable);
        }
    }

    #[test]
    fn discriminator_prefixes_args() {
        let program_id = Pubkey::new_from_array([2u8; 32]);
        let args = encode_u64_le(42);
        let ix = Instruction::with_discriminator(program_id, "global", "deposit", &args, vec![]);

        assert_eq!(ix.data.len(), 16);
        assert_eq!(&ix.data[..8], &global_discriminator("deposit"));
        assert_eq!(&ix.data[8..], &args);
    }

    #[test]
    fn accounts_keep_caller_order() {
        let a = AccountMeta::new(Pubkey::new_from_array([3u8; 32]), false, false);
        let b = AccountMeta::new(Pubkey::new_from_array([1u8; 32]), true, true);
        let ix = Instruction::new(Pubkey::default(), vec![a, b], vec![]);
        assert_eq!(ix.accounts, vec![a, b]);
    }
}
