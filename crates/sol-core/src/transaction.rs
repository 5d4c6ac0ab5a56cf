//! Transactions: build, sign, and encode for submission.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message                 (see `message`)
//! ```
//!
//! A [`Transaction`] accepts instructions until [`Transaction::sign`]
//! consumes it. The resulting [`SignedTransaction`] cannot be mutated, so its
//! signatures always match its message.

use crate::codec::{base64_encode, encode_compact_len};
use crate::error::SolError;
use crate::hash::Hash;
use crate::instruction::Instruction;
use crate::keypair::Keypair;
use crate::message::{Message, Reader};
use crate::pubkey::Pubkey;
use crate::signer::{sign_message, Signature, SIGNATURE_BYTES};

/// An unsigned transaction under construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    fee_payer: Pubkey,
    recent_blockhash: Hash,
    instructions: Vec<Instruction>,
}

impl Transaction {
    pub fn new(fee_payer: Pubkey, recent_blockhash: Hash) -> Self {
        Self::with_instructions(fee_payer, recent_blockhash, Vec::new())
    }

    pub fn with_instructions(
        fee_payer: Pubkey,
        recent_blockhash: Hash,
        instructions: Vec<Instruction>,
    ) -> Self {
        Self {
            fee_payer,
            recent_blockhash,
            instructions,
        }
    }

    /// Append an instruction.
    pub fn add(&mut self, instruction: Instruction) -> &mut Self {
        self.instructions.push(instruction);
        self
    }

    pub fn fee_payer(&self) -> &Pubkey {
        &self.fee_payer
    }

    pub fn recent_blockhash(&self) -> &Hash {
        &self.recent_blockhash
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Compile into the canonical account table and index form.
    pub fn compile(&self) -> Result<Message, SolError> {
        Message::compile(&self.fee_payer, self.recent_blockhash, &self.instructions)
    }

    /// The exact bytes that signers sign.
    pub fn serialize_message(&self) -> Result<Vec<u8>, SolError> {
        self.compile()?.serialize()
    }

    /// Sign with the given keypairs, consuming the transaction.
    ///
    /// Every required signer must have a keypair in `keypairs`.
    pub fn sign(self, keypairs: &[&Keypair]) -> Result<SignedTransaction, SolError> {
        let message = self.compile()?;
        let signatures = sign_message(&message, keypairs)?;
        Ok(SignedTransaction {
            signatures,
            message,
        })
    }
}

/// A fully signed transaction, ready for `sendTransaction`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    signatures: Vec<Signature>,
    message: Message,
}

impl SignedTransaction {
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    /// The fee payer's signature, which doubles as the transaction id.
    pub fn signature(&self) -> &Signature {
        // Construction guarantees at least the fee payer signature.
        &self.signatures[0]
    }

    /// Wire format: compact-u16 signature count, signatures, message.
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let message_bytes = self.message.serialize()?;
        let count = encode_compact_len(self.signatures.len(), "signatures")?;

        let mut wire = Vec::with_capacity(
            count.len() + SIGNATURE_BYTES * self.signatures.len() + message_bytes.len(),
        );
        wire.extend_from_slice(&count);
        for signature in &self.signatures {
            wire.extend_from_slice(signature.as_array());
        }
        wire.extend_from_slice(&message_bytes);

        Ok(wire)
    }

    /// Base64 of the wire bytes, as `sendTransaction` expects.
    pub fn to_base64(&self) -> Result<String, SolError> {
        Ok(base64_encode(&self.serialize()?))
    }

    /// Parse wire bytes. The signature count must equal the message's
    /// required signature count and be non-zero.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, SolError> {
        let mut reader = Reader::new(bytes);

        let num_signatures = reader.read_compact_u16()? as usize;
        if num_signatures == 0 {
            return Err(SolError::Decode("transaction has zero signatures".into()));
        }

        let mut signatures = Vec::with_capacity(num_signatures);
        for _ in 0..num_signatures {
            let mut sig = [0u8; SIGNATURE_BYTES];
            sig.copy_from_slice(reader.take(SIGNATURE_BYTES)?);
            signatures.push(Signature::new_from_array(sig));
        }

        let message = Message::read_from(&mut reader)?;
        reader.finish()?;

        if message.header.num_required_signatures as usize != num_signatures {
            return Err(SolError::Decode(format!(
                "{num_signatures} signatures for {} required signers",
                message.header.num_required_signatures
            )));
        }

        Ok(Self {
            signatures,
            message,
        })
    }

    /// Check every signature against its signer key over the message bytes.
    pub fn verify(&self) -> bool {
        let Ok(message_bytes) = self.message.serialize() else {
            return false;
        };
        let signers = self.message.signer_keys();
        signers.len() == self.signatures.len()
            && signers
                .iter()
                .zip(&self.signatures)
                .all(|(key, sig)| sig.verify(key, &message_bytes))
    }
}
