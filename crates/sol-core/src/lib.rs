//! Transaction construction for constrained Solana clients.
//!
//! This crate builds, serializes and signs legacy Solana transactions by
//! hand, without pulling in `solana-sdk` (which drags in tokio and 200+
//! transitive dependencies). The compact wire format is implemented
//! directly, with `ed25519-dalek` for signing, `curve25519-dalek` for the
//! off-curve check in PDA derivation, `sha2` for hashing, and `bs58` /
//! `base64` for the textual encodings.
//!
//! Everything here is synchronous and free of I/O. Blockhashes and balances
//! come in as plain values from the RPC layer.

pub mod codec;
pub mod digest;
pub mod error;
pub mod hash;
pub mod instruction;
pub mod keypair;
pub mod message;
pub mod pda;
pub mod pubkey;
pub mod signer;
pub mod spl_token;
pub mod system_program;
pub mod transaction;

// Re-export key public types for ergonomic imports.
pub use digest::{calculate_discriminator, global_discriminator, sha256};
pub use error::SolError;
pub use hash::Hash;
pub use instruction::{AccountMeta, Instruction};
pub use keypair::Keypair;
pub use message::{CompiledInstruction, Message, MessageHeader};
pub use pda::{create_program_address, find_program_address, ProgramDerivedAddress};
pub use pubkey::Pubkey;
pub use signer::{sign_message, Signature};
pub use transaction::{SignedTransaction, Transaction};
