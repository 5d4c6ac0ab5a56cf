//! JSON-RPC access to a Solana node for `sol-core` transactions.
//!
//! [`RpcClient`] is generic over its [`RpcSender`] transport: [`HttpSender`]
//! for a real node (blocking `reqwest`), [`MockSender`] for tests. Each
//! client owns its transport; nothing is global.

pub mod client;
pub mod config;
pub mod error;
pub mod mock_sender;
pub mod request;
pub mod sender;

pub use client::{EpochInfo, RpcClient, TransactionStatus, DEFAULT_CONFIRM_WAIT};
pub use config::RpcConfig;
pub use error::RpcError;
pub use mock_sender::MockSender;
pub use request::RpcRequest;
pub use sender::{HttpSender, RpcSender};
