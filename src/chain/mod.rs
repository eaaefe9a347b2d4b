//! Chain access layer - the wallet collaborator behind every adapter
//!
//! This module provides:
//! - ChainClient trait: signed submission, reads, native balance
//! - Typed per-protocol clients built from configured addresses
//! - RpcChain: alloy-backed JSON-RPC implementation
//! - MockChain: in-memory implementation for tests and dry runs

pub mod client;
pub mod contracts;
pub mod mock;
pub mod rpc;

pub use client::{ChainClient, ChainConnector, ChainError, TxReceipt, TxRequest};
pub use contracts::{Erc20, V2Router, WrappedNative};
pub use mock::{MockChain, MockConnector};
pub use rpc::{RpcChain, RpcConnector};
