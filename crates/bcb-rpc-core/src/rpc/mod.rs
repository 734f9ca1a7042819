//! BCB node RPC abstraction layer.
//!
//! Defines the [`BcbRpc`] trait and provides the JSON-RPC implementation
//! ([`JsonRpcClient`]) plus a transport test double (`mock::MockTransport`).

mod http_adapter;
#[cfg(test)]
pub mod mock;
pub mod types;

pub use http_adapter::{
    resolve, ClientOptions, DialedStream, Dialer, Endpoint, HttpReply, JsonRpcClient, Network,
    Scheme, Transport, TrustPolicy, CONTENT_TYPE, DEFAULT_IDLE_TIMEOUT, DEFAULT_REQUEST_TIMEOUT,
    REQUEST_ID,
};
pub use types::{
    BalanceResult, BlockHeightResult, BlockResult, Message, TransferParam, TransferResult, TxResult,
};

use async_trait::async_trait;

use crate::error::RpcError;

/// The BCB node methods this crate wraps.
///
/// Errors carry the call's inputs as context (see [`RpcError::Call`]); use
/// [`RpcError::kind`] to branch on the underlying failure.
#[async_trait]
pub trait BcbRpc: Send + Sync {
    /// Height of the last committed block (`bcb_blockHeight`).
    async fn block_height(&self) -> Result<i64, RpcError>;

    /// Block at `height` with its transactions (`bcb_block`).
    async fn block(&self, height: i64) -> Result<BlockResult, RpcError>;

    /// Transaction by hash (`bcb_transaction`).
    async fn transaction(&self, tx_hash: &str) -> Result<TxResult, RpcError>;

    /// Native-token balance of `address` (`bcb_balance`).
    async fn balance(&self, address: &str) -> Result<BalanceResult, RpcError>;

    /// Balance of `address` in the token contract at `token_address`
    /// (`bcb_balanceOfToken`).
    async fn balance_of_token(
        &self,
        address: &str,
        token_address: &str,
    ) -> Result<BalanceResult, RpcError>;

    /// Transfer from the node-managed wallet `name`, unlocked with
    /// `access_key` (`bcb_transfer`).
    async fn transfer(
        &self,
        name: &str,
        access_key: &str,
        params: &TransferParam,
    ) -> Result<TransferResult, RpcError>;
}
