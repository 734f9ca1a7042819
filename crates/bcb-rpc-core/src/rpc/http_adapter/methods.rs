use async_trait::async_trait;
use serde::Serialize;

use crate::error::RpcError;

use super::super::types::{
    BalanceResult, BlockHeightResult, BlockResult, TransferParam, TransferResult, TxResult,
};
use super::super::BcbRpc;
use super::client::JsonRpcClient;

#[derive(Serialize)]
struct NoParams {}

#[derive(Serialize)]
struct BlockParams {
    height: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransactionParams<'a> {
    tx_hash: &'a str,
}

#[derive(Serialize)]
struct BalanceParams<'a> {
    address: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BalanceOfTokenParams<'a> {
    address: &'a str,
    token_address: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TransferParams<'a> {
    name: &'a str,
    access_key: &'a str,
    wallet_params: &'a TransferParam,
}

#[async_trait]
impl BcbRpc for JsonRpcClient {
    async fn block_height(&self) -> Result<i64, RpcError> {
        let result: BlockHeightResult = self
            .call("bcb_blockHeight", &NoParams {})
            .await
            .map_err(|e| e.context("cannot get block height"))?;
        Ok(result.last_block)
    }

    async fn block(&self, height: i64) -> Result<BlockResult, RpcError> {
        self.call("bcb_block", &BlockParams { height })
            .await
            .map_err(|e| e.context(format!("cannot get block data, height={height}")))
    }

    async fn transaction(&self, tx_hash: &str) -> Result<TxResult, RpcError> {
        self.call("bcb_transaction", &TransactionParams { tx_hash })
            .await
            .map_err(|e| e.context(format!("cannot get transaction, txHash={tx_hash}")))
    }

    async fn balance(&self, address: &str) -> Result<BalanceResult, RpcError> {
        self.call("bcb_balance", &BalanceParams { address })
            .await
            .map_err(|e| e.context(format!("cannot get balance, address={address}")))
    }

    async fn balance_of_token(
        &self,
        address: &str,
        token_address: &str,
    ) -> Result<BalanceResult, RpcError> {
        let params = BalanceOfTokenParams {
            address,
            token_address,
        };
        self.call("bcb_balanceOfToken", &params)
            .await
            .map_err(|e| {
                e.context(format!(
                    "cannot get balance of token, address={address}, tokenAddress={token_address}"
                ))
            })
    }

    async fn transfer(
        &self,
        name: &str,
        access_key: &str,
        params: &TransferParam,
    ) -> Result<TransferResult, RpcError> {
        let request = TransferParams {
            name,
            access_key,
            wallet_params: params,
        };
        // The access key is a credential; keep it out of the error text.
        self.call("bcb_transfer", &request)
            .await
            .map_err(|e| e.context(format!("cannot transfer, name={name}, walletParams={params:?}")))
    }
}
