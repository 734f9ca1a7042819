//! Result and parameter schemas of the BCB node methods.
//!
//! Field names follow the node's camelCase wire form. Every field is
//! defaulted so older or newer nodes that omit a field still decode.

use serde::{Deserialize, Deserializer, Serialize};

// ==============================================================================
// Chain
// ==============================================================================

/// `bcb_blockHeight` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockHeightResult {
    pub last_block: i64,
}

/// `bcb_block` result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockResult {
    pub block_height: i64,
    pub block_hash: String,
    pub parent_hash: String,
    #[serde(rename = "chainID")]
    pub chain_id: String,
    pub validators_hash: String,
    pub consensus_hash: String,
    pub block_time: String,
    pub block_size: i64,
    pub proposer_address: String,
    pub txs: Vec<TxResult>,
}

// ==============================================================================
// Transactions
// ==============================================================================

/// `bcb_transaction` result, also embedded in [`BlockResult::txs`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TxResult {
    pub tx_hash: String,
    pub tx_time: String,
    pub code: u32,
    pub log: String,
    pub block_hash: String,
    pub block_height: i64,
    pub from: String,
    pub nonce: u64,
    pub gas_limit: i64,
    pub fee: i64,
    pub note: String,
    pub messages: Vec<Message>,
}

/// One contract invocation inside a transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Message {
    pub smc_address: String,
    pub smc_name: String,
    pub method: String,
    pub to: String,
    pub value: String,
}

// ==============================================================================
// Balances and Transfers
// ==============================================================================

/// `bcb_balance` / `bcb_balanceOfToken` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BalanceResult {
    /// Balance in the token's smallest unit. Nodes send either a decimal
    /// string or a JSON number.
    #[serde(deserialize_with = "string_or_number")]
    pub balance: String,
}

/// Wallet parameters of a `bcb_transfer` call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferParam {
    pub smc_address: String,
    pub gas_limit: String,
    pub note: String,
    pub to: String,
    pub value: String,
}

/// `bcb_transfer` result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransferResult {
    pub code: u32,
    pub log: String,
    pub fee: i64,
    pub tx_hash: String,
    pub height: i64,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}
