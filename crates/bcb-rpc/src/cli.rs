use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// bcb-rpc: query and transact against a BCB node over JSON-RPC.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Node address: host:port, tcp://, unix:///path, http:// or https://.
    #[arg(long, default_value = "tcp://127.0.0.1:46657", env = "BCB_RPC_REMOTE")]
    pub remote: String,

    /// PEM bundle whose certificates are the only trusted CAs (https only).
    #[arg(long, env = "BCB_RPC_CA_FILE", conflicts_with = "insecure")]
    pub ca_file: Option<PathBuf>,

    /// Skip TLS certificate verification (https only). The node's identity
    /// is not checked.
    #[arg(long)]
    pub insecure: bool,

    /// Open a fresh connection for every request.
    #[arg(long)]
    pub disable_keep_alive: bool,

    /// Per-request timeout in seconds; 0 disables it.
    #[arg(long, default_value = "120", env = "BCB_RPC_TIMEOUT_SECS")]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Height of the last committed block.
    BlockHeight,

    /// Block at a given height.
    Block {
        #[arg(long)]
        height: i64,
    },

    /// Transaction by hash.
    Transaction {
        #[arg(long)]
        tx_hash: String,
    },

    /// Native-token balance of an address.
    Balance {
        #[arg(long)]
        address: String,
    },

    /// Balance of an address in a token contract.
    BalanceOfToken {
        #[arg(long)]
        address: String,
        #[arg(long)]
        token_address: String,
    },

    /// Transfer from a node-managed wallet.
    Transfer {
        /// Wallet name on the node.
        #[arg(long)]
        name: String,
        /// Wallet access key.
        #[arg(long, env = "BCB_RPC_ACCESS_KEY", hide_env_values = true)]
        access_key: String,
        /// Token contract address.
        #[arg(long)]
        smc_address: String,
        #[arg(long)]
        gas_limit: String,
        #[arg(long, default_value = "")]
        note: String,
        /// Recipient address.
        #[arg(long)]
        to: String,
        /// Amount in the token's smallest unit.
        #[arg(long)]
        value: String,
    },

    /// Raw call with named params given as a JSON object.
    Call {
        #[arg(long)]
        method: String,
        #[arg(long, default_value = "{}")]
        params: String,
    },
}
