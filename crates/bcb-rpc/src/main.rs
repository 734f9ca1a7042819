mod cli;

use std::time::Duration;

use bcb_rpc_core::rpc::{BcbRpc, ClientOptions, JsonRpcClient, TransferParam, TrustPolicy};
use clap::Parser;
use eyre::{eyre, WrapErr};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_file(true)
        .with_line_number(true)
        .with_level(true)
        .init();

    let client = JsonRpcClient::with_options(&args.remote, client_options(&args))
        .wrap_err("while building the BCB RPC client")?;
    tracing::debug!(url = client.url(), "client ready");

    let output = run(&client, args.command).await.map_err(|err| {
        let message = format_rpc_error(&args.remote, &error_chain(&err));
        eyre!(message).wrap_err("BCB RPC call failed")
    })?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn client_options(args: &Cli) -> ClientOptions {
    let trust = match (&args.ca_file, args.insecure) {
        (Some(path), _) => TrustPolicy::CaBundle(path.clone()),
        (None, true) => TrustPolicy::AcceptAny,
        (None, false) => TrustPolicy::WebPki,
    };
    let timeout = (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs));

    ClientOptions::default()
        .request_timeout(timeout)
        .disable_keep_alive(args.disable_keep_alive)
        .trust(trust)
}

async fn run(client: &JsonRpcClient, command: Command) -> eyre::Result<serde_json::Value> {
    let value = match command {
        Command::BlockHeight => serde_json::json!({ "lastBlock": client.block_height().await? }),
        Command::Block { height } => serde_json::to_value(client.block(height).await?)?,
        Command::Transaction { tx_hash } => {
            serde_json::to_value(client.transaction(&tx_hash).await?)?
        }
        Command::Balance { address } => serde_json::to_value(client.balance(&address).await?)?,
        Command::BalanceOfToken {
            address,
            token_address,
        } => serde_json::to_value(client.balance_of_token(&address, &token_address).await?)?,
        Command::Transfer {
            name,
            access_key,
            smc_address,
            gas_limit,
            note,
            to,
            value,
        } => {
            let params = TransferParam {
                smc_address,
                gas_limit,
                note,
                to,
                value,
            };
            serde_json::to_value(client.transfer(&name, &access_key, &params).await?)?
        }
        Command::Call { method, params } => {
            let params: serde_json::Value =
                serde_json::from_str(&params).wrap_err("--params must be a JSON object")?;
            client.call(&method, &params).await?
        }
    };
    Ok(value)
}

/// Join the cause chain, skipping causes already spelled out by an outer
/// message (context layers embed their source).
fn error_chain(err: &eyre::Report) -> String {
    let mut text = String::new();
    for cause in err.chain() {
        let cause = cause.to_string();
        if text.contains(&cause) {
            continue;
        }
        if !text.is_empty() {
            text.push_str(": ");
        }
        text.push_str(&cause);
    }
    text
}

fn format_rpc_error(remote: &str, source_error: &str) -> String {
    let mut lines = vec![
        format!("request to BCB node `{remote}` failed"),
        format!("RPC error: {source_error}"),
    ];

    if source_error.contains("invalid addr") {
        lines.push(
            "hint: use host:port, tcp://host:port, unix:///path/to.sock, http://host:port or https://host:port"
                .into(),
        );
    } else if source_error.contains("Connection refused") || source_error.contains("No such file") {
        lines.push("hint: the node is not listening at that address; verify it is running".into());
    } else if source_error.contains("dns error") || source_error.contains("failed to lookup") {
        lines.push(
            "hint: hostname resolution failed; verify the node hostname and your DNS/network"
                .into(),
        );
    } else if source_error.contains("certificate")
        || source_error.contains("tls")
        || source_error.contains("TLS")
    {
        lines.push(
            "hint: TLS handshake failed; pass --ca-file with the node's CA, or --insecure for a throwaway node"
                .into(),
        );
    } else if source_error.contains("timed out") {
        lines.push("hint: the node did not answer in time; raise --timeout-secs".into());
    }

    lines.join("\n")
}
