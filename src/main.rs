use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use log::info;
use serde::Serialize;
use url::Url;

use irita_rpc::cli::{Cli, Commands, event_query};
use irita_rpc::config::{RpcClientConfig, load_configuration};
use irita_rpc::http::HttpClient;
use irita_rpc::log::init_logging;
use irita_rpc::{MsgRegistry, RpcClient};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    init_logging()?;

    let mut overrides = Vec::new();
    if let Some(rpc_uri) = cli.rpc_uri.as_deref() {
        overrides.push(("rpc.rpc_uri", rpc_uri));
    }
    let cfg = load_configuration(&cli.config, &overrides)?;
    let rpc_config = RpcClientConfig::from_config(&cfg)?;

    let rpc_uri = Url::parse(&rpc_config.rpc_uri).context("Invalid rpc_uri")?;
    let transport = HttpClient::with_config(rpc_config.timeout(), rpc_config.project_key())
        .context("Could not build HTTP client")?;
    let client = RpcClient::with_transport(rpc_uri, Arc::new(transport), Arc::new(MsgRegistry::with_defaults()));
    info!(rpc_uri = rpc_config.rpc_uri.as_str(); "Connecting to node");

    match cli.command {
        Commands::Tx { hash } => print_json(&client.query_tx(&hash).await?),
        Commands::Txs { events, page, size } => {
            print_json(&client.query_txs(&event_query(&events), page, size).await?)
        },
        Commands::Block { height } => print_json(&client.query_block(height).await?),
        Commands::BlockResults { height } => print_json(&client.query_block_result(height).await?),
        Commands::Simulate { tx } => {
            let tx_bytes = hex::decode(tx.trim()).context("Transaction must be hex encoded")?;
            print_json(&client.simulate_tx(&tx_bytes).await?)
        },
        Commands::Broadcast { tx, mode } => {
            let tx_bytes = hex::decode(tx.trim()).context("Transaction must be hex encoded")?;
            let result = client.broadcast_tx(&tx_bytes, mode).await?;
            print_json(&result)?;
            if !result.is_success() {
                anyhow::bail!("transaction not accepted (code {})", result.code);
            }
            Ok(())
        },
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), anyhow::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
