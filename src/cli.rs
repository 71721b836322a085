use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::rpc::{BroadcastMode, EventQueryBuilder};

#[derive(Parser)]
#[command(name = "irita-rpc")]
#[command(about = "Tendermint JSON-RPC client for IRITA chains", long_about = None)]
pub struct Cli {
    #[arg(short, long, help = "Path to the configuration file", default_value = "data/config.toml")]
    pub config: PathBuf,
    #[arg(short = 'u', long, help = "Node RPC endpoint, overrides the configuration file")]
    pub rpc_uri: Option<String>,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up a transaction by hash
    Tx {
        #[arg(help = "Transaction hash in hex")]
        hash: String,
    },
    /// Search transactions by event attributes
    Txs {
        #[arg(
            short,
            long = "event",
            value_parser = parse_event,
            required = true,
            help = "Event condition as KEY=VALUE, e.g. message.sender=iaa1...; repeat to AND them"
        )]
        events: Vec<(String, String)>,
        #[arg(short, long, help = "Page number, node default when omitted", default_value_t = 0)]
        page: i32,
        #[arg(short, long, help = "Results per page, node default when omitted", default_value_t = 0)]
        size: i32,
    },
    /// Fetch a block with its transactions decoded
    Block {
        #[arg(long, help = "Block height, latest when omitted")]
        height: Option<i64>,
    },
    /// Fetch the execution results of a block
    BlockResults {
        #[arg(long, help = "Block height, latest when omitted")]
        height: Option<i64>,
    },
    /// Estimate gas for a signed transaction
    Simulate {
        #[arg(help = "Raw transaction bytes in hex")]
        tx: String,
    },
    /// Submit a signed transaction
    Broadcast {
        #[arg(help = "Raw transaction bytes in hex")]
        tx: String,
        #[arg(short, long, help = "sync, async or commit", default_value = "sync")]
        mode: BroadcastMode,
    },
}

fn parse_event(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim().to_string(), value.to_string())),
        _ => Err(format!("expected KEY=VALUE, got `{s}`")),
    }
}

/// Builds an `AND` query from `--event` pairs.
pub fn event_query(events: &[(String, String)]) -> EventQueryBuilder {
    events
        .iter()
        .fold(EventQueryBuilder::new(), |builder, (key, value)| builder.eq(key.as_str(), value.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_txs_command() {
        let cli = Cli::try_parse_from([
            "irita-rpc",
            "--rpc-uri",
            "http://node:26657",
            "txs",
            "--event",
            "message.module=nft",
            "-e",
            "nft.denom_id=cats",
            "--page",
            "2",
        ])
        .unwrap();

        assert_eq!(cli.rpc_uri.as_deref(), Some("http://node:26657"));
        match cli.command {
            Commands::Txs { events, page, size } => {
                assert_eq!(page, 2);
                assert_eq!(size, 0);
                assert_eq!(
                    event_query(&events).build(),
                    "message.module='nft' AND nft.denom_id='cats'"
                );
            },
            _ => panic!("expected txs"),
        }
    }

    #[test]
    fn test_event_without_separator_is_rejected() {
        assert!(Cli::try_parse_from(["irita-rpc", "txs", "--event", "message.module"]).is_err());
        assert!(Cli::try_parse_from(["irita-rpc", "txs", "--event", "=nft"]).is_err());
    }

    #[test]
    fn test_broadcast_mode_is_parsed() {
        let cli = Cli::try_parse_from(["irita-rpc", "broadcast", "0a0b", "--mode", "Commit"]).unwrap();
        assert!(matches!(cli.command, Commands::Broadcast { mode: BroadcastMode::Commit, .. }));

        assert!(Cli::try_parse_from(["irita-rpc", "broadcast", "0a0b", "--mode", "block"]).is_err());
    }
}
