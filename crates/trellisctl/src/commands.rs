//! Subcommand execution.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use tracing::debug;
use trellis_canon::{CanonicalEncoder, Record};
use trellis_client::{AdminClient, LogConnection};
use trellis_types::TreeId;

use crate::Commands;
use crate::config::CliConfig;

pub async fn run(command: Commands, config: &CliConfig) -> Result<()> {
    debug!(
        host = %config.service.host,
        port = config.service.port,
        "using log service"
    );
    match command {
        Commands::Logs => print_json(&admin(config)?.logs().await?),
        Commands::CreateLog { name, description } => {
            print_json(&admin(config)?.create_log(&name, &description).await?)
        }
        Commands::DeleteLog { tree_id } => {
            admin(config)?.delete_log(tree_id).await?;
            print_json(&json!({ "deleted": tree_id }))
        }
        Commands::GetLog { tree_id } => print_json(&admin(config)?.get_log(tree_id).await?),
        Commands::PublicKey { tree_id } => {
            print_json(&admin(config)?.get_public_key(tree_id).await?)
        }
        Commands::Init { log_id } => print_json(&log(config, log_id)?.init_log().await?),
        Commands::Root { log_id } => {
            print_json(&log(config, log_id)?.get_signed_log_root().await?)
        }
        Commands::Size { log_id } => print_json(&log(config, log_id)?.get_tree_size().await?),
        Commands::Leaves {
            log_id,
            start,
            end,
            with_root: false,
        } => print_json(&log(config, log_id)?.get_leaves(start, end).await?),
        Commands::Leaves {
            log_id,
            start,
            end,
            with_root: true,
        } => print_json(&log(config, log_id)?.get_leaves_with_root(start, end).await?),
        Commands::Range {
            log_id,
            start,
            count,
        } => print_json(
            &log(config, log_id)?
                .get_leaves_by_range(start, count)
                .await?,
        ),
        Commands::Recent { log_id, count } => {
            print_json(&log(config, log_id)?.get_recent_leaves(count).await?)
        }
        Commands::Proof {
            log_id,
            first_tree_size,
            second_tree_size,
        } => print_json(
            &log(config, log_id)?
                .get_consistency_proof(first_tree_size, second_tree_size)
                .await?,
        ),
        Commands::Queue {
            log_id,
            record,
            raw,
        } => {
            let leaf_value = leaf_value(&record, raw, &config.encoder())?;
            print_json(&log(config, log_id)?.queue_leaf(leaf_value).await?)
        }
    }
}

fn admin(config: &CliConfig) -> Result<AdminClient> {
    AdminClient::connect(
        &config.service.host,
        config.service.port,
        config.connection_options(),
    )
    .context("failed to prepare admin client")
}

fn log(config: &CliConfig, log_id: TreeId) -> Result<LogConnection> {
    LogConnection::connect(
        &config.service.host,
        config.service.port,
        log_id,
        config.connection_options(),
    )
    .context("failed to prepare log connection")
}

/// Bytes to queue for a `queue` argument.
fn leaf_value(argument: &str, raw: bool, encoder: &CanonicalEncoder) -> Result<Vec<u8>> {
    if raw {
        return Ok(argument.as_bytes().to_vec());
    }
    let record = Record::from_json_str(argument).context("record must be a flat JSON object")?;
    Ok(encoder.normalize(&record))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
