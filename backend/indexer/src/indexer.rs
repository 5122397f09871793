//! Long-running background task that polls the Soroban RPC and writes
//! decoded crowdfund events to the database.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::db;
use crate::errors::{IndexerError, Result};
use crate::rpc::{self, EventSource, PageStart};

pub struct IndexerState {
    pub pool: SqlitePool,
    pub config: Config,
    pub client: Client,
}

/// Poll until `shutdown` fires.
///
/// Fails only if the persisted cursor cannot be read at startup; errors
/// inside the loop are logged and the next poll resumes from the last
/// saved position.
pub async fn run(state: Arc<IndexerState>, shutdown: CancellationToken) -> Result<()> {
    info!("Indexer starting — contract: {}", state.config.contract_id);

    let last_ledger = db::get_last_ledger(&state.pool).await.map_err(|e| {
        error!("Cannot read indexer cursor: {e}");
        e
    })?;
    let mut cursor = db::get_cursor_string(&state.pool).await?;
    let mut current_ledger = resume_ledger(last_ledger, state.config.start_ledger);

    info!("Resuming from ledger {current_ledger}");

    let source = EventSource {
        client: &state.client,
        rpc_url: &state.config.rpc_url,
        contract_id: &state.config.contract_id,
        limit: state.config.events_per_page,
    };

    while !shutdown.is_cancelled() {
        let polled = tokio::select! {
            _ = shutdown.cancelled() => break,
            polled = poll_once(&state.pool, &source, current_ledger, cursor.as_deref(), &shutdown) => polled,
        };
        match polled {
            Ok((next_ledger, next_cursor)) => {
                current_ledger = next_ledger;
                cursor = next_cursor;
            }
            Err(IndexerError::Shutdown) => break,
            Err(e) => error!("Indexer poll error: {e}"),
        }

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(Duration::from_secs(state.config.poll_interval_secs)) => {}
        }
    }

    info!("Indexer stopping at ledger {current_ledger}");
    Ok(())
}

/// A persisted cursor wins over the configured start ledger.
fn resume_ledger(persisted: i64, configured: u32) -> u32 {
    if persisted > 0 {
        u32::try_from(persisted).unwrap_or(u32::MAX)
    } else {
        configured
    }
}

/// Perform a single poll iteration.
///
/// Returns `(next_start_ledger, next_cursor)`.
async fn poll_once(
    pool: &SqlitePool,
    source: &EventSource<'_>,
    start_ledger: u32,
    cursor: Option<&str>,
    shutdown: &CancellationToken,
) -> Result<(u32, Option<String>)> {
    let start = match cursor {
        Some(cursor) => PageStart::Cursor(cursor),
        None => PageStart::Ledger(start_ledger),
    };
    let page = source.fetch(start, shutdown).await?;

    if !page.events.is_empty() {
        let decoded = rpc::decode_events(&page.events, source.contract_id);
        let inserted = db::insert_events(pool, &decoded).await?;
        info!(
            "Polled {} raw events → {} new records stored",
            page.events.len(),
            inserted
        );
    }

    // With a cursor the next call paginates inside the same range;
    // otherwise advance to the latest known ledger.
    let next_ledger = page
        .latest_ledger
        .map(|l| (l as u32).max(start_ledger))
        .unwrap_or(start_ledger);

    db::save_cursor(pool, next_ledger as i64, page.cursor.as_deref()).await?;

    Ok((next_ledger, page.cursor))
}
