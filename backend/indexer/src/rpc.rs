//! Soroban RPC client — polls `getEvents` and decodes crowdfund protocol events.
//!
//! Transport failures, rate limits and soft JSON-RPC errors are retried with
//! a doubling delay capped at [`MAX_BACKOFF`]. Every wait is cut short by the
//! shutdown token, so a dead endpoint never blocks shutdown.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{CrowdfundEvent, EventKind};

const INITIAL_BACKOFF: Duration = Duration::from_secs(2);
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// JSON-RPC codes that will fail the same way on every retry.
const FATAL_RPC_CODES: [i64; 2] = [-32600, -32601];

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RawEvent {
    /// XDR-encoded topic list
    pub topic: Vec<String>,
    /// XDR-encoded event value / data
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Transport
// ─────────────────────────────────────────────────────────

/// Where a `getEvents` scan starts: a fresh ledger, or the opaque cursor
/// returned by the previous page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStart<'a> {
    Ledger(u32),
    Cursor(&'a str),
}

/// One page of `getEvents` output.
#[derive(Debug, Default)]
pub struct EventsPage {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    pub latest_ledger: Option<u64>,
}

/// `getEvents` client bound to one endpoint and one contract.
pub struct EventSource<'a> {
    pub client: &'a Client,
    pub rpc_url: &'a str,
    pub contract_id: &'a str,
    pub limit: u32,
}

enum Attempt {
    Page(EventsPage),
    Retry(String),
}

impl EventSource<'_> {
    /// Fetch one page, retrying transient failures until `shutdown` fires.
    /// Cancellation surfaces as [`IndexerError::Shutdown`].
    pub async fn fetch(&self, start: PageStart<'_>, shutdown: &CancellationToken) -> Result<EventsPage> {
        let mut backoff = Backoff::new();
        loop {
            let attempt = tokio::select! {
                _ = shutdown.cancelled() => return Err(IndexerError::Shutdown),
                attempt = self.request(start) => attempt?,
            };
            match attempt {
                Attempt::Page(page) => {
                    debug!(
                        "Fetched {} events (latest_ledger={:?})",
                        page.events.len(),
                        page.latest_ledger
                    );
                    return Ok(page);
                }
                Attempt::Retry(reason) => {
                    warn!("{reason} (retrying in {}s)", backoff.peek().as_secs());
                    backoff.wait(shutdown).await?;
                }
            }
        }
    }

    async fn request(&self, start: PageStart<'_>) -> Result<Attempt> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "getEvents",
            "params": build_params(self.contract_id, start, self.limit),
        });

        let resp = match self.client.post(self.rpc_url).json(&body).send().await {
            Ok(resp) => resp,
            Err(e) => return Ok(Attempt::Retry(format!("RPC request failed: {e}"))),
        };
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Ok(Attempt::Retry("Rate-limited by RPC".to_string()));
        }

        let reply: RpcResponse = resp.json().await?;
        if let Some(err) = reply.error {
            if FATAL_RPC_CODES.contains(&err.code) {
                return Err(IndexerError::Rpc {
                    code: err.code,
                    message: err.message,
                });
            }
            return Ok(Attempt::Retry(format!(
                "RPC soft error {}: {}",
                err.code, err.message
            )));
        }

        let result = reply
            .result
            .ok_or_else(|| IndexerError::EventParse("Empty result from getEvents".to_string()))?;
        Ok(Attempt::Page(EventsPage {
            events: result.events,
            cursor: result.cursor,
            latest_ledger: result.latest_ledger,
        }))
    }
}

/// Doubling retry delay, capped at [`MAX_BACKOFF`].
struct Backoff {
    delay: Duration,
}

impl Backoff {
    fn new() -> Self {
        Backoff {
            delay: INITIAL_BACKOFF,
        }
    }

    fn peek(&self) -> Duration {
        self.delay
    }

    /// Return the current delay and double the next one.
    fn advance(&mut self) -> Duration {
        let current = self.delay;
        self.delay = (current * 2).min(MAX_BACKOFF);
        current
    }

    async fn wait(&mut self, shutdown: &CancellationToken) -> Result<()> {
        let delay = self.advance();
        tokio::select! {
            _ = shutdown.cancelled() => Err(IndexerError::Shutdown),
            _ = tokio::time::sleep(delay) => Ok(()),
        }
    }
}

fn build_params(contract_id: &str, start: PageStart<'_>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [{ "type": "contract", "contractIds": [contract_id] }],
        "pagination": { "limit": limit },
    });
    match start {
        PageStart::Cursor(cursor) => params["pagination"]["cursor"] = json!(cursor),
        PageStart::Ledger(ledger) => params["startLedger"] = json!(ledger),
    }
    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events into [`CrowdfundEvent`] structs.
/// Events from calls that ultimately failed are dropped.
pub fn decode_events(raw: &[RawEvent], contract_id: &str) -> Vec<CrowdfundEvent> {
    raw.iter()
        .enumerate()
        .filter(|(_, e)| e.in_successful_contract_call != Some(false))
        .filter_map(|(index, e)| decode_single(e, index, contract_id))
        .collect()
}

fn decode_single(raw: &RawEvent, index: usize, contract_id: &str) -> Option<CrowdfundEvent> {
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    let project_id = raw.topic.get(1).map(|t| extract_u64_or_raw(t));

    let (actor, amount) = decode_data(&raw.value, kind);

    // The RPC id is unique per event; older nodes only send a paging token.
    let event_id = raw
        .id
        .clone()
        .or_else(|| raw.paging_token.clone())
        .unwrap_or_else(|| {
            format!(
                "{ledger}-{}-{index}",
                raw.tx_hash.as_deref().unwrap_or_default()
            )
        });

    Some(CrowdfundEvent {
        event_id,
        event_type: kind.as_str().to_string(),
        project_id,
        actor,
        amount,
        ledger,
        timestamp,
        contract_id: raw
            .contract_id
            .clone()
            .unwrap_or_else(|| contract_id.to_string()),
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Pull the actor and amount out of the event data struct. The RPC renders
/// `#[contracttype]` structs as JSON maps keyed by field name.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::ProjectCreated => (
            extract_field(value, &["owner"]),
            extract_field(value, &["funding_goal"]),
        ),
        EventKind::Contributed => (
            extract_field(value, &["contributor"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::ProjectSucceeded => (None, extract_field(value, &["total_funding"])),
        EventKind::ProjectCancelled => (extract_field(value, &["owner"]), None),
        EventKind::OwnerWithdrawal => (
            extract_field(value, &["owner"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::ContributionRefunded => (
            extract_field(value, &["contributor"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::Unknown => (None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key))
        .find_map(scalar_string)
}

/// Render a decoded SCVal as a plain string. Handles bare strings and
/// numbers, `{"type":…,"value":…}` wrappers and i128 `{"hi":…,"lo":…}` parts.
fn scalar_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => {
            if let (Some(hi), Some(lo)) = (map.get("hi"), map.get("lo")) {
                return i128_from_parts(hi, lo).map(|n| n.to_string());
            }
            map.get("value").and_then(scalar_string)
        }
        _ => None,
    }
}

fn i128_from_parts(hi: &Value, lo: &Value) -> Option<i128> {
    let hi = hi
        .as_i64()
        .or_else(|| hi.as_str().and_then(|s| s.parse().ok()))?;
    let lo = lo
        .as_u64()
        .or_else(|| lo.as_str().and_then(|s| s.parse().ok()))?;
    Some(((hi as i128) << 64) | lo as i128)
}

/// Extract a Soroban Symbol from the XDR-decoded topic string.
/// The RPC may return `{"type":"symbol","value":"created"}` or just the raw string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    raw.to_string()
}

/// Extract the project id from a topic entry that might be a JSON object or raw number/string.
fn extract_u64_or_raw(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(n) = v.get("value").and_then(|x| x.as_u64()) {
            return n.to_string();
        }
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    raw.to_string()
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    chrono::DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────
