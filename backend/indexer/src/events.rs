//! Canonical event types emitted by the crowdfund protocol contract.
//!
//! These mirror the Soroban contract events defined in
//! `contracts/crowdfund_protocol/src/events.rs`.

use serde::{Deserialize, Serialize};

/// All recognised event kinds from the crowdfund contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A new project was opened through the registry (`created` topic).
    ProjectCreated,
    /// A contribution was accepted (`contrib` topic).
    Contributed,
    /// The funding goal was reached (`success` topic).
    ProjectSucceeded,
    /// The owner cancelled the project (`cancelled` topic).
    ProjectCancelled,
    /// The owner withdrew raised funds (`withdrawn` topic).
    OwnerWithdrawal,
    /// A contributor reclaimed their balance (`refunded` topic).
    ContributionRefunded,
    /// An event from this contract that we don't recognise yet.
    Unknown,
}

impl EventKind {
    /// Parse the leading topic symbol string produced by Soroban into an [`EventKind`].
    pub fn from_topic(topic: &str) -> Self {
        match topic {
            "created" => Self::ProjectCreated,
            "contrib" => Self::Contributed,
            "success" => Self::ProjectSucceeded,
            "cancelled" => Self::ProjectCancelled,
            "withdrawn" => Self::OwnerWithdrawal,
            "refunded" => Self::ContributionRefunded,
            _ => Self::Unknown,
        }
    }

    /// Return a short identifier string suitable for storage in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProjectCreated => "project_created",
            Self::Contributed => "contributed",
            Self::ProjectSucceeded => "project_succeeded",
            Self::ProjectCancelled => "project_cancelled",
            Self::OwnerWithdrawal => "owner_withdrawal",
            Self::ContributionRefunded => "contribution_refunded",
            Self::Unknown => "unknown",
        }
    }
}

/// A fully decoded crowdfund event, ready to be stored in the database.
///
/// `event_id` is the RPC's per-event id and the deduplication key. `actor` is the owner for project-level events and the contributor for
/// contributions and refunds. `amount` is the raw 18-decimal integer as a
/// decimal string (the goal for `created`, the running total for `success`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrowdfundEvent {
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
}

/// A raw event record as stored in / read from the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EventRecord {
    pub id: i64,
    pub event_id: String,
    pub event_type: String,
    pub project_id: Option<String>,
    pub actor: Option<String>,
    pub amount: Option<String>,
    pub ledger: i64,
    pub timestamp: i64,
    pub contract_id: String,
    pub tx_hash: Option<String>,
    pub created_at: i64,
}
