//! # Storage
//!
//! Provides typed helpers over Soroban's two storage tiers used by the protocol:
//!
//! ## Instance storage (contract-lifetime TTL)
//!
//! | Key              | Type      | Description                        |
//! |------------------|-----------|------------------------------------|
//! | `Token`          | `Address` | Currency token set at construction |
//! | `ProjectCount`   | `u64`     | Auto-increment project ID counter  |
//!
//! Instance TTL is bumped by **7 days** whenever it falls below 1 day remaining.
//!
//! ## Persistent storage (per-entry TTL)
//!
//! | Key                      | Type            | Description                         |
//! |--------------------------|-----------------|-------------------------------------|
//! | `ProjConfig(id)`         | `ProjectConfig` | Immutable project configuration     |
//! | `ProjState(id)`          | `ProjectState`  | Mutable project ledger              |
//! | `Contribution(id, addr)` | `i128`          | Cumulative contribution of `addr`   |
//! | `ProjectsOf(addr)`       | `Vec<u64>`      | Projects created for `addr`         |
//!
//! Persistent TTL is bumped by **30 days** whenever it falls below 7 days remaining.
//!
//! Contribution entries are never removed; a refund writes zero.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{Project, ProjectConfig, ProjectState};
use crate::Error;

// ── TTL Constants ────────────────────────────────────────────────────

/// Approximate ledgers per day (~5 seconds per ledger).
const DAY_IN_LEDGERS: u32 = 17_280;

/// Instance storage: bump by 7 days when below 1 day remaining.
const INSTANCE_BUMP_AMOUNT: u32 = 7 * DAY_IN_LEDGERS;
const INSTANCE_LIFETIME_THRESHOLD: u32 = DAY_IN_LEDGERS;

/// Persistent storage: bump by 30 days when below 7 days remaining.
const PERSISTENT_BUMP_AMOUNT: u32 = 30 * DAY_IN_LEDGERS;
const PERSISTENT_LIFETIME_THRESHOLD: u32 = 7 * DAY_IN_LEDGERS;

// ── Storage Keys ─────────────────────────────────────────────────────

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    /// Currency token contract (Instance).
    Token,
    /// Global auto-increment counter for project IDs (Instance).
    ProjectCount,
    /// Immutable project configuration keyed by ID (Persistent).
    ProjConfig(u64),
    /// Mutable project state keyed by ID (Persistent).
    ProjState(u64),
    /// Cumulative contribution keyed by (project ID, contributor) (Persistent).
    Contribution(u64, Address),
    /// Ordered project IDs created for an owner (Persistent).
    ProjectsOf(Address),
}

// ── Instance Storage Helpers ─────────────────────────────────────────

fn bump_instance(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(INSTANCE_LIFETIME_THRESHOLD, INSTANCE_BUMP_AMOUNT);
}

pub fn set_token(env: &Env, token: &Address) {
    env.storage().instance().set(&DataKey::Token, token);
    bump_instance(env);
}

/// Retrieve the currency token. It is written by the constructor, so it is
/// always present once the contract exists.
pub fn get_token(env: &Env) -> Address {
    bump_instance(env);
    env.storage()
        .instance()
        .get(&DataKey::Token)
        .expect("token not set")
}

/// Reads, increments, and stores the project counter.
/// Returns the ID to use for the *current* project (pre-increment value).
pub fn get_and_increment_project_id(env: &Env) -> u64 {
    bump_instance(env);
    let current = get_project_count(env);
    env.storage()
        .instance()
        .set(&DataKey::ProjectCount, &(current + 1));
    current
}

pub fn get_project_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::ProjectCount)
        .unwrap_or(0)
}

// ── Persistent Storage Helpers ───────────────────────────────────────

fn bump_persistent(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, PERSISTENT_LIFETIME_THRESHOLD, PERSISTENT_BUMP_AMOUNT);
}

/// Save the immutable config and the initial ledger of a new project.
pub fn save_project(env: &Env, config: &ProjectConfig, state: &ProjectState) {
    let config_key = DataKey::ProjConfig(config.id);
    let state_key = DataKey::ProjState(config.id);

    env.storage().persistent().set(&config_key, config);
    env.storage().persistent().set(&state_key, state);
    bump_persistent(env, &config_key);
    bump_persistent(env, &state_key);
}

/// Load the full `Project` by combining config and state.
pub fn load_project(env: &Env, id: u64) -> Result<Project, Error> {
    let config = load_project_config(env, id)?;
    let state = load_project_state(env, id)?;
    Ok(Project {
        id: config.id,
        owner: config.owner,
        funding_goal: config.funding_goal,
        total_funding: state.total_funding,
        withdrawn_by_owner: state.withdrawn_by_owner,
        contributor_count: state.contributor_count,
        status: state.status,
    })
}

pub fn load_project_config(env: &Env, id: u64) -> Result<ProjectConfig, Error> {
    let key = DataKey::ProjConfig(id);
    let config: ProjectConfig = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ProjectNotFound)?;
    bump_persistent(env, &key);
    Ok(config)
}

pub fn load_project_state(env: &Env, id: u64) -> Result<ProjectState, Error> {
    let key = DataKey::ProjState(id);
    let state: ProjectState = env
        .storage()
        .persistent()
        .get(&key)
        .ok_or(Error::ProjectNotFound)?;
    bump_persistent(env, &key);
    Ok(state)
}

/// Save only the mutable project ledger.
pub fn save_project_state(env: &Env, id: u64, state: &ProjectState) {
    let key = DataKey::ProjState(id);
    env.storage().persistent().set(&key, state);
    bump_persistent(env, &key);
}

/// Cumulative contribution of `contributor` to project `id`; zero when the
/// address never contributed.
pub fn get_contribution(env: &Env, id: u64, contributor: &Address) -> i128 {
    let key = DataKey::Contribution(id, contributor.clone());
    let amount = env.storage().persistent().get(&key);
    if amount.is_some() {
        bump_persistent(env, &key);
    }
    amount.unwrap_or(0)
}

pub fn set_contribution(env: &Env, id: u64, contributor: &Address, amount: i128) {
    let key = DataKey::Contribution(id, contributor.clone());
    env.storage().persistent().set(&key, &amount);
    bump_persistent(env, &key);
}

pub fn get_projects_of(env: &Env, owner: &Address) -> Vec<u64> {
    let key = DataKey::ProjectsOf(owner.clone());
    match env.storage().persistent().get(&key) {
        Some(ids) => {
            bump_persistent(env, &key);
            ids
        }
        None => Vec::new(env),
    }
}

/// Append `id` to the list of projects created for `owner`.
pub fn push_project_of(env: &Env, owner: &Address, id: u64) {
    let key = DataKey::ProjectsOf(owner.clone());
    let mut ids = get_projects_of(env, owner);
    ids.push_back(id);
    env.storage().persistent().set(&key, &ids);
    bump_persistent(env, &key);
}
