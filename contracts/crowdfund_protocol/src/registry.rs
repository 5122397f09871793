//! # Registry
//!
//! Factory and index over campaigns. `create_project` opens a new escrow
//! for a beneficiary and appends its handle to that beneficiary's list.
//! It holds no funds and performs no validation of its own; the goal is
//! checked by `escrow::create`.

use soroban_sdk::{Address, Env, Vec};

use crate::escrow;
use crate::storage;
use crate::Error;

pub fn create_project(env: &Env, beneficiary: Address, funding_goal: i128) -> Result<u64, Error> {
    let config = escrow::create(env, beneficiary, funding_goal)?;
    storage::push_project_of(env, &config.owner, config.id);
    Ok(config.id)
}

/// Every project created for `owner`, oldest first.
pub fn projects_of(env: &Env, owner: &Address) -> Vec<u64> {
    storage::get_projects_of(env, owner)
}
