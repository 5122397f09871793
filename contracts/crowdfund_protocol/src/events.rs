//! Contract events.
//!
//! Every state change publishes one event whose topics are
//! `(symbol, project_id)` and whose data is one of the structs below. The
//! off-chain indexer keys on the symbol.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

pub const CREATED: Symbol = symbol_short!("created");
pub const CONTRIBUTED: Symbol = symbol_short!("contrib");
pub const SUCCEEDED: Symbol = symbol_short!("success");
pub const CANCELLED: Symbol = symbol_short!("cancelled");
pub const WITHDRAWN: Symbol = symbol_short!("withdrawn");
pub const REFUNDED: Symbol = symbol_short!("refunded");

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCreated {
    pub project_id: u64,
    pub owner: Address,
    pub funding_goal: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contributed {
    pub project_id: u64,
    pub contributor: Address,
    pub amount: i128,
    pub total_funding: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectSucceeded {
    pub project_id: u64,
    pub total_funding: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectCancelled {
    pub project_id: u64,
    pub owner: Address,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnerWithdrawal {
    pub project_id: u64,
    pub owner: Address,
    pub amount: i128,
    /// Amount the owner may still withdraw afterwards.
    pub remaining: i128,
}

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ContributionRefunded {
    pub project_id: u64,
    pub contributor: Address,
    pub amount: i128,
}

pub fn emit_project_created(env: &Env, event: ProjectCreated) {
    env.events().publish((CREATED, event.project_id), event);
}

pub fn emit_contributed(env: &Env, event: Contributed) {
    env.events().publish((CONTRIBUTED, event.project_id), event);
}

pub fn emit_project_succeeded(env: &Env, event: ProjectSucceeded) {
    env.events().publish((SUCCEEDED, event.project_id), event);
}

pub fn emit_project_cancelled(env: &Env, event: ProjectCancelled) {
    env.events().publish((CANCELLED, event.project_id), event);
}

pub fn emit_owner_withdrawal(env: &Env, event: OwnerWithdrawal) {
    env.events().publish((WITHDRAWN, event.project_id), event);
}

pub fn emit_contribution_refunded(env: &Env, event: ContributionRefunded) {
    env.events().publish((REFUNDED, event.project_id), event);
}
