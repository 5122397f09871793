//! # Crowdfund Protocol Contract
//!
//! A single-beneficiary crowdfunding escrow. Each project collects
//! contributions toward a fixed funding goal and ends either `Successful`
//! (the owner withdraws) or `Failed` (contributors reclaim their funds).
//!
//! | Phase        | Entry Point(s)                                        |
//! |--------------|-------------------------------------------------------|
//! | Deployment   | `__constructor(token)`                                |
//! | Registry     | [`CrowdfundProtocol::create_project`], `get_projects_of`, `project_count` |
//! | Funding      | [`CrowdfundProtocol::contribute`]                     |
//! | Cancellation | [`CrowdfundProtocol::cancel_project`]                 |
//! | Payout       | `withdraw_contributed_funds_owner`, `withdraw_contribution` |
//! | Queries      | `get_project`, `get_user_tier`, `owner`, `funding_goal`, `total_funding`, `contributions`, ... |
//!
//! ## Architecture
//!
//! Campaign rules live in `escrow` (storage and token plumbing) on top of
//! the pure ledger methods of `ProjectState`. Project creation and the
//! per-owner index live in `registry`. Storage access is fully delegated
//! to `storage`. This file contains only the public entry points.

#![no_std]

#[cfg(test)]
extern crate std;

use soroban_sdk::{contract, contracterror, contractimpl, Address, Env, Vec};

mod escrow;
pub mod events;
mod registry;
mod storage;
mod types;

#[cfg(test)]
mod invariants;
#[cfg(test)]
mod test_contributor_count;
#[cfg(test)]
mod test_events;

pub use types::{
    Project, ProjectStatus, Tier, GOLD_THRESHOLD, MIN_CONTRIBUTION, SILVER_THRESHOLD, UNIT,
};

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    Unauthorized          = 1,
    CampaignClosed        = 2,
    BelowMinimum          = 3,
    GoalNotReached        = 4,
    InsufficientAvailable = 5,
    StillActive           = 6,
    NoFunds               = 7,
    ProjectNotFound       = 8,
    InvalidGoal           = 9,
    InvalidAmount         = 10,
    Overflow              = 11,
    AlreadyClosed         = 12,
}

impl Error {
    /// Human-readable reason surfaced to callers.
    pub fn message(&self) -> &'static str {
        match self {
            Error::Unauthorized => "Only owner allowed.",
            Error::CampaignClosed => "Contribution is not allowed anymore.",
            Error::BelowMinimum => "Value must be at least 0.01 units.",
            Error::GoalNotReached => "Funding goal not reached yet.",
            Error::InsufficientAvailable => "Not enough funds available",
            Error::StillActive => "Project still going.",
            Error::NoFunds => "No available funds",
            Error::ProjectNotFound => "Project not found.",
            Error::InvalidGoal => "Funding goal must be positive.",
            Error::InvalidAmount => "Amount must not be negative.",
            Error::Overflow => "Arithmetic overflow.",
            Error::AlreadyClosed => "Project is no longer active.",
        }
    }
}

#[contract]
pub struct CrowdfundProtocol;

#[contractimpl]
impl CrowdfundProtocol {
    /// Fix the currency token every project of this contract is funded in.
    pub fn __constructor(env: Env, token: Address) {
        storage::set_token(&env, &token);
    }

    // ─────────────────────────────────────────────────────────
    // Registry
    // ─────────────────────────────────────────────────────────

    /// Open a new campaign for `beneficiary` and return its handle.
    ///
    /// Anyone may create a campaign on behalf of a beneficiary. Fails with
    /// `InvalidGoal` unless `funding_goal > 0`.
    pub fn create_project(
        env: Env,
        beneficiary: Address,
        funding_goal: i128,
    ) -> Result<u64, Error> {
        registry::create_project(&env, beneficiary, funding_goal)
    }

    /// Handles of every project created for `owner`, in creation order.
    pub fn get_projects_of(env: Env, owner: Address) -> Vec<u64> {
        registry::projects_of(&env, &owner)
    }

    pub fn project_count(env: Env) -> u64 {
        storage::get_project_count(&env)
    }

    // ─────────────────────────────────────────────────────────
    // Escrow
    // ─────────────────────────────────────────────────────────

    /// Contribute `amount` of the currency token to an active project.
    ///
    /// The contribution that reaches the goal is accepted in full and makes
    /// the project `Successful`.
    pub fn contribute(
        env: Env,
        project_id: u64,
        contributor: Address,
        amount: i128,
    ) -> Result<(), Error> {
        contributor.require_auth();
        escrow::contribute(&env, project_id, &contributor, amount)
    }

    /// Mark an active project as `Failed`. Owner only; irreversible.
    pub fn cancel_project(env: Env, project_id: u64, caller: Address) -> Result<(), Error> {
        escrow::cancel(&env, project_id, &caller)
    }

    /// Tier of `user` based on their cumulative contribution, `None` if they
    /// never contributed (or were refunded).
    pub fn get_user_tier(
        env: Env,
        project_id: u64,
        user: Address,
    ) -> Result<Option<Tier>, Error> {
        escrow::user_tier(&env, project_id, &user)
    }

    /// Send `amount` of the raised funds to the owner of a successful project.
    pub fn withdraw_contributed_funds_owner(
        env: Env,
        project_id: u64,
        caller: Address,
        amount: i128,
    ) -> Result<(), Error> {
        escrow::withdraw_owner(&env, project_id, &caller, amount)
    }

    /// Return the contributor's whole balance from a failed project.
    pub fn withdraw_contribution(
        env: Env,
        project_id: u64,
        contributor: Address,
    ) -> Result<i128, Error> {
        contributor.require_auth();
        escrow::refund(&env, project_id, &contributor)
    }

    // ─────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────

    pub fn get_project(env: Env, project_id: u64) -> Result<Project, Error> {
        storage::load_project(&env, project_id)
    }

    pub fn owner(env: Env, project_id: u64) -> Result<Address, Error> {
        Ok(storage::load_project_config(&env, project_id)?.owner)
    }

    pub fn funding_goal(env: Env, project_id: u64) -> Result<i128, Error> {
        Ok(storage::load_project_config(&env, project_id)?.funding_goal)
    }

    pub fn total_funding(env: Env, project_id: u64) -> Result<i128, Error> {
        Ok(storage::load_project_state(&env, project_id)?.total_funding)
    }

    pub fn withdrawn_by_owner(env: Env, project_id: u64) -> Result<i128, Error> {
        Ok(storage::load_project_state(&env, project_id)?.withdrawn_by_owner)
    }

    /// What the owner may still withdraw: `total_funding - withdrawn_by_owner`.
    pub fn available_balance(env: Env, project_id: u64) -> Result<i128, Error> {
        Ok(storage::load_project_state(&env, project_id)?.available())
    }

    pub fn status(env: Env, project_id: u64) -> Result<ProjectStatus, Error> {
        Ok(storage::load_project_state(&env, project_id)?.status)
    }

    /// Cumulative contribution of `contributor`; zero for unknown addresses.
    pub fn contributions(env: Env, project_id: u64, contributor: Address) -> Result<i128, Error> {
        storage::load_project_config(&env, project_id)?;
        Ok(storage::get_contribution(&env, project_id, &contributor))
    }
}
