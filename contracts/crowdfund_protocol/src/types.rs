//! # Types
//!
//! Shared data structures used across all modules of the crowdfunding protocol.
//!
//! ## Design decisions
//!
//! ### Config / State split
//!
//! A `Project` is internally stored as two separate ledger entries:
//!
//! - [`ProjectConfig`] — written once by `create_project`; never mutated.
//! - [`ProjectState`] — written on every contribution, cancellation and
//!   withdrawal.
//!
//! Per-contributor balances live in their own entries keyed by
//! `(project_id, contributor)`. The public API exposes the reconstructed
//! [`Project`] struct for convenience.
//!
//! ### Status as a Finite-State Machine
//!
//! [`ProjectStatus`] enforces a strict forward-only lifecycle:
//!
//! ```text
//! Active ──(goal reached on contribute)──► Successful
//!    └─────────(owner cancels)───────────► Failed
//! ```
//!
//! Both `Successful` and `Failed` are terminal.
//!
//! ### Amounts
//!
//! All amounts are `i128` fixed-point values with 18 decimal places, so
//! [`UNIT`] represents one whole currency unit.

use soroban_sdk::{contracttype, Address};

use crate::Error;

/// One whole currency unit (18 decimal places).
pub const UNIT: i128 = 1_000_000_000_000_000_000;

/// Smallest accepted contribution: 0.01 units.
pub const MIN_CONTRIBUTION: i128 = UNIT / 100;

/// Cumulative contribution at which a contributor becomes [`Tier::Silver`].
pub const SILVER_THRESHOLD: i128 = UNIT / 2;

/// Cumulative contribution at which a contributor becomes [`Tier::Gold`].
pub const GOLD_THRESHOLD: i128 = UNIT;

/// Lifecycle status of a project.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ProjectStatus {
    /// Accepting contributions.
    Active,
    /// Funding goal reached; the owner may withdraw.
    Successful,
    /// Cancelled by the owner; contributors may reclaim their funds.
    Failed,
}

/// Reward tier derived from a contributor's cumulative contribution.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Tier {
    Bronze = 1,
    Silver = 2,
    Gold = 3,
}

impl Tier {
    /// Classify a cumulative contribution. Amounts under
    /// [`MIN_CONTRIBUTION`] carry no tier.
    pub fn for_amount(amount: i128) -> Option<Tier> {
        if amount >= GOLD_THRESHOLD {
            Some(Tier::Gold)
        } else if amount >= SILVER_THRESHOLD {
            Some(Tier::Silver)
        } else if amount >= MIN_CONTRIBUTION {
            Some(Tier::Bronze)
        } else {
            None
        }
    }
}

/// Immutable project configuration, written once at creation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectConfig {
    pub id: u64,
    pub owner: Address,
    pub funding_goal: i128,
}

/// Mutable project state: the campaign's running ledger.
///
/// `total_funding` always equals the sum of every per-contributor entry of
/// the project, and `withdrawn_by_owner` never exceeds `total_funding`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ProjectState {
    pub total_funding: i128,
    pub withdrawn_by_owner: i128,
    pub contributor_count: u32,
    pub status: ProjectStatus,
}

impl ProjectState {
    pub fn new() -> Self {
        ProjectState {
            total_funding: 0,
            withdrawn_by_owner: 0,
            contributor_count: 0,
            status: ProjectStatus::Active,
        }
    }

    /// Portion of the raised funds the owner may still withdraw.
    pub fn available(&self) -> i128 {
        self.total_funding - self.withdrawn_by_owner
    }

    /// Account for an accepted contribution of `amount` on top of the
    /// contributor's `previous` cumulative balance and return the new balance.
    ///
    /// Flips the status to `Successful` once the goal is met; the crossing
    /// contribution is accepted in full.
    pub fn record_contribution(
        &mut self,
        funding_goal: i128,
        previous: i128,
        amount: i128,
    ) -> Result<i128, Error> {
        if amount < MIN_CONTRIBUTION {
            return Err(Error::BelowMinimum);
        }
        if self.status != ProjectStatus::Active {
            return Err(Error::CampaignClosed);
        }

        let balance = previous.checked_add(amount).ok_or(Error::Overflow)?;
        let total = self
            .total_funding
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        let count = if previous == 0 {
            self.contributor_count
                .checked_add(1)
                .ok_or(Error::Overflow)?
        } else {
            self.contributor_count
        };

        self.total_funding = total;
        self.contributor_count = count;
        if self.total_funding >= funding_goal {
            self.status = ProjectStatus::Successful;
        }
        Ok(balance)
    }

    /// Move an active campaign to `Failed`.
    pub fn cancel(&mut self) -> Result<(), Error> {
        if self.status != ProjectStatus::Active {
            return Err(Error::AlreadyClosed);
        }
        self.status = ProjectStatus::Failed;
        Ok(())
    }

    /// Account for an owner withdrawal of `amount` and return what remains
    /// available afterwards.
    pub fn record_owner_withdrawal(&mut self, amount: i128) -> Result<i128, Error> {
        if self.status != ProjectStatus::Successful {
            return Err(Error::GoalNotReached);
        }
        if amount < 0 {
            return Err(Error::InvalidAmount);
        }
        if amount > self.available() {
            return Err(Error::InsufficientAvailable);
        }
        self.withdrawn_by_owner = self
            .withdrawn_by_owner
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        Ok(self.available())
    }

    /// Account for a contributor reclaiming their whole `balance`.
    ///
    /// `total_funding` drops by the same amount so it keeps matching the
    /// sum of the per-contributor entries once that entry is zeroed.
    pub fn record_refund(&mut self, balance: i128) -> Result<(), Error> {
        if self.status != ProjectStatus::Failed {
            return Err(Error::StillActive);
        }
        if balance <= 0 {
            return Err(Error::NoFunds);
        }
        self.total_funding = self
            .total_funding
            .checked_sub(balance)
            .ok_or(Error::Overflow)?;
        Ok(())
    }
}

impl Default for ProjectState {
    fn default() -> Self {
        Self::new()
    }
}

/// Full on-chain representation of a crowdfunding project.
///
/// Used as the public API return type; reconstructed internally from
/// the split `ProjectConfig` + `ProjectState` storage entries.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Project {
    /// Handle of the project (auto-incremented from 0).
    pub id: u64,
    /// Beneficiary that receives the funds of a successful campaign.
    pub owner: Address,
    /// Target amount; reaching it makes the campaign successful.
    pub funding_goal: i128,
    /// Sum of all accepted contributions.
    pub total_funding: i128,
    /// Sum of everything the owner has withdrawn so far.
    pub withdrawn_by_owner: i128,
    /// Number of distinct contributors.
    pub contributor_count: u32,
    /// Current lifecycle status.
    pub status: ProjectStatus,
}
