//! # Escrow
//!
//! Campaign operations over one project's storage entries. Each function
//! loads the ledger, applies the accounting rules from `ProjectState`,
//! persists every write and only then moves tokens out of custody.
//!
//! A failed call returns `Err` before anything is written; the host rolls
//! back the whole invocation on any error, so a rejected operation never
//! leaves a partial effect behind.

use soroban_sdk::{token, Address, Env};

use crate::events::{
    self, Contributed, ContributionRefunded, OwnerWithdrawal, ProjectCancelled, ProjectCreated,
    ProjectSucceeded,
};
use crate::storage::{
    get_and_increment_project_id, get_contribution, get_token, load_project_config,
    load_project_state, save_project, save_project_state, set_contribution,
};
use crate::types::{ProjectConfig, ProjectState, ProjectStatus, Tier};
use crate::Error;

/// Create a new campaign owned by `owner` and return its config.
pub fn create(env: &Env, owner: Address, funding_goal: i128) -> Result<ProjectConfig, Error> {
    if funding_goal <= 0 {
        return Err(Error::InvalidGoal);
    }

    let config = ProjectConfig {
        id: get_and_increment_project_id(env),
        owner,
        funding_goal,
    };
    save_project(env, &config, &ProjectState::new());

    events::emit_project_created(
        env,
        ProjectCreated {
            project_id: config.id,
            owner: config.owner.clone(),
            funding_goal,
        },
    );
    Ok(config)
}

pub fn contribute(env: &Env, id: u64, contributor: &Address, amount: i128) -> Result<(), Error> {
    let config = load_project_config(env, id)?;
    let mut state = load_project_state(env, id)?;

    let previous = get_contribution(env, id, contributor);
    let balance = state.record_contribution(config.funding_goal, previous, amount)?;

    token::Client::new(env, &get_token(env)).transfer(
        contributor,
        &env.current_contract_address(),
        &amount,
    );

    set_contribution(env, id, contributor, balance);
    save_project_state(env, id, &state);

    events::emit_contributed(
        env,
        Contributed {
            project_id: id,
            contributor: contributor.clone(),
            amount,
            total_funding: state.total_funding,
        },
    );
    if state.status == ProjectStatus::Successful {
        events::emit_project_succeeded(
            env,
            ProjectSucceeded {
                project_id: id,
                total_funding: state.total_funding,
            },
        );
    }
    Ok(())
}

pub fn cancel(env: &Env, id: u64, caller: &Address) -> Result<(), Error> {
    let config = load_project_config(env, id)?;
    require_owner(&config, caller)?;

    let mut state = load_project_state(env, id)?;
    state.cancel()?;
    save_project_state(env, id, &state);

    events::emit_project_cancelled(
        env,
        ProjectCancelled {
            project_id: id,
            owner: config.owner,
        },
    );
    Ok(())
}

pub fn user_tier(env: &Env, id: u64, user: &Address) -> Result<Option<Tier>, Error> {
    load_project_config(env, id)?;
    Ok(Tier::for_amount(get_contribution(env, id, user)))
}

pub fn withdraw_owner(env: &Env, id: u64, caller: &Address, amount: i128) -> Result<(), Error> {
    let config = load_project_config(env, id)?;
    require_owner(&config, caller)?;

    let mut state = load_project_state(env, id)?;
    let remaining = state.record_owner_withdrawal(amount)?;
    save_project_state(env, id, &state);

    if amount > 0 {
        token::Client::new(env, &get_token(env)).transfer(
            &env.current_contract_address(),
            &config.owner,
            &amount,
        );
    }

    events::emit_owner_withdrawal(
        env,
        OwnerWithdrawal {
            project_id: id,
            owner: config.owner,
            amount,
            remaining,
        },
    );
    Ok(())
}

/// Return the caller's whole balance and zero it. Returns the refunded amount.
pub fn refund(env: &Env, id: u64, contributor: &Address) -> Result<i128, Error> {
    let mut state = load_project_state(env, id)?;
    let amount = get_contribution(env, id, contributor);
    state.record_refund(amount)?;

    // Zeroed before the transfer so the same balance can never be paid twice.
    set_contribution(env, id, contributor, 0);
    save_project_state(env, id, &state);

    token::Client::new(env, &get_token(env)).transfer(
        &env.current_contract_address(),
        contributor,
        &amount,
    );

    events::emit_contribution_refunded(
        env,
        ContributionRefunded {
            project_id: id,
            contributor: contributor.clone(),
            amount,
        },
    );
    Ok(amount)
}

fn require_owner(config: &ProjectConfig, caller: &Address) -> Result<(), Error> {
    if *caller != config.owner {
        return Err(Error::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}
