extern crate std;

use std::vec::Vec as StdVec;

use soroban_sdk::{
    symbol_short,
    testutils::{Address as _, Events},
    token, vec, Address, Env, IntoVal, TryIntoVal, Val, Vec,
};

use crate::events::{
    Contributed, ContributionRefunded, OwnerWithdrawal, ProjectCancelled, ProjectCreated,
    ProjectSucceeded,
};
use crate::{CrowdfundProtocol, CrowdfundProtocolClient, UNIT};

fn setup() -> (Env, CrowdfundProtocolClient<'static>, token::StellarAssetClient<'static>) {
    let env = Env::default();
    env.mock_all_auths();
    let token_admin = Address::generate(&env);
    let asset = env.register_stellar_asset_contract_v2(token_admin);
    let contract_id = env.register(CrowdfundProtocol, (asset.address(),));
    let client = CrowdfundProtocolClient::new(&env, &contract_id);
    let sac = token::StellarAssetClient::new(&env, &asset.address());
    (env, client, sac)
}

/// Events published by the protocol contract itself, oldest first. Token
/// transfer events are skipped.
fn protocol_events(env: &Env, client: &CrowdfundProtocolClient) -> StdVec<(Vec<Val>, Val)> {
    env.events()
        .all()
        .iter()
        .filter(|(contract, _, _)| *contract == client.address)
        .map(|(_, topics, data)| (topics, data))
        .collect()
}

fn last_protocol_event(env: &Env, client: &CrowdfundProtocolClient) -> (Vec<Val>, Val) {
    protocol_events(env, client)
        .pop()
        .expect("No protocol events found")
}

#[test]
fn test_project_created_event() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    let goal = 3 * UNIT;

    let id = client.create_project(&owner, &goal);

    let (topics, data) = last_protocol_event(&env, &client);
    let expected_topics = vec![
        &env,
        symbol_short!("created").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(topics, expected_topics);

    let event_data: ProjectCreated = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProjectCreated {
            project_id: id,
            owner: owner.clone(),
            funding_goal: goal,
        }
    );
}

#[test]
fn test_contributed_event() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let donor = Address::generate(&env);
    sac.mint(&donor, &UNIT);
    let id = client.create_project(&owner, &(3 * UNIT));

    client.contribute(&id, &donor, &(UNIT / 4));

    let (topics, data) = last_protocol_event(&env, &client);
    let expected_topics = vec![
        &env,
        symbol_short!("contrib").into_val(&env),
        id.into_val(&env),
    ];
    assert_eq!(topics, expected_topics);

    let event_data: Contributed = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        Contributed {
            project_id: id,
            contributor: donor.clone(),
            amount: UNIT / 4,
            total_funding: UNIT / 4,
        }
    );
}

#[test]
fn test_goal_reached_publishes_success_after_contribution() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let donor = Address::generate(&env);
    sac.mint(&donor, &(2 * UNIT));
    let id = client.create_project(&owner, &UNIT);

    client.contribute(&id, &donor, &(2 * UNIT));

    let events = protocol_events(&env, &client);
    let n = events.len();
    assert!(n >= 2);

    let (contrib_topics, _) = &events[n - 2];
    assert_eq!(
        *contrib_topics,
        vec![
            &env,
            symbol_short!("contrib").into_val(&env),
            id.into_val(&env)
        ]
    );

    let (topics, data) = &events[n - 1];
    assert_eq!(
        *topics,
        vec![
            &env,
            symbol_short!("success").into_val(&env),
            id.into_val(&env)
        ]
    );
    let event_data: ProjectSucceeded = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProjectSucceeded {
            project_id: id,
            total_funding: 2 * UNIT,
        }
    );
}

#[test]
fn test_cancelled_event() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    let id = client.create_project(&owner, &UNIT);

    client.cancel_project(&id, &owner);

    let (topics, data) = last_protocol_event(&env, &client);
    assert_eq!(
        topics,
        vec![
            &env,
            symbol_short!("cancelled").into_val(&env),
            id.into_val(&env)
        ]
    );
    let event_data: ProjectCancelled = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ProjectCancelled {
            project_id: id,
            owner: owner.clone(),
        }
    );
}

#[test]
fn test_owner_withdrawal_event() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let donor = Address::generate(&env);
    sac.mint(&donor, &(2 * UNIT));
    let id = client.create_project(&owner, &UNIT);
    client.contribute(&id, &donor, &(2 * UNIT));

    client.withdraw_contributed_funds_owner(&id, &owner, &(UNIT / 2));

    let (topics, data) = last_protocol_event(&env, &client);
    assert_eq!(
        topics,
        vec![
            &env,
            symbol_short!("withdrawn").into_val(&env),
            id.into_val(&env)
        ]
    );
    let event_data: OwnerWithdrawal = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        OwnerWithdrawal {
            project_id: id,
            owner: owner.clone(),
            amount: UNIT / 2,
            remaining: 2 * UNIT - UNIT / 2,
        }
    );
}

#[test]
fn test_refund_event() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let donor = Address::generate(&env);
    sac.mint(&donor, &UNIT);
    let id = client.create_project(&owner, &(2 * UNIT));
    client.contribute(&id, &donor, &(UNIT / 2));
    client.cancel_project(&id, &owner);

    client.withdraw_contribution(&id, &donor);

    let (topics, data) = last_protocol_event(&env, &client);
    assert_eq!(
        topics,
        vec![
            &env,
            symbol_short!("refunded").into_val(&env),
            id.into_val(&env)
        ]
    );
    let event_data: ContributionRefunded = data.try_into_val(&env).unwrap();
    assert_eq!(
        event_data,
        ContributionRefunded {
            project_id: id,
            contributor: donor.clone(),
            amount: UNIT / 2,
        }
    );
}

#[test]
fn test_rejected_call_publishes_nothing() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let donor = Address::generate(&env);
    sac.mint(&donor, &UNIT);
    let id = client.create_project(&owner, &UNIT);

    assert!(client.try_contribute(&id, &donor, &1).is_err());

    let contrib_topics = vec![
        &env,
        symbol_short!("contrib").into_val(&env),
        id.into_val(&env),
    ];
    assert!(protocol_events(&env, &client)
        .iter()
        .all(|(topics, _)| *topics != contrib_topics));
}
