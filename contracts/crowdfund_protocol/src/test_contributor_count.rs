extern crate std;

use soroban_sdk::{testutils::Address as _, token, Address, Env};

use crate::invariants::assert_contributor_count_monotonic;
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

fn donor(env: &Env, sac: &token::StellarAssetClient) -> Address {
    let who = Address::generate(env);
    sac.mint(&who, &(2 * UNIT));
    who
}

#[test]
fn test_contributor_count_initialized_to_zero() {
    let (env, client, _) = setup();
    let owner = Address::generate(&env);
    let id = client.create_project(&owner, &(10 * UNIT));

    assert_eq!(client.get_project(&id).contributor_count, 0);
}

#[test]
fn test_contributor_count_increments_for_new_contributor() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let id = client.create_project(&owner, &(10 * UNIT));
    let alice = donor(&env, &sac);

    client.contribute(&id, &alice, &(UNIT / 2));

    assert_eq!(client.get_project(&id).contributor_count, 1);
}

#[test]
fn test_contributor_count_stays_same_for_repeated_contributor() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let id = client.create_project(&owner, &(10 * UNIT));
    let alice = donor(&env, &sac);

    client.contribute(&id, &alice, &(UNIT / 2));
    assert_eq!(client.get_project(&id).contributor_count, 1);

    client.contribute(&id, &alice, &(UNIT / 4));
    assert_eq!(client.get_project(&id).contributor_count, 1);
}

#[test]
fn test_contributor_count_tracks_distinct_contributors() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let id = client.create_project(&owner, &(10 * UNIT));

    let mut previous = 0;
    for _ in 0..4 {
        let who = donor(&env, &sac);
        client.contribute(&id, &who, &(UNIT / 10));
        client.contribute(&id, &who, &(UNIT / 10));

        let count = client.get_project(&id).contributor_count;
        assert_contributor_count_monotonic(previous, count);
        assert_eq!(count, previous + 1);
        previous = count;
    }
    assert_eq!(previous, 4);
}

#[test]
fn test_rejected_contribution_does_not_count() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let id = client.create_project(&owner, &(10 * UNIT));
    let alice = donor(&env, &sac);

    assert!(client.try_contribute(&id, &alice, &(UNIT / 1_000)).is_err());
    assert_eq!(client.get_project(&id).contributor_count, 0);
}

#[test]
fn test_refund_does_not_decrease_contributor_count() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let id = client.create_project(&owner, &(10 * UNIT));
    let alice = donor(&env, &sac);
    let bob = donor(&env, &sac);

    client.contribute(&id, &alice, &(UNIT / 2));
    client.contribute(&id, &bob, &(UNIT / 2));
    client.cancel_project(&id, &owner);
    client.withdraw_contribution(&id, &alice);

    let count = client.get_project(&id).contributor_count;
    assert_contributor_count_monotonic(2, count);
    assert_eq!(count, 2);
}

#[test]
fn test_contributor_count_is_per_project() {
    let (env, client, sac) = setup();
    let owner = Address::generate(&env);
    let first = client.create_project(&owner, &(10 * UNIT));
    let second = client.create_project(&owner, &(10 * UNIT));
    let alice = donor(&env, &sac);

    client.contribute(&first, &alice, &(UNIT / 2));
    client.contribute(&second, &alice, &(UNIT / 2));

    assert_eq!(client.get_project(&first).contributor_count, 1);
    assert_eq!(client.get_project(&second).contributor_count, 1);
}
