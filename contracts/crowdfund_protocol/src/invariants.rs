#![allow(dead_code)]

extern crate std;

use crate::types::{Project, ProjectStatus};

/// INV-1: `total_funding` equals the sum of every per-contributor balance.
pub fn assert_total_matches_contributions(project: &Project, balances: &[i128]) {
    let sum: i128 = balances.iter().sum();
    assert_eq!(
        project.total_funding, sum,
        "INV-1 violated: project {} total_funding {} != sum of contributions {}",
        project.id, project.total_funding, sum
    );
}

/// INV-2: the owner never withdraws more than was raised.
pub fn assert_withdrawn_within_total(project: &Project) {
    assert!(
        project.withdrawn_by_owner >= 0 && project.withdrawn_by_owner <= project.total_funding,
        "INV-2 violated: project {} withdrew {} of {}",
        project.id,
        project.withdrawn_by_owner,
        project.total_funding
    );
}

/// INV-3: a successful project has met its goal.
pub fn assert_success_implies_goal(project: &Project) {
    if project.status == ProjectStatus::Successful {
        assert!(
            project.total_funding >= project.funding_goal,
            "INV-3 violated: project {} is Successful with {} < goal {}",
            project.id,
            project.total_funding,
            project.funding_goal
        );
    }
}

/// INV-4: the funding goal is always positive.
pub fn assert_goal_positive(project: &Project) {
    assert!(
        project.funding_goal > 0,
        "INV-4 violated: project {} has non-positive goal ({})",
        project.id,
        project.funding_goal
    );
}

/// INV-5: status only moves forward. Staying put is always allowed;
/// otherwise only Active -> Successful and Active -> Failed exist.
pub fn assert_valid_status_transition(from: &ProjectStatus, to: &ProjectStatus) {
    let valid = from == to
        || matches!(
            (from, to),
            (ProjectStatus::Active, ProjectStatus::Successful)
                | (ProjectStatus::Active, ProjectStatus::Failed)
        );

    assert!(
        valid,
        "INV-5 violated: invalid status transition from {:?} to {:?}",
        from, to
    );
}

/// INV-6: `withdrawn_by_owner` never decreases, and only grows while the
/// project is `Successful`.
pub fn assert_withdrawal_progress(before: &Project, after: &Project) {
    assert!(
        after.withdrawn_by_owner >= before.withdrawn_by_owner,
        "INV-6 violated: withdrawn_by_owner decreased from {} to {}",
        before.withdrawn_by_owner,
        after.withdrawn_by_owner
    );
    if after.withdrawn_by_owner > before.withdrawn_by_owner {
        assert_eq!(
            after.status,
            ProjectStatus::Successful,
            "INV-6 violated: owner withdrew while project was {:?}",
            after.status
        );
    }
}

/// INV-7: while a project is active its total never decreases.
pub fn assert_active_total_monotonic(before: &Project, after: &Project) {
    if after.status == ProjectStatus::Active {
        assert!(
            after.total_funding >= before.total_funding,
            "INV-7 violated: active total decreased from {} to {}",
            before.total_funding,
            after.total_funding
        );
    }
}

/// INV-8: fields fixed at creation never change.
pub fn assert_project_immutable_fields(original: &Project, current: &Project) {
    assert_eq!(original.id, current.id, "INV-8 violated: project id changed");
    assert_eq!(
        original.owner, current.owner,
        "INV-8 violated: project owner changed"
    );
    assert_eq!(
        original.funding_goal, current.funding_goal,
        "INV-8 violated: project funding_goal changed"
    );
}

/// INV-9: the contract holds exactly what it still owes for this project.
pub fn assert_custody_matches(project: &Project, custody: i128) {
    assert_eq!(
        custody,
        project.total_funding - project.withdrawn_by_owner,
        "INV-9 violated: project {} custody {} != total {} - withdrawn {}",
        project.id,
        custody,
        project.total_funding,
        project.withdrawn_by_owner
    );
}

/// INV-10: contributor_count never decreases.
pub fn assert_contributor_count_monotonic(count_before: u32, count_after: u32) {
    assert!(
        count_after >= count_before,
        "INV-10 violated: contributor_count decreased from {} to {}",
        count_before,
        count_after
    );
}

/// Run all stateless project invariants.
pub fn assert_all_project_invariants(project: &Project) {
    assert_goal_positive(project);
    assert_withdrawn_within_total(project);
    assert_success_implies_goal(project);
}

/// Run all invariants relating two consecutive snapshots of one project.
pub fn assert_all_transition_invariants(before: &Project, after: &Project) {
    assert_project_immutable_fields(before, after);
    assert_valid_status_transition(&before.status, &after.status);
    assert_withdrawal_progress(before, after);
    assert_active_total_monotonic(before, after);
    assert_contributor_count_monotonic(before.contributor_count, after.contributor_count);
}
