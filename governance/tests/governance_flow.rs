//! End-to-end proposal lifecycle: open, create, vote, query.

mod common;

use std::sync::Arc;

use agora_governance::{GovernanceEngine, GovernanceError, Proposal};
use agora_nullables::{NullClock, NullGovernanceStore, NullMembership};
use agora_types::{ProposalId, Timestamp};
use common::*;

const METADATA: &str = "ipfs://exampleMetadata";

fn id(raw: u64) -> ProposalId {
    ProposalId::new(raw)
}

#[test]
fn opening_requires_membership() {
    let store = Arc::new(NullGovernanceStore::new());
    let members = Arc::new(NullMembership::with_members([dao_member()]));
    let clock = Arc::new(NullClock::new(GENESIS));

    let refused = GovernanceEngine::open(&random_guy(), store.clone(), members.clone(), clock.clone());
    let err = refused.err().expect("non-member must not open the module");
    assert!(matches!(err, GovernanceError::Unauthorized { .. }));
    assert_eq!(
        err.to_string(),
        "only members of the community can create a governance module"
    );

    assert!(GovernanceEngine::open(&dao_member(), store, members, clock).is_ok());
}

#[test]
fn opening_surfaces_oracle_outage() {
    let members = Arc::new(NullMembership::with_members([dao_member()]));
    members.set_unreachable(true);
    let result = GovernanceEngine::open(
        &dao_member(),
        Arc::new(NullGovernanceStore::new()),
        members,
        Arc::new(NullClock::new(GENESIS)),
    );
    assert!(matches!(result, Err(GovernanceError::OracleUnavailable(_))));
}

#[test]
fn create_proposal() {
    let h = Harness::new();

    // No proposal exists yet: id 1 reads as the zero value.
    assert_eq!(h.engine.get_proposal(id(1)), Proposal::default());
    let p1 = h.engine.get_proposal(id(1));
    assert_eq!(p1.start_time, Timestamp::EPOCH);
    assert_eq!(p1.end_time, Timestamp::EPOCH);
    assert_eq!(p1.metadata, "");
    assert_eq!((p1.votes_for, p1.votes_against), (0, 0));
    assert!(h.engine.get_active_proposal_ids().is_empty());

    // A proposal starting now, lasting one week.
    let now = h.now();
    let created = h
        .engine
        .create_proposal(&dao_member(), now, now.plus_secs(ONE_WEEK), METADATA)
        .unwrap();
    assert_eq!(created, id(1));

    let p1 = h.engine.get_proposal(id(1));
    assert_eq!(p1.start_time, now);
    assert_eq!(p1.end_time, now.plus_secs(ONE_WEEK));
    assert_eq!(p1.metadata, METADATA);
    assert_eq!((p1.votes_for, p1.votes_against), (0, 0));

    assert_eq!(h.engine.get_active_proposal_ids(), vec![id(1)]);
    assert_eq!(h.engine.proposal_count(), 1);
}

#[test]
fn vote() {
    let h = Harness::new();
    let start = h.now().plus_secs(ONE_DAY);
    let end = start.plus_secs(ONE_WEEK);
    h.engine
        .create_proposal(&dao_member(), start, end, METADATA)
        .unwrap();
    let proposal = id(h.engine.proposal_count());

    // Before the start of the window.
    assert!(matches!(
        h.engine.vote(&voter(), proposal, true),
        Err(GovernanceError::NotStarted)
    ));

    // Two days into the window the member votes.
    h.clock.set(start.as_secs() + 2 * ONE_DAY);
    h.engine.vote(&voter(), proposal, true).unwrap();

    // No second ballot.
    let twice = h.engine.vote(&voter(), proposal, true).unwrap_err();
    assert!(matches!(twice, GovernanceError::AlreadyVoted));
    assert_eq!(twice.to_string(), "cannot vote twice");

    // Only members vote.
    let outsider = h.engine.vote(&random_guy(), proposal, true).unwrap_err();
    assert!(matches!(outsider, GovernanceError::Unauthorized { .. }));
    assert_eq!(outsider.to_string(), "only members of the community can vote");

    // After the end of the window.
    h.clock.set(end.as_secs() + ONE_DAY);
    let late = h.engine.vote(&dao_member(), proposal, false).unwrap_err();
    assert!(matches!(late, GovernanceError::Ended));
    assert_eq!(late.to_string(), "cannot vote after end time");

    let p = h.engine.get_proposal(proposal);
    assert_eq!((p.votes_for, p.votes_against), (1, 0));
}

#[test]
fn get_proposal() {
    let h = Harness::new();
    let start = h.now().plus_secs(ONE_DAY);
    let end = start.plus_secs(ONE_WEEK);

    h.engine.create_proposal(&dao_member(), start, end, METADATA).unwrap();
    h.engine.create_proposal(&voter(), start, end, METADATA).unwrap();

    for raw in [1, 2] {
        let p = h.engine.get_proposal(id(raw));
        assert_eq!(p, Proposal::new(start, end, METADATA));
    }
    assert_eq!(h.engine.get_proposal(id(3)), Proposal::default());
}

#[test]
fn get_active_proposal_ids() {
    let h = Harness::new();
    let start = h.now().plus_secs(ONE_DAY);
    let end = start.plus_secs(ONE_WEEK);

    h.engine.create_proposal(&dao_member(), start, end, METADATA).unwrap();
    assert_eq!(h.engine.get_active_proposal_ids(), vec![id(1)]);

    h.engine
        .create_proposal(&dao_member(), start, end.plus_secs(ONE_WEEK), METADATA)
        .unwrap();
    assert_eq!(h.engine.get_active_proposal_ids(), vec![id(1), id(2)]);

    // Proposal 1 ends; proposal 2 runs a week longer.
    h.clock.set(end.as_secs() + 1);
    assert_eq!(h.engine.get_active_proposal_ids(), vec![id(2)]);

    // Expired proposals stay readable.
    assert_eq!(h.engine.get_proposal(id(1)).metadata, METADATA);
}
