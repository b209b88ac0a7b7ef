//! End-to-end behaviour of the ledger: challenge, claim, admission, queries
//! and tamper detection.

use std::thread;

use proptest::prelude::*;
use starledger::core::{Chain, PendingBlock};
use starledger::{BlockHash, ChainError, ClaimError, LedgerConfig, LedgerError, ValidationError};
use starledger_testkit::fixtures::{identities, sample_star, TestIdentity, TestLedger, T0};
use starledger_testkit::generators::claim_plan;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[test]
fn genesis_invariant() {
    let fixture = TestLedger::new();
    let ledger = &fixture.ledger;

    assert_eq!(ledger.height(), 0);
    let blocks = ledger.snapshot();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].previous_hash, None);
    assert!(ledger.validate_chain().is_empty());
}

#[test]
fn append_links_every_block() {
    init_tracing();
    let fixture = TestLedger::new();
    let alice = TestIdentity::from_index(1);

    for n in 0..5 {
        fixture.clock.advance(7);
        let block = fixture.claim(&alice, sample_star(n)).unwrap();
        assert_eq!(block.height, u64::from(n) + 1);
        assert_eq!(fixture.ledger.height(), u64::from(n) + 1);
    }

    let blocks = fixture.ledger.snapshot();
    for i in 1..blocks.len() {
        assert_eq!(blocks[i].previous_hash, Some(blocks[i - 1].hash));
        assert_eq!(blocks[i].height, blocks[i - 1].height + 1);
        assert!(blocks[i].timestamp > blocks[i - 1].timestamp);
    }
    assert!(fixture.ledger.validate_chain().is_empty());
}

#[test]
fn tampered_payload_is_reported_at_its_height() {
    let fixture = TestLedger::new();
    for who in identities(3) {
        fixture.claim(&who, sample_star(1)).unwrap();
    }

    let mut blocks = fixture.ledger.snapshot();
    let mut forged = blocks[2].decode_payload().unwrap();
    forged.owner = TestIdentity::from_index(9).id();
    blocks[2].payload = PendingBlock::claim(forged).unwrap().payload_bytes().to_vec().into();

    let chain = Chain::from_blocks(blocks);
    assert_eq!(
        chain.validate_chain(),
        vec![ValidationError::HashMismatch { height: 2 }]
    );
}

#[test]
fn broken_link_is_reported_independently() {
    let fixture = TestLedger::new();
    let alice = TestIdentity::from_index(1);
    fixture.claim(&alice, sample_star(1)).unwrap();
    fixture.claim(&alice, sample_star(2)).unwrap();

    let mut blocks = fixture.ledger.snapshot();
    blocks[1].previous_hash = Some(BlockHash::from_bytes([0x99; 32]));
    blocks[1].hash = blocks[1].compute_hash().unwrap();

    let errors = Chain::from_blocks(blocks).validate_chain();
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::PreviousHashMismatch { height: 1, .. })));
    // Re-hashing block 1 breaks the link from block 2 as well.
    assert!(errors
        .iter()
        .any(|e| matches!(e, ValidationError::PreviousHashMismatch { height: 2, .. })));
    assert!(!errors
        .iter()
        .any(|e| matches!(e, ValidationError::HashMismatch { .. })));
}

#[test]
fn appending_to_a_corrupted_chain_commits_nothing() {
    let fixture = TestLedger::new();
    let alice = TestIdentity::from_index(1);
    fixture.claim(&alice, sample_star(1)).unwrap();

    let mut blocks = fixture.ledger.snapshot();
    blocks[1].timestamp += 1;
    let mut chain = Chain::from_blocks(blocks);
    let before = chain.clone();

    let pending = PendingBlock::claim(starledger::Claim {
        owner: alice.id(),
        star: sample_star(2),
    })
    .unwrap();
    let result = chain.append(pending, T0 + 5);

    assert_eq!(
        result,
        Err(ChainError::ValidationFailed(vec![
            ValidationError::HashMismatch { height: 1 }
        ]))
    );
    assert_eq!(chain, before);
}

#[test]
fn claim_expiry_window() {
    let fixture = TestLedger::new();
    let alice = TestIdentity::from_index(1);
    let id = alice.id();

    let message = fixture.ledger.request_challenge(&id).unwrap();
    let signature = alice.sign(&message);

    fixture.clock.set(T0 + 301);
    let result = fixture
        .ledger
        .submit_claim(&id, &message, &signature, sample_star(1));
    assert!(matches!(
        result,
        Err(LedgerError::Claim(ClaimError::Expired {
            elapsed: 301,
            window: 300
        }))
    ));
    assert_eq!(fixture.ledger.height(), 0);

    fixture.clock.set(T0 + 300);
    let block = fixture
        .ledger
        .submit_claim(&id, &message, &signature, sample_star(1))
        .unwrap();
    assert_eq!(block.timestamp, T0 + 300);
}

#[test]
fn claim_with_invalid_signature_is_rejected() {
    let fixture = TestLedger::new();
    let alice = TestIdentity::from_index(1);
    let mallory = TestIdentity::from_index(2);
    let id = alice.id();

    let message = fixture.ledger.request_challenge(&id).unwrap();
    let result = fixture
        .ledger
        .submit_claim(&id, &message, &mallory.sign(&message), sample_star(1));

    assert!(matches!(
        result,
        Err(LedgerError::Claim(ClaimError::InvalidSignature))
    ));
    assert_eq!(fixture.ledger.height(), 0);
}

#[test]
fn claim_with_someone_elses_challenge_is_rejected() {
    let fixture = TestLedger::new();
    let alice = TestIdentity::from_index(1);
    let mallory = TestIdentity::from_index(2);

    let message = fixture.ledger.request_challenge(&alice.id()).unwrap();
    let result = fixture.ledger.submit_claim(
        &mallory.id(),
        &message,
        &mallory.sign(&message),
        sample_star(1),
    );

    assert!(matches!(
        result,
        Err(LedgerError::Claim(ClaimError::IdentityMismatch))
    ));
}

#[test]
fn malformed_message_is_rejected() {
    let fixture = TestLedger::new();
    let alice = TestIdentity::from_index(1);
    let message = "definitely not a challenge";

    let result = fixture
        .ledger
        .submit_claim(&alice.id(), message, &alice.sign(message), sample_star(1));
    assert!(matches!(
        result,
        Err(LedgerError::Claim(ClaimError::MalformedMessage))
    ));
}

#[test]
fn invalid_star_is_rejected() {
    let fixture = TestLedger::with_config(LedgerConfig {
        max_story_words: 2,
        ..LedgerConfig::default()
    });
    let alice = TestIdentity::from_index(1);

    let result = fixture.claim(
        &alice,
        starledger::StarRecord::new("1h", "2°", "three little words"),
    );
    assert!(matches!(
        result,
        Err(LedgerError::Claim(ClaimError::InvalidStar(_)))
    ));
    assert_eq!(fixture.ledger.height(), 0);
}

#[test]
fn owner_query_returns_claims_in_chain_order() {
    let fixture = TestLedger::new();
    let [a, b, c]: [TestIdentity; 3] = identities(3).try_into().unwrap();

    fixture.claim(&a, sample_star(1)).unwrap();
    fixture.claim(&b, sample_star(2)).unwrap();
    fixture.claim(&a, sample_star(3)).unwrap();

    let stars = fixture.ledger.stars_by_owner(&a.id());
    assert_eq!(stars.len(), 2);
    assert_eq!(stars[0].star, sample_star(1));
    assert_eq!(stars[1].star, sample_star(3));
    assert!(stars.iter().all(|claim| claim.owner == a.id()));

    assert!(fixture.ledger.stars_by_owner(&c.id()).is_empty());

    let heights: Vec<_> = fixture
        .ledger
        .blocks_by_owner(&a.id())
        .iter()
        .map(|block| block.height)
        .collect();
    assert_eq!(heights, vec![1, 3]);
}

#[test]
fn lookups_return_none_when_absent() {
    let fixture = TestLedger::new();
    let block = fixture
        .claim(&TestIdentity::from_index(1), sample_star(1))
        .unwrap();

    assert_eq!(fixture.ledger.block_by_hash(&block.hash), Some(block.clone()));
    assert_eq!(fixture.ledger.block_by_height(1), Some(block));
    assert_eq!(fixture.ledger.block_by_height(2), None);
    assert_eq!(
        fixture.ledger.block_by_hash(&BlockHash::from_bytes([0xab; 32])),
        None
    );
}

#[test]
fn story_survives_the_chain() {
    let fixture = TestLedger::new();
    let alice = TestIdentity::from_index(1);
    let star = starledger::StarRecord::new("1h", "2°", "Ünïcödé story: with colons")
        .with_magnitude("4.2")
        .with_constellation("Lyra");

    let block = fixture.claim(&alice, star.clone()).unwrap();
    let claim = block.decode_payload().unwrap();
    assert_eq!(claim.star, star);
    assert_eq!(
        claim.star.story_text().as_deref(),
        Some("Ünïcödé story: with colons")
    );
}

#[test]
fn concurrent_claims_keep_the_chain_linear() {
    init_tracing();
    let fixture = TestLedger::new();
    let claimants = identities(8);

    thread::scope(|scope| {
        for (i, who) in claimants.iter().enumerate() {
            let fixture = &fixture;
            scope.spawn(move || {
                for n in 0..5 {
                    fixture.claim(who, sample_star(i as u32 * 10 + n)).unwrap();
                    let _ = fixture.ledger.validate_chain();
                }
            });
        }
    });

    assert_eq!(fixture.ledger.height(), 40);
    assert!(fixture.ledger.validate_chain().is_empty());
    for who in &claimants {
        assert_eq!(fixture.ledger.stars_by_owner(&who.id()).len(), 5);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn any_claim_sequence_yields_a_valid_chain(plan in claim_plan(4, 12)) {
        let fixture = TestLedger::new();
        let claimants = identities(plan.claimants);

        for (expected_height, (who, star)) in (1u64..).zip(plan.claims.iter()) {
            fixture.clock.advance(1);
            let block = fixture.claim(&claimants[*who as usize], star.clone()).unwrap();
            prop_assert_eq!(block.height, expected_height);
        }

        prop_assert_eq!(fixture.ledger.height(), plan.claims.len() as u64);
        prop_assert!(fixture.ledger.validate_chain().is_empty());

        for (index, who) in claimants.iter().enumerate() {
            let expected: Vec<_> = plan
                .claims
                .iter()
                .filter(|(i, _)| *i as usize == index)
                .map(|(_, star)| star.clone())
                .collect();
            let found: Vec<_> = fixture
                .ledger
                .stars_by_owner(&who.id())
                .into_iter()
                .map(|claim| claim.star)
                .collect();
            prop_assert_eq!(found, expected);
        }
    }

    #[test]
    fn tampering_any_block_is_caught_at_its_height(
        claims in 1usize..8,
        target in any::<prop::sample::Index>(),
    ) {
        let fixture = TestLedger::new();
        let alice = TestIdentity::from_index(1);
        for n in 0..claims {
            fixture.claim(&alice, sample_star(n as u32)).unwrap();
        }

        let mut blocks = fixture.ledger.snapshot();
        let i = target.index(blocks.len());
        let mut payload = blocks[i].payload.to_vec();
        payload.push(0);
        blocks[i].payload = payload.into();

        let height = blocks[i].height;
        prop_assert_eq!(
            Chain::from_blocks(blocks).validate_chain(),
            vec![ValidationError::HashMismatch { height }]
        );
    }
}
