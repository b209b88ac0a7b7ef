//! Proptest generators for property-based testing.

use proptest::prelude::*;

use starledger::StarRecord;

/// Generate a right ascension like `16h 29m 1.0s`.
pub fn right_ascension() -> impl Strategy<Value = String> {
    (0u8..24, 0u8..60, 0u8..60).prop_map(|(h, m, s)| format!("{h}h {m}m {s}.0s"))
}

/// Generate a declination like `-26° 29' 24.9`.
pub fn declination() -> impl Strategy<Value = String> {
    (-89i8..=89, 0u8..60, 0u8..60).prop_map(|(d, m, s)| format!("{d}° {m}' {s}.0"))
}

/// Generate a story that fits the default limits (at most 40 short words).
pub fn story() -> impl Strategy<Value = String> {
    prop::collection::vec("[a-zA-Z0-9]{1,10}", 0..40).prop_map(|words| words.join(" "))
}

/// Generate an admissible star record.
pub fn star_record() -> impl Strategy<Value = StarRecord> {
    (
        right_ascension(),
        declination(),
        story(),
        proptest::option::of("[A-Z][a-z]{2,12}"),
    )
        .prop_map(|(ra, dec, story, constellation)| {
            let star = StarRecord::new(ra, dec, &story);
            match constellation {
                Some(name) => star.with_constellation(name),
                None => star,
            }
        })
}

/// A sequence of claims to replay: each entry is the index of the claimant
/// (into a fixture identity list) and the star they register.
#[derive(Debug, Clone)]
pub struct ClaimPlan {
    pub claimants: u8,
    pub claims: Vec<(u8, StarRecord)>,
}

/// Generate a plan of up to `max_claims` claims among up to `max_claimants`
/// identities.
pub fn claim_plan(max_claimants: u8, max_claims: usize) -> impl Strategy<Value = ClaimPlan> {
    (1..=max_claimants).prop_flat_map(move |claimants| {
        prop::collection::vec((0..claimants, star_record()), 0..=max_claims)
            .prop_map(move |claims| ClaimPlan { claimants, claims })
    })
}
