//! # Star Ledger Testkit
//!
//! Testing utilities for the star ledger.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: deterministic identities that sign challenges, and ledgers
//!   pinned to a manual clock
//! - **Generators**: Proptest strategies for stars and claim sequences
//!
//! ## Test Fixtures
//!
//! ```rust
//! use starledger_testkit::fixtures::{sample_star, TestIdentity, TestLedger};
//!
//! let fixture = TestLedger::new();
//! let alice = TestIdentity::from_index(1);
//! let block = fixture.claim(&alice, sample_star(0)).unwrap();
//! assert_eq!(block.height, 1);
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use starledger_testkit::generators::star_record;
//!
//! proptest! {
//!     #[test]
//!     fn generated_stars_are_admissible(star in star_record()) {
//!         prop_assert!(star.check(&Default::default()).is_ok());
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{identities, sample_star, TestIdentity, TestLedger, T0};
pub use generators::{claim_plan, star_record, ClaimPlan};
