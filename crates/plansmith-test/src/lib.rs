//! Shared test fixtures for Plansmith crates.
//!
//! - [`knapsack`] - 0/1 knapsack with five items and capacity 10
//! - [`device_schedule`] - devices assigned to a timeslot, technician and workstation
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! plansmith-test = { workspace = true }
//! ```
//!
//! ```
//! use plansmith_test::knapsack;
//!
//! let problem = knapsack::generate_problem();
//! assert_eq!(problem.entity_count(), 5);
//! ```

pub mod device_schedule;
pub mod knapsack;
