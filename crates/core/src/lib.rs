//! Core business logic for Budgetline.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `ledger` - Accounts, journal entries, and posting validation
//! - `budget` - Periods, allocations, spend reconciliation, and variance
//! - `events` - Ledger events and their dispatch to budget recalculation
//! - `money` - Monetary precision rules

pub mod budget;
pub mod events;
pub mod ledger;
pub mod money;

pub use money::MONEY_SCALE;
