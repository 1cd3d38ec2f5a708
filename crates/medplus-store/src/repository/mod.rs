//! # Repository Modules
//!
//! One repository per table, each a thin handle over the shared pool.
//!
//! - [`inventory`] - catalog search, stock adjustments
//! - [`transaction`] - append-only sales ledger
//! - [`customer`] - phone-keyed directory with per-sale aggregates

pub mod customer;
pub mod inventory;
pub mod transaction;
