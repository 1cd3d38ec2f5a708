//! # medplus-pos: Counter Terminal for MedPlus POS
//!
//! The operator-facing application tying the billing engine together:
//! catalog search, cart edits, the checkout state machine, UPI QR links,
//! and SMS receipts.
//!
//! ## Module Organization
//!
//! - [`checkout`] - The payment state machine and its collaborator traits
//! - [`terminal`] - Line-oriented operator interface
//! - [`ledger`] - SQLite-backed transaction ledger adapter
//! - [`payment`] - UPI deep-link provider
//! - [`sms`] - SMS receipt delivery (MSG91 / Fast2SMS / simulation)
//! - [`config`] - Environment-driven configuration
//! - [`error`] - Operator-facing error type

pub mod checkout;
pub mod config;
pub mod error;
pub mod ledger;
pub mod payment;
pub mod sms;
pub mod terminal;

pub use checkout::{Checkout, CheckoutState};
pub use config::PosConfig;
pub use error::{ErrorCode, PosError, PosResult};
