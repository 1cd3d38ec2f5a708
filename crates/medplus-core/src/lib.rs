//! # medplus-core: Pure Billing Logic for MedPlus POS
//!
//! This crate is the **heart** of the MedPlus pharmacy billing engine. It
//! contains all billing logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    MedPlus POS Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/pos (Terminal)                          │   │
//! │  │    Search ──► Cart ──► Checkout FSM ──► Receipt SMS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ medplus-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌─────────┐ │   │
//! │  │   │  money  │ │  cart   │ │  types  │ │   upi   │ │ receipt │ │   │
//! │  │   │  Money  │ │  Cart   │ │ Product │ │  links  │ │ formats │ │   │
//! │  │   │  paise  │ │  bill() │ │  Txn    │ │         │ │         │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └─────────┘ └─────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               medplus-store (Database Layer)                    │   │
//! │  │         SQLite queries, migrations, repositories                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer paise arithmetic (no floating point!)
//! - [`cart`] - The cart, its stock-bound mutations, and bill derivation
//! - [`types`] - Domain types (Product, Transaction, Customer, etc.)
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation (phone, quantities, pack sizes)
//! - [`upi`] - UPI deep link construction
//! - [`receipt`] - SMS receipt formatting
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use medplus_core::cart::Cart;
//! use medplus_core::money::Money;
//! use medplus_core::types::{DiscountPercent, Product};
//!
//! let dolo = Product {
//!     id: "1".to_string(),
//!     name: "Dolo 650".to_string(),
//!     category: "Medicine".to_string(),
//!     mrp: Money::from_paise(3200), // ₹32.00
//!     cost_price: None,
//!     stock_quantity: 10,
//!     pack_size: 1,
//!     batch_id: None,
//!     expiry_date: None,
//! };
//!
//! let mut cart = Cart::new();
//! cart.add_product(&dolo).unwrap();
//! cart.add_product(&dolo).unwrap();
//!
//! let bill = cart.bill(DiscountPercent::from_percent(10.0));
//! assert_eq!(bill.subtotal.paise(), 6400);      // ₹64.00
//! assert_eq!(bill.discount_amount.paise(), 640); // ₹6.40
//! assert_eq!(bill.total.paise(), 5760);          // ₹57.60
//! assert_eq!(bill.gst_amount.paise(), 691);      // ₹6.91, informational
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod receipt;
pub mod types;
pub mod upi;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use medplus_core::Money` instead of
// `use medplus_core::money::Money`

pub use cart::{BillSummary, Cart, CartLine};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// GST rate applied to pharmacy sales, in basis points (12%).
///
/// ## Why informational only?
/// Displayed prices are GST-inclusive, so the bill shows the tax component
/// *inside* the discounted total rather than adding it on top. Changing
/// this to an additive tax would silently raise every bill.
pub const GST_RATE_BPS: i64 = 1200;

/// Stock level below which cart lines carry a low-stock warning.
pub const LOW_STOCK_THRESHOLD: i64 = 10;

/// Maximum rows a catalog lookup returns, keeping the result set
/// terminal-sized even for broad queries.
pub const MAX_SEARCH_RESULTS: u32 = 100;
