//! # Cart & Bill Computation
//!
//! The in-memory cart and the pure bill derivation over it. This module is
//! the heart of the billing engine: pricing, discount, the informational
//! GST decomposition, pack-size repricing, and stock-bound quantity edits
//! all live here.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cart Operations                                    │
//! │                                                                         │
//! │  Operator Action            Cart Method            Guard                │
//! │  ───────────────            ───────────            ─────                │
//! │  Pick search result ──────► add_product()  ──────► stock snapshot      │
//! │  Edit quantity ───────────► set_quantity() ──────► stock snapshot      │
//! │  Edit pack size ──────────► set_pack_size()──────► pack size >= 1      │
//! │  Remove line ─────────────► remove_line()  ──────► (none, no-op ok)    │
//! │                                                                         │
//! │  Bill is NEVER cached: bill(discount) recomputes subtotal, discount    │
//! │  amount, GST, and total from the current lines on every call.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## GST Is Informational
//! Displayed unit prices are GST-inclusive. The 12% GST figure on the bill
//! is a decomposition of the discounted total for display; it is **not**
//! added on top. `total = subtotal - discount_amount`, always.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{DiscountPercent, Product};
use crate::GST_RATE_BPS;

// =============================================================================
// Cart Line
// =============================================================================

/// A line in the cart: a product snapshot plus mutable quantity and pack
/// size.
///
/// ## Snapshot Pattern
/// Price, stock, and pack cost are frozen at the moment the line is added.
/// The stock bound is advisory (not re-checked against concurrent sales)
/// and the price stays fixed even if the catalog changes underneath.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Product id this line refers to.
    pub product_id: String,

    /// Product name at time of adding (frozen).
    pub name: String,

    /// Unit price. Starts as the product MRP; pack-size repricing may
    /// rewrite it when the pack cost is known.
    pub unit_price: Money,

    /// Pack cost at time of adding (frozen). `None` means repricing is
    /// impossible and pack-size edits leave the unit price alone.
    pub cost_price: Option<Money>,

    /// Stock available at time of adding (frozen upper bound for quantity).
    pub stock_quantity: i64,

    /// Quantity in cart. Invariant: 1 <= quantity <= stock_quantity.
    pub quantity: i64,

    /// Pack size. Invariant: pack_size >= 1.
    pub pack_size: i64,

    /// Batch identifier, carried through to the receipt.
    pub batch_id: Option<String>,

    /// Expiry date, displayed only.
    pub expiry_date: Option<String>,
}

impl CartLine {
    /// Creates a new line from a product with quantity 1.
    pub fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.mrp,
            cost_price: product.cost_price,
            stock_quantity: product.stock_quantity,
            quantity: 1,
            pack_size: product.pack_size,
            batch_id: product.batch_id.clone(),
            expiry_date: product.expiry_date.clone(),
        }
    }

    /// Line total: unit price × quantity. Exact in paise, no rounding.
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }

    /// Whether the stock snapshot behind this line is running low.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity < crate::LOW_STOCK_THRESHOLD
    }
}

// =============================================================================
// Bill Summary
// =============================================================================

/// Derived bill figures. Never stored independently of its inputs; always
/// recomputed via [`Cart::bill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillSummary {
    /// Σ(unit_price × quantity) over all lines.
    pub subtotal: Money,

    /// subtotal × discount% / 100, rounded half up to paise.
    pub discount_amount: Money,

    /// (subtotal − discount_amount) × 12%, rounded half up. Informational:
    /// GST is already inside the displayed prices and is NOT added to the
    /// total. Do not "fix" this into an additive tax.
    pub gst_amount: Money,

    /// subtotal − discount_amount. The amount payable.
    pub total: Money,
}

// =============================================================================
// Cart
// =============================================================================

/// The billing cart: an ordered collection of lines, at most one per
/// product id.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product again
///   increments its quantity)
/// - 1 <= quantity <= the stock snapshot taken when the line was added
/// - pack_size >= 1
/// - All operations are synchronous and atomic with respect to each other;
///   a rejected operation mutates nothing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart { lines: Vec::new() }
    }

    /// Adds one unit of a product, or increments its existing line.
    ///
    /// ## Behavior
    /// - Line exists: quantity + 1, unless that would exceed the stock
    ///   snapshot — then the operation is rejected with a capacity error
    ///   and the quantity is unchanged.
    /// - No line: a new line with quantity 1 and the product's pack size.
    ///   A product with zero stock is rejected the same way, so N adds
    ///   always end at quantity = min(N, stock_quantity).
    pub fn add_product(&mut self, product: &Product) -> CoreResult<()> {
        if let Some(line) = self.lines.iter_mut().find(|l| l.product_id == product.id) {
            let requested = line.quantity + 1;
            if requested > line.stock_quantity {
                return Err(CoreError::InsufficientStock {
                    name: line.name.clone(),
                    available: line.stock_quantity,
                    requested,
                });
            }
            line.quantity = requested;
            return Ok(());
        }

        if product.stock_quantity < 1 {
            return Err(CoreError::InsufficientStock {
                name: product.name.clone(),
                available: product.stock_quantity,
                requested: 1,
            });
        }

        self.lines.push(CartLine::from_product(product));
        Ok(())
    }

    /// Sets a line's quantity exactly.
    ///
    /// ## Behavior
    /// - `quantity <= 0`: equivalent to [`Cart::remove_line`] (Ok even if
    ///   the line is absent)
    /// - `quantity` above the stock snapshot: capacity error, no mutation
    /// - Unknown product id: error, no mutation
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            self.remove_line(product_id);
            return Ok(());
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;

        if quantity > line.stock_quantity {
            return Err(CoreError::InsufficientStock {
                name: line.name.clone(),
                available: line.stock_quantity,
                requested: quantity,
            });
        }

        line.quantity = quantity;
        Ok(())
    }

    /// Removes a line by product id. No-op when absent.
    pub fn remove_line(&mut self, product_id: &str) {
        self.lines.retain(|l| l.product_id != product_id);
    }

    /// Sets a line's pack size, repricing the unit when possible.
    ///
    /// ## Repricing Policy (best effort, by design)
    /// - `pack_size < 1`: rejected, no mutation.
    /// - Pack cost known: `unit_price = round2(pack_cost / pack_size)`.
    /// - Pack cost unknown: unit price left unchanged — there is no
    ///   canonical source to reprice from.
    ///
    /// The pack size itself is set in every accepted case.
    pub fn set_pack_size(&mut self, product_id: &str, pack_size: i64) -> CoreResult<()> {
        if pack_size < 1 {
            return Err(ValidationError::MustBePositive {
                field: "pack size".to_string(),
            }
            .into());
        }

        let line = self
            .lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or_else(|| CoreError::LineNotFound(product_id.to_string()))?;

        if let Some(pack_cost) = line.cost_price {
            line.unit_price = pack_cost.div_round(pack_size);
        }
        line.pack_size = pack_size;
        Ok(())
    }

    /// Derives the bill for the current lines and discount.
    ///
    /// Pure function of (lines, discount): recomputed on every call, never
    /// cached. The discount rate passes through unclamped.
    pub fn bill(&self, discount: DiscountPercent) -> BillSummary {
        let subtotal = self
            .lines
            .iter()
            .fold(Money::zero(), |acc, l| acc + l.line_total());
        let discount_amount = subtotal.percent_bps(discount.bps());
        let total = subtotal - discount_amount;
        let gst_amount = total.percent_bps(GST_RATE_BPS);

        BillSummary {
            subtotal,
            discount_amount,
            gst_amount,
            total,
        }
    }

    /// Returns the lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Looks up a line by product id.
    pub fn get(&self, product_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.product_id == product_id)
    }

    /// Lines whose stock snapshot is below the low-stock threshold.
    pub fn low_stock_lines(&self) -> Vec<&CartLine> {
        self.lines.iter().filter(|l| l.is_low_stock()).collect()
    }

    /// Number of lines (unique products).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Clears all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, mrp_paise: i64, stock: i64) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Product {}", id),
            category: "Medicine".to_string(),
            mrp: Money::from_paise(mrp_paise),
            cost_price: None,
            stock_quantity: stock,
            pack_size: 1,
            batch_id: None,
            expiry_date: None,
        }
    }

    fn product_with_pack(id: &str, mrp_paise: i64, cost_paise: i64, stock: i64) -> Product {
        Product {
            cost_price: Some(Money::from_paise(cost_paise)),
            ..product(id, mrp_paise, stock)
        }
    }

    #[test]
    fn test_add_product_inserts_then_increments() {
        let mut cart = Cart::new();
        let p = product("1", 3200, 10);

        cart.add_product(&p).unwrap();
        cart.add_product(&p).unwrap();

        assert_eq!(cart.line_count(), 1);
        assert_eq!(cart.get("1").unwrap().quantity, 2);
    }

    #[test]
    fn test_add_product_capped_by_stock() {
        // Stock 3, four adds: the fourth is rejected and quantity stays 3.
        let mut cart = Cart::new();
        let p = product("1", 3200, 3);

        for _ in 0..3 {
            cart.add_product(&p).unwrap();
        }
        let err = cart.add_product(&p).unwrap_err();
        assert!(matches!(
            err,
            CoreError::InsufficientStock {
                available: 3,
                requested: 4,
                ..
            }
        ));
        assert_eq!(cart.get("1").unwrap().quantity, 3);
    }

    #[test]
    fn test_add_product_zero_stock_rejected() {
        let mut cart = Cart::new();
        let p = product("1", 3200, 0);

        assert!(cart.add_product(&p).is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_exact_and_bounded() {
        let mut cart = Cart::new();
        let p = product("1", 3200, 5);
        cart.add_product(&p).unwrap();

        cart.set_quantity("1", 5).unwrap();
        assert_eq!(cart.get("1").unwrap().quantity, 5);

        // Above stock: rejected, unchanged
        assert!(cart.set_quantity("1", 6).is_err());
        assert_eq!(cart.get("1").unwrap().quantity, 5);
    }

    #[test]
    fn test_set_quantity_zero_removes_line() {
        let mut cart = Cart::new();
        let p = product("1", 3200, 5);
        cart.add_product(&p).unwrap();

        cart.set_quantity("1", 0).unwrap();
        assert!(cart.is_empty());

        // Negative behaves the same, and absent id stays Ok
        cart.set_quantity("1", -2).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_unknown_line() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.set_quantity("missing", 2),
            Err(CoreError::LineNotFound(_))
        ));
    }

    #[test]
    fn test_remove_line_noop_when_absent() {
        let mut cart = Cart::new();
        cart.remove_line("ghost"); // must not panic or error
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_pack_size_reprices_from_pack_cost() {
        // Pack cost ₹150.00, pack size 5 → unit price ₹30.00
        let mut cart = Cart::new();
        let p = product_with_pack("1", 15000, 15000, 10);
        cart.add_product(&p).unwrap();

        cart.set_pack_size("1", 5).unwrap();
        let line = cart.get("1").unwrap();
        assert_eq!(line.unit_price, Money::from_paise(3000));
        assert_eq!(line.pack_size, 5);
    }

    #[test]
    fn test_set_pack_size_without_pack_cost_keeps_price() {
        let mut cart = Cart::new();
        let p = product("1", 3200, 10);
        cart.add_product(&p).unwrap();

        cart.set_pack_size("1", 4).unwrap();
        let line = cart.get("1").unwrap();
        assert_eq!(line.unit_price, Money::from_paise(3200));
        assert_eq!(line.pack_size, 4);
    }

    #[test]
    fn test_set_pack_size_rejects_below_one() {
        let mut cart = Cart::new();
        let p = product_with_pack("1", 15000, 15000, 10);
        cart.add_product(&p).unwrap();

        assert!(cart.set_pack_size("1", 0).is_err());
        let line = cart.get("1").unwrap();
        assert_eq!(line.pack_size, 1);
        assert_eq!(line.unit_price, Money::from_paise(15000));
    }

    #[test]
    fn test_pack_repricing_identity_over_sizes() {
        // unit_price == round2(pack_cost / pack_size) for every size >= 1
        let mut cart = Cart::new();
        let p = product_with_pack("1", 15000, 15000, 10);
        cart.add_product(&p).unwrap();

        for size in 1..=12 {
            cart.set_pack_size("1", size).unwrap();
            let line = cart.get("1").unwrap();
            assert_eq!(line.unit_price, Money::from_paise(15000).div_round(size));
        }
    }

    #[test]
    fn test_bill_reference_scenario() {
        // Cart [{₹32.00 × 2}], discount 10% →
        // subtotal 64.00, discount 6.40, total 57.60, gst 6.91
        let mut cart = Cart::new();
        let p = product("1", 3200, 10);
        cart.add_product(&p).unwrap();
        cart.add_product(&p).unwrap();

        let bill = cart.bill(DiscountPercent::from_percent(10.0));
        assert_eq!(bill.subtotal, Money::from_paise(6400));
        assert_eq!(bill.discount_amount, Money::from_paise(640));
        assert_eq!(bill.total, Money::from_paise(5760));
        assert_eq!(bill.gst_amount, Money::from_paise(691));
    }

    #[test]
    fn test_bill_gst_not_added_to_total() {
        let mut cart = Cart::new();
        cart.add_product(&product("1", 10000, 5)).unwrap();

        let bill = cart.bill(DiscountPercent::zero());
        assert_eq!(bill.total, bill.subtotal - bill.discount_amount);
        // If GST were additive the total would exceed the subtotal here.
        assert_eq!(bill.total, Money::from_paise(10000));
        assert_eq!(bill.gst_amount, Money::from_paise(1200));
    }

    #[test]
    fn test_bill_recomputes_after_mutation() {
        let mut cart = Cart::new();
        let p = product("1", 3200, 10);
        cart.add_product(&p).unwrap();

        let before = cart.bill(DiscountPercent::zero());
        cart.set_quantity("1", 3).unwrap();
        let after = cart.bill(DiscountPercent::zero());

        assert_eq!(before.subtotal, Money::from_paise(3200));
        assert_eq!(after.subtotal, Money::from_paise(9600));
    }

    #[test]
    fn test_bill_discount_unclamped() {
        let mut cart = Cart::new();
        cart.add_product(&product("1", 10000, 5)).unwrap();

        // 150% discount: total goes negative, by design.
        let over = cart.bill(DiscountPercent::from_percent(150.0));
        assert_eq!(over.discount_amount, Money::from_paise(15000));
        assert_eq!(over.total, Money::from_paise(-5000));

        // Negative discount: a surcharge. The half-up adjustment truncates
        // toward zero on negative amounts, hence -999 rather than -1000.
        let neg = cart.bill(DiscountPercent::from_percent(-10.0));
        assert_eq!(neg.discount_amount, Money::from_paise(-999));
        assert_eq!(neg.total, Money::from_paise(10999));
    }

    #[test]
    fn test_low_stock_lines() {
        let mut cart = Cart::new();
        cart.add_product(&product("1", 1000, 50)).unwrap();
        cart.add_product(&product("2", 1000, 4)).unwrap();

        let low = cart.low_stock_lines();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].product_id, "2");
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_product(&product("1", 1000, 5)).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.bill(DiscountPercent::zero()).subtotal, Money::zero());
    }
}
