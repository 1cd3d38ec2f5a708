//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    ₹57.60 is stored as 5760 paise (i64)                                 │
//! │    Sums stay exact; rounding happens only at declared boundaries        │
//! │    (display, storage, pack repricing, discount/GST derivation)          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use medplus_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(3200); // ₹32.00
//!
//! // Arithmetic operations
//! let doubled = price * 2;                        // ₹64.00
//! let with_strip = price + Money::from_paise(50); // ₹32.50
//!
//! // NEVER do this:
//! // let bad = Money::from_float(32.00); // NO SUCH METHOD EXISTS!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (the smallest INR unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: Negative values flow through discount math unclamped
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Derives**: Full serde support for persisted line-item snapshots
///
/// Every monetary value in the system flows through this type: product MRP,
/// cart line totals, discount amounts, the GST decomposition, transaction
/// totals, and the UPI `am=` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use medplus_core::money::Money;
    ///
    /// let price = Money::from_paise(3250); // ₹32.50
    /// assert_eq!(price.paise(), 3250);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// For negative amounts, only the rupee part should be negative:
    /// `from_rupees(-5, 50)` is -₹5.50, not -₹4.50.
    #[inline]
    pub const fn from_rupees(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the rupee (major unit) portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the paise (minor unit) portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Takes a basis-point fraction of this amount, rounded half up.
    ///
    /// This is the single rounding primitive behind the discount amount
    /// (`subtotal × discount% / 100`) and the informational GST figure
    /// (`total × 12%`).
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The +5000 performs
    /// round-half-up (5000/10000 = 0.5); i128 prevents overflow on large
    /// amounts.
    ///
    /// ## Example
    /// ```rust
    /// use medplus_core::money::Money;
    ///
    /// let subtotal = Money::from_paise(6400); // ₹64.00
    /// let discount = subtotal.percent_bps(1000); // 10%
    /// assert_eq!(discount.paise(), 640); // ₹6.40
    /// ```
    pub fn percent_bps(&self, bps: i64) -> Money {
        let part = (self.0 as i128 * bps as i128 + 5000) / 10000;
        Money::from_paise(part as i64)
    }

    /// Divides this amount by an integer, rounded half up.
    ///
    /// Used for pack-size repricing: `unit_price = pack_cost / pack_size`,
    /// rounded to whole paise at the point the new unit price is stored.
    ///
    /// ## Example
    /// ```rust
    /// use medplus_core::money::Money;
    ///
    /// let pack_cost = Money::from_paise(15000); // ₹150.00
    /// assert_eq!(pack_cost.div_round(5).paise(), 3000); // ₹30.00
    /// ```
    pub fn div_round(&self, divisor: i64) -> Money {
        let unit = (self.0 as i128 + divisor as i128 / 2) / divisor as i128;
        Money::from_paise(unit as i64)
    }

    /// Multiplies money by a quantity.
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Renders the amount as a bare decimal string, e.g. `"57.60"`.
    ///
    /// This is the form UPI deep links (`am=` parameter) and SMS receipts
    /// expect; `Display` adds the currency symbol for operator-facing text.
    pub fn to_decimal_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money with the rupee symbol, e.g. `₹57.60`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(3250);
        assert_eq!(money.paise(), 3250);
        assert_eq!(money.rupees(), 32);
        assert_eq!(money.paise_part(), 50);
    }

    #[test]
    fn test_from_rupees() {
        let money = Money::from_rupees(32, 50);
        assert_eq!(money.paise(), 3250);

        let negative = Money::from_rupees(-5, 50);
        assert_eq!(negative.paise(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(5760)), "₹57.60");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_decimal_string() {
        assert_eq!(Money::from_paise(5760).to_decimal_string(), "57.60");
        assert_eq!(Money::from_paise(30).to_decimal_string(), "0.30");
        assert_eq!(Money::from_paise(-125).to_decimal_string(), "-1.25");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        let result: Money = a * 3;
        assert_eq!(result.paise(), 3000);
    }

    #[test]
    fn test_percent_bps_exact() {
        // ₹64.00 at 10% = ₹6.40
        let subtotal = Money::from_paise(6400);
        assert_eq!(subtotal.percent_bps(1000).paise(), 640);
    }

    #[test]
    fn test_percent_bps_rounds_half_up() {
        // ₹57.60 at 12% = ₹6.912 → ₹6.91
        let total = Money::from_paise(5760);
        assert_eq!(total.percent_bps(1200).paise(), 691);

        // ₹10.00 at 8.25% = ₹0.825 → ₹0.83
        let amount = Money::from_paise(1000);
        assert_eq!(amount.percent_bps(825).paise(), 83);
    }

    #[test]
    fn test_percent_bps_negative_rate_passes_through() {
        // Discount percent is unclamped: a negative rate yields a negative
        // discount amount (a surcharge), which the bill math carries as-is.
        let subtotal = Money::from_paise(6400);
        assert_eq!(subtotal.percent_bps(-1000).paise(), -639);
    }

    #[test]
    fn test_div_round() {
        // ₹150.00 / 5 = ₹30.00
        assert_eq!(Money::from_paise(15000).div_round(5).paise(), 3000);
        // ₹1.00 / 3 = 33.33… → 33
        assert_eq!(Money::from_paise(100).div_round(3).paise(), 33);
        // ₹1.00 / 8 = 12.5 → 13 (half up)
        assert_eq!(Money::from_paise(100).div_round(8).paise(), 13);
        // Divisor 1 is identity
        assert_eq!(Money::from_paise(777).div_round(1).paise(), 777);
    }

    #[test]
    fn test_multiply_quantity() {
        let unit_price = Money::from_paise(3200);
        let line_total = unit_price.multiply_quantity(2);
        assert_eq!(line_total.paise(), 6400);
    }

    #[test]
    fn test_zero_and_checks() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_positive());
        assert!(!zero.is_negative());

        let positive = Money::from_paise(100);
        assert!(positive.is_positive());

        let negative = Money::from_paise(-100);
        assert!(negative.is_negative());
    }
}
