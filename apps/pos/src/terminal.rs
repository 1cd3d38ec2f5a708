//! # Counter Terminal
//!
//! Line-oriented operator interface. Each command maps onto one operation
//! of the billing engine; the checkout state machine decides what is legal
//! at any moment.
//!
//! ## Command Set
//! ```text
//! search <text>        catalog lookup (empty text browses)
//! add <n>              add result #n from the last search to the cart
//! qty <n> <count>      set cart line #n quantity (0 removes)
//! pack <n> <size>      set cart line #n pack size (reprices if cost known)
//! rm <n>               remove cart line #n
//! disc <percent>       set discount percent
//! cart                 show cart and bill
//! stock <n> <delta>    add stock to result #n from the last search
//! customer <phone>     directory record + purchase history
//! pay <phone> [name]   open payment (phone must be 10 digits)
//! cash / confirm       cash flow: prompt, then operator confirmation
//! upi / received / back  UPI flow: show QR link, attest, or dismiss
//! done                 dismiss the completion screen
//! cancel               abandon the payment screen
//! quit
//! ```

use tracing::error;

use medplus_core::types::{DiscountPercent, Product};
use medplus_store::Database;

use crate::checkout::{Checkout, CheckoutState};
use crate::error::PosResult;
use crate::ledger::DatabaseLedger;
use crate::payment::UpiLinkProvider;
use crate::sms::SmsNotifier;

type PosCheckout = Checkout<DatabaseLedger, UpiLinkProvider, SmsNotifier>;

/// One terminal session: the checkout plus the last search results, which
/// the numeric `add`/`stock` commands index into.
pub struct Terminal {
    db: Database,
    checkout: PosCheckout,
    last_results: Vec<Product>,
}

impl Terminal {
    pub fn new(db: Database, checkout: PosCheckout) -> Self {
        Terminal {
            db,
            checkout,
            last_results: Vec::new(),
        }
    }

    /// Executes one command line. Errors are rendered, never propagated:
    /// the terminal keeps running whatever the operator types.
    pub async fn handle_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }

        let (cmd, rest) = match line.split_once(char::is_whitespace) {
            Some((c, r)) => (c, r.trim()),
            None => (line, ""),
        };

        let result = self.dispatch(cmd, rest).await;
        if let Err(e) = result {
            error!(code = ?e.code, "{}", e.message);
            println!("!! {}", e.message);
        }
    }

    async fn dispatch(&mut self, cmd: &str, rest: &str) -> PosResult<()> {
        match cmd {
            "search" => self.cmd_search(rest).await,
            "add" => self.cmd_add(rest),
            "qty" => self.cmd_qty(rest),
            "pack" => self.cmd_pack(rest),
            "rm" => self.cmd_rm(rest),
            "disc" => self.cmd_disc(rest),
            "cart" => {
                self.print_cart();
                Ok(())
            }
            "stock" => self.cmd_stock(rest).await,
            "customer" => self.cmd_customer(rest).await,
            "pay" => self.cmd_pay(rest),
            "cancel" => self.checkout.cancel(),
            "cash" => {
                let amount = self.checkout.choose_cash()?;
                println!("Collect {} in cash, then type 'confirm' (or 'back')", amount);
                Ok(())
            }
            "confirm" => {
                let txn = self.checkout.confirm_cash().await?;
                println!("Sale complete. Bill {} - {}", txn.bill_number, txn.total);
                Ok(())
            }
            "upi" => {
                let (reference, link) = self.checkout.choose_upi().await?;
                println!("Scan to pay ({}):\n  {}", reference, link);
                println!("Type 'received' once the payment shows up, or 'back'");
                Ok(())
            }
            "received" => {
                let txn = self.checkout.confirm_upi_received().await?;
                println!("Sale complete. Bill {} - {}", txn.bill_number, txn.total);
                Ok(())
            }
            "back" => match self.checkout.state() {
                CheckoutState::CashPrompted { .. } => self.checkout.decline_cash(),
                _ => self.checkout.cancel_upi(),
            },
            "done" => self.checkout.acknowledge(),
            "help" => {
                println!("{}", HELP);
                Ok(())
            }
            other => {
                println!("Unknown command '{}'. Type 'help'.", other);
                Ok(())
            }
        }
    }

    // -------------------------------------------------------------------------
    // Catalog & stock
    // -------------------------------------------------------------------------

    async fn cmd_search(&mut self, query: &str) -> PosResult<()> {
        // Lookup failures degrade to an empty result list
        let products = match self.db.inventory().search(query).await {
            Ok(products) => products,
            Err(e) => {
                error!(error = %e, "Catalog lookup failed");
                Vec::new()
            }
        };

        if products.is_empty() {
            println!("No products found");
        } else {
            for (i, p) in products.iter().enumerate() {
                let low = if p.is_low_stock() { "  [LOW STOCK]" } else { "" };
                println!(
                    "{:3}. {} - {} (stock {}){}",
                    i + 1,
                    p.name,
                    p.mrp,
                    p.stock_quantity,
                    low
                );
            }
        }
        self.last_results = products;
        Ok(())
    }

    async fn cmd_stock(&mut self, rest: &str) -> PosResult<()> {
        let (idx, delta) = parse_two(rest)?;
        let product = self.result_at(idx)?.clone();

        let new_level = self.db.inventory().increase_stock(&product.id, delta).await?;
        println!("{}: stock now {}", product.name, new_level);
        Ok(())
    }

    async fn cmd_customer(&mut self, phone: &str) -> PosResult<()> {
        let phone = medplus_core::validation::validate_phone(phone)?;

        match self.db.customers().get_by_phone(&phone).await? {
            Some(c) => {
                println!(
                    "{} ({}) - {} visits, {} lifetime",
                    if c.name.is_empty() { "Walk-in" } else { &c.name },
                    c.phone,
                    c.visit_count,
                    c.total_purchases
                );
                for txn in self.db.transactions().for_customer(&phone).await? {
                    println!(
                        "  {}  {}  {}  {}",
                        txn.created_at.format("%d/%m/%Y %H:%M"),
                        txn.bill_number,
                        txn.total,
                        txn.payment_method.display_name()
                    );
                }
            }
            None => println!("No customer on record for {}", phone),
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Cart
    // -------------------------------------------------------------------------

    fn cmd_add(&mut self, rest: &str) -> PosResult<()> {
        let idx = parse_one(rest)?;
        let product = self.result_at(idx)?.clone();
        self.checkout.add_product(&product)?;
        self.print_cart();
        Ok(())
    }

    fn cmd_qty(&mut self, rest: &str) -> PosResult<()> {
        let (idx, qty) = parse_two(rest)?;
        let id = self.cart_line_id(idx)?;
        self.checkout.set_quantity(&id, qty)?;
        self.print_cart();
        Ok(())
    }

    fn cmd_pack(&mut self, rest: &str) -> PosResult<()> {
        let (idx, size) = parse_two(rest)?;
        let id = self.cart_line_id(idx)?;
        self.checkout.set_pack_size(&id, size)?;
        self.print_cart();
        Ok(())
    }

    fn cmd_rm(&mut self, rest: &str) -> PosResult<()> {
        let idx = parse_one(rest)?;
        let id = self.cart_line_id(idx)?;
        self.checkout.remove_line(&id)?;
        self.print_cart();
        Ok(())
    }

    fn cmd_disc(&mut self, rest: &str) -> PosResult<()> {
        let pct: f64 = rest
            .parse()
            .map_err(|_| crate::error::PosError::validation("Discount must be a number"))?;
        self.checkout.set_discount(DiscountPercent::from_percent(pct))?;
        self.print_cart();
        Ok(())
    }

    fn cmd_pay(&mut self, rest: &str) -> PosResult<()> {
        let (phone, name) = match rest.split_once(char::is_whitespace) {
            Some((p, n)) => (p, n.trim()),
            None => (rest, ""),
        };

        let bill = self.checkout.begin(name, phone)?;
        println!(
            "Bill: subtotal {}  discount {}  total {}  (incl. GST {})",
            bill.subtotal, bill.discount_amount, bill.total, bill.gst_amount
        );
        println!("Type 'cash' or 'upi' (or 'cancel')");
        Ok(())
    }

    fn print_cart(&self) {
        if self.checkout.cart().is_empty() {
            println!("Cart is empty");
            return;
        }

        for (i, line) in self.checkout.cart().lines().iter().enumerate() {
            let low = if line.is_low_stock() { "  [LOW STOCK]" } else { "" };
            println!(
                "{:3}. {} x{} @ {} = {}{}",
                i + 1,
                line.name,
                line.quantity,
                line.unit_price,
                line.line_total(),
                low
            );
        }

        let bill = self.checkout.bill();
        println!(
            "     subtotal {}  discount {}  total {}  (incl. GST {})",
            bill.subtotal, bill.discount_amount, bill.total, bill.gst_amount
        );
    }

    // -------------------------------------------------------------------------
    // Index helpers (1-based, as printed)
    // -------------------------------------------------------------------------

    fn result_at(&self, idx: i64) -> PosResult<&Product> {
        usize::try_from(idx.checked_sub(1).unwrap_or(-1))
            .ok()
            .and_then(|i| self.last_results.get(i))
            .ok_or_else(|| crate::error::PosError::validation("No such search result"))
    }

    fn cart_line_id(&self, idx: i64) -> PosResult<String> {
        usize::try_from(idx.checked_sub(1).unwrap_or(-1))
            .ok()
            .and_then(|i| self.checkout.cart().lines().get(i))
            .map(|l| l.product_id.clone())
            .ok_or_else(|| crate::error::PosError::validation("No such cart line"))
    }

    /// Whether the checkout is mid-payment (prompt rendering hint).
    pub fn in_payment(&self) -> bool {
        !matches!(self.checkout.state(), CheckoutState::Idle)
    }
}

const HELP: &str = "\
search <text>        catalog lookup (empty text browses)
add <n>              add result #n to the cart
qty <n> <count>      set cart line #n quantity (0 removes)
pack <n> <size>      set cart line #n pack size
rm <n>               remove cart line #n
disc <percent>       set discount percent
cart                 show cart and bill
stock <n> <delta>    add stock to result #n
customer <phone>     directory record + history
pay <phone> [name]   open payment
cash / confirm       cash flow
upi / received / back  UPI flow
done                 dismiss completion screen
cancel               abandon payment
quit";

fn parse_one(rest: &str) -> PosResult<i64> {
    rest.trim()
        .parse()
        .map_err(|_| crate::error::PosError::validation("Expected a number"))
}

fn parse_two(rest: &str) -> PosResult<(i64, i64)> {
    let mut parts = rest.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some(a), Some(b)) => {
            let a = a
                .parse()
                .map_err(|_| crate::error::PosError::validation("Expected a number"))?;
            let b = b
                .parse()
                .map_err(|_| crate::error::PosError::validation("Expected a number"))?;
            Ok((a, b))
        }
        _ => Err(crate::error::PosError::validation("Expected two numbers")),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_one(" 3 ").unwrap(), 3);
        assert!(parse_one("x").is_err());

        assert_eq!(parse_two("2 50").unwrap(), (2, 50));
        assert_eq!(parse_two("1 -5").unwrap(), (1, -5));
        assert!(parse_two("2").is_err());
    }
}
