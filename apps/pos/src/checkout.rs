//! # Checkout State Machine
//!
//! Drives one sale from cart to recorded payment.
//!
//! ## State Diagram
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout States                                     │
//! │                                                                         │
//! │        cart edits allowed                                               │
//! │            ┌──────┐                                                     │
//! │            ▼      │                                                     │
//! │         ┌─────────┴──┐   begin(name, phone)    ┌───────────────┐       │
//! │         │    Idle    ├────────────────────────►│ AwaitingInput │       │
//! │         └────────────┘  (cart non-empty AND    └───┬───────┬───┘       │
//! │               ▲          phone = 10 digits)        │       │           │
//! │               │                          choose_cash    choose_upi     │
//! │               │                                    │       │           │
//! │               │                                    ▼       ▼           │
//! │               │                        ┌──────────────┐ ┌────────────┐ │
//! │               │                        │ CashPrompted │ │ QrDisplayed│ │
//! │               │                        └──────┬───────┘ └─────┬──────┘ │
//! │               │                   confirm_cash│   confirm_upi │        │
//! │               │                               ▼     _received ▼        │
//! │               │     acknowledge      ┌─────────────────────────┐       │
//! │               └───────────────────── │     PaymentRecorded     │       │
//! │                                      └─────────────────────────┘       │
//! │                                                                         │
//! │  choose_upi link failure  → stays AwaitingInput, nothing recorded      │
//! │  cancel_upi               → back to AwaitingInput                      │
//! │  cancel (AwaitingInput)   → Idle, cart intact                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Collaborator Degradation
//! - Ledger append failure: logged as a warning, the sale still completes
//!   in memory and the cart resets. The terminal stays usable.
//! - SMS receipt: fire-and-forget. Delivery outcome never affects the sale.
//! - UPI "received" is operator-attested; no gateway callback exists.

use chrono::Utc;
use tracing::{info, warn};

use medplus_core::cart::{BillSummary, Cart};
use medplus_core::money::Money;
use medplus_core::receipt::ReceiptData;
use medplus_core::types::{
    DiscountPercent, PaymentMethod, PaymentStatus, Product, Transaction,
};
use medplus_core::upi::PaymentRequest;
use medplus_core::validation::validate_phone;
use medplus_core::CoreError;
use medplus_store::StoreError;

use crate::error::{PosError, PosResult};

// =============================================================================
// Collaborator Traits
// =============================================================================

/// Durable record of completed sales.
#[allow(async_fn_in_trait)]
pub trait TransactionLedger {
    async fn record_sale(&self, txn: &Transaction) -> Result<(), StoreError>;
}

/// Provisions a UPI deep link for QR display.
#[allow(async_fn_in_trait)]
pub trait PaymentLinkProvider {
    async fn create_link(&self, request: &PaymentRequest) -> PosResult<String>;
}

/// Sends the receipt after a sale. Implementations must not block: the
/// checkout calls this synchronously and moves on, so real senders spawn
/// their network work onto the runtime.
pub trait ReceiptNotifier {
    fn dispatch(&self, phone: &str, receipt: ReceiptData);
}

// =============================================================================
// State
// =============================================================================

/// Where the checkout currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    /// No payment in progress; cart edits are allowed.
    Idle,

    /// Payment modal open, method not yet chosen.
    AwaitingInput,

    /// Cash chosen: operator confirms the customer handed over `amount`.
    CashPrompted { amount: Money },

    /// UPI chosen: QR on screen, waiting for the operator to attest.
    QrDisplayed {
        reference: String,
        link: String,
        amount: Money,
    },

    /// Sale recorded; acknowledge() returns to Idle.
    PaymentRecorded { transaction_id: String },
}

// =============================================================================
// Checkout
// =============================================================================

/// One counter's checkout: the cart plus the payment state machine.
///
/// Generic over its collaborators so tests can substitute in-memory fakes
/// for the SQLite ledger and the SMS sender.
pub struct Checkout<L, P, N> {
    ledger: L,
    links: P,
    notifier: N,

    cart: Cart,
    discount: DiscountPercent,
    customer_name: String,
    customer_phone: String,

    state: CheckoutState,
}

impl<L, P, N> Checkout<L, P, N>
where
    L: TransactionLedger,
    P: PaymentLinkProvider,
    N: ReceiptNotifier,
{
    /// Creates a checkout in the Idle state with an empty cart.
    pub fn new(ledger: L, links: P, notifier: N) -> Self {
        Checkout {
            ledger,
            links,
            notifier,
            cart: Cart::new(),
            discount: DiscountPercent::zero(),
            customer_name: String::new(),
            customer_phone: String::new(),
            state: CheckoutState::Idle,
        }
    }

    /// Current state.
    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Read access to the cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current discount rate.
    pub fn discount(&self) -> DiscountPercent {
        self.discount
    }

    /// Bill for the current cart and discount. Recomputed on every call.
    pub fn bill(&self) -> BillSummary {
        self.cart.bill(self.discount)
    }

    // -------------------------------------------------------------------------
    // Cart edits (Idle only)
    // -------------------------------------------------------------------------

    fn require_idle(&self) -> PosResult<()> {
        if self.state != CheckoutState::Idle {
            return Err(PosError::payment("Finish or cancel the current payment first"));
        }
        Ok(())
    }

    /// Adds one unit of a product to the cart.
    pub fn add_product(&mut self, product: &Product) -> PosResult<()> {
        self.require_idle()?;
        self.cart.add_product(product)?;
        Ok(())
    }

    /// Sets a cart line's quantity (<= 0 removes the line).
    pub fn set_quantity(&mut self, product_id: &str, quantity: i64) -> PosResult<()> {
        self.require_idle()?;
        self.cart.set_quantity(product_id, quantity)?;
        Ok(())
    }

    /// Sets a cart line's pack size, repricing when the pack cost is known.
    pub fn set_pack_size(&mut self, product_id: &str, pack_size: i64) -> PosResult<()> {
        self.require_idle()?;
        self.cart.set_pack_size(product_id, pack_size)?;
        Ok(())
    }

    /// Removes a cart line.
    pub fn remove_line(&mut self, product_id: &str) -> PosResult<()> {
        self.require_idle()?;
        self.cart.remove_line(product_id);
        Ok(())
    }

    /// Sets the discount rate (unclamped by design).
    pub fn set_discount(&mut self, discount: DiscountPercent) -> PosResult<()> {
        self.require_idle()?;
        self.discount = discount;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Payment flow
    // -------------------------------------------------------------------------

    /// Opens the payment flow: Idle → AwaitingInput.
    ///
    /// ## Guards
    /// - Cart must be non-empty
    /// - Phone must clean up to exactly 10 digits; the cleaned form is what
    ///   gets stored and texted
    pub fn begin(&mut self, customer_name: &str, customer_phone: &str) -> PosResult<BillSummary> {
        self.require_idle()?;

        if self.cart.is_empty() {
            return Err(CoreError::EmptyCart.into());
        }
        let phone = validate_phone(customer_phone)?;

        self.customer_name = customer_name.trim().to_string();
        self.customer_phone = phone;
        self.state = CheckoutState::AwaitingInput;

        Ok(self.bill())
    }

    /// Abandons the payment flow: AwaitingInput → Idle. Cart stays intact.
    pub fn cancel(&mut self) -> PosResult<()> {
        match self.state {
            CheckoutState::AwaitingInput => {
                self.state = CheckoutState::Idle;
                Ok(())
            }
            _ => Err(PosError::payment("No payment to cancel")),
        }
    }

    /// Chooses cash: AwaitingInput → CashPrompted.
    ///
    /// Returns the amount the operator should collect.
    pub fn choose_cash(&mut self) -> PosResult<Money> {
        if self.state != CheckoutState::AwaitingInput {
            return Err(PosError::payment("Choose a payment method from the payment screen"));
        }

        let amount = self.bill().total;
        self.state = CheckoutState::CashPrompted { amount };
        Ok(amount)
    }

    /// Operator confirms the cash was handed over: CashPrompted → PaymentRecorded.
    pub async fn confirm_cash(&mut self) -> PosResult<Transaction> {
        if !matches!(self.state, CheckoutState::CashPrompted { .. }) {
            return Err(PosError::payment("No cash payment awaiting confirmation"));
        }

        let millis = Utc::now().timestamp_millis();
        let bill_number = format!("PHM{}", millis);
        self.record(PaymentMethod::Cash, bill_number, "N/A".to_string())
            .await
    }

    /// Operator answers "no" to the cash prompt: CashPrompted → AwaitingInput.
    pub fn decline_cash(&mut self) -> PosResult<()> {
        if !matches!(self.state, CheckoutState::CashPrompted { .. }) {
            return Err(PosError::payment("No cash payment awaiting confirmation"));
        }
        self.state = CheckoutState::AwaitingInput;
        Ok(())
    }

    /// Chooses UPI: AwaitingInput → QrDisplayed.
    ///
    /// Provisions a deep link for the full bill amount. If provisioning
    /// fails the state stays AwaitingInput and nothing is recorded; the
    /// operator can retry or fall back to cash.
    ///
    /// Returns (reference, link).
    pub async fn choose_upi(&mut self) -> PosResult<(String, String)> {
        if self.state != CheckoutState::AwaitingInput {
            return Err(PosError::payment("Choose a payment method from the payment screen"));
        }

        let amount = self.bill().total;
        let reference = format!("PHM{}", Utc::now().timestamp_millis());
        let request = PaymentRequest {
            amount,
            note: format!("Bill {}", reference),
            reference: reference.clone(),
        };

        let link = self.links.create_link(&request).await?;

        self.state = CheckoutState::QrDisplayed {
            reference: reference.clone(),
            link: link.clone(),
            amount,
        };
        Ok((reference, link))
    }

    /// Dismisses the QR without payment: QrDisplayed → AwaitingInput.
    pub fn cancel_upi(&mut self) -> PosResult<()> {
        if !matches!(self.state, CheckoutState::QrDisplayed { .. }) {
            return Err(PosError::payment("No QR on display"));
        }
        self.state = CheckoutState::AwaitingInput;
        Ok(())
    }

    /// Operator attests the UPI payment arrived: QrDisplayed → PaymentRecorded.
    ///
    /// The bill number reuses the QR reference so the ledger row ties back
    /// to what the customer's UPI app shows.
    pub async fn confirm_upi_received(&mut self) -> PosResult<Transaction> {
        let bill_number = match &self.state {
            CheckoutState::QrDisplayed { reference, .. } => reference.clone(),
            _ => return Err(PosError::payment("No QR on display")),
        };

        let payment_reference = format!("UPI{}", Utc::now().timestamp_millis());
        self.record(PaymentMethod::UpiQr, bill_number, payment_reference)
            .await
    }

    /// Dismisses the completion screen: PaymentRecorded → Idle.
    pub fn acknowledge(&mut self) -> PosResult<()> {
        if !matches!(self.state, CheckoutState::PaymentRecorded { .. }) {
            return Err(PosError::payment("No completed payment to acknowledge"));
        }
        self.state = CheckoutState::Idle;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Recording
    // -------------------------------------------------------------------------

    /// Builds the transaction, persists it, fires the receipt, and resets
    /// the sale. The ledger is best-effort: an append failure is logged and
    /// the sale still completes so the counter keeps moving.
    async fn record(
        &mut self,
        method: PaymentMethod,
        bill_number: String,
        payment_reference: String,
    ) -> PosResult<Transaction> {
        let bill = self.bill();
        let now = Utc::now();

        let txn = Transaction {
            id: format!("TXN{}", now.timestamp_millis()),
            bill_number,
            customer_name: self.customer_name.clone(),
            customer_phone: self.customer_phone.clone(),
            items: self.cart.lines().to_vec(),
            subtotal: bill.subtotal,
            discount: self.discount,
            gst_amount: bill.gst_amount,
            total: bill.total,
            payment_method: method,
            payment_status: PaymentStatus::Completed,
            payment_reference,
            created_at: now,
        };

        if let Err(e) = self.ledger.record_sale(&txn).await {
            warn!(error = %e, bill = %txn.bill_number, "Ledger append failed; sale completes without a durable record");
        }

        self.notifier
            .dispatch(&self.customer_phone, ReceiptData::from_transaction(&txn));

        info!(
            bill = %txn.bill_number,
            total = %txn.total,
            method = method.as_str(),
            "Sale completed"
        );

        self.cart.clear();
        self.discount = DiscountPercent::zero();
        self.customer_name.clear();
        self.customer_phone.clear();
        self.state = CheckoutState::PaymentRecorded {
            transaction_id: txn.id.clone(),
        };

        Ok(txn)
    }
}

impl<L, P, N> Checkout<L, P, N> {
    /// Total quantity across all cart lines.
    pub fn total_quantity(&self) -> i64 {
        self.cart.total_quantity()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
