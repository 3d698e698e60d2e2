//! Payment resource and its state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::transaction::Charge;

/// Payment state as reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum PaymentState {
	/// Waiting for completion
	Pending,
	/// Fully charged
	Completed,
	/// Cancelled
	Canceled,
	/// Partly charged
	PartlyPaid,
	/// Held for manual review
	PaymentReview,
	/// Reversed by the customer's bank
	Chargeback,
	/// Created, nothing booked yet
	Create,
}

impl PaymentState {
	/// Numeric state id used by the API.
	pub fn id(&self) -> u8 {
		match self {
			Self::Pending => 0,
			Self::Completed => 1,
			Self::Canceled => 2,
			Self::PartlyPaid => 3,
			Self::PaymentReview => 4,
			Self::Chargeback => 5,
			Self::Create => 6,
		}
	}

	/// State name used by the API.
	pub fn name(&self) -> &'static str {
		match self {
			Self::Pending => "pending",
			Self::Completed => "completed",
			Self::Canceled => "canceled",
			Self::PartlyPaid => "partly",
			Self::PaymentReview => "payment review",
			Self::Chargeback => "chargeback",
			Self::Create => "create",
		}
	}
}

impl From<PaymentState> for u8 {
	fn from(state: PaymentState) -> Self {
		state.id()
	}
}

impl TryFrom<u8> for PaymentState {
	type Error = String;

	fn try_from(id: u8) -> Result<Self, Self::Error> {
		Ok(match id {
			0 => Self::Pending,
			1 => Self::Completed,
			2 => Self::Canceled,
			3 => Self::PartlyPaid,
			4 => Self::PaymentReview,
			5 => Self::Chargeback,
			6 => Self::Create,
			other => return Err(format!("unknown payment state id {}", other)),
		})
	}
}

impl fmt::Display for PaymentState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Amount breakdown of a payment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentAmount {
	/// Total amount of the payment
	#[serde(default)]
	pub total: Decimal,
	/// Amount charged so far
	#[serde(default)]
	pub charged: Decimal,
	/// Amount cancelled so far
	#[serde(default)]
	pub canceled: Decimal,
	/// Amount still open
	#[serde(default)]
	pub remaining: Decimal,
}

/// Payment method behind a payment type resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PaymentMethod {
	/// Credit or debit card
	Card,
	/// PayPal
	Paypal,
	/// Sofort
	Sofort,
	/// Giropay
	Giropay,
	/// iDEAL
	Ideal,
	/// Invoice
	Invoice,
	/// Secured invoice
	InvoiceSecured,
	/// Prepayment
	Prepayment,
	/// Unzer bank transfer
	Pis,
	/// SEPA direct debit
	SepaDirectDebit,
	/// Secured SEPA direct debit
	SepaDirectDebitSecured,
	/// EPS
	Eps,
	/// Alipay
	Alipay,
	/// WeChat Pay
	Wechatpay,
	/// PostFinance Card
	PostFinanceCard,
	/// PostFinance e-finance
	PostFinanceEfinance,
	/// Bancontact
	Bancontact,
	/// Przelewy24
	Przelewy24,
	/// Apple Pay
	Applepay,
	/// Google Pay
	Googlepay,
	/// Paylater invoice
	PaylaterInvoice,
	/// Klarna
	Klarna,
	/// Type code this adapter does not know
	Other(String),
}

impl PaymentMethod {
	/// Maps the three-letter code of a type id (`s-crd-…` → `crd`).
	pub fn from_code(code: &str) -> Self {
		match code {
			"crd" => Self::Card,
			"ppl" => Self::Paypal,
			"sft" => Self::Sofort,
			"gro" => Self::Giropay,
			"idl" => Self::Ideal,
			"ivc" => Self::Invoice,
			"ivs" => Self::InvoiceSecured,
			"ppy" => Self::Prepayment,
			"pis" => Self::Pis,
			"sdd" => Self::SepaDirectDebit,
			"dds" => Self::SepaDirectDebitSecured,
			"eps" => Self::Eps,
			"ali" => Self::Alipay,
			"wcp" => Self::Wechatpay,
			"pfc" => Self::PostFinanceCard,
			"pfe" => Self::PostFinanceEfinance,
			"bct" => Self::Bancontact,
			"p24" => Self::Przelewy24,
			"apl" => Self::Applepay,
			"gop" => Self::Googlepay,
			"piv" => Self::PaylaterInvoice,
			"kla" => Self::Klarna,
			other => Self::Other(other.to_string()),
		}
	}

	/// Method name reported to the shop (e.g. `Card`).
	pub fn name(&self) -> &str {
		match self {
			Self::Card => "Card",
			Self::Paypal => "Paypal",
			Self::Sofort => "Sofort",
			Self::Giropay => "Giropay",
			Self::Ideal => "Ideal",
			Self::Invoice => "Invoice",
			Self::InvoiceSecured => "InvoiceSecured",
			Self::Prepayment => "Prepayment",
			Self::Pis => "PIS",
			Self::SepaDirectDebit => "SepaDirectDebit",
			Self::SepaDirectDebitSecured => "SepaDirectDebitSecured",
			Self::Eps => "EPS",
			Self::Alipay => "Alipay",
			Self::Wechatpay => "Wechatpay",
			Self::PostFinanceCard => "PostFinanceCard",
			Self::PostFinanceEfinance => "PostFinanceEfinance",
			Self::Bancontact => "Bancontact",
			Self::Przelewy24 => "Przelewy24",
			Self::Applepay => "Applepay",
			Self::Googlepay => "Googlepay",
			Self::PaylaterInvoice => "PaylaterInvoice",
			Self::Klarna => "Klarna",
			Self::Other(code) => code,
		}
	}
}

/// Payment type resource created by the browser-side form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentType {
	/// Type id (`s-crd-…`, `p-ppl-…`)
	pub id: String,
}

impl PaymentType {
	/// Creates a payment type reference.
	pub fn new(id: impl Into<String>) -> Self {
		Self { id: id.into() }
	}

	/// Method derived from the type id.
	pub fn method(&self) -> PaymentMethod {
		PaymentMethod::from_code(self.id.split('-').nth(1).unwrap_or_default())
	}
}

/// Payment aggregating all transactions of one checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
	/// Payment id (`s-pay-…`)
	pub id: String,
	/// Current state
	pub state: PaymentState,
	/// Amount breakdown
	pub amount: PaymentAmount,
	/// ISO 4217 currency code
	pub currency: String,
	/// Shop order reference
	#[serde(default)]
	pub order_id: Option<String>,
	/// Payment type used
	#[serde(default)]
	pub payment_type: Option<PaymentType>,
	/// Charges in booking order
	#[serde(default)]
	pub charges: Vec<Charge>,
}

impl Payment {
	/// Creates a payment without transactions.
	pub fn new(id: impl Into<String>, state: PaymentState, currency: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			state,
			amount: PaymentAmount::default(),
			currency: currency.into(),
			order_id: None,
			payment_type: None,
			charges: Vec::new(),
		}
	}

	/// Whether the payment is fully charged.
	pub fn is_completed(&self) -> bool {
		self.state == PaymentState::Completed
	}

	/// Whether the payment waits for completion.
	pub fn is_pending(&self) -> bool {
		self.state == PaymentState::Pending
	}

	/// Name of the current state.
	pub fn state_name(&self) -> &'static str {
		self.state.name()
	}

	/// Charge at `index` in booking order.
	pub fn charge_by_index(&self, index: usize) -> Option<&Charge> {
		self.charges.get(index)
	}

	/// Charge with the given id.
	pub fn charge_by_id(&self, charge_id: &str) -> Option<&Charge> {
		self.charges.iter().find(|charge| charge.id == charge_id)
	}

	/// Method name of the payment type, empty when unknown.
	pub fn payment_method_name(&self) -> String {
		self.payment_type
			.as_ref()
			.map(|payment_type| payment_type.method().name().to_string())
			.unwrap_or_default()
	}
}
