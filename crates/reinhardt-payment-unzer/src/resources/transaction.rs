//! Charge and cancellation transactions.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::payment::Payment;

/// Charge to submit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
	/// Amount, two decimal places
	#[serde(with = "rust_decimal::serde::float")]
	pub amount: Decimal,
	/// ISO 4217 currency code
	pub currency: String,
	/// Where the gateway sends the customer back to
	pub return_url: String,
	/// Shop order reference
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub order_id: Option<String>,
}

impl ChargeRequest {
	/// Creates a charge request.
	pub fn new(amount: Decimal, currency: impl Into<String>, return_url: impl Into<String>) -> Self {
		Self {
			amount,
			currency: currency.into(),
			return_url: return_url.into(),
			order_id: None,
		}
	}

	/// Tags the charge with a shop order id.
	pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
		self.order_id = Some(order_id.into());
		self
	}
}

/// Result message of a transaction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionMessage {
	/// Gateway result code
	#[serde(default)]
	pub code: String,
	/// Message meant for the merchant
	#[serde(default)]
	pub merchant: String,
	/// Message that may be shown to the customer
	#[serde(default)]
	pub customer: String,
}

/// Resource ids a transaction refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionResources {
	/// Payment the transaction belongs to
	#[serde(default)]
	pub payment_id: String,
	/// Payment type used
	#[serde(default)]
	pub type_id: Option<String>,
	/// Customer charged
	#[serde(default)]
	pub customer_id: Option<String>,
}

/// Charge transaction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Charge {
	/// Charge id (`s-chg-…`)
	pub id: String,
	/// Charge succeeded
	#[serde(default)]
	pub is_success: bool,
	/// Charge waits for customer interaction or the gateway
	#[serde(default)]
	pub is_pending: bool,
	/// Charge failed
	#[serde(default)]
	pub is_error: bool,
	/// Page the customer must visit to complete the charge
	#[serde(default)]
	pub redirect_url: Option<String>,
	/// Result message
	#[serde(default)]
	pub message: TransactionMessage,
	/// Charged amount
	#[serde(default)]
	pub amount: Decimal,
	/// ISO 4217 currency code
	#[serde(default)]
	pub currency: String,
	/// Return URL sent with the charge
	#[serde(default)]
	pub return_url: Option<String>,
	/// Shop order reference
	#[serde(default)]
	pub order_id: Option<String>,
	/// Related resources
	#[serde(default)]
	pub resources: TransactionResources,
	/// Cancellations booked against this charge
	#[serde(default)]
	pub cancellations: Vec<Cancellation>,
	/// Payment the charge belongs to, when it was loaded
	#[serde(skip)]
	pub payment: Option<Box<Payment>>,
}

impl Charge {
	/// Id of the payment the charge belongs to.
	pub fn payment_id(&self) -> &str {
		&self.resources.payment_id
	}

	/// Non-empty redirect URL.
	pub fn redirect_url(&self) -> Option<&str> {
		self.redirect_url.as_deref().filter(|url| !url.is_empty())
	}

	/// Loaded payment, if any.
	pub fn payment(&self) -> Option<&Payment> {
		self.payment.as_deref()
	}

	/// Amount that can still be cancelled.
	pub fn cancellable_amount(&self) -> Decimal {
		self.cancellations
			.iter()
			.fold(self.amount, |remaining, cancellation| {
				remaining - cancellation.amount
			})
	}
}

/// Cancellation (refund or reversal) of a charge.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cancellation {
	/// Cancellation id (`s-cnl-…`)
	pub id: String,
	/// Cancelled amount
	#[serde(default)]
	pub amount: Decimal,
	/// Cancellation succeeded
	#[serde(default)]
	pub is_success: bool,
	/// Cancellation waits for the gateway
	#[serde(default)]
	pub is_pending: bool,
	/// Cancellation failed
	#[serde(default)]
	pub is_error: bool,
	/// Result message
	#[serde(default)]
	pub message: TransactionMessage,
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_charge_deserializes_gateway_json() {
		let charge: Charge = serde_json::from_str(
			r#"{
				"id": "s-chg-1",
				"isSuccess": false,
				"isPending": true,
				"isError": false,
				"redirectUrl": "https://payment.unzer.com/v1/redirect/3ds/s-Xn",
				"message": {"code": "COR.000.200.000", "merchant": "Transaction pending", "customer": "Your payment is currently pending."},
				"amount": "49.9900",
				"currency": "EUR",
				"returnUrl": "https://shop.test/return",
				"orderId": "payment---1",
				"resources": {"customerId": "s-cst-1", "paymentId": "s-pay-1", "typeId": "s-crd-1"}
			}"#,
		)
		.unwrap();

		assert_eq!(charge.payment_id(), "s-pay-1");
		assert!(charge.is_pending);
		assert_eq!(charge.amount, Decimal::new(4999, 2));
		assert_eq!(
			charge.redirect_url(),
			Some("https://payment.unzer.com/v1/redirect/3ds/s-Xn")
		);
		assert_eq!(charge.message.customer, "Your payment is currently pending.");
		assert!(charge.payment().is_none());
	}

	#[rstest]
	fn test_charge_request_serializes_amount_as_number() {
		let request = ChargeRequest::new(Decimal::new(1999, 2), "EUR", "https://shop.test/return")
			.with_order_id("payment---1");

		let json = serde_json::to_value(&request).unwrap();
		assert_eq!(json["amount"], 19.99);
		assert_eq!(json["returnUrl"], "https://shop.test/return");
		assert_eq!(json["orderId"], "payment---1");
	}

	#[rstest]
	fn test_cancellable_amount() {
		let charge = Charge {
			amount: Decimal::from(100),
			cancellations: vec![
				Cancellation {
					amount: Decimal::from(20),
					..Cancellation::default()
				},
				Cancellation {
					amount: Decimal::from(10),
					..Cancellation::default()
				},
			],
			..Charge::default()
		};
		assert_eq!(charge.cancellable_amount(), Decimal::from(70));
	}
}
