//! Mock Unzer gateway for testing the Unzer provider.

use async_trait::async_trait;
use reinhardt_payment_unzer::resources::{
	Cancellation, Charge, ChargeRequest, Customer, Payment, PaymentState, PaymentType,
	TransactionMessage, TransactionResources,
};
use reinhardt_payment_unzer::{UnzerError, UnzerGateway, UnzerResult};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Result the next charges are booked with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChargeOutcome {
	/// Charge succeeds, the payment is completed
	Success {
		/// Redirect page reported with the charge
		redirect_url: Option<String>,
	},
	/// Charge waits for the customer, the payment stays pending
	Pending {
		/// Redirect page reported with the charge
		redirect_url: Option<String>,
	},
	/// Charge is declined, the payment is cancelled
	Declined {
		/// Message for the customer
		customer_message: String,
	},
}

impl Default for ChargeOutcome {
	fn default() -> Self {
		Self::Success { redirect_url: None }
	}
}

/// Gateway call recorded by the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum GatewayCall {
	/// `perform_charge`
	PerformCharge {
		/// Submitted charge
		request: ChargeRequest,
		/// Payment type charged
		payment_type_id: String,
		/// Customer sent along
		customer: Customer,
	},
	/// `cancel_charge_by_id`
	CancelCharge {
		/// Payment id
		payment_id: String,
		/// Charge id
		charge_id: String,
		/// Requested amount
		amount: Option<Decimal>,
	},
	/// `fetch_charge_by_id`
	FetchCharge {
		/// Payment id
		payment_id: String,
		/// Charge id
		charge_id: String,
	},
	/// `fetch_payment`
	FetchPayment {
		/// Payment id
		payment_id: String,
	},
}

#[derive(Debug, Clone)]
struct ApiFailure {
	code: String,
	merchant_message: String,
	client_message: String,
}

/// Mock Unzer gateway for testing.
///
/// Payments live in memory. Charges are booked with a configurable
/// outcome, and the next call can be made to fail with an API error.
#[derive(Clone, Default)]
pub struct MockUnzerGateway {
	payments: Arc<RwLock<HashMap<String, Payment>>>,
	charge_outcome: Arc<RwLock<ChargeOutcome>>,
	detach_payment: Arc<RwLock<bool>>,
	fail_next: Arc<RwLock<Option<ApiFailure>>>,
	calls: Arc<RwLock<Vec<GatewayCall>>>,
}

impl MockUnzerGateway {
	/// Creates an empty gateway whose charges succeed.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the outcome of subsequent charges.
	///
	/// # Arguments
	///
	/// * `outcome` - Result the charges and their payments are booked with
	pub async fn set_charge_outcome(&self, outcome: ChargeOutcome) {
		*self.charge_outcome.write().await = outcome;
	}

	/// Returns subsequent charges without their payment, as the gateway
	/// does when the payment cannot be loaded after charging.
	///
	/// # Arguments
	///
	/// * `detach` - If true, charges come back with no payment attached.
	///   The payment is still stored.
	pub async fn set_detach_payment(&self, detach: bool) {
		*self.detach_payment.write().await = detach;
	}

	/// Makes the next call fail with a generic API error.
	///
	/// # Arguments
	///
	/// * `fail` - If true, the next call returns an API error
	pub async fn set_fail_next(&self, fail: bool) {
		*self.fail_next.write().await = fail.then(|| ApiFailure {
			code: "API.000.000.999".to_string(),
			merchant_message: "Mock configured to fail".to_string(),
			client_message: String::new(),
		});
	}

	/// Makes the next call fail with the given API error.
	///
	/// # Arguments
	///
	/// * `code` - Gateway error code
	/// * `merchant_message` - Message meant for the merchant
	/// * `client_message` - Localized message meant for the customer
	pub async fn fail_next_with(
		&self,
		code: impl Into<String>,
		merchant_message: impl Into<String>,
		client_message: impl Into<String>,
	) {
		*self.fail_next.write().await = Some(ApiFailure {
			code: code.into(),
			merchant_message: merchant_message.into(),
			client_message: client_message.into(),
		});
	}

	/// Stores a payment as if it had been booked before.
	///
	/// # Arguments
	///
	/// * `payment` - Payment to store, replacing one with the same id
	pub async fn insert_payment(&self, payment: Payment) {
		self.payments
			.write()
			.await
			.insert(payment.id.clone(), payment);
	}

	/// Gets a stored payment.
	///
	/// # Arguments
	///
	/// * `payment_id` - Id of the payment, as reported with its charges
	pub async fn payment(&self, payment_id: &str) -> Option<Payment> {
		self.payments.read().await.get(payment_id).cloned()
	}

	/// Gets the number of stored payments.
	pub async fn payment_count(&self) -> usize {
		self.payments.read().await.len()
	}

	/// Calls received so far, oldest first.
	pub async fn calls(&self) -> Vec<GatewayCall> {
		self.calls.read().await.clone()
	}

	/// Clears all stored data.
	pub async fn clear(&self) {
		self.payments.write().await.clear();
		self.calls.write().await.clear();
		*self.fail_next.write().await = None;
	}

	async fn begin(&self, call: GatewayCall) -> UnzerResult<()> {
		self.calls.write().await.push(call);
		match self.fail_next.write().await.take() {
			Some(failure) => Err(UnzerError::api(
				failure.code,
				failure.merchant_message,
				failure.client_message,
			)),
			None => Ok(()),
		}
	}
}

fn payment_not_found(payment_id: &str) -> UnzerError {
	UnzerError::api(
		"API.310.100.003",
		format!("Payment with id {} does not exist", payment_id),
		"",
	)
}

fn charge_not_found(charge_id: &str) -> UnzerError {
	UnzerError::api(
		"API.330.100.007",
		format!("Charge with id {} does not exist", charge_id),
		"",
	)
}

#[async_trait]
impl UnzerGateway for MockUnzerGateway {
	async fn perform_charge(
		&self,
		request: &ChargeRequest,
		payment_type_id: &str,
		customer: &Customer,
	) -> UnzerResult<Charge> {
		self.begin(GatewayCall::PerformCharge {
			request: request.clone(),
			payment_type_id: payment_type_id.to_string(),
			customer: customer.clone(),
		})
		.await?;

		let payment_id = format!("s-pay-{}", Uuid::new_v4().simple());
		let outcome = self.charge_outcome.read().await.clone();
		let (is_success, is_pending, redirect_url, customer_message, state) = match outcome {
			ChargeOutcome::Success { redirect_url } => {
				(true, false, redirect_url, String::new(), PaymentState::Completed)
			}
			ChargeOutcome::Pending { redirect_url } => (
				false,
				true,
				redirect_url,
				"Your payment is currently pending.".to_string(),
				PaymentState::Pending,
			),
			ChargeOutcome::Declined { customer_message } => {
				(false, false, None, customer_message, PaymentState::Canceled)
			}
		};

		let charge = Charge {
			id: format!("s-chg-{}", Uuid::new_v4().simple()),
			is_success,
			is_pending,
			is_error: !is_success && !is_pending,
			redirect_url,
			message: TransactionMessage {
				code: "COR.000.100.112".to_string(),
				merchant: String::new(),
				customer: customer_message,
			},
			amount: request.amount,
			currency: request.currency.clone(),
			return_url: Some(request.return_url.clone()),
			order_id: request.order_id.clone(),
			resources: TransactionResources {
				payment_id: payment_id.clone(),
				type_id: Some(payment_type_id.to_string()),
				customer_id: Some(format!("s-cst-{}", Uuid::new_v4().simple())),
			},
			..Charge::default()
		};

		let mut payment = Payment::new(&payment_id, state, &request.currency);
		payment.amount.total = request.amount;
		if is_success {
			payment.amount.charged = request.amount;
		} else {
			payment.amount.remaining = request.amount;
		}
		payment.order_id = request.order_id.clone();
		payment.payment_type = Some(PaymentType::new(payment_type_id));
		payment.charges.push(charge.clone());
		self.insert_payment(payment.clone()).await;

		let detach = *self.detach_payment.read().await;
		Ok(Charge {
			payment: (!detach).then(|| Box::new(payment)),
			..charge
		})
	}

	async fn cancel_charge_by_id(
		&self,
		payment_id: &str,
		charge_id: &str,
		amount: Option<Decimal>,
	) -> UnzerResult<Cancellation> {
		self.begin(GatewayCall::CancelCharge {
			payment_id: payment_id.to_string(),
			charge_id: charge_id.to_string(),
			amount,
		})
		.await?;

		let mut payments = self.payments.write().await;
		let payment = payments
			.get_mut(payment_id)
			.ok_or_else(|| payment_not_found(payment_id))?;
		let charge = payment
			.charges
			.iter_mut()
			.find(|charge| charge.id == charge_id)
			.ok_or_else(|| charge_not_found(charge_id))?;

		let cancellable = charge.cancellable_amount();
		let amount = amount.unwrap_or(cancellable);
		if amount > cancellable {
			return Err(UnzerError::api(
				"API.340.100.014",
				"The amount to cancel exceeds the remaining charged amount",
				"",
			));
		}

		let cancellation = Cancellation {
			id: format!("s-cnl-{}", Uuid::new_v4().simple()),
			amount,
			is_success: true,
			..Cancellation::default()
		};
		charge.cancellations.push(cancellation.clone());
		payment.amount.canceled += amount;
		payment.amount.charged -= amount;

		Ok(cancellation)
	}

	async fn fetch_charge_by_id(&self, payment_id: &str, charge_id: &str) -> UnzerResult<Charge> {
		self.begin(GatewayCall::FetchCharge {
			payment_id: payment_id.to_string(),
			charge_id: charge_id.to_string(),
		})
		.await?;

		let payments = self.payments.read().await;
		let payment = payments
			.get(payment_id)
			.ok_or_else(|| payment_not_found(payment_id))?;
		payment
			.charge_by_id(charge_id)
			.cloned()
			.ok_or_else(|| charge_not_found(charge_id))
	}

	async fn fetch_payment(&self, payment_id: &str) -> UnzerResult<Payment> {
		self.begin(GatewayCall::FetchPayment {
			payment_id: payment_id.to_string(),
		})
		.await?;

		self.payment(payment_id)
			.await
			.ok_or_else(|| payment_not_found(payment_id))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::{fixture, rstest};

	#[fixture]
	fn request() -> ChargeRequest {
		ChargeRequest::new(Decimal::new(4999, 2), "EUR", "https://shop.test/return")
			.with_order_id("payment---1")
	}

	#[fixture]
	fn customer() -> Customer {
		Customer::new("Jane", "Doe")
	}

	#[rstest]
	#[tokio::test]
	async fn test_successful_charge_completes_payment(request: ChargeRequest, customer: Customer) {
		let gateway = MockUnzerGateway::new();

		let charge = gateway
			.perform_charge(&request, "s-crd-1", &customer)
			.await
			.unwrap();

		assert!(charge.is_success);
		let payment = gateway.payment(charge.payment_id()).await.unwrap();
		assert!(payment.is_completed());
		assert_eq!(payment.amount.charged, Decimal::new(4999, 2));
		assert_eq!(charge.payment(), Some(&payment));
		assert_eq!(gateway.payment_count().await, 1);
	}

	#[rstest]
	#[tokio::test]
	async fn test_pending_charge(request: ChargeRequest, customer: Customer) {
		let gateway = MockUnzerGateway::new();
		gateway
			.set_charge_outcome(ChargeOutcome::Pending {
				redirect_url: Some("https://payment.unzer.test/3ds".to_string()),
			})
			.await;

		let charge = gateway
			.perform_charge(&request, "s-crd-1", &customer)
			.await
			.unwrap();

		assert!(charge.is_pending);
		assert_eq!(charge.redirect_url(), Some("https://payment.unzer.test/3ds"));
		assert!(gateway.payment(charge.payment_id()).await.unwrap().is_pending());
	}

	#[rstest]
	#[tokio::test]
	async fn test_detached_charge_keeps_payment_stored(request: ChargeRequest, customer: Customer) {
		let gateway = MockUnzerGateway::new();
		gateway.set_detach_payment(true).await;

		let charge = gateway
			.perform_charge(&request, "s-crd-1", &customer)
			.await
			.unwrap();

		assert!(charge.payment().is_none());
		assert!(gateway.payment(charge.payment_id()).await.is_some());
	}

	#[rstest]
	#[tokio::test]
	async fn test_fail_next_applies_once(request: ChargeRequest, customer: Customer) {
		let gateway = MockUnzerGateway::new();
		gateway.fail_next_with("API.1", "merchant text", "client text").await;

		let err = gateway
			.perform_charge(&request, "s-crd-1", &customer)
			.await
			.unwrap_err();
		assert_eq!(err.merchant_message(), "merchant text");
		assert_eq!(err.client_message(), "client text");

		assert!(
			gateway
				.perform_charge(&request, "s-crd-1", &customer)
				.await
				.is_ok()
		);
		assert_eq!(gateway.calls().await.len(), 2);
	}

	#[rstest]
	#[tokio::test]
	async fn test_partial_cancellation(request: ChargeRequest, customer: Customer) {
		let gateway = MockUnzerGateway::new();
		let charge = gateway
			.perform_charge(&request, "s-crd-1", &customer)
			.await
			.unwrap();

		gateway
			.cancel_charge_by_id(charge.payment_id(), &charge.id, Some(Decimal::from(20)))
			.await
			.unwrap();
		let fetched = gateway
			.fetch_charge_by_id(charge.payment_id(), &charge.id)
			.await
			.unwrap();
		assert_eq!(fetched.cancellable_amount(), Decimal::new(2999, 2));

		let err = gateway
			.cancel_charge_by_id(charge.payment_id(), &charge.id, Some(Decimal::from(50)))
			.await;
		assert!(err.is_err());
	}

	#[rstest]
	#[tokio::test]
	async fn test_unknown_payment() {
		let gateway = MockUnzerGateway::new();

		let err = gateway.fetch_payment("s-pay-missing").await.unwrap_err();
		assert!(err.merchant_message().contains("s-pay-missing"));
	}

	#[rstest]
	#[tokio::test]
	async fn test_clear_removes_all_data(request: ChargeRequest, customer: Customer) {
		let gateway = MockUnzerGateway::new();
		let _ = gateway.perform_charge(&request, "s-crd-1", &customer).await;
		assert_eq!(gateway.payment_count().await, 1);

		gateway.clear().await;
		assert_eq!(gateway.payment_count().await, 0);
		assert!(gateway.calls().await.is_empty());
	}
}
