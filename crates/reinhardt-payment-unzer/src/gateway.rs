//! Outbound gateway contract.

use crate::error::UnzerResult;
use crate::resources::{Cancellation, Charge, ChargeRequest, Customer, Payment};
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Operations the adapter needs from the Unzer gateway.
///
/// [`UnzerClient`](crate::client::UnzerClient) talks to the REST API; tests
/// plug in an in-memory implementation.
#[async_trait]
pub trait UnzerGateway: Send + Sync {
	/// Charges `payment_type_id` for `customer`.
	///
	/// The returned charge has its payment loaded when the gateway could
	/// provide it. A charge without payment still counts as booked; the
	/// status derived from it then has empty `unzer_amount`,
	/// `unzer_currency` and `unzer_paymentType` fields.
	async fn perform_charge(
		&self,
		charge: &ChargeRequest,
		payment_type_id: &str,
		customer: &Customer,
	) -> UnzerResult<Charge>;

	/// Cancels a charge, fully when `amount` is `None`.
	async fn cancel_charge_by_id(
		&self,
		payment_id: &str,
		charge_id: &str,
		amount: Option<Decimal>,
	) -> UnzerResult<Cancellation>;

	/// Loads a charge including its cancellations.
	async fn fetch_charge_by_id(&self, payment_id: &str, charge_id: &str) -> UnzerResult<Charge>;

	/// Loads a payment including its charges.
	async fn fetch_payment(&self, payment_id: &str) -> UnzerResult<Payment>;
}
