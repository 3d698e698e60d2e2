//! Payment provider contract.

use crate::agent::OrderAgent;
use crate::types::{
	AuthorizedData, PaymentResult, Price, ResponseBag, StartPaymentRequest, StartPaymentResponse,
	Status,
};
use async_trait::async_trait;
use std::any::Any;

/// Payment provider abstraction.
///
/// Providers translate the shop's checkout flow into gateway calls. An
/// instance keeps the authorized data of the last handled response, so it
/// serves one request at a time; `handle_response` takes `&mut self` for
/// that reason.
///
/// Operations specific to one provider stay on its concrete type. A provider
/// built by a [`ProviderRegistry`](crate::ProviderRegistry) is turned back into
/// that type with `downcast_ref` or
/// [`ProviderRegistry::create_as`](crate::ProviderRegistry::create_as).
#[async_trait]
pub trait PaymentProvider: Send + Sync {
	/// Provider name.
	fn name(&self) -> &str;

	/// Legacy entry point without order agent.
	async fn init_payment(&self, price: &Price, config: &StartPaymentRequest)
	-> PaymentResult<()>;

	/// Starts a payment and tells the caller where to send the customer.
	async fn start_payment(
		&self,
		order_agent: &dyn OrderAgent,
		price: &Price,
		request: &StartPaymentRequest,
	) -> PaymentResult<StartPaymentResponse>;

	/// Maps the gateway's answer for a returning customer to a status.
	async fn handle_response(&mut self, response: &ResponseBag) -> PaymentResult<Status>;

	/// Snapshot captured by the last `handle_response` call.
	fn authorized_data(&self) -> &AuthorizedData;

	/// Replaces the snapshot.
	fn set_authorized_data(&mut self, authorized_data: AuthorizedData);

	/// Debits an authorized payment.
	async fn execute_debit(
		&self,
		price: Option<&Price>,
		reference: Option<&str>,
	) -> PaymentResult<Status>;

	/// Refunds a captured payment.
	async fn execute_credit(
		&self,
		price: &Price,
		reference: &str,
		transaction_id: &str,
	) -> PaymentResult<Status>;

	/// The provider as [`Any`], for downcasting to its concrete type.
	fn as_any(&self) -> &dyn Any;

	/// Mutable counterpart of [`as_any`](Self::as_any).
	fn as_any_mut(&mut self) -> &mut dyn Any;

	/// Owned counterpart of [`as_any`](Self::as_any).
	fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync>;
}

impl dyn PaymentProvider {
	/// Borrows the provider as `T` if that is its concrete type.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.as_any().downcast_ref::<T>()
	}

	/// Mutably borrows the provider as `T` if that is its concrete type.
	pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
		self.as_any_mut().downcast_mut::<T>()
	}
}
