//! Order manager seams used by payment providers.

use crate::types::{OnlineShopOrder, PaymentInfo, PaymentResult, Status};
use async_trait::async_trait;

/// Per-order facade of the order manager.
#[async_trait]
pub trait OrderAgent: Send + Sync {
	/// Order handled by this agent.
	fn order(&self) -> &OnlineShopOrder;

	/// Persists a payment status on the order's payment info.
	async fn update_payment(&self, status: &Status) -> PaymentResult<()>;

	/// Current pending payment info, if a payment was started.
	async fn current_pending_payment_info(&self) -> PaymentResult<Option<PaymentInfo>>;
}

/// Creates order agents.
///
/// Injected into providers that need to (re)resolve an agent for an order.
pub trait OrderManager: Send + Sync {
	/// Returns an agent bound to `order`.
	fn create_order_agent(&self, order: &OnlineShopOrder) -> Box<dyn OrderAgent>;
}
