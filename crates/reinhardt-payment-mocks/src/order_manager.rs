//! Mock order manager backing [`OrderAgent`] calls with in-memory state.

use async_trait::async_trait;
use reinhardt_payment::{
	OnlineShopOrder, OrderAgent, OrderManager, PaymentError, PaymentInfo, PaymentResult, Status,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Default)]
struct OrderBook {
	pending: HashMap<String, PaymentInfo>,
	statuses: HashMap<String, Vec<Status>>,
	fail_updates: bool,
}

/// Mock order manager for testing.
///
/// Agents created by the manager share its state, so a status persisted
/// through one agent is visible to the next agent of the same order.
#[derive(Clone, Default)]
pub struct MockOrderManager {
	book: Arc<RwLock<OrderBook>>,
}

impl MockOrderManager {
	/// Creates a manager without orders.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an agent bound to `order`.
	pub fn agent(&self, order: &OnlineShopOrder) -> MockOrderAgent {
		MockOrderAgent {
			order: order.clone(),
			book: Arc::clone(&self.book),
		}
	}

	/// Stores the pending payment info of an order.
	///
	/// # Arguments
	///
	/// * `order_id` - Id of the order
	/// * `payment_info` - Info the provider reads back on the customer's return
	pub async fn set_pending_payment_info(&self, order_id: &str, payment_info: PaymentInfo) {
		self.book
			.write()
			.await
			.pending
			.insert(order_id.to_string(), payment_info);
	}

	/// Gets the pending payment info of an order.
	pub async fn pending_payment_info(&self, order_id: &str) -> Option<PaymentInfo> {
		self.book.read().await.pending.get(order_id).cloned()
	}

	/// Statuses persisted for an order, oldest first.
	pub async fn statuses(&self, order_id: &str) -> Vec<Status> {
		self.book
			.read()
			.await
			.statuses
			.get(order_id)
			.cloned()
			.unwrap_or_default()
	}

	/// Configures whether payment updates fail.
	///
	/// # Arguments
	///
	/// * `fail` - If true, `update_payment` returns an order management error
	pub async fn set_fail_updates(&self, fail: bool) {
		self.book.write().await.fail_updates = fail;
	}
}

impl OrderManager for MockOrderManager {
	fn create_order_agent(&self, order: &OnlineShopOrder) -> Box<dyn OrderAgent> {
		Box::new(self.agent(order))
	}
}

/// Order agent created by [`MockOrderManager`].
pub struct MockOrderAgent {
	order: OnlineShopOrder,
	book: Arc<RwLock<OrderBook>>,
}

#[async_trait]
impl OrderAgent for MockOrderAgent {
	fn order(&self) -> &OnlineShopOrder {
		&self.order
	}

	async fn update_payment(&self, status: &Status) -> PaymentResult<()> {
		let mut book = self.book.write().await;
		if book.fail_updates {
			return Err(PaymentError::OrderManagement(
				"Mock configured to fail".to_string(),
			));
		}

		let payment_info = book
			.pending
			.entry(self.order.id.clone())
			.or_insert_with(|| PaymentInfo::new(status.internal_payment_id()));
		if !status.external_payment_id().is_empty() {
			payment_info.payment_reference = Some(status.external_payment_id().to_string());
		}

		book.statuses
			.entry(self.order.id.clone())
			.or_default()
			.push(status.clone());
		Ok(())
	}

	async fn current_pending_payment_info(&self) -> PaymentResult<Option<PaymentInfo>> {
		Ok(self.book.read().await.pending.get(&self.order.id).cloned())
	}
}
