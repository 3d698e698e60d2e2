//! Shared fixtures for Unzer provider integration tests.

#![allow(dead_code)]

use reinhardt_payment::{Currency, OnlineShopOrder, PaymentInfo, PaymentProviderBrick, Price};
use reinhardt_payment_mocks::{MockOrderManager, MockUnzerGateway};
use reinhardt_payment_unzer::resources::{Charge, Payment, PaymentState, PaymentType};
use reinhardt_payment_unzer::{PROVIDER_BRICK, UnzerOptions, UnzerPayment, UnzerRequest};
use rust_decimal::Decimal;
use std::sync::Arc;

pub const RETURN_URL: &str = "https://shop.test/checkout/return";
pub const ERROR_URL: &str = "https://shop.test/checkout/error?step=payment";

/// Provider wired to in-memory collaborators.
pub struct Harness {
	pub gateway: MockUnzerGateway,
	pub orders: MockOrderManager,
	pub provider: UnzerPayment,
}

pub fn harness() -> Harness {
	let gateway = MockUnzerGateway::new();
	let orders = MockOrderManager::new();
	let options = UnzerOptions::new("s-priv-test", "s-pub-test")
		.unwrap()
		.with_locale("de-DE");
	let provider = UnzerPayment::with_gateway(
		options,
		Arc::new(gateway.clone()),
		Arc::new(orders.clone()),
	);

	Harness {
		gateway,
		orders,
		provider,
	}
}

pub fn order() -> OnlineShopOrder {
	OnlineShopOrder {
		customer_firstname: "Jane".to_string(),
		customer_lastname: "Doe".to_string(),
		customer_email: "jane@example.com".to_string(),
		customer_street: "Main Street 1".to_string(),
		customer_zip: "1010".to_string(),
		customer_city: "Vienna".to_string(),
		customer_country: "AT".to_string(),
		..OnlineShopOrder::new("order-1")
	}
}

/// Order carrying the data stored after a successful authorization.
pub fn authorized_order(payment_reference: &str, charge_id: &str) -> OnlineShopOrder {
	let mut order = order();
	order.payment_provider.push(
		PaymentProviderBrick::new(PROVIDER_BRICK)
			.with_field("auth_paymentReference", payment_reference)
			.with_field("auth_chargeId", charge_id),
	);
	order
}

pub fn price(amount: Decimal) -> Price {
	Price::new(amount, Currency::new("EUR"))
}

pub fn request() -> UnzerRequest {
	UnzerRequest::new("s-crd-abc", "payment~42", RETURN_URL, ERROR_URL)
}

/// Card payment in `state` with one charge `s-chg-1` of 100 EUR.
pub fn payment(state: PaymentState) -> Payment {
	let mut payment = Payment::new("s-pay-1", state, "EUR");
	payment.amount.total = Decimal::from(100);
	if state == PaymentState::Completed {
		payment.amount.charged = Decimal::from(100);
	}
	payment.payment_type = Some(PaymentType::new("s-crd-abc"));
	payment.charges.push(Charge {
		id: "s-chg-1".to_string(),
		is_success: state == PaymentState::Completed,
		amount: Decimal::from(100),
		currency: "EUR".to_string(),
		..Charge::default()
	});
	payment
}

/// Marks `payment_reference` as the order's pending payment.
pub async fn set_pending(harness: &Harness, order: &OnlineShopOrder, payment_reference: &str) {
	harness
		.orders
		.set_pending_payment_info(
			&order.id,
			PaymentInfo {
				internal_payment_id: "payment~42".to_string(),
				payment_reference: Some(payment_reference.to_string()),
			},
		)
		.await;
}
