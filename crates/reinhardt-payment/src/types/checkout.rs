//! Start-payment request/response types and the response bag handed back
//! after the customer returns from the payment page.

use super::error::{PaymentError, PaymentResult};
use super::order::OnlineShopOrder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider-agnostic start-payment request.
///
/// Providers read the attributes they need and validate them themselves;
/// typed provider requests convert into this bag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StartPaymentRequest {
	attributes: BTreeMap<String, String>,
}

impl StartPaymentRequest {
	/// Creates an empty request.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an attribute, builder style.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.set(key, value);
		self
	}

	/// Sets an attribute.
	pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.attributes.insert(key.into(), value.into());
	}

	/// Returns an attribute value.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.attributes.get(key).map(String::as_str)
	}

	/// Returns a non-empty attribute or an argument error carrying `message`.
	pub fn require(&self, key: &str, message: &str) -> PaymentResult<&str> {
		self.get(key)
			.filter(|value| !value.is_empty())
			.ok_or_else(|| PaymentError::InvalidArgument(message.to_string()))
	}
}

/// Redirect the customer's browser to `url`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlResponse {
	/// Order the payment belongs to
	pub order: OnlineShopOrder,
	/// Redirect target
	pub url: String,
}

/// Result of starting a payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
#[non_exhaustive]
pub enum StartPaymentResponse {
	/// Browser redirect
	Url(UrlResponse),
}

impl StartPaymentResponse {
	/// Order the response belongs to.
	pub fn order(&self) -> &OnlineShopOrder {
		match self {
			Self::Url(response) => &response.order,
		}
	}

	/// Redirect URL, if this is a redirect response.
	pub fn url(&self) -> Option<&str> {
		match self {
			Self::Url(response) => Some(&response.url),
		}
	}
}

/// Parameters received when the customer comes back from the gateway.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResponseBag {
	order: Option<OnlineShopOrder>,
	params: BTreeMap<String, String>,
}

impl ResponseBag {
	/// Creates an empty bag.
	pub fn new() -> Self {
		Self::default()
	}

	/// Attaches the order, builder style.
	pub fn with_order(mut self, order: OnlineShopOrder) -> Self {
		self.order = Some(order);
		self
	}

	/// Adds a request parameter, builder style.
	pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.params.insert(key.into(), value.into());
		self
	}

	/// Returned order.
	pub fn order(&self) -> Option<&OnlineShopOrder> {
		self.order.as_ref()
	}

	/// Request parameter.
	pub fn param(&self, key: &str) -> Option<&str> {
		self.params.get(key).map(String::as_str)
	}
}
