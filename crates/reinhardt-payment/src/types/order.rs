//! Order and payment-info records owned by the order manager.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Online shop order as seen by payment providers.
///
/// Customer fields form the billing address, delivery fields an optional
/// alternative shipping address.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OnlineShopOrder {
	/// Order identifier
	pub id: String,
	/// Customer first name
	pub customer_firstname: String,
	/// Customer last name
	pub customer_lastname: String,
	/// Customer email address
	pub customer_email: String,
	/// Customer street and house number
	pub customer_street: String,
	/// Customer postal code
	pub customer_zip: String,
	/// Customer city
	pub customer_city: String,
	/// Customer country (ISO 3166-1 alpha-2)
	pub customer_country: String,
	/// Customer birth date, needed by invoice-like payment methods
	pub customer_birthdate: Option<NaiveDate>,
	/// Delivery first name
	pub delivery_firstname: Option<String>,
	/// Delivery last name; a non-empty value enables the delivery address
	pub delivery_lastname: Option<String>,
	/// Delivery street and house number
	pub delivery_street: Option<String>,
	/// Delivery postal code
	pub delivery_zip: Option<String>,
	/// Delivery city
	pub delivery_city: Option<String>,
	/// Delivery country
	pub delivery_country: Option<String>,
	/// Provider-specific data stored after authorization
	#[serde(default)]
	pub payment_provider: Vec<PaymentProviderBrick>,
}

impl OnlineShopOrder {
	/// Creates an empty order with the given identifier.
	pub fn new(id: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			..Default::default()
		}
	}

	/// Whether an alternative delivery address was entered.
	pub fn has_delivery_address(&self) -> bool {
		self.delivery_lastname
			.as_deref()
			.is_some_and(|name| !name.is_empty())
	}

	/// Looks up the provider data stored under `name`.
	pub fn payment_provider_brick(&self, name: &str) -> Option<&PaymentProviderBrick> {
		self.payment_provider.iter().find(|brick| brick.name == name)
	}
}

/// Provider-specific data attached to an order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentProviderBrick {
	/// Brick name, one per provider
	pub name: String,
	/// Stored values
	#[serde(default)]
	pub fields: BTreeMap<String, String>,
}

impl PaymentProviderBrick {
	/// Creates an empty brick.
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			fields: BTreeMap::new(),
		}
	}

	/// Adds a field, builder style.
	pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.fields.insert(key.into(), value.into());
		self
	}

	/// Returns a stored value, treating empty strings as absent.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.fields
			.get(key)
			.map(String::as_str)
			.filter(|value| !value.is_empty())
	}
}

/// Pending payment record tracked by the order manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
	/// Payment id assigned by the shop
	pub internal_payment_id: String,
	/// Reference assigned by the gateway, once known
	pub payment_reference: Option<String>,
}

impl PaymentInfo {
	/// Creates a payment info without gateway reference.
	pub fn new(internal_payment_id: impl Into<String>) -> Self {
		Self {
			internal_payment_id: internal_payment_id.into(),
			payment_reference: None,
		}
	}

	/// Non-empty gateway reference.
	pub fn payment_reference(&self) -> Option<&str> {
		self.payment_reference
			.as_deref()
			.filter(|reference| !reference.is_empty())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(None, false)]
	#[case(Some(""), false)]
	#[case(Some("Doe"), true)]
	fn test_has_delivery_address(#[case] lastname: Option<&str>, #[case] expected: bool) {
		let mut order = OnlineShopOrder::new("order-1");
		order.delivery_lastname = lastname.map(str::to_string);
		assert_eq!(order.has_delivery_address(), expected);
	}

	#[rstest]
	fn test_brick_lookup_ignores_empty_values() {
		let mut order = OnlineShopOrder::new("order-1");
		order.payment_provider.push(
			PaymentProviderBrick::new("unzer")
				.with_field("auth_chargeId", "")
				.with_field("auth_paymentReference", "s-pay-1"),
		);

		let brick = order.payment_provider_brick("unzer").unwrap();
		assert_eq!(brick.get("auth_paymentReference"), Some("s-pay-1"));
		assert_eq!(brick.get("auth_chargeId"), None);
		assert!(order.payment_provider_brick("other").is_none());
	}

	#[rstest]
	fn test_payment_info_empty_reference() {
		let mut info = PaymentInfo::new("payment~1");
		assert_eq!(info.payment_reference(), None);
		info.payment_reference = Some(String::new());
		assert_eq!(info.payment_reference(), None);
		info.payment_reference = Some("s-pay-9".to_string());
		assert_eq!(info.payment_reference(), Some("s-pay-9"));
	}
}
