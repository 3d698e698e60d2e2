//! Customer resource.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Postal address embedded in a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
	/// Full name of the recipient
	pub name: String,
	/// Street and house number
	pub street: String,
	/// Postal code
	pub zip: String,
	/// City
	pub city: String,
	/// ISO 3166-1 alpha-2 country code
	pub country: String,
}

/// Customer sent along with a charge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
	/// First name
	pub firstname: String,
	/// Last name
	pub lastname: String,
	/// Email address
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub email: String,
	/// Birth date as `YYYY-MM-DD`
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub birth_date: Option<String>,
	/// Billing address
	pub billing_address: Address,
	/// Shipping address
	pub shipping_address: Address,
}

impl Customer {
	/// Creates a customer with empty contact data.
	pub fn new(firstname: impl Into<String>, lastname: impl Into<String>) -> Self {
		Self {
			firstname: firstname.into(),
			lastname: lastname.into(),
			..Default::default()
		}
	}

	/// Sets the email address.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = email.into();
		self
	}

	/// Sets the billing address.
	pub fn with_billing_address(mut self, address: Address) -> Self {
		self.billing_address = address;
		self
	}

	/// Sets the shipping address.
	pub fn with_shipping_address(mut self, address: Address) -> Self {
		self.shipping_address = address;
		self
	}

	/// Sets the birth date, required by invoice payment methods.
	pub fn with_birth_date(mut self, birth_date: NaiveDate) -> Self {
		self.birth_date = Some(birth_date.format("%Y-%m-%d").to_string());
		self
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_customer_serialization() {
		let customer = Customer::new("Jane", "Doe")
			.with_email("jane@example.com")
			.with_birth_date(NaiveDate::from_ymd_opt(1990, 3, 7).unwrap());

		let json = serde_json::to_value(&customer).unwrap();
		assert_eq!(json["firstname"], "Jane");
		assert_eq!(json["birthDate"], "1990-03-07");
		assert!(json["billingAddress"].is_object());
	}

	#[rstest]
	fn test_birth_date_omitted_when_absent() {
		let json = serde_json::to_value(Customer::new("Jane", "Doe")).unwrap();
		assert!(json.get("birthDate").is_none());
		assert!(json.get("email").is_none());
	}
}
