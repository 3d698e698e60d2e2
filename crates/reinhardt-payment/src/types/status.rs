//! Payment status reported back to the order manager.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Message carried by a status when no pending payment exists.
pub const STATUS_NOT_FOUND_MESSAGE: &str = "not found";

/// Payment state known to the order manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusState {
	/// Waiting for the customer or the gateway
	#[serde(rename = "paymentPending")]
	Pending,
	/// Funds authorized or captured
	#[serde(rename = "paymentAuthorized")]
	Authorized,
	/// Cancelled or failed
	#[serde(rename = "cancelled")]
	Cancelled,
}

impl StatusState {
	/// Stored representation of the state.
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Pending => "paymentPending",
			Self::Authorized => "paymentAuthorized",
			Self::Cancelled => "cancelled",
		}
	}
}

impl fmt::Display for StatusState {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Outcome of a payment operation.
///
/// A status is built once per provider call and not modified afterwards;
/// persisting it is the order agent's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
	internal_payment_id: String,
	external_payment_id: String,
	message: String,
	state: Option<StatusState>,
	data: BTreeMap<String, String>,
}

impl Status {
	/// Creates a status.
	pub fn new(
		internal_payment_id: impl Into<String>,
		external_payment_id: impl Into<String>,
		message: impl Into<String>,
		state: StatusState,
		data: BTreeMap<String, String>,
	) -> Self {
		Self {
			internal_payment_id: internal_payment_id.into(),
			external_payment_id: external_payment_id.into(),
			message: message.into(),
			state: Some(state),
			data,
		}
	}

	/// Status for an order without pending payment.
	pub fn not_found() -> Self {
		Self {
			internal_payment_id: String::new(),
			external_payment_id: String::new(),
			message: STATUS_NOT_FOUND_MESSAGE.to_string(),
			state: None,
			data: BTreeMap::new(),
		}
	}

	/// Payment id assigned by the shop.
	pub fn internal_payment_id(&self) -> &str {
		&self.internal_payment_id
	}

	/// Payment id assigned by the gateway.
	pub fn external_payment_id(&self) -> &str {
		&self.external_payment_id
	}

	/// Human readable message.
	pub fn message(&self) -> &str {
		&self.message
	}

	/// State, `None` when the payment was not found.
	pub fn state(&self) -> Option<StatusState> {
		self.state
	}

	/// Whether this is the not-found outcome.
	pub fn is_not_found(&self) -> bool {
		self.state.is_none() && self.message == STATUS_NOT_FOUND_MESSAGE
	}

	/// Provider metadata.
	pub fn data(&self) -> &BTreeMap<String, String> {
		&self.data
	}

	/// Single metadata value.
	pub fn data_value(&self, key: &str) -> Option<&str> {
		self.data.get(key).map(String::as_str)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_not_found_status() {
		let status = Status::not_found();
		assert!(status.is_not_found());
		assert_eq!(status.internal_payment_id(), "");
		assert_eq!(status.external_payment_id(), "");
		assert_eq!(status.message(), "not found");
		assert!(status.data().is_empty());
	}

	#[rstest]
	fn test_status_serializes_state_constant() {
		let status = Status::new(
			"payment~1",
			"s-pay-1",
			"",
			StatusState::Authorized,
			BTreeMap::from([("unzer_responseStatus".to_string(), "completed".to_string())]),
		);

		let json = serde_json::to_value(&status).unwrap();
		assert_eq!(json["state"], "paymentAuthorized");
		assert_eq!(status.data_value("unzer_responseStatus"), Some("completed"));
		assert!(!status.is_not_found());
	}
}
