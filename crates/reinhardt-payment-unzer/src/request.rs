//! Start-payment request accepted by the Unzer adapter.

use reinhardt_payment::{PaymentResult, StartPaymentRequest};
use serde::{Deserialize, Serialize};

const PAYMENT_REFERENCE: &str = "paymentReference";
const INTERNAL_PAYMENT_ID: &str = "internalPaymentId";
const RETURN_URL: &str = "returnUrl";
const ERROR_URL: &str = "errorUrl";

/// Parameters for starting an Unzer payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnzerRequest {
	/// Payment type resource id created by the browser-side form (`s-crd-…`)
	pub payment_reference: String,
	/// Shop-side payment id, sent to the gateway as order id
	pub internal_payment_id: String,
	/// Where the customer lands after paying
	pub return_url: String,
	/// Where the customer lands when starting the payment failed
	pub error_url: String,
}

/// Former name of [`UnzerRequest`].
pub type HeidelpayRequest = UnzerRequest;

impl UnzerRequest {
	/// Creates a request.
	pub fn new(
		payment_reference: impl Into<String>,
		internal_payment_id: impl Into<String>,
		return_url: impl Into<String>,
		error_url: impl Into<String>,
	) -> Self {
		Self {
			payment_reference: payment_reference.into(),
			internal_payment_id: internal_payment_id.into(),
			return_url: return_url.into(),
			error_url: error_url.into(),
		}
	}
}

impl TryFrom<&StartPaymentRequest> for UnzerRequest {
	type Error = reinhardt_payment::PaymentError;

	/// Reads the request attributes; every one of them must be non-empty.
	fn try_from(request: &StartPaymentRequest) -> PaymentResult<Self> {
		Ok(Self {
			payment_reference: request
				.require(PAYMENT_REFERENCE, "no paymentReference sent")?
				.to_string(),
			internal_payment_id: request
				.require(INTERNAL_PAYMENT_ID, "no internalPaymentId sent")?
				.to_string(),
			return_url: request.require(RETURN_URL, "no return sent")?.to_string(),
			error_url: request.require(ERROR_URL, "no errorUrl sent")?.to_string(),
		})
	}
}

impl From<UnzerRequest> for StartPaymentRequest {
	fn from(request: UnzerRequest) -> Self {
		StartPaymentRequest::new()
			.with(PAYMENT_REFERENCE, request.payment_reference)
			.with(INTERNAL_PAYMENT_ID, request.internal_payment_id)
			.with(RETURN_URL, request.return_url)
			.with(ERROR_URL, request.error_url)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use reinhardt_payment::PaymentError;
	use rstest::rstest;

	fn complete() -> UnzerRequest {
		UnzerRequest::new(
			"s-crd-1",
			"payment~42",
			"https://shop.test/return",
			"https://shop.test/error",
		)
	}

	#[rstest]
	fn test_round_trip_through_attribute_bag() {
		let bag = StartPaymentRequest::from(complete());
		assert_eq!(UnzerRequest::try_from(&bag).unwrap(), complete());
	}

	#[rstest]
	#[case(PAYMENT_REFERENCE, "no paymentReference sent")]
	#[case(INTERNAL_PAYMENT_ID, "no internalPaymentId sent")]
	#[case(RETURN_URL, "no return sent")]
	#[case(ERROR_URL, "no errorUrl sent")]
	fn test_empty_attribute_rejected(#[case] key: &str, #[case] message: &str) {
		let mut bag = StartPaymentRequest::from(complete());
		bag.set(key, "");

		let err = UnzerRequest::try_from(&bag).unwrap_err();
		assert!(matches!(err, PaymentError::InvalidArgument(ref msg) if msg == message));
	}

	#[rstest]
	fn test_missing_attributes_rejected() {
		let bag = StartPaymentRequest::new().with(PAYMENT_REFERENCE, "s-crd-1");
		assert!(UnzerRequest::try_from(&bag).is_err());
	}
}
