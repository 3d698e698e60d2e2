//! Unzer gateway errors.

use crate::PROVIDER_NAME;
use reinhardt_payment::PaymentError;
use thiserror::Error;

/// Result type for gateway operations.
pub type UnzerResult<T> = Result<T, UnzerError>;

/// Errors raised while talking to the Unzer gateway.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum UnzerError {
	/// The API rejected the request
	#[error("Unzer API error {code}: {merchant_message}")]
	Api {
		/// Unzer error code (e.g. `API.320.000.004`)
		code: String,
		/// Message meant for the merchant
		merchant_message: String,
		/// Message that may be shown to the customer
		client_message: String,
	},

	/// Network error
	#[error("Network error: {0}")]
	NetworkError(#[from] reqwest::Error),

	/// Serialization error
	#[error("Serialization error: {0}")]
	SerializationError(#[from] serde_json::Error),

	/// Invalid endpoint URL
	#[error("Invalid URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	/// Response could not be interpreted
	#[error("Unexpected gateway response: {0}")]
	UnexpectedResponse(String),

	/// Pending payment info carries no gateway reference
	#[error("Pending payment has no payment reference")]
	MissingPaymentReference,

	/// Operation not offered by this provider
	#[error("{0} is not implemented yet")]
	NotImplemented(&'static str),
}

impl UnzerError {
	/// Creates an API error.
	pub fn api(
		code: impl Into<String>,
		merchant_message: impl Into<String>,
		client_message: impl Into<String>,
	) -> Self {
		Self::Api {
			code: code.into(),
			merchant_message: merchant_message.into(),
			client_message: client_message.into(),
		}
	}

	/// Message meant for the merchant; the full error text for non-API errors.
	pub fn merchant_message(&self) -> String {
		match self {
			Self::Api {
				merchant_message, ..
			} => merchant_message.clone(),
			other => other.to_string(),
		}
	}

	/// Message meant for the customer; empty for non-API errors.
	pub fn client_message(&self) -> &str {
		match self {
			Self::Api { client_message, .. } => client_message,
			_ => "",
		}
	}
}

impl From<UnzerError> for PaymentError {
	fn from(err: UnzerError) -> Self {
		PaymentError::provider(PROVIDER_NAME, err)
	}
}

/// Splits any payment error into (merchant, client) diagnostic messages.
///
/// Gateway API errors carry both; everything else only has its own text.
pub(crate) fn diagnostic_messages(err: &PaymentError) -> (String, String) {
	match err.provider_source::<UnzerError>() {
		Some(unzer) => (unzer.merchant_message(), unzer.client_message().to_string()),
		None => (err.to_string(), String::new()),
	}
}
