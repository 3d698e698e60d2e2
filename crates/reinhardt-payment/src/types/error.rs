//! Error types for payment operations.

use thiserror::Error;

/// Result type for payment operations.
pub type PaymentResult<T> = Result<T, PaymentError>;

/// Payment operation errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PaymentError {
	/// Missing or malformed caller input
	#[error("Invalid argument: {0}")]
	InvalidArgument(String),

	/// Operation not supported by the provider
	#[error("Unsupported operation: {0}")]
	Unsupported(String),

	/// Provider-specific failure
	#[error("Payment provider '{provider}' error: {source}")]
	Provider {
		/// Provider name
		provider: String,
		/// Underlying provider error
		#[source]
		source: Box<dyn std::error::Error + Send + Sync>,
	},

	/// Order management failure (agent lookup, payment persistence)
	#[error("Order management error: {0}")]
	OrderManagement(String),

	/// Provider name already taken in a registry
	#[error("Payment provider already registered: {0}")]
	AlreadyRegistered(String),

	/// No provider registered under the requested name
	#[error("Unknown payment provider: {0}")]
	UnknownProvider(String),
}

impl PaymentError {
	/// Wraps a provider-specific error.
	pub fn provider<E>(provider: impl Into<String>, source: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self::Provider {
			provider: provider.into(),
			source: Box::new(source),
		}
	}

	/// Returns the provider-specific error, if this is one of type `E`.
	pub fn provider_source<E>(&self) -> Option<&E>
	where
		E: std::error::Error + 'static,
	{
		match self {
			Self::Provider { source, .. } => source.downcast_ref::<E>(),
			_ => None,
		}
	}
}
