//! Unzer (formerly Heidelpay) payment provider for Reinhardt.
//!
//! The customer selects a payment method in the browser-side Unzer form,
//! which yields a payment type id. [`UnzerPayment::start_payment`] charges
//! that type and returns the URL the customer is sent to next, either the
//! gateway's redirect page (3-D Secure, PayPal, ...) or the shop's return
//! URL. When the customer comes back, [`UnzerPayment::handle_response`]
//! asks the gateway for the payment state and maps it to a [`Status`].
//!
//! Failures never surface as errors from `start_payment` once the request
//! is valid: the customer is sent to the shop's error URL carrying
//! `merchantMessage` and `clientMessage` query parameters instead.
//!
//! ```ignore
//! use reinhardt_payment::{ProviderOptions, ProviderRegistry};
//!
//! let registry = ProviderRegistry::new();
//! reinhardt_payment_unzer::register(&registry, order_manager)?;
//!
//! // "Heidelpay" resolves to the same provider
//! let provider = registry.create("Heidelpay", &ProviderOptions::new()
//!     .with("privateAccessKey", "s-priv-xxx")
//!     .with("publicAccessKey", "s-pub-xxx"))?;
//! ```
//!
//! [`Status`]: reinhardt_payment::Status

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod gateway;
pub mod options;
pub mod provider;
pub mod redirect;
pub mod request;
pub mod resources;

pub use client::UnzerClient;
pub use error::{UnzerError, UnzerResult};
pub use gateway::UnzerGateway;
pub use options::{DEFAULT_API_URL, UnzerOptions};
pub use provider::{Heidelpay, PROVIDER_BRICK, UnzerPayment};
pub use request::{HeidelpayRequest, UnzerRequest};

use reinhardt_payment::{
	OrderManager, PaymentProvider, PaymentResult, ProviderFactory, ProviderRegistry,
};
use std::sync::Arc;

/// Name the provider reports and is registered under.
pub const PROVIDER_NAME: &str = "Unzer";

/// Name the provider had before the Heidelpay rebrand.
pub const LEGACY_PROVIDER_NAME: &str = "Heidelpay";

/// Registers the Unzer provider, reachable under its legacy name too.
///
/// Each created provider shares `order_manager`.
pub fn register(
	registry: &ProviderRegistry,
	order_manager: Arc<dyn OrderManager>,
) -> PaymentResult<()> {
	let factory: ProviderFactory = Arc::new(move |options| {
		let options = UnzerOptions::try_from(options)?;
		let provider = UnzerPayment::new(options, Arc::clone(&order_manager))?;
		Ok(Box::new(provider) as Box<dyn PaymentProvider>)
	});

	registry.register(PROVIDER_NAME, factory)?;
	registry.alias(LEGACY_PROVIDER_NAME, PROVIDER_NAME)
}
