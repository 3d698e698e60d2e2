//! Payment provider contract for Reinhardt e-commerce applications.
//!
//! The order manager drives checkout through [`PaymentProvider`]
//! implementations: it starts a payment with an [`OrderAgent`], sends the
//! customer to the returned redirect, and hands the returning request back
//! to [`PaymentProvider::handle_response`], which yields a [`Status`].
//!
//! Providers are looked up by name in a [`ProviderRegistry`]; aliases keep
//! renamed providers reachable under their former names.
//!
//! ```ignore
//! use reinhardt_payment::{ProviderOptions, ProviderRegistry};
//!
//! let registry = ProviderRegistry::new();
//! // provider crates register their factories here
//! let provider = registry.create("unzer", &ProviderOptions::new()
//!     .with("privateAccessKey", "s-priv-xxx")
//!     .with("publicAccessKey", "s-pub-xxx"))?;
//! ```

#![warn(missing_docs)]

pub mod agent;
pub mod provider;
pub mod registry;
pub mod types;

pub use agent::{OrderAgent, OrderManager};
pub use provider::PaymentProvider;
pub use registry::{ProviderFactory, ProviderOptions, ProviderRegistry};
pub use types::{
	AuthorizedData, Currency, OnlineShopOrder, PaymentError, PaymentInfo, PaymentProviderBrick,
	PaymentResult, Price, ResponseBag, STATUS_NOT_FOUND_MESSAGE, StartPaymentRequest,
	StartPaymentResponse, Status, StatusState, UrlResponse,
};
