//! # Reinhardt Payments
//!
//! Payment providers for Reinhardt e-commerce applications.
//!
//! The provider contract lives in `reinhardt-payment` and is re-exported at
//! the crate root. Provider implementations are enabled through feature
//! flags and re-exported as modules.
//!
//! ## Feature Flags
//!
//! - `unzer` (default) - Unzer provider, also registered as `Heidelpay`
//!
//! ## Quick Example
//!
//! ```rust,ignore
//! use reinhardt_payments::{ProviderOptions, ProviderRegistry, register_providers};
//!
//! let registry = ProviderRegistry::new();
//! register_providers(&registry, order_manager)?;
//!
//! let provider = registry.create("unzer", &ProviderOptions::new()
//!     .with("privateAccessKey", "s-priv-xxx")
//!     .with("publicAccessKey", "s-pub-xxx"))?;
//! ```

pub use reinhardt_payment::*;

/// Unzer (formerly Heidelpay) provider.
#[cfg(feature = "unzer")]
pub mod unzer {
	pub use reinhardt_payment_unzer::*;
}

use std::sync::Arc;

/// Registers every provider enabled through feature flags.
#[cfg_attr(not(feature = "unzer"), allow(unused_variables))]
pub fn register_providers(
	registry: &ProviderRegistry,
	order_manager: Arc<dyn OrderManager>,
) -> PaymentResult<()> {
	#[cfg(feature = "unzer")]
	reinhardt_payment_unzer::register(registry, Arc::clone(&order_manager))?;

	Ok(())
}
