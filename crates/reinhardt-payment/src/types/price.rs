//! Price and currency value objects.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217 currency.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Currency {
	short_name: String,
}

impl Currency {
	/// Creates a currency from its short name (e.g. `EUR`).
	pub fn new(short_name: impl Into<String>) -> Self {
		Self {
			short_name: short_name.into(),
		}
	}

	/// Three-letter currency code.
	pub fn short_name(&self) -> &str {
		&self.short_name
	}
}

impl fmt::Display for Currency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.short_name)
	}
}

/// Gross price of an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
	amount: Decimal,
	currency: Currency,
}

impl Price {
	/// Creates a price.
	pub fn new(amount: Decimal, currency: Currency) -> Self {
		Self { amount, currency }
	}

	/// Exact amount.
	pub fn amount(&self) -> Decimal {
		self.amount
	}

	/// Amount rounded half away from zero to `scale` decimal places.
	pub fn rounded_amount(&self, scale: u32) -> Decimal {
		self.amount
			.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero)
	}

	/// Currency of the amount.
	pub fn currency(&self) -> &Currency {
		&self.currency
	}
}
