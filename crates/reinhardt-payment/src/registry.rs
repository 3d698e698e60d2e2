//! Name-based provider lookup.
//!
//! Providers register a factory under a name; renamed providers keep their
//! old name reachable through an alias pointing at the new registration.

use crate::provider::PaymentProvider;
use crate::types::{PaymentError, PaymentResult};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Provider configuration section, as plain key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderOptions(BTreeMap<String, String>);

impl ProviderOptions {
	/// Creates empty options.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds an option, builder style.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.0.insert(key.into(), value.into());
		self
	}

	/// Returns an option value.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}
}

impl<K, V> FromIterator<(K, V)> for ProviderOptions
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(
			iter.into_iter()
				.map(|(k, v)| (k.into(), v.into()))
				.collect(),
		)
	}
}

/// Builds a provider from its configuration.
pub type ProviderFactory =
	Arc<dyn Fn(&ProviderOptions) -> PaymentResult<Box<dyn PaymentProvider>> + Send + Sync>;

/// Registry of payment providers.
///
/// Names are matched case-insensitively.
#[derive(Default)]
pub struct ProviderRegistry {
	factories: RwLock<HashMap<String, ProviderFactory>>,
	aliases: RwLock<HashMap<String, String>>,
}

impl ProviderRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a factory under `name`.
	pub fn register(&self, name: &str, factory: ProviderFactory) -> PaymentResult<()> {
		let key = normalize(name);
		if self.aliases.read().contains_key(&key) {
			return Err(PaymentError::AlreadyRegistered(name.to_string()));
		}

		let mut factories = self.factories.write();
		if factories.contains_key(&key) {
			return Err(PaymentError::AlreadyRegistered(name.to_string()));
		}
		factories.insert(key, factory);
		tracing::debug!(provider = name, "Payment provider registered");
		Ok(())
	}

	/// Makes `alias` resolve to the provider registered as `target`.
	pub fn alias(&self, alias: &str, target: &str) -> PaymentResult<()> {
		let alias_key = normalize(alias);
		let target_key = normalize(target);

		let factories = self.factories.read();
		if !factories.contains_key(&target_key) {
			return Err(PaymentError::UnknownProvider(target.to_string()));
		}
		if factories.contains_key(&alias_key) {
			return Err(PaymentError::AlreadyRegistered(alias.to_string()));
		}

		let mut aliases = self.aliases.write();
		if aliases.contains_key(&alias_key) {
			return Err(PaymentError::AlreadyRegistered(alias.to_string()));
		}
		aliases.insert(alias_key, target_key);
		Ok(())
	}

	/// Canonical registration name for `name`, following aliases.
	pub fn resolve_name(&self, name: &str) -> Option<String> {
		let key = normalize(name);
		let key = self.aliases.read().get(&key).cloned().unwrap_or(key);
		self.factories.read().contains_key(&key).then_some(key)
	}

	/// Whether `name` (or an alias) is known.
	pub fn is_registered(&self, name: &str) -> bool {
		self.resolve_name(name).is_some()
	}

	/// Builds the provider registered as `name`.
	pub fn create(
		&self,
		name: &str,
		options: &ProviderOptions,
	) -> PaymentResult<Box<dyn PaymentProvider>> {
		let key = self
			.resolve_name(name)
			.ok_or_else(|| PaymentError::UnknownProvider(name.to_string()))?;
		let factory = self
			.factories
			.read()
			.get(&key)
			.cloned()
			.ok_or_else(|| PaymentError::UnknownProvider(name.to_string()))?;
		factory(options)
	}

	/// Builds the provider registered as `name` as its concrete type.
	///
	/// Fails with [`PaymentError::Unsupported`] when the registered provider
	/// is not a `T`.
	pub fn create_as<T: Any>(
		&self,
		name: &str,
		options: &ProviderOptions,
	) -> PaymentResult<Box<T>> {
		self.create(name, options)?
			.into_any()
			.downcast::<T>()
			.map_err(|_| {
				PaymentError::Unsupported(format!(
					"provider '{}' is not a {}",
					name,
					std::any::type_name::<T>()
				))
			})
	}

	/// Number of registered providers, aliases excluded.
	pub fn len(&self) -> usize {
		self.factories.read().len()
	}

	/// Whether no provider is registered.
	pub fn is_empty(&self) -> bool {
		self.factories.read().is_empty()
	}
}

fn normalize(name: &str) -> String {
	name.trim().to_ascii_lowercase()
}
