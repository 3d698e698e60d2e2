//! Snapshot of the last handled payment outcome.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Provider data captured while handling a payment response.
///
/// The host reads it right after `handle_response` returns, typically to
/// store it on the order's provider brick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthorizedData(BTreeMap<String, String>);

impl AuthorizedData {
	/// Creates an empty snapshot.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a value.
	pub fn get(&self, key: &str) -> Option<&str> {
		self.0.get(key).map(String::as_str)
	}

	/// Sets a value.
	pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.0.insert(key.into(), value.into());
	}

	/// Whether a key is present.
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Whether nothing was captured.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterates over all entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}
}

impl<K, V> FromIterator<(K, V)> for AuthorizedData
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
