//! Adapter configuration.

use reinhardt_payment::{PaymentError, PaymentResult, ProviderOptions};
use serde::Deserialize;
use std::fmt;
use url::Url;

/// Production API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.unzer.com/v1/";

/// Unzer adapter options.
///
/// Both access keys are required; a constructed value is always valid.
///
/// ```toml
/// privateAccessKey = "s-priv-2a10..."
/// publicAccessKey = "s-pub-2a10..."
/// locale = "de-DE"
/// ```
#[derive(Clone, Deserialize)]
#[serde(try_from = "RawUnzerOptions")]
pub struct UnzerOptions {
	private_access_key: String,
	public_access_key: String,
	locale: Option<String>,
	api_url: Url,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawUnzerOptions {
	#[serde(default)]
	private_access_key: String,
	#[serde(default)]
	public_access_key: String,
	#[serde(default)]
	locale: Option<String>,
	#[serde(default)]
	api_url: Option<String>,
}

impl TryFrom<RawUnzerOptions> for UnzerOptions {
	type Error = PaymentError;

	fn try_from(raw: RawUnzerOptions) -> PaymentResult<Self> {
		let mut options = Self::new(raw.private_access_key, raw.public_access_key)?;
		if let Some(locale) = raw.locale.filter(|locale| !locale.is_empty()) {
			options = options.with_locale(locale);
		}
		if let Some(api_url) = raw.api_url.filter(|url| !url.is_empty()) {
			options = options.with_api_url(parse_api_url(&api_url)?);
		}
		Ok(options)
	}
}

impl TryFrom<&ProviderOptions> for UnzerOptions {
	type Error = PaymentError;

	fn try_from(options: &ProviderOptions) -> PaymentResult<Self> {
		let field = |key: &str| options.get(key).map(str::to_string);
		RawUnzerOptions {
			private_access_key: field("privateAccessKey").unwrap_or_default(),
			public_access_key: field("publicAccessKey").unwrap_or_default(),
			locale: field("locale"),
			api_url: field("apiUrl"),
		}
		.try_into()
	}
}

impl UnzerOptions {
	/// Creates options for the production endpoint.
	pub fn new(
		private_access_key: impl Into<String>,
		public_access_key: impl Into<String>,
	) -> PaymentResult<Self> {
		let private_access_key = private_access_key.into();
		if private_access_key.is_empty() {
			return Err(PaymentError::InvalidArgument(
				"no private access key given".to_string(),
			));
		}

		let public_access_key = public_access_key.into();
		if public_access_key.is_empty() {
			return Err(PaymentError::InvalidArgument(
				"no public access key given".to_string(),
			));
		}

		Ok(Self {
			private_access_key,
			public_access_key,
			locale: None,
			api_url: parse_api_url(DEFAULT_API_URL)?,
		})
	}

	/// Sets the locale passed to the gateway for customer-facing messages.
	pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
		self.locale = Some(locale.into());
		self
	}

	/// Points the client at another endpoint (sandbox, proxy, test server).
	pub fn with_api_url(mut self, api_url: Url) -> Self {
		self.api_url = api_url;
		self
	}

	/// Key used to authenticate server-side calls.
	pub fn private_access_key(&self) -> &str {
		&self.private_access_key
	}

	/// Key handed to the browser-side payment form.
	pub fn public_access_key(&self) -> &str {
		&self.public_access_key
	}

	/// Gateway locale.
	pub fn locale(&self) -> Option<&str> {
		self.locale.as_deref()
	}

	/// API base URL, always ending with a slash.
	pub fn api_url(&self) -> &Url {
		&self.api_url
	}
}

impl fmt::Debug for UnzerOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UnzerOptions")
			.field("private_access_key", &"[redacted]")
			.field("public_access_key", &self.public_access_key)
			.field("locale", &self.locale)
			.field("api_url", &self.api_url.as_str())
			.finish()
	}
}

fn parse_api_url(raw: &str) -> PaymentResult<Url> {
	let normalized = if raw.ends_with('/') {
		raw.to_string()
	} else {
		format!("{}/", raw)
	};
	Url::parse(&normalized)
		.map_err(|e| PaymentError::InvalidArgument(format!("invalid apiUrl '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("", "s-pub-1", "no private access key given")]
	#[case("s-priv-1", "", "no public access key given")]
	fn test_missing_keys_rejected(
		#[case] private_key: &str,
		#[case] public_key: &str,
		#[case] expected: &str,
	) {
		let err = UnzerOptions::new(private_key, public_key).unwrap_err();
		assert!(matches!(err, PaymentError::InvalidArgument(ref msg) if msg == expected));
	}

	#[rstest]
	fn test_from_provider_options() {
		let provider_options = ProviderOptions::new()
			.with("privateAccessKey", "s-priv-1")
			.with("publicAccessKey", "s-pub-1")
			.with("locale", "de-DE")
			.with("apiUrl", "https://sandbox.test/v1");

		let options = UnzerOptions::try_from(&provider_options).unwrap();
		assert_eq!(options.private_access_key(), "s-priv-1");
		assert_eq!(options.public_access_key(), "s-pub-1");
		assert_eq!(options.locale(), Some("de-DE"));
		assert_eq!(options.api_url().as_str(), "https://sandbox.test/v1/");
	}

	#[rstest]
	fn test_from_provider_options_missing_public_key() {
		let provider_options = ProviderOptions::new().with("privateAccessKey", "s-priv-1");
		assert!(UnzerOptions::try_from(&provider_options).is_err());
	}

	#[rstest]
	fn test_deserialize_from_toml() {
		let options: UnzerOptions = toml::from_str(
			r#"
			privateAccessKey = "s-priv-1"
			publicAccessKey = "s-pub-1"
			"#,
		)
		.unwrap();
		assert_eq!(options.api_url().as_str(), DEFAULT_API_URL);
		assert_eq!(options.locale(), None);
	}

	#[rstest]
	fn test_deserialize_rejects_missing_keys() {
		let result: Result<UnzerOptions, _> = toml::from_str(r#"publicAccessKey = "s-pub-1""#);
		assert!(result.is_err());
	}

	#[rstest]
	fn test_debug_redacts_private_key() {
		let options = UnzerOptions::new("s-priv-secret", "s-pub-1").unwrap();
		let debug = format!("{:?}", options);
		assert!(!debug.contains("s-priv-secret"));
		assert!(debug.contains("s-pub-1"));
	}
}
