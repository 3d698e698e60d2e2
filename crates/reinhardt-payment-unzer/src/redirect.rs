//! Redirect URL helpers.

use crate::resources::Charge;
use url::form_urlencoded;

/// Rewrites a shop payment id into a gateway-safe order id.
///
/// The gateway rejects `~`, which the shop uses as separator.
pub fn transform_internal_payment_id(internal_payment_id: &str) -> String {
	internal_payment_id.replace('~', "---")
}

/// Appends the diagnostic messages to the shop's error URL.
pub fn error_url(error_url: &str, merchant_message: &str, client_message: &str) -> String {
	let query = form_urlencoded::Serializer::new(String::new())
		.append_pair("merchantMessage", merchant_message)
		.append_pair("clientMessage", client_message)
		.finish();

	let separator = if !error_url.contains('?') {
		"?"
	} else if error_url.ends_with('?') || error_url.ends_with('&') {
		""
	} else {
		"&"
	};

	format!("{}{}{}", error_url, separator, query)
}

/// Picks where to send the customer after a charge was submitted.
pub fn charge_redirect_url(charge: &Charge, return_url: &str) -> String {
	match charge.redirect_url() {
		None if charge.is_success => return_url.to_string(),
		Some(url) if charge.is_success => url.to_string(),
		Some(url) if charge.is_pending => url.to_string(),
		_ => return_url.to_string(),
	}
}
