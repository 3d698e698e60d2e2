//! Unzer REST API client
//!
//! Authenticates with the private key (HTTP basic auth, empty password) and
//! forwards the configured locale as `Accept-Language`, which makes the
//! gateway localize customer-facing messages.
//!
//! # Examples
//!
//! ```no_run
//! use reinhardt_payment_unzer::{UnzerClient, UnzerGateway, UnzerOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let options = UnzerOptions::new("s-priv-xxx", "s-pub-xxx")?.with_locale("de-DE");
//! let client = UnzerClient::new(&options)?;
//! let payment = client.fetch_payment("s-pay-1").await?;
//! println!("{}", payment.state_name());
//! # Ok(())
//! # }
//! ```

use crate::error::{UnzerError, UnzerResult};
use crate::gateway::UnzerGateway;
use crate::options::UnzerOptions;
use crate::resources::{
	Cancellation, Charge, ChargeRequest, Customer, Payment, PaymentAmount, PaymentState,
	PaymentType,
};
use async_trait::async_trait;
use reqwest::header::ACCEPT_LANGUAGE;
use reqwest::{Client, RequestBuilder, StatusCode};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const CHARGE_TRANSACTION: &str = "charge";
const CANCEL_CHARGE_TRANSACTION: &str = "cancel-charge";

/// HTTP implementation of [`UnzerGateway`].
pub struct UnzerClient {
	client: Client,
	api_url: Url,
	private_access_key: String,
	locale: Option<String>,
}

impl UnzerClient {
	/// Creates a client with a 30 second request timeout.
	pub fn new(options: &UnzerOptions) -> UnzerResult<Self> {
		let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
		Ok(Self::with_client(options, client))
	}

	/// Creates a client reusing an existing HTTP client.
	pub fn with_client(options: &UnzerOptions, client: Client) -> Self {
		Self {
			client,
			api_url: options.api_url().clone(),
			private_access_key: options.private_access_key().to_string(),
			locale: options.locale().map(str::to_string),
		}
	}

	fn endpoint(&self, path: &str) -> UnzerResult<Url> {
		Ok(self.api_url.join(path)?)
	}

	fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
		let builder = builder.basic_auth(&self.private_access_key, Some(""));
		match &self.locale {
			Some(locale) => builder.header(ACCEPT_LANGUAGE, locale),
			None => builder,
		}
	}

	async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> UnzerResult<T> {
		let response = self.authorize(builder).send().await?;
		let status = response.status();
		let body = response.text().await?;

		decode(status, &body)
	}

	async fn create_customer(&self, customer: &Customer) -> UnzerResult<String> {
		let url = self.endpoint("customers")?;
		let created: IdResponse = self.send(self.client.post(url).json(customer)).await?;
		Ok(created.id)
	}

	async fn fetch_payment_summary(&self, payment_id: &str) -> UnzerResult<PaymentResponse> {
		let url = self.endpoint(&format!("payments/{}", payment_id))?;
		self.send(self.client.get(url)).await
	}

	async fn fetch_charge_resource(
		&self,
		summary: &PaymentResponse,
		charge_id: &str,
	) -> UnzerResult<Charge> {
		let url = self.endpoint(&format!("payments/{}/charges/{}", summary.id, charge_id))?;
		let mut charge: Charge = self.send(self.client.get(url)).await?;
		charge.cancellations = summary.cancellations_of(charge_id);
		Ok(charge)
	}
}

#[async_trait]
impl UnzerGateway for UnzerClient {
	async fn perform_charge(
		&self,
		charge: &ChargeRequest,
		payment_type_id: &str,
		customer: &Customer,
	) -> UnzerResult<Charge> {
		let customer_id = self.create_customer(customer).await?;

		let body = ChargeBody {
			charge,
			resources: ChargeResources {
				customer_id: &customer_id,
				type_id: payment_type_id,
			},
		};
		tracing::debug!(order_id = ?charge.order_id, "Submitting charge");

		let url = self.endpoint("payments/charges")?;
		let mut result: Charge = self.send(self.client.post(url).json(&body)).await?;

		let payment_id = result.payment_id().to_string();
		match self.fetch_payment(&payment_id).await {
			Ok(payment) => result.payment = Some(Box::new(payment)),
			Err(e) => {
				tracing::warn!(error = %e, payment_id = %payment_id, "Could not load payment of charge");
			}
		}

		Ok(result)
	}

	async fn cancel_charge_by_id(
		&self,
		payment_id: &str,
		charge_id: &str,
		amount: Option<Decimal>,
	) -> UnzerResult<Cancellation> {
		let url = self.endpoint(&format!(
			"payments/{}/charges/{}/cancels",
			payment_id, charge_id
		))?;
		tracing::debug!(payment_id, charge_id, amount = ?amount, "Cancelling charge");
		self.send(self.client.post(url).json(&CancelBody { amount }))
			.await
	}

	async fn fetch_charge_by_id(&self, payment_id: &str, charge_id: &str) -> UnzerResult<Charge> {
		let summary = self.fetch_payment_summary(payment_id).await?;
		self.fetch_charge_resource(&summary, charge_id).await
	}

	async fn fetch_payment(&self, payment_id: &str) -> UnzerResult<Payment> {
		let summary = self.fetch_payment_summary(payment_id).await?;

		let mut charges = Vec::new();
		for transaction in summary.transactions_of(CHARGE_TRANSACTION) {
			let charge_id = last_path_segment(&transaction.url).ok_or_else(|| {
				UnzerError::UnexpectedResponse(format!(
					"charge transaction without id: {}",
					transaction.url
				))
			})?;
			charges.push(self.fetch_charge_resource(&summary, charge_id).await?);
		}

		summary.into_payment(charges)
	}
}

#[derive(Serialize)]
struct ChargeBody<'a> {
	#[serde(flatten)]
	charge: &'a ChargeRequest,
	resources: ChargeResources<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChargeResources<'a> {
	customer_id: &'a str,
	type_id: &'a str,
}

#[derive(Serialize)]
struct CancelBody {
	#[serde(
		with = "rust_decimal::serde::float_option",
		skip_serializing_if = "Option::is_none"
	)]
	amount: Option<Decimal>,
}

#[derive(Deserialize)]
struct IdResponse {
	id: String,
}

#[derive(Deserialize)]
struct StateResponse {
	id: u8,
}

#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResources {
	#[serde(default)]
	type_id: Option<String>,
}

#[derive(Deserialize)]
struct TransactionSummary {
	#[serde(rename = "type")]
	kind: String,
	#[serde(default)]
	status: String,
	url: String,
	#[serde(default)]
	amount: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentResponse {
	id: String,
	state: StateResponse,
	#[serde(default)]
	amount: PaymentAmount,
	#[serde(default)]
	currency: String,
	#[serde(default)]
	order_id: Option<String>,
	#[serde(default)]
	resources: PaymentResources,
	#[serde(default)]
	transactions: Vec<TransactionSummary>,
}

impl PaymentResponse {
	fn transactions_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a TransactionSummary> {
		self.transactions.iter().filter(move |t| t.kind == kind)
	}

	fn cancellations_of(&self, charge_id: &str) -> Vec<Cancellation> {
		let marker = format!("/charges/{}/cancels/", charge_id);
		self.transactions_of(CANCEL_CHARGE_TRANSACTION)
			.filter(|t| t.url.contains(&marker))
			.map(|t| Cancellation {
				id: last_path_segment(&t.url).unwrap_or_default().to_string(),
				amount: t.amount,
				is_success: t.status == "success",
				is_pending: t.status == "pending",
				is_error: t.status == "error",
				..Cancellation::default()
			})
			.collect()
	}

	fn into_payment(self, charges: Vec<Charge>) -> UnzerResult<Payment> {
		let state = PaymentState::try_from(self.state.id).map_err(UnzerError::UnexpectedResponse)?;
		Ok(Payment {
			id: self.id,
			state,
			amount: self.amount,
			currency: self.currency,
			order_id: self.order_id,
			payment_type: self
				.resources
				.type_id
				.filter(|id| !id.is_empty())
				.map(PaymentType::new),
			charges,
		})
	}
}

#[derive(Deserialize)]
struct ApiErrorResponse {
	#[serde(default, rename = "isError")]
	is_error: bool,
	#[serde(default)]
	errors: Vec<ApiErrorItem>,
}

impl ApiErrorResponse {
	fn is_reported(&self) -> bool {
		self.is_error || !self.errors.is_empty()
	}
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorItem {
	#[serde(default)]
	code: String,
	#[serde(default)]
	merchant_message: String,
	#[serde(default)]
	customer_message: String,
}

/// Decodes a response body.
///
/// The gateway reports some failures, declined charges among them, in the
/// body of a 2xx response; those fail like any non-success status.
fn decode<T: DeserializeOwned>(status: StatusCode, body: &str) -> UnzerResult<T> {
	let reported = serde_json::from_str::<ApiErrorResponse>(body)
		.ok()
		.filter(ApiErrorResponse::is_reported);

	if reported.is_some() || !status.is_success() {
		return Err(api_error(status, body, reported));
	}

	Ok(serde_json::from_str(body)?)
}

fn api_error(status: StatusCode, body: &str, reported: Option<ApiErrorResponse>) -> UnzerError {
	let first = reported.and_then(|response| response.errors.into_iter().next());

	match first {
		Some(item) => UnzerError::api(item.code, item.merchant_message, item.customer_message),
		None => UnzerError::UnexpectedResponse(format!("HTTP {}: {}", status, body)),
	}
}

fn last_path_segment(url: &str) -> Option<&str> {
	url.trim_end_matches('/')
		.rsplit('/')
		.next()
		.filter(|segment| !segment.is_empty() && !segment.contains(':'))
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	const PAYMENT_JSON: &str = r#"{
		"id": "s-pay-1",
		"state": {"id": 1, "name": "completed"},
		"amount": {"total": "100.0000", "charged": "100.0000", "canceled": "30.0000", "remaining": "0.0000"},
		"currency": "EUR",
		"orderId": "payment---1",
		"resources": {"customerId": "s-cst-1", "paymentId": "s-pay-1", "typeId": "s-crd-1"},
		"transactions": [
			{"date": "2024-01-01 10:00:00", "type": "charge", "status": "success", "url": "https://api.unzer.com/v1/payments/s-pay-1/charges/s-chg-1", "amount": "100.0000"},
			{"date": "2024-01-02 10:00:00", "type": "cancel-charge", "status": "success", "url": "https://api.unzer.com/v1/payments/s-pay-1/charges/s-chg-1/cancels/s-cnl-1", "amount": "20.0000"},
			{"date": "2024-01-03 10:00:00", "type": "cancel-charge", "status": "success", "url": "https://api.unzer.com/v1/payments/s-pay-1/charges/s-chg-1/cancels/s-cnl-2", "amount": "10.0000"},
			{"date": "2024-01-03 11:00:00", "type": "cancel-charge", "status": "success", "url": "https://api.unzer.com/v1/payments/s-pay-1/charges/s-chg-9/cancels/s-cnl-3", "amount": "5.0000"}
		]
	}"#;

	fn options() -> UnzerOptions {
		UnzerOptions::new("s-priv-1", "s-pub-1").unwrap()
	}

	#[rstest]
	fn test_endpoint_joins_api_url() {
		let client = UnzerClient::new(&options()).unwrap();
		assert_eq!(
			client.endpoint("payments/s-pay-1").unwrap().as_str(),
			"https://api.unzer.com/v1/payments/s-pay-1"
		);
	}

	#[rstest]
	fn test_summary_maps_to_payment() {
		let summary: PaymentResponse = serde_json::from_str(PAYMENT_JSON).unwrap();
		let cancellations = summary.cancellations_of("s-chg-1");
		assert_eq!(cancellations.len(), 2);
		assert_eq!(cancellations[0].id, "s-cnl-1");
		assert_eq!(cancellations[1].amount, Decimal::from(10));
		assert!(cancellations.iter().all(|c| c.is_success));

		let payment = summary.into_payment(Vec::new()).unwrap();
		assert!(payment.is_completed());
		assert_eq!(payment.amount.charged, Decimal::from(100));
		assert_eq!(payment.payment_method_name(), "Card");
		assert_eq!(payment.order_id.as_deref(), Some("payment---1"));
	}

	#[rstest]
	fn test_unknown_state_is_unexpected_response() {
		let summary: PaymentResponse =
			serde_json::from_str(r#"{"id": "s-pay-1", "state": {"id": 42}}"#).unwrap();
		assert!(matches!(
			summary.into_payment(Vec::new()),
			Err(UnzerError::UnexpectedResponse(_))
		));
	}

	#[rstest]
	fn test_api_error_from_error_body() {
		let body = r#"{
			"isError": true,
			"id": "s-err-1",
			"errors": [{"code": "API.410.200.010", "merchantMessage": "Payment type is invalid.", "customerMessage": "Please check your input."}]
		}"#;

		match decode::<IdResponse>(StatusCode::BAD_REQUEST, body).err() {
			Some(UnzerError::Api {
				code,
				merchant_message,
				client_message,
			}) => {
				assert_eq!(code, "API.410.200.010");
				assert_eq!(merchant_message, "Payment type is invalid.");
				assert_eq!(client_message, "Please check your input.");
			}
			other => panic!("Expected API error, got {:?}", other),
		}
	}

	#[rstest]
	fn test_error_body_with_success_status() {
		let body = r#"{
			"isError": true,
			"id": "s-err-1",
			"errors": [{"code": "COR.100.100.100", "merchantMessage": "Card declined", "customerMessage": "Your card was declined."}]
		}"#;

		match decode::<Charge>(StatusCode::OK, body).err() {
			Some(UnzerError::Api {
				merchant_message,
				client_message,
				..
			}) => {
				assert_eq!(merchant_message, "Card declined");
				assert_eq!(client_message, "Your card was declined.");
			}
			other => panic!("Expected API error, got {:?}", other),
		}
	}

	#[rstest]
	fn test_error_flag_without_items_with_success_status() {
		let err = decode::<IdResponse>(StatusCode::OK, r#"{"isError": true, "id": "s-err-2"}"#)
			.err()
			.unwrap();
		assert!(matches!(err, UnzerError::UnexpectedResponse(ref msg) if msg.contains("s-err-2")));
	}

	#[rstest]
	fn test_success_body_decodes() {
		let body = r#"{"id": "s-cst-1", "isError": false, "errors": []}"#;
		let created = decode::<IdResponse>(StatusCode::CREATED, body).unwrap();
		assert_eq!(created.id, "s-cst-1");
	}

	#[rstest]
	fn test_api_error_without_error_body() {
		let err = decode::<IdResponse>(StatusCode::BAD_GATEWAY, "upstream down")
			.err()
			.unwrap();
		assert!(matches!(err, UnzerError::UnexpectedResponse(ref msg) if msg.contains("502")));
	}

	#[rstest]
	#[case("https://api.unzer.com/v1/payments/s-pay-1/charges/s-chg-1", Some("s-chg-1"))]
	#[case("https://api.unzer.com/v1/payments/s-pay-1/charges/s-chg-1/", Some("s-chg-1"))]
	#[case("https://", None)]
	#[case("", None)]
	fn test_last_path_segment(#[case] url: &str, #[case] expected: Option<&str>) {
		assert_eq!(last_path_segment(url), expected);
	}

	#[rstest]
	fn test_charge_body_flattens_request() {
		let charge = ChargeRequest::new(Decimal::new(4999, 2), "EUR", "https://shop.test/return");
		let body = ChargeBody {
			charge: &charge,
			resources: ChargeResources {
				customer_id: "s-cst-1",
				type_id: "s-crd-1",
			},
		};

		let json = serde_json::to_value(&body).unwrap();
		assert_eq!(json["currency"], "EUR");
		assert_eq!(json["resources"]["typeId"], "s-crd-1");
		assert_eq!(json["resources"]["customerId"], "s-cst-1");
	}

	#[rstest]
	fn test_cancel_body_omits_missing_amount() {
		let json = serde_json::to_value(CancelBody { amount: None }).unwrap();
		assert!(json.get("amount").is_none());
	}
}
