//! Unzer implementation of the payment provider contract.

use crate::client::UnzerClient;
use crate::error::{UnzerError, diagnostic_messages};
use crate::gateway::UnzerGateway;
use crate::options::UnzerOptions;
use crate::redirect::{charge_redirect_url, error_url, transform_internal_payment_id};
use crate::request::UnzerRequest;
use crate::resources::{Address, Charge, ChargeRequest, Customer, Payment};
use crate::PROVIDER_NAME;
use async_trait::async_trait;
use reinhardt_payment::{
	AuthorizedData, OnlineShopOrder, OrderAgent, OrderManager, PaymentError, PaymentInfo,
	PaymentProvider, PaymentResult, Price, ResponseBag, StartPaymentRequest,
	StartPaymentResponse, Status, StatusState, UrlResponse,
};
use rust_decimal::Decimal;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Order brick holding the data stored after authorization.
pub const PROVIDER_BRICK: &str = "PaymentProviderUnzer";
/// Brick field with the authorized payment id.
pub const BRICK_PAYMENT_REFERENCE: &str = "auth_paymentReference";
/// Brick field with the authorized charge id.
pub const BRICK_CHARGE_ID: &str = "auth_chargeId";

const RESPONSE_COMPLETED: &str = "completed";
const RESPONSE_PENDING: &str = "pending";
const RESPONSE_ERROR: &str = "error";

/// Unzer payment provider.
///
/// Holds the authorized data of the last handled response, so one instance
/// serves one request at a time.
pub struct UnzerPayment {
	options: UnzerOptions,
	gateway: Arc<dyn UnzerGateway>,
	order_manager: Arc<dyn OrderManager>,
	authorized_data: AuthorizedData,
}

/// Former name of [`UnzerPayment`].
pub type Heidelpay = UnzerPayment;

/// What the gateway said about a returning customer's payment.
enum Outcome {
	NotFound,
	Completed(PaymentInfo, Payment),
	Pending(PaymentInfo, Payment),
	Failed {
		payment_info: Option<PaymentInfo>,
		payment: Option<Payment>,
		merchant_message: String,
		client_message: String,
	},
}

impl Outcome {
	fn from_error(
		payment_info: Option<PaymentInfo>,
		payment: Option<Payment>,
		err: &PaymentError,
	) -> Self {
		let (merchant_message, client_message) = diagnostic_messages(err);
		if is_api_error(err) {
			tracing::warn!(error = %err, "Payment response handling failed");
		} else {
			tracing::error!(error = %err, "Payment response handling failed");
		}
		Self::Failed {
			payment_info,
			payment,
			merchant_message,
			client_message,
		}
	}
}

impl UnzerPayment {
	/// Creates the provider with an HTTP gateway client.
	pub fn new(options: UnzerOptions, order_manager: Arc<dyn OrderManager>) -> PaymentResult<Self> {
		let client = UnzerClient::new(&options)?;
		Ok(Self::with_gateway(options, Arc::new(client), order_manager))
	}

	/// Creates the provider with a custom gateway.
	pub fn with_gateway(
		options: UnzerOptions,
		gateway: Arc<dyn UnzerGateway>,
		order_manager: Arc<dyn OrderManager>,
	) -> Self {
		Self {
			options,
			gateway,
			order_manager,
			authorized_data: AuthorizedData::new(),
		}
	}

	/// Key for the browser-side payment form.
	pub fn public_access_key(&self) -> &str {
		self.options.public_access_key()
	}

	/// Cancels the authorized charge of `order` for the price amount.
	///
	/// Returns `false` without contacting the gateway when the order has no
	/// stored authorization.
	pub async fn cancel_charge(&self, order: &OnlineShopOrder, price: &Price) -> PaymentResult<bool> {
		let Some((payment_reference, charge_id)) = stored_authorization(order) else {
			return Ok(false);
		};

		let cancellation = self
			.gateway
			.cancel_charge_by_id(payment_reference, charge_id, Some(price.amount()))
			.await?;
		tracing::info!(
			order_id = %order.id,
			charge_id,
			success = cancellation.is_success,
			"Charge cancellation requested"
		);

		Ok(cancellation.is_success)
	}

	/// Amount of the authorized charge that has not been cancelled yet.
	pub async fn max_cancel_amount(&self, order: &OnlineShopOrder) -> PaymentResult<Decimal> {
		let Some((payment_reference, charge_id)) = stored_authorization(order) else {
			return Ok(Decimal::ZERO);
		};

		let charge = self
			.gateway
			.fetch_charge_by_id(payment_reference, charge_id)
			.await?;
		Ok(charge.cancellable_amount())
	}

	/// Loads the gateway payment behind the order's pending payment info.
	pub async fn fetch_payment(&self, order: &OnlineShopOrder) -> PaymentResult<Option<Payment>> {
		let order_agent = self.order_manager.create_order_agent(order);
		let Some(payment_info) = order_agent.current_pending_payment_info().await? else {
			return Ok(None);
		};
		let Some(reference) = payment_info.payment_reference() else {
			return Ok(None);
		};

		Ok(Some(self.gateway.fetch_payment(reference).await?))
	}

	async fn submit_charge(
		&self,
		order: &OnlineShopOrder,
		price: &Price,
		request: &UnzerRequest,
	) -> PaymentResult<String> {
		let customer = build_customer(order);
		let charge_request = ChargeRequest::new(
			price.rounded_amount(2),
			price.currency().short_name(),
			&request.return_url,
		)
		.with_order_id(transform_internal_payment_id(&request.internal_payment_id));

		let transaction = self
			.gateway
			.perform_charge(&charge_request, &request.payment_reference, &customer)
			.await?;

		let order_agent = self.order_manager.create_order_agent(order);
		let status = Status::new(
			&request.internal_payment_id,
			transaction.payment_id(),
			"",
			StatusState::Pending,
			charge_metadata(&transaction, &request.payment_reference)?,
		);
		order_agent.update_payment(&status).await?;
		tracing::info!(
			internal_payment_id = %request.internal_payment_id,
			payment_id = %transaction.payment_id(),
			success = transaction.is_success,
			pending = transaction.is_pending,
			"Charge submitted"
		);

		Ok(charge_redirect_url(&transaction, &request.return_url))
	}

	async fn lookup(&self, order: &OnlineShopOrder) -> Outcome {
		let order_agent = self.order_manager.create_order_agent(order);
		let payment_info = match order_agent.current_pending_payment_info().await {
			Ok(Some(payment_info)) => payment_info,
			Ok(None) => return Outcome::NotFound,
			Err(err) => return Outcome::from_error(None, None, &err),
		};

		let Some(reference) = payment_info.payment_reference().map(str::to_string) else {
			let err = PaymentError::from(UnzerError::MissingPaymentReference);
			return Outcome::from_error(Some(payment_info), None, &err);
		};

		let payment = match self.gateway.fetch_payment(&reference).await {
			Ok(payment) => payment,
			Err(err) => {
				return Outcome::from_error(Some(payment_info), None, &PaymentError::from(err));
			}
		};

		if payment.is_completed() {
			return Outcome::Completed(payment_info, payment);
		}
		if payment.is_pending() {
			return Outcome::Pending(payment_info, payment);
		}

		let merchant_message = match payment.charge_by_index(0) {
			Some(charge) => charge.message.customer.clone(),
			None => format!("State: {}", payment.state_name()),
		};
		Outcome::Failed {
			payment_info: Some(payment_info),
			payment: Some(payment),
			merchant_message,
			client_message: String::new(),
		}
	}
}

#[async_trait]
impl PaymentProvider for UnzerPayment {
	fn name(&self) -> &str {
		PROVIDER_NAME
	}

	async fn init_payment(
		&self,
		_price: &Price,
		_config: &StartPaymentRequest,
	) -> PaymentResult<()> {
		Err(PaymentError::Unsupported(
			"use start_payment instead as init_payment is deprecated and the order agent is needed by the Unzer payment provider".to_string(),
		))
	}

	async fn start_payment(
		&self,
		order_agent: &dyn OrderAgent,
		price: &Price,
		request: &StartPaymentRequest,
	) -> PaymentResult<StartPaymentResponse> {
		let request = UnzerRequest::try_from(request)?;
		let order = order_agent.order();

		let url = match self.submit_charge(order, price, &request).await {
			Ok(url) => url,
			Err(err) => {
				let (merchant_message, client_message) = diagnostic_messages(&err);
				if is_api_error(&err) {
					tracing::warn!(
						error = %err,
						internal_payment_id = %request.internal_payment_id,
						"Starting payment failed, redirecting to error URL"
					);
				} else {
					tracing::error!(
						error = %err,
						internal_payment_id = %request.internal_payment_id,
						"Starting payment failed, redirecting to error URL"
					);
				}
				error_url(&request.error_url, &merchant_message, &client_message)
			}
		};

		Ok(StartPaymentResponse::Url(UrlResponse {
			order: order.clone(),
			url,
		}))
	}

	async fn handle_response(&mut self, response: &ResponseBag) -> PaymentResult<Status> {
		let order = response
			.order()
			.ok_or_else(|| PaymentError::InvalidArgument("no order sent".to_string()))?;

		match self.lookup(order).await {
			Outcome::NotFound => {
				self.authorized_data = AuthorizedData::new();
				Ok(Status::not_found())
			}
			Outcome::Completed(payment_info, payment) => {
				let mut authorized_data = snapshot(Some(&payment), Some(&payment_info), "", "");
				let charge_id = payment
					.charge_by_index(0)
					.map(|charge| charge.id.clone())
					.unwrap_or_default();
				authorized_data.insert("chargeId", charge_id);
				self.authorized_data = authorized_data;

				Ok(Status::new(
					&payment_info.internal_payment_id,
					&payment.id,
					"",
					StatusState::Authorized,
					payment_metadata(Some(&payment), Some(&payment_info), RESPONSE_COMPLETED)?,
				))
			}
			Outcome::Pending(payment_info, payment) => {
				self.authorized_data = snapshot(Some(&payment), Some(&payment_info), "", "");

				Ok(Status::new(
					&payment_info.internal_payment_id,
					&payment.id,
					"",
					StatusState::Pending,
					payment_metadata(Some(&payment), Some(&payment_info), RESPONSE_PENDING)?,
				))
			}
			Outcome::Failed {
				payment_info,
				payment,
				merchant_message,
				client_message,
			} => {
				self.authorized_data = snapshot(
					payment.as_ref(),
					payment_info.as_ref(),
					&client_message,
					&merchant_message,
				);

				let mut data =
					payment_metadata(payment.as_ref(), payment_info.as_ref(), RESPONSE_ERROR)?;
				data.insert("unzer_clientMessage".to_string(), client_message);
				data.insert("unzer_merchantMessage".to_string(), merchant_message);

				Ok(Status::new(
					payment_info
						.as_ref()
						.map(|info| info.internal_payment_id.as_str())
						.unwrap_or_default(),
					payment
						.as_ref()
						.map(|payment| payment.id.as_str())
						.unwrap_or_default(),
					"",
					StatusState::Cancelled,
					data,
				))
			}
		}
	}

	fn authorized_data(&self) -> &AuthorizedData {
		&self.authorized_data
	}

	fn set_authorized_data(&mut self, authorized_data: AuthorizedData) {
		self.authorized_data = authorized_data;
	}

	async fn execute_debit(
		&self,
		_price: Option<&Price>,
		_reference: Option<&str>,
	) -> PaymentResult<Status> {
		Err(UnzerError::NotImplemented("execute_debit").into())
	}

	async fn execute_credit(
		&self,
		_price: &Price,
		_reference: &str,
		_transaction_id: &str,
	) -> PaymentResult<Status> {
		Err(UnzerError::NotImplemented("execute_credit").into())
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}

	fn into_any(self: Box<Self>) -> Box<dyn Any + Send + Sync> {
		self
	}
}

fn is_api_error(err: &PaymentError) -> bool {
	matches!(
		err.provider_source::<UnzerError>(),
		Some(UnzerError::Api { .. })
	)
}

fn stored_authorization(order: &OnlineShopOrder) -> Option<(&str, &str)> {
	let brick = order.payment_provider_brick(PROVIDER_BRICK)?;
	Some((brick.get(BRICK_PAYMENT_REFERENCE)?, brick.get(BRICK_CHARGE_ID)?))
}

fn build_customer(order: &OnlineShopOrder) -> Customer {
	let billing_address = Address {
		name: format!("{} {}", order.customer_firstname, order.customer_lastname),
		street: order.customer_street.clone(),
		zip: order.customer_zip.clone(),
		city: order.customer_city.clone(),
		country: order.customer_country.clone(),
	};

	let shipping_address = if order.has_delivery_address() {
		let field = |value: &Option<String>| value.clone().unwrap_or_default();
		Address {
			name: format!(
				"{} {}",
				field(&order.delivery_firstname),
				field(&order.delivery_lastname)
			),
			street: field(&order.delivery_street),
			zip: field(&order.delivery_zip),
			city: field(&order.delivery_city),
			country: field(&order.delivery_country),
		}
	} else {
		billing_address.clone()
	};

	let customer = Customer::new(&order.customer_firstname, &order.customer_lastname)
		.with_email(&order.customer_email)
		.with_billing_address(billing_address)
		.with_shipping_address(shipping_address);

	match order.customer_birthdate {
		Some(birthdate) => customer.with_birth_date(birthdate),
		None => customer,
	}
}

fn format_amount(amount: Decimal) -> String {
	amount.normalize().to_string()
}

fn payment_type_json(payment: Option<&Payment>) -> PaymentResult<String> {
	match payment.and_then(|payment| payment.payment_type.as_ref()) {
		Some(payment_type) => Ok(serde_json::to_string(payment_type).map_err(UnzerError::from)?),
		None => Ok(String::new()),
	}
}

fn charge_metadata(
	transaction: &Charge,
	payment_reference: &str,
) -> PaymentResult<BTreeMap<String, String>> {
	let payment = transaction.payment();
	let response = serde_json::to_string(transaction).map_err(UnzerError::from)?;

	Ok(BTreeMap::from([
		(
			"unzer_amount".to_string(),
			payment
				.map(|p| format_amount(p.amount.charged))
				.unwrap_or_default(),
		),
		(
			"unzer_currency".to_string(),
			payment.map(|p| p.currency.clone()).unwrap_or_default(),
		),
		("unzer_paymentType".to_string(), payment_type_json(payment)?),
		(
			"unzer_paymentReference".to_string(),
			payment_reference.to_string(),
		),
		("unzer_responseStatus".to_string(), String::new()),
		("unzer_response".to_string(), response),
	]))
}

fn payment_metadata(
	payment: Option<&Payment>,
	payment_info: Option<&PaymentInfo>,
	response_status: &str,
) -> PaymentResult<BTreeMap<String, String>> {
	let response = match payment {
		Some(payment) => serde_json::to_string(payment).map_err(UnzerError::from)?,
		None => String::new(),
	};

	Ok(BTreeMap::from([
		(
			"unzer_amount".to_string(),
			payment
				.map(|p| format_amount(p.amount.charged))
				.unwrap_or_default(),
		),
		(
			"unzer_currency".to_string(),
			payment.map(|p| p.currency.clone()).unwrap_or_default(),
		),
		("unzer_paymentType".to_string(), payment_type_json(payment)?),
		(
			"unzer_paymentReference".to_string(),
			payment_reference_of(payment_info),
		),
		(
			"unzer_paymentMethod".to_string(),
			payment.map(Payment::payment_method_name).unwrap_or_default(),
		),
		("unzer_responseStatus".to_string(), response_status.to_string()),
		("unzer_response".to_string(), response),
	]))
}

fn snapshot(
	payment: Option<&Payment>,
	payment_info: Option<&PaymentInfo>,
	client_message: &str,
	merchant_message: &str,
) -> AuthorizedData {
	[
		(
			"amount",
			payment
				.map(|p| format_amount(p.amount.charged))
				.unwrap_or_default(),
		),
		(
			"currency",
			payment.map(|p| p.currency.clone()).unwrap_or_default(),
		),
		(
			"paymentType",
			payment_type_json(payment).unwrap_or_default(),
		),
		("paymentReference", payment_reference_of(payment_info)),
		(
			"paymentMethod",
			payment.map(Payment::payment_method_name).unwrap_or_default(),
		),
		("clientMessage", client_message.to_string()),
		("merchantMessage", merchant_message.to_string()),
	]
	.into_iter()
	.collect()
}

fn payment_reference_of(payment_info: Option<&PaymentInfo>) -> String {
	payment_info
		.and_then(PaymentInfo::payment_reference)
		.unwrap_or_default()
		.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::NaiveDate;
	use reinhardt_payment::PaymentProviderBrick;
	use rstest::{fixture, rstest};

	#[fixture]
	fn order() -> OnlineShopOrder {
		OnlineShopOrder {
			customer_firstname: "Jane".to_string(),
			customer_lastname: "Doe".to_string(),
			customer_email: "jane@example.com".to_string(),
			customer_street: "Main Street 1".to_string(),
			customer_zip: "1010".to_string(),
			customer_city: "Vienna".to_string(),
			customer_country: "AT".to_string(),
			..OnlineShopOrder::new("order-1")
		}
	}

	#[rstest]
	fn test_customer_reuses_billing_address_without_delivery(order: OnlineShopOrder) {
		let customer = build_customer(&order);
		assert_eq!(customer.billing_address.name, "Jane Doe");
		assert_eq!(customer.shipping_address, customer.billing_address);
		assert_eq!(customer.birth_date, None);
	}

	#[rstest]
	fn test_customer_uses_delivery_address(mut order: OnlineShopOrder) {
		order.delivery_firstname = Some("John".to_string());
		order.delivery_lastname = Some("Roe".to_string());
		order.delivery_street = Some("Side Street 2".to_string());
		order.delivery_city = Some("Graz".to_string());
		order.customer_birthdate = NaiveDate::from_ymd_opt(1985, 12, 24);

		let customer = build_customer(&order);
		assert_eq!(customer.shipping_address.name, "John Roe");
		assert_eq!(customer.shipping_address.city, "Graz");
		assert_eq!(customer.shipping_address.zip, "");
		assert_eq!(customer.billing_address.city, "Vienna");
		assert_eq!(customer.birth_date.as_deref(), Some("1985-12-24"));
	}

	#[rstest]
	fn test_stored_authorization_requires_both_fields(mut order: OnlineShopOrder) {
		assert!(stored_authorization(&order).is_none());

		order.payment_provider.push(
			PaymentProviderBrick::new(PROVIDER_BRICK).with_field(BRICK_PAYMENT_REFERENCE, "s-pay-1"),
		);
		assert!(stored_authorization(&order).is_none());

		order.payment_provider[0]
			.fields
			.insert(BRICK_CHARGE_ID.to_string(), "s-chg-1".to_string());
		assert_eq!(stored_authorization(&order), Some(("s-pay-1", "s-chg-1")));
	}

	#[rstest]
	fn test_error_metadata_without_payment_keeps_all_keys() {
		let data = payment_metadata(None, None, RESPONSE_ERROR).unwrap();
		for key in [
			"unzer_amount",
			"unzer_currency",
			"unzer_paymentType",
			"unzer_paymentReference",
			"unzer_paymentMethod",
			"unzer_response",
		] {
			assert_eq!(data.get(key).map(String::as_str), Some(""), "{}", key);
		}
		assert_eq!(data["unzer_responseStatus"], "error");
	}

	#[rstest]
	#[case(Decimal::new(1000000, 4), "100")]
	#[case(Decimal::new(499900, 4), "49.99")]
	#[case(Decimal::ZERO, "0")]
	fn test_format_amount(#[case] amount: Decimal, #[case] expected: &str) {
		assert_eq!(format_amount(amount), expected);
	}
}
