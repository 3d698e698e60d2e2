//! Payment domain types.

pub mod authorized;
pub mod checkout;
pub mod error;
pub mod order;
pub mod price;
pub mod status;

pub use authorized::AuthorizedData;
pub use checkout::{ResponseBag, StartPaymentRequest, StartPaymentResponse, UrlResponse};
pub use error::{PaymentError, PaymentResult};
pub use order::{OnlineShopOrder, PaymentInfo, PaymentProviderBrick};
pub use price::{Currency, Price};
pub use status::{STATUS_NOT_FOUND_MESSAGE, Status, StatusState};
