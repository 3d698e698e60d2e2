//! Gateway resources read and written by the adapter.

pub mod customer;
pub mod payment;
pub mod transaction;

pub use customer::{Address, Customer};
pub use payment::{Payment, PaymentAmount, PaymentMethod, PaymentState, PaymentType};
pub use transaction::{
	Cancellation, Charge, ChargeRequest, TransactionMessage, TransactionResources,
};
