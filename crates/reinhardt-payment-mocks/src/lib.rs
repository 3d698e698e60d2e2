//! Mock implementations for reinhardt-payment testing.
//!
//! [`MockUnzerGateway`] replaces the Unzer REST API and [`MockOrderManager`]
//! the shop's order manager, both keeping their state in memory.

pub mod order_manager;
pub mod unzer_gateway;

pub use order_manager::{MockOrderAgent, MockOrderManager};
pub use unzer_gateway::{ChargeOutcome, GatewayCall, MockUnzerGateway};
