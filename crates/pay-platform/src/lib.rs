//! # pay-platform
//!
//! Server-to-server client for the payment processor's approval and
//! completion API. The processor is authoritative for releasing goods:
//! a payment only counts as paid once its completion endpoint confirms
//! `developer_completed`.
//!
//! Responses keep the processor's raw JSON body so API callers can proxy
//! it verbatim, with the developer flags parsed out for the orchestrator.

pub mod client;
pub mod error;
pub mod mock;

pub use client::{GatewayPayment, PiPlatformClient, PlatformConfig, PlatformGateway};
pub use error::{PlatformError, Result};
pub use mock::MockGateway;
