//! # pay-core
//!
//! Data model and storage abstraction for the checkout-link platform:
//! checkout links, payments, merchants, products, and the `RecordStore`
//! trait every other crate talks to.
//!
//! The store is an external collaborator: callers read a snapshot, compute
//! a decision, and issue a single conditional write per side effect. The
//! in-memory implementation here backs development and tests; a durable
//! backend implements the same trait.

pub mod error;
pub mod link;
pub mod merchant;
pub mod payment;
pub mod store;

pub use error::{CoreError, Result};
pub use link::{CheckoutLink, LinkUpdate, NewLink, PaymentType, Question};
pub use merchant::{Merchant, MerchantUpdate, Product};
pub use payment::{NewPayment, Payment, PaymentStatus};
pub use store::{MemoryStore, RecordStore};
