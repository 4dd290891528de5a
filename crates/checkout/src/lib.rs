//! The cart-to-order finalization pipeline.
//!
//! This crate owns the one subsystem with real invariants: cart
//! accumulation, region-dependent cost quoting, payment-gateway
//! session creation, cryptographic payment verification, atomic order
//! commit, and best-effort notification fan-out.
//!
//! External collaborators (catalog, payment gateway, mail transport,
//! real-time event channel) are traits with in-memory implementations
//! used by tests and development builds.

mod cart;
mod error;
mod notify;
mod service;
pub mod services;
mod signature;

pub use cart::CartService;
pub use error::CheckoutError;
pub use notify::NotificationFanout;
pub use service::{CheckoutService, PaymentSession, Quote};
pub use services::catalog::{Catalog, InMemoryCatalog};
pub use services::events::{EventPublisher, RecordingPublisher};
pub use services::gateway::{GatewayOrder, InMemoryPaymentGateway, PaymentGateway};
pub use services::mailer::{Email, Mailer, RecordingMailer};
pub use signature::SignatureVerifier;
