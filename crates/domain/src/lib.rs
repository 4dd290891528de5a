//! Pure business logic for the soap-store checkout pipeline.
//!
//! Everything in this crate is synchronous and I/O-free: money
//! arithmetic, cart mutation, cost computation, and the order status
//! state machine. Persistence and collaborators live in the `store`
//! and `checkout` crates.

mod cart;
mod catalog;
mod error;
mod money;
pub mod order;
mod rates;

pub use cart::{Cart, CartLine, CartMutation};
pub use catalog::{Product, Variant};
pub use error::{CartError, DomainError};
pub use money::Money;
pub use order::{Order, OrderError, OrderItem, OrderStatus, PaymentProof, ShippingAddress};
pub use rates::{compute_costs, CostBreakdown, RateConfig, RegionRate};
