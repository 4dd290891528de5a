//! Shared identifier types used across the checkout service crates.

mod types;

pub use types::{AccountId, LineId, OrderId};
