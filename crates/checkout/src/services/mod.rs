//! External collaborator traits and their in-memory implementations.

pub mod catalog;
pub mod events;
pub mod gateway;
pub mod mailer;
