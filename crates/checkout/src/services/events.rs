//! Real-time event channel trait and in-memory implementation.
//!
//! Administrative sessions subscribe to a live event feed; after a
//! commit the fan-out publishes a lightweight order summary to it.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::{CheckoutError, Result};

/// Trait for the real-time event channel.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes an event to all subscribed administrative sessions.
    async fn publish(&self, event: &str, payload: serde_json::Value) -> Result<()>;
}

#[derive(Debug, Default)]
struct PublisherState {
    published: Vec<(String, serde_json::Value)>,
    fail_on_publish: bool,
}

/// In-memory event publisher for testing.
#[derive(Debug, Clone, Default)]
pub struct RecordingPublisher {
    state: Arc<RwLock<PublisherState>>,
}

impl RecordingPublisher {
    /// Creates a new recording publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the publisher to fail all publishes.
    pub fn set_fail_on_publish(&self, fail: bool) {
        self.state.write().unwrap().fail_on_publish = fail;
    }

    /// Returns the events published so far.
    pub fn published(&self) -> Vec<(String, serde_json::Value)> {
        self.state.read().unwrap().published.clone()
    }

    /// Returns the number of events published.
    pub fn published_count(&self) -> usize {
        self.state.read().unwrap().published.len()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &str, payload: serde_json::Value) -> Result<()> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_publish {
            return Err(CheckoutError::Gateway(
                "simulated event channel failure".to_string(),
            ));
        }

        state.published.push((event.to_string(), payload));
        Ok(())
    }
}
