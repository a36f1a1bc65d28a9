//! In-memory outbound stream for exercising the hub without a transport.

use crate::outbound::OutboundStream;
use async_trait::async_trait;
use domain::{error::Error, Message};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

#[derive(Debug, Default)]
struct Shared {
    attempts: AtomicUsize,
    failing: AtomicBool,
    delay: Mutex<Option<Duration>>,
    delivered: Mutex<Vec<Message>>,
}

/// Records every delivery attempt and, unless told to fail, every delivered message.
///
/// Clones share state, so a test can keep one handle while the hub owns another.
#[derive(Clone, Debug, Default)]
pub struct MockOutbound {
    shared: Arc<Shared>,
}

impl MockOutbound {
    pub fn new() -> Self {
        Self::default()
    }

    /// A stream whose every send fails.
    pub fn failing() -> Self {
        let outbound = Self::new();
        outbound.set_failing(true);
        outbound
    }

    pub fn set_failing(&self, failing: bool) {
        self.shared.failing.store(failing, Ordering::SeqCst);
    }

    /// Makes every send wait for `delay` before completing.
    pub fn set_delay(&self, delay: Duration) {
        *self
            .shared
            .delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(delay);
    }

    pub fn attempts(&self) -> usize {
        self.shared.attempts.load(Ordering::SeqCst)
    }

    pub fn delivered(&self) -> Vec<Message> {
        self.shared
            .delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl OutboundStream for MockOutbound {
    async fn send(&self, message: &Message) -> Result<(), Error> {
        self.shared.attempts.fetch_add(1, Ordering::SeqCst);

        let delay = *self
            .shared
            .delay
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.shared.failing.load(Ordering::SeqCst) {
            return Err(Error::send_failed("mock outbound set to fail"));
        }

        self.shared
            .delivered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.clone());
        Ok(())
    }
}
