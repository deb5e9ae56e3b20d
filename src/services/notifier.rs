use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::warn;

use crate::models::{CartError, ProductId};

/// A transient, user-visible message (a "toast")
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub kind: &'static str,
    pub product_id: ProductId,
    pub message: &'static str,
}

impl From<&CartError> for Notification {
    fn from(err: &CartError) -> Self {
        Self {
            kind: err.kind(),
            product_id: err.product_id(),
            message: err.user_message(),
        }
    }
}

/// Sink for cart failures that the shopper should see
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        warn!(
            kind = notification.kind,
            product_id = notification.product_id,
            "{}",
            notification.message
        );
    }
}

/// Keeps the most recent notifications until a UI drains them
#[derive(Debug)]
pub struct BufferedNotifier {
    capacity: usize,
    pending: Mutex<VecDeque<Notification>>,
}

impl BufferedNotifier {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            pending: Mutex::new(VecDeque::new()),
        }
    }

    /// Take every pending notification, oldest first
    pub fn drain(&self) -> Vec<Notification> {
        match self.pending.lock() {
            Ok(mut pending) => pending.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl Notifier for BufferedNotifier {
    fn notify(&self, notification: Notification) {
        if let Ok(mut pending) = self.pending.lock() {
            if pending.len() == self.capacity {
                pending.pop_front();
            }
            pending.push_back(notification);
        }
    }
}
