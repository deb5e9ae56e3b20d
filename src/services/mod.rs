// Services module - cart state and user notifications

pub mod cart_store;
pub mod notifier;

pub use cart_store::{CartStore, DEFAULT_CART_KEY};
pub use notifier::{BufferedNotifier, Notification, Notifier, TracingNotifier};
