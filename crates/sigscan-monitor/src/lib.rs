//! Logging and signal notifications.

mod logging;
mod notifier;

pub use logging::{setup_logging, LoggingConfig};
pub use notifier::{LogNotifier, NotifySettings, TelegramNotifier};
