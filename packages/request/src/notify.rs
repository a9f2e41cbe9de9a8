//! User-facing notifications.

/// Receives success and failure notices for the user.
pub trait Notifier: Send + Sync {
    /// Reports a failure.
    fn negative(&self, message: &str);
    /// Reports an informational message.
    fn positive(&self, message: &str);
}

/// [`Notifier`] that writes to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn negative(&self, message: &str) {
        log::error!("{message}");
    }

    fn positive(&self, message: &str) {
        log::info!("{message}");
    }
}
