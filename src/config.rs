//! Runtime configuration

/// Settings are built once at process start and passed to the service
/// constructor. There is no ambient global to reach for.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Cancellations a user may accumulate before further successful ones
    /// flag the account for suspension.
    pub max_cancellations: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_cancellations: 3,
        }
    }
}
