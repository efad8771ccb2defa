pub mod errors;
pub mod logging;
pub mod notifications;

pub use errors::{ConfigError, StandupError};
pub use logging::init_logging;
pub use notifications::{Notification, NotificationLevel, NotificationQueue};

pub type Result<T> = std::result::Result<T, StandupError>;
