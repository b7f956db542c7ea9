mod error;
pub use error::ObserveError;

mod config;
pub use config::LogConfig;

mod format;
pub use format::LogFormat;

mod level;
pub use level::LogLevel;

mod timezone;
pub use timezone::{LogTimeZone, init_local_offset};

mod clock;
pub use clock::Rfc3339Timer;

mod init;
pub use init::init_logging;
