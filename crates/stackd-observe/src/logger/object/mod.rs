mod format;
pub use format::LoggerFormat;

mod level;
pub use level::LoggerLevel;

mod timezone;
pub use timezone::{LoggerTimeZone, init_local_offset};

mod clock;
pub use clock::LoggerClock;
