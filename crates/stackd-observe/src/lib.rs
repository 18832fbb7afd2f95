//! Process-wide logging for stackd binaries.
mod logger;
pub use logger::*;
