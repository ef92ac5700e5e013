//! Sample statistics and number formatting.

pub mod format;
pub mod statistics;

pub use format::*;
pub use statistics::*;
