//! Command implementations

pub mod calculate;
pub mod prefix;
