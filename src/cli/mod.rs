//! Demo binary internals

pub mod args;
pub mod commands;
#[cfg(feature = "streaming")]
pub mod session;
