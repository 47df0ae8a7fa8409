//! Ring-buffer oscilloscope
//!
//! [`PcmMonitor`] sits between a PCM source and its real writer and records
//! the most recent bytes. A [`Scope`] samples that record into a fixed-width
//! trace and plots it onto any [`DrawTarget`]. With the `visualization`
//! feature, [`tui`] shows the trace live in a terminal.

pub mod draw;
pub mod history;
pub mod monitor;
pub mod scope;
#[cfg(feature = "visualization")]
pub mod tui;

pub use draw::{DrawTarget, PixelGrid};
pub use history::PcmHistory;
pub use monitor::PcmMonitor;
pub use scope::{Scope, ScrollDirection, TracePoint, MIN_ZOOM};
