//! Playback drivers
//!
//! A loop pulls from a [`PcmReader`](crate::pcm::PcmReader) and pushes into a
//! [`PcmWriter`](crate::pcm::PcmWriter) on its own thread until a
//! [`CancelToken`] stops it. [`play_to`] does the same once, on the calling
//! thread.

pub mod cancel;
pub mod driver;

pub use cancel::CancelToken;
pub use driver::{
    loop_pcm, loop_with_options, loop_with_token, play_to, play_until, LoopHandle, LoopOptions,
    LoopStats,
};

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a loop does when reading or writing fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Record the error, back off briefly and keep looping
    #[default]
    Ignore,
    /// Record the error and end the loop
    Stop,
}

/// Why a loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The token was cancelled
    Cancelled,
    /// The token's deadline passed
    DeadlineElapsed,
    /// The source produced nothing, even after a rewind
    Exhausted,
    /// An error ended the loop under [`ErrorPolicy::Stop`]; see
    /// [`LoopHandle::last_error`]
    Failed,
}

impl fmt::Display for LoopExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LoopExit::Cancelled => "cancelled",
            LoopExit::DeadlineElapsed => "deadline elapsed",
            LoopExit::Exhausted => "source exhausted",
            LoopExit::Failed => "failed",
        };
        f.write_str(s)
    }
}
