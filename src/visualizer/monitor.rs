//! Writer tee that records PCM for the scope

use super::history::PcmHistory;
use super::scope::Scope;
use crate::config::ScopeConfig;
use crate::pcm::{PcmFormat, PcmWriter};
use crate::Result;
use std::sync::Arc;
use tracing::debug;

/// Forwards every write to an inner writer after recording it.
///
/// The history holds `buffer_length_seconds` of audio in the inner writer's
/// format. Take a [`Scope`] before handing the monitor to a loop; the scope
/// keeps seeing new writes from wherever the monitor ends up.
#[derive(Debug)]
pub struct PcmMonitor<W> {
    inner: W,
    history: Arc<PcmHistory>,
    scope: Scope,
}

impl<W: PcmWriter> PcmMonitor<W> {
    /// Monitor `inner` with the default scope geometry
    pub fn new(inner: W, buffer_length_seconds: f64) -> Self {
        Self::with_scope_config(inner, buffer_length_seconds, ScopeConfig::default())
    }

    /// Monitor `inner` with custom scope geometry
    pub fn with_scope_config(inner: W, buffer_length_seconds: f64, config: ScopeConfig) -> Self {
        let format = inner.format();
        let len = format.buffer_length(buffer_length_seconds);
        debug!(bytes = len, %format, "pcm monitor history allocated");
        let history = Arc::new(PcmHistory::new(len));
        let scope = Scope::new(history.clone(), format.bits, config);
        Self {
            inner,
            history,
            scope,
        }
    }

    /// Scope handle sharing this monitor's history and zoom
    pub fn scope(&self) -> Scope {
        self.scope.clone()
    }

    /// Recorded history
    pub fn history(&self) -> &PcmHistory {
        &self.history
    }

    /// Wrapped writer
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the inner writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: PcmWriter> PcmWriter for PcmMonitor<W> {
    fn format(&self) -> PcmFormat {
        self.inner.format()
    }

    fn write_pcm(&mut self, data: &[u8]) -> Result<usize> {
        self.history.write(data);
        self.inner.write_pcm(data)
    }
}
