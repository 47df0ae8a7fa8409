//! Loop and one-shot playback

use super::{CancelToken, ErrorPolicy, LoopExit};
use crate::config::{DawConfig, DEFAULT_LOOP_BUFFER_FRAMES};
use crate::pcm::{PcmReader, PcmWriter};
use crate::{DawError, Result};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Pause after a failed iteration before trying again
pub const ERROR_BACKOFF_MICROS: u64 = 100;

/// Loop buffer size and failure behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOptions {
    /// Frames pulled per iteration
    pub buffer_frames: usize,
    /// What to do when a read or write fails
    pub error_policy: ErrorPolicy,
}

impl Default for LoopOptions {
    fn default() -> Self {
        Self {
            buffer_frames: DEFAULT_LOOP_BUFFER_FRAMES,
            error_policy: ErrorPolicy::Ignore,
        }
    }
}

impl From<&DawConfig> for LoopOptions {
    fn from(config: &DawConfig) -> Self {
        Self {
            buffer_frames: config.loop_buffer_frames,
            error_policy: config.error_policy,
        }
    }
}

/// Running totals for one loop
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Completed read/write iterations
    pub iterations: u64,
    /// Bytes accepted by the writer
    pub bytes_written: u64,
    /// Failed reads or writes
    pub errors: u64,
    /// Times the source was rewound after running dry
    pub rewinds: u64,
}

#[derive(Debug, Default)]
struct LoopShared {
    stats: Mutex<LoopStats>,
    last_error: Mutex<Option<Arc<DawError>>>,
}

impl LoopShared {
    fn record_error(&self, err: DawError) -> Arc<DawError> {
        let err = Arc::new(err);
        self.stats.lock().errors += 1;
        *self.last_error.lock() = Some(err.clone());
        err
    }
}

/// Handle to a loop running on its own thread.
///
/// Dropping the handle detaches the loop; it keeps running until its token
/// is cancelled from elsewhere.
#[derive(Debug)]
pub struct LoopHandle {
    token: CancelToken,
    shared: Arc<LoopShared>,
    thread: JoinHandle<LoopExit>,
}

impl LoopHandle {
    /// Ask the loop to stop after its current iteration
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Token controlling this loop
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Most recent read or write error, if any occurred
    pub fn last_error(&self) -> Option<Arc<DawError>> {
        self.shared.last_error.lock().clone()
    }

    /// Snapshot of the loop's counters
    pub fn stats(&self) -> LoopStats {
        *self.shared.stats.lock()
    }

    /// True once the loop thread has returned
    pub fn is_finished(&self) -> bool {
        self.thread.is_finished()
    }

    /// Wait for the loop to end and report why
    pub fn join(self) -> Result<LoopExit> {
        self.thread
            .join()
            .map_err(|_| DawError::Other("loop thread panicked".into()))
    }
}

/// Loop `src` into `dst` until the returned handle is cancelled.
///
/// A source that runs dry is rewound and continues from the start.
pub fn loop_pcm<W, R>(dst: W, src: R) -> LoopHandle
where
    W: PcmWriter + 'static,
    R: PcmReader + 'static,
{
    loop_with_token(CancelToken::new(), dst, src)
}

/// Loop `src` into `dst` until `token` is cancelled or its deadline passes
pub fn loop_with_token<W, R>(token: CancelToken, dst: W, src: R) -> LoopHandle
where
    W: PcmWriter + 'static,
    R: PcmReader + 'static,
{
    loop_with_options(token, dst, src, LoopOptions::default())
}

/// [`loop_with_token`] with explicit buffer size and error policy
pub fn loop_with_options<W, R>(
    token: CancelToken,
    mut dst: W,
    mut src: R,
    options: LoopOptions,
) -> LoopHandle
where
    W: PcmWriter + 'static,
    R: PcmReader + 'static,
{
    let shared = Arc::new(LoopShared::default());
    let thread_token = token.clone();
    let thread_shared = Arc::clone(&shared);
    let thread = std::thread::spawn(move || {
        let exit = run_loop(&thread_token, &mut dst, &mut src, options, &thread_shared);
        let stats = *thread_shared.stats.lock();
        info!(
            reason = %exit,
            iterations = stats.iterations,
            bytes = stats.bytes_written,
            errors = stats.errors,
            "loop stopped"
        );
        exit
    });
    LoopHandle {
        token,
        shared,
        thread,
    }
}

fn run_loop<W, R>(
    token: &CancelToken,
    dst: &mut W,
    src: &mut R,
    options: LoopOptions,
    shared: &LoopShared,
) -> LoopExit
where
    W: PcmWriter + ?Sized,
    R: PcmReader + ?Sized,
{
    let format = src.format();
    let stride = format.frame_stride().max(1);
    let mut buf = vec![0u8; options.buffer_frames.max(1) * stride];
    info!(%format, buffer_bytes = buf.len(), policy = ?options.error_policy, "loop started");

    loop {
        if let Some(reason) = token.stop_reason() {
            return reason;
        }
        let step = read_looping(src, &mut buf, shared).and_then(|n| match n {
            0 => Ok(None),
            n => dst.write_pcm(&buf[..n]).map(Some),
        });
        match step {
            Ok(Some(written)) => {
                let mut stats = shared.stats.lock();
                stats.iterations += 1;
                stats.bytes_written += written as u64;
            }
            Ok(None) => return LoopExit::Exhausted,
            Err(err) => {
                let err = shared.record_error(err);
                match options.error_policy {
                    ErrorPolicy::Stop => {
                        warn!(error = %err, "loop stopping on error");
                        return LoopExit::Failed;
                    }
                    ErrorPolicy::Ignore => {
                        if shared.stats.lock().errors == 1 {
                            warn!(error = %err, "loop error ignored; further errors logged at debug");
                        } else {
                            debug!(error = %err, "loop error ignored");
                        }
                        std::thread::sleep(Duration::from_micros(ERROR_BACKOFF_MICROS));
                    }
                }
            }
        }
    }
}

/// Read into `buf`, rewinding once if the source is dry
fn read_looping<R: PcmReader + ?Sized>(src: &mut R, buf: &mut [u8], shared: &LoopShared) -> Result<usize> {
    let n = src.read_pcm(buf)?;
    if n > 0 {
        return Ok(n);
    }
    src.rewind()?;
    shared.stats.lock().rewinds += 1;
    src.read_pcm(buf)
}

/// Play `src` into `dst` once, on this thread, until the source is exhausted.
///
/// Returns the number of bytes written. Errors end playback immediately.
pub fn play_to<W, R>(dst: &mut W, src: &mut R) -> Result<usize>
where
    W: PcmWriter + ?Sized,
    R: PcmReader + ?Sized,
{
    play_until(&CancelToken::new(), dst, src)
}

/// [`play_to`] that also stops when `token` is cancelled
pub fn play_until<W, R>(token: &CancelToken, dst: &mut W, src: &mut R) -> Result<usize>
where
    W: PcmWriter + ?Sized,
    R: PcmReader + ?Sized,
{
    let stride = src.format().frame_stride().max(1);
    let mut buf = vec![0u8; DEFAULT_LOOP_BUFFER_FRAMES * stride];
    let mut total = 0;
    while !token.is_cancelled() {
        let n = src.read_pcm(&mut buf)?;
        if n == 0 {
            break;
        }
        total += dst.write_pcm(&buf[..n])?;
    }
    debug!(bytes = total, "playback finished");
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::{BufferReader, MemoryWriter, PcmFormat};

    fn format() -> PcmFormat {
        PcmFormat::new(8_000, 1, 16)
    }

    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl PcmWriter for SharedSink {
        fn format(&self) -> PcmFormat {
            format()
        }

        fn write_pcm(&mut self, data: &[u8]) -> Result<usize> {
            self.0.lock().extend_from_slice(data);
            Ok(data.len())
        }
    }

    struct Broken;

    impl PcmWriter for Broken {
        fn format(&self) -> PcmFormat {
            format()
        }

        fn write_pcm(&mut self, _data: &[u8]) -> Result<usize> {
            Err(DawError::AudioDevice("gone".into()))
        }
    }

    #[test]
    fn test_play_to_drains_source() {
        let mut src = BufferReader::new(format(), (0..100u8).collect());
        let mut dst = MemoryWriter::new(format());
        assert_eq!(play_to(&mut dst, &mut src).unwrap(), 100);
        assert_eq!(dst.data(), (0..100u8).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_loop_rewinds_finite_source() {
        let sink = SharedSink::default();
        let token = CancelToken::new();
        let handle = loop_with_options(
            token.clone(),
            sink.clone(),
            BufferReader::new(format(), vec![1, 2, 3, 4]),
            LoopOptions {
                buffer_frames: 2,
                ..LoopOptions::default()
            },
        );
        while sink.0.lock().len() < 12 {
            std::thread::yield_now();
        }
        token.cancel();
        assert_eq!(handle.join().unwrap(), LoopExit::Cancelled);
        assert_eq!(&sink.0.lock()[..12], &[1, 2, 3, 4, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_empty_source_exhausts() {
        let handle = loop_pcm(SharedSink::default(), BufferReader::new(format(), Vec::new()));
        assert_eq!(handle.join().unwrap(), LoopExit::Exhausted);
    }

    #[test]
    fn test_stop_policy_records_error() {
        let handle = loop_with_options(
            CancelToken::new(),
            Broken,
            BufferReader::new(format(), vec![0; 8]),
            LoopOptions {
                error_policy: ErrorPolicy::Stop,
                ..LoopOptions::default()
            },
        );
        while !handle.is_finished() {
            std::thread::yield_now();
        }
        let err = handle.last_error().unwrap();
        assert!(matches!(*err, DawError::AudioDevice(_)));
        assert_eq!(handle.stats().errors, 1);
        assert_eq!(handle.join().unwrap(), LoopExit::Failed);
    }

    #[test]
    fn test_ignore_policy_keeps_looping() {
        let handle = loop_pcm(Broken, BufferReader::new(format(), vec![0; 8]));
        while handle.stats().errors < 2 {
            std::thread::yield_now();
        }
        assert!(!handle.is_finished());
        assert!(handle.last_error().is_some());
        assert_eq!(handle.stats().bytes_written, 0);
        handle.cancel();
        assert_eq!(handle.join().unwrap(), LoopExit::Cancelled);
    }
}
