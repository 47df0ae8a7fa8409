//! MP3 file source (symphonia)

use crate::pcm::{encode_sample, PcmFormat, PcmReader};
use crate::{DawError, Result};
use std::collections::VecDeque;
use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::{Decoder, DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::{MediaSource, MediaSourceStream};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::{debug, warn};

/// Decodes an MP3 stream packet by packet into 32-bit PCM
pub struct Mp3Source {
    reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    format: PcmFormat,
    pending: VecDeque<i32>,
    finished: bool,
}

impl Mp3Source {
    /// Open an MP3 file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }
        let source = Self::from_media(Box::new(file), hint)?;
        debug!(path = %path.display(), format = %source.format, "opened mp3");
        Ok(source)
    }

    /// Decode from any media source
    pub fn from_media(media: Box<dyn MediaSource>, hint: Hint) -> Result<Self> {
        let mss = MediaSourceStream::new(media, Default::default());
        let detected = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| DawError::Decode(e.to_string()))?;
        let reader = detected.format;

        let track = reader
            .tracks()
            .iter()
            .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
            .ok_or_else(|| DawError::Decode("no audio track found".into()))?;
        let track_id = track.id;
        let params = track.codec_params.clone();

        let sample_rate = params
            .sample_rate
            .ok_or_else(|| DawError::Decode("stream has no sample rate".into()))?;
        let channels = params.channels.map(|c| c.count() as u16).unwrap_or(2);
        let format = PcmFormat::new(sample_rate, channels, 32);
        format.validate()?;

        let decoder = symphonia::default::get_codecs()
            .make(&params, &DecoderOptions::default())
            .map_err(|e| DawError::Decode(e.to_string()))?;

        Ok(Self {
            reader,
            decoder,
            track_id,
            format,
            pending: VecDeque::new(),
            finished: false,
        })
    }

    /// Decode the next packet of our track into `pending`.
    ///
    /// Returns false at end of stream.
    fn decode_next(&mut self) -> Result<bool> {
        loop {
            let packet = match self.reader.next_packet() {
                Ok(p) => p,
                Err(SymphoniaError::IoError(ref e))
                    if e.kind() == std::io::ErrorKind::UnexpectedEof =>
                {
                    return Ok(false);
                }
                Err(SymphoniaError::ResetRequired) => {
                    debug!("mp3 stream requested decoder reset");
                    self.decoder.reset();
                    continue;
                }
                Err(e) => return Err(DawError::Decode(e.to_string())),
            };
            if packet.track_id() != self.track_id {
                continue;
            }
            let decoded = match self.decoder.decode(&packet) {
                Ok(d) => d,
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!(error = e, "skipping corrupt mp3 packet");
                    continue;
                }
                Err(e) => return Err(DawError::Decode(e.to_string())),
            };
            let spec = *decoded.spec();
            let mut buf = SampleBuffer::<f32>::new(decoded.capacity() as u64, spec);
            buf.copy_interleaved_ref(decoded);
            self.pending.extend(
                buf.samples()
                    .iter()
                    .map(|&s| (s as f64 * i32::MAX as f64) as i32),
            );
            return Ok(true);
        }
    }
}

impl PcmReader for Mp3Source {
    fn format(&self) -> PcmFormat {
        self.format
    }

    fn read_pcm(&mut self, data: &mut [u8]) -> Result<usize> {
        let stride = self.format.frame_stride();
        let channels = self.format.channels as usize;
        let mut written = 0;
        for frame in data.chunks_exact_mut(stride) {
            while self.pending.len() < channels && !self.finished {
                if !self.decode_next()? {
                    self.finished = true;
                }
            }
            if self.pending.len() < channels {
                break;
            }
            for slot in frame.chunks_exact_mut(4) {
                let sample = self.pending.pop_front().unwrap_or(0);
                encode_sample(slot, sample);
            }
            written += stride;
        }
        Ok(written)
    }

    fn rewind(&mut self) -> Result<()> {
        self.reader
            .seek(
                SeekMode::Coarse,
                SeekTo::TimeStamp {
                    ts: 0,
                    track_id: self.track_id,
                },
            )
            .map_err(|e| DawError::Decode(e.to_string()))?;
        self.decoder.reset();
        self.pending.clear();
        self.finished = false;
        Ok(())
    }
}

impl std::fmt::Debug for Mp3Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mp3Source")
            .field("format", &self.format)
            .field("track_id", &self.track_id)
            .finish()
    }
}
