//! Console commands for a live voice

use super::shared::{SharedPitch, SharedVolume, SharedWaveform};
use super::waveform::Waveform;
use crate::theory::step::HALF_STEP;
use crate::DawError;
use std::str::FromStr;

/// Volume change per `louder`/`softer` command
pub const VOLUME_STEP: f64 = 0.01;

/// One live edit of a voice
#[derive(Debug, Clone)]
pub enum VoiceCommand {
    /// Raise the pitch a half step
    Up,
    /// Lower the pitch a half step
    Down,
    /// Switch waveform, keeping phase
    Wave(Waveform),
    /// Raise the volume
    Louder,
    /// Lower the volume
    Softer,
}

impl FromStr for VoiceCommand {
    type Err = DawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "up" => Ok(VoiceCommand::Up),
            "down" => Ok(VoiceCommand::Down),
            "louder" | "+" => Ok(VoiceCommand::Louder),
            "softer" | "-" => Ok(VoiceCommand::Softer),
            other => other
                .parse::<Waveform>()
                .map(VoiceCommand::Wave)
                .map_err(|_| DawError::Config(format!("Unknown command '{}'", other))),
        }
    }
}

/// Handles to every live parameter of a voice (or of several voices sharing cells)
#[derive(Debug, Clone)]
pub struct VoiceControls {
    /// Pitch cell
    pub pitch: SharedPitch,
    /// Waveform cell
    pub waveform: SharedWaveform,
    /// Volume cell
    pub volume: SharedVolume,
}

impl VoiceControls {
    /// Apply one command
    pub fn apply(&self, command: &VoiceCommand) {
        match command {
            VoiceCommand::Up => {
                self.pitch.up(HALF_STEP);
            }
            VoiceCommand::Down => {
                self.pitch.down(HALF_STEP);
            }
            VoiceCommand::Wave(w) => self.waveform.set(w.clone()),
            VoiceCommand::Louder => self.volume.set(self.volume.get() + VOLUME_STEP),
            VoiceCommand::Softer => self.volume.set(self.volume.get() - VOLUME_STEP),
        }
    }

    /// Parse and apply a console line; unknown lines are returned as errors
    pub fn apply_line(&self, line: &str) -> crate::Result<VoiceCommand> {
        let command: VoiceCommand = line.parse()?;
        self.apply(&command);
        Ok(command)
    }
}

impl From<&super::PitchReader> for VoiceControls {
    fn from(reader: &super::PitchReader) -> Self {
        Self {
            pitch: reader.pitch(),
            waveform: reader.waveform(),
            volume: reader.volume(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcm::PcmFormat;
    use crate::synth::PitchReader;
    use crate::theory::pitch;
    use approx::assert_relative_eq;

    #[test]
    fn test_console_lines_drive_voice() {
        let reader = PitchReader::new(PcmFormat::default(), pitch::C5, Waveform::Sine, 0.05);
        let controls = VoiceControls::from(&reader);
        controls.apply_line("up").unwrap();
        assert_relative_eq!(reader.pitch().get().hz(), pitch::C5.up(HALF_STEP).hz());
        controls.apply_line("down").unwrap();
        assert_relative_eq!(reader.pitch().get().hz(), pitch::C5.hz(), epsilon = 1e-9);
        controls.apply_line("triangle").unwrap();
        assert_eq!(reader.waveform().get().name(), "triangle");
        controls.apply_line("saw").unwrap();
        assert_eq!(reader.waveform().get().name(), "saw");
        controls.apply_line("louder").unwrap();
        assert_relative_eq!(reader.volume().get(), 0.06);
        assert!(controls.apply_line("sideways").is_err());
    }
}
