//! Waveform shapes
//!
//! Every built-in shape maps a sample's phase and the voice volume to an
//! amplitude in `[-volume, volume]`. User shapes plug in through
//! [`WaveShape`] via [`Waveform::Custom`].

use super::phase::{mod_phase, phase};
use crate::theory::Pitch;
use crate::DawError;
use rand::Rng;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Everything a shape needs to compute one sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveInput {
    /// Current pitch of the voice
    pub pitch: Pitch,
    /// Sample index (the voice's phase counter)
    pub index: u64,
    /// Output sample rate in Hz
    pub sample_rate: u32,
    /// Voice volume in `[0, 1]`
    pub volume: f64,
}

impl WaveInput {
    /// Phase reduced into one period
    pub fn mod_phase(&self) -> f64 {
        mod_phase(self.pitch, self.index, self.sample_rate)
    }

    /// Unbounded phase
    pub fn phase(&self) -> f64 {
        phase(self.pitch, self.index, self.sample_rate)
    }
}

/// Capability implemented by anything that can shape a voice
pub trait WaveShape: Send + Sync {
    /// Amplitude for one sample, including volume
    fn sample(&self, input: &WaveInput) -> f64;
}

impl<F> WaveShape for F
where
    F: Fn(&WaveInput) -> f64 + Send + Sync,
{
    fn sample(&self, input: &WaveInput) -> f64 {
        self(input)
    }
}

/// Built-in shapes plus a user-supplied escape hatch
#[derive(Clone)]
pub enum Waveform {
    /// `sin(phase) × volume`
    Sine,
    /// Falling ramp from `+volume` to `-volume` once per period
    Sawtooth,
    /// Linear ramps between `-volume` and `+volume`
    Triangle,
    /// 50% duty pulse
    Square,
    /// Uniform white noise; ignores pitch
    Noise,
    /// User-supplied shape
    Custom(Arc<dyn WaveShape>),
}

impl Waveform {
    /// Wrap a closure or other [`WaveShape`] as a waveform
    pub fn custom<S: WaveShape + 'static>(shape: S) -> Self {
        Waveform::Custom(Arc::new(shape))
    }

    /// Console/config name of the waveform
    pub fn name(&self) -> &'static str {
        match self {
            Waveform::Sine => "sin",
            Waveform::Sawtooth => "saw",
            Waveform::Triangle => "triangle",
            Waveform::Square => "square",
            Waveform::Noise => "noise",
            Waveform::Custom(_) => "custom",
        }
    }
}

impl Default for Waveform {
    fn default() -> Self {
        Waveform::Sine
    }
}

impl WaveShape for Waveform {
    fn sample(&self, input: &WaveInput) -> f64 {
        let volume = input.volume;
        match self {
            Waveform::Sine => sine(input.mod_phase(), volume),
            Waveform::Sawtooth => sawtooth(input.mod_phase(), volume),
            Waveform::Triangle => triangle(input.mod_phase(), volume),
            Waveform::Square => square(input.phase(), volume),
            Waveform::Noise => noise(volume),
            Waveform::Custom(shape) => shape.sample(input),
        }
    }
}

impl fmt::Debug for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Waveform {
    type Err = DawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sin" | "sine" => Ok(Waveform::Sine),
            "saw" | "sawtooth" => Ok(Waveform::Sawtooth),
            "triangle" | "tri" => Ok(Waveform::Triangle),
            "square" | "pulse" => Ok(Waveform::Square),
            "noise" => Ok(Waveform::Noise),
            other => Err(DawError::Config(format!("Unknown waveform '{}'", other))),
        }
    }
}

/// Sine over a reduced phase
pub fn sine(mod_phase: f64, volume: f64) -> f64 {
    mod_phase.sin() * volume
}

/// Sawtooth over a reduced phase: `+volume` at 0 falling to `-volume` at 2π
pub fn sawtooth(mod_phase: f64, volume: f64) -> f64 {
    volume - (volume / PI * mod_phase)
}

/// Triangle over a reduced phase.
///
/// Rises from `-volume` to `+volume` over the first half period and falls
/// back over the second. Phase 0 belongs to the rising half so the start of
/// each period is `-volume`.
pub fn triangle(mod_phase: f64, volume: f64) -> f64 {
    let m = mod_phase * (2.0 * volume / PI);
    if mod_phase < PI {
        -volume + m
    } else {
        3.0 * volume - m
    }
}

/// 50% duty square; the sign test works on any phase, reduced or not
pub fn square(phase: f64, volume: f64) -> f64 {
    if phase.sin() > 0.0 {
        volume
    } else {
        -volume
    }
}

/// Uniform noise in `[-volume, volume]`
pub fn noise(volume: f64) -> f64 {
    if volume == 0.0 {
        return 0.0;
    }
    rand::thread_rng().gen_range(-volume..=volume)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn input(index: u64, volume: f64) -> WaveInput {
        WaveInput {
            pitch: Pitch::new(261.63),
            index,
            sample_rate: 44_100,
            volume,
        }
    }

    #[test]
    fn test_builtin_shapes_bounded_by_volume() {
        let shapes = [
            Waveform::Sine,
            Waveform::Sawtooth,
            Waveform::Triangle,
            Waveform::Square,
            Waveform::Noise,
        ];
        for shape in shapes.iter() {
            for &volume in &[0.0, 0.05, 0.5, 1.0] {
                for index in (0..200_000u64).step_by(7) {
                    let v = shape.sample(&input(index, volume));
                    assert!(
                        v >= -volume - 1e-12 && v <= volume + 1e-12,
                        "{:?} produced {} at index {} (volume {})",
                        shape,
                        v,
                        index,
                        volume
                    );
                }
            }
        }
    }

    #[test]
    fn test_triangle_corners() {
        assert_abs_diff_eq!(triangle(0.0, 0.5), -0.5);
        assert_abs_diff_eq!(triangle(PI / 2.0, 0.5), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(triangle(PI, 0.5), 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(triangle(1.5 * PI, 0.5), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sawtooth_ramp() {
        assert_abs_diff_eq!(sawtooth(0.0, 1.0), 1.0);
        assert_abs_diff_eq!(sawtooth(PI, 1.0), 0.0, epsilon = 1e-12);
        assert!(sawtooth(2.0 * PI - 1e-9, 1.0) > -1.0);
    }

    #[test]
    fn test_square_levels() {
        assert_eq!(square(PI / 2.0, 0.3), 0.3);
        assert_eq!(square(1.5 * PI, 0.3), -0.3);
        assert_eq!(square(0.0, 0.3), -0.3);
    }

    #[test]
    fn test_custom_shape() {
        let dc = Waveform::custom(|input: &WaveInput| input.volume * 0.5);
        assert_eq!(dc.sample(&input(3, 0.8)), 0.4);
        assert_eq!(dc.name(), "custom");
    }

    #[test]
    fn test_parse_console_names() {
        for (name, expected) in [("sin", "sin"), ("saw", "saw"), ("triangle", "triangle"), ("square", "square")] {
            assert_eq!(name.parse::<Waveform>().unwrap().name(), expected);
        }
        assert!("wobble".parse::<Waveform>().is_err());
    }
}
