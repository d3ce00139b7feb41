//! Pre-defined waveform patterns for synthetic test signals

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Deterministic waveform patterns evaluated per time point
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Waveform {
    /// Constant level
    Constant { level: f64 },
    /// Single sinusoid
    Sine { frequency: f64, amplitude: f64 },
    /// Sum of sinusoids, one (frequency, amplitude) pair per tone
    MultiTone { tones: Vec<(f64, f64)> },
    /// Linear ramp between two levels over a duration
    Ramp {
        start_level: f64,
        end_level: f64,
        duration: f64,
    },
}

impl Waveform {
    /// Evaluate the waveform at the given time in seconds
    pub fn value_at(&self, time: f64) -> f64 {
        match self {
            Waveform::Constant { level } => *level,

            Waveform::Sine { frequency, amplitude } => {
                amplitude * (2.0 * PI * frequency * time).sin()
            }

            Waveform::MultiTone { tones } => tones
                .iter()
                .map(|(frequency, amplitude)| amplitude * (2.0 * PI * frequency * time).sin())
                .sum(),

            Waveform::Ramp { start_level, end_level, duration } => {
                if time >= *duration {
                    *end_level
                } else {
                    start_level + (end_level - start_level) * (time / duration)
                }
            }
        }
    }

    /// Get pattern description
    pub fn description(&self) -> &'static str {
        match self {
            Waveform::Constant { .. } => "Constant level",
            Waveform::Sine { .. } => "Single sinusoid",
            Waveform::MultiTone { .. } => "Multi-tone mixture",
            Waveform::Ramp { .. } => "Linear ramp",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_peaks_at_quarter_period() {
        let wave = Waveform::Sine { frequency: 1.0, amplitude: 2.0 };
        assert!((wave.value_at(0.25) - 2.0).abs() < 1e-12);
        assert!(wave.value_at(0.0).abs() < 1e-12);
    }

    #[test]
    fn test_multi_tone_superposition() {
        let wave = Waveform::MultiTone {
            tones: vec![(1.0, 1.0), (50.0, 1.0)],
        };
        let single_a = Waveform::Sine { frequency: 1.0, amplitude: 1.0 };
        let single_b = Waveform::Sine { frequency: 50.0, amplitude: 1.0 };

        let t = 0.0137;
        assert!((wave.value_at(t) - (single_a.value_at(t) + single_b.value_at(t))).abs() < 1e-12);
    }

    #[test]
    fn test_ramp_holds_end_level() {
        let wave = Waveform::Ramp {
            start_level: 0.0,
            end_level: 1.0,
            duration: 2.0,
        };
        assert!((wave.value_at(1.0) - 0.5).abs() < 1e-12);
        assert!((wave.value_at(5.0) - 1.0).abs() < 1e-12);
    }
}
