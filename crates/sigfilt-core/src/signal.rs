//! Signal: container for one uniformly sampled channel

use crate::error::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};

/// A finite, uniformly sampled real-valued time series.
///
/// Samples are stored without timestamps; the sampling rate is implicit and
/// fixed for the whole sequence. A `Signal` is an immutable value object:
/// filtering operations read it and produce a new `Signal` of equal length.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    data: Vec<f64>,
    sampling_rate: f64,
}

impl Signal {
    /// Create a new signal from samples and a sampling rate in Hz
    pub fn new(data: Vec<f64>, sampling_rate: f64) -> FilterResult<Self> {
        if data.is_empty() {
            return Err(FilterError::InvalidSignal {
                reason: "signal must contain at least one sample".to_string(),
            });
        }

        if !sampling_rate.is_finite() || sampling_rate <= 0.0 {
            return Err(FilterError::InvalidSignal {
                reason: format!("sampling rate must be a positive finite value, got {}", sampling_rate),
            });
        }

        Ok(Signal { data, sampling_rate })
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the signal is empty (cannot happen for a validated signal)
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Sample values
    pub fn samples(&self) -> &[f64] {
        &self.data
    }

    /// Sampling rate in Hz
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    /// Nyquist frequency: half the sampling rate
    pub fn nyquist(&self) -> f64 {
        self.sampling_rate / 2.0
    }

    /// Signal duration in seconds
    pub fn duration(&self) -> f64 {
        self.data.len() as f64 / self.sampling_rate
    }

    /// Time vector for plotting
    pub fn time_vector(&self) -> Vec<f64> {
        let dt = 1.0 / self.sampling_rate;

        (0..self.data.len())
            .map(|i| i as f64 * dt)
            .collect()
    }

    /// Repackage processed samples with this signal's sampling rate,
    /// preserving sample alignment with the source
    pub fn with_samples(&self, data: Vec<f64>) -> FilterResult<Signal> {
        Signal::new(data, self.sampling_rate)
    }

    /// Calculate basic statistics over the samples
    pub fn stats(&self) -> SignalStats {
        SignalStats::calculate(&self.data)
    }
}

/// Basic statistics for a signal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalStats {
    pub mean: f64,
    pub rms: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub peak_to_peak: f64,
}

impl SignalStats {
    pub fn calculate(data: &[f64]) -> Self {
        if data.is_empty() {
            return Self {
                mean: 0.0,
                rms: 0.0,
                std_dev: 0.0,
                min: 0.0,
                max: 0.0,
                peak_to_peak: 0.0,
            };
        }

        let sum: f64 = data.iter().sum();
        let mean = sum / data.len() as f64;

        let sum_sq: f64 = data.iter().map(|x| x * x).sum();
        let rms = (sum_sq / data.len() as f64).sqrt();

        let variance: f64 = data.iter()
            .map(|x| (x - mean).powi(2))
            .sum::<f64>() / data.len() as f64;
        let std_dev = variance.sqrt();

        let min = data.iter().fold(f64::INFINITY, |a, &b| a.min(b));
        let max = data.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let peak_to_peak = max - min;

        Self {
            mean,
            rms,
            std_dev,
            min,
            max,
            peak_to_peak,
        }
    }
}
