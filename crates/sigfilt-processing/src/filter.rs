//! Filter specification and dispatch
//!
//! The entry point for the filtering pipeline: a validated request selects
//! identity passthrough, the Butterworth path (design + zero-phase
//! application), or the Savitzky-Golay path, and the result is repackaged
//! into a signal of identical length and alignment.

use crate::butterworth::{design_butterworth, Band};
use crate::savgol::savgol_smooth;
use crate::zero_phase::sosfiltfilt;
use serde::{Deserialize, Serialize};
use sigfilt_core::{FilterError, FilterResult, Signal};

/// Default filter order when the caller does not choose one
pub const DEFAULT_ORDER: usize = 2;

/// Savitzky-Golay window length: automatic (derived from the sampling rate)
/// or an explicit odd sample count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WindowLength {
    /// Derive from the sampling rate (one tenth of a second of samples,
    /// rounded up to odd)
    Auto,
    /// Explicit window length; must be odd and exceed the polynomial order
    Fixed(usize),
}

/// Filtering method with its method-specific parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMethod {
    /// Butterworth IIR filtering, applied zero-phase
    Butterworth { order: usize },
    /// Savitzky-Golay polynomial smoothing
    SavitzkyGolay { order: usize, window: WindowLength },
}

impl Default for FilterMethod {
    fn default() -> Self {
        FilterMethod::Butterworth { order: DEFAULT_ORDER }
    }
}

impl FilterMethod {
    /// Resolve a loosely-typed method name. The aliases "sg", "savgol" and
    /// "savitzky-golay" (case-insensitive) select the smoothing path; any
    /// other name selects Butterworth.
    pub fn parse(name: &str, order: usize, window: WindowLength) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "sg" | "savgol" | "savitzky-golay" => FilterMethod::SavitzkyGolay { order, window },
            _ => FilterMethod::Butterworth { order },
        }
    }

    /// Filter order / polynomial degree of this method
    pub fn order(&self) -> usize {
        match self {
            FilterMethod::Butterworth { order } => *order,
            FilterMethod::SavitzkyGolay { order, .. } => *order,
        }
    }
}

/// A complete filtering request
///
/// The cutoffs select the band: both present means bandpass, only `lowcut`
/// means highpass, only `highcut` means lowpass. With neither present the
/// request is an intentional no-op and the signal passes through unchanged.
/// The smoothing path ignores the cutoffs but still requires one to be
/// present to trigger filtering at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FilterRequest {
    /// Lower cutoff frequency in Hz
    pub lowcut: Option<f64>,
    /// Upper cutoff frequency in Hz
    pub highcut: Option<f64>,
    /// Filtering method
    pub method: FilterMethod,
}

impl FilterRequest {
    /// Lowpass filter: attenuate above `highcut` Hz
    pub fn lowpass(highcut: f64, order: usize) -> Self {
        Self {
            lowcut: None,
            highcut: Some(highcut),
            method: FilterMethod::Butterworth { order },
        }
    }

    /// Highpass filter: attenuate below `lowcut` Hz
    pub fn highpass(lowcut: f64, order: usize) -> Self {
        Self {
            lowcut: Some(lowcut),
            highcut: None,
            method: FilterMethod::Butterworth { order },
        }
    }

    /// Bandpass filter: keep the band between `lowcut` and `highcut` Hz
    pub fn bandpass(lowcut: f64, highcut: f64, order: usize) -> Self {
        Self {
            lowcut: Some(lowcut),
            highcut: Some(highcut),
            method: FilterMethod::Butterworth { order },
        }
    }

    /// Savitzky-Golay smoothing. The cutoff only marks the request as an
    /// active filter (and is validated against Nyquist); the smoothing
    /// itself is driven by the polynomial order and window length.
    pub fn smoothing(highcut: f64, order: usize, window: WindowLength) -> Self {
        Self {
            lowcut: None,
            highcut: Some(highcut),
            method: FilterMethod::SavitzkyGolay { order, window },
        }
    }

    /// A request with no cutoffs: identity passthrough
    pub fn passthrough() -> Self {
        Self {
            lowcut: None,
            highcut: None,
            method: FilterMethod::default(),
        }
    }
}

/// Filter a signal according to the request.
///
/// Returns a new signal of identical length and sample alignment. With both
/// cutoffs absent the input is returned unchanged; this bypasses all
/// order/window validation and is not an error. Otherwise validation runs
/// before any numeric work and the request is routed to the Butterworth or
/// Savitzky-Golay path.
pub fn filter_signal(signal: &Signal, request: &FilterRequest) -> FilterResult<Signal> {
    if request.lowcut.is_none() && request.highcut.is_none() {
        return Ok(signal.clone());
    }

    validate(signal, request)?;

    let filtered = match request.method {
        FilterMethod::SavitzkyGolay { order, window } => {
            savgol_smooth(signal.samples(), signal.sampling_rate(), order, window)?
        }
        FilterMethod::Butterworth { order } => {
            let band = match (request.lowcut, request.highcut) {
                (Some(low), Some(high)) => Band::Bandpass { low, high },
                (Some(low), None) => Band::Highpass { low },
                (None, Some(high)) => Band::Lowpass { high },
                (None, None) => unreachable!("handled by the passthrough branch"),
            };
            let sections = design_butterworth(order, band, signal.sampling_rate())?;
            sosfiltfilt(&sections, signal.samples())?
        }
    };

    signal.with_samples(filtered)
}

fn validate(signal: &Signal, request: &FilterRequest) -> FilterResult<()> {
    let nyquist = signal.nyquist();

    for (name, cutoff) in [("lowcut", request.lowcut), ("highcut", request.highcut)] {
        if let Some(c) = cutoff {
            if !c.is_finite() || c <= 0.0 {
                return Err(FilterError::InvalidParameter {
                    reason: format!("{} must be a positive frequency, got {}", name, c),
                });
            }
            if c >= nyquist {
                return Err(FilterError::InvalidParameter {
                    reason: format!(
                        "{} of {} Hz must be below the Nyquist frequency of {} Hz",
                        name, c, nyquist
                    ),
                });
            }
        }
    }

    if let (Some(low), Some(high)) = (request.lowcut, request.highcut) {
        if low >= high {
            return Err(FilterError::InvalidParameter {
                reason: format!("lowcut {} Hz must be below highcut {} Hz", low, high),
            });
        }
    }

    if request.method.order() < 1 {
        return Err(FilterError::InvalidParameter {
            reason: "filter order must be at least 1".to_string(),
        });
    }

    Ok(())
}
