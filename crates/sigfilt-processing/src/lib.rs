//! Sigfilt-Processing: offline filtering for biosignals and time series
//!
//! Butterworth IIR filters designed as cascaded second-order sections and
//! applied zero-phase, plus Savitzky-Golay polynomial smoothing.

pub mod filter;
pub mod butterworth;
pub mod zero_phase;
pub mod savgol;

pub use filter::{
    filter_signal, FilterMethod, FilterRequest, WindowLength, DEFAULT_ORDER
};
pub use butterworth::{design_butterworth, Band, Sos};
pub use zero_phase::sosfiltfilt;
pub use savgol::{derive_window_length, savgol_smooth};
