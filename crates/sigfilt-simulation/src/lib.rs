//! Sigfilt-Simulation: synthetic signal generation for tests and demos

pub mod waveforms;
pub mod generator;

pub use waveforms::Waveform;
pub use generator::SignalGenerator;
