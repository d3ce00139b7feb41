//! Zero-phase application of cascaded second-order sections
//!
//! Filters forward through the signal, then backward through the reversed
//! output, cancelling the phase response at the cost of doubling the
//! effective order. Both ends are padded with an odd (antisymmetric)
//! extension and each section is primed with its steady-state response so
//! startup transients stay out of the result.

use crate::butterworth::Sos;
use sigfilt_core::{FilterError, FilterResult};

/// Apply a cascade of second-order sections forward and backward.
///
/// The output has the same length as the input and no net phase delay.
/// Requires `3 * (2 * n_sections + 1)` samples of headroom for edge padding.
pub fn sosfiltfilt(sections: &[Sos], x: &[f64]) -> FilterResult<Vec<f64>> {
    let ntaps = 2 * sections.len() + 1;
    let padlen = 3 * ntaps;

    if x.len() <= padlen {
        return Err(FilterError::InputTooShort {
            required: padlen + 1,
            actual: x.len(),
        });
    }

    let extended = odd_extension(x, padlen);
    let zi = steady_state(sections);

    let forward = sosfilt(sections, &extended, &zi, extended[0]);

    let reversed: Vec<f64> = forward.into_iter().rev().collect();
    let backward = sosfilt(sections, &reversed, &zi, reversed[0]);

    let mut out: Vec<f64> = backward.into_iter().rev().collect();
    out.drain(..padlen);
    out.truncate(x.len());
    Ok(out)
}

/// Run the cascade once over `x` using Direct Form II Transposed sections,
/// with each section's state primed as `zi_unit * x0`
fn sosfilt(sections: &[Sos], x: &[f64], zi_unit: &[[f64; 2]], x0: f64) -> Vec<f64> {
    let mut state: Vec<[f64; 2]> = zi_unit
        .iter()
        .map(|z| [z[0] * x0, z[1] * x0])
        .collect();

    let mut y = Vec::with_capacity(x.len());
    for &sample in x {
        let mut value = sample;
        for (sos, st) in sections.iter().zip(state.iter_mut()) {
            let out = sos.b[0] * value + st[0];
            st[0] = sos.b[1] * value - sos.a[1] * out + st[1];
            st[1] = sos.b[2] * value - sos.a[2] * out;
            value = out;
        }
        y.push(value);
    }
    y
}

/// Per-section steady-state state for a unit-step input, chained through the
/// cascade by each section's DC gain. Scaling this by the first sample gives
/// initial conditions that start the filter already settled.
fn steady_state(sections: &[Sos]) -> Vec<[f64; 2]> {
    let mut zi = Vec::with_capacity(sections.len());
    let mut scale = 1.0;

    for sos in sections {
        let gain = sos.dc_gain();
        let s1 = sos.b[2] - sos.a[2] * gain;
        let s0 = sos.b[1] - sos.a[1] * gain + s1;
        zi.push([s0 * scale, s1 * scale]);
        scale *= gain;
    }
    zi
}

/// Antisymmetric reflection about the end samples: x[-k] = 2*x[0] - x[k]
fn odd_extension(x: &[f64], padlen: usize) -> Vec<f64> {
    let n = x.len();
    let first = x[0];
    let last = x[n - 1];

    let mut extended = Vec::with_capacity(n + 2 * padlen);
    for k in (1..=padlen).rev() {
        extended.push(2.0 * first - x[k]);
    }
    extended.extend_from_slice(x);
    for k in 1..=padlen {
        extended.push(2.0 * last - x[n - 1 - k]);
    }
    extended
}
