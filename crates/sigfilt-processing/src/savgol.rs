//! Savitzky-Golay polynomial smoothing
//!
//! Fits a least-squares polynomial over a sliding window and evaluates the
//! fit at the window center. The normal equations are solved once per call
//! via a Gauss-Jordan inverse of the Vandermonde Gram matrix; the full
//! pseudo-inverse is kept so the fitted polynomial can also be evaluated at
//! off-center offsets, which is how the two signal ends are handled: the
//! first and last full windows' fits are evaluated at the edge positions
//! (shifted-window policy). A polynomial of degree <= order therefore passes
//! through unchanged, edges included.

use crate::filter::WindowLength;
use sigfilt_core::{FilterError, FilterResult};

/// Smooth a signal with a Savitzky-Golay filter of the given polynomial
/// order and window length. Output length equals input length.
pub fn savgol_smooth(
    x: &[f64],
    sampling_rate: f64,
    order: usize,
    window: WindowLength,
) -> FilterResult<Vec<f64>> {
    let n = x.len();

    let window_length = match window {
        WindowLength::Fixed(w) => {
            if w % 2 == 0 {
                return Err(FilterError::InvalidParameter {
                    reason: format!("window length must be odd, got {}", w),
                });
            }
            if w <= order {
                return Err(FilterError::InvalidParameter {
                    reason: format!(
                        "window length {} must exceed the polynomial order {}",
                        w, order
                    ),
                });
            }
            if w > n {
                return Err(FilterError::InvalidParameter {
                    reason: format!("window length {} exceeds signal length {}", w, n),
                });
            }
            w
        }
        WindowLength::Auto => {
            let w = derive_window_length(sampling_rate, order);
            if w > n {
                return Err(FilterError::InputTooShort {
                    required: w,
                    actual: n,
                });
            }
            w
        }
    };

    let pinv = pseudo_inverse(window_length, order)?;
    let half = window_length / 2;

    // weights for evaluating the window fit at offset t from its center
    let weights_at = |t: f64| -> Vec<f64> {
        (0..window_length)
            .map(|i| {
                let mut acc = 0.0;
                for row in pinv.iter().rev() {
                    acc = acc * t + row[i];
                }
                acc
            })
            .collect()
    };

    let center = weights_at(0.0);
    let mut y = vec![0.0; n];

    for i in half..n - half {
        y[i] = dot(&center, &x[i - half..i - half + window_length]);
    }

    // leading edge: first full window, evaluated left of center
    for i in 0..half {
        let t = i as f64 - half as f64;
        y[i] = dot(&weights_at(t), &x[..window_length]);
    }

    // trailing edge: last full window, evaluated right of center
    for i in n - half..n {
        let t = (i + half + 1 - n) as f64;
        y[i] = dot(&weights_at(t), &x[n - window_length..]);
    }

    Ok(y)
}

/// Derive the automatic window length from the sampling rate: one tenth of a
/// second of samples, rounded up to the next odd value, and never smaller
/// than the smallest odd value exceeding the polynomial order.
pub fn derive_window_length(sampling_rate: f64, order: usize) -> usize {
    let mut w = (sampling_rate / 10.0).round() as usize;
    if w % 2 == 0 {
        w += 1;
    }
    if w <= order {
        w = order + 1;
        if w % 2 == 0 {
            w += 1;
        }
    }
    w
}

fn dot(weights: &[f64], samples: &[f64]) -> f64 {
    weights.iter().zip(samples).map(|(w, s)| w * s).sum()
}

/// Pseudo-inverse of the window Vandermonde matrix via normal equations:
/// P = (J^T J)^-1 J^T, with J[i][k] = (i - half)^k. Row k of P maps window
/// samples to the k-th polynomial coefficient.
fn pseudo_inverse(window_length: usize, order: usize) -> FilterResult<Vec<Vec<f64>>> {
    let p = order + 1;
    let half = (window_length / 2) as f64;

    let vandermonde: Vec<Vec<f64>> = (0..window_length)
        .map(|i| {
            let x = i as f64 - half;
            let mut xk = 1.0;
            (0..p)
                .map(|_| {
                    let v = xk;
                    xk *= x;
                    v
                })
                .collect()
        })
        .collect();

    let mut gram = vec![vec![0.0; p]; p];
    for row in 0..p {
        for col in 0..p {
            gram[row][col] = (0..window_length)
                .map(|i| vandermonde[i][row] * vandermonde[i][col])
                .sum();
        }
    }

    let inverse = invert(gram)?;

    let mut pinv = vec![vec![0.0; window_length]; p];
    for k in 0..p {
        for i in 0..window_length {
            pinv[k][i] = (0..p).map(|m| inverse[k][m] * vandermonde[i][m]).sum();
        }
    }
    Ok(pinv)
}

/// Gauss-Jordan inversion with partial pivoting
fn invert(mut m: Vec<Vec<f64>>) -> FilterResult<Vec<Vec<f64>>> {
    let p = m.len();
    let mut inv = vec![vec![0.0; p]; p];
    for (i, row) in inv.iter_mut().enumerate() {
        row[i] = 1.0;
    }

    for col in 0..p {
        let pivot_row = (col..p)
            .max_by(|&a, &b| m[a][col].abs().partial_cmp(&m[b][col].abs()).unwrap())
            .unwrap();
        if m[pivot_row][col].abs() < 1e-12 {
            return Err(FilterError::DesignFailure {
                reason: "polynomial fit normal equations are singular".to_string(),
            });
        }
        m.swap(col, pivot_row);
        inv.swap(col, pivot_row);

        let pivot = m[col][col];
        for j in 0..p {
            m[col][j] /= pivot;
            inv[col][j] /= pivot;
        }

        for row in 0..p {
            if row != col {
                let factor = m[row][col];
                for j in 0..p {
                    m[row][j] -= factor * m[col][j];
                    inv[row][j] -= factor * inv[col][j];
                }
            }
        }
    }
    Ok(inv)
}
