//! Butterworth IIR filter design as cascaded second-order sections
//!
//! The designer follows the classical zpk pipeline: analog prototype poles,
//! lowpass/highpass/bandpass frequency transform, bilinear transform, then
//! pairing of conjugate poles into biquad sections. Cascaded sections are
//! used instead of a single high-order transfer function because direct-form
//! coefficients become ill-conditioned above roughly fourth order.

use num_complex::Complex64;
use sigfilt_core::{FilterError, FilterResult};
use std::f64::consts::PI;

/// A single second-order section (biquad).
///
/// Transfer function: H(z) = (b0 + b1*z^-1 + b2*z^-2) / (1 + a1*z^-1 + a2*z^-2)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sos {
    /// Numerator coefficients [b0, b1, b2]
    pub b: [f64; 3],
    /// Denominator coefficients [a0, a1, a2]; a0 is 1 by construction
    pub a: [f64; 3],
}

impl Sos {
    /// Check that both poles lie strictly inside the unit circle.
    ///
    /// For a denominator 1 + a1*z^-1 + a2*z^-2 this is the stability
    /// triangle: |a2| < 1 and |a1| < 1 + a2.
    pub fn is_stable(&self) -> bool {
        self.a[2].abs() < 1.0 && self.a[1].abs() < 1.0 + self.a[2]
    }

    /// Gain of this section at z = 1 (DC)
    pub fn dc_gain(&self) -> f64 {
        (self.b[0] + self.b[1] + self.b[2]) / (1.0 + self.a[1] + self.a[2])
    }
}

/// Filter band selection, derived from which cutoffs were supplied
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    /// Attenuate above `high` Hz
    Lowpass { high: f64 },
    /// Attenuate below `low` Hz
    Highpass { low: f64 },
    /// Pass between `low` and `high` Hz
    Bandpass { low: f64, high: f64 },
}

/// Design a Butterworth filter of the given order as second-order sections.
///
/// The magnitude response is maximally flat in the passband at the requested
/// order; zero-phase application later doubles the effective order. Bandpass
/// designs produce `order` sections (2*order poles), lowpass/highpass produce
/// `(order + 1) / 2` sections.
pub fn design_butterworth(order: usize, band: Band, sampling_rate: f64) -> FilterResult<Vec<Sos>> {
    if order == 0 {
        return Err(FilterError::DesignFailure {
            reason: "filter order must be at least 1".to_string(),
        });
    }

    let nyquist = sampling_rate / 2.0;
    // Normalize to a fraction of Nyquist; the designer re-checks its own
    // preconditions even though the dispatcher validates first
    let normalize = |name: &str, cutoff: f64| -> FilterResult<f64> {
        if !cutoff.is_finite() || cutoff <= 0.0 || cutoff >= nyquist {
            return Err(FilterError::DesignFailure {
                reason: format!(
                    "{} of {} Hz is outside the open interval (0, {}) Hz",
                    name, cutoff, nyquist
                ),
            });
        }
        Ok(cutoff / nyquist)
    };

    let (analog_poles, analog_zeros, gain) = match band {
        Band::Lowpass { high } => {
            let wo = prewarp(normalize("lowpass cutoff", high)?);
            let poles: Vec<Complex64> = prototype_poles(order)
                .into_iter()
                .map(|p| p * wo)
                .collect();
            (poles, Vec::new(), wo.powi(order as i32))
        }
        Band::Highpass { low } => {
            let wo = prewarp(normalize("highpass cutoff", low)?);
            let proto = prototype_poles(order);
            // prototype gain correction prod(-p); equals 1 for Butterworth
            let k: Complex64 = proto.iter().map(|p| -*p).product();
            let poles: Vec<Complex64> = proto.iter().map(|p| wo / p).collect();
            let zeros = vec![Complex64::new(0.0, 0.0); order];
            (poles, zeros, k.re)
        }
        Band::Bandpass { low, high } => {
            if low >= high {
                return Err(FilterError::DesignFailure {
                    reason: format!("bandpass cutoffs out of order: {} >= {}", low, high),
                });
            }
            let w1 = prewarp(normalize("bandpass low cutoff", low)?);
            let w2 = prewarp(normalize("bandpass high cutoff", high)?);
            let wo2 = Complex64::new(w1 * w2, 0.0);
            let bw = w2 - w1;

            // s -> (s^2 + wo^2) / (bw * s): each prototype pole splits in two
            let mut poles = Vec::with_capacity(2 * order);
            for p in prototype_poles(order) {
                let scaled = p * (bw / 2.0);
                let disc = (scaled * scaled - wo2).sqrt();
                poles.push(scaled + disc);
                poles.push(scaled - disc);
            }
            let zeros = vec![Complex64::new(0.0, 0.0); order];
            (poles, zeros, bw.powi(order as i32))
        }
    };

    let (digital_poles, digital_zeros, k) = bilinear(&analog_poles, &analog_zeros, gain);
    let sections = pair_into_sections(&digital_poles, &digital_zeros, k)?;

    for section in &sections {
        let finite = section
            .b
            .iter()
            .chain(section.a.iter())
            .all(|c| c.is_finite());
        if !finite || !section.is_stable() {
            return Err(FilterError::DesignFailure {
                reason: "designed section is unstable or non-finite".to_string(),
            });
        }
    }

    Ok(sections)
}

// Cutoffs are normalized fractions of Nyquist; the bilinear transform below
// uses an internal rate of 2 samples/s, so 2*fs = 4.
const FS2: f64 = 4.0;

/// Pre-warp a normalized cutoff so the bilinear transform lands the -3 dB
/// point on the requested digital frequency
fn prewarp(wn: f64) -> f64 {
    FS2 * (PI * wn / 2.0).tan()
}

/// Analog Butterworth prototype: poles evenly spaced on the left half of the
/// unit circle, no zeros, unit gain
fn prototype_poles(order: usize) -> Vec<Complex64> {
    (0..order)
        .map(|k| {
            let m = 2 * k as i64 - order as i64 + 1;
            let theta = PI * m as f64 / (2 * order) as f64;
            -Complex64::from_polar(1.0, theta)
        })
        .collect()
}

/// Map analog poles/zeros to the z-plane via s = 2*fs*(z-1)/(z+1).
/// Zeros at analog infinity land at z = -1.
fn bilinear(
    poles: &[Complex64],
    zeros: &[Complex64],
    gain: f64,
) -> (Vec<Complex64>, Vec<Complex64>, f64) {
    let fs2 = Complex64::new(FS2, 0.0);

    let digital_poles: Vec<Complex64> = poles.iter().map(|&p| (fs2 + p) / (fs2 - p)).collect();
    let mut digital_zeros: Vec<Complex64> = zeros.iter().map(|&z| (fs2 + z) / (fs2 - z)).collect();
    digital_zeros.resize(poles.len(), Complex64::new(-1.0, 0.0));

    let num: Complex64 = zeros.iter().map(|&z| fs2 - z).product();
    let den: Complex64 = poles.iter().map(|&p| fs2 - p).product();
    let k = gain * (num / den).re;

    (digital_poles, digital_zeros, k)
}

/// Group digital poles into conjugate pairs and real singles, assign the
/// (real, at z = ±1) digital Butterworth zeros, and fold the overall gain
/// into the first section's numerator.
fn pair_into_sections(
    poles: &[Complex64],
    zeros: &[Complex64],
    gain: f64,
) -> FilterResult<Vec<Sos>> {
    const CONJ_TOL: f64 = 1e-8;

    let mut conjugate_pairs: Vec<Complex64> = Vec::new();
    let mut real_poles: Vec<f64> = Vec::new();
    for p in poles {
        if p.im > CONJ_TOL {
            conjugate_pairs.push(*p);
        } else if p.im >= -CONJ_TOL {
            real_poles.push(p.re);
        }
        // poles with negative imaginary part are the implied mates
    }
    if conjugate_pairs.len() * 2 + real_poles.len() != poles.len() {
        return Err(FilterError::DesignFailure {
            reason: "pole set is not closed under conjugation".to_string(),
        });
    }
    real_poles.sort_by(|x, y| x.partial_cmp(y).unwrap());

    // Butterworth zeros after the bilinear transform all sit at z = +1 or
    // z = -1; track the two counts and hand them out per section
    let mut at_plus_one = zeros.iter().filter(|z| z.re > 0.0).count();
    let mut at_minus_one = zeros.len() - at_plus_one;

    let mut numerator_for = |pole_count: usize| -> [f64; 3] {
        if pole_count == 2 {
            if at_plus_one > 0 && at_minus_one > 0 {
                // one zero each side: (z-1)(z+1)
                at_plus_one -= 1;
                at_minus_one -= 1;
                [1.0, 0.0, -1.0]
            } else if at_minus_one >= 2 {
                at_minus_one -= 2;
                [1.0, 2.0, 1.0]
            } else if at_plus_one >= 2 {
                at_plus_one -= 2;
                [1.0, -2.0, 1.0]
            } else if at_minus_one == 1 {
                at_minus_one -= 1;
                [1.0, 1.0, 0.0]
            } else if at_plus_one == 1 {
                at_plus_one -= 1;
                [1.0, -1.0, 0.0]
            } else {
                [1.0, 0.0, 0.0]
            }
        } else if at_minus_one > 0 {
            at_minus_one -= 1;
            [1.0, 1.0, 0.0]
        } else if at_plus_one > 0 {
            at_plus_one -= 1;
            [1.0, -1.0, 0.0]
        } else {
            [1.0, 0.0, 0.0]
        }
    };

    let mut sections = Vec::new();
    for p in &conjugate_pairs {
        sections.push(Sos {
            b: numerator_for(2),
            a: [1.0, -2.0 * p.re, p.norm_sqr()],
        });
    }
    for pair in real_poles.chunks(2) {
        if pair.len() == 2 {
            sections.push(Sos {
                b: numerator_for(2),
                a: [1.0, -(pair[0] + pair[1]), pair[0] * pair[1]],
            });
        } else {
            sections.push(Sos {
                b: numerator_for(1),
                a: [1.0, -pair[0], 0.0],
            });
        }
    }

    if let Some(first) = sections.first_mut() {
        for c in &mut first.b {
            *c *= gain;
        }
    }

    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cascade_dc_gain(sections: &[Sos]) -> f64 {
        sections.iter().map(|s| s.dc_gain()).product()
    }

    fn cascade_gain_at(sections: &[Sos], wn: f64) -> f64 {
        // magnitude response at normalized frequency wn (fraction of Nyquist)
        let omega = PI * wn;
        let z_inv = Complex64::from_polar(1.0, -omega);
        let z_inv2 = z_inv * z_inv;
        sections
            .iter()
            .map(|s| {
                let num = Complex64::new(s.b[0], 0.0)
                    + Complex64::new(s.b[1], 0.0) * z_inv
                    + Complex64::new(s.b[2], 0.0) * z_inv2;
                let den = Complex64::new(1.0, 0.0)
                    + Complex64::new(s.a[1], 0.0) * z_inv
                    + Complex64::new(s.a[2], 0.0) * z_inv2;
                (num / den).norm()
            })
            .product()
    }

    #[test]
    fn test_first_order_lowpass_known_coefficients() {
        // Cutoff at half Nyquist has the closed form b = [0.5, 0.5], a = [1, 0]
        let sections = design_butterworth(1, Band::Lowpass { high: 250.0 }, 1000.0).unwrap();

        assert_eq!(sections.len(), 1);
        assert!((sections[0].b[0] - 0.5).abs() < 1e-12);
        assert!((sections[0].b[1] - 0.5).abs() < 1e-12);
        assert!(sections[0].a[1].abs() < 1e-12);
    }

    #[test]
    fn test_lowpass_dc_gain_unity() {
        let sections = design_butterworth(4, Band::Lowpass { high: 100.0 }, 1000.0).unwrap();
        assert!((cascade_dc_gain(&sections) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_highpass_blocks_dc() {
        let sections = design_butterworth(4, Band::Highpass { low: 100.0 }, 1000.0).unwrap();
        assert!(cascade_dc_gain(&sections).abs() < 1e-9);
    }

    #[test]
    fn test_cutoff_gain_is_half_power() {
        for order in [1usize, 2, 3, 5, 8] {
            let sections = design_butterworth(order, Band::Lowpass { high: 50.0 }, 1000.0).unwrap();
            let g = cascade_gain_at(&sections, 0.1);
            assert!(
                (g - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-6,
                "order {}: cutoff gain {}",
                order,
                g
            );
        }
    }

    #[test]
    fn test_bandpass_peaks_in_band_and_rejects_edges() {
        let sections =
            design_butterworth(2, Band::Bandpass { low: 2.0, high: 10.0 }, 1000.0).unwrap();

        assert_eq!(sections.len(), 2);
        let center = (2.0_f64 * 10.0).sqrt() / 500.0;
        assert!((cascade_gain_at(&sections, center) - 1.0).abs() < 1e-3);
        assert!(cascade_dc_gain(&sections).abs() < 1e-9);
        assert!(cascade_gain_at(&sections, 0.5) < 1e-3);
    }

    #[test]
    fn test_section_counts() {
        let lp = design_butterworth(5, Band::Lowpass { high: 40.0 }, 1000.0).unwrap();
        assert_eq!(lp.len(), 3); // two conjugate pairs + one real pole

        let bp = design_butterworth(3, Band::Bandpass { low: 5.0, high: 40.0 }, 1000.0).unwrap();
        assert_eq!(bp.len(), 3); // 2*order poles -> order sections
    }

    #[test]
    fn test_stability_across_orders_and_cutoffs() {
        for order in 1..=8 {
            for cutoff in [0.5, 5.0, 100.0, 480.0] {
                let sections =
                    design_butterworth(order, Band::Lowpass { high: cutoff }, 1000.0).unwrap();
                assert!(
                    sections.iter().all(Sos::is_stable),
                    "unstable lowpass at order {} cutoff {}",
                    order,
                    cutoff
                );

                let sections =
                    design_butterworth(order, Band::Highpass { low: cutoff }, 1000.0).unwrap();
                assert!(
                    sections.iter().all(Sos::is_stable),
                    "unstable highpass at order {} cutoff {}",
                    order,
                    cutoff
                );
            }

            let sections =
                design_butterworth(order, Band::Bandpass { low: 0.5, high: 45.0 }, 1000.0).unwrap();
            assert!(
                sections.iter().all(Sos::is_stable),
                "unstable bandpass at order {}",
                order
            );
        }
    }

    #[test]
    fn test_rejects_cutoff_at_or_above_nyquist() {
        let result = design_butterworth(2, Band::Lowpass { high: 500.0 }, 1000.0);
        assert!(matches!(result, Err(FilterError::DesignFailure { .. })));

        let result = design_butterworth(2, Band::Highpass { low: 600.0 }, 1000.0);
        assert!(matches!(result, Err(FilterError::DesignFailure { .. })));
    }

    #[test]
    fn test_rejects_inverted_bandpass() {
        let result = design_butterworth(2, Band::Bandpass { low: 30.0, high: 10.0 }, 1000.0);
        assert!(matches!(result, Err(FilterError::DesignFailure { .. })));
    }
}
