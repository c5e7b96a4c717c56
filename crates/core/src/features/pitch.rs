//! Frame-wise fundamental frequency estimation (YIN).
//!
//! Difference function + cumulative mean normalized difference with an
//! absolute threshold and parabolic refinement, restricted to the human
//! voice band. Frames with no dip below the threshold (or with negligible
//! energy) are reported as unvoiced and carry no pitch estimate.

/// Human voice band searched for a fundamental.
pub const PITCH_MIN_HZ: f64 = 50.0;
pub const PITCH_MAX_HZ: f64 = 400.0;

/// CMND dip threshold below which a lag counts as a voiced period.
const YIN_THRESHOLD: f64 = 0.1;

/// Frames quieter than this RMS are never voiced.
const VOICING_RMS_FLOOR: f64 = 1e-4;

/// Estimates the fundamental frequency of one frame, or `None` if unvoiced.
pub(crate) fn estimate_f0(frame: &[f32], sample_rate: u32) -> Option<f64> {
    let n = frame.len();
    let sr = f64::from(sample_rate);

    let min_lag = (sr / PITCH_MAX_HZ).floor() as usize;
    let max_lag = ((sr / PITCH_MIN_HZ).ceil() as usize).min(n / 2);
    if min_lag < 1 || max_lag <= min_lag {
        return None;
    }

    let rms = frame_rms(frame);
    if rms < VOICING_RMS_FLOOR {
        return None;
    }

    // Difference function over a fixed integration window.
    let w = n - max_lag;
    let mut diff = vec![0.0f64; max_lag + 1];
    for (tau, d) in diff.iter_mut().enumerate().skip(1) {
        let mut acc = 0.0f64;
        for j in 0..w {
            let delta = f64::from(frame[j]) - f64::from(frame[j + tau]);
            acc += delta * delta;
        }
        *d = acc;
    }

    // Cumulative mean normalized difference.
    let mut cmnd = vec![1.0f64; max_lag + 1];
    let mut running = 0.0f64;
    for tau in 1..=max_lag {
        running += diff[tau];
        cmnd[tau] = if running > 0.0 {
            diff[tau] * tau as f64 / running
        } else {
            1.0
        };
    }

    // First dip below the threshold, descended to its local minimum.
    let mut tau = min_lag;
    loop {
        if tau > max_lag {
            return None;
        }
        if cmnd[tau] < YIN_THRESHOLD {
            while tau + 1 <= max_lag && cmnd[tau + 1] < cmnd[tau] {
                tau += 1;
            }
            break;
        }
        tau += 1;
    }

    Some(sr / refine_lag(&cmnd, tau))
}

/// Parabolic interpolation around the selected lag.
fn refine_lag(cmnd: &[f64], tau: usize) -> f64 {
    if tau == 0 || tau + 1 >= cmnd.len() {
        return tau as f64;
    }
    let left = cmnd[tau - 1];
    let center = cmnd[tau];
    let right = cmnd[tau + 1];
    let denom = left - 2.0 * center + right;
    if denom.abs() < 1e-12 {
        return tau as f64;
    }
    let offset = 0.5 * (left - right) / denom;
    if offset.abs() > 1.0 {
        return tau as f64;
    }
    tau as f64 + offset
}

fn frame_rms(frame: &[f32]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = frame.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum_sq / frame.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq_hz: f64, amplitude: f64, sample_rate: u32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| (amplitude * (2.0 * PI * freq_hz * i as f64 / f64::from(sample_rate)).sin()) as f32)
            .collect()
    }

    #[test]
    fn sine_wave_pitch_detected() {
        let frame = sine(200.0, 0.5, 16_000, 2048);
        let f0 = estimate_f0(&frame, 16_000).expect("voiced");
        assert!((f0 - 200.0).abs() < 5.0, "got {f0}");
    }

    #[test]
    fn low_sine_wave_pitch_detected() {
        let frame = sine(120.0, 0.3, 16_000, 2048);
        let f0 = estimate_f0(&frame, 16_000).expect("voiced");
        assert!((f0 - 120.0).abs() < 5.0, "got {f0}");
    }

    #[test]
    fn silence_is_unvoiced() {
        let frame = vec![0.0f32; 2048];
        assert!(estimate_f0(&frame, 16_000).is_none());
    }

    #[test]
    fn frame_too_short_for_band_is_unvoiced() {
        // 64 samples cannot hold a 50 Hz period at 16 kHz.
        let frame = sine(200.0, 0.5, 16_000, 64);
        assert!(estimate_f0(&frame, 16_000).is_none());
    }
}
