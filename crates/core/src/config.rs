use serde::{Deserialize, Serialize};

pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 16_000;
pub const DEFAULT_WINDOW_SECS: f64 = 3.0;
pub const DEFAULT_HOP_SECS: f64 = 1.0;
pub const DEFAULT_BASELINE_PITCH_HZ: f64 = 150.0;
pub const DEFAULT_BASELINE_ENERGY: f64 = 0.03;
/// Fixed reference pitch variation (Hz) against which `pitch_std` is expressed.
pub const REFERENCE_PITCH_STD_HZ: f64 = 20.0;
pub const DEFAULT_TOP_N: usize = 3;

/// Factor applied to an observed pitch mean when deriving a per-clip baseline.
pub const BASELINE_CALIBRATION_FACTOR: f64 = 0.95;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("baseline pitch must be > 0 Hz, got {0}")]
    NonPositiveBaselinePitch(f64),
    #[error("baseline energy must be > 0, got {0}")]
    NonPositiveBaselineEnergy(f64),
    #[error("sample rate must be > 0")]
    ZeroSampleRate,
    #[error("window duration must be > 0 s, got {0}")]
    NonPositiveWindow(f64),
    #[error("hop duration must be > 0 s, got {0}")]
    NonPositiveHop(f64),
    #[error("hop duration {hop_secs} s exceeds window duration {window_secs} s")]
    HopExceedsWindow { window_secs: f64, hop_secs: f64 },
}

/// Reference pitch and energy against which observed features are expressed
/// as ratios by the scorer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct Baseline {
    pub pitch_hz: f64,
    pub energy: f64,
}

impl Baseline {
    pub fn new(pitch_hz: f64, energy: f64) -> Result<Self, ConfigError> {
        if pitch_hz <= 0.0 || !pitch_hz.is_finite() {
            return Err(ConfigError::NonPositiveBaselinePitch(pitch_hz));
        }
        if energy <= 0.0 || !energy.is_finite() {
            return Err(ConfigError::NonPositiveBaselineEnergy(energy));
        }
        Ok(Self { pitch_hz, energy })
    }

    /// Derives a per-clip baseline from an observed pitch mean.
    ///
    /// Falls back to the defaults when the observed values are not positive,
    /// so degenerate clips still score against a well-formed reference.
    pub fn calibrated(pitch_mean_hz: f64, energy: f64) -> Self {
        let pitch_hz = if pitch_mean_hz > 0.0 {
            pitch_mean_hz * BASELINE_CALIBRATION_FACTOR
        } else {
            DEFAULT_BASELINE_PITCH_HZ
        };
        let energy = if energy > 0.0 {
            energy
        } else {
            DEFAULT_BASELINE_ENERGY
        };
        Self { pitch_hz, energy }
    }
}

impl Default for Baseline {
    fn default() -> Self {
        Self {
            pitch_hz: DEFAULT_BASELINE_PITCH_HZ,
            energy: DEFAULT_BASELINE_ENERGY,
        }
    }
}

/// Sliding-window parameters for streaming analysis.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct WindowConfig {
    sample_rate: u32,
    window_secs: f64,
    hop_secs: f64,
}

impl WindowConfig {
    pub fn new(sample_rate: u32, window_secs: f64, hop_secs: f64) -> Result<Self, ConfigError> {
        if sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if window_secs <= 0.0 || !window_secs.is_finite() {
            return Err(ConfigError::NonPositiveWindow(window_secs));
        }
        if hop_secs <= 0.0 || !hop_secs.is_finite() {
            return Err(ConfigError::NonPositiveHop(hop_secs));
        }
        if hop_secs > window_secs {
            return Err(ConfigError::HopExceedsWindow {
                window_secs,
                hop_secs,
            });
        }
        let cfg = Self {
            sample_rate,
            window_secs,
            hop_secs,
        };
        // A sub-sample hop at a tiny rate would round down to a zero slide.
        if cfg.hop_size() == 0 {
            return Err(ConfigError::NonPositiveHop(hop_secs));
        }
        Ok(cfg)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Samples analyzed per result.
    pub fn window_size(&self) -> usize {
        (self.window_secs * f64::from(self.sample_rate)) as usize
    }

    /// Samples the buffer slides between successive analyses.
    pub fn hop_size(&self) -> usize {
        (self.hop_secs * f64::from(self.sample_rate)) as usize
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            sample_rate: DEFAULT_SAMPLE_RATE_HZ,
            window_secs: DEFAULT_WINDOW_SECS,
            hop_secs: DEFAULT_HOP_SECS,
        }
    }
}
