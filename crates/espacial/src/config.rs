//! # Loop Configuration
//!
//! Loaded once at startup from a TOML file. Missing keys fall back to the
//! defaults, so an empty file is a valid configuration.
//!
//! ```toml
//! target_fps = 144          # 0 = uncapped
//! fixed_step_hz = 60      # 1..=1000
//! fps_report_interval = 5   # FPS windows between debug reports, 0 = never
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use espacial_shared::{DEFAULT_TARGET_FPS, FIXED_STEP, FIXED_STEP_HZ};

use crate::error::{LoopError, LoopResult};

const NANOS_PER_SEC: u64 = 1_000_000_000;

/// Highest accepted simulation rate. One step per millisecond.
pub const MAX_FIXED_STEP_HZ: u32 = 1000;

/// Game loop settings. Immutable once a run has started.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoopConfig {
    /// Presented frames per second to aim for; 0 disables frame limiting.
    pub target_fps: u32,
    /// Simulation steps per second.
    pub fixed_step_hz: u32,
    /// Number of FPS windows between debug reports; 0 disables them.
    pub fps_report_interval: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self {
            target_fps: DEFAULT_TARGET_FPS,
            fixed_step_hz: FIXED_STEP_HZ,
            fps_report_interval: 5,
        }
    }
}

impl LoopConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// [`LoopError::Config`] on malformed TOML, unknown keys or invalid values.
    pub fn from_toml_str(source: &str) -> LoopResult<Self> {
        let config: Self =
            toml::from_str(source).map_err(|e| LoopError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// [`LoopError::Config`] if the file cannot be read or is invalid.
    pub fn from_file(path: impl AsRef<Path>) -> LoopResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .map_err(|e| LoopError::Config(format!("{}: {e}", path.display())))?;

        let config = Self::from_toml_str(&source)?;
        tracing::info!(path = %path.display(), ?config, "loop configuration loaded");
        Ok(config)
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// [`LoopError::Config`] if the step rate is outside
    /// `1..=`[`MAX_FIXED_STEP_HZ`].
    pub fn validate(&self) -> LoopResult<()> {
        if !(1..=MAX_FIXED_STEP_HZ).contains(&self.fixed_step_hz) {
            return Err(LoopError::Config(format!(
                "fixed_step_hz must be in 1..={MAX_FIXED_STEP_HZ}, got {}",
                self.fixed_step_hz
            )));
        }
        Ok(())
    }

    /// Sets the target frame rate (0 = uncapped).
    #[must_use]
    pub const fn with_target_fps(mut self, fps: u32) -> Self {
        self.target_fps = fps;
        self
    }

    /// Sets the simulation rate.
    #[must_use]
    pub const fn with_fixed_step_hz(mut self, hz: u32) -> Self {
        self.fixed_step_hz = hz;
        self
    }

    /// Sets the FPS report cadence (0 = never).
    #[must_use]
    pub const fn with_fps_report_interval(mut self, windows: u32) -> Self {
        self.fps_report_interval = windows;
        self
    }

    /// Length of one simulation step, in whole nanoseconds.
    #[must_use]
    pub fn fixed_step(&self) -> Duration {
        match self.fixed_step_hz {
            0 | FIXED_STEP_HZ => FIXED_STEP,
            hz => Duration::from_nanos(NANOS_PER_SEC / u64::from(hz)),
        }
    }

    /// Wall-clock budget per presented frame, or `None` when uncapped.
    #[must_use]
    pub fn frame_budget(&self) -> Option<Duration> {
        (self.target_fps > 0).then(|| Duration::from_nanos(NANOS_PER_SEC / u64::from(self.target_fps)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoopConfig::default();
        assert_eq!(config.target_fps, 60);
        assert_eq!(config.fixed_step_hz, 60);
        assert_eq!(config.fixed_step(), FIXED_STEP);
        assert_eq!(config.frame_budget(), Some(Duration::from_nanos(16_666_666)));
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(LoopConfig::from_toml_str("").unwrap(), LoopConfig::default());
    }

    #[test]
    fn test_partial_document() {
        let config = LoopConfig::from_toml_str("target_fps = 0\nfixed_step_hz = 120").unwrap();
        assert_eq!(config.frame_budget(), None);
        assert_eq!(config.fixed_step(), Duration::from_nanos(8_333_333));
        assert_eq!(config.fps_report_interval, 5);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            LoopConfig::from_toml_str("fixed_step_hz = 0"),
            Err(LoopError::Config(_))
        ));
        assert!(matches!(
            LoopConfig::from_toml_str("max_frame_delta_ms = 100"),
            Err(LoopError::Config(_))
        ));
        assert!(matches!(
            LoopConfig::from_toml_str("fixed_step_hz = \"fast\""),
            Err(LoopError::Config(_))
        ));
        assert!(matches!(
            LoopConfig::from_toml_str("vsync = true"),
            Err(LoopError::Config(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = LoopConfig::from_file("/definitely/not/here.toml").unwrap_err();
        assert!(err.to_string().contains("here.toml"));
    }

    #[test]
    fn test_builder() {
        let config = LoopConfig::default()
            .with_target_fps(144)
            .with_fixed_step_hz(30)
            .with_fps_report_interval(0);
        assert!(config.validate().is_ok());
        assert_eq!(config.fixed_step(), Duration::from_nanos(33_333_333));
    }

    #[test]
    fn test_step_rate_bounds() {
        let fastest = LoopConfig::from_toml_str("fixed_step_hz = 1000").unwrap();
        assert_eq!(fastest.fixed_step(), Duration::from_millis(1));

        for hz in [1001, 2_000_000_000] {
            let err = LoopConfig::default().with_fixed_step_hz(hz).validate().unwrap_err();
            assert!(matches!(err, LoopError::Config(_)));
        }
        assert!(LoopConfig::from_toml_str("fixed_step_hz = 2000000000").is_err());
    }
}
