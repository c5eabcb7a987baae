//! Edit session configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{Error, Result};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Per-session edit configuration. Loaded once, then lent to every operation
/// the session runs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditConfig {
    /// Maximum number of distinct positions one operation may touch.
    /// `None` = unlimited.
    pub max_changed_blocks: Option<usize>,
    /// Skip per-write physics/lighting and batch one fix-up per touched chunk.
    pub fast_mode: bool,
    /// Stage writes in pending bands and commit them in dependency order.
    /// When false every write is applied immediately.
    pub queue_enabled: bool,
    /// Number of operations kept for undo.
    pub history_capacity: usize,
    /// Largest brush size a tool may be configured with.
    pub max_brush_radius: f64,
    /// Seed of the session random source used for chance writes.
    pub rng_seed: u64,

    /// Smoothing brush parameters.
    pub smooth: SmoothSettings,
}

impl Default for EditConfig {
    fn default() -> Self {
        Self {
            max_changed_blocks: None,
            fast_mode: false,
            queue_enabled: true,
            history_capacity: 15,
            max_brush_radius: 6.0,
            rng_seed: 0x5eed_cafe,
            smooth: SmoothSettings::default(),
        }
    }
}

impl EditConfig {
    /// Config with a change budget, everything else default.
    pub fn with_change_limit(limit: usize) -> Self {
        Self {
            max_changed_blocks: Some(limit),
            ..Self::default()
        }
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(Error::Config("history_capacity must be at least 1".into()));
        }
        if !(self.max_brush_radius > 0.0) {
            return Err(Error::Config(format!(
                "max_brush_radius must be positive, got {}",
                self.max_brush_radius
            )));
        }
        self.smooth.validate()
    }

    /// Load from a JSON file and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        log::debug!("Loaded edit config from {}", path.display());
        Ok(config)
    }

    /// Save to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sub-configs
// ---------------------------------------------------------------------------

/// Parameters of the smoothing brush.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothSettings {
    /// Gaussian kernel radius (diameter = 2 * radius + 1).
    pub kernel_radius: usize,
    /// Gaussian standard deviation.
    pub sigma: f64,
    /// Extra blocks above the brush sphere included in the region, so that
    /// columns may grow.
    pub headroom: i32,
}

impl Default for SmoothSettings {
    fn default() -> Self {
        Self {
            kernel_radius: 5,
            sigma: 1.0,
            headroom: 10,
        }
    }
}

impl SmoothSettings {
    fn validate(&self) -> Result<()> {
        if !(self.sigma > 0.0) {
            return Err(Error::Config(format!("smooth.sigma must be positive, got {}", self.sigma)));
        }
        if self.headroom < 0 {
            return Err(Error::Config("smooth.headroom must not be negative".into()));
        }
        Ok(())
    }
}
