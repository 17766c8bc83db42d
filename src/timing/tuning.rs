use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{FlaretimeError, FlaretimeResult};

/// CSS placement offsets for a flare region, in percent of the page.
#[derive(Clone, Copy, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<f64>,
}

impl Placement {
    pub fn top_left(top: f64, left: f64) -> Self {
        Self {
            top: Some(top),
            left: Some(left),
            ..Self::default()
        }
    }

    pub fn top_right(top: f64, right: f64) -> Self {
        Self {
            top: Some(top),
            right: Some(right),
            ..Self::default()
        }
    }

    pub fn bottom_left(bottom: f64, left: f64) -> Self {
        Self {
            bottom: Some(bottom),
            left: Some(left),
            ..Self::default()
        }
    }
}

/// Hand-tuned keyframe window for one region: where its brightness ramp
/// starts, peaks, and dies out, as percents of one animation loop.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct FlareWindow {
    pub buildup_start: f64,
    pub peak: f64,
    pub decay_end: f64,
}

impl FlareWindow {
    pub fn new(buildup_start: f64, peak: f64, decay_end: f64) -> Self {
        Self {
            buildup_start,
            peak,
            decay_end,
        }
    }

    pub fn validate(&self) -> FlaretimeResult<()> {
        let ordered = self.buildup_start < self.peak && self.peak < self.decay_end;
        let in_range = self.buildup_start >= 0.0 && self.decay_end <= 100.0;
        if !ordered || !in_range {
            return Err(FlaretimeError::validation(format!(
                "FlareWindow must satisfy 0 <= buildup_start < peak < decay_end <= 100, \
got {} < {} < {}",
                self.buildup_start, self.peak, self.decay_end
            )));
        }
        Ok(())
    }

    pub fn buildup_span(&self) -> f64 {
        self.peak - self.buildup_start
    }

    pub fn decay_span(&self) -> f64 {
        self.decay_end - self.peak
    }
}

/// One flare region on the page with its hand-tuned intensity and timing.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RegionTuning {
    /// CSS class of the region element, e.g. `region-1`.
    pub class: String,
    /// Human label used in generated comments and tables.
    pub label: String,
    pub placement: Placement,
    /// `transform: scale(..)` at full brightness.
    pub max_scale: f64,
    /// Glow (`box-shadow` blur radius) in px at full brightness.
    pub max_glow: f64,
    /// Window used by the stepped and continuous strategies.
    pub window: FlareWindow,
    /// Extended window used by the blended strategy.
    pub blend_window: FlareWindow,
}

impl RegionTuning {
    pub fn validate(&self) -> FlaretimeResult<()> {
        if self.class.is_empty() {
            return Err(FlaretimeError::validation("RegionTuning class must not be empty"));
        }
        if self.max_scale <= 0.0 || self.max_glow <= 0.0 {
            return Err(FlaretimeError::validation(
                "RegionTuning max_scale and max_glow must be > 0",
            ));
        }
        self.window.validate()?;
        self.blend_window.validate()
    }
}

/// The full hand-tuned region setup. Defaults reproduce the values the
/// original animation shipped with; `--tuning` can override them from JSON.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TuningConfig {
    /// Regions in flare (time) order: the two halves of the first peak, then
    /// the dominant second peak.
    pub regions: Vec<RegionTuning>,
}

impl Default for TuningConfig {
    fn default() -> Self {
        Self {
            regions: vec![
                RegionTuning {
                    class: "region-1".to_owned(),
                    label: "Early starter in first peak".to_owned(),
                    placement: Placement::top_left(30.0, 20.0),
                    max_scale: 2.2,
                    max_glow: 25.0,
                    window: FlareWindow::new(17.2, 25.2, 37.2),
                    blend_window: FlareWindow::new(17.2, 25.2, 42.0),
                },
                RegionTuning {
                    class: "region-3".to_owned(),
                    label: "Late starter in first peak".to_owned(),
                    placement: Placement::bottom_left(35.0, 40.0),
                    max_scale: 2.0,
                    max_glow: 22.0,
                    window: FlareWindow::new(22.2, 30.2, 40.2),
                    blend_window: FlareWindow::new(22.2, 30.2, 58.0),
                },
                RegionTuning {
                    class: "region-2".to_owned(),
                    label: "Single dominant second peak".to_owned(),
                    placement: Placement::top_right(60.0, 25.0),
                    max_scale: 2.8,
                    max_glow: 35.0,
                    window: FlareWindow::new(56.7, 66.7, 81.7),
                    blend_window: FlareWindow::new(53.0, 66.7, 82.2),
                },
            ],
        }
    }
}

impl TuningConfig {
    /// Load a tuning config from a JSON file.
    pub fn from_path(path: &Path) -> FlaretimeResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read tuning config '{}'", path.display()))?;
        let cfg: Self = serde_json::from_slice(&bytes)
            .map_err(|e| FlaretimeError::serde(format!("parse tuning config: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> FlaretimeResult<()> {
        if self.regions.is_empty() {
            return Err(FlaretimeError::validation(
                "TuningConfig must define at least one region",
            ));
        }
        for region in &self.regions {
            region.validate()?;
        }
        Ok(())
    }

    /// Regions sorted by CSS class, for emitting placement rules in a stable
    /// `.region-1`, `.region-2`, `.region-3` order.
    pub fn regions_by_class(&self) -> Vec<&RegionTuning> {
        let mut regions: Vec<&RegionTuning> = self.regions.iter().collect();
        regions.sort_by(|a, b| a.class.cmp(&b.class));
        regions
    }
}
