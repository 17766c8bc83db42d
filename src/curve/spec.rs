use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{FlaretimeError, FlaretimeResult};

/// SVG path data for the solar X-ray flux curve on the page, a nine-segment
/// cubic path with two flare peaks and a shoulder between them.
pub const FLARE_PATH: &str = "M30,75 C50,74 65,72 75,68 C85,60 95,45 105,35 \
C115,25 125,28 135,40 C145,52 155,60 165,62 C175,58 185,50 195,38 \
C205,26 215,18 225,15 C235,18 245,28 255,42 C265,56 275,68 285,72 \
C295,74 310,75 330,75";

/// Input description of the flux curve and how to scan it for peaks.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CurveSpec {
    /// SVG path data: one move followed by cubic segments.
    pub path: String,
    /// Samples per cubic segment (segment endpoint excluded).
    pub samples_per_segment: usize,
    /// Half-width of the sliding peak-scan window, in samples.
    pub window: usize,
    /// Minimum prominence (SVG Y units) for a candidate peak to survive.
    pub min_prominence: f64,
    /// Keep at most this many peaks, most prominent first.
    pub max_peaks: usize,
    /// Duration of one animation loop in seconds.
    pub duration_secs: f64,
}

impl Default for CurveSpec {
    fn default() -> Self {
        Self {
            path: FLARE_PATH.to_owned(),
            samples_per_segment: 100,
            window: 50,
            min_prominence: 8.0,
            max_peaks: 2,
            duration_secs: 6.0,
        }
    }
}

impl CurveSpec {
    /// Load a spec from a JSON file.
    pub fn from_path(path: &Path) -> FlaretimeResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read curve spec '{}'", path.display()))?;
        let spec: Self = serde_json::from_slice(&bytes)
            .map_err(|e| FlaretimeError::serde(format!("parse curve spec: {e}")))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Validate static invariants.
    pub fn validate(&self) -> FlaretimeResult<()> {
        if self.path.trim().is_empty() {
            return Err(FlaretimeError::validation("CurveSpec path must not be empty"));
        }
        if self.samples_per_segment < 2 {
            return Err(FlaretimeError::validation(
                "CurveSpec samples_per_segment must be >= 2",
            ));
        }
        if self.window == 0 {
            return Err(FlaretimeError::validation("CurveSpec window must be >= 1"));
        }
        if !self.min_prominence.is_finite() || self.min_prominence < 0.0 {
            return Err(FlaretimeError::validation(
                "CurveSpec min_prominence must be finite and >= 0",
            ));
        }
        if self.max_peaks == 0 {
            return Err(FlaretimeError::validation("CurveSpec max_peaks must be >= 1"));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(FlaretimeError::validation(
                "CurveSpec duration_secs must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_spec_is_valid() {
        CurveSpec::default().validate().unwrap();
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let mut spec = CurveSpec::default();
        spec.samples_per_segment = 1;
        assert!(spec.validate().is_err());

        let mut spec = CurveSpec::default();
        spec.window = 0;
        assert!(spec.validate().is_err());

        let mut spec = CurveSpec::default();
        spec.duration_secs = 0.0;
        assert!(spec.validate().is_err());
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let spec: CurveSpec = serde_json::from_str(r#"{ "duration_secs": 8.0 }"#).unwrap();
        assert_eq!(spec.duration_secs, 8.0);
        assert_eq!(spec.samples_per_segment, 100);
        assert_eq!(spec.path, FLARE_PATH);
    }
}
