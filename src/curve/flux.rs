use kurbo::{BezPath, ParamCurve as _, PathSeg};

use crate::foundation::{
    core::{CubicBez, Point},
    error::{FlaretimeError, FlaretimeResult},
};

/// Tolerance for the join check between consecutive segments, in SVG units.
const JOIN_EPS: f64 = 1e-9;

/// The parsed flux curve: an ordered run of cubic Bezier segments.
///
/// SVG Y grows downward, so flare peaks are local minima in Y.
#[derive(Clone, Debug)]
pub struct FluxCurve {
    segments: Vec<CubicBez>,
}

impl FluxCurve {
    /// Parse SVG path data into a continuous cubic curve.
    ///
    /// Rejects empty paths, non-cubic drawing commands, and paths with more
    /// than one subpath.
    pub fn parse(svg_path: &str) -> FlaretimeResult<Self> {
        let bez = BezPath::from_svg(svg_path)
            .map_err(|e| FlaretimeError::curve(format!("invalid svg path data: {e}")))?;

        let mut segments: Vec<CubicBez> = Vec::new();
        for seg in bez.segments() {
            match seg {
                PathSeg::Cubic(c) => segments.push(c),
                PathSeg::Line(_) | PathSeg::Quad(_) => {
                    return Err(FlaretimeError::curve(
                        "flux path must contain only cubic segments",
                    ));
                }
            }
        }
        if segments.is_empty() {
            return Err(FlaretimeError::curve("flux path has no cubic segments"));
        }
        for pair in segments.windows(2) {
            if (pair[1].p0 - pair[0].p3).hypot() > JOIN_EPS {
                return Err(FlaretimeError::curve(
                    "flux path must be a single continuous subpath",
                ));
            }
        }
        Ok(Self { segments })
    }

    /// Start point of the curve.
    pub fn start(&self) -> Point {
        self.segments[0].p0
    }

    /// The cubic segments in draw order.
    pub fn segments(&self) -> &[CubicBez] {
        &self.segments
    }

    /// Sample every segment at `samples_per_segment` evenly spaced parameters,
    /// excluding each segment's endpoint, into one flat point list.
    pub fn sample(&self, samples_per_segment: usize) -> FlaretimeResult<SampledCurve> {
        if samples_per_segment < 2 {
            return Err(FlaretimeError::validation(
                "samples_per_segment must be >= 2",
            ));
        }
        let mut points = Vec::with_capacity(self.segments.len() * samples_per_segment);
        for seg in &self.segments {
            for i in 0..samples_per_segment {
                let t = i as f64 / samples_per_segment as f64;
                points.push(seg.eval(t));
            }
        }
        tracing::debug!(
            segments = self.segments.len(),
            samples = points.len(),
            "sampled flux curve"
        );
        Ok(SampledCurve { points })
    }
}

/// Fixed-resolution polyline approximation of the flux curve.
#[derive(Clone, Debug)]
pub struct SampledCurve {
    points: Vec<Point>,
}

impl SampledCurve {
    /// Wrap an existing point sequence.
    pub fn from_points(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fraction of the path traversed at a sample index, in `[0, 1)`.
    pub fn fraction_at(&self, index: usize) -> f64 {
        index as f64 / self.points.len() as f64
    }
}
