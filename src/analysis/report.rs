use crate::{
    analysis::peaks::{FluxPeak, PeakScan, find_flux_peaks, valley_between},
    curve::{flux::FluxCurve, spec::CurveSpec},
    foundation::{
        core::{AnimTimeline, Point},
        error::FlaretimeResult,
    },
};

/// One located timing event, positioned on both the path and the timeline.
#[derive(Clone, Copy, Debug)]
pub struct TimedEvent {
    /// Sample index in the scanned curve.
    pub index: usize,
    /// SVG coordinates of the sample.
    pub point: Point,
    /// Keyframe percentage of one animation loop.
    pub percent: f64,
    /// Trigger time in seconds into the loop.
    pub secs: f64,
    /// Peak prominence; `None` for the valley.
    pub prominence: Option<f64>,
}

/// Result of scanning the flux curve: peaks in time order plus the valley
/// (shoulder) between the first two.
#[derive(Clone, Debug)]
pub struct CurveReport {
    /// Total number of sampled points.
    pub samples: usize,
    /// The animation timeline the events are placed on.
    pub timeline: AnimTimeline,
    /// Flux peaks in X (time) order.
    pub peaks: Vec<TimedEvent>,
    /// Valley between the first two peaks, when two peaks exist.
    pub valley: Option<TimedEvent>,
}

/// Sample the curve described by `spec` and locate its timing events.
#[tracing::instrument(level = "debug", skip_all)]
pub fn analyze_curve(spec: &CurveSpec) -> FlaretimeResult<CurveReport> {
    spec.validate()?;
    let timeline = AnimTimeline::new(spec.duration_secs)?;
    let curve = FluxCurve::parse(&spec.path)?;
    let sampled = curve.sample(spec.samples_per_segment)?;

    let scan = PeakScan {
        window: spec.window,
        min_prominence: spec.min_prominence,
        max_peaks: spec.max_peaks,
    };
    let peaks = find_flux_peaks(&sampled, &scan)?;

    let timed = |index: usize, point: Point, prominence: Option<f64>| {
        let fraction = sampled.fraction_at(index);
        TimedEvent {
            index,
            point,
            percent: fraction * 100.0,
            secs: fraction * timeline.duration_secs,
            prominence,
        }
    };

    let valley = match peaks.as_slice() {
        [first, second, ..] => valley_between(&sampled, first, second)
            .map(|(idx, point)| timed(idx, point, None)),
        _ => None,
    };
    let peaks = peaks
        .iter()
        .map(|p: &FluxPeak| timed(p.index, p.point, Some(p.prominence)))
        .collect();

    Ok(CurveReport {
        samples: sampled.len(),
        timeline,
        peaks,
        valley,
    })
}
