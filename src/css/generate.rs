use crate::{
    analysis::report::{CurveReport, TimedEvent},
    css::model::{CssEase, FlareStyle, KeyframeStop, KeyframesBlock, RegionRule, Stylesheet},
    foundation::error::{FlaretimeError, FlaretimeResult},
    timing::{
        envelope::{
            BLENDED_BUILDUP, BLENDED_DECAY, CONTINUOUS_BUILDUP, CONTINUOUS_DECAY, EnvelopeShape,
            sample_percents,
        },
        tuning::{RegionTuning, TuningConfig},
    },
};

/// A stylesheet refinement strategy. Each variant reproduces one pass of the
/// hand-tuning that the animation went through, from coarse three-stop
/// keyframes to fully blended overlapping envelopes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Dim hold, single bright stop per event, dim hold.
    ThreeStop,
    /// First peak split across two overlapping regions.
    RefinedSplit,
    /// Stepped brightness tables with intermediate levels.
    GradualSteps,
    /// Dense envelope-sampled keyframes, no visible steps.
    ContinuousBreathing,
    /// Extended overlapping windows that hand off between regions.
    BlendedOverlap,
}

impl Strategy {
    pub const ALL: [Strategy; 5] = [
        Strategy::ThreeStop,
        Strategy::RefinedSplit,
        Strategy::GradualSteps,
        Strategy::ContinuousBreathing,
        Strategy::BlendedOverlap,
    ];

    /// Output file the strategy historically wrote next to the stylesheet.
    pub fn default_out_file(self) -> &'static str {
        match self {
            Self::ThreeStop => "precise_timing.css",
            Self::RefinedSplit => "refined_timing.css",
            Self::GradualSteps => "gradual_transitions.css",
            Self::ContinuousBreathing => "continuous_breathing.css",
            Self::BlendedOverlap => "blended_timing.css",
        }
    }

    /// Generate the stylesheet for this strategy.
    pub fn stylesheet(
        self,
        report: &CurveReport,
        tuning: &TuningConfig,
    ) -> FlaretimeResult<Stylesheet> {
        match self {
            Self::ThreeStop => three_stop(report, tuning),
            Self::RefinedSplit => refined_split(report, tuning),
            Self::GradualSteps => gradual_steps(report, tuning),
            Self::ContinuousBreathing => envelope_sheet(report, tuning, EnvelopeParams::CONTINUOUS),
            Self::BlendedOverlap => envelope_sheet(report, tuning, EnvelopeParams::BLENDED),
        }
    }
}

/// Require the two flare peaks plus the valley between them.
fn required_events(report: &CurveReport) -> FlaretimeResult<(TimedEvent, TimedEvent, TimedEvent)> {
    match (report.peaks.as_slice(), report.valley) {
        ([first, second, ..], Some(valley)) => Ok((*first, valley, *second)),
        _ => Err(FlaretimeError::analysis(
            "curve must yield two peaks and a valley between them",
        )),
    }
}

/// Require the three tuned regions, in flare order.
fn flare_regions(tuning: &TuningConfig) -> FlaretimeResult<[&RegionTuning; 3]> {
    match tuning.regions.as_slice() {
        [a, b, c] => Ok([a, b, c]),
        _ => Err(FlaretimeError::validation(
            "tuning must define exactly three regions",
        )),
    }
}

/// Placement rules for all regions, in class order.
fn region_rules(
    tuning: &TuningConfig,
    duration_secs: f64,
    ease: CssEase,
    keyframes_name: impl Fn(&RegionTuning) -> String,
) -> Vec<RegionRule> {
    tuning
        .regions_by_class()
        .into_iter()
        .map(|region| RegionRule {
            class: region.class.clone(),
            placement: region.placement,
            keyframes: keyframes_name(region),
            duration_secs,
            ease,
        })
        .collect()
}

/// Coarse first pass: per event, a dim hold, one bright stop at the event's
/// keyframe percent, and a dim hold to the loop end. Buildup begins 0.3s
/// before the event, the fade completes 0.5s after, both clamped to the loop.
fn three_stop(report: &CurveReport, tuning: &TuningConfig) -> FlaretimeResult<Stylesheet> {
    const BUILDUP_SECS: f64 = 0.3;
    const FADE_SECS: f64 = 0.5;
    const BRIGHT: [FlareStyle; 3] = [
        // First peak, valley shoulder, dominant second peak.
        FlareStyle {
            scale: 2.2,
            opacity: 1.0,
            glow_px: 25.0,
            glow_alpha: 1.0,
        },
        FlareStyle {
            scale: 1.8,
            opacity: 0.8,
            glow_px: 18.0,
            glow_alpha: 0.9,
        },
        FlareStyle {
            scale: 2.5,
            opacity: 1.0,
            glow_px: 30.0,
            glow_alpha: 1.0,
        },
    ];

    let (first, valley, second) = required_events(report)?;
    let regions = flare_regions(tuning)?;
    let timeline = report.timeline;

    // Region-1 carries the first peak, region-3 the valley, region-2 the
    // second peak; tuning lists them in that (time) order.
    let events = [(regions[0], first), (regions[1], valley), (regions[2], second)];

    let mut blocks = Vec::new();
    for ((region, event), bright) in events.into_iter().zip(BRIGHT) {
        let hold_until = timeline.percent_of(timeline.clamp_secs(event.secs - BUILDUP_SECS));
        let resume_at = timeline.percent_of(timeline.clamp_secs(event.secs + FADE_SECS));
        blocks.push(KeyframesBlock {
            name: format!("flare-{}", region.class),
            comment: Some(format!("{} - triggers at {:.2}s", region.label, event.secs)),
            stops: vec![
                KeyframeStop::hold_from_start(hold_until, FlareStyle::DIM),
                KeyframeStop::at(event.percent, bright),
                KeyframeStop::hold_to_end(resume_at, FlareStyle::DIM),
            ],
        });
    }

    Ok(Stylesheet {
        header: "Region-specific animations with precise timing".to_owned(),
        rules: region_rules(tuning, timeline.duration_secs, CssEase::EaseInOut, |r| {
            format!("flare-{}", r.class)
        }),
        blocks,
    })
}

/// Second pass: the first flare is split across two overlapping regions. A
/// window from 0.4s before to 0.5s after the first peak is divided into
/// thirds; region 1 peaks at the first third, region 3 at the second, and
/// region 2 keeps the second peak to itself.
fn refined_split(report: &CurveReport, tuning: &TuningConfig) -> FlaretimeResult<Stylesheet> {
    let (first, _, second) = required_events(report)?;
    let [early, late, dominant] = flare_regions(tuning)?;
    let timeline = report.timeline;

    let window_start = first.secs - 0.4;
    let window_end = first.secs + 0.5;
    let third = (window_end - window_start) / 3.0;

    let pct = |secs: f64| timeline.percent_of(timeline.clamp_secs(secs));
    let suffix_for = |region: &RegionTuning| {
        if std::ptr::eq(region, early) {
            "early"
        } else if std::ptr::eq(region, late) {
            "late"
        } else {
            "single"
        }
    };

    let split = [
        // (region, hold until, peak at, resume at, peak opacity, glow alpha)
        (early, window_start - 0.1, window_start + third, window_start + 2.0 * third, 1.0, 1.0),
        (late, window_start + third - 0.1, window_start + 2.0 * third, window_end, 0.9, 0.95),
        (dominant, second.secs - 0.3, second.secs, second.secs + 0.5, 1.0, 1.0),
    ];

    let mut blocks = Vec::new();
    for (region, hold_secs, peak_secs, resume_secs, opacity, glow_alpha) in split {
        blocks.push(KeyframesBlock {
            name: format!("flare-{}-{}", region.class, suffix_for(region)),
            comment: Some(format!("{} - peaks at {peak_secs:.2}s", region.label)),
            stops: vec![
                KeyframeStop::hold_from_start(pct(hold_secs), FlareStyle::DIM),
                KeyframeStop::at(
                    pct(peak_secs),
                    FlareStyle {
                        scale: region.max_scale,
                        opacity,
                        glow_px: region.max_glow,
                        glow_alpha,
                    },
                ),
                KeyframeStop::hold_to_end(pct(resume_secs), FlareStyle::DIM),
            ],
        });
    }

    Ok(Stylesheet {
        header: "Region-specific animations with multi-region first peak".to_owned(),
        rules: region_rules(tuning, timeline.duration_secs, CssEase::EaseInOut, |r| {
            format!("flare-{}-{}", r.class, suffix_for(r))
        }),
        blocks,
    })
}

/// Stepped stop table: (offset percent, scale, opacity, glow px, glow alpha).
type StopRow = (f64, f64, f64, f64, f64);

/// Hand-tuned intermediate brightness steps for the gradual pass. The rows
/// are deliberately irregular; they were adjusted by eye against the page.
const GRADUAL_REGION_1: (f64, &[StopRow], f64) = (
    17.2,
    &[
        (21.2, 1.2, 0.5, 10.0, 0.6),
        (23.2, 1.6, 0.7, 16.0, 0.8),
        (25.2, 2.2, 1.0, 25.0, 1.0),
        (27.2, 1.9, 0.8, 20.0, 0.9),
        (31.2, 1.4, 0.5, 12.0, 0.6),
    ],
    37.2,
);
const GRADUAL_REGION_3: (f64, &[StopRow], f64) = (
    22.2,
    &[
        (26.2, 1.1, 0.5, 9.0, 0.6),
        (28.2, 1.5, 0.7, 15.0, 0.8),
        (30.2, 2.0, 0.9, 22.0, 0.95),
        (32.2, 1.7, 0.7, 17.0, 0.8),
        (35.2, 1.2, 0.5, 10.0, 0.6),
    ],
    40.2,
);
const GRADUAL_REGION_2: (f64, &[StopRow], f64) = (
    56.7,
    &[
        (61.7, 1.3, 0.5, 12.0, 0.6),
        (64.7, 1.9, 0.75, 22.0, 0.85),
        (66.7, 2.8, 1.0, 35.0, 1.0),
        (69.2, 2.3, 0.8, 28.0, 0.9),
        (74.2, 1.6, 0.5, 16.0, 0.6),
    ],
    81.7,
);

/// Third pass: fixed per-region step tables with intermediate brightness
/// levels, run under a gentle cubic-bezier easing.
fn gradual_steps(report: &CurveReport, tuning: &TuningConfig) -> FlaretimeResult<Stylesheet> {
    let timeline = report.timeline;

    let mut blocks = Vec::new();
    for region in &tuning.regions {
        let (hold_until, rows, resume_at) = match region.class.as_str() {
            "region-1" => GRADUAL_REGION_1,
            "region-2" => GRADUAL_REGION_2,
            "region-3" => GRADUAL_REGION_3,
            other => {
                return Err(FlaretimeError::validation(format!(
                    "no gradual step table for region '{other}'"
                )));
            }
        };

        let mut stops = vec![KeyframeStop::hold_from_start(hold_until, FlareStyle::DIM)];
        for &(percent, scale, opacity, glow_px, glow_alpha) in rows {
            stops.push(KeyframeStop::at(
                percent,
                FlareStyle {
                    scale,
                    opacity,
                    glow_px,
                    glow_alpha,
                },
            ));
        }
        stops.push(KeyframeStop::hold_to_end(resume_at, FlareStyle::DIM));

        blocks.push(KeyframesBlock {
            name: format!("flare-{}-gradual", region.class),
            comment: Some(format!("{} - gradual steps", region.label)),
            stops,
        });
    }

    Ok(Stylesheet {
        header: "Enhanced gradual brightness transitions".to_owned(),
        rules: region_rules(
            tuning,
            timeline.duration_secs,
            CssEase::CubicBezier(0.25, 0.1, 0.25, 1.0),
            |r| format!("flare-{}-gradual", r.class),
        ),
        blocks,
    })
}

/// Parameters distinguishing the two envelope-sampled passes.
struct EnvelopeParams {
    shape: EnvelopeShape,
    buildup: &'static [f64],
    decay: &'static [f64],
    /// Resting state emitted in the surrounding hold stops.
    dim: FlareStyle,
    /// Gap between the hold stops and the sampled window, in percent
    /// (before buildup, after decay).
    hold_gap: (f64, f64),
    keyframes_suffix: &'static str,
    header: &'static str,
    comment_suffix: &'static str,
    ease: CssEase,
    /// Whether to use the extended blending windows.
    blend_windows: bool,
}

impl EnvelopeParams {
    const CONTINUOUS: Self = Self {
        shape: EnvelopeShape::CONTINUOUS,
        buildup: &CONTINUOUS_BUILDUP,
        decay: &CONTINUOUS_DECAY,
        dim: FlareStyle::DIM,
        hold_gap: (0.5, 0.5),
        keyframes_suffix: "continuous",
        header: "Ultra-smooth continuous breathing animations",
        comment_suffix: "continuous breathing",
        ease: CssEase::CubicBezier(0.4, 0.0, 0.2, 1.0),
        blend_windows: false,
    };

    const BLENDED: Self = Self {
        shape: EnvelopeShape::BLENDED,
        buildup: &BLENDED_BUILDUP,
        decay: &BLENDED_DECAY,
        dim: FlareStyle::DIM_BLENDED,
        hold_gap: (1.0, 2.0),
        keyframes_suffix: "blended",
        header: "Enhanced blending with extended overlapping periods",
        comment_suffix: "extended blending",
        ease: CssEase::CubicBezier(0.35, 0.0, 0.25, 1.0),
        blend_windows: true,
    };
}

/// Fourth and fifth passes: sample a brightness envelope densely across each
/// region's window and map brightness to opacity, scale, and glow.
fn envelope_sheet(
    report: &CurveReport,
    tuning: &TuningConfig,
    params: EnvelopeParams,
) -> FlaretimeResult<Stylesheet> {
    let timeline = report.timeline;
    let dim = params.dim;

    let mut blocks = Vec::new();
    for region in &tuning.regions {
        let window = if params.blend_windows {
            region.blend_window
        } else {
            region.window
        };
        window.validate()?;

        let mut stops = vec![KeyframeStop::hold_from_start(
            (window.buildup_start - params.hold_gap.0).max(0.0),
            dim,
        )];
        for percent in sample_percents(window, params.buildup, params.decay) {
            let b = params.shape.brightness(window, percent);
            let opacity = dim.opacity + (1.0 - dim.opacity) * b;
            stops.push(KeyframeStop::at(
                percent,
                FlareStyle {
                    scale: 0.8 + (region.max_scale - 0.8) * b,
                    opacity,
                    glow_px: dim.glow_px + (region.max_glow - dim.glow_px) * b,
                    glow_alpha: opacity,
                },
            ));
        }
        stops.push(KeyframeStop::hold_to_end(
            (window.decay_end + params.hold_gap.1).min(100.0),
            dim,
        ));

        blocks.push(KeyframesBlock {
            name: format!("flare-{}-{}", region.class, params.keyframes_suffix),
            comment: Some(format!("{} - {}", region.label, params.comment_suffix)),
            stops,
        });
    }

    Ok(Stylesheet {
        header: params.header.to_owned(),
        rules: region_rules(tuning, timeline.duration_secs, params.ease, |r| {
            format!("flare-{}-{}", r.class, params.keyframes_suffix)
        }),
        blocks,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::spec::CurveSpec;
    use crate::analysis::report::analyze_curve;

    fn default_report() -> CurveReport {
        analyze_curve(&CurveSpec::default()).unwrap()
    }

    fn stop_percents(block: &KeyframesBlock) -> Vec<f64> {
        block
            .stops
            .iter()
            .map(|s| *s.offsets.last().unwrap())
            .collect()
    }

    #[test]
    fn three_stop_places_bright_stops_on_events() {
        let report = default_report();
        let sheet = Strategy::ThreeStop
            .stylesheet(&report, &TuningConfig::default())
            .unwrap();
        assert_eq!(sheet.rules.len(), 3);
        assert_eq!(sheet.blocks.len(), 3);

        // Second-peak block peaks at exactly 2/3 of the loop.
        let block = sheet
            .blocks
            .iter()
            .find(|b| b.name == "flare-region-2")
            .unwrap();
        assert_eq!(block.stops.len(), 3);
        let peak = block.stops[1].offsets[0];
        assert!((peak - 66.7).abs() < 0.1);
        assert_eq!(block.stops[1].style.scale, 2.5);

        let css = sheet.to_string();
        assert!(css.contains("animation: flare-region-1 6s ease-in-out infinite;"));
        assert!(css.contains("@keyframes flare-region-3 {"));
    }

    #[test]
    fn refined_split_staggers_the_first_peak() {
        let report = default_report();
        let sheet = Strategy::RefinedSplit
            .stylesheet(&report, &TuningConfig::default())
            .unwrap();

        let early = sheet
            .blocks
            .iter()
            .find(|b| b.name == "flare-region-1-early")
            .unwrap();
        let late = sheet
            .blocks
            .iter()
            .find(|b| b.name == "flare-region-3-late")
            .unwrap();
        let early_peak = early.stops[1].offsets[0];
        let late_peak = late.stops[1].offsets[0];
        // Region 3 peaks one third of the split window after region 1.
        assert!(late_peak > early_peak);
        assert!((late_peak - early_peak - 5.0).abs() < 0.1);

        let single = sheet
            .blocks
            .iter()
            .find(|b| b.name == "flare-region-2-single")
            .unwrap();
        assert_eq!(single.stops[1].style.scale, 2.8);
    }

    #[test]
    fn gradual_steps_uses_hand_tuned_tables() {
        let report = default_report();
        let sheet = Strategy::GradualSteps
            .stylesheet(&report, &TuningConfig::default())
            .unwrap();
        let block = sheet
            .blocks
            .iter()
            .find(|b| b.name == "flare-region-2-gradual")
            .unwrap();
        // Hold + 5 steps + hold.
        assert_eq!(block.stops.len(), 7);
        let percents = stop_percents(block);
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(block.stops[3].style.scale, 2.8);

        let css = sheet.to_string();
        assert!(css.contains("cubic-bezier(0.25, 0.1, 0.25, 1)"));
    }

    #[test]
    fn gradual_steps_rejects_unknown_region_classes() {
        let report = default_report();
        let mut tuning = TuningConfig::default();
        tuning.regions[0].class = "region-9".to_owned();
        let err = Strategy::GradualSteps
            .stylesheet(&report, &tuning)
            .unwrap_err();
        assert!(err.to_string().contains("region-9"));
    }

    #[test]
    fn continuous_breathing_peaks_at_full_brightness() {
        let report = default_report();
        let sheet = Strategy::ContinuousBreathing
            .stylesheet(&report, &TuningConfig::default())
            .unwrap();
        for block in &sheet.blocks {
            // Hold + 12 envelope samples + hold.
            assert_eq!(block.stops.len(), 14, "block {}", block.name);
            let percents = stop_percents(block);
            assert!(
                percents.windows(2).all(|w| w[0] < w[1]),
                "stops out of order in {}",
                block.name
            );
            let brightest = block
                .stops
                .iter()
                .max_by(|a, b| a.style.opacity.total_cmp(&b.style.opacity))
                .unwrap();
            assert!((brightest.style.opacity - 1.0).abs() < 1e-9);
        }
        // Peak stop of the dominant region hits its tuned maximums.
        let block = sheet
            .blocks
            .iter()
            .find(|b| b.name == "flare-region-2-continuous")
            .unwrap();
        let peak = &block.stops[6];
        assert!((peak.offsets[0] - 66.7).abs() < 1e-9);
        assert!((peak.style.scale - 2.8).abs() < 1e-9);
        assert!((peak.style.glow_px - 35.0).abs() < 1e-9);
    }

    #[test]
    fn blended_overlap_extends_decays_and_raises_the_floor() {
        let report = default_report();
        let sheet = Strategy::BlendedOverlap
            .stylesheet(&report, &TuningConfig::default())
            .unwrap();

        let region3 = sheet
            .blocks
            .iter()
            .find(|b| b.name == "flare-region-3-blended")
            .unwrap();
        // Extended decay bridges toward the second peak's buildup at 53%.
        let last_sampled = region3.stops[region3.stops.len() - 2].offsets[0];
        assert!((last_sampled - 58.0).abs() < 1e-9);

        // Same stop layout as the continuous pass: hold + 12 samples + hold,
        // with the first decay sample a fifth of the way down its span.
        let tuning = TuningConfig::default();
        for (block, region) in sheet.blocks.iter().zip(&tuning.regions) {
            assert_eq!(block.stops.len(), 14, "block {}", block.name);
            let window = region.blend_window;
            let first_decay = block.stops[7].offsets[0];
            assert!((first_decay - window.peak - window.decay_span() * 0.2).abs() < 1e-9);
        }

        for block in &sheet.blocks {
            for stop in &block.stops {
                assert!(stop.style.opacity >= 0.25 - 1e-9);
                assert!(stop.style.glow_px >= 4.0 - 1e-9);
            }
        }

        let css = sheet.to_string();
        assert!(css.contains("cubic-bezier(0.35, 0, 0.25, 1)"));
        assert!(css.contains("opacity: 0.25;"));
    }

    #[test]
    fn strategies_fail_without_a_valley() {
        // Single-dip curve: one peak, no valley.
        let spec = CurveSpec {
            path: "M0,75 C40,75 60,10 100,10 C140,10 160,75 200,75".to_owned(),
            samples_per_segment: 200,
            window: 40,
            ..CurveSpec::default()
        };
        let report = analyze_curve(&spec).unwrap();
        assert!(report.valley.is_none());
        let err = Strategy::ThreeStop
            .stylesheet(&report, &TuningConfig::default())
            .unwrap_err();
        assert!(matches!(err, FlaretimeError::Analysis(_)));
    }
}
