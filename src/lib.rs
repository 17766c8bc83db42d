//! flaretime is a timing calculator for one decorative CSS animation: the
//! solar-flare brightness pulses on a personal web page.
//!
//! The page shows a white indicator tracing a fixed X-ray flux curve (an SVG
//! cubic path) while three "active region" elements flare in sync with the
//! curve's peaks. This crate does the arithmetic behind that sync:
//!
//! 1. **Sample**: parse the SVG path with `kurbo` and sample each cubic
//!    segment at a fixed resolution ([`FluxCurve`]).
//! 2. **Scan**: find flux peaks (local minima in SVG Y) with a sliding-window
//!    prominence scan, plus the valley between them ([`analyze_curve`]).
//! 3. **Generate**: emit `@keyframes` stylesheets at one of five refinement
//!    levels, from coarse three-stop timing to fully blended overlapping
//!    brightness envelopes ([`Strategy`]).
//!
//! The output is meant to be pasted into the page's stylesheet and judged by
//! eye; nothing here aims to be a general curve-analysis library or CSS
//! engine.
#![forbid(unsafe_code)]

mod analysis;
mod css;
mod curve;
mod foundation;
mod timing;

pub use analysis::peaks::{FluxPeak, PeakScan, find_flux_peaks, valley_between};
pub use analysis::report::{CurveReport, TimedEvent, analyze_curve};
pub use css::generate::Strategy;
pub use css::model::{CssEase, FlareStyle, KeyframeStop, KeyframesBlock, RegionRule, Stylesheet};
pub use curve::flux::{FluxCurve, SampledCurve};
pub use curve::spec::{CurveSpec, FLARE_PATH};
pub use foundation::core::{AnimTimeline, CubicBez, Point};
pub use foundation::error::{FlaretimeError, FlaretimeResult};
pub use timing::envelope::{EnvelopeShape, sample_percents};
pub use timing::tuning::{FlareWindow, Placement, RegionTuning, TuningConfig};
