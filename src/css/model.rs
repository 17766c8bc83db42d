use std::fmt::{self, Write as _};

use crate::timing::tuning::Placement;

/// Easing applied to the whole animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CssEase {
    EaseInOut,
    CubicBezier(f64, f64, f64, f64),
}

impl fmt::Display for CssEase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::EaseInOut => f.write_str("ease-in-out"),
            Self::CubicBezier(x1, y1, x2, y2) => write!(
                f,
                "cubic-bezier({}, {}, {}, {})",
                fmt_num(x1),
                fmt_num(y1),
                fmt_num(x2),
                fmt_num(y2)
            ),
        }
    }
}

/// Visual state of a flare region at one keyframe stop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlareStyle {
    /// `transform: scale(..)`.
    pub scale: f64,
    /// Element opacity.
    pub opacity: f64,
    /// `box-shadow` blur radius in px (the white glow).
    pub glow_px: f64,
    /// Alpha of the glow color.
    pub glow_alpha: f64,
}

impl FlareStyle {
    /// Resting state between flares.
    pub const DIM: Self = Self {
        scale: 0.8,
        opacity: 0.3,
        glow_px: 5.0,
        glow_alpha: 0.4,
    };

    /// Raised resting floor used by the blended strategy so neighboring
    /// regions never go fully dark during a handoff.
    pub const DIM_BLENDED: Self = Self {
        scale: 0.8,
        opacity: 0.25,
        glow_px: 4.0,
        glow_alpha: 0.3,
    };
}

/// One stop inside a `@keyframes` block. Multiple offsets render as a
/// combined selector, e.g. `0%, 21.8%`.
#[derive(Clone, Debug)]
pub struct KeyframeStop {
    pub offsets: Vec<f64>,
    pub style: FlareStyle,
}

impl KeyframeStop {
    pub fn at(percent: f64, style: FlareStyle) -> Self {
        Self {
            offsets: vec![percent],
            style,
        }
    }

    /// Hold stop covering the loop start up to `percent`.
    pub fn hold_from_start(percent: f64, style: FlareStyle) -> Self {
        Self {
            offsets: vec![0.0, percent],
            style,
        }
    }

    /// Hold stop covering `percent` through the loop end.
    pub fn hold_to_end(percent: f64, style: FlareStyle) -> Self {
        Self {
            offsets: vec![percent, 100.0],
            style,
        }
    }
}

/// A named `@keyframes` block.
#[derive(Clone, Debug)]
pub struct KeyframesBlock {
    pub name: String,
    /// Comment rendered above the block.
    pub comment: Option<String>,
    pub stops: Vec<KeyframeStop>,
}

/// Placement rule for one region element, carrying its `animation:`
/// shorthand.
#[derive(Clone, Debug)]
pub struct RegionRule {
    /// CSS class without the leading dot.
    pub class: String,
    pub placement: Placement,
    /// Name of the `@keyframes` block this region runs.
    pub keyframes: String,
    pub duration_secs: f64,
    pub ease: CssEase,
}

/// A complete generated stylesheet: region placement rules followed by their
/// keyframes blocks.
#[derive(Clone, Debug)]
pub struct Stylesheet {
    /// Comment rendered at the top of the file.
    pub header: String,
    pub rules: Vec<RegionRule>,
    pub blocks: Vec<KeyframesBlock>,
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "/* {} */", self.header)?;
        for rule in &self.rules {
            writeln!(f, ".{} {{", rule.class)?;
            writeln!(f, "    {}", placement_line(&rule.placement))?;
            writeln!(
                f,
                "    animation: {} {}s {} infinite;",
                rule.keyframes,
                fmt_num(rule.duration_secs),
                rule.ease
            )?;
            writeln!(f, "}}")?;
            writeln!(f)?;
        }
        for block in &self.blocks {
            if let Some(comment) = &block.comment {
                writeln!(f, "/* {comment} */")?;
            }
            writeln!(f, "@keyframes {} {{", block.name)?;
            for stop in &block.stops {
                let offsets = stop
                    .offsets
                    .iter()
                    .map(|p| fmt_percent(*p))
                    .collect::<Vec<_>>()
                    .join(", ");
                writeln!(f, "    {offsets} {{")?;
                writeln!(f, "        transform: scale({});", fmt_num(stop.style.scale))?;
                writeln!(f, "        opacity: {};", fmt_num(stop.style.opacity))?;
                writeln!(
                    f,
                    "        box-shadow: 0 0 {:.0}px rgba(255, 255, 255, {});",
                    stop.style.glow_px,
                    fmt_num(stop.style.glow_alpha)
                )?;
                writeln!(f, "    }}")?;
            }
            writeln!(f, "}}")?;
            writeln!(f)?;
        }
        Ok(())
    }
}

fn placement_line(p: &Placement) -> String {
    let mut line = String::new();
    for (name, value) in [
        ("top", p.top),
        ("bottom", p.bottom),
        ("left", p.left),
        ("right", p.right),
    ] {
        if let Some(v) = value {
            let _ = write!(line, "{name}: {}%; ", fmt_num(v));
        }
    }
    line.trim_end().to_owned()
}

/// Format a keyframe offset: one decimal place, with the exact loop
/// boundaries written bare as `0%` / `100%`.
pub(crate) fn fmt_percent(v: f64) -> String {
    if v == 0.0 {
        "0%".to_owned()
    } else if v == 100.0 {
        "100%".to_owned()
    } else {
        format!("{v:.1}%")
    }
}

/// Format a style value: up to two decimals, trailing zeros trimmed.
pub(crate) fn fmt_num(v: f64) -> String {
    let s = format!("{v:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_owned()
}
