use crate::timing::tuning::FlareWindow;

/// Brightness envelope for one flare: a power-curve buildup followed by an
/// exponential decay, evaluated on normalized progress within a
/// [`FlareWindow`]. Brightness 0 is the resting glow, 1 is the flare peak.
#[derive(Clone, Copy, Debug)]
pub struct EnvelopeShape {
    /// Exponent applied to buildup progress; > 1 delays the ramp.
    pub rise_exponent: f64,
    /// Decay rate `k` in `exp(-k * progress)`; larger dies faster.
    pub decay_rate: f64,
}

impl EnvelopeShape {
    /// Shape used by the continuous-breathing strategy.
    pub const CONTINUOUS: Self = Self {
        rise_exponent: 1.5,
        decay_rate: 2.5,
    };

    /// Gentler shape used by the blended strategy, so decays stretch far
    /// enough to hand off between regions.
    pub const BLENDED: Self = Self {
        rise_exponent: 1.3,
        decay_rate: 1.8,
    };

    /// Brightness at a keyframe position inside (or outside) the window.
    pub fn brightness(&self, window: FlareWindow, percent: f64) -> f64 {
        if percent <= window.peak {
            let progress = (percent - window.buildup_start) / window.buildup_span();
            progress.clamp(0.0, 1.0).powf(self.rise_exponent)
        } else {
            let progress = (percent - window.peak) / window.decay_span();
            (-self.decay_rate * progress.max(0.0)).exp()
        }
    }
}

/// Buildup sample positions (fractions of the buildup span) for the
/// continuous strategy, ending at the peak.
pub const CONTINUOUS_BUILDUP: [f64; 6] = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
/// Decay sample positions (fractions of the decay span) for the continuous
/// strategy, starting just after the peak.
pub const CONTINUOUS_DECAY: [f64; 6] = [0.1, 0.25, 0.45, 0.65, 0.85, 1.0];

/// Buildup sample positions for the blended strategy.
pub const BLENDED_BUILDUP: [f64; 6] = [0.0, 0.15, 0.35, 0.6, 0.85, 1.0];
/// Decay sample positions for the blended strategy; denser near the tail so
/// the extended fade stays smooth.
pub const BLENDED_DECAY: [f64; 6] = [0.2, 0.35, 0.55, 0.75, 0.9, 1.0];

/// Expand a window into keyframe percents: buildup fractions up to the peak,
/// then decay fractions after it.
pub fn sample_percents(window: FlareWindow, buildup: &[f64], decay: &[f64]) -> Vec<f64> {
    let mut percents: Vec<f64> = buildup
        .iter()
        .map(|f| window.buildup_start + window.buildup_span() * f)
        .collect();
    percents.extend(decay.iter().map(|f| window.peak + window.decay_span() * f));
    percents
}

#[cfg(test)]
mod tests {
    use super::*;

    const WINDOW: FlareWindow = FlareWindow {
        buildup_start: 56.7,
        peak: 66.7,
        decay_end: 81.7,
    };

    #[test]
    fn brightness_is_one_at_peak() {
        for shape in [EnvelopeShape::CONTINUOUS, EnvelopeShape::BLENDED] {
            assert!((shape.brightness(WINDOW, WINDOW.peak) - 1.0).abs() < 1e-12);
            assert_eq!(shape.brightness(WINDOW, WINDOW.buildup_start), 0.0);
        }
    }

    #[test]
    fn buildup_rises_monotonically() {
        let shape = EnvelopeShape::CONTINUOUS;
        let mut prev = -1.0;
        for i in 0..=10 {
            let pct = WINDOW.buildup_start + WINDOW.buildup_span() * (i as f64 / 10.0);
            let b = shape.brightness(WINDOW, pct);
            assert!(b > prev, "buildup not monotonic at {pct}%");
            prev = b;
        }
    }

    #[test]
    fn decay_falls_but_never_reaches_zero() {
        let shape = EnvelopeShape::CONTINUOUS;
        let mut prev = 1.0 + 1e-12;
        for i in 1..=10 {
            let pct = WINDOW.peak + WINDOW.decay_span() * (i as f64 / 10.0);
            let b = shape.brightness(WINDOW, pct);
            assert!(b < prev, "decay not monotonic at {pct}%");
            assert!(b > 0.0);
            prev = b;
        }
        // Full decay lands at exp(-k), well dimmed but nonzero.
        let end = shape.brightness(WINDOW, WINDOW.decay_end);
        assert!((end - (-2.5f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn before_window_clamps_to_resting() {
        let shape = EnvelopeShape::BLENDED;
        assert_eq!(shape.brightness(WINDOW, 0.0), 0.0);
    }

    #[test]
    fn blended_layout_matches_the_continuous_stop_count() {
        let percents = sample_percents(WINDOW, &BLENDED_BUILDUP, &BLENDED_DECAY);
        assert_eq!(percents.len(), 12);
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
        // First decay sample sits a fifth of the way down the decay span,
        // well clear of the peak stop.
        assert!((percents[6] - WINDOW.peak - WINDOW.decay_span() * 0.2).abs() < 1e-12);
    }

    #[test]
    fn sample_percents_are_ordered_and_span_window() {
        let percents = sample_percents(WINDOW, &CONTINUOUS_BUILDUP, &CONTINUOUS_DECAY);
        assert_eq!(percents.len(), 12);
        assert_eq!(percents[0], WINDOW.buildup_start);
        assert!((percents[5] - WINDOW.peak).abs() < 1e-12);
        assert!((percents[11] - WINDOW.decay_end).abs() < 1e-12);
        assert!(percents.windows(2).all(|w| w[0] < w[1]));
    }
}
