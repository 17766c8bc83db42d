use crate::{
    curve::flux::SampledCurve,
    foundation::{
        core::Point,
        error::{FlaretimeError, FlaretimeResult},
    },
};

/// Parameters for the sliding-window peak scan.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct PeakScan {
    /// Half-width of the comparison window, in samples.
    pub window: usize,
    /// Minimum prominence (SVG Y units) for a candidate to survive.
    pub min_prominence: f64,
    /// Keep at most this many peaks.
    pub max_peaks: usize,
}

impl Default for PeakScan {
    fn default() -> Self {
        Self {
            window: 50,
            min_prominence: 8.0,
            max_peaks: 2,
        }
    }
}

/// A flux peak: a local minimum in SVG Y (flux grows upward on the page,
/// downward in Y) with enough prominence to count as a flare.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FluxPeak {
    /// Sample index in the scanned curve.
    pub index: usize,
    /// SVG coordinates of the peak sample.
    pub point: Point,
    /// `min(left_max - y, right_max - y)` over the comparison windows.
    pub prominence: f64,
}

/// Scan a sampled curve for flux peaks.
///
/// A sample is a candidate when its Y is `<=` every Y in the `window` samples
/// on each side. Candidates below `min_prominence` are dropped; if more than
/// `max_peaks` survive, the most prominent ones are kept and re-sorted into
/// X (time) order. Curves shorter than `2 * window + 1` yield no peaks.
pub fn find_flux_peaks(curve: &SampledCurve, scan: &PeakScan) -> FlaretimeResult<Vec<FluxPeak>> {
    if scan.window == 0 {
        return Err(FlaretimeError::validation("PeakScan window must be >= 1"));
    }
    if scan.max_peaks == 0 {
        return Err(FlaretimeError::validation("PeakScan max_peaks must be >= 1"));
    }

    let points = curve.points();
    let n = points.len();
    let w = scan.window;
    let mut peaks: Vec<FluxPeak> = Vec::new();
    if n < 2 * w + 1 {
        tracing::debug!(samples = n, window = w, "curve too short for peak scan");
        return Ok(peaks);
    }

    for i in w..(n - w) {
        let y = points[i].y;
        let left = &points[i - w..i];
        let right = &points[i + 1..i + w + 1];
        let is_local_min =
            left.iter().all(|p| y <= p.y) && right.iter().all(|p| y <= p.y);
        if !is_local_min {
            continue;
        }

        let left_max = left.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let right_max = right.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let prominence = (left_max - y).min(right_max - y);
        if prominence < scan.min_prominence {
            tracing::trace!(index = i, prominence, "candidate peak below prominence floor");
            continue;
        }
        peaks.push(FluxPeak {
            index: i,
            point: points[i],
            prominence,
        });
    }

    if peaks.len() > scan.max_peaks {
        peaks.sort_by(|a, b| b.prominence.total_cmp(&a.prominence));
        peaks.truncate(scan.max_peaks);
        peaks.sort_by(|a, b| a.point.x.total_cmp(&b.point.x));
    }
    tracing::debug!(found = peaks.len(), "peak scan complete");
    Ok(peaks)
}

/// The valley (shoulder) between two peaks: the maximum-Y sample strictly
/// between them. Returns `None` when no sample lies between the peaks.
pub fn valley_between(
    curve: &SampledCurve,
    first: &FluxPeak,
    second: &FluxPeak,
) -> Option<(usize, Point)> {
    let (lo, hi) = (first.index.min(second.index), first.index.max(second.index));
    if hi <= lo + 1 {
        return None;
    }
    let points = curve.points();
    let idx = (lo + 1..hi).max_by(|&a, &b| points[a].y.total_cmp(&points[b].y))?;
    Some((idx, points[idx]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gaussian_dip_curve(dips: &[(f64, f64, f64)], len: usize) -> SampledCurve {
        let baseline = 75.0;
        let points = (0..len)
            .map(|i| {
                let x = i as f64;
                let y = baseline
                    - dips
                        .iter()
                        .map(|&(center, depth, width)| {
                            depth * (-((x - center) / width).powi(2)).exp()
                        })
                        .sum::<f64>();
                Point::new(x, y)
            })
            .collect();
        SampledCurve::from_points(points)
    }

    #[test]
    fn finds_two_dips_in_time_order() {
        let curve = gaussian_dip_curve(&[(220.0, 30.0, 20.0), (100.0, 40.0, 20.0)], 300);
        let scan = PeakScan {
            window: 30,
            min_prominence: 8.0,
            max_peaks: 2,
        };
        let peaks = find_flux_peaks(&curve, &scan).unwrap();
        assert_eq!(peaks.len(), 2);
        assert!((peaks[0].point.x - 100.0).abs() < 2.0);
        assert!((peaks[1].point.x - 220.0).abs() < 2.0);
        assert!(peaks[0].point.x < peaks[1].point.x);
        // The deeper dip is the more prominent one.
        assert!(peaks[0].prominence > peaks[1].prominence);
    }

    #[test]
    fn shallow_bumps_are_filtered_out() {
        let curve = gaussian_dip_curve(&[(150.0, 3.0, 20.0)], 300);
        let scan = PeakScan {
            window: 30,
            min_prominence: 8.0,
            max_peaks: 2,
        };
        let peaks = find_flux_peaks(&curve, &scan).unwrap();
        assert!(peaks.is_empty());
    }

    #[test]
    fn keeps_only_most_prominent_peaks() {
        let curve = gaussian_dip_curve(
            &[(60.0, 20.0, 10.0), (150.0, 40.0, 10.0), (240.0, 30.0, 10.0)],
            300,
        );
        let scan = PeakScan {
            window: 25,
            min_prominence: 8.0,
            max_peaks: 2,
        };
        let peaks = find_flux_peaks(&curve, &scan).unwrap();
        assert_eq!(peaks.len(), 2);
        // The shallowest dip at x=60 loses; survivors stay in X order.
        assert!((peaks[0].point.x - 150.0).abs() < 2.0);
        assert!((peaks[1].point.x - 240.0).abs() < 2.0);
    }

    #[test]
    fn short_curve_yields_no_peaks() {
        let curve = gaussian_dip_curve(&[(10.0, 40.0, 3.0)], 20);
        let peaks = find_flux_peaks(&curve, &PeakScan::default()).unwrap();
        assert!(peaks.is_empty());
    }

    #[test]
    fn valley_is_highest_sample_between_peaks() {
        let curve = gaussian_dip_curve(&[(100.0, 40.0, 15.0), (220.0, 30.0, 15.0)], 300);
        let scan = PeakScan {
            window: 30,
            min_prominence: 8.0,
            max_peaks: 2,
        };
        let peaks = find_flux_peaks(&curve, &scan).unwrap();
        let (idx, point) = valley_between(&curve, &peaks[0], &peaks[1]).unwrap();
        assert!(idx > peaks[0].index && idx < peaks[1].index);
        // Midway between the dips the baseline is nearly recovered.
        assert!(point.y > 70.0);
    }

    #[test]
    fn adjacent_peaks_have_no_valley() {
        let curve = gaussian_dip_curve(&[], 100);
        let a = FluxPeak {
            index: 10,
            point: Point::new(10.0, 75.0),
            prominence: 10.0,
        };
        let b = FluxPeak {
            index: 11,
            point: Point::new(11.0, 75.0),
            prominence: 10.0,
        };
        assert!(valley_between(&curve, &a, &b).is_none());
    }
}
