//! Splatmap derivation: height to material-layer coordinate.

use orogen_grid::{Grid, HeightGrid, SplatGrid};
use serde::{Deserialize, Serialize};

use crate::error::PipelineError;

/// How normalized height maps onto a layer coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplatPolicy {
    /// Whole layer indices from threshold buckets. A cell whose normalized
    /// height exceeds every threshold falls through to layer 0; that
    /// fall-through is the documented policy, not clamp-to-top.
    Discrete,
    /// Continuous layer coordinate interpolated between the bracketing
    /// threshold pair; heights above the last threshold clamp to the top
    /// layer. Requires at least two thresholds.
    Interpolated,
}

/// Map each cell's `height / max_height` through `thresholds` under the
/// chosen policy.
///
/// `thresholds` must be non-empty and ascending; the interpolated policy
/// additionally needs two or more entries for bracketing lookup.
pub fn splatmap(
    grid: &HeightGrid,
    thresholds: &[f32],
    max_height: f32,
    policy: SplatPolicy,
) -> Result<SplatGrid, PipelineError> {
    validate_thresholds(thresholds, policy)?;

    let mut splat: SplatGrid = Grid::new(grid.width(), grid.height(), 0.0);
    for (out, &height) in splat.as_mut_slice().iter_mut().zip(grid.as_slice()) {
        let normalized = height / max_height;
        *out = match policy {
            SplatPolicy::Discrete => discrete_layer(normalized, thresholds),
            SplatPolicy::Interpolated => interpolated_layer(normalized, thresholds),
        };
    }
    Ok(splat)
}

fn validate_thresholds(thresholds: &[f32], policy: SplatPolicy) -> Result<(), PipelineError> {
    if thresholds.is_empty() {
        return Err(PipelineError::InvalidThresholds {
            reason: "threshold set is empty".into(),
        });
    }
    if policy == SplatPolicy::Interpolated && thresholds.len() < 2 {
        return Err(PipelineError::InvalidThresholds {
            reason: "interpolated policy needs at least 2 thresholds".into(),
        });
    }
    if thresholds.windows(2).any(|pair| pair[0] > pair[1]) {
        return Err(PipelineError::InvalidThresholds {
            reason: "thresholds must be ascending".into(),
        });
    }
    Ok(())
}

/// First threshold the normalized height sits at or below wins; above all
/// thresholds falls through to layer 0.
fn discrete_layer(normalized: f32, thresholds: &[f32]) -> f32 {
    for (i, &threshold) in thresholds.iter().enumerate() {
        if normalized <= threshold {
            return i as f32;
        }
    }
    0.0
}

/// Continuous coordinate `i + (h - t_i) / (t_{i+1} - t_i)` from the
/// bracketing pair; clamped to `[0, layer_count - 1]` outside the range.
fn interpolated_layer(normalized: f32, thresholds: &[f32]) -> f32 {
    let top = (thresholds.len() - 1) as f32;
    if normalized <= thresholds[0] {
        return 0.0;
    }
    for (i, pair) in thresholds.windows(2).enumerate() {
        let (lo, hi) = (pair[0], pair[1]);
        if normalized <= hi {
            // Equal thresholds would divide by zero; treat the band as flat.
            if hi - lo <= f32::EPSILON {
                return i as f32;
            }
            return i as f32 + (normalized - lo) / (hi - lo);
        }
    }
    top
}

#[cfg(test)]
mod tests {
    use super::*;

    const THRESHOLDS: [f32; 4] = [0.0, 0.25, 0.5, 0.75];

    fn single_cell(height: f32) -> HeightGrid {
        Grid::from_vec(1, 1, vec![height])
    }

    #[test]
    fn test_discrete_buckets() {
        let splat = splatmap(&single_cell(0.2), &THRESHOLDS, 1.0, SplatPolicy::Discrete)
            .expect("splat");
        assert_eq!(splat.get(0, 0), 1.0, "0.2 sits in the (0, 0.25] bucket");
    }

    #[test]
    fn test_discrete_above_all_thresholds_falls_through_to_zero() {
        let splat = splatmap(&single_cell(0.9), &THRESHOLDS, 1.0, SplatPolicy::Discrete)
            .expect("splat");
        assert_eq!(
            splat.get(0, 0),
            0.0,
            "heights above every threshold keep layer 0 under the discrete policy"
        );
    }

    #[test]
    fn test_interpolated_coordinate() {
        let splat = splatmap(
            &single_cell(0.3),
            &THRESHOLDS,
            1.0,
            SplatPolicy::Interpolated,
        )
        .expect("splat");
        assert!(
            (splat.get(0, 0) - 1.2).abs() < 1e-6,
            "0.3 should interpolate to 1.2, got {}",
            splat.get(0, 0)
        );
    }

    #[test]
    fn test_interpolated_clamps_above_top() {
        let splat = splatmap(
            &single_cell(0.95),
            &THRESHOLDS,
            1.0,
            SplatPolicy::Interpolated,
        )
        .expect("splat");
        assert_eq!(splat.get(0, 0), 3.0, "above the last threshold clamps to top");
    }

    #[test]
    fn test_normalization_uses_max_height() {
        // Height 0.15 with max 0.5 normalizes to 0.3.
        let splat = splatmap(
            &single_cell(0.15),
            &THRESHOLDS,
            0.5,
            SplatPolicy::Interpolated,
        )
        .expect("splat");
        assert!((splat.get(0, 0) - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_empty_thresholds_rejected() {
        let err = splatmap(&single_cell(0.5), &[], 1.0, SplatPolicy::Discrete).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidThresholds { .. }));
    }

    #[test]
    fn test_interpolated_needs_two_thresholds() {
        let err =
            splatmap(&single_cell(0.5), &[0.5], 1.0, SplatPolicy::Interpolated).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidThresholds { .. }));
    }

    #[test]
    fn test_unsorted_thresholds_rejected() {
        let err = splatmap(
            &single_cell(0.5),
            &[0.0, 0.5, 0.25],
            1.0,
            SplatPolicy::Discrete,
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidThresholds { .. }));
    }
}
