use super::{Direction, PolarPoint};

/// Fold any finite angle into `[0, 360)`.
///
/// Uses the Euclidean remainder so totals below -360 still land in range.
#[inline]
pub fn normalize_degrees(angle: f64) -> f64 {
    let folded = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if folded >= 360.0 || folded == 0.0 {
        0.0
    } else {
        folded
    }
}

/// Rotate a canonical set by an absolute total.
///
/// `total` is always measured from the untouched canonical samples, never
/// applied on top of a previous result, so repeated commands cannot drift.
pub fn rotate(canonical: &[PolarPoint], total: f64, direction: Direction) -> Vec<PolarPoint> {
    canonical
        .iter()
        .map(|p| {
            let angle = match direction {
                Direction::Right => p.angle_degrees - total,
                Direction::Left => p.angle_degrees + total,
            };
            PolarPoint::new(normalize_degrees(angle), p.distance)
        })
        .collect()
}
