use super::rotation::normalize_degrees;
use super::{CartesianPoint, PolarPoint};

/// Project a polar sample into display space.
/// 0° lies on +x and angles grow counter-clockwise.
#[inline]
pub fn transform(p: PolarPoint) -> CartesianPoint {
    let (sin, cos) = p.angle_degrees.to_radians().sin_cos();
    CartesianPoint {
        x: p.distance * cos,
        y: p.distance * sin,
    }
}

/// Project a whole set, preserving order.
pub fn transform_set(points: &[PolarPoint]) -> Vec<CartesianPoint> {
    points.iter().copied().map(transform).collect()
}

/// Inverse of [`transform`]. The origin maps to `(0°, 0)`.
pub fn to_polar(c: CartesianPoint) -> PolarPoint {
    let distance = c.x.hypot(c.y);
    let angle = if distance == 0.0 {
        0.0
    } else {
        normalize_degrees(c.y.atan2(c.x).to_degrees())
    };
    PolarPoint::new(angle, distance)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn angle_delta(a: f64, b: f64) -> f64 {
        let d = (a - b).abs();
        d.min(360.0 - d)
    }

    #[test]
    fn cardinal_directions() {
        let east = transform(PolarPoint::new(0.0, 65.96));
        assert!((east.x - 65.96).abs() < EPS);
        assert!(east.y.abs() < EPS);

        let north = transform(PolarPoint::new(90.0, 10.0));
        assert!(north.x.abs() < EPS);
        assert!((north.y - 10.0).abs() < EPS);

        let south = transform(PolarPoint::new(270.0, 10.0));
        assert!(south.x.abs() < EPS);
        assert!((south.y + 10.0).abs() < EPS);
    }

    #[test]
    fn inverse_recovers_samples() {
        for step in 0..720 {
            let angle = step as f64 * 0.5;
            for &distance in &[0.5, 37.37, 65.96, 400.0] {
                let back = to_polar(transform(PolarPoint::new(angle, distance)));
                assert!(angle_delta(back.angle_degrees, angle) < 1e-7, "angle {}", angle);
                assert!((back.distance - distance).abs() < 1e-9);
                assert!((0.0..360.0).contains(&back.angle_degrees));
            }
        }
    }

    #[test]
    fn zero_distance_is_origin() {
        let c = transform(PolarPoint::new(123.0, 0.0));
        assert_eq!(c.x.abs(), 0.0);
        assert_eq!(c.y.abs(), 0.0);
        assert_eq!(to_polar(c).distance, 0.0);
    }

    #[test]
    fn set_order_is_preserved() {
        let polar = [
            PolarPoint::new(0.0, 1.0),
            PolarPoint::new(90.0, 2.0),
            PolarPoint::new(180.0, 3.0),
        ];
        let out = transform_set(&polar);
        assert_eq!(out.len(), 3);
        assert!((out[0].x - 1.0).abs() < EPS);
        assert!((out[1].y - 2.0).abs() < EPS);
        assert!((out[2].x + 3.0).abs() < EPS);
    }
}
