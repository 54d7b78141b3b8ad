use tracing::debug;

use super::rotation::rotate;
use super::transform::transform_set;
use super::{CartesianPoint, Direction, PointSet, PolarPoint, SetId};
use crate::error::RadarError;

/// The single rotation scalar shared by both point sets.
///
/// Signed, counter-clockwise positive, measured from the canonical samples.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    cumulative_degrees: f64,
}

impl RotationState {
    pub fn cumulative_degrees(&self) -> f64 {
        self.cumulative_degrees
    }
}

/// Owns the canonical point sets and the cumulative rotation.
///
/// The canonical sets are never mutated; every position is derived from
/// them on demand.
#[derive(Debug, Clone)]
pub struct PointSetRegistry {
    sets: [PointSet; 2],
    rotation: RotationState,
}

impl PointSetRegistry {
    pub fn new(blue: Vec<PolarPoint>, red: Vec<PolarPoint>) -> Result<Self, RadarError> {
        Ok(Self {
            sets: [PointSet::new(SetId::Blue, blue)?, PointSet::new(SetId::Red, red)?],
            rotation: RotationState::default(),
        })
    }

    pub fn canonical(&self, set: SetId) -> &PointSet {
        &self.sets[set.index()]
    }

    pub fn len(&self, set: SetId) -> usize {
        self.canonical(set).len()
    }

    pub fn cumulative_degrees(&self) -> f64 {
        self.rotation.cumulative_degrees()
    }

    /// Polar samples of `set` under the current cumulative rotation.
    pub fn current_polar(&self, set: SetId) -> Vec<PolarPoint> {
        // The total is already signed, so the engine always runs with the
        // counter-clockwise convention.
        rotate(
            self.canonical(set).points(),
            self.rotation.cumulative_degrees,
            Direction::Left,
        )
    }

    /// Display positions of `set` under the current cumulative rotation.
    pub fn current_positions(&self, set: SetId) -> Vec<CartesianPoint> {
        transform_set(&self.current_polar(set))
    }

    /// Accumulate a rotation command.
    ///
    /// `degrees` must be finite; on error the state is left untouched.
    /// Returns the new cumulative total.
    pub fn rotate_by(&mut self, degrees: f64, direction: Direction) -> Result<f64, RadarError> {
        if !degrees.is_finite() {
            return Err(RadarError::invalid_rotation(degrees.to_string()));
        }
        let total = self.rotation.cumulative_degrees + direction.signed(degrees);
        if !total.is_finite() {
            return Err(RadarError::invalid_rotation(degrees.to_string()));
        }
        self.rotation.cumulative_degrees = total;
        debug!("Rotated {} {}, cumulative {}", degrees, direction, total);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RadarConfig;

    fn registry() -> PointSetRegistry {
        let radar = RadarConfig::default();
        PointSetRegistry::new(radar.blue, radar.red).unwrap()
    }

    fn assert_points_close(a: &[CartesianPoint], b: &[CartesianPoint]) {
        assert_eq!(a.len(), b.len());
        for (p, q) in a.iter().zip(b) {
            assert!(p.distance_to(*q) < 1e-9, "{:?} vs {:?}", p, q);
        }
    }

    #[test]
    fn starts_unrotated() {
        let reg = registry();
        assert_eq!(reg.cumulative_degrees(), 0.0);
        let blue = reg.current_positions(SetId::Blue);
        assert_eq!(blue.len(), 7);
        // (0°, 65.96) is the last blue sample
        assert!((blue[6].x - 65.96).abs() < 1e-9);
        assert!(blue[6].y.abs() < 1e-9);
    }

    #[test]
    fn left_and_right_rotate_opposite_ways() {
        let mut reg = registry();
        reg.rotate_by(90.0, Direction::Left).unwrap();
        let p = reg.current_positions(SetId::Red)[6];
        assert!(p.x.abs() < 1e-9);
        assert!((p.y - 65.96).abs() < 1e-9);

        let mut reg = registry();
        reg.rotate_by(90.0, Direction::Right).unwrap();
        assert_eq!(reg.current_polar(SetId::Red)[6].angle_degrees, 270.0);
        let p = reg.current_positions(SetId::Red)[6];
        assert!(p.x.abs() < 1e-9);
        assert!((p.y + 65.96).abs() < 1e-9);
    }

    #[test]
    fn non_finite_amounts_leave_state_alone() {
        let mut reg = registry();
        reg.rotate_by(30.0, Direction::Left).unwrap();
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                reg.rotate_by(bad, Direction::Right),
                Err(RadarError::InvalidRotationInput { .. })
            ));
        }
        assert_eq!(reg.cumulative_degrees(), 30.0);
    }

    #[test]
    fn many_small_commands_do_not_drift() {
        let mut stepped = registry();
        for _ in 0..1000 {
            stepped.rotate_by(0.37, Direction::Left).unwrap();
        }
        for _ in 0..250 {
            stepped.rotate_by(0.11, Direction::Right).unwrap();
        }

        let mut direct = registry();
        direct
            .rotate_by(1000.0 * 0.37 - 250.0 * 0.11, Direction::Left)
            .unwrap();

        for set in SetId::ALL {
            assert_points_close(
                &stepped.current_positions(set),
                &direct.current_positions(set),
            );
        }
    }

    #[test]
    fn canonical_sets_are_untouched_by_rotation() {
        let mut reg = registry();
        let before = reg.canonical(SetId::Blue).clone();
        reg.rotate_by(45.0, Direction::Right).unwrap();
        reg.rotate_by(10.0, Direction::Left).unwrap();
        assert_eq!(reg.canonical(SetId::Blue), &before);
        assert_eq!(reg.cumulative_degrees(), -35.0);
    }
}
