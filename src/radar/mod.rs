//! Polar point sets and the math that rotates and projects them.
//!
//! Angles are degrees, counter-clockwise from the +x axis. Distances are
//! centimetres from the sensor. Cartesian points live in the same
//! centimetre space with +y pointing away from the sensor; mapping to
//! terminal cells happens in [`crate::scope`].

pub mod registry;
pub mod rotation;
pub mod transform;

pub use registry::PointSetRegistry;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RadarError;

/// A sample in polar form: bearing in degrees and range in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct PolarPoint {
    pub angle_degrees: f64,
    pub distance: f64,
}

impl PolarPoint {
    pub const fn new(angle_degrees: f64, distance: f64) -> Self {
        Self {
            angle_degrees,
            distance,
        }
    }
}

impl From<(f64, f64)> for PolarPoint {
    fn from((angle_degrees, distance): (f64, f64)) -> Self {
        Self::new(angle_degrees, distance)
    }
}

impl From<PolarPoint> for (f64, f64) {
    fn from(p: PolarPoint) -> Self {
        (p.angle_degrees, p.distance)
    }
}

/// A display-space position. Derived from a [`PolarPoint`], never stored as
/// the source of truth.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
}

impl CartesianPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Linear interpolation towards `target`, independently per axis.
    ///
    /// `t <= 0` returns `self` and `t >= 1` returns `target` bit-for-bit.
    #[inline]
    pub fn lerp(self, target: CartesianPoint, t: f64) -> CartesianPoint {
        if t <= 0.0 {
            return self;
        }
        if t >= 1.0 {
            return target;
        }
        CartesianPoint {
            x: self.x + (target.x - self.x) * t,
            y: self.y + (target.y - self.y) * t,
        }
    }

    #[cfg(test)]
    pub fn distance_to(self, other: CartesianPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }
}

/// Which way a rotate command turns the scene.
///
/// Left is counter-clockwise, which is the positive angular direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Left,
    Right,
}

impl Direction {
    /// Sign a rotation amount by this direction's convention.
    #[inline]
    pub fn signed(self, degrees: f64) -> f64 {
        match self {
            Direction::Left => degrees,
            Direction::Right => -degrees,
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Direction {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "left" | "l" => Ok(Direction::Left),
            "right" | "r" => Ok(Direction::Right),
            _ => Err(RadarError::InvalidDirection {
                input: s.to_string(),
            }),
        }
    }
}

/// The two tracked point sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetId {
    Blue,
    Red,
}

impl SetId {
    pub const ALL: [SetId; 2] = [SetId::Blue, SetId::Red];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            SetId::Blue => 0,
            SetId::Red => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SetId::Blue => "blue",
            SetId::Red => "red",
        }
    }
}

impl fmt::Display for SetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SetId {
    type Err = RadarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blue" => Ok(SetId::Blue),
            "red" => Ok(SetId::Red),
            _ => Err(RadarError::InvalidPointSetName {
                input: s.to_string(),
            }),
        }
    }
}

/// A fixed-cardinality, ordered set of canonical samples.
///
/// Index `i` names the same logical point for the life of the set.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSet {
    points: Vec<PolarPoint>,
}

// Never empty: `new` rejects an empty sample list.
#[allow(clippy::len_without_is_empty)]
impl PointSet {
    /// Validate and normalize raw samples.
    ///
    /// Rejects empty sets, non-finite angles and negative or non-finite
    /// distances. Angles are folded into `[0, 360)`.
    pub fn new(set: SetId, points: Vec<PolarPoint>) -> Result<Self, RadarError> {
        if points.is_empty() {
            return Err(RadarError::InvalidPointSet {
                set,
                reason: "set is empty".to_string(),
            });
        }

        let mut normalized = Vec::with_capacity(points.len());
        for (i, p) in points.into_iter().enumerate() {
            if !p.angle_degrees.is_finite() {
                return Err(RadarError::InvalidPointSet {
                    set,
                    reason: format!("point {} has a non-finite angle", i),
                });
            }
            if !p.distance.is_finite() || p.distance < 0.0 {
                return Err(RadarError::InvalidPointSet {
                    set,
                    reason: format!("point {} has invalid distance {}", i, p.distance),
                });
            }
            normalized.push(PolarPoint::new(
                rotation::normalize_degrees(p.angle_degrees),
                p.distance,
            ));
        }

        Ok(Self { points: normalized })
    }

    pub fn points(&self) -> &[PolarPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_endpoints_exactly() {
        let a = CartesianPoint::new(0.1, -7.3);
        let b = CartesianPoint::new(65.96, 1.0 / 3.0);
        assert_eq!(a.lerp(b, 0.0), a);
        assert_eq!(a.lerp(b, 1.0), b);
        assert_eq!(a.lerp(b, 1.5), b);
    }

    #[test]
    fn lerp_is_monotonic_per_axis() {
        let a = CartesianPoint::new(10.0, 40.0);
        let b = CartesianPoint::new(-30.0, 45.0);
        let mut prev = a;
        for step in 1..=100 {
            let p = a.lerp(b, step as f64 / 100.0);
            assert!(p.x <= prev.x);
            assert!(p.y >= prev.y);
            prev = p;
        }
    }

    #[test]
    fn direction_parses_and_signs() {
        assert_eq!("Left".parse::<Direction>(), Ok(Direction::Left));
        assert_eq!(" right ".parse::<Direction>(), Ok(Direction::Right));
        assert!(matches!(
            "up".parse::<Direction>(),
            Err(RadarError::InvalidDirection { .. })
        ));
        assert_eq!(Direction::Left.signed(15.0), 15.0);
        assert_eq!(Direction::Right.signed(15.0), -15.0);
    }

    #[test]
    fn point_set_rejects_bad_samples() {
        assert!(PointSet::new(SetId::Blue, vec![]).is_err());
        assert!(PointSet::new(SetId::Blue, vec![PolarPoint::new(f64::NAN, 1.0)]).is_err());
        assert!(PointSet::new(SetId::Red, vec![PolarPoint::new(10.0, -1.0)]).is_err());
    }

    #[test]
    fn point_set_normalizes_angles() {
        let set = PointSet::new(
            SetId::Blue,
            vec![PolarPoint::new(-90.0, 5.0), PolarPoint::new(720.0, 3.0)],
        )
        .unwrap();
        assert_eq!(set.points()[0].angle_degrees, 270.0);
        assert_eq!(set.points()[1].angle_degrees, 0.0);
        assert_eq!(set.len(), 2);
    }
}
