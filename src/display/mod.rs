pub mod headless;
pub mod terminal;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::radar::{CartesianPoint, SetId};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Terminal,
    Headless,
}

/// A surface that paints point-set markers.
///
/// Positions are in radar space (centimetres, +y away from the sensor).
/// Mapping to pixels or cells is the surface's business.
pub trait DisplayAdapter {
    /// Replace every marker of `set` with `positions`, in index order.
    fn paint(&mut self, set: SetId, positions: &[CartesianPoint]);

    /// The position currently painted for marker `index` of `set`.
    fn painted(&self, set: SetId, index: usize) -> Option<CartesianPoint>;
}

/// In-memory marker store shared by the terminal and headless surfaces.
///
/// Rendering reads from here each frame; the animation scheduler only ever
/// writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerLayer {
    markers: [Vec<CartesianPoint>; 2],
    paints: u64,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self, set: SetId) -> &[CartesianPoint] {
        &self.markers[set.index()]
    }

    /// Total number of paint calls received.
    pub fn paints(&self) -> u64 {
        self.paints
    }
}

impl DisplayAdapter for MarkerLayer {
    fn paint(&mut self, set: SetId, positions: &[CartesianPoint]) {
        let markers = &mut self.markers[set.index()];
        markers.clear();
        markers.extend_from_slice(positions);
        self.paints += 1;
    }

    fn painted(&self, set: SetId, index: usize) -> Option<CartesianPoint> {
        self.markers[set.index()].get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paint_replaces_previous_markers() {
        let mut layer = MarkerLayer::new();
        layer.paint(
            SetId::Blue,
            &[CartesianPoint::new(1.0, 2.0), CartesianPoint::new(3.0, 4.0)],
        );
        layer.paint(SetId::Blue, &[CartesianPoint::new(5.0, 6.0)]);

        assert_eq!(layer.markers(SetId::Blue).len(), 1);
        assert_eq!(layer.painted(SetId::Blue, 0), Some(CartesianPoint::new(5.0, 6.0)));
        assert_eq!(layer.painted(SetId::Blue, 1), None);
        assert_eq!(layer.painted(SetId::Red, 0), None);
        assert_eq!(layer.paints(), 2);
    }
}
