use crate::radar::CartesianPoint;

/// Convert a bearing and radius to grid coordinates.
/// `angle_degrees` is counter-clockwise from +x; grid y grows downwards.
#[inline]
pub fn polar_to_grid(cx: f32, cy: f32, angle_degrees: f32, radius: f32) -> (f32, f32) {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    (cx + cos * radius, cy - sin * radius)
}

/// Compute a circle that fits within the given area, accounting for aspect ratio.
/// `aspect_ratio`: width/height of a single unit (1.0 for braille dots).
/// Returns (center_x, center_y, max_radius) in the grid's coordinate system.
pub fn fit_circle(area_w: usize, area_h: usize, aspect_ratio: f32) -> (f32, f32, f32) {
    let cx = area_w as f32 / 2.0;
    let cy = area_h as f32 / 2.0;
    let effective_w = area_w as f32 / aspect_ratio;
    let max_radius = (effective_w.min(area_h as f32) / 2.0) * 0.95;
    (cx, cy, max_radius)
}

/// Maps radar space (centimetres) onto a braille dot grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopeGeometry {
    pub cx: f32,
    pub cy: f32,
    /// Radius of the outermost ring, in dots
    pub radius: f32,
    /// Dots per centimetre
    pub scale: f32,
    pub grid_w: usize,
    pub grid_h: usize,
}

impl ScopeGeometry {
    pub fn fit(grid_w: usize, grid_h: usize, range_cm: f64) -> Self {
        let (cx, cy, radius) = fit_circle(grid_w, grid_h, 1.0);
        let scale = if range_cm > 0.0 {
            radius / range_cm as f32
        } else {
            0.0
        };
        Self {
            cx,
            cy,
            radius,
            scale,
            grid_w,
            grid_h,
        }
    }

    /// Radius in dots of a ring at `cm`.
    pub fn ring_radius(&self, cm: f64) -> f32 {
        cm as f32 * self.scale
    }

    /// Grid position of a radar-space point, or None when it falls off
    /// the grid.
    pub fn to_grid(&self, p: CartesianPoint) -> Option<(usize, usize)> {
        let gx = (self.cx + p.x as f32 * self.scale).round();
        let gy = (self.cy - p.y as f32 * self.scale).round();
        if gx < 0.0 || gy < 0.0 || gx >= self.grid_w as f32 || gy >= self.grid_h as f32 {
            return None;
        }
        Some((gx as usize, gy as usize))
    }

    pub fn center(&self) -> (usize, usize) {
        (self.cx.round() as usize, self.cy.round() as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polar_to_grid_flips_y() {
        let (x, y) = polar_to_grid(10.0, 10.0, 90.0, 5.0);
        assert!((x - 10.0).abs() < 1e-4);
        assert!((y - 5.0).abs() < 1e-4);
    }

    #[test]
    fn geometry_maps_range_to_radius() {
        let geo = ScopeGeometry::fit(200, 100, 100.0);
        assert_eq!(geo.center(), (100, 50));
        assert!((geo.ring_radius(100.0) - geo.radius).abs() < 1e-4);

        let east = geo.to_grid(CartesianPoint::new(100.0, 0.0)).unwrap();
        assert_eq!(east.1, 50);
        assert!(east.0 > 140);

        let north = geo.to_grid(CartesianPoint::new(0.0, 50.0)).unwrap();
        assert_eq!(north.0, 100);
        assert!(north.1 < 50);
    }

    #[test]
    fn off_grid_points_are_dropped() {
        let geo = ScopeGeometry::fit(40, 40, 10.0);
        assert!(geo.to_grid(CartesianPoint::new(1000.0, 0.0)).is_none());
        assert!(geo.to_grid(CartesianPoint::new(0.0, -1000.0)).is_none());
    }
}
