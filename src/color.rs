use palette::{Hsl, IntoColor, Srgb};

use crate::config::{ColorConfig, RgbColor};
use crate::radar::SetId;

/// Resolved colors for one scope render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScopePalette {
    markers: [(u8, u8, u8); 2],
    glows: [(u8, u8, u8); 2],
    grid: (u8, u8, u8),
    sensor: (u8, u8, u8),
}

impl ScopePalette {
    pub fn from_config(colors: &ColorConfig) -> Self {
        let blue = rgb(colors.blue);
        let red = rgb(colors.red);
        Self {
            markers: [blue, red],
            glows: [glow(blue), glow(red)],
            grid: rgb(colors.grid),
            sensor: rgb(colors.sensor),
        }
    }

    pub fn marker(&self, set: SetId) -> (u8, u8, u8) {
        self.markers[set.index()]
    }

    /// Dimmed shade drawn around a marker while it is moving.
    pub fn glow(&self, set: SetId) -> (u8, u8, u8) {
        self.glows[set.index()]
    }

    pub fn sensor(&self) -> (u8, u8, u8) {
        self.sensor
    }

    /// Color for range ring `ring` of `rings` (0 = innermost).
    /// Outer rings are drawn slightly brighter.
    pub fn ring(&self, ring: usize, rings: usize) -> (u8, u8, u8) {
        let position = if rings <= 1 {
            1.0
        } else {
            ring as f32 / (rings - 1) as f32
        };
        shade(self.grid, 0.75 + position * 0.5)
    }

    pub fn spoke(&self) -> (u8, u8, u8) {
        shade(self.grid, 0.8)
    }
}

fn rgb(c: RgbColor) -> (u8, u8, u8) {
    (c.r, c.g, c.b)
}

/// Scale the HSL lightness of a color.
pub fn shade(color: (u8, u8, u8), factor: f32) -> (u8, u8, u8) {
    let srgb = Srgb::new(color.0, color.1, color.2).into_format::<f32>();
    let mut hsl: Hsl = srgb.into_color();
    hsl.lightness = (hsl.lightness * factor).clamp(0.0, 1.0);
    let out: Srgb = hsl.into_color();
    (
        (out.red * 255.0).round() as u8,
        (out.green * 255.0).round() as u8,
        (out.blue * 255.0).round() as u8,
    )
}

fn glow(color: (u8, u8, u8)) -> (u8, u8, u8) {
    let srgb = Srgb::new(color.0, color.1, color.2).into_format::<f32>();
    let mut hsl: Hsl = srgb.into_color();
    hsl.saturation = (hsl.saturation * 0.7).clamp(0.0, 1.0);
    hsl.lightness = (hsl.lightness * 0.45).clamp(0.0, 1.0);
    let out: Srgb = hsl.into_color();
    (
        (out.red * 255.0).round() as u8,
        (out.green * 255.0).round() as u8,
        (out.blue * 255.0).round() as u8,
    )
}

/// Interpolate between two colors
pub fn lerp_color(a: (u8, u8, u8), b: (u8, u8, u8), t: f32) -> (u8, u8, u8) {
    let t = t.clamp(0.0, 1.0);
    (
        (a.0 as f32 + (b.0 as f32 - a.0 as f32) * t) as u8,
        (a.1 as f32 + (b.1 as f32 - a.1 as f32) * t) as u8,
        (a.2 as f32 + (b.2 as f32 - a.2 as f32) * t) as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn luma(c: (u8, u8, u8)) -> u32 {
        c.0 as u32 + c.1 as u32 + c.2 as u32
    }

    #[test]
    fn shade_identity_keeps_color() {
        let c = (64, 128, 255);
        let s = shade(c, 1.0);
        assert!((s.0 as i32 - c.0 as i32).abs() <= 1);
        assert!((s.1 as i32 - c.1 as i32).abs() <= 1);
        assert!((s.2 as i32 - c.2 as i32).abs() <= 1);
    }

    #[test]
    fn glow_is_darker_than_marker() {
        let palette = ScopePalette::from_config(&ColorConfig::default());
        for set in SetId::ALL {
            assert!(luma(palette.glow(set)) < luma(palette.marker(set)));
        }
    }

    #[test]
    fn outer_rings_are_brighter() {
        let palette = ScopePalette::from_config(&ColorConfig::default());
        assert!(luma(palette.ring(3, 4)) > luma(palette.ring(0, 4)));
    }

    #[test]
    fn lerp_color_endpoints() {
        assert_eq!(lerp_color((0, 0, 0), (200, 100, 50), 0.0), (0, 0, 0));
        assert_eq!(lerp_color((0, 0, 0), (200, 100, 50), 1.0), (200, 100, 50));
    }
}
