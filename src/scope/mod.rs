//! Radar scope rendering for the terminal.
//!
//! The scope is drawn in layers onto braille canvases: grid (range rings and
//! bearing spokes), sensor, marker glow, then the markers themselves. A later
//! layer owns any cell it touches.

mod braille;
mod radial;

pub use braille::BrailleCanvas;
pub use radial::{polar_to_grid, ScopeGeometry};

use ratatui::prelude::*;

use crate::color::ScopePalette;
use crate::config::{DisplayConfig, MAX_RINGS};
use crate::display::MarkerLayer;
use crate::radar::SetId;

/// Bearings of the spokes drawn on the grid.
const SPOKE_STEP_DEGREES: usize = 45;

/// Everything the scope needs for one frame.
pub struct ScopeView<'a> {
    pub display: &'a DisplayConfig,
    pub palette: &'a ScopePalette,
    pub markers: &'a MarkerLayer,
    /// Whether each set (by [`SetId::index`]) is mid-animation.
    pub moving: [bool; 2],
}

pub fn render(frame: &mut Frame, area: Rect, view: &ScopeView) {
    if area.width < 4 || area.height < 2 {
        return;
    }

    let char_w = area.width as usize;
    let char_h = area.height as usize;
    let mut canvas = BrailleCanvas::new(char_w, char_h);
    let geo = ScopeGeometry::fit(canvas.grid_w, canvas.grid_h, view.display.range_cm);
    let (cx, cy) = geo.center();
    let (cx, cy) = (cx as isize, cy as isize);

    if view.display.show_grid {
        render_grid(frame, area, &mut canvas, &geo, view);
    }

    // Sensor
    canvas.clear();
    canvas.disc(cx, cy, 2);
    let sensor = view.palette.sensor();
    canvas.render(frame, area, sensor);

    for set in SetId::ALL {
        let points = view.markers.markers(set);

        if view.moving[set.index()] {
            canvas.clear();
            for &p in points {
                if let Some((gx, gy)) = geo.to_grid(p) {
                    canvas.disc(gx as isize, gy as isize, 2);
                }
            }
            let glow = view.palette.glow(set);
            canvas.render(frame, area, glow);
        }

        canvas.clear();
        for &p in points {
            if let Some((gx, gy)) = geo.to_grid(p) {
                canvas.disc(gx as isize, gy as isize, 1);
            }
        }
        let color = view.palette.marker(set);
        canvas.render(frame, area, color);
    }
}

fn render_grid(
    frame: &mut Frame,
    area: Rect,
    canvas: &mut BrailleCanvas,
    geo: &ScopeGeometry,
    view: &ScopeView,
) {
    let (cx, cy) = geo.center();
    let (cx, cy) = (cx as isize, cy as isize);
    let ranges = ring_ranges_cm(view.display);
    let rings = ranges.len();

    for (ring, &cm) in ranges.iter().enumerate() {
        canvas.clear();
        canvas.circle(cx, cy, geo.ring_radius(cm).round() as isize);
        let color = view.palette.ring(ring, rings);
        canvas.render(frame, area, color);
    }

    canvas.clear();
    for bearing in (0..360).step_by(SPOKE_STEP_DEGREES) {
        let (x1, y1) = polar_to_grid(geo.cx, geo.cy, bearing as f32, geo.radius);
        canvas.line(cx, cy, x1.round() as isize, y1.round() as isize);
    }
    let spoke = view.palette.spoke();
    canvas.render(frame, area, spoke);

    // Range labels just right of where each ring crosses the +x spoke
    let label_row = area.y + (geo.cy / 4.0) as u16;
    for (ring, &cm) in ranges.iter().enumerate() {
        let label = format!("{}cm", cm);
        let gx = geo.cx + geo.ring_radius(cm);
        let col = area.x + (gx / 2.0).round() as u16 + 1;
        let (r, g, b) = view.palette.ring(ring, rings);
        write_label(frame, area, col, label_row.saturating_add(1), &label, (r, g, b));
    }
}

/// Range of each ring in centimetres, innermost first. Never more than
/// [`MAX_RINGS`], whatever the config says.
fn ring_ranges_cm(display: &DisplayConfig) -> Vec<f64> {
    let rings = display.ring_count().min(MAX_RINGS);
    (1..=rings)
        .map(|ring| display.ring_step_cm * ring as f64)
        .collect()
}

/// Write plain text into the frame buffer, clipped to `area`.
pub fn write_label(frame: &mut Frame, area: Rect, x: u16, y: u16, text: &str, color: (u8, u8, u8)) {
    if y < area.y || y >= area.y + area.height {
        return;
    }
    for (i, ch) in text.chars().enumerate() {
        let cx = x.saturating_add(i as u16);
        if cx < area.x || cx >= area.x + area.width {
            continue;
        }
        if let Some(cell) = frame.buffer_mut().cell_mut((cx, y)) {
            cell.set_char(ch);
            cell.set_fg(Color::Rgb(color.0, color.1, color.2));
        }
    }
}
