use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::display::DisplayMode;
use crate::radar::PolarPoint;

/// Most range rings the scope will draw.
pub const MAX_RINGS: usize = 64;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default)]
    pub radar: RadarConfig,
    #[serde(default)]
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
    /// Frames per second the render loop aims for
    pub fps: u32,
    /// Range of the outermost ring in centimetres
    pub range_cm: f64,
    /// Spacing between range rings in centimetres
    pub ring_step_cm: f64,
    /// Draw range rings and bearing spokes
    pub show_grid: bool,
    /// Listen for control commands on the IPC socket
    pub ipc: bool,
}

impl DisplayConfig {
    /// Number of range rings between the sensor and `range_cm`, at least one.
    pub fn ring_count(&self) -> usize {
        (self.range_cm / self.ring_step_cm).floor().max(1.0) as usize
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Terminal,
            fps: 60,
            range_cm: 100.0,
            ring_step_cm: 25.0,
            show_grid: true,
            ipc: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    pub duration_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration_ms: crate::animation::DEFAULT_DURATION.as_millis() as u64,
        }
    }
}

impl AnimationConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }
}

/// Canonical samples, `[angle_degrees, distance_cm]` pairs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub blue: Vec<PolarPoint>,
    pub red: Vec<PolarPoint>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            blue: vec![
                PolarPoint::new(153.0, 48.47),
                PolarPoint::new(111.0, 37.37),
                PolarPoint::new(69.0, 56.6),
                PolarPoint::new(34.0, 52.83),
                PolarPoint::new(19.0, 43.77),
                PolarPoint::new(18.0, 55.95),
                PolarPoint::new(0.0, 65.96),
            ],
            red: vec![
                PolarPoint::new(180.0, 48.47),
                PolarPoint::new(140.0, 37.37),
                PolarPoint::new(90.0, 56.6),
                PolarPoint::new(60.0, 52.83),
                PolarPoint::new(30.0, 43.77),
                PolarPoint::new(10.0, 55.95),
                PolarPoint::new(0.0, 65.96),
            ],
        }
    }
}

/// RGB color representation for configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RgbColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl RgbColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse from hex string like "#FF0000" or "FF0000"
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some(Self { r, g, b })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub blue: RgbColor,
    pub red: RgbColor,
    pub grid: RgbColor,
    pub sensor: RgbColor,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            blue: RgbColor::new(64, 128, 255),
            red: RgbColor::new(255, 64, 64),
            grid: RgbColor::new(0, 100, 0),
            sensor: RgbColor::new(128, 128, 128),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the render loop cannot work with. Point sets are
    /// validated separately when the registry is built.
    pub fn validate(&self) -> Result<()> {
        if self.display.fps == 0 {
            anyhow::bail!("display.fps must be at least 1");
        }
        if !(self.display.range_cm.is_finite() && self.display.range_cm > 0.0) {
            anyhow::bail!("display.range_cm must be a positive number");
        }
        if !(self.display.ring_step_cm.is_finite() && self.display.ring_step_cm > 0.0) {
            anyhow::bail!("display.ring_step_cm must be a positive number");
        }
        if self.display.ring_count() > MAX_RINGS {
            anyhow::bail!(
                "display.range_cm / display.ring_step_cm gives {} rings, at most {} are allowed",
                self.display.ring_count(),
                MAX_RINGS
            );
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.display.fps.max(1) as f64)
    }

    /// Get the default XDG config path (~/.config/cyradar/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("cyradar").join("config.toml"))
    }

    /// Load an explicit config file, else the default XDG path if it exists,
    /// else built-in defaults. A file that exists but doesn't parse is an error.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Initialize default config file at XDG path, returns the path
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(&path, Self::generate_config_template())?;

        Ok(path)
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# cyradar configuration
# This file is auto-generated. Edit as needed.

[display]
# Display mode: "terminal" or "headless"
mode = "terminal"
# Target frames per second
fps = 60
# Range of the outermost ring (cm)
range_cm = 100.0
# Spacing between range rings (cm)
ring_step_cm = 25.0
# Draw range rings and bearing spokes
show_grid = true
# Accept control commands on the IPC socket
ipc = true

[animation]
# Length of the rotation tween in milliseconds
duration_ms = 1000

[radar]
# Canonical samples as [angle_degrees, distance_cm].
# 0 degrees points right, angles grow counter-clockwise.
# The number of points is fixed for the life of the process.
blue = [
    [153.0, 48.47],
    [111.0, 37.37],
    [69.0, 56.6],
    [34.0, 52.83],
    [19.0, 43.77],
    [18.0, 55.95],
    [0.0, 65.96],
]
red = [
    [180.0, 48.47],
    [140.0, 37.37],
    [90.0, 56.6],
    [60.0, 52.83],
    [30.0, 43.77],
    [10.0, 55.95],
    [0.0, 65.96],
]

[colors]
blue = { r = 64, g = 128, b = 255 }
red = { r = 255, g = 64, b = 64 }
grid = { r = 0, g = 100, b = 0 }
sensor = { r = 128, g = 128, b = 128 }
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &crate::Args) {
        if let Some(mode) = args.mode {
            self.display.mode = mode;
        }
        if let Some(fps) = args.fps {
            self.display.fps = fps;
        }
        if let Some(range) = args.range_cm {
            self.display.range_cm = range;
        }
        if args.no_ipc {
            self.display.ipc = false;
        }
        if let Some(ms) = args.duration_ms {
            self.animation.duration_ms = ms;
        }
        if let Some(ref color) = args.blue_color {
            match RgbColor::from_hex(color) {
                Some(c) => self.colors.blue = c,
                None => warn!("Ignoring invalid --blue-color '{}'", color),
            }
        }
        if let Some(ref color) = args.red_color {
            match RgbColor::from_hex(color) {
                Some(c) => self.colors.red = c,
                None => warn!("Ignoring invalid --red-color '{}'", color),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_matches_defaults() {
        let parsed: Config = toml::from_str(&Config::generate_config_template()).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.display.mode, defaults.display.mode);
        assert_eq!(parsed.display.fps, defaults.display.fps);
        assert_eq!(parsed.display.range_cm, defaults.display.range_cm);
        assert_eq!(parsed.animation.duration_ms, 1000);
        assert_eq!(parsed.radar.blue, defaults.radar.blue);
        assert_eq!(parsed.radar.red, defaults.radar.red);
        assert_eq!(parsed.colors.red, defaults.colors.red);
        parsed.validate().unwrap();
    }

    #[test]
    fn partial_config_falls_back_to_defaults() {
        let parsed: Config = toml::from_str(
            r#"
            [animation]
            duration_ms = 250

            [radar]
            blue = [[45.0, 10.0]]
            "#,
        )
        .unwrap();
        assert_eq!(parsed.animation.duration(), Duration::from_millis(250));
        assert_eq!(parsed.radar.blue, vec![PolarPoint::new(45.0, 10.0)]);
        assert_eq!(parsed.radar.red.len(), 7);
        assert_eq!(parsed.display.fps, 60);
    }

    #[test]
    fn validate_rejects_unusable_display_settings() {
        let mut config = Config::default();
        config.display.fps = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.display.range_cm = -5.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.display.range_cm = 1e6;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.display.ring_step_cm = 0.0001;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.display.range_cm = 64.0 * config.display.ring_step_cm;
        assert_eq!(config.display.ring_count(), MAX_RINGS);
        config.validate().unwrap();
    }

    #[test]
    fn explicit_config_path_is_loaded() {
        let path = std::env::temp_dir().join(format!("cyradar-config-{}.toml", std::process::id()));
        std::fs::write(&path, "[display]\nfps = 30\n").unwrap();
        let config = Config::load_or_default(Some(&path)).unwrap();
        assert_eq!(config.display.fps, 30);
        assert_eq!(config.frame_interval(), Duration::from_secs_f64(1.0 / 30.0));

        std::fs::write(&path, "[display]\nfps = \"fast\"\n").unwrap();
        assert!(Config::load_or_default(Some(&path)).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn hex_colors() {
        assert_eq!(RgbColor::from_hex("#FF8000"), Some(RgbColor::new(255, 128, 0)));
        assert_eq!(RgbColor::from_hex("00ff00"), Some(RgbColor::new(0, 255, 0)));
        assert_eq!(RgbColor::from_hex("#FFF"), None);
        assert_eq!(RgbColor::from_hex("zzzzzz"), None);
    }
}
