//! Game settings
//!
//! Every tunable the simulator and session accept, with defaults matching the
//! classic game. Hosts can override any subset from JSON.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{ConfigError, ConfigResult};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Canvas ===
    /// Visible area in canvas units
    pub canvas_width: f32,
    pub canvas_height: f32,

    // === Hourglass ===
    /// Center point; `None` centers it on the canvas
    pub hourglass_center: Option<[f32; 2]>,
    pub hourglass_width: f32,
    pub hourglass_height: f32,

    // === Sand ===
    /// Maximum live sand grains
    pub max_sand: usize,
    /// Per-frame spawn probability at level 1
    pub flow_rate: f32,
    /// Downward acceleration per 60 Hz frame
    pub gravity: f32,
    /// Fraction of `max_sand` in the top bulb at start (0.0 - 1.0)
    pub sand_level: f32,

    // === Session ===
    /// Minimum time between accepted flips
    pub flip_cooldown_ms: f64,
    /// Starting timer
    pub session_seconds: i32,

    /// RNG seed
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            hourglass_center: None,
            hourglass_width: HOURGLASS_WIDTH,
            hourglass_height: HOURGLASS_HEIGHT,

            max_sand: MAX_SAND,
            flow_rate: FLOW_RATE,
            gravity: GRAVITY,
            sand_level: SAND_LEVEL,

            flip_cooldown_ms: FLIP_COOLDOWN_MS,
            session_seconds: SESSION_SECONDS,

            seed: 0,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Parse settings, falling back to defaults on any error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(settings) => {
                log::info!("Loaded settings");
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Effective hourglass center
    pub fn hourglass_center(&self) -> Vec2 {
        match self.hourglass_center {
            Some([x, y]) => Vec2::new(x, y),
            None => Vec2::new(self.canvas_width / 2.0, self.canvas_height / 2.0),
        }
    }

    /// Check every value the simulation math depends on
    pub fn validate(&self) -> ConfigResult<()> {
        for (name, value) in [
            ("width", self.hourglass_width),
            ("height", self.hourglass_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }

        for (name, value) in [
            ("canvas_width", self.canvas_width),
            ("canvas_height", self.canvas_height),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::InvalidParameter {
                    name,
                    value: value as f64,
                });
            }
        }

        let non_negative = [
            ("flow_rate", self.flow_rate as f64),
            ("gravity", self.gravity as f64),
            ("flip_cooldown_ms", self.flip_cooldown_ms),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidParameter { name, value });
            }
        }

        if self.max_sand == 0 || self.max_sand > MAX_SAND_LIMIT {
            return Err(ConfigError::InvalidParameter {
                name: "max_sand",
                value: self.max_sand as f64,
            });
        }
        if !(0.0..=1.0).contains(&self.sand_level) {
            return Err(ConfigError::InvalidParameter {
                name: "sand_level",
                value: self.sand_level as f64,
            });
        }
        if self.session_seconds <= 0 {
            return Err(ConfigError::InvalidParameter {
                name: "session_seconds",
                value: self.session_seconds as f64,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.hourglass_center(), Vec2::new(400.0, 300.0));
        assert_eq!(settings.max_sand, 200);
        assert_eq!(settings.flip_cooldown_ms, 500.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings =
            Settings::from_json(r#"{ "max_sand": 50, "hourglass_center": [100, 120] }"#).unwrap();
        assert_eq!(settings.max_sand, 50);
        assert_eq!(settings.hourglass_center(), Vec2::new(100.0, 120.0));
        assert_eq!(settings.hourglass_width, 120.0);
        assert_eq!(settings.gravity, 0.5);
    }

    #[test]
    fn test_json_round_trip() {
        let settings = Settings {
            seed: 77,
            flow_rate: 0.01,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_degenerate_values() {
        let bad_width = r#"{ "hourglass_width": -5 }"#;
        assert!(matches!(
            Settings::from_json(bad_width),
            Err(ConfigError::NonPositiveDimension { name: "width", .. })
        ));

        let bad_level = Settings {
            sand_level: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            bad_level.validate(),
            Err(ConfigError::InvalidParameter { name: "sand_level", .. })
        ));

        let no_sand = Settings {
            max_sand: 0,
            ..Default::default()
        };
        assert!(no_sand.validate().is_err());

        let huge_cap = r#"{ "max_sand": 18446744073709551615 }"#;
        assert!(matches!(
            Settings::from_json(huge_cap),
            Err(ConfigError::InvalidParameter { name: "max_sand", .. })
        ));
        let at_limit = Settings {
            max_sand: MAX_SAND_LIMIT,
            ..Default::default()
        };
        assert!(at_limit.validate().is_ok());

        let empty_canvas = r#"{ "canvas_width": 0, "canvas_height": 0 }"#;
        assert!(matches!(
            Settings::from_json(empty_canvas),
            Err(ConfigError::InvalidParameter { name: "canvas_width", .. })
        ));
        let flat_canvas = Settings {
            canvas_height: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            flat_canvas.validate(),
            Err(ConfigError::InvalidParameter { name: "canvas_height", .. })
        ));

        let bad_gravity = Settings {
            gravity: f32::NAN,
            ..Default::default()
        };
        assert!(bad_gravity.validate().is_err());
    }

    #[test]
    fn test_malformed_json_falls_back() {
        assert!(matches!(
            Settings::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(Settings::from_json_or_default("{ not json"), Settings::default());
    }
}
