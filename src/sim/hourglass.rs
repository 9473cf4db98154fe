//! Hourglass geometry
//!
//! The hourglass is stored as center, width and height only. Everything the
//! collision code needs is derived:
//! - each bulb is a circle of radius width/2, offset height/4 above/below center
//! - the neck is a band of half-width width/12 and half-height NECK_HALF_HEIGHT

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::NECK_HALF_HEIGHT;
use crate::error::{ConfigError, ConfigResult};

/// Which bulb a sand particle currently belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Bulb {
    #[default]
    Top,
    Bottom,
}

/// A bulb as a circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulbCircle {
    pub center: Vec2,
    pub radius: f32,
}

impl BulbCircle {
    /// Distance from the bulb center
    #[inline]
    pub fn distance(&self, p: Vec2) -> f32 {
        p.distance(self.center)
    }

    /// Strictly inside the circle
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        self.distance(p) < self.radius
    }
}

/// Fixed hourglass shape
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourglassGeometry {
    pub center: Vec2,
    pub width: f32,
    pub height: f32,
}

impl HourglassGeometry {
    /// Rejects zero, negative or non-finite dimensions
    pub fn new(center: Vec2, width: f32, height: f32) -> ConfigResult<Self> {
        for (name, value) in [("width", width), ("height", height)] {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositiveDimension { name, value });
            }
        }
        if !center.is_finite() {
            return Err(ConfigError::InvalidParameter {
                name: "center",
                value: f64::NAN,
            });
        }
        Ok(Self {
            center,
            width,
            height,
        })
    }

    #[inline]
    pub fn bulb_radius(&self) -> f32 {
        self.width / 2.0
    }

    pub fn top_bulb(&self) -> BulbCircle {
        BulbCircle {
            center: self.center - Vec2::new(0.0, self.height / 4.0),
            radius: self.bulb_radius(),
        }
    }

    pub fn bottom_bulb(&self) -> BulbCircle {
        BulbCircle {
            center: self.center + Vec2::new(0.0, self.height / 4.0),
            radius: self.bulb_radius(),
        }
    }

    pub fn bulb(&self, which: Bulb) -> BulbCircle {
        match which {
            Bulb::Top => self.top_bulb(),
            Bulb::Bottom => self.bottom_bulb(),
        }
    }

    /// Half-width of the passable neck channel
    #[inline]
    pub fn neck_half_width(&self) -> f32 {
        self.width / 12.0
    }

    /// Whether `p` is vertically inside the neck band
    #[inline]
    pub fn in_neck_band(&self, p: Vec2) -> bool {
        (p.y - self.center.y).abs() < NECK_HALF_HEIGHT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> HourglassGeometry {
        HourglassGeometry::new(Vec2::new(400.0, 300.0), 120.0, 200.0).unwrap()
    }

    #[test]
    fn test_derived_bulbs() {
        let g = geometry();
        assert_eq!(g.top_bulb().center, Vec2::new(400.0, 250.0));
        assert_eq!(g.bottom_bulb().center, Vec2::new(400.0, 350.0));
        assert_eq!(g.top_bulb().radius, 60.0);
        assert_eq!(g.bottom_bulb().radius, 60.0);
        assert_eq!(g.neck_half_width(), 10.0);
    }

    #[test]
    fn test_bulb_lookup_matches_membership() {
        let g = geometry();
        assert_eq!(g.bulb(Bulb::Top), g.top_bulb());
        assert_eq!(g.bulb(Bulb::Bottom), g.bottom_bulb());
    }

    #[test]
    fn test_neck_band() {
        let g = geometry();
        assert!(g.in_neck_band(Vec2::new(0.0, 309.9)));
        assert!(!g.in_neck_band(Vec2::new(400.0, 310.0)));
        assert!(!g.in_neck_band(Vec2::new(400.0, 289.0)));
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        let c = Vec2::new(0.0, 0.0);
        assert!(matches!(
            HourglassGeometry::new(c, 0.0, 200.0),
            Err(ConfigError::NonPositiveDimension { name: "width", .. })
        ));
        assert!(matches!(
            HourglassGeometry::new(c, 120.0, -1.0),
            Err(ConfigError::NonPositiveDimension { name: "height", .. })
        ));
        assert!(HourglassGeometry::new(c, f32::NAN, 200.0).is_err());
        assert!(HourglassGeometry::new(Vec2::new(f32::INFINITY, 0.0), 120.0, 200.0).is_err());
    }
}
